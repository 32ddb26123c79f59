//! Remote book API client
//!
//! [`BookApi`] is the seam between the edit workflow and the network. Mutations
//! report a typed [`MutationOutcome`]; adapters translate whatever the server
//! sends into it.

pub mod http;

use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::book::{BookId, BookPayload, BookRecord},
};

pub use http::HttpBookApi;

/// Result of an update or delete the server answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The server confirmed the operation
    Applied,
    /// The server answered, but not with a confirmation
    Rejected { reason: String },
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied)
    }
}

/// Operations the edit workflow needs from the book API.
///
/// Implementations fail with [`crate::AppError::Transport`] when the request
/// could not be completed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookApi: Send + Sync {
    /// Load the current persisted state of a book
    async fn fetch_book(&self, id: &BookId) -> AppResult<BookRecord>;

    /// Replace the editable fields of a book
    async fn update_book(&self, id: &BookId, payload: &BookPayload) -> AppResult<MutationOutcome>;

    /// Remove a book
    async fn delete_book(&self, id: &BookId) -> AppResult<MutationOutcome>;
}

#[async_trait]
impl<T> BookApi for Arc<T>
where
    T: BookApi + ?Sized,
{
    async fn fetch_book(&self, id: &BookId) -> AppResult<BookRecord> {
        (**self).fetch_book(id).await
    }

    async fn update_book(&self, id: &BookId, payload: &BookPayload) -> AppResult<MutationOutcome> {
        (**self).update_book(id, payload).await
    }

    async fn delete_book(&self, id: &BookId) -> AppResult<MutationOutcome> {
        (**self).delete_book(id).await
    }
}
