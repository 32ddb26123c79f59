//! Data models for the book administration client

pub mod book;

// Re-export commonly used types
pub use book::{BookField, BookId, BookPayload, BookRecord};
