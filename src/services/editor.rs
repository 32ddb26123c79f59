//! Book edit view-model
//!
//! [`BookEditor`] owns the draft of one book for the lifetime of an edit view.
//! Every request captures the editor generation when it starts; a response that
//! comes back after [`BookEditor::detach`] or a new [`BookEditor::load`] is
//! reported as [`Signal::Stale`] and not applied.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{
    client::{BookApi, MutationOutcome},
    error::{AppError, AppResult},
    models::book::{BookField, BookId, BookRecord},
};

/// What a completed operation means for the view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// The draft now holds the fetched record
    Loaded,
    /// The book was saved; show its detail view
    Updated(BookId),
    /// The book was removed; leave for the default view
    Deleted(BookId),
    /// The response belongs to a view that no longer exists
    Stale,
}

#[derive(Debug, Clone, Copy)]
enum Submission {
    Update,
    Delete,
}

#[derive(Debug, Default)]
struct EditorState {
    generation: u64,
    book_id: Option<BookId>,
    draft: Option<BookRecord>,
    update_in_progress: bool,
    delete_in_progress: bool,
}

impl EditorState {
    fn flag_mut(&mut self, submission: Submission) -> &mut bool {
        match submission {
            Submission::Update => &mut self.update_in_progress,
            Submission::Delete => &mut self.delete_in_progress,
        }
    }
}

pub struct BookEditor<A> {
    api: A,
    state: Mutex<EditorState>,
}

/// Clears an in-progress flag when the submission ends, however it ends
struct InProgress<'a, A> {
    editor: &'a BookEditor<A>,
    submission: Submission,
    generation: u64,
}

impl<A> Drop for InProgress<'_, A> {
    fn drop(&mut self) {
        let mut state = self.editor.lock();
        // A newer generation has already reset its own flags
        if state.generation == self.generation {
            *state.flag_mut(self.submission) = false;
        }
    }
}

impl<A> BookEditor<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: Mutex::new(EditorState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, EditorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.lock().generation == generation
    }

    /// Copy of the current draft, if one is loaded
    pub fn draft(&self) -> Option<BookRecord> {
        self.lock().draft.clone()
    }

    /// Id the editor was loaded for
    pub fn book_id(&self) -> Option<BookId> {
        self.lock().book_id.clone()
    }

    pub fn is_updating(&self) -> bool {
        self.lock().update_in_progress
    }

    pub fn is_deleting(&self) -> bool {
        self.lock().delete_in_progress
    }

    /// Change one field of the draft. Validation waits for submission.
    pub fn set_field(&self, field: BookField, value: impl Into<String>) -> AppResult<()> {
        let mut state = self.lock();
        let draft = state.draft.as_mut().ok_or(AppError::NotLoaded)?;
        draft.set_field(field, value);
        Ok(())
    }

    /// Forget the draft and make every outstanding response stale
    pub fn detach(&self) {
        let mut state = self.lock();
        state.generation += 1;
        state.book_id = None;
        state.draft = None;
        state.update_in_progress = false;
        state.delete_in_progress = false;
    }

    /// Mark a submission as started, or refuse it
    fn begin(&self, submission: Submission) -> AppResult<(u64, BookId)> {
        let mut state = self.lock();
        if state.draft.is_none() {
            return Err(AppError::NotLoaded);
        }
        if state.update_in_progress || state.delete_in_progress {
            return Err(AppError::Busy);
        }
        let book_id = state.book_id.clone().ok_or(AppError::NotLoaded)?;
        *state.flag_mut(submission) = true;
        Ok((state.generation, book_id))
    }

    /// Drop the draft once its record has been saved or removed
    fn finish(&self, generation: u64) {
        let mut state = self.lock();
        if state.generation == generation {
            state.draft = None;
        }
    }
}

impl<A: BookApi> BookEditor<A> {
    /// Fetch the current state of a book and make it the draft.
    ///
    /// On failure the draft stays unset; the error is returned for the caller
    /// to surface. There is no retry.
    pub async fn load(&self, book_id: BookId) -> AppResult<Signal> {
        let generation = {
            let mut state = self.lock();
            state.generation += 1;
            state.book_id = Some(book_id.clone());
            state.draft = None;
            state.update_in_progress = false;
            state.delete_in_progress = false;
            state.generation
        };

        tracing::debug!("Loading book id={}", book_id);
        let result = self.api.fetch_book(&book_id).await;

        let mut state = self.lock();
        if state.generation != generation {
            tracing::debug!("Discarding stale load of book id={}", book_id);
            return Ok(Signal::Stale);
        }
        let mut book = result?;
        // Requests are addressed by the id the view was entered with
        book.id = Some(book_id);
        state.draft = Some(book);
        Ok(Signal::Loaded)
    }

    /// Validate the draft and send it as an update.
    ///
    /// Validation failures return before any request is made. The draft is
    /// left untouched on failure so the user can correct it and retry.
    pub async fn submit_update(&self) -> AppResult<Signal> {
        let (generation, book_id) = self.begin(Submission::Update)?;
        let _in_progress = InProgress {
            editor: self,
            submission: Submission::Update,
            generation,
        };

        let payload = self.draft().ok_or(AppError::NotLoaded)?.to_payload()?;

        tracing::debug!("Updating book id={}", book_id);
        let result = self.api.update_book(&book_id, &payload).await;

        if !self.is_current(generation) {
            tracing::debug!("Discarding stale update of book id={}", book_id);
            return Ok(Signal::Stale);
        }

        match result? {
            MutationOutcome::Applied => {
                tracing::info!("Book id={} updated", book_id);
                self.finish(generation);
                Ok(Signal::Updated(book_id))
            }
            MutationOutcome::Rejected { reason } => Err(AppError::UnexpectedResponse(format!(
                "update of book id={}: {}",
                book_id, reason
            ))),
        }
    }

    /// Delete the loaded book. The caller is responsible for confirmation.
    pub async fn submit_delete(&self) -> AppResult<Signal> {
        let (generation, book_id) = self.begin(Submission::Delete)?;
        let _in_progress = InProgress {
            editor: self,
            submission: Submission::Delete,
            generation,
        };

        tracing::debug!("Deleting book id={}", book_id);
        let result = self.api.delete_book(&book_id).await;

        if !self.is_current(generation) {
            tracing::debug!("Discarding stale delete of book id={}", book_id);
            return Ok(Signal::Stale);
        }

        match result? {
            MutationOutcome::Applied => {
                tracing::info!("Book id={} deleted", book_id);
                self.finish(generation);
                Ok(Signal::Deleted(book_id))
            }
            MutationOutcome::Rejected { reason } => Err(AppError::UnexpectedResponse(format!(
                "delete of book id={}: {}",
                book_id, reason
            ))),
        }
    }
}
