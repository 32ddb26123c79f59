//! Book edit page controller

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{Navigator, Route, UserPrompt};
use crate::{
    client::BookApi,
    error::{AppError, AppResult},
    models::book::{BookField, BookId, BookRecord},
    services::editor::{BookEditor, Signal},
};

pub const UPDATE_DONE_MESSAGE: &str = "The book has been updated.";
pub const DELETE_DONE_MESSAGE: &str = "The book has been deleted.";
pub const DELETE_CONFIRM_MESSAGE: &str = "Do you really want to delete this book?";

/// Lifecycle of one page instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Uninitialized,
    Loading,
    Ready,
    Submitting,
    /// Terminal: the page sent the user elsewhere
    Navigated,
    /// Terminal: the book could not be loaded
    LoadFailed,
    /// Terminal: the page was torn down
    Closed,
}

/// What the page should currently display
#[derive(Debug, Clone, PartialEq)]
pub enum PageView {
    /// Placeholder shown until the book is loaded
    Loading,
    LoadFailed,
    Form(FormView),
    /// The page was left or torn down; nothing is shown
    Closed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
    pub book: BookRecord,
    pub update_enabled: bool,
    pub delete_enabled: bool,
}

struct PageInner {
    state: PageState,
    entered: Option<BookId>,
}

pub struct EditBookPage<A, P, N> {
    editor: BookEditor<A>,
    prompt: P,
    navigator: N,
    inner: Mutex<PageInner>,
}

impl<A, P, N> EditBookPage<A, P, N>
where
    A: BookApi,
    P: UserPrompt,
    N: Navigator,
{
    pub fn new(api: A, prompt: P, navigator: N) -> Self {
        Self {
            editor: BookEditor::new(api),
            prompt,
            navigator,
            inner: Mutex::new(PageInner {
                state: PageState::Uninitialized,
                entered: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PageInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: PageState) -> PageState {
        self.lock().state = state;
        state
    }

    pub fn state(&self) -> PageState {
        self.lock().state
    }

    pub fn editor(&self) -> &BookEditor<A> {
        &self.editor
    }

    /// Enter the page for a book. Loads once per id.
    pub async fn enter(&self, id: &str) -> PageState {
        let book_id = match BookId::new(id) {
            Ok(book_id) => book_id,
            Err(e) => {
                self.prompt.notify(&e.to_string());
                return self.set_state(PageState::LoadFailed);
            }
        };

        {
            let mut inner = self.lock();
            if inner.state == PageState::Closed {
                return inner.state;
            }
            if inner.entered.as_ref() == Some(&book_id) && inner.state != PageState::Uninitialized {
                tracing::debug!("Book id={} already entered", book_id);
                return inner.state;
            }
            inner.entered = Some(book_id.clone());
            inner.state = PageState::Loading;
        }

        match self.editor.load(book_id).await {
            Ok(Signal::Loaded) => self.set_state(PageState::Ready),
            Ok(_) => self.state(),
            Err(e) => {
                self.report_failure("Load", &e);
                self.set_state(PageState::LoadFailed)
            }
        }
    }

    /// Log a failed operation and tell the user about it
    fn report_failure(&self, action: &str, e: &AppError) {
        match e {
            AppError::Transport(_) | AppError::Config(_) => {
                tracing::error!("{} failed: {}", action, e)
            }
            AppError::UnexpectedResponse(_) => tracing::warn!("{} failed: {}", action, e),
            _ => tracing::debug!("{} refused: {}", action, e),
        }
        self.prompt.notify(&e.user_message());
    }

    /// Form input for one field
    pub fn input(&self, field: BookField, value: impl Into<String>) -> AppResult<()> {
        self.editor.set_field(field, value)
    }

    /// Form input addressed by field name
    pub fn input_named(&self, name: &str, value: impl Into<String>) -> AppResult<()> {
        let field: BookField = name.parse()?;
        self.input(field, value)
    }

    pub fn update_enabled(&self) -> bool {
        self.state() == PageState::Ready && !self.editor.is_updating()
    }

    pub fn delete_enabled(&self) -> bool {
        self.state() == PageState::Ready && !self.editor.is_deleting()
    }

    /// Move from Ready to Submitting, or report that the controls are disabled
    fn start_submitting(&self) -> Result<(), PageState> {
        let mut inner = self.lock();
        if inner.state != PageState::Ready {
            return Err(inner.state);
        }
        inner.state = PageState::Submitting;
        Ok(())
    }

    /// Update button
    pub async fn click_update(&self) -> PageState {
        if let Err(state) = self.start_submitting() {
            tracing::debug!("Update ignored in state {:?}", state);
            return state;
        }

        let action = "Update";
        match self.editor.submit_update().await {
            Ok(Signal::Updated(book_id)) => {
                self.prompt.notify(UPDATE_DONE_MESSAGE);
                self.navigator.navigate(Route::BookDetail(book_id));
                self.set_state(PageState::Navigated)
            }
            Ok(_) => self.state(),
            Err(e) => {
                self.report_failure(action, &e);
                self.set_state(PageState::Ready)
            }
        }
    }

    /// Delete button. Nothing is sent unless the user confirms.
    pub async fn click_delete(&self) -> PageState {
        if !self.delete_enabled() {
            let state = self.state();
            tracing::debug!("Delete ignored in state {:?}", state);
            return state;
        }
        if !self.prompt.confirm(DELETE_CONFIRM_MESSAGE) {
            tracing::debug!("Delete cancelled by user");
            return self.state();
        }
        if let Err(state) = self.start_submitting() {
            return state;
        }

        let action = "Delete";
        match self.editor.submit_delete().await {
            Ok(Signal::Deleted(_)) => {
                self.prompt.notify(DELETE_DONE_MESSAGE);
                self.navigator.navigate(Route::Home);
                self.set_state(PageState::Navigated)
            }
            Ok(_) => self.state(),
            Err(e) => {
                self.report_failure(action, &e);
                self.set_state(PageState::Ready)
            }
        }
    }

    /// Back button
    pub fn click_back(&self) {
        self.navigator.navigate(Route::Back);
    }

    pub fn view(&self) -> PageView {
        match self.state() {
            PageState::LoadFailed => PageView::LoadFailed,
            PageState::Navigated | PageState::Closed => PageView::Closed,
            _ => match self.editor.draft() {
                Some(book) => PageView::Form(FormView {
                    book,
                    update_enabled: self.update_enabled(),
                    delete_enabled: self.delete_enabled(),
                }),
                None => PageView::Loading,
            },
        }
    }

    /// Tear the page down; responses still in flight are dropped
    pub fn teardown(&self) {
        self.editor.detach();
        let mut inner = self.lock();
        inner.state = PageState::Closed;
        inner.entered = None;
    }
}
