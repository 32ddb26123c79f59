//! Page controllers and the capabilities they are given
//!
//! Pages never talk to a terminal or a router directly. Prompts go through
//! [`UserPrompt`] and route changes through [`Navigator`].

pub mod edit_book;

use std::fmt;
use std::sync::Arc;

use crate::models::book::BookId;

pub use edit_book::{EditBookPage, FormView, PageState, PageView};

/// Places a page can send the user to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Detail view of one book
    BookDetail(BookId),
    /// Default landing view
    Home,
    /// Whatever view came before
    Back,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::BookDetail(id) => format!("/book/{}", id),
            Route::Home => "/".to_string(),
            Route::Back => "..".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Blocking dialogs shown to the user
#[cfg_attr(test, mockall::automock)]
pub trait UserPrompt: Send + Sync {
    /// Ask a yes/no question; `true` means the user agreed
    fn confirm(&self, message: &str) -> bool;

    /// Show a message the user only has to acknowledge
    fn notify(&self, message: &str);
}

impl<T> Navigator for Arc<T>
where
    T: Navigator + ?Sized,
{
    fn navigate(&self, route: Route) {
        (**self).navigate(route)
    }
}

impl<T> UserPrompt for Arc<T>
where
    T: UserPrompt + ?Sized,
{
    fn confirm(&self, message: &str) -> bool {
        (**self).confirm(message)
    }

    fn notify(&self, message: &str) {
        (**self).notify(message)
    }
}
