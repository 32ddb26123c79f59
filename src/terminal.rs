//! Terminal implementations of the page capabilities

use std::fmt::Write as _;
use std::io::{self, BufRead, Write};
use std::sync::Mutex;

use crate::{
    models::book::BookField,
    pages::{Navigator, PageView, Route, UserPrompt},
};

/// Prompts on stdin/stdout
pub struct TerminalPrompt {
    assume_yes: bool,
}

impl TerminalPrompt {
    /// With `assume_yes` every confirmation is accepted without asking
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

impl UserPrompt for TerminalPrompt {
    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            tracing::debug!("Confirmed without asking: {}", message);
            return true;
        }

        let mut stdout = io::stdout().lock();
        if write!(stdout, "{} [y/N] ", message).and_then(|_| stdout.flush()).is_err() {
            return false;
        }
        drop(stdout);

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_affirmative(&answer),
            Err(e) => {
                tracing::warn!("Could not read confirmation: {}", e);
                false
            }
        }
    }

    fn notify(&self, message: &str) {
        println!("{}", message);
    }
}

/// Remembers where the page asked to go
#[derive(Default)]
pub struct TerminalNavigator {
    last: Mutex<Option<Route>>,
}

impl TerminalNavigator {
    pub fn last_route(&self) -> Option<Route> {
        self.last.lock().ok().and_then(|last| last.clone())
    }
}

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: Route) {
        tracing::info!("Navigating to {}", route);
        if let Ok(mut last) = self.last.lock() {
            *last = Some(route);
        }
    }
}

/// Plain text rendering of the edit page
pub fn render(view: &PageView) -> String {
    match view {
        PageView::Loading => "Loading...".to_string(),
        PageView::LoadFailed => "The book could not be loaded.".to_string(),
        PageView::Closed => String::new(),
        PageView::Form(form) => {
            let mut out = String::new();
            if let Some(id) = &form.book.id {
                let _ = writeln!(out, "id: {}", id);
            }
            if let Some(cover) = &form.book.cover_image_url {
                let _ = writeln!(out, "cover: {}", cover);
            }
            for field in BookField::ALL {
                let _ = writeln!(out, "{}: {}", field, form.book.field(field));
            }
            out
        }
    }
}
