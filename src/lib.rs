//! Book administration client
//!
//! Loads a book from the library REST API, lets an administrator edit or
//! delete it, and reports where the user should be sent afterwards. The
//! workflow is UI-agnostic; the `book-admin` binary drives it from a terminal.

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod pages;
pub mod services;
pub mod terminal;

#[cfg(test)]
mod testing;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
