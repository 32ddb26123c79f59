//! Workflow services driving the edit views

pub mod editor;

pub use editor::{BookEditor, Signal};
