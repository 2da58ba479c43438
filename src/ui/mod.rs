//! Terminal UI rendering.
//!
//! Each view renders into the content area between the header/tab bars and
//! the status bar; `common` holds the chrome shared by all of them.

pub mod alerts;
pub mod common;
pub mod history;
pub mod ratings;
pub mod services;
pub mod theme;

pub use theme::Theme;
