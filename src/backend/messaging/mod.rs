//! Messaging Module
//!
//! Message storage and the history endpoints (dialog list, dialog window,
//! sent messages). Live delivery is in `realtime`.

pub mod db;
pub mod handlers;

pub use handlers::{dialog_messages, list_dialogs, sent_messages};
