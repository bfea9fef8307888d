//! Backend Error Module
//!
//! Error types used by HTTP handlers, the credit-transfer engine and the
//! messaging relay.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - BackendError and Entity
//! └── conversion.rs - IntoResponse and relay error frames
//! ```
//!
//! Handlers return `Result<_, BackendError>`; the error turns into a JSON body
//! with the matching status code. The relay turns the same error into an
//! `{ "error": ... }` frame sent to the originating connection only.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use types::{BackendError, Entity};

/// Result alias used throughout the backend
pub type BackendResult<T> = Result<T, BackendError>;
