//! Content Module
//!
//! Posts (optionally gated by a tier), likes and comments.
//!
//! ```text
//! content/
//! ├── mod.rs      - Module exports
//! ├── posts.rs    - Post, media and like store
//! ├── comments.rs - Comment store
//! └── handlers.rs - HTTP handlers
//! ```

pub mod comments;
pub mod handlers;
pub mod posts;
