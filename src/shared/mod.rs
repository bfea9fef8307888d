//! Shared Module
//!
//! Types and pure logic that do not depend on the server stack: the records the
//! API returns, the relay wire format, input errors, and the entitlement check
//! that decides who may read a gated post. Everything here is compiled with or
//! without the `ssr` feature, so a client crate can depend on it alone.

/// Domain records as returned by the API
pub mod models;

/// Entitlement (access) checks for gated posts
pub mod access;

/// Relay wire format
pub mod wire;

/// Shared error types
pub mod error;

pub use access::{has_access, Entitlements};
pub use error::SharedError;
pub use models::{
    AccountProfile, ChatMessage, Comment, DialogSummary, Post, PublicProfile, PurchasedTier,
    SubscriptionTier, UserProfile,
};
pub use wire::{RawRelayFrame, RelayFrame, RelayOutbound};
