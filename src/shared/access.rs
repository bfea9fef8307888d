//! Read-time entitlement checks.
//!
//! Access to a post is decided from three facts only: whether the post has a
//! gate, who wrote it, and which tiers the viewer has bought. The check is a
//! pure function and is evaluated on every read; nothing here is cached.

use std::collections::HashSet;

use uuid::Uuid;

use crate::shared::models::{AccountProfile, Post};

/// What a viewer is entitled to see
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entitlements {
    pub account_id: Uuid,
    pub purchased: HashSet<Uuid>,
}

impl Entitlements {
    pub fn new(account_id: Uuid, purchased: impl IntoIterator<Item = Uuid>) -> Self {
        Self {
            account_id,
            purchased: purchased.into_iter().collect(),
        }
    }

    /// Whether this viewer may read a post by `author_id` gated by `gate`
    pub fn can_view(&self, author_id: Uuid, gate: Option<Uuid>) -> bool {
        has_access(self, author_id, gate)
    }

    /// Withhold the body of a post the viewer cannot access.
    ///
    /// Title, author, tier and likes stay visible so the client can render a
    /// "subscribe to unlock" card.
    pub fn apply(&self, mut post: Post) -> Post {
        if self.can_view(post.author.id, post.gate()) {
            post.locked = false;
        } else {
            post.content.clear();
            post.media.clear();
            post.locked = true;
        }
        post
    }
}

impl From<&AccountProfile> for Entitlements {
    fn from(profile: &AccountProfile) -> Self {
        Self::new(
            profile.id,
            profile.purchased_subscriptions.iter().map(|t| t.id),
        )
    }
}

/// True if the post is open, the viewer wrote it, or the viewer bought its tier
pub fn has_access(viewer: &Entitlements, author_id: Uuid, gate: Option<Uuid>) -> bool {
    match gate {
        None => true,
        Some(_) if viewer.account_id == author_id => true,
        Some(tier_id) => viewer.purchased.contains(&tier_id),
    }
}
