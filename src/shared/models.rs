//! Domain records as they appear on the wire.
//!
//! These are the fully resolved shapes the API returns: references to other
//! accounts are expanded to [`PublicProfile`] projections and tiers are
//! embedded. Field names serialize as camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public projection of an account (what other users may see)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: Uuid,
    pub username: String,
    pub avatar: String,
}

/// A creator-defined paid access level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionTier {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub name: String,
    /// Price in credits, never negative
    pub price: i64,
    pub description: String,
    pub image: String,
    pub created_at: DateTime<Utc>,
}

/// A purchased tier together with the creator who sells it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchasedTier {
    #[serde(flatten)]
    pub tier: SubscriptionTier,
    pub creator: PublicProfile,
}

/// An account as seen by its owner.
///
/// Returned by `/api/auth/me` and by a successful purchase, so a client can
/// replace its local state with it directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub description: String,
    pub avatar: String,
    pub cover: String,
    pub credits: i64,
    pub purchased_subscriptions: Vec<SubscriptionTier>,
}

impl AccountProfile {
    pub fn has_purchased(&self, tier_id: Uuid) -> bool {
        self.purchased_subscriptions.iter().any(|t| t.id == tier_id)
    }
}

/// An account as seen by anyone else (no balance)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub description: String,
    pub avatar: String,
    pub cover: String,
    pub purchased_subscriptions: Vec<SubscriptionTier>,
}

impl From<AccountProfile> for UserProfile {
    fn from(profile: AccountProfile) -> Self {
        Self {
            id: profile.id,
            username: profile.username,
            email: profile.email,
            description: profile.description,
            avatar: profile.avatar,
            cover: profile.cover,
            purchased_subscriptions: profile.purchased_subscriptions,
        }
    }
}

/// A post, possibly gated behind a tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub author: PublicProfile,
    /// Access gate; `None` means open to everyone
    pub tier: Option<SubscriptionTier>,
    pub title: String,
    pub content: String,
    pub media: Vec<String>,
    /// Accounts that liked the post (set semantics)
    pub likes: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    /// True when the viewer lacks access and the body was withheld
    #[serde(default)]
    pub locked: bool,
}

impl Post {
    pub fn gate(&self) -> Option<Uuid> {
        self.tier.as_ref().map(|t| t.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author: PublicProfile,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A persisted direct message with both parties resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,
    pub content: String,
    pub sender: PublicProfile,
    pub recipient: PublicProfile,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// The party that is not `me`
    pub fn counterpart(&self, me: Uuid) -> &PublicProfile {
        if self.sender.id == me {
            &self.recipient
        } else {
            &self.sender
        }
    }
}

/// One entry of the dialog list: the latest message with a counterpart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogSummary {
    pub user: PublicProfile,
    pub last_message: String,
    pub created_at: DateTime<Utc>,
}
