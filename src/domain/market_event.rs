//! Domain events reflecting store mutations.
//!
//! The service layer emits a [`MarketEvent`] through the
//! [`super::EventBus`] after every successful mutation.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Identity, NotificationId, NotificationReason, Role, WorkOfferId};

/// Kind of account registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    /// Platform administrator.
    Admin,
    /// Worker or employer.
    User(Role),
}

/// Domain event emitted after every state mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum MarketEvent {
    /// An admin, worker or employer was registered.
    AccountRegistered {
        /// Registered identity.
        identity: Identity,
        /// What was registered.
        kind: AccountKind,
        /// Registration timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A category joined the vocabulary.
    CategoryAdded {
        /// Normalized label.
        name: String,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A new work offer was published.
    OfferPublished {
        /// Offer id.
        work_offer_id: WorkOfferId,
        /// Owning worker.
        owner: Identity,
        /// Normalized categories.
        categories: Vec<String>,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A work offer was withdrawn.
    OfferWithdrawn {
        /// Offer id.
        work_offer_id: WorkOfferId,
        /// Who withdrew it.
        withdrawn_by: Identity,
        /// Number of observers notified.
        notified: usize,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A notification landed in a user's inbox.
    NotificationDelivered {
        /// Recipient.
        recipient: Identity,
        /// Inbox-scoped id.
        notification_id: NotificationId,
        /// Why it was sent.
        reason: NotificationReason,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A rating received its score.
    RatingSubmitted {
        /// Who scored.
        rater: Identity,
        /// Who was scored.
        rated: Identity,
        /// Offer the rating refers to.
        work_offer_id: WorkOfferId,
        /// Score given.
        score: u8,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl MarketEvent {
    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::AccountRegistered { .. } => "account_registered",
            Self::CategoryAdded { .. } => "category_added",
            Self::OfferPublished { .. } => "offer_published",
            Self::OfferWithdrawn { .. } => "offer_withdrawn",
            Self::NotificationDelivered { .. } => "notification_delivered",
            Self::RatingSubmitted { .. } => "rating_submitted",
        }
    }

    /// Returns the work offer the event refers to, if any.
    #[must_use]
    pub const fn work_offer_id(&self) -> Option<WorkOfferId> {
        match self {
            Self::OfferPublished { work_offer_id, .. }
            | Self::OfferWithdrawn { work_offer_id, .. }
            | Self::RatingSubmitted { work_offer_id, .. } => Some(*work_offer_id),
            Self::AccountRegistered { .. }
            | Self::CategoryAdded { .. }
            | Self::NotificationDelivered { .. } => None,
        }
    }
}
