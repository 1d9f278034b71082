//! Inbox notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Identity, NotificationId, WorkOfferId};
use crate::contract::{require_postcondition, require_precondition};
use crate::domain::text::is_blank;
use crate::error::Violation;

/// Why a notification was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationReason {
    /// An employer asked to get in touch about an offer.
    EmployerWantsContact,
    /// The worker answered a contact request.
    WorkerResponded,
    /// An offer the recipient observes was withdrawn.
    AdminWithdrewOffer,
}

/// Message delivered to a user's inbox.
///
/// Owned by the recipient. Starts open and is closed at most once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    id: NotificationId,
    message: String,
    sender: Identity,
    reason: NotificationReason,
    work_offer_id: Option<WorkOfferId>,
    created_at: DateTime<Utc>,
    is_open: bool,
}

impl Notification {
    /// Builds an open notification.
    ///
    /// # Errors
    ///
    /// Returns [`Violation::Precondition`] if `id` is zero or `message`
    /// is blank.
    pub fn new(
        id: NotificationId,
        message: &str,
        sender: Identity,
        reason: NotificationReason,
        work_offer_id: Option<WorkOfferId>,
    ) -> Result<Self, Violation> {
        require_precondition(id.get() > 0, "notification id must be positive")?;
        require_precondition(!is_blank(message), "notification message must not be blank")?;

        let notification = Self {
            id,
            message: message.to_string(),
            sender,
            reason,
            work_offer_id,
            created_at: Utc::now(),
            is_open: true,
        };
        require_postcondition(notification.is_open, "new notification must be open")?;
        Ok(notification)
    }

    /// Returns the inbox-scoped id.
    #[must_use]
    pub const fn id(&self) -> NotificationId {
        self.id
    }

    /// Returns the message text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns who sent it.
    #[must_use]
    pub const fn sender(&self) -> Identity {
        self.sender
    }

    /// Returns why it was sent.
    #[must_use]
    pub const fn reason(&self) -> NotificationReason {
        self.reason
    }

    /// Returns the offer it refers to, if any.
    #[must_use]
    pub const fn work_offer_id(&self) -> Option<WorkOfferId> {
        self.work_offer_id
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns `true` until acknowledged.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    /// Marks the notification as acknowledged. Returns `false` if it was
    /// already closed.
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.is_open, false)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn sender() -> Identity {
        let Ok(id) = Identity::new(5) else {
            panic!("valid identity");
        };
        id
    }

    #[test]
    fn blank_message_is_a_violation() {
        let result = Notification::new(
            NotificationId::new(1),
            " ",
            sender(),
            NotificationReason::WorkerResponded,
            None,
        );
        assert!(matches!(result, Err(Violation::Precondition(_))));
    }

    #[test]
    fn zero_id_is_a_violation() {
        let result = Notification::new(
            NotificationId::new(0),
            "hola",
            sender(),
            NotificationReason::WorkerResponded,
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn closes_once() {
        let Ok(mut n) = Notification::new(
            NotificationId::new(1),
            "Offer 3 was withdrawn",
            sender(),
            NotificationReason::AdminWithdrewOffer,
            Some(WorkOfferId::new(3)),
        ) else {
            panic!("valid notification");
        };
        assert!(n.is_open());
        assert!(n.close());
        assert!(!n.is_open());
        assert!(!n.close());
    }

    #[test]
    fn reason_serializes_snake_case() {
        let json = serde_json::to_string(&NotificationReason::AdminWithdrewOffer).unwrap_or_default();
        assert_eq!(json, "\"admin_withdrew_offer\"");
    }
}
