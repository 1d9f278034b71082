//! Person-like entities: workers, employers and admins.
//!
//! Workers and employers share the same [`User`] record and differ only
//! by [`Role`]. Admins carry nothing but their identity.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::notification::{Notification, NotificationReason};
use super::rating::{Rating, average_score};
use super::text::{is_blank, is_valid_phone};
use super::{Identity, Location, NotificationId, WorkOfferId};
use crate::contract::{require_invariant, require_postcondition, require_precondition};
use crate::error::{Rejection, Violation};

/// Capability a registered user holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Publishes work offers.
    Worker,
    /// Contacts workers about their offers.
    Employer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Worker => f.write_str("worker"),
            Self::Employer => f.write_str("employer"),
        }
    }
}

/// Receives withdrawal broadcasts from the offers it observes.
pub trait OfferObserver {
    /// Handles a broadcast about `work_offer_id` sent by `sender`.
    ///
    /// # Errors
    ///
    /// Returns a [`Violation`] if the broadcast cannot be recorded.
    fn update(
        &mut self,
        work_offer_id: WorkOfferId,
        message: &str,
        sender: Identity,
    ) -> Result<NotificationId, Violation>;
}

/// Registered worker or employer.
///
/// Owns its ratings and notifications; neither is ever shared.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    identity: Identity,
    role: Role,
    name: String,
    last_name: String,
    phone: String,
    location: Location,
    ratings: Vec<Rating>,
    notifications: Vec<Notification>,
    next_notification_id: u64,
}

impl User {
    /// Builds a user with empty inbox and no ratings.
    ///
    /// # Errors
    ///
    /// Returns [`Violation::Precondition`] if a name is blank or the
    /// phone number is malformed.
    pub fn new(
        identity: Identity,
        role: Role,
        name: &str,
        last_name: &str,
        phone: &str,
        location: Location,
    ) -> Result<Self, Violation> {
        require_precondition(!is_blank(name), "name must not be blank")?;
        require_precondition(!is_blank(last_name), "last name must not be blank")?;
        require_precondition(is_valid_phone(phone), "phone must match ^09[1-9]\\d{6}$")?;

        let user = Self {
            identity,
            role,
            name: name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            phone: phone.to_string(),
            location,
            ratings: Vec::new(),
            notifications: Vec::new(),
            next_notification_id: 0,
        };
        require_postcondition(
            user.ratings.is_empty() && user.notifications.is_empty(),
            "new user must start without ratings or notifications",
        )?;
        Ok(user)
    }

    /// Returns the platform identity.
    #[must_use]
    pub const fn identity(&self) -> Identity {
        self.identity
    }

    /// Returns the role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the first name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the last name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Returns `"name last_name"`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.last_name)
    }

    /// Returns the phone number.
    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Returns the resolved location.
    #[must_use]
    pub const fn location(&self) -> &Location {
        &self.location
    }

    /// Returns the ratings received, oldest first.
    #[must_use]
    pub fn ratings(&self) -> &[Rating] {
        &self.ratings
    }

    /// Returns the inbox, oldest first.
    #[must_use]
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Iterates over the notifications not yet acknowledged.
    pub fn open_notifications(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter().filter(|n| n.is_open())
    }

    /// Looks up a notification by id.
    #[must_use]
    pub fn notification(&self, id: NotificationId) -> Option<&Notification> {
        self.notifications.iter().find(|n| n.id() == id)
    }

    /// Integer average of the scored ratings, `0` when none are scored.
    #[must_use]
    pub fn average_rating(&self) -> u32 {
        average_score(&self.ratings)
    }

    /// Appends a notification, numbering it from this user's counter.
    ///
    /// # Errors
    ///
    /// Returns a [`Violation`] if the message is blank.
    pub fn push_notification(
        &mut self,
        message: &str,
        sender: Identity,
        reason: NotificationReason,
        work_offer_id: Option<WorkOfferId>,
    ) -> Result<NotificationId, Violation> {
        let id = NotificationId::new(self.next_notification_id.saturating_add(1));
        let notification = Notification::new(id, message, sender, reason, work_offer_id)?;
        self.notifications.push(notification);
        self.next_notification_id = id.get();
        require_postcondition(
            self.notifications.last().is_some_and(|n| n.id() == id),
            "notification was not appended",
        )?;
        Ok(id)
    }

    /// Acknowledges a notification.
    ///
    /// # Errors
    ///
    /// - [`Rejection::UnknownNotification`] if the id is not in the inbox.
    /// - [`Rejection::NotificationClosed`] if it was already closed.
    pub fn close_notification(&mut self, id: NotificationId) -> Result<(), Rejection> {
        let notification = self
            .notifications
            .iter_mut()
            .find(|n| n.id() == id)
            .ok_or(Rejection::UnknownNotification(id))?;
        if notification.close() {
            Ok(())
        } else {
            Err(Rejection::NotificationClosed(id))
        }
    }

    /// Returns `true` if `rater` already has a rating on `work_offer_id`.
    #[must_use]
    pub fn has_rating_from(&self, rater: Identity, work_offer_id: WorkOfferId) -> bool {
        self.ratings
            .iter()
            .any(|r| r.rater() == rater && r.work_offer_id() == work_offer_id)
    }

    /// Attaches a rating received from another party.
    ///
    /// # Errors
    ///
    /// Returns [`Violation::Invariant`] if the rater already rates this
    /// user on the same offer, or if the rating is self-given.
    pub fn add_rating(&mut self, rating: Rating) -> Result<(), Violation> {
        require_invariant(
            rating.rater() != self.identity,
            "a user cannot rate themselves",
        )?;
        require_invariant(
            !self.has_rating_from(rating.rater(), rating.work_offer_id()),
            "one rating per rater and work offer",
        )?;
        self.ratings.push(rating);
        Ok(())
    }

    /// Returns the rating `rater` gives on `work_offer_id`, for scoring.
    pub fn rating_mut(&mut self, rater: Identity, work_offer_id: WorkOfferId) -> Option<&mut Rating> {
        self.ratings
            .iter_mut()
            .find(|r| r.rater() == rater && r.work_offer_id() == work_offer_id)
    }
}

impl OfferObserver for User {
    fn update(
        &mut self,
        work_offer_id: WorkOfferId,
        message: &str,
        sender: Identity,
    ) -> Result<NotificationId, Violation> {
        self.push_notification(
            message,
            sender,
            NotificationReason::AdminWithdrewOffer,
            Some(work_offer_id),
        )
    }
}

/// Platform administrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Admin {
    identity: Identity,
}

impl Admin {
    /// Wraps an identity as an admin.
    #[must_use]
    pub const fn new(identity: Identity) -> Self {
        Self { identity }
    }

    /// Returns the platform identity.
    #[must_use]
    pub const fn identity(&self) -> Identity {
        self.identity
    }
}
