//! Work offers and their observer list.
//!
//! Observers are kept as identities, not references. At notify time the
//! store hands in an [`ObserverDirectory`] that resolves each identity to
//! the live user, so offers and users never own each other.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::user::OfferObserver;
use super::{Currency, Identity, NotificationId, WorkOfferId};
use crate::contract::{require_invariant, require_postcondition, require_precondition};
use crate::domain::text::is_blank;
use crate::error::Violation;

/// Resolves observer identities to live observers.
pub trait ObserverDirectory {
    /// Returns the observer registered under `id`, if any.
    fn resolve(&mut self, id: Identity) -> Option<&mut dyn OfferObserver>;
}

/// The comparable content of an offer.
///
/// Two submissions with equal terms are the same offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferTerms {
    /// Free-text description of the service.
    pub description: String,
    /// Price currency.
    pub currency: Currency,
    /// Price, strictly positive.
    pub price: u64,
    /// Worker publishing the offer.
    pub owner: Identity,
    /// Normalized category labels, first-seen order, no repeats.
    pub categories: Vec<String>,
    /// How long the job takes, strictly positive.
    pub duration_days: u32,
}

impl OfferTerms {
    /// Returns `true` if both describe the same offer.
    ///
    /// Categories are compared as sets: order and repeats do not matter.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        self.currency == other.currency
            && self.price == other.price
            && self.description == other.description
            && self.owner == other.owner
            && self.duration_days == other.duration_days
            && self.category_set() == other.category_set()
    }

    fn category_set(&self) -> BTreeSet<&str> {
        self.categories.iter().map(String::as_str).collect()
    }
}

/// Who was notified, under which inbox id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    /// Recipient identity.
    pub recipient: Identity,
    /// Id of the notification in the recipient's inbox.
    pub notification_id: NotificationId,
}

/// A published service listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkOffer {
    id: WorkOfferId,
    terms: OfferTerms,
    created_at: DateTime<Utc>,
    is_published: bool,
    observers: Vec<Identity>,
}

impl WorkOffer {
    /// Builds a published offer with no observers.
    ///
    /// # Errors
    ///
    /// Returns [`Violation::Precondition`] if the id is zero, the
    /// description or a category is blank, the category list is empty, or
    /// price or duration is zero.
    pub fn new(id: WorkOfferId, terms: OfferTerms) -> Result<Self, Violation> {
        require_precondition(id.get() > 0, "work offer id must be positive")?;
        require_precondition(!is_blank(&terms.description), "description must not be blank")?;
        require_precondition(terms.price > 0, "price must be positive")?;
        require_precondition(terms.duration_days > 0, "duration must be positive")?;
        require_precondition(!terms.categories.is_empty(), "at least one category is required")?;
        require_precondition(
            terms.categories.iter().all(|c| !is_blank(c)),
            "categories must not be blank",
        )?;

        let offer = Self {
            id,
            terms,
            created_at: Utc::now(),
            is_published: true,
            observers: Vec::new(),
        };
        require_postcondition(offer.is_published, "new work offer must be published")?;
        Ok(offer)
    }

    /// Returns the store-assigned id.
    #[must_use]
    pub const fn id(&self) -> WorkOfferId {
        self.id
    }

    /// Returns the comparable terms.
    #[must_use]
    pub const fn terms(&self) -> &OfferTerms {
        &self.terms
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.terms.description
    }

    /// Returns the currency.
    #[must_use]
    pub const fn currency(&self) -> Currency {
        self.terms.currency
    }

    /// Returns the price.
    #[must_use]
    pub const fn price(&self) -> u64 {
        self.terms.price
    }

    /// Returns the owning worker.
    #[must_use]
    pub const fn owner(&self) -> Identity {
        self.terms.owner
    }

    /// Returns the normalized categories.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.terms.categories
    }

    /// Returns `true` if the offer is tagged with `normalized`.
    #[must_use]
    pub fn has_category(&self, normalized: &str) -> bool {
        self.terms.categories.iter().any(|c| c == normalized)
    }

    /// Returns the duration in days.
    #[must_use]
    pub const fn duration_days(&self) -> u32 {
        self.terms.duration_days
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the creation day (UTC).
    #[must_use]
    pub fn created_on(&self) -> NaiveDate {
        self.created_at.date_naive()
    }

    /// Returns `false` once withdrawn.
    #[must_use]
    pub const fn is_published(&self) -> bool {
        self.is_published
    }

    /// Returns the current observers, in subscription order.
    #[must_use]
    pub fn observers(&self) -> &[Identity] {
        &self.observers
    }

    /// Subscribes `observer`. Returns `false` if it was already subscribed.
    pub fn add_observer(&mut self, observer: Identity) -> bool {
        if self.observers.contains(&observer) {
            return false;
        }
        self.observers.push(observer);
        true
    }

    /// Unsubscribes `observer`. Returns `false` if it was not subscribed.
    /// Nobody is notified.
    pub fn remove_observer(&mut self, observer: Identity) -> bool {
        let before = self.observers.len();
        self.observers.retain(|o| *o != observer);
        self.observers.len() != before
    }

    /// Message broadcast to observers on withdrawal.
    #[must_use]
    pub fn withdrawal_message(&self) -> String {
        format!(
            "The work offer #{} \"{}\" has been withdrawn and is no longer published.",
            self.id, self.terms.description
        )
    }

    /// Unpublishes the offer. Returns `false` if it was already withdrawn.
    pub fn withdraw(&mut self) -> bool {
        std::mem::replace(&mut self.is_published, false)
    }

    /// Sends the withdrawal message to every current observer.
    ///
    /// Observers the directory cannot resolve are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Violation::Invariant`] if called on a published offer, or
    /// any violation raised by an observer.
    pub fn notify(
        &self,
        sender: Identity,
        directory: &mut dyn ObserverDirectory,
    ) -> Result<Vec<Delivery>, Violation> {
        require_invariant(!self.is_published, "only withdrawn offers broadcast")?;
        let message = self.withdrawal_message();
        let mut deliveries = Vec::with_capacity(self.observers.len());
        for &recipient in &self.observers {
            let Some(observer) = directory.resolve(recipient) else {
                tracing::warn!(offer_id = %self.id, %recipient, "observer not registered, skipping");
                continue;
            };
            let notification_id = observer.update(self.id, &message, sender)?;
            deliveries.push(Delivery {
                recipient,
                notification_id,
            });
        }
        Ok(deliveries)
    }
}
