//! Market service: serializes store access and emits events.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::{
    AccountKind, Delivery, EventBus, Identity, MarketEvent, Notification, NotificationId,
    NotificationReason, Role, User, WorkOffer, WorkOfferId,
};
use crate::domain::text::normalize_category;
use crate::error::{MarketError, Violation};
use crate::store::{OfferQuery, OfferRequest, Store, UserProfile};

/// Orchestration layer in front of the [`Store`].
///
/// Owns the store behind a single [`RwLock`]. Every mutation holds the
/// write lock for its whole read-then-write sequence, so duplicate
/// detection and id assignment cannot interleave. Queries hold the read
/// lock and return owned snapshots. Events are published after the lock
/// is released.
#[derive(Debug, Clone)]
pub struct MarketService {
    store: Arc<RwLock<Store>>,
    event_bus: EventBus,
}

impl MarketService {
    /// Creates a new `MarketService` owning `store`.
    #[must_use]
    pub fn new(store: Store, event_bus: EventBus) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            event_bus,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Runs `f` against the store under the read lock.
    pub async fn read<R>(&self, f: impl FnOnce(&Store) -> R) -> R {
        let store = self.store.read().await;
        f(&store)
    }

    /// Registers a worker.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Rejected`] when the store declines.
    pub async fn register_worker(&self, profile: &UserProfile) -> Result<Identity, MarketError> {
        let id = self.store.write().await.add_worker(profile)?;
        self.emit_account(id, AccountKind::User(Role::Worker));
        Ok(id)
    }

    /// Registers an employer.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Rejected`] when the store declines.
    pub async fn register_employer(&self, profile: &UserProfile) -> Result<Identity, MarketError> {
        let id = self.store.write().await.add_employer(profile)?;
        self.emit_account(id, AccountKind::User(Role::Employer));
        Ok(id)
    }

    /// Registers an admin.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Rejected`] when the store declines.
    pub async fn register_admin(&self, identity: u64) -> Result<Identity, MarketError> {
        let id = self.store.write().await.add_admin(identity)?;
        self.emit_account(id, AccountKind::Admin);
        Ok(id)
    }

    /// Adds a category. Returns `true` if it was new.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Violation`] for a blank name.
    pub async fn add_category(&self, name: &str) -> Result<bool, MarketError> {
        let (added, normalized) = {
            let mut store = self.store.write().await;
            let added = store.add_category(name)?;
            (added, normalize_category(name))
        };
        if added {
            let _ = self.event_bus.publish(MarketEvent::CategoryAdded {
                name: normalized,
                timestamp: Utc::now(),
            });
        }
        Ok(added)
    }

    /// Publishes a work offer.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Rejected`] when the store declines.
    pub async fn publish_offer(&self, request: &OfferRequest) -> Result<WorkOfferId, MarketError> {
        let (id, owner, categories) = {
            let mut store = self.store.write().await;
            let id = store.add_work_offer(request)?;
            let offer = store
                .search_work_offer(id)
                .map(|offer| (offer.owner(), offer.categories().to_vec()));
            let Some((owner, categories)) = offer else {
                return Err(Violation::Postcondition(format!(
                    "work offer {id} missing after insert"
                ))
                .into());
            };
            (id, owner, categories)
        };
        let _ = self.event_bus.publish(MarketEvent::OfferPublished {
            work_offer_id: id,
            owner,
            categories,
            timestamp: Utc::now(),
        });
        Ok(id)
    }

    /// Counts offers identical to `request`.
    pub async fn match_offer(&self, request: &OfferRequest) -> usize {
        self.store.read().await.match_work_offer(request)
    }

    /// Withdraws an offer and notifies its observers.
    ///
    /// # Errors
    ///
    /// Returns the store's rejection or violation.
    pub async fn withdraw_offer(
        &self,
        id: WorkOfferId,
        acting: Identity,
    ) -> Result<Vec<Delivery>, MarketError> {
        let deliveries = self.store.write().await.delete_work_offer(id, acting)?;
        for delivery in &deliveries {
            self.emit_delivery(*delivery, NotificationReason::AdminWithdrewOffer);
        }
        let _ = self.event_bus.publish(MarketEvent::OfferWithdrawn {
            work_offer_id: id,
            withdrawn_by: acting,
            notified: deliveries.len(),
            timestamp: Utc::now(),
        });
        Ok(deliveries)
    }

    /// Subscribes a user to an offer's withdrawal broadcast.
    ///
    /// # Errors
    ///
    /// Returns the store's rejection.
    pub async fn subscribe(&self, user: Identity, id: WorkOfferId) -> Result<bool, MarketError> {
        Ok(self.store.write().await.subscribe_to_offer(user, id)?)
    }

    /// Unsubscribes a user from an offer.
    ///
    /// # Errors
    ///
    /// Returns the store's rejection.
    pub async fn unsubscribe(&self, user: Identity, id: WorkOfferId) -> Result<bool, MarketError> {
        Ok(self.store.write().await.unsubscribe_from_offer(user, id)?)
    }

    /// Sends a contact request to the offer's worker.
    ///
    /// # Errors
    ///
    /// Returns the store's rejection or violation.
    pub async fn contact_worker(
        &self,
        employer: Identity,
        id: WorkOfferId,
        message: &str,
    ) -> Result<Delivery, MarketError> {
        let delivery = self.store.write().await.contact_worker(employer, id, message)?;
        self.emit_delivery(delivery, NotificationReason::EmployerWantsContact);
        Ok(delivery)
    }

    /// Answers a contact request, linking both parties.
    ///
    /// # Errors
    ///
    /// Returns the store's rejection or violation.
    pub async fn respond_to_employer(
        &self,
        worker: Identity,
        request_id: NotificationId,
        message: &str,
    ) -> Result<Delivery, MarketError> {
        let delivery = self
            .store
            .write()
            .await
            .respond_to_employer(worker, request_id, message)?;
        self.emit_delivery(delivery, NotificationReason::WorkerResponded);
        Ok(delivery)
    }

    /// Scores a rating.
    ///
    /// # Errors
    ///
    /// Returns the store's rejection.
    pub async fn rate_user(
        &self,
        rater: Identity,
        rated: Identity,
        id: WorkOfferId,
        score: u8,
        force_open: bool,
    ) -> Result<(), MarketError> {
        self.store
            .write()
            .await
            .rate_user(rater, rated, id, score, force_open)?;
        let _ = self.event_bus.publish(MarketEvent::RatingSubmitted {
            rater,
            rated,
            work_offer_id: id,
            score,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Acknowledges a notification.
    ///
    /// # Errors
    ///
    /// Returns the store's rejection.
    pub async fn close_notification(
        &self,
        user: Identity,
        id: NotificationId,
    ) -> Result<(), MarketError> {
        Ok(self.store.write().await.close_notification(user, id)?)
    }

    /// Snapshot of the category vocabulary.
    pub async fn categories(&self) -> Vec<String> {
        self.store.read().await.all_categories().to_vec()
    }

    /// Snapshot of the offers matching `query`.
    pub async fn search_offers(&self, query: &OfferQuery) -> Vec<WorkOffer> {
        self.store.read().await.search_offers(query)
    }

    /// Snapshot of one offer.
    pub async fn work_offer(&self, id: WorkOfferId) -> Option<WorkOffer> {
        self.store.read().await.search_work_offer(id).cloned()
    }

    /// Snapshot of a worker or employer.
    pub async fn user(&self, id: Identity) -> Option<User> {
        self.store.read().await.search_user(id).cloned()
    }

    /// Snapshot of a user's inbox.
    pub async fn notifications(&self, id: Identity) -> Option<Vec<Notification>> {
        self.store
            .read()
            .await
            .search_user(id)
            .map(|user| user.notifications().to_vec())
    }

    /// Integer average score of a user.
    pub async fn average_rating(&self, id: Identity) -> Option<u32> {
        self.store.read().await.average_rating(id)
    }

    fn emit_account(&self, identity: Identity, kind: AccountKind) {
        let _ = self.event_bus.publish(MarketEvent::AccountRegistered {
            identity,
            kind,
            timestamp: Utc::now(),
        });
    }

    fn emit_delivery(&self, delivery: Delivery, reason: NotificationReason) {
        let _ = self.event_bus.publish(MarketEvent::NotificationDelivered {
            recipient: delivery.recipient,
            notification_id: delivery.notification_id,
            reason,
            timestamp: Utc::now(),
        });
    }
}
