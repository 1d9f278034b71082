//! Work offer creation, deduplication, withdrawal and subscriptions.

use serde::{Deserialize, Serialize};

use super::{Store, UserDirectory};
use crate::domain::text::{is_blank, normalize_category};
use crate::domain::{Currency, Delivery, Identity, OfferTerms, WorkOffer, WorkOfferId};
use crate::error::{MarketError, Rejection};

/// Offer data collected by the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferRequest {
    /// Free-text description.
    pub description: String,
    /// Currency token: `USD`, `UYU`, `$U` or `U$S`.
    pub currency: String,
    /// Price, must be positive.
    pub price: u64,
    /// Platform handle of the publishing worker.
    pub owner: u64,
    /// Category labels as typed by the user.
    pub categories: Vec<String>,
    /// Duration of the job in days, must be positive.
    pub duration_days: u32,
}

impl Store {
    /// Publishes a work offer and subscribes its owner to it.
    ///
    /// Returns the new offer id.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] if the request is invalid, names a category
    /// outside the vocabulary, or an identical offer already exists. No
    /// offer is stored and no id is consumed in that case.
    pub fn add_work_offer(&mut self, request: &OfferRequest) -> Result<WorkOfferId, Rejection> {
        let terms = self.admit_offer(request).inspect_err(|reason| {
            tracing::debug!(owner = request.owner, %reason, "work offer rejected");
        })?;

        let id = WorkOfferId::new(self.last_work_offer_id.saturating_add(1));
        let mut offer =
            WorkOffer::new(id, terms).map_err(|violation| Rejection::Invalid(violation.to_string()))?;
        offer.add_observer(offer.owner());
        tracing::info!(work_offer_id = %id, owner = %offer.owner(), "work offer published");
        self.work_offers.push(offer);
        self.last_work_offer_id = id.get();
        Ok(id)
    }

    /// Counts stored offers identical to `request`.
    ///
    /// An invalid request matches nothing.
    #[must_use]
    pub fn match_work_offer(&self, request: &OfferRequest) -> usize {
        self.terms_from(request)
            .map_or(0, |terms| self.count_matching(&terms))
    }

    /// Withdraws an offer and notifies each of its observers once.
    ///
    /// `acting` must be a registered admin or the offer's owner; it is
    /// recorded as the sender of every notification. The offer stays in
    /// the store, unpublished.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::UnknownWorkOffer`], [`Rejection::NotAuthorized`]
    /// or [`Rejection::OfferWithdrawn`] without changing anything, or a
    /// violation raised while delivering notifications.
    pub fn delete_work_offer(
        &mut self,
        id: WorkOfferId,
        acting: Identity,
    ) -> Result<Vec<Delivery>, MarketError> {
        let is_admin = self.admins.contains_key(&acting);
        let Some(offer) = self.work_offers.iter_mut().find(|offer| offer.id() == id) else {
            tracing::debug!(work_offer_id = %id, "withdrawal of unknown offer ignored");
            return Err(Rejection::UnknownWorkOffer(id).into());
        };
        if !is_admin && offer.owner() != acting {
            return Err(Rejection::NotAuthorized(acting).into());
        }
        if !offer.withdraw() {
            return Err(Rejection::OfferWithdrawn(id).into());
        }

        let mut directory = UserDirectory {
            workers: &mut self.workers,
            employers: &mut self.employers,
        };
        let deliveries = offer.notify(acting, &mut directory)?;
        tracing::info!(
            work_offer_id = %id,
            withdrawn_by = %acting,
            notified = deliveries.len(),
            "work offer withdrawn"
        );
        Ok(deliveries)
    }

    /// Subscribes a worker or employer to an offer's withdrawal broadcast.
    ///
    /// Returns `false` if it was already subscribed.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::UnknownUser`], [`Rejection::UnknownWorkOffer`] or
    /// [`Rejection::OfferWithdrawn`].
    pub fn subscribe_to_offer(
        &mut self,
        user: Identity,
        id: WorkOfferId,
    ) -> Result<bool, Rejection> {
        if self.search_user(user).is_none() {
            return Err(Rejection::UnknownUser(user));
        }
        let offer = self
            .work_offers
            .iter_mut()
            .find(|offer| offer.id() == id)
            .ok_or(Rejection::UnknownWorkOffer(id))?;
        if !offer.is_published() {
            return Err(Rejection::OfferWithdrawn(id));
        }
        Ok(offer.add_observer(user))
    }

    /// Unsubscribes a user from an offer. Nobody is notified.
    ///
    /// Returns `false` if the user was not subscribed.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::UnknownWorkOffer`] if the offer does not exist.
    pub fn unsubscribe_from_offer(
        &mut self,
        user: Identity,
        id: WorkOfferId,
    ) -> Result<bool, Rejection> {
        let offer = self
            .work_offers
            .iter_mut()
            .find(|offer| offer.id() == id)
            .ok_or(Rejection::UnknownWorkOffer(id))?;
        Ok(offer.remove_observer(user))
    }

    fn admit_offer(&self, request: &OfferRequest) -> Result<OfferTerms, Rejection> {
        let terms = self.terms_from(request)?;
        if self.count_matching(&terms) > 0 {
            return Err(Rejection::DuplicateOffer);
        }
        Ok(terms)
    }

    /// Validates a request into normalized terms, checking in order:
    /// blank text, owner, currency, price, duration, categories.
    fn terms_from(&self, request: &OfferRequest) -> Result<OfferTerms, Rejection> {
        if is_blank(&request.description) {
            return Err(Rejection::BlankField("description"));
        }
        if is_blank(&request.currency) {
            return Err(Rejection::BlankField("currency"));
        }
        let owner = Identity::new(request.owner).map_err(|_| Rejection::InvalidIdentity)?;
        if !self.exists_worker(owner) {
            return Err(Rejection::UnknownWorker(owner));
        }
        let currency: Currency = request.currency.parse()?;
        if request.price == 0 {
            return Err(Rejection::NonPositivePrice);
        }
        if request.duration_days == 0 {
            return Err(Rejection::NonPositiveDuration);
        }
        if request.categories.is_empty() {
            return Err(Rejection::NoCategories);
        }

        let mut categories: Vec<String> = Vec::with_capacity(request.categories.len());
        for raw in &request.categories {
            let normalized = normalize_category(raw);
            if normalized.is_empty() || !self.categories.contains(&normalized) {
                return Err(Rejection::UnknownCategory(raw.trim().to_string()));
            }
            if !categories.contains(&normalized) {
                categories.push(normalized);
            }
        }

        Ok(OfferTerms {
            description: request.description.trim().to_string(),
            currency,
            price: request.price,
            owner,
            categories,
            duration_days: request.duration_days,
        })
    }

    fn count_matching(&self, terms: &OfferTerms) -> usize {
        self.work_offers
            .iter()
            .filter(|offer| offer.terms().same_as(terms))
            .count()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::super::test_support::{id, populated, profile, request};
    use super::*;
    use crate::domain::NotificationReason;

    #[test]
    fn offer_is_published_and_owner_subscribed() {
        let mut store = populated();
        let Ok(offer_id) = store.add_work_offer(&request(10, &["traslados"])) else {
            panic!("offer rejected");
        };
        assert_eq!(offer_id, WorkOfferId::new(1));
        let Some(offer) = store.search_work_offer(offer_id) else {
            panic!("offer missing");
        };
        assert!(offer.is_published());
        assert_eq!(offer.categories(), &["TRASLADOS".to_string()]);
        assert_eq!(offer.observers(), &[id(10)]);
        assert_eq!(offer.currency(), Currency::Uyu);
    }

    #[test]
    fn identical_submission_is_suppressed() {
        let mut store = populated();
        let req = request(10, &["Traslados"]);
        assert!(store.add_work_offer(&req).is_ok());
        assert_eq!(store.add_work_offer(&req), Err(Rejection::DuplicateOffer));
        assert_eq!(store.work_offers().len(), 1);
        assert_eq!(store.match_work_offer(&req), 1);
        assert!(!store.exists_work_offer(WorkOfferId::new(2)));
    }

    #[test]
    fn duplicate_check_ignores_category_order_and_accents() {
        let mut store = populated();
        assert!(store.add_work_offer(&request(10, &["Traslados", "Limpieza"])).is_ok());
        assert_eq!(
            store.add_work_offer(&request(10, &["LIMPIEZA", "traslados"])),
            Err(Rejection::DuplicateOffer)
        );
        assert!(store.add_work_offer(&request(10, &["Limpieza"])).is_ok());
        assert_eq!(store.work_offers().len(), 2);
    }

    #[test]
    fn any_difference_makes_a_new_offer() {
        let mut store = populated();
        assert!(store.add_work_offer(&request(10, &["Traslados"])).is_ok());

        let mut cheaper = request(10, &["Traslados"]);
        cheaper.price = 2000;
        assert!(store.add_work_offer(&cheaper).is_ok());

        let mut dollars = request(10, &["Traslados"]);
        dollars.currency = "USD".to_string();
        assert!(store.add_work_offer(&dollars).is_ok());

        let mut longer = request(10, &["Traslados"]);
        longer.duration_days = 3;
        assert_eq!(store.add_work_offer(&longer), Ok(WorkOfferId::new(4)));
    }

    #[test]
    fn unknown_category_rejects_whole_offer() {
        let mut store = populated();
        let req = request(10, &["Traslados", "Astronomía"]);
        assert_eq!(
            store.add_work_offer(&req),
            Err(Rejection::UnknownCategory("Astronomía".to_string()))
        );
        assert!(!store.exists_work_offer(WorkOfferId::new(1)));
        assert_eq!(store.match_work_offer(&req), 0);
    }

    #[test]
    fn validation_order_and_reasons() {
        let mut store = populated();

        let mut req = request(10, &["Traslados"]);
        req.description = " ".to_string();
        assert_eq!(store.add_work_offer(&req), Err(Rejection::BlankField("description")));

        let mut req = request(10, &["Traslados"]);
        req.currency = String::new();
        assert_eq!(store.add_work_offer(&req), Err(Rejection::BlankField("currency")));

        assert_eq!(
            store.add_work_offer(&request(20, &["Traslados"])),
            Err(Rejection::UnknownWorker(id(20)))
        );

        let mut req = request(10, &["Traslados"]);
        req.currency = "EUR".to_string();
        assert_eq!(
            store.add_work_offer(&req),
            Err(Rejection::UnknownCurrency("EUR".to_string()))
        );

        let mut req = request(10, &["Traslados"]);
        req.price = 0;
        assert_eq!(store.add_work_offer(&req), Err(Rejection::NonPositivePrice));

        let mut req = request(10, &["Traslados"]);
        req.duration_days = 0;
        assert_eq!(store.add_work_offer(&req), Err(Rejection::NonPositiveDuration));

        assert_eq!(
            store.add_work_offer(&request(10, &[])),
            Err(Rejection::NoCategories)
        );
        assert!(store.work_offers().is_empty());
    }

    #[test]
    fn withdrawal_unpublishes_and_notifies_observers_once() {
        let mut store = populated();
        assert!(store.add_employer(&profile(21)).is_ok());
        let Ok(offer_id) = store.add_work_offer(&request(10, &["Traslados"])) else {
            panic!("offer rejected");
        };
        assert_eq!(store.subscribe_to_offer(id(21), offer_id), Ok(true));

        let Ok(deliveries) = store.delete_work_offer(offer_id, id(1)) else {
            panic!("withdrawal failed");
        };
        assert_eq!(deliveries.len(), 2);

        let Some(offer) = store.search_work_offer(offer_id) else {
            panic!("withdrawn offer must stay discoverable");
        };
        assert!(!offer.is_published());
        assert!(store.exists_work_offer(offer_id));

        for observer in [id(10), id(21)] {
            let Some(user) = store.search_user(observer) else {
                panic!("observer missing");
            };
            let notes = user.notifications();
            assert_eq!(notes.len(), 1);
            let Some(note) = notes.first() else {
                panic!("notification missing");
            };
            assert_eq!(note.reason(), NotificationReason::AdminWithdrewOffer);
            assert_eq!(note.sender(), id(1));
            assert_eq!(note.work_offer_id(), Some(offer_id));
        }
        let Some(employer) = store.search_employer(id(20)) else {
            panic!("employer missing");
        };
        assert!(employer.notifications().is_empty());
    }

    #[test]
    fn withdrawal_happens_once() {
        let mut store = populated();
        let Ok(offer_id) = store.add_work_offer(&request(10, &["Traslados"])) else {
            panic!("offer rejected");
        };
        assert!(store.delete_work_offer(offer_id, id(10)).is_ok());
        assert!(matches!(
            store.delete_work_offer(offer_id, id(1)),
            Err(MarketError::Rejected(Rejection::OfferWithdrawn(_)))
        ));
        let Some(worker) = store.search_worker(id(10)) else {
            panic!("worker missing");
        };
        assert_eq!(worker.notifications().len(), 1);
    }

    #[test]
    fn withdrawal_of_unknown_offer_is_a_no_op() {
        let mut store = populated();
        assert!(matches!(
            store.delete_work_offer(WorkOfferId::new(42), id(1)),
            Err(MarketError::Rejected(Rejection::UnknownWorkOffer(_)))
        ));
        assert!(store.work_offers().is_empty());
    }

    #[test]
    fn only_admin_or_owner_may_withdraw() {
        let mut store = populated();
        let Ok(offer_id) = store.add_work_offer(&request(10, &["Traslados"])) else {
            panic!("offer rejected");
        };
        assert!(matches!(
            store.delete_work_offer(offer_id, id(20)),
            Err(MarketError::Rejected(Rejection::NotAuthorized(_)))
        ));
        assert!(store.search_work_offer(offer_id).is_some_and(WorkOffer::is_published));
    }

    #[test]
    fn unsubscribed_observer_is_not_notified() {
        let mut store = populated();
        let Ok(offer_id) = store.add_work_offer(&request(10, &["Traslados"])) else {
            panic!("offer rejected");
        };
        assert_eq!(store.subscribe_to_offer(id(20), offer_id), Ok(true));
        assert_eq!(store.subscribe_to_offer(id(20), offer_id), Ok(false));
        assert_eq!(store.unsubscribe_from_offer(id(20), offer_id), Ok(true));

        let Some(worker) = store.search_worker(id(10)) else {
            panic!("worker missing");
        };
        assert!(worker.notifications().is_empty());

        let Ok(deliveries) = store.delete_work_offer(offer_id, id(1)) else {
            panic!("withdrawal failed");
        };
        assert_eq!(deliveries.len(), 1);
        let Some(employer) = store.search_employer(id(20)) else {
            panic!("employer missing");
        };
        assert!(employer.notifications().is_empty());
    }

    #[test]
    fn cannot_subscribe_to_withdrawn_or_unknown_offer() {
        let mut store = populated();
        assert_eq!(
            store.subscribe_to_offer(id(20), WorkOfferId::new(1)),
            Err(Rejection::UnknownWorkOffer(WorkOfferId::new(1)))
        );
        let Ok(offer_id) = store.add_work_offer(&request(10, &["Traslados"])) else {
            panic!("offer rejected");
        };
        assert_eq!(
            store.subscribe_to_offer(id(99), offer_id),
            Err(Rejection::UnknownUser(id(99)))
        );
        assert!(store.delete_work_offer(offer_id, id(1)).is_ok());
        assert_eq!(
            store.subscribe_to_offer(id(20), offer_id),
            Err(Rejection::OfferWithdrawn(offer_id))
        );
    }
}
