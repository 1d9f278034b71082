//! The marketplace store.
//!
//! [`Store`] is the single aggregate owning every entity. It is the only
//! component allowed to construct and register entities, and it enforces
//! the cross-entity rules:
//!
//! - an identity belongs to at most one of admins, workers, employers;
//! - every offer's owner is a registered worker and every category is
//!   part of the vocabulary;
//! - identical offers are suppressed;
//! - withdrawal reaches every observer of the offer exactly once.
//!
//! The store is synchronous and assumes a single writer. Concurrent
//! access goes through [`crate::service::MarketService`], which holds it
//! behind a lock.

mod catalog;
mod contact;
mod offers;
mod query;
mod registration;

use std::collections::BTreeMap;

pub use offers::OfferRequest;
pub use query::{OfferOrder, OfferQuery};
pub use registration::UserProfile;

use crate::domain::{
    Admin, Identity, ObserverDirectory, OfferObserver, User, WorkOffer, WorkOfferId,
};

/// In-memory domain store.
#[derive(Debug, Default, Clone)]
pub struct Store {
    categories: Vec<String>,
    work_offers: Vec<WorkOffer>,
    workers: BTreeMap<Identity, User>,
    employers: BTreeMap<Identity, User>,
    admins: BTreeMap<Identity, Admin>,
    last_work_offer_id: u64,
}

impl Store {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if a worker is registered under `id`.
    #[must_use]
    pub fn exists_worker(&self, id: Identity) -> bool {
        self.workers.contains_key(&id)
    }

    /// Returns `true` if an employer is registered under `id`.
    #[must_use]
    pub fn exists_employer(&self, id: Identity) -> bool {
        self.employers.contains_key(&id)
    }

    /// Returns `true` if an admin is registered under `id`.
    #[must_use]
    pub fn exists_admin(&self, id: Identity) -> bool {
        self.admins.contains_key(&id)
    }

    /// Returns `true` if an offer with `id` was ever created, published or
    /// not.
    #[must_use]
    pub fn exists_work_offer(&self, id: WorkOfferId) -> bool {
        self.work_offers.iter().any(|offer| offer.id() == id)
    }

    /// Returns `true` if `id` is taken by any role.
    #[must_use]
    pub fn is_registered(&self, id: Identity) -> bool {
        self.exists_admin(id) || self.exists_worker(id) || self.exists_employer(id)
    }

    /// Looks up a worker.
    #[must_use]
    pub fn search_worker(&self, id: Identity) -> Option<&User> {
        self.workers.get(&id)
    }

    /// Looks up an employer.
    #[must_use]
    pub fn search_employer(&self, id: Identity) -> Option<&User> {
        self.employers.get(&id)
    }

    /// Looks up a worker or an employer.
    #[must_use]
    pub fn search_user(&self, id: Identity) -> Option<&User> {
        self.workers.get(&id).or_else(|| self.employers.get(&id))
    }

    /// Looks up an offer, published or not.
    #[must_use]
    pub fn search_work_offer(&self, id: WorkOfferId) -> Option<&WorkOffer> {
        self.work_offers.iter().find(|offer| offer.id() == id)
    }

    /// Iterates over workers by identity.
    pub fn workers(&self) -> impl Iterator<Item = &User> {
        self.workers.values()
    }

    /// Iterates over employers by identity.
    pub fn employers(&self) -> impl Iterator<Item = &User> {
        self.employers.values()
    }

    /// Iterates over admins by identity.
    pub fn admins(&self) -> impl Iterator<Item = &Admin> {
        self.admins.values()
    }

    /// Every offer ever created, in creation order.
    #[must_use]
    pub fn work_offers(&self) -> &[WorkOffer] {
        &self.work_offers
    }

    /// Removes every worker. Test support only.
    pub fn clear_workers(&mut self) {
        self.workers.clear();
    }

    /// Removes every employer. Test support only.
    pub fn clear_employers(&mut self) {
        self.employers.clear();
    }

    /// Removes every admin. Test support only.
    pub fn clear_admins(&mut self) {
        self.admins.clear();
    }

    /// Removes every offer and restarts numbering at 1. Test support only.
    pub fn clear_work_offers(&mut self) {
        self.work_offers.clear();
        self.last_work_offer_id = 0;
    }

    /// Empties the category vocabulary. Test support only.
    pub fn clear_categories(&mut self) {
        self.categories.clear();
    }

    fn user_mut(&mut self, id: Identity) -> Option<&mut User> {
        if self.workers.contains_key(&id) {
            self.workers.get_mut(&id)
        } else {
            self.employers.get_mut(&id)
        }
    }
}

/// Resolves observer identities against the store's user tables.
struct UserDirectory<'a> {
    workers: &'a mut BTreeMap<Identity, User>,
    employers: &'a mut BTreeMap<Identity, User>,
}

impl ObserverDirectory for UserDirectory<'_> {
    fn resolve(&mut self, id: Identity) -> Option<&mut dyn OfferObserver> {
        let table = if self.workers.contains_key(&id) {
            &mut *self.workers
        } else {
            &mut *self.employers
        };
        table.get_mut(&id).map(|user| user as &mut dyn OfferObserver)
    }
}
