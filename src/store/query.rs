//! Offer filtering and ordering for listing screens.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::Store;
use crate::domain::text::normalize_category;
use crate::domain::{Currency, Identity, Location, WorkOffer};

/// Sort order for offer listings. Ties keep creation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferOrder {
    /// Creation order.
    #[default]
    Oldest,
    /// Cheapest first.
    PriceAscending,
    /// Most expensive first.
    PriceDescending,
    /// Best-rated owner first.
    OwnerRatingDescending,
    /// Owner closest to the given location first.
    DistanceFrom(Location),
}

/// Filter for [`Store::search_offers`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OfferQuery {
    /// Only offers tagged with this category (normalized before matching).
    pub category: Option<String>,
    /// Only offers priced in this currency.
    pub currency: Option<Currency>,
    /// Only offers at or below this price.
    pub max_price: Option<u64>,
    /// Only offers by this worker.
    pub owner: Option<Identity>,
    /// Include withdrawn offers.
    pub include_withdrawn: bool,
    /// Result ordering.
    pub order: OfferOrder,
}

impl OfferQuery {
    /// Published offers in `category`, in creation order.
    #[must_use]
    pub fn in_category(category: &str) -> Self {
        Self {
            category: Some(category.to_string()),
            ..Self::default()
        }
    }

    fn accepts(&self, offer: &WorkOffer, category: Option<&str>) -> bool {
        (self.include_withdrawn || offer.is_published())
            && category.is_none_or(|c| offer.has_category(c))
            && self.currency.is_none_or(|c| offer.currency() == c)
            && self.max_price.is_none_or(|max| offer.price() <= max)
            && self.owner.is_none_or(|owner| offer.owner() == owner)
    }
}

impl Store {
    /// Snapshot of the offers matching `query`, ordered as requested.
    #[must_use]
    pub fn search_offers(&self, query: &OfferQuery) -> Vec<WorkOffer> {
        let category = query.category.as_deref().map(normalize_category);
        let mut offers: Vec<WorkOffer> = self
            .work_offers
            .iter()
            .filter(|offer| query.accepts(offer, category.as_deref()))
            .cloned()
            .collect();

        match &query.order {
            OfferOrder::Oldest => {}
            OfferOrder::PriceAscending => offers.sort_by_key(WorkOffer::price),
            OfferOrder::PriceDescending => {
                offers.sort_by(|a, b| b.price().cmp(&a.price()));
            }
            OfferOrder::OwnerRatingDescending => {
                offers.sort_by_cached_key(|offer| {
                    std::cmp::Reverse(self.average_rating(offer.owner()).unwrap_or(0))
                });
            }
            OfferOrder::DistanceFrom(origin) => {
                offers.sort_by(|a, b| self.compare_distance(origin, a, b));
            }
        }
        offers
    }

    /// Published offers, in creation order.
    #[must_use]
    pub fn published_offers(&self) -> Vec<WorkOffer> {
        self.search_offers(&OfferQuery::default())
    }

    /// Published offers tagged with `category`.
    #[must_use]
    pub fn offers_in_category(&self, category: &str) -> Vec<WorkOffer> {
        self.search_offers(&OfferQuery::in_category(category))
    }

    /// Every offer by `owner`, withdrawn ones included.
    #[must_use]
    pub fn offers_by_owner(&self, owner: Identity) -> Vec<WorkOffer> {
        self.search_offers(&OfferQuery {
            owner: Some(owner),
            include_withdrawn: true,
            ..OfferQuery::default()
        })
    }

    fn owner_distance(&self, origin: &Location, offer: &WorkOffer) -> f64 {
        self.search_worker(offer.owner())
            .map_or(f64::INFINITY, |worker| origin.distance_km(worker.location()))
    }

    fn compare_distance(&self, origin: &Location, a: &WorkOffer, b: &WorkOffer) -> Ordering {
        self.owner_distance(origin, a)
            .total_cmp(&self.owner_distance(origin, b))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::super::UserProfile;
    use super::super::test_support::{id, populated, request};
    use super::*;
    use crate::domain::WorkOfferId;

    fn ids(offers: &[WorkOffer]) -> Vec<u64> {
        offers.iter().map(|o| o.id().get()).collect()
    }

    fn far_worker(raw: u64) -> UserProfile {
        UserProfile {
            identity: raw,
            name: "Martín".to_string(),
            last_name: "Suárez".to_string(),
            phone: "098765432".to_string(),
            address: "Av. Giannattasio km 20, Canelones".to_string(),
            latitude: -34.8836,
            longitude: -56.0800,
        }
    }

    /// Offers: 1 (w10, TRASLADOS, 2500 UYU), 2 (w10, LIMPIEZA, 900 UYU),
    /// 3 (w11, TRASLADOS, 100 USD), 4 withdrawn (w11, LIMPIEZA, 500 UYU).
    fn catalog() -> Store {
        let mut store = populated();
        assert!(store.add_worker(&far_worker(11)).is_ok());
        assert!(store.add_work_offer(&request(10, &["Traslados"])).is_ok());

        let mut cleaning = request(10, &["Limpieza"]);
        cleaning.price = 900;
        assert!(store.add_work_offer(&cleaning).is_ok());

        let mut dollars = request(11, &["Traslados"]);
        dollars.currency = "USD".to_string();
        dollars.price = 100;
        assert!(store.add_work_offer(&dollars).is_ok());

        let mut gone = request(11, &["Limpieza"]);
        gone.price = 500;
        assert!(store.add_work_offer(&gone).is_ok());
        assert!(store.delete_work_offer(WorkOfferId::new(4), id(1)).is_ok());
        store
    }

    #[test]
    fn published_offers_skip_withdrawn() {
        let store = catalog();
        assert_eq!(ids(&store.published_offers()), vec![1, 2, 3]);
        assert_eq!(store.work_offers().len(), 4);
    }

    #[test]
    fn category_filter_is_normalized() {
        let store = catalog();
        assert_eq!(ids(&store.offers_in_category("traslados")), vec![1, 3]);
        assert_eq!(ids(&store.offers_in_category("LIMPIEZA")), vec![2]);
        assert!(store.offers_in_category("Jardinería").is_empty());
    }

    #[test]
    fn owner_listing_includes_withdrawn() {
        let store = catalog();
        assert_eq!(ids(&store.offers_by_owner(id(11))), vec![3, 4]);
    }

    #[test]
    fn currency_and_price_filters() {
        let store = catalog();
        let query = OfferQuery {
            currency: Some(Currency::Uyu),
            max_price: Some(1000),
            ..OfferQuery::default()
        };
        assert_eq!(ids(&store.search_offers(&query)), vec![2]);
    }

    #[test]
    fn price_orders() {
        let store = catalog();
        let asc = OfferQuery {
            order: OfferOrder::PriceAscending,
            ..OfferQuery::default()
        };
        assert_eq!(ids(&store.search_offers(&asc)), vec![3, 2, 1]);
        let desc = OfferQuery {
            order: OfferOrder::PriceDescending,
            ..OfferQuery::default()
        };
        assert_eq!(ids(&store.search_offers(&desc)), vec![1, 2, 3]);
    }

    #[test]
    fn distance_order_puts_nearest_owner_first() {
        let store = catalog();
        let Ok(origin) = Location::new("Punta Gorda", -34.8900, -56.0850) else {
            panic!("valid location");
        };
        let query = OfferQuery {
            order: OfferOrder::DistanceFrom(origin),
            ..OfferQuery::default()
        };
        assert_eq!(ids(&store.search_offers(&query)), vec![3, 1, 2]);
    }

    #[test]
    fn rating_order_puts_best_owner_first() {
        let mut store = catalog();
        let Ok(contact) = store.contact_worker(id(20), WorkOfferId::new(3), "hola") else {
            panic!("contact failed");
        };
        assert!(store.respond_to_employer(id(11), contact.notification_id, "dale").is_ok());
        assert!(store.rate_user(id(20), id(11), WorkOfferId::new(3), 8, true).is_ok());

        let query = OfferQuery {
            order: OfferOrder::OwnerRatingDescending,
            ..OfferQuery::default()
        };
        assert_eq!(ids(&store.search_offers(&query)), vec![3, 1, 2]);
    }
}
