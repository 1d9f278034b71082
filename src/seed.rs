//! Bootstrap data set loaded at process start.

use serde::Serialize;

use crate::error::MarketError;
use crate::store::{OfferRequest, Store, UserProfile};

/// Categories every fresh store starts with.
pub const DEFAULT_CATEGORIES: [&str; 7] = [
    "Traslados",
    "Limpieza",
    "Jardinería",
    "Plomería",
    "Electricidad",
    "Confitería",
    "Carpintería",
];

/// Counts of what the store holds after seeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    /// Registered admins.
    pub admins: usize,
    /// Registered workers.
    pub workers: usize,
    /// Registered employers.
    pub employers: usize,
    /// Categories in the vocabulary.
    pub categories: usize,
    /// Offers created.
    pub work_offers: usize,
}

impl SeedSummary {
    /// Counts the current contents of `store`.
    #[must_use]
    pub fn of(store: &Store) -> Self {
        Self {
            admins: store.admins().count(),
            workers: store.workers().count(),
            employers: store.employers().count(),
            categories: store.all_categories().len(),
            work_offers: store.work_offers().len(),
        }
    }
}

fn profile(
    identity: u64,
    name: &str,
    last_name: &str,
    phone: &str,
    address: &str,
    (latitude, longitude): (f64, f64),
) -> UserProfile {
    UserProfile {
        identity,
        name: name.to_string(),
        last_name: last_name.to_string(),
        phone: phone.to_string(),
        address: address.to_string(),
        latitude,
        longitude,
    }
}

fn offer(
    owner: u64,
    description: &str,
    (currency, price): (&str, u64),
    categories: &[&str],
    duration_days: u32,
) -> OfferRequest {
    OfferRequest {
        description: description.to_string(),
        currency: currency.to_string(),
        price,
        owner,
        categories: categories.iter().map(|c| (*c).to_string()).collect(),
        duration_days,
    }
}

/// Populates `store` with one admin, three workers, two employers, the
/// default categories and four offers.
///
/// All or nothing: on failure `store` is left exactly as it was.
///
/// # Errors
///
/// Returns the first rejection or violation, which only happens when the
/// store already holds conflicting data or `admin_id` collides with a
/// seeded user.
pub fn seed_store(store: &mut Store, admin_id: u64) -> Result<SeedSummary, MarketError> {
    let mut staged = store.clone();
    let summary = populate(&mut staged, admin_id)?;
    *store = staged;
    tracing::info!(
        admins = summary.admins,
        workers = summary.workers,
        employers = summary.employers,
        categories = summary.categories,
        work_offers = summary.work_offers,
        "store seeded"
    );
    Ok(summary)
}

fn populate(store: &mut Store, admin_id: u64) -> Result<SeedSummary, MarketError> {
    store.add_admin(admin_id)?;

    for name in DEFAULT_CATEGORIES {
        store.add_category(name)?;
    }

    let workers = [
        profile(
            1001,
            "Juan",
            "Martínez",
            "099111222",
            "Av. 18 de Julio 1453, Montevideo",
            (-34.9055, -56.1851),
        ),
        profile(
            1002,
            "María",
            "González",
            "098333444",
            "Bulevar Artigas 1825, Montevideo",
            (-34.8935, -56.1662),
        ),
        profile(
            1003,
            "Diego",
            "Silva",
            "091555666",
            "Av. Italia 4321, Montevideo",
            (-34.8880, -56.1130),
        ),
    ];
    for worker in &workers {
        store.add_worker(worker)?;
    }

    let employers = [
        profile(
            2001,
            "Carolina",
            "Pereira",
            "097777888",
            "Rambla República de México 5555, Montevideo",
            (-34.8895, -56.0650),
        ),
        profile(
            2002,
            "Pablo",
            "Rodríguez",
            "094999000",
            "Av. Agraciada 2400, Montevideo",
            (-34.8770, -56.2000),
        ),
    ];
    for employer in &employers {
        store.add_employer(employer)?;
    }

    let offers = [
        offer(
            1001,
            "Fletes y mudanzas en camioneta",
            ("UYU", 1800),
            &["Traslados"],
            1,
        ),
        offer(
            1002,
            "Limpieza profunda de casas y apartamentos",
            ("$U", 1200),
            &["Limpieza"],
            1,
        ),
        offer(
            1003,
            "Instalaciones eléctricas y plomería general",
            ("USD", 60),
            &["Electricidad", "Plomería"],
            3,
        ),
        offer(
            1002,
            "Tortas y masas para eventos",
            ("UYU", 950),
            &["Confitería"],
            2,
        ),
    ];
    for request in &offers {
        store.add_work_offer(request)?;
    }

    Ok(SeedSummary::of(store))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{Identity, WorkOfferId};
    use crate::error::Rejection;

    #[test]
    fn seeds_an_empty_store() {
        let mut store = Store::new();
        let Ok(summary) = seed_store(&mut store, 1) else {
            panic!("seed failed");
        };
        assert_eq!(
            summary,
            SeedSummary {
                admins: 1,
                workers: 3,
                employers: 2,
                categories: 7,
                work_offers: 4,
            }
        );
        assert!(store.has_category("CONFITERIA"));
        assert!(store.has_category("jardineria"));

        let Some(electric) = store.search_work_offer(WorkOfferId::new(3)) else {
            panic!("offer 3 missing");
        };
        assert_eq!(
            electric.categories(),
            &["ELECTRICIDAD".to_string(), "PLOMERIA".to_string()]
        );
    }

    #[test]
    fn seeding_twice_is_rejected() {
        let mut store = Store::new();
        assert!(seed_store(&mut store, 1).is_ok());
        let Ok(admin) = Identity::new(1) else {
            panic!("valid identity");
        };
        assert!(matches!(
            seed_store(&mut store, 1),
            Err(MarketError::Rejected(Rejection::IdentityTaken(id))) if id == admin
        ));
        assert_eq!(store.work_offers().len(), 4);
    }

    #[test]
    fn admin_id_must_not_collide_with_seed_users() {
        let mut store = Store::new();
        assert!(seed_store(&mut store, 1001).is_err());
        assert_eq!(
            SeedSummary::of(&store),
            SeedSummary {
                admins: 0,
                workers: 0,
                employers: 0,
                categories: 0,
                work_offers: 0,
            }
        );
        assert!(seed_store(&mut store, 1).is_ok());
    }
}
