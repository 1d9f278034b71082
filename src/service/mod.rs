//! Service layer: concurrent access to the store.
//!
//! [`MarketService`] serializes store mutations behind a lock and emits
//! events through the [`super::domain::EventBus`].

pub mod market_service;

pub use market_service::MarketService;
