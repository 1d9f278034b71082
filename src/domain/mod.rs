//! Domain layer: entities, validation rules and the event system.
//!
//! Entities validate themselves on construction through the contract
//! primitives in [`crate::contract`], so no partially built value can
//! escape a constructor. Only the store registers entities.

pub mod currency;
pub mod event_bus;
pub mod identity;
pub mod location;
pub mod market_event;
pub mod notification;
pub mod rating;
pub mod text;
pub mod user;
pub mod work_offer;

pub use currency::Currency;
pub use event_bus::EventBus;
pub use identity::{Identity, NotificationId, WorkOfferId};
pub use location::Location;
pub use market_event::{AccountKind, MarketEvent};
pub use notification::{Notification, NotificationReason};
pub use rating::{Rating, RatingState};
pub use user::{Admin, OfferObserver, Role, User};
pub use work_offer::{Delivery, ObserverDirectory, OfferTerms, WorkOffer};
