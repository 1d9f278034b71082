//! # labor-exchange
//!
//! In-memory domain store for a small labor marketplace.
//!
//! Workers publish job offers in categories, employers contact workers,
//! and both sides rate each other once the job is over. The crate owns
//! every entity, enforces the cross-entity rules, and propagates offer
//! withdrawal to subscribed users. Chat transport, geocoding and text
//! rendering are left to the callers.
//!
//! ## Architecture
//!
//! ```text
//! Front ends (chat command handlers)
//!     │
//!     ├── MarketService (service/)   ── EventBus (domain/)
//!     │        │ RwLock
//!     ├── Store (store/)
//!     │
//!     ├── Entities (domain/)
//!     └── Contract checks (contract)
//! ```

pub mod config;
pub mod contract;
pub mod domain;
pub mod error;
pub mod seed;
pub mod service;
pub mod store;
