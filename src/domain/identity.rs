//! Type-safe identifiers.
//!
//! [`Identity`] is the positive integer handle issued by the messaging
//! platform and shared by every person-like entity. [`WorkOfferId`] and
//! [`NotificationId`] are store- and user-scoped sequence numbers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::contract::require_precondition;
use crate::error::Violation;

/// Platform handle of an admin, worker or employer.
///
/// Always greater than zero, including when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Identity(u64);

impl Identity {
    /// Wraps a raw platform handle.
    ///
    /// # Errors
    ///
    /// Returns [`Violation::Precondition`] if `raw` is zero.
    pub fn new(raw: u64) -> Result<Self, Violation> {
        require_precondition(raw > 0, "identity must be a positive integer")?;
        Ok(Self(raw))
    }

    /// Returns the raw handle.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u64> for Identity {
    type Error = Violation;

    fn try_from(raw: u64) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<Identity> for u64 {
    fn from(id: Identity) -> Self {
        id.0
    }
}

/// Store-assigned work offer number, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkOfferId(u64);

impl WorkOfferId {
    /// Creates an id from its raw value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WorkOfferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Notification number, scoped to the owning user's inbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(u64);

impl NotificationId {
    /// Creates an id from its raw value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_rejected() {
        assert!(matches!(Identity::new(0), Err(Violation::Precondition(_))));
        assert!(Identity::try_from(0).is_err());
    }

    #[test]
    fn positive_handle_round_trips() {
        let Ok(id) = Identity::new(42) else {
            panic!("valid identity");
        };
        assert_eq!(id.get(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn serializes_transparently() {
        let Ok(id) = Identity::new(7) else {
            panic!("valid identity");
        };
        let json = serde_json::to_string(&id).unwrap_or_default();
        assert_eq!(json, "7");
        assert!(serde_json::from_str::<Identity>("0").is_err());
        let offer = serde_json::to_string(&WorkOfferId::new(3)).unwrap_or_default();
        assert_eq!(offer, "3");
    }
}
