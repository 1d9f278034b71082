//! Market error types.
//!
//! Errors are split in two tiers:
//!
//! - [`Violation`]: a broken contract (precondition, postcondition or
//!   invariant). Raised on internal paths such as entity construction and
//!   category registration. A violation aborts the call chain.
//! - [`Rejection`]: a user-facing mutation declined to act. Nothing was
//!   changed. Invalid or duplicate submissions are expected traffic, so
//!   these are plain values, not failures of the store.
//!
//! [`MarketError`] wraps both for the service layer and the binary.

use crate::domain::{Identity, NotificationId, WorkOfferId};

/// Contract failure raised by the validation layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    /// A precondition did not hold on entry.
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// A postcondition did not hold on exit.
    #[error("postcondition violated: {0}")]
    Postcondition(String),

    /// An invariant did not hold.
    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl Violation {
    /// Returns the literal contract message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Precondition(msg) | Self::Postcondition(msg) | Self::Invariant(msg) => msg,
        }
    }
}

/// Reason a user-facing store mutation did not take place.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// A required text field was empty or whitespace.
    #[error("field `{0}` must not be blank")]
    BlankField(&'static str),

    /// Phone number does not match the accepted mobile format.
    #[error("phone number is not a valid mobile number")]
    InvalidPhone,

    /// Latitude or longitude out of range.
    #[error("coordinates out of range")]
    InvalidCoordinates,

    /// Identity handle is zero.
    #[error("identity must be a positive integer")]
    InvalidIdentity,

    /// Identity already belongs to an admin, worker or employer.
    #[error("identity {0} is already registered")]
    IdentityTaken(Identity),

    /// No worker registered under the identity.
    #[error("worker {0} not found")]
    UnknownWorker(Identity),

    /// No employer registered under the identity.
    #[error("employer {0} not found")]
    UnknownEmployer(Identity),

    /// No worker or employer registered under the identity.
    #[error("user {0} not found")]
    UnknownUser(Identity),

    /// No admin registered under the identity.
    #[error("admin {0} not found")]
    UnknownAdmin(Identity),

    /// No work offer with the id.
    #[error("work offer {0} not found")]
    UnknownWorkOffer(WorkOfferId),

    /// Currency token not accepted.
    #[error("unknown currency: {0}")]
    UnknownCurrency(String),

    /// Price must be greater than zero.
    #[error("price must be positive")]
    NonPositivePrice,

    /// Duration must be greater than zero.
    #[error("duration must be positive")]
    NonPositiveDuration,

    /// Offer listed no categories.
    #[error("at least one category is required")]
    NoCategories,

    /// Category is not part of the controlled vocabulary.
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// An identical offer already exists.
    #[error("an identical work offer already exists")]
    DuplicateOffer,

    /// Offer is no longer published.
    #[error("work offer {0} has been withdrawn")]
    OfferWithdrawn(WorkOfferId),

    /// Caller may not act on the target.
    #[error("identity {0} is not allowed to perform this action")]
    NotAuthorized(Identity),

    /// The notification is not an open contact request.
    #[error("notification {0} is not an open contact request")]
    NoPendingContact(NotificationId),

    /// Worker and employer are already linked on this offer.
    #[error("parties are already linked on work offer {0}")]
    AlreadyLinked(WorkOfferId),

    /// No rating links the rater to the offer.
    #[error("no rating found for this rater and work offer")]
    RatingNotFound,

    /// Score outside `1..=10`.
    #[error("score {0} is out of range (1-10)")]
    ScoreOutOfRange(u8),

    /// Today is outside the rating window.
    #[error("rating window is not open")]
    RatingWindowClosed,

    /// Rating already carries a score.
    #[error("rating has already been submitted")]
    AlreadyRated,

    /// No notification with the id in the user's inbox.
    #[error("notification {0} not found")]
    UnknownNotification(NotificationId),

    /// Notification was already acknowledged.
    #[error("notification {0} is already closed")]
    NotificationClosed(NotificationId),

    /// Entity construction refused the input.
    #[error("invalid input: {0}")]
    Invalid(String),
}

/// Top-level error for the service layer and the binary.
///
/// # Error Code Ranges
///
/// | Range     | Category               |
/// |-----------|------------------------|
/// | 1000–1999 | Rejected input         |
/// | 2000–2999 | Not found / state      |
/// | 3000–3999 | Violation / internal   |
#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    /// A user-facing mutation was declined.
    #[error("rejected: {0}")]
    Rejected(#[from] Rejection),

    /// A contract was broken.
    #[error(transparent)]
    Violation(#[from] Violation),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),
}

impl MarketError {
    /// Returns the numeric error code for this error.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Rejected(rejection) => match rejection {
                Rejection::BlankField(_) => 1001,
                Rejection::InvalidPhone => 1002,
                Rejection::InvalidCoordinates => 1003,
                Rejection::InvalidIdentity => 1004,
                Rejection::UnknownCurrency(_) => 1005,
                Rejection::NonPositivePrice => 1006,
                Rejection::NonPositiveDuration => 1007,
                Rejection::NoCategories => 1008,
                Rejection::UnknownCategory(_) => 1009,
                Rejection::ScoreOutOfRange(_) => 1010,
                Rejection::NotAuthorized(_) => 1011,
                Rejection::Invalid(_) => 1012,
                Rejection::UnknownWorker(_)
                | Rejection::UnknownEmployer(_)
                | Rejection::UnknownUser(_)
                | Rejection::UnknownAdmin(_) => 2001,
                Rejection::UnknownWorkOffer(_) => 2002,
                Rejection::UnknownNotification(_) => 2003,
                Rejection::RatingNotFound => 2004,
                Rejection::IdentityTaken(_) => 2101,
                Rejection::DuplicateOffer => 2102,
                Rejection::OfferWithdrawn(_) => 2103,
                Rejection::NoPendingContact(_) => 2104,
                Rejection::AlreadyLinked(_) => 2105,
                Rejection::RatingWindowClosed => 2106,
                Rejection::AlreadyRated => 2107,
                Rejection::NotificationClosed(_) => 2108,
            },
            Self::Violation(Violation::Precondition(_)) => 3001,
            Self::Violation(Violation::Postcondition(_)) => 3002,
            Self::Violation(Violation::Invariant(_)) => 3003,
            Self::Config(_) => 3100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violation_keeps_literal_message() {
        let v = Violation::Precondition("name must not be blank".to_string());
        assert_eq!(v.message(), "name must not be blank");
        assert_eq!(v.to_string(), "precondition violated: name must not be blank");
    }

    #[test]
    fn error_codes_follow_ranges() {
        let rejected = MarketError::from(Rejection::InvalidPhone);
        assert_eq!(rejected.error_code(), 1002);

        let missing = MarketError::from(Rejection::UnknownWorkOffer(WorkOfferId::new(4)));
        assert_eq!(missing.error_code(), 2002);

        let broken = MarketError::from(Violation::Invariant("x".to_string()));
        assert_eq!(broken.error_code(), 3003);

        let screened = MarketError::from(Rejection::Invalid("precondition violated: x".to_string()));
        assert_eq!(screened.error_code(), 1012);
    }

    #[test]
    fn rejection_display_names_the_field() {
        assert_eq!(
            Rejection::BlankField("description").to_string(),
            "field `description` must not be blank"
        );
    }
}
