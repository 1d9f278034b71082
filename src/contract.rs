//! Contract-checking primitives.
//!
//! Every constructor and mutator guards itself with these three checks.
//! Each returns `Ok(())` when the condition holds and the matching
//! [`Violation`] variant, carrying the literal message, when it does not.

use crate::error::Violation;

/// Checks a precondition on entry.
///
/// # Errors
///
/// Returns [`Violation::Precondition`] when `cond` is false.
pub fn require_precondition(cond: bool, message: &str) -> Result<(), Violation> {
    if cond {
        Ok(())
    } else {
        Err(Violation::Precondition(message.to_string()))
    }
}

/// Checks a postcondition before returning.
///
/// # Errors
///
/// Returns [`Violation::Postcondition`] when `cond` is false.
pub fn require_postcondition(cond: bool, message: &str) -> Result<(), Violation> {
    if cond {
        Ok(())
    } else {
        Err(Violation::Postcondition(message.to_string()))
    }
}

/// Checks an invariant.
///
/// # Errors
///
/// Returns [`Violation::Invariant`] when `cond` is false.
pub fn require_invariant(cond: bool, message: &str) -> Result<(), Violation> {
    if cond {
        Ok(())
    } else {
        Err(Violation::Invariant(message.to_string()))
    }
}
