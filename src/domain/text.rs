//! Text rules shared by entities and the store.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Mobile numbers: `09`, a non-zero digit, then six digits.
static PHONE_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^09[1-9]\d{6}$").ok());

/// Returns `true` if `value` is empty or only whitespace.
#[must_use]
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Returns `true` if `phone` is an accepted mobile number.
#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(phone))
}

/// Normalizes a category label: trimmed, diacritics stripped, upper-case.
///
/// `"Confitería"` becomes `"CONFITERIA"`.
#[must_use]
pub fn normalize_category(name: &str) -> String {
    name.trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_uppercase()
}
