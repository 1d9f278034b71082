//! Category vocabulary.

use super::Store;
use crate::contract::{require_postcondition, require_precondition};
use crate::domain::text::{is_blank, normalize_category};
use crate::error::Violation;

impl Store {
    /// Adds a category to the vocabulary, normalized (accents stripped,
    /// upper-case). Adding an existing category is a no-op.
    ///
    /// Returns `true` if the category was new.
    ///
    /// # Errors
    ///
    /// Returns [`Violation::Precondition`] if `name` is blank, or becomes
    /// empty once accents are stripped. This path is admin-only, so such a
    /// name is a caller bug.
    pub fn add_category(&mut self, name: &str) -> Result<bool, Violation> {
        require_precondition(!is_blank(name), "category name must not be blank")?;
        let normalized = normalize_category(name);
        require_precondition(
            !normalized.is_empty(),
            "category name must keep at least one letter once normalized",
        )?;
        if self.categories.contains(&normalized) {
            return Ok(false);
        }
        self.categories.push(normalized.clone());
        require_postcondition(
            self.has_category(&normalized),
            "category was not registered",
        )?;
        tracing::info!(category = %normalized, "category added");
        Ok(true)
    }

    /// Returns `true` if `name`, once normalized, is in the vocabulary.
    #[must_use]
    pub fn has_category(&self, name: &str) -> bool {
        let normalized = normalize_category(name);
        self.categories.iter().any(|c| *c == normalized)
    }

    /// Every category, in first-insert order.
    #[must_use]
    pub fn all_categories(&self) -> &[String] {
        &self.categories
    }
}
