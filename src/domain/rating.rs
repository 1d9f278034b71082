//! Rating state machine.
//!
//! A rating is created unscored when a worker and an employer are linked
//! on an offer. It can be scored once, inside a window of one calendar
//! month that opens once the offer's duration has elapsed, counted from the
//! day the offer was created:
//!
//! ```text
//! Unrated (score 0) ──update_rate(1..=10, inside window)──▶ Rated (terminal)
//! ```

use chrono::{Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{Identity, WorkOfferId};
use crate::contract::{require_postcondition, require_precondition};
use crate::error::{Rejection, Violation};

/// Lowest accepted score.
pub const MIN_SCORE: u8 = 1;
/// Highest accepted score.
pub const MAX_SCORE: u8 = 10;

/// Observable state of a [`Rating`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingState {
    /// Not scored yet.
    Unrated,
    /// Scored; cannot change again.
    Rated,
}

/// Score one party gives the other for a work offer.
///
/// Owned by the rated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rating {
    rater: Identity,
    work_offer_id: WorkOfferId,
    linked_on: NaiveDate,
    eligible_from: NaiveDate,
    score: u8,
}

impl Rating {
    /// Creates an unscored rating for two parties linked on `linked_on`.
    /// The window opens `duration_days` after the offer was created,
    /// whenever the link happened.
    ///
    /// # Errors
    ///
    /// Returns [`Violation::Precondition`] if `duration_days` is zero, the
    /// link predates the offer, or the resulting date overflows the
    /// calendar.
    pub fn new(
        rater: Identity,
        work_offer_id: WorkOfferId,
        offer_created_on: NaiveDate,
        duration_days: u32,
        linked_on: NaiveDate,
    ) -> Result<Self, Violation> {
        require_precondition(work_offer_id.get() > 0, "rating needs an existing work offer")?;
        require_precondition(duration_days > 0, "rating duration must be positive")?;
        require_precondition(
            linked_on >= offer_created_on,
            "parties cannot be linked before the offer exists",
        )?;
        let eligible_from = offer_created_on
            .checked_add_days(Days::new(u64::from(duration_days)))
            .ok_or_else(|| Violation::Precondition("rating date out of range".to_string()))?;

        let rating = Self {
            rater,
            work_offer_id,
            linked_on,
            eligible_from,
            score: 0,
        };
        require_postcondition(
            rating.state() == RatingState::Unrated,
            "new rating must be unrated",
        )?;
        Ok(rating)
    }

    /// Returns who gives the score.
    #[must_use]
    pub const fn rater(&self) -> Identity {
        self.rater
    }

    /// Returns the offer being rated.
    #[must_use]
    pub const fn work_offer_id(&self) -> WorkOfferId {
        self.work_offer_id
    }

    /// Returns the day the parties were linked.
    #[must_use]
    pub const fn linked_on(&self) -> NaiveDate {
        self.linked_on
    }

    /// Returns the day the offer's duration elapses.
    #[must_use]
    pub const fn eligible_from(&self) -> NaiveDate {
        self.eligible_from
    }

    /// Returns the last day a score is accepted.
    #[must_use]
    pub fn window_closes_on(&self) -> NaiveDate {
        self.eligible_from
            .checked_add_months(Months::new(1))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Returns the score, `0` while unrated.
    #[must_use]
    pub const fn score(&self) -> u8 {
        self.score
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> RatingState {
        if self.score == 0 {
            RatingState::Unrated
        } else {
            RatingState::Rated
        }
    }

    /// Returns `true` if a score can be submitted on `today`.
    ///
    /// `force_open` skips the "duration has elapsed" check so tests do
    /// not depend on the wall clock.
    #[must_use]
    pub fn is_window_open(&self, today: NaiveDate, force_open: bool) -> bool {
        today <= self.window_closes_on() && (force_open || today > self.eligible_from)
    }

    /// Scores the rating using today's UTC date.
    ///
    /// # Errors
    ///
    /// See [`Rating::update_rate_on`].
    pub fn update_rate(&mut self, score: u8, force_open: bool) -> Result<(), Rejection> {
        self.update_rate_on(score, Utc::now().date_naive(), force_open)
    }

    /// Scores the rating as of `today`. On any rejection the rating is
    /// left untouched.
    ///
    /// # Errors
    ///
    /// - [`Rejection::AlreadyRated`] if a score was already recorded.
    /// - [`Rejection::ScoreOutOfRange`] if `score` is outside `1..=10`.
    /// - [`Rejection::RatingWindowClosed`] if `today` is outside the window.
    pub fn update_rate_on(
        &mut self,
        score: u8,
        today: NaiveDate,
        force_open: bool,
    ) -> Result<(), Rejection> {
        if self.state() == RatingState::Rated {
            return Err(Rejection::AlreadyRated);
        }
        if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
            return Err(Rejection::ScoreOutOfRange(score));
        }
        if !self.is_window_open(today, force_open) {
            return Err(Rejection::RatingWindowClosed);
        }
        self.score = score;
        Ok(())
    }
}

/// Integer average of the scored ratings, `0` when none are scored.
#[must_use]
pub fn average_score(ratings: &[Rating]) -> u32 {
    let (sum, count) = ratings
        .iter()
        .filter(|r| r.state() == RatingState::Rated)
        .fold((0u32, 0u32), |(sum, count), r| {
            (sum.saturating_add(u32::from(r.score)), count.saturating_add(1))
        });
    sum.checked_div(count).unwrap_or(0)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        let Some(date) = NaiveDate::from_ymd_opt(y, m, d) else {
            panic!("valid date");
        };
        date
    }

    fn rating(offer_created_on: NaiveDate, duration: u32) -> Rating {
        let Ok(rater) = Identity::new(10) else {
            panic!("valid identity");
        };
        let Ok(rating) =
            Rating::new(rater, WorkOfferId::new(1), offer_created_on, duration, offer_created_on)
        else {
            panic!("valid rating");
        };
        rating
    }

    #[test]
    fn eligible_from_adds_duration() {
        let r = rating(day(2024, 1, 10), 5);
        assert_eq!(r.eligible_from(), day(2024, 1, 15));
        assert_eq!(r.window_closes_on(), day(2024, 2, 15));
        assert_eq!(r.state(), RatingState::Unrated);
    }

    #[test]
    fn zero_duration_is_a_violation() {
        let Ok(rater) = Identity::new(10) else {
            panic!("valid identity");
        };
        let result = Rating::new(rater, WorkOfferId::new(1), day(2024, 1, 1), 0, day(2024, 1, 1));
        assert!(matches!(result, Err(Violation::Precondition(_))));
    }

    #[test]
    fn window_is_anchored_on_offer_creation() {
        let Ok(rater) = Identity::new(10) else {
            panic!("valid identity");
        };
        let offer_created = day(2026, 10, 17);
        let linked = day(2030, 1, 1);
        let Ok(r) = Rating::new(rater, WorkOfferId::new(1), offer_created, 3, linked) else {
            panic!("valid rating");
        };
        assert_eq!(r.linked_on(), linked);
        assert_eq!(r.eligible_from(), day(2026, 10, 20));
        assert!(!r.is_window_open(linked, false));
    }

    #[test]
    fn link_before_offer_creation_is_a_violation() {
        let Ok(rater) = Identity::new(10) else {
            panic!("valid identity");
        };
        let result = Rating::new(rater, WorkOfferId::new(1), day(2024, 5, 2), 3, day(2024, 5, 1));
        assert!(matches!(result, Err(Violation::Precondition(_))));
    }

    #[test]
    fn forced_window_accepts_score() {
        let mut r = rating(Utc::now().date_naive(), 3);
        assert_eq!(r.update_rate(9, true), Ok(()));
        assert_eq!(r.score(), 9);
        assert_eq!(r.state(), RatingState::Rated);
    }

    #[test]
    fn out_of_range_score_is_ignored() {
        let mut r = rating(Utc::now().date_naive(), 3);
        assert_eq!(r.update_rate(11, true), Err(Rejection::ScoreOutOfRange(11)));
        assert_eq!(r.update_rate(0, true), Err(Rejection::ScoreOutOfRange(0)));
        assert_eq!(r.score(), 0);
    }

    #[test]
    fn score_before_duration_elapses_is_ignored() {
        let mut r = rating(Utc::now().date_naive(), 3);
        assert_eq!(r.update_rate(9, false), Err(Rejection::RatingWindowClosed));
        assert_eq!(r.score(), 0);
    }

    #[test]
    fn window_bounds() {
        let r = rating(day(2024, 3, 1), 10);
        // eligible_from = 2024-03-11, closes 2024-04-11
        assert!(!r.is_window_open(day(2024, 3, 11), false));
        assert!(r.is_window_open(day(2024, 3, 12), false));
        assert!(r.is_window_open(day(2024, 4, 11), false));
        assert!(!r.is_window_open(day(2024, 4, 12), false));
        assert!(!r.is_window_open(day(2024, 4, 12), true));
        assert!(r.is_window_open(day(2024, 3, 2), true));
    }

    #[test]
    fn rated_is_terminal() {
        let mut r = rating(day(2024, 3, 1), 1);
        assert_eq!(r.update_rate_on(7, day(2024, 3, 5), false), Ok(()));
        assert_eq!(
            r.update_rate_on(3, day(2024, 3, 6), false),
            Err(Rejection::AlreadyRated)
        );
        assert_eq!(r.score(), 7);
    }

    #[test]
    fn average_ignores_unrated_and_truncates() {
        let mut a = rating(day(2024, 3, 1), 1);
        let mut b = rating(day(2024, 3, 1), 1);
        let c = rating(day(2024, 3, 1), 1);
        assert_eq!(average_score(&[a.clone(), b.clone(), c.clone()]), 0);

        let today = day(2024, 3, 5);
        assert!(a.update_rate_on(8, today, false).is_ok());
        assert!(b.update_rate_on(5, today, false).is_ok());
        assert_eq!(average_score(&[a, b, c]), 6);
        assert_eq!(average_score(&[]), 0);
    }
}
