//! Contact flow, inbox handling and ratings.
//!
//! An employer asks to contact the worker behind an offer. When the
//! worker answers, both parties are linked: each receives an unscored
//! rating from the other, scoreable once the offer's duration has
//! elapsed.

use chrono::{NaiveDate, Utc};

use super::Store;
use crate::domain::text::is_blank;
use crate::domain::{
    Delivery, Identity, NotificationId, NotificationReason, Rating, WorkOfferId,
};
use crate::error::{MarketError, Rejection};

impl Store {
    /// Sends a contact request from an employer to the worker who owns
    /// the offer.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::UnknownEmployer`], [`Rejection::BlankField`],
    /// [`Rejection::UnknownWorkOffer`] or [`Rejection::OfferWithdrawn`]
    /// without changing anything.
    pub fn contact_worker(
        &mut self,
        employer: Identity,
        work_offer_id: WorkOfferId,
        message: &str,
    ) -> Result<Delivery, MarketError> {
        if !self.exists_employer(employer) {
            return Err(Rejection::UnknownEmployer(employer).into());
        }
        if is_blank(message) {
            return Err(Rejection::BlankField("message").into());
        }
        let offer = self
            .search_work_offer(work_offer_id)
            .ok_or(Rejection::UnknownWorkOffer(work_offer_id))?;
        if !offer.is_published() {
            return Err(Rejection::OfferWithdrawn(work_offer_id).into());
        }
        let owner = offer.owner();
        let worker = self
            .workers
            .get_mut(&owner)
            .ok_or(Rejection::UnknownWorker(owner))?;
        let notification_id = worker.push_notification(
            message,
            employer,
            NotificationReason::EmployerWantsContact,
            Some(work_offer_id),
        )?;
        tracing::info!(%employer, worker = %owner, %work_offer_id, "contact requested");
        Ok(Delivery {
            recipient: owner,
            notification_id,
        })
    }

    /// Answers an open contact request, linking worker and employer.
    ///
    /// Closes the request, delivers the answer to the employer and creates
    /// the two unscored ratings, eligible once the offer's duration has
    /// elapsed since the offer was created.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] if the worker, the request, the employer or
    /// the offer cannot be resolved, the request is not an open contact
    /// request, the offer was withdrawn, or the parties are already linked
    /// on the offer. Nothing changes in that case.
    pub fn respond_to_employer(
        &mut self,
        worker_id: Identity,
        request_id: NotificationId,
        message: &str,
    ) -> Result<Delivery, MarketError> {
        self.respond_to_employer_on(worker_id, request_id, message, Utc::now().date_naive())
    }

    /// [`Store::respond_to_employer`] with an explicit link date.
    ///
    /// # Errors
    ///
    /// See [`Store::respond_to_employer`]. A link date before the offer's
    /// creation day is a [`MarketError::Violation`].
    pub fn respond_to_employer_on(
        &mut self,
        worker_id: Identity,
        request_id: NotificationId,
        message: &str,
        today: NaiveDate,
    ) -> Result<Delivery, MarketError> {
        if is_blank(message) {
            return Err(Rejection::BlankField("message").into());
        }
        let worker = self
            .workers
            .get(&worker_id)
            .ok_or(Rejection::UnknownWorker(worker_id))?;
        let request = worker
            .notification(request_id)
            .ok_or(Rejection::UnknownNotification(request_id))?;
        let work_offer_id = match (request.reason(), request.is_open(), request.work_offer_id()) {
            (NotificationReason::EmployerWantsContact, true, Some(offer_id)) => offer_id,
            _ => return Err(Rejection::NoPendingContact(request_id).into()),
        };
        let employer_id = request.sender();
        if !self.exists_employer(employer_id) {
            return Err(Rejection::UnknownEmployer(employer_id).into());
        }
        let offer = self
            .search_work_offer(work_offer_id)
            .ok_or(Rejection::UnknownWorkOffer(work_offer_id))?;
        if !offer.is_published() {
            return Err(Rejection::OfferWithdrawn(work_offer_id).into());
        }
        let already_linked = worker.has_rating_from(employer_id, work_offer_id)
            || self
                .search_employer(employer_id)
                .is_some_and(|employer| employer.has_rating_from(worker_id, work_offer_id));
        if already_linked {
            return Err(Rejection::AlreadyLinked(work_offer_id).into());
        }
        let (created_on, duration) = (offer.created_on(), offer.duration_days());
        let worker_rating = Rating::new(employer_id, work_offer_id, created_on, duration, today)?;
        let employer_rating = Rating::new(worker_id, work_offer_id, created_on, duration, today)?;

        let (Some(worker), Some(employer)) = (
            self.workers.get_mut(&worker_id),
            self.employers.get_mut(&employer_id),
        ) else {
            return Err(Rejection::UnknownUser(worker_id).into());
        };
        worker.close_notification(request_id)?;
        worker.add_rating(worker_rating)?;
        employer.add_rating(employer_rating)?;
        let notification_id = employer.push_notification(
            message,
            worker_id,
            NotificationReason::WorkerResponded,
            Some(work_offer_id),
        )?;
        tracing::info!(worker = %worker_id, employer = %employer_id, %work_offer_id, "parties linked");
        Ok(Delivery {
            recipient: employer_id,
            notification_id,
        })
    }

    /// Scores the rating `rater` gives `rated` for an offer.
    ///
    /// `force_open` skips the "duration has elapsed" check.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::UnknownUser`] or [`Rejection::RatingNotFound`]
    /// if the rating cannot be located, otherwise the rating's own
    /// rejection (already rated, score out of range, window closed).
    pub fn rate_user(
        &mut self,
        rater: Identity,
        rated: Identity,
        work_offer_id: WorkOfferId,
        score: u8,
        force_open: bool,
    ) -> Result<(), Rejection> {
        self.rate_user_on(rater, rated, work_offer_id, score, Utc::now().date_naive(), force_open)
    }

    /// [`Store::rate_user`] as of `today`.
    ///
    /// # Errors
    ///
    /// See [`Store::rate_user`].
    pub fn rate_user_on(
        &mut self,
        rater: Identity,
        rated: Identity,
        work_offer_id: WorkOfferId,
        score: u8,
        today: NaiveDate,
        force_open: bool,
    ) -> Result<(), Rejection> {
        let user = self.user_mut(rated).ok_or(Rejection::UnknownUser(rated))?;
        let rating = user
            .rating_mut(rater, work_offer_id)
            .ok_or(Rejection::RatingNotFound)?;
        rating
            .update_rate_on(score, today, force_open)
            .inspect_err(|reason| {
                tracing::debug!(%rater, %rated, %work_offer_id, score, %reason, "rating rejected");
            })?;
        tracing::info!(%rater, %rated, %work_offer_id, score, "rating submitted");
        Ok(())
    }

    /// Acknowledges a notification in a user's inbox.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::UnknownUser`], [`Rejection::UnknownNotification`]
    /// or [`Rejection::NotificationClosed`].
    pub fn close_notification(
        &mut self,
        user: Identity,
        id: NotificationId,
    ) -> Result<(), Rejection> {
        self.user_mut(user)
            .ok_or(Rejection::UnknownUser(user))?
            .close_notification(id)
    }

    /// Integer average of the scores `user` has received, `None` if the
    /// user is not registered.
    #[must_use]
    pub fn average_rating(&self, user: Identity) -> Option<u32> {
        self.search_user(user).map(crate::domain::User::average_rating)
    }
}
