//! Rating domain services: eligibility, submission, revision, and the
//! aggregate recompute that follows every mutation.
//!
//! Submission is race-safe through the persistence layer's unique
//! `(swap_request, rater)` constraint rather than a check-then-act sequence;
//! the eligibility pre-checks exist to produce precise errors, not to carry
//! the correctness burden.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use uuid::Uuid;

use crate::domain::audit::{AuditAction, AuditRecord};
use crate::domain::error::Error;
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::ports::{
    AuditLog, RatingCommand, RatingQuery, RatingRepository, RatingRepositoryError,
    SubmitRatingRequest, SwapRepository, SwapRepositoryError, UpdateRatingRequest, UserRepository,
    UserRepositoryError, UserRatingsResponse, record_best_effort,
};
use crate::domain::rating::{Rating, RatingDraft};
use crate::domain::skill::SkillSnapshot;
use crate::domain::swap::{SwapRequest, SwapStatus};
use crate::domain::user::UserId;

fn map_rating_repository_error(error: RatingRepositoryError) -> Error {
    match error {
        RatingRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("rating repository unavailable: {message}"))
        }
        RatingRepositoryError::Query { message } => {
            Error::internal(format!("rating repository error: {message}"))
        }
        RatingRepositoryError::Duplicate { .. } => {
            Error::duplicate_rating("you have already rated this swap")
        }
    }
}

fn map_swap_repository_error(error: SwapRepositoryError) -> Error {
    match error {
        SwapRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("swap repository unavailable: {message}"))
        }
        SwapRepositoryError::Query { message }
        | SwapRepositoryError::DuplicatePending { message } => {
            Error::internal(format!("swap repository error: {message}"))
        }
    }
}

fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

fn rating_not_found(rating_id: Uuid) -> Error {
    Error::not_found(format!("rating {rating_id} not found"))
}

/// Rating service implementing the command driving port.
#[derive(Clone)]
pub struct RatingCommandService<R, S, U, A> {
    ratings: Arc<R>,
    swaps: Arc<S>,
    users: Arc<U>,
    audit: Arc<A>,
    clock: Arc<dyn Clock>,
}

impl<R, S, U, A> RatingCommandService<R, S, U, A> {
    /// Create a new command service over the rating, swap, and user
    /// repositories.
    pub fn new(
        ratings: Arc<R>,
        swaps: Arc<S>,
        users: Arc<U>,
        audit: Arc<A>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            ratings,
            swaps,
            users,
            audit,
            clock,
        }
    }
}

impl<R, S, U, A> RatingCommandService<R, S, U, A>
where
    R: RatingRepository,
    S: SwapRepository,
    U: UserRepository,
    A: AuditLog,
{
    /// Full recompute of the rated user's statistics from the current rating
    /// set, written back wholesale. Never an incremental update, so edits and
    /// deletes cannot leave drift behind.
    async fn recompute_stats(&self, rated_user: &UserId) -> Result<(), Error> {
        let stats = self
            .ratings
            .stats_for(rated_user)
            .await
            .map_err(map_rating_repository_error)?;
        self.users
            .set_rating_stats(rated_user, stats)
            .await
            .map_err(map_user_repository_error)
    }

    async fn load_rating(&self, rating_id: Uuid) -> Result<Rating, Error> {
        self.ratings
            .find_by_id(&rating_id)
            .await
            .map_err(map_rating_repository_error)?
            .ok_or_else(|| rating_not_found(rating_id))
    }
}

/// Resolve the swap-side facts a submission needs: the rated user and the
/// skill they provided in the exchange.
fn rated_side(swap: &SwapRequest, rater: &UserId) -> Result<(UserId, SkillSnapshot), Error> {
    let rated_user = swap.other_participant(rater).ok_or_else(|| {
        Error::not_participant("you can only rate swaps you participated in")
    })?;
    // The requester received the recipient's requested skill and vice versa.
    let skill = if swap.requester() == rater {
        swap.requested_skill().clone()
    } else {
        swap.offered_skill().clone()
    };
    Ok((rated_user, skill))
}

#[async_trait]
impl<R, S, U, A> RatingCommand for RatingCommandService<R, S, U, A>
where
    R: RatingRepository,
    S: SwapRepository,
    U: UserRepository,
    A: AuditLog,
{
    async fn submit(&self, request: SubmitRatingRequest) -> Result<Rating, Error> {
        let SubmitRatingRequest {
            swap_request_id,
            rater,
            score,
            comment,
        } = request;

        let swap = self
            .swaps
            .find_by_id(&swap_request_id)
            .await
            .map_err(map_swap_repository_error)?
            .ok_or_else(|| Error::not_found(format!("swap request {swap_request_id} not found")))?;

        if swap.status() != SwapStatus::Completed {
            return Err(Error::not_completed("can only rate completed swaps"));
        }
        let (rated_user, skill_rated) = rated_side(&swap, &rater)?;

        let rating = Rating::new(RatingDraft {
            id: Uuid::new_v4(),
            swap_request_id,
            rater,
            rated_user,
            score,
            comment,
            skill_rated,
            created_at: self.clock.utc(),
        })
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        // The unique constraint decides duplicate races, not this insert's
        // ordering relative to any pre-check.
        self.ratings
            .insert(&rating)
            .await
            .map_err(map_rating_repository_error)?;

        self.recompute_stats(&rated_user).await?;
        self.swaps
            .mark_rated(&swap_request_id)
            .await
            .map_err(map_swap_repository_error)?;

        record_best_effort(
            self.audit.as_ref(),
            AuditRecord::new(rater, AuditAction::RatingGiven)
                .with_target_user(rated_user)
                .with_target_swap(swap_request_id)
                .with_details(json!({
                    "rating": rating.score().value(),
                    "skillRated": rating.skill_rated().name,
                })),
        )
        .await;

        Ok(rating)
    }

    async fn update(&self, request: UpdateRatingRequest) -> Result<Rating, Error> {
        let UpdateRatingRequest {
            rating_id,
            rater,
            score,
            comment,
        } = request;

        let mut rating = self.load_rating(rating_id).await?;
        if rating.rater() != &rater {
            return Err(Error::forbidden("you can only update your own ratings"));
        }

        rating
            .revise(score, comment)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        self.ratings
            .update(&rating)
            .await
            .map_err(map_rating_repository_error)?;

        self.recompute_stats(rating.rated_user()).await?;
        Ok(rating)
    }

    async fn delete(&self, rating_id: Uuid, rater: UserId) -> Result<(), Error> {
        let rating = self.load_rating(rating_id).await?;
        if rating.rater() != &rater {
            return Err(Error::forbidden("you can only delete your own ratings"));
        }

        self.ratings
            .delete(&rating_id)
            .await
            .map_err(map_rating_repository_error)?;
        self.recompute_stats(rating.rated_user()).await
    }
}

/// Rating service implementing the query driving port.
#[derive(Clone)]
pub struct RatingQueryService<R, S, U> {
    ratings: Arc<R>,
    swaps: Arc<S>,
    users: Arc<U>,
}

impl<R, S, U> RatingQueryService<R, S, U> {
    /// Create a new query service over the rating, swap, and user
    /// repositories.
    pub fn new(ratings: Arc<R>, swaps: Arc<S>, users: Arc<U>) -> Self {
        Self {
            ratings,
            swaps,
            users,
        }
    }
}

#[async_trait]
impl<R, S, U> RatingQuery for RatingQueryService<R, S, U>
where
    R: RatingRepository,
    S: SwapRepository,
    U: UserRepository,
{
    async fn get(&self, rating_id: Uuid, acting_user: UserId) -> Result<Rating, Error> {
        let rating = self
            .ratings
            .find_by_id(&rating_id)
            .await
            .map_err(map_rating_repository_error)?
            .ok_or_else(|| rating_not_found(rating_id))?;

        if rating.rater() != &acting_user && rating.rated_user() != &acting_user {
            return Err(Error::forbidden("access denied"));
        }
        Ok(rating)
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<UserRatingsResponse, Error> {
        let exists = self
            .users
            .find_by_id(&user_id)
            .await
            .map_err(map_user_repository_error)?
            .is_some();
        if !exists {
            return Err(Error::not_found(format!("user {user_id} not found")));
        }

        let ratings = self
            .ratings
            .list_for_rated(&user_id, page)
            .await
            .map_err(map_rating_repository_error)?;
        let stats = self
            .ratings
            .stats_for(&user_id)
            .await
            .map_err(map_rating_repository_error)?;

        Ok(UserRatingsResponse { ratings, stats })
    }

    async fn list_by_rater(
        &self,
        acting_user: UserId,
        page: PageRequest,
    ) -> Result<Page<Rating>, Error> {
        self.ratings
            .list_by_rater(&acting_user, page)
            .await
            .map_err(map_rating_repository_error)
    }

    async fn can_rate(&self, swap_id: Uuid, user_id: UserId) -> Result<bool, Error> {
        let Some(swap) = self
            .swaps
            .find_by_id(&swap_id)
            .await
            .map_err(map_swap_repository_error)?
        else {
            return Ok(false);
        };
        if swap.status() != SwapStatus::Completed {
            return Ok(false);
        }

        let already_rated = self
            .ratings
            .exists_for(&swap_id, &user_id)
            .await
            .map_err(map_rating_repository_error)?;
        Ok(!already_rated)
    }
}

#[cfg(test)]
#[path = "rating_service_tests.rs"]
mod tests;
