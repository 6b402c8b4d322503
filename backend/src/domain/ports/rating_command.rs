//! Driving port for rating commands.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::Error;
use crate::domain::rating::{Rating, RatingScore};
use crate::domain::user::UserId;

/// Request payload for submitting a rating against a completed swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRatingRequest {
    /// The completed swap being rated.
    pub swap_request_id: Uuid,
    /// Authenticated user submitting the rating.
    pub rater: UserId,
    /// Score between 1 and 5.
    pub score: RatingScore,
    /// Optional free-text comment.
    pub comment: Option<String>,
}

/// Request payload for revising an existing rating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRatingRequest {
    /// The rating to revise.
    pub rating_id: Uuid,
    /// Authenticated user; must be the original rater.
    pub rater: UserId,
    /// Replacement score.
    pub score: RatingScore,
    /// Replacement comment.
    pub comment: Option<String>,
}

/// Write operations on ratings. Every mutation triggers a full recompute of
/// the rated user's statistics.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RatingCommand: Send + Sync {
    /// Submit a rating for a completed swap the rater participated in.
    async fn submit(&self, request: SubmitRatingRequest) -> Result<Rating, Error>;

    /// Revise a rating's score and comment; original rater only.
    async fn update(&self, request: UpdateRatingRequest) -> Result<Rating, Error>;

    /// Delete a rating; original rater only.
    async fn delete(&self, rating_id: Uuid, rater: UserId) -> Result<(), Error>;
}
