//! Driving port for rating queries.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::Error;
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::rating::{Rating, RatingStats};
use crate::domain::user::UserId;

/// Ratings about a user plus the derived statistics for the same set.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRatingsResponse {
    /// One page of ratings, newest first.
    pub ratings: Page<Rating>,
    /// Full-recompute statistics over all ratings about the user.
    pub stats: RatingStats,
}

/// Read operations on ratings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RatingQuery: Send + Sync {
    /// Fetch one rating; visible to its rater and rated user only.
    async fn get(&self, rating_id: Uuid, acting_user: UserId) -> Result<Rating, Error>;

    /// Ratings about `user_id`, with the user's current statistics.
    async fn list_for_user(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<UserRatingsResponse, Error>;

    /// Ratings submitted by the acting user.
    async fn list_by_rater(
        &self,
        acting_user: UserId,
        page: PageRequest,
    ) -> Result<Page<Rating>, Error>;

    /// Whether the swap exists, is completed, and has no rating by `user_id`.
    async fn can_rate(&self, swap_id: Uuid, user_id: UserId) -> Result<bool, Error>;
}
