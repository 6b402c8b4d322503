//! Port for rating persistence and full-recompute statistics.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::pagination::{Page, PageRequest};
use crate::domain::rating::{Rating, RatingStats};
use crate::domain::user::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by rating repository adapters.
    pub enum RatingRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "rating repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "rating repository query failed: {message}",
        /// The `(swap_request, rater)` uniqueness constraint tripped; raised
        /// by the storage layer when a submit race is lost.
        Duplicate { message: String } =>
            "rating already exists: {message}",
    }
}

/// Port for reading and writing ratings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RatingRepository: Send + Sync {
    /// Persist a new rating.
    ///
    /// Adapters rely on a unique constraint over `(swap_request, rater)`
    /// rather than a check-then-act sequence; concurrent duplicates surface
    /// as [`RatingRepositoryError::Duplicate`].
    async fn insert(&self, rating: &Rating) -> Result<(), RatingRepositoryError>;

    /// Find a rating by id.
    async fn find_by_id(&self, rating_id: &Uuid) -> Result<Option<Rating>, RatingRepositoryError>;

    /// Whether `rater` has already rated the swap.
    async fn exists_for(
        &self,
        swap_id: &Uuid,
        rater: &UserId,
    ) -> Result<bool, RatingRepositoryError>;

    /// Overwrite a rating's score and comment.
    async fn update(&self, rating: &Rating) -> Result<(), RatingRepositoryError>;

    /// Delete a rating.
    async fn delete(&self, rating_id: &Uuid) -> Result<(), RatingRepositoryError>;

    /// Ratings about `user_id`, newest first.
    async fn list_for_rated(
        &self,
        user_id: &UserId,
        page: PageRequest,
    ) -> Result<Page<Rating>, RatingRepositoryError>;

    /// Ratings submitted by `rater`, newest first.
    async fn list_by_rater(
        &self,
        rater: &UserId,
        page: PageRequest,
    ) -> Result<Page<Rating>, RatingRepositoryError>;

    /// Full recompute of the statistics for all ratings about `user_id`.
    async fn stats_for(&self, user_id: &UserId) -> Result<RatingStats, RatingRepositoryError>;
}

/// Fixture implementation for tests that do not exercise rating persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRatingRepository;

#[async_trait]
impl RatingRepository for FixtureRatingRepository {
    async fn insert(&self, _rating: &Rating) -> Result<(), RatingRepositoryError> {
        Ok(())
    }

    async fn find_by_id(
        &self,
        _rating_id: &Uuid,
    ) -> Result<Option<Rating>, RatingRepositoryError> {
        Ok(None)
    }

    async fn exists_for(
        &self,
        _swap_id: &Uuid,
        _rater: &UserId,
    ) -> Result<bool, RatingRepositoryError> {
        Ok(false)
    }

    async fn update(&self, _rating: &Rating) -> Result<(), RatingRepositoryError> {
        Ok(())
    }

    async fn delete(&self, _rating_id: &Uuid) -> Result<(), RatingRepositoryError> {
        Ok(())
    }

    async fn list_for_rated(
        &self,
        _user_id: &UserId,
        page: PageRequest,
    ) -> Result<Page<Rating>, RatingRepositoryError> {
        Ok(Page::empty(page))
    }

    async fn list_by_rater(
        &self,
        _rater: &UserId,
        page: PageRequest,
    ) -> Result<Page<Rating>, RatingRepositoryError> {
        Ok(Page::empty(page))
    }

    async fn stats_for(&self, _user_id: &UserId) -> Result<RatingStats, RatingRepositoryError> {
        Ok(RatingStats::default())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_stats_are_zero() {
        let repo = FixtureRatingRepository;
        let stats = repo
            .stats_for(&UserId::random())
            .await
            .expect("fixture stats succeed");
        assert_eq!(stats.total(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_exists_is_false() {
        let repo = FixtureRatingRepository;
        let exists = repo
            .exists_for(&Uuid::new_v4(), &UserId::random())
            .await
            .expect("fixture lookup succeeds");
        assert!(!exists);
    }

    #[rstest]
    fn duplicate_error_formats_message() {
        let err = RatingRepositoryError::duplicate("swap already rated by this user");
        assert!(err.to_string().contains("already exists"));
    }
}
