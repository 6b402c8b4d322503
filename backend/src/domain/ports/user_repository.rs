//! Port for user persistence.

use async_trait::async_trait;

use crate::domain::pagination::{Page, PageRequest};
use crate::domain::rating::RatingStats;
use crate::domain::user::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "user repository query failed: {message}",
    }
}

/// Filter for public user listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserSearch {
    /// Case-insensitive skill-name filter matching either skill list.
    pub skill: Option<String>,
}

/// Port for reading and writing users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by id.
    async fn find_by_id(&self, user_id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Persist a new user.
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Overwrite a user's profile fields and skill lists.
    async fn update(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Overwrite a user's derived rating statistics.
    async fn set_rating_stats(
        &self,
        user_id: &UserId,
        stats: RatingStats,
    ) -> Result<(), UserRepositoryError>;

    /// List public, non-banned users ordered by display name.
    async fn list_public(
        &self,
        search: UserSearch,
        page: PageRequest,
    ) -> Result<Page<User>, UserRepositoryError>;
}

/// Fixture implementation for tests that do not exercise user persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn find_by_id(&self, _user_id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(None)
    }

    async fn insert(&self, _user: &User) -> Result<(), UserRepositoryError> {
        Ok(())
    }

    async fn update(&self, _user: &User) -> Result<(), UserRepositoryError> {
        Ok(())
    }

    async fn set_rating_stats(
        &self,
        _user_id: &UserId,
        _stats: RatingStats,
    ) -> Result<(), UserRepositoryError> {
        Ok(())
    }

    async fn list_public(
        &self,
        _search: UserSearch,
        page: PageRequest,
    ) -> Result<Page<User>, UserRepositoryError> {
        Ok(Page::empty(page))
    }
}
