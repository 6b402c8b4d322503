//! Driving port for user queries.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::user::{User, UserId};

use super::user_repository::UserSearch;

/// Read operations on users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Fetch a user without visibility filtering.
    ///
    /// Used by identity and moderation flows that need the banned flag and
    /// role; not exposed directly over HTTP.
    async fn get_user(&self, user_id: UserId) -> Result<User, Error>;

    /// Fetch a user's profile, applying visibility rules: private profiles
    /// are only returned to their owner.
    async fn get_profile(&self, user_id: UserId, viewer: Option<UserId>) -> Result<User, Error>;

    /// List public, non-banned users with an optional skill-name search.
    async fn list(&self, search: UserSearch, page: PageRequest) -> Result<Page<User>, Error>;
}
