//! Driving port for admin moderation commands.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::user::{User, UserId};

/// Request payload for banning a user.
#[derive(Debug, Clone)]
pub struct BanUserRequest {
    /// Authenticated admin performing the ban.
    pub acting_user: UserId,
    /// User being banned.
    pub user_id: UserId,
    /// Reason recorded with the ban.
    pub reason: Option<String>,
}

/// Request payload for lifting a ban.
#[derive(Debug, Clone, Copy)]
pub struct UnbanUserRequest {
    /// Authenticated admin lifting the ban.
    pub acting_user: UserId,
    /// User being unbanned.
    pub user_id: UserId,
}

/// Moderation operations; every method requires the admin role.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModerationCommand: Send + Sync {
    /// Ban a user. Existing swap requests are untouched; new creates
    /// involving the user fail the ban precondition.
    async fn ban(&self, request: BanUserRequest) -> Result<User, Error>;

    /// Lift a user's ban.
    async fn unban(&self, request: UnbanUserRequest) -> Result<User, Error>;
}
