//! Driving port for swap lifecycle queries.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::Error;
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::swap::SwapRequest;
use crate::domain::user::UserId;

use super::swap_repository::SwapFilter;

/// Request payload for listing the acting user's swap requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSwapsRequest {
    /// Authenticated user whose requests are listed.
    pub acting_user: UserId,
    /// Direction and status filters.
    pub filter: SwapFilter,
    /// Page to return.
    pub page: PageRequest,
}

/// Read operations on swap requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SwapQuery: Send + Sync {
    /// Fetch one swap request; participants only.
    async fn get(&self, swap_id: Uuid, acting_user: UserId) -> Result<SwapRequest, Error>;

    /// List the acting user's swap requests, newest first.
    async fn list(&self, request: ListSwapsRequest) -> Result<Page<SwapRequest>, Error>;
}
