//! Driving port for swap lifecycle commands.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::error::Error;
use crate::domain::swap::SwapRequest;
use crate::domain::user::UserId;

/// Request payload for creating a swap request.
///
/// Skills are referenced by name; the service snapshots the matching entries
/// from each participant's offered list, so the stored copies reflect the
/// lists as they were at creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSwapRequest {
    /// Authenticated user initiating the request.
    pub requester: UserId,
    /// User the request is addressed to.
    pub recipient: UserId,
    /// Name of the recipient's offered skill being requested.
    pub requested_skill: String,
    /// Name of the requester's offered skill given in exchange.
    pub offered_skill: String,
    /// Optional message to the recipient.
    pub message: Option<String>,
    /// Optional agreed date for the swap.
    pub scheduled_date: Option<DateTime<Utc>>,
}

/// Request payload for accept/reject/cancel/complete operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapActionRequest {
    /// The swap to transition.
    pub swap_id: Uuid,
    /// Authenticated user performing the transition.
    pub acting_user: UserId,
}

/// Lifecycle commands on swap requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SwapCommand: Send + Sync {
    /// Create a new pending swap request.
    async fn create(&self, request: CreateSwapRequest) -> Result<SwapRequest, Error>;

    /// Accept a pending request; recipient only.
    async fn accept(&self, request: SwapActionRequest) -> Result<SwapRequest, Error>;

    /// Reject a pending request; recipient only.
    async fn reject(&self, request: SwapActionRequest) -> Result<SwapRequest, Error>;

    /// Cancel a pending request; requester only.
    async fn cancel(&self, request: SwapActionRequest) -> Result<SwapRequest, Error>;

    /// Complete an accepted request; either participant.
    async fn complete(&self, request: SwapActionRequest) -> Result<SwapRequest, Error>;
}
