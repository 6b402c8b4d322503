//! Port for swap request persistence and guarded lifecycle transitions.
//!
//! Transitions go through [`SwapRepository::transition`] and
//! [`SwapRepository::complete`], both of which compare-and-swap on the
//! current status in the same atomic update as the write. Read-then-write
//! without the guard is not safe under concurrent accept/reject races; the
//! loser of such a race observes `None` and maps it to an invalid-state
//! failure.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::pagination::{Page, PageRequest};
use crate::domain::swap::{SwapRequest, SwapStatus};
use crate::domain::user::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by swap repository adapters.
    pub enum SwapRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "swap repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "swap repository query failed: {message}",
        /// A pending request between the pair already exists; raised by the
        /// storage-level uniqueness guard when a create race is lost.
        DuplicatePending { message: String } =>
            "pending swap request already exists: {message}",
    }
}

/// Direction filter for swap listings, relative to the acting user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwapDirection {
    /// Requests addressed to the user.
    Incoming,
    /// Requests initiated by the user.
    Outgoing,
    /// Both directions.
    #[default]
    All,
}

/// Filter bundle for swap listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SwapFilter {
    /// Direction relative to the acting user.
    pub direction: SwapDirection,
    /// Restrict to one lifecycle status.
    pub status: Option<SwapStatus>,
}

/// Port for writing swap requests and executing guarded transitions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SwapRepository: Send + Sync {
    /// Persist a new pending swap request.
    ///
    /// Adapters back this with a uniqueness guard over the unordered
    /// participant pair restricted to pending rows, surfacing
    /// [`SwapRepositoryError::DuplicatePending`] when a concurrent create
    /// wins the race.
    async fn insert(&self, swap: &SwapRequest) -> Result<(), SwapRepositoryError>;

    /// Find a swap request by id.
    async fn find_by_id(&self, swap_id: &Uuid) -> Result<Option<SwapRequest>, SwapRepositoryError>;

    /// Find a pending request between the two users, in either direction.
    async fn find_pending_between(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<Option<SwapRequest>, SwapRepositoryError>;

    /// Compare-and-swap the status from `from` to `to`.
    ///
    /// Returns the updated request, or `None` when the swap's current status
    /// no longer equals `from` (the state guard lost a race or the operation
    /// arrived out of order).
    async fn transition(
        &self,
        swap_id: &Uuid,
        from: SwapStatus,
        to: SwapStatus,
    ) -> Result<Option<SwapRequest>, SwapRepositoryError>;

    /// Complete an accepted swap in one transaction: compare-and-swap
    /// `accepted -> completed`, stamp `completed_date`, and increment both
    /// participants' completed-swap counters. Returns `None` when the state
    /// guard fails; in that case no side effect is applied.
    async fn complete(
        &self,
        swap_id: &Uuid,
        completed_at: DateTime<Utc>,
    ) -> Result<Option<SwapRequest>, SwapRepositoryError>;

    /// Flag that a rating now exists for this swap.
    async fn mark_rated(&self, swap_id: &Uuid) -> Result<(), SwapRepositoryError>;

    /// List the user's swap requests, newest first.
    async fn list_for_user(
        &self,
        user_id: &UserId,
        filter: SwapFilter,
        page: PageRequest,
    ) -> Result<Page<SwapRequest>, SwapRepositoryError>;
}

/// Fixture implementation for tests that do not exercise swap persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSwapRepository;

#[async_trait]
impl SwapRepository for FixtureSwapRepository {
    async fn insert(&self, _swap: &SwapRequest) -> Result<(), SwapRepositoryError> {
        Ok(())
    }

    async fn find_by_id(
        &self,
        _swap_id: &Uuid,
    ) -> Result<Option<SwapRequest>, SwapRepositoryError> {
        Ok(None)
    }

    async fn find_pending_between(
        &self,
        _a: &UserId,
        _b: &UserId,
    ) -> Result<Option<SwapRequest>, SwapRepositoryError> {
        Ok(None)
    }

    async fn transition(
        &self,
        _swap_id: &Uuid,
        _from: SwapStatus,
        _to: SwapStatus,
    ) -> Result<Option<SwapRequest>, SwapRepositoryError> {
        Ok(None)
    }

    async fn complete(
        &self,
        _swap_id: &Uuid,
        _completed_at: DateTime<Utc>,
    ) -> Result<Option<SwapRequest>, SwapRepositoryError> {
        Ok(None)
    }

    async fn mark_rated(&self, _swap_id: &Uuid) -> Result<(), SwapRepositoryError> {
        Ok(())
    }

    async fn list_for_user(
        &self,
        _user_id: &UserId,
        _filter: SwapFilter,
        page: PageRequest,
    ) -> Result<Page<SwapRequest>, SwapRepositoryError> {
        Ok(Page::empty(page))
    }
}
