//! Swap lifecycle domain services.
//!
//! `SwapCommandService` owns the state machine: it resolves every operation
//! through the central transition table, authorises the actor, and delegates
//! the actual status change to the repository's compare-and-swap so
//! concurrent operations on the same request are serialised by the store.
//! `SwapQueryService` covers participant-scoped reads.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use uuid::Uuid;

use crate::domain::audit::{AuditAction, AuditRecord};
use crate::domain::error::Error;
use crate::domain::pagination::Page;
use crate::domain::ports::{
    AuditLog, CreateSwapRequest, ListSwapsRequest, SwapActionRequest, SwapCommand, SwapQuery,
    SwapRepository, SwapRepositoryError, UserRepository, UserRepositoryError, record_best_effort,
};
use crate::domain::swap::{SwapAction, SwapDraft, SwapRequest, SwapStatus};
use crate::domain::user::{User, UserId};

const PENDING_EXISTS: &str =
    "there is already a pending swap request between you and this user";

fn map_swap_repository_error(error: SwapRepositoryError) -> Error {
    match error {
        SwapRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("swap repository unavailable: {message}"))
        }
        SwapRepositoryError::Query { message } => {
            Error::internal(format!("swap repository error: {message}"))
        }
        // The storage-level pair guard lost a create race; same outcome as
        // the precondition check.
        SwapRepositoryError::DuplicatePending { .. } => Error::invalid_request(PENDING_EXISTS),
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

fn swap_not_found(swap_id: Uuid) -> Error {
    Error::not_found(format!("swap request {swap_id} not found"))
}

fn wrong_state_error(action: SwapAction) -> Error {
    match action {
        SwapAction::Accept | SwapAction::Reject | SwapAction::Cancel => {
            Error::invalid_state("swap request is no longer pending")
        }
        SwapAction::Complete => {
            Error::invalid_state("swap request must be accepted before it can be completed")
        }
    }
}

fn authorize(action: SwapAction, swap: &SwapRequest, actor: &UserId) -> Result<(), Error> {
    match action {
        SwapAction::Accept | SwapAction::Reject => {
            if swap.recipient() == actor {
                Ok(())
            } else {
                Err(Error::forbidden(format!(
                    "only the recipient can {action} a swap request"
                )))
            }
        }
        SwapAction::Cancel => {
            if swap.requester() == actor {
                Ok(())
            } else {
                Err(Error::forbidden(
                    "only the requester can cancel a swap request",
                ))
            }
        }
        SwapAction::Complete => {
            if swap.involves(actor) {
                Ok(())
            } else {
                Err(Error::forbidden(
                    "only swap participants can complete a swap request",
                ))
            }
        }
    }
}

const fn audit_action_for(action: SwapAction) -> AuditAction {
    match action {
        SwapAction::Accept => AuditAction::SwapRequestAccepted,
        SwapAction::Reject => AuditAction::SwapRequestRejected,
        SwapAction::Cancel => AuditAction::SwapRequestCancelled,
        SwapAction::Complete => AuditAction::SwapCompleted,
    }
}

/// Swap lifecycle service implementing the command driving port.
#[derive(Clone)]
pub struct SwapCommandService<S, U, A> {
    swaps: Arc<S>,
    users: Arc<U>,
    audit: Arc<A>,
    clock: Arc<dyn Clock>,
}

impl<S, U, A> SwapCommandService<S, U, A> {
    /// Create a new command service over the swap and user repositories.
    pub fn new(swaps: Arc<S>, users: Arc<U>, audit: Arc<A>, clock: Arc<dyn Clock>) -> Self {
        Self {
            swaps,
            users,
            audit,
            clock,
        }
    }
}

impl<S, U, A> SwapCommandService<S, U, A>
where
    S: SwapRepository,
    U: UserRepository,
    A: AuditLog,
{
    async fn load_swap(&self, swap_id: Uuid) -> Result<SwapRequest, Error> {
        self.swaps
            .find_by_id(&swap_id)
            .await
            .map_err(map_swap_repository_error)?
            .ok_or_else(|| swap_not_found(swap_id))
    }

    async fn load_user(&self, user_id: UserId, missing: &str) -> Result<User, Error> {
        self.users
            .find_by_id(&user_id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::not_found(missing))
    }

    /// Shared accept/reject/cancel/complete flow.
    ///
    /// The pre-read gives precise authorisation and state errors; the
    /// repository call re-evaluates the state guard under the same atomic
    /// update as the write, so a race lost between read and write still
    /// surfaces as an invalid-state failure rather than a double transition.
    async fn run_transition(
        &self,
        action: SwapAction,
        request: SwapActionRequest,
    ) -> Result<SwapRequest, Error> {
        let SwapActionRequest {
            swap_id,
            acting_user,
        } = request;

        let swap = self.load_swap(swap_id).await?;
        authorize(action, &swap, &acting_user)?;

        let (from, to) = action.edge();
        if swap.status() != from {
            return Err(wrong_state_error(action));
        }

        let updated = match action {
            SwapAction::Complete => self.swaps.complete(&swap_id, self.clock.utc()).await,
            _ => self.swaps.transition(&swap_id, from, to).await,
        }
        .map_err(map_swap_repository_error)?
        .ok_or_else(|| wrong_state_error(action))?;

        let target_user = updated
            .other_participant(&acting_user)
            .unwrap_or_else(|| *updated.recipient());
        record_best_effort(
            self.audit.as_ref(),
            AuditRecord::new(acting_user, audit_action_for(action))
                .with_target_user(target_user)
                .with_target_swap(swap_id)
                .with_details(json!({
                    "requestedSkill": updated.requested_skill().name,
                    "offeredSkill": updated.offered_skill().name,
                })),
        )
        .await;

        Ok(updated)
    }
}

#[async_trait]
impl<S, U, A> SwapCommand for SwapCommandService<S, U, A>
where
    S: SwapRepository,
    U: UserRepository,
    A: AuditLog,
{
    async fn create(&self, request: CreateSwapRequest) -> Result<SwapRequest, Error> {
        let CreateSwapRequest {
            requester,
            recipient,
            requested_skill,
            offered_skill,
            message,
            scheduled_date,
        } = request;

        if requester == recipient {
            return Err(Error::invalid_request(
                "you cannot send a swap request to yourself",
            ));
        }

        let recipient_user = self.load_user(recipient, "recipient not found").await?;
        if recipient_user.is_banned() {
            return Err(Error::invalid_request(
                "cannot send swap request to banned user",
            ));
        }

        let requested = recipient_user
            .find_offered_skill(&requested_skill)
            .ok_or_else(|| {
                Error::invalid_request("recipient does not offer the requested skill")
            })?;

        let requester_user = self.load_user(requester, "requester not found").await?;
        let offered = requester_user
            .find_offered_skill(&offered_skill)
            .ok_or_else(|| {
                Error::invalid_request("you do not offer the skill you are trying to swap")
            })?;

        let existing = self
            .swaps
            .find_pending_between(&requester, &recipient)
            .await
            .map_err(map_swap_repository_error)?;
        if existing.is_some() {
            return Err(Error::invalid_request(PENDING_EXISTS));
        }

        let swap = SwapRequest::new(SwapDraft {
            id: Uuid::new_v4(),
            requester,
            recipient,
            requested_skill: requested.into(),
            offered_skill: offered.into(),
            status: SwapStatus::Pending,
            message,
            scheduled_date,
            completed_date: None,
            is_rated: false,
            created_at: self.clock.utc(),
        })
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.swaps
            .insert(&swap)
            .await
            .map_err(map_swap_repository_error)?;

        record_best_effort(
            self.audit.as_ref(),
            AuditRecord::new(requester, AuditAction::SwapRequestCreated)
                .with_target_user(recipient)
                .with_target_swap(swap.id())
                .with_details(json!({
                    "requestedSkill": swap.requested_skill().name,
                    "offeredSkill": swap.offered_skill().name,
                })),
        )
        .await;

        Ok(swap)
    }

    async fn accept(&self, request: SwapActionRequest) -> Result<SwapRequest, Error> {
        self.run_transition(SwapAction::Accept, request).await
    }

    async fn reject(&self, request: SwapActionRequest) -> Result<SwapRequest, Error> {
        self.run_transition(SwapAction::Reject, request).await
    }

    async fn cancel(&self, request: SwapActionRequest) -> Result<SwapRequest, Error> {
        self.run_transition(SwapAction::Cancel, request).await
    }

    async fn complete(&self, request: SwapActionRequest) -> Result<SwapRequest, Error> {
        self.run_transition(SwapAction::Complete, request).await
    }
}

/// Swap lifecycle service implementing the query driving port.
#[derive(Clone)]
pub struct SwapQueryService<S> {
    swaps: Arc<S>,
}

impl<S> SwapQueryService<S> {
    /// Create a new query service over the swap repository.
    pub fn new(swaps: Arc<S>) -> Self {
        Self { swaps }
    }
}

#[async_trait]
impl<S> SwapQuery for SwapQueryService<S>
where
    S: SwapRepository,
{
    async fn get(&self, swap_id: Uuid, acting_user: UserId) -> Result<SwapRequest, Error> {
        let swap = self
            .swaps
            .find_by_id(&swap_id)
            .await
            .map_err(map_swap_repository_error)?
            .ok_or_else(|| swap_not_found(swap_id))?;

        if !swap.involves(&acting_user) {
            return Err(Error::forbidden("access denied"));
        }
        Ok(swap)
    }

    async fn list(&self, request: ListSwapsRequest) -> Result<Page<SwapRequest>, Error> {
        let ListSwapsRequest {
            acting_user,
            filter,
            page,
        } = request;
        self.swaps
            .list_for_user(&acting_user, filter, page)
            .await
            .map_err(map_swap_repository_error)
    }
}

#[cfg(test)]
#[path = "swap_service_tests.rs"]
mod tests;
