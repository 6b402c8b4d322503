//! Structured audit records emitted after successful state changes.
//!
//! Audit persistence is best-effort: services log a warning when the audit
//! collaborator fails and never propagate that failure to the caller.

use std::fmt;

use serde_json::Value;
use uuid::Uuid;

use crate::domain::user::UserId;

/// Kind of state change being audited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AuditAction {
    /// A swap request was created.
    SwapRequestCreated,
    /// A swap request was accepted.
    SwapRequestAccepted,
    /// A swap request was rejected.
    SwapRequestRejected,
    /// A swap request was cancelled.
    SwapRequestCancelled,
    /// A swap was completed.
    SwapCompleted,
    /// A rating was given.
    RatingGiven,
    /// A user profile was updated.
    ProfileUpdated,
    /// A skill was added to a profile.
    SkillAdded,
    /// A skill was removed from a profile.
    SkillRemoved,
    /// A user was banned.
    UserBanned,
    /// A user was unbanned.
    UserUnbanned,
}

impl AuditAction {
    /// Stable snake_case identifier stored with each record.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SwapRequestCreated => "swap_request_created",
            Self::SwapRequestAccepted => "swap_request_accepted",
            Self::SwapRequestRejected => "swap_request_rejected",
            Self::SwapRequestCancelled => "swap_request_cancelled",
            Self::SwapCompleted => "swap_completed",
            Self::RatingGiven => "rating_given",
            Self::ProfileUpdated => "profile_updated",
            Self::SkillAdded => "skill_added",
            Self::SkillRemoved => "skill_removed",
            Self::UserBanned => "user_banned",
            Self::UserUnbanned => "user_unbanned",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structured record per audited state change.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRecord {
    /// User who performed the action.
    pub actor: UserId,
    /// Kind of state change.
    pub action: AuditAction,
    /// User affected by the action, when there is one.
    pub target_user: Option<UserId>,
    /// Swap affected by the action, when there is one.
    pub target_swap: Option<Uuid>,
    /// Free-form structured context, e.g. the skill names involved.
    pub details: Value,
}

impl AuditRecord {
    /// Start a record with no target or details.
    #[must_use]
    pub const fn new(actor: UserId, action: AuditAction) -> Self {
        Self {
            actor,
            action,
            target_user: None,
            target_swap: None,
            details: Value::Null,
        }
    }

    /// Attach the affected user.
    #[must_use]
    pub const fn with_target_user(mut self, user: UserId) -> Self {
        self.target_user = Some(user);
        self
    }

    /// Attach the affected swap.
    #[must_use]
    pub const fn with_target_swap(mut self, swap: Uuid) -> Self {
        self.target_swap = Some(swap);
        self
    }

    /// Attach structured context.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }
}
