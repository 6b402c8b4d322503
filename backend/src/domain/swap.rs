//! Swap request entity and its lifecycle state machine.
//!
//! The lifecycle is an explicit transition table rather than scattered status
//! comparisons: every operation resolves its edge through [`SwapAction::edge`]
//! and [`SwapStatus::apply`], and anything outside the table is rejected.
//!
//! ```text
//! pending ──accept──▶ accepted ──complete──▶ completed
//!    │ ├────reject──▶ rejected
//!    └─┴────cancel──▶ cancelled
//! ```
//!
//! `rejected`, `cancelled`, and `completed` are terminal.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::skill::SkillSnapshot;
use crate::domain::user::UserId;

/// Maximum length of the optional message attached to a swap request.
pub const SWAP_MESSAGE_MAX: usize = 1000;

/// Lifecycle status of a swap request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapStatus {
    /// Awaiting a response from the recipient.
    Pending,
    /// Accepted by the recipient.
    Accepted,
    /// Rejected by the recipient.
    Rejected,
    /// Cancelled by the requester.
    Cancelled,
    /// Completed swap.
    Completed,
}

/// Lifecycle operation requested against a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapAction {
    /// Accept a pending request.
    Accept,
    /// Reject a pending request.
    Reject,
    /// Cancel a pending request.
    Cancel,
    /// Complete an accepted swap.
    Complete,
}

/// The complete set of legal lifecycle edges.
///
/// Every transition in the system must resolve through this table; there is
/// deliberately no other place that encodes a status change.
pub const TRANSITIONS: &[(SwapStatus, SwapAction, SwapStatus)] = &[
    (SwapStatus::Pending, SwapAction::Accept, SwapStatus::Accepted),
    (SwapStatus::Pending, SwapAction::Reject, SwapStatus::Rejected),
    (SwapStatus::Pending, SwapAction::Cancel, SwapStatus::Cancelled),
    (
        SwapStatus::Accepted,
        SwapAction::Complete,
        SwapStatus::Completed,
    ),
];

/// A lifecycle operation was requested from a status with no matching edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot {action} a swap request in status {from}")]
pub struct TransitionError {
    /// Status the swap was in when the operation was attempted.
    pub from: SwapStatus,
    /// The rejected operation.
    pub action: SwapAction,
}

impl SwapStatus {
    /// Stable lowercase identifier used on the wire and in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Whether no further transition is permitted from this status.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        TRANSITIONS.iter().all(|(from, _, _)| *from != self)
    }

    /// Resolve `action` against the transition table.
    pub fn apply(self, action: SwapAction) -> Result<Self, TransitionError> {
        TRANSITIONS
            .iter()
            .find(|(from, table_action, _)| *from == self && *table_action == action)
            .map(|(_, _, to)| *to)
            .ok_or(TransitionError { from: self, action })
    }
}

impl fmt::Display for SwapStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown swap status: {0}")]
pub struct ParseSwapStatusError(String);

impl FromStr for SwapStatus {
    type Err = ParseSwapStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            other => Err(ParseSwapStatusError(other.to_owned())),
        }
    }
}

impl SwapAction {
    /// Stable identifier used in logs and audit details.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
            Self::Cancel => "cancel",
            Self::Complete => "complete",
        }
    }

    /// The single `(from, to)` edge this action occupies in the table.
    ///
    /// Each action appears exactly once in [`TRANSITIONS`]; a test asserts
    /// this mapping stays in lockstep with the table. Services use it to know
    /// which status to compare-and-swap against.
    #[must_use]
    pub const fn edge(self) -> (SwapStatus, SwapStatus) {
        match self {
            Self::Accept => (SwapStatus::Pending, SwapStatus::Accepted),
            Self::Reject => (SwapStatus::Pending, SwapStatus::Rejected),
            Self::Cancel => (SwapStatus::Pending, SwapStatus::Cancelled),
            Self::Complete => (SwapStatus::Accepted, SwapStatus::Completed),
        }
    }
}

impl fmt::Display for SwapAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors returned by [`SwapRequest::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapValidationError {
    /// Requester and recipient were the same user.
    SelfSwap,
    /// The message exceeded the maximum length.
    MessageTooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// A completed date was set on a swap that is not completed.
    CompletedDateWithoutCompletion,
}

impl fmt::Display for SwapValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfSwap => write!(f, "requester and recipient must be different users"),
            Self::MessageTooLong { max } => {
                write!(f, "message must be at most {max} characters")
            }
            Self::CompletedDateWithoutCompletion => {
                write!(f, "completed date is only valid on completed swaps")
            }
        }
    }
}

impl std::error::Error for SwapValidationError {}

/// Unvalidated field bundle for constructing a [`SwapRequest`].
#[derive(Debug, Clone)]
pub struct SwapDraft {
    /// Stable identifier.
    pub id: Uuid,
    /// User who initiated the request.
    pub requester: UserId,
    /// User the request is addressed to.
    pub recipient: UserId,
    /// Snapshot of the recipient's skill the requester wants.
    pub requested_skill: SkillSnapshot,
    /// Snapshot of the requester's skill offered in exchange.
    pub offered_skill: SkillSnapshot,
    /// Lifecycle status.
    pub status: SwapStatus,
    /// Optional free-text message from the requester.
    pub message: Option<String>,
    /// Optional agreed date for the swap.
    pub scheduled_date: Option<DateTime<Utc>>,
    /// Stamped when the swap reaches `completed`.
    pub completed_date: Option<DateTime<Utc>>,
    /// Whether any rating has been submitted against this swap.
    pub is_rated: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A proposed or realised exchange of one user's skill for another's.
///
/// ## Invariants
/// - `requester != recipient`.
/// - `completed_date` is present only when `status == completed`.
/// - Status only ever moves along the edges in [`TRANSITIONS`]; the entity is
///   immutable here and transitions happen through the repository's guarded
///   update.
#[derive(Debug, Clone, PartialEq)]
pub struct SwapRequest {
    id: Uuid,
    requester: UserId,
    recipient: UserId,
    requested_skill: SkillSnapshot,
    offered_skill: SkillSnapshot,
    status: SwapStatus,
    message: Option<String>,
    scheduled_date: Option<DateTime<Utc>>,
    completed_date: Option<DateTime<Utc>>,
    is_rated: bool,
    created_at: DateTime<Utc>,
}

impl SwapRequest {
    /// Build a [`SwapRequest`] from a draft, enforcing entity invariants.
    pub fn new(draft: SwapDraft) -> Result<Self, SwapValidationError> {
        let SwapDraft {
            id,
            requester,
            recipient,
            requested_skill,
            offered_skill,
            status,
            message,
            scheduled_date,
            completed_date,
            is_rated,
            created_at,
        } = draft;

        if requester == recipient {
            return Err(SwapValidationError::SelfSwap);
        }
        if let Some(text) = &message {
            if text.chars().count() > SWAP_MESSAGE_MAX {
                return Err(SwapValidationError::MessageTooLong {
                    max: SWAP_MESSAGE_MAX,
                });
            }
        }
        if completed_date.is_some() && status != SwapStatus::Completed {
            return Err(SwapValidationError::CompletedDateWithoutCompletion);
        }

        Ok(Self {
            id,
            requester,
            recipient,
            requested_skill,
            offered_skill,
            status,
            message,
            scheduled_date,
            completed_date,
            is_rated,
            created_at,
        })
    }

    /// Stable identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// User who initiated the request.
    #[must_use]
    pub const fn requester(&self) -> &UserId {
        &self.requester
    }

    /// User the request is addressed to.
    #[must_use]
    pub const fn recipient(&self) -> &UserId {
        &self.recipient
    }

    /// Snapshot of the recipient's skill the requester wants.
    #[must_use]
    pub const fn requested_skill(&self) -> &SkillSnapshot {
        &self.requested_skill
    }

    /// Snapshot of the requester's skill offered in exchange.
    #[must_use]
    pub const fn offered_skill(&self) -> &SkillSnapshot {
        &self.offered_skill
    }

    /// Lifecycle status.
    #[must_use]
    pub const fn status(&self) -> SwapStatus {
        self.status
    }

    /// Optional free-text message from the requester.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Optional agreed date for the swap.
    #[must_use]
    pub const fn scheduled_date(&self) -> Option<DateTime<Utc>> {
        self.scheduled_date
    }

    /// Completion timestamp, set only on completed swaps.
    #[must_use]
    pub const fn completed_date(&self) -> Option<DateTime<Utc>> {
        self.completed_date
    }

    /// Whether any rating has been submitted against this swap.
    #[must_use]
    pub const fn is_rated(&self) -> bool {
        self.is_rated
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether `user` is the requester or the recipient.
    #[must_use]
    pub fn involves(&self, user: &UserId) -> bool {
        self.requester == *user || self.recipient == *user
    }

    /// The other participant relative to `user`, if `user` participates.
    #[must_use]
    pub fn other_participant(&self, user: &UserId) -> Option<UserId> {
        if self.requester == *user {
            Some(self.recipient)
        } else if self.recipient == *user {
            Some(self.requester)
        } else {
            None
        }
    }
}
