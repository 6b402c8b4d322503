//! Response body types shared by the HTTP handlers.
//!
//! Domain entities stay transport-agnostic; these DTOs fix the camelCase wire
//! shape and the RFC 3339 timestamp format.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::pagination::Page;
use crate::domain::rating::Rating;
use crate::domain::skill::{Skill, SkillSnapshot};
use crate::domain::swap::SwapRequest;
use crate::domain::user::User;

/// Pagination envelope attached to list responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationBody {
    /// 1-based page number.
    pub current_page: u32,
    /// Total number of pages.
    pub total_pages: u64,
    /// Total matching records across all pages.
    pub total_items: u64,
    /// Whether a later page exists.
    pub has_next_page: bool,
    /// Whether an earlier page exists.
    pub has_prev_page: bool,
}

impl<T> From<&Page<T>> for PaginationBody {
    fn from(page: &Page<T>) -> Self {
        Self {
            current_page: page.request.page(),
            total_pages: page.total_pages(),
            total_items: page.total,
            has_next_page: page.has_next(),
            has_prev_page: page.has_prev(),
        }
    }
}

/// A skill as listed on a profile.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SkillBody {
    /// Skill name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Proficiency level.
    pub level: String,
}

impl From<&Skill> for SkillBody {
    fn from(skill: &Skill) -> Self {
        Self {
            name: skill.name().to_owned(),
            description: skill.description().to_owned(),
            level: skill.level().to_string(),
        }
    }
}

/// A frozen skill copy embedded in a swap or rating.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SkillSnapshotBody {
    /// Skill name at snapshot time.
    pub name: String,
    /// Description at snapshot time, absent on rating snapshots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Proficiency level at snapshot time.
    pub level: String,
}

impl From<&SkillSnapshot> for SkillSnapshotBody {
    fn from(snapshot: &SkillSnapshot) -> Self {
        Self {
            name: snapshot.name.clone(),
            description: snapshot.description.clone(),
            level: snapshot.level.to_string(),
        }
    }
}

/// Public view of a user profile.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserBody {
    /// Stable identifier.
    #[schema(format = "uuid")]
    pub id: String,
    /// Display name.
    pub display_name: String,
    /// Free-text location.
    pub location: String,
    /// Availability window.
    pub availability: String,
    /// Skills the user offers.
    pub skills_offered: Vec<SkillBody>,
    /// Skills the user wants.
    pub skills_wanted: Vec<SkillBody>,
    /// Whether the profile is listed publicly.
    pub is_profile_public: bool,
    /// Mean of all ratings about the user, one decimal.
    pub average_rating: f64,
    /// Number of ratings about the user.
    pub total_ratings: u32,
    /// Number of swaps the user has completed.
    pub completed_swaps: u32,
}

impl From<&User> for UserBody {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            display_name: user.display_name().to_string(),
            location: user.location().to_string(),
            availability: user.availability().to_string(),
            skills_offered: user.skills_offered().iter().map(SkillBody::from).collect(),
            skills_wanted: user.skills_wanted().iter().map(SkillBody::from).collect(),
            is_profile_public: user.is_profile_public(),
            average_rating: user.rating_stats().average(),
            total_ratings: user.rating_stats().total(),
            completed_swaps: user.completed_swaps(),
        }
    }
}

/// Moderation view of a user, exposing the ban state.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModeratedUserBody {
    /// Stable identifier.
    #[schema(format = "uuid")]
    pub id: String,
    /// Display name.
    pub display_name: String,
    /// Whether the user is banned.
    pub is_banned: bool,
    /// Reason recorded when the ban was applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ban_reason: Option<String>,
}

impl From<&User> for ModeratedUserBody {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            display_name: user.display_name().to_string(),
            is_banned: user.is_banned(),
            ban_reason: user.ban_reason().map(str::to_owned),
        }
    }
}

/// A swap request with its lifecycle state.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SwapBody {
    /// Stable identifier.
    #[schema(format = "uuid")]
    pub id: String,
    /// User who initiated the request.
    #[schema(format = "uuid")]
    pub requester_id: String,
    /// User the request is addressed to.
    #[schema(format = "uuid")]
    pub recipient_id: String,
    /// Snapshot of the recipient's skill being requested.
    pub requested_skill: SkillSnapshotBody,
    /// Snapshot of the requester's skill offered in exchange.
    pub offered_skill: SkillSnapshotBody,
    /// Lifecycle status.
    pub status: String,
    /// Optional message from the requester.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Optional agreed date.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(format = "date-time")]
    pub scheduled_date: Option<String>,
    /// Completion timestamp, present only on completed swaps.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(format = "date-time")]
    pub completed_date: Option<String>,
    /// Whether any rating exists for this swap.
    pub is_rated: bool,
    /// Creation timestamp.
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<&SwapRequest> for SwapBody {
    fn from(swap: &SwapRequest) -> Self {
        Self {
            id: swap.id().to_string(),
            requester_id: swap.requester().to_string(),
            recipient_id: swap.recipient().to_string(),
            requested_skill: swap.requested_skill().into(),
            offered_skill: swap.offered_skill().into(),
            status: swap.status().to_string(),
            message: swap.message().map(str::to_owned),
            scheduled_date: swap.scheduled_date().map(|date| date.to_rfc3339()),
            completed_date: swap.completed_date().map(|date| date.to_rfc3339()),
            is_rated: swap.is_rated(),
            created_at: swap.created_at().to_rfc3339(),
        }
    }
}

/// A rating submitted against a completed swap.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingBody {
    /// Stable identifier.
    #[schema(format = "uuid")]
    pub id: String,
    /// The rated swap.
    #[schema(format = "uuid")]
    pub swap_request_id: String,
    /// User who submitted the rating.
    #[schema(format = "uuid")]
    pub rater_id: String,
    /// User the rating is about.
    #[schema(format = "uuid")]
    pub rated_user_id: String,
    /// Score between 1 and 5.
    pub rating: u8,
    /// Optional free-text comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Snapshot of the skill the rated user provided.
    pub skill_rated: SkillSnapshotBody,
    /// Creation timestamp.
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<&Rating> for RatingBody {
    fn from(rating: &Rating) -> Self {
        Self {
            id: rating.id().to_string(),
            swap_request_id: rating.swap_request_id().to_string(),
            rater_id: rating.rater().to_string(),
            rated_user_id: rating.rated_user().to_string(),
            rating: rating.score().value(),
            comment: rating.comment().map(str::to_owned),
            skill_rated: rating.skill_rated().into(),
            created_at: rating.created_at().to_rfc3339(),
        }
    }
}
