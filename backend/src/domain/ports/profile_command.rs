//! Driving port for profile and skill-list commands.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::skill::Skill;
use crate::domain::user::{ProfileUpdate, SkillSide, User, UserId};

/// Request payload for a partial profile update.
#[derive(Debug, Clone)]
pub struct UpdateProfileRequest {
    /// Authenticated user whose profile is updated.
    pub acting_user: UserId,
    /// Fields to change; unset fields keep their current value.
    pub update: ProfileUpdate,
}

/// Request payload for listing a new skill.
#[derive(Debug, Clone)]
pub struct AddSkillRequest {
    /// Authenticated user whose list is extended.
    pub acting_user: UserId,
    /// Which list the skill joins.
    pub side: SkillSide,
    /// The validated skill to add.
    pub skill: Skill,
}

/// Request payload for removing a listed skill by name.
#[derive(Debug, Clone)]
pub struct RemoveSkillRequest {
    /// Authenticated user whose list shrinks.
    pub acting_user: UserId,
    /// Which list the skill leaves.
    pub side: SkillSide,
    /// Case-insensitive name of the skill to remove.
    pub name: String,
}

/// Write operations on the acting user's own profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileCommand: Send + Sync {
    /// Apply a partial profile update and return the stored user.
    async fn update_profile(&self, request: UpdateProfileRequest) -> Result<User, Error>;

    /// Add a skill to one of the user's lists; duplicate names (compared
    /// case-insensitively, per side) are rejected.
    async fn add_skill(&self, request: AddSkillRequest) -> Result<User, Error>;

    /// Remove a skill from one of the user's lists.
    async fn remove_skill(&self, request: RemoveSkillRequest) -> Result<User, Error>;
}
