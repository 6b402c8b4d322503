//! Skill value types: the live skills users list and the snapshots embedded
//! in swap requests and ratings.
//!
//! A [`Skill`] belongs to exactly one user list (offered or wanted). A
//! [`SkillSnapshot`] is a frozen copy taken when a swap request or rating is
//! created, so later edits to the live list do not rewrite history.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Maximum length of a skill name.
pub const SKILL_NAME_MAX: usize = 50;
/// Maximum length of a skill description.
pub const SKILL_DESCRIPTION_MAX: usize = 500;

/// Validation errors returned by [`Skill::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillValidationError {
    /// The skill name was empty.
    EmptyName,
    /// The skill name exceeded the maximum length.
    NameTooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The skill description was empty.
    EmptyDescription,
    /// The skill description exceeded the maximum length.
    DescriptionTooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

impl fmt::Display for SkillValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "skill name must not be empty"),
            Self::NameTooLong { max } => {
                write!(f, "skill name must be at most {max} characters")
            }
            Self::EmptyDescription => write!(f, "skill description must not be empty"),
            Self::DescriptionTooLong { max } => {
                write!(f, "skill description must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for SkillValidationError {}

/// Proficiency level attached to a skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    /// Beginner proficiency.
    Beginner,
    /// Intermediate proficiency.
    Intermediate,
    /// Advanced proficiency.
    Advanced,
    /// Expert proficiency.
    Expert,
}

impl SkillLevel {
    /// Stable lowercase identifier used on the wire and in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Expert => "expert",
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown skill level identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown skill level: {0}")]
pub struct ParseSkillLevelError(String);

impl FromStr for SkillLevel {
    type Err = ParseSkillLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            "expert" => Ok(Self::Expert),
            other => Err(ParseSkillLevelError(other.to_owned())),
        }
    }
}

/// A skill listed on a user profile.
///
/// ## Invariants
/// - `name` is non-empty, trimmed, at most [`SKILL_NAME_MAX`] characters.
/// - `description` is non-empty, trimmed, at most [`SKILL_DESCRIPTION_MAX`]
///   characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "SkillDto", into = "SkillDto")]
pub struct Skill {
    name: String,
    description: String,
    level: SkillLevel,
}

impl Skill {
    /// Validate and construct a new [`Skill`].
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        level: SkillLevel,
    ) -> Result<Self, SkillValidationError> {
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(SkillValidationError::EmptyName);
        }
        if name.chars().count() > SKILL_NAME_MAX {
            return Err(SkillValidationError::NameTooLong {
                max: SKILL_NAME_MAX,
            });
        }

        let description = description.into().trim().to_owned();
        if description.is_empty() {
            return Err(SkillValidationError::EmptyDescription);
        }
        if description.chars().count() > SKILL_DESCRIPTION_MAX {
            return Err(SkillValidationError::DescriptionTooLong {
                max: SKILL_DESCRIPTION_MAX,
            });
        }

        Ok(Self {
            name,
            description,
            level,
        })
    }

    /// Skill name as listed by the user.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Free-text description of the skill.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Proficiency level.
    #[must_use]
    pub const fn level(&self) -> SkillLevel {
        self.level
    }

    /// Case-insensitive name comparison used for list uniqueness and swap
    /// precondition checks.
    #[must_use]
    pub fn name_matches(&self, other: &str) -> bool {
        self.name.eq_ignore_ascii_case(other.trim())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SkillDto {
    name: String,
    description: String,
    level: SkillLevel,
}

impl From<Skill> for SkillDto {
    fn from(value: Skill) -> Self {
        Self {
            name: value.name,
            description: value.description,
            level: value.level,
        }
    }
}

impl TryFrom<SkillDto> for Skill {
    type Error = SkillValidationError;

    fn try_from(value: SkillDto) -> Result<Self, Self::Error> {
        Skill::new(value.name, value.description, value.level)
    }
}

/// Frozen copy of a skill embedded in a swap request or rating.
///
/// Snapshots are copies of already-validated skills, so they deserialise
/// without re-validation; the description is omitted on rating snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillSnapshot {
    /// Skill name at snapshot time.
    pub name: String,
    /// Skill description at snapshot time, absent on rating snapshots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Proficiency level at snapshot time.
    pub level: SkillLevel,
}

impl SkillSnapshot {
    /// Snapshot without the description, as embedded in ratings.
    #[must_use]
    pub fn without_description(&self) -> Self {
        Self {
            name: self.name.clone(),
            description: None,
            level: self.level,
        }
    }
}

impl From<&Skill> for SkillSnapshot {
    fn from(skill: &Skill) -> Self {
        Self {
            name: skill.name.clone(),
            description: Some(skill.description.clone()),
            level: skill.level,
        }
    }
}
