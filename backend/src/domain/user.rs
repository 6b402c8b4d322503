//! User aggregate: identity, profile, skill lists, and derived statistics.
//!
//! The aggregate owns both skill lists and enforces case-insensitive name
//! uniqueness within each side. Rating statistics are derived state: they are
//! only ever overwritten with a full recompute (see
//! [`crate::domain::RatingStats`]), never edited in place.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use uuid::Uuid;

use crate::domain::rating::RatingStats;
use crate::domain::skill::Skill;

/// Maximum length of a display name.
pub const DISPLAY_NAME_MAX: usize = 50;
/// Maximum length of a location.
pub const LOCATION_MAX: usize = 100;

/// Validation errors for user identity and profile fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// The user id was empty.
    EmptyId,
    /// The user id was not a valid UUID.
    InvalidId,
    /// The display name was empty.
    EmptyDisplayName,
    /// The display name exceeded the maximum length.
    DisplayNameTooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The display name contained disallowed characters.
    DisplayNameInvalidCharacters,
    /// The location was empty.
    EmptyLocation,
    /// The location exceeded the maximum length.
    LocationTooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// A skill appeared more than once on the same side.
    DuplicateSkill {
        /// Which side of the profile the duplicate was on.
        side: SkillSide,
        /// Name of the duplicated skill.
        name: String,
    },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyDisplayName => write!(f, "display name must not be empty"),
            Self::DisplayNameTooLong { max } => {
                write!(f, "display name must be at most {max} characters")
            }
            Self::DisplayNameInvalidCharacters => write!(
                f,
                "display name may only contain letters, numbers, spaces, hyphens, or apostrophes",
            ),
            Self::EmptyLocation => write!(f, "location must not be empty"),
            Self::LocationTooLong { max } => {
                write!(f, "location must be at most {max} characters")
            }
            Self::DuplicateSkill { side, name } => {
                write!(f, "skill {name:?} is already listed under {side} skills")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Wrap an existing UUID, e.g. one read back from storage.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random [`UserId`].
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human readable display name for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

static DISPLAY_NAME_RE: OnceLock<Regex> = OnceLock::new();

fn display_name_regex() -> &'static Regex {
    DISPLAY_NAME_RE.get_or_init(|| {
        // Length is enforced separately; this regex constrains allowed characters.
        let pattern = "^[A-Za-z0-9_' -]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("display name regex failed to compile: {error}"))
    })
}

impl DisplayName {
    /// Validate and construct a [`DisplayName`].
    pub fn new(display_name: impl Into<String>) -> Result<Self, UserValidationError> {
        let display_name = display_name.into().trim().to_owned();
        if display_name.is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        if display_name.chars().count() > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        if !display_name_regex().is_match(&display_name) {
            return Err(UserValidationError::DisplayNameInvalidCharacters);
        }
        Ok(Self(display_name))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Free-text user location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location(String);

impl Location {
    /// Validate and construct a [`Location`].
    pub fn new(location: impl Into<String>) -> Result<Self, UserValidationError> {
        let location = location.into().trim().to_owned();
        if location.is_empty() {
            return Err(UserValidationError::EmptyLocation);
        }
        if location.chars().count() > LOCATION_MAX {
            return Err(UserValidationError::LocationTooLong { max: LOCATION_MAX });
        }
        Ok(Self(location))
    }
}

impl AsRef<str> for Location {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// When the user is available for swaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// Available on weekdays.
    Weekdays,
    /// Available on weekends.
    Weekends,
    /// Available in the evenings.
    Evenings,
    /// Available at flexible times.
    Flexible,
    /// Not currently available.
    NotAvailable,
}

impl Availability {
    /// Stable identifier used on the wire and in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weekdays => "weekdays",
            Self::Weekends => "weekends",
            Self::Evenings => "evenings",
            Self::Flexible => "flexible",
            Self::NotAvailable => "not-available",
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown availability identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown availability: {0}")]
pub struct ParseAvailabilityError(String);

impl FromStr for Availability {
    type Err = ParseAvailabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekdays" => Ok(Self::Weekdays),
            "weekends" => Ok(Self::Weekends),
            "evenings" => Ok(Self::Evenings),
            "flexible" => Ok(Self::Flexible),
            "not-available" => Ok(Self::NotAvailable),
            other => Err(ParseAvailabilityError(other.to_owned())),
        }
    }
}

/// Role gating moderation endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Ordinary user without moderation privileges.
    User,
    /// Administrator with moderation privileges.
    Admin,
}

impl Role {
    /// Stable identifier used in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(ParseRoleError(other.to_owned())),
        }
    }
}

/// Which of the user's two skill lists an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillSide {
    Offered,
    Wanted,
}

impl SkillSide {
    /// Stable identifier used in routes and audit details.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Offered => "offered",
            Self::Wanted => "wanted",
        }
    }
}

impl fmt::Display for SkillSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown skill side identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown skill side: {0}")]
pub struct ParseSkillSideError(String);

impl FromStr for SkillSide {
    type Err = ParseSkillSideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "offered" => Ok(Self::Offered),
            "wanted" => Ok(Self::Wanted),
            other => Err(ParseSkillSideError(other.to_owned())),
        }
    }
}

/// Unvalidated field bundle for constructing a [`User`].
#[derive(Debug, Clone)]
pub struct UserDraft {
    /// Stable identifier.
    pub id: UserId,
    /// Display name shown to other users.
    pub display_name: DisplayName,
    /// Free-text location.
    pub location: Location,
    /// Availability window.
    pub availability: Availability,
    /// Skills the user offers; must be unique by name (case-insensitive).
    pub skills_offered: Vec<Skill>,
    /// Skills the user wants; must be unique by name (case-insensitive).
    pub skills_wanted: Vec<Skill>,
    /// Whether the profile is listed publicly.
    pub is_profile_public: bool,
    /// Moderation role.
    pub role: Role,
    /// Whether the user is banned from initiating or receiving swaps.
    pub is_banned: bool,
    /// Reason recorded when the ban was applied.
    pub ban_reason: Option<String>,
    /// Derived rating statistics, always a full recompute.
    pub rating_stats: RatingStats,
    /// Number of swaps the user has completed.
    pub completed_swaps: u32,
}

/// Application user.
///
/// ## Invariants
/// - Skill names are unique within each side, compared case-insensitively.
/// - `rating_stats` mirrors the user's full rating set; it is replaced
///   wholesale after every rating mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    display_name: DisplayName,
    location: Location,
    availability: Availability,
    skills_offered: Vec<Skill>,
    skills_wanted: Vec<Skill>,
    is_profile_public: bool,
    role: Role,
    is_banned: bool,
    ban_reason: Option<String>,
    rating_stats: RatingStats,
    completed_swaps: u32,
}

fn find_duplicate(skills: &[Skill]) -> Option<&Skill> {
    skills.iter().enumerate().find_map(|(index, skill)| {
        skills
            .iter()
            .take(index)
            .find(|earlier| earlier.name_matches(skill.name()))
    })
}

impl User {
    /// Build a [`User`] from a draft, enforcing per-side skill uniqueness.
    pub fn new(draft: UserDraft) -> Result<Self, UserValidationError> {
        let UserDraft {
            id,
            display_name,
            location,
            availability,
            skills_offered,
            skills_wanted,
            is_profile_public,
            role,
            is_banned,
            ban_reason,
            rating_stats,
            completed_swaps,
        } = draft;

        if let Some(skill) = find_duplicate(&skills_offered) {
            return Err(UserValidationError::DuplicateSkill {
                side: SkillSide::Offered,
                name: skill.name().to_owned(),
            });
        }
        if let Some(skill) = find_duplicate(&skills_wanted) {
            return Err(UserValidationError::DuplicateSkill {
                side: SkillSide::Wanted,
                name: skill.name().to_owned(),
            });
        }

        Ok(Self {
            id,
            display_name,
            location,
            availability,
            skills_offered,
            skills_wanted,
            is_profile_public,
            role,
            is_banned,
            ban_reason,
            rating_stats,
            completed_swaps,
        })
    }

    /// Stable user identifier.
    #[must_use]
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// Display name shown to other users.
    #[must_use]
    pub const fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Free-text location.
    #[must_use]
    pub const fn location(&self) -> &Location {
        &self.location
    }

    /// Availability window.
    #[must_use]
    pub const fn availability(&self) -> Availability {
        self.availability
    }

    /// Skills the user offers.
    #[must_use]
    pub fn skills_offered(&self) -> &[Skill] {
        &self.skills_offered
    }

    /// Skills the user wants.
    #[must_use]
    pub fn skills_wanted(&self) -> &[Skill] {
        &self.skills_wanted
    }

    /// Whether the profile is listed publicly.
    #[must_use]
    pub const fn is_profile_public(&self) -> bool {
        self.is_profile_public
    }

    /// Moderation role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Whether the user is banned.
    #[must_use]
    pub const fn is_banned(&self) -> bool {
        self.is_banned
    }

    /// Reason recorded when the ban was applied.
    #[must_use]
    pub fn ban_reason(&self) -> Option<&str> {
        self.ban_reason.as_deref()
    }

    /// Derived rating statistics.
    #[must_use]
    pub const fn rating_stats(&self) -> RatingStats {
        self.rating_stats
    }

    /// Number of swaps the user has completed.
    #[must_use]
    pub const fn completed_swaps(&self) -> u32 {
        self.completed_swaps
    }

    /// The skill list for `side`.
    #[must_use]
    pub fn skills(&self, side: SkillSide) -> &[Skill] {
        match side {
            SkillSide::Offered => &self.skills_offered,
            SkillSide::Wanted => &self.skills_wanted,
        }
    }

    /// Find an offered skill by case-insensitive name.
    #[must_use]
    pub fn find_offered_skill(&self, name: &str) -> Option<&Skill> {
        self.skills_offered
            .iter()
            .find(|skill| skill.name_matches(name))
    }

    /// Append a skill to `side`, rejecting case-insensitive duplicates.
    pub fn add_skill(&mut self, side: SkillSide, skill: Skill) -> Result<(), UserValidationError> {
        let list = match side {
            SkillSide::Offered => &mut self.skills_offered,
            SkillSide::Wanted => &mut self.skills_wanted,
        };
        if list.iter().any(|existing| existing.name_matches(skill.name())) {
            return Err(UserValidationError::DuplicateSkill {
                side,
                name: skill.name().to_owned(),
            });
        }
        list.push(skill);
        Ok(())
    }

    /// Remove the skill named `name` (case-insensitive) from `side`.
    ///
    /// Returns the removed skill, or `None` when no such skill is listed.
    pub fn remove_skill(&mut self, side: SkillSide, name: &str) -> Option<Skill> {
        let list = match side {
            SkillSide::Offered => &mut self.skills_offered,
            SkillSide::Wanted => &mut self.skills_wanted,
        };
        let index = list.iter().position(|skill| skill.name_matches(name))?;
        Some(list.remove(index))
    }

    /// Apply a profile update; `None` fields keep their current value.
    pub fn apply_profile_update(&mut self, update: ProfileUpdate) {
        let ProfileUpdate {
            display_name,
            location,
            availability,
            is_profile_public,
        } = update;
        if let Some(display_name) = display_name {
            self.display_name = display_name;
        }
        if let Some(location) = location {
            self.location = location;
        }
        if let Some(availability) = availability {
            self.availability = availability;
        }
        if let Some(is_profile_public) = is_profile_public {
            self.is_profile_public = is_profile_public;
        }
    }

    /// Mark the user banned with an optional reason.
    pub fn ban(&mut self, reason: Option<String>) {
        self.is_banned = true;
        self.ban_reason = reason;
    }

    /// Clear the banned flag and reason.
    pub fn unban(&mut self) {
        self.is_banned = false;
        self.ban_reason = None;
    }

    /// Overwrite the derived rating statistics with a fresh recompute.
    pub fn set_rating_stats(&mut self, stats: RatingStats) {
        self.rating_stats = stats;
    }

    /// Record one completed swap.
    pub fn record_completed_swap(&mut self) {
        self.completed_swaps = self.completed_swaps.saturating_add(1);
    }
}

/// Partial profile update applied by [`User::apply_profile_update`].
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    /// Replacement display name, if any.
    pub display_name: Option<DisplayName>,
    /// Replacement location, if any.
    pub location: Option<Location>,
    /// Replacement availability, if any.
    pub availability: Option<Availability>,
    /// Replacement public-profile flag, if any.
    pub is_profile_public: Option<bool>,
}
