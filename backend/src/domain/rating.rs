//! Rating entity and the derived statistics it feeds.
//!
//! Statistics are always a full recompute over a user's current rating set.
//! [`RatingStats`] stores the mean in tenths (an integer) so repeated edits
//! and deletes can never accumulate floating-point drift; conversion to a
//! one-decimal float happens only at the presentation edge.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::skill::SkillSnapshot;
use crate::domain::user::UserId;

/// Lowest permitted rating score.
pub const RATING_MIN: u8 = 1;
/// Highest permitted rating score.
pub const RATING_MAX: u8 = 5;
/// Maximum length of a rating comment.
pub const RATING_COMMENT_MAX: usize = 500;

/// Validation errors for ratings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RatingValidationError {
    /// The score fell outside the permitted range.
    ScoreOutOfRange {
        /// Lowest permitted score.
        min: u8,
        /// Highest permitted score.
        max: u8,
    },
    /// A user attempted to rate themselves.
    SelfRating,
    /// The comment exceeded the maximum length.
    CommentTooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

impl fmt::Display for RatingValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScoreOutOfRange { min, max } => {
                write!(f, "rating must be between {min} and {max}")
            }
            Self::SelfRating => write!(f, "users cannot rate themselves"),
            Self::CommentTooLong { max } => {
                write!(f, "comment must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for RatingValidationError {}

/// Integer rating score between [`RATING_MIN`] and [`RATING_MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RatingScore(u8);

impl RatingScore {
    /// Validate and construct a score.
    pub const fn new(value: u8) -> Result<Self, RatingValidationError> {
        if value < RATING_MIN || value > RATING_MAX {
            return Err(RatingValidationError::ScoreOutOfRange {
                min: RATING_MIN,
                max: RATING_MAX,
            });
        }
        Ok(Self(value))
    }

    /// The raw score value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for RatingScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Derived rating statistics for a user.
///
/// The mean is held in tenths (0–50) so `4.3` is the integer `43`. Stats are
/// replaced wholesale by a recompute after every rating mutation; there is no
/// incremental update path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RatingStats {
    average_tenths: u16,
    total: u32,
}

impl RatingStats {
    /// Reconstruct stats from stored values, e.g. a database row.
    #[must_use]
    pub const fn from_parts(average_tenths: u16, total: u32) -> Self {
        Self {
            average_tenths,
            total,
        }
    }

    /// Full recompute over a rating set: the mean of `scores` rounded
    /// half-up to one decimal, plus the count.
    #[expect(
        clippy::integer_division,
        clippy::integer_division_remainder_used,
        reason = "rounded tenths are exact integer math; the +count/2 bias implements half-up rounding"
    )]
    #[must_use]
    pub fn from_scores<I>(scores: I) -> Self
    where
        I: IntoIterator<Item = RatingScore>,
    {
        let mut sum: u32 = 0;
        let mut total: u32 = 0;
        for score in scores {
            sum += u32::from(score.value());
            total += 1;
        }
        if total == 0 {
            return Self::default();
        }
        let tenths = (sum * 10 + total / 2) / total;
        Self {
            average_tenths: u16::try_from(tenths).unwrap_or(u16::MAX),
            total,
        }
    }

    /// Mean in tenths, e.g. `43` for an average of `4.3`.
    #[must_use]
    pub const fn average_tenths(self) -> u16 {
        self.average_tenths
    }

    /// Number of ratings in the set.
    #[must_use]
    pub const fn total(self) -> u32 {
        self.total
    }

    /// One-decimal mean for presentation.
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "tenths fit in 50, far inside f64 precision; this is the single float conversion point"
    )]
    #[must_use]
    pub fn average(self) -> f64 {
        f64::from(self.average_tenths) / 10.0
    }
}

/// Unvalidated field bundle for constructing a [`Rating`].
#[derive(Debug, Clone)]
pub struct RatingDraft {
    /// Stable identifier.
    pub id: Uuid,
    /// The completed swap being rated.
    pub swap_request_id: Uuid,
    /// User submitting the rating.
    pub rater: UserId,
    /// The other participant of the swap.
    pub rated_user: UserId,
    /// Score between 1 and 5.
    pub score: RatingScore,
    /// Optional free-text comment.
    pub comment: Option<String>,
    /// Snapshot of the skill the rated user provided.
    pub skill_rated: SkillSnapshot,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A rating submitted against a completed swap.
///
/// ## Invariants
/// - `rater != rated_user`.
/// - At most one rating exists per `(swap_request_id, rater)` pair; the
///   persistence layer enforces this with a unique constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct Rating {
    id: Uuid,
    swap_request_id: Uuid,
    rater: UserId,
    rated_user: UserId,
    score: RatingScore,
    comment: Option<String>,
    skill_rated: SkillSnapshot,
    created_at: DateTime<Utc>,
}

fn validate_comment(comment: &Option<String>) -> Result<(), RatingValidationError> {
    if let Some(text) = comment {
        if text.chars().count() > RATING_COMMENT_MAX {
            return Err(RatingValidationError::CommentTooLong {
                max: RATING_COMMENT_MAX,
            });
        }
    }
    Ok(())
}

impl Rating {
    /// Build a [`Rating`] from a draft, enforcing entity invariants.
    pub fn new(draft: RatingDraft) -> Result<Self, RatingValidationError> {
        let RatingDraft {
            id,
            swap_request_id,
            rater,
            rated_user,
            score,
            comment,
            skill_rated,
            created_at,
        } = draft;

        if rater == rated_user {
            return Err(RatingValidationError::SelfRating);
        }
        validate_comment(&comment)?;

        Ok(Self {
            id,
            swap_request_id,
            rater,
            rated_user,
            score,
            comment,
            skill_rated: skill_rated.without_description(),
            created_at,
        })
    }

    /// Stable identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// The completed swap being rated.
    #[must_use]
    pub const fn swap_request_id(&self) -> Uuid {
        self.swap_request_id
    }

    /// User who submitted the rating.
    #[must_use]
    pub const fn rater(&self) -> &UserId {
        &self.rater
    }

    /// User the rating is about.
    #[must_use]
    pub const fn rated_user(&self) -> &UserId {
        &self.rated_user
    }

    /// Score between 1 and 5.
    #[must_use]
    pub const fn score(&self) -> RatingScore {
        self.score
    }

    /// Optional free-text comment.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Snapshot of the skill the rated user provided.
    #[must_use]
    pub const fn skill_rated(&self) -> &SkillSnapshot {
        &self.skill_rated
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replace the score and comment, preserving everything else.
    ///
    /// Only the original rater may revise a rating; callers enforce that
    /// before invoking this.
    pub fn revise(
        &mut self,
        score: RatingScore,
        comment: Option<String>,
    ) -> Result<(), RatingValidationError> {
        validate_comment(&comment)?;
        self.score = score;
        self.comment = comment;
        Ok(())
    }
}

#[cfg(test)]
mod tests;
