//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{activity_log, ratings, swap_requests, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub display_name: String,
    pub location: String,
    pub availability: String,
    pub skills_offered: serde_json::Value,
    pub skills_wanted: serde_json::Value,
    pub is_profile_public: bool,
    pub role: String,
    pub is_banned: bool,
    pub ban_reason: Option<String>,
    pub average_rating_tenths: i16,
    pub total_ratings: i32,
    pub completed_swaps: i32,
    #[expect(dead_code, reason = "schema field read for completeness")]
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "schema field read for completeness")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub display_name: &'a str,
    pub location: &'a str,
    pub availability: &'a str,
    pub skills_offered: &'a serde_json::Value,
    pub skills_wanted: &'a serde_json::Value,
    pub is_profile_public: bool,
    pub role: &'a str,
    pub is_banned: bool,
    pub ban_reason: Option<&'a str>,
    pub average_rating_tenths: i16,
    pub total_ratings: i32,
    pub completed_swaps: i32,
}

/// Changeset struct for profile, skill-list, and moderation updates.
///
/// `treat_none_as_null` so lifting a ban writes NULL over the stored
/// reason instead of silently keeping it.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserUpdate<'a> {
    pub display_name: &'a str,
    pub location: &'a str,
    pub availability: &'a str,
    pub skills_offered: &'a serde_json::Value,
    pub skills_wanted: &'a serde_json::Value,
    pub is_profile_public: bool,
    pub is_banned: bool,
    pub ban_reason: Option<&'a str>,
}

/// Row struct for reading from the swap_requests table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = swap_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SwapRow {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub recipient_id: Uuid,
    pub requested_skill: serde_json::Value,
    pub offered_skill: serde_json::Value,
    pub status: String,
    pub message: Option<String>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub completed_date: Option<DateTime<Utc>>,
    pub is_rated: bool,
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "schema field read for completeness")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new swap requests.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = swap_requests)]
pub(crate) struct NewSwapRow<'a> {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub recipient_id: Uuid,
    pub requested_skill: &'a serde_json::Value,
    pub offered_skill: &'a serde_json::Value,
    pub status: &'a str,
    pub message: Option<&'a str>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub completed_date: Option<DateTime<Utc>>,
    pub is_rated: bool,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the ratings table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = ratings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RatingRow {
    pub id: Uuid,
    pub swap_request_id: Uuid,
    pub rater_id: Uuid,
    pub rated_user_id: Uuid,
    pub score: i16,
    pub comment: Option<String>,
    pub skill_rated: serde_json::Value,
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "schema field read for completeness")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new ratings.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ratings)]
pub(crate) struct NewRatingRow<'a> {
    pub id: Uuid,
    pub swap_request_id: Uuid,
    pub rater_id: Uuid,
    pub rated_user_id: Uuid,
    pub score: i16,
    pub comment: Option<&'a str>,
    pub skill_rated: &'a serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for appending audit records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = activity_log)]
pub(crate) struct NewActivityRow<'a> {
    pub id: Uuid,
    pub actor_id: Uuid,
    pub action: &'a str,
    pub target_user_id: Option<Uuid>,
    pub target_swap_id: Option<Uuid>,
    pub details: &'a serde_json::Value,
}
