//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// User accounts with embedded skill lists and derived statistics.
    ///
    /// Skill lists are stored as `jsonb` arrays of validated skill objects.
    /// The rating mean is stored in tenths so aggregate recomputes stay in
    /// integer arithmetic.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Human-readable display name (max 50 characters).
        display_name -> Varchar,
        /// Free-text location (max 100 characters).
        location -> Varchar,
        /// Availability window identifier.
        availability -> Varchar,
        /// Offered skills as a jsonb array.
        skills_offered -> Jsonb,
        /// Wanted skills as a jsonb array.
        skills_wanted -> Jsonb,
        /// Whether the profile appears in public listings.
        is_profile_public -> Bool,
        /// Moderation role: `user` or `admin`.
        role -> Varchar,
        /// Whether the user is banned.
        is_banned -> Bool,
        /// Reason recorded when the ban was applied.
        ban_reason -> Nullable<Varchar>,
        /// Mean of all ratings about the user, in tenths (0-50).
        average_rating_tenths -> Int2,
        /// Number of ratings about the user.
        total_ratings -> Int4,
        /// Number of swaps the user has completed.
        completed_swaps -> Int4,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp (auto-updated by trigger).
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Swap requests and their lifecycle state.
    ///
    /// A partial unique index over the unordered participant pair restricted
    /// to `status = 'pending'` backs the duplicate-pending invariant.
    swap_requests (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// User who initiated the request.
        requester_id -> Uuid,
        /// User the request is addressed to.
        recipient_id -> Uuid,
        /// Snapshot of the recipient's requested skill, as jsonb.
        requested_skill -> Jsonb,
        /// Snapshot of the requester's offered skill, as jsonb.
        offered_skill -> Jsonb,
        /// Lifecycle status identifier.
        status -> Varchar,
        /// Optional message from the requester (max 1000 characters).
        message -> Nullable<Varchar>,
        /// Optional agreed date for the swap.
        scheduled_date -> Nullable<Timestamptz>,
        /// Completion timestamp, set only on completed swaps.
        completed_date -> Nullable<Timestamptz>,
        /// Whether any rating exists for this swap.
        is_rated -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp (auto-updated by trigger).
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Ratings submitted against completed swaps.
    ///
    /// A unique index over `(swap_request_id, rater_id)` resolves concurrent
    /// duplicate submissions.
    ratings (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// The rated swap.
        swap_request_id -> Uuid,
        /// User who submitted the rating.
        rater_id -> Uuid,
        /// User the rating is about.
        rated_user_id -> Uuid,
        /// Score between 1 and 5.
        score -> Int2,
        /// Optional free-text comment (max 500 characters).
        comment -> Nullable<Varchar>,
        /// Snapshot of the rated skill (name and level), as jsonb.
        skill_rated -> Jsonb,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp (auto-updated by trigger).
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only audit records for moderated state changes.
    activity_log (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// User who performed the action.
        actor_id -> Uuid,
        /// Action kind identifier, e.g. `swap_request_created`.
        action -> Varchar,
        /// User affected by the action, when there is one.
        target_user_id -> Nullable<Uuid>,
        /// Swap affected by the action, when there is one.
        target_swap_id -> Nullable<Uuid>,
        /// Free-form structured context.
        details -> Jsonb,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(ratings -> swap_requests (swap_request_id));

diesel::allow_tables_to_appear_in_same_query!(users, swap_requests, ratings, activity_log);
