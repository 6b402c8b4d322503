//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Skill lists live in `jsonb` columns and are re-validated through the
//! domain constructors on every read, so corrupted rows surface as query
//! errors instead of leaking invalid state into the domain.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::{Bool, Text};
use diesel_async::RunQueryDsl;

use crate::domain::pagination::{Page, PageRequest};
use crate::domain::ports::{UserRepository, UserRepositoryError, UserSearch};
use crate::domain::rating::RatingStats;
use crate::domain::user::{
    Availability, DisplayName, Location, Role, User, UserDraft, UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::json_serializers::{skills_from_json, skills_to_json};
use super::models::{NewUserRow, UserRow, UserUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain repository errors.
fn map_pool_error(error: PoolError) -> UserRepositoryError {
    map_basic_pool_error(error, |message| UserRepositoryError::connection(message))
}

/// Map Diesel errors to domain repository errors.
fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    map_basic_diesel_error(
        error,
        UserRepositoryError::query,
        UserRepositoryError::connection,
    )
}

fn decode_error(context: &str, err: impl std::fmt::Display) -> UserRepositoryError {
    UserRepositoryError::query(format!("{context}: {err}"))
}

/// Convert a database row into a validated domain user.
fn row_to_user(row: UserRow) -> Result<User, UserRepositoryError> {
    let UserRow {
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
        average_rating_tenths,
        total_ratings,
        completed_swaps,
        created_at: _,
        updated_at: _,
    } = row;

    let draft = UserDraft {
        id: UserId::from_uuid(id),
        display_name: DisplayName::new(display_name)
            .map_err(|err| decode_error("decode display_name", err))?,
        location: Location::new(location).map_err(|err| decode_error("decode location", err))?,
        availability: availability
            .parse::<Availability>()
            .map_err(|err| decode_error("decode availability", err))?,
        skills_offered: skills_from_json(skills_offered)
            .map_err(|err| decode_error("decode skills_offered", err))?,
        skills_wanted: skills_from_json(skills_wanted)
            .map_err(|err| decode_error("decode skills_wanted", err))?,
        is_profile_public,
        role: role
            .parse::<Role>()
            .map_err(|err| decode_error("decode role", err))?,
        is_banned,
        ban_reason,
        rating_stats: RatingStats::from_parts(
            u16::try_from(average_rating_tenths)
                .map_err(|err| decode_error("decode average_rating_tenths", err))?,
            u32::try_from(total_ratings)
                .map_err(|err| decode_error("decode total_ratings", err))?,
        ),
        completed_swaps: u32::try_from(completed_swaps)
            .map_err(|err| decode_error("decode completed_swaps", err))?,
    };

    User::new(draft).map_err(|err| decode_error("decode user", err))
}

fn encode_counter(value: u32, field: &str) -> Result<i32, UserRepositoryError> {
    i32::try_from(value).map_err(|err| decode_error(field, err))
}


#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, user_id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(users::id.eq(user_id.as_uuid()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let skills_offered = skills_to_json(user.skills_offered())
            .map_err(|err| decode_error("encode skills_offered", err))?;
        let skills_wanted = skills_to_json(user.skills_wanted())
            .map_err(|err| decode_error("encode skills_wanted", err))?;

        let row = NewUserRow {
            id: *user.id().as_uuid(),
            display_name: user.display_name().as_ref(),
            location: user.location().as_ref(),
            availability: user.availability().as_str(),
            skills_offered: &skills_offered,
            skills_wanted: &skills_wanted,
            is_profile_public: user.is_profile_public(),
            role: user.role().as_str(),
            is_banned: user.is_banned(),
            ban_reason: user.ban_reason(),
            average_rating_tenths: i16::try_from(user.rating_stats().average_tenths())
                .map_err(|err| decode_error("encode average_rating_tenths", err))?,
            total_ratings: encode_counter(user.rating_stats().total(), "encode total_ratings")?,
            completed_swaps: encode_counter(user.completed_swaps(), "encode completed_swaps")?,
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let skills_offered = skills_to_json(user.skills_offered())
            .map_err(|err| decode_error("encode skills_offered", err))?;
        let skills_wanted = skills_to_json(user.skills_wanted())
            .map_err(|err| decode_error("encode skills_wanted", err))?;

        let changes = UserUpdate {
            display_name: user.display_name().as_ref(),
            location: user.location().as_ref(),
            availability: user.availability().as_str(),
            skills_offered: &skills_offered,
            skills_wanted: &skills_wanted,
            is_profile_public: user.is_profile_public(),
            is_banned: user.is_banned(),
            ban_reason: user.ban_reason(),
        };

        diesel::update(users::table.filter(users::id.eq(user.id().as_uuid())))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn set_rating_stats(
        &self,
        user_id: &UserId,
        stats: RatingStats,
    ) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(users::table.filter(users::id.eq(user_id.as_uuid())))
            .set((
                users::average_rating_tenths.eq(i16::try_from(stats.average_tenths())
                    .map_err(|err| decode_error("encode average_rating_tenths", err))?),
                users::total_ratings.eq(encode_counter(stats.total(), "encode total_ratings")?),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_public(
        &self,
        search: UserSearch,
        page: PageRequest,
    ) -> Result<Page<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Diesel's DSL has no jsonb array operators, so the skill search
        // drops to a bound SQL fragment matching either list.
        let skill_filter = |skill: &str| {
            diesel::dsl::sql::<Bool>(
                "EXISTS (SELECT 1 FROM jsonb_array_elements(skills_offered) AS o \
                 WHERE lower(o->>'name') = lower(",
            )
            .bind::<Text, _>(skill.to_owned())
            .sql(
                ")) OR EXISTS (SELECT 1 FROM jsonb_array_elements(skills_wanted) AS w \
                 WHERE lower(w->>'name') = lower(",
            )
            .bind::<Text, _>(skill.to_owned())
            .sql("))")
        };

        let mut query = users::table
            .filter(users::is_profile_public.eq(true))
            .filter(users::is_banned.eq(false))
            .into_boxed();
        let mut count_query = users::table
            .filter(users::is_profile_public.eq(true))
            .filter(users::is_banned.eq(false))
            .into_boxed();
        if let Some(skill) = &search.skill {
            query = query.filter(skill_filter(skill));
            count_query = count_query.filter(skill_filter(skill));
        }

        let total: i64 = count_query
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let offset = i64::try_from(page.offset())
            .map_err(|err| decode_error("encode page offset", err))?;
        let rows: Vec<UserRow> = query
            .order(users::display_name.asc())
            .offset(offset)
            .limit(i64::from(page.limit()))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let items = rows
            .into_iter()
            .map(row_to_user)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(
            items,
            page,
            u64::try_from(total).unwrap_or_default(),
        ))
    }
}
