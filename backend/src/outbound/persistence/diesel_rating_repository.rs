//! PostgreSQL-backed `RatingRepository` implementation using Diesel ORM.
//!
//! The `(swap_request_id, rater_id)` unique index is the race arbiter for
//! concurrent submissions: the insert relies on it rather than any
//! check-then-act sequence, and a `UniqueViolation` maps to the duplicate
//! variant. Statistics are a full recompute in SQL (sum and count over the
//! rated user's entire set) with the rounding done in integer tenths.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::pagination::{Page, PageRequest};
use crate::domain::ports::{RatingRepository, RatingRepositoryError};
use crate::domain::rating::{Rating, RatingDraft, RatingScore, RatingStats};
use crate::domain::user::UserId;

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::json_serializers::{snapshot_from_json, snapshot_to_json};
use super::models::{NewRatingRow, RatingRow};
use super::pool::{DbPool, PoolError};
use super::schema::ratings;

/// Diesel-backed implementation of the rating repository port.
#[derive(Clone)]
pub struct DieselRatingRepository {
    pool: DbPool,
}

impl DieselRatingRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain repository errors.
fn map_pool_error(error: PoolError) -> RatingRepositoryError {
    map_basic_pool_error(error, |message| RatingRepositoryError::connection(message))
}

/// Map Diesel errors to domain repository errors, treating unique violations
/// as a lost submission race.
fn map_diesel_error(error: diesel::result::Error) -> RatingRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) = &error {
        return RatingRepositoryError::duplicate("concurrent insert detected");
    }
    map_basic_diesel_error(
        error,
        RatingRepositoryError::query,
        RatingRepositoryError::connection,
    )
}

fn decode_error(context: &str, err: impl std::fmt::Display) -> RatingRepositoryError {
    RatingRepositoryError::query(format!("{context}: {err}"))
}

/// Convert a database row into a validated domain rating.
fn row_to_rating(row: RatingRow) -> Result<Rating, RatingRepositoryError> {
    let RatingRow {
        id,
        swap_request_id,
        rater_id,
        rated_user_id,
        score,
        comment,
        skill_rated,
        created_at,
        updated_at: _,
    } = row;

    let score = u8::try_from(score)
        .ok()
        .and_then(|value| RatingScore::new(value).ok())
        .ok_or_else(|| decode_error("decode score", format!("{score} is out of range")))?;

    Rating::new(RatingDraft {
        id,
        swap_request_id,
        rater: UserId::from_uuid(rater_id),
        rated_user: UserId::from_uuid(rated_user_id),
        score,
        comment,
        skill_rated: snapshot_from_json(skill_rated)
            .map_err(|err| decode_error("decode skill_rated", err))?,
        created_at,
    })
    .map_err(|err| decode_error("decode rating", err))
}

/// Rounded tenths from a SQL sum/count pair; the half-up bias mirrors the
/// in-domain recompute so both paths agree to the decimal.
#[expect(
    clippy::integer_division,
    clippy::integer_division_remainder_used,
    reason = "tenths rounding is exact integer math; the +count/2 bias implements half-up rounding"
)]
fn stats_from_sum_count(sum: i64, count: i64) -> RatingStats {
    if count <= 0 {
        return RatingStats::default();
    }
    let tenths = (sum * 10 + count / 2) / count;
    RatingStats::from_parts(
        u16::try_from(tenths).unwrap_or(u16::MAX),
        u32::try_from(count).unwrap_or(u32::MAX),
    )
}

#[async_trait]
impl RatingRepository for DieselRatingRepository {
    async fn insert(&self, rating: &Rating) -> Result<(), RatingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let skill_rated = snapshot_to_json(rating.skill_rated())
            .map_err(|err| decode_error("encode skill_rated", err))?;

        let row = NewRatingRow {
            id: rating.id(),
            swap_request_id: rating.swap_request_id(),
            rater_id: *rating.rater().as_uuid(),
            rated_user_id: *rating.rated_user().as_uuid(),
            score: i16::from(rating.score().value()),
            comment: rating.comment(),
            skill_rated: &skill_rated,
            created_at: rating.created_at(),
        };

        diesel::insert_into(ratings::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, rating_id: &Uuid) -> Result<Option<Rating>, RatingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = ratings::table
            .filter(ratings::id.eq(rating_id))
            .select(RatingRow::as_select())
            .first::<RatingRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_rating).transpose()
    }

    async fn exists_for(
        &self,
        swap_id: &Uuid,
        rater: &UserId,
    ) -> Result<bool, RatingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let count: i64 = ratings::table
            .filter(
                ratings::swap_request_id
                    .eq(swap_id)
                    .and(ratings::rater_id.eq(rater.as_uuid())),
            )
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(count > 0)
    }

    async fn update(&self, rating: &Rating) -> Result<(), RatingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(ratings::table.filter(ratings::id.eq(rating.id())))
            .set((
                ratings::score.eq(i16::from(rating.score().value())),
                ratings::comment.eq(rating.comment()),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn delete(&self, rating_id: &Uuid) -> Result<(), RatingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(ratings::table.filter(ratings::id.eq(rating_id)))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_for_rated(
        &self,
        user_id: &UserId,
        page: PageRequest,
    ) -> Result<Page<Rating>, RatingRepositoryError> {
        self.list_by_column(ListColumn::RatedUser, user_id, page)
            .await
    }

    async fn list_by_rater(
        &self,
        rater: &UserId,
        page: PageRequest,
    ) -> Result<Page<Rating>, RatingRepositoryError> {
        self.list_by_column(ListColumn::Rater, rater, page).await
    }

    async fn stats_for(&self, user_id: &UserId) -> Result<RatingStats, RatingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let (sum, count): (Option<i64>, i64) = ratings::table
            .filter(ratings::rated_user_id.eq(user_id.as_uuid()))
            .select((
                diesel::dsl::sum(ratings::score),
                diesel::dsl::count_star(),
            ))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(stats_from_sum_count(sum.unwrap_or(0), count))
    }
}

/// Which user column a listing filters on.
#[derive(Clone, Copy)]
enum ListColumn {
    Rater,
    RatedUser,
}

impl DieselRatingRepository {
    async fn list_by_column(
        &self,
        column: ListColumn,
        user_id: &UserId,
        page: PageRequest,
    ) -> Result<Page<Rating>, RatingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        fn apply_filter<'a>(
            query: ratings::BoxedQuery<'a, diesel::pg::Pg>,
            column: ListColumn,
            user_id: &UserId,
        ) -> ratings::BoxedQuery<'a, diesel::pg::Pg> {
            match column {
                ListColumn::Rater => query.filter(ratings::rater_id.eq(*user_id.as_uuid())),
                ListColumn::RatedUser => {
                    query.filter(ratings::rated_user_id.eq(*user_id.as_uuid()))
                }
            }
        }

        let total: i64 = apply_filter(ratings::table.into_boxed(), column, user_id)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let offset = i64::try_from(page.offset())
            .map_err(|err| decode_error("encode page offset", err))?;
        let rows: Vec<RatingRow> = apply_filter(ratings::table.into_boxed(), column, user_id)
            .order((ratings::created_at.desc(), ratings::id.desc()))
            .offset(offset)
            .limit(i64::from(page.limit()))
            .select(RatingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let items = rows
            .into_iter()
            .map(row_to_rating)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(
            items,
            page,
            u64::try_from(total).unwrap_or_default(),
        ))
    }
}
