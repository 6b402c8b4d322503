//! PostgreSQL-backed `SwapRepository` implementation using Diesel ORM.
//!
//! Lifecycle transitions are status-guarded `UPDATE ... WHERE id = $1 AND
//! status = $2` statements, so the guard and the write are one atomic
//! statement and a lost race matches zero rows. Completion folds the counter
//! increments for both participants into the same transaction as the guarded
//! update. The duplicate-pending invariant is backed by a partial unique
//! index over the unordered participant pair (see the migrations), surfacing
//! here as a `UniqueViolation`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::pagination::{Page, PageRequest};
use crate::domain::ports::{SwapDirection, SwapFilter, SwapRepository, SwapRepositoryError};
use crate::domain::swap::{SwapDraft, SwapRequest, SwapStatus};
use crate::domain::user::UserId;

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::json_serializers::{snapshot_from_json, snapshot_to_json};
use super::models::{NewSwapRow, SwapRow};
use super::pool::{DbPool, PoolError};
use super::schema::{swap_requests, users};

/// Diesel-backed implementation of the swap repository port.
#[derive(Clone)]
pub struct DieselSwapRepository {
    pool: DbPool,
}

impl DieselSwapRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain repository errors.
fn map_pool_error(error: PoolError) -> SwapRepositoryError {
    map_basic_pool_error(error, |message| SwapRepositoryError::connection(message))
}

/// Map Diesel errors to domain repository errors, treating unique violations
/// as a lost create race on the pending-pair index.
fn map_diesel_error(error: diesel::result::Error) -> SwapRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) = &error {
        return SwapRepositoryError::duplicate_pending("concurrent create detected");
    }
    map_basic_diesel_error(
        error,
        SwapRepositoryError::query,
        SwapRepositoryError::connection,
    )
}

fn decode_error(context: &str, err: impl std::fmt::Display) -> SwapRepositoryError {
    SwapRepositoryError::query(format!("{context}: {err}"))
}

/// Convert a database row into a validated domain swap request.
fn row_to_swap(row: SwapRow) -> Result<SwapRequest, SwapRepositoryError> {
    let SwapRow {
        id,
        requester_id,
        recipient_id,
        requested_skill,
        offered_skill,
        status,
        message,
        scheduled_date,
        completed_date,
        is_rated,
        created_at,
        updated_at: _,
    } = row;

    SwapRequest::new(SwapDraft {
        id,
        requester: UserId::from_uuid(requester_id),
        recipient: UserId::from_uuid(recipient_id),
        requested_skill: snapshot_from_json(requested_skill)
            .map_err(|err| decode_error("decode requested_skill", err))?,
        offered_skill: snapshot_from_json(offered_skill)
            .map_err(|err| decode_error("decode offered_skill", err))?,
        status: status
            .parse::<SwapStatus>()
            .map_err(|err| decode_error("decode status", err))?,
        message,
        scheduled_date,
        completed_date,
        is_rated,
        created_at,
    })
    .map_err(|err| decode_error("decode swap request", err))
}

#[async_trait]
impl SwapRepository for DieselSwapRepository {
    async fn insert(&self, swap: &SwapRequest) -> Result<(), SwapRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let requested_skill = snapshot_to_json(swap.requested_skill())
            .map_err(|err| decode_error("encode requested_skill", err))?;
        let offered_skill = snapshot_to_json(swap.offered_skill())
            .map_err(|err| decode_error("encode offered_skill", err))?;

        let row = NewSwapRow {
            id: swap.id(),
            requester_id: *swap.requester().as_uuid(),
            recipient_id: *swap.recipient().as_uuid(),
            requested_skill: &requested_skill,
            offered_skill: &offered_skill,
            status: swap.status().as_str(),
            message: swap.message(),
            scheduled_date: swap.scheduled_date(),
            completed_date: swap.completed_date(),
            is_rated: swap.is_rated(),
            created_at: swap.created_at(),
        };

        diesel::insert_into(swap_requests::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, swap_id: &Uuid) -> Result<Option<SwapRequest>, SwapRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = swap_requests::table
            .filter(swap_requests::id.eq(swap_id))
            .select(SwapRow::as_select())
            .first::<SwapRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_swap).transpose()
    }

    async fn find_pending_between(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<Option<SwapRequest>, SwapRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = swap_requests::table
            .filter(swap_requests::status.eq(SwapStatus::Pending.as_str()))
            .filter(
                swap_requests::requester_id
                    .eq(a.as_uuid())
                    .and(swap_requests::recipient_id.eq(b.as_uuid()))
                    .or(swap_requests::requester_id
                        .eq(b.as_uuid())
                        .and(swap_requests::recipient_id.eq(a.as_uuid()))),
            )
            .select(SwapRow::as_select())
            .first::<SwapRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_swap).transpose()
    }

    async fn transition(
        &self,
        swap_id: &Uuid,
        from: SwapStatus,
        to: SwapStatus,
    ) -> Result<Option<SwapRequest>, SwapRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::update(
            swap_requests::table.filter(
                swap_requests::id
                    .eq(swap_id)
                    .and(swap_requests::status.eq(from.as_str())),
            ),
        )
        .set(swap_requests::status.eq(to.as_str()))
        .returning(SwapRow::as_returning())
        .get_result::<SwapRow>(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        row.map(row_to_swap).transpose()
    }

    async fn complete(
        &self,
        swap_id: &Uuid,
        completed_at: DateTime<Utc>,
    ) -> Result<Option<SwapRequest>, SwapRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let swap_id = *swap_id;

        let row = conn
            .transaction(|conn| {
                async move {
                    let updated: Option<SwapRow> = diesel::update(
                        swap_requests::table.filter(
                            swap_requests::id
                                .eq(swap_id)
                                .and(swap_requests::status.eq(SwapStatus::Accepted.as_str())),
                        ),
                    )
                    .set((
                        swap_requests::status.eq(SwapStatus::Completed.as_str()),
                        swap_requests::completed_date.eq(completed_at),
                    ))
                    .returning(SwapRow::as_returning())
                    .get_result::<SwapRow>(conn)
                    .await
                    .optional()?;

                    if let Some(updated) = &updated {
                        diesel::update(
                            users::table.filter(
                                users::id
                                    .eq_any([updated.requester_id, updated.recipient_id]),
                            ),
                        )
                        .set(users::completed_swaps.eq(users::completed_swaps + 1))
                        .execute(conn)
                        .await?;
                    }

                    Ok::<_, diesel::result::Error>(updated)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        row.map(row_to_swap).transpose()
    }

    async fn mark_rated(&self, swap_id: &Uuid) -> Result<(), SwapRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(swap_requests::table.filter(swap_requests::id.eq(swap_id)))
            .set(swap_requests::is_rated.eq(true))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        filter: SwapFilter,
        page: PageRequest,
    ) -> Result<Page<SwapRequest>, SwapRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        fn apply_filters<'a>(
            mut query: swap_requests::BoxedQuery<'a, diesel::pg::Pg>,
            filter: SwapFilter,
            user_id: &UserId,
        ) -> swap_requests::BoxedQuery<'a, diesel::pg::Pg> {
            query = match filter.direction {
                SwapDirection::Incoming => {
                    query.filter(swap_requests::recipient_id.eq(*user_id.as_uuid()))
                }
                SwapDirection::Outgoing => {
                    query.filter(swap_requests::requester_id.eq(*user_id.as_uuid()))
                }
                SwapDirection::All => query.filter(
                    swap_requests::requester_id
                        .eq(*user_id.as_uuid())
                        .or(swap_requests::recipient_id.eq(*user_id.as_uuid())),
                ),
            };
            if let Some(status) = filter.status {
                query = query.filter(swap_requests::status.eq(status.as_str()));
            }
            query
        }

        let total: i64 = apply_filters(swap_requests::table.into_boxed(), filter, user_id)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let offset = i64::try_from(page.offset())
            .map_err(|err| decode_error("encode page offset", err))?;
        let rows: Vec<SwapRow> = apply_filters(swap_requests::table.into_boxed(), filter, user_id)
            .order((swap_requests::created_at.desc(), swap_requests::id.desc()))
            .offset(offset)
            .limit(i64::from(page.limit()))
            .select(SwapRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let items = rows
            .into_iter()
            .map(row_to_swap)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(
            items,
            page,
            u64::try_from(total).unwrap_or_default(),
        ))
    }
}
