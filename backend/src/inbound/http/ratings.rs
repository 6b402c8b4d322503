//! Rating HTTP handlers.
//!
//! ```text
//! POST   /api/v1/ratings
//! GET    /api/v1/ratings/mine
//! GET    /api/v1/ratings/user/{userId}
//! GET    /api/v1/ratings/{id}
//! PUT    /api/v1/ratings/{id}
//! DELETE /api/v1/ratings/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::pagination::PageRequest;
use crate::domain::ports::{
    RatingCommand as _, RatingQuery as _, SubmitRatingRequest, UpdateRatingRequest,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{PaginationBody, RatingBody};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_rating_score, parse_user_id, parse_uuid,
};

/// Request payload for submitting a rating.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRatingBody {
    /// The completed swap being rated.
    #[schema(format = "uuid")]
    pub swap_request_id: String,
    /// Score between 1 and 5.
    pub rating: u8,
    /// Optional free-text comment.
    pub comment: Option<String>,
}

/// Request payload for revising a rating.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRatingBody {
    /// Replacement score between 1 and 5.
    pub rating: u8,
    /// Replacement comment; omit to clear.
    pub comment: Option<String>,
}

/// Shared pagination query parameters.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size, capped at 100.
    pub limit: Option<u32>,
}

impl PageQuery {
    fn to_request(&self) -> PageRequest {
        PageRequest::new(self.page.unwrap_or(1), self.limit.unwrap_or(0))
    }
}

/// Response payload for rating listings by rater.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingListBody {
    /// One page of ratings, newest first.
    pub ratings: Vec<RatingBody>,
    /// Pagination envelope.
    pub pagination: PaginationBody,
}

/// Response payload for ratings about one user.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRatingsBody {
    /// One page of ratings, newest first.
    pub ratings: Vec<RatingBody>,
    /// Mean of all ratings about the user, one decimal.
    pub average_rating: f64,
    /// Number of ratings about the user.
    pub total_ratings: u32,
    /// Pagination envelope.
    pub pagination: PaginationBody,
}

/// Submit a rating for a completed swap.
#[utoipa::path(
    post,
    path = "/api/v1/ratings",
    request_body = SubmitRatingBody,
    responses(
        (status = 201, description = "Rating submitted", body = RatingBody),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Not a participant", body = ErrorSchema),
        (status = 404, description = "Swap not found", body = ErrorSchema),
        (status = 409, description = "Not completed or already rated", body = ErrorSchema)
    ),
    tags = ["ratings"],
    operation_id = "submitRating",
    security(("SessionCookie" = []))
)]
#[post("/ratings")]
pub async fn submit_rating(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SubmitRatingBody>,
) -> ApiResult<HttpResponse> {
    let rater = session.require_user_id()?;
    let body = payload.into_inner();

    let rating = state
        .ratings
        .submit(SubmitRatingRequest {
            swap_request_id: parse_uuid(&body.swap_request_id, FieldName::new("swapRequestId"))?,
            rater,
            score: parse_rating_score(body.rating, FieldName::new("rating"))?,
            comment: body.comment,
        })
        .await?;

    Ok(HttpResponse::Created().json(RatingBody::from(&rating)))
}

/// Ratings submitted by the acting user.
#[utoipa::path(
    get,
    path = "/api/v1/ratings/mine",
    params(PageQuery),
    responses(
        (status = 200, description = "Own ratings", body = RatingListBody),
        (status = 401, description = "Unauthorized", body = ErrorSchema)
    ),
    tags = ["ratings"],
    operation_id = "listMyRatings",
    security(("SessionCookie" = []))
)]
#[get("/ratings/mine")]
pub async fn list_my_ratings(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<RatingListBody>> {
    let acting_user = session.require_user_id()?;
    let page = state
        .ratings_query
        .list_by_rater(acting_user, query.to_request())
        .await?;

    let pagination = PaginationBody::from(&page);
    Ok(web::Json(RatingListBody {
        ratings: page.items.iter().map(RatingBody::from).collect(),
        pagination,
    }))
}

/// Ratings about a user, with the user's current statistics.
#[utoipa::path(
    get,
    path = "/api/v1/ratings/user/{userId}",
    params(
        ("userId" = String, Path, format = "uuid", description = "Rated user id"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Ratings about the user", body = UserRatingsBody),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["ratings"],
    operation_id = "listUserRatings",
    security(("SessionCookie" = []))
)]
#[get("/ratings/user/{userId}")]
pub async fn list_user_ratings(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<UserRatingsBody>> {
    session.require_user_id()?;
    let user_id = parse_user_id(&path.into_inner(), FieldName::new("userId"))?;

    let response = state
        .ratings_query
        .list_for_user(user_id, query.to_request())
        .await?;

    let pagination = PaginationBody::from(&response.ratings);
    Ok(web::Json(UserRatingsBody {
        ratings: response.ratings.items.iter().map(RatingBody::from).collect(),
        average_rating: response.stats.average(),
        total_ratings: response.stats.total(),
        pagination,
    }))
}

/// Fetch one rating; visible to its rater and rated user.
#[utoipa::path(
    get,
    path = "/api/v1/ratings/{id}",
    params(("id" = String, Path, format = "uuid", description = "Rating id")),
    responses(
        (status = 200, description = "Rating", body = RatingBody),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Access denied", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["ratings"],
    operation_id = "getRating",
    security(("SessionCookie" = []))
)]
#[get("/ratings/{id}")]
pub async fn get_rating(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<RatingBody>> {
    let acting_user = session.require_user_id()?;
    let rating_id = parse_uuid(&path.into_inner(), FieldName::new("id"))?;
    let rating = state.ratings_query.get(rating_id, acting_user).await?;
    Ok(web::Json(RatingBody::from(&rating)))
}

/// Revise a rating's score and comment; original rater only.
#[utoipa::path(
    put,
    path = "/api/v1/ratings/{id}",
    params(("id" = String, Path, format = "uuid", description = "Rating id")),
    request_body = UpdateRatingBody,
    responses(
        (status = 200, description = "Rating updated", body = RatingBody),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Not the rater", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["ratings"],
    operation_id = "updateRating",
    security(("SessionCookie" = []))
)]
#[put("/ratings/{id}")]
pub async fn update_rating(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateRatingBody>,
) -> ApiResult<web::Json<RatingBody>> {
    let rater = session.require_user_id()?;
    let rating_id = parse_uuid(&path.into_inner(), FieldName::new("id"))?;
    let body = payload.into_inner();

    let rating = state
        .ratings
        .update(UpdateRatingRequest {
            rating_id,
            rater,
            score: parse_rating_score(body.rating, FieldName::new("rating"))?,
            comment: body.comment,
        })
        .await?;

    Ok(web::Json(RatingBody::from(&rating)))
}

/// Delete a rating; original rater only.
#[utoipa::path(
    delete,
    path = "/api/v1/ratings/{id}",
    params(("id" = String, Path, format = "uuid", description = "Rating id")),
    responses(
        (status = 204, description = "Rating deleted"),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Not the rater", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["ratings"],
    operation_id = "deleteRating",
    security(("SessionCookie" = []))
)]
#[delete("/ratings/{id}")]
pub async fn delete_rating(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let rater = session.require_user_id()?;
    let rating_id = parse_uuid(&path.into_inner(), FieldName::new("id"))?;
    state.ratings.delete(rating_id, rater).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "ratings_tests.rs"]
mod tests;
