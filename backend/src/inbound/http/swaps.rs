//! Swap request HTTP handlers.
//!
//! ```text
//! POST /api/v1/swaps
//! GET  /api/v1/swaps?type=incoming&status=pending&page=1&limit=10
//! GET  /api/v1/swaps/{id}
//! PUT  /api/v1/swaps/{id}/accept
//! PUT  /api/v1/swaps/{id}/reject
//! PUT  /api/v1/swaps/{id}/cancel
//! PUT  /api/v1/swaps/{id}/complete
//! GET  /api/v1/swaps/{id}/can-rate
//! ```

use actix_web::{get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::pagination::PageRequest;
use crate::domain::{Error, UserId};
use crate::domain::ports::{
    CreateSwapRequest, ListSwapsRequest, RatingQuery as _, SwapActionRequest, SwapCommand as _,
    SwapDirection, SwapFilter, SwapQuery as _,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{PaginationBody, SwapBody};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_optional_rfc3339_timestamp, parse_swap_status, parse_user_id, parse_uuid,
};

/// Request payload for creating a swap request.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSwapRequestBody {
    /// User the request is addressed to.
    #[schema(format = "uuid")]
    pub recipient_id: String,
    /// Name of the recipient's offered skill being requested.
    pub requested_skill: String,
    /// Name of the requester's own offered skill given in exchange.
    pub offered_skill: String,
    /// Optional message to the recipient.
    pub message: Option<String>,
    /// Optional agreed date, RFC 3339.
    #[schema(format = "date-time")]
    pub scheduled_date: Option<String>,
}

/// Query parameters for listing swap requests.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListSwapsQuery {
    /// Direction filter: `incoming`, `outgoing`, or `all` (default).
    #[serde(rename = "type")]
    pub direction: Option<String>,
    /// Restrict to one lifecycle status.
    pub status: Option<String>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size, capped at 100.
    pub limit: Option<u32>,
}

/// Response payload for swap listings.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SwapListBody {
    /// One page of swap requests, newest first.
    pub swap_requests: Vec<SwapBody>,
    /// Pagination envelope.
    pub pagination: PaginationBody,
}

/// Response payload for the rating-eligibility probe.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CanRateBody {
    /// Whether the acting user may rate this swap.
    pub can_rate: bool,
}

fn parse_direction(raw: Option<&str>) -> Result<SwapDirection, Error> {
    match raw {
        None | Some("all") => Ok(SwapDirection::All),
        Some("incoming") => Ok(SwapDirection::Incoming),
        Some("outgoing") => Ok(SwapDirection::Outgoing),
        Some(other) => Err(Error::invalid_request(format!(
            "type must be incoming, outgoing, or all, got {other:?}"
        ))),
    }
}

fn parse_filter(query: &ListSwapsQuery) -> Result<(SwapFilter, PageRequest), Error> {
    let direction = parse_direction(query.direction.as_deref())?;
    let status = query
        .status
        .as_deref()
        .map(|raw| parse_swap_status(raw, FieldName::new("status")))
        .transpose()?;
    let page = PageRequest::new(query.page.unwrap_or(1), query.limit.unwrap_or(0));
    Ok((SwapFilter { direction, status }, page))
}

/// Create a new swap request addressed to another user.
#[utoipa::path(
    post,
    path = "/api/v1/swaps",
    request_body = CreateSwapRequestBody,
    responses(
        (status = 201, description = "Swap request created", body = SwapBody),
        (status = 400, description = "Precondition failed", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Recipient not found", body = ErrorSchema)
    ),
    tags = ["swaps"],
    operation_id = "createSwapRequest",
    security(("SessionCookie" = []))
)]
#[post("/swaps")]
pub async fn create_swap(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateSwapRequestBody>,
) -> ApiResult<actix_web::HttpResponse> {
    let requester = session.require_user_id()?;
    let body = payload.into_inner();

    let request = CreateSwapRequest {
        requester,
        recipient: parse_user_id(&body.recipient_id, FieldName::new("recipientId"))?,
        requested_skill: body.requested_skill,
        offered_skill: body.offered_skill,
        message: body.message,
        scheduled_date: parse_optional_rfc3339_timestamp(
            body.scheduled_date.as_deref(),
            FieldName::new("scheduledDate"),
        )?,
    };

    let swap = state.swaps.create(request).await?;
    Ok(actix_web::HttpResponse::Created().json(SwapBody::from(&swap)))
}

/// List the acting user's swap requests.
#[utoipa::path(
    get,
    path = "/api/v1/swaps",
    params(ListSwapsQuery),
    responses(
        (status = 200, description = "Swap requests", body = SwapListBody),
        (status = 401, description = "Unauthorized", body = ErrorSchema)
    ),
    tags = ["swaps"],
    operation_id = "listSwapRequests",
    security(("SessionCookie" = []))
)]
#[get("/swaps")]
pub async fn list_swaps(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListSwapsQuery>,
) -> ApiResult<web::Json<SwapListBody>> {
    let acting_user = session.require_user_id()?;
    let (filter, page) = parse_filter(&query)?;

    let swaps = state
        .swaps_query
        .list(ListSwapsRequest {
            acting_user,
            filter,
            page,
        })
        .await?;

    let pagination = PaginationBody::from(&swaps);
    Ok(web::Json(SwapListBody {
        swap_requests: swaps.items.iter().map(SwapBody::from).collect(),
        pagination,
    }))
}

/// Fetch one swap request; participants only.
#[utoipa::path(
    get,
    path = "/api/v1/swaps/{id}",
    params(("id" = String, Path, format = "uuid", description = "Swap request id")),
    responses(
        (status = 200, description = "Swap request", body = SwapBody),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Not a participant", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["swaps"],
    operation_id = "getSwapRequest",
    security(("SessionCookie" = []))
)]
#[get("/swaps/{id}")]
pub async fn get_swap(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<SwapBody>> {
    let acting_user = session.require_user_id()?;
    let swap_id = parse_uuid(&path.into_inner(), FieldName::new("id"))?;
    let swap = state.swaps_query.get(swap_id, acting_user).await?;
    Ok(web::Json(SwapBody::from(&swap)))
}

fn parse_action_request(
    raw_id: &str,
    acting_user: UserId,
) -> Result<SwapActionRequest, Error> {
    Ok(SwapActionRequest {
        swap_id: parse_uuid(raw_id, FieldName::new("id"))?,
        acting_user,
    })
}

/// Accept a pending swap request; recipient only.
#[utoipa::path(
    put,
    path = "/api/v1/swaps/{id}/accept",
    params(("id" = String, Path, format = "uuid", description = "Swap request id")),
    responses(
        (status = 200, description = "Swap request accepted", body = SwapBody),
        (status = 403, description = "Only the recipient may accept", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "No longer pending", body = ErrorSchema)
    ),
    tags = ["swaps"],
    operation_id = "acceptSwapRequest",
    security(("SessionCookie" = []))
)]
#[put("/swaps/{id}/accept")]
pub async fn accept_swap(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<SwapBody>> {
    let request = parse_action_request(&path.into_inner(), session.require_user_id()?)?;
    let swap = state.swaps.accept(request).await?;
    Ok(web::Json(SwapBody::from(&swap)))
}

/// Reject a pending swap request; recipient only.
#[utoipa::path(
    put,
    path = "/api/v1/swaps/{id}/reject",
    params(("id" = String, Path, format = "uuid", description = "Swap request id")),
    responses(
        (status = 200, description = "Swap request rejected", body = SwapBody),
        (status = 403, description = "Only the recipient may reject", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "No longer pending", body = ErrorSchema)
    ),
    tags = ["swaps"],
    operation_id = "rejectSwapRequest",
    security(("SessionCookie" = []))
)]
#[put("/swaps/{id}/reject")]
pub async fn reject_swap(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<SwapBody>> {
    let request = parse_action_request(&path.into_inner(), session.require_user_id()?)?;
    let swap = state.swaps.reject(request).await?;
    Ok(web::Json(SwapBody::from(&swap)))
}

/// Cancel a pending swap request; requester only.
#[utoipa::path(
    put,
    path = "/api/v1/swaps/{id}/cancel",
    params(("id" = String, Path, format = "uuid", description = "Swap request id")),
    responses(
        (status = 200, description = "Swap request cancelled", body = SwapBody),
        (status = 403, description = "Only the requester may cancel", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "No longer pending", body = ErrorSchema)
    ),
    tags = ["swaps"],
    operation_id = "cancelSwapRequest",
    security(("SessionCookie" = []))
)]
#[put("/swaps/{id}/cancel")]
pub async fn cancel_swap(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<SwapBody>> {
    let request = parse_action_request(&path.into_inner(), session.require_user_id()?)?;
    let swap = state.swaps.cancel(request).await?;
    Ok(web::Json(SwapBody::from(&swap)))
}

/// Complete an accepted swap; either participant.
#[utoipa::path(
    put,
    path = "/api/v1/swaps/{id}/complete",
    params(("id" = String, Path, format = "uuid", description = "Swap request id")),
    responses(
        (status = 200, description = "Swap completed", body = SwapBody),
        (status = 403, description = "Not a participant", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Must be accepted first", body = ErrorSchema)
    ),
    tags = ["swaps"],
    operation_id = "completeSwapRequest",
    security(("SessionCookie" = []))
)]
#[put("/swaps/{id}/complete")]
pub async fn complete_swap(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<SwapBody>> {
    let request = parse_action_request(&path.into_inner(), session.require_user_id()?)?;
    let swap = state.swaps.complete(request).await?;
    Ok(web::Json(SwapBody::from(&swap)))
}

/// Whether the acting user may rate this swap.
#[utoipa::path(
    get,
    path = "/api/v1/swaps/{id}/can-rate",
    params(("id" = String, Path, format = "uuid", description = "Swap request id")),
    responses(
        (status = 200, description = "Eligibility probe result", body = CanRateBody),
        (status = 401, description = "Unauthorized", body = ErrorSchema)
    ),
    tags = ["swaps"],
    operation_id = "canRateSwap",
    security(("SessionCookie" = []))
)]
#[get("/swaps/{id}/can-rate")]
pub async fn can_rate_swap(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<CanRateBody>> {
    let acting_user = session.require_user_id()?;
    let swap_id = parse_uuid(&path.into_inner(), FieldName::new("id"))?;
    let can_rate = state.ratings_query.can_rate(swap_id, acting_user).await?;
    Ok(web::Json(CanRateBody { can_rate }))
}

#[cfg(test)]
#[path = "swaps_tests.rs"]
mod tests;
