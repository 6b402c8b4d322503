//! Admin moderation HTTP handlers.
//!
//! ```text
//! POST /api/v1/admin/users/{id}/ban
//! POST /api/v1/admin/users/{id}/unban
//! ```
//!
//! Role enforcement happens in the moderation service, which rejects
//! non-admin actors with a forbidden error.

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{BanUserRequest, ModerationCommand as _, UnbanUserRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::ModeratedUserBody;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_user_id};

/// Request payload for banning a user.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BanUserBody {
    /// Reason recorded with the ban.
    pub reason: Option<String>,
}

/// Ban a user; admin only.
#[utoipa::path(
    post,
    path = "/api/v1/admin/users/{id}/ban",
    params(("id" = String, Path, format = "uuid", description = "User id")),
    request_body = BanUserBody,
    responses(
        (status = 200, description = "User banned", body = ModeratedUserBody),
        (status = 400, description = "Already banned or an admin", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Admin access required", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "banUser",
    security(("SessionCookie" = []))
)]
#[post("/admin/users/{id}/ban")]
pub async fn ban_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<BanUserBody>,
) -> ApiResult<web::Json<ModeratedUserBody>> {
    let acting_user = session.require_user_id()?;
    let user_id = parse_user_id(&path.into_inner(), FieldName::new("id"))?;

    let user = state
        .moderation
        .ban(BanUserRequest {
            acting_user,
            user_id,
            reason: payload.into_inner().reason,
        })
        .await?;
    Ok(web::Json(ModeratedUserBody::from(&user)))
}

/// Lift a user's ban; admin only.
#[utoipa::path(
    post,
    path = "/api/v1/admin/users/{id}/unban",
    params(("id" = String, Path, format = "uuid", description = "User id")),
    responses(
        (status = 200, description = "Ban lifted", body = ModeratedUserBody),
        (status = 400, description = "User is not banned", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Admin access required", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "unbanUser",
    security(("SessionCookie" = []))
)]
#[post("/admin/users/{id}/unban")]
pub async fn unban_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ModeratedUserBody>> {
    let acting_user = session.require_user_id()?;
    let user_id = parse_user_id(&path.into_inner(), FieldName::new("id"))?;

    let user = state
        .moderation
        .unban(UnbanUserRequest {
            acting_user,
            user_id,
        })
        .await?;
    Ok(web::Json(ModeratedUserBody::from(&user)))
}

#[cfg(test)]
#[path = "admin_tests.rs"]
mod tests;
