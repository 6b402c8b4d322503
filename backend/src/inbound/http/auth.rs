//! Session endpoints.
//!
//! ```text
//! POST /api/v1/login {"userId":"..."}
//! POST /api/v1/logout
//! ```
//!
//! Credential verification is owned by an external collaborator; login here
//! binds an existing, non-banned user id to the session cookie so the rest of
//! the API has an acting user.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::UsersQuery as _;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_user_id};

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequestBody {
    /// Identifier of the user to bind to the session.
    #[schema(format = "uuid")]
    pub user_id: String,
}

/// Establish a session for an existing, non-banned user.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequestBody,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Account banned", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequestBody>,
) -> ApiResult<HttpResponse> {
    let user_id = parse_user_id(&payload.user_id, FieldName::new("userId"))?;
    let user = state.users_query.get_user(user_id).await?;
    if user.is_banned() {
        return Err(crate::domain::Error::forbidden("this account is banned"));
    }
    session.persist_user(user.id())?;
    Ok(HttpResponse::Ok().finish())
}

/// Drop the current session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 200, description = "Session cleared")
    ),
    tags = ["auth"],
    operation_id = "logout",
    security(("SessionCookie" = []))
)]
#[post("/logout")]
#[expect(clippy::unused_async, reason = "actix handlers must be async")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::Ok().finish()
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
