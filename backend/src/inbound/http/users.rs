//! User directory and profile HTTP handlers.
//!
//! ```text
//! GET    /api/v1/users?skill=guitar&page=1&limit=10
//! GET    /api/v1/users/{id}
//! PUT    /api/v1/users/profile
//! POST   /api/v1/users/skills/{side}
//! DELETE /api/v1/users/skills/{side}/{name}
//! ```

use actix_web::{delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::pagination::PageRequest;
use crate::domain::ports::{
    AddSkillRequest, ProfileCommand as _, RemoveSkillRequest, UpdateProfileRequest, UserSearch,
    UsersQuery as _,
};
use crate::domain::skill::Skill;
use crate::domain::user::{DisplayName, Location, ProfileUpdate};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{PaginationBody, UserBody};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_availability, parse_skill_level, parse_skill_side, parse_user_id,
};

/// Query parameters for the public user listing.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersQuery {
    /// Case-insensitive skill-name filter matching either skill list.
    pub skill: Option<String>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size, capped at 100.
    pub limit: Option<u32>,
}

/// Response payload for user listings.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserListBody {
    /// One page of public profiles.
    pub users: Vec<UserBody>,
    /// Pagination envelope.
    pub pagination: PaginationBody,
}

/// Request payload for a partial profile update.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileBody {
    /// Replacement display name.
    pub display_name: Option<String>,
    /// Replacement location.
    pub location: Option<String>,
    /// Replacement availability.
    pub availability: Option<String>,
    /// Replacement public-profile flag.
    pub is_profile_public: Option<bool>,
}

/// Request payload for listing a new skill.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddSkillBody {
    /// Skill name, unique per side (case-insensitive).
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Proficiency level.
    pub level: String,
}

/// List public, non-banned users.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Public profiles", body = UserListBody),
        (status = 401, description = "Unauthorized", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security(("SessionCookie" = []))
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListUsersQuery>,
) -> ApiResult<web::Json<UserListBody>> {
    session.require_user_id()?;

    let page = state
        .users_query
        .list(
            UserSearch {
                skill: query.skill.clone(),
            },
            PageRequest::new(query.page.unwrap_or(1), query.limit.unwrap_or(0)),
        )
        .await?;

    let pagination = PaginationBody::from(&page);
    Ok(web::Json(UserListBody {
        users: page.items.iter().map(UserBody::from).collect(),
        pagination,
    }))
}

/// Fetch a user's profile; private profiles are owner-only.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, format = "uuid", description = "User id")),
    responses(
        (status = 200, description = "Profile", body = UserBody),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Profile is private", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser",
    security(("SessionCookie" = []))
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserBody>> {
    let viewer = session.require_user_id()?;
    let user_id = parse_user_id(&path.into_inner(), FieldName::new("id"))?;
    let user = state.users_query.get_profile(user_id, Some(viewer)).await?;
    Ok(web::Json(UserBody::from(&user)))
}

fn parse_profile_update(body: UpdateProfileBody) -> Result<ProfileUpdate, Error> {
    Ok(ProfileUpdate {
        display_name: body
            .display_name
            .map(|raw| DisplayName::new(raw).map_err(|err| Error::invalid_request(err.to_string())))
            .transpose()?,
        location: body
            .location
            .map(|raw| Location::new(raw).map_err(|err| Error::invalid_request(err.to_string())))
            .transpose()?,
        availability: body
            .availability
            .map(|raw| parse_availability(&raw, FieldName::new("availability")))
            .transpose()?,
        is_profile_public: body.is_profile_public,
    })
}

/// Update the acting user's profile.
#[utoipa::path(
    put,
    path = "/api/v1/users/profile",
    request_body = UpdateProfileBody,
    responses(
        (status = 200, description = "Profile updated", body = UserBody),
        (status = 400, description = "Invalid field", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateProfile",
    security(("SessionCookie" = []))
)]
#[put("/users/profile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UpdateProfileBody>,
) -> ApiResult<web::Json<UserBody>> {
    let acting_user = session.require_user_id()?;
    let update = parse_profile_update(payload.into_inner())?;

    let user = state
        .profile
        .update_profile(UpdateProfileRequest {
            acting_user,
            update,
        })
        .await?;
    Ok(web::Json(UserBody::from(&user)))
}

/// Add a skill to the acting user's offered or wanted list.
#[utoipa::path(
    post,
    path = "/api/v1/users/skills/{side}",
    params(("side" = String, Path, description = "Skill list: offered or wanted")),
    request_body = AddSkillBody,
    responses(
        (status = 200, description = "Skill added", body = UserBody),
        (status = 400, description = "Invalid skill or duplicate name", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "addSkill",
    security(("SessionCookie" = []))
)]
#[post("/users/skills/{side}")]
pub async fn add_skill(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<AddSkillBody>,
) -> ApiResult<web::Json<UserBody>> {
    let acting_user = session.require_user_id()?;
    let side = parse_skill_side(&path.into_inner(), FieldName::new("side"))?;
    let body = payload.into_inner();

    let level = parse_skill_level(&body.level, FieldName::new("level"))?;
    let skill = Skill::new(body.name, body.description, level)
        .map_err(|err| Error::invalid_request(err.to_string()))?;

    let user = state
        .profile
        .add_skill(AddSkillRequest {
            acting_user,
            side,
            skill,
        })
        .await?;
    Ok(web::Json(UserBody::from(&user)))
}

/// Remove a skill from the acting user's offered or wanted list.
#[utoipa::path(
    delete,
    path = "/api/v1/users/skills/{side}/{name}",
    params(
        ("side" = String, Path, description = "Skill list: offered or wanted"),
        ("name" = String, Path, description = "Case-insensitive skill name")
    ),
    responses(
        (status = 200, description = "Skill removed", body = UserBody),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Skill not listed", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "removeSkill",
    security(("SessionCookie" = []))
)]
#[delete("/users/skills/{side}/{name}")]
pub async fn remove_skill(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<UserBody>> {
    let acting_user = session.require_user_id()?;
    let (side_raw, name) = path.into_inner();
    let side = parse_skill_side(&side_raw, FieldName::new("side"))?;

    let user = state
        .profile
        .remove_skill(RemoveSkillRequest {
            acting_user,
            side,
            name,
        })
        .await?;
    Ok(web::Json(UserBody::from(&user)))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
