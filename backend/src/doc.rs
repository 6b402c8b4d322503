//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct which generates the OpenAPI specification
//! for the REST API: all HTTP endpoints from the inbound layer, the schema
//! wrappers that keep domain types decoupled from utoipa, and the session
//! cookie security scheme. The generated document backs Swagger UI in debug
//! builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::dto::{
    ModeratedUserBody, PaginationBody, RatingBody, SkillBody, SkillSnapshotBody, SwapBody,
    UserBody,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Skill swap backend API",
        description = "HTTP interface for the skill-exchange marketplace: \
                       swap lifecycle, ratings, user profiles, and moderation."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_profile,
        crate::inbound::http::users::add_skill,
        crate::inbound::http::users::remove_skill,
        crate::inbound::http::swaps::create_swap,
        crate::inbound::http::swaps::list_swaps,
        crate::inbound::http::swaps::get_swap,
        crate::inbound::http::swaps::accept_swap,
        crate::inbound::http::swaps::reject_swap,
        crate::inbound::http::swaps::cancel_swap,
        crate::inbound::http::swaps::complete_swap,
        crate::inbound::http::swaps::can_rate_swap,
        crate::inbound::http::ratings::submit_rating,
        crate::inbound::http::ratings::list_my_ratings,
        crate::inbound::http::ratings::list_user_ratings,
        crate::inbound::http::ratings::get_rating,
        crate::inbound::http::ratings::update_rating,
        crate::inbound::http::ratings::delete_rating,
        crate::inbound::http::admin::ban_user,
        crate::inbound::http::admin::unban_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        UserBody,
        ModeratedUserBody,
        SkillBody,
        SkillSnapshotBody,
        SwapBody,
        RatingBody,
        PaginationBody,
    )),
    tags(
        (name = "auth", description = "Session management"),
        (name = "users", description = "User directory, profiles, and skill lists"),
        (name = "swaps", description = "Swap request lifecycle"),
        (name = "ratings", description = "Ratings against completed swaps"),
        (name = "admin", description = "Moderation operations"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI schema field structure.

    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    use super::*;

    // Note: utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn openapi_error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
    }

    #[test]
    fn openapi_swap_schema_uses_camel_case() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let swap_schema = schemas.get("SwapBody").expect("SwapBody schema");

        assert_object_schema_has_field(swap_schema, "requesterId");
        assert_object_schema_has_field(swap_schema, "requestedSkill");
    }

    #[test]
    fn openapi_document_lists_every_lifecycle_path() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/swaps",
            "/api/v1/swaps/{id}/accept",
            "/api/v1/swaps/{id}/reject",
            "/api/v1/swaps/{id}/cancel",
            "/api/v1/swaps/{id}/complete",
            "/api/v1/ratings",
        ] {
            assert!(
                doc.paths.paths.contains_key(path),
                "OpenAPI document should describe {path}"
            );
        }
    }
}
