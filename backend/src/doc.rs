//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer, the wire
//! schemas they exchange, and the token authentication scheme. The document
//! backs Swagger UI in debug builds and `cargo run --bin openapi-dump`.

use crate::inbound::http::recipes::{
    RecipeDetail, RecipeRequest, RecipeSummary, TagInput, TagResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::tags::TagUpdateRequest;
use crate::inbound::http::users::{
    ProfileUpdateRequest, RegisterRequest, TokenRequest, TokenResponse, UserResponse,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name under which the token scheme is registered.
pub const TOKEN_SECURITY_SCHEME: &str = "Token";

/// Adds the `Authorization: Token <key>` security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            TOKEN_SECURITY_SCHEME,
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "Authorization",
                "`Token <key>` using the key issued by POST /api/v1/users/token.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Recipes backend API",
        description = "Token-authenticated recipe and tag management with per-user isolation.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("Token" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::create_token,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::update_current_user,
        crate::inbound::http::recipes::list_recipes,
        crate::inbound::http::recipes::create_recipe,
        crate::inbound::http::recipes::get_recipe,
        crate::inbound::http::recipes::patch_recipe,
        crate::inbound::http::recipes::put_recipe,
        crate::inbound::http::recipes::delete_recipe,
        crate::inbound::http::tags::list_tags,
        crate::inbound::http::tags::patch_tag,
        crate::inbound::http::tags::put_tag,
        crate::inbound::http::tags::delete_tag,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        RegisterRequest,
        TokenRequest,
        TokenResponse,
        ProfileUpdateRequest,
        UserResponse,
        RecipeRequest,
        RecipeSummary,
        RecipeDetail,
        TagInput,
        TagResponse,
        TagUpdateRequest,
    )),
    tags(
        (name = "users", description = "Registration, tokens and the caller's profile"),
        (name = "recipes", description = "Recipes owned by the caller"),
        (name = "tags", description = "Tags owned by the caller"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
