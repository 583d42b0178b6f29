//! Tag handlers.
//!
//! ```text
//! GET    /api/v1/tags
//! PATCH  /api/v1/tags/{id}  {"name":"Vegan"}   (empty body allowed)
//! PUT    /api/v1/tags/{id}  {"name":"Vegan"}   (name required)
//! DELETE /api/v1/tags/{id}
//! ```
//!
//! Tags are created implicitly by recipe writes; there is no create route.

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::TagId;
use crate::domain::ports::UpdateMode;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::recipes::TagResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct TagUpdateRequest {
    #[serde(default)]
    #[schema(example = "Vegan")]
    pub name: Option<String>,
}

/// List the caller's tags, ordered by name descending.
#[utoipa::path(
    get,
    path = "/api/v1/tags",
    responses(
        (status = 200, description = "Tags owned by the caller", body = [TagResponse]),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema)
    ),
    tags = ["tags"],
    operation_id = "listTags"
)]
pub async fn list_tags(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<TagResponse>>> {
    let tags = state.tags_query.list(user.id()).await?;
    Ok(web::Json(tags.iter().map(TagResponse::from).collect()))
}

/// Rename a tag, leaving it unchanged when no name is supplied.
#[utoipa::path(
    patch,
    path = "/api/v1/tags/{id}",
    params(("id" = i64, Path, description = "Tag identifier")),
    request_body = TagUpdateRequest,
    responses(
        (status = 200, description = "Tag", body = TagResponse),
        (status = 400, description = "Blank or duplicate name", body = ErrorSchema),
        (status = 404, description = "Missing or owned by someone else", body = ErrorSchema)
    ),
    tags = ["tags"],
    operation_id = "patchTag"
)]
pub async fn patch_tag(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    payload: web::Json<TagUpdateRequest>,
) -> ApiResult<web::Json<TagResponse>> {
    let id = TagId::new(path.into_inner());
    let tag = state
        .tags
        .rename(user.id(), id, payload.into_inner().name, UpdateMode::Partial)
        .await?;
    Ok(web::Json(TagResponse::from(&tag)))
}

/// Rename a tag; `name` is required.
#[utoipa::path(
    put,
    path = "/api/v1/tags/{id}",
    params(("id" = i64, Path, description = "Tag identifier")),
    request_body = TagUpdateRequest,
    responses(
        (status = 200, description = "Tag", body = TagResponse),
        (status = 400, description = "Missing, blank or duplicate name", body = ErrorSchema),
        (status = 404, description = "Missing or owned by someone else", body = ErrorSchema)
    ),
    tags = ["tags"],
    operation_id = "putTag"
)]
pub async fn put_tag(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    payload: web::Json<TagUpdateRequest>,
) -> ApiResult<web::Json<TagResponse>> {
    let id = TagId::new(path.into_inner());
    let tag = state
        .tags
        .rename(user.id(), id, payload.into_inner().name, UpdateMode::Full)
        .await?;
    Ok(web::Json(TagResponse::from(&tag)))
}

/// Delete a tag and detach it from every recipe.
#[utoipa::path(
    delete,
    path = "/api/v1/tags/{id}",
    params(("id" = i64, Path, description = "Tag identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Missing or owned by someone else", body = ErrorSchema)
    ),
    tags = ["tags"],
    operation_id = "deleteTag"
)]
pub async fn delete_tag(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .tags
        .delete(user.id(), TagId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
