//! Recipe handlers and wire shapes.
//!
//! ```text
//! GET    /api/v1/recipes
//! POST   /api/v1/recipes       {"title":"Soup","timeMinutes":10,"price":"5.50","tags":[{"name":"Vegan"}]}
//! GET    /api/v1/recipes/{id}
//! PATCH  /api/v1/recipes/{id}  {"title":"Better soup"}
//! PUT    /api/v1/recipes/{id}  {"title":"Soup","timeMinutes":10,"price":"5.50"}
//! DELETE /api/v1/recipes/{id}
//! ```
//!
//! Every route is scoped to the authenticated user; somebody else's recipe
//! answers 404 exactly like a missing one.

use actix_web::{HttpResponse, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{RecipePayload, UpdateMode};
use crate::domain::{Recipe, RecipeId, Tag};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// A tag reference in a write payload: `{"name": "Vegan"}` or `"Vegan"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(untagged)]
pub enum TagInput {
    Named { name: String },
    Bare(String),
}

impl TagInput {
    fn into_name(self) -> String {
        match self {
            Self::Named { name } | Self::Bare(name) => name,
        }
    }
}

/// Create/update body. Unknown keys, including any owner field, are ignored.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "time_minutes")]
    pub time_minutes: Option<i32>,
    /// Decimal string or number, at most 5 digits with 2 decimal places.
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "5.50")]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub link: Option<String>,
    /// Present (even empty) replaces the recipe's tags; absent keeps them.
    #[serde(default)]
    pub tags: Option<Vec<TagInput>>,
}

impl From<RecipeRequest> for RecipePayload {
    fn from(request: RecipeRequest) -> Self {
        let RecipeRequest {
            title,
            description,
            time_minutes,
            price,
            link,
            tags,
        } = request;
        Self {
            title,
            description,
            time_minutes,
            price,
            link,
            tags: tags.map(|tags| tags.into_iter().map(TagInput::into_name).collect()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct TagResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Vegan")]
    pub name: String,
}

impl From<&Tag> for TagResponse {
    fn from(tag: &Tag) -> Self {
        Self {
            id: tag.id().as_i64(),
            name: tag.name().to_string(),
        }
    }
}

/// List item shape.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    pub id: i64,
    #[schema(example = "Sample recipe")]
    pub title: String,
    #[schema(example = 10)]
    pub time_minutes: i32,
    /// Always rendered with two decimal places.
    #[schema(example = "5.00")]
    pub price: String,
    pub link: String,
    pub tags: Vec<TagResponse>,
}

impl From<&Recipe> for RecipeSummary {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id().as_i64(),
            title: recipe.title().as_ref().to_owned(),
            time_minutes: recipe.time_minutes(),
            price: recipe.price().to_string(),
            link: recipe.link().as_ref().to_owned(),
            tags: recipe.tags().iter().map(TagResponse::from).collect(),
        }
    }
}

/// Single-recipe shape: the summary plus the description.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub summary: RecipeSummary,
    pub description: String,
}

impl From<&Recipe> for RecipeDetail {
    fn from(recipe: &Recipe) -> Self {
        Self {
            summary: RecipeSummary::from(recipe),
            description: recipe.description().to_owned(),
        }
    }
}

/// List the caller's recipes, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/recipes",
    responses(
        (status = 200, description = "Recipes owned by the caller", body = [RecipeSummary]),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "listRecipes"
)]
pub async fn list_recipes(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<RecipeSummary>>> {
    let recipes = state.recipes_query.list(user.id()).await?;
    Ok(web::Json(recipes.iter().map(RecipeSummary::from).collect()))
}

/// Create a recipe owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/recipes",
    request_body = RecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeDetail),
        (status = 400, description = "Missing or invalid fields", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "createRecipe"
)]
pub async fn create_recipe(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<HttpResponse> {
    let recipe = state
        .recipes
        .create(user.id(), payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(RecipeDetail::from(&recipe)))
}

/// Fetch one of the caller's recipes.
#[utoipa::path(
    get,
    path = "/api/v1/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe identifier")),
    responses(
        (status = 200, description = "Recipe", body = RecipeDetail),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 404, description = "Missing or owned by someone else", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "getRecipe"
)]
pub async fn get_recipe(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<web::Json<RecipeDetail>> {
    let id = RecipeId::new(path.into_inner());
    let recipe = state.recipes_query.get(user.id(), id).await?;
    Ok(web::Json(RecipeDetail::from(&recipe)))
}

async fn update(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    payload: web::Json<RecipeRequest>,
    mode: UpdateMode,
) -> ApiResult<web::Json<RecipeDetail>> {
    let id = RecipeId::new(path.into_inner());
    let recipe = state
        .recipes
        .update(user.id(), id, payload.into_inner().into(), mode)
        .await?;
    Ok(web::Json(RecipeDetail::from(&recipe)))
}

/// Change only the supplied fields.
#[utoipa::path(
    patch,
    path = "/api/v1/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe identifier")),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Updated recipe", body = RecipeDetail),
        (status = 400, description = "Invalid fields", body = ErrorSchema),
        (status = 404, description = "Missing or owned by someone else", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "patchRecipe"
)]
pub async fn patch_recipe(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<web::Json<RecipeDetail>> {
    update(state, user, path, payload, UpdateMode::Partial).await
}

/// Replace the recipe; `title`, `timeMinutes` and `price` are required.
#[utoipa::path(
    put,
    path = "/api/v1/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe identifier")),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Updated recipe", body = RecipeDetail),
        (status = 400, description = "Missing or invalid fields", body = ErrorSchema),
        (status = 404, description = "Missing or owned by someone else", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "putRecipe"
)]
pub async fn put_recipe(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<web::Json<RecipeDetail>> {
    update(state, user, path, payload, UpdateMode::Full).await
}

/// Delete a recipe. Its tags are kept.
#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Missing or owned by someone else", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "deleteRecipe"
)]
pub async fn delete_recipe(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .recipes
        .delete(user.id(), RecipeId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "recipes_tests.rs"]
mod tests;
