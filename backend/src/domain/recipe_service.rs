//! Recipe domain service.
//!
//! Validates raw recipe payloads and drives the owner-scoped recipe
//! repository. Ownership is always taken from the caller; payloads cannot
//! name an owner.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    RecipeCommand, RecipePayload, RecipeQuery, RecipeRepository, RecipeRepositoryError,
    UpdateMode,
};
use crate::domain::tag_service::parse_requested_tags;
use crate::domain::{
    Error, FieldErrorCode, Price, Recipe, RecipeChanges, RecipeDraft, RecipeId, RecipeLink,
    RecipeTitle, RecipeValidationError, RequestedTags, UserId, field_error, missing_fields_error,
};

fn map_repository_error(error: RecipeRepositoryError) -> Error {
    match error {
        RecipeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("recipe repository unavailable: {message}"))
        }
        RecipeRepositoryError::Query { message } => {
            Error::internal(format!("recipe repository error: {message}"))
        }
    }
}

fn map_validation_error(error: RecipeValidationError) -> Error {
    let (field, code) = match &error {
        RecipeValidationError::EmptyTitle => ("title", FieldErrorCode::Blank),
        RecipeValidationError::TitleTooLong { .. } => ("title", FieldErrorCode::TooLong),
        RecipeValidationError::LinkTooLong { .. } => ("link", FieldErrorCode::TooLong),
        RecipeValidationError::NegativePrice
        | RecipeValidationError::PriceTooPrecise { .. }
        | RecipeValidationError::PriceTooLarge { .. } => ("price", FieldErrorCode::Invalid),
    };
    field_error(field, code, error.to_string())
}

fn not_found(id: RecipeId) -> Error {
    Error::not_found(format!("recipe {id} not found"))
}

fn require_fields(payload: &RecipePayload) -> Result<(), Error> {
    let missing: Vec<&str> = [
        ("title", payload.title.is_none()),
        ("timeMinutes", payload.time_minutes.is_none()),
        ("price", payload.price.is_none()),
    ]
    .into_iter()
    .filter_map(|(field, absent)| absent.then_some(field))
    .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing_fields_error(&missing))
    }
}

fn parse_tags(tags: Option<Vec<String>>) -> Result<Option<RequestedTags>, Error> {
    tags.map(parse_requested_tags).transpose()
}

/// Validate every supplied field, leaving absent ones as `None`.
fn parse_changes(payload: RecipePayload) -> Result<(RecipeChanges, Option<RequestedTags>), Error> {
    let RecipePayload {
        title,
        description,
        time_minutes,
        price,
        link,
        tags,
    } = payload;

    let changes = RecipeChanges {
        title: title
            .as_deref()
            .map(RecipeTitle::new)
            .transpose()
            .map_err(map_validation_error)?,
        description,
        time_minutes,
        price: price
            .map(Price::new)
            .transpose()
            .map_err(map_validation_error)?,
        link: link
            .as_deref()
            .map(RecipeLink::new)
            .transpose()
            .map_err(map_validation_error)?,
    };
    Ok((changes, parse_tags(tags)?))
}

fn parse_draft(payload: RecipePayload) -> Result<(RecipeDraft, Option<RequestedTags>), Error> {
    require_fields(&payload)?;
    let (changes, tags) = parse_changes(payload)?;
    let RecipeChanges {
        title: Some(title),
        description,
        time_minutes: Some(time_minutes),
        price: Some(price),
        link,
    } = changes
    else {
        return Err(Error::internal("required recipe fields vanished during parsing"));
    };

    let draft = RecipeDraft {
        title,
        description: description.unwrap_or_default(),
        time_minutes,
        price,
        link: link.unwrap_or_default(),
    };
    Ok((draft, tags))
}

/// Recipe service implementing [`RecipeCommand`] and [`RecipeQuery`].
#[derive(Clone)]
pub struct RecipeService<R> {
    recipes: Arc<R>,
}

impl<R> RecipeService<R> {
    /// Create a new service with the recipe repository.
    pub fn new(recipes: Arc<R>) -> Self {
        Self { recipes }
    }
}

#[async_trait]
impl<R> RecipeCommand for RecipeService<R>
where
    R: RecipeRepository,
{
    async fn create(&self, owner: UserId, payload: RecipePayload) -> Result<Recipe, Error> {
        let (draft, tags) = parse_draft(payload)?;
        let recipe = self
            .recipes
            .create(owner, draft, tags)
            .await
            .map_err(map_repository_error)?;
        debug!(owner = %owner, recipe_id = %recipe.id(), "recipe created");
        Ok(recipe)
    }

    async fn update(
        &self,
        owner: UserId,
        id: RecipeId,
        payload: RecipePayload,
        mode: UpdateMode,
    ) -> Result<Recipe, Error> {
        // Foreign or missing ids report 404 before any payload complaint.
        RecipeQuery::get(self, owner, id).await?;

        if mode == UpdateMode::Full {
            require_fields(&payload)?;
        }
        let (changes, tags) = parse_changes(payload)?;

        self.recipes
            .update(owner, id, changes, tags)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(id))
    }

    async fn delete(&self, owner: UserId, id: RecipeId) -> Result<(), Error> {
        let deleted = self
            .recipes
            .delete(owner, id)
            .await
            .map_err(map_repository_error)?;
        if !deleted {
            return Err(not_found(id));
        }
        debug!(owner = %owner, recipe_id = %id, "recipe deleted");
        Ok(())
    }
}

#[async_trait]
impl<R> RecipeQuery for RecipeService<R>
where
    R: RecipeRepository,
{
    async fn list(&self, owner: UserId) -> Result<Vec<Recipe>, Error> {
        self.recipes
            .list_for_owner(owner)
            .await
            .map_err(map_repository_error)
    }

    async fn get(&self, owner: UserId, id: RecipeId) -> Result<Recipe, Error> {
        self.recipes
            .find_for_owner(owner, id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(id))
    }
}

#[cfg(test)]
#[path = "recipe_service_tests.rs"]
mod tests;
