//! PostgreSQL-backed `RecipeRepository` implementation using Diesel ORM.
//!
//! Writes that touch tags run in one transaction so the recipe row, any
//! newly created tags and the association rows commit together.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{RecipeRepository, RecipeRepositoryError};
use crate::domain::{
    Price, Recipe, RecipeChanges, RecipeDraft, RecipeId, RecipeLink, RecipeTitle, RequestedTags,
    UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewRecipeRow, RecipeRow, RecipeUpdate, TagRow};
use super::pool::{DbPool, PoolError};
use super::schema::recipes;
use super::tag_sync::{
    SyncError, load_recipe_tags, reconcile_tags, replace_recipe_tags, tag_from_row,
};

/// Diesel-backed implementation of the recipe repository port.
#[derive(Clone)]
pub struct DieselRecipeRepository {
    pool: DbPool,
}

impl DieselRecipeRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RecipeRepositoryError {
    map_basic_pool_error(error, RecipeRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> RecipeRepositoryError {
    map_basic_diesel_error(
        error,
        RecipeRepositoryError::query,
        RecipeRepositoryError::connection,
    )
}

fn map_sync_error(error: SyncError) -> RecipeRepositoryError {
    match error {
        SyncError::Diesel(err) => map_diesel_error(err),
        SyncError::Unresolved(err) => RecipeRepositoryError::query(err.to_string()),
    }
}

/// Rebuild a domain recipe from its row and ordered tag rows.
fn recipe_from_rows(row: RecipeRow, tags: Vec<TagRow>) -> Result<Recipe, RecipeRepositoryError> {
    let RecipeRow {
        id,
        user_id,
        title,
        description,
        time_minutes,
        price,
        link,
    } = row;

    let corrupt = |field: &str, err: &dyn std::fmt::Display| {
        RecipeRepositoryError::query(format!("stored {field} for recipe {id}: {err}"))
    };
    let draft = RecipeDraft {
        title: RecipeTitle::new(&title).map_err(|err| corrupt("title", &err))?,
        description,
        time_minutes,
        price: Price::new(price).map_err(|err| corrupt("price", &err))?,
        link: RecipeLink::new(&link).map_err(|err| corrupt("link", &err))?,
    };
    let tags = tags
        .into_iter()
        .map(tag_from_row)
        .collect::<Result<Vec<_>, _>>()
        .map_err(RecipeRepositoryError::query)?;

    Ok(Recipe::new(
        RecipeId::new(id),
        UserId::new(user_id),
        draft,
        tags,
    ))
}

fn changeset(changes: &RecipeChanges) -> RecipeUpdate<'_> {
    RecipeUpdate {
        title: changes.title.as_ref().map(AsRef::as_ref),
        description: changes.description.as_deref(),
        time_minutes: changes.time_minutes,
        price: changes.price.map(|price| price.amount()),
        link: changes.link.as_ref().map(AsRef::as_ref),
    }
}

#[async_trait]
impl RecipeRepository for DieselRecipeRepository {
    async fn list_for_owner(&self, owner: UserId) -> Result<Vec<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<RecipeRow> = recipes::table
            .filter(recipes::user_id.eq(owner.as_i64()))
            .order(recipes::id.desc())
            .select(RecipeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let mut tags = load_recipe_tags(&mut conn, &ids)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|row| {
                let recipe_tags = tags.remove(&row.id).unwrap_or_default();
                recipe_from_rows(row, recipe_tags)
            })
            .collect()
    }

    async fn find_for_owner(
        &self,
        owner: UserId,
        id: RecipeId,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let Some(row) = recipes::table
            .filter(recipes::id.eq(id.as_i64()))
            .filter(recipes::user_id.eq(owner.as_i64()))
            .select(RecipeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
        else {
            return Ok(None);
        };

        let mut tags = load_recipe_tags(&mut conn, &[row.id])
            .await
            .map_err(map_diesel_error)?;
        let recipe_tags = tags.remove(&row.id).unwrap_or_default();
        recipe_from_rows(row, recipe_tags).map(Some)
    }

    async fn create(
        &self,
        owner: UserId,
        draft: RecipeDraft,
        tags: Option<RequestedTags>,
    ) -> Result<Recipe, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owner_id = owner.as_i64();
        let new_row = NewRecipeRow {
            user_id: owner_id,
            title: draft.title.as_ref(),
            description: &draft.description,
            time_minutes: draft.time_minutes,
            price: draft.price.amount(),
            link: draft.link.as_ref(),
        };
        let requested = tags.unwrap_or_default();

        let (row, tag_rows) = conn
            .transaction::<_, SyncError, _>(|conn| {
                async move {
                    let row: RecipeRow = diesel::insert_into(recipes::table)
                        .values(&new_row)
                        .returning(RecipeRow::as_returning())
                        .get_result(conn)
                        .await?;
                    let tag_rows = reconcile_tags(conn, owner_id, &requested).await?;
                    replace_recipe_tags(conn, owner_id, row.id, &tag_rows).await?;
                    Ok((row, tag_rows))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_sync_error)?;

        debug!(recipe_id = row.id, owner = owner_id, tags = tag_rows.len(), "recipe created");
        recipe_from_rows(row, tag_rows)
    }

    async fn update(
        &self,
        owner: UserId,
        id: RecipeId,
        changes: RecipeChanges,
        tags: Option<RequestedTags>,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owner_id = owner.as_i64();
        let recipe_id = id.as_i64();
        let update = (!changes.is_empty()).then(|| changeset(&changes));

        let updated = conn
            .transaction::<_, SyncError, _>(|conn| {
                async move {
                    let scoped = recipes::table
                        .filter(recipes::id.eq(recipe_id))
                        .filter(recipes::user_id.eq(owner_id));

                    let row: Option<RecipeRow> = match update {
                        Some(update) => diesel::update(scoped)
                            .set(&update)
                            .returning(RecipeRow::as_returning())
                            .get_result(conn)
                            .await
                            .optional()?,
                        None => scoped
                            .select(RecipeRow::as_select())
                            .first(conn)
                            .await
                            .optional()?,
                    };
                    let Some(row) = row else {
                        return Ok(None);
                    };

                    let tag_rows = match tags {
                        Some(requested) => {
                            let tag_rows = reconcile_tags(conn, owner_id, &requested).await?;
                            replace_recipe_tags(conn, owner_id, recipe_id, &tag_rows).await?;
                            tag_rows
                        }
                        None => load_recipe_tags(conn, &[recipe_id])
                            .await?
                            .remove(&recipe_id)
                            .unwrap_or_default(),
                    };
                    Ok(Some((row, tag_rows)))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_sync_error)?;

        updated
            .map(|(row, tag_rows)| recipe_from_rows(row, tag_rows))
            .transpose()
    }

    async fn delete(&self, owner: UserId, id: RecipeId) -> Result<bool, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            recipes::table
                .filter(recipes::id.eq(id.as_i64()))
                .filter(recipes::user_id.eq(owner.as_i64())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}
