//! Tag reconciliation and association writes shared by the recipe and tag
//! repositories.
//!
//! Every function here expects to run inside the caller's transaction.
//! Missing tags are inserted with `ON CONFLICT (user_id, name) DO NOTHING`
//! and then re-read, so concurrent writers requesting the same new name
//! converge on a single row.

use std::collections::HashMap;

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use thiserror::Error;

use crate::domain::{RequestedTags, Tag, TagId, TagName, UnresolvedTag, UserId};

use super::models::{NewRecipeTagRow, NewTagRow, TagRow};
use super::schema::{recipe_tags, tags};

/// Failure inside a transaction that touches tags.
#[derive(Debug, Error)]
pub(crate) enum SyncError {
    #[error(transparent)]
    Diesel(#[from] diesel::result::Error),
    #[error(transparent)]
    Unresolved(#[from] UnresolvedTag),
}

/// Convert a stored tag row into a domain tag.
pub(crate) fn tag_from_row(row: TagRow) -> Result<Tag, String> {
    let name = TagName::new(&row.name).map_err(|err| format!("stored tag {}: {err}", row.id))?;
    Ok(Tag::new(TagId::new(row.id), UserId::new(row.user_id), name))
}

async fn load_named(
    conn: &mut AsyncPgConnection,
    owner: i64,
    names: &[&str],
) -> Result<Vec<TagRow>, diesel::result::Error> {
    tags::table
        .filter(tags::user_id.eq(owner))
        .filter(tags::name.eq_any(names.iter().copied()))
        .select(TagRow::as_select())
        .load(conn)
        .await
}

/// Get-or-create the requested tags for `owner`, in request order.
pub(crate) async fn reconcile_tags(
    conn: &mut AsyncPgConnection,
    owner: i64,
    requested: &RequestedTags,
) -> Result<Vec<TagRow>, SyncError> {
    if requested.is_empty() {
        return Ok(Vec::new());
    }
    let names: Vec<&str> = requested.names().iter().map(AsRef::as_ref).collect();

    let existing = load_named(conn, owner, &names).await?;
    let missing = requested.missing_from(&existing, |row| row.name.as_str());
    if !missing.is_empty() {
        let rows: Vec<NewTagRow<'_>> = missing
            .iter()
            .map(|name| NewTagRow {
                user_id: owner,
                name: name.as_ref(),
            })
            .collect();
        diesel::insert_into(tags::table)
            .values(&rows)
            .on_conflict((tags::user_id, tags::name))
            .do_nothing()
            .execute(conn)
            .await?;
    }

    let resolved = load_named(conn, owner, &names).await?;
    Ok(requested.arrange(resolved, |row| row.name.as_str())?)
}

/// Replace a recipe's associations with `tags`, keeping their order.
pub(crate) async fn replace_recipe_tags(
    conn: &mut AsyncPgConnection,
    owner: i64,
    recipe_id: i64,
    tags: &[TagRow],
) -> Result<(), diesel::result::Error> {
    diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
        .execute(conn)
        .await?;
    if tags.is_empty() {
        return Ok(());
    }

    let rows: Vec<NewRecipeTagRow> = tags
        .iter()
        .zip(0_i32..)
        .map(|(tag, position)| NewRecipeTagRow {
            recipe_id,
            tag_id: tag.id,
            user_id: owner,
            position,
        })
        .collect();
    diesel::insert_into(recipe_tags::table)
        .values(&rows)
        .execute(conn)
        .await?;
    Ok(())
}

/// Tags for each recipe id, ordered by association position.
pub(crate) async fn load_recipe_tags(
    conn: &mut AsyncPgConnection,
    recipe_ids: &[i64],
) -> Result<HashMap<i64, Vec<TagRow>>, diesel::result::Error> {
    if recipe_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(i64, TagRow)> = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq_any(recipe_ids.iter().copied()))
        .order((recipe_tags::recipe_id, recipe_tags::position))
        .select((recipe_tags::recipe_id, TagRow::as_select()))
        .load(conn)
        .await?;

    let mut by_recipe: HashMap<i64, Vec<TagRow>> = HashMap::new();
    for (recipe_id, tag) in rows {
        by_recipe.entry(recipe_id).or_default().push(tag);
    }
    Ok(by_recipe)
}
