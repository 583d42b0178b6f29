//! PostgreSQL-backed `TagRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{TagRepository, TagRepositoryError};
use crate::domain::{RequestedTags, Tag, TagId, TagName, UserId};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::TagRow;
use super::pool::{DbPool, PoolError};
use super::schema::tags;
use super::tag_sync::{SyncError, reconcile_tags, tag_from_row};

const OWNER_NAME_CONSTRAINT: &str = "tags_owner_name_key";

/// Diesel-backed implementation of the tag repository port.
#[derive(Clone)]
pub struct DieselTagRepository {
    pool: DbPool,
}

impl DieselTagRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TagRepositoryError {
    map_basic_pool_error(error, TagRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> TagRepositoryError {
    map_basic_diesel_error(
        error,
        TagRepositoryError::query,
        TagRepositoryError::connection,
    )
}

fn to_tag(row: TagRow) -> Result<Tag, TagRepositoryError> {
    tag_from_row(row).map_err(TagRepositoryError::query)
}

#[async_trait]
impl TagRepository for DieselTagRepository {
    async fn list_for_owner(&self, owner: UserId) -> Result<Vec<Tag>, TagRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TagRow> = tags::table
            .filter(tags::user_id.eq(owner.as_i64()))
            .order((tags::name.desc(), tags::id.desc()))
            .select(TagRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(to_tag).collect()
    }

    async fn find_for_owner(
        &self,
        owner: UserId,
        id: TagId,
    ) -> Result<Option<Tag>, TagRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = tags::table
            .filter(tags::id.eq(id.as_i64()))
            .filter(tags::user_id.eq(owner.as_i64()))
            .select(TagRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(to_tag).transpose()
    }

    async fn rename(
        &self,
        owner: UserId,
        id: TagId,
        name: TagName,
    ) -> Result<Option<Tag>, TagRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(
            tags::table
                .filter(tags::id.eq(id.as_i64()))
                .filter(tags::user_id.eq(owner.as_i64())),
        )
        .set(tags::name.eq(name.as_ref()))
        .returning(TagRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(|err| {
            if is_unique_violation(&err, Some(OWNER_NAME_CONSTRAINT)) {
                TagRepositoryError::duplicate_name(name.to_string())
            } else {
                map_diesel_error(err)
            }
        })?;

        row.map(to_tag).transpose()
    }

    async fn delete(&self, owner: UserId, id: TagId) -> Result<bool, TagRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // Association rows go with the tag via ON DELETE CASCADE.
        let deleted = diesel::delete(
            tags::table
                .filter(tags::id.eq(id.as_i64()))
                .filter(tags::user_id.eq(owner.as_i64())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }

    async fn reconcile(
        &self,
        owner: UserId,
        requested: RequestedTags,
    ) -> Result<Vec<Tag>, TagRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owner_id = owner.as_i64();
        let rows = conn
            .transaction::<_, SyncError, _>(|conn| {
                async move { reconcile_tags(conn, owner_id, &requested).await }.scope_boxed()
            })
            .await
            .map_err(|err| match err {
                SyncError::Diesel(err) => map_diesel_error(err),
                SyncError::Unresolved(err) => TagRepositoryError::query(err.to_string()),
            })?;

        rows.into_iter().map(to_tag).collect()
    }
}
