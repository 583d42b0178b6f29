//! Tag domain service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{TagCommand, TagQuery, TagRepository, TagRepositoryError, UpdateMode};
use crate::domain::{
    Error, FieldErrorCode, RequestedTags, Tag, TagId, TagName, TagValidationError, UserId,
    field_error, missing_fields_error,
};

fn map_repository_error(error: TagRepositoryError) -> Error {
    match error {
        TagRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("tag repository unavailable: {message}"))
        }
        TagRepositoryError::Query { message } => {
            Error::internal(format!("tag repository error: {message}"))
        }
        TagRepositoryError::DuplicateName { name } => field_error(
            "name",
            FieldErrorCode::DuplicateName,
            format!("tag `{name}` already exists"),
        ),
    }
}

fn map_validation_error(field: &str, error: TagValidationError) -> Error {
    let code = match error {
        TagValidationError::EmptyName => FieldErrorCode::Blank,
        TagValidationError::NameTooLong { .. } => FieldErrorCode::TooLong,
    };
    field_error(field, code, error.to_string())
}

fn not_found(id: TagId) -> Error {
    Error::not_found(format!("tag {id} not found"))
}

/// Validate raw tag names into an ordered, de-duplicated request.
pub(crate) fn parse_requested_tags(names: Vec<String>) -> Result<RequestedTags, Error> {
    let names = names
        .iter()
        .map(|name| TagName::new(name))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| map_validation_error("tags", err))?;
    Ok(RequestedTags::new(names))
}

/// Tag service implementing [`TagCommand`] and [`TagQuery`].
#[derive(Clone)]
pub struct TagService<R> {
    tags: Arc<R>,
}

impl<R> TagService<R> {
    pub fn new(tags: Arc<R>) -> Self {
        Self { tags }
    }
}

#[async_trait]
impl<R> TagCommand for TagService<R>
where
    R: TagRepository,
{
    async fn rename(
        &self,
        owner: UserId,
        id: TagId,
        name: Option<String>,
        mode: UpdateMode,
    ) -> Result<Tag, Error> {
        let existing = self
            .tags
            .find_for_owner(owner, id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(id))?;

        let Some(raw) = name else {
            return match mode {
                UpdateMode::Partial => Ok(existing),
                UpdateMode::Full => Err(missing_fields_error(&["name"])),
            };
        };
        let name = TagName::new(&raw).map_err(|err| map_validation_error("name", err))?;
        if &name == existing.name() {
            return Ok(existing);
        }

        self.tags
            .rename(owner, id, name)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(id))
    }

    async fn delete(&self, owner: UserId, id: TagId) -> Result<(), Error> {
        let deleted = self
            .tags
            .delete(owner, id)
            .await
            .map_err(map_repository_error)?;
        if !deleted {
            return Err(not_found(id));
        }
        debug!(owner = %owner, tag_id = %id, "tag deleted");
        Ok(())
    }

    async fn reconcile(&self, owner: UserId, names: Vec<String>) -> Result<Vec<Tag>, Error> {
        let requested = parse_requested_tags(names)?;
        if requested.is_empty() {
            return Ok(Vec::new());
        }
        self.tags
            .reconcile(owner, requested)
            .await
            .map_err(map_repository_error)
    }
}

#[async_trait]
impl<R> TagQuery for TagService<R>
where
    R: TagRepository,
{
    async fn list(&self, owner: UserId) -> Result<Vec<Tag>, Error> {
        self.tags
            .list_for_owner(owner)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockTagRepository;
    use rstest::rstest;

    const OWNER: UserId = UserId::new(4);

    fn tag(id: i64, name: &str) -> Tag {
        Tag::new(TagId::new(id), OWNER, TagName::new(name).expect("tag name"))
    }

    fn repo_with_tag(existing: Tag) -> MockTagRepository {
        let mut repo = MockTagRepository::new();
        repo.expect_find_for_owner()
            .return_once(move |_, _| Ok(Some(existing)));
        repo
    }

    #[tokio::test]
    async fn rename_without_name_returns_tag_unchanged() {
        let mut repo = repo_with_tag(tag(1, "Dessert"));
        repo.expect_rename().times(0);

        let renamed = TagService::new(Arc::new(repo))
            .rename(OWNER, TagId::new(1), None, UpdateMode::Partial)
            .await
            .expect("no-op rename");

        assert_eq!(renamed.name().as_ref(), "Dessert");
    }

    #[tokio::test]
    async fn full_rename_without_name_reports_the_missing_field() {
        let mut repo = repo_with_tag(tag(1, "Dessert"));
        repo.expect_rename().times(0);

        let error = TagService::new(Arc::new(repo))
            .rename(OWNER, TagId::new(1), None, UpdateMode::Full)
            .await
            .expect_err("name required");

        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            error.details().expect("details")["fields"],
            serde_json::json!(["name"])
        );
    }

    #[tokio::test]
    async fn full_rename_without_name_on_foreign_tag_is_not_found() {
        let mut repo = MockTagRepository::new();
        repo.expect_find_for_owner().return_once(|_, _| Ok(None));

        let error = TagService::new(Arc::new(repo))
            .rename(OWNER, TagId::new(9), None, UpdateMode::Full)
            .await
            .expect_err("not found");

        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[case(UpdateMode::Partial)]
    #[case(UpdateMode::Full)]
    #[tokio::test]
    async fn rename_persists_new_name_in_either_mode(#[case] mode: UpdateMode) {
        let mut repo = repo_with_tag(tag(1, "After Dinner"));
        repo.expect_rename()
            .withf(|owner, id, name| {
                *owner == OWNER && *id == TagId::new(1) && name.as_ref() == "Dessert"
            })
            .times(1)
            .return_once(|_, _, name| Ok(Some(Tag::new(TagId::new(1), OWNER, name))));

        let renamed = TagService::new(Arc::new(repo))
            .rename(OWNER, TagId::new(1), Some("Dessert".to_owned()), mode)
            .await
            .expect("renamed");

        assert_eq!(renamed.name().as_ref(), "Dessert");
    }

    #[tokio::test]
    async fn rename_of_foreign_tag_is_not_found() {
        let mut repo = MockTagRepository::new();
        repo.expect_find_for_owner().return_once(|_, _| Ok(None));
        repo.expect_rename().times(0);

        let error = TagService::new(Arc::new(repo))
            .rename(OWNER, TagId::new(7), Some("Mine now".to_owned()), UpdateMode::Full)
            .await
            .expect_err("not found");

        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn rename_collision_is_a_validation_error() {
        let mut repo = repo_with_tag(tag(1, "Breakfast"));
        repo.expect_rename()
            .return_once(|_, _, _| Err(TagRepositoryError::duplicate_name("Dinner")));

        let error = TagService::new(Arc::new(repo))
            .rename(OWNER, TagId::new(1), Some("Dinner".to_owned()), UpdateMode::Partial)
            .await
            .expect_err("duplicate");

        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        let details = error.details().expect("details");
        assert_eq!(details["field"], "name");
        assert_eq!(details["code"], "duplicate_name");
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[tokio::test]
    async fn rename_rejects_blank_names(#[case] raw: &str) {
        let mut repo = repo_with_tag(tag(1, "Breakfast"));
        repo.expect_rename().times(0);

        let error = TagService::new(Arc::new(repo))
            .rename(OWNER, TagId::new(1), Some(raw.to_owned()), UpdateMode::Partial)
            .await
            .expect_err("blank");

        assert_eq!(error.details().expect("details")["code"], "blank");
    }

    #[tokio::test]
    async fn reconcile_deduplicates_before_hitting_the_repository() {
        let mut repo = MockTagRepository::new();
        repo.expect_reconcile()
            .withf(|_, requested| requested.len() == 1)
            .times(1)
            .return_once(|_, _| Ok(vec![tag(1, "X")]));

        let tags = TagService::new(Arc::new(repo))
            .reconcile(OWNER, vec!["X".to_owned(), "X".to_owned()])
            .await
            .expect("reconciled");

        assert_eq!(tags.len(), 1);
    }

    #[tokio::test]
    async fn reconcile_of_nothing_skips_the_repository() {
        let mut repo = MockTagRepository::new();
        repo.expect_reconcile().times(0);

        let tags = TagService::new(Arc::new(repo))
            .reconcile(OWNER, Vec::new())
            .await
            .expect("empty");

        assert!(tags.is_empty());
    }

    #[tokio::test]
    async fn delete_maps_missing_tag_to_not_found() {
        let mut repo = MockTagRepository::new();
        repo.expect_delete().return_once(|_, _| Ok(false));

        let error = TagService::new(Arc::new(repo))
            .delete(OWNER, TagId::new(2))
            .await
            .expect_err("not found");

        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}
