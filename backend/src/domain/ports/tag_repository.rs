//! Port for owner-scoped tag persistence and reconciliation.

use async_trait::async_trait;

use crate::domain::{RequestedTags, Tag, TagId, TagName, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by tag repository adapters.
    pub enum TagRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "tag repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "tag repository query failed: {message}",
        /// The owner already has a tag with this name.
        DuplicateName { name: String } => "tag `{name}` already exists",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// All tags owned by `owner`, ordered by name descending.
    async fn list_for_owner(&self, owner: UserId) -> Result<Vec<Tag>, TagRepositoryError>;

    async fn find_for_owner(
        &self,
        owner: UserId,
        id: TagId,
    ) -> Result<Option<Tag>, TagRepositoryError>;

    /// Rename an owned tag; `None` when it is missing or not owned.
    async fn rename(
        &self,
        owner: UserId,
        id: TagId,
        name: TagName,
    ) -> Result<Option<Tag>, TagRepositoryError>;

    /// Delete an owned tag and its recipe associations.
    async fn delete(&self, owner: UserId, id: TagId) -> Result<bool, TagRepositoryError>;

    /// Get-or-create every requested name for `owner`, in request order.
    async fn reconcile(
        &self,
        owner: UserId,
        requested: RequestedTags,
    ) -> Result<Vec<Tag>, TagRepositoryError>;
}
