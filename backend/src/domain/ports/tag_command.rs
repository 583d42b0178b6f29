//! Driving ports for tag management.
//!
//! Tags are created implicitly by recipe writes or [`TagCommand::reconcile`];
//! there is no standalone create operation.

use async_trait::async_trait;

use crate::domain::{Error, Tag, TagId, UserId};

use super::UpdateMode;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagCommand: Send + Sync {
    /// Rename an owned tag.
    ///
    /// With [`UpdateMode::Partial`], `None` leaves the name unchanged and
    /// returns the current tag. With [`UpdateMode::Full`], `None` is a
    /// missing-field error. Foreign or missing ids are reported as not found
    /// before either check.
    async fn rename(
        &self,
        owner: UserId,
        id: TagId,
        name: Option<String>,
        mode: UpdateMode,
    ) -> Result<Tag, Error>;

    /// Delete an owned tag, detaching it from every recipe.
    async fn delete(&self, owner: UserId, id: TagId) -> Result<(), Error>;

    /// Resolve names to owned tags, creating the missing ones.
    async fn reconcile(&self, owner: UserId, names: Vec<String>) -> Result<Vec<Tag>, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagQuery: Send + Sync {
    /// Tags owned by `owner`, ordered by name descending.
    async fn list(&self, owner: UserId) -> Result<Vec<Tag>, Error>;
}
