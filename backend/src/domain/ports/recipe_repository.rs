//! Port for owner-scoped recipe persistence.
//!
//! Every method takes the owning user and must behave as if recipes owned by
//! anyone else do not exist. Writes that carry a tag request reconcile the
//! tags and replace the recipe's associations in the same transaction.

use async_trait::async_trait;

use crate::domain::{Recipe, RecipeChanges, RecipeDraft, RecipeId, RequestedTags, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by recipe repository adapters.
    pub enum RecipeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "recipe repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "recipe repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// All recipes owned by `owner`, newest id first.
    async fn list_for_owner(&self, owner: UserId) -> Result<Vec<Recipe>, RecipeRepositoryError>;

    async fn find_for_owner(
        &self,
        owner: UserId,
        id: RecipeId,
    ) -> Result<Option<Recipe>, RecipeRepositoryError>;

    /// Insert a recipe for `owner`. `tags` of `None` leaves it untagged.
    async fn create(
        &self,
        owner: UserId,
        draft: RecipeDraft,
        tags: Option<RequestedTags>,
    ) -> Result<Recipe, RecipeRepositoryError>;

    /// Apply `changes` and, when `tags` is `Some`, replace the tag set.
    ///
    /// Returns `None` when the recipe is missing or owned by someone else; in
    /// that case nothing is written.
    async fn update(
        &self,
        owner: UserId,
        id: RecipeId,
        changes: RecipeChanges,
        tags: Option<RequestedTags>,
    ) -> Result<Option<Recipe>, RecipeRepositoryError>;

    /// Delete an owned recipe. Tags survive. `false` when nothing matched.
    async fn delete(&self, owner: UserId, id: RecipeId) -> Result<bool, RecipeRepositoryError>;
}
