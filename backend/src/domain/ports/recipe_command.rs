//! Driving ports for recipe reads and writes.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{Error, Recipe, RecipeId, UserId};

use super::UpdateMode;

/// Raw recipe fields as supplied by a client.
///
/// Every field is optional so the same payload serves creation, partial
/// updates and full updates; the service decides which fields are required.
/// `tags` of `Some(vec![])` clears the tag set, `None` leaves it alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipePayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub time_minutes: Option<i32>,
    pub price: Option<Decimal>,
    pub link: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeCommand: Send + Sync {
    /// Create a recipe owned by `owner`.
    async fn create(&self, owner: UserId, payload: RecipePayload) -> Result<Recipe, Error>;

    async fn update(
        &self,
        owner: UserId,
        id: RecipeId,
        payload: RecipePayload,
        mode: UpdateMode,
    ) -> Result<Recipe, Error>;

    async fn delete(&self, owner: UserId, id: RecipeId) -> Result<(), Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeQuery: Send + Sync {
    /// Recipes owned by `owner`, newest first.
    async fn list(&self, owner: UserId) -> Result<Vec<Recipe>, Error>;

    /// A single owned recipe; `NotFound` for missing and foreign ids alike.
    async fn get(&self, owner: UserId, id: RecipeId) -> Result<Recipe, Error>;
}
