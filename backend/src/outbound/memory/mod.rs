//! In-process adapter implementing every persistence port.
//!
//! Used by the HTTP integration tests and by the server when no database URL
//! is configured. All state sits behind one `tokio::sync::Mutex`, so each
//! port call is atomic with respect to the others, including the tag
//! reconciliation performed during recipe writes.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::ports::{
    RecipeRepository, RecipeRepositoryError, TagRepository, TagRepositoryError, TokenRepository,
    TokenRepositoryError, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Email, NewUser, PasswordHash, ProfileChanges, Recipe, RecipeChanges, RecipeDraft, RecipeId,
    RequestedTags, StoredCredentials, Tag, TagId, TagName, TokenDigest, UnresolvedTag, User,
    UserId,
};

#[derive(Debug, Clone)]
struct UserRecord {
    user: User,
    password_hash: PasswordHash,
}

/// Recipe scalars plus ordered tag ids; tags are joined on read so renames
/// show through.
#[derive(Debug, Clone)]
struct RecipeRecord {
    recipe: Recipe,
    tag_ids: Vec<TagId>,
}

#[derive(Debug, Default)]
struct State {
    last_user_id: i64,
    last_recipe_id: i64,
    last_tag_id: i64,
    users: BTreeMap<UserId, UserRecord>,
    tokens: HashMap<UserId, TokenDigest>,
    recipes: BTreeMap<RecipeId, RecipeRecord>,
    tags: BTreeMap<TagId, Tag>,
}

impl State {
    fn owned_tags(&self, owner: UserId) -> Vec<Tag> {
        self.tags
            .values()
            .filter(|tag| tag.owner() == owner)
            .cloned()
            .collect()
    }

    fn reconcile(
        &mut self,
        owner: UserId,
        requested: &RequestedTags,
    ) -> Result<Vec<Tag>, UnresolvedTag> {
        let existing = self.owned_tags(owner);
        for name in requested.missing_from(&existing, |tag| tag.name().as_ref()) {
            self.last_tag_id += 1;
            let id = TagId::new(self.last_tag_id);
            self.tags.insert(id, Tag::new(id, owner, name));
        }
        requested.arrange(self.owned_tags(owner), |tag| tag.name().as_ref())
    }

    fn hydrate(&self, record: &RecipeRecord) -> Recipe {
        let mut recipe = record.recipe.clone();
        let tags = record
            .tag_ids
            .iter()
            .filter_map(|id| self.tags.get(id).cloned())
            .collect();
        recipe.replace_tags(tags);
        recipe
    }

    fn owned_recipe_mut(&mut self, owner: UserId, id: RecipeId) -> Option<&mut RecipeRecord> {
        self.recipes
            .get_mut(&id)
            .filter(|record| record.recipe.owner() == owner)
    }
}

fn unresolved(error: UnresolvedTag) -> RecipeRepositoryError {
    RecipeRepositoryError::query(error.to_string())
}

/// Shared in-memory store. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: NewUser) -> Result<User, UserPersistenceError> {
        let mut state = self.state.lock().await;
        if state
            .users
            .values()
            .any(|record| record.user.email() == &user.email)
        {
            return Err(UserPersistenceError::duplicate_email(user.email.to_string()));
        }

        state.last_user_id += 1;
        let id = UserId::new(state.last_user_id);
        let NewUser {
            email,
            name,
            password_hash,
            flags,
        } = user;
        let created = User::new(id, email, name, flags);
        state.users.insert(
            id,
            UserRecord {
                user: created.clone(),
                password_hash,
            },
        );
        Ok(created)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.state.lock().await;
        Ok(state.users.get(&id).map(|record| record.user.clone()))
    }

    async fn find_credentials_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .find(|record| record.user.email() == email)
            .map(|record| StoredCredentials {
                user: record.user.clone(),
                password_hash: record.password_hash.clone(),
            }))
    }

    async fn update_profile(
        &self,
        id: UserId,
        changes: ProfileChanges,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut state = self.state.lock().await;
        let Some(record) = state.users.get_mut(&id) else {
            return Ok(None);
        };
        let ProfileChanges {
            name,
            password_hash,
        } = changes;
        if let Some(name) = name {
            record.user = User::new(
                record.user.id(),
                record.user.email().clone(),
                name,
                record.user.flags(),
            );
        }
        if let Some(password_hash) = password_hash {
            record.password_hash = password_hash;
        }
        Ok(Some(record.user.clone()))
    }
}

#[async_trait]
impl TokenRepository for InMemoryStore {
    async fn store(
        &self,
        user_id: UserId,
        digest: &TokenDigest,
    ) -> Result<(), TokenRepositoryError> {
        let mut state = self.state.lock().await;
        state.tokens.insert(user_id, digest.clone());
        Ok(())
    }

    async fn find_user(
        &self,
        digest: &TokenDigest,
    ) -> Result<Option<UserId>, TokenRepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .tokens
            .iter()
            .find_map(|(user_id, stored)| (stored == digest).then_some(*user_id)))
    }
}

#[async_trait]
impl RecipeRepository for InMemoryStore {
    async fn list_for_owner(&self, owner: UserId) -> Result<Vec<Recipe>, RecipeRepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .recipes
            .values()
            .rev()
            .filter(|record| record.recipe.owner() == owner)
            .map(|record| state.hydrate(record))
            .collect())
    }

    async fn find_for_owner(
        &self,
        owner: UserId,
        id: RecipeId,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .recipes
            .get(&id)
            .filter(|record| record.recipe.owner() == owner)
            .map(|record| state.hydrate(record)))
    }

    async fn create(
        &self,
        owner: UserId,
        draft: RecipeDraft,
        tags: Option<RequestedTags>,
    ) -> Result<Recipe, RecipeRepositoryError> {
        let mut state = self.state.lock().await;
        let tag_ids = match tags {
            Some(requested) => state
                .reconcile(owner, &requested)
                .map_err(unresolved)?
                .iter()
                .map(Tag::id)
                .collect(),
            None => Vec::new(),
        };

        state.last_recipe_id += 1;
        let id = RecipeId::new(state.last_recipe_id);
        let record = RecipeRecord {
            recipe: Recipe::new(id, owner, draft, Vec::new()),
            tag_ids,
        };
        let created = state.hydrate(&record);
        state.recipes.insert(id, record);
        Ok(created)
    }

    async fn update(
        &self,
        owner: UserId,
        id: RecipeId,
        changes: RecipeChanges,
        tags: Option<RequestedTags>,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut state = self.state.lock().await;
        if state.owned_recipe_mut(owner, id).is_none() {
            return Ok(None);
        }

        let tag_ids = tags
            .map(|requested| {
                state
                    .reconcile(owner, &requested)
                    .map(|resolved| resolved.iter().map(Tag::id).collect::<Vec<_>>())
            })
            .transpose()
            .map_err(unresolved)?;

        let Some(record) = state.owned_recipe_mut(owner, id) else {
            return Ok(None);
        };
        record.recipe.apply(changes);
        if let Some(tag_ids) = tag_ids {
            record.tag_ids = tag_ids;
        }
        let record = record.clone();
        Ok(Some(state.hydrate(&record)))
    }

    async fn delete(&self, owner: UserId, id: RecipeId) -> Result<bool, RecipeRepositoryError> {
        let mut state = self.state.lock().await;
        if state.owned_recipe_mut(owner, id).is_none() {
            return Ok(false);
        }
        Ok(state.recipes.remove(&id).is_some())
    }
}

#[async_trait]
impl TagRepository for InMemoryStore {
    async fn list_for_owner(&self, owner: UserId) -> Result<Vec<Tag>, TagRepositoryError> {
        let state = self.state.lock().await;
        let mut tags = state.owned_tags(owner);
        tags.sort_by(|a, b| b.name().cmp(a.name()));
        Ok(tags)
    }

    async fn find_for_owner(
        &self,
        owner: UserId,
        id: TagId,
    ) -> Result<Option<Tag>, TagRepositoryError> {
        let state = self.state.lock().await;
        Ok(state.tags.get(&id).filter(|tag| tag.owner() == owner).cloned())
    }

    async fn rename(
        &self,
        owner: UserId,
        id: TagId,
        name: TagName,
    ) -> Result<Option<Tag>, TagRepositoryError> {
        let mut state = self.state.lock().await;
        if !state.tags.get(&id).is_some_and(|tag| tag.owner() == owner) {
            return Ok(None);
        }
        if state
            .tags
            .values()
            .any(|tag| tag.owner() == owner && tag.id() != id && tag.name() == &name)
        {
            return Err(TagRepositoryError::duplicate_name(name.to_string()));
        }

        let renamed = Tag::new(id, owner, name);
        state.tags.insert(id, renamed.clone());
        Ok(Some(renamed))
    }

    async fn delete(&self, owner: UserId, id: TagId) -> Result<bool, TagRepositoryError> {
        let mut state = self.state.lock().await;
        if !state.tags.get(&id).is_some_and(|tag| tag.owner() == owner) {
            return Ok(false);
        }
        state.tags.remove(&id);
        for record in state.recipes.values_mut() {
            record.tag_ids.retain(|tag_id| *tag_id != id);
        }
        Ok(true)
    }

    async fn reconcile(
        &self,
        owner: UserId,
        requested: RequestedTags,
    ) -> Result<Vec<Tag>, TagRepositoryError> {
        let mut state = self.state.lock().await;
        state
            .reconcile(owner, &requested)
            .map_err(|err| TagRepositoryError::query(err.to_string()))
    }
}

#[cfg(test)]
mod tests;
