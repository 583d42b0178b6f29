//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see driving ports, so
//! they can be exercised against in-memory adapters or mocks.

use std::sync::Arc;

use crate::domain::ports::{RecipeCommand, RecipeQuery, TagCommand, TagQuery, UserAccounts};

/// Parameter object bundling the port implementations for handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn UserAccounts>,
    pub recipes: Arc<dyn RecipeCommand>,
    pub recipes_query: Arc<dyn RecipeQuery>,
    pub tags: Arc<dyn TagCommand>,
    pub tags_query: Arc<dyn TagQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn UserAccounts>,
    pub recipes: Arc<dyn RecipeCommand>,
    pub recipes_query: Arc<dyn RecipeQuery>,
    pub tags: Arc<dyn TagCommand>,
    pub tags_query: Arc<dyn TagQuery>,
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use backend::domain::{RecipeService, TagService, UserAccountService};
    /// use backend::inbound::http::state::{HttpState, HttpStatePorts};
    /// use backend::outbound::memory::InMemoryStore;
    /// use backend::outbound::security::{Argon2PasswordHasher, RandomTokenGenerator};
    ///
    /// let store = Arc::new(InMemoryStore::new());
    /// let accounts = UserAccountService::new(
    ///     store.clone(),
    ///     store.clone(),
    ///     Arc::new(Argon2PasswordHasher::new()),
    ///     Arc::new(RandomTokenGenerator),
    /// );
    /// let recipes = Arc::new(RecipeService::new(store.clone()));
    /// let tags = Arc::new(TagService::new(store));
    /// let state = HttpState::new(HttpStatePorts {
    ///     accounts: Arc::new(accounts),
    ///     recipes: recipes.clone(),
    ///     recipes_query: recipes,
    ///     tags: tags.clone(),
    ///     tags_query: tags,
    /// });
    /// let _accounts = state.accounts.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            accounts,
            recipes,
            recipes_query,
            tags,
            tags_query,
        } = ports;
        Self {
            accounts,
            recipes,
            recipes_query,
            tags,
            tags_query,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
