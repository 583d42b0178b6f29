//! Builders wiring repositories into domain services and HTTP state.

use std::sync::Arc;

use actix_web::web;
use tracing::warn;

use backend::domain::ports::{RecipeRepository, TagRepository, TokenRepository, UserRepository};
use backend::domain::{PasswordPolicy, RecipeService, TagService, UserAccountService};
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::memory::InMemoryStore;
use backend::outbound::persistence::{
    DieselRecipeRepository, DieselTagRepository, DieselTokenRepository, DieselUserRepository,
};
use backend::outbound::security::{Argon2PasswordHasher, RandomTokenGenerator};

use super::ServerConfig;

/// Repositories backing one deployment.
struct Repositories<U, T, R, G> {
    users: Arc<U>,
    tokens: Arc<T>,
    recipes: Arc<R>,
    tags: Arc<G>,
}

fn build_ports<U, T, R, G>(
    repos: Repositories<U, T, R, G>,
    policy: PasswordPolicy,
) -> HttpStatePorts
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    R: RecipeRepository + 'static,
    G: TagRepository + 'static,
{
    let Repositories {
        users,
        tokens,
        recipes,
        tags,
    } = repos;

    let accounts = UserAccountService::new(
        users,
        tokens,
        Arc::new(Argon2PasswordHasher::new()),
        Arc::new(RandomTokenGenerator),
    )
    .with_password_policy(policy);
    let recipe_service = Arc::new(RecipeService::new(recipes));
    let tag_service = Arc::new(TagService::new(tags));

    HttpStatePorts {
        accounts: Arc::new(accounts),
        recipes: recipe_service.clone(),
        recipes_query: recipe_service,
        tags: tag_service.clone(),
        tags_query: tag_service,
    }
}

/// Build HTTP state from the configured storage.
///
/// Uses the Diesel adapters when a pool is configured; otherwise every port
/// shares one [`InMemoryStore`], which loses its data on restart.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let ports = match &config.db_pool {
        Some(pool) => build_ports(
            Repositories {
                users: Arc::new(DieselUserRepository::new(pool.clone())),
                tokens: Arc::new(DieselTokenRepository::new(pool.clone())),
                recipes: Arc::new(DieselRecipeRepository::new(pool.clone())),
                tags: Arc::new(DieselTagRepository::new(pool.clone())),
            },
            config.password_policy,
        ),
        None => {
            warn!("no database configured; using in-memory storage");
            let store = Arc::new(InMemoryStore::new());
            build_ports(
                Repositories {
                    users: store.clone(),
                    tokens: store.clone(),
                    recipes: store.clone(),
                    tags: store,
                },
                config.password_policy,
            )
        }
    };
    web::Data::new(HttpState::new(ports))
}

#[cfg(test)]
mod tests {
    //! Coverage for storage selection.

    use super::*;
    use backend::domain::ports::RegisterUserRequest;
    use backend::domain::{ErrorCode, LoginCredentials};
    use rstest::{fixture, rstest};

    #[fixture]
    fn memory_config() -> ServerConfig {
        ServerConfig::new(([127, 0, 0, 1], 0).into())
    }

    #[rstest]
    #[tokio::test]
    async fn memory_state_supports_register_and_login(memory_config: ServerConfig) {
        let state = build_http_state(&memory_config);

        let user = state
            .accounts
            .register(RegisterUserRequest {
                email: "cook@example.com".to_owned(),
                password: "pw12345".to_owned(),
                name: None,
            })
            .await
            .expect("registration succeeds");
        let credentials =
            LoginCredentials::try_from_parts("cook@example.com", "pw12345").expect("creds");
        let token = state
            .accounts
            .authenticate(&credentials)
            .await
            .expect("login succeeds");

        let resolved = state
            .accounts
            .resolve_token(&token)
            .await
            .expect("token resolves");
        assert_eq!(resolved.id(), user.id());
    }

    #[rstest]
    #[tokio::test]
    async fn configured_policy_is_applied(memory_config: ServerConfig) {
        let config = memory_config.with_password_policy(PasswordPolicy::new(10));
        let state = build_http_state(&config);

        let err = state
            .accounts
            .register(RegisterUserRequest {
                email: "cook@example.com".to_owned(),
                password: "short1".to_owned(),
                name: None,
            })
            .await
            .expect_err("password below configured minimum");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn recipe_and_tag_ports_share_storage(memory_config: ServerConfig) {
        let state = build_http_state(&memory_config);
        let owner = state
            .accounts
            .register(RegisterUserRequest {
                email: "cook@example.com".to_owned(),
                password: "pw12345".to_owned(),
                name: None,
            })
            .await
            .expect("registration succeeds")
            .id();

        state
            .recipes
            .create(
                owner,
                backend::domain::ports::RecipePayload {
                    title: Some("Soup".to_owned()),
                    time_minutes: Some(10),
                    price: Some(rust_decimal::Decimal::new(500, 2)),
                    tags: Some(vec!["Vegan".to_owned()]),
                    ..Default::default()
                },
            )
            .await
            .expect("recipe created");

        let tags = state.tags_query.list(owner).await.expect("tags listed");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name().as_ref(), "Vegan");
    }
}
