//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::ServiceResponse;
use actix_web::{App, test, web};

use crate::domain::ports::{
    MockRecipeCommand, MockRecipeQuery, MockTagCommand, MockTagQuery, MockUserAccounts,
};
use crate::domain::{DisplayName, Email, User, UserFlags, UserId};

use super::api_scope;
use super::state::{HttpState, HttpStatePorts};

/// Header value accepted by [`TestPorts::authenticated`].
pub const AUTH_HEADER: &str = "Token 0123456789abcdef0123456789abcdef01234567";

/// The user every authenticated test request resolves to.
pub fn owner() -> User {
    User::new(
        UserId::new(1),
        Email::parse("owner@example.com").expect("email"),
        DisplayName::new("Owner").expect("name"),
        UserFlags::regular(),
    )
}

/// Mocked driving ports; set expectations, then call [`TestPorts::send`].
#[derive(Default)]
pub struct TestPorts {
    pub accounts: MockUserAccounts,
    pub recipes: MockRecipeCommand,
    pub recipes_query: MockRecipeQuery,
    pub tags: MockTagCommand,
    pub tags_query: MockTagQuery,
}

impl TestPorts {
    /// Ports whose account mock resolves any token to [`owner`].
    pub fn authenticated() -> Self {
        let mut ports = Self::default();
        ports
            .accounts
            .expect_resolve_token()
            .returning(|_| Ok(owner()));
        ports
    }

    pub fn into_state(self) -> HttpState {
        HttpState::new(HttpStatePorts {
            accounts: Arc::new(self.accounts),
            recipes: Arc::new(self.recipes),
            recipes_query: Arc::new(self.recipes_query),
            tags: Arc::new(self.tags),
            tags_query: Arc::new(self.tags_query),
        })
    }

    /// Run one request through the full API scope with the auth header set.
    pub async fn send(self, req: test::TestRequest) -> ServiceResponse {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(self.into_state()))
                .service(api_scope()),
        )
        .await;
        test::call_service(&app, req.insert_header(("Authorization", AUTH_HEADER)).to_request())
            .await
    }
}
