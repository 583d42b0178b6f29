//! Shared wiring for HTTP end-to-end tests.
//!
//! Every app runs the real services over one [`InMemoryStore`], with Argon2
//! parameters cut down so hashing stays fast.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use argon2::Params;
use backend::Trace;
use backend::domain::{PasswordPolicy, RecipeService, TagService, UserAccountService};
use backend::inbound::http::api_scope;
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::memory::InMemoryStore;
use backend::outbound::security::{Argon2PasswordHasher, RandomTokenGenerator};
use serde_json::{Value, json};

pub const PASSWORD: &str = "pw12345";

fn fast_hasher() -> Argon2PasswordHasher {
    Argon2PasswordHasher::with_params(Params::new(8, 1, 1, None).expect("argon2 params"))
}

pub fn http_state() -> HttpState {
    let store = Arc::new(InMemoryStore::new());
    let accounts = UserAccountService::new(
        store.clone(),
        store.clone(),
        Arc::new(fast_hasher()),
        Arc::new(RandomTokenGenerator),
    )
    .with_password_policy(PasswordPolicy::default());
    let recipes = Arc::new(RecipeService::new(store.clone()));
    let tags = Arc::new(TagService::new(store));

    HttpState::new(HttpStatePorts {
        accounts: Arc::new(accounts),
        recipes: recipes.clone(),
        recipes_query: recipes,
        tags: tags.clone(),
        tags_query: tags,
    })
}

pub async fn init_app()
-> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(http_state()))
            .wrap(Trace)
            .service(api_scope()),
    )
    .await
}

/// Send a request and decode the JSON body; empty bodies decode to `Null`.
pub async fn send<S>(app: &S, req: TestRequest) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let res = test::call_service(app, req.to_request()).await;
    let status = res.status();
    let bytes = test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body is JSON")
    };
    (status, body)
}

pub fn authorized(req: TestRequest, token: &str) -> TestRequest {
    req.insert_header(("Authorization", format!("Token {token}")))
}

/// Register `email` with [`PASSWORD`] and return a fresh token.
pub async fn sign_up<S>(app: &S, email: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let (status, _) = send(
        app,
        TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({"email": email, "password": PASSWORD, "name": "Cook"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "registering {email}");
    login(app, email, PASSWORD).await
}

pub async fn login<S>(app: &S, email: &str, password: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let (status, body) = send(
        app,
        TestRequest::post()
            .uri("/api/v1/users/token")
            .set_json(json!({"email": email, "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login for {email}: {body}");
    body["token"].as_str().expect("token string").to_owned()
}

/// Create a recipe for the token's owner and return the response body.
pub async fn create_recipe<S>(app: &S, token: &str, payload: Value) -> Value
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let (status, body) = send(
        app,
        authorized(TestRequest::post().uri("/api/v1/recipes"), token).set_json(payload),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create recipe: {body}");
    body
}

pub fn sample_recipe() -> Value {
    json!({"title": "Sample recipe", "timeMinutes": 10, "price": "5.00"})
}
