//! Account handlers.
//!
//! ```text
//! POST  /api/v1/users        {"email":"a@example.com","password":"pw123","name":"Ada"}
//! POST  /api/v1/users/token  {"email":"a@example.com","password":"pw123"}
//! GET   /api/v1/users/me
//! PATCH /api/v1/users/me     {"name":"Ada L."}
//! ```

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{RegisterUserRequest, UpdateProfileRequest};
use crate::domain::{
    CredentialValidationError, Error, FieldErrorCode, LoginCredentials, User, field_error,
    missing_fields_error,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Registration body for `POST /api/v1/users`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Login body for `POST /api/v1/users/token`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Profile update body. An `email` key is accepted and ignored.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Public view of an account. The password hash never leaves the domain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().as_i64(),
            email: user.email().to_string(),
            name: user.name().as_ref().to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct TokenResponse {
    #[schema(example = "9944b09199c62bcf9418ad846dd0e4bbdfc6ee4b")]
    pub token: String,
}

fn required<'a>(fields: &[(&'a str, &Option<String>)]) -> Result<(), Error> {
    let missing: Vec<&'a str> = fields
        .iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing_fields_error(&missing))
    }
}

fn map_login_validation(err: CredentialValidationError) -> Error {
    let field = match err {
        CredentialValidationError::EmptyEmail => "email",
        CredentialValidationError::EmptyPassword
        | CredentialValidationError::PasswordTooShort { .. } => "password",
    };
    field_error(field, FieldErrorCode::Blank, err.to_string())
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid or duplicate fields", body = ErrorSchema),
        (status = 503, description = "Database unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "registerUser",
    security([])
)]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        email,
        password,
        name,
    } = payload.into_inner();
    required(&[("email", &email), ("password", &password)])?;

    let user = state
        .accounts
        .register(RegisterUserRequest {
            email: email.unwrap_or_default(),
            password: password.unwrap_or_default(),
            name,
        })
        .await?;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

/// Exchange credentials for a bearer token.
///
/// Wrong credentials answer 400 with field `credentials`, not 401.
#[utoipa::path(
    post,
    path = "/api/v1/users/token",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Missing fields or wrong credentials", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createToken",
    security([])
)]
pub async fn create_token(
    state: web::Data<HttpState>,
    payload: web::Json<TokenRequest>,
) -> ApiResult<web::Json<TokenResponse>> {
    let TokenRequest { email, password } = payload.into_inner();
    required(&[("email", &email), ("password", &password)])?;

    let credentials =
        LoginCredentials::try_from_parts(&email.unwrap_or_default(), &password.unwrap_or_default())
            .map_err(map_login_validation)?;
    let token = state.accounts.authenticate(&credentials).await?;
    Ok(web::Json(TokenResponse {
        token: token.expose().to_owned(),
    }))
}

/// Current user's profile.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Profile", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
pub async fn current_user(user: AuthenticatedUser) -> ApiResult<web::Json<UserResponse>> {
    Ok(web::Json(UserResponse::from(&user.into_inner())))
}

/// Change the current user's name and/or password.
#[utoipa::path(
    patch,
    path = "/api/v1/users/me",
    request_body = ProfileUpdateRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserResponse),
        (status = 400, description = "Invalid fields", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateCurrentUser"
)]
pub async fn update_current_user(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<ProfileUpdateRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let ProfileUpdateRequest { name, password } = payload.into_inner();
    let updated = state
        .accounts
        .update_profile(user.id(), UpdateProfileRequest { name, password })
        .await?;
    Ok(web::Json(UserResponse::from(&updated)))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
