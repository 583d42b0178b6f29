//! Driving port for account registration, login and profile management.
//!
//! Inbound adapters hand raw field values to this port; validation, hashing
//! and token issuance stay behind it.

use async_trait::async_trait;

use crate::domain::{AccessToken, Error, LoginCredentials, User, UserId};

/// Fields accepted when registering an ordinary account.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RegisterUserRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

/// Fields accepted when provisioning a superuser.
///
/// `is_staff` and `is_superuser` default to `true`; an explicit `false` is
/// rejected.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CreateSuperuserRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

/// Profile fields the owner may change. Email is deliberately absent.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub password: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccounts: Send + Sync {
    /// Create an ordinary account.
    async fn register(&self, request: RegisterUserRequest) -> Result<User, Error>;

    /// Create an account with staff and superuser flags set.
    async fn create_superuser(&self, request: CreateSuperuserRequest) -> Result<User, Error>;

    /// Check credentials and issue a fresh bearer token.
    ///
    /// Wrong credentials and inactive accounts both fail with
    /// `InvalidRequest`, mirroring a form validation failure.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AccessToken, Error>;

    /// Resolve a bearer token to an active user, or fail with `Unauthorized`.
    async fn resolve_token(&self, token: &AccessToken) -> Result<User, Error>;

    async fn profile(&self, id: UserId) -> Result<User, Error>;

    async fn update_profile(&self, id: UserId, request: UpdateProfileRequest)
    -> Result<User, Error>;
}
