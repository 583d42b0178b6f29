//! Account domain service.
//!
//! Implements the [`UserAccounts`] driving port on top of the user and token
//! repositories, a password hasher and a token generator.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{
    CreateSuperuserRequest, PasswordHasher, PasswordHasherError, RegisterUserRequest,
    TokenGenerator, TokenRepository, TokenRepositoryError, UpdateProfileRequest, UserAccounts,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    AccessToken, CredentialValidationError, DisplayName, Email, Error, FieldErrorCode,
    LoginCredentials, NewUser, PasswordPolicy, ProfileChanges, User, UserFlags, UserId,
    UserValidationError, field_error,
};

const AUTHENTICATION_FAILED: &str = "unable to authenticate with provided credentials";

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => field_error(
            "email",
            FieldErrorCode::DuplicateEmail,
            "user with this email already exists",
        ),
    }
}

fn map_token_error(error: TokenRepositoryError) -> Error {
    match error {
        TokenRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("token repository unavailable: {message}"))
        }
        TokenRepositoryError::Query { message } => {
            Error::internal(format!("token repository error: {message}"))
        }
    }
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(error.to_string())
}

fn map_user_validation(error: UserValidationError) -> Error {
    let (field, code) = match &error {
        UserValidationError::EmptyEmail => ("email", FieldErrorCode::Blank),
        UserValidationError::InvalidEmail => ("email", FieldErrorCode::Invalid),
        UserValidationError::EmailTooLong { .. } => ("email", FieldErrorCode::TooLong),
        UserValidationError::DisplayNameTooLong { .. } => ("name", FieldErrorCode::TooLong),
        UserValidationError::SuperuserFlagsRequired { flag } => (*flag, FieldErrorCode::Invalid),
    };
    field_error(field, code, error.to_string())
}

fn map_credential_validation(error: CredentialValidationError) -> Error {
    let (field, code) = match &error {
        CredentialValidationError::EmptyEmail => ("email", FieldErrorCode::Blank),
        CredentialValidationError::EmptyPassword => ("password", FieldErrorCode::Blank),
        CredentialValidationError::PasswordTooShort { .. } => {
            ("password", FieldErrorCode::TooShort)
        }
    };
    field_error(field, code, error.to_string())
}

fn authentication_failed() -> Error {
    field_error(
        "credentials",
        FieldErrorCode::AuthenticationFailed,
        AUTHENTICATION_FAILED,
    )
}

/// Account service implementing [`UserAccounts`].
#[derive(Clone)]
pub struct UserAccountService<U, T> {
    users: Arc<U>,
    tokens: Arc<T>,
    hasher: Arc<dyn PasswordHasher>,
    token_generator: Arc<dyn TokenGenerator>,
    policy: PasswordPolicy,
}

impl<U, T> UserAccountService<U, T> {
    /// Create a service using the default password policy.
    pub fn new(
        users: Arc<U>,
        tokens: Arc<T>,
        hasher: Arc<dyn PasswordHasher>,
        token_generator: Arc<dyn TokenGenerator>,
    ) -> Self {
        Self {
            users,
            tokens,
            hasher,
            token_generator,
            policy: PasswordPolicy::default(),
        }
    }

    /// Replace the password policy.
    pub fn with_password_policy(mut self, policy: PasswordPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl<U, T> UserAccountService<U, T>
where
    U: UserRepository,
    T: TokenRepository,
{
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
        flags: UserFlags,
    ) -> Result<User, Error> {
        let email = Email::parse(email).map_err(map_user_validation)?;
        let name = DisplayName::new(name.unwrap_or_default()).map_err(map_user_validation)?;
        let password = self
            .policy
            .accept(password)
            .map_err(map_credential_validation)?;
        let password_hash = self
            .hasher
            .hash(&password)
            .await
            .map_err(map_hasher_error)?;

        let user = self
            .users
            .create(NewUser {
                email,
                name,
                password_hash,
                flags,
            })
            .await
            .map_err(map_user_error)?;

        info!(
            user_id = %user.id(),
            is_superuser = flags.is_superuser,
            "user account created"
        );
        Ok(user)
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, Error> {
        self.users.find_by_id(id).await.map_err(map_user_error)
    }
}

#[async_trait]
impl<U, T> UserAccounts for UserAccountService<U, T>
where
    U: UserRepository,
    T: TokenRepository,
{
    async fn register(&self, request: RegisterUserRequest) -> Result<User, Error> {
        self.create_account(
            &request.email,
            &request.password,
            request.name.as_deref(),
            UserFlags::regular(),
        )
        .await
    }

    async fn create_superuser(&self, request: CreateSuperuserRequest) -> Result<User, Error> {
        let flags = UserFlags::superuser(request.is_staff, request.is_superuser)
            .map_err(map_user_validation)?;
        self.create_account(
            &request.email,
            &request.password,
            request.name.as_deref(),
            flags,
        )
        .await
    }

    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AccessToken, Error> {
        let Ok(email) = Email::parse(credentials.email()) else {
            return Err(authentication_failed());
        };
        let Some(stored) = self
            .users
            .find_credentials_by_email(&email)
            .await
            .map_err(map_user_error)?
        else {
            return Err(authentication_failed());
        };

        let verified = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .await
            .map_err(map_hasher_error)?;
        if !verified || !stored.user.is_active() {
            return Err(authentication_failed());
        }

        let token = self.token_generator.generate();
        self.tokens
            .store(stored.user.id(), &token.digest())
            .await
            .map_err(map_token_error)?;
        info!(user_id = %stored.user.id(), "issued access token");
        Ok(token)
    }

    async fn resolve_token(&self, token: &AccessToken) -> Result<User, Error> {
        let Some(user_id) = self
            .tokens
            .find_user(&token.digest())
            .await
            .map_err(map_token_error)?
        else {
            warn!("rejected unknown access token");
            return Err(Error::unauthorized("invalid token"));
        };

        match self.find_user(user_id).await? {
            Some(user) if user.is_active() => Ok(user),
            _ => {
                warn!(user_id = %user_id, "rejected token for inactive or deleted user");
                Err(Error::unauthorized("user inactive or deleted"))
            }
        }
    }

    async fn profile(&self, id: UserId) -> Result<User, Error> {
        self.find_user(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }

    async fn update_profile(
        &self,
        id: UserId,
        request: UpdateProfileRequest,
    ) -> Result<User, Error> {
        let name = request
            .name
            .as_deref()
            .map(DisplayName::new)
            .transpose()
            .map_err(map_user_validation)?;
        let password = request
            .password
            .as_deref()
            .map(|raw| self.policy.accept(raw))
            .transpose()
            .map_err(map_credential_validation)?;

        let password_hash = match password {
            Some(password) => Some(
                self.hasher
                    .hash(&password)
                    .await
                    .map_err(map_hasher_error)?,
            ),
            None => None,
        };

        let changes = ProfileChanges {
            name,
            password_hash,
        };
        if changes.is_empty() {
            return self.profile(id).await;
        }

        self.users
            .update_profile(id, changes)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
