//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    DisplayName, Email, NewUser, PasswordHash, ProfileChanges, StoredCredentials, User,
    UserFlags, UserId,
};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewUserRow, UserProfileUpdate, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, UserPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

/// Convert a row into a domain user and its stored hash.
fn row_to_credentials(row: UserRow) -> Result<StoredCredentials, UserPersistenceError> {
    let UserRow {
        id,
        email,
        name,
        password_hash,
        is_active,
        is_staff,
        is_superuser,
    } = row;

    let email = Email::parse(&email)
        .map_err(|err| UserPersistenceError::query(format!("stored email for user {id}: {err}")))?;
    let name = DisplayName::new(&name)
        .map_err(|err| UserPersistenceError::query(format!("stored name for user {id}: {err}")))?;
    let flags = UserFlags {
        is_active,
        is_staff,
        is_superuser,
    };

    Ok(StoredCredentials {
        user: User::new(UserId::new(id), email, name, flags),
        password_hash: PasswordHash::new(password_hash),
    })
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    row_to_credentials(row).map(|stored| stored.user)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            email: user.email.as_ref(),
            name: user.name.as_ref(),
            password_hash: user.password_hash.as_ref(),
            is_active: user.flags.is_active,
            is_staff: user.flags.is_staff,
            is_superuser: user.flags.is_superuser,
        };

        let inserted = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| {
                if is_unique_violation(&err, Some("users_email_key")) {
                    UserPersistenceError::duplicate_email(user.email.to_string())
                } else {
                    map_diesel_error(err)
                }
            })?;

        row_to_user(inserted)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::id.eq(id.as_i64()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn find_credentials_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_credentials).transpose()
    }

    async fn update_profile(
        &self,
        id: UserId,
        changes: ProfileChanges,
    ) -> Result<Option<User>, UserPersistenceError> {
        if changes.is_empty() {
            return self.find_by_id(id).await;
        }

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let update = UserProfileUpdate {
            name: changes.name.as_ref().map(AsRef::as_ref),
            password_hash: changes.password_hash.as_ref().map(AsRef::as_ref),
        };
        let row = diesel::update(users::table.filter(users::id.eq(id.as_i64())))
            .set(&update)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }
}
