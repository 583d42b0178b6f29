//! Port for persisting bearer token digests.
//!
//! Each user holds at most one token. Raw tokens never reach this port; only
//! their digest is stored and looked up.

use async_trait::async_trait;

use crate::domain::{TokenDigest, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token repository adapters.
    pub enum TokenRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "token repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "token repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Store `digest` for `user_id`, replacing any previous token.
    async fn store(&self, user_id: UserId, digest: &TokenDigest)
    -> Result<(), TokenRepositoryError>;

    /// Resolve a digest to the owning user.
    async fn find_user(&self, digest: &TokenDigest)
    -> Result<Option<UserId>, TokenRepositoryError>;
}
