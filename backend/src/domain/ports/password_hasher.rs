//! Port for one-way password hashing.

use async_trait::async_trait;

use crate::domain::{PasswordHash, PlainPassword};

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHasherError {
        /// Hashing failed or the stored hash could not be parsed.
        Hash { message: String } => "password hashing failed: {message}",
    }
}

/// Hashes passwords and verifies candidates against stored hashes.
///
/// Implementations may be CPU heavy and are expected to move work off the
/// async executor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Produce a salted hash for a password that passed the policy.
    async fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, PasswordHasherError>;

    /// Check a candidate password. A mismatch is `Ok(false)`, not an error.
    async fn verify(
        &self,
        candidate: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHasherError>;
}
