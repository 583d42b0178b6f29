//! Port for minting opaque bearer tokens.

use crate::domain::AccessToken;

/// Source of fresh, unguessable access tokens.
#[cfg_attr(test, mockall::automock)]
pub trait TokenGenerator: Send + Sync {
    fn generate(&self) -> AccessToken;
}
