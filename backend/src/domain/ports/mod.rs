//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`UserAccounts`, `RecipeCommand`, `RecipeQuery`,
//! `TagCommand`, `TagQuery`) are called by inbound adapters. Driven ports
//! (repositories, hasher, token generator) are implemented by outbound
//! adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod password_hasher;
mod recipe_command;
mod recipe_repository;
mod tag_command;
mod tag_repository;
mod token_generator;
mod token_repository;
mod update_mode;
mod user_accounts;
mod user_repository;

#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use recipe_command::{MockRecipeCommand, MockRecipeQuery};
pub use recipe_command::{RecipeCommand, RecipePayload, RecipeQuery};
#[cfg(test)]
pub use recipe_repository::MockRecipeRepository;
pub use recipe_repository::{RecipeRepository, RecipeRepositoryError};
#[cfg(test)]
pub use tag_command::{MockTagCommand, MockTagQuery};
pub use tag_command::{TagCommand, TagQuery};
#[cfg(test)]
pub use tag_repository::MockTagRepository;
pub use tag_repository::{TagRepository, TagRepositoryError};
#[cfg(test)]
pub use token_generator::MockTokenGenerator;
pub use token_generator::TokenGenerator;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
pub use token_repository::{TokenRepository, TokenRepositoryError};
pub use update_mode::UpdateMode;
#[cfg(test)]
pub use user_accounts::MockUserAccounts;
pub use user_accounts::{
    CreateSuperuserRequest, RegisterUserRequest, UpdateProfileRequest, UserAccounts,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
