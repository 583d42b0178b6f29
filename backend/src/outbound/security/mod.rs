//! Credential adapters: Argon2id password hashing and random bearer tokens.

mod argon2_hasher;
mod random_token_generator;

pub use argon2_hasher::Argon2PasswordHasher;
pub use random_token_generator::RandomTokenGenerator;
