//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: process-local repositories for tests and demos
//! - **security**: Argon2id password hashing and random token generation
//!
//! Adapters only translate between domain types and infrastructure
//! representations.

pub mod memory;
pub mod persistence;
pub mod security;
