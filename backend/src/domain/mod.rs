//! Domain primitives, ports and services.
//!
//! Purpose: define strongly typed entities for users, recipes and tags, the
//! ports that connect them to adapters, and the services implementing the
//! use-cases. Nothing in here knows about HTTP or SQL.
//!
//! Public surface:
//! - Error (alias to `error::Error`) - API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) - stable error identifier.
//! - User, Recipe, Tag - owned aggregates.
//! - RequestedTags - ordered tag request used by reconciliation.
//! - UserAccountService, RecipeService, TagService - driving port
//!   implementations.

pub mod auth;
pub mod error;
mod field_error;
pub mod ports;
pub mod recipe;
mod recipe_service;
pub mod tag;
pub mod tag_reconciliation;
mod tag_service;
pub mod trace_id;
pub mod user;
mod user_service;

pub use self::auth::{
    AccessToken, CredentialValidationError, DEFAULT_MIN_PASSWORD_LENGTH, LoginCredentials,
    PasswordHash, PasswordPolicy, PlainPassword, TOKEN_BYTES, TokenDigest,
};
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::field_error::{FieldErrorCode, field_error, missing_fields_error};
pub use self::recipe::{
    Price, Recipe, RecipeChanges, RecipeDraft, RecipeId, RecipeLink, RecipeTitle,
    RecipeValidationError,
};
pub use self::recipe_service::RecipeService;
pub use self::tag::{Tag, TagId, TagName, TagValidationError};
pub use self::tag_reconciliation::{RequestedTags, UnresolvedTag};
pub use self::tag_service::TagService;
pub use self::trace_id::TraceId;
pub use self::user::{
    DisplayName, Email, NewUser, ProfileChanges, StoredCredentials, User, UserFlags, UserId,
    UserValidationError,
};
pub use self::user_service::UserAccountService;
