//! Tag data model.
//!
//! Tags are owned by a single user and identified within that owner by their
//! exact, case-sensitive name.

use std::fmt;

use super::UserId;

/// Maximum length, in characters, of a tag name.
pub const TAG_NAME_MAX: usize = 255;

/// Validation errors for tag names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValidationError {
    EmptyName,
    NameTooLong { max: usize },
}

impl fmt::Display for TagValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "tag name must not be empty"),
            Self::NameTooLong { max } => write!(f, "tag name must be at most {max} characters"),
        }
    }
}

impl std::error::Error for TagValidationError {}

/// Database-assigned tag identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagId(i64);

impl TagId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tag name, trimmed; comparison is exact and case-sensitive.
///
/// # Examples
/// ```
/// use backend::domain::TagName;
///
/// let vegan = TagName::new(" Vegan ").expect("valid name");
/// assert_eq!(vegan.as_ref(), "Vegan");
/// assert_ne!(vegan, TagName::new("vegan").expect("valid name"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagName(String);

impl TagName {
    pub fn new(raw: &str) -> Result<Self, TagValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TagValidationError::EmptyName);
        }
        if trimmed.chars().count() > TAG_NAME_MAX {
            return Err(TagValidationError::NameTooLong { max: TAG_NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for TagName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Tag owned by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    id: TagId,
    owner: UserId,
    name: TagName,
}

impl Tag {
    pub fn new(id: TagId, owner: UserId, name: TagName) -> Self {
        Self { id, owner, name }
    }

    pub fn id(&self) -> TagId {
        self.id
    }

    pub fn owner(&self) -> UserId {
        self.owner
    }

    pub fn name(&self) -> &TagName {
        &self.name
    }
}
