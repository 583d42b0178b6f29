//! User data model.
//!
//! Users are identified by a unique email address. The display name is free
//! text and may be blank; the password only ever exists here as a hash.

use std::fmt;

use super::auth::PasswordHash;

/// Maximum length, in characters, of an email address.
pub const EMAIL_MAX: usize = 255;
/// Maximum length, in characters, of a display name.
pub const DISPLAY_NAME_MAX: usize = 255;

/// Validation errors raised while building user components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyEmail,
    InvalidEmail,
    EmailTooLong { max: usize },
    DisplayNameTooLong { max: usize },
    /// A superuser must carry both the staff and superuser flags.
    SuperuserFlagsRequired { flag: &'static str },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "users must have an email address"),
            Self::InvalidEmail => write!(f, "enter a valid email address"),
            Self::EmailTooLong { max } => {
                write!(f, "email must be at most {max} characters")
            }
            Self::DisplayNameTooLong { max } => {
                write!(f, "name must be at most {max} characters")
            }
            Self::SuperuserFlagsRequired { flag } => {
                write!(f, "superuser must have {flag}=true")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Database-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Access the raw identifier.
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalised email address.
///
/// ## Invariants
/// - Surrounding whitespace is removed.
/// - Exactly one `@` separates a non-empty local part from a non-empty
///   domain.
/// - The domain part is lower-cased; the local part keeps its case.
///
/// # Examples
/// ```
/// use backend::domain::Email;
///
/// let email = Email::parse(" Ada.Lovelace@EXAMPLE.com ").expect("valid email");
/// assert_eq!(email.as_ref(), "Ada.Lovelace@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Validate and normalise an email address.
    pub fn parse(raw: &str) -> Result<Self, UserValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }

        let (local, domain) = trimmed
            .rsplit_once('@')
            .ok_or(UserValidationError::InvalidEmail)?;
        if local.is_empty()
            || domain.is_empty()
            || local.contains('@')
            || trimmed.chars().any(char::is_whitespace)
        {
            return Err(UserValidationError::InvalidEmail);
        }

        Ok(Self(format!("{local}@{}", domain.to_lowercase())))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Human readable display name; may be blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate a display name, trimming surrounding whitespace.
    pub fn new(raw: &str) -> Result<Self, UserValidationError> {
        let trimmed = raw.trim();
        if trimmed.chars().count() > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Permission flags carried by every account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserFlags {
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl UserFlags {
    /// Flags for an ordinary, active account.
    pub const fn regular() -> Self {
        Self {
            is_active: true,
            is_staff: false,
            is_superuser: false,
        }
    }

    /// Flags for an active superuser.
    ///
    /// Explicit `false` values for either flag are rejected rather than
    /// silently overridden.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{UserFlags, UserValidationError};
    ///
    /// assert!(UserFlags::superuser(None, None).expect("defaults").is_superuser);
    /// assert_eq!(
    ///     UserFlags::superuser(Some(false), None),
    ///     Err(UserValidationError::SuperuserFlagsRequired { flag: "is_staff" })
    /// );
    /// ```
    pub fn superuser(
        is_staff: Option<bool>,
        is_superuser: Option<bool>,
    ) -> Result<Self, UserValidationError> {
        if is_staff == Some(false) {
            return Err(UserValidationError::SuperuserFlagsRequired { flag: "is_staff" });
        }
        if is_superuser == Some(false) {
            return Err(UserValidationError::SuperuserFlagsRequired {
                flag: "is_superuser",
            });
        }
        Ok(Self {
            is_active: true,
            is_staff: true,
            is_superuser: true,
        })
    }
}

/// Application user as seen by the domain. Never carries the password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: Email,
    name: DisplayName,
    flags: UserFlags,
}

impl User {
    /// Build a [`User`] from validated components.
    pub fn new(id: UserId, email: Email, name: DisplayName, flags: UserFlags) -> Self {
        Self {
            id,
            email,
            name,
            flags,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    pub fn flags(&self) -> UserFlags {
        self.flags
    }

    /// Inactive accounts can neither log in nor use existing tokens.
    pub fn is_active(&self) -> bool {
        self.flags.is_active
    }
}

/// Account data handed to repositories on registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: Email,
    pub name: DisplayName,
    pub password_hash: PasswordHash,
    pub flags: UserFlags,
}

/// Profile fields to change; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub name: Option<DisplayName>,
    pub password_hash: Option<PasswordHash>,
}

impl ProfileChanges {
    /// True when nothing would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.password_hash.is_none()
    }
}

/// User together with the stored password hash, for credential checks only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub user: User,
    pub password_hash: PasswordHash,
}
