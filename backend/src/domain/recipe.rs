//! Recipe data model.
//!
//! A recipe always belongs to exactly one user. The owner is fixed at
//! creation; nothing in this module can change it afterwards.

use std::fmt;

use rust_decimal::Decimal;

use super::{Tag, UserId};

/// Maximum length, in characters, of a recipe title.
pub const TITLE_MAX: usize = 255;
/// Maximum length, in characters, of a recipe link.
pub const LINK_MAX: usize = 255;
/// Prices are stored as `NUMERIC(5, 2)`.
pub const PRICE_MAX_DIGITS: u32 = 5;
pub const PRICE_DECIMAL_PLACES: u32 = 2;

/// Validation errors for recipe fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeValidationError {
    EmptyTitle,
    TitleTooLong { max: usize },
    LinkTooLong { max: usize },
    NegativePrice,
    PriceTooPrecise { decimal_places: u32 },
    PriceTooLarge { max_digits: u32 },
}

impl fmt::Display for RecipeValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::LinkTooLong { max } => write!(f, "link must be at most {max} characters"),
            Self::NegativePrice => write!(f, "price must not be negative"),
            Self::PriceTooPrecise { decimal_places } => {
                write!(f, "price must have at most {decimal_places} decimal places")
            }
            Self::PriceTooLarge { max_digits } => {
                write!(f, "price must have at most {max_digits} digits in total")
            }
        }
    }
}

impl std::error::Error for RecipeValidationError {}

/// Database-assigned recipe identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecipeId(i64);

impl RecipeId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-blank recipe title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeTitle(String);

impl RecipeTitle {
    pub fn new(raw: &str) -> Result<Self, RecipeValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(RecipeValidationError::EmptyTitle);
        }
        if trimmed.chars().count() > TITLE_MAX {
            return Err(RecipeValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for RecipeTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Optional external link; blank means "no link".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeLink(String);

impl RecipeLink {
    pub fn new(raw: &str) -> Result<Self, RecipeValidationError> {
        let trimmed = raw.trim();
        if trimmed.chars().count() > LINK_MAX {
            return Err(RecipeValidationError::LinkTooLong { max: LINK_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for RecipeLink {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Non-negative price with at most five digits, two after the point.
///
/// The value is normalised to exactly two decimal places so `5`, `5.0` and
/// `5.00` all render as `"5.00"`.
///
/// # Examples
/// ```
/// use backend::domain::Price;
/// use rust_decimal::Decimal;
///
/// let price = Price::new(Decimal::new(55, 1)).expect("valid price");
/// assert_eq!(price.to_string(), "5.50");
/// assert!(Price::new(Decimal::new(100_000, 2)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Price(Decimal);

impl Price {
    pub fn new(value: Decimal) -> Result<Self, RecipeValidationError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(RecipeValidationError::NegativePrice);
        }
        let normalized = value.normalize();
        if normalized.scale() > PRICE_DECIMAL_PLACES {
            return Err(RecipeValidationError::PriceTooPrecise {
                decimal_places: PRICE_DECIMAL_PLACES,
            });
        }
        let limit = Decimal::from(10_i64.pow(PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES));
        if normalized.abs() >= limit {
            return Err(RecipeValidationError::PriceTooLarge {
                max_digits: PRICE_MAX_DIGITS,
            });
        }
        let mut scaled = normalized.abs();
        scaled.rescale(PRICE_DECIMAL_PLACES);
        Ok(Self(scaled))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Scalar recipe fields supplied on creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    pub title: RecipeTitle,
    pub description: String,
    pub time_minutes: i32,
    pub price: Price,
    pub link: RecipeLink,
}

/// Scalar fields to change on update; `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeChanges {
    pub title: Option<RecipeTitle>,
    pub description: Option<String>,
    pub time_minutes: Option<i32>,
    pub price: Option<Price>,
    pub link: Option<RecipeLink>,
}

impl RecipeChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.time_minutes.is_none()
            && self.price.is_none()
            && self.link.is_none()
    }
}

/// Recipe with its tags in the order they were last supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    id: RecipeId,
    owner: UserId,
    title: RecipeTitle,
    description: String,
    time_minutes: i32,
    price: Price,
    link: RecipeLink,
    tags: Vec<Tag>,
}

impl Recipe {
    pub fn new(id: RecipeId, owner: UserId, draft: RecipeDraft, tags: Vec<Tag>) -> Self {
        let RecipeDraft {
            title,
            description,
            time_minutes,
            price,
            link,
        } = draft;
        Self {
            id,
            owner,
            title,
            description,
            time_minutes,
            price,
            link,
            tags,
        }
    }

    /// Apply scalar changes, leaving omitted fields and the owner untouched.
    pub fn apply(&mut self, changes: RecipeChanges) {
        let RecipeChanges {
            title,
            description,
            time_minutes,
            price,
            link,
        } = changes;
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(time_minutes) = time_minutes {
            self.time_minutes = time_minutes;
        }
        if let Some(price) = price {
            self.price = price;
        }
        if let Some(link) = link {
            self.link = link;
        }
    }

    /// Replace the tag set wholesale.
    pub fn replace_tags(&mut self, tags: Vec<Tag>) {
        self.tags = tags;
    }

    pub fn id(&self) -> RecipeId {
        self.id
    }

    pub fn owner(&self) -> UserId {
        self.owner
    }

    pub fn title(&self) -> &RecipeTitle {
        &self.title
    }

    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    pub fn time_minutes(&self) -> i32 {
        self.time_minutes
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn link(&self) -> &RecipeLink {
        &self.link
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }
}
