//! Tag reconciliation: resolving requested names to owned tags.
//!
//! Resolution is split in two so adapters can run it inside their own
//! transaction:
//!
//! 1. [`RequestedTags::missing_from`] compares the request with the tags the
//!    owner already has and yields the names that must be created.
//! 2. After inserting those names (tolerating concurrent inserts of the same
//!    name), the adapter re-reads the owner's matching tags and calls
//!    [`RequestedTags::arrange`] to put them in request order.
//!
//! Names are matched exactly and case-sensitively. Duplicates within one
//! request collapse onto their first occurrence.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use super::TagName;

/// Raised when a requested name has no matching row after reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("tag `{name}` was not resolved")]
pub struct UnresolvedTag {
    pub name: String,
}

/// Ordered, de-duplicated set of tag names requested by one write.
///
/// # Examples
/// ```
/// use backend::domain::{RequestedTags, TagName};
///
/// let names = ["Dinner", "Vegan", "Dinner"].map(|n| TagName::new(n).unwrap());
/// let requested = RequestedTags::new(names);
/// let ordered: Vec<&str> = requested.names().iter().map(AsRef::as_ref).collect();
/// assert_eq!(ordered, ["Dinner", "Vegan"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestedTags(Vec<TagName>);

impl RequestedTags {
    /// Keep the first occurrence of each name, preserving order.
    pub fn new(names: impl IntoIterator<Item = TagName>) -> Self {
        let mut seen = HashSet::new();
        let unique = names
            .into_iter()
            .filter(|name| seen.insert(name.clone()))
            .collect();
        Self(unique)
    }

    /// An empty request clears a recipe's tags.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn names(&self) -> &[TagName] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Names not covered by `existing`, in request order.
    ///
    /// `existing` may contain unrelated items; only exact name matches count.
    pub fn missing_from<'a, T>(
        &self,
        existing: &'a [T],
        name_of: impl Fn(&'a T) -> &'a str,
    ) -> Vec<TagName> {
        let known: HashSet<&str> = existing.iter().map(name_of).collect();
        self.0
            .iter()
            .filter(|name| !known.contains(name.as_ref()))
            .cloned()
            .collect()
    }

    /// Order `resolved` by first occurrence in the request.
    ///
    /// Items whose name was not requested are dropped. Every requested name
    /// must be present exactly once in `resolved`.
    pub fn arrange<T>(
        &self,
        resolved: Vec<T>,
        name_of: impl Fn(&T) -> &str,
    ) -> Result<Vec<T>, UnresolvedTag> {
        let mut by_name: HashMap<String, T> = resolved
            .into_iter()
            .map(|item| (name_of(&item).to_owned(), item))
            .collect();

        self.0
            .iter()
            .map(|name| {
                by_name.remove(name.as_ref()).ok_or_else(|| UnresolvedTag {
                    name: name.as_ref().to_owned(),
                })
            })
            .collect()
    }
}
