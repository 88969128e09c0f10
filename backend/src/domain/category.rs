//! Catalog categories.
//!
//! Categories are created by authenticated users and are immutable
//! afterwards. Names are unique across the catalog; submitting an existing
//! name yields the stored category instead of a second record.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// Maximum category name length in characters.
pub const CATEGORY_NAME_MAX: usize = 80;

/// Validation errors for category values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CategoryValidationError {
    /// Name was blank once trimmed.
    #[error("category name must not be empty")]
    EmptyName,
    /// Name exceeds [`CATEGORY_NAME_MAX`].
    #[error("category name must be at most {max} characters")]
    NameTooLong {
        /// Maximum permitted length in characters.
        max: usize,
    },
}

/// Database-assigned category identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(i32);

impl CategoryId {
    /// Wrap a raw database key.
    #[must_use]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw database key.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique category name.
///
/// ## Invariants
/// - Trimmed, non-empty, at most [`CATEGORY_NAME_MAX`] characters.
///
/// # Examples
/// ```
/// use catalog::domain::CategoryName;
///
/// let name = CategoryName::new("  Snowboarding ").expect("valid name");
/// assert_eq!(name.as_ref(), "Snowboarding");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryName(String);

impl CategoryName {
    /// Validate and construct a category name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, CategoryValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }
        if trimmed.chars().count() > CATEGORY_NAME_MAX {
            return Err(CategoryValidationError::NameTooLong {
                max: CATEGORY_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<CategoryName> for String {
    fn from(value: CategoryName) -> Self {
        value.0
    }
}

impl TryFrom<String> for CategoryName {
    type Error = CategoryValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Values needed to insert a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    /// Unique name.
    pub name: CategoryName,
    /// User submitting the category.
    pub creator_id: UserId,
}

/// Persisted category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Database identifier.
    pub id: CategoryId,
    /// Unique name.
    pub name: CategoryName,
    /// User who first created the category.
    pub creator_id: UserId,
    /// Server-assigned creation time.
    pub created_at: DateTime<Utc>,
}
