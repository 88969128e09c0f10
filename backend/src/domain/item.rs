//! Catalog items.
//!
//! Every item belongs to exactly one category. Any authenticated user may
//! create, edit or delete any item.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CategoryId, UserId};

/// Maximum item name length in characters.
pub const ITEM_NAME_MAX: usize = 120;

/// Validation errors for item values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItemValidationError {
    /// Name was blank once trimmed.
    #[error("item name must not be empty")]
    EmptyName,
    /// Name exceeds [`ITEM_NAME_MAX`].
    #[error("item name must be at most {max} characters")]
    NameTooLong {
        /// Maximum permitted length in characters.
        max: usize,
    },
}

/// Database-assigned item identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(i32);

impl ItemId {
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

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Item name. Not unique: several items may share a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemName(String);

impl ItemName {
    /// Validate and construct an item name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ItemValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ItemValidationError::EmptyName);
        }
        if trimmed.chars().count() > ITEM_NAME_MAX {
            return Err(ItemValidationError::NameTooLong { max: ITEM_NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ItemName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ItemName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ItemName> for String {
    fn from(value: ItemName) -> Self {
        value.0
    }
}

impl TryFrom<String> for ItemName {
    type Error = ItemValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Editable item fields shared by create and update.
///
/// An empty description is normalised to `None`.
///
/// # Examples
/// ```
/// use catalog::domain::{CategoryId, ItemDraft};
///
/// let draft = ItemDraft::try_from_parts("Goggles", "  ", CategoryId::new(1))
///     .expect("valid draft");
/// assert_eq!(draft.name.as_ref(), "Goggles");
/// assert!(draft.description.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    /// Display name.
    pub name: ItemName,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Owning category; must reference an existing category.
    pub category_id: CategoryId,
}

impl ItemDraft {
    /// Build a draft from raw form inputs.
    pub fn try_from_parts(
        name: &str,
        description: &str,
        category_id: CategoryId,
    ) -> Result<Self, ItemValidationError> {
        let name = ItemName::new(name)?;
        let description = Some(description.trim())
            .filter(|text| !text.is_empty())
            .map(str::to_owned);
        Ok(Self {
            name,
            description,
            category_id,
        })
    }
}

/// Values needed to insert an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    /// Editable fields.
    pub draft: ItemDraft,
    /// User creating the item.
    pub creator_id: UserId,
}

/// Persisted item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Database identifier.
    pub id: ItemId,
    /// Display name.
    pub name: ItemName,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Owning category.
    pub category_id: CategoryId,
    /// User who created the item.
    pub creator_id: UserId,
    /// Server-assigned creation time.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn draft_rejects_blank_name() {
        let result = ItemDraft::try_from_parts("  ", "desc", CategoryId::new(1));
        assert_eq!(result, Err(ItemValidationError::EmptyName));
    }

    #[rstest]
    fn draft_trims_description() {
        let draft = ItemDraft::try_from_parts("Board", "  fast  ", CategoryId::new(2))
            .expect("valid draft");
        assert_eq!(draft.description.as_deref(), Some("fast"));
        assert_eq!(draft.category_id, CategoryId::new(2));
    }
}
