//! Product categories.

use serde::{Deserialize, Serialize};

use super::id::CategoryId;

/// A remote-assigned grouping used to filter products.
///
/// Categories are immutable once fetched. The client replaces its whole set
/// on every successful load and never merges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    /// Opaque, store-assigned identifier.
    pub id: CategoryId,
    /// Display label; also the key for default-category matching.
    pub name: String,
}

impl Category {
    /// Create a category.
    #[must_use]
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Whether this category's display name is exactly `name`.
    ///
    /// Matching is case- and whitespace-sensitive.
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.name == name
    }
}
