//! Product records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::{CategoryId, ProductId};
use super::price::Price;

/// Remote field names consumed by the canonical [`Product`] shape.
pub struct ProductFields;

impl ProductFields {
    pub const ID: &'static str = "id";
    pub const NAME: &'static str = "name";
    pub const DESCRIPTION: &'static str = "description";
    pub const PRICE: &'static str = "price";
    pub const IMAGE: &'static str = "image";
    /// Foreign key to the owning category. Not canonical, kept in `extra`.
    pub const CATEGORY_ID: &'static str = "categoryId";
}

/// A sellable item, snapshotted from one remote record at fetch time.
///
/// Fields the canonical shape does not model are kept in [`Product::extra`]
/// and serialised alongside the typed fields, so unknown remote data
/// survives a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    /// Image URL. An empty remote value is normalised to `None`.
    pub image: Option<String>,
    /// Remaining remote fields, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Normalise a remote record into the canonical shape.
    ///
    /// Never fails: a canonical field that is absent, `null` or of the wrong
    /// type becomes `None`. Canonical keys are always removed from `extra`,
    /// so the typed fields win over anything the record carries under the
    /// same name (including a stray `id` field).
    #[must_use]
    pub fn from_fields(id: impl Into<ProductId>, mut fields: Map<String, Value>) -> Self {
        fields.remove(ProductFields::ID);

        let name = take_string(&mut fields, ProductFields::NAME);
        let description = take_string(&mut fields, ProductFields::DESCRIPTION);
        let price = fields
            .remove(ProductFields::PRICE)
            .and_then(|v| Price::from_json(&v).ok());
        let image = take_string(&mut fields, ProductFields::IMAGE).filter(|s| !s.is_empty());

        Self {
            id: id.into(),
            name,
            description,
            price,
            image,
            extra: fields,
        }
    }

    /// The `categoryId` the record was tagged with, if any.
    #[must_use]
    pub fn category_id(&self) -> Option<&str> {
        self.extra
            .get(ProductFields::CATEGORY_ID)
            .and_then(Value::as_str)
    }

    /// Whether the record is tagged with `category`.
    #[must_use]
    pub fn belongs_to(&self, category: &CategoryId) -> bool {
        self.category_id() == Some(category.as_str())
    }

    /// Display name, or a placeholder for records without one.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(unnamed)")
    }
}

fn take_string(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    match fields.remove(key) {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}
