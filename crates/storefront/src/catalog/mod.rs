//! Category-scoped product retrieval.
//!
//! - [`CategoryProvider`] reads the whole `Categories` collection.
//! - [`ProductQuery`] reads the `Items` tagged with one category.
//! - [`SelectionState`] tracks what the screen shows and decides which
//!   responses still count.
//!
//! Every remote call is bounded by the configured request timeout. Transport
//! failures are captured and collapsed into [`LoadError`].

mod state;

pub use state::{Phase, ProductTicket, RequestSeq, SelectionState, Settlement, StaleResponsePolicy};

use std::future::Future;
use std::time::Duration;

use pocket_shop_core::{Category, CategoryId, Product, ProductFields};
use tracing::{instrument, warn};

use crate::error::{self, LoadError};
use crate::firebase::{Document, DocumentStore, FieldFilter, FirebaseError};

/// Collection holding one document per category.
pub const CATEGORIES_COLLECTION: &str = "Categories";
/// Collection holding one document per product.
pub const ITEMS_COLLECTION: &str = "Items";
/// Display-name field of a category document.
pub const CATEGORY_NAME_FIELD: &str = "CatName";

/// Loads the selectable categories.
pub struct CategoryProvider<'a, S> {
    store: &'a S,
    timeout: Duration,
}

impl<'a, S: DocumentStore> CategoryProvider<'a, S> {
    #[must_use]
    pub const fn new(store: &'a S, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Fetch every category, in store order.
    ///
    /// No filtering or de-duplication is applied.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::LoadCategoriesFailed` if the store call fails or
    /// times out.
    #[instrument(skip(self))]
    pub async fn load_categories(&self) -> error::Result<Vec<Category>> {
        let documents = bounded(self.timeout, self.store.query(CATEGORIES_COLLECTION, &[]))
            .await
            .map_err(|e| LoadError::LoadCategoriesFailed.from_transport(&e))?;

        Ok(documents.into_iter().map(to_category).collect())
    }
}

/// Loads the products of one category.
pub struct ProductQuery<'a, S> {
    store: &'a S,
    timeout: Duration,
}

impl<'a, S: DocumentStore> ProductQuery<'a, S> {
    #[must_use]
    pub const fn new(store: &'a S, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Fetch every product whose `categoryId` equals `category_id`.
    ///
    /// Order is whatever the store returns. Records the store hands back
    /// with a different `categoryId` are dropped.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::LoadProductsFailed` if the store call fails or
    /// times out.
    #[instrument(skip(self), fields(category_id = %category_id))]
    pub async fn fetch_products(&self, category_id: &CategoryId) -> error::Result<Vec<Product>> {
        let filter = FieldFilter::equal(ProductFields::CATEGORY_ID, category_id.as_str());
        let documents = bounded(self.timeout, self.store.query(ITEMS_COLLECTION, &[filter]))
            .await
            .map_err(|e| LoadError::LoadProductsFailed.from_transport(&e))?;

        Ok(documents
            .into_iter()
            .map(|doc| Product::from_fields(doc.id, doc.fields))
            .filter(|product| {
                let keep = product.belongs_to(category_id);
                if !keep {
                    warn!(
                        product_id = %product.id,
                        tagged = ?product.category_id(),
                        "Store returned product outside the requested category"
                    );
                }
                keep
            })
            .collect())
    }
}

/// Map a category document. A missing or non-string name becomes empty.
fn to_category(doc: Document) -> Category {
    let name = doc.str_field(CATEGORY_NAME_FIELD).unwrap_or_default().to_string();
    Category::new(doc.id, name)
}

async fn bounded<T>(
    timeout: Duration,
    call: impl Future<Output = Result<T, FirebaseError>>,
) -> Result<T, FirebaseError> {
    tokio::time::timeout(timeout, call)
        .await
        .map_err(|_| FirebaseError::Timeout(timeout))?
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use serde_json::{Map, Value, json};

    use super::*;

    /// In-memory store that records every query it receives.
    #[derive(Default)]
    struct RecordingStore {
        collections: Vec<(String, Vec<Document>)>,
        fail: bool,
        hang: bool,
        calls: Mutex<Vec<(String, Vec<FieldFilter>)>>,
    }

    impl RecordingStore {
        fn with(mut self, collection: &str, docs: Vec<Document>) -> Self {
            self.collections.push((collection.to_string(), docs));
            self
        }
    }

    impl DocumentStore for RecordingStore {
        async fn query(
            &self,
            collection: &str,
            filters: &[FieldFilter],
        ) -> Result<Vec<Document>, FirebaseError> {
            self.calls
                .lock()
                .unwrap()
                .push((collection.to_string(), filters.to_vec()));
            if self.hang {
                std::future::pending::<()>().await;
            }
            if self.fail {
                return Err(FirebaseError::Api {
                    status: 503,
                    message: "unavailable".to_string(),
                });
            }
            Ok(self
                .collections
                .iter()
                .filter(|(name, _)| name == collection)
                .flat_map(|(_, docs)| docs.iter().cloned())
                .filter(|doc| filters.iter().all(|f| f.matches(&doc.fields)))
                .collect())
        }
    }

    fn doc(id: &str, fields: Value) -> Document {
        let map = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Document::new(id.to_string(), map)
    }

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_categories_keep_store_order_without_dedup() {
        let store = RecordingStore::default().with(
            CATEGORIES_COLLECTION,
            vec![
                doc("c2", json!({"CatName": "Women's"})),
                doc("c1", json!({"CatName": "Men's"})),
                doc("c3", json!({"CatName": "Men's"})),
                doc("c4", json!({})),
            ],
        );

        let categories = CategoryProvider::new(&store, TIMEOUT)
            .load_categories()
            .await
            .unwrap();

        let ids: Vec<_> = categories.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["c2", "c1", "c3", "c4"]);
        assert_eq!(categories[3].name, "");

        let calls = store.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "Categories");
        assert!(calls[0].1.is_empty());
    }

    #[tokio::test]
    async fn test_category_failure_maps_to_load_categories_failed() {
        let store = RecordingStore {
            fail: true,
            ..Default::default()
        };
        let result = CategoryProvider::new(&store, TIMEOUT).load_categories().await;
        assert_eq!(result, Err(LoadError::LoadCategoriesFailed));
    }

    #[tokio::test]
    async fn test_products_filtered_by_category() {
        let store = RecordingStore::default().with(
            ITEMS_COLLECTION,
            vec![
                doc("p1", json!({"name": "Shirt", "price": 20, "categoryId": "c1"})),
                doc("p2", json!({"name": "Dress", "price": 35, "categoryId": "c2"})),
                doc("p3", json!({"name": "Hat", "price": 10, "image": "x.png", "categoryId": "c1"})),
            ],
        );

        let products = ProductQuery::new(&store, TIMEOUT)
            .fetch_products(&CategoryId::new("c1"))
            .await
            .unwrap();

        assert_eq!(products.len(), 2);
        assert!(products.iter().all(|p| p.category_id() == Some("c1")));
        assert_eq!(products[0].image, None);
        assert_eq!(products[1].image.as_deref(), Some("x.png"));

        let calls = store.calls.lock().unwrap();
        assert_eq!(calls[0].0, "Items");
        assert_eq!(calls[0].1, vec![FieldFilter::equal("categoryId", "c1")]);
    }

    /// A store that ignores filters must not leak other categories.
    struct LeakyStore;

    impl DocumentStore for LeakyStore {
        async fn query(
            &self,
            _collection: &str,
            _filters: &[FieldFilter],
        ) -> Result<Vec<Document>, FirebaseError> {
            Ok(vec![
                doc("p1", json!({"categoryId": "c1"})),
                doc("p2", json!({"categoryId": "c2"})),
                doc("p3", json!({})),
            ])
        }
    }

    #[tokio::test]
    async fn test_products_from_other_categories_are_dropped() {
        let products = ProductQuery::new(&LeakyStore, TIMEOUT)
            .fetch_products(&CategoryId::new("c1"))
            .await
            .unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, *"p1");
    }

    #[tokio::test]
    async fn test_product_failure_maps_to_load_products_failed() {
        let store = RecordingStore {
            fail: true,
            ..Default::default()
        };
        let result = ProductQuery::new(&store, TIMEOUT)
            .fetch_products(&CategoryId::new("c1"))
            .await;
        assert_eq!(result, Err(LoadError::LoadProductsFailed));
    }

    #[tokio::test]
    async fn test_hanging_store_times_out() {
        let store = RecordingStore {
            hang: true,
            ..Default::default()
        };
        let result = ProductQuery::new(&store, Duration::from_millis(20))
            .fetch_products(&CategoryId::new("c1"))
            .await;
        assert_eq!(result, Err(LoadError::LoadProductsFailed));

        let result = CategoryProvider::new(&store, Duration::from_millis(20))
            .load_categories()
            .await;
        assert_eq!(result, Err(LoadError::LoadCategoriesFailed));
    }
}
