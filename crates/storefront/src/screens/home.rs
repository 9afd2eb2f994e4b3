//! Home screen: category chips above a product listing.
//!
//! On mount the categories load, the default category is picked and its
//! products are fetched. Every chip tap goes straight to a product fetch.
//!
//! The state lock is only held between awaits, never across one, so two
//! taps in quick succession produce two requests in flight. Which response
//! is shown is decided by [`SelectionState`] and the configured
//! [`StaleResponsePolicy`](crate::catalog::StaleResponsePolicy).

use pocket_shop_core::{Category, Product};
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::catalog::{
    CategoryProvider, Phase, ProductQuery, ProductTicket, SelectionState, Settlement,
};
use crate::config::CatalogConfig;
use crate::error::{LoadError, add_breadcrumb};
use crate::firebase::DocumentStore;

/// Shown under the title when a category has no products.
pub const EMPTY_CATEGORY_MESSAGE: &str = "No products found in this category";

/// Controller for the home screen.
pub struct HomeScreen<S> {
    store: S,
    config: CatalogConfig,
    state: Mutex<SelectionState>,
}

impl<S: DocumentStore> HomeScreen<S> {
    /// Create the screen. Nothing is fetched until [`HomeScreen::mount`].
    #[must_use]
    pub fn new(store: S, config: CatalogConfig) -> Self {
        let state = SelectionState::new(config.default_category.clone(), config.stale_responses);
        Self {
            store,
            config,
            state: Mutex::new(state),
        }
    }

    /// First load: categories, then the default category's products.
    #[instrument(skip(self))]
    pub async fn mount(&self) {
        self.state.lock().await.begin_category_load();
        self.load_categories().await;
    }

    /// Reload categories after a category failure.
    ///
    /// Returns `false` without fetching when there is no category failure
    /// to recover from.
    #[instrument(skip(self))]
    pub async fn retry(&self) -> bool {
        if !self.state.lock().await.retry() {
            return false;
        }
        add_breadcrumb("catalog", "Retried category load", None);
        self.load_categories().await;
        true
    }

    /// User tapped a category chip.
    ///
    /// Returns `None` when no request was issued (empty id, unmounted).
    #[instrument(skip(self, category), fields(category_id = %category.id))]
    pub async fn select_category(&self, category: &Category) -> Option<Settlement> {
        add_breadcrumb(
            "catalog",
            "Selected category",
            Some(&[("category_id", category.id.as_str())]),
        );
        let ticket = self.state.lock().await.select_category(category)?;
        Some(self.run_product_request(ticket).await)
    }

    /// Fetch products for `category_id` without touching the selection.
    ///
    /// A missing or empty id returns `None` immediately: no request, no
    /// state change.
    pub async fn fetch_products(&self, category_id: Option<&str>) -> Option<Settlement> {
        let ticket = self.state.lock().await.request_products(category_id)?;
        Some(self.run_product_request(ticket).await)
    }

    /// The screen is going away; responses still in flight are dropped.
    pub async fn unmount(&self) {
        self.state.lock().await.unmount();
    }

    /// A copy of the current state.
    pub async fn snapshot(&self) -> SelectionState {
        self.state.lock().await.clone()
    }

    /// The view model for the current state.
    pub async fn view(&self) -> HomeView {
        HomeView::from_state(&*self.state.lock().await)
    }

    async fn load_categories(&self) {
        let result = CategoryProvider::new(&self.store, self.config.request_timeout)
            .load_categories()
            .await;

        let ticket = {
            let mut state = self.state.lock().await;
            match result {
                Ok(categories) => {
                    debug!(count = categories.len(), "Categories loaded");
                    state.categories_loaded(categories)
                }
                Err(_) => {
                    state.categories_failed();
                    None
                }
            }
        };

        if let Some(ticket) = ticket {
            self.run_product_request(ticket).await;
        }
    }

    async fn run_product_request(&self, ticket: ProductTicket) -> Settlement {
        let result = ProductQuery::new(&self.store, self.config.request_timeout)
            .fetch_products(ticket.category_id())
            .await;
        self.state.lock().await.products_settled(&ticket, result)
    }
}

/// What the home screen should draw.
#[derive(Debug, Clone, PartialEq)]
pub enum HomeView {
    /// Categories have not arrived yet.
    Spinner,
    /// Categories failed; `retry` offers the reload control.
    Error { message: String, retry: bool },
    /// Chips plus the product list.
    Listing(Listing),
}

/// A category chip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryChip {
    pub category: Category,
    pub selected: bool,
}

/// The main listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    /// `"{selected} ({n} items)"`, or `"{selected} (loading)"` mid-request.
    pub title: String,
    pub categories: Vec<CategoryChip>,
    /// Empty while loading: the held list is stale.
    pub products: Vec<Product>,
    pub loading: bool,
    /// Product load failure text. No retry control; pick a category again.
    pub error: Option<String>,
    /// Set when the current category is known to be empty.
    pub empty_message: Option<&'static str>,
}

impl HomeView {
    /// Derive the view from a state snapshot.
    #[must_use]
    pub fn from_state(state: &SelectionState) -> Self {
        match state.phase() {
            Phase::Idle | Phase::LoadingCategories => return Self::Spinner,
            Phase::CategoriesFailed => {
                let error = state.error();
                return Self::Error {
                    message: error.map_or_else(String::new, |err| err.to_string()),
                    retry: error.is_some_and(LoadError::is_retryable),
                };
            }
            Phase::CategoriesLoaded
            | Phase::LoadingProducts
            | Phase::ProductsLoaded
            | Phase::ProductsFailed => {}
        }

        let categories = state
            .categories()
            .iter()
            .map(|category| CategoryChip {
                category: category.clone(),
                selected: state.is_selected(category),
            })
            .collect();

        let name = state.selected_category_name();
        if state.loading() {
            return Self::Listing(Listing {
                title: format!("{name} (loading)"),
                categories,
                products: Vec::new(),
                loading: true,
                error: None,
                empty_message: None,
            });
        }

        let products = state.products().to_vec();
        let empty_message = products.is_empty().then_some(EMPTY_CATEGORY_MESSAGE);
        Self::Listing(Listing {
            title: format!("{name} ({} items)", products.len()),
            categories,
            products,
            loading: false,
            error: state.error().map(|err| err.to_string()),
            empty_message,
        })
    }
}
