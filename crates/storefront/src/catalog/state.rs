//! Selection state machine for the home screen.
//!
//! All transitions are plain methods on [`SelectionState`]; nothing here
//! performs I/O. A driver (see `screens::home`) asks the state for a
//! [`ProductTicket`] before a product request goes out and hands the ticket
//! back with the result. The ticket's sequence number is what lets stale
//! responses be recognised.

use std::str::FromStr;

use pocket_shop_core::{Category, CategoryId, Product};
use tracing::debug;

use crate::error::LoadError;

/// Where the screen is in its load cycle.
///
/// There is no terminal phase: a mounted screen cycles between the settled
/// phases and `LoadingProducts` for as long as the user keeps selecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    LoadingCategories,
    CategoriesLoaded,
    CategoriesFailed,
    LoadingProducts,
    ProductsLoaded,
    ProductsFailed,
}

/// What to do with a product response that is not for the latest request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StaleResponsePolicy {
    /// Drop responses whose sequence number is not the latest issued.
    #[default]
    DiscardStale,
    /// Apply every response as it settles; the last one to settle wins even
    /// if it belongs to a category the user has since moved away from.
    ApplyLastSettled,
}

impl FromStr for StaleResponsePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "discard" => Ok(Self::DiscardStale),
            "apply" => Ok(Self::ApplyLastSettled),
            other => Err(format!("expected 'discard' or 'apply', got '{other}'")),
        }
    }
}

/// Monotonic product request sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestSeq(u64);

impl RequestSeq {
    /// The raw counter value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Handle for one issued product request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductTicket {
    seq: RequestSeq,
    category_id: CategoryId,
}

impl ProductTicket {
    /// Sequence number assigned at issue time.
    #[must_use]
    pub const fn seq(&self) -> RequestSeq {
        self.seq
    }

    /// Category the request is for.
    #[must_use]
    pub const fn category_id(&self) -> &CategoryId {
        &self.category_id
    }
}

/// Outcome of handing a settled response back to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Applied,
    /// The response was superseded or arrived after unmount.
    Discarded,
}

/// Per-screen selection state.
///
/// Invariant: while `loading` is true the held `products` are from the
/// previous successful fetch (if any) and must not be treated as current.
#[derive(Debug, Clone)]
pub struct SelectionState {
    selected_category_name: String,
    products: Vec<Product>,
    categories: Vec<Category>,
    loading: bool,
    error: Option<LoadError>,
    phase: Phase,
    default_category: String,
    default_resolved: bool,
    latest_request: RequestSeq,
    policy: StaleResponsePolicy,
    mounted: bool,
}

impl SelectionState {
    /// Fresh state for a newly mounted screen.
    ///
    /// The default category name doubles as the initial selection label.
    #[must_use]
    pub fn new(default_category: impl Into<String>, policy: StaleResponsePolicy) -> Self {
        let default_category = default_category.into();
        Self {
            selected_category_name: default_category.clone(),
            products: Vec::new(),
            categories: Vec::new(),
            loading: false,
            error: None,
            phase: Phase::Idle,
            default_category,
            default_resolved: false,
            latest_request: RequestSeq::default(),
            policy,
            mounted: true,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub fn selected_category_name(&self) -> &str {
        &self.selected_category_name
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub const fn loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn error(&self) -> Option<LoadError> {
        self.error
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the one-shot default selection has already run.
    #[must_use]
    pub const fn default_resolved(&self) -> bool {
        self.default_resolved
    }

    /// The most recently issued product request.
    #[must_use]
    pub const fn latest_request(&self) -> RequestSeq {
        self.latest_request
    }

    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Whether `category` is the one currently highlighted.
    #[must_use]
    pub fn is_selected(&self, category: &Category) -> bool {
        category.name == self.selected_category_name
    }

    // =========================================================================
    // Category transitions
    // =========================================================================

    /// `Idle` → `LoadingCategories`.
    pub fn begin_category_load(&mut self) {
        if self.mounted {
            self.phase = Phase::LoadingCategories;
        }
    }

    /// A category load succeeded.
    ///
    /// Replaces the category set wholesale. On the first non-empty load the
    /// default category is resolved; if it is present, a ticket for its
    /// products is returned and must be fetched by the caller.
    pub fn categories_loaded(&mut self, categories: Vec<Category>) -> Option<ProductTicket> {
        if !self.mounted {
            return None;
        }

        self.categories = categories;
        self.phase = Phase::CategoriesLoaded;
        if self.error == Some(LoadError::LoadCategoriesFailed) {
            self.error = None;
        }

        if self.default_resolved || self.categories.is_empty() {
            return None;
        }
        self.default_resolved = true;

        let default = self
            .categories
            .iter()
            .find(|c| c.is_named(&self.default_category))
            .cloned();

        match default {
            Some(category) => {
                debug!(category_id = %category.id, "Default category resolved");
                self.selected_category_name = category.name;
                self.request_products(Some(category.id.as_str()))
            }
            None => {
                debug!(default = %self.default_category, "Default category not present");
                None
            }
        }
    }

    /// A category load failed. The held categories are kept.
    pub fn categories_failed(&mut self) {
        if self.mounted {
            self.error = Some(LoadError::LoadCategoriesFailed);
            self.phase = Phase::CategoriesFailed;
        }
    }

    /// User retry after a category failure.
    ///
    /// Returns `true` when the state moved to `LoadingCategories` and the
    /// caller should reload; `false` when there was nothing to retry.
    pub fn retry(&mut self) -> bool {
        if !self.mounted || self.phase != Phase::CategoriesFailed {
            return false;
        }
        self.error = None;
        self.phase = Phase::LoadingCategories;
        true
    }

    // =========================================================================
    // Product transitions
    // =========================================================================

    /// User picked a category: highlight it and issue a product request.
    pub fn select_category(&mut self, category: &Category) -> Option<ProductTicket> {
        if !self.mounted {
            return None;
        }
        self.selected_category_name.clone_from(&category.name);
        self.request_products(Some(category.id.as_str()))
    }

    /// Issue a product request for `category_id`.
    ///
    /// A missing or empty id is a no-op: no ticket, no state change.
    /// Otherwise `loading` is set before the ticket is handed out.
    pub fn request_products(&mut self, category_id: Option<&str>) -> Option<ProductTicket> {
        let category_id = category_id.filter(|id| !id.is_empty())?;
        if !self.mounted {
            return None;
        }

        self.latest_request = self.latest_request.next();
        self.loading = true;
        self.phase = Phase::LoadingProducts;

        Some(ProductTicket {
            seq: self.latest_request,
            category_id: CategoryId::new(category_id),
        })
    }

    /// Hand a product response back.
    ///
    /// Success replaces the list and clears the error. Failure clears the
    /// list and records `LoadProductsFailed`. Either way `loading` drops.
    /// Under [`StaleResponsePolicy::DiscardStale`] a response for anything
    /// but the latest ticket is ignored.
    pub fn products_settled(
        &mut self,
        ticket: &ProductTicket,
        result: Result<Vec<Product>, LoadError>,
    ) -> Settlement {
        if !self.mounted {
            debug!(seq = ticket.seq.get(), "Dropping product response after unmount");
            return Settlement::Discarded;
        }
        if self.policy == StaleResponsePolicy::DiscardStale && ticket.seq != self.latest_request {
            debug!(
                seq = ticket.seq.get(),
                latest = self.latest_request.get(),
                category_id = %ticket.category_id,
                "Dropping stale product response"
            );
            return Settlement::Discarded;
        }

        self.loading = false;
        match result {
            Ok(products) => {
                self.products = products;
                self.error = None;
                self.phase = Phase::ProductsLoaded;
            }
            Err(_) => {
                self.products.clear();
                self.error = Some(LoadError::LoadProductsFailed);
                self.phase = Phase::ProductsFailed;
            }
        }
        Settlement::Applied
    }

    /// The screen went away; every later response is dropped.
    pub const fn unmount(&mut self) {
        self.mounted = false;
    }
}
