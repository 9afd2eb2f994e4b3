//! Integration tests for Pocket Shop.
//!
//! The screens are driven end to end against in-memory fakes of the
//! Firebase seams, so no network or emulator is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pocket-shop-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `home_screen` - category loading, selection and response ordering
//! - `sign_up` - account creation notices

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use pocket_shop_core::ProductFields;
use pocket_shop_storefront::firebase::{
    AccountSession, AuthProvider, Document, DocumentStore, FieldFilter, FirebaseError,
};
use serde_json::{Map, Value};
use tokio::sync::oneshot;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Build a document from a JSON object literal. Anything else yields no fields.
#[must_use]
pub fn doc(id: &str, fields: Value) -> Document {
    let fields = match fields {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    Document::new(id.to_string(), fields)
}

// ============================================================================
// Document stores
// ============================================================================

/// In-memory document store.
///
/// Applies equality filters the way Firestore does, can be told to fail a
/// number of calls per collection, and can hold back product queries for a
/// category until the test releases them.
#[derive(Default)]
pub struct MemoryStore {
    collections: HashMap<String, Vec<Document>>,
    failures: Mutex<HashMap<String, usize>>,
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    hang: Mutex<Vec<String>>,
    calls: Mutex<Vec<(String, Vec<FieldFilter>)>>,
    served: AtomicUsize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add documents to `collection`.
    #[must_use]
    pub fn with(mut self, collection: &str, docs: Vec<Document>) -> Self {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .extend(docs);
        self
    }

    /// Make the first `count` queries against `collection` fail.
    #[must_use]
    pub fn failing(self, collection: &str, count: usize) -> Self {
        self.fail_next(collection, count);
        self
    }

    /// Make the next `count` queries against `collection` fail.
    pub fn fail_next(&self, collection: &str, count: usize) {
        lock(&self.failures).insert(collection.to_string(), count);
    }

    /// Queries against `collection` never complete.
    #[must_use]
    pub fn hanging(self, collection: &str) -> Self {
        lock(&self.hang).push(collection.to_string());
        self
    }

    /// Hold the next product query for `category_id` until the returned
    /// sender fires (or is dropped).
    pub fn gate(&self, category_id: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        lock(&self.gates).insert(category_id.to_string(), rx);
        tx
    }

    /// Every query received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<(String, Vec<FieldFilter>)> {
        lock(&self.calls).clone()
    }

    /// Queries against `collection` received so far.
    #[must_use]
    pub fn calls_to(&self, collection: &str) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|(name, _)| name == collection)
            .count()
    }

    /// Queries that produced a response (success or failure).
    #[must_use]
    pub fn served(&self) -> usize {
        self.served.load(Ordering::SeqCst)
    }

    fn take_failure(&self, collection: &str) -> bool {
        let mut failures = lock(&self.failures);
        match failures.get_mut(collection) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                true
            }
            _ => false,
        }
    }

    fn take_gate(&self, filters: &[FieldFilter]) -> Option<oneshot::Receiver<()>> {
        let category_id = filters
            .iter()
            .find(|f| f.field == ProductFields::CATEGORY_ID)
            .and_then(|f| f.value.as_str())?;
        lock(&self.gates).remove(category_id)
    }
}

impl DocumentStore for MemoryStore {
    async fn query(
        &self,
        collection: &str,
        filters: &[FieldFilter],
    ) -> Result<Vec<Document>, FirebaseError> {
        lock(&self.calls).push((collection.to_string(), filters.to_vec()));

        let hangs = lock(&self.hang).iter().any(|name| name == collection);
        if hangs {
            std::future::pending::<()>().await;
        }

        let gate = self.take_gate(filters);
        if let Some(gate) = gate {
            // A dropped sender releases the query too.
            let _ = gate.await;
        }

        self.served.fetch_add(1, Ordering::SeqCst);
        if self.take_failure(collection) {
            return Err(FirebaseError::Api {
                status: 503,
                message: "The service is currently unavailable.".to_string(),
            });
        }

        Ok(self
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| filters.iter().all(|f| f.matches(&doc.fields)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

// ============================================================================
// Auth provider
// ============================================================================

/// Identity provider that answers every sign-up the same way.
pub struct ScriptedAuth {
    outcome: Result<(), String>,
    hang: bool,
    attempts: Mutex<Vec<String>>,
}

impl ScriptedAuth {
    /// Every sign-up succeeds.
    #[must_use]
    pub const fn accepting() -> Self {
        Self {
            outcome: Ok(()),
            hang: false,
            attempts: Mutex::new(Vec::new()),
        }
    }

    /// Every sign-up is rejected with the provider error `code`.
    #[must_use]
    pub fn rejecting(code: &str) -> Self {
        Self {
            outcome: Err(code.to_string()),
            hang: false,
            attempts: Mutex::new(Vec::new()),
        }
    }

    /// Every sign-up hangs forever.
    #[must_use]
    pub const fn unresponsive() -> Self {
        Self {
            outcome: Ok(()),
            hang: true,
            attempts: Mutex::new(Vec::new()),
        }
    }

    /// Emails submitted so far.
    #[must_use]
    pub fn attempts(&self) -> Vec<String> {
        lock(&self.attempts).clone()
    }
}

impl AuthProvider for ScriptedAuth {
    async fn create_account(
        &self,
        email: &str,
        _password: &str,
    ) -> Result<AccountSession, FirebaseError> {
        lock(&self.attempts).push(email.to_string());
        if self.hang {
            std::future::pending::<()>().await;
        }
        match &self.outcome {
            Ok(()) => Ok(AccountSession {
                local_id: format!("uid-{}", lock(&self.attempts).len()),
                email: email.to_string(),
                id_token: "id-token".to_string(),
                refresh_token: "refresh-token".to_string(),
            }),
            Err(code) => Err(FirebaseError::Auth(code.clone())),
        }
    }
}
