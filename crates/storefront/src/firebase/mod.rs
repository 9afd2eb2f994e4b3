//! Firebase REST clients: Cloud Firestore reads and Firebase Authentication.
//!
//! # Architecture
//!
//! - Plain `reqwest` calls against the public REST endpoints, no SDK
//! - Firestore is the source of truth - NO local cache, every read hits the API
//! - Two seams, [`DocumentStore`] and [`AuthProvider`], so the catalog and the
//!   screens can run against in-process fakes
//!
//! # APIs
//!
//! ## Firestore
//! - `documents:runQuery` with a structured query (collection + equality filters)
//! - Typed values are decoded into `serde_json::Value`
//!
//! ## Identity Toolkit
//! - `accounts:signUp` for email/password account creation
//!
//! # Example
//!
//! ```rust,ignore
//! use pocket_shop_storefront::firebase::{DocumentStore, FieldFilter, FirestoreClient};
//!
//! let client = FirestoreClient::new(&config.firebase)?;
//! let items = client
//!     .query("Items", &[FieldFilter::equal("categoryId", "c1")])
//!     .await?;
//! ```

mod auth;
mod firestore;
pub mod types;

pub use auth::FirebaseAuthClient;
pub use firestore::FirestoreClient;
pub use types::*;

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// Header carrying the project API key. The key must never appear in a
/// request URL, since `reqwest` error text includes it.
pub(crate) const API_KEY_HEADER: &str = "x-goog-api-key";

/// Errors that can occur when talking to Firebase.
#[derive(Debug, Error)]
pub enum FirebaseError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The API answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Rate limited by Google.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Identity Toolkit rejected the request with a provider error code.
    #[error("Auth error: {0}")]
    Auth(String),

    /// The call did not settle within the configured bound.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// A request URL could not be built from configuration.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl FirebaseError {
    /// Wrap a request/response error with its URL stripped.
    pub(crate) fn transport(err: reqwest::Error) -> Self {
        Self::Http(err.without_url())
    }
}

/// Read access to a document database.
///
/// Implemented by [`FirestoreClient`]; tests substitute in-memory stores.
pub trait DocumentStore: Send + Sync {
    /// Fetch every document of `collection` matching all `filters`.
    ///
    /// Documents are returned in store order. An empty filter list returns
    /// the whole collection.
    fn query(
        &self,
        collection: &str,
        filters: &[FieldFilter],
    ) -> impl Future<Output = Result<Vec<Document>, FirebaseError>> + Send;
}

/// Account creation against an identity provider.
pub trait AuthProvider: Send + Sync {
    /// Create an email/password account.
    ///
    /// Provider rejections surface as [`FirebaseError::Auth`] carrying the
    /// provider's error code.
    fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<AccountSession, FirebaseError>> + Send;
}

impl<T: DocumentStore> DocumentStore for std::sync::Arc<T> {
    fn query(
        &self,
        collection: &str,
        filters: &[FieldFilter],
    ) -> impl Future<Output = Result<Vec<Document>, FirebaseError>> + Send {
        (**self).query(collection, filters)
    }
}

impl<T: AuthProvider> AuthProvider for std::sync::Arc<T> {
    fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<AccountSession, FirebaseError>> + Send {
        (**self).create_account(email, password)
    }
}
