//! Cloud Firestore REST client implementation.
//!
//! Reads go through `documents:runQuery` so a collection scan and a filtered
//! query share one code path. No caching: every call hits the API.

mod queries;
mod values;

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};
use url::Url;

use crate::config::FirebaseConfig;
use crate::firebase::types::{Document, FieldFilter, google_error_message};
use crate::firebase::{API_KEY_HEADER, DocumentStore, FirebaseError};

use queries::{RunQueryRequest, RunQueryRow, convert_rows};

// =============================================================================
// FirestoreClient
// =============================================================================

/// Client for the Cloud Firestore REST API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct FirestoreClient {
    inner: Arc<FirestoreClientInner>,
}

struct FirestoreClientInner {
    client: reqwest::Client,
    run_query_url: Url,
    api_key: SecretString,
}

impl FirestoreClient {
    /// Create a new Firestore client.
    ///
    /// # Errors
    ///
    /// Returns `FirebaseError::Url` if the endpoint cannot be built from the
    /// configured base URL, or `FirebaseError::Http` if the HTTP client fails
    /// to build.
    pub fn new(config: &FirebaseConfig) -> Result<Self, FirebaseError> {
        let run_query_url = Url::parse(&format!(
            "{}/v1/projects/{}/databases/{}/documents:runQuery",
            config.firestore_base_url.as_str().trim_end_matches('/'),
            config.project_id,
            config.database,
        ))?;

        Ok(Self {
            inner: Arc::new(FirestoreClientInner {
                client: reqwest::Client::builder().build()?,
                run_query_url,
                api_key: SecretString::from(config.api_key()),
            }),
        })
    }

    /// Execute a structured query.
    async fn run_query(&self, request: &RunQueryRequest) -> Result<Vec<Document>, FirebaseError> {
        let response = self
            .inner
            .client
            .post(self.inner.run_query_url.clone())
            .header("Content-Type", "application/json")
            .header(API_KEY_HEADER, self.inner.api_key.expose_secret())
            .json(request)
            .send()
            .await
            .map_err(FirebaseError::transport)?;

        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(FirebaseError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await.map_err(FirebaseError::transport)?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Firestore returned non-success status"
            );
            let message = google_error_message(&response_text)
                .unwrap_or_else(|| response_text.chars().take(200).collect());
            return Err(FirebaseError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let rows: Vec<RunQueryRow> = match serde_json::from_str(&response_text) {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse Firestore runQuery response"
                );
                return Err(FirebaseError::Parse(e));
            }
        };

        let documents = convert_rows(rows);
        debug!(count = documents.len(), "Firestore query returned documents");
        Ok(documents)
    }
}

impl DocumentStore for FirestoreClient {
    #[instrument(skip(self, filters), fields(filters = filters.len()))]
    async fn query(
        &self,
        collection: &str,
        filters: &[FieldFilter],
    ) -> Result<Vec<Document>, FirebaseError> {
        let request = RunQueryRequest::new(collection, filters);
        self.run_query(&request).await
    }
}
