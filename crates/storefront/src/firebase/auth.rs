//! Firebase Authentication (Identity Toolkit) client.
//!
//! Only email/password sign-up is used. The provider validates the email and
//! password itself; rejections come back as an error code such as
//! `EMAIL_EXISTS` or `WEAK_PASSWORD : Password should be at least 6 characters`.

use std::sync::Arc;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::instrument;
use url::Url;

use crate::config::FirebaseConfig;
use crate::firebase::types::{AccountSession, google_error_message};
use crate::firebase::{API_KEY_HEADER, AuthProvider, FirebaseError};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

/// Client for the Identity Toolkit REST API.
#[derive(Clone)]
pub struct FirebaseAuthClient {
    inner: Arc<FirebaseAuthClientInner>,
}

struct FirebaseAuthClientInner {
    client: reqwest::Client,
    sign_up_url: Url,
    api_key: SecretString,
}

impl FirebaseAuthClient {
    /// Create a new auth client.
    ///
    /// # Errors
    ///
    /// Returns `FirebaseError::Url` if the endpoint cannot be built from the
    /// configured base URL, or `FirebaseError::Http` if the HTTP client fails
    /// to build.
    pub fn new(config: &FirebaseConfig) -> Result<Self, FirebaseError> {
        let sign_up_url = Url::parse(&format!(
            "{}/v1/accounts:signUp",
            config.auth_base_url.as_str().trim_end_matches('/'),
        ))?;

        Ok(Self {
            inner: Arc::new(FirebaseAuthClientInner {
                client: reqwest::Client::builder().build()?,
                sign_up_url,
                api_key: SecretString::from(config.api_key()),
            }),
        })
    }
}

impl AuthProvider for FirebaseAuthClient {
    #[instrument(skip(self, email, password))]
    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AccountSession, FirebaseError> {
        let response = self
            .inner
            .client
            .post(self.inner.sign_up_url.clone())
            .header(API_KEY_HEADER, self.inner.api_key.expose_secret())
            .json(&SignUpRequest {
                email,
                password,
                return_secure_token: true,
            })
            .send()
            .await
            .map_err(FirebaseError::transport)?;

        let status = response.status();
        let response_text = response.text().await.map_err(FirebaseError::transport)?;

        if !status.is_success() {
            return Err(classify_failure(status, &response_text));
        }

        Ok(serde_json::from_str(&response_text)?)
    }
}

/// Map a non-success sign-up response.
///
/// Only a 4xx with a provider code is a rejection of the user's input.
/// Server errors stay `Api` even when they carry a code (`INTERNAL_ERROR`).
fn classify_failure(status: StatusCode, body: &str) -> FirebaseError {
    if status.is_client_error()
        && let Some(message) = google_error_message(body)
    {
        return FirebaseError::Auth(provider_code(&message).to_string());
    }

    tracing::error!(
        status = %status,
        body = %body.chars().take(500).collect::<String>(),
        "Identity Toolkit returned non-success status"
    );
    FirebaseError::Api {
        status: status.as_u16(),
        message: google_error_message(body).unwrap_or_else(|| body.chars().take(200).collect()),
    }
}

/// Strip the human-readable suffix from an Identity Toolkit error message.
///
/// `"WEAK_PASSWORD : Password should be at least 6 characters"` → `"WEAK_PASSWORD"`.
fn provider_code(message: &str) -> &str {
    message.split(" : ").next().unwrap_or(message).trim()
}
