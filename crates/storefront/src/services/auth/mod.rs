//! Account creation service.
//!
//! Wraps an [`AuthProvider`] with the request timeout, error mapping and
//! Sentry reporting. Email and password rules are the provider's; nothing
//! is validated locally.

mod error;

pub use error::{AuthError, GENERIC_FAILURE_MESSAGE};

use std::time::Duration;

use tracing::{info, instrument, warn};

use crate::error::add_breadcrumb;
use crate::firebase::{AccountSession, AuthProvider, FirebaseError};

/// Account creation service.
pub struct SignUpService<'a, A> {
    provider: &'a A,
    timeout: Duration,
}

impl<'a, A: AuthProvider> SignUpService<'a, A> {
    /// Create a new sign-up service.
    #[must_use]
    pub const fn new(provider: &'a A, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Register a new user with email and password.
    ///
    /// # Errors
    ///
    /// Returns the mapped provider rejection (`EmailAlreadyInUse`,
    /// `InvalidEmail`, `WeakPassword`, `MissingPassword`, `Rejected`), or
    /// `AuthError::Provider` if the provider could not be reached in time.
    #[instrument(skip(self, email, password))]
    pub async fn register(&self, email: &str, password: &str) -> Result<AccountSession, AuthError> {
        add_breadcrumb("auth", "Submitted sign-up form", None);

        let result = tokio::time::timeout(self.timeout, self.provider.create_account(email, password))
            .await
            .unwrap_or(Err(FirebaseError::Timeout(self.timeout)));

        match result {
            Ok(session) => {
                info!(user_id = %session.local_id, "Account created");
                Ok(session)
            }
            Err(err) => {
                let err = AuthError::from(err);
                if let AuthError::Provider(inner) = &err {
                    let event_id = sentry::capture_error(inner);
                    tracing::error!(
                        error = %inner,
                        sentry_event_id = %event_id,
                        "Sign-up request failed"
                    );
                } else {
                    warn!(error = %err, "Sign-up rejected by provider");
                }
                Err(err)
            }
        }
    }
}
