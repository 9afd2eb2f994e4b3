//! Application state shared across screens.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::firebase::{FirebaseAuthClient, FirebaseError, FirestoreClient};
use crate::screens::{HomeScreen, SignUpScreen};

/// Application state shared across all screens.
///
/// This struct is cheaply cloneable via `Arc` and hands out screen
/// controllers wired to the real Firebase clients.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    firestore: FirestoreClient,
    auth: FirebaseAuthClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if either Firebase client cannot be built from the
    /// configuration.
    pub fn new(config: StorefrontConfig) -> Result<Self, FirebaseError> {
        let firestore = FirestoreClient::new(&config.firebase)?;
        let auth = FirebaseAuthClient::new(&config.firebase)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                firestore,
                auth,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// A fresh home screen. Call `mount()` on it to start loading.
    #[must_use]
    pub fn home_screen(&self) -> HomeScreen<FirestoreClient> {
        HomeScreen::new(self.inner.firestore.clone(), self.inner.config.catalog.clone())
    }

    /// A fresh sign-up screen.
    #[must_use]
    pub fn sign_up_screen(&self) -> SignUpScreen<FirebaseAuthClient> {
        SignUpScreen::new(
            self.inner.auth.clone(),
            self.inner.config.catalog.request_timeout,
        )
    }
}
