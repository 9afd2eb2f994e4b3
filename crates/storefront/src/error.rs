//! User-facing load errors with Sentry integration.
//!
//! Transport failures ([`FirebaseError`]) are captured to Sentry and logged,
//! then collapsed into one of two [`LoadError`] kinds that the presentation
//! layer renders as text.

use thiserror::Error;

use crate::firebase::FirebaseError;

/// Data-layer error kinds surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The category collection could not be read. Retry is offered.
    #[error("Failed to load categories")]
    LoadCategoriesFailed,

    /// The product query failed. The list is cleared; selecting a category
    /// again is the way to retry.
    #[error("Failed to load products")]
    LoadProductsFailed,
}

impl LoadError {
    /// Whether the screen should offer an explicit retry control.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::LoadCategoriesFailed)
    }

    /// Capture the underlying transport error and collapse it into `self`.
    pub(crate) fn from_transport(self, err: &FirebaseError) -> Self {
        let event_id = sentry::capture_error(err);
        tracing::error!(
            error = %err,
            kind = %self,
            sentry_event_id = %event_id,
            "Remote fetch failed"
        );
        self
    }
}

/// Result type alias for `LoadError`.
pub type Result<T> = std::result::Result<T, LoadError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("catalog", "Selected category", Some(&[("category_id", "c1")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_display() {
        assert_eq!(
            LoadError::LoadCategoriesFailed.to_string(),
            "Failed to load categories"
        );
        assert_eq!(
            LoadError::LoadProductsFailed.to_string(),
            "Failed to load products"
        );
    }

    #[test]
    fn test_only_category_failures_are_retryable() {
        assert!(LoadError::LoadCategoriesFailed.is_retryable());
        assert!(!LoadError::LoadProductsFailed.is_retryable());
    }

    #[test]
    fn test_from_transport_keeps_kind() {
        let err = FirebaseError::RateLimited(5);
        assert_eq!(
            LoadError::LoadProductsFailed.from_transport(&err),
            LoadError::LoadProductsFailed
        );
    }
}
