//! Wire-independent Firebase types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single document read from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document ID (last segment of the document path).
    pub id: String,
    /// Decoded field values.
    pub fields: Map<String, Value>,
}

impl Document {
    /// Create a document.
    #[must_use]
    pub const fn new(id: String, fields: Map<String, Value>) -> Self {
        Self { id, fields }
    }

    /// A string field, if present and a string.
    #[must_use]
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

/// An equality filter on one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    /// Field path, e.g. `categoryId`.
    pub field: String,
    /// Value the field must equal.
    pub value: Value,
}

impl FieldFilter {
    /// `field == value`.
    #[must_use]
    pub fn equal(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Whether `fields` satisfies this filter.
    #[must_use]
    pub fn matches(&self, fields: &Map<String, Value>) -> bool {
        fields.get(&self.field) == Some(&self.value)
    }
}

/// Tokens returned by a successful account creation.
///
/// Implements `Debug` manually so tokens never reach the logs.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSession {
    /// Provider-assigned user ID.
    pub local_id: String,
    /// Email the account was created with.
    #[serde(default)]
    pub email: String,
    /// Short-lived ID token.
    #[serde(default)]
    pub id_token: String,
    /// Long-lived refresh token.
    #[serde(default)]
    pub refresh_token: String,
}

impl std::fmt::Debug for AccountSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountSession")
            .field("local_id", &self.local_id)
            .field("email", &self.email)
            .field("id_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// Error envelope used by every Google REST API.
#[derive(Debug, Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    #[serde(default)]
    message: String,
}

/// Extract `error.message` from a Google API error body.
///
/// Firestore's streaming endpoints wrap the envelope in an array, so both
/// shapes are accepted.
pub(crate) fn google_error_message(body: &str) -> Option<String> {
    if let Ok(envelope) = serde_json::from_str::<GoogleErrorEnvelope>(body) {
        return Some(envelope.error.message);
    }
    serde_json::from_str::<Vec<GoogleErrorEnvelope>>(body)
        .ok()
        .and_then(|envelopes| envelopes.into_iter().next())
        .map(|envelope| envelope.error.message)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_field_filter_matches_exactly() {
        let filter = FieldFilter::equal("categoryId", "c1");
        let mut fields = Map::new();
        fields.insert("categoryId".to_string(), json!("c1"));
        assert!(filter.matches(&fields));

        fields.insert("categoryId".to_string(), json!("c10"));
        assert!(!filter.matches(&fields));

        fields.remove("categoryId");
        assert!(!filter.matches(&fields));
    }

    #[test]
    fn test_google_error_message_shapes() {
        let single = r#"{"error":{"code":400,"message":"EMAIL_EXISTS","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(google_error_message(single).as_deref(), Some("EMAIL_EXISTS"));

        let streamed = r#"[{"error":{"code":403,"message":"denied","status":"PERMISSION_DENIED"}}]"#;
        assert_eq!(google_error_message(streamed).as_deref(), Some("denied"));

        assert_eq!(google_error_message("<html>502</html>"), None);
    }

    #[test]
    fn test_account_session_debug_redacts_tokens() {
        let session: AccountSession = serde_json::from_value(json!({
            "localId": "u1",
            "email": "a@b.co",
            "idToken": "very-private-id-token",
            "refreshToken": "very-private-refresh-token",
            "expiresIn": "3600"
        }))
        .unwrap_or_else(|_| AccountSession {
            local_id: String::new(),
            email: String::new(),
            id_token: String::new(),
            refresh_token: String::new(),
        });

        assert_eq!(session.local_id, "u1");
        let debug_output = format!("{session:?}");
        assert!(debug_output.contains("u1"));
        assert!(!debug_output.contains("very-private"));
    }
}
