//! Authentication error types.

use thiserror::Error;

use crate::firebase::FirebaseError;

/// Message shown for any failure without a specific explanation.
pub const GENERIC_FAILURE_MESSAGE: &str = "Could not create account. Please try again.";

/// Errors that can occur during account creation.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The email is already registered.
    #[error("email already in use")]
    EmailAlreadyInUse,

    /// The provider rejected the email format.
    #[error("invalid email")]
    InvalidEmail,

    /// The provider rejected the password as too weak.
    #[error("password too weak")]
    WeakPassword,

    /// No password was supplied.
    #[error("missing password")]
    MissingPassword,

    /// The provider rejected the request with a code we do not map.
    #[error("sign-up rejected: {0}")]
    Rejected(String),

    /// The provider could not be reached or answered garbage.
    #[error("auth provider error: {0}")]
    Provider(FirebaseError),
}

impl AuthError {
    /// Map a provider error code.
    ///
    /// Both the REST codes (`EMAIL_EXISTS`) and the client SDK codes
    /// (`auth/email-already-in-use`) are recognised.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "EMAIL_EXISTS" | "auth/email-already-in-use" => Self::EmailAlreadyInUse,
            "INVALID_EMAIL" | "MISSING_EMAIL" | "auth/invalid-email" => Self::InvalidEmail,
            "WEAK_PASSWORD" | "auth/weak-password" => Self::WeakPassword,
            "MISSING_PASSWORD" | "auth/missing-password" => Self::MissingPassword,
            other => Self::Rejected(other.to_string()),
        }
    }

    /// Text for the user-facing notice.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::EmailAlreadyInUse => "This email is already registered",
            Self::InvalidEmail => "Please enter a valid email address",
            Self::WeakPassword => "Password is too weak",
            Self::MissingPassword => "Please enter a password",
            Self::Rejected(_) | Self::Provider(_) => GENERIC_FAILURE_MESSAGE,
        }
    }
}

impl From<FirebaseError> for AuthError {
    fn from(err: FirebaseError) -> Self {
        match err {
            FirebaseError::Auth(code) => Self::from_code(&code),
            other => Self::Provider(other),
        }
    }
}
