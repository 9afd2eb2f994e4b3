//! CLI subcommands.

pub mod browse;
pub mod sign_up;

use pocket_shop_storefront::firebase::FirebaseError;
use thiserror::Error;

/// Errors that end a command with a non-zero exit code.
#[derive(Debug, Error)]
pub enum CommandError {
    /// A Firebase client could not be built.
    #[error("Firebase client error: {0}")]
    Firebase(#[from] FirebaseError),

    /// Writing to the terminal failed.
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON output could not be produced.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// `--category` named something the store does not have.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// The catalog could not be loaded.
    #[error("{0}")]
    Load(String),

    /// The provider refused to create the account.
    #[error("Sign-up failed: {0}")]
    SignUp(String),
}
