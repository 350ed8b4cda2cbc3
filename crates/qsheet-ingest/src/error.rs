//! Fetch and import error types.

use qsheet_core::ImportError;
use thiserror::Error;

/// Failure while fetching or importing a remote sheet.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Request could not be sent or the body could not be read.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("server returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// Body is not valid JSON.
    #[error("response is not valid JSON")]
    Decode(#[source] serde_json::Error),

    /// The fetch was cancelled before its result was applied.
    #[error("fetch was cancelled")]
    Cancelled,

    /// The payload held no questions.
    #[error("sheet '{slug}' contains no questions")]
    Empty { slug: String },

    /// Normalized sheet was rejected by the store.
    #[error(transparent)]
    Import(#[from] ImportError),
}

impl FetchError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => {
                "Could not reach the sheet server. Check your internet connection.".to_string()
            }
            Self::Status { status, .. } => {
                format!("The sheet server answered with an error (HTTP {status}).")
            }
            Self::Decode(_) => "The sheet server sent data that could not be read.".to_string(),
            Self::Cancelled => "The import was cancelled.".to_string(),
            Self::Empty { slug } => format!("No questions were found in sheet '{slug}'."),
            Self::Import(err) => err.user_message(),
        }
    }

    /// True when retrying later might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}
