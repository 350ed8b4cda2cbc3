//! Store error types.

use qsheet_model::{ModelError, TreeError};
use thiserror::Error;

/// A command was rejected before any state change.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Topic or sub-topic title is empty after trimming.
    #[error("{kind} title must not be empty")]
    EmptyTitle { kind: &'static str },

    /// Question text is empty after trimming.
    #[error("question text must not be empty")]
    EmptyText,

    /// Reorder ids are not a permutation of the current siblings.
    #[error("new {kind} order does not match the existing {kind}s")]
    ReorderMismatch { kind: &'static str },

    /// Generated id could not be turned into a node id.
    #[error(transparent)]
    InvalidId(#[from] ModelError),

    /// Export payload could not be serialized.
    #[error("failed to serialize sheet")]
    Serialize(#[source] serde_json::Error),
}

impl StoreError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyTitle { kind } => format!("Please enter a {kind} title."),
            Self::EmptyText => "Please enter the question text.".to_string(),
            Self::ReorderMismatch { kind } => {
                format!("The new order must list every existing {kind} exactly once.")
            }
            Self::InvalidId(err) => format!("Internal id error: {err}"),
            Self::Serialize(_) => "The sheet could not be exported.".to_string(),
        }
    }
}

/// An import payload was rejected. The live tree is left untouched.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Payload is not JSON at all.
    #[error("import payload is not valid JSON")]
    InvalidJson(#[source] serde_json::Error),

    /// Payload has no `topics` field.
    #[error("import payload has no 'topics' field")]
    MissingTopics,

    /// `topics` is present but not an array.
    #[error("'topics' must be an array")]
    TopicsNotArray,

    /// `topics` does not have the sheet's node shape.
    #[error("import payload does not describe a sheet")]
    InvalidShape(#[source] serde_json::Error),

    /// Export was produced by a newer format.
    #[error("export format version {found} is not supported")]
    UnsupportedVersion { found: String },

    /// Payload parsed but breaks a tree invariant.
    #[error("import payload is malformed: {0}")]
    Malformed(#[from] TreeError),
}

impl ImportError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidJson(_) => "The file is not valid JSON.".to_string(),
            Self::MissingTopics | Self::TopicsNotArray => {
                "Invalid data format: expected a 'topics' array.".to_string()
            }
            Self::InvalidShape(err) => format!("The topics could not be read: {err}"),
            Self::UnsupportedVersion { found } => format!(
                "This export was created by a newer version (format {found}). \
                Please update the application."
            ),
            Self::Malformed(err) => format!("The sheet is inconsistent: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_node_kind() {
        let err = StoreError::ReorderMismatch { kind: "question" };
        assert_eq!(
            err.to_string(),
            "new question order does not match the existing questions"
        );
        assert!(StoreError::EmptyTitle { kind: "topic" }
            .user_message()
            .contains("topic title"));
    }

    #[test]
    fn import_messages() {
        assert_eq!(
            ImportError::MissingTopics.user_message(),
            ImportError::TopicsNotArray.user_message()
        );
        let err = ImportError::from(TreeError::DuplicateTopicId {
            id: "t".to_string(),
        });
        assert!(err.to_string().contains("duplicate topic id 't'"));
    }
}
