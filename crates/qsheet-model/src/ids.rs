//! Typed identifiers for sheet nodes.
//!
//! Each level of the hierarchy gets its own id type so a topic id can never
//! be passed where a question id is expected. Ids are opaque strings and are
//! rejected when empty.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ModelError;

macro_rules! node_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(ModelError::InvalidId {
                        kind: $kind,
                        value,
                    });
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Build from a literal known to be non-blank.
            pub(crate) fn from_literal(value: &'static str) -> Self {
                Self(value.to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ModelError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

node_id!(
    /// Identifier of a [`crate::Topic`], unique across the sheet.
    TopicId,
    "topic"
);
node_id!(
    /// Identifier of a [`crate::SubTopic`], unique within its topic.
    SubTopicId,
    "sub-topic"
);
node_id!(
    /// Identifier of a [`crate::Question`], unique within its sub-topic.
    QuestionId,
    "question"
);
