//! Error types for the sheet model.

use thiserror::Error;

/// Errors raised when constructing model values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Identifier was empty or whitespace only.
    #[error("invalid {kind} id: {value:?}")]
    InvalidId { kind: &'static str, value: String },
}

/// Reasons a tree fails the well-formedness check.
///
/// Positions are zero-based indices into the sibling sequences so the
/// offending node can be located even when its title is the problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// A topic has an empty or blank title.
    #[error("topic #{topic} has an empty title")]
    EmptyTopicTitle { topic: usize },

    /// Two topics share an id.
    #[error("duplicate topic id '{id}'")]
    DuplicateTopicId { id: String },

    /// A sub-topic has an empty or blank title.
    #[error("sub-topic #{sub_topic} of topic '{topic_id}' has an empty title")]
    EmptySubTopicTitle { topic_id: String, sub_topic: usize },

    /// Two sub-topics within one topic share an id.
    #[error("duplicate sub-topic id '{id}' in topic '{topic_id}'")]
    DuplicateSubTopicId { topic_id: String, id: String },

    /// A question has empty or blank text.
    #[error("question #{question} of sub-topic '{sub_topic_id}' has empty text")]
    EmptyQuestionText {
        sub_topic_id: String,
        question: usize,
    },

    /// Two questions within one sub-topic share an id.
    #[error("duplicate question id '{id}' in sub-topic '{sub_topic_id}'")]
    DuplicateQuestionId { sub_topic_id: String, id: String },
}
