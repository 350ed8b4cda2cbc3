//! Data model for the question sheet.
//!
//! A sheet is an ordered list of [`Topic`]s, each holding ordered
//! [`SubTopic`]s, each holding ordered [`Question`]s. Values are immutable
//! once built: children are held behind [`std::sync::Arc`] so that two
//! snapshots of the sheet can share every node that did not change between
//! them.
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use qsheet_model::{Question, QuestionId, SubTopic, SubTopicId, Topic, TopicId, Tree};
//!
//! let now = Utc::now();
//! let question = Question::new(QuestionId::new("q-1").unwrap(), "Two Sum", now);
//! let sub = SubTopic::new(SubTopicId::new("sub-1").unwrap(), "Easy", now)
//!     .with_questions(vec![question]);
//! let topic = Topic::new(TopicId::new("topic-1").unwrap(), "Arrays", now)
//!     .with_sub_topics(vec![sub]);
//! let tree = Tree::new(vec![topic]);
//!
//! assert!(qsheet_model::is_well_formed(&tree));
//! ```

mod error;
mod ids;
mod sample;
mod tree;
mod validate;

pub use error::{ModelError, TreeError};
pub use ids::{QuestionId, SubTopicId, TopicId};
pub use sample::default_tree;
pub use tree::{Difficulty, Question, SubTopic, Topic, Tree};
pub use validate::{is_well_formed, validate_tree};
