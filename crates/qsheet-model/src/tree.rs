//! Sheet node types.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{QuestionId, SubTopicId, TopicId};

/// Question difficulty.
///
/// The three canonical levels parse case-insensitively; anything else is kept
/// verbatim so imported sheets with their own labels survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Other(String),
}

impl Difficulty {
    /// Parse a difficulty label.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "easy" => Self::Easy,
            "medium" => Self::Medium,
            "hard" => Self::Hard,
            _ => Self::Other(trimmed.to_string()),
        }
    }

    /// Display label.
    pub fn label(&self) -> &str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for Difficulty {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Difficulty> for String {
    fn from(value: Difficulty) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single checklist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Question {
    /// Create an open question with no optional fields set.
    pub fn new(id: QuestionId, text: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
            difficulty: None,
            link: None,
            notes: None,
            created_at,
        }
    }

    #[must_use]
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// A group of questions inside a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubTopic {
    pub id: SubTopicId,
    pub title: String,
    #[serde(default)]
    pub questions: Vec<Arc<Question>>,
    pub created_at: DateTime<Utc>,
}

impl SubTopic {
    /// Create an empty sub-topic.
    pub fn new(id: SubTopicId, title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: title.into(),
            questions: Vec::new(),
            created_at,
        }
    }

    #[must_use]
    pub fn with_questions(mut self, questions: Vec<Question>) -> Self {
        self.questions = questions.into_iter().map(Arc::new).collect();
        self
    }

    pub fn question(&self, id: &QuestionId) -> Option<&Arc<Question>> {
        self.questions.iter().find(|q| &q.id == id)
    }

    /// Number of completed questions.
    pub fn completed_count(&self) -> usize {
        self.questions.iter().filter(|q| q.completed).count()
    }
}

/// A top-level section of the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: TopicId,
    pub title: String,
    #[serde(default)]
    pub sub_topics: Vec<Arc<SubTopic>>,
    pub created_at: DateTime<Utc>,
}

impl Topic {
    /// Create an empty topic.
    pub fn new(id: TopicId, title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: title.into(),
            sub_topics: Vec::new(),
            created_at,
        }
    }

    #[must_use]
    pub fn with_sub_topics(mut self, sub_topics: Vec<SubTopic>) -> Self {
        self.sub_topics = sub_topics.into_iter().map(Arc::new).collect();
        self
    }

    pub fn sub_topic(&self, id: &SubTopicId) -> Option<&Arc<SubTopic>> {
        self.sub_topics.iter().find(|s| &s.id == id)
    }

    /// Total questions across all sub-topics.
    pub fn question_count(&self) -> usize {
        self.sub_topics.iter().map(|s| s.questions.len()).sum()
    }

    /// Completed questions across all sub-topics.
    pub fn completed_count(&self) -> usize {
        self.sub_topics.iter().map(|s| s.completed_count()).sum()
    }
}

/// One snapshot of the whole sheet.
///
/// Cloning a tree is cheap: only the top-level vector is copied and every
/// node is shared. Nodes are never mutated after construction, so a clone is
/// structurally independent of the original for all practical purposes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tree {
    pub topics: Vec<Arc<Topic>>,
}

impl Tree {
    pub fn new(topics: Vec<Topic>) -> Self {
        Self {
            topics: topics.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn from_shared(topics: Vec<Arc<Topic>>) -> Self {
        Self { topics }
    }

    pub fn topics(&self) -> &[Arc<Topic>] {
        &self.topics
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    pub fn topic(&self, id: &TopicId) -> Option<&Arc<Topic>> {
        self.topics.iter().find(|t| &t.id == id)
    }

    pub fn sub_topic(&self, topic_id: &TopicId, sub_topic_id: &SubTopicId) -> Option<&Arc<SubTopic>> {
        self.topic(topic_id)?.sub_topic(sub_topic_id)
    }

    pub fn question(
        &self,
        topic_id: &TopicId,
        sub_topic_id: &SubTopicId,
        question_id: &QuestionId,
    ) -> Option<&Arc<Question>> {
        self.sub_topic(topic_id, sub_topic_id)?.question(question_id)
    }

    /// Iterate every question in document order.
    pub fn questions(&self) -> impl Iterator<Item = &Arc<Question>> {
        self.topics
            .iter()
            .flat_map(|t| t.sub_topics.iter())
            .flat_map(|s| s.questions.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-01-15T10:00:00.000Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!(Difficulty::parse("easy"), Difficulty::Easy);
        assert_eq!(Difficulty::parse(" HARD "), Difficulty::Hard);
        assert_eq!(
            Difficulty::parse("Tricky"),
            Difficulty::Other("Tricky".to_string())
        );
        assert_eq!(Difficulty::Medium.label(), "Medium");
    }

    #[test]
    fn question_serializes_camel_case_and_skips_empty_options() {
        let q = Question::new(QuestionId::new("q-1").unwrap(), "Two Sum", ts())
            .with_difficulty(Difficulty::Easy);
        let json = serde_json::to_value(&q).unwrap();

        assert_eq!(json["id"], "q-1");
        assert_eq!(json["difficulty"], "Easy");
        assert_eq!(json["createdAt"], "2024-01-15T10:00:00Z");
        assert!(json.get("link").is_none());
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn question_deserializes_with_defaults() {
        let json = r#"{"id":"q-9","text":"3Sum","createdAt":"2024-01-17T10:10:00.000Z"}"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert!(!q.completed);
        assert_eq!(q.difficulty, None);
        assert_eq!(q.created_at, DateTime::parse_from_rfc3339("2024-01-17T10:10:00Z").unwrap());
    }

    #[test]
    fn tree_lookup_walks_the_hierarchy() {
        let tree = Tree::new(vec![
            Topic::new(TopicId::new("t").unwrap(), "Stack", ts()).with_sub_topics(vec![
                SubTopic::new(SubTopicId::new("s").unwrap(), "Monotonic", ts()).with_questions(
                    vec![Question::new(QuestionId::new("q").unwrap(), "Min Stack", ts())],
                ),
            ]),
        ]);

        let t = TopicId::new("t").unwrap();
        let s = SubTopicId::new("s").unwrap();
        let q = QuestionId::new("q").unwrap();
        assert_eq!(tree.question(&t, &s, &q).unwrap().text, "Min Stack");
        assert!(tree.question(&t, &s, &QuestionId::new("x").unwrap()).is_none());
        assert_eq!(tree.questions().count(), 1);
    }
}
