//! Pure tree transformations.
//!
//! Every function takes a snapshot by reference and returns a new snapshot.
//! Only the nodes on the path from the root to the changed node are rebuilt;
//! every other node keeps its `Arc` and is shared with the input.
//!
//! Functions are total: an id that does not resolve leaves the tree
//! unchanged (the returned tree is equal to, and shares every node with, the
//! input). Content checks such as blank titles belong to the caller.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use qsheet_model::{
    Difficulty, Question, QuestionId, SubTopic, SubTopicId, Topic, TopicId, Tree,
};

/// Content of a question about to be appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewQuestion {
    pub text: String,
    pub difficulty: Option<Difficulty>,
    pub link: Option<String>,
    pub notes: Option<String>,
}

impl NewQuestion {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
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

/// Partial update of a question. `None` leaves a field untouched;
/// `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionPatch {
    pub text: Option<String>,
    pub completed: Option<bool>,
    pub difficulty: Option<Option<Difficulty>>,
    pub link: Option<Option<String>>,
    pub notes: Option<Option<String>>,
}

impl QuestionPatch {
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.completed.is_none()
            && self.difficulty.is_none()
            && self.link.is_none()
            && self.notes.is_none()
    }

    fn apply(&self, question: &Question) -> Question {
        let mut next = question.clone();
        if let Some(text) = &self.text {
            next.text.clone_from(text);
        }
        if let Some(completed) = self.completed {
            next.completed = completed;
        }
        if let Some(difficulty) = &self.difficulty {
            next.difficulty.clone_from(difficulty);
        }
        if let Some(link) = &self.link {
            next.link.clone_from(link);
        }
        if let Some(notes) = &self.notes {
            next.notes.clone_from(notes);
        }
        next
    }
}

// =============================================================================
// Path rebuilding
// =============================================================================

fn map_topic(tree: &Tree, topic_id: &TopicId, f: impl FnOnce(&Topic) -> Topic) -> Tree {
    let Some(pos) = tree.topics.iter().position(|t| &t.id == topic_id) else {
        return tree.clone();
    };
    let mut topics = tree.topics.clone();
    topics[pos] = Arc::new(f(&tree.topics[pos]));
    Tree::from_shared(topics)
}

fn map_sub_topic(
    tree: &Tree,
    topic_id: &TopicId,
    sub_topic_id: &SubTopicId,
    f: impl FnOnce(&SubTopic) -> SubTopic,
) -> Tree {
    if tree.sub_topic(topic_id, sub_topic_id).is_none() {
        return tree.clone();
    }
    map_topic(tree, topic_id, |topic| {
        let mut next = topic.clone();
        if let Some(pos) = next.sub_topics.iter().position(|s| &s.id == sub_topic_id) {
            next.sub_topics[pos] = Arc::new(f(&topic.sub_topics[pos]));
        }
        next
    })
}

fn map_question(
    tree: &Tree,
    topic_id: &TopicId,
    sub_topic_id: &SubTopicId,
    question_id: &QuestionId,
    f: impl FnOnce(&Question) -> Question,
) -> Tree {
    if tree.question(topic_id, sub_topic_id, question_id).is_none() {
        return tree.clone();
    }
    map_sub_topic(tree, topic_id, sub_topic_id, |sub_topic| {
        let mut next = sub_topic.clone();
        if let Some(pos) = next.questions.iter().position(|q| &q.id == question_id) {
            next.questions[pos] = Arc::new(f(&sub_topic.questions[pos]));
        }
        next
    })
}

/// Reorder `items` to follow `order`, or `None` when `order` is not a
/// permutation of the current ids.
fn permute<T, K>(items: &[Arc<T>], order: &[K], key: impl Fn(&T) -> &K) -> Option<Vec<Arc<T>>>
where
    K: Eq + Hash,
{
    let current: Vec<&K> = items.iter().map(|item| key(&**item)).collect();
    let proposed: Vec<&K> = order.iter().collect();
    if !same_id_set(&current, &proposed) {
        return None;
    }
    let by_id: HashMap<&K, &Arc<T>> = items
        .iter()
        .map(|item| (key(&**item), item))
        .collect();
    order
        .iter()
        .map(|id| by_id.get(id).map(|item| Arc::clone(item)))
        .collect()
}

/// True when `proposed` holds exactly the ids of `current`, each once.
pub fn same_id_set<K: Eq + Hash>(current: &[K], proposed: &[K]) -> bool {
    if current.len() != proposed.len() {
        return false;
    }
    let expected: HashSet<&K> = current.iter().collect();
    let mut seen = HashSet::with_capacity(proposed.len());
    proposed
        .iter()
        .all(|id| expected.contains(id) && seen.insert(id))
}

/// Replace the whole tree, as import and reset do.
pub fn replace_tree(tree: Tree) -> Tree {
    tree
}

// =============================================================================
// Topics
// =============================================================================

pub fn add_topic(tree: &Tree, id: TopicId, title: &str, created_at: DateTime<Utc>) -> Tree {
    let mut topics = tree.topics.clone();
    topics.push(Arc::new(Topic::new(id, title, created_at)));
    Tree::from_shared(topics)
}

pub fn edit_topic(tree: &Tree, topic_id: &TopicId, title: &str) -> Tree {
    map_topic(tree, topic_id, |topic| Topic {
        title: title.to_string(),
        ..topic.clone()
    })
}

/// Remove a topic together with its sub-topics and questions.
pub fn delete_topic(tree: &Tree, topic_id: &TopicId) -> Tree {
    if tree.topic(topic_id).is_none() {
        return tree.clone();
    }
    Tree::from_shared(
        tree.topics
            .iter()
            .filter(|t| &t.id != topic_id)
            .cloned()
            .collect(),
    )
}

pub fn reorder_topics(tree: &Tree, order: &[TopicId]) -> Tree {
    match permute(&tree.topics, order, |t| &t.id) {
        Some(topics) => Tree::from_shared(topics),
        None => tree.clone(),
    }
}

// =============================================================================
// Sub-topics
// =============================================================================

pub fn add_sub_topic(
    tree: &Tree,
    topic_id: &TopicId,
    id: SubTopicId,
    title: &str,
    created_at: DateTime<Utc>,
) -> Tree {
    map_topic(tree, topic_id, |topic| {
        let mut next = topic.clone();
        next.sub_topics
            .push(Arc::new(SubTopic::new(id, title, created_at)));
        next
    })
}

pub fn edit_sub_topic(
    tree: &Tree,
    topic_id: &TopicId,
    sub_topic_id: &SubTopicId,
    title: &str,
) -> Tree {
    map_sub_topic(tree, topic_id, sub_topic_id, |sub_topic| SubTopic {
        title: title.to_string(),
        ..sub_topic.clone()
    })
}

/// Remove a sub-topic together with its questions.
pub fn delete_sub_topic(tree: &Tree, topic_id: &TopicId, sub_topic_id: &SubTopicId) -> Tree {
    if tree.sub_topic(topic_id, sub_topic_id).is_none() {
        return tree.clone();
    }
    map_topic(tree, topic_id, |topic| {
        let mut next = topic.clone();
        next.sub_topics.retain(|s| &s.id != sub_topic_id);
        next
    })
}

pub fn reorder_sub_topics(tree: &Tree, topic_id: &TopicId, order: &[SubTopicId]) -> Tree {
    let Some(topic) = tree.topic(topic_id) else {
        return tree.clone();
    };
    let Some(sub_topics) = permute(&topic.sub_topics, order, |s| &s.id) else {
        return tree.clone();
    };
    map_topic(tree, topic_id, |topic| Topic {
        sub_topics,
        ..topic.clone()
    })
}

// =============================================================================
// Questions
// =============================================================================

pub fn add_question(
    tree: &Tree,
    topic_id: &TopicId,
    sub_topic_id: &SubTopicId,
    id: QuestionId,
    question: NewQuestion,
    created_at: DateTime<Utc>,
) -> Tree {
    map_sub_topic(tree, topic_id, sub_topic_id, |sub_topic| {
        let mut next = sub_topic.clone();
        next.questions.push(Arc::new(Question {
            id,
            text: question.text,
            completed: false,
            difficulty: question.difficulty,
            link: question.link,
            notes: question.notes,
            created_at,
        }));
        next
    })
}

pub fn edit_question_text(
    tree: &Tree,
    topic_id: &TopicId,
    sub_topic_id: &SubTopicId,
    question_id: &QuestionId,
    text: &str,
) -> Tree {
    map_question(tree, topic_id, sub_topic_id, question_id, |question| Question {
        text: text.to_string(),
        ..question.clone()
    })
}

pub fn update_question(
    tree: &Tree,
    topic_id: &TopicId,
    sub_topic_id: &SubTopicId,
    question_id: &QuestionId,
    patch: &QuestionPatch,
) -> Tree {
    if patch.is_empty() {
        return tree.clone();
    }
    map_question(tree, topic_id, sub_topic_id, question_id, |question| {
        patch.apply(question)
    })
}

pub fn delete_question(
    tree: &Tree,
    topic_id: &TopicId,
    sub_topic_id: &SubTopicId,
    question_id: &QuestionId,
) -> Tree {
    if tree.question(topic_id, sub_topic_id, question_id).is_none() {
        return tree.clone();
    }
    map_sub_topic(tree, topic_id, sub_topic_id, |sub_topic| {
        let mut next = sub_topic.clone();
        next.questions.retain(|q| &q.id != question_id);
        next
    })
}

pub fn toggle_question_complete(
    tree: &Tree,
    topic_id: &TopicId,
    sub_topic_id: &SubTopicId,
    question_id: &QuestionId,
) -> Tree {
    map_question(tree, topic_id, sub_topic_id, question_id, |question| Question {
        completed: !question.completed,
        ..question.clone()
    })
}

pub fn reorder_questions(
    tree: &Tree,
    topic_id: &TopicId,
    sub_topic_id: &SubTopicId,
    order: &[QuestionId],
) -> Tree {
    let Some(sub_topic) = tree.sub_topic(topic_id, sub_topic_id) else {
        return tree.clone();
    };
    let Some(questions) = permute(&sub_topic.questions, order, |q| &q.id) else {
        return tree.clone();
    };
    map_sub_topic(tree, topic_id, sub_topic_id, |sub_topic| SubTopic {
        questions,
        ..sub_topic.clone()
    })
}
