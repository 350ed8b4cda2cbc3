//! Well-formedness check for sheet trees.
//!
//! A tree is well formed when every title/text is non-blank and ids are
//! unique within their containing collection. The document store runs this
//! before accepting any externally supplied tree.

use std::collections::HashSet;

use crate::{Tree, TreeError};

/// Validate a tree, returning the first problem found in document order.
pub fn validate_tree(tree: &Tree) -> Result<(), TreeError> {
    let mut topic_ids = HashSet::new();
    for (topic_idx, topic) in tree.topics.iter().enumerate() {
        if topic.title.trim().is_empty() {
            return Err(TreeError::EmptyTopicTitle { topic: topic_idx });
        }
        if !topic_ids.insert(&topic.id) {
            return Err(TreeError::DuplicateTopicId {
                id: topic.id.to_string(),
            });
        }

        let mut sub_topic_ids = HashSet::new();
        for (sub_idx, sub_topic) in topic.sub_topics.iter().enumerate() {
            if sub_topic.title.trim().is_empty() {
                return Err(TreeError::EmptySubTopicTitle {
                    topic_id: topic.id.to_string(),
                    sub_topic: sub_idx,
                });
            }
            if !sub_topic_ids.insert(&sub_topic.id) {
                return Err(TreeError::DuplicateSubTopicId {
                    topic_id: topic.id.to_string(),
                    id: sub_topic.id.to_string(),
                });
            }

            let mut question_ids = HashSet::new();
            for (question_idx, question) in sub_topic.questions.iter().enumerate() {
                if question.text.trim().is_empty() {
                    return Err(TreeError::EmptyQuestionText {
                        sub_topic_id: sub_topic.id.to_string(),
                        question: question_idx,
                    });
                }
                if !question_ids.insert(&question.id) {
                    return Err(TreeError::DuplicateQuestionId {
                        sub_topic_id: sub_topic.id.to_string(),
                        id: question.id.to_string(),
                    });
                }
            }
        }
    }
    Ok(())
}

/// Boolean form of [`validate_tree`].
pub fn is_well_formed(tree: &Tree) -> bool {
    validate_tree(tree).is_ok()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::{Question, QuestionId, SubTopic, SubTopicId, Topic, TopicId};

    fn question(id: &str, text: &str) -> Question {
        Question::new(QuestionId::new(id).unwrap(), text, Utc::now())
    }

    fn sub_topic(id: &str, title: &str, questions: Vec<Question>) -> SubTopic {
        SubTopic::new(SubTopicId::new(id).unwrap(), title, Utc::now()).with_questions(questions)
    }

    fn topic(id: &str, title: &str, subs: Vec<SubTopic>) -> Topic {
        Topic::new(TopicId::new(id).unwrap(), title, Utc::now()).with_sub_topics(subs)
    }

    #[test]
    fn empty_tree_is_well_formed() {
        assert!(is_well_formed(&Tree::default()));
    }

    #[test]
    fn rejects_blank_topic_title() {
        let tree = Tree::new(vec![topic("t1", "  ", vec![])]);
        assert_eq!(
            validate_tree(&tree),
            Err(TreeError::EmptyTopicTitle { topic: 0 })
        );
    }

    #[test]
    fn rejects_duplicate_topic_ids() {
        let tree = Tree::new(vec![topic("t1", "A", vec![]), topic("t1", "B", vec![])]);
        assert!(matches!(
            validate_tree(&tree),
            Err(TreeError::DuplicateTopicId { .. })
        ));
    }

    #[test]
    fn sub_topic_ids_only_need_to_be_unique_per_topic() {
        let tree = Tree::new(vec![
            topic("t1", "A", vec![sub_topic("s1", "x", vec![])]),
            topic("t2", "B", vec![sub_topic("s1", "y", vec![])]),
        ]);
        assert!(is_well_formed(&tree));

        let tree = Tree::new(vec![topic(
            "t1",
            "A",
            vec![sub_topic("s1", "x", vec![]), sub_topic("s1", "y", vec![])],
        )]);
        assert!(matches!(
            validate_tree(&tree),
            Err(TreeError::DuplicateSubTopicId { .. })
        ));
    }

    #[test]
    fn rejects_blank_question_text_and_duplicate_question_ids() {
        let tree = Tree::new(vec![topic(
            "t1",
            "A",
            vec![sub_topic("s1", "x", vec![question("q1", "")])],
        )]);
        assert!(matches!(
            validate_tree(&tree),
            Err(TreeError::EmptyQuestionText { question: 0, .. })
        ));

        let tree = Tree::new(vec![topic(
            "t1",
            "A",
            vec![sub_topic(
                "s1",
                "x",
                vec![question("q1", "one"), question("q1", "two")],
            )],
        )]);
        assert!(matches!(
            validate_tree(&tree),
            Err(TreeError::DuplicateQuestionId { .. })
        ));
    }
}
