//! Case-insensitive search over a snapshot.

use std::sync::Arc;

use qsheet_model::{Question, SubTopic, Topic, Tree};

/// Narrow a tree to the nodes matching `query`.
///
/// A title match on a topic or sub-topic keeps that node with all of its
/// children. Otherwise a node survives only when something beneath it
/// matches, and only the matching descendants are kept. Questions match on
/// their text or difficulty label. A blank query returns the tree as is.
pub fn filter_tree(tree: &Tree, query: &str) -> Tree {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return tree.clone();
    }
    Tree::from_shared(
        tree.topics
            .iter()
            .filter_map(|topic| filter_topic(topic, &needle))
            .collect(),
    )
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn question_matches(question: &Question, needle: &str) -> bool {
    contains(&question.text, needle)
        || question
            .difficulty
            .as_ref()
            .is_some_and(|d| contains(d.label(), needle))
}

fn filter_topic(topic: &Arc<Topic>, needle: &str) -> Option<Arc<Topic>> {
    if contains(&topic.title, needle) {
        return Some(Arc::clone(topic));
    }
    let sub_topics: Vec<_> = topic
        .sub_topics
        .iter()
        .filter_map(|sub_topic| filter_sub_topic(sub_topic, needle))
        .collect();
    if sub_topics.is_empty() {
        return None;
    }
    Some(Arc::new(Topic {
        sub_topics,
        ..Topic::clone(topic)
    }))
}

fn filter_sub_topic(sub_topic: &Arc<SubTopic>, needle: &str) -> Option<Arc<SubTopic>> {
    if contains(&sub_topic.title, needle) {
        return Some(Arc::clone(sub_topic));
    }
    let questions: Vec<_> = sub_topic
        .questions
        .iter()
        .filter(|question| question_matches(question, needle))
        .cloned()
        .collect();
    if questions.is_empty() {
        return None;
    }
    Some(Arc::new(SubTopic {
        questions,
        ..SubTopic::clone(sub_topic)
    }))
}

#[cfg(test)]
mod tests {
    use qsheet_model::default_tree;

    use super::*;

    fn titles(tree: &Tree) -> Vec<&str> {
        tree.topics().iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn blank_query_returns_everything() {
        let tree = default_tree();
        assert_eq!(filter_tree(&tree, "   "), tree);
        assert_eq!(filter_tree(&tree, ""), tree);
    }

    #[test]
    fn question_match_keeps_only_matching_questions() {
        let tree = default_tree();
        let result = filter_tree(&tree, "parenth");
        assert_eq!(titles(&result), vec!["Stack"]);
        let sub = &result.topics()[0].sub_topics[0];
        assert_eq!(sub.title, "Monotonic Stack");
        assert_eq!(sub.questions.len(), 1);
        assert_eq!(sub.questions[0].text, "Valid Parentheses");
    }

    #[test]
    fn valid_matches_across_topics() {
        let tree = default_tree();
        let result = filter_tree(&tree, "VALID");
        assert_eq!(titles(&result), vec!["Arrays & Hashing", "Two Pointers", "Stack"]);
        let stack = &result.topics()[2];
        assert_eq!(stack.sub_topics[0].questions[0].text, "Valid Parentheses");
        assert_eq!(stack.sub_topics[0].questions.len(), 1);
    }

    #[test]
    fn title_match_keeps_all_children() {
        let tree = default_tree();
        let result = filter_tree(&tree, "pointers");
        assert_eq!(titles(&result), vec!["Two Pointers"]);
        assert!(Arc::ptr_eq(&result.topics()[0], &tree.topics()[1]));

        let result = filter_tree(&tree, "medium problems");
        let sub = &result.topics()[0].sub_topics;
        assert_eq!(sub.len(), 1);
        assert_eq!(sub[0].questions.len(), 3);
    }

    #[test]
    fn difficulty_label_matches() {
        let tree = default_tree();
        let result = filter_tree(&tree, "hard");
        assert!(result.is_empty());
        let result = filter_tree(&tree, "easy");
        // "Easy Problems" is a sub-topic title; the rest match on difficulty.
        assert_eq!(result.questions().filter(|q| q.text == "Valid Parentheses").count(), 1);
    }

    #[test]
    fn every_result_node_is_in_the_input() {
        let tree = default_tree();
        let result = filter_tree(&tree, "st");
        for topic in result.topics() {
            for sub in &topic.sub_topics {
                for q in &sub.questions {
                    assert!(tree.question(&topic.id, &sub.id, &q.id).is_some());
                }
            }
        }
    }
}
