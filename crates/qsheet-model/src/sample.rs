//! Built-in starter sheet.

use chrono::{DateTime, TimeZone, Utc};

use crate::{Difficulty, Question, QuestionId, SubTopic, SubTopicId, Topic, TopicId, Tree};

fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

fn question(
    id: &'static str,
    text: &str,
    completed: bool,
    difficulty: Difficulty,
    created_at: DateTime<Utc>,
) -> Question {
    Question::new(QuestionId::from_literal(id), text, created_at)
        .with_completed(completed)
        .with_difficulty(difficulty)
}

/// The sheet shown on first start and restored by a reset.
///
/// Four topics, five sub-topics and thirteen questions, five
/// of which are already completed.
pub fn default_tree() -> Tree {
    use Difficulty::{Easy, Medium};

    Tree::new(vec![
        Topic::new(TopicId::from_literal("topic-1"), "Arrays & Hashing", at(15, 8, 0))
            .with_sub_topics(vec![
                SubTopic::new(SubTopicId::from_literal("sub-1"), "Easy Problems", at(15, 9, 0))
                    .with_questions(vec![
                        question("q-1", "Two Sum", true, Easy, at(15, 10, 0)),
                        question("q-2", "Contains Duplicate", true, Easy, at(15, 10, 5)),
                        question("q-3", "Valid Anagram", false, Easy, at(15, 10, 10)),
                    ]),
                SubTopic::new(SubTopicId::from_literal("sub-2"), "Medium Problems", at(16, 9, 0))
                    .with_questions(vec![
                        question("q-4", "Group Anagrams", false, Medium, at(16, 10, 0)),
                        question("q-5", "Top K Frequent Elements", false, Medium, at(16, 10, 5)),
                        question(
                            "q-6",
                            "Product of Array Except Self",
                            false,
                            Medium,
                            at(16, 10, 10),
                        ),
                    ]),
            ]),
        Topic::new(TopicId::from_literal("topic-2"), "Two Pointers", at(17, 8, 0)).with_sub_topics(
            vec![
                SubTopic::new(SubTopicId::from_literal("sub-3"), "Core Patterns", at(17, 9, 0))
                    .with_questions(vec![
                        question("q-7", "Valid Palindrome", true, Easy, at(17, 10, 0)),
                        question(
                            "q-8",
                            "Two Sum II - Input Array Is Sorted",
                            false,
                            Medium,
                            at(17, 10, 5),
                        ),
                        question("q-9", "3Sum", false, Medium, at(17, 10, 10)),
                    ]),
            ],
        ),
        Topic::new(TopicId::from_literal("topic-3"), "Sliding Window", at(18, 8, 0))
            .with_sub_topics(vec![
                SubTopic::new(SubTopicId::from_literal("sub-4"), "Fixed Size Window", at(18, 9, 0))
                    .with_questions(vec![
                        question(
                            "q-10",
                            "Best Time to Buy and Sell Stock",
                            true,
                            Easy,
                            at(18, 10, 0),
                        ),
                        question(
                            "q-11",
                            "Longest Substring Without Repeating Characters",
                            false,
                            Medium,
                            at(18, 10, 5),
                        ),
                    ]),
            ]),
        Topic::new(TopicId::from_literal("topic-4"), "Stack", at(19, 8, 0)).with_sub_topics(vec![
            SubTopic::new(SubTopicId::from_literal("sub-5"), "Monotonic Stack", at(19, 9, 0))
                .with_questions(vec![
                    question("q-12", "Valid Parentheses", true, Easy, at(19, 10, 0)),
                    question("q-13", "Min Stack", false, Medium, at(19, 10, 5)),
                ]),
        ]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::is_well_formed;

    #[test]
    fn default_tree_is_well_formed() {
        let tree = default_tree();
        assert!(is_well_formed(&tree));
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.questions().count(), 13);
        assert_eq!(tree.questions().filter(|q| q.completed).count(), 5);
    }
}
