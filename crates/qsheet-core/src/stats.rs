//! Progress statistics.

use qsheet_model::{TopicId, Tree};
use serde::Serialize;

/// Threshold below which a topic is flagged for attention.
const ATTENTION_THRESHOLD: f64 = 50.0;

/// Sheet-wide counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_topics: usize,
    pub total_sub_topics: usize,
    pub total_questions: usize,
    pub completed_questions: usize,
    /// Completion percentage in `[0, 100]`.
    pub progress: f64,
}

impl Statistics {
    pub fn remaining(&self) -> usize {
        self.total_questions - self.completed_questions
    }
}

/// Progress of a single topic.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicInsight {
    pub id: TopicId,
    pub title: String,
    pub total: usize,
    pub completed: usize,
    pub progress: f64,
}

impl TopicInsight {
    pub fn needs_attention(&self) -> bool {
        self.progress < ATTENTION_THRESHOLD
    }
}

#[allow(clippy::cast_precision_loss)]
fn percentage(completed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        completed as f64 / total as f64 * 100.0
    }
}

pub fn compute_statistics(tree: &Tree) -> Statistics {
    let total_questions = tree.questions().count();
    let completed_questions = tree.questions().filter(|q| q.completed).count();
    Statistics {
        total_topics: tree.len(),
        total_sub_topics: tree.topics().iter().map(|t| t.sub_topics.len()).sum(),
        total_questions,
        completed_questions,
        progress: percentage(completed_questions, total_questions),
    }
}

/// Per-topic progress, most complete first. Ties keep document order.
pub fn topic_insights(tree: &Tree) -> Vec<TopicInsight> {
    let mut insights: Vec<TopicInsight> = tree
        .topics()
        .iter()
        .map(|topic| {
            let total = topic.question_count();
            let completed = topic.completed_count();
            TopicInsight {
                id: topic.id.clone(),
                title: topic.title.clone(),
                total,
                completed,
                progress: percentage(completed, total),
            }
        })
        .collect();
    insights.sort_by(|a, b| b.progress.total_cmp(&a.progress));
    insights
}

#[cfg(test)]
mod tests {
    use qsheet_model::default_tree;

    use super::*;

    #[test]
    fn default_sheet_statistics() {
        let stats = compute_statistics(&default_tree());
        assert_eq!(stats.total_topics, 4);
        assert_eq!(stats.total_sub_topics, 5);
        assert_eq!(stats.total_questions, 13);
        assert_eq!(stats.completed_questions, 5);
        assert_eq!(stats.remaining(), 8);
        assert!((stats.progress - 500.0 / 13.0).abs() < 1e-9);
    }

    #[test]
    fn empty_tree_has_zero_progress() {
        let stats = compute_statistics(&Tree::default());
        assert_eq!(stats.total_questions, 0);
        assert_eq!(stats.progress, 0.0);
    }

    #[test]
    fn insights_sorted_by_progress() {
        let insights = topic_insights(&default_tree());
        let titles: Vec<&str> = insights.iter().map(|i| i.title.as_str()).collect();
        // Sliding Window and Stack at 50%, the other two at 33%.
        assert_eq!(
            titles,
            vec!["Sliding Window", "Stack", "Arrays & Hashing", "Two Pointers"]
        );
        assert!(!insights[0].needs_attention());
        assert!(insights[3].needs_attention());
    }
}
