//! Turn flat question records into a canonical sheet.
//!
//! Each record describes one question and names its topic and sub-topic by
//! label. Records are grouped by topic label, then sub-topic label, in the
//! order the labels are first seen; questions keep their source order.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use qsheet_core::{Clock, IdGenerator};
use qsheet_model::{
    Difficulty, ModelError, Question, QuestionId, SubTopic, SubTopicId, Topic, TopicId, Tree,
};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::fields::{
    COMPLETED, CREATED_AT, DEFAULT_SUB_TOPIC, DEFAULT_TEXT, DEFAULT_TOPIC, DIFFICULTY, LINK, NOTES,
    SOURCE_ID, SUB_TOPIC, TEXT, TOPIC,
};

/// One loosely structured question record.
pub type Record = Map<String, Value>;

/// Extract the question records from a fetched payload.
///
/// Accepts `{ "questions": [...] }`, `{ "data": { "questions": [...] } }` or a
/// bare array. Non-object entries are skipped; any other shape yields no
/// records.
pub fn parse_payload(payload: &Value) -> Vec<Record> {
    let list = match payload {
        Value::Array(items) => Some(items),
        Value::Object(map) => map
            .get("questions")
            .and_then(Value::as_array)
            .or_else(|| {
                map.get("data")
                    .and_then(|data| data.get("questions"))
                    .and_then(Value::as_array)
            }),
        _ => None,
    };
    let Some(list) = list else {
        debug!("Payload has no question list");
        return Vec::new();
    };
    list.iter()
        .filter_map(|item| item.as_object().cloned())
        .collect()
}

#[derive(Default)]
struct Group<T> {
    order: Vec<(String, T)>,
    index: HashMap<String, usize>,
}

impl<T: Default> Group<T> {
    fn entry(&mut self, label: &str) -> &mut T {
        let pos = match self.index.get(label) {
            Some(&pos) => pos,
            None => {
                self.order.push((label.to_string(), T::default()));
                self.index.insert(label.to_string(), self.order.len() - 1);
                self.order.len() - 1
            }
        };
        &mut self.order[pos].1
    }
}

/// Build a canonical tree from `records`.
///
/// Missing fields fall back to defaults: topic `Uncategorized`, sub-topic
/// `General`, text `Untitled Question`, difficulty `Medium`, not completed,
/// created now. Topic and sub-topic ids come from `ids`. Question ids keep
/// the record's own id when it has one; ids repeated within a sub-topic get a
/// numeric suffix. The result always passes the well-formedness check.
pub fn normalize_records(records: &[Record], clock: &dyn Clock, ids: &mut dyn IdGenerator) -> Tree {
    let now = clock.now();
    let millis = now.timestamp_millis();

    let mut topics: Group<Group<Vec<Question>>> = Group::default();
    for (index, record) in records.iter().enumerate() {
        let topic_label = TOPIC.text(record).unwrap_or_else(|| DEFAULT_TOPIC.to_string());
        let sub_topic_label = SUB_TOPIC
            .text(record)
            .unwrap_or_else(|| DEFAULT_SUB_TOPIC.to_string());
        let questions = topics.entry(&topic_label).entry(&sub_topic_label);

        let raw_id = SOURCE_ID
            .text(record)
            .unwrap_or_else(|| format!("q-{index}-{millis}"));
        let taken: HashSet<&str> = questions.iter().map(|q| q.id.as_str()).collect();
        let Some(id) = build_id(QuestionId::new, dedupe(&raw_id, &taken), format!("q-{index}-{millis}"))
        else {
            continue;
        };

        questions.push(question_from_record(record, id, now));
    }

    let mut topic_ids = HashSet::new();
    let mut sub_topic_ids = HashSet::new();
    let mut built = Vec::with_capacity(topics.order.len());
    for (ti, (topic_label, sub_topics)) in topics.order.into_iter().enumerate() {
        let raw = unique(ids.next_id("topic"), &mut topic_ids);
        let Some(topic_id) = build_id(TopicId::new, raw, format!("topic-{ti}-{millis}")) else {
            warn!(topic = %topic_label, "Skipping topic without a usable id");
            continue;
        };

        let mut children = Vec::with_capacity(sub_topics.order.len());
        for (si, (sub_topic_label, questions)) in sub_topics.order.into_iter().enumerate() {
            let raw = unique(ids.next_id("sub"), &mut sub_topic_ids);
            let Some(sub_topic_id) =
                build_id(SubTopicId::new, raw, format!("sub-{ti}-{si}-{millis}"))
            else {
                warn!(sub_topic = %sub_topic_label, "Skipping sub-topic without a usable id");
                continue;
            };
            children.push(SubTopic::new(sub_topic_id, sub_topic_label, now).with_questions(questions));
        }
        built.push(Topic::new(topic_id, topic_label, now).with_sub_topics(children));
    }

    let tree = Tree::new(built);
    debug!(
        records = records.len(),
        topics = tree.len(),
        "Normalized question records"
    );
    tree
}

fn question_from_record(record: &Record, id: QuestionId, now: DateTime<Utc>) -> Question {
    let text = TEXT.text(record).unwrap_or_else(|| DEFAULT_TEXT.to_string());
    let difficulty = DIFFICULTY
        .text(record)
        .map_or(Difficulty::Medium, |label| Difficulty::parse(&label));
    let created_at = CREATED_AT
        .text(record)
        .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
        .map_or(now, |ts| ts.with_timezone(&Utc));

    let mut question = Question::new(id, text, created_at)
        .with_completed(COMPLETED.flag(record))
        .with_difficulty(difficulty);
    question.link = LINK.text(record);
    question.notes = NOTES.text(record);
    question
}

/// `raw` if unused in `taken`, otherwise `raw-2`, `raw-3`, ...
fn dedupe(raw: &str, taken: &HashSet<&str>) -> String {
    if !taken.contains(raw) {
        return raw.to_string();
    }
    (2..)
        .map(|n| format!("{raw}-{n}"))
        .find(|candidate| !taken.contains(candidate.as_str()))
        .unwrap_or_else(|| raw.to_string())
}

fn unique(raw: String, taken: &mut HashSet<String>) -> String {
    let id = {
        let view: HashSet<&str> = taken.iter().map(String::as_str).collect();
        dedupe(&raw, &view)
    };
    taken.insert(id.clone());
    id
}

/// Build an id from `raw`, or from `fallback` when `raw` is blank.
fn build_id<T>(make: fn(String) -> Result<T, ModelError>, raw: String, fallback: String) -> Option<T> {
    make(raw).or_else(|_| make(fallback)).ok()
}
