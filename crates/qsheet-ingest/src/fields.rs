//! Field alias chains for loosely structured question records.
//!
//! External sheets name the same field in many ways (`Problem`, `title`,
//! `name`, ...). Each logical field is described by an ordered list of
//! aliases; the first alias holding a present value wins.

use serde_json::{Map, Value};

/// One logical field and the keys it may appear under, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldChain {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
}

pub const TOPIC: FieldChain = FieldChain {
    name: "topic",
    aliases: &["Topic", "topic", "topicName", "category", "Category"],
};

pub const SUB_TOPIC: FieldChain = FieldChain {
    name: "sub-topic",
    aliases: &["Sub_Topic", "sub_topic", "subTopic", "subTopicName", "subcategory"],
};

pub const TEXT: FieldChain = FieldChain {
    name: "text",
    aliases: &["Problem", "problem", "title", "name"],
};

pub const COMPLETED: FieldChain = FieldChain {
    name: "completed",
    aliases: &["Done", "done", "completed", "isCompleted"],
};

pub const DIFFICULTY: FieldChain = FieldChain {
    name: "difficulty",
    aliases: &["difficulty", "Difficulty"],
};

pub const LINK: FieldChain = FieldChain {
    name: "link",
    aliases: &["URL", "url", "link", "Link"],
};

pub const NOTES: FieldChain = FieldChain {
    name: "notes",
    aliases: &["notes", "Notes"],
};

pub const SOURCE_ID: FieldChain = FieldChain {
    name: "id",
    aliases: &["_id", "id"],
};

pub const CREATED_AT: FieldChain = FieldChain {
    name: "created-at",
    aliases: &["createdAt"],
};

/// Fallback labels for records without a topic or sub-topic.
pub const DEFAULT_TOPIC: &str = "Uncategorized";
pub const DEFAULT_SUB_TOPIC: &str = "General";
pub const DEFAULT_TEXT: &str = "Untitled Question";

impl FieldChain {
    /// First present value along the chain.
    pub fn resolve<'a>(&self, record: &'a Map<String, Value>) -> Option<&'a Value> {
        self.aliases
            .iter()
            .filter_map(|alias| record.get(*alias))
            .find(|value| is_present(value))
    }

    /// First value along the chain that reads as non-blank text.
    pub fn text(&self, record: &Map<String, Value>) -> Option<String> {
        self.aliases
            .iter()
            .filter_map(|alias| record.get(*alias))
            .find_map(as_text)
    }

    /// Whether the first present value reads as "done".
    pub fn flag(&self, record: &Map<String, Value>) -> bool {
        self.resolve(record).is_some_and(is_truthy_flag)
    }
}

/// Null, blank strings and `false` count as absent.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

/// Scalar values rendered as trimmed text. Containers and absent values
/// give `None`.
pub fn as_text(value: &Value) -> Option<String> {
    if !is_present(value) {
        return None;
    }
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn is_truthy_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "1" | "done"
        ),
        _ => false,
    }
}
