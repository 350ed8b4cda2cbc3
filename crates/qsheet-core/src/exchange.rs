//! JSON export and import payloads.
//!
//! Two shapes share the same `topics` array:
//!
//! - the persisted record, `{ "topics": [...] }`
//! - the export document, `{ "topics": [...], "exportedAt": "...", "version": "1.0" }`
//!
//! Import accepts either one.

use chrono::{DateTime, Utc};
use qsheet_model::{Tree, validate_tree};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ImportError, StoreError};

/// Format version written into every export.
pub const EXPORT_FORMAT_VERSION: &str = "1.0";

/// Highest export major version this build can read.
const MAX_SUPPORTED_MAJOR: u64 = 1;

/// The record kept in durable storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSheet {
    pub topics: Tree,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument<'a> {
    topics: &'a Tree,
    exported_at: DateTime<Utc>,
    version: &'static str,
}

/// Serialize a tree as a pretty-printed export document.
pub fn export_tree(tree: &Tree, exported_at: DateTime<Utc>) -> Result<String, StoreError> {
    let document = ExportDocument {
        topics: tree,
        exported_at,
        version: EXPORT_FORMAT_VERSION,
    };
    serde_json::to_string_pretty(&document).map_err(StoreError::Serialize)
}

/// Serialize a tree as the persisted record.
pub fn encode_persisted(tree: &Tree) -> Result<String, serde_json::Error> {
    serde_json::to_string(&PersistedSheet {
        topics: tree.clone(),
    })
}

/// Read a persisted record back, rejecting anything that is not a
/// well-formed sheet.
pub fn decode_persisted(contents: &str) -> Result<Tree, ImportError> {
    parse_import(contents)
}

/// Parse and check an import payload.
///
/// Checks run in order: JSON syntax, presence of `topics`, `topics` being an
/// array, the export version, node shape, then the tree invariants.
pub fn parse_import(payload: &str) -> Result<Tree, ImportError> {
    let mut value: Value = serde_json::from_str(payload).map_err(ImportError::InvalidJson)?;
    let topics = value
        .get_mut("topics")
        .map(Value::take)
        .ok_or(ImportError::MissingTopics)?;
    if !topics.is_array() {
        return Err(ImportError::TopicsNotArray);
    }
    check_version(value.get("version"))?;

    let tree: Tree = serde_json::from_value(topics).map_err(ImportError::InvalidShape)?;
    validate_tree(&tree)?;
    Ok(tree)
}

fn check_version(version: Option<&Value>) -> Result<(), ImportError> {
    let Some(Value::String(version)) = version else {
        return Ok(());
    };
    let major = version
        .split('.')
        .next()
        .and_then(|major| major.trim().parse::<u64>().ok());
    match major {
        Some(major) if major > MAX_SUPPORTED_MAJOR => Err(ImportError::UnsupportedVersion {
            found: version.clone(),
        }),
        _ => Ok(()),
    }
}
