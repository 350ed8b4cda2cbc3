use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{TimeZone, Utc};
use qsheet_core::{
    CommandOutcome, DocumentStore, FixedClock, MemoryStorage, SequentialIds, StoreConfig,
};
use qsheet_ingest::{
    FetchError, SheetSource, fetch_records_cancellable, import_sheet, normalize_records,
    parse_payload,
};
use qsheet_model::{Difficulty, default_tree, is_well_formed};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

fn clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap())
}

fn store() -> DocumentStore<MemoryStorage> {
    DocumentStore::open(MemoryStorage::new(), StoreConfig::default())
        .with_id_generator(SequentialIds::starting_at(500))
}

/// Serves a fixed payload.
struct StaticSource(Value);

impl SheetSource for StaticSource {
    async fn fetch_sheet(&self, _slug: &str) -> Result<Value, FetchError> {
        Ok(self.0.clone())
    }
}

/// Never finishes until the test gives up on it.
struct PendingSource;

impl SheetSource for PendingSource {
    async fn fetch_sheet(&self, _slug: &str) -> Result<Value, FetchError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(json!({"questions": [{"Problem": "late"}]}))
    }
}

/// Cancels the token while the fetch is in flight, then completes.
struct CancelsMidFlight {
    token: CancellationToken,
    fetched: AtomicBool,
}

impl SheetSource for CancelsMidFlight {
    async fn fetch_sheet(&self, _slug: &str) -> Result<Value, FetchError> {
        self.token.cancel();
        self.fetched.store(true, Ordering::SeqCst);
        Ok(json!({"questions": [{"Problem": "stale"}]}))
    }
}

fn striver_payload() -> Value {
    json!({
        "questions": [
            {"_id": "a1", "Topic": "Arrays", "Sub_Topic": "Easy", "Problem": "Two Sum", "Done": true, "URL": "https://leetcode.com/problems/two-sum"},
            {"_id": "a2", "topic": "Arrays", "subTopic": "Easy", "title": "Best Time to Buy and Sell Stock", "difficulty": "Easy"},
            {"_id": "g1", "category": "Graphs", "subcategory": "BFS", "name": "Rotting Oranges", "Difficulty": "Medium"},
            {"_id": "a3", "Topic": "Arrays", "Sub_Topic": "Hard", "Problem": "Trapping Rain Water", "difficulty": "Hard"},
            {"_id": "x1"}
        ]
    })
}

#[test]
fn normalizer_groups_by_first_seen_labels() {
    let records = parse_payload(&striver_payload());
    let tree = normalize_records(&records, &clock(), &mut SequentialIds::new());

    assert!(is_well_formed(&tree));
    let titles: Vec<&str> = tree.topics().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Arrays", "Graphs", "Uncategorized"]);

    let arrays = &tree.topics()[0];
    let subs: Vec<&str> = arrays.sub_topics.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(subs, vec!["Easy", "Hard"]);
    let easy: Vec<&str> = arrays.sub_topics[0].questions.iter().map(|q| q.text.as_str()).collect();
    assert_eq!(easy, vec!["Two Sum", "Best Time to Buy and Sell Stock"]);
    assert!(arrays.sub_topics[0].questions[0].completed);
    assert!(!arrays.sub_topics[0].questions[1].completed);
}

#[test]
fn normalizer_fills_defaults() {
    let records = parse_payload(&json!([{}]));
    let tree = normalize_records(&records, &clock(), &mut SequentialIds::new());

    assert_eq!(tree.len(), 1);
    let topic = &tree.topics()[0];
    assert_eq!(topic.title, "Uncategorized");
    assert_eq!(topic.sub_topics[0].title, "General");
    let q = &topic.sub_topics[0].questions[0];
    assert_eq!(q.text, "Untitled Question");
    assert_eq!(q.difficulty, Some(Difficulty::Medium));
    assert!(!q.completed);
    assert_eq!(q.link, None);
    assert_eq!(q.created_at, clock().0);
    assert_eq!(topic.created_at, clock().0);
}

#[test]
fn empty_record_list_gives_empty_tree() {
    let tree = normalize_records(&[], &clock(), &mut SequentialIds::new());
    assert!(tree.is_empty());
}

#[test]
fn generated_topic_ids_come_from_the_generator() {
    let records = parse_payload(&striver_payload());
    let tree = normalize_records(&records, &clock(), &mut SequentialIds::new());
    let ids: Vec<&str> = tree.topics().iter().map(|t| t.id.as_str()).collect();
    // Topic and sub-topic ids interleave on one counter.
    assert_eq!(ids, vec!["topic-1", "topic-4", "topic-6"]);
}

#[tokio::test]
async fn import_replaces_tree_and_is_undoable() {
    let mut store = store();
    let source = StaticSource(json!({"data": striver_payload()}));
    let token = CancellationToken::new();

    // The HTTP source strips the envelope; a raw `data` wrapper is also accepted.
    let summary = import_sheet(
        &mut store,
        &source,
        "striver-sde-sheet",
        &token,
        &clock(),
        &mut SequentialIds::new(),
    )
    .await
    .unwrap();

    assert_eq!(summary.outcome, CommandOutcome::Applied);
    assert_eq!(summary.topics, 3);
    assert_eq!(summary.questions, 5);
    assert_eq!(store.compute_statistics().total_questions, 5);

    store.undo();
    assert_eq!(store.tree(), &default_tree());
}

#[tokio::test]
async fn empty_sheet_is_rejected() {
    let mut store = store();
    let source = StaticSource(json!({"questions": []}));
    let err = import_sheet(
        &mut store,
        &source,
        "nothing",
        &CancellationToken::new(),
        &clock(),
        &mut SequentialIds::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, FetchError::Empty { ref slug } if slug == "nothing"));
    assert_eq!(store.tree(), &default_tree());
    assert!(!store.can_undo());
}

#[tokio::test]
async fn cancelled_fetch_returns_promptly() {
    let token = CancellationToken::new();
    let cancel = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        cancel.cancel();
    });

    let result = fetch_records_cancellable(&PendingSource, "slow", &token).await;
    assert!(matches!(result, Err(FetchError::Cancelled)));
}

#[tokio::test]
async fn result_arriving_after_cancel_is_discarded() {
    let token = CancellationToken::new();
    let source = CancelsMidFlight {
        token: token.clone(),
        fetched: AtomicBool::new(false),
    };
    let mut store = store();

    let result = import_sheet(
        &mut store,
        &source,
        "slug",
        &token,
        &clock(),
        &mut SequentialIds::new(),
    )
    .await;

    assert!(source.fetched.load(Ordering::SeqCst));
    assert!(matches!(result, Err(FetchError::Cancelled)));
    assert_eq!(store.tree(), &default_tree());
}

#[tokio::test]
async fn already_cancelled_token_skips_fetch() {
    let token = CancellationToken::new();
    token.cancel();
    let source = StaticSource(striver_payload());
    let result = fetch_records_cancellable(&source, "slug", &token).await;
    assert!(matches!(result, Err(FetchError::Cancelled)));
}
