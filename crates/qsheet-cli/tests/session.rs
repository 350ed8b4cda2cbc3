use std::io::Cursor;

use qsheet_cli::cli::{QuestionDetails, SheetCommand};
use qsheet_cli::commands::{Output, Session};
use qsheet_cli::settings::Settings;
use qsheet_cli::shell;
use qsheet_core::{CommandOutcome, DocumentStore, MemoryStorage, SequentialIds, StoreConfig};
use qsheet_ingest::{FetchError, SheetSource};
use qsheet_model::{Difficulty, QuestionId, SubTopicId, TopicId, default_tree};
use qsheet_persistence::{DEFAULT_STORAGE_KEY, FileStorage};
use serde_json::{Value, json};
use tempfile::tempdir;

/// Serves a fixed payload for every slug.
struct StaticSource(Value);

impl SheetSource for StaticSource {
    async fn fetch_sheet(&self, _slug: &str) -> Result<Value, FetchError> {
        Ok(self.0.clone())
    }
}

fn session_with(payload: Value) -> Session<MemoryStorage, StaticSource> {
    let store = DocumentStore::open(MemoryStorage::new(), StoreConfig::default())
        .with_id_generator(SequentialIds::starting_at(100));
    Session::new(store, Settings::default(), StaticSource(payload))
}

fn session() -> Session<MemoryStorage, StaticSource> {
    session_with(json!({ "questions": [] }))
}

async fn run_script(session: &mut Session<MemoryStorage, StaticSource>, script: &str) -> String {
    let mut out = Vec::new();
    shell::run(session, Cursor::new(script.to_string()), &mut out)
        .await
        .unwrap();
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn add_question_reports_the_new_id() {
    let mut session = session();
    let output = session
        .execute(SheetCommand::AddQuestion {
            topic: "topic-1".to_string(),
            sub_topic: "sub-1".to_string(),
            text: "  Longest Consecutive Sequence ".to_string(),
            details: QuestionDetails {
                difficulty: Some("medium".to_string()),
                link: None,
                notes: Some("use a set".to_string()),
            },
        })
        .await
        .unwrap();

    assert_eq!(
        output,
        Output::Created {
            kind: "question",
            id: "q-100".to_string(),
        }
    );
    let question = session
        .store()
        .tree()
        .question(
            &TopicId::new("topic-1").unwrap(),
            &SubTopicId::new("sub-1").unwrap(),
            &QuestionId::new("q-100").unwrap(),
        )
        .unwrap()
        .clone();
    assert_eq!(question.text, "Longest Consecutive Sequence");
    assert_eq!(question.difficulty, Some(Difficulty::Medium));
    assert_eq!(question.notes.as_deref(), Some("use a set"));
}

#[tokio::test]
async fn missing_parent_is_reported_as_unchanged() {
    let mut session = session();
    let output = session
        .execute(SheetCommand::AddSubTopic {
            topic: "topic-404".to_string(),
            title: "BFS".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(
        output,
        Output::Outcome {
            action: "add-subtopic",
            outcome: CommandOutcome::Unchanged,
        }
    );
    assert_eq!(session.store().tree(), &default_tree());
}

#[tokio::test]
async fn validation_errors_carry_a_readable_message() {
    let mut session = session();
    let error = session
        .execute(SheetCommand::AddTopic {
            title: "   ".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(error.to_string(), "Please enter a topic title.");
    assert!(!session.store().can_undo());
}

#[tokio::test]
async fn reorder_must_list_every_topic() {
    let mut session = session();
    let error = session
        .execute(SheetCommand::ReorderTopics {
            order: vec!["topic-2".to_string(), "topic-1".to_string()],
        })
        .await
        .unwrap_err();
    assert!(error.to_string().contains("every existing topic"));
}

#[tokio::test]
async fn edit_question_needs_a_change() {
    let mut session = session();
    let result = session
        .execute(SheetCommand::EditQuestion {
            topic: "topic-1".to_string(),
            sub_topic: "sub-1".to_string(),
            question: "q-1".to_string(),
            text: None,
            details: QuestionDetails::default(),
            clear_link: false,
            clear_notes: false,
        })
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn list_applies_search() {
    let mut session = session();
    let output = session
        .execute(SheetCommand::List {
            search: Some("stack".to_string()),
        })
        .await
        .unwrap();
    let Output::Sheet { tree, query } = output else {
        panic!("expected a sheet");
    };
    assert_eq!(query.as_deref(), Some("stack"));
    let titles: Vec<&str> = tree.topics().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Stack"]);
}

#[tokio::test]
async fn export_then_import_restores_the_sheet() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("export.json");
    let mut session = session();

    session
        .execute(SheetCommand::Export {
            output: Some(path.clone()),
        })
        .await
        .unwrap();
    session
        .execute(SheetCommand::DeleteTopic {
            topic: "topic-1".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(session.store().tree().len(), 3);

    let output = session
        .execute(SheetCommand::Import { file: path })
        .await
        .unwrap();
    assert_eq!(
        output,
        Output::Outcome {
            action: "import",
            outcome: CommandOutcome::Applied,
        }
    );
    assert_eq!(session.store().tree(), &default_tree());
}

#[tokio::test]
async fn import_of_bad_file_leaves_sheet_alone() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, r#"{"topics": "nope"}"#).unwrap();

    let mut session = session();
    let error = session
        .execute(SheetCommand::Import { file: path })
        .await
        .unwrap_err();
    assert!(error.to_string().contains("expected a 'topics' array"));
    assert_eq!(session.store().tree(), &default_tree());
}

#[tokio::test]
async fn import_sheet_replaces_tree_and_can_be_undone() {
    let mut session = session_with(json!({
        "questions": [
            {"Topic": "Graphs", "Sub_Topic": "BFS", "Problem": "Rotting Oranges"},
            {"Topic": "Graphs", "Sub_Topic": "BFS", "Problem": "Word Ladder", "Done": true}
        ]
    }));

    let output = session
        .execute(SheetCommand::ImportSheet { slug: None })
        .await
        .unwrap();
    assert_eq!(
        output,
        Output::Imported {
            slug: "striver-sde-sheet".to_string(),
            topics: 1,
            questions: 2,
            outcome: CommandOutcome::Applied,
        }
    );
    assert_eq!(session.store().tree().topics()[0].title, "Graphs");

    session.undo();
    assert_eq!(session.store().tree(), &default_tree());
}

#[tokio::test]
async fn empty_remote_sheet_is_rejected() {
    let mut session = session();
    let error = session
        .execute(SheetCommand::ImportSheet {
            slug: Some("nothing-here".to_string()),
        })
        .await
        .unwrap_err();
    assert!(error.to_string().contains("nothing-here"));
    assert_eq!(session.store().tree(), &default_tree());
}

#[tokio::test]
async fn shell_supports_undo_and_redo() {
    let mut session = session();
    let transcript = run_script(
        &mut session,
        "add-topic \"Dynamic Programming\"\nundo\nredo\nhistory\nexit\nadd-topic ignored\n",
    )
    .await;

    assert!(transcript.contains("Added topic topic-100"));
    assert!(transcript.contains("undo: done"));
    assert!(transcript.contains("redo: done"));
    assert!(transcript.contains("History: position 1 of 2"));
    let titles: Vec<&str> = session
        .store()
        .tree()
        .topics()
        .iter()
        .map(|t| t.title.as_str())
        .collect();
    assert_eq!(titles.last(), Some(&"Dynamic Programming"));
    assert_eq!(session.store().tree().len(), 5);
}

#[tokio::test]
async fn shell_keeps_going_after_errors() {
    let mut session = session();
    let transcript = run_script(
        &mut session,
        "add-topic \"\"\nno-such-command\nadd-topic 'unterminated\ntoggle topic-1 sub-1 q-3\n",
    )
    .await;

    assert!(transcript.contains("error: Please enter a topic title."));
    assert!(transcript.contains("error: unterminated single quote"));
    assert!(transcript.contains("toggle: done"));
    let question = session
        .store()
        .tree()
        .question(
            &TopicId::new("topic-1").unwrap(),
            &SubTopicId::new("sub-1").unwrap(),
            &QuestionId::new("q-3").unwrap(),
        )
        .unwrap()
        .clone();
    assert!(question.completed);
}

#[tokio::test]
async fn shell_search_persists_until_cleared() {
    let mut session = session();
    let transcript = run_script(&mut session, "search anagram\nlist\nsearch\n").await;

    assert!(transcript.contains("Search: anagram"));
    assert!(transcript.contains("Group Anagrams"));
    assert_eq!(session.store().search_query(), "");
}

#[tokio::test]
async fn file_backed_session_persists_between_runs() {
    let dir = tempdir().unwrap();
    let open = || {
        let storage = FileStorage::new(dir.path(), DEFAULT_STORAGE_KEY).unwrap();
        let store = DocumentStore::open(storage, StoreConfig::default());
        Session::new(store, Settings::default(), StaticSource(json!({})))
    };

    let mut first = open();
    first
        .execute(SheetCommand::Toggle {
            topic: "topic-4".to_string(),
            sub_topic: "sub-5".to_string(),
            question: "q-13".to_string(),
        })
        .await
        .unwrap();

    let second = open();
    assert_eq!(second.store().compute_statistics().completed_questions, 6);
}
