//! Command execution against the document store.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use qsheet_core::{
    CommandOutcome, DocumentStore, ImportError, NewQuestion, QuestionPatch, Statistics, Storage,
    StoreError, SystemClock, TopicInsight, UuidIds,
};
use qsheet_ingest::{
    CachedSheetSource, FetchError, HttpSheetSource, SheetSource, import_sheet,
};
use qsheet_model::{Difficulty, QuestionId, SubTopicId, TopicId, Tree};
use qsheet_persistence::write_atomic;

use crate::cli::{QuestionDetails, SheetCommand};
use crate::settings::Settings;

/// Result of a command, rendered by [`crate::summary::render`].
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// The (possibly filtered) sheet.
    Sheet { tree: Tree, query: Option<String> },
    Stats(Statistics),
    Insights(Vec<TopicInsight>),
    /// A node was added.
    Created { kind: &'static str, id: String },
    Outcome {
        action: &'static str,
        outcome: CommandOutcome,
    },
    /// Export JSON, and the file it was written to if any.
    Exported { path: Option<PathBuf>, json: String },
    /// A remote sheet replaced the current one.
    Imported {
        slug: String,
        topics: usize,
        questions: usize,
        outcome: CommandOutcome,
    },
    History {
        position: isize,
        len: usize,
        max_size: usize,
    },
    Message(String),
}

/// Session using the HTTP sheet source.
pub type HttpSession<S> = Session<S, CachedSheetSource<HttpSheetSource>>;

/// A document store plus everything commands need around it.
pub struct Session<S: Storage, Src: SheetSource> {
    store: DocumentStore<S>,
    settings: Settings,
    source: Src,
    watch_interrupts: bool,
}

impl<S: Storage> HttpSession<S> {
    /// Session fetching remote sheets from the configured API.
    pub fn with_http_source(store: DocumentStore<S>, settings: Settings) -> Result<Self> {
        let http = HttpSheetSource::new(settings.source.base_url.clone())
            .context("failed to create HTTP client")?;
        let source = CachedSheetSource::with_ttl(http, settings.source.cache_ttl());
        Ok(Session::new(store, settings, source))
    }
}

impl<S: Storage, Src: SheetSource> Session<S, Src> {
    pub fn new(store: DocumentStore<S>, settings: Settings, source: Src) -> Self {
        Self {
            store,
            settings,
            source,
            watch_interrupts: false,
        }
    }

    /// Cancel remote imports on Ctrl-C.
    #[must_use]
    pub fn with_interrupt_watch(mut self) -> Self {
        self.watch_interrupts = true;
        self
    }

    pub fn store(&self) -> &DocumentStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut DocumentStore<S> {
        &mut self.store
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run one sheet command.
    pub async fn execute(&mut self, command: SheetCommand) -> Result<Output> {
        debug!(?command, "Executing command");
        let output = match command {
            SheetCommand::List { search } => {
                if let Some(query) = search {
                    self.store.set_search_query(query);
                }
                let query = self.store.search_query().trim();
                Output::Sheet {
                    tree: self.store.filtered_tree(),
                    query: (!query.is_empty()).then(|| query.to_string()),
                }
            }
            SheetCommand::Stats => Output::Stats(self.store.compute_statistics()),
            SheetCommand::Insights => Output::Insights(self.store.topic_insights()),

            SheetCommand::AddTopic { title } => {
                let id = self.store.add_topic(&title).map_err(store_error)?;
                created("topic", id.as_str())
            }
            SheetCommand::AddSubTopic { topic, title } => {
                let topic = TopicId::new(topic)?;
                match self
                    .store
                    .add_sub_topic(&topic, &title)
                    .map_err(store_error)?
                {
                    Some(id) => created("sub-topic", id.as_str()),
                    None => unchanged("add-subtopic"),
                }
            }
            SheetCommand::AddQuestion {
                topic,
                sub_topic,
                text,
                details,
            } => {
                let topic = TopicId::new(topic)?;
                let sub_topic = SubTopicId::new(sub_topic)?;
                let question = new_question(text, details);
                match self
                    .store
                    .add_question(&topic, &sub_topic, question)
                    .map_err(store_error)?
                {
                    Some(id) => created("question", id.as_str()),
                    None => unchanged("add-question"),
                }
            }

            SheetCommand::EditTopic { topic, title } => {
                let topic = TopicId::new(topic)?;
                let outcome = self
                    .store
                    .edit_topic(&topic, &title)
                    .map_err(store_error)?;
                outcome_of("edit-topic", outcome)
            }
            SheetCommand::EditSubTopic {
                topic,
                sub_topic,
                title,
            } => {
                let topic = TopicId::new(topic)?;
                let sub_topic = SubTopicId::new(sub_topic)?;
                let outcome = self
                    .store
                    .edit_sub_topic(&topic, &sub_topic, &title)
                    .map_err(store_error)?;
                outcome_of("edit-subtopic", outcome)
            }
            SheetCommand::EditQuestion {
                topic,
                sub_topic,
                question,
                text,
                details,
                clear_link,
                clear_notes,
            } => {
                let topic = TopicId::new(topic)?;
                let sub_topic = SubTopicId::new(sub_topic)?;
                let question = QuestionId::new(question)?;
                let patch = question_patch(text, details, clear_link, clear_notes);
                if patch.is_empty() {
                    bail!("Nothing to change: pass --text, --difficulty, --link or --notes.");
                }
                let outcome = self
                    .store
                    .update_question(&topic, &sub_topic, &question, patch)
                    .map_err(store_error)?;
                outcome_of("edit-question", outcome)
            }

            SheetCommand::DeleteTopic { topic } => {
                let topic = TopicId::new(topic)?;
                outcome_of("delete-topic", self.store.delete_topic(&topic))
            }
            SheetCommand::DeleteSubTopic { topic, sub_topic } => {
                let topic = TopicId::new(topic)?;
                let sub_topic = SubTopicId::new(sub_topic)?;
                outcome_of(
                    "delete-subtopic",
                    self.store.delete_sub_topic(&topic, &sub_topic),
                )
            }
            SheetCommand::DeleteQuestion {
                topic,
                sub_topic,
                question,
            } => {
                let topic = TopicId::new(topic)?;
                let sub_topic = SubTopicId::new(sub_topic)?;
                let question = QuestionId::new(question)?;
                outcome_of(
                    "delete-question",
                    self.store.delete_question(&topic, &sub_topic, &question),
                )
            }
            SheetCommand::Toggle {
                topic,
                sub_topic,
                question,
            } => {
                let topic = TopicId::new(topic)?;
                let sub_topic = SubTopicId::new(sub_topic)?;
                let question = QuestionId::new(question)?;
                outcome_of(
                    "toggle",
                    self.store
                        .toggle_question_complete(&topic, &sub_topic, &question),
                )
            }

            SheetCommand::ReorderTopics { order } => {
                let order = order
                    .into_iter()
                    .map(TopicId::new)
                    .collect::<Result<Vec<_>, _>>()?;
                let outcome = self.store.reorder_topics(&order).map_err(store_error)?;
                outcome_of("reorder-topics", outcome)
            }
            SheetCommand::ReorderSubTopics { topic, order } => {
                let topic = TopicId::new(topic)?;
                let order = order
                    .into_iter()
                    .map(SubTopicId::new)
                    .collect::<Result<Vec<_>, _>>()?;
                let outcome = self
                    .store
                    .reorder_sub_topics(&topic, &order)
                    .map_err(store_error)?;
                outcome_of("reorder-subtopics", outcome)
            }
            SheetCommand::ReorderQuestions {
                topic,
                sub_topic,
                order,
            } => {
                let topic = TopicId::new(topic)?;
                let sub_topic = SubTopicId::new(sub_topic)?;
                let order = order
                    .into_iter()
                    .map(QuestionId::new)
                    .collect::<Result<Vec<_>, _>>()?;
                let outcome = self
                    .store
                    .reorder_questions(&topic, &sub_topic, &order)
                    .map_err(store_error)?;
                outcome_of("reorder-questions", outcome)
            }

            SheetCommand::Export { output } => {
                let json = self.store.export_snapshot().map_err(store_error)?;
                if let Some(path) = &output {
                    write_atomic(path, &json)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    info!(path = %path.display(), "Exported sheet");
                }
                Output::Exported { path: output, json }
            }
            SheetCommand::Import { file } => {
                let payload = std::fs::read_to_string(&file)
                    .with_context(|| format!("failed to read {}", file.display()))?;
                let outcome = self
                    .store
                    .import_snapshot(&payload)
                    .map_err(import_error)?;
                outcome_of("import", outcome)
            }
            SheetCommand::ImportSheet { slug } => {
                let slug = slug.unwrap_or_else(|| self.settings.source.default_slug.clone());
                self.import_remote(&slug).await?
            }
            SheetCommand::Reset => outcome_of("reset", self.store.reset_to_default()),
        };
        Ok(output)
    }

    async fn import_remote(&mut self, slug: &str) -> Result<Output> {
        let token = CancellationToken::new();
        let watcher = self.watch_interrupts.then(|| {
            let token = token.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    token.cancel();
                }
            })
        });

        let result = import_sheet(
            &mut self.store,
            &self.source,
            slug,
            &token,
            &SystemClock,
            &mut UuidIds,
        )
        .await;
        if let Some(watcher) = watcher {
            watcher.abort();
        }

        let summary = result.map_err(fetch_error)?;
        Ok(Output::Imported {
            slug: slug.to_string(),
            topics: summary.topics,
            questions: summary.questions,
            outcome: summary.outcome,
        })
    }

    pub fn undo(&mut self) -> Output {
        outcome_of("undo", self.store.undo())
    }

    pub fn redo(&mut self) -> Output {
        outcome_of("redo", self.store.redo())
    }

    /// Set the query used by `list` until it is changed again.
    pub fn search(&mut self, query: String) -> Output {
        self.store.set_search_query(query);
        let query = self.store.search_query().trim();
        Output::Sheet {
            tree: self.store.filtered_tree(),
            query: (!query.is_empty()).then(|| query.to_string()),
        }
    }

    pub fn history(&self) -> Output {
        let history = self.store.history();
        Output::History {
            position: history.index(),
            len: history.len(),
            max_size: history.max_size(),
        }
    }
}

fn created(kind: &'static str, id: &str) -> Output {
    Output::Created {
        kind,
        id: id.to_string(),
    }
}

fn outcome_of(action: &'static str, outcome: CommandOutcome) -> Output {
    Output::Outcome { action, outcome }
}

fn unchanged(action: &'static str) -> Output {
    outcome_of(action, CommandOutcome::Unchanged)
}

/// Keep an optional CLI value only when it has content.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn new_question(text: String, details: QuestionDetails) -> NewQuestion {
    let mut question = NewQuestion::new(text);
    if let Some(difficulty) = non_blank(details.difficulty) {
        question = question.with_difficulty(Difficulty::parse(&difficulty));
    }
    if let Some(link) = non_blank(details.link) {
        question = question.with_link(link);
    }
    if let Some(notes) = non_blank(details.notes) {
        question = question.with_notes(notes);
    }
    question
}

fn question_patch(
    text: Option<String>,
    details: QuestionDetails,
    clear_link: bool,
    clear_notes: bool,
) -> QuestionPatch {
    QuestionPatch {
        text,
        completed: None,
        difficulty: non_blank(details.difficulty).map(|d| Some(Difficulty::parse(&d))),
        link: if clear_link {
            Some(None)
        } else {
            non_blank(details.link).map(Some)
        },
        notes: if clear_notes {
            Some(None)
        } else {
            non_blank(details.notes).map(Some)
        },
    }
}

fn store_error(err: StoreError) -> anyhow::Error {
    let message = err.user_message();
    anyhow::Error::new(err).context(message)
}

fn import_error(err: ImportError) -> anyhow::Error {
    let message = err.user_message();
    anyhow::Error::new(err).context(message)
}

fn fetch_error(err: FetchError) -> anyhow::Error {
    let message = err.user_message();
    anyhow::Error::new(err).context(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_from_flags() {
        let details = QuestionDetails {
            difficulty: Some(" hard ".to_string()),
            link: None,
            notes: Some("   ".to_string()),
        };
        let patch = question_patch(None, details, true, false);
        assert_eq!(patch.difficulty, Some(Some(Difficulty::Hard)));
        assert_eq!(patch.link, Some(None));
        assert_eq!(patch.notes, None);
    }

    #[test]
    fn empty_flags_give_empty_patch() {
        assert!(question_patch(None, QuestionDetails::default(), false, false).is_empty());
    }

    #[test]
    fn new_question_skips_blank_details() {
        let details = QuestionDetails {
            difficulty: Some("Medium".to_string()),
            link: Some(String::new()),
            notes: None,
        };
        let question = new_question("Group Anagrams".to_string(), details);
        assert_eq!(question.difficulty, Some(Difficulty::Medium));
        assert!(question.link.is_none());
    }
}
