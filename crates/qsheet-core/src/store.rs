//! The document store: validated, undoable, persisted commands.

use qsheet_model::{
    ModelError, QuestionId, SubTopicId, TopicId, Tree, default_tree, validate_tree,
};
use tracing::{debug, info, warn};

use crate::clock::{Clock, IdGenerator, SystemClock, UuidIds};
use crate::engine::{self, NewQuestion, QuestionPatch};
use crate::error::{ImportError, StoreError};
use crate::exchange;
use crate::history::{DEFAULT_MAX_HISTORY, History};
use crate::search::filter_tree;
use crate::stats::{self, Statistics, TopicInsight};
use crate::storage::Storage;

/// Attempts at drawing an unused id before falling back to a random suffix.
const MAX_ID_ATTEMPTS: usize = 64;

/// Store tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Number of undo steps kept.
    pub max_history: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
        }
    }
}

/// Result of a command that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The live tree changed and a history entry was recorded.
    Applied,
    /// Nothing changed, usually because a target id was not found.
    Unchanged,
}

impl CommandOutcome {
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Owner of the live tree, its history and the search query.
///
/// Every mutating command follows the same path: validate, apply the engine
/// function, record history, persist. Validation failures return an error
/// and leave everything untouched.
///
/// History keeps the live tree at its cursor. The first command records the
/// tree it started from as well as its result, so undo always lands on the
/// exact tree a command started from.
pub struct DocumentStore<S: Storage> {
    storage: S,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdGenerator>,
    live: Tree,
    history: History,
    search_query: String,
}

impl<S: Storage> std::fmt::Debug for DocumentStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("topics", &self.live.len())
            .field("history_len", &self.history.len())
            .field("history_index", &self.history.index())
            .field("search_query", &self.search_query)
            .finish_non_exhaustive()
    }
}

impl<S: Storage> DocumentStore<S> {
    /// Open a store over `storage`.
    ///
    /// A missing record starts from the default sheet. An unreadable or
    /// malformed record is logged and also replaced by the default sheet.
    pub fn open(storage: S, config: StoreConfig) -> Self {
        let live = load_tree(&storage);
        Self {
            storage,
            clock: Box::new(SystemClock),
            ids: Box::new(UuidIds),
            live,
            history: History::new(config.max_history),
            search_query: String::new(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    #[must_use]
    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// The live tree.
    pub fn tree(&self) -> &Tree {
        &self.live
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// The live tree narrowed by the current search query.
    pub fn filtered_tree(&self) -> Tree {
        filter_tree(&self.live, &self.search_query)
    }

    pub fn compute_statistics(&self) -> Statistics {
        stats::compute_statistics(&self.live)
    }

    pub fn topic_insights(&self) -> Vec<TopicInsight> {
        stats::topic_insights(&self.live)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    // =========================================================================
    // Topics
    // =========================================================================

    /// Append a topic and return its id.
    pub fn add_topic(&mut self, title: &str) -> Result<TopicId, StoreError> {
        let title = require_title(title, "topic")?;
        let id = self.fresh_id("topic", TopicId::new, |tree, raw| {
            tree.topics().iter().any(|t| t.id.as_str() == raw)
        })?;
        let next = engine::add_topic(&self.live, id.clone(), title, self.clock.now());
        self.commit(next, "add_topic");
        Ok(id)
    }

    pub fn edit_topic(&mut self, topic_id: &TopicId, title: &str) -> Result<CommandOutcome, StoreError> {
        let title = require_title(title, "topic")?;
        let next = engine::edit_topic(&self.live, topic_id, title);
        Ok(self.commit(next, "edit_topic"))
    }

    pub fn delete_topic(&mut self, topic_id: &TopicId) -> CommandOutcome {
        let next = engine::delete_topic(&self.live, topic_id);
        self.commit(next, "delete_topic")
    }

    pub fn reorder_topics(&mut self, order: &[TopicId]) -> Result<CommandOutcome, StoreError> {
        let current: Vec<&TopicId> = self.live.topics().iter().map(|t| &t.id).collect();
        let proposed: Vec<&TopicId> = order.iter().collect();
        if !engine::same_id_set(&current, &proposed) {
            return Err(StoreError::ReorderMismatch { kind: "topic" });
        }
        let next = engine::reorder_topics(&self.live, order);
        Ok(self.commit(next, "reorder_topics"))
    }

    // =========================================================================
    // Sub-topics
    // =========================================================================

    /// Append a sub-topic. Returns `None` when the topic does not exist.
    pub fn add_sub_topic(
        &mut self,
        topic_id: &TopicId,
        title: &str,
    ) -> Result<Option<SubTopicId>, StoreError> {
        let title = require_title(title, "sub-topic")?;
        if self.live.topic(topic_id).is_none() {
            debug!(topic = %topic_id, "add_sub_topic: topic not found");
            return Ok(None);
        }
        let id = self.fresh_id("sub", SubTopicId::new, |tree, raw| {
            tree.topics()
                .iter()
                .flat_map(|t| t.sub_topics.iter())
                .any(|s| s.id.as_str() == raw)
        })?;
        let next = engine::add_sub_topic(&self.live, topic_id, id.clone(), title, self.clock.now());
        self.commit(next, "add_sub_topic");
        Ok(Some(id))
    }

    pub fn edit_sub_topic(
        &mut self,
        topic_id: &TopicId,
        sub_topic_id: &SubTopicId,
        title: &str,
    ) -> Result<CommandOutcome, StoreError> {
        let title = require_title(title, "sub-topic")?;
        let next = engine::edit_sub_topic(&self.live, topic_id, sub_topic_id, title);
        Ok(self.commit(next, "edit_sub_topic"))
    }

    pub fn delete_sub_topic(&mut self, topic_id: &TopicId, sub_topic_id: &SubTopicId) -> CommandOutcome {
        let next = engine::delete_sub_topic(&self.live, topic_id, sub_topic_id);
        self.commit(next, "delete_sub_topic")
    }

    pub fn reorder_sub_topics(
        &mut self,
        topic_id: &TopicId,
        order: &[SubTopicId],
    ) -> Result<CommandOutcome, StoreError> {
        let Some(topic) = self.live.topic(topic_id) else {
            return Ok(CommandOutcome::Unchanged);
        };
        let current: Vec<&SubTopicId> = topic.sub_topics.iter().map(|s| &s.id).collect();
        let proposed: Vec<&SubTopicId> = order.iter().collect();
        if !engine::same_id_set(&current, &proposed) {
            return Err(StoreError::ReorderMismatch { kind: "sub-topic" });
        }
        let next = engine::reorder_sub_topics(&self.live, topic_id, order);
        Ok(self.commit(next, "reorder_sub_topics"))
    }

    // =========================================================================
    // Questions
    // =========================================================================

    /// Append an open question. Returns `None` when the parent path does not
    /// exist.
    pub fn add_question(
        &mut self,
        topic_id: &TopicId,
        sub_topic_id: &SubTopicId,
        question: NewQuestion,
    ) -> Result<Option<QuestionId>, StoreError> {
        let text = require_text(&question.text)?.to_string();
        if self.live.sub_topic(topic_id, sub_topic_id).is_none() {
            debug!(topic = %topic_id, sub_topic = %sub_topic_id, "add_question: sub-topic not found");
            return Ok(None);
        }
        let id = self.fresh_id("q", QuestionId::new, |tree, raw| {
            tree.questions().any(|q| q.id.as_str() == raw)
        })?;
        let question = NewQuestion { text, ..question };
        let next = engine::add_question(
            &self.live,
            topic_id,
            sub_topic_id,
            id.clone(),
            question,
            self.clock.now(),
        );
        self.commit(next, "add_question");
        Ok(Some(id))
    }

    pub fn edit_question_text(
        &mut self,
        topic_id: &TopicId,
        sub_topic_id: &SubTopicId,
        question_id: &QuestionId,
        text: &str,
    ) -> Result<CommandOutcome, StoreError> {
        let text = require_text(text)?;
        let next = engine::edit_question_text(&self.live, topic_id, sub_topic_id, question_id, text);
        Ok(self.commit(next, "edit_question_text"))
    }

    /// Apply a partial update to a question.
    pub fn update_question(
        &mut self,
        topic_id: &TopicId,
        sub_topic_id: &SubTopicId,
        question_id: &QuestionId,
        mut patch: QuestionPatch,
    ) -> Result<CommandOutcome, StoreError> {
        if let Some(text) = patch.text.take() {
            patch.text = Some(require_text(&text)?.to_string());
        }
        let next = engine::update_question(&self.live, topic_id, sub_topic_id, question_id, &patch);
        Ok(self.commit(next, "update_question"))
    }

    pub fn delete_question(
        &mut self,
        topic_id: &TopicId,
        sub_topic_id: &SubTopicId,
        question_id: &QuestionId,
    ) -> CommandOutcome {
        let next = engine::delete_question(&self.live, topic_id, sub_topic_id, question_id);
        self.commit(next, "delete_question")
    }

    pub fn toggle_question_complete(
        &mut self,
        topic_id: &TopicId,
        sub_topic_id: &SubTopicId,
        question_id: &QuestionId,
    ) -> CommandOutcome {
        let next = engine::toggle_question_complete(&self.live, topic_id, sub_topic_id, question_id);
        self.commit(next, "toggle_question_complete")
    }

    pub fn reorder_questions(
        &mut self,
        topic_id: &TopicId,
        sub_topic_id: &SubTopicId,
        order: &[QuestionId],
    ) -> Result<CommandOutcome, StoreError> {
        let Some(sub_topic) = self.live.sub_topic(topic_id, sub_topic_id) else {
            return Ok(CommandOutcome::Unchanged);
        };
        let current: Vec<&QuestionId> = sub_topic.questions.iter().map(|q| &q.id).collect();
        let proposed: Vec<&QuestionId> = order.iter().collect();
        if !engine::same_id_set(&current, &proposed) {
            return Err(StoreError::ReorderMismatch { kind: "question" });
        }
        let next = engine::reorder_questions(&self.live, topic_id, sub_topic_id, order);
        Ok(self.commit(next, "reorder_questions"))
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Set the search query. Does not touch history or storage.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    // =========================================================================
    // Whole-sheet commands
    // =========================================================================

    /// Serialize the live tree as an export document.
    pub fn export_snapshot(&self) -> Result<String, StoreError> {
        exchange::export_tree(&self.live, self.clock.now())
    }

    /// Replace the live tree with an exported sheet.
    pub fn import_snapshot(&mut self, payload: &str) -> Result<CommandOutcome, ImportError> {
        let tree = exchange::parse_import(payload)?;
        info!(topics = tree.len(), "Importing sheet snapshot");
        Ok(self.commit(engine::replace_tree(tree), "import_snapshot"))
    }

    /// Replace the live tree with an already built tree, such as normalizer
    /// output.
    pub fn import_tree(&mut self, tree: Tree) -> Result<CommandOutcome, ImportError> {
        validate_tree(&tree)?;
        info!(topics = tree.len(), "Importing sheet");
        Ok(self.commit(engine::replace_tree(tree), "import_tree"))
    }

    /// Restore the built-in starter sheet. Undoable.
    pub fn reset_to_default(&mut self) -> CommandOutcome {
        info!("Resetting sheet to defaults");
        self.commit(engine::replace_tree(default_tree()), "reset_to_default")
    }

    // =========================================================================
    // History
    // =========================================================================

    pub fn undo(&mut self) -> CommandOutcome {
        match self.history.undo() {
            Some(tree) => {
                debug!(index = self.history.index(), "undo");
                self.live = tree;
                self.persist();
                CommandOutcome::Applied
            }
            None => CommandOutcome::Unchanged,
        }
    }

    pub fn redo(&mut self) -> CommandOutcome {
        match self.history.redo() {
            Some(tree) => {
                debug!(index = self.history.index(), "redo");
                self.live = tree;
                self.persist();
                CommandOutcome::Applied
            }
            None => CommandOutcome::Unchanged,
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn commit(&mut self, next: Tree, command: &'static str) -> CommandOutcome {
        if next == self.live {
            debug!(command, "no change");
            return CommandOutcome::Unchanged;
        }
        if self.history.current() != Some(&self.live) {
            self.history.record(self.live.clone());
        }
        self.history.record(next.clone());
        self.live = next;
        debug!(command, history_index = self.history.index(), "applied");
        self.persist();
        CommandOutcome::Applied
    }

    fn persist(&mut self) {
        let contents = match exchange::encode_persisted(&self.live) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(error = %e, "Failed to encode sheet for storage");
                return;
            }
        };
        if let Err(e) = self.storage.save(&contents) {
            warn!(error = %e, "Failed to persist sheet");
        }
    }

    fn fresh_id<T>(
        &mut self,
        prefix: &str,
        make: impl Fn(String) -> Result<T, ModelError>,
        taken: impl Fn(&Tree, &str) -> bool,
    ) -> Result<T, StoreError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let raw = self.ids.next_id(prefix);
            if !taken(&self.live, &raw) {
                return Ok(make(raw)?);
            }
        }
        let raw = UuidIds.next_id(prefix);
        Ok(make(raw)?)
    }
}

fn load_tree(storage: &impl Storage) -> Tree {
    match storage.load() {
        Ok(Some(contents)) => match exchange::decode_persisted(&contents) {
            Ok(tree) => {
                debug!(topics = tree.len(), "Loaded persisted sheet");
                tree
            }
            Err(e) => {
                warn!(error = %e, "Persisted sheet is malformed, starting from defaults");
                default_tree()
            }
        },
        Ok(None) => {
            debug!("No persisted sheet, starting from defaults");
            default_tree()
        }
        Err(e) => {
            warn!(error = %e, "Failed to read persisted sheet, starting from defaults");
            default_tree()
        }
    }
}

fn require_title<'a>(title: &'a str, kind: &'static str) -> Result<&'a str, StoreError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(StoreError::EmptyTitle { kind });
    }
    Ok(title)
}

fn require_text(text: &str) -> Result<&str, StoreError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(StoreError::EmptyText);
    }
    Ok(text)
}
