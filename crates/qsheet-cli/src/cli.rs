//! CLI argument definitions for the question sheet tracker.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "qsheet",
    version,
    about = "Question sheet tracker - organize interview questions by topic",
    long_about = "Track coding-interview questions in a Topic > Sub-topic > Question sheet.\n\n\
                  Edits are saved after every command. Use `qsheet shell` for an\n\
                  interactive session with undo and redo."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Settings file to use instead of the one in the user config directory.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the saved sheet (overrides `storage.dir`).
    #[arg(long = "data-dir", value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    #[command(flatten)]
    Sheet(SheetCommand),

    /// Start an interactive session with undo and redo.
    Shell,
}

/// Commands available both from the command line and inside the shell.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum SheetCommand {
    /// Show the sheet, optionally narrowed by a search query.
    List {
        /// Case-insensitive text matched against titles, questions and difficulty.
        #[arg(long = "search", short = 's', value_name = "QUERY")]
        search: Option<String>,
    },

    /// Show overall progress.
    Stats,

    /// Show per-topic progress, most complete first.
    Insights,

    /// Add a topic.
    AddTopic {
        title: String,
    },

    /// Add a sub-topic to a topic.
    #[command(name = "add-subtopic")]
    AddSubTopic {
        topic: String,
        title: String,
    },

    /// Add a question to a sub-topic.
    AddQuestion {
        topic: String,
        sub_topic: String,
        text: String,
        #[command(flatten)]
        details: QuestionDetails,
    },

    /// Rename a topic.
    EditTopic {
        topic: String,
        title: String,
    },

    /// Rename a sub-topic.
    #[command(name = "edit-subtopic")]
    EditSubTopic {
        topic: String,
        sub_topic: String,
        title: String,
    },

    /// Change a question's text or details.
    EditQuestion {
        topic: String,
        sub_topic: String,
        question: String,
        /// New question text.
        #[arg(long = "text", value_name = "TEXT")]
        text: Option<String>,
        #[command(flatten)]
        details: QuestionDetails,
        /// Remove the link.
        #[arg(long = "clear-link", conflicts_with = "link")]
        clear_link: bool,
        /// Remove the notes.
        #[arg(long = "clear-notes", conflicts_with = "notes")]
        clear_notes: bool,
    },

    /// Delete a topic with all of its sub-topics and questions.
    DeleteTopic {
        topic: String,
    },

    /// Delete a sub-topic with all of its questions.
    #[command(name = "delete-subtopic")]
    DeleteSubTopic {
        topic: String,
        sub_topic: String,
    },

    /// Delete a question.
    DeleteQuestion {
        topic: String,
        sub_topic: String,
        question: String,
    },

    /// Mark a question done, or open again.
    Toggle {
        topic: String,
        sub_topic: String,
        question: String,
    },

    /// Reorder all topics. Every topic id must be listed exactly once.
    ReorderTopics {
        #[arg(required = true, num_args = 1..)]
        order: Vec<String>,
    },

    /// Reorder the sub-topics of a topic.
    #[command(name = "reorder-subtopics")]
    ReorderSubTopics {
        topic: String,
        #[arg(required = true, num_args = 1..)]
        order: Vec<String>,
    },

    /// Reorder the questions of a sub-topic.
    ReorderQuestions {
        topic: String,
        sub_topic: String,
        #[arg(required = true, num_args = 1..)]
        order: Vec<String>,
    },

    /// Export the sheet as JSON.
    Export {
        /// Write to a file instead of stdout.
        #[arg(long = "output", short = 'o', value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Replace the sheet with a previously exported one.
    Import {
        file: PathBuf,
    },

    /// Replace the sheet with a public sheet fetched by slug.
    ImportSheet {
        /// Sheet slug (default from settings).
        slug: Option<String>,
    },

    /// Restore the built-in starter sheet.
    Reset,
}

/// Optional question fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct QuestionDetails {
    /// Difficulty label (Easy, Medium, Hard or any other text).
    #[arg(long = "difficulty", short = 'd', value_name = "LEVEL")]
    pub difficulty: Option<String>,

    /// Link to the problem statement.
    #[arg(long = "link", value_name = "URL")]
    pub link: Option<String>,

    /// Free-form notes.
    #[arg(long = "notes", value_name = "TEXT")]
    pub notes: Option<String>,
}

/// CLI log level choices.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
