//! Command-line front end for the question sheet tracker.
//!
//! The binary is a thin wrapper: argument definitions live in [`cli`],
//! command execution in [`commands`], table rendering in [`summary`] and the
//! interactive loop in [`shell`].

pub mod cli;
pub mod commands;
pub mod logging;
pub mod settings;
pub mod shell;
pub mod summary;
