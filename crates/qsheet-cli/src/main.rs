//! Question sheet tracker CLI.

use std::io;

use anyhow::{Context, Result};
use clap::Parser;

use qsheet_cli::cli::{Cli, Command};
use qsheet_cli::commands::HttpSession;
use qsheet_cli::logging::{LogConfig, init_logging};
use qsheet_cli::settings::Settings;
use qsheet_cli::shell;
use qsheet_cli::summary::print_output;
use qsheet_core::DocumentStore;
use qsheet_persistence::FileStorage;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = LogConfig::from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(cli) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<()> {
    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let data_dir = cli.data_dir.unwrap_or_else(|| settings.data_dir());
    let storage = FileStorage::new(&data_dir, &settings.storage.key)
        .context("invalid storage settings")?;
    let store = DocumentStore::open(storage, settings.store_config());
    let mut session = HttpSession::with_http_source(store, settings)?.with_interrupt_watch();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(async {
        match cli.command {
            Command::Sheet(command) => {
                let output = session.execute(command).await?;
                print_output(&output);
                Ok(())
            }
            Command::Shell => {
                let stdin = io::stdin();
                let mut stdout = io::stdout();
                shell::run(&mut session, stdin.lock(), &mut stdout).await
            }
        }
    })
}
