use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use loader::{fetcher_for, SourceFetcher};
use story_core::{Dispatcher, Sequencer};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod manifest;
mod terminal;

use commands::{NavCommand, HELP};
use config::{load_settings, PlayerSettings};
use manifest::load_storyboard;
use terminal::TerminalPresenter;

#[derive(Parser, Debug)]
#[command(about = "Step through a data story in the terminal")]
struct Args {
    /// Config file (defaults to ./player.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    storyboard: Option<PathBuf>,
    /// Directory or http(s) base URL that step sources are relative to.
    #[arg(long)]
    asset_root: Option<String>,
    #[arg(long)]
    log_filter: Option<String>,
}

impl Args {
    fn apply(self, settings: &mut PlayerSettings) {
        if let Some(v) = self.storyboard {
            settings.storyboard = v;
        }
        if let Some(v) = self.asset_root {
            settings.asset_root = v;
        }
        if let Some(v) = self.log_filter {
            settings.log_filter = v;
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref())?;
    args.apply(&mut settings);

    let filter = EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let table = load_storyboard(&settings.storyboard).with_context(|| {
        format!(
            "failed to load storyboard '{}'",
            settings.storyboard.display()
        )
    })?;
    let fetcher: Arc<dyn SourceFetcher> = Arc::from(
        fetcher_for(&settings.asset_root)
            .with_context(|| format!("unusable asset root '{}'", settings.asset_root))?,
    );
    let sequencer = Sequencer::new(
        table,
        fetcher,
        Arc::new(TerminalPresenter::stdout()),
        Dispatcher::new(),
    );
    sequencer.attach()?;

    info!(asset_root = %settings.asset_root, "presentation ready");
    eprintln!("{HELP}");
    sequencer.start();
    sequencer.advance();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        match NavCommand::parse(&line) {
            Some(NavCommand::Next) => {
                sequencer.advance();
            }
            Some(NavCommand::Previous) => {
                sequencer.retreat();
            }
            Some(NavCommand::GoTo(step)) => {
                if let Err(err) = sequencer.go_to(step) {
                    warn!(error = %err, "navigation rejected");
                }
            }
            Some(NavCommand::Status) => {
                let snapshot = sequencer.snapshot();
                eprintln!(
                    "requested={:?} rendered={:?} states={:?}",
                    snapshot.requested, snapshot.rendered, snapshot.states
                );
            }
            Some(NavCommand::Quit) => break,
            None => eprintln!("{HELP}"),
        }
    }

    Ok(())
}
