//! Musical Chairs - command-line runner
//!
//! Plays one game with the configured number of player threads and
//! prints the events as narrated text, JSON lines, or log records.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use musical_chairs::{
    GameConfig, JsonLinesPresenter, MusicalChairs, OutputFormat, Presenter, TerminalPresenter,
    TracingPresenter,
};
use std::sync::Arc;
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = GameConfig::load_or_default(&cli.config)?.with_overrides(cli.overrides())?;
    initialize_tracing(*config.format());

    run_game(&config)
}

/// Plays one game and reports the winner.
#[instrument(skip(config), fields(players = config.players(), format = %config.format()))]
fn run_game(config: &GameConfig) -> Result<()> {
    let presenter: Arc<dyn Presenter> = match config.format() {
        OutputFormat::Text => Arc::new(TerminalPresenter::stdout(*config.pace())),
        OutputFormat::Json => Arc::new(JsonLinesPresenter::stdout()),
        OutputFormat::Log => Arc::new(TracingPresenter),
    };

    info!("Starting game");
    let summary = MusicalChairs::from_config(config)
        .with_shared_presenter(presenter)
        .run()?;
    info!(
        winner = %summary.winner(),
        rounds = summary.rounds(),
        "Game complete"
    );
    Ok(())
}

/// Logs go to stderr so they never mix with the game output.
#[instrument]
fn initialize_tracing(format: OutputFormat) {
    let default_filter = match format {
        OutputFormat::Log => "info,musical_chairs=debug",
        OutputFormat::Text | OutputFormat::Json => "warn",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
