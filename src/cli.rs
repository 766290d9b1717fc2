//! Command-line interface for musical_chairs.

use clap::Parser;
use musical_chairs::{ConfigOverrides, OutputFormat};

/// Musical Chairs - a concurrent simulation with one thread per player
#[derive(Parser, Debug)]
#[command(name = "musical_chairs")]
#[command(about = "Concurrent musical chairs: one thread per player, one chair short", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the game configuration file
    #[arg(short, long, default_value = "musical_chairs.toml")]
    pub config: std::path::PathBuf,

    /// Number of players (overrides the config file)
    #[arg(short, long)]
    pub players: Option<u32>,

    /// Shortest time the music plays, in milliseconds
    #[arg(long)]
    pub min_delay_ms: Option<u64>,

    /// Longest time the music plays, in milliseconds
    #[arg(long)]
    pub max_delay_ms: Option<u64>,

    /// Seed for the round duration generator
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Print text output without pausing between events
    #[arg(long)]
    pub no_pace: bool,
}

impl Cli {
    /// Settings given on the command line.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            players: self.players,
            min_delay_ms: self.min_delay_ms,
            max_delay_ms: self.max_delay_ms,
            seed: self.seed,
            format: self.format,
            pace: self.no_pace.then_some(false),
        }
    }
}
