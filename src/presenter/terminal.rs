//! Narrated terminal output with colors.

use super::Presenter;
use crate::chairs::{GameEvent, TimedEvent};
use crossterm::style::Stylize;
use parking_lot::Mutex;
use std::io::{self, Write};
use std::time::Duration;
use tracing::warn;

const RULE: &str = "-----------------------------------------------";

/// Renders the game as a running commentary.
///
/// With pacing enabled, the presenter pauses after each event so a human
/// can follow along. Pauses happen on the emitting thread.
pub struct TerminalPresenter {
    out: Mutex<Box<dyn Write + Send>>,
    pace: bool,
}

impl TerminalPresenter {
    /// Writes to standard output.
    pub fn stdout(pace: bool) -> Self {
        Self::with_writer(io::stdout(), pace)
    }

    /// Writes to any writer.
    pub fn with_writer(writer: impl Write + Send + 'static, pace: bool) -> Self {
        Self {
            out: Mutex::new(Box::new(writer)),
            pace,
        }
    }

    /// Text for an event.
    pub fn render(event: &GameEvent) -> String {
        match event {
            GameEvent::GameStarted {
                total_players,
                initial_seats,
            } => format!(
                "{RULE}\n{}\n{RULE}\n\nStarting a game with {total_players} players and {}.\n",
                "Welcome to Concurrent Musical Chairs!".bold(),
                chairs(*initial_seats),
            ),
            GameEvent::RoundStarted {
                round,
                active_players,
                seats,
            } => {
                let header = if *round == 1 {
                    String::new()
                } else {
                    format!(
                        "{RULE}\n\nNext round with {active_players} players and {}.\n",
                        chairs(*seats)
                    )
                };
                format!("{header}{}", "The music is playing... 🎵".cyan())
            }
            GameEvent::MusicStopped => format!(
                "\n\n{}\n\n{RULE}",
                "> The music stopped! The players are trying to sit down...".yellow()
            ),
            GameEvent::PlayerSeated { seat_index, player } => {
                format!("[Chair {seat_index}]: taken by {}", player.to_string().green())
            }
            GameEvent::PlayerEliminated { player } => format!(
                "\n{}",
                format!("Player {player} could not find a chair and is eliminated!").red()
            ),
            GameEvent::GameOver { winner } => format!(
                "{RULE}\n\n{}\n\n{RULE}\n\nThanks for playing Concurrent Musical Chairs!",
                format!("🏆 Winner: Player {winner}! Congratulations! 🏆").bold().green()
            ),
        }
    }

    /// How long to pause after an event when pacing.
    pub fn pause(event: &GameEvent) -> Duration {
        match event {
            GameEvent::GameStarted { .. } => Duration::from_secs(1),
            GameEvent::RoundStarted { .. } => Duration::from_secs(1),
            GameEvent::MusicStopped => Duration::from_secs(2),
            GameEvent::PlayerSeated { .. } => Duration::from_millis(500),
            GameEvent::PlayerEliminated { .. } => Duration::from_secs(2),
            GameEvent::GameOver { .. } => Duration::from_secs(1),
        }
    }
}

fn chairs(count: u32) -> String {
    if count == 1 {
        "1 chair".to_string()
    } else {
        format!("{count} chairs")
    }
}

impl std::fmt::Debug for TerminalPresenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalPresenter")
            .field("pace", &self.pace)
            .finish_non_exhaustive()
    }
}

impl Presenter for TerminalPresenter {
    fn present(&self, event: &TimedEvent) {
        let text = Self::render(&event.event);
        {
            let mut out = self.out.lock();
            if let Err(e) = writeln!(out, "{text}").and_then(|_| out.flush()) {
                warn!(error = %e, "Failed to write to terminal");
            }
        }
        if self.pace {
            std::thread::sleep(Self::pause(&event.event));
        }
    }
}
