//! Events emitted by the table to its presenter.
//!
//! Events are discrete facts, timestamped when they happen. Nothing is
//! read back from the presenter.

use super::PlayerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A fact about the game, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// The game begins.
    GameStarted {
        /// Players at the start.
        total_players: u32,
        /// Seats in the first round.
        initial_seats: u32,
    },
    /// A round opens and the music starts playing.
    RoundStarted {
        /// Round number, starting at 1.
        round: u32,
        /// Players still in the game.
        active_players: u32,
        /// Seats this round.
        seats: u32,
    },
    /// The music stopped; players scramble for seats.
    MusicStopped,
    /// A player took a seat.
    PlayerSeated {
        /// 1-based seat index within the round.
        seat_index: u32,
        /// The seated player.
        player: PlayerId,
    },
    /// A player found no seat and is out.
    PlayerEliminated {
        /// The eliminated player.
        player: PlayerId,
    },
    /// One player remains.
    GameOver {
        /// The last player standing.
        winner: PlayerId,
    },
}

/// An event with the wall-clock time it was emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedEvent {
    /// When the event was emitted.
    pub at: DateTime<Utc>,
    /// The event itself.
    #[serde(flatten)]
    pub event: GameEvent,
}

impl TimedEvent {
    /// Stamps an event with the current time.
    pub fn now(event: GameEvent) -> Self {
        Self {
            at: Utc::now(),
            event,
        }
    }
}

/// Everything that happened during one round, rebuilt from an event log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundRecord {
    /// Round number.
    pub round: u32,
    /// Players at the start of the round.
    pub active_players: u32,
    /// Seats offered.
    pub seats: u32,
    /// Whether the music stopped this round.
    pub music_stopped: bool,
    /// `(seat_index, player)` in emission order.
    pub seated: Vec<(u32, PlayerId)>,
    /// Players eliminated this round.
    pub eliminated: Vec<PlayerId>,
}

/// An ordered event stream, used to audit a finished game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    /// Wraps a list of events.
    pub fn new(events: Vec<GameEvent>) -> Self {
        Self { events }
    }

    /// Builds a log from timestamped events, dropping the timestamps.
    pub fn from_timed(events: &[TimedEvent]) -> Self {
        Self::new(events.iter().map(|e| e.event.clone()).collect())
    }

    /// Returns the events.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Players announced by `GameStarted`.
    pub fn total_players(&self) -> Option<u32> {
        self.events.iter().find_map(|e| match e {
            GameEvent::GameStarted { total_players, .. } => Some(*total_players),
            _ => None,
        })
    }

    /// Winners announced by `GameOver` (a healthy game has exactly one).
    pub fn winners(&self) -> Vec<PlayerId> {
        self.events
            .iter()
            .filter_map(|e| match e {
                GameEvent::GameOver { winner } => Some(*winner),
                _ => None,
            })
            .collect()
    }

    /// Every eliminated player, in order.
    pub fn eliminations(&self) -> Vec<PlayerId> {
        self.events
            .iter()
            .filter_map(|e| match e {
                GameEvent::PlayerEliminated { player } => Some(*player),
                _ => None,
            })
            .collect()
    }

    /// Groups the stream into rounds.
    ///
    /// Seat and elimination events seen before the first `RoundStarted`
    /// land in a round numbered 0 so audits can flag them.
    pub fn rounds(&self) -> Vec<RoundRecord> {
        let mut rounds: Vec<RoundRecord> = Vec::new();
        for event in &self.events {
            match event {
                GameEvent::RoundStarted {
                    round,
                    active_players,
                    seats,
                } => rounds.push(RoundRecord {
                    round: *round,
                    active_players: *active_players,
                    seats: *seats,
                    ..RoundRecord::default()
                }),
                GameEvent::MusicStopped => current(&mut rounds).music_stopped = true,
                GameEvent::PlayerSeated { seat_index, player } => {
                    current(&mut rounds).seated.push((*seat_index, *player))
                }
                GameEvent::PlayerEliminated { player } => {
                    current(&mut rounds).eliminated.push(*player)
                }
                GameEvent::GameStarted { .. } | GameEvent::GameOver { .. } => {}
            }
        }
        rounds
    }
}

fn current(rounds: &mut Vec<RoundRecord>) -> &mut RoundRecord {
    if rounds.is_empty() {
        rounds.push(RoundRecord::default());
    }
    let last = rounds.len() - 1;
    &mut rounds[last]
}
