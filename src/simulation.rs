//! Game orchestration: spawns the player threads and the coordinator.

use crate::chairs::{Coordinator, GameSummary, Player, PlayerId, PlayerOutcome, Table};
use crate::config::GameConfig;
use crate::error::{GameError, GameErrorKind, panic_message};
use crate::presenter::Presenter;
use crate::timing::{Immediate, RandomDuration, ReactionTime, RoundDuration};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, instrument};

/// A finished game: the coordinator's summary plus each thread's fate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameReport {
    /// What the coordinator saw.
    pub summary: GameSummary,
    /// How each player thread ended, in id order.
    pub outcomes: Vec<(PlayerId, PlayerOutcome)>,
}

/// One game of musical chairs, ready to run.
pub struct MusicalChairs {
    players: u32,
    presenter: Arc<dyn Presenter>,
    durations: Box<dyn RoundDuration>,
    reaction: Arc<dyn ReactionTime>,
}

impl MusicalChairs {
    /// A silent game with random 2 to 5 second rounds and instant reactions.
    #[instrument]
    pub fn new(players: u32) -> Self {
        Self {
            players,
            presenter: Arc::new(()),
            durations: Box::new(RandomDuration::default()),
            reaction: Arc::new(Immediate),
        }
    }

    /// A game set up from configuration. The presenter is left silent.
    #[instrument(skip(config))]
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(*config.players()).with_round_duration(config.round_duration())
    }

    /// Sends events to `presenter`.
    pub fn with_presenter(self, presenter: impl Presenter + 'static) -> Self {
        self.with_shared_presenter(Arc::new(presenter))
    }

    /// Sends events to a presenter the caller keeps a handle to.
    pub fn with_shared_presenter(mut self, presenter: Arc<dyn Presenter>) -> Self {
        self.presenter = presenter;
        self
    }

    /// Uses `durations` for the time the music plays.
    pub fn with_round_duration(mut self, durations: impl RoundDuration + 'static) -> Self {
        self.durations = Box::new(durations);
        self
    }

    /// Uses `reaction` for the players' hesitation after the music stops.
    pub fn with_reaction_time(mut self, reaction: impl ReactionTime + 'static) -> Self {
        self.reaction = Arc::new(reaction);
        self
    }

    /// Plays the game and returns the coordinator's summary.
    pub fn run(self) -> Result<GameSummary, GameError> {
        self.play().map(|report| report.summary)
    }

    /// Plays the game and reports how every thread ended.
    #[instrument(skip(self), fields(players = self.players))]
    pub fn play(self) -> Result<GameReport, GameError> {
        if self.players == 0 {
            return Err(GameError::new(GameErrorKind::DegenerateConfiguration(
                "a game needs at least one player".to_string(),
            )));
        }

        let table = Arc::new(Table::new(self.players, self.presenter));
        let mut handles: Vec<(PlayerId, JoinHandle<Result<PlayerOutcome, GameError>>)> =
            Vec::with_capacity(self.players as usize);

        for id in PlayerId::all(self.players) {
            let player = Player::new(id, Arc::clone(&table), Arc::clone(&self.reaction));
            let spawned = thread::Builder::new()
                .name(format!("player-{}", id.get()))
                .spawn(move || player.run());
            match spawned {
                Ok(handle) => handles.push((id, handle)),
                Err(e) => {
                    let err = GameError::new(GameErrorKind::Spawn(e.to_string()));
                    table.abort(err.clone());
                    join_players(handles)?;
                    return Err(err);
                }
            }
        }
        debug!(spawned = handles.len(), "Players seated");

        let coordinator = Coordinator::new(Arc::clone(&table), self.durations);
        let summary = thread::Builder::new()
            .name("coordinator".to_string())
            .spawn(move || coordinator.run())
            .map_err(|e| {
                let err = GameError::new(GameErrorKind::Spawn(e.to_string()));
                table.abort(err.clone());
                err
            })
            .and_then(|handle| {
                handle
                    .join()
                    .map_err(|panic| GameError::new(GameErrorKind::ThreadPanicked(panic_message(&*panic))))?
            });

        if summary.is_err() {
            table.abort(GameError::new(GameErrorKind::Aborted(
                "coordinator failed".to_string(),
            )));
        }
        let outcomes = join_players(handles);
        let summary = summary?;
        let outcomes = outcomes?;

        check_outcomes(&summary, &outcomes)?;
        info!(winner = %summary.winner(), rounds = summary.rounds(), "Game finished");
        Ok(GameReport { summary, outcomes })
    }
}

type PlayerHandles = Vec<(PlayerId, JoinHandle<Result<PlayerOutcome, GameError>>)>;

fn join_players(handles: PlayerHandles) -> Result<Vec<(PlayerId, PlayerOutcome)>, GameError> {
    let mut outcomes = Vec::with_capacity(handles.len());
    let mut first_error = None;
    for (id, handle) in handles {
        let result = handle
            .join()
            .map_err(|panic| GameError::new(GameErrorKind::ThreadPanicked(panic_message(&*panic))))
            .and_then(|outcome| outcome);
        match result {
            Ok(outcome) => outcomes.push((id, outcome)),
            Err(err) => {
                first_error.get_or_insert(err);
            }
        }
    }
    match first_error {
        Some(err) => Err(err),
        None => Ok(outcomes),
    }
}

fn check_outcomes(
    summary: &GameSummary,
    outcomes: &[(PlayerId, PlayerOutcome)],
) -> Result<(), GameError> {
    let survivors: Vec<PlayerId> = outcomes
        .iter()
        .filter(|(_, outcome)| matches!(outcome, PlayerOutcome::Survived { .. }))
        .map(|(id, _)| *id)
        .collect();

    if survivors.as_slice() != [*summary.winner()] {
        return Err(GameError::new(GameErrorKind::InvariantViolation(format!(
            "winner {} but survivors {:?}",
            summary.winner(),
            survivors
        ))));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::FixedDuration;

    #[test]
    fn test_zero_players_is_degenerate() {
        let err = MusicalChairs::new(0).run().unwrap_err();
        assert!(matches!(
            err.kind(),
            GameErrorKind::DegenerateConfiguration(_)
        ));
    }

    #[test]
    fn test_report_has_one_survivor() {
        let report = MusicalChairs::new(3)
            .with_round_duration(FixedDuration::zero())
            .play()
            .unwrap();

        assert_eq!(report.outcomes.len(), 3);
        let eliminated = report
            .outcomes
            .iter()
            .filter(|(_, o)| matches!(o, PlayerOutcome::Eliminated { .. }))
            .count();
        assert_eq!(eliminated, 2);
    }
}
