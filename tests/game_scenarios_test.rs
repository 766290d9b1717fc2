//! End-to-end games with recorded event streams.

use musical_chairs::{
    FixedDuration, GameErrorKind, GameEvent, MusicalChairs, PlayerId, PlayerOutcome, Presenter,
    RecordingPresenter, TimedEvent, invariants,
};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::{Duration, Instant};

fn p(id: u32) -> PlayerId {
    PlayerId::new(id)
}

fn recorded_game(players: u32) -> (musical_chairs::GameReport, Arc<RecordingPresenter>) {
    let recorder = Arc::new(RecordingPresenter::new());
    let report = MusicalChairs::new(players)
        .with_shared_presenter(recorder.clone())
        .with_round_duration(FixedDuration::zero())
        .play()
        .expect("game should finish");
    (report, recorder)
}

#[test]
fn test_four_players_play_three_rounds() {
    let (report, recorder) = recorded_game(4);
    let log = recorder.log();

    assert_eq!(report.summary.rounds(), &3);
    assert!(invariants::audit(&log).is_ok(), "{:?}", invariants::audit(&log));

    let rounds = log.rounds();
    assert_eq!(rounds.len(), 3);
    assert_eq!(rounds[0].active_players, 4);
    assert_eq!(rounds[0].seats, 3);
    assert_eq!(rounds[0].seated.len(), 3);
    assert_eq!(rounds[0].eliminated.len(), 1);
    assert_eq!(rounds[2].active_players, 2);
    assert_eq!(rounds[2].seats, 1);

    assert_eq!(
        log.events().first(),
        Some(&GameEvent::GameStarted {
            total_players: 4,
            initial_seats: 3
        })
    );
    assert_eq!(
        log.events().last(),
        Some(&GameEvent::GameOver {
            winner: *report.summary.winner()
        })
    );
}

#[test]
fn test_seat_indices_count_up_within_a_round() {
    let (_, recorder) = recorded_game(5);
    for round in recorder.log().rounds() {
        let indices: Vec<u32> = round.seated.iter().map(|(index, _)| *index).collect();
        let expected: Vec<u32> = (1..=round.seats).collect();
        assert_eq!(indices, expected, "round {}", round.round);
    }
}

#[test]
fn test_two_players_one_round_seated_player_wins() {
    let (report, recorder) = recorded_game(2);
    let rounds = recorder.log().rounds();

    assert_eq!(report.summary.rounds(), &1);
    assert_eq!(rounds.len(), 1);
    assert_eq!(rounds[0].seated.len(), 1);
    let (_, seated) = rounds[0].seated[0];
    assert_eq!(report.summary.winner(), &seated);
    assert_eq!(report.summary.eliminations(), &rounds[0].eliminated);
}

#[test]
fn test_ten_players_finish_quickly() {
    let started = Instant::now();
    let (report, recorder) = recorded_game(10);

    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(report.summary.rounds(), &9);
    assert_eq!(report.summary.eliminations().len(), 9);
    assert!(invariants::audit(&recorder.log()).is_ok());
}

#[test]
fn test_every_thread_reports_its_fate() {
    let (report, _) = recorded_game(6);

    let survivors: Vec<PlayerId> = report
        .outcomes
        .iter()
        .filter(|(_, outcome)| matches!(outcome, PlayerOutcome::Survived { .. }))
        .map(|(id, _)| *id)
        .collect();
    assert_eq!(survivors, vec![*report.summary.winner()]);

    for (id, outcome) in &report.outcomes {
        if let PlayerOutcome::Eliminated { round } = outcome {
            let position = report
                .summary
                .eliminations()
                .iter()
                .position(|eliminated| eliminated == id)
                .expect("eliminated player should be in the summary");
            assert_eq!(position as u32 + 1, *round);
        }
    }
}

#[test]
fn test_slowest_player_is_always_eliminated() {
    let recorder = Arc::new(RecordingPresenter::new());
    let summary = MusicalChairs::new(4)
        .with_shared_presenter(recorder.clone())
        .with_round_duration(FixedDuration::zero())
        .with_reaction_time(|player: PlayerId, _round: u32| {
            Duration::from_millis(40 * u64::from(player.get() - 1))
        })
        .run()
        .unwrap();

    assert_eq!(summary.eliminations(), &vec![p(4), p(3), p(2)]);
    assert_eq!(summary.winner(), &p(1));
    assert!(invariants::audit(&recorder.log()).is_ok());
}

#[test]
fn test_single_player_wins_without_a_round() {
    let (report, recorder) = recorded_game(1);

    assert_eq!(report.summary.rounds(), &0);
    assert_eq!(report.summary.winner(), &p(1));
    assert_eq!(
        recorder.kinds(),
        vec![
            GameEvent::GameStarted {
                total_players: 1,
                initial_seats: 0
            },
            GameEvent::GameOver { winner: p(1) },
        ]
    );
    assert_eq!(report.outcomes, vec![(p(1), PlayerOutcome::Survived { rounds: 0 })]);
}

#[test]
fn test_zero_players_is_rejected_without_events() {
    let recorder = Arc::new(RecordingPresenter::new());
    let err = MusicalChairs::new(0)
        .with_shared_presenter(recorder.clone())
        .run()
        .unwrap_err();

    assert!(matches!(
        err.kind(),
        GameErrorKind::DegenerateConfiguration(_)
    ));
    assert!(recorder.is_empty());
}

#[test]
fn test_round_durations_are_asked_per_round() {
    let asked = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let seen = Arc::clone(&asked);
    MusicalChairs::new(4)
        .with_round_duration(move |round: u32| {
            seen.lock().push(round);
            Duration::from_millis(1)
        })
        .run()
        .unwrap();

    assert_eq!(*asked.lock(), vec![1, 2, 3]);
}

/// Panics whenever a player sits down.
struct PanicOnSeat;

impl Presenter for PanicOnSeat {
    fn present(&self, event: &TimedEvent) {
        if matches!(event.event, GameEvent::PlayerSeated { .. }) {
            panic!("presenter failed on seat");
        }
    }
}

#[test]
fn test_player_panic_ends_the_game_with_an_error() {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = MusicalChairs::new(3)
            .with_presenter(PanicOnSeat)
            .with_round_duration(FixedDuration::zero())
            .run();
        let _ = tx.send(result);
    });

    let result = rx
        .recv_timeout(Duration::from_secs(10))
        .expect("game should stop after a player thread panics");
    let err = result.unwrap_err();
    assert!(
        matches!(
            err.kind(),
            GameErrorKind::ThreadPanicked(_) | GameErrorKind::Aborted(_)
        ),
        "unexpected error: {err}"
    );
}
