//! In-memory presenter, used to audit games after the fact.

use super::Presenter;
use crate::chairs::{EventLog, GameEvent, TimedEvent};
use parking_lot::Mutex;

/// Keeps every event it is given, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    events: Mutex<Vec<TimedEvent>>,
}

impl RecordingPresenter {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded events.
    pub fn events(&self) -> Vec<TimedEvent> {
        self.events.lock().clone()
    }

    /// Returns the recorded events without timestamps.
    pub fn kinds(&self) -> Vec<GameEvent> {
        self.events.lock().iter().map(|e| e.event.clone()).collect()
    }

    /// Returns the recording as an [`EventLog`].
    pub fn log(&self) -> EventLog {
        EventLog::from_timed(&self.events.lock())
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl Presenter for RecordingPresenter {
    fn present(&self, event: &TimedEvent) {
        self.events.lock().push(event.clone());
    }
}
