//! JSON-lines presenter: one serialized event per line.

use super::Presenter;
use crate::chairs::TimedEvent;
use parking_lot::Mutex;
use std::io::{self, Write};
use tracing::warn;

/// Writes each event as a single JSON object followed by a newline.
pub struct JsonLinesPresenter {
    out: Mutex<Box<dyn Write + Send>>,
}

impl JsonLinesPresenter {
    /// Writes to standard output.
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }

    /// Writes to any writer.
    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(writer)),
        }
    }
}

impl std::fmt::Debug for JsonLinesPresenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLinesPresenter").finish_non_exhaustive()
    }
}

impl Presenter for JsonLinesPresenter {
    fn present(&self, event: &TimedEvent) {
        let line = match serde_json::to_string(event) {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "Failed to serialize event");
                return;
            }
        };

        let mut out = self.out.lock();
        if let Err(e) = writeln!(out, "{line}").and_then(|_| out.flush()) {
            warn!(error = %e, "Failed to write event");
        }
    }
}
