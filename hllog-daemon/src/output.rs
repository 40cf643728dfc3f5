//! JSON-lines output sink.
//!
//! Every decoded entry becomes one JSON object on its own line, tagged with
//! `"kind": "event"` or `"kind": "unknown"`. The sink trait cannot return
//! errors, so write failures are logged and counted instead.

use std::io::Write;

use serde::Serialize;

use hllog_core::pipeline::EntrySink;
use hllog_core::types::{EventEntry, UnknownEntry};

/// Borrowed view serialized with the same tag layout as `DecodedEntry`.
#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum Line<'a> {
    Event(&'a EventEntry),
    Unknown(&'a UnknownEntry),
}

/// Sink that writes entries as JSON lines.
pub struct JsonLinesSink<W> {
    writer: W,
    written: u64,
    failed: u64,
}

impl<W: Write> JsonLinesSink<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            written: 0,
            failed: 0,
        }
    }

    /// Number of entries written successfully.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Number of entries that could not be written.
    pub fn failed(&self) -> u64 {
        self.failed
    }

    /// Consume the sink and return the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit(&mut self, line: Line<'_>) {
        let result = serde_json::to_writer(&mut self.writer, &line)
            .map_err(std::io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"))
            .and_then(|()| self.writer.flush());

        match result {
            Ok(()) => self.written += 1,
            Err(e) => {
                self.failed += 1;
                tracing::warn!(error = %e, "failed to write decoded entry");
            }
        }
    }
}

impl<W: Write> EntrySink for JsonLinesSink<W> {
    fn on_event(&mut self, entry: &EventEntry) {
        self.emit(Line::Event(entry));
    }

    fn on_unknown(&mut self, entry: &UnknownEntry) {
        self.emit(Line::Unknown(entry));
    }
}
