//! Event Logger
//!
//! Writes every drained battle event as one JSONL line and keeps a tally per
//! event type for the end-of-run summary.

use bevy_ecs::prelude::*;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tactics_events::{Event, EventType};

enum Sink {
    File { path: PathBuf, writer: BufWriter<File> },
    Discard,
}

#[derive(Resource)]
pub struct EventLogger {
    sink: Sink,
    tally: BTreeMap<String, u64>,
    event_count: u64,
}

impl EventLogger {
    /// Truncates `path` and logs into it.
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let writer = BufWriter::new(File::create(&path)?);
        Ok(Self {
            sink: Sink::File { path, writer },
            tally: BTreeMap::new(),
            event_count: 0,
        })
    }

    /// Counts events without writing them anywhere.
    pub fn null() -> Self {
        Self {
            sink: Sink::Discard,
            tally: BTreeMap::new(),
            event_count: 0,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.sink {
            Sink::File { path, .. } => Some(path),
            Sink::Discard => None,
        }
    }

    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    pub fn count_of(&self, event_type: EventType) -> u64 {
        self.tally.get(&type_key(event_type)).copied().unwrap_or(0)
    }

    /// Per-type counts in name order, skipping types never seen.
    pub fn tally(&self) -> impl Iterator<Item = (&str, u64)> {
        self.tally.iter().map(|(name, &count)| (name.as_str(), count))
    }

    pub fn log(&mut self, event: &Event) -> std::io::Result<()> {
        if let Sink::File { writer, .. } = &mut self.sink {
            writeln!(writer, "{}", event.to_jsonl()?)?;
        }
        self.event_count += 1;
        *self.tally.entry(type_key(event.event_type())).or_default() += 1;
        Ok(())
    }

    /// Logs a frame's worth of events, stopping at the first write failure.
    pub fn log_batch(&mut self, events: &[Event]) -> std::io::Result<()> {
        events.iter().try_for_each(|event| self.log(event))
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.sink {
            Sink::File { writer, .. } => writer.flush(),
            Sink::Discard => Ok(()),
        }
    }
}

fn type_key(event_type: EventType) -> String {
    // Matches the snake_case tag written into each JSONL line
    serde_json::to_value(event_type)
        .ok()
        .and_then(|v| v.as_str().map(str::to_owned))
        .unwrap_or_else(|| format!("{:?}", event_type))
}

impl Drop for EventLogger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!("Event log flush on drop failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_events::{GameEvent, GridCell, Side, TurnStamp, UnitId};

    fn spawned(sequence: u64) -> Event {
        Event::new(
            sequence,
            TurnStamp::start(),
            GameEvent::UnitSpawned {
                unit: UnitId(sequence as u32),
                side: Side::Player,
                cell: GridCell::new(1, 2, 0),
            },
        )
    }

    #[test]
    fn test_writes_one_line_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");

        let mut logger = EventLogger::new(&path).unwrap();
        assert_eq!(logger.path(), Some(path.as_path()));
        logger.log_batch(&[spawned(1), spawned(2)]).unwrap();
        logger.flush().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let parsed = Event::from_jsonl(lines[1]).unwrap();
        assert_eq!(parsed.event_id, "evt_00000002");
        assert_eq!(parsed.payload.primary_unit(), Some(UnitId(2)));
    }

    #[test]
    fn test_tally_by_type() {
        let mut logger = EventLogger::null();
        logger.log(&spawned(1)).unwrap();
        logger.log(&spawned(2)).unwrap();
        logger
            .log(&Event::new(3, TurnStamp::start(), GameEvent::BusyChanged { busy: true }))
            .unwrap();

        assert_eq!(logger.event_count(), 3);
        assert_eq!(logger.count_of(EventType::UnitSpawned), 2);
        assert_eq!(logger.count_of(EventType::UnitDied), 0);
        let tally: Vec<_> = logger.tally().collect();
        assert_eq!(tally, vec![("busy_changed", 1), ("unit_spawned", 2)]);
    }

    #[test]
    fn test_null_logger_has_no_path() {
        let mut logger = EventLogger::null();
        assert!(logger.path().is_none());
        logger.flush().unwrap();
    }
}
