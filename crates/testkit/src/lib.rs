#![warn(missing_docs)]
//! Deterministic testing surfaces: recording doubles, scripted pointer paths
//! and the JSONL event stream.

mod path;
mod recording;

use anyhow::{Context, Result};
use mrtouch_core::FrameTick;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::debug;

pub use path::{GraspWindow, Keyframe, PointerPath};
pub use recording::{
    ButtonEvent, EventCounts, RecordingHandler, RecordingTarget, Surface, TargetEvent,
};

/// Primary event record captured by headless runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Frame when the event occurred.
    pub tick: FrameTick,
    /// Event kind label, e.g. `pressed` or `hover_start`.
    pub kind: String,
    /// What the event happened to (button or target name).
    pub subject: String,
    /// Free-form detail (pointer id, touch point).
    pub payload: String,
}

impl EventRecord {
    /// Build a record.
    pub fn new(
        tick: FrameTick,
        kind: impl Into<String>,
        subject: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            tick,
            kind: kind.into(),
            subject: subject.into(),
            payload: payload.into(),
        }
    }
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    file: File,
}

impl JsonlSink {
    /// Create a new sink at `path`, creating parent dirs if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)
            .with_context(|| format!("Failed to create event log {}", path.display()))?;
        debug!(path = %path.display(), "Opened event log");
        Ok(Self { file })
    }

    /// Append an event to the log.
    pub fn write(&mut self, event: &EventRecord) -> Result<()> {
        let line = serde_json::to_string(event)?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        Ok(())
    }
}

/// Read back a log written by [`JsonlSink`].
pub fn read_jsonl<P: AsRef<Path>>(path: P) -> Result<Vec<EventRecord>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read event log {}", path.display()))?;

    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(index, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("Bad event on line {} of {}", index + 1, path.display()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jsonl_sink_writes_one_event_per_line() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("logs/events.jsonl");

        let mut sink = JsonlSink::create(&path).expect("sink create");
        sink.write(&EventRecord::new(FrameTick(3), "pressed", "ok", "pointer#1"))
            .expect("write succeeds");
        sink.write(&EventRecord::new(FrameTick(9), "released", "ok", ""))
            .expect("write succeeds");
        drop(sink);

        let contents = fs::read_to_string(&path).expect("file readable");
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.contains("\"kind\":\"pressed\""));

        let events = read_jsonl(&path).expect("log parses");
        assert_eq!(events[1].tick, FrameTick(9));
        assert_eq!(events[0].payload, "pointer#1");
    }

    #[test]
    fn read_jsonl_reports_bad_lines() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("broken.jsonl");
        fs::write(&path, "{\"tick\":1,\"kind\":\"a\",\"subject\":\"b\",\"payload\":\"\"}\nnot json\n")
            .expect("write fixture");

        let err = read_jsonl(&path).expect_err("second line is invalid");
        assert!(format!("{err:#}").contains("line 2"));
    }
}
