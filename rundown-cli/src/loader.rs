//! Rundown file loading

use anyhow::{Context, Result};
use rundown_core::{Event, Rundown};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// On-disk rundown: `{ "events": [...] }`
#[derive(Debug, Deserialize)]
struct RundownFile {
    events: Vec<EventRecord>,
}

/// A single event as written by the rundown source. Day offsets are always
/// recomputed from the event order.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventRecord {
    id: String,
    #[serde(default)]
    title: String,
    time_start: i64,
    time_end: i64,
    duration: Option<i64>,
    #[serde(default)]
    delay: i64,
    #[serde(default)]
    colour: String,
}

impl From<EventRecord> for Event {
    fn from(record: EventRecord) -> Self {
        let event = Event::new(record.id, record.title, record.time_start, record.time_end)
            .with_delay(record.delay)
            .with_colour(record.colour);
        match record.duration {
            Some(duration) => event.with_duration(duration),
            None => event,
        }
    }
}

/// Reads and validates a rundown file
pub fn load_rundown(path: &Path) -> Result<Rundown> {
    let file = File::open(path).with_context(|| format!("Failed to open rundown file {}", path.display()))?;
    let parsed: RundownFile = serde_json::from_reader(BufReader::new(file)).context("Failed to parse rundown JSON")?;
    build_rundown(parsed)
}

fn build_rundown(file: RundownFile) -> Result<Rundown> {
    let events = file.events.into_iter().map(Event::from).collect();
    let rundown = Rundown::new(events).context("Invalid rundown")?;
    log::debug!("loaded rundown with {} events", rundown.len());
    Ok(rundown)
}
