//! Record shapes for the persisted exports.
//!
//! Writing files is an external collaborator's job; this module only owns the
//! shapes those collaborators consume unchanged — a JSON document with the
//! capture timestamp, station list, and show list, and one tabular row per
//! show sortable by station and display-zone start. The capture timestamp is
//! injected, never read from a clock here.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::show::{ResolvedShow, StationSchedule};

/// Sort key for shows with no resolvable display slot: after everything else.
const SLOTLESS_SORT_KEY: u32 = u32::MAX;

/// One show tagged with the station it belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct ShowRecord {
    pub station: String,
    #[serde(flatten)]
    pub show: ResolvedShow,
}

/// The JSON export document.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleDocument {
    pub captured_at: String,
    pub stations: Vec<String>,
    pub shows: Vec<ShowRecord>,
}

impl ScheduleDocument {
    pub fn from_schedules(
        schedules: &[StationSchedule],
        captured_at: DateTime<Utc>,
    ) -> ScheduleDocument {
        ScheduleDocument {
            captured_at: captured_at.to_rfc3339(),
            stations: schedules.iter().map(|s| s.station.clone()).collect(),
            shows: schedules
                .iter()
                .flat_map(|sched| {
                    sched.shows.iter().map(|show| ShowRecord {
                        station: sched.station.clone(),
                        show: show.clone(),
                    })
                })
                .collect(),
        }
    }
}

/// One tabular row per show. Absent fields export as empty strings so every
/// row has the same width.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub station: String,
    pub time_slot: String,
    pub show_title: String,
    pub description: String,
    pub image_url: String,
    pub time_slot_source: String,
    pub show_url: String,
    pub captured_at: String,
    /// Display-zone start minute, the numeric sort key within a station.
    pub sort_key: u32,
}

/// Flatten schedules into rows sorted by station, then by display-zone start.
pub fn export_rows(schedules: &[StationSchedule], captured_at: DateTime<Utc>) -> Vec<ExportRow> {
    let stamp = captured_at.to_rfc3339();
    let mut rows: Vec<ExportRow> = schedules
        .iter()
        .flat_map(|sched| {
            sched.shows.iter().map(|show| ExportRow {
                station: sched.station.clone(),
                time_slot: show.time_slot_display.clone().unwrap_or_default(),
                show_title: show.title.clone().unwrap_or_default(),
                description: show.description.clone().unwrap_or_default(),
                image_url: show.artwork_url.clone().unwrap_or_default(),
                time_slot_source: show.time_slot_source.clone().unwrap_or_default(),
                show_url: show.show_url.clone().unwrap_or_default(),
                captured_at: stamp.clone(),
                sort_key: show.display_start_minute().unwrap_or(SLOTLESS_SORT_KEY),
            })
        })
        .collect();
    rows.sort_by(|a, b| {
        a.station
            .cmp(&b.station)
            .then(a.sort_key.cmp(&b.sort_key))
    });
    rows
}

// ── Tests ───────────────────────────────────────────────────────────────────
