//! 24-hour coverage verification for one station's schedule.
//!
//! A station's day should tile completely: the sum of show durations comes to
//! 1440 minutes and no silence opens up between consecutive shows. Source
//! data rounds, so the check is a soft invariant — a few minutes of slack
//! pass, anything larger is reported. Reporting is the whole job here:
//! nothing is auto-fixed, and a failed check never aborts a run.

use serde::Serialize;

use crate::range::{ClockTime, ResolvedRange};

/// Minutes in the coverage window.
pub const DAY_MINUTES: u32 = 1440;

/// Default maximum silent gap still considered "no gap".
pub const DEFAULT_TOLERANCE_MINUTES: u32 = 5;

/// Knobs for [`verify_coverage`].
#[derive(Debug, Clone, Copy)]
pub struct CoverageOptions {
    pub tolerance_minutes: u32,
}

impl Default for CoverageOptions {
    fn default() -> CoverageOptions {
        CoverageOptions {
            tolerance_minutes: DEFAULT_TOLERANCE_MINUTES,
        }
    }
}

/// One verifiable schedule entry: a resolved range and the title it belongs to.
#[derive(Debug, Clone)]
pub struct CoverageEntry {
    pub title: Option<String>,
    pub range: ResolvedRange,
}

/// A silence between two consecutive shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gap {
    pub gap_minutes: u32,
    pub after_title: Option<String>,
    pub before_title: Option<String>,
    /// Clock minute (0–1439) the silence starts at.
    pub start_minute: u32,
    /// Clock minute (0–1439) the silence ends at.
    pub end_minute: u32,
    /// `"HH:MM – HH:MM"` rendering of the silence.
    pub clock_range: String,
}

/// Two entries claiming the same airtime — a data-quality defect, reported
/// but never repaired.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlap {
    pub overlap_minutes: u32,
    pub first_title: Option<String>,
    pub second_title: Option<String>,
}

/// The verification result for one station.
#[derive(Debug, Clone, Serialize)]
pub struct CoverageReport {
    pub total_minutes: u32,
    pub percentage: f64,
    pub tolerance_minutes: u32,
    /// Every positive silence between consecutive shows, shortest to none
    /// excluded; see [`CoverageReport::flagged_gaps`] for the ones past
    /// tolerance.
    pub gaps: Vec<Gap>,
    pub overlaps: Vec<Overlap>,
    pub passed: bool,
}

impl CoverageReport {
    /// Gaps longer than the tolerance — the ones worth synthesizing
    /// placeholders for.
    pub fn flagged_gaps(&self) -> impl Iterator<Item = &Gap> {
        let tolerance = self.tolerance_minutes;
        self.gaps.iter().filter(move |g| g.gap_minutes > tolerance)
    }
}

/// Verify that `entries` tile a full 24-hour window.
///
/// Entries are converted to minutes since midnight (an end before its start
/// wraps past midnight), sorted by start, and walked pairwise. Total coverage
/// is the sum of durations; the check passes when it reaches
/// `1440 − tolerance`. Overlaps are detected against the running maximum end
/// of all previous entries, not just the immediate predecessor, so contained
/// entries are caught too.
pub fn verify_coverage(entries: &[CoverageEntry], options: &CoverageOptions) -> CoverageReport {
    let mut timed: Vec<(u32, u32, &CoverageEntry)> = entries
        .iter()
        .map(|e| (e.range.start_minute(), e.range.end_minute(), e))
        .collect();
    timed.sort_by_key(|&(start, _, _)| start);

    let total_minutes: u32 = timed.iter().map(|&(start, end, _)| end - start).sum();

    let mut gaps = Vec::new();
    for pair in timed.windows(2) {
        let (_, cur_end, cur) = pair[0];
        let (next_start, _, next) = pair[1];
        if next_start > cur_end {
            let start = cur_end % DAY_MINUTES;
            let end = next_start % DAY_MINUTES;
            gaps.push(Gap {
                gap_minutes: next_start - cur_end,
                after_title: cur.title.clone(),
                before_title: next.title.clone(),
                start_minute: start,
                end_minute: end,
                clock_range: format!(
                    "{} – {}",
                    ClockTime::from_minutes(start),
                    ClockTime::from_minutes(end)
                ),
            });
        }
    }

    let mut overlaps = Vec::new();
    let mut running: Option<(u32, &CoverageEntry)> = None;
    for (start, end, entry) in timed.iter().copied() {
        if let Some((max_end, max_entry)) = running {
            if start < max_end {
                overlaps.push(Overlap {
                    overlap_minutes: max_end.min(end) - start,
                    first_title: max_entry.title.clone(),
                    second_title: entry.title.clone(),
                });
            }
        }
        if running.map(|(e, _)| end > e).unwrap_or(true) {
            running = Some((end, entry));
        }
    }

    let required = DAY_MINUTES.saturating_sub(options.tolerance_minutes);
    CoverageReport {
        total_minutes,
        percentage: f64::from(total_minutes) / f64::from(DAY_MINUTES) * 100.0,
        tolerance_minutes: options.tolerance_minutes,
        gaps,
        overlaps,
        passed: total_minutes >= required,
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
