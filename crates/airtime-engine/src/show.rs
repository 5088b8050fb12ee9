//! The per-block extraction pipeline and per-station schedule assembly.
//!
//! One [`RawBlock`] in, at most one [`ResolvedShow`] out: resolve the time
//! range, convert it for display, segment the remaining text, attach artwork
//! and link. Failures stay local — a block that yields nothing usable is
//! skipped, and a missing field never blocks the others. A station's shows
//! are then assembled in start order and handed to the coverage verifier.

use serde::Serialize;
use tracing::{debug, warn};

use crate::block::RawBlock;
use crate::convert::OffsetRule;
use crate::coverage::{verify_coverage, CoverageEntry, CoverageOptions, CoverageReport, Gap};
use crate::range::{resolve_time_range, ClockTime, ResolvedRange, TimeSlot};
use crate::segment::{clean_block_text, segment};

/// Title words confirming a show-like block when no time slot is present.
const SHOW_WORDS: &[&str] = &["show", "list", "takeover", "hits"];

/// Navigation artifacts that masquerade as schedule items.
const NAV_TITLES: &[&str] = &["home", "new", "radio", "search", "sign in"];

/// Sentinel prefix on synthesized coverage placeholders, so downstream
/// consumers can filter them out.
pub const GAP_TITLE_PREFIX: &str = "MISSING";

/// Raw text kept on each record, in characters.
pub const RAW_TEXT_LIMIT: usize = 200;

/// Per-run conversion state shared by every block of every station.
#[derive(Debug, Clone)]
pub struct ExtractContext {
    pub rule: OffsetRule,
}

impl ExtractContext {
    pub fn new(rule: OffsetRule) -> ExtractContext {
        ExtractContext { rule }
    }
}

/// Everything extracted from one schedule block. Any field except `raw_text`
/// may be absent; a show with only a time range is valid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedShow {
    /// Canonical slot in the source zone, or the original text when the
    /// range could not be resolved.
    pub time_slot_source: Option<String>,
    /// Canonical slot in the display zone; echoes the unresolved text
    /// unchanged rather than fabricating a conversion.
    pub time_slot_display: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub artwork_url: Option<String>,
    pub show_url: Option<String>,
    /// Leading slice of the block text, for diagnostics.
    pub raw_text: String,
    #[serde(skip)]
    pub slot: Option<TimeSlot>,
    #[serde(skip)]
    pub display_slot: Option<TimeSlot>,
}

impl ResolvedShow {
    /// The resolved source-zone range, when there is one.
    pub fn source_range(&self) -> Option<&ResolvedRange> {
        self.slot.as_ref().and_then(TimeSlot::as_resolved)
    }

    /// Display-zone start in minutes since midnight; the tabular export's
    /// sort key derives from this.
    pub fn display_start_minute(&self) -> Option<u32> {
        self.display_slot
            .as_ref()
            .and_then(TimeSlot::as_resolved)
            .map(ResolvedRange::start_minute)
    }

    /// Whether this record is a synthesized coverage placeholder rather than
    /// a real show.
    pub fn is_gap_placeholder(&self) -> bool {
        self.title
            .as_deref()
            .is_some_and(|t| t.starts_with(GAP_TITLE_PREFIX))
    }

    /// A placeholder record standing in for a reported gap.
    pub fn gap_placeholder(gap: &Gap) -> ResolvedShow {
        let range = ResolvedRange {
            start: ClockTime::from_minutes(gap.start_minute),
            end: ClockTime::from_minutes(gap.end_minute),
        };
        ResolvedShow {
            time_slot_source: Some(range.canonical()),
            time_slot_display: None,
            title: Some(format!("{GAP_TITLE_PREFIX} SHOW ({})", gap.clock_range)),
            description: None,
            artwork_url: None,
            show_url: None,
            raw_text: String::new(),
            slot: Some(TimeSlot::Resolved {
                matched: range.canonical(),
                range,
            }),
            display_slot: None,
        }
    }
}

/// Extract one show from one block.
///
/// Returns `None` when the block yields neither a slot nor a title nor a
/// description, or when it fails the plausibility filter. Nothing here
/// errors: every per-block failure downgrades to an absent field.
pub fn extract_show(block: &RawBlock, ctx: &ExtractContext) -> Option<ResolvedShow> {
    let slot = resolve_time_range(&block.text);
    let cleaned = clean_block_text(&block.text, slot.as_ref());
    let segmented = segment(
        &cleaned,
        block.title_hint.as_deref(),
        block.description_hint.as_deref(),
    );

    if slot.is_none() && segmented.title.is_none() && segmented.description.is_none() {
        return None;
    }
    if !is_plausible_show(slot.as_ref(), segmented.title.as_deref()) {
        debug!(raw = block.text.as_str(), "block rejected as non-show");
        return None;
    }

    let display_slot = slot.as_ref().map(|s| s.shifted(&ctx.rule));
    Some(ResolvedShow {
        time_slot_source: slot.as_ref().map(TimeSlot::display_text),
        time_slot_display: display_slot.as_ref().map(TimeSlot::display_text),
        title: segmented.title,
        description: segmented.description,
        artwork_url: block.artwork(),
        show_url: block.link_url.clone(),
        raw_text: truncate_raw(&block.text),
        slot,
        display_slot,
    })
}

/// Filter out navigation artifacts and context-free fragments: a title that
/// is exactly a navigation label is rejected, and a block with no time slot
/// must carry a show-like title word to survive.
fn is_plausible_show(slot: Option<&TimeSlot>, title: Option<&str>) -> bool {
    if let Some(t) = title {
        if NAV_TITLES.contains(&t.trim().to_lowercase().as_str()) {
            return false;
        }
    }
    if slot.is_some() {
        return true;
    }
    title
        .map(|t| {
            let lower = t.to_lowercase();
            SHOW_WORDS.iter().any(|w| lower.contains(w))
        })
        .unwrap_or(false)
}

fn truncate_raw(text: &str) -> String {
    if text.chars().count() <= RAW_TEXT_LIMIT {
        return text.to_string();
    }
    let mut s: String = text.chars().take(RAW_TEXT_LIMIT).collect();
    s.push_str("...");
    s
}

// ── Station assembly ────────────────────────────────────────────────────────

/// One station's shows for a fixed 24-hour source-zone window, ordered by
/// start time.
#[derive(Debug, Clone, Serialize)]
pub struct StationSchedule {
    pub station: String,
    pub shows: Vec<ResolvedShow>,
}

impl StationSchedule {
    /// Extract every block for one station. A block that fails extraction is
    /// skipped without affecting its siblings.
    pub fn extract(
        station: impl Into<String>,
        blocks: &[RawBlock],
        ctx: &ExtractContext,
    ) -> StationSchedule {
        let shows = blocks.iter().filter_map(|b| extract_show(b, ctx)).collect();
        StationSchedule::assemble(station, shows)
    }

    /// Order shows by source-zone start minute; shows without a resolvable
    /// slot keep their relative order at the end.
    pub fn assemble(station: impl Into<String>, mut shows: Vec<ResolvedShow>) -> StationSchedule {
        shows.sort_by_key(|s| {
            s.source_range()
                .map(ResolvedRange::start_minute)
                .unwrap_or(u32::MAX)
        });
        StationSchedule {
            station: station.into(),
            shows,
        }
    }

    /// Entries the verifier can work with: resolved ranges only, synthesized
    /// placeholders from prior runs excluded.
    fn coverage_entries(&self) -> Vec<CoverageEntry> {
        self.shows
            .iter()
            .filter(|s| !s.is_gap_placeholder())
            .filter_map(|s| {
                s.source_range().map(|r| CoverageEntry {
                    title: s.title.clone(),
                    range: *r,
                })
            })
            .collect()
    }

    /// Verify that this station's shows tile a full day.
    pub fn verify(&self, options: &CoverageOptions) -> CoverageReport {
        let report = verify_coverage(&self.coverage_entries(), options);
        if !report.passed {
            warn!(
                station = self.station.as_str(),
                total_minutes = report.total_minutes,
                gaps = report.gaps.len(),
                "schedule does not cover the full day"
            );
        }
        report
    }

    /// A copy with a placeholder entry inserted for every flagged gap.
    pub fn with_gap_placeholders(&self, report: &CoverageReport) -> StationSchedule {
        let mut shows = self.shows.clone();
        shows.extend(report.flagged_gaps().map(ResolvedShow::gap_placeholder));
        StationSchedule::assemble(self.station.clone(), shows)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
