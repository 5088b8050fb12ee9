//! Time-range recognition for schedule blocks.
//!
//! Free-form schedule text carries ranges in many shapes — `"7:05 PM – 9:00 PM"`,
//! `"11PM – 12AM"`, `"5 – 7 AM"` — frequently with one or both AM/PM markers
//! missing. This module parses a single time expression into components,
//! locates the best range substring via an explicit prioritized pattern table,
//! and resolves missing markers by inference rather than guesswork.
//!
//! # Design Principle
//!
//! Every pattern in the table is evaluated and the **longest matched
//! substring wins**: a longer match carries more disambiguating detail, so
//! `"7:05 PM – 9:00 PM"` beats a bare `"9:00 PM"` that also appears in
//! surrounding boilerplate. When neither side carries a marker and no rule
//! can infer one, the slot stays [`TimeSlot::Unresolved`] with the original
//! text recorded — an unresolved range is data, a guessed one is a bug.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::error::{Result, ScheduleError};

// ── Components ──────────────────────────────────────────────────────────────

/// AM/PM marker on a 12-hour clock reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    /// The opposite marker, used when an inferred range crosses noon or midnight.
    pub fn flip(self) -> Self {
        match self {
            Meridiem::Am => Meridiem::Pm,
            Meridiem::Pm => Meridiem::Am,
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "am" => Some(Meridiem::Am),
            "pm" => Some(Meridiem::Pm),
            _ => None,
        }
    }
}

/// One side of a time range as written: an hour, optional minutes, and an
/// optional AM/PM marker.
///
/// The hour is 1–12 when a marker is present, 1–23 when none is. A component
/// with no marker is not yet a clock reading — see [`resolve_time_range`] for
/// how the missing marker is inferred from the other side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeComponent {
    pub hour: u32,
    pub minute: u32,
    pub period: Option<Meridiem>,
}

lazy_static! {
    static ref COMPONENT: Regex =
        Regex::new(r"(?i)^\s*(\d{1,2})(?::([0-5]\d))?\s*(am|pm)?\s*$").unwrap();
}

impl TimeComponent {
    /// Parse a single time expression such as `"7"`, `"7:05"`, `"11PM"`, or
    /// `"7:05 pm"`.
    ///
    /// Returns `None` when no digits match or the hour is out of range for
    /// the marker situation. Fails softly; the caller decides what a missing
    /// component means.
    pub fn parse(s: &str) -> Option<TimeComponent> {
        let caps = COMPONENT.captures(s)?;
        let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
        let minute: u32 = caps
            .get(2)
            .map(|m| m.as_str().parse().unwrap_or(0))
            .unwrap_or(0);
        let period = caps.get(3).and_then(|m| Meridiem::parse(m.as_str()));

        let valid = match period {
            Some(_) => (1..=12).contains(&hour),
            None => (1..=23).contains(&hour),
        };
        if !valid {
            return None;
        }

        Some(TimeComponent {
            hour,
            minute,
            period,
        })
    }

    /// 24-hour reading of this component under the given marker. Components
    /// already written past 12 are taken as 24-hour values and the marker is
    /// ignored.
    fn clock(self, assumed: Meridiem) -> ClockTime {
        if self.hour > 12 {
            return ClockTime {
                hour: self.hour,
                minute: self.minute,
            };
        }
        let hour = match assumed {
            Meridiem::Am => self.hour % 12,
            Meridiem::Pm => self.hour % 12 + 12,
        };
        ClockTime {
            hour,
            minute: self.minute,
        }
    }
}

/// A 24-hour wall-clock reading, minute granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
}

impl ClockTime {
    /// Checked constructor.
    pub fn new(hour: u32, minute: u32) -> Result<ClockTime> {
        if hour > 23 || minute > 59 {
            return Err(ScheduleError::InvalidClock(format!("{hour}:{minute:02}")));
        }
        Ok(ClockTime { hour, minute })
    }

    /// Minutes since midnight, 0–1439.
    pub fn minutes(self) -> u32 {
        self.hour * 60 + self.minute
    }

    /// Clock reading for a minutes-since-midnight value (wrapped into one day).
    pub fn from_minutes(minutes: u32) -> ClockTime {
        let m = minutes % 1440;
        ClockTime {
            hour: m / 60,
            minute: m % 60,
        }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

// ── Resolved ranges ─────────────────────────────────────────────────────────

/// A time range with both sides resolved to 24-hour readings.
///
/// `end` may be numerically before `start`; that signals an overnight
/// wraparound (`23:00 – 01:00`), never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedRange {
    pub start: ClockTime,
    pub end: ClockTime,
}

impl ResolvedRange {
    /// Start in minutes since midnight.
    pub fn start_minute(&self) -> u32 {
        self.start.minutes()
    }

    /// End in minutes since midnight, pushed past 1440 when the range wraps
    /// midnight so that `end_minute() > start_minute()` always holds for
    /// non-empty ranges.
    pub fn end_minute(&self) -> u32 {
        let e = self.end.minutes();
        if e < self.start.minutes() {
            e + 1440
        } else {
            e
        }
    }

    /// Length of the range in minutes.
    pub fn duration_minutes(&self) -> u32 {
        self.end_minute() - self.start_minute()
    }

    /// Canonical internal rendering: 24-hour `"HH:MM – HH:MM"`.
    pub fn canonical(&self) -> String {
        format!("{} – {}", self.start, self.end)
    }

    /// 12-hour rendering for display. The meridiem is re-derived per side —
    /// a converted range may have moved one side across noon or midnight —
    /// and the marker is written once when both sides share it.
    pub fn twelve_hour(&self) -> String {
        let (sh, sm, sp) = twelve(self.start);
        let (eh, em, ep) = twelve(self.end);
        if sp == ep {
            format!("{sh}:{sm:02} – {eh}:{em:02} {}", marker(ep))
        } else {
            format!(
                "{sh}:{sm:02} {} – {eh}:{em:02} {}",
                marker(sp),
                marker(ep)
            )
        }
    }
}

fn twelve(t: ClockTime) -> (u32, u32, Meridiem) {
    match t.hour {
        0 => (12, t.minute, Meridiem::Am),
        h if h < 12 => (h, t.minute, Meridiem::Am),
        12 => (12, t.minute, Meridiem::Pm),
        h => (h - 12, t.minute, Meridiem::Pm),
    }
}

fn marker(p: Meridiem) -> &'static str {
    match p {
        Meridiem::Am => "AM",
        Meridiem::Pm => "PM",
    }
}

/// Outcome of locating a time range in block text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeSlot {
    /// Both sides resolved to definite 24-hour readings. The matched source
    /// substring is kept for text cleanup and display.
    Resolved {
        range: ResolvedRange,
        matched: String,
    },
    /// A range-shaped substring was found but neither side carried a marker
    /// and no rule could infer one. The original text is recorded verbatim
    /// instead of a guess.
    Unresolved { matched: String },
}

impl TimeSlot {
    pub fn is_resolved(&self) -> bool {
        matches!(self, TimeSlot::Resolved { .. })
    }

    /// The resolved range, when there is one.
    pub fn as_resolved(&self) -> Option<&ResolvedRange> {
        match self {
            TimeSlot::Resolved { range, .. } => Some(range),
            TimeSlot::Unresolved { .. } => None,
        }
    }

    /// The substring of the source text this slot was read from.
    pub fn matched_text(&self) -> &str {
        match self {
            TimeSlot::Resolved { matched, .. } => matched,
            TimeSlot::Unresolved { matched } => matched,
        }
    }

    /// Canonical rendering for a resolved slot, the original text otherwise.
    pub fn display_text(&self) -> String {
        match self {
            TimeSlot::Resolved { range, .. } => range.canonical(),
            TimeSlot::Unresolved { matched } => matched.clone(),
        }
    }
}

impl TryFrom<&TimeSlot> for ResolvedRange {
    type Error = ScheduleError;

    fn try_from(slot: &TimeSlot) -> Result<ResolvedRange> {
        match slot {
            TimeSlot::Resolved { range, .. } => Ok(*range),
            TimeSlot::Unresolved { matched } => {
                Err(ScheduleError::UnresolvedSlot(matched.clone()))
            }
        }
    }
}

// ── The pattern table ───────────────────────────────────────────────────────

/// One row of the prioritized pattern table. Rows are ordered most specific
/// first; the order breaks ties between equally long matches.
struct PatternRow {
    name: &'static str,
    regex: Regex,
}

fn row(name: &'static str, pattern: &str) -> PatternRow {
    PatternRow {
        name,
        regex: Regex::new(pattern).unwrap(),
    }
}

const HM: &str = r"\d{1,2}:[0-5]\d";
const H: &str = r"\d{1,2}";
const AP: &str = r"(?:AM|PM)";
const DASH: &str = r"\s*[–-]\s*";

lazy_static! {
    static ref RANGE_PATTERNS: Vec<PatternRow> = vec![
        row(
            "minutes-both, end marked",
            &format!(r"(?i){HM}\s*{AP}?{DASH}{HM}\s*{AP}"),
        ),
        row(
            "minutes-both, end marked only",
            &format!(r"(?i){HM}{DASH}{HM}\s*{AP}"),
        ),
        row(
            "minutes start, bare marked end",
            &format!(r"(?i){HM}\s*{AP}?{DASH}{H}\s*{AP}"),
        ),
        row(
            "bare both, both marked",
            &format!(r"(?i){H}\s*{AP}{DASH}{H}\s*{AP}"),
        ),
        row(
            "minutes start, end marked",
            &format!(r"(?i){HM}{DASH}{H}\s*{AP}"),
        ),
        row(
            "bare start, minutes marked end",
            &format!(r"(?i){H}{DASH}{HM}\s*{AP}"),
        ),
        row(
            "bare both, end marked",
            &format!(r"(?i){H}{DASH}{H}\s*{AP}"),
        ),
        row(
            "unmarked end",
            &format!(r"(?i){H}(?::[0-5]\d)?\s*{AP}?{DASH}{H}(?::[0-5]\d)?"),
        ),
    ];

    /// Leading "LIVE" badge with its optional separator glyph.
    pub(crate) static ref LIVE_PREFIX: Regex =
        Regex::new(r"(?i)^\s*LIVE\s*[·•]?\s*").unwrap();

    /// Loose range shape used for text cleanup sweeps, not for resolution.
    pub(crate) static ref GENERIC_RANGE: Regex = Regex::new(
        r"(?i)\d{1,2}(?::[0-5]\d)?\s*(?:AM|PM)?\s*[–-]\s*\d{1,2}(?::[0-5]\d)?\s*(?:AM|PM)?"
    )
    .unwrap();

    static ref TIME_ONLY: Regex =
        Regex::new(r"(?i)^\s*\d{1,2}(?::[0-5]\d)?\s*(?:AM|PM)?\s*$").unwrap();
}

/// Whether `s` is nothing but a time or time range — a disqualifier for
/// title/description candidates.
pub(crate) fn is_bare_time_text(s: &str) -> bool {
    let t = s.trim();
    if t.is_empty() {
        return false;
    }
    if TIME_ONLY.is_match(t) {
        return true;
    }
    GENERIC_RANGE
        .find(t)
        .map(|m| m.start() == 0 && m.end() == t.len())
        .unwrap_or(false)
}

// ── Resolution ──────────────────────────────────────────────────────────────

/// Locate and resolve the single best time range in `text`.
///
/// All patterns are evaluated over both the raw text and the text with a
/// leading `LIVE` badge stripped; the longest matched substring across both
/// views wins. Returns `None` when nothing range-shaped is present — an
/// expected, non-fatal outcome.
///
/// # Examples
///
/// ```
/// use airtime_engine::range::resolve_time_range;
///
/// let slot = resolve_time_range("LIVE · 7:05 – 9:00 PM The Morning Show").unwrap();
/// assert_eq!(slot.as_resolved().unwrap().canonical(), "19:05 – 21:00");
///
/// assert!(resolve_time_range("no times here").is_none());
/// ```
pub fn resolve_time_range(text: &str) -> Option<TimeSlot> {
    let stripped = LIVE_PREFIX.replace(text, "");

    let mut candidates: Vec<(usize, String, &'static str)> = Vec::new();
    for view in [text, stripped.as_ref()] {
        for (idx, pat) in RANGE_PATTERNS.iter().enumerate() {
            for m in pat.regex.find_iter(view) {
                candidates.push((idx, m.as_str().to_string(), pat.name));
            }
        }
    }
    if candidates.is_empty() {
        return None;
    }

    // Longest substring first; the table order breaks length ties.
    candidates.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then(a.0.cmp(&b.0)));

    for (_, matched, name) in &candidates {
        if let Some(slot) = resolve_candidate(matched) {
            debug!(pattern = *name, matched = matched.as_str(), "time range matched");
            return Some(slot);
        }
    }
    None
}

/// Split a matched substring at its dash and resolve markers on both sides.
fn resolve_candidate(matched: &str) -> Option<TimeSlot> {
    let dash = matched.char_indices().find(|(_, c)| *c == '–' || *c == '-')?;
    let (left, right) = matched.split_at(dash.0);
    let right = &right[dash.1.len_utf8()..];

    let start = TimeComponent::parse(left)?;
    let end = TimeComponent::parse(right)?;

    match infer_periods(start, end) {
        Some((sp, ep)) => Some(TimeSlot::Resolved {
            range: ResolvedRange {
                start: start.clock(sp),
                end: end.clock(ep),
            },
            matched: matched.trim().to_string(),
        }),
        None => Some(TimeSlot::Unresolved {
            matched: matched.trim().to_string(),
        }),
    }
}

/// Fill in a missing AM/PM marker from the other side of the range.
///
/// An hour of exactly 12 on the unmarked side inherits the other side's
/// marker — 12 is the boundary value, not a crossing value. Otherwise the
/// unmarked end keeps the start's marker when its hour is numerically ≥ the
/// start hour, and flips when it is smaller (`"11 – 1 AM"` reads as a range
/// crossing midnight, so the start is 11 PM). The symmetric rule applies to
/// an unmarked start. Returns `None` when neither side is marked.
fn infer_periods(start: TimeComponent, end: TimeComponent) -> Option<(Meridiem, Meridiem)> {
    match (start.period, end.period) {
        (Some(sp), Some(ep)) => Some((sp, ep)),
        (Some(sp), None) => {
            let ep = if end.hour == 12 || end.hour >= start.hour {
                sp
            } else {
                sp.flip()
            };
            Some((sp, ep))
        }
        (None, Some(ep)) => {
            let sp = if start.hour == 12 || start.hour <= end.hour {
                ep
            } else {
                ep.flip()
            };
            Some((sp, ep))
        }
        (None, None) => None,
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn resolved(text: &str) -> ResolvedRange {
        let slot = resolve_time_range(text).expect("expected a slot");
        *slot.as_resolved().expect("expected a resolved slot")
    }

    // ── component parsing ───────────────────────────────────────────────

    #[test]
    fn parse_bare_hour() {
        let c = TimeComponent::parse("9").unwrap();
        assert_eq!((c.hour, c.minute, c.period), (9, 0, None));
    }

    #[test]
    fn parse_hour_and_minutes() {
        let c = TimeComponent::parse("7:05").unwrap();
        assert_eq!((c.hour, c.minute, c.period), (7, 5, None));
    }

    #[test]
    fn parse_glued_marker() {
        let c = TimeComponent::parse("11PM").unwrap();
        assert_eq!((c.hour, c.minute, c.period), (11, 0, Some(Meridiem::Pm)));
    }

    #[test]
    fn parse_spaced_lowercase_marker() {
        let c = TimeComponent::parse("7:05 pm").unwrap();
        assert_eq!((c.hour, c.minute, c.period), (7, 5, Some(Meridiem::Pm)));
    }

    #[test]
    fn parse_twelve_am() {
        let c = TimeComponent::parse("12 AM").unwrap();
        assert_eq!((c.hour, c.period), (12, Some(Meridiem::Am)));
    }

    #[test]
    fn parse_rejects_non_digits() {
        assert!(TimeComponent::parse("soon").is_none());
        assert!(TimeComponent::parse("").is_none());
    }

    #[test]
    fn parse_rejects_out_of_range_hours() {
        assert!(TimeComponent::parse("13 PM").is_none());
        assert!(TimeComponent::parse("0").is_none());
        assert!(TimeComponent::parse("24").is_none());
        assert!(TimeComponent::parse("7:60").is_none());
    }

    #[test]
    fn parse_accepts_24h_hour_without_marker() {
        let c = TimeComponent::parse("19:30").unwrap();
        assert_eq!((c.hour, c.minute, c.period), (19, 30, None));
    }

    proptest! {
        #[test]
        fn component_grid(h in 1u32..=12, m in 0u32..=59, marked in 0usize..3, spaced in proptest::bool::ANY, with_minutes in proptest::bool::ANY) {
            let mut s = if with_minutes { format!("{h}:{m:02}") } else { format!("{h}") };
            let expected_period = match marked {
                1 => { s.push_str(if spaced { " AM" } else { "AM" }); Some(Meridiem::Am) }
                2 => { s.push_str(if spaced { " pm" } else { "pm" }); Some(Meridiem::Pm) }
                _ => None,
            };
            let c = TimeComponent::parse(&s).expect("grid string must parse");
            prop_assert_eq!(c.hour, h);
            prop_assert_eq!(c.minute, if with_minutes { m } else { 0 });
            prop_assert_eq!(c.period, expected_period);
        }
    }

    // ── range resolution ────────────────────────────────────────────────

    #[test]
    fn resolves_fully_specified_range() {
        let r = resolved("7:05 PM – 9:00 PM");
        assert_eq!(r.canonical(), "19:05 – 21:00");
    }

    #[test]
    fn resolves_glued_markers() {
        let r = resolved("11PM – 12AM");
        assert_eq!(r.canonical(), "23:00 – 00:00");
    }

    #[test]
    fn end_inherits_start_marker_when_not_crossing() {
        // 7 ≥ 5, so the unmarked start stays AM.
        let r = resolved("5 – 7 AM");
        assert_eq!(r.canonical(), "05:00 – 07:00");
    }

    #[test]
    fn start_flips_marker_when_crossing_midnight() {
        // 1 < 11 signals a crossing, so the start becomes 11 PM.
        let r = resolved("11 – 1 AM");
        assert_eq!(r.canonical(), "23:00 – 01:00");
    }

    #[test]
    fn twelve_inherits_marker_instead_of_flipping() {
        let r = resolved("12 – 1 AM");
        assert_eq!(r.canonical(), "00:00 – 01:00");
    }

    #[test]
    fn unmarked_end_inherits_from_start() {
        let r = resolved("7:05 PM – 9:00");
        assert_eq!(r.canonical(), "19:05 – 21:00");
    }

    #[test]
    fn unmarked_end_flips_when_smaller() {
        let r = resolved("10 PM – 2");
        assert_eq!(r.canonical(), "22:00 – 02:00");
    }

    #[test]
    fn longest_match_wins_over_boilerplate() {
        let slot =
            resolve_time_range("Up next 9 – 11 PM then 7:05 PM – 9:00 PM tonight").unwrap();
        assert_eq!(slot.matched_text(), "7:05 PM – 9:00 PM");
    }

    #[test]
    fn live_badge_is_stripped_before_matching() {
        let slot = resolve_time_range("LIVE · 7:05 – 9:00 PM The Morning Show").unwrap();
        assert_eq!(slot.as_resolved().unwrap().canonical(), "19:05 – 21:00");
    }

    #[test]
    fn plain_hyphen_is_accepted() {
        let r = resolved("5 - 7 AM");
        assert_eq!(r.canonical(), "05:00 – 07:00");
    }

    #[test]
    fn no_range_found_is_none() {
        assert!(resolve_time_range("All the biggest songs").is_none());
        assert!(resolve_time_range("").is_none());
    }

    #[test]
    fn markerless_range_stays_unresolved() {
        let slot = resolve_time_range("2 – 4 every day").unwrap();
        assert!(!slot.is_resolved());
        assert_eq!(slot.matched_text(), "2 – 4");
        assert_eq!(slot.display_text(), "2 – 4");
    }

    #[test]
    fn date_like_text_is_not_a_range() {
        // "2024-05-12" superficially contains "24-05", but 24 is not an hour.
        assert!(resolve_time_range("aired 2024-05-12").is_none());
    }

    #[test]
    fn unresolved_slot_refuses_range_conversion() {
        let slot = resolve_time_range("2 – 4").unwrap();
        assert!(ResolvedRange::try_from(&slot).is_err());
    }

    // ── rendering ───────────────────────────────────────────────────────

    #[test]
    fn wraparound_duration_counts_past_midnight() {
        let r = resolved("11 PM – 1 AM");
        assert_eq!(r.start_minute(), 1380);
        assert_eq!(r.end_minute(), 1500);
        assert_eq!(r.duration_minutes(), 120);
    }

    #[test]
    fn twelve_hour_collapses_shared_marker() {
        let r = resolved("7:05 PM – 9:00 PM");
        assert_eq!(r.twelve_hour(), "7:05 – 9:00 PM");
    }

    #[test]
    fn twelve_hour_writes_both_markers_when_they_differ() {
        let r = resolved("11PM – 12AM");
        assert_eq!(r.twelve_hour(), "11:00 PM – 12:00 AM");
    }

    #[test]
    fn bare_time_text_detection() {
        assert!(is_bare_time_text("7 – 9 PM"));
        assert!(is_bare_time_text("7:05"));
        assert!(is_bare_time_text(" 11PM "));
        assert!(!is_bare_time_text("The Morning Show"));
        assert!(!is_bare_time_text("7 – 9 PM The Morning Show"));
        assert!(!is_bare_time_text(""));
    }

    #[test]
    fn clock_time_bounds() {
        assert!(ClockTime::new(23, 59).is_ok());
        assert!(ClockTime::new(24, 0).is_err());
        assert!(ClockTime::new(0, 60).is_err());
        assert_eq!(ClockTime::from_minutes(1500), ClockTime { hour: 1, minute: 0 });
    }
}
