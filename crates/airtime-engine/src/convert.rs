//! Fixed-offset timezone conversion for resolved schedule ranges.
//!
//! Upstream schedules publish every range in one fixed source zone; viewers
//! want them in their own. Because the published grid never changes zone
//! mid-day, conversion reduces to one whole-hour offset selected per run —
//! daylight-saving awareness lives in *selecting* the offset, not in applying
//! it. The selection takes an explicit instant instead of reading the system
//! clock, so the converter stays a pure, deterministically testable function.

use chrono::{DateTime, Datelike, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::{Result, ScheduleError};
use crate::range::{ClockTime, ResolvedRange, TimeSlot};

/// Parse an IANA timezone name into `Tz`.
pub fn parse_timezone(s: &str) -> Result<Tz> {
    s.parse::<Tz>()
        .map_err(|_| ScheduleError::InvalidTimezone(format!("'{s}'")))
}

/// Whether daylight saving is active in `zone` at the given instant.
///
/// Compares the January 1 offset (standard time) with the offset at `at`.
/// This is the only place the pipeline is date-dependent: the instant is
/// injected by the caller, typically the capture time of the run.
pub fn daylight_saving_active(zone: Tz, at: DateTime<Utc>) -> bool {
    let local = at.with_timezone(&zone);
    let jan1 = Utc
        .with_ymd_and_hms(local.year(), 1, 1, 12, 0, 0)
        .single()
        .unwrap_or(at)
        .with_timezone(&zone);

    local.offset().fix().local_minus_utc() != jan1.offset().fix().local_minus_utc()
}

/// The fixed hour offset applied to every range converted in one run.
///
/// Positive hours shift the clock *backwards*: a rule of 7 turns `05:00`
/// source time into `22:00` display time the previous day, which is how a
/// UTC schedule reads on the US west coast during daylight saving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OffsetRule {
    hours: i32,
}

impl OffsetRule {
    /// A rule with an explicit hour offset.
    pub fn new(hours: i32) -> OffsetRule {
        OffsetRule { hours }
    }

    /// The rule converting `source`-zone wall clocks to `display`-zone wall
    /// clocks, selected from both zones' UTC offsets at the injected instant.
    ///
    /// # Examples
    ///
    /// ```
    /// use airtime_engine::convert::{parse_timezone, OffsetRule};
    /// use chrono::TimeZone;
    ///
    /// let utc = parse_timezone("UTC").unwrap();
    /// let pacific = parse_timezone("America/Los_Angeles").unwrap();
    ///
    /// // July: Pacific daylight time, UTC-7.
    /// let summer = chrono::Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).unwrap();
    /// assert_eq!(OffsetRule::between(utc, pacific, summer).hours(), 7);
    ///
    /// // January: Pacific standard time, UTC-8.
    /// let winter = chrono::Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
    /// assert_eq!(OffsetRule::between(utc, pacific, winter).hours(), 8);
    /// ```
    pub fn between(source: Tz, display: Tz, at: DateTime<Utc>) -> OffsetRule {
        let source_secs = at.with_timezone(&source).offset().fix().local_minus_utc();
        let display_secs = at.with_timezone(&display).offset().fix().local_minus_utc();
        OffsetRule {
            hours: (source_secs - display_secs) / 3600,
        }
    }

    pub fn hours(&self) -> i32 {
        self.hours
    }

    /// The rule that undoes this one.
    pub fn inverse(&self) -> OffsetRule {
        OffsetRule { hours: -self.hours }
    }

    pub fn is_identity(&self) -> bool {
        self.hours == 0
    }
}

fn shift_clock(t: ClockTime, hours: i32) -> ClockTime {
    let hour = (t.hour as i32 - hours).rem_euclid(24) as u32;
    ClockTime {
        hour,
        minute: t.minute,
    }
}

impl ResolvedRange {
    /// The same range on the display-zone clock. Hour arithmetic wraps modulo
    /// 24 per side; minutes are untouched, all supported zone pairs being
    /// whole-hour apart.
    pub fn shifted(&self, rule: &OffsetRule) -> ResolvedRange {
        ResolvedRange {
            start: shift_clock(self.start, rule.hours),
            end: shift_clock(self.end, rule.hours),
        }
    }
}

impl TimeSlot {
    /// Convert a resolved slot; an unresolved slot passes through unchanged.
    /// Shifting a range whose markers were never established would fabricate
    /// wrong data, so it is short-circuited instead.
    pub fn shifted(&self, rule: &OffsetRule) -> TimeSlot {
        match self {
            TimeSlot::Resolved { range, matched } => TimeSlot::Resolved {
                range: range.shifted(rule),
                matched: matched.clone(),
            },
            TimeSlot::Unresolved { matched } => TimeSlot::Unresolved {
                matched: matched.clone(),
            },
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::resolve_time_range;
    use proptest::prelude::*;

    fn pacific() -> Tz {
        parse_timezone("America/Los_Angeles").unwrap()
    }

    fn utc() -> Tz {
        parse_timezone("UTC").unwrap()
    }

    #[test]
    fn invalid_timezone_name_is_rejected() {
        let err = parse_timezone("Invalid/Zone").unwrap_err();
        assert!(err.to_string().contains("Invalid timezone"));
    }

    #[test]
    fn pacific_summer_offset_is_seven() {
        let at = Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).unwrap();
        assert_eq!(OffsetRule::between(utc(), pacific(), at).hours(), 7);
        assert!(daylight_saving_active(pacific(), at));
    }

    #[test]
    fn pacific_winter_offset_is_eight() {
        let at = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
        assert_eq!(OffsetRule::between(utc(), pacific(), at).hours(), 8);
        assert!(!daylight_saving_active(pacific(), at));
    }

    #[test]
    fn tokyo_never_observes_daylight_saving() {
        let zone = parse_timezone("Asia/Tokyo").unwrap();
        let at = Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).unwrap();
        assert!(!daylight_saving_active(zone, at));
        assert_eq!(OffsetRule::between(utc(), zone, at).hours(), -9);
    }

    #[test]
    fn morning_range_wraps_to_previous_evening() {
        // 05:00 – 07:00 UTC is 22:00 – 00:00 Pacific during daylight saving.
        let slot = resolve_time_range("5 – 7 AM").unwrap();
        let shifted = slot.shifted(&OffsetRule::new(7));
        assert_eq!(shifted.as_resolved().unwrap().canonical(), "22:00 – 00:00");
        assert_eq!(shifted.as_resolved().unwrap().twelve_hour(), "10:00 PM – 12:00 AM");
    }

    #[test]
    fn evening_range_converts_within_the_day() {
        let slot = resolve_time_range("10PM – 12AM").unwrap();
        let shifted = slot.shifted(&OffsetRule::new(7));
        assert_eq!(shifted.as_resolved().unwrap().canonical(), "15:00 – 17:00");
    }

    #[test]
    fn unresolved_slot_passes_through_unchanged() {
        let slot = resolve_time_range("2 – 4").unwrap();
        let shifted = slot.shifted(&OffsetRule::new(7));
        assert_eq!(shifted, slot);
    }

    #[test]
    fn identity_rule_is_a_noop() {
        let slot = resolve_time_range("7:05 PM – 9:00 PM").unwrap();
        let rule = OffsetRule::new(0);
        assert!(rule.is_identity());
        assert_eq!(slot.shifted(&rule), slot);
    }

    proptest! {
        #[test]
        fn shifting_round_trips(
            sh in 0u32..24, sm in 0u32..60,
            eh in 0u32..24, em in 0u32..60,
            k in -12i32..=12,
        ) {
            let range = ResolvedRange {
                start: ClockTime { hour: sh, minute: sm },
                end: ClockTime { hour: eh, minute: em },
            };
            let rule = OffsetRule::new(k);
            prop_assert_eq!(range.shifted(&rule).shifted(&rule.inverse()), range);
        }
    }
}
