//! # airtime-engine
//!
//! Deterministic schedule extraction for broadcast-style radio stations.
//!
//! A page-automation collaborator hands over noisy, inconsistently structured
//! text blocks; this engine turns them into per-station schedules with
//! unambiguous time ranges, viewer-zone conversions, heuristically segmented
//! titles and descriptions, and a verified 24-hour coverage report. Every
//! function takes explicit inputs — no system clock, no network, no markup —
//! so the whole pipeline is pure and deterministically testable.
//!
//! ## Modules
//!
//! - [`range`] — time-component parsing, the prioritized range pattern table, AM/PM inference
//! - [`convert`] — DST-aware fixed-offset selection and range conversion
//! - [`segment`] — block-text cleanup and title/description segmentation
//! - [`coverage`] — 24-hour coverage verification, gap and overlap reporting
//! - [`block`] — raw input blocks and the auxiliary image-prefix map
//! - [`show`] — the per-block extraction pipeline and station schedules
//! - [`export`] — record shapes for the JSON and tabular exports
//! - [`error`] — error types

pub mod block;
pub mod convert;
pub mod coverage;
pub mod error;
pub mod export;
pub mod range;
pub mod segment;
pub mod show;

pub use block::RawBlock;
pub use convert::{daylight_saving_active, parse_timezone, OffsetRule};
pub use coverage::{
    verify_coverage, CoverageEntry, CoverageOptions, CoverageReport, Gap, Overlap,
};
pub use error::ScheduleError;
pub use export::{export_rows, ExportRow, ScheduleDocument, ShowRecord};
pub use range::{
    resolve_time_range, ClockTime, Meridiem, ResolvedRange, TimeComponent, TimeSlot,
};
pub use segment::{clean_block_text, segment, Segmented};
pub use show::{extract_show, ExtractContext, ResolvedShow, StationSchedule};
