//! Schedule data models, layout options and top-level error types.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::conf::{
    C_SHEET_NAME_DEFAULT, N_COL_DAY_FIRST, N_COL_TIME, N_MINUTE_SLOT_STEP, N_MINUTE_WINDOW_START,
    N_ROW_CURSOR_START, N_ROWS_BLOCK_PADDING, N_SCHED_BLOCKS_PER_SHEET, N_SLOTS_WINDOW,
    N_WIDTH_COL_DAY, N_WIDTH_COL_TIME, derive_default_palette,
};
use crate::time::derive_window_labels;

////////////////////////////////////////////////////////////////////////////////
// #region RawInputRecords

/// One offering record as found in the offerings JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpecRawOfferingRecord {
    /// Section label; may join aliases with `/` (e.g. `SS191/SF191`).
    pub section: String,
    /// Offered subject.
    pub subject: SpecRawSubject,
    /// Per-day meeting details.
    pub subject_offering_details: Vec<SpecRawOfferingDetail>,
}

/// Subject identity inside a raw offering record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpecRawSubject {
    /// Subject code, also the color key.
    pub code: String,
    /// Human-readable subject name.
    pub name: String,
}

/// One meeting detail inside a raw offering record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpecRawOfferingDetail {
    /// Day wrapper object.
    pub day_of_weeks: SpecRawDayOfWeek,
    /// 24-hour start time, `HH:MM:SS`.
    pub time_start: String,
    /// 24-hour end time, `HH:MM:SS`.
    pub time_end: String,
    /// Room, `null` when the meeting has none.
    #[serde(default)]
    pub rooms: Option<SpecRawRoom>,
}

/// Day wrapper object inside a raw detail.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpecRawDayOfWeek {
    /// Day name as provided by the source (e.g. `Monday`).
    pub day_string: String,
}

/// Room wrapper object inside a raw detail.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpecRawRoom {
    /// Room code.
    pub code: String,
}

/// One record of the optional officers JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpecOfficerRecord {
    /// Section the roster belongs to.
    pub section: String,
    /// Ordered officer rows.
    pub officers: Vec<SpecOfficer>,
}

/// One roster row: a position and the people holding it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpecOfficer {
    /// Position label (e.g. `President`).
    pub position: String,
    /// Names, rendered comma-joined.
    pub names: Vec<String>,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region NormalizedModels

/// Weekday columns of a schedule block, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EnumWeekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl EnumWeekday {
    /// All drawable days in column order.
    pub const ALL: [EnumWeekday; 6] = [
        EnumWeekday::Monday,
        EnumWeekday::Tuesday,
        EnumWeekday::Wednesday,
        EnumWeekday::Thursday,
        EnumWeekday::Friday,
        EnumWeekday::Saturday,
    ];

    /// Zero-based column offset of this day.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Display name used in day headers.
    pub fn name(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
        }
    }

    /// Resolve a source day string: full name or three-letter abbreviation,
    /// case-insensitive.
    pub fn from_day_string(day_string: &str) -> Option<Self> {
        let c_day = day_string.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|enum_day| {
            let c_name = enum_day.name().to_ascii_lowercase();
            c_day == c_name || c_day == c_name[..3]
        })
    }
}

impl fmt::Display for EnumWeekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-day meeting data kept in the entries index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSubjectSchedule {
    /// Raw 24-hour start time.
    pub time_start: String,
    /// Raw 24-hour end time.
    pub time_end: String,
    /// Room code or the `N/A` fallback.
    pub room: String,
}

/// Subject entry before bucketing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSubjectEntry {
    pub code: String,
    pub name: String,
    /// Day name -> meeting. Spellings of one day share a key, and a repeated
    /// day overwrites the earlier one.
    pub schedules: IndexMap<String, SpecSubjectSchedule>,
}

/// Section name -> subject entries, in first-seen section order.
///
/// Aliased sections share the same [`Arc`] subject entries.
pub type SpecEntriesIndex = IndexMap<String, Vec<Arc<SpecSubjectEntry>>>;

/// Section name -> officer rows, in first-seen section order.
pub type SpecRosterIndex = IndexMap<String, Vec<SpecOfficer>>;

/// One placed meeting of a subject on one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecScheduleEntry {
    pub name: String,
    pub code: String,
    pub room: String,
    /// Inclusive start slot index.
    pub time_start_interval: usize,
    /// Exclusive end slot index; always greater than the start.
    pub time_end_interval: usize,
    /// `hh:mm AM - hh:mm PM` text shown inside the block.
    pub display_time: String,
}

impl SpecScheduleEntry {
    /// Number of half-hour rows covered.
    pub fn span(&self) -> usize {
        self.time_end_interval - self.time_start_interval
    }
}

/// Six day buckets, each sorted by start interval.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecSectionBuckets {
    buckets: [Vec<SpecScheduleEntry>; 6],
}

impl SpecSectionBuckets {
    /// Entries of one day, ascending by start interval.
    pub fn day(&self, enum_day: EnumWeekday) -> &[SpecScheduleEntry] {
        &self.buckets[enum_day.index()]
    }

    /// Iterate `(day, entries)` in column order.
    pub fn iter(&self) -> impl Iterator<Item = (EnumWeekday, &[SpecScheduleEntry])> {
        EnumWeekday::ALL
            .into_iter()
            .map(|enum_day| (enum_day, self.day(enum_day)))
    }

    /// Total number of entries across all days.
    pub fn n_entries(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.n_entries() == 0
    }

    /// Append to a day bucket, keeping it stably sorted by start interval.
    pub(crate) fn insert(&mut self, enum_day: EnumWeekday, entry: SpecScheduleEntry) {
        let l_bucket = &mut self.buckets[enum_day.index()];
        l_bucket.push(entry);
        l_bucket.sort_by_key(|entry| entry.time_start_interval);
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region LayoutOptions

/// Modeled operating day: `n_slots` labels from `minute_start`, `minute_step` apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecTimeWindow {
    /// First slot, minutes after midnight (420 = 07:00 AM).
    pub minute_start: u32,
    /// Minutes between slots.
    pub minute_step: u32,
    /// Number of slot labels.
    pub n_slots: usize,
}

impl Default for SpecTimeWindow {
    fn default() -> Self {
        Self {
            minute_start: N_MINUTE_WINDOW_START,
            minute_step: N_MINUTE_SLOT_STEP,
            n_slots: N_SLOTS_WINDOW,
        }
    }
}

impl SpecTimeWindow {
    /// Minute of day of slot `idx`.
    pub fn minute_of_slot(&self, idx: usize) -> u32 {
        self.minute_start + idx as u32 * self.minute_step
    }

    /// Canonical `hh:mm AM/PM` slot labels.
    pub fn labels(&self) -> Vec<String> {
        derive_window_labels(self)
    }
}

/// Horizontal alignment of a styled cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnumCellAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Sink-neutral cell style.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellStyle {
    pub bold: bool,
    pub align: EnumCellAlign,
    /// `#RRGGBB` fill.
    pub bg_color: Option<String>,
    pub indent: u8,
    /// Thin top border, marks the first row of a block.
    pub border_top: bool,
}

/// Lifetime of subject color assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumColorScope {
    /// One table for the whole rendering pass.
    #[default]
    Pass,
    /// Table reset at each section block.
    Section,
}

/// Geometry and styling options for one rendering pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecLayoutOptions {
    /// First metadata row on every sheet.
    pub row_start: usize,
    /// Column holding time labels and metadata titles.
    pub col_time: usize,
    /// Column of Monday; the other days follow.
    pub col_day_first: usize,
    /// Blank rows between stacked blocks.
    pub n_rows_padding: usize,
    /// Maximum section blocks per sheet before rotating.
    pub blocks_per_sheet: usize,
    pub width_col_time: f64,
    pub width_col_day: f64,
    /// Base sheet name; sheets are named `<base>_<n>`.
    pub sheet_name: String,
    /// Draw the section title and roster rows above each block.
    pub if_draw_metadata: bool,
    /// Ordered block fill colors.
    pub palette: Vec<String>,
    pub rule_color_scope: EnumColorScope,
    pub window: SpecTimeWindow,
}

impl Default for SpecLayoutOptions {
    fn default() -> Self {
        Self {
            row_start: N_ROW_CURSOR_START,
            col_time: N_COL_TIME,
            col_day_first: N_COL_DAY_FIRST,
            n_rows_padding: N_ROWS_BLOCK_PADDING,
            blocks_per_sheet: N_SCHED_BLOCKS_PER_SHEET,
            width_col_time: N_WIDTH_COL_TIME,
            width_col_day: N_WIDTH_COL_DAY,
            sheet_name: C_SHEET_NAME_DEFAULT.to_string(),
            if_draw_metadata: true,
            palette: derive_default_palette(),
            rule_color_scope: EnumColorScope::Pass,
            window: SpecTimeWindow::default(),
        }
    }
}

/// Where one section block landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecBlockPlacement {
    /// 1-based sheet number.
    pub n_sheet: usize,
    /// Row of the section title (or of the day headers without metadata).
    pub row_metadata: usize,
    /// Row of the day headers; slot `i` sits on `row_header + 1 + i`.
    pub row_header: usize,
    /// Cursor for the next block on the same sheet.
    pub row_next: usize,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// One skipped schedule entry with its identifying context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecEntryError {
    pub section: String,
    pub code: String,
    /// Raw day string of the failing detail.
    pub day: String,
    /// User-facing error text.
    pub exception: String,
}

impl fmt::Display for SpecEntryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "section={} code={} day={}: {}",
            self.section, self.code, self.day, self.exception
        )
    }
}

/// Normalization/layout failure kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// Time string does not match the expected clock format, or the entry
    /// collapses to an empty interval.
    Format(String),
    /// Unknown section or day key.
    Lookup(String),
    /// Palette exhausted, invalid options, or a time outside the modeled day.
    Configuration(String),
    /// Sink or file I/O failure.
    Resource(String),
    /// Malformed JSON input.
    Decode(String),
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format(msg) => write!(f, "Format error: {msg}"),
            Self::Lookup(msg) => write!(f, "Lookup error: {msg}"),
            Self::Configuration(msg) => write!(f, "Configuration error: {msg}"),
            Self::Resource(msg) => write!(f, "Resource error: {msg}"),
            Self::Decode(msg) => write!(f, "Decode error: {msg}"),
        }
    }
}

impl std::error::Error for ScheduleError {}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_resolves_names_and_abbreviations() {
        assert_eq!(
            EnumWeekday::from_day_string("Monday"),
            Some(EnumWeekday::Monday)
        );
        assert_eq!(
            EnumWeekday::from_day_string(" thu "),
            Some(EnumWeekday::Thursday)
        );
        assert_eq!(
            EnumWeekday::from_day_string("SATURDAY"),
            Some(EnumWeekday::Saturday)
        );
        assert_eq!(EnumWeekday::from_day_string("Sunday"), None);
        assert_eq!(EnumWeekday::from_day_string("M"), None);
    }

    #[test]
    fn raw_record_decodes_null_room() {
        let c_json = r#"{
            "section": "SS191",
            "subject": {"code": "CS101", "name": "Intro"},
            "subject_offering_details": [
                {"day_of_weeks": {"day_string": "Monday"},
                 "time_start": "07:00:00", "time_end": "07:30:00", "rooms": null}
            ]
        }"#;
        let record: SpecRawOfferingRecord = serde_json::from_str(c_json).expect("decode");
        assert_eq!(record.subject_offering_details[0].rooms, None);
        assert_eq!(
            record.subject_offering_details[0].day_of_weeks.day_string,
            "Monday"
        );
    }

    #[test]
    fn buckets_insert_is_stable_by_start() {
        let mk = |code: &str, n_start: usize| SpecScheduleEntry {
            name: String::new(),
            code: code.to_string(),
            room: "N/A".to_string(),
            time_start_interval: n_start,
            time_end_interval: n_start + 1,
            display_time: String::new(),
        };
        let mut buckets = SpecSectionBuckets::default();
        buckets.insert(EnumWeekday::Friday, mk("B", 4));
        buckets.insert(EnumWeekday::Friday, mk("A", 2));
        buckets.insert(EnumWeekday::Friday, mk("C", 4));

        let l_codes: Vec<&str> = buckets
            .day(EnumWeekday::Friday)
            .iter()
            .map(|entry| entry.code.as_str())
            .collect();
        assert_eq!(l_codes, vec!["A", "B", "C"]);
        assert_eq!(buckets.n_entries(), 3);
        assert!(buckets.day(EnumWeekday::Monday).is_empty());
    }
}
