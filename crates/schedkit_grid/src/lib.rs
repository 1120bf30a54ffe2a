//! `schedkit_grid` v1:
//! Section schedule normalization and grid layout kernel.
//!
//! Architecture:
//! - `conf`   : constants and default presets
//! - `spec`   : input records, normalized models, options, errors
//! - `time`   : clock conversion and interval lookup
//! - `ripper` : offering normalization and day bucketing
//! - `color`  : subject color assignment
//! - `sink`   : grid sink capability and in-memory sink
//! - `layout` : section block renderer
//! - `load`   : JSON input loading
//! - `report` : run-time report model

pub mod color;
pub mod conf;
pub mod layout;
pub mod load;
pub mod report;
pub mod ripper;
pub mod sink;
pub mod spec;
pub mod time;

pub use color::ColorAssigner;
pub use conf::{
    C_ROOM_FALLBACK, C_SECTION_DELIMITER, C_SHEET_NAME_DEFAULT, N_DAYS_PER_BLOCK,
    TUP_SCHED_PALETTE, derive_default_layout_options, derive_default_palette,
    derive_default_time_window,
};
pub use layout::{ScheduleRenderer, plan_block_lines, validate_layout_options};
pub use load::{
    build_roster_index, load_offering_records, load_officer_records, parse_offering_records,
    parse_officer_records,
};
pub use report::{ReportRender, ReportRenderBuilder};
pub use ripper::{
    bucketize_section, build_entries_index, derive_schedule_entry, split_section_aliases,
};
pub use sink::{GridSink, MemoryGridSink, SpecGridWrite, SpecMemorySheet};
pub use spec::{
    EnumCellAlign, EnumColorScope, EnumWeekday, ScheduleError, SpecBlockPlacement, SpecCellStyle,
    SpecEntriesIndex, SpecEntryError, SpecLayoutOptions, SpecOfficer, SpecOfficerRecord,
    SpecRawDayOfWeek, SpecRawOfferingDetail, SpecRawOfferingRecord, SpecRawRoom, SpecRawSubject,
    SpecRosterIndex, SpecScheduleEntry, SpecSectionBuckets, SpecSubjectEntry, SpecSubjectSchedule,
    SpecTimeWindow,
};
pub use time::{
    convert_military_to_display, derive_interval_index, derive_window_labels, format_display_time,
    parse_display_time, parse_military_time,
};
