//! Layout constants and default preset factories.

use crate::spec::{SpecLayoutOptions, SpecTimeWindow};

/// First metadata row of every sheet.
pub const N_ROW_CURSOR_START: usize = 3;
/// Column of time labels, titles and roster positions.
pub const N_COL_TIME: usize = 1;
/// Column of Monday.
pub const N_COL_DAY_FIRST: usize = 2;
/// Number of day columns per block.
pub const N_DAYS_PER_BLOCK: usize = 6;
/// Blank rows between stacked blocks.
pub const N_ROWS_BLOCK_PADDING: usize = 2;
/// Section blocks drawn on one sheet before a new sheet is started.
pub const N_SCHED_BLOCKS_PER_SHEET: usize = 12;

/// 07:00 AM.
pub const N_MINUTE_WINDOW_START: u32 = 7 * 60;
pub const N_MINUTE_SLOT_STEP: u32 = 30;
/// 07:00 AM through 06:00 PM inclusive.
pub const N_SLOTS_WINDOW: usize = 23;

pub const N_WIDTH_COL_TIME: f64 = 12.0;
pub const N_WIDTH_COL_DAY: f64 = 18.0;
/// Indent level of time labels.
pub const N_INDENT_TIME_LABEL: u8 = 1;

/// Room text for meetings without a room.
pub const C_ROOM_FALLBACK: &str = "N/A";
/// Delimiter joining section aliases.
pub const C_SECTION_DELIMITER: char = '/';
pub const C_SHEET_NAME_DEFAULT: &str = "Schedules";

/// Block fill colors, assigned in order.
pub const TUP_SCHED_PALETTE: [&str; 12] = [
    "#F4CCCC", "#FCE5CD", "#FFF2CC", "#D9EAD3", "#D0E0E3", "#CFE2F3", "#D9D2E9", "#EAD1DC",
    "#E6B8AF", "#B6D7A8", "#A2C4C9", "#B4A7D6",
];

/// Build the default block palette.
pub fn derive_default_palette() -> Vec<String> {
    TUP_SCHED_PALETTE.iter().map(ToString::to_string).collect()
}

/// Build the default operating window.
pub fn derive_default_time_window() -> SpecTimeWindow {
    SpecTimeWindow::default()
}

/// Build default layout options.
pub fn derive_default_layout_options() -> SpecLayoutOptions {
    SpecLayoutOptions::default()
}
