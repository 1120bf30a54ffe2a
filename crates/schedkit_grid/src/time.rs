//! Clock-string conversion and half-hour interval quantization.

use std::sync::LazyLock;

use regex::Regex;

use crate::spec::{ScheduleError, SpecTimeWindow};

static RE_MILITARY_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{2}):([0-9]{2}):([0-9]{2})$").expect("static regex"));
static RE_DISPLAY_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,2}):([0-9]{2})\s*([AaPp][Mm])$").expect("static regex")
});

const N_MINUTES_PER_DAY: u32 = 24 * 60;
const N_MINUTES_HALF_DAY: u32 = 12 * 60;

////////////////////////////////////////////////////////////////////////////////
// #region ClockParsing

/// Parse strict `HH:MM:SS` into `(hour, minute)`; seconds are validated and dropped.
pub fn parse_military_time(military: &str) -> Result<(u32, u32), ScheduleError> {
    let Some(caps) = RE_MILITARY_TIME.captures(military.trim()) else {
        return Err(ScheduleError::Format(format!(
            "Expected HH:MM:SS time, got {military:?}."
        )));
    };
    let n_hour = parse_clock_field(&caps[1], military)?;
    let n_minute = parse_clock_field(&caps[2], military)?;
    let n_second = parse_clock_field(&caps[3], military)?;
    if n_hour > 23 || n_minute > 59 || n_second > 59 {
        return Err(ScheduleError::Format(format!(
            "Invalid clock value in {military:?}."
        )));
    }
    Ok((n_hour, n_minute))
}

/// Parse `hh:mm AM/PM` (meridiem case-insensitive) into 24-hour `(hour, minute)`.
pub fn parse_display_time(display: &str) -> Result<(u32, u32), ScheduleError> {
    let Some(caps) = RE_DISPLAY_TIME.captures(display.trim()) else {
        return Err(ScheduleError::Format(format!(
            "Expected hh:mm AM/PM time, got {display:?}."
        )));
    };
    let n_hour12 = parse_clock_field(&caps[1], display)?;
    let n_minute = parse_clock_field(&caps[2], display)?;
    if !(1..=12).contains(&n_hour12) || n_minute > 59 {
        return Err(ScheduleError::Format(format!(
            "Invalid clock value in {display:?}."
        )));
    }

    let if_is_pm = caps[3].eq_ignore_ascii_case("pm");
    let n_hour = match (n_hour12, if_is_pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, false) => h,
        (h, true) => h + 12,
    };
    Ok((n_hour, n_minute))
}

fn parse_clock_field(field: &str, source: &str) -> Result<u32, ScheduleError> {
    field
        .parse::<u32>()
        .map_err(|err| ScheduleError::Format(format!("Bad clock field in {source:?}: {err}")))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region DisplayFormatting

/// Format minutes after midnight as `hh:mm AM/PM`.
pub fn format_display_time(minute_of_day: u32) -> String {
    let n_minute_of_day = minute_of_day % N_MINUTES_PER_DAY;
    let n_hour = n_minute_of_day / 60;
    let n_minute = n_minute_of_day % 60;
    let c_meridiem = if n_hour < 12 { "AM" } else { "PM" };
    let n_hour12 = match n_hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{n_hour12:02}:{n_minute:02} {c_meridiem}")
}

/// Convert `HH:MM:SS` into the canonical `hh:mm AM/PM` display string.
pub fn convert_military_to_display(military: &str) -> Result<String, ScheduleError> {
    let (n_hour, n_minute) = parse_military_time(military)?;
    Ok(format_display_time(n_hour * 60 + n_minute))
}

/// Canonical slot labels of `window`, first slot first.
pub fn derive_window_labels(window: &SpecTimeWindow) -> Vec<String> {
    (0..window.n_slots)
        .map(|idx| format_display_time(window.minute_of_slot(idx)))
        .collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region IntervalLookup

/// Resolve a display time to its slot index in `window_labels`.
///
/// Exact label matches win. Otherwise the time is corrected:
/// 1. a time earlier than the first slot is read as its PM equivalent;
/// 2. the first slot at or after the (corrected) time is returned.
///
/// A time past the last slot has no slot and is a configuration error.
pub fn derive_interval_index(
    display: &str,
    window_labels: &[String],
) -> Result<usize, ScheduleError> {
    if let Some(idx) = window_labels.iter().position(|label| label == display) {
        return Ok(idx);
    }

    let l_slot_minutes = window_labels
        .iter()
        .map(|label| parse_display_time(label).map(|(h, m)| h * 60 + m))
        .collect::<Result<Vec<_>, _>>()?;
    let (Some(&n_minute_first), Some(&n_minute_last)) =
        (l_slot_minutes.first(), l_slot_minutes.last())
    else {
        return Err(ScheduleError::Configuration(
            "Time window has no slots.".to_string(),
        ));
    };

    let (n_hour, n_minute) = parse_display_time(display)?;
    let mut n_minute_of_day = n_hour * 60 + n_minute;
    if n_minute_of_day < n_minute_first && n_minute_of_day < N_MINUTES_HALF_DAY {
        n_minute_of_day += N_MINUTES_HALF_DAY;
    }

    l_slot_minutes
        .iter()
        .position(|&n_slot_minute| n_slot_minute >= n_minute_of_day)
        .ok_or_else(|| {
            ScheduleError::Configuration(format!(
                "Time {display:?} falls outside the modeled day ({} - {}).",
                format_display_time(n_minute_first),
                format_display_time(n_minute_last)
            ))
        })
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
