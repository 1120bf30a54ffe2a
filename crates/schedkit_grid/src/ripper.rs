//! Offering normalization: raw records -> entries index -> per-day buckets.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::conf::{C_ROOM_FALLBACK, C_SECTION_DELIMITER};
use crate::report::ReportRenderBuilder;
use crate::spec::{
    EnumWeekday, ScheduleError, SpecEntriesIndex, SpecRawOfferingRecord, SpecScheduleEntry,
    SpecSectionBuckets, SpecSubjectEntry, SpecSubjectSchedule,
};
use crate::time::{convert_military_to_display, derive_interval_index};

////////////////////////////////////////////////////////////////////////////////
// #region EntriesIndex

/// Build the section -> subjects index from raw offering records.
///
/// Composite labels (`A/B`) register one shared subject entry under every
/// alias. Within one record a repeated day overwrites the earlier detail.
pub fn build_entries_index(l_records: &[SpecRawOfferingRecord]) -> SpecEntriesIndex {
    let mut dict_entries = SpecEntriesIndex::new();

    for record in l_records {
        let l_sections = split_section_aliases(&record.section);
        if l_sections.is_empty() {
            warn!(
                code = %record.subject.code,
                "offering record has an empty section label; skipped"
            );
            continue;
        }

        let subject_entry = Arc::new(derive_subject_entry(record));
        for c_section in l_sections {
            dict_entries
                .entry(c_section)
                .or_default()
                .push(Arc::clone(&subject_entry));
        }
    }

    debug!(
        n_records = l_records.len(),
        n_sections = dict_entries.len(),
        "built entries index"
    );
    dict_entries
}

/// Trim a section label and split it into its aliases.
pub fn split_section_aliases(section: &str) -> Vec<String> {
    let c_section = section.trim();
    if !c_section.contains(C_SECTION_DELIMITER) {
        return if c_section.is_empty() {
            vec![]
        } else {
            vec![c_section.to_string()]
        };
    }

    c_section
        .split(C_SECTION_DELIMITER)
        .map(str::trim)
        .filter(|c_alias| !c_alias.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn derive_subject_entry(record: &SpecRawOfferingRecord) -> SpecSubjectEntry {
    let mut dict_schedules = IndexMap::new();
    for detail in &record.subject_offering_details {
        let c_room = match &detail.rooms {
            Some(room) => room.code.clone(),
            None => C_ROOM_FALLBACK.to_string(),
        };
        dict_schedules.insert(
            derive_day_key(&detail.day_of_weeks.day_string),
            SpecSubjectSchedule {
                time_start: detail.time_start.clone(),
                time_end: detail.time_end.clone(),
                room: c_room,
            },
        );
    }

    SpecSubjectEntry {
        code: record.subject.code.clone(),
        name: record.subject.name.clone(),
        schedules: dict_schedules,
    }
}

/// Canonical day name when the day resolves, the trimmed raw string otherwise.
fn derive_day_key(day_string: &str) -> String {
    match EnumWeekday::from_day_string(day_string) {
        Some(enum_day) => enum_day.name().to_string(),
        None => day_string.trim().to_string(),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Bucketing

/// Build the six sorted day buckets of `section`.
///
/// Returns [`ScheduleError::Lookup`] when the section is not indexed. A
/// failing entry (bad time, unknown day, out-of-window time, empty interval)
/// is skipped and recorded in `report` with its section/code/day context.
pub fn bucketize_section(
    dict_entries: &SpecEntriesIndex,
    section: &str,
    window_labels: &[String],
    report: &mut ReportRenderBuilder,
) -> Result<SpecSectionBuckets, ScheduleError> {
    let Some(l_subjects) = dict_entries.get(section) else {
        return Err(ScheduleError::Lookup(format!(
            "Section not found: {section:?}"
        )));
    };

    let mut buckets = SpecSectionBuckets::default();
    for subject in l_subjects {
        for (c_day, schedule) in &subject.schedules {
            match derive_schedule_entry(subject, c_day, schedule, window_labels) {
                Ok((enum_day, entry)) => buckets.insert(enum_day, entry),
                Err(err) => {
                    warn!(
                        section,
                        code = %subject.code,
                        day = %c_day,
                        error = %err,
                        "schedule entry skipped"
                    );
                    report.add_entry_error(section, &subject.code, c_day, err.to_string());
                }
            }
        }
    }

    Ok(buckets)
}

/// Resolve one `(subject, day, detail)` triple into a placed entry.
pub fn derive_schedule_entry(
    subject: &SpecSubjectEntry,
    day: &str,
    schedule: &SpecSubjectSchedule,
    window_labels: &[String],
) -> Result<(EnumWeekday, SpecScheduleEntry), ScheduleError> {
    let enum_day = EnumWeekday::from_day_string(day)
        .ok_or_else(|| ScheduleError::Lookup(format!("Unrecognized day: {day:?}")))?;

    let c_display_start = convert_military_to_display(&schedule.time_start)?;
    let c_display_end = convert_military_to_display(&schedule.time_end)?;
    let n_idx_start = derive_interval_index(&c_display_start, window_labels)?;
    let n_idx_end = derive_interval_index(&c_display_end, window_labels)?;
    if n_idx_start >= n_idx_end {
        return Err(ScheduleError::Format(format!(
            "Empty interval {c_display_start} - {c_display_end} (slots {n_idx_start}..{n_idx_end})."
        )));
    }

    Ok((
        enum_day,
        SpecScheduleEntry {
            name: subject.name.clone(),
            code: subject.code.clone(),
            room: schedule.room.clone(),
            time_start_interval: n_idx_start,
            time_end_interval: n_idx_end,
            display_time: format!("{c_display_start} - {c_display_end}"),
        },
    ))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
