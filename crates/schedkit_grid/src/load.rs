//! JSON input loading for offerings and officer rosters.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::spec::{ScheduleError, SpecOfficerRecord, SpecRawOfferingRecord, SpecRosterIndex};

/// Decode an offerings JSON array.
pub fn parse_offering_records(c_json: &str) -> Result<Vec<SpecRawOfferingRecord>, ScheduleError> {
    serde_json::from_str(c_json)
        .map_err(|err| ScheduleError::Decode(format!("Invalid offerings JSON: {err}")))
}

/// Read and decode an offerings file.
pub fn load_offering_records(path: &Path) -> Result<Vec<SpecRawOfferingRecord>, ScheduleError> {
    let c_json = read_text(path)?;
    let l_records = parse_offering_records(&c_json)?;
    info!(path = %path.display(), n_records = l_records.len(), "loaded offering records");
    Ok(l_records)
}

/// Decode an officers JSON array.
pub fn parse_officer_records(c_json: &str) -> Result<Vec<SpecOfficerRecord>, ScheduleError> {
    serde_json::from_str(c_json)
        .map_err(|err| ScheduleError::Decode(format!("Invalid officers JSON: {err}")))
}

/// Read and decode an officers file.
pub fn load_officer_records(path: &Path) -> Result<Vec<SpecOfficerRecord>, ScheduleError> {
    let c_json = read_text(path)?;
    let l_records = parse_officer_records(&c_json)?;
    info!(path = %path.display(), n_records = l_records.len(), "loaded officer records");
    Ok(l_records)
}

/// Group officer rows by trimmed section name; repeated sections append.
/// Composite names are kept whole.
pub fn build_roster_index(l_records: &[SpecOfficerRecord]) -> SpecRosterIndex {
    let mut dict_rosters = SpecRosterIndex::new();
    for record in l_records {
        dict_rosters
            .entry(record.section.trim().to_string())
            .or_default()
            .extend(record.officers.iter().cloned());
    }
    dict_rosters
}

fn read_text(path: &Path) -> Result<String, ScheduleError> {
    fs::read_to_string(path)
        .map_err(|err| ScheduleError::Resource(format!("Failed to read {}: {err}", path.display())))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    struct TestDir {
        path: PathBuf,
    }

    impl TestDir {
        fn new() -> Self {
            let n = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock")
                .as_nanos();
            let path = std::env::temp_dir()
                .join(format!("schedkit_load_test_{}_{n}", std::process::id()));
            fs::create_dir_all(&path).expect("create test dir");
            Self { path }
        }

        fn path(&self) -> &Path {
            &self.path
        }
    }

    impl Drop for TestDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.path);
        }
    }

    const C_OFFERINGS: &str = r#"[
        {
            "section": "SS191/SF191",
            "subject": {"code": "CS101", "name": "Intro to Computing"},
            "subject_offering_details": [
                {"day_of_weeks": {"day_string": "Monday"},
                 "time_start": "07:00:00", "time_end": "08:30:00",
                 "rooms": {"code": "R101"}, "extra": 1}
            ]
        }
    ]"#;

    #[test]
    fn load_offering_records_reads_file() {
        let tmp = TestDir::new();
        let path = tmp.path().join("offerings.json");
        fs::write(&path, C_OFFERINGS).unwrap();

        let l_records = load_offering_records(&path).unwrap();
        assert_eq!(l_records.len(), 1);
        assert_eq!(l_records[0].section, "SS191/SF191");
        assert_eq!(
            l_records[0].subject_offering_details[0]
                .rooms
                .as_ref()
                .map(|room| room.code.as_str()),
            Some("R101")
        );
    }

    #[test]
    fn load_errors_are_typed() {
        let tmp = TestDir::new();
        let err = load_offering_records(&tmp.path().join("missing.json")).expect_err("missing");
        assert!(matches!(err, ScheduleError::Resource(_)));

        let err = parse_offering_records(r#"[{"section": "A"}]"#).expect_err("missing keys");
        assert!(matches!(err, ScheduleError::Decode(_)));
        let err = parse_officer_records("not json").expect_err("garbage");
        assert!(matches!(err, ScheduleError::Decode(_)));
    }

    #[test]
    fn build_roster_index_trims_and_appends() {
        let l_records = parse_officer_records(
            r#"[
                {"section": " SS191 ", "officers": [{"position": "President", "names": ["Ana"]}]},
                {"section": "SF191/SS191", "officers": []},
                {"section": "SS191",
                 "officers": [{"position": "Secretary", "names": ["Ben", "Cy"]}]}
            ]"#,
        )
        .unwrap();
        let dict_rosters = build_roster_index(&l_records);

        assert_eq!(
            dict_rosters.keys().collect::<Vec<_>>(),
            vec!["SS191", "SF191/SS191"]
        );
        let l_positions: Vec<&str> = dict_rosters["SS191"]
            .iter()
            .map(|officer| officer.position.as_str())
            .collect();
        assert_eq!(l_positions, vec!["President", "Secretary"]);
    }
}
