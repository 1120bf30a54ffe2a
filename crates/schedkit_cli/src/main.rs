//! `schedkit`: render section schedules from an offerings file into a workbook.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use schedkit_grid::{
    EnumColorScope, ReportRender, ScheduleError, ScheduleRenderer, SpecLayoutOptions,
    SpecRosterIndex, build_entries_index, build_roster_index, load_offering_records,
    load_officer_records,
};
use schedkit_io_xlsx::{SpecXlsxGridOptions, XlsxGridWriter};
use tracing::{Level, error, info};

/// Resolved command-line options of one run.
#[derive(Debug, Clone, PartialEq)]
struct SpecRunArgs {
    path_offerings: PathBuf,
    path_out: PathBuf,
    path_officers: Option<PathBuf>,
    blocks_per_sheet: Option<usize>,
    if_section_colors: bool,
    if_verbose: bool,
}

fn build_command() -> Command {
    Command::new("schedkit")
        .about("Render section schedules from an offerings JSON file into an .xlsx workbook")
        .arg(
            Arg::new("offerings")
                .help("Offerings JSON array")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Output workbook [default: <offerings stem>.xlsx]")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("officers")
                .short('m')
                .long("officers")
                .help("Officers JSON array drawn above each section")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("blocks-per-sheet")
                .long("blocks-per-sheet")
                .help("Section blocks per sheet before starting a new one")
                .value_parser(value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("section-colors")
                .long("section-colors")
                .help("Restart the color palette at every section")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log per-section details")
                .action(ArgAction::SetTrue),
        )
}

fn derive_run_args(matches: &ArgMatches) -> SpecRunArgs {
    let path_offerings = matches
        .get_one::<PathBuf>("offerings")
        .cloned()
        .unwrap_or_default();
    let path_out = matches
        .get_one::<PathBuf>("output")
        .cloned()
        .unwrap_or_else(|| derive_default_output_path(&path_offerings));
    SpecRunArgs {
        path_out,
        path_offerings,
        path_officers: matches.get_one::<PathBuf>("officers").cloned(),
        blocks_per_sheet: matches
            .get_one::<u64>("blocks-per-sheet")
            .map(|n_blocks| *n_blocks as usize),
        if_section_colors: matches.get_flag("section-colors"),
        if_verbose: matches.get_flag("verbose"),
    }
}

fn derive_default_output_path(path_offerings: &Path) -> PathBuf {
    path_offerings.with_extension("xlsx")
}

fn derive_layout_options(args: &SpecRunArgs) -> SpecLayoutOptions {
    let mut options = SpecLayoutOptions::default();
    if let Some(n_blocks) = args.blocks_per_sheet {
        options.blocks_per_sheet = n_blocks;
    }
    if args.if_section_colors {
        options.rule_color_scope = EnumColorScope::Section;
    }
    options
}

fn init_tracing(if_verbose: bool) {
    let level = if if_verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Load inputs, render every section, and save the workbook.
fn run(args: &SpecRunArgs) -> Result<ReportRender, ScheduleError> {
    let l_offerings = load_offering_records(&args.path_offerings)?;
    let dict_entries = build_entries_index(&l_offerings);
    let dict_rosters = match &args.path_officers {
        Some(path) => build_roster_index(&load_officer_records(path)?),
        None => SpecRosterIndex::new(),
    };
    info!(
        n_sections = dict_entries.len(),
        n_rosters = dict_rosters.len(),
        "inputs loaded"
    );

    let writer = XlsxGridWriter::new(args.path_out.clone(), SpecXlsxGridOptions::default());
    let mut renderer = ScheduleRenderer::new(writer, derive_layout_options(args))?;
    renderer.render_all(&dict_entries, &dict_rosters)?;
    renderer.close()?;
    info!(path = %args.path_out.display(), "workbook saved");
    Ok(renderer.report())
}

fn main() -> ExitCode {
    let matches = match build_command().try_get_matches() {
        Ok(matches) => matches,
        // clap exits with 2 on usage errors and 0 on --help/--version
        Err(err) => err.exit(),
    };
    let args = derive_run_args(&matches);
    init_tracing(args.if_verbose);

    match run(&args) {
        Ok(report) => {
            for err in &report.errors {
                println!("[SKIPPED] {err}");
            }
            for c_warning in &report.warnings {
                println!("[WARNING] {c_warning}");
            }
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "render failed");
            eprintln!("{err}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
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
                .join(format!("schedkit_cli_test_{}_{n}", std::process::id()));
            std::fs::create_dir_all(&path).expect("create test dir");
            Self { path }
        }

        fn path(&self) -> &Path {
            &self.path
        }
    }

    impl Drop for TestDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }

    fn parse(l_argv: &[&str]) -> Result<SpecRunArgs, clap::Error> {
        build_command()
            .try_get_matches_from(l_argv)
            .map(|matches| derive_run_args(&matches))
    }

    #[test]
    fn parse_args_with_defaults_and_flags() {
        let args = parse(&["schedkit", "data/offerings.json"]).expect("parse");
        assert_eq!(args.path_out, PathBuf::from("data/offerings.xlsx"));
        assert_eq!(args.path_officers, None);
        assert!(!args.if_section_colors);

        let args = parse(&[
            "schedkit",
            "in.json",
            "-o",
            "out.xlsx",
            "-m",
            "officers.json",
            "--blocks-per-sheet",
            "4",
            "--section-colors",
            "-v",
        ])
        .expect("parse");
        assert_eq!(args.path_out, PathBuf::from("out.xlsx"));
        assert_eq!(args.path_officers, Some(PathBuf::from("officers.json")));
        let options = derive_layout_options(&args);
        assert_eq!(options.blocks_per_sheet, 4);
        assert_eq!(options.rule_color_scope, EnumColorScope::Section);
        assert!(args.if_verbose);
    }

    #[test]
    fn parse_args_usage_errors() {
        assert!(parse(&["schedkit"]).is_err());
        let err = parse(&["schedkit", "in.json", "--blocks-per-sheet", "many"]).expect_err("bad");
        assert_eq!(err.exit_code(), 2);
        let err = parse(&["schedkit", "in.json", "--blocks-per-sheet", "0"]).expect_err("zero");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn run_writes_workbook_and_reports_skips() {
        let tmp = TestDir::new();
        let path_offerings = tmp.path().join("offerings.json");
        let path_officers = tmp.path().join("officers.json");
        std::fs::write(
            &path_offerings,
            r#"[
                {"section": "SS191",
                 "subject": {"code": "CS101", "name": "Intro"},
                 "subject_offering_details": [
                    {"day_of_weeks": {"day_string": "Monday"},
                     "time_start": "07:00:00", "time_end": "07:30:00", "rooms": null},
                    {"day_of_weeks": {"day_string": "Sunday"},
                     "time_start": "07:00:00", "time_end": "08:00:00", "rooms": null}
                 ]}
            ]"#,
        )
        .expect("write offerings");
        std::fs::write(
            &path_officers,
            r#"[{"section": "ORG", "officers": [{"position": "Chair", "names": ["Dee"]}]}]"#,
        )
        .expect("write officers");

        let args = SpecRunArgs {
            path_offerings,
            path_out: tmp.path().join("out.xlsx"),
            path_officers: Some(path_officers),
            blocks_per_sheet: Some(1),
            if_section_colors: false,
            if_verbose: false,
        };
        let report = run(&args).expect("run");
        assert_eq!(report.cnt_sections, 2);
        assert_eq!(report.cnt_sheets, 2);
        assert_eq!(report.cnt_entries, 1);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 1);
        assert!(args.path_out.exists());
    }

    #[test]
    fn run_missing_input_is_fatal() {
        let tmp = TestDir::new();
        let args = SpecRunArgs {
            path_offerings: tmp.path().join("missing.json"),
            path_out: tmp.path().join("out.xlsx"),
            path_officers: None,
            blocks_per_sheet: None,
            if_section_colors: false,
            if_verbose: false,
        };
        assert!(matches!(run(&args), Err(ScheduleError::Resource(_))));
        assert!(!args.path_out.exists());
    }
}
