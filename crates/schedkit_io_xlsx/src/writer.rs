//! XLSX grid writer: a [`GridSink`] buffered in a `rust_xlsxwriter` workbook.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, XlsxError};
use schedkit_grid::{GridSink, SpecCellStyle};
use tracing::debug;

use crate::conf::{N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX};
use crate::spec::{SpecCellFormat, SpecXlsxGridOptions};
use crate::util::{
    cast_col_num, derive_format_from_style, sanitize_sheet_name, validate_cell_position,
};

/// Stateful workbook writer.
pub struct XlsxGridWriter {
    path_file_out: PathBuf,
    workbook: Workbook,
    options: SpecXlsxGridOptions,
    l_formats: Vec<Format>,
    l_sheet_names: Vec<String>,
    set_sheet_names_existing: BTreeSet<String>,
    if_closed: bool,
}

impl XlsxGridWriter {
    /// Create writer bound to output path.
    ///
    /// The workbook is buffered in memory until [`Self::close`] is called.
    pub fn new(path_file_out: PathBuf, options: SpecXlsxGridOptions) -> Self {
        Self {
            path_file_out,
            workbook: Workbook::new(),
            options,
            l_formats: Vec::new(),
            l_sheet_names: Vec::new(),
            set_sheet_names_existing: BTreeSet::new(),
            if_closed: false,
        }
    }

    /// Return output file path.
    pub fn file_out(&self) -> &Path {
        &self.path_file_out
    }

    /// Final (sanitized, unique) sheet names in creation order.
    pub fn sheet_names(&self) -> &[String] {
        &self.l_sheet_names
    }

    /// Flush workbook to disk. Idempotent.
    pub fn close(&mut self) -> Result<(), String> {
        if self.if_closed {
            return Ok(());
        }
        self.workbook
            .save(&self.path_file_out)
            .map_err(derive_xlsx_error_text)?;
        self.if_closed = true;
        debug!(
            path = %self.path_file_out.display(),
            n_sheets = self.l_sheet_names.len(),
            "saved workbook"
        );
        Ok(())
    }

    fn validate_open(&self) -> Result<(), String> {
        if self.if_closed {
            return Err("Workbook already closed.".to_string());
        }
        Ok(())
    }

    fn derive_current_sheet_index(&self) -> Result<usize, String> {
        self.validate_open()?;
        self.l_sheet_names
            .len()
            .checked_sub(1)
            .ok_or_else(|| "No sheet opened.".to_string())
    }

    fn derive_unique_sheet_name(&mut self, name: &str) -> String {
        if !self.set_sheet_names_existing.contains(name) {
            self.set_sheet_names_existing.insert(name.to_string());
            return name.to_string();
        }

        let base_name: String = name
            .chars()
            .take(usize::max(1, N_LEN_EXCEL_SHEET_NAME_MAX - 3))
            .collect();

        let mut n_idx = 2usize;
        loop {
            let candidate: String = format!("{base_name}__{n_idx}")
                .chars()
                .take(N_LEN_EXCEL_SHEET_NAME_MAX)
                .collect();
            if !self.set_sheet_names_existing.contains(&candidate) {
                self.set_sheet_names_existing.insert(candidate.clone());
                return candidate;
            }
            n_idx += 1;
        }
    }
}

impl GridSink for XlsxGridWriter {
    fn new_sheet(&mut self, sheet_name: &str) -> Result<(), String> {
        self.validate_open()?;
        let c_sanitized = sanitize_sheet_name(sheet_name, &self.options.sheet_name_replace);
        let c_name = self.derive_unique_sheet_name(&c_sanitized);

        let worksheet = self.workbook.add_worksheet();
        worksheet.set_name(&c_name).map_err(derive_xlsx_error_text)?;
        self.l_sheet_names.push(c_name);
        Ok(())
    }

    fn set_column_width(
        &mut self,
        col_first: usize,
        col_last: usize,
        width: f64,
    ) -> Result<(), String> {
        let n_idx_sheet = self.derive_current_sheet_index()?;
        if col_last >= N_NCOLS_EXCEL_MAX {
            return Err(format!(
                "Column {col_last} exceeds Excel limit of {N_NCOLS_EXCEL_MAX} columns."
            ));
        }
        let worksheet = self
            .workbook
            .worksheet_from_index(n_idx_sheet)
            .map_err(derive_xlsx_error_text)?;
        for n_col in col_first..=col_last {
            worksheet
                .set_column_width(cast_col_num(n_col)?, width)
                .map_err(derive_xlsx_error_text)?;
        }
        Ok(())
    }

    fn define_style(&mut self, style: &SpecCellStyle) -> Result<usize, String> {
        let fmt = self.options.fmt_base.with_(derive_format_from_style(style));
        self.l_formats.push(derive_rust_xlsx_format(&fmt));
        Ok(self.l_formats.len() - 1)
    }

    fn write_cell(
        &mut self,
        row: usize,
        col: usize,
        content: &str,
        style_id: usize,
    ) -> Result<(), String> {
        let n_idx_sheet = self.derive_current_sheet_index()?;
        let (n_row, n_col) = validate_cell_position(row, col)?;
        let format = self
            .l_formats
            .get(style_id)
            .ok_or_else(|| format!("Unknown style handle: {style_id}"))?;
        let worksheet = self
            .workbook
            .worksheet_from_index(n_idx_sheet)
            .map_err(derive_xlsx_error_text)?;

        if content.is_empty() {
            worksheet
                .write_blank(n_row, n_col, format)
                .map_err(derive_xlsx_error_text)?;
        } else {
            worksheet
                .write_string_with_format(n_row, n_col, content, format)
                .map_err(derive_xlsx_error_text)?;
        }
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), String> {
        self.close()
    }
}

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.clone());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val as f64);
    }
    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }

    if let Some(val) = &spec.align
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = &spec.valign
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = spec.indent {
        format = format.set_indent(val);
    }

    if let Some(val) = &spec.bg_color {
        format = format.set_background_color(val.as_str());
    }

    if let Some(val) = spec.border {
        format = format.set_border(derive_format_border(val));
    }
    if let Some(val) = spec.top {
        format = format.set_border_top(derive_format_border(val));
    }

    format
}

fn derive_format_border(border: i64) -> FormatBorder {
    match border {
        1 => FormatBorder::Thin,
        2 => FormatBorder::Medium,
        3 => FormatBorder::Dashed,
        4 => FormatBorder::Dotted,
        5 => FormatBorder::Thick,
        6 => FormatBorder::Double,
        7 => FormatBorder::Hair,
        _ => FormatBorder::None,
    }
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    let value = align.trim().to_ascii_lowercase();
    match value.as_str() {
        "general" => Some(FormatAlign::General),
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        "top" => Some(FormatAlign::Top),
        "bottom" => Some(FormatAlign::Bottom),
        "vcenter" | "vertical_center" => Some(FormatAlign::VerticalCenter),
        _ => None,
    }
}

fn derive_xlsx_error_text(err: XlsxError) -> String {
    format!("xlsx write error: {err}")
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use schedkit_grid::{
        ScheduleError, ScheduleRenderer, SpecLayoutOptions, SpecRosterIndex, build_entries_index,
        parse_offering_records,
    };

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
                .join(format!("schedkit_xlsx_test_{}_{n}", std::process::id()));
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

    const C_OFFERINGS: &str = r#"[
        {"section": "SS191/SF191",
         "subject": {"code": "CS101", "name": "Intro to Computing"},
         "subject_offering_details": [
            {"day_of_weeks": {"day_string": "Monday"},
             "time_start": "07:00:00", "time_end": "09:00:00", "rooms": {"code": "R101"}},
            {"day_of_weeks": {"day_string": "Thursday"},
             "time_start": "13:00:00", "time_end": "14:30:00", "rooms": null}
         ]}
    ]"#;

    #[test]
    fn render_to_workbook_writes_zip_only_on_close() {
        let tmp = TestDir::new();
        let path_out = tmp.path().join("schedules.xlsx");
        let writer = XlsxGridWriter::new(path_out.clone(), SpecXlsxGridOptions::default());

        let l_records = parse_offering_records(C_OFFERINGS).expect("decode");
        let dict_entries = build_entries_index(&l_records);
        let mut renderer =
            ScheduleRenderer::new(writer, SpecLayoutOptions::default()).expect("renderer");
        let report = renderer
            .render_all(&dict_entries, &SpecRosterIndex::new())
            .expect("render");
        assert_eq!(report.cnt_sections, 2);
        assert_eq!(report.cnt_entries, 4);
        assert!(!path_out.exists());

        renderer.close().expect("close");
        let bytes = std::fs::read(&path_out).expect("read output");
        assert!(bytes.len() > 4);
        assert_eq!(&bytes[..2], b"PK");
        assert_eq!(renderer.sink().sheet_names(), ["Schedules_1".to_string()]);
    }

    #[test]
    fn writes_after_close_fail_as_resource_errors() {
        let tmp = TestDir::new();
        let path_out = tmp.path().join("closed.xlsx");
        let writer = XlsxGridWriter::new(path_out.clone(), SpecXlsxGridOptions::default());
        let mut renderer =
            ScheduleRenderer::new(writer, SpecLayoutOptions::default()).expect("renderer");
        renderer.close().expect("close");
        assert!(path_out.exists());

        let mut writer = renderer.into_sink();
        let n_style = writer
            .define_style(&SpecCellStyle::default())
            .expect("style");
        assert!(writer.write_cell(0, 0, "late", n_style).is_err());
        assert!(writer.new_sheet("late").is_err());
        assert!(writer.close().is_ok());

        let dict_entries = build_entries_index(&parse_offering_records(C_OFFERINGS).unwrap());
        let mut renderer =
            ScheduleRenderer::new(writer, SpecLayoutOptions::default()).expect("renderer");
        let err = renderer
            .render_all(&dict_entries, &SpecRosterIndex::new())
            .expect_err("closed sink");
        assert!(matches!(err, ScheduleError::Resource(_)));
    }

    #[test]
    fn save_into_missing_directory_is_resource_error() {
        let tmp = TestDir::new();
        let path_out = tmp.path().join("missing_dir").join("out.xlsx");
        let writer = XlsxGridWriter::new(path_out.clone(), SpecXlsxGridOptions::default());
        let mut renderer =
            ScheduleRenderer::new(writer, SpecLayoutOptions::default()).expect("renderer");

        let err = renderer.close().expect_err("unwritable path");
        assert!(matches!(err, ScheduleError::Resource(_)));
        assert!(!path_out.exists());
        // a failed save leaves the renderer open for a retry
        assert!(renderer.close().is_err());
    }

    #[test]
    fn sheet_names_are_sanitized_and_unique() {
        let tmp = TestDir::new();
        let mut writer = XlsxGridWriter::new(
            tmp.path().join("names.xlsx"),
            SpecXlsxGridOptions::default(),
        );
        let n_style = writer
            .define_style(&SpecCellStyle::default())
            .expect("style");
        assert!(writer.write_cell(0, 0, "early", n_style).is_err());

        writer.new_sheet("SS191/SF191").expect("sheet");
        writer.new_sheet("SS191:SF191").expect("sheet");
        writer.set_column_width(1, 7, 18.0).expect("width");
        writer.write_cell(3, 1, "SS191", n_style).expect("write");
        writer.write_cell(4, 1, "", n_style).expect("blank");
        assert!(writer.write_cell(1_048_576, 0, "x", n_style).is_err());
        assert!(writer.write_cell(0, 0, "x", n_style + 1).is_err());

        assert_eq!(
            writer.sheet_names(),
            ["SS191_SF191".to_string(), "SS191_SF191__2".to_string()]
        );
        writer.close().expect("close");
        assert!(writer.file_out().exists());
    }
}
