//! Rendering report models and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;

use crate::spec::SpecEntryError;

/// Aggregate counters and diagnostics for one rendering pass.
#[derive(Debug, Default, Clone)]
pub struct ReportRender {
    /// Section blocks drawn.
    pub cnt_sections: u64,
    /// Schedule entries placed on the grid.
    pub cnt_entries: u64,
    /// Entries skipped because of per-entry errors.
    pub cnt_entries_skipped: u64,
    /// Cells written to the sink.
    pub cnt_cells: u64,
    /// Sheets opened.
    pub cnt_sheets: u64,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
    /// Per-entry failures.
    pub errors: Vec<SpecEntryError>,
}

impl ReportRender {
    /// Number of collected entry errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_sections".to_string(), self.cnt_sections);
        dict_counts.insert("cnt_entries".to_string(), self.cnt_entries);
        dict_counts.insert("cnt_entries_skipped".to_string(), self.cnt_entries_skipped);
        dict_counts.insert("cnt_cells".to_string(), self.cnt_cells);
        dict_counts.insert("cnt_sheets".to_string(), self.cnt_sheets);
        dict_counts.insert("cnt_errors".to_string(), self.error_count() as u64);
        dict_counts.insert("cnt_warnings".to_string(), self.warning_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        let dict_counts = self.to_dict();
        format!(
            "{prefix} sections={} entries={} skipped={} cells={} sheets={} errors={} warnings={}",
            dict_counts["cnt_sections"],
            dict_counts["cnt_entries"],
            dict_counts["cnt_entries_skipped"],
            dict_counts["cnt_cells"],
            dict_counts["cnt_sheets"],
            dict_counts["cnt_errors"],
            dict_counts["cnt_warnings"]
        )
    }
}

impl fmt::Display for ReportRender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[RENDER]"))
    }
}

/// Mutable accumulator for rendering statistics.
#[derive(Debug, Default, Clone)]
pub struct ReportRenderBuilder {
    /// See [`ReportRender::cnt_sections`].
    pub cnt_sections: u64,
    /// See [`ReportRender::cnt_entries`].
    pub cnt_entries: u64,
    /// See [`ReportRender::cnt_entries_skipped`].
    pub cnt_entries_skipped: u64,
    /// See [`ReportRender::cnt_cells`].
    pub cnt_cells: u64,
    /// See [`ReportRender::cnt_sheets`].
    pub cnt_sheets: u64,
    /// See [`ReportRender::warnings`].
    pub warnings: Vec<String>,
    /// See [`ReportRender::errors`].
    pub errors: Vec<SpecEntryError>,
}

impl ReportRenderBuilder {
    pub fn add_section(&mut self) {
        self.cnt_sections += 1;
    }

    pub fn add_entry(&mut self) {
        self.cnt_entries += 1;
    }

    pub fn add_cell(&mut self) {
        self.cnt_cells += 1;
    }

    pub fn add_sheet(&mut self) {
        self.cnt_sheets += 1;
    }

    /// Add warning message.
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Record one skipped entry with its context.
    pub fn add_entry_error(&mut self, section: &str, code: &str, day: &str, exception: String) {
        self.cnt_entries_skipped += 1;
        self.errors.push(SpecEntryError {
            section: section.to_string(),
            code: code.to_string(),
            day: day.to_string(),
            exception,
        });
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportRender {
        ReportRender {
            cnt_sections: self.cnt_sections,
            cnt_entries: self.cnt_entries,
            cnt_entries_skipped: self.cnt_entries_skipped,
            cnt_cells: self.cnt_cells,
            cnt_sheets: self.cnt_sheets,
            warnings: self.warnings,
            errors: self.errors,
        }
    }
}
