//! Section block layout: metadata, railings and colored schedule blocks.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::color::ColorAssigner;
use crate::conf::{N_DAYS_PER_BLOCK, N_INDENT_TIME_LABEL};
use crate::report::{ReportRender, ReportRenderBuilder};
use crate::ripper::bucketize_section;
use crate::sink::GridSink;
use crate::spec::{
    EnumCellAlign, EnumColorScope, EnumWeekday, ScheduleError, SpecBlockPlacement, SpecCellStyle,
    SpecEntriesIndex, SpecLayoutOptions, SpecOfficer, SpecRosterIndex, SpecScheduleEntry,
    SpecSectionBuckets,
};

const N_MINUTES_PER_DAY: u32 = 24 * 60;

////////////////////////////////////////////////////////////////////////////////
// #region Validation

/// Reject layout options that cannot produce a grid.
pub fn validate_layout_options(options: &SpecLayoutOptions) -> Result<(), ScheduleError> {
    if options.blocks_per_sheet == 0 {
        return Err(ScheduleError::Configuration(
            "blocks_per_sheet must be greater than 0.".to_string(),
        ));
    }
    if options.palette.is_empty() {
        return Err(ScheduleError::Configuration(
            "Color palette must contain at least one color.".to_string(),
        ));
    }

    let window = &options.window;
    if window.n_slots == 0 {
        return Err(ScheduleError::Configuration(
            "Time window must have at least one slot.".to_string(),
        ));
    }
    if window.n_slots > 1 && window.minute_step == 0 {
        return Err(ScheduleError::Configuration(
            "Time window step must be greater than 0.".to_string(),
        ));
    }
    let n_minute_last =
        window.minute_start as u64 + (window.n_slots as u64 - 1) * window.minute_step as u64;
    if n_minute_last >= N_MINUTES_PER_DAY as u64 {
        return Err(ScheduleError::Configuration(format!(
            "Time window ends past midnight (last slot at minute {n_minute_last})."
        )));
    }

    let rng_day_cols = options.col_day_first..options.col_day_first + N_DAYS_PER_BLOCK;
    if rng_day_cols.contains(&options.col_time) {
        return Err(ScheduleError::Configuration(format!(
            "Time column {} overlaps day columns {}..={}.",
            options.col_time,
            rng_day_cols.start,
            rng_day_cols.end - 1
        )));
    }
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region BlockContent

/// Text of each row of an entry's block, top to bottom; empty strings are
/// colored blanks.
///
/// Full layout is `blank, code, time, room, blank...`. Short spans drop the
/// leading blank first, then the time, so the code is always shown.
pub fn plan_block_lines(entry: &SpecScheduleEntry) -> Vec<String> {
    let n_span = entry.span();
    match n_span {
        0 => vec![],
        1 => vec![entry.code.clone()],
        2 => vec![entry.code.clone(), entry.display_time.clone()],
        _ => {
            let mut l_lines = vec![
                String::new(),
                entry.code.clone(),
                entry.display_time.clone(),
            ];
            if n_span >= 4 {
                l_lines.push(entry.room.clone());
            }
            l_lines.resize(n_span, String::new());
            l_lines
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Renderer

/// One rendering session over a [`GridSink`].
///
/// Owns the running row cursor, the sheet rotation state, the color table
/// and the style handle cache.
pub struct ScheduleRenderer<S: GridSink> {
    sink: S,
    options: SpecLayoutOptions,
    l_window_labels: Vec<String>,
    assigner: ColorAssigner,
    dict_style_ids: HashMap<SpecCellStyle, usize>,
    n_row_cursor: usize,
    n_sheets: usize,
    n_blocks_sheet: usize,
    builder_report: ReportRenderBuilder,
    if_closed: bool,
}

impl<S: GridSink> ScheduleRenderer<S> {
    /// Create a session; the first sheet is opened lazily by the first block.
    pub fn new(sink: S, options: SpecLayoutOptions) -> Result<Self, ScheduleError> {
        validate_layout_options(&options)?;
        let assigner = ColorAssigner::new(options.palette.clone())?;
        Ok(Self {
            sink,
            l_window_labels: options.window.labels(),
            n_row_cursor: options.row_start,
            options,
            assigner,
            dict_style_ids: HashMap::new(),
            n_sheets: 0,
            n_blocks_sheet: 0,
            builder_report: ReportRenderBuilder::default(),
            if_closed: false,
        })
    }

    /// Draw every indexed section in index order, then every roster-only
    /// section in roster order.
    ///
    /// Per-entry errors are collected into the report; sink failures and
    /// palette exhaustion abort the pass.
    pub fn render_all(
        &mut self,
        dict_entries: &SpecEntriesIndex,
        dict_rosters: &SpecRosterIndex,
    ) -> Result<ReportRender, ScheduleError> {
        for c_section in dict_entries.keys() {
            let buckets = bucketize_section(
                dict_entries,
                c_section,
                &self.l_window_labels,
                &mut self.builder_report,
            )?;
            let l_officers = dict_rosters.get(c_section).map(Vec::as_slice);
            self.draw_section(c_section, &buckets, l_officers)?;
        }

        for (c_section, l_officers) in dict_rosters {
            if dict_entries.contains_key(c_section) {
                continue;
            }
            warn!(section = %c_section, "section has a roster but no schedule entries");
            self.builder_report.add_warning(format!(
                "Section {c_section:?} has officers but no schedule entries; drew an empty block."
            ));
            self.draw_section(
                c_section,
                &SpecSectionBuckets::default(),
                Some(l_officers.as_slice()),
            )?;
        }

        let report = self.report();
        info!(summary = %report, "render pass complete");
        Ok(report)
    }

    /// Draw one section block at the cursor and advance the cursor past it.
    pub fn draw_section(
        &mut self,
        section: &str,
        buckets: &SpecSectionBuckets,
        l_officers: Option<&[SpecOfficer]>,
    ) -> Result<SpecBlockPlacement, ScheduleError> {
        if self.if_closed {
            return Err(ScheduleError::Resource(
                "Cannot draw after close().".to_string(),
            ));
        }
        if self.n_sheets == 0 || self.n_blocks_sheet >= self.options.blocks_per_sheet {
            self.open_sheet()?;
        }
        if self.options.rule_color_scope == EnumColorScope::Section {
            self.assigner.reset();
        }

        let row_metadata = self.n_row_cursor;
        let l_officers = l_officers.unwrap_or_default();
        let row_header = if self.options.if_draw_metadata {
            self.draw_metadata(section, l_officers, row_metadata)?
        } else {
            row_metadata
        };
        self.draw_railings(row_header)?;
        for (enum_day, l_entries) in buckets.iter() {
            for entry in l_entries {
                self.draw_entry_block(enum_day, entry, row_header)?;
                self.builder_report.add_entry();
            }
        }

        let n_rows_roster = if self.options.if_draw_metadata {
            l_officers.len()
        } else {
            0
        };
        let n_rows_railing = self.l_window_labels.len() + 1;
        let row_next = row_header + n_rows_roster.max(n_rows_railing) + self.options.n_rows_padding;

        self.n_row_cursor = row_next;
        self.n_blocks_sheet += 1;
        self.builder_report.add_section();
        debug!(
            section,
            sheet = self.n_sheets,
            row = row_metadata,
            n_entries = buckets.n_entries(),
            "drew section block"
        );

        Ok(SpecBlockPlacement {
            n_sheet: self.n_sheets,
            row_metadata,
            row_header,
            row_next,
        })
    }

    /// Finalize the sink. Opens an empty sheet first if nothing was drawn.
    /// Repeated calls are no-ops.
    pub fn close(&mut self) -> Result<(), ScheduleError> {
        if self.if_closed {
            return Ok(());
        }
        if self.n_sheets == 0 {
            self.open_sheet()?;
        }
        self.sink.finalize().map_err(ScheduleError::Resource)?;
        self.if_closed = true;
        Ok(())
    }

    /// Snapshot of the counters and diagnostics so far.
    pub fn report(&self) -> ReportRender {
        self.builder_report.clone().build()
    }

    /// Row where the next section block will start.
    pub fn row_cursor(&self) -> usize {
        self.n_row_cursor
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn open_sheet(&mut self) -> Result<(), ScheduleError> {
        let n_sheet = self.n_sheets + 1;
        let c_sheet_name = format!("{}_{n_sheet}", self.options.sheet_name);
        self.sink
            .new_sheet(&c_sheet_name)
            .map_err(ScheduleError::Resource)?;

        let n_col_day_last = self.options.col_day_first + N_DAYS_PER_BLOCK - 1;
        self.sink
            .set_column_width(
                self.options.col_time,
                self.options.col_time,
                self.options.width_col_time,
            )
            .map_err(ScheduleError::Resource)?;
        self.sink
            .set_column_width(
                self.options.col_day_first,
                n_col_day_last,
                self.options.width_col_day,
            )
            .map_err(ScheduleError::Resource)?;

        self.n_sheets = n_sheet;
        self.n_blocks_sheet = 0;
        self.n_row_cursor = self.options.row_start;
        self.builder_report.add_sheet();
        debug!(sheet = n_sheet, name = %c_sheet_name, "opened sheet");
        Ok(())
    }

    /// Title and roster rows; returns the day header row.
    fn draw_metadata(
        &mut self,
        section: &str,
        l_officers: &[SpecOfficer],
        row_metadata: usize,
    ) -> Result<usize, ScheduleError> {
        let style_title = SpecCellStyle {
            bold: true,
            align: EnumCellAlign::Center,
            ..Default::default()
        };
        let style_position = SpecCellStyle {
            bold: true,
            ..Default::default()
        };
        let style_names = SpecCellStyle::default();

        self.write_styled(row_metadata, self.options.col_time, section, &style_title)?;
        for (n_idx, officer) in l_officers.iter().enumerate() {
            let n_row = row_metadata + 1 + n_idx;
            self.write_styled(
                n_row,
                self.options.col_time,
                &officer.position,
                &style_position,
            )?;
            self.write_styled(
                n_row,
                self.options.col_day_first,
                &officer.names.join(", "),
                &style_names,
            )?;
        }
        Ok(row_metadata + 1 + l_officers.len() + 1)
    }

    fn draw_railings(&mut self, row_header: usize) -> Result<(), ScheduleError> {
        let style_header = SpecCellStyle {
            bold: true,
            align: EnumCellAlign::Center,
            ..Default::default()
        };
        let style_time = SpecCellStyle {
            align: EnumCellAlign::Right,
            indent: N_INDENT_TIME_LABEL,
            ..Default::default()
        };

        for enum_day in EnumWeekday::ALL {
            let n_col = self.options.col_day_first + enum_day.index();
            self.write_styled(row_header, n_col, enum_day.name(), &style_header)?;
        }
        let l_labels = self.l_window_labels.clone();
        for (n_idx, c_label) in l_labels.iter().enumerate() {
            self.write_styled(
                row_header + 1 + n_idx,
                self.options.col_time,
                c_label,
                &style_time,
            )?;
        }
        Ok(())
    }

    fn draw_entry_block(
        &mut self,
        enum_day: EnumWeekday,
        entry: &SpecScheduleEntry,
        row_header: usize,
    ) -> Result<(), ScheduleError> {
        let c_color = self.assigner.derive_color(&entry.code)?;
        let n_col = self.options.col_day_first + enum_day.index();
        let row_first = row_header + 1 + entry.time_start_interval;
        let n_idx_code = if entry.span() < 3 { 0 } else { 1 };

        for (n_idx, c_line) in plan_block_lines(entry).iter().enumerate() {
            let style = SpecCellStyle {
                bold: n_idx == n_idx_code,
                align: EnumCellAlign::Center,
                bg_color: Some(c_color.clone()),
                indent: 0,
                border_top: n_idx == 0,
            };
            self.write_styled(row_first + n_idx, n_col, c_line, &style)?;
        }
        Ok(())
    }

    fn write_styled(
        &mut self,
        row: usize,
        col: usize,
        content: &str,
        style: &SpecCellStyle,
    ) -> Result<(), ScheduleError> {
        let style_id = self.derive_style_id(style)?;
        self.sink
            .write_cell(row, col, content, style_id)
            .map_err(ScheduleError::Resource)?;
        self.builder_report.add_cell();
        Ok(())
    }

    fn derive_style_id(&mut self, style: &SpecCellStyle) -> Result<usize, ScheduleError> {
        if let Some(&style_id) = self.dict_style_ids.get(style) {
            return Ok(style_id);
        }
        let style_id = self
            .sink
            .define_style(style)
            .map_err(ScheduleError::Resource)?;
        self.dict_style_ids.insert(style.clone(), style_id);
        Ok(style_id)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
