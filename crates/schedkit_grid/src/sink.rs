//! Grid sink capability and an in-memory implementation.

use std::collections::BTreeMap;

use crate::spec::SpecCellStyle;

/// Write target of the layout engine.
///
/// Errors are plain text; the engine surfaces them as
/// [`crate::ScheduleError::Resource`] unchanged.
pub trait GridSink {
    /// Start a new sheet; subsequent writes go to it.
    fn new_sheet(&mut self, sheet_name: &str) -> Result<(), String>;

    /// Set the width of columns `col_first..=col_last` on the current sheet.
    fn set_column_width(
        &mut self,
        col_first: usize,
        col_last: usize,
        width: f64,
    ) -> Result<(), String>;

    /// Register a style and return its handle.
    fn define_style(&mut self, style: &SpecCellStyle) -> Result<usize, String>;

    /// Write one cell on the current sheet; empty `content` is a styled blank.
    fn write_cell(
        &mut self,
        row: usize,
        col: usize,
        content: &str,
        style_id: usize,
    ) -> Result<(), String>;

    /// Persist everything written so far.
    fn finalize(&mut self) -> Result<(), String>;
}

/// One recorded cell write.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecGridWrite {
    pub sheet_idx: usize,
    pub row: usize,
    pub col: usize,
    pub content: String,
    pub style_id: usize,
}

/// One recorded sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecMemorySheet {
    pub name: String,
    /// Column -> width.
    pub widths: BTreeMap<usize, f64>,
    /// Number of `set_column_width` calls received.
    pub n_width_calls: usize,
    /// Final cell contents; later writes replace earlier ones.
    pub cells: BTreeMap<(usize, usize), SpecGridWrite>,
}

/// Sink that keeps every instruction in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryGridSink {
    l_sheets: Vec<SpecMemorySheet>,
    l_styles: Vec<SpecCellStyle>,
    l_writes: Vec<SpecGridWrite>,
    if_finalized: bool,
}

impl MemoryGridSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheets(&self) -> &[SpecMemorySheet] {
        &self.l_sheets
    }

    /// Styles in handle order.
    pub fn styles(&self) -> &[SpecCellStyle] {
        &self.l_styles
    }

    /// Every write in emission order, overwritten ones included.
    pub fn writes(&self) -> &[SpecGridWrite] {
        &self.l_writes
    }

    /// Final cell at `(row, col)` of sheet `sheet_idx`.
    pub fn cell(&self, sheet_idx: usize, row: usize, col: usize) -> Option<&SpecGridWrite> {
        self.l_sheets
            .get(sheet_idx)
            .and_then(|sheet| sheet.cells.get(&(row, col)))
    }

    /// Style of the final cell at `(row, col)` of sheet `sheet_idx`.
    pub fn cell_style(&self, sheet_idx: usize, row: usize, col: usize) -> Option<&SpecCellStyle> {
        self.cell(sheet_idx, row, col)
            .and_then(|write| self.l_styles.get(write.style_id))
    }

    pub fn is_finalized(&self) -> bool {
        self.if_finalized
    }

    fn current_sheet_mut(&mut self) -> Result<(usize, &mut SpecMemorySheet), String> {
        if self.if_finalized {
            return Err("Cannot write after finalize().".to_string());
        }
        let n_idx = self.l_sheets.len().checked_sub(1).ok_or("No sheet opened.")?;
        Ok((n_idx, &mut self.l_sheets[n_idx]))
    }
}

impl GridSink for MemoryGridSink {
    fn new_sheet(&mut self, sheet_name: &str) -> Result<(), String> {
        if self.if_finalized {
            return Err("Cannot add sheet after finalize().".to_string());
        }
        self.l_sheets.push(SpecMemorySheet {
            name: sheet_name.to_string(),
            ..Default::default()
        });
        Ok(())
    }

    fn set_column_width(
        &mut self,
        col_first: usize,
        col_last: usize,
        width: f64,
    ) -> Result<(), String> {
        let (_, sheet) = self.current_sheet_mut()?;
        sheet.n_width_calls += 1;
        for n_col in col_first..=col_last {
            sheet.widths.insert(n_col, width);
        }
        Ok(())
    }

    fn define_style(&mut self, style: &SpecCellStyle) -> Result<usize, String> {
        self.l_styles.push(style.clone());
        Ok(self.l_styles.len() - 1)
    }

    fn write_cell(
        &mut self,
        row: usize,
        col: usize,
        content: &str,
        style_id: usize,
    ) -> Result<(), String> {
        if style_id >= self.l_styles.len() {
            return Err(format!("Unknown style handle: {style_id}"));
        }
        let (sheet_idx, sheet) = self.current_sheet_mut()?;
        let write = SpecGridWrite {
            sheet_idx,
            row,
            col,
            content: content.to_string(),
            style_id,
        };
        sheet.cells.insert((row, col), write.clone());
        self.l_writes.push(write);
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), String> {
        self.if_finalized = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_records_and_overwrites() {
        let mut sink = MemoryGridSink::new();
        let n_style = sink.define_style(&SpecCellStyle::default()).unwrap();
        assert!(sink.write_cell(0, 0, "x", n_style).is_err());

        sink.new_sheet("S_1").unwrap();
        sink.set_column_width(2, 4, 18.0).unwrap();
        sink.write_cell(5, 2, "first", n_style).unwrap();
        sink.write_cell(5, 2, "second", n_style).unwrap();

        assert_eq!(sink.sheets()[0].widths.len(), 3);
        assert_eq!(sink.cell(0, 5, 2).unwrap().content, "second");
        assert_eq!(sink.writes().len(), 2);
        assert!(sink.write_cell(0, 0, "x", n_style + 1).is_err());

        sink.finalize().unwrap();
        assert!(sink.is_finalized());
        assert!(sink.write_cell(0, 0, "late", n_style).is_err());
        assert!(sink.new_sheet("S_2").is_err());
    }
}
