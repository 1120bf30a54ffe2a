//! Shared XLSX specification models.

use crate::conf::{C_SHEET_NAME_REPLACE, derive_default_xlsx_base_format};

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Cell format specification; `None` fields inherit from the format below.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    /// Font family name.
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: Option<i64>,
    /// Bold style.
    pub bold: Option<bool>,

    /// Horizontal alignment.
    pub align: Option<String>,
    /// Vertical alignment.
    pub valign: Option<String>,
    /// Indent level.
    pub indent: Option<u8>,
    /// Border style for all sides.
    pub border: Option<i64>,
    /// Top border override.
    pub top: Option<i64>,

    /// Background fill color.
    pub bg_color: Option<String>,
}

impl SpecCellFormat {
    /// Return a new format by overlaying `patch` onto `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        self.merge(&patch)
    }

    /// Merge two formats with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            font_name: other.font_name.clone().or_else(|| self.font_name.clone()),
            font_size: other.font_size.or(self.font_size),
            bold: other.bold.or(self.bold),
            align: other.align.clone().or_else(|| self.align.clone()),
            valign: other.valign.clone().or_else(|| self.valign.clone()),
            indent: other.indent.or(self.indent),
            border: other.border.or(self.border),
            top: other.top.or(self.top),
            bg_color: other.bg_color.clone().or_else(|| self.bg_color.clone()),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WriterOptions

/// Options of [`crate::writer::XlsxGridWriter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecXlsxGridOptions {
    /// Base format under every grid style.
    pub fmt_base: SpecCellFormat,
    /// Replacement for illegal sheet name characters.
    pub sheet_name_replace: String,
}

impl Default for SpecXlsxGridOptions {
    fn default() -> Self {
        Self {
            fmt_base: derive_default_xlsx_base_format(),
            sheet_name_replace: C_SHEET_NAME_REPLACE.to_string(),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_prefers_patch_values() {
        let fmt_base = derive_default_xlsx_base_format();
        let fmt = fmt_base.with_(SpecCellFormat {
            bold: Some(true),
            align: Some("center".to_string()),
            top: Some(1),
            ..Default::default()
        });
        assert_eq!(fmt.bold, Some(true));
        assert_eq!(fmt.align.as_deref(), Some("center"));
        assert_eq!(fmt.valign.as_deref(), Some("vcenter"));
        assert_eq!(fmt.font_name.as_deref(), Some("Times New Roman"));
        assert_eq!(fmt.border, Some(0));
        assert_eq!(fmt.top, Some(1));
        assert_eq!(fmt.bg_color, None);
    }
}
