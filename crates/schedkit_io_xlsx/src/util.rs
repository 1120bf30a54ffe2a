//! Stateless helper utilities used by the XLSX grid writer.

use schedkit_grid::{EnumCellAlign, SpecCellStyle};

use crate::conf::{
    N_BORDER_THIN, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX,
    TUP_EXCEL_ILLEGAL,
};
use crate::spec::SpecCellFormat;

////////////////////////////////////////////////////////////////////////////////
// #region SheetNaming

/// Replace illegal characters, trim, and clip to the Excel name limit.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    c_name = c_name.trim().to_string();
    if c_name.is_empty() {
        c_name = "Sheet".to_string();
    }

    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StyleConversion

/// Translate a sink-neutral style into a format patch.
///
/// Unset style fields stay `None` so the base format shows through.
pub fn derive_format_from_style(style: &SpecCellStyle) -> SpecCellFormat {
    let c_align = match style.align {
        EnumCellAlign::Left => "left",
        EnumCellAlign::Center => "center",
        EnumCellAlign::Right => "right",
    };
    SpecCellFormat {
        bold: style.bold.then_some(true),
        align: Some(c_align.to_string()),
        indent: (style.indent > 0).then_some(style.indent),
        top: style.border_top.then_some(N_BORDER_THIN),
        bg_color: style.bg_color.clone(),
        ..Default::default()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellPosition

pub fn cast_row_num(value: usize) -> Result<u32, String> {
    u32::try_from(value).map_err(|_| format!("row index overflow: {value}"))
}

pub fn cast_col_num(value: usize) -> Result<u16, String> {
    u16::try_from(value).map_err(|_| format!("column index overflow: {value}"))
}

/// Check a zero-based cell position against Excel limits.
pub fn validate_cell_position(row: usize, col: usize) -> Result<(u32, u16), String> {
    if row >= N_NROWS_EXCEL_MAX {
        return Err(format!(
            "Row {row} exceeds Excel limit of {N_NROWS_EXCEL_MAX} rows."
        ));
    }
    if col >= N_NCOLS_EXCEL_MAX {
        return Err(format!(
            "Column {col} exceeds Excel limit of {N_NCOLS_EXCEL_MAX} columns."
        ));
    }
    Ok((cast_row_num(row)?, cast_col_num(col)?))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_sheet_name() {
        assert_eq!(sanitize_sheet_name("SS191/SF191", "_"), "SS191_SF191");
        assert_eq!(sanitize_sheet_name(" [A]:B? ", "_"), "_A__B_");
        assert_eq!(sanitize_sheet_name("   ", "_"), "Sheet");
        assert_eq!(
            sanitize_sheet_name(&"x".repeat(40), "_").chars().count(),
            N_LEN_EXCEL_SHEET_NAME_MAX
        );
    }

    #[test]
    fn test_derive_format_from_style() {
        let fmt = derive_format_from_style(&SpecCellStyle {
            bold: true,
            align: EnumCellAlign::Center,
            bg_color: Some("#F4CCCC".to_string()),
            indent: 0,
            border_top: true,
        });
        assert_eq!(fmt.bold, Some(true));
        assert_eq!(fmt.align.as_deref(), Some("center"));
        assert_eq!(fmt.top, Some(N_BORDER_THIN));
        assert_eq!(fmt.indent, None);
        assert_eq!(fmt.bg_color.as_deref(), Some("#F4CCCC"));

        let fmt = derive_format_from_style(&SpecCellStyle {
            align: EnumCellAlign::Right,
            indent: 1,
            ..Default::default()
        });
        assert_eq!(fmt.bold, None);
        assert_eq!(fmt.top, None);
        assert_eq!(fmt.indent, Some(1));
    }

    #[test]
    fn test_validate_cell_position() {
        assert_eq!(validate_cell_position(3, 7), Ok((3, 7)));
        assert!(validate_cell_position(N_NROWS_EXCEL_MAX, 0).is_err());
        assert!(validate_cell_position(0, N_NCOLS_EXCEL_MAX).is_err());
    }
}
