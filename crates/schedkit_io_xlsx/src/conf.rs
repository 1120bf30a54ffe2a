//! XLSX constants and default preset factories.

use crate::spec::{SpecCellFormat, SpecXlsxGridOptions};

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];

/// Thin border style code.
pub const N_BORDER_THIN: i64 = 1;
/// Replacement for illegal sheet name characters.
pub const C_SHEET_NAME_REPLACE: &str = "_";

/// Build the base format every grid style is overlaid on.
pub fn derive_default_xlsx_base_format() -> SpecCellFormat {
    SpecCellFormat {
        font_name: Some("Times New Roman".to_string()),
        font_size: Some(11),
        border: Some(0),
        align: Some("left".to_string()),
        valign: Some("vcenter".to_string()),
        ..Default::default()
    }
}

/// Build default grid writer options.
pub fn derive_default_xlsx_grid_options() -> SpecXlsxGridOptions {
    SpecXlsxGridOptions::default()
}
