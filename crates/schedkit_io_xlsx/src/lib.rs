//! `schedkit_io_xlsx` v1:
//! XLSX grid sink for rendered schedules.
//!
//! Architecture:
//! - `conf`   : Excel limits and default presets
//! - `spec`   : cell format and writer options
//! - `util`   : pure helper functions
//! - `writer` : workbook-backed `GridSink`
pub mod conf;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL,
    derive_default_xlsx_base_format, derive_default_xlsx_grid_options,
};
pub use spec::{SpecCellFormat, SpecXlsxGridOptions};
pub use util::{derive_format_from_style, sanitize_sheet_name, validate_cell_position};
pub use writer::XlsxGridWriter;
