// Spreadsheet exports.

pub mod dcf;

pub use dcf::{DcfWorksheet, WorksheetRow, write_dcf_csv};
