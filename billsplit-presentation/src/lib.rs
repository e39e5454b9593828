#![warn(clippy::uninlined_format_args)]

pub mod csv_report;
pub mod error;
pub mod format;
pub mod invoice_presenter;
pub mod invoice_tables;
pub mod svg_table;

pub use csv_report::CsvReportPresenter;
pub use error::ReportError;
pub use invoice_presenter::InvoicePresenter;
pub use invoice_tables::{InvoiceTable, invoice_tables};
