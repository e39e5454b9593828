#![warn(clippy::uninlined_format_args)]

pub mod bill_parser;
pub mod usage_parser;

pub use bill_parser::{TomlBillParser, bill_template};
pub use usage_parser::CsvUsageParser;
