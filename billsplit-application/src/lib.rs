#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod model;
pub mod ports;
pub mod split_processor;

pub use error::{BillParseError, SplitError, UsageParseError};
pub use model::{BillingSources, SplitOutcome};
pub use ports::{BillParser, UsageParser};
pub use split_processor::SplitProcessor;
