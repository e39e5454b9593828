use billsplit_domain::{AllocationError, UsageCategory};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BillParseError {
    #[error("bill definition is not valid TOML: {0}")]
    Syntax(String),
    #[error("bill definition lists no devices")]
    NoDevices,
    #[error("device #{position} has a blank id")]
    BlankDeviceId { position: usize },
}

#[derive(Debug, Error)]
pub enum UsageParseError {
    #[error("{category} usage file is empty")]
    Empty { category: UsageCategory },
    #[error("missing \"{header}\" header in {category} usage file")]
    MissingHeader {
        category: UsageCategory,
        header: &'static str,
    },
    #[error("invalid quantity {value:?} on line {line}")]
    InvalidQuantity { line: u64, value: String },
    #[error("negative quantity {value:?} on line {line}")]
    NegativeQuantity { line: u64, value: String },
    #[error("blank device on line {line}")]
    BlankDevice { line: u64 },
    #[error("quantity total for {device} overflows")]
    QuantityOverflow { device: String },
    #[error("malformed CSV: {0}")]
    Csv(String),
}

#[derive(Debug, Error)]
pub enum SplitError {
    #[error("failed to read bill definition")]
    Bill(#[source] BillParseError),
    #[error("failed to read {category} usage")]
    Usage {
        category: UsageCategory,
        #[source]
        source: UsageParseError,
    },
    #[error("failed to split bill")]
    Allocation(#[from] AllocationError),
}
