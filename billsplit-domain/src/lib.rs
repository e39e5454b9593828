#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod model;
pub mod services;

pub use error::AllocationError;
pub use model::{
    BillDefinition, BillSplit, CategorySplit, Device, DeviceId, Money, Pool, Remainders,
    UsageCategory, UsageMap, UsageMaps,
};
pub use services::{AllocationContext, AllocationEngine, RoundingMode, ShortStrawFallback};
