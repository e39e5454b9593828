use crate::model::{DeviceId, Money, Pool, UsageCategory};
use thiserror::Error;

/// Reasons a bill cannot be split.
///
/// Input malformation is rejected before any allocation happens. A category
/// whose usage total is zero is not an error: its whole billable amount is
/// routed to the short-straw device.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AllocationError {
    #[error("bill lists no devices")]
    EmptyDeviceList,
    #[error("device {id} is listed more than once on the bill")]
    DuplicateDevice { id: DeviceId },
    #[error("device {device} reports negative {category} usage ({quantity})")]
    NegativeUsage {
        category: UsageCategory,
        device: DeviceId,
        quantity: i64,
    },
    #[error("bill field {field} is negative ({amount})")]
    NegativeAmount { field: &'static str, amount: Money },
    #[error("short straw device {id} is not on the bill")]
    UnknownShortStraw { id: DeviceId },
    #[error("scale {scale} exceeds the supported maximum of {max_supported}")]
    UnsupportedScale { scale: u32, max_supported: u32 },
    #[error(
        "presentation scale {presentation} is finer than intermediate scale {intermediate}"
    )]
    PresentationScaleExceedsIntermediate { intermediate: u32, presentation: u32 },
    #[error("arithmetic overflow while allocating the {pool} pool")]
    ArithmeticOverflow { pool: Pool },
    /// Allocations exceeded the intended total. Indicates a defect, never bad input.
    #[error("{pool} allocations sum to {allocated}, above the intended {intended}")]
    ReconciliationInvariantViolation {
        pool: Pool,
        allocated: Money,
        intended: Money,
    },
}
