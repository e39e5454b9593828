pub mod allocation_context;
pub mod allocation_engine;
pub mod bill_validator;
pub mod remainder_reconciliation;
pub mod short_straw_policy;

pub use allocation_context::{AllocationContext, RoundingMode, ShortStrawFallback};
pub use allocation_engine::AllocationEngine;
pub use bill_validator::BillValidator;
pub use remainder_reconciliation::{reconcile_remainder, truncate_to_scale};
pub use short_straw_policy::ShortStrawPolicy;
