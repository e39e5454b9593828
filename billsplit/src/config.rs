use billsplit_domain::{AllocationContext, RoundingMode, ShortStrawFallback};
use clap::{Args, ValueEnum};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum RoundingModeArg {
    #[default]
    HalfUp,
    HalfEven,
}

impl From<RoundingModeArg> for RoundingMode {
    fn from(value: RoundingModeArg) -> Self {
        match value {
            RoundingModeArg::HalfUp => RoundingMode::HalfUp,
            RoundingModeArg::HalfEven => RoundingMode::HalfEven,
        }
    }
}

/// Precision and remainder settings, read from flags or `BILLSPLIT_*` variables.
#[derive(Args, Clone, Debug)]
pub struct AllocationArgs {
    /// Decimal places kept for usage percentages
    #[arg(
        long,
        env = "BILLSPLIT_INTERMEDIATE_SCALE",
        default_value_t = 6,
        global = true
    )]
    pub intermediate_scale: u32,

    /// Decimal places of every allocated amount
    #[arg(
        long,
        env = "BILLSPLIT_PRESENTATION_SCALE",
        default_value_t = 2,
        global = true
    )]
    pub presentation_scale: u32,

    /// Rounding applied to usage percentages
    #[arg(
        long,
        env = "BILLSPLIT_ROUNDING_MODE",
        value_enum,
        default_value_t = RoundingModeArg::HalfUp,
        global = true
    )]
    pub rounding_mode: RoundingModeArg,

    /// Fail when the short-straw id is not one of the bill's devices
    #[arg(long, env = "BILLSPLIT_STRICT_SHORT_STRAW", global = true)]
    pub strict_short_straw: bool,
}

impl AllocationArgs {
    pub fn to_context(&self) -> anyhow::Result<AllocationContext> {
        let context = AllocationContext {
            intermediate_scale: self.intermediate_scale,
            presentation_scale: self.presentation_scale,
            rounding_mode: self.rounding_mode.into(),
            short_straw_fallback: if self.strict_short_straw {
                ShortStrawFallback::Reject
            } else {
                ShortStrawFallback::FirstDevice
            },
        };
        context.validate()?;
        Ok(context)
    }
}
