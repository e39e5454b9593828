use crate::error::AllocationError;
use rust_decimal::RoundingStrategy;

const MAX_SCALE: u32 = 28;

/// Rounding mode for intermediate percentages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RoundingMode {
    /// Round half away from zero (e.g., 0.5 -> 1).
    #[default]
    HalfUp,
    /// Round half to nearest even number (banker's rounding).
    HalfEven,
}

impl RoundingMode {
    pub(crate) fn strategy(self) -> RoundingStrategy {
        match self {
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
        }
    }
}

/// What to do when the bill names a short-straw device that is not listed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShortStrawFallback {
    /// Use the first device in bill order.
    #[default]
    FirstDevice,
    /// Fail with [`AllocationError::UnknownShortStraw`].
    Reject,
}

/// Precision and policy knobs threaded through one allocation.
///
/// # Example
/// ```
/// use billsplit_domain::services::{AllocationContext, RoundingMode, ShortStrawFallback};
///
/// let ctx = AllocationContext {
///     intermediate_scale: 8,
///     presentation_scale: 2, // cents
///     rounding_mode: RoundingMode::HalfEven,
///     short_straw_fallback: ShortStrawFallback::Reject,
/// };
/// assert!(ctx.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AllocationContext {
    /// Decimal places kept for percentages.
    pub intermediate_scale: u32,
    /// Decimal places of the billing currency's smallest unit. Allocations are
    /// truncated to this scale before the remainder is reconciled.
    pub presentation_scale: u32,
    pub rounding_mode: RoundingMode,
    pub short_straw_fallback: ShortStrawFallback,
}

impl Default for AllocationContext {
    fn default() -> Self {
        Self::usd_default()
    }
}

impl AllocationContext {
    /// Cents, six-digit percentages, half-up rounding.
    pub fn usd_default() -> Self {
        Self {
            intermediate_scale: 6,
            presentation_scale: 2,
            rounding_mode: RoundingMode::HalfUp,
            short_straw_fallback: ShortStrawFallback::FirstDevice,
        }
    }

    pub fn validate(&self) -> Result<(), AllocationError> {
        for scale in [self.intermediate_scale, self.presentation_scale] {
            if scale > MAX_SCALE {
                return Err(AllocationError::UnsupportedScale {
                    scale,
                    max_supported: MAX_SCALE,
                });
            }
        }
        if self.presentation_scale > self.intermediate_scale {
            return Err(AllocationError::PresentationScaleExceedsIntermediate {
                intermediate: self.intermediate_scale,
                presentation: self.presentation_scale,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn default_context_is_valid() {
        assert_eq!(AllocationContext::default().validate(), Ok(()));
    }

    #[rstest]
    #[case::intermediate_too_large(29, 2, AllocationError::UnsupportedScale { scale: 29, max_supported: 28 })]
    #[case::presentation_too_large(6, 30, AllocationError::UnsupportedScale { scale: 30, max_supported: 28 })]
    #[case::presentation_finer(2, 4, AllocationError::PresentationScaleExceedsIntermediate { intermediate: 2, presentation: 4 })]
    fn rejects_invalid_scales(
        #[case] intermediate_scale: u32,
        #[case] presentation_scale: u32,
        #[case] expected: AllocationError,
    ) {
        let context = AllocationContext {
            intermediate_scale,
            presentation_scale,
            ..AllocationContext::usd_default()
        };
        assert_eq!(context.validate(), Err(expected));
    }
}
