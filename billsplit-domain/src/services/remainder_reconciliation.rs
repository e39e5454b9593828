//! Remainder reconciliation for proportional bill allocation.
//!
//! Allocations are truncated to the currency's smallest unit, so their sum can
//! only fall short of the pool being split. The shortfall is assigned to the
//! short-straw device, after which:
//! 1. Each pool's allocations sum exactly to the pool's intended total
//! 2. Every device other than the short straw keeps its truncated share
//! 3. The assignment depends only on the bill, never on map iteration order

use crate::{
    error::AllocationError,
    model::{DeviceId, Money, Pool},
};
use indexmap::IndexMap;
use rust_decimal::{Decimal, RoundingStrategy};

/// Truncates `value` toward zero at `scale` decimal places.
pub fn truncate_to_scale(value: Decimal, scale: u32) -> Decimal {
    value.round_dp_with_strategy(scale, RoundingStrategy::ToZero)
}

/// Adds any shortfall between `intended` and the sum of `allocations` to the
/// short-straw device and returns the amount added.
///
/// # Arguments
/// * `pool` - Pool being reconciled (used for diagnostics and errors)
/// * `allocations` - Per-device allocations in bill order
/// * `intended` - Total the allocations must add up to
/// * `short_straw` - Device that absorbs the shortfall
///
/// # Returns
/// * `Ok(Money)` - The remainder assigned (zero when the pool already balanced)
/// * `Err(AllocationError)` - If the allocations exceed `intended` or overflow
pub fn reconcile_remainder(
    pool: Pool,
    allocations: &mut IndexMap<DeviceId, Money>,
    intended: Money,
    short_straw: &DeviceId,
) -> Result<Money, AllocationError> {
    let allocated = checked_sum(pool, allocations)?;

    if allocated > intended {
        tracing::error!(
            reject_reason = "allocation_exceeds_pool",
            pool = %pool,
            allocated = %allocated,
            intended = %intended,
            device_count = allocations.len(),
            "Allocations exceed the pool before reconciliation"
        );
        return Err(AllocationError::ReconciliationInvariantViolation {
            pool,
            allocated,
            intended,
        });
    }

    let remainder = intended
        .checked_sub(allocated)
        .ok_or(AllocationError::ArithmeticOverflow { pool })?;

    if remainder.is_zero() {
        tracing::debug!(pool = %pool, "No remainder when splitting pool");
        return Ok(Money::ZERO);
    }

    let slot = allocations
        .entry(short_straw.clone())
        .or_insert(Money::ZERO);
    *slot = slot
        .checked_add(remainder)
        .ok_or(AllocationError::ArithmeticOverflow { pool })?;

    tracing::info!(
        pool = %pool,
        remainder = %remainder,
        short_straw = %short_straw,
        "Assigned remainder to short straw device"
    );

    let reconciled = checked_sum(pool, allocations)?;
    if reconciled != intended {
        tracing::error!(
            reject_reason = "reconciliation_mismatch",
            pool = %pool,
            reconciled = %reconciled,
            intended = %intended,
            "Pool failed to reconcile after remainder assignment"
        );
        return Err(AllocationError::ReconciliationInvariantViolation {
            pool,
            allocated: reconciled,
            intended,
        });
    }

    Ok(remainder)
}

fn checked_sum(
    pool: Pool,
    allocations: &IndexMap<DeviceId, Money>,
) -> Result<Money, AllocationError> {
    allocations
        .values()
        .try_fold(Money::ZERO, |acc, amount| acc.checked_add(*amount))
        .ok_or(AllocationError::ArithmeticOverflow { pool })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UsageCategory;
    use rstest::rstest;
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).expect("valid decimal")
    }

    fn allocations(entries: &[(&str, &str)]) -> IndexMap<DeviceId, Money> {
        entries
            .iter()
            .map(|(id, amount)| (DeviceId::from(*id), Money::from_decimal(dec(amount))))
            .collect()
    }

    #[rstest]
    #[case::positive("18.28333333", 2, "18.28")]
    #[case::keeps_exact("28.80", 2, "28.80")]
    #[case::never_rounds_up("0.999", 2, "0.99")]
    #[case::whole_units("7.9", 0, "7")]
    fn truncates_toward_zero(#[case] value: &str, #[case] scale: u32, #[case] expected: &str) {
        assert_eq!(truncate_to_scale(dec(value), scale), dec(expected));
    }

    #[test]
    fn assigns_shortfall_to_short_straw() {
        let mut shares = allocations(&[("a", "18.28"), ("b", "18.28"), ("c", "18.28")]);

        let remainder = reconcile_remainder(
            Pool::Shared,
            &mut shares,
            Money::new(5485, 2),
            &DeviceId::from("b"),
        )
        .expect("reconcile should succeed");

        assert_eq!(remainder, Money::new(1, 2));
        assert_eq!(shares["a"], Money::new(1828, 2));
        assert_eq!(shares["b"], Money::new(1829, 2));
        assert_eq!(shares["c"], Money::new(1828, 2));
    }

    #[test]
    fn balanced_pool_is_left_untouched() {
        let mut shares = allocations(&[("a", "28.80"), ("b", "7.20")]);
        let before = shares.clone();

        let remainder = reconcile_remainder(
            Pool::Usage(UsageCategory::Minutes),
            &mut shares,
            Money::new(36, 0),
            &DeviceId::from("a"),
        )
        .expect("reconcile should succeed");

        assert!(remainder.is_zero());
        assert_eq!(shares, before);
    }

    #[test]
    fn whole_pool_goes_to_short_straw_when_nothing_was_allocated() {
        let mut shares = allocations(&[("a", "0"), ("b", "0")]);

        let remainder = reconcile_remainder(
            Pool::Usage(UsageCategory::Messages),
            &mut shares,
            Money::new(1000, 2),
            &DeviceId::from("b"),
        )
        .expect("reconcile should succeed");

        assert_eq!(remainder, Money::new(10, 0));
        assert_eq!(shares["a"], Money::ZERO);
        assert_eq!(shares["b"], Money::new(10, 0));
    }

    #[test]
    fn rejects_allocations_above_pool() {
        let mut shares = allocations(&[("a", "5.01"), ("b", "5.00")]);

        let result = reconcile_remainder(
            Pool::Usage(UsageCategory::Megabytes),
            &mut shares,
            Money::new(10, 0),
            &DeviceId::from("a"),
        );

        assert_eq!(
            result,
            Err(AllocationError::ReconciliationInvariantViolation {
                pool: Pool::Usage(UsageCategory::Megabytes),
                allocated: Money::new(1001, 2),
                intended: Money::new(10, 0),
            })
        );
    }
}
