use crate::{
    error::AllocationError,
    model::{
        BillDefinition, BillSplit, CategorySplit, DeviceId, Money, Pool, Remainders,
        UsageCategory, UsageMaps,
    },
    services::{
        AllocationContext, BillValidator, ShortStrawPolicy,
        remainder_reconciliation::{reconcile_remainder, truncate_to_scale},
    },
};
use indexmap::IndexMap;
use rust_decimal::Decimal;

/// Splits a bill across its devices by metered usage.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllocationEngine;

impl AllocationEngine {
    /// Computes per-device costs, quantities and percentages for every usage
    /// category, plus an even split of devices cost and fees.
    ///
    /// Each device's cost is `billable * quantity / category_total`, truncated
    /// to `context.presentation_scale`. The shared pool is divided evenly and
    /// truncated the same way. Whatever truncation leaves over in a pool is
    /// added to the short-straw device so that every pool sums exactly to its
    /// billed amount. A category nobody used sends its whole billable amount
    /// to the short straw.
    ///
    /// # Example
    /// ```
    /// use billsplit_domain::{BillDefinition, Device, DeviceId, Money, UsageCategory, UsageMaps};
    /// use billsplit_domain::services::{AllocationContext, AllocationEngine};
    ///
    /// let bill = BillDefinition {
    ///     devices: vec![Device::new("111", "ann"), Device::new("222", "bo")],
    ///     minutes: Money::new(3600, 2),
    ///     ..BillDefinition::default()
    /// };
    /// let mut usage = UsageMaps::default();
    /// usage.minutes.insert(DeviceId::from("111"), 4);
    /// usage.minutes.insert(DeviceId::from("222"), 1);
    ///
    /// let split = AllocationEngine
    ///     .compute_split(&usage, &bill, AllocationContext::usd_default())
    ///     .unwrap();
    /// assert_eq!(split.category(UsageCategory::Minutes).cost("111"), Money::new(2880, 2));
    /// ```
    pub fn compute_split(
        &self,
        usage: &UsageMaps,
        bill: &BillDefinition,
        context: AllocationContext,
    ) -> Result<BillSplit, AllocationError> {
        context.validate()?;
        BillValidator::validate(bill, usage)?;
        let short_straw = ShortStrawPolicy::select(bill, context.short_straw_fallback)?.clone();

        tracing::debug!(
            description = %bill.description,
            device_count = bill.devices.len(),
            short_straw = %short_straw,
            intermediate_scale = context.intermediate_scale,
            presentation_scale = context.presentation_scale,
            rounding_mode = ?context.rounding_mode,
            "Bill allocation started"
        );

        let mut remainders = Remainders::default();
        let minutes = self.split_category(
            UsageCategory::Minutes,
            usage,
            bill,
            context,
            &short_straw,
            &mut remainders,
        )?;
        let messages = self.split_category(
            UsageCategory::Messages,
            usage,
            bill,
            context,
            &short_straw,
            &mut remainders,
        )?;
        let megabytes = self.split_category(
            UsageCategory::Megabytes,
            usage,
            bill,
            context,
            &short_straw,
            &mut remainders,
        )?;
        let shared_costs = self.split_shared(bill, context, &short_straw, &mut remainders)?;

        Ok(BillSplit {
            minutes,
            messages,
            megabytes,
            shared_costs,
            short_straw,
            remainders,
        })
    }

    fn split_category(
        &self,
        category: UsageCategory,
        usage: &UsageMaps,
        bill: &BillDefinition,
        context: AllocationContext,
        short_straw: &DeviceId,
        remainders: &mut Remainders,
    ) -> Result<CategorySplit, AllocationError> {
        let pool = Pool::Usage(category);
        let overflow = || AllocationError::ArithmeticOverflow { pool };
        let usage_map = usage.get(category);

        // All reported usage counts toward the denominator, billed or not.
        let total_quantity = usage_map
            .values()
            .try_fold(0_i64, |acc, quantity| acc.checked_add(*quantity))
            .ok_or_else(overflow)?;
        let billable = bill.billable_amount(category).ok_or_else(overflow)?;

        if total_quantity == 0 {
            tracing::info!(
                category = %category,
                billable = %billable,
                "No usage reported; billable amount goes to the short straw device"
            );
        }

        let total = Decimal::from(total_quantity);
        let mut split = CategorySplit::default();
        for id in bill.device_ids() {
            let quantity = usage_map.get(id).copied().unwrap_or(0);
            let (percentage, cost) = if total_quantity == 0 {
                (Decimal::ZERO, Decimal::ZERO)
            } else {
                let quantity = Decimal::from(quantity);
                let percentage = quantity
                    .checked_div(total)
                    .ok_or_else(overflow)?
                    .round_dp_with_strategy(
                        context.intermediate_scale,
                        context.rounding_mode.strategy(),
                    );
                let share = billable
                    .as_decimal()
                    .checked_mul(quantity)
                    .and_then(|product| product.checked_div(total))
                    .ok_or_else(overflow)?;
                (
                    percentage,
                    truncate_to_scale(share, context.presentation_scale),
                )
            };

            split.quantities.insert(id.clone(), quantity);
            split.percentages.insert(id.clone(), percentage);
            split.costs.insert(id.clone(), Money::from_decimal(cost));
        }

        let remainder = reconcile_remainder(pool, &mut split.costs, billable, short_straw)?;
        remainders.set(pool, remainder);

        Ok(split)
    }

    fn split_shared(
        &self,
        bill: &BillDefinition,
        context: AllocationContext,
        short_straw: &DeviceId,
        remainders: &mut Remainders,
    ) -> Result<IndexMap<DeviceId, Money>, AllocationError> {
        let pool = Pool::Shared;
        let overflow = || AllocationError::ArithmeticOverflow { pool };

        let shared_pool = bill.shared_pool().ok_or_else(overflow)?;
        let device_count = Decimal::from(bill.devices.len());
        let per_device = shared_pool
            .as_decimal()
            .checked_div(device_count)
            .map(|share| Money::from_decimal(truncate_to_scale(share, context.presentation_scale)))
            .ok_or_else(overflow)?;

        let mut shared_costs: IndexMap<DeviceId, Money> = bill
            .device_ids()
            .map(|id| (id.clone(), per_device))
            .collect();

        let remainder = reconcile_remainder(pool, &mut shared_costs, shared_pool, short_straw)?;
        remainders.set(pool, remainder);

        Ok(shared_costs)
    }
}
