use billsplit_domain::Money;
use rust_decimal::{Decimal, RoundingStrategy};

const DISPLAY_SCALE: u32 = 2;

/// Dollar amount with exactly two decimals, e.g. `18.29`.
pub fn format_money(amount: Money) -> String {
    let rounded = amount
        .as_decimal()
        .round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

/// Usage fraction as a percentage, e.g. `0.333333` -> `33.33%`.
pub fn format_percentage(fraction: Decimal) -> String {
    let percent = (fraction * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    format!("{percent:.2}%")
}
