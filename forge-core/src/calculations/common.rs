//! Common arithmetic helpers shared by the engine, the recommender and the
//! number formatter.
//!
//! Every "how much is still needed" figure is rounded **up**: showing the
//! user one unit too few would leave them short of their goal.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Rounds a decimal value up to the next whole number.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use forge_core::calculations::common::ceil_whole;
///
/// assert_eq!(ceil_whole(dec!(12.01)), dec!(13));
/// assert_eq!(ceil_whole(dec!(12)), dec!(12));
/// assert_eq!(ceil_whole(dec!(-20.5)), dec!(-20));
/// ```
pub fn ceil_whole(value: Decimal) -> Decimal {
    value.ceil()
}

/// Clamps a value to zero from below.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use forge_core::calculations::common::non_negative;
///
/// assert_eq!(non_negative(dec!(-3.5)), dec!(0));
/// assert_eq!(non_negative(dec!(3.5)), dec!(3.5));
/// ```
pub fn non_negative(value: Decimal) -> Decimal {
    if value < Decimal::ZERO { Decimal::ZERO } else { value }
}

/// Converts a non-negative decimal to a whole count, saturating at
/// `u64::MAX`. Fractions are truncated.
pub fn to_count(value: Decimal) -> u64 {
    let whole = non_negative(value).trunc();
    whole.to_u64().unwrap_or(u64::MAX)
}

/// Number of units at `unit_price` needed to cover `amount`, rounded up.
///
/// Returns zero when there is nothing to cover or the price is not
/// positive.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use forge_core::calculations::common::units_to_cover;
///
/// assert_eq!(units_to_cover(dec!(100), dec!(35)), 3);
/// assert_eq!(units_to_cover(dec!(100), dec!(2.5)), 40);
/// ```
pub fn units_to_cover(
    amount: Decimal,
    unit_price: Decimal,
) -> u64 {
    if amount <= Decimal::ZERO || unit_price <= Decimal::ZERO {
        return 0;
    }
    match amount.checked_div(unit_price) {
        Some(units) => to_count(ceil_whole(units)),
        None => u64::MAX,
    }
}
