use rust_decimal::Decimal;

use crate::calculations::common::units_to_cover;
use crate::models::{Catalog, Recommendation};

/// How many units of each essence would close `shortfall` on their own.
///
/// Essences come back most valuable first; the most valuable one is
/// flagged `optimal`. Returns nothing when there is no shortfall.
pub fn recommend(
    shortfall: Decimal,
    catalog: &Catalog,
) -> Vec<Recommendation<'_>> {
    if shortfall <= Decimal::ZERO {
        tracing::warn!(%shortfall, "recommendations requested without a shortfall");
        return Vec::new();
    }

    catalog
        .iter()
        .rev()
        .enumerate()
        .map(|(idx, essence)| Recommendation {
            essence,
            units_needed: units_to_cover(shortfall, essence.unit_price),
            optimal: idx == 0,
        })
        .collect()
}
