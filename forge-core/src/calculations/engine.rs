//! Sale value, new balance and shortfall for a session.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use rust_decimal_macros::dec;
//! use forge_core::calculations::CalculationEngine;
//! use forge_core::{Catalog, GoalStatus};
//!
//! let catalog = Catalog::forge();
//! let engine = CalculationEngine::new(&catalog);
//!
//! let mut quantities = BTreeMap::new();
//! quantities.insert("Grande".to_string(), 2);
//!
//! let result = engine.calculate(dec!(50), dec!(100), &quantities);
//!
//! assert_eq!(result.total_sale_value, dec!(70));
//! assert_eq!(result.new_balance, dec!(120));
//! assert_eq!(result.status(), GoalStatus::Reached { surplus: dec!(20) });
//! ```

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::calculations::recommend::recommend;
use crate::models::{CalculationResult, Catalog, Recommendation, SessionState};

/// Calculator bound to a catalog of priced essences.
#[derive(Debug, Clone, Copy)]
pub struct CalculationEngine<'a> {
    catalog: &'a Catalog,
}

impl<'a> CalculationEngine<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Computes the result for the given figures. Pure: the same inputs
    /// always give the same result.
    ///
    /// Quantities keyed by names missing from the catalog are ignored.
    /// Sums saturate at `Decimal::MAX` instead of overflowing.
    pub fn calculate(
        &self,
        balance: Decimal,
        goal: Decimal,
        quantities: &BTreeMap<String, u64>,
    ) -> CalculationResult {
        let total_sale_value = self.total_sale_value(quantities);
        let new_balance = balance.saturating_add(total_sale_value);

        CalculationResult {
            total_sale_value,
            new_balance,
            shortfall: goal.saturating_sub(new_balance),
        }
    }

    pub fn calculate_state(
        &self,
        state: &SessionState,
    ) -> CalculationResult {
        self.calculate(state.balance, state.goal, &state.quantities)
    }

    /// Recommendations for a result, empty unless the goal is still out of
    /// reach.
    pub fn recommendations(
        &self,
        result: &CalculationResult,
    ) -> Vec<Recommendation<'a>> {
        if result.status().wants_recommendations() {
            recommend(result.shortfall, self.catalog)
        } else {
            Vec::new()
        }
    }

    fn total_sale_value(
        &self,
        quantities: &BTreeMap<String, u64>,
    ) -> Decimal {
        for name in quantities.keys().filter(|n| !self.catalog.contains(n)) {
            tracing::debug!(essence = %name, "quantity for unknown essence ignored");
        }

        self.catalog
            .iter()
            .map(|essence| {
                let quantity = quantities.get(&essence.name).copied().unwrap_or(0);
                Decimal::from(quantity).saturating_mul(essence.unit_price)
            })
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }
}
