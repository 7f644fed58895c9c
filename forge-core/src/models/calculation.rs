use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Essence;

/// Figures derived from a session. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Sum of quantity × unit price over the catalog.
    pub total_sale_value: Decimal,

    /// Balance after selling everything listed.
    pub new_balance: Decimal,

    /// Goal minus new balance. Negative means a surplus.
    pub shortfall: Decimal,
}

impl CalculationResult {
    /// The goal this result was computed against.
    pub fn goal(&self) -> Decimal {
        self.new_balance.saturating_add(self.shortfall)
    }

    pub fn status(&self) -> GoalStatus {
        let goal = self.goal();
        if goal.is_zero() {
            GoalStatus::AwaitingInput
        } else if self.new_balance >= goal {
            GoalStatus::Reached {
                surplus: self.new_balance.saturating_sub(goal),
            }
        } else {
            GoalStatus::NotReached {
                shortfall: self.shortfall,
            }
        }
    }
}

/// What the presentation layer should tell the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalStatus {
    /// No goal entered yet.
    AwaitingInput,
    Reached { surplus: Decimal },
    NotReached { shortfall: Decimal },
}

impl GoalStatus {
    pub fn wants_recommendations(&self) -> bool {
        matches!(self, Self::NotReached { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation<'a> {
    pub essence: &'a Essence,
    pub units_needed: u64,
    pub optimal: bool,
}
