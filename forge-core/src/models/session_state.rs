use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Schema tag stamped on every exported record.
pub const SCHEMA_VERSION: &str = "4.0";

/// The user's working figures: what they hold, what they want, and how
/// many of each essence they plan to sell.
///
/// Older snapshots used `saldo`/`meta` and could hold fractional or negative
/// quantities; both are still accepted when reading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(alias = "saldo")]
    pub balance: Decimal,
    #[serde(alias = "meta")]
    pub goal: Decimal,
    #[serde(default, deserialize_with = "lenient_quantities")]
    pub quantities: BTreeMap<String, u64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredCount {
    Whole(u64),
    Amount(f64),
}

/// Truncates fractional counts; negatives and NaN become zero.
fn lenient_quantities<'de, D>(deserializer: D) -> Result<BTreeMap<String, u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let stored = BTreeMap::<String, StoredCount>::deserialize(deserializer)?;
    Ok(stored
        .into_iter()
        .map(|(name, count)| {
            let count = match count {
                StoredCount::Whole(n) => n,
                // `as` saturates: fractions truncate, negatives and NaN give 0
                StoredCount::Amount(x) => x as u64,
            };
            (name, count)
        })
        .collect())
}

impl SessionState {
    /// Quantity for `name`, zero when never set.
    pub fn quantity(&self, name: &str) -> u64 {
        self.quantities.get(name).copied().unwrap_or(0)
    }
}

/// A copy of the session handed to exporters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    #[serde(flatten)]
    pub state: SessionState,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl ExportRecord {
    pub fn new(
        state: SessionState,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            state,
            timestamp,
            version: SCHEMA_VERSION.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn quantity_defaults_to_zero() {
        let state = SessionState::default();

        assert_eq!(state.quantity("Épica"), 0);
    }

    #[test]
    fn deserializes_legacy_field_names() {
        let json = r#"{"saldo": 1500, "meta": 20000, "quantities": {"Mayor": 3}}"#;

        let state: SessionState = serde_json::from_str(json).unwrap();

        assert_eq!(state.balance, dec!(1500));
        assert_eq!(state.goal, dec!(20000));
        assert_eq!(state.quantity("Mayor"), 3);
    }

    #[test]
    fn legacy_fractional_and_negative_quantities_are_truncated() {
        let json = r#"{"saldo": 0, "meta": 100, "quantities": {"Mayor": 1.5, "Grande": -2, "Épica": 4.0}}"#;

        let state: SessionState = serde_json::from_str(json).unwrap();

        assert_eq!(state.quantity("Mayor"), 1);
        assert_eq!(state.quantity("Grande"), 0);
        assert_eq!(state.quantity("Épica"), 4);
    }

    #[test]
    fn missing_quantities_deserialize_as_empty() {
        let json = r#"{"balance": "10", "goal": "20"}"#;

        let state: SessionState = serde_json::from_str(json).unwrap();

        assert!(state.quantities.is_empty());
    }

    #[test]
    fn export_record_flattens_state_and_stamps_version() {
        let mut state = SessionState {
            balance: dec!(50),
            goal: dec!(100),
            ..Default::default()
        };
        state.quantities.insert("Grande".to_string(), 2);
        let at = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();

        let value = serde_json::to_value(ExportRecord::new(state, at)).unwrap();

        assert_eq!(value["balance"], "50");
        assert_eq!(value["goal"], "100");
        assert_eq!(value["quantities"]["Grande"], 2);
        assert_eq!(value["timestamp"], "2025-03-14T09:26:53Z");
        assert_eq!(value["version"], "4.0");
    }
}
