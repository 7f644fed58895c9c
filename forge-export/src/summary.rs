//! Tabular sale summary.
//!
//! ## CSV Format
//!
//! One row per essence with a non-zero quantity, in catalog order. The
//! header row is always written, even when nothing is listed.
//!
//! | Column     | Type    | Notes                      |
//! |------------|---------|----------------------------|
//! | `Esencia`  | string  | Essence name               |
//! | `Cantidad` | integer | Quantity to sell           |
//! | `Precio`   | decimal | Unit price                 |
//! | `Total`    | decimal | `Cantidad × Precio`        |
//!
//! ### Example
//!
//! ```csv
//! Esencia,Cantidad,Precio,Total
//! Minúscula,3,2.5,7.5
//! Épica,2,100,200
//! ```
use std::io;

use forge_core::{Catalog, SessionState};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::ExportError;

pub const HEADER: [&str; 4] = ["Esencia", "Cantidad", "Precio", "Total"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub essence: String,
    pub quantity: u64,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// Rows for every essence the session plans to sell.
pub fn summary_rows(
    catalog: &Catalog,
    state: &SessionState,
) -> Vec<SummaryRow> {
    catalog
        .iter()
        .filter_map(|essence| {
            let quantity = state.quantity(&essence.name);
            (quantity > 0).then(|| SummaryRow {
                essence: essence.name.clone(),
                quantity,
                unit_price: essence.unit_price,
                line_total: (Decimal::from(quantity) * essence.unit_price).normalize(),
            })
        })
        .collect()
}

/// Writes the header and `rows` as CSV.
pub fn write_summary<W: io::Write>(
    rows: &[SummaryRow],
    writer: W,
) -> Result<(), ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false) // header is written explicitly so empty summaries still get one
        .from_writer(writer);

    csv_writer.write_record(HEADER)?;
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Convenience wrapper returning the CSV as a string.
pub fn summary_to_string(
    catalog: &Catalog,
    state: &SessionState,
) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_summary(&summary_rows(catalog, state), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| ExportError::Encoding(e.to_string()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn state_with(pairs: &[(&str, u64)]) -> SessionState {
        SessionState {
            quantities: pairs.iter().map(|(n, q)| (n.to_string(), *q)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn rows_skip_zero_quantities() {
        let catalog = Catalog::forge();
        let state = state_with(&[("Grande", 0), ("Mayor", 2)]);

        let rows = summary_rows(&catalog, &state);

        assert_eq!(
            rows,
            vec![SummaryRow {
                essence: "Mayor".to_string(),
                quantity: 2,
                unit_price: dec!(50),
                line_total: dec!(100),
            }]
        );
    }

    #[test]
    fn rows_follow_catalog_order() {
        let catalog = Catalog::forge();
        // BTreeMap orders these alphabetically; output must not
        let state = state_with(&[("Épica", 1), ("Grande", 1), ("Minúscula", 1)]);

        let names: Vec<String> = summary_rows(&catalog, &state)
            .into_iter()
            .map(|r| r.essence)
            .collect();

        assert_eq!(names, vec!["Minúscula", "Grande", "Épica"]);
    }

    #[test]
    fn rows_ignore_unknown_essences() {
        let catalog = Catalog::forge();
        let state = state_with(&[("Legendaria", 9)]);

        assert!(summary_rows(&catalog, &state).is_empty());
    }

    #[test]
    fn csv_has_header_and_totals() {
        let catalog = Catalog::forge();
        let state = state_with(&[("Minúscula", 3), ("Épica", 2)]);

        let csv = summary_to_string(&catalog, &state).unwrap();

        assert_eq!(
            csv,
            "Esencia,Cantidad,Precio,Total\nMinúscula,3,2.5,7.5\nÉpica,2,100,200\n"
        );
    }

    #[test]
    fn totals_drop_trailing_zeros() {
        let catalog = Catalog::forge();
        let state = state_with(&[("Minúscula", 4), ("Mediana", 2)]);

        let csv = summary_to_string(&catalog, &state).unwrap();

        assert_eq!(
            csv,
            "Esencia,Cantidad,Precio,Total\nMinúscula,4,2.5,10\nMediana,2,15,30\n"
        );
    }

    #[test]
    fn empty_summary_still_has_header() {
        let catalog = Catalog::forge();

        let csv = summary_to_string(&catalog, &SessionState::default()).unwrap();

        assert_eq!(csv, "Esencia,Cantidad,Precio,Total\n");
    }
}
