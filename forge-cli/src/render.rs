//! Plain-text views of the session.

use std::fmt::Write;

use forge_core::parser::NumberFormat;
use forge_core::{Catalog, Evaluation, GoalStatus, SessionState, StateDelta};

pub const CLEAR_PROMPT: &str = "¿Estás seguro de que deseas borrar todo el progreso? (s/n)";

pub const SAVE_FAILED: &str = "❌ Error al guardar el progreso";

/// The essence table with unit prices and the quantities entered so far.
pub fn catalog_table(
    catalog: &Catalog,
    state: &SessionState,
    format: NumberFormat,
) -> String {
    let mut out = String::from("Esencias:\n");
    for (position, essence) in catalog.iter().enumerate() {
        let quantity = state.quantity(&essence.name);
        let _ = writeln!(
            out,
            "  {:>2}. {:<10} {:>6}  × {}",
            position + 1,
            essence.name,
            essence.unit_price.normalize(),
            format.format(quantity.into())
        );
    }
    out
}

/// One-line status, prefixed with its icon.
pub fn status_line(
    status: &GoalStatus,
    format: NumberFormat,
) -> String {
    match status {
        GoalStatus::AwaitingInput => "ℹ️  Ingresa tus datos para comenzar".to_string(),
        GoalStatus::Reached { surplus } => {
            format!("🎉 ¡META LOGRADA! Excedente: {}", format.format(*surplus))
        }
        GoalStatus::NotReached { shortfall } => {
            format!("⚠️  Faltan: {} para alcanzar tu meta", format.format(*shortfall))
        }
    }
}

/// Totals, status and, while the goal is out of reach, how many units of
/// each essence would close the gap.
pub fn evaluation(
    evaluation: &Evaluation<'_>,
    format: NumberFormat,
) -> String {
    let result = &evaluation.result;
    let mut out = String::new();
    let _ = writeln!(out, "Total de venta: {}", format.format(result.total_sale_value));
    let _ = writeln!(out, "Nuevo balance:  {}", format.format(result.new_balance));
    let _ = writeln!(out, "{}", status_line(&evaluation.status, format));

    if !evaluation.recommendations.is_empty() {
        out.push_str("Recomendaciones:\n");
        for rec in &evaluation.recommendations {
            let marker = if rec.optimal { '★' } else { ' ' };
            let _ = writeln!(
                out,
                "  {marker} {:<10} {} unidades",
                rec.essence.name,
                format.format(rec.units_needed.into())
            );
        }
    }
    out
}

/// Short confirmation for deltas the user should hear about.
pub fn toast(delta: &StateDelta) -> Option<&'static str> {
    match delta {
        StateDelta::Saved(true) => Some("✅ Progreso guardado exitosamente"),
        StateDelta::Saved(false) => Some(SAVE_FAILED),
        StateDelta::Cleared => Some("🗑️  Todos los datos han sido eliminados"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use forge_core::{CalculationEngine, StateStore};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn status_lines_use_grouping() {
        let format = NumberFormat::default();

        assert_eq!(
            status_line(&GoalStatus::AwaitingInput, format),
            "ℹ️  Ingresa tus datos para comenzar"
        );
        assert_eq!(
            status_line(&GoalStatus::Reached { surplus: dec!(20) }, format),
            "🎉 ¡META LOGRADA! Excedente: 20"
        );
        assert_eq!(
            status_line(&GoalStatus::NotReached { shortfall: dec!(1234.2) }, format),
            "⚠️  Faltan: 1,235 para alcanzar tu meta"
        );
    }

    #[test]
    fn evaluation_lists_recommendations_with_optimal_marked() {
        let catalog = Catalog::forge();
        let engine = CalculationEngine::new(&catalog);
        let state = SessionState {
            goal: dec!(100),
            ..Default::default()
        };
        let result = engine.calculate_state(&state);
        let view = Evaluation {
            result,
            status: result.status(),
            recommendations: engine.recommendations(&result),
            persisted: true,
        };

        let text = evaluation(&view, NumberFormat::default());

        assert!(text.starts_with("Total de venta: 0\nNuevo balance:  0\n"));
        assert!(text.contains("Faltan: 100 para alcanzar tu meta"));
        assert!(text.contains("  ★ Épica      1 unidades\n"));
        assert!(text.contains("    Minúscula  40 unidades\n"));
    }

    #[test]
    fn evaluation_omits_recommendations_when_reached() {
        let catalog = Catalog::forge();
        let engine = CalculationEngine::new(&catalog);
        let mut store = StateStore::in_memory();
        store.set_goal(dec!(10));
        store.set_quantity("Grande", 1);
        let result = engine.calculate_state(store.state());
        let view = Evaluation {
            result,
            status: result.status(),
            recommendations: engine.recommendations(&result),
            persisted: true,
        };

        let text = evaluation(&view, NumberFormat::new('.'));

        assert!(text.contains("¡META LOGRADA! Excedente: 25"));
        assert!(!text.contains("Recomendaciones"));
    }

    #[test]
    fn catalog_table_shows_raw_prices_and_quantities() {
        let mut state = SessionState::default();
        state.quantities.insert("Minúscula".to_string(), 1200);

        let table = catalog_table(&Catalog::forge(), &state, NumberFormat::default());

        assert!(table.contains("   1. Minúscula     2.5  × 1,200\n"));
        assert!(table.contains("   7. Épica         100  × 0\n"));
    }

    #[test]
    fn only_save_and_clear_produce_toasts() {
        assert_eq!(toast(&StateDelta::Saved(true)), Some("✅ Progreso guardado exitosamente"));
        assert_eq!(toast(&StateDelta::Saved(false)), Some("❌ Error al guardar el progreso"));
        assert!(toast(&StateDelta::Cleared).is_some());
        assert_eq!(toast(&StateDelta::Goal(dec!(5))), None);
    }
}
