mod calculation;
mod essence;
mod session_state;

pub use calculation::{CalculationResult, GoalStatus, Recommendation};
pub use essence::{Catalog, CatalogError, Essence};
pub use session_state::{ExportRecord, SCHEMA_VERSION, SessionState};
