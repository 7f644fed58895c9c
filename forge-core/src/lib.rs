pub mod calculations;
pub mod debounce;
pub mod models;
pub mod parser;
pub mod session;
pub mod storage;

pub use calculations::CalculationEngine;
pub use models::*;
pub use session::{Evaluation, Session, StateDelta, UserInput};
pub use storage::{PersistenceSlot, SlotError, StateStore};
