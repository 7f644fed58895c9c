pub mod factory;
pub mod slot;
pub mod store;

pub use factory::{MemorySlotFactory, SlotConfig, SlotFactory, SlotRegistry};
pub use slot::{MemorySlot, PersistenceSlot, SLOT_KEY, SlotError};
pub use store::StateStore;
