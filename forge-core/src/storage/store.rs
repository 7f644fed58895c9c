//! In-memory session state backed by a persistence slot.
//!
//! The in-memory copy is always authoritative. Slot failures are logged and
//! reported through the `bool` results; they never interrupt the session.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::slot::{MemorySlot, PersistenceSlot};
use crate::calculations::common::non_negative;
use crate::models::{ExportRecord, SessionState};

pub struct StateStore {
    state: SessionState,
    slot: Box<dyn PersistenceSlot>,
}

impl StateStore {
    pub fn new(slot: Box<dyn PersistenceSlot>) -> Self {
        Self {
            state: SessionState::default(),
            slot,
        }
    }

    /// A store whose slot lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemorySlot::new()))
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn set_balance(
        &mut self,
        value: Decimal,
    ) {
        self.state.balance = value;
    }

    pub fn set_goal(
        &mut self,
        value: Decimal,
    ) {
        self.state.goal = value;
    }

    pub fn set_quantity(
        &mut self,
        name: &str,
        quantity: u64,
    ) {
        self.state.quantities.insert(name.to_string(), quantity);
    }

    /// Writes the current state to the slot.
    pub fn persist(&mut self) -> bool {
        let blob = match serde_json::to_string(&self.state) {
            Ok(blob) => blob,
            Err(error) => {
                tracing::error!(?error, "failed to serialize session state");
                return false;
            }
        };

        match self.slot.write(&blob) {
            Ok(()) => {
                tracing::trace!(bytes = blob.len(), "session state persisted");
                true
            }
            Err(error) => {
                tracing::error!(%error, "failed to persist session state");
                false
            }
        }
    }

    /// Replaces the state with the slot's contents.
    ///
    /// Returns `false` and leaves the state untouched when the slot is
    /// empty, unreadable or holds something that is not a session.
    pub fn restore(&mut self) -> bool {
        let blob = match self.slot.read() {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                tracing::debug!("no saved session");
                return false;
            }
            Err(error) => {
                tracing::warn!(%error, "failed to read saved session");
                return false;
            }
        };

        match serde_json::from_str::<SessionState>(&blob) {
            Ok(mut restored) => {
                restored.balance = non_negative(restored.balance);
                restored.goal = non_negative(restored.goal);
                self.state = restored;
                tracing::info!(
                    balance = %self.state.balance,
                    goal = %self.state.goal,
                    essences = self.state.quantities.len(),
                    "saved session restored"
                );
                true
            }
            Err(error) => {
                tracing::warn!(%error, "saved session is corrupt, ignoring it");
                false
            }
        }
    }

    /// Back to zero balance, zero goal and no quantities; the slot is
    /// erased.
    pub fn reset(&mut self) {
        self.state = SessionState::default();
        if let Err(error) = self.slot.erase() {
            tracing::warn!(%error, "failed to erase saved session");
        }
    }

    /// A copy of the state stamped with the current time.
    pub fn snapshot(&self) -> ExportRecord {
        self.snapshot_at(Utc::now())
    }

    pub fn snapshot_at(
        &self,
        timestamp: DateTime<Utc>,
    ) -> ExportRecord {
        ExportRecord::new(self.state.clone(), timestamp)
    }
}
