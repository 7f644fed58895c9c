//! Toolkit-independent input handling.
//!
//! A presentation layer turns whatever its widgets produce into
//! [`UserInput`] events and hands them to a [`Session`]. Typed edits can go
//! through [`Session::submit`], which debounces them per field; buttons and
//! commands go through [`Session::on_user_input`] directly. After changes,
//! [`Session::evaluate`] runs the engine and saves the session.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use rust_decimal::Decimal;
use serde::Serialize;

use crate::calculations::CalculationEngine;
use crate::debounce::{DEFAULT_WINDOW, Debouncer};
use crate::models::{CalculationResult, Catalog, ExportRecord, GoalStatus, Recommendation, SessionState};
use crate::parser::{parse, parse_quantity};
use crate::storage::StateStore;

/// Something the user did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserInput {
    /// Balance field text changed.
    Balance(String),
    /// Goal field text changed.
    Goal(String),
    /// Quantity field text for an essence changed.
    Quantity { name: String, text: String },
    /// "+" pressed next to an essence.
    Increment(String),
    /// "−" pressed next to an essence; never goes below zero.
    Decrement(String),
    Save,
    Clear,
}

impl UserInput {
    fn field(&self) -> Option<Field> {
        match self {
            Self::Balance(_) => Some(Field::Balance),
            Self::Goal(_) => Some(Field::Goal),
            Self::Quantity { name, .. } => Some(Field::Quantity(name.clone())),
            _ => None,
        }
    }
}

/// What an input changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateDelta {
    Balance(Decimal),
    Goal(Decimal),
    Quantity { name: String, quantity: u64 },
    /// Result of an explicit save.
    Saved(bool),
    Cleared,
    /// The event referred to an essence that is not in the catalog.
    Ignored,
}

impl StateDelta {
    /// Whether the figures on screen are now stale.
    pub fn needs_recalculation(&self) -> bool {
        !matches!(self, Self::Saved(_) | Self::Ignored)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Field {
    Balance,
    Goal,
    Quantity(String),
}

/// Everything the presentation layer needs after a recalculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation<'c> {
    pub result: CalculationResult,
    pub status: GoalStatus,
    pub recommendations: Vec<Recommendation<'c>>,
    /// Whether the automatic save after calculating succeeded.
    pub persisted: bool,
}

pub struct Session<'c> {
    engine: CalculationEngine<'c>,
    store: StateStore,
    window: Duration,
    pending: BTreeMap<Field, Debouncer<UserInput>>,
}

impl<'c> Session<'c> {
    pub fn new(
        catalog: &'c Catalog,
        store: StateStore,
    ) -> Self {
        Self::with_window(catalog, store, DEFAULT_WINDOW)
    }

    pub fn with_window(
        catalog: &'c Catalog,
        store: StateStore,
        window: Duration,
    ) -> Self {
        Self {
            engine: CalculationEngine::new(catalog),
            store,
            window,
            pending: BTreeMap::new(),
        }
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.engine.catalog()
    }

    pub fn state(&self) -> &SessionState {
        self.store.state()
    }

    /// Restores the saved session, if any.
    pub fn load(&mut self) -> bool {
        self.store.restore()
    }

    pub fn snapshot(&self) -> ExportRecord {
        self.store.snapshot()
    }

    /// Applies an event right away.
    pub fn on_user_input(
        &mut self,
        event: UserInput,
    ) -> StateDelta {
        match event {
            UserInput::Balance(text) => {
                let value = parse(&text);
                self.store.set_balance(value);
                StateDelta::Balance(value)
            }
            UserInput::Goal(text) => {
                let value = parse(&text);
                self.store.set_goal(value);
                StateDelta::Goal(value)
            }
            UserInput::Quantity { name, text } => {
                let quantity = parse_quantity(&text);
                self.set_quantity(name, quantity)
            }
            UserInput::Increment(name) => {
                let quantity = self.state().quantity(&name).saturating_add(1);
                self.set_quantity(name, quantity)
            }
            UserInput::Decrement(name) => {
                let quantity = self.state().quantity(&name).saturating_sub(1);
                self.set_quantity(name, quantity)
            }
            UserInput::Save => StateDelta::Saved(self.store.persist()),
            UserInput::Clear => {
                self.pending.clear();
                self.store.reset();
                tracing::info!("session cleared");
                StateDelta::Cleared
            }
        }
    }

    /// Debounced entry point. Field edits are held until their field has
    /// been quiet for the window; anything else is applied immediately
    /// (after flushing a pending edit to the same essence, so "+" acts on
    /// the latest typed value).
    pub fn submit(
        &mut self,
        event: UserInput,
        now: Instant,
    ) -> Option<StateDelta> {
        if let Some(field) = event.field() {
            let window = self.window;
            self.pending
                .entry(field)
                .or_insert_with(|| Debouncer::new(window))
                .schedule(event, now);
            return None;
        }

        if let UserInput::Increment(name) | UserInput::Decrement(name) = &event {
            let field = Field::Quantity(name.clone());
            if let Some(held) = self.pending.remove(&field).and_then(|mut d| d.flush()) {
                self.on_user_input(held);
            }
        }
        Some(self.on_user_input(event))
    }

    /// Applies every held edit whose window has elapsed by `now`.
    pub fn poll(
        &mut self,
        now: Instant,
    ) -> Vec<StateDelta> {
        let due: Vec<UserInput> = self
            .pending
            .values_mut()
            .filter_map(|debouncer| debouncer.poll(now))
            .collect();
        self.pending.retain(|_, debouncer| debouncer.is_pending());

        due.into_iter().map(|event| self.on_user_input(event)).collect()
    }

    /// Applies every held edit now, e.g. when a field loses focus.
    pub fn flush(&mut self) -> Vec<StateDelta> {
        let held: Vec<UserInput> = std::mem::take(&mut self.pending)
            .into_values()
            .filter_map(|mut debouncer| debouncer.flush())
            .collect();

        held.into_iter().map(|event| self.on_user_input(event)).collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Earliest instant at which [`Session::poll`] will release something.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().filter_map(Debouncer::deadline).min()
    }

    /// Runs the engine on the current state, then saves it.
    pub fn evaluate(&mut self) -> Evaluation<'c> {
        let result = self.engine.calculate_state(self.store.state());
        let status = result.status();
        let recommendations = self.engine.recommendations(&result);

        let persisted = self.store.persist();
        if !persisted {
            tracing::warn!("continuing with unsaved session");
        }

        tracing::debug!(
            total = %result.total_sale_value,
            new_balance = %result.new_balance,
            shortfall = %result.shortfall,
            ?status,
            "session evaluated"
        );

        Evaluation {
            result,
            status,
            recommendations,
            persisted,
        }
    }

    fn set_quantity(
        &mut self,
        name: String,
        quantity: u64,
    ) -> StateDelta {
        if !self.catalog().contains(&name) {
            tracing::warn!(essence = %name, "unknown essence");
            return StateDelta::Ignored;
        }
        self.store.set_quantity(&name, quantity);
        StateDelta::Quantity { name, quantity }
    }
}
