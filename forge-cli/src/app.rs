//! Glue between the terminal and a [`Session`].

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use forge_core::parser::NumberFormat;
use forge_core::storage::{SlotConfig, SlotRegistry};
use forge_core::{Session, StateDelta, StateStore, UserInput};
use forge_export::{ExportFormat, export_to_dir};
use forge_store::FileSlotFactory;
use tracing::{debug, warn};

use crate::commands::{Command, HELP, is_affirmative, parse_command};
use crate::logging;
use crate::render;

/// Build a [`SlotRegistry`] with every backend this binary knows about.
pub fn build_registry() -> SlotRegistry {
    let mut registry = SlotRegistry::new();
    registry.register(Box::new(FileSlotFactory));
    registry
}

/// Open the configured slot, falling back to memory when it cannot be
/// opened. The session stays usable either way; only saving is lost.
pub fn open_store(
    registry: &SlotRegistry,
    config: &SlotConfig,
) -> StateStore {
    match registry.create(config) {
        Ok(slot) => StateStore::new(slot),
        Err(error) => {
            warn!(%error, backend = %config.backend, "persistence unavailable; progress will not be saved");
            StateStore::in_memory()
        }
    }
}

/// What the read loop should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// The next line answers the clear prompt.
    ConfirmClear,
    Quit,
}

pub struct App<'c, W: Write> {
    session: Session<'c>,
    format: NumberFormat,
    export_dir: PathBuf,
    out: W,
    /// Set once a failed save has been reported; cleared by the next
    /// successful one.
    save_failed: bool,
}

impl<'c, W: Write> App<'c, W> {
    pub fn new(
        session: Session<'c>,
        format: NumberFormat,
        export_dir: PathBuf,
        out: W,
    ) -> Self {
        Self {
            session,
            format,
            export_dir,
            out,
            save_failed: false,
        }
    }

    pub fn session(&self) -> &Session<'c> {
        &self.session
    }

    /// Restores the saved session and prints the starting view.
    pub fn start(&mut self) -> Result<()> {
        if self.session.load() {
            writeln!(self.out, "📂 Datos cargados correctamente")?;
        }
        self.show()
    }

    /// Reads commands until `salir` or end of input. Pending edits are
    /// applied before returning.
    pub fn run<R: BufRead>(
        &mut self,
        input: R,
    ) -> Result<()> {
        let mut flow = Flow::Continue;
        for line in input.lines() {
            let line = line?;
            flow = match flow {
                Flow::ConfirmClear => self.confirm_clear(&line)?,
                _ => self.handle_line(&line)?,
            };
            if flow == Flow::Quit {
                break;
            }
        }

        if !self.session.flush().is_empty() {
            let evaluation = self.session.evaluate();
            self.report_autosave(evaluation.persisted)?;
        }
        Ok(())
    }

    /// Handles one command line.
    pub fn handle_line(
        &mut self,
        line: &str,
    ) -> Result<Flow> {
        let command = match parse_command(line, self.session.catalog()) {
            Ok(command) => command,
            Err(error) => {
                writeln!(self.out, "❌ {error}")?;
                return Ok(Flow::Continue);
            }
        };
        debug!(?command, "command");

        match command {
            Command::Nothing => {}
            Command::Input(UserInput::Clear) => {
                writeln!(self.out, "{}", render::CLEAR_PROMPT)?;
                return Ok(Flow::ConfirmClear);
            }
            Command::Input(event) => self.apply(event)?,
            Command::Export(format) => self.export(format)?,
            Command::Show => self.show()?,
            Command::LogLevel(level) => match logging::set_log_level(&level) {
                Ok(()) => writeln!(self.out, "Nivel de log: {level}")?,
                Err(error) => writeln!(self.out, "❌ {error}")?,
            },
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn confirm_clear(
        &mut self,
        answer: &str,
    ) -> Result<Flow> {
        if is_affirmative(answer) {
            self.apply(UserInput::Clear)?;
        } else {
            writeln!(self.out, "Cancelado")?;
        }
        Ok(Flow::Continue)
    }

    /// A submitted line is a finished edit, so held values are applied
    /// right away instead of waiting for the debounce window.
    fn apply(
        &mut self,
        event: UserInput,
    ) -> Result<()> {
        let mut deltas: Vec<StateDelta> = self.session.submit(event, Instant::now()).into_iter().collect();
        deltas.extend(self.session.flush());

        for delta in &deltas {
            if let Some(message) = render::toast(delta) {
                writeln!(self.out, "{message}")?;
            }
            if let StateDelta::Saved(saved) = delta {
                self.save_failed = !saved;
            }
        }

        if deltas.iter().any(StateDelta::needs_recalculation) {
            let evaluation = self.session.evaluate();
            write!(self.out, "{}", render::evaluation(&evaluation, self.format))?;
            self.report_autosave(evaluation.persisted)?;
        }
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        let table = render::catalog_table(self.session.catalog(), self.session.state(), self.format);
        let evaluation = self.session.evaluate();
        write!(self.out, "{table}{}", render::evaluation(&evaluation, self.format))?;
        self.report_autosave(evaluation.persisted)
    }

    /// Tells the user about the first failed automatic save in a row.
    fn report_autosave(
        &mut self,
        persisted: bool,
    ) -> Result<()> {
        if persisted {
            self.save_failed = false;
        } else if !self.save_failed {
            self.save_failed = true;
            writeln!(self.out, "{}", render::SAVE_FAILED)?;
        }
        Ok(())
    }

    fn export(
        &mut self,
        format: ExportFormat,
    ) -> Result<()> {
        let record = self.session.snapshot();
        match export_to_dir(&self.export_dir, format, self.session.catalog(), &record) {
            Ok(path) => writeln!(self.out, "📊 Exportado correctamente: {}", path.display())?,
            Err(error) => {
                warn!(%error, "export failed");
                writeln!(self.out, "❌ Error al exportar: {error}")?;
            }
        }
        Ok(())
    }

    pub fn into_output(self) -> W {
        self.out
    }
}
