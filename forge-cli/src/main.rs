use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

use forge_cli::app::{self, App};
use forge_cli::config::AppConfig;
use forge_cli::logging;
use forge_core::parser::NumberFormat;
use forge_core::{Catalog, Session};

const DEFAULT_CONFIG: &str = "forge.toml";

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Forge essence sales calculator.
///
/// Enter your balance, your goal and how many essences you plan to sell;
/// the calculator shows the resulting balance and, while the goal is out of
/// reach, how many units of each essence would close the gap.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// Config file. Defaults to `forge.toml` in the working directory when
    /// it exists.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Persistence backend (`file` or `memory`).
    #[arg(long)]
    backend: Option<String>,

    /// Directory holding the saved session.
    #[arg(long)]
    state_dir: Option<String>,

    /// Where exports are written.
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `forge_core=trace`.
    #[arg(long)]
    log_level: Option<String>,

    /// Also append logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Thousands separator for displayed amounts.
    #[arg(long)]
    separator: Option<char>,
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None if PathBuf::from(DEFAULT_CONFIG).is_file() => AppConfig::load(DEFAULT_CONFIG.as_ref())?,
            None => AppConfig::default(),
        };

        if let Some(backend) = &self.backend {
            config.storage.backend = backend.clone();
        }
        if let Some(dir) = &self.state_dir {
            config.storage.location = dir.clone();
        }
        if let Some(dir) = &self.export_dir {
            config.export.dir = dir.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(file) = &self.log_file {
            config.logging.file = Some(file.clone());
        }
        if let Some(separator) = self.separator {
            config.display.separator = separator;
        }
        config.validate()?;
        Ok(config)
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config().context("loading configuration")?;

    logging::init_logging(&config.logging.level)?;
    if let Some(path) = &config.logging.file {
        logging::enable_file_logging(path)?;
    }
    debug!(?config, "configuration loaded");

    let catalog = Catalog::forge();
    let registry = app::build_registry();
    let store = app::open_store(&registry, &config.storage);
    let session = Session::with_window(&catalog, store, config.input.debounce_window());

    let stdout = io::stdout();
    let mut app = App::new(
        session,
        NumberFormat::new(config.display.separator),
        config.export.dir.clone(),
        stdout.lock(),
    );

    app.start()?;
    if io::stdin().is_terminal() {
        println!("Escribe 'ayuda' para ver los comandos.");
    }
    app.run(io::stdin().lock())?;

    info!("bye");
    Ok(())
}
