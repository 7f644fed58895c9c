//! Scripted sessions against a real file slot and export directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use forge_cli::app::{self, App};
use forge_cli::config::AppConfig;
use forge_core::parser::NumberFormat;
use forge_core::storage::SlotConfig;
use forge_core::{Catalog, Session};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn file_config(dir: &Path) -> SlotConfig {
    SlotConfig {
        backend: "file".to_string(),
        location: dir.display().to_string(),
    }
}

/// Runs `script` in a fresh app over the slot in `state_dir` and returns
/// everything printed.
fn run_script(
    state_dir: &Path,
    export_dir: &Path,
    script: &str,
) -> String {
    let catalog = Catalog::forge();
    let store = app::open_store(&app::build_registry(), &file_config(state_dir));
    let session = Session::new(&catalog, store);
    let mut app = App::new(session, NumberFormat::default(), export_dir.to_path_buf(), Vec::new());

    app.start().unwrap();
    app.run(script.as_bytes()).unwrap();
    String::from_utf8(app.into_output()).unwrap()
}

#[test]
fn test_fixture_config_loads() {
    let config = AppConfig::load(&fixture("forge.toml")).unwrap();

    assert_eq!(config.storage, SlotConfig {
        backend: "file".to_string(),
        location: "saves".to_string(),
    });
    assert_eq!(config.input.debounce_window(), Duration::from_millis(300));
    assert_eq!(config.display.separator, '.');
    assert_eq!(config.logging.level, "forge_core=debug,warn");
    assert_eq!(config.logging.file, Some(PathBuf::from("forge.log")));
    assert_eq!(config.export.dir, PathBuf::from("exports"));
}

#[test]
fn test_script_reaches_goal() {
    let state = tempfile::tempdir().unwrap();
    let exports = tempfile::tempdir().unwrap();

    let out = run_script(
        state.path(),
        exports.path(),
        "saldo 50\nmeta 100\nset grande 2\nsalir\n",
    );

    assert!(out.contains("ℹ️  Ingresa tus datos para comenzar"));
    assert!(out.contains("Faltan: 50 para alcanzar tu meta"));
    assert!(out.contains("Total de venta: 70"));
    assert!(out.contains("¡META LOGRADA! Excedente: 20"));
}

#[test]
fn test_progress_survives_restart() {
    let state = tempfile::tempdir().unwrap();
    let exports = tempfile::tempdir().unwrap();

    run_script(state.path(), exports.path(), "saldo 1,000\nmeta 2,000\n+ épica\n");
    let out = run_script(state.path(), exports.path(), "mostrar\n");

    assert!(out.starts_with("📂 Datos cargados correctamente\n"));
    assert!(out.contains("Nuevo balance:  1,100"));
    assert!(out.contains("Faltan: 900 para alcanzar tu meta"));
}

#[test]
fn test_clear_requires_yes() {
    let state = tempfile::tempdir().unwrap();
    let exports = tempfile::tempdir().unwrap();

    run_script(state.path(), exports.path(), "meta 500\nlimpiar\nno\n");
    let kept = run_script(state.path(), exports.path(), "");
    assert!(kept.contains("Faltan: 500"));

    run_script(state.path(), exports.path(), "limpiar\ns\n");
    let cleared = run_script(state.path(), exports.path(), "");
    assert!(cleared.contains("Ingresa tus datos para comenzar"));
}

#[test]
fn test_exports_land_in_export_dir() {
    let state = tempfile::tempdir().unwrap();
    let exports = tempfile::tempdir().unwrap();

    let out = run_script(
        state.path(),
        exports.path(),
        "set 1 4\nset mayor 1\nexportar csv\nexportar json\n",
    );

    assert_eq!(out.matches("📊 Exportado correctamente").count(), 2);

    let mut names: Vec<String> = fs::read_dir(exports.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names.len(), 2);
    assert!(names[0].starts_with("forge-estado-") && names[0].ends_with(".json"));
    assert!(names[1].starts_with("forge-resumen-") && names[1].ends_with(".csv"));

    let csv = fs::read_to_string(exports.path().join(&names[1])).unwrap();
    assert_eq!(csv, "Esencia,Cantidad,Precio,Total\nMinúscula,4,2.5,10\nMayor,1,50,50\n");
}

#[test]
fn test_export_failure_is_reported_not_fatal() {
    let state = tempfile::tempdir().unwrap();
    let missing = state.path().join("nope");

    let out = run_script(state.path(), &missing, "exportar csv\nmeta 10\n");

    assert!(out.contains("❌ Error al exportar"));
    assert!(out.contains("Faltan: 10 para alcanzar tu meta"));
}

#[test]
fn test_last_line_without_newline_is_saved() {
    let state = tempfile::tempdir().unwrap();
    let exports = tempfile::tempdir().unwrap();

    run_script(state.path(), exports.path(), "saldo 42");
    let catalog = Catalog::forge();
    let store = app::open_store(&app::build_registry(), &file_config(state.path()));
    let mut session = Session::new(&catalog, store);

    assert!(session.load());
    assert_eq!(session.state().balance, dec!(42));
}
