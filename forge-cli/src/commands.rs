//! Line commands understood by the terminal front end.
//!
//! | Command                     | Effect                                   |
//! |-----------------------------|------------------------------------------|
//! | `saldo <monto>`             | set the starting balance                 |
//! | `meta <monto>`              | set the goal                             |
//! | `set <esencia> <cantidad>`  | set a quantity                           |
//! | `+ <esencia>` / `- <esencia>` | step a quantity by one                 |
//! | `guardar`                   | save now                                 |
//! | `limpiar`                   | clear everything (asks first)            |
//! | `exportar csv\|json`        | write a summary or a full-state file     |
//! | `mostrar`                   | print the current figures                |
//! | `log <nivel>`               | change the log filter                    |
//! | `ayuda`                     | list commands                            |
//! | `salir`                     | quit                                     |
//!
//! An essence is named case-insensitively or by its 1-based catalog
//! position, so `set 7 2` and `set épica 2` are the same.

use forge_core::{Catalog, UserInput};
use forge_export::ExportFormat;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Anything that becomes a session event.
    Input(UserInput),
    Export(ExportFormat),
    Show,
    LogLevel(String),
    Help,
    Quit,
    /// Blank line.
    Nothing,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("comando desconocido: '{0}'")]
    Unknown(String),

    #[error("uso: {0}")]
    Usage(&'static str),

    #[error("esencia desconocida: '{0}'")]
    UnknownEssence(String),

    #[error("formato de exportación desconocido: '{0}' (usa csv o json)")]
    UnknownFormat(String),
}

pub const HELP: &str = "\
Comandos:
  saldo <monto>              balance actual
  meta <monto>               balance objetivo
  set <esencia> <cantidad>   cantidad a vender
  + <esencia>                sumar una unidad
  - <esencia>                restar una unidad
  guardar                    guardar progreso
  limpiar                    borrar todos los datos
  exportar csv|json          exportar resumen o estado
  mostrar                    ver cálculo actual
  log <nivel>                cambiar nivel de log
  ayuda                      esta ayuda
  salir                      terminar";

/// Parses one input line against `catalog`.
pub fn parse_command(
    line: &str,
    catalog: &Catalog,
) -> Result<Command, CommandError> {
    let line = line.trim();
    let Some((word, rest)) = split_word(line) else {
        return Ok(Command::Nothing);
    };

    let command = match word.to_lowercase().as_str() {
        "saldo" | "balance" => Command::Input(UserInput::Balance(required(rest, "saldo <monto>")?)),
        "meta" | "goal" => Command::Input(UserInput::Goal(required(rest, "meta <monto>")?)),
        "set" | "cantidad" => {
            let usage = "set <esencia> <cantidad>";
            // the essence may contain spaces in custom catalogs; the amount is the last word
            let (essence, text) = rest.rsplit_once(char::is_whitespace).ok_or(CommandError::Usage(usage))?;
            Command::Input(UserInput::Quantity {
                name: resolve_essence(essence.trim(), catalog)?,
                text: text.to_string(),
            })
        }
        "+" => Command::Input(UserInput::Increment(resolve_essence(&required(rest, "+ <esencia>")?, catalog)?)),
        "-" => Command::Input(UserInput::Decrement(resolve_essence(&required(rest, "- <esencia>")?, catalog)?)),
        "guardar" | "save" => Command::Input(UserInput::Save),
        "limpiar" | "clear" => Command::Input(UserInput::Clear),
        "exportar" | "export" => {
            let format = required(rest, "exportar csv|json")?;
            Command::Export(ExportFormat::parse(&format).ok_or(CommandError::UnknownFormat(format))?)
        }
        "mostrar" | "show" => Command::Show,
        "log" => Command::LogLevel(required(rest, "log <nivel>")?),
        "ayuda" | "help" | "?" => Command::Help,
        "salir" | "quit" | "exit" => Command::Quit,
        _ => return Err(CommandError::Unknown(word.to_string())),
    };
    Ok(command)
}

/// Whether a confirmation answer means yes.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "s" | "si" | "sí" | "y" | "yes")
}

fn split_word(line: &str) -> Option<(&str, &str)> {
    if line.is_empty() {
        return None;
    }
    Some(match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    })
}

fn required(
    rest: &str,
    usage: &'static str,
) -> Result<String, CommandError> {
    if rest.is_empty() {
        Err(CommandError::Usage(usage))
    } else {
        Ok(rest.to_string())
    }
}

fn resolve_essence(
    query: &str,
    catalog: &Catalog,
) -> Result<String, CommandError> {
    if let Ok(position) = query.parse::<usize>() {
        return position
            .checked_sub(1)
            .and_then(|idx| catalog.essences().get(idx))
            .map(|essence| essence.name.clone())
            .ok_or_else(|| CommandError::UnknownEssence(query.to_string()));
    }

    let wanted = query.to_lowercase();
    catalog
        .iter()
        .find(|essence| essence.name.to_lowercase() == wanted)
        .map(|essence| essence.name.clone())
        .ok_or_else(|| CommandError::UnknownEssence(query.to_string()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(line: &str) -> Result<Command, CommandError> {
        parse_command(line, &Catalog::forge())
    }

    #[test]
    fn balance_keeps_raw_text_for_the_parser() {
        assert_eq!(
            parse("saldo 1,250.5").unwrap(),
            Command::Input(UserInput::Balance("1,250.5".to_string()))
        );
    }

    #[test]
    fn set_resolves_name_case_insensitively() {
        assert_eq!(
            parse("set ÉPICA 3").unwrap(),
            Command::Input(UserInput::Quantity {
                name: "Épica".to_string(),
                text: "3".to_string(),
            })
        );
    }

    #[test]
    fn set_resolves_catalog_position() {
        assert_eq!(
            parse("set 1 10").unwrap(),
            Command::Input(UserInput::Quantity {
                name: "Minúscula".to_string(),
                text: "10".to_string(),
            })
        );
    }

    #[test]
    fn plus_and_minus() {
        assert_eq!(
            parse("+ grande").unwrap(),
            Command::Input(UserInput::Increment("Grande".to_string()))
        );
        assert_eq!(
            parse("- 4").unwrap(),
            Command::Input(UserInput::Decrement("Grande".to_string()))
        );
    }

    #[test]
    fn unknown_essence_is_reported() {
        assert_eq!(
            parse("+ legendaria"),
            Err(CommandError::UnknownEssence("legendaria".to_string()))
        );
        assert_eq!(parse("+ 0"), Err(CommandError::UnknownEssence("0".to_string())));
        assert_eq!(parse("+ 8"), Err(CommandError::UnknownEssence("8".to_string())));
    }

    #[test]
    fn missing_arguments_show_usage() {
        assert_eq!(parse("meta"), Err(CommandError::Usage("meta <monto>")));
        assert_eq!(parse("set grande"), Err(CommandError::Usage("set <esencia> <cantidad>")));
    }

    #[test]
    fn export_formats() {
        assert_eq!(parse("exportar csv").unwrap(), Command::Export(ExportFormat::Summary));
        assert_eq!(parse("exportar JSON").unwrap(), Command::Export(ExportFormat::State));
        assert_eq!(
            parse("exportar xlsx"),
            Err(CommandError::UnknownFormat("xlsx".to_string()))
        );
    }

    #[test]
    fn blank_and_unknown_lines() {
        assert_eq!(parse("   ").unwrap(), Command::Nothing);
        assert_eq!(parse("vender"), Err(CommandError::Unknown("vender".to_string())));
    }

    #[test]
    fn simple_words() {
        assert_eq!(parse("guardar").unwrap(), Command::Input(UserInput::Save));
        assert_eq!(parse("LIMPIAR").unwrap(), Command::Input(UserInput::Clear));
        assert_eq!(parse("mostrar").unwrap(), Command::Show);
        assert_eq!(parse("log debug").unwrap(), Command::LogLevel("debug".to_string()));
        assert_eq!(parse("ayuda").unwrap(), Command::Help);
        assert_eq!(parse("salir").unwrap(), Command::Quit);
    }

    #[test]
    fn confirmation_answers() {
        assert!(is_affirmative("s"));
        assert!(is_affirmative(" Sí "));
        assert!(!is_affirmative("n"));
        assert!(!is_affirmative(""));
    }
}
