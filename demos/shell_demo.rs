//! Interactive shortcut bar demo.
//!
//! Keys: Tab/Shift-Tab or 1-9 switch the bar, arrows move on the More grid,
//! `r` toggles reorder mode, Space picks up and drops a tile, Enter opens an
//! item, Esc backs out, `q` quits.
//!
//! Set `SHORTCUT_SHELL_LOG` to a file path for JSON-lines logs and
//! `SHORTCUT_SHELL_CATALOG` to a catalog JSON file to replace the built-in one.

use std::error::Error;
use std::fs;

use shortcut_shell::logging::FileSink;
use shortcut_shell::registry::builtin_renderable;
use shortcut_shell::{CliDriver, ItemRegistry, Logger, ShellConfig, ShellRuntime};

const LOG_ROTATE_BYTES: u64 = 1024 * 1024;

fn main() -> Result<(), Box<dyn Error>> {
    let registry = match std::env::var("SHORTCUT_SHELL_CATALOG") {
        Ok(path) => {
            let json = fs::read_to_string(path)?;
            ItemRegistry::from_json(&json, builtin_renderable)?
        }
        Err(_) => ItemRegistry::builtin()?,
    };

    let mut config = ShellConfig::default();
    if let Ok(path) = std::env::var("SHORTCUT_SHELL_LOG") {
        config.logger = Some(Logger::new(FileSink::new(path, LOG_ROTATE_BYTES)?));
        config.enable_metrics();
    }

    let runtime = ShellRuntime::with_config(registry, config)?;
    CliDriver::new(runtime).run()?;
    Ok(())
}
