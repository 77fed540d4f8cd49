//! Interactive confirmation
//!
//! The engine never prompts; commands ask here before handing a plan to
//! the executor, and `--yes` bypasses the prompt for scripted use.

use inquire::Confirm;
use stele_core::{MigrationError, MigrationResult};

pub fn confirm(message: &str, default: bool) -> MigrationResult<bool> {
    Confirm::new(message)
        .with_default(default)
        .prompt()
        .map_err(|e| {
            MigrationError::Configuration(format!(
                "could not read confirmation (use --yes in non-interactive runs): {e}"
            ))
        })
}
