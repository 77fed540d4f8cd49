//! Locating the migration directory
//!
//! The directory is found by walking up from the current working
//! directory until a `migrations/` directory appears, so commands work
//! from anywhere inside an initialized project.

use std::path::PathBuf;

use stele_core::{MigrationError, MigrationResult};

/// Name of the directory holding migration scripts.
pub const MIGRATIONS_DIR: &str = "migrations";

pub fn find_migration_dir() -> MigrationResult<PathBuf> {
    let cwd = std::env::current_dir().map_err(|e| MigrationError::Io {
        path: PathBuf::from("."),
        source: e,
    })?;
    find_migration_dir_from(cwd)
}

fn find_migration_dir_from(start: PathBuf) -> MigrationResult<PathBuf> {
    let mut current = start;
    loop {
        let candidate = current.join(MIGRATIONS_DIR);
        if candidate.is_dir() {
            return Ok(candidate);
        }
        if !current.pop() {
            return Err(MigrationError::Configuration(format!(
                "could not find a '{MIGRATIONS_DIR}' directory here or in any parent; \
                 run 'stele init' first"
            )));
        }
    }
}
