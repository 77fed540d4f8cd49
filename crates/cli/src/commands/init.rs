use std::fs;
use std::path::{Path, PathBuf};

use console::style;
use stele_core::{MigrationError, MigrationResult};

use crate::paths::MIGRATIONS_DIR;

use super::{open_ledger, DatabaseArgs};

pub async fn run(path: Option<&Path>, database: &DatabaseArgs) -> MigrationResult<()> {
    let root = match path {
        Some(p) => p.to_path_buf(),
        None => std::env::current_dir().map_err(|e| MigrationError::Io {
            path: PathBuf::from("."),
            source: e,
        })?,
    };

    let ledger = open_ledger(database).await?;
    ledger.ensure_schema().await?;

    let migration_dir = root.join(MIGRATIONS_DIR);
    if !migration_dir.exists() {
        fs::create_dir_all(&migration_dir).map_err(|e| MigrationError::Io {
            path: migration_dir.clone(),
            source: e,
        })?;
    }

    println!(
        "{}",
        style(format!("Initialized stele in {}", root.display())).green()
    );
    Ok(())
}
