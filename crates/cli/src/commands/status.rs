use console::style;
use serde::Serialize;
use stele_core::{Direction, MigrationResult, MigrationStore};

use crate::paths;

use super::{open_ledger, DatabaseArgs};

#[derive(Serialize)]
struct StatusEntry {
    key: String,
    applied: bool,
}

pub async fn run(json: bool, database: &DatabaseArgs) -> MigrationResult<()> {
    let dir = paths::find_migration_dir()?;
    let store = MigrationStore::new(&dir);

    let mut discovered = store.discover(Direction::Up)?;
    discovered.sort_by(|a, b| a.key.cmp(&b.key));

    let ledger = open_ledger(database).await?;
    ledger.ensure_schema().await?;
    let applied = ledger.list_keys(true).await?;

    let entries: Vec<StatusEntry> = discovered
        .into_iter()
        .map(|m| StatusEntry {
            applied: applied.contains(&m.key),
            key: m.key,
        })
        .collect();

    if json {
        let rendered = serde_json::to_string_pretty(&entries).map_err(|e| {
            stele_core::MigrationError::Configuration(format!("could not render status: {e}"))
        })?;
        println!("{rendered}");
        return Ok(());
    }

    if entries.is_empty() {
        println!("{}", style("No migration files found").yellow());
        return Ok(());
    }

    println!("Migration status:");
    for entry in &entries {
        let marker = if entry.applied {
            style("applied").green()
        } else {
            style("pending").yellow()
        };
        println!("  {:<10} {}", marker, entry.key);
    }
    Ok(())
}
