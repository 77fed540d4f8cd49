use console::style;
use stele_core::{resolve, Direction, Executor, MigrationResult, MigrationStore};

use crate::paths;

use super::{open_ledger, print_plan, DatabaseArgs};

pub async fn run(limit_pattern: Option<&str>, database: &DatabaseArgs) -> MigrationResult<()> {
    let pattern = limit_pattern.unwrap_or("*");

    let dir = paths::find_migration_dir()?;
    let store = MigrationStore::new(&dir);
    let discovered = store.discover(Direction::Up)?;

    if discovered.is_empty() {
        println!("{}", style("No migration files to run").yellow());
        return Ok(());
    }

    let ledger = open_ledger(database).await?;
    ledger.ensure_schema().await?;

    let applied = ledger.list_keys(true).await?;
    let plan = resolve(Direction::Up, pattern, discovered, &applied)?;

    if plan.is_empty() {
        println!("{}", style("No pending migrations to run").yellow());
        return Ok(());
    }

    println!("Applying {} migration(s):", plan.len());
    print_plan(plan.iter().map(|m| &m.key));

    let report = Executor::new(&store, &ledger).run(Direction::Up, &plan).await?;

    println!(
        "{}",
        style(format!(
            "Applied {} migration(s) in {}ms",
            report.completed.len(),
            report.execution_time_ms
        ))
        .green()
    );
    Ok(())
}
