use console::style;
use stele_core::{resolve, Direction, Executor, MigrationResult, MigrationStore};

use crate::{interactive, paths};

use super::{open_ledger, print_plan, DatabaseArgs};

pub async fn run(
    limit_pattern: Option<&str>,
    yes: bool,
    database: &DatabaseArgs,
) -> MigrationResult<()> {
    let pattern = limit_pattern.unwrap_or("*");

    let dir = paths::find_migration_dir()?;
    let store = MigrationStore::new(&dir);
    let discovered = store.discover(Direction::Down)?;

    if discovered.is_empty() {
        println!("{}", style("No migration files to roll back").yellow());
        return Ok(());
    }

    let ledger = open_ledger(database).await?;
    ledger.ensure_schema().await?;

    let applied = ledger.list_keys(true).await?;
    let plan = resolve(Direction::Down, pattern, discovered, &applied)?;

    if plan.is_empty() {
        println!("{}", style("No applied migrations to roll back").yellow());
        return Ok(());
    }

    println!("The following migrations will be rolled back:");
    print_plan(plan.iter().map(|m| &m.key));

    if !yes && !interactive::confirm("Continue?", true)? {
        println!("{}", style("Aborting migration rollback").yellow());
        return Ok(());
    }

    let report = Executor::new(&store, &ledger)
        .run(Direction::Down, &plan)
        .await?;

    println!(
        "{}",
        style(format!(
            "Rolled back {} migration(s) in {}ms",
            report.completed.len(),
            report.execution_time_ms
        ))
        .green()
    );
    Ok(())
}
