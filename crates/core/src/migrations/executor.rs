//! Executor - Runs a resolved plan against the database
//!
//! Per migration, strictly in plan order: read the script, execute its
//! statements, then update the ledger. The first failure aborts the
//! remainder of the plan; migrations that already committed stay
//! committed. There is no automatic rollback and no retry.

use std::collections::HashSet;
use std::time::Instant;

use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;

use crate::error::{MigrationError, MigrationResult};

use super::definitions::{Direction, MigrationObject, RunReport};
use super::ledger::Ledger;
use super::store::MigrationStore;

/// Applies or rolls back a resolved sequence of migrations.
pub struct Executor<'a> {
    store: &'a MigrationStore,
    ledger: &'a Ledger,
}

impl<'a> Executor<'a> {
    pub fn new(store: &'a MigrationStore, ledger: &'a Ledger) -> Self {
        Self { store, ledger }
    }

    /// Execute `plan` in order.
    ///
    /// Script-read and SQL failures abort before the ledger is touched
    /// for that migration. A ledger failure after the SQL succeeded is
    /// surfaced as [`MigrationError::Divergence`] because the schema
    /// changed while the bookkeeping did not.
    pub async fn run(
        &self,
        direction: Direction,
        plan: &[MigrationObject],
    ) -> MigrationResult<RunReport> {
        let started = Instant::now();
        let mut completed = Vec::new();

        if plan.is_empty() {
            return Ok(RunReport {
                completed,
                execution_time_ms: 0,
            });
        }

        // For up runs, find which keys already own a ledger row: a key
        // rolled back earlier keeps its row and only needs a mark.
        let known_keys: HashSet<String> = match direction {
            Direction::Up => self
                .ledger
                .list_all()
                .await?
                .into_iter()
                .map(|entry| entry.key)
                .collect(),
            Direction::Down => HashSet::new(),
        };

        for migration in plan {
            tracing::info!(key = %migration.key, %direction, "running migration");

            let script = self.store.read_script(&migration.file)?;

            for statement in split_statements(&script) {
                sqlx::query(&statement)
                    .execute(self.ledger.pool())
                    .await
                    .map_err(|e| {
                        MigrationError::database(
                            format!("error running migration '{}'", migration.key),
                            e,
                        )
                    })?;
            }

            let commit = match direction {
                Direction::Up => {
                    if !known_keys.contains(&migration.key) {
                        match self.ledger.insert(&migration.key).await {
                            Ok(()) => self.ledger.mark_applied(&migration.key).await,
                            Err(e) => Err(e),
                        }
                    } else {
                        self.ledger.mark_applied(&migration.key).await
                    }
                }
                // Resolver eligibility guarantees a row exists here.
                Direction::Down => self.ledger.mark_unapplied(&migration.key).await,
            };

            if let Err(source) = commit {
                return Err(MigrationError::Divergence {
                    key: migration.key.clone(),
                    direction,
                    source: Box::new(source),
                });
            }

            tracing::info!(key = %migration.key, %direction, "migration committed");
            completed.push(migration.key.clone());
        }

        Ok(RunReport {
            completed,
            execution_time_ms: started.elapsed().as_millis(),
        })
    }
}

/// Split a script into executable statements.
///
/// Scripts are hand-authored and may hold several statements; prepared
/// execution takes one at a time. Parses with sqlparser and falls back
/// to naive semicolon splitting when the script uses syntax the parser
/// does not know.
fn split_statements(sql: &str) -> Vec<String> {
    let dialect = GenericDialect {};

    match Parser::parse_sql(&dialect, sql) {
        Ok(parsed) => parsed.into_iter().map(|s| format!("{};", s)).collect(),
        Err(e) => {
            tracing::warn!("SQL parsing failed, using naive semicolon splitting: {}", e);
            sql.split(';')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| format!("{};", s))
                .collect()
        }
    }
}
