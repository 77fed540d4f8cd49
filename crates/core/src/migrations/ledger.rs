//! Applied-State Ledger - The control table tracking applied migrations
//!
//! One row per key, toggled between applied and unapplied; rows are
//! never deleted by the engine. The ledger is the single source of
//! truth for "has this key ever been applied". All statement text is
//! composed through the dialect strategy, so the operation contract is
//! identical across engines.

use std::collections::HashSet;

use sqlx::{AnyPool, Row};

use crate::database::Driver;
use crate::error::{MigrationError, MigrationResult};

use super::definitions::LedgerEntry;
use super::dialect::Dialect;

/// Conventional name of the control table.
pub const LEDGER_TABLE: &str = "migrations";

/// Database-backed record of which migration keys are applied.
pub struct Ledger {
    pool: AnyPool,
    dialect: &'static dyn Dialect,
    table: String,
}

impl Ledger {
    pub fn new(pool: AnyPool, driver: Driver) -> Self {
        Self {
            pool,
            dialect: driver.dialect(),
            table: LEDGER_TABLE.to_string(),
        }
    }

    /// Use a different control table name. Intended for tests.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// The database handle the executor shares for script execution.
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Create the control table if it does not exist yet.
    pub async fn ensure_schema(&self) -> MigrationResult<()> {
        let sql = self.dialect.create_table_sql(&self.table);
        sqlx::query(&sql)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                MigrationError::database(
                    format!("error creating ledger table '{}'", self.table),
                    e,
                )
            })?;
        Ok(())
    }

    /// Keys whose `is_applied` flag equals `applied`.
    pub async fn list_keys(&self, applied: bool) -> MigrationResult<HashSet<String>> {
        let sql = format!(
            "SELECT {key} FROM {table} WHERE is_applied = {flag}",
            key = self.dialect.quote_ident("key"),
            table = self.table,
            flag = self.dialect.bool_literal(applied),
        );

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| MigrationError::database("error listing ledger keys", e))?;

        let mut keys = HashSet::with_capacity(rows.len());
        for row in rows {
            let key: String = row
                .try_get(0)
                .map_err(|e| MigrationError::database("error decoding ledger key", e))?;
            keys.insert(key);
        }
        Ok(keys)
    }

    /// Full snapshot of the control table.
    ///
    /// Needed to tell "key has no row yet" apart from "key has a row
    /// with is_applied = false": the first requires an insert on the
    /// next up run, the second only a mark.
    pub async fn list_all(&self) -> MigrationResult<Vec<LedgerEntry>> {
        let sql = format!(
            "SELECT id, {key}, \
             CASE WHEN is_applied THEN 1 ELSE 0 END AS is_applied, \
             {created} AS created_at, {updated} AS updated_at \
             FROM {table}",
            key = self.dialect.quote_ident("key"),
            created = self.dialect.cast_text("created_at"),
            updated = self.dialect.cast_text("updated_at"),
            table = self.table,
        );

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| MigrationError::database("error reading ledger snapshot", e))?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            let id: i64 = row
                .try_get(0)
                .map_err(|e| MigrationError::database("error decoding ledger id", e))?;
            let key: String = row
                .try_get(1)
                .map_err(|e| MigrationError::database("error decoding ledger key", e))?;
            let is_applied: i64 = row
                .try_get(2)
                .map_err(|e| MigrationError::database("error decoding ledger flag", e))?;
            let created_at: String = row
                .try_get(3)
                .map_err(|e| MigrationError::database("error decoding ledger timestamp", e))?;
            let updated_at: String = row
                .try_get(4)
                .map_err(|e| MigrationError::database("error decoding ledger timestamp", e))?;

            entries.push(LedgerEntry {
                id,
                key,
                is_applied: is_applied != 0,
                created_at,
                updated_at,
            });
        }
        Ok(entries)
    }

    /// Create a fresh row for `key` with `is_applied = false`.
    ///
    /// Called lazily the first time a key is seen during an up run.
    pub async fn insert(&self, key: &str) -> MigrationResult<()> {
        let sql = format!(
            "INSERT INTO {table} ({col}) VALUES ({p1})",
            table = self.table,
            col = self.dialect.quote_ident("key"),
            p1 = self.dialect.placeholder(1),
        );

        sqlx::query(&sql)
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                MigrationError::database(format!("error inserting ledger row for '{key}'"), e)
            })?;
        Ok(())
    }

    /// Flag `key` as applied. Errors if no row exists for the key.
    pub async fn mark_applied(&self, key: &str) -> MigrationResult<()> {
        self.mark(key, true).await
    }

    /// Flag `key` as rolled back. Errors if no row exists for the key.
    pub async fn mark_unapplied(&self, key: &str) -> MigrationResult<()> {
        self.mark(key, false).await
    }

    async fn mark(&self, key: &str, applied: bool) -> MigrationResult<()> {
        let sql = format!(
            "UPDATE {table} SET is_applied = {flag}, updated_at = {now} WHERE {col} = {p1}",
            table = self.table,
            flag = self.dialect.bool_literal(applied),
            now = self.dialect.now_expr(),
            col = self.dialect.quote_ident("key"),
            p1 = self.dialect.placeholder(1),
        );

        let result = sqlx::query(&sql)
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                MigrationError::database(format!("error updating ledger row for '{key}'"), e)
            })?;

        // A zero-row update means the caller skipped the insert step.
        // Silent no-op here would hide a divergence between directory
        // and ledger, so it is an error.
        if result.rows_affected() == 0 {
            return Err(MigrationError::LedgerRowMissing(key.to_string()));
        }
        Ok(())
    }
}
