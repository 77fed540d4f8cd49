//! Dialect strategy - Per-engine SQL capabilities
//!
//! The ledger's operation contract is identical across backends; only
//! the statement text differs (auto-increment syntax, placeholder
//! style, `NOW()` vs `CURRENT_TIMESTAMP`). Each supported engine
//! implements this small capability trait once and the ledger depends
//! only on the trait.

/// SQL capabilities of one backing engine.
pub trait Dialect: Send + Sync {
    /// Driver name as given on the command line.
    fn name(&self) -> &'static str;

    /// Bind-parameter placeholder for the 1-based position `n`.
    fn placeholder(&self, n: usize) -> String;

    /// Expression yielding the current timestamp.
    fn now_expr(&self) -> &'static str;

    /// Boolean literal usable in statement text.
    fn bool_literal(&self, value: bool) -> &'static str {
        if value {
            "TRUE"
        } else {
            "FALSE"
        }
    }

    /// Quote an identifier. `key` is a reserved word on some engines.
    fn quote_ident(&self, ident: &str) -> String {
        format!("\"{ident}\"")
    }

    /// Cast an expression to portable text for reading back.
    fn cast_text(&self, expr: &str) -> String;

    /// Idempotent creation statement for the ledger table.
    fn create_table_sql(&self, table: &str) -> String;
}

/// PostgreSQL capabilities
pub struct Postgres;

impl Dialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn placeholder(&self, n: usize) -> String {
        format!("${n}")
    }

    fn now_expr(&self) -> &'static str {
        "NOW()"
    }

    fn cast_text(&self, expr: &str) -> String {
        format!("{expr}::text")
    }

    fn create_table_sql(&self, table: &str) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {table} \
             ( \
               id BIGSERIAL PRIMARY KEY, \
               \"key\" VARCHAR(255) NOT NULL, \
               is_applied BOOLEAN NOT NULL DEFAULT FALSE, \
               created_at TIMESTAMP NOT NULL DEFAULT NOW(), \
               updated_at TIMESTAMP NOT NULL DEFAULT NOW() \
             )"
        )
    }
}

/// MySQL capabilities
pub struct MySql;

impl Dialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn placeholder(&self, _n: usize) -> String {
        "?".to_string()
    }

    fn now_expr(&self) -> &'static str {
        "NOW()"
    }

    fn quote_ident(&self, ident: &str) -> String {
        format!("`{ident}`")
    }

    fn cast_text(&self, expr: &str) -> String {
        format!("CAST({expr} AS CHAR)")
    }

    fn create_table_sql(&self, table: &str) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {table} \
             ( \
               id BIGINT NOT NULL AUTO_INCREMENT, \
               `key` VARCHAR(255) NOT NULL, \
               is_applied BOOLEAN NOT NULL DEFAULT FALSE, \
               created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP, \
               updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP, \
               PRIMARY KEY (id) \
             )"
        )
    }
}

/// SQLite capabilities
pub struct Sqlite;

impl Dialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn placeholder(&self, _n: usize) -> String {
        "?".to_string()
    }

    fn now_expr(&self) -> &'static str {
        "CURRENT_TIMESTAMP"
    }

    fn cast_text(&self, expr: &str) -> String {
        format!("CAST({expr} AS TEXT)")
    }

    fn create_table_sql(&self, table: &str) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {table} \
             ( \
               id INTEGER PRIMARY KEY AUTOINCREMENT, \
               \"key\" VARCHAR(255) NOT NULL, \
               is_applied BOOLEAN NOT NULL DEFAULT FALSE, \
               created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP, \
               updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP \
             )"
        )
    }
}
