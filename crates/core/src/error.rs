//! Error types for the migration engine
//!
//! Every failure carries the context a caller needs to decide what to
//! report; nothing here exits the process or retries. Re-running a
//! failed migration is not safe in general (a second `CREATE TABLE`
//! fails), so automatic retry is deliberately absent.

use std::path::PathBuf;

use thiserror::Error;

use crate::migrations::definitions::Direction;

/// Result type alias for engine operations
pub type MigrationResult<T> = Result<T, MigrationError>;

/// Error types for migration operations
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Missing or invalid setup detected before any migration work begins
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Driver name that the engine does not know how to dial
    #[error("unsupported driver '{0}' (expected one of: postgres, mysql, sqlite)")]
    UnsupportedDriver(String),

    /// Filesystem failure while reading the migration directory or a script
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Limit pattern that is not valid glob syntax
    #[error("invalid limit pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// Connection, schema-creation, SQL execution or ledger write failure
    #[error("database error: {context}: {source}")]
    Database {
        context: String,
        #[source]
        source: sqlx::Error,
    },

    /// A mark-applied/mark-unapplied hit a key with no ledger row
    #[error("ledger has no row for migration '{0}'")]
    LedgerRowMissing(String),

    /// The script ran but the ledger update failed. The schema change
    /// took effect while the bookkeeping did not, so database and
    /// ledger state may now disagree and need manual reconciliation.
    #[error(
        "migration '{key}' ({direction}) executed but its ledger update failed; \
         WARNING: database and ledger state may now disagree: {source}"
    )]
    Divergence {
        key: String,
        direction: Direction,
        #[source]
        source: Box<MigrationError>,
    },

    /// Migration name that does not fit the `<timestamp>-<slug>` shape
    #[error("invalid migration name '{0}': expected lowercase letters, digits and dashes")]
    InvalidName(String),
}

impl MigrationError {
    /// Wrap an sqlx error with a human-readable context line.
    pub fn database(context: impl Into<String>, source: sqlx::Error) -> Self {
        MigrationError::Database {
            context: context.into(),
            source,
        }
    }

    /// Whether this failure means database and ledger may disagree.
    pub fn is_divergence(&self) -> bool {
        matches!(self, MigrationError::Divergence { .. })
    }
}
