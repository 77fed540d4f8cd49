//! Migration Definitions - Core types for the migration engine
//!
//! A migration is identified by a key of the form
//! `<14-digit-timestamp>-<slug>` (`YYYYMMDDHHMMSS`, slug `[a-z0-9-]+`).
//! Because the timestamp prefix is fixed-width and zero-padded, lexical
//! order over keys is chronological order, which is what the resolver
//! sorts by.

use std::fmt;
use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Maximum length of the slug portion of a key.
pub const MAX_SLUG_LEN: usize = 255;

static KEY_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{14}-[a-z0-9-]+$").expect("key regex is valid"));

/// Check that a key has the `<14-digit-timestamp>-<slug>` shape.
pub fn is_valid_key(key: &str) -> bool {
    KEY_SHAPE.is_match(key) && key.len() <= 14 + 1 + MAX_SLUG_LEN
}

/// Direction of a migration run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Apply forward scripts
    Up,
    /// Roll back applied scripts
    Down,
}

impl Direction {
    /// The filename suffix that qualifies a script for this direction.
    pub fn file_suffix(&self) -> &'static str {
        match self {
            Direction::Up => ".up.sql",
            Direction::Down => ".down.sql",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// A concrete script on disk. Immutable once discovered; the engine only
/// ever reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    /// Key shared by the up and down scripts of one migration
    pub key: String,
    /// Which direction this script serves
    pub direction: Direction,
    /// Absolute or directory-relative path of the script
    pub path: PathBuf,
}

/// The in-memory unit the resolver operates on: one key plus the script
/// for the direction currently requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationObject {
    pub key: String,
    pub file: MigrationFile,
}

/// Persisted ledger row. At most one row exists per key; rows are
/// toggled between applied/unapplied, never deleted by the engine.
///
/// Timestamps are carried as engine-formatted text because each backend
/// renders them differently and the engine only displays them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: i64,
    pub key: String,
    pub is_applied: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Result of an executor run
#[derive(Debug)]
pub struct RunReport {
    /// Keys that completed their commit step, in execution order
    pub completed: Vec<String>,
    /// Total execution time in milliseconds
    pub execution_time_ms: u128,
}
