//! # stele-core: Migration Engine
//!
//! The engine behind the `stele` migration runner: discovers versioned
//! pairs of forward/backward SQL scripts on disk, diffs them against a
//! database-backed applied-state ledger, and applies or rolls them back
//! in deterministic order.
//!
//! Every operation returns structured errors; the engine never prompts,
//! never retries, and never terminates the process. Interactive
//! confirmation and exit codes belong to the caller.

pub mod database;
pub mod error;
pub mod migrations;

// Re-export core traits and types
pub use database::*;
pub use error::*;
pub use migrations::*;
