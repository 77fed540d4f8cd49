//! Migration System
//!
//! The four moving parts of a run, leaf first: the [`store`] discovers
//! script pairs on disk, the [`ledger`] records which keys are applied,
//! the [`resolver`] computes the ordered subset to execute next, and the
//! [`executor`] drives the scripts and the ledger writes. Engine-specific
//! SQL lives behind the [`dialect`] strategy.

pub mod definitions;
pub mod dialect;
pub mod executor;
pub mod ledger;
pub mod resolver;
pub mod store;

pub use definitions::{
    is_valid_key, Direction, LedgerEntry, MigrationFile, MigrationObject, RunReport,
};
pub use dialect::Dialect;
pub use executor::Executor;
pub use ledger::Ledger;
pub use resolver::resolve;
pub use store::MigrationStore;
