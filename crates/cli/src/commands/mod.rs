//! CLI command handlers
//!
//! Each handler resolves its inputs (flags, env, migration directory),
//! calls into `stele-core`, and formats the outcome. Exit codes are
//! decided in `main`; a run with nothing to do is a success, not an
//! error.

pub mod create;
pub mod down;
pub mod init;
pub mod remove;
pub mod status;
pub mod up;

use clap::Args;
use stele_core::{connect, Driver, Ledger, MigrationError, MigrationResult};

use crate::settings;

/// Connection flags shared by every command that talks to the database.
#[derive(Args)]
pub struct DatabaseArgs {
    /// Database connection string (env: STELE_CONNECTION_STRING)
    #[arg(long, short = 'c')]
    pub connection: Option<String>,

    /// Database driver: postgres, mysql or sqlite (env: STELE_DRIVER)
    #[arg(long, short = 'd')]
    pub driver: Option<String>,

    /// Env file to load before resolving flags (defaults to .env)
    #[arg(long, short = 'e')]
    pub dotenvfile: Option<String>,
}

/// Resolve driver and connection string, connect, and wrap the handle
/// in a ledger.
pub(crate) async fn open_ledger(args: &DatabaseArgs) -> MigrationResult<Ledger> {
    settings::load_env_file(args.dotenvfile.as_deref());

    let driver_name = settings::flag_or_env(args.driver.clone(), "STELE_DRIVER")
        .ok_or_else(|| {
            MigrationError::Configuration(
                "driver is required (--driver or STELE_DRIVER)".to_string(),
            )
        })?;
    let driver: Driver = driver_name.parse()?;

    let connection = settings::flag_or_env(args.connection.clone(), "STELE_CONNECTION_STRING")
        .ok_or_else(|| {
            MigrationError::Configuration(
                "connection string is required (--connection or STELE_CONNECTION_STRING)"
                    .to_string(),
            )
        })?;

    let pool = connect(driver, &connection).await?;
    Ok(Ledger::new(pool, driver))
}

/// Print a resolved plan as a numbered list.
pub(crate) fn print_plan(keys: impl IntoIterator<Item = impl std::fmt::Display>) {
    for (i, key) in keys.into_iter().enumerate() {
        println!("  {}. {}", console::style(i + 1).green(), key);
    }
}
