//! Database bootstrap - driver selection and connection
//!
//! The engine runs against a single `sqlx::AnyPool` for the duration of
//! a run. The driver name picks the dialect strategy; the connection
//! string is checked against the driver so a `postgres` run cannot be
//! pointed at a `sqlite:` URL by accident.

use std::str::FromStr;
use std::sync::Once;

use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;

use crate::error::{MigrationError, MigrationResult};
use crate::migrations::dialect::{Dialect, MySql, Postgres, Sqlite};

static INSTALL_DRIVERS: Once = Once::new();

/// Supported backing engines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    Postgres,
    MySql,
    Sqlite,
}

impl Driver {
    /// The dialect strategy for this engine.
    pub fn dialect(&self) -> &'static dyn Dialect {
        match self {
            Driver::Postgres => &Postgres,
            Driver::MySql => &MySql,
            Driver::Sqlite => &Sqlite,
        }
    }

    /// URL schemes this driver dials.
    fn schemes(&self) -> &'static [&'static str] {
        match self {
            Driver::Postgres => &["postgres:", "postgresql:"],
            Driver::MySql => &["mysql:"],
            Driver::Sqlite => &["sqlite:"],
        }
    }

    fn accepts(&self, connection: &str) -> bool {
        self.schemes().iter().any(|s| connection.starts_with(s))
    }
}

impl FromStr for Driver {
    type Err = MigrationError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "postgres" | "postgresql" => Ok(Driver::Postgres),
            "mysql" => Ok(Driver::MySql),
            "sqlite" => Ok(Driver::Sqlite),
            other => Err(MigrationError::UnsupportedDriver(other.to_string())),
        }
    }
}

/// Open a single-owner connection pool for one migration run.
///
/// Sequential execution needs exactly one connection; a larger pool
/// would only invite interleaving.
pub async fn connect(driver: Driver, connection: &str) -> MigrationResult<AnyPool> {
    if connection.is_empty() {
        return Err(MigrationError::Configuration(
            "connection string is required".to_string(),
        ));
    }

    if !driver.accepts(connection) {
        return Err(MigrationError::Configuration(format!(
            "connection string does not match driver '{}' (expected a {} URL)",
            driver.dialect().name(),
            driver.schemes().join(" or ")
        )));
    }

    INSTALL_DRIVERS.call_once(sqlx::any::install_default_drivers);

    let pool = AnyPoolOptions::new()
        .max_connections(1)
        .connect(connection)
        .await
        .map_err(|e| MigrationError::database("error connecting to database", e))?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_driver_names() {
        assert_eq!("postgres".parse::<Driver>().unwrap(), Driver::Postgres);
        assert_eq!("postgresql".parse::<Driver>().unwrap(), Driver::Postgres);
        assert_eq!("mysql".parse::<Driver>().unwrap(), Driver::MySql);
        assert_eq!("sqlite".parse::<Driver>().unwrap(), Driver::Sqlite);
    }

    #[test]
    fn rejects_unknown_driver() {
        let err = "oracle".parse::<Driver>().unwrap_err();
        assert!(matches!(err, MigrationError::UnsupportedDriver(name) if name == "oracle"));
    }

    #[test]
    fn driver_scheme_checks() {
        assert!(Driver::Postgres.accepts("postgres://localhost/app"));
        assert!(Driver::Postgres.accepts("postgresql://localhost/app"));
        assert!(!Driver::Postgres.accepts("mysql://localhost/app"));
        assert!(Driver::Sqlite.accepts("sqlite::memory:"));
        assert!(Driver::Sqlite.accepts("sqlite://stele.db"));
    }

    #[tokio::test]
    async fn connect_rejects_empty_connection_string() {
        let err = connect(Driver::Sqlite, "").await.unwrap_err();
        assert!(matches!(err, MigrationError::Configuration(_)));
    }

    #[tokio::test]
    async fn connect_rejects_mismatched_scheme() {
        let err = connect(Driver::MySql, "sqlite::memory:").await.unwrap_err();
        assert!(matches!(err, MigrationError::Configuration(_)));
    }
}
