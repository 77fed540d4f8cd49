//! End-to-end engine tests against SQLite.
//!
//! These drive the same code path production uses (store -> resolver ->
//! executor -> ledger) with a file-backed SQLite database in a tempdir.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use stele_core::{
    connect, resolve, Direction, Driver, Executor, Ledger, MigrationError, MigrationStore,
};

const UNBOUNDED: &str = "*";

async fn sqlite_ledger(dir: &tempfile::TempDir) -> Ledger {
    let url = format!("sqlite://{}/stele.db?mode=rwc", dir.path().display());
    let pool = connect(Driver::Sqlite, &url).await.expect("connect");
    let ledger = Ledger::new(pool, Driver::Sqlite);
    ledger.ensure_schema().await.expect("ensure schema");
    ledger
}

fn write_pair(dir: &Path, key: &str, up_sql: &str, down_sql: &str) {
    fs::write(dir.join(format!("{key}.up.sql")), up_sql).expect("write up");
    fs::write(dir.join(format!("{key}.down.sql")), down_sql).expect("write down");
}

async fn run(
    store: &MigrationStore,
    ledger: &Ledger,
    direction: Direction,
    pattern: &str,
) -> Result<Vec<String>, MigrationError> {
    let discovered = store.discover(direction)?;
    let applied = ledger.list_keys(true).await?;
    let plan = resolve(direction, pattern, discovered, &applied)?;
    let report = Executor::new(store, ledger).run(direction, &plan).await?;
    Ok(report.completed)
}

#[tokio::test]
async fn end_to_end_up_then_down() {
    let dir = tempfile::tempdir().unwrap();
    write_pair(
        dir.path(),
        "20240101000000-init",
        "CREATE TABLE accounts (id INTEGER PRIMARY KEY, name TEXT NOT NULL);",
        "DROP TABLE accounts;",
    );
    write_pair(
        dir.path(),
        "20240102000000-addcol",
        "ALTER TABLE accounts ADD COLUMN email TEXT;",
        "ALTER TABLE accounts DROP COLUMN email;",
    );

    let store = MigrationStore::new(dir.path());
    let ledger = sqlite_ledger(&dir).await;

    let completed = run(&store, &ledger, Direction::Up, UNBOUNDED).await.unwrap();
    assert_eq!(
        completed,
        vec!["20240101000000-init", "20240102000000-addcol"]
    );

    let applied = ledger.list_keys(true).await.unwrap();
    assert_eq!(applied.len(), 2);
    assert!(applied.contains("20240101000000-init"));
    assert!(applied.contains("20240102000000-addcol"));

    // rollback undoes in reverse chronological order
    let completed = run(&store, &ledger, Direction::Down, UNBOUNDED)
        .await
        .unwrap();
    assert_eq!(
        completed,
        vec!["20240102000000-addcol", "20240101000000-init"]
    );

    assert!(ledger.list_keys(true).await.unwrap().is_empty());
    let unapplied = ledger.list_keys(false).await.unwrap();
    assert_eq!(unapplied.len(), 2);
}

#[tokio::test]
async fn up_down_up_cycle_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    write_pair(
        dir.path(),
        "20240101000000-one",
        "CREATE TABLE one (id INTEGER);",
        "DROP TABLE one;",
    );
    write_pair(
        dir.path(),
        "20240102000000-two",
        "CREATE TABLE two (id INTEGER);",
        "DROP TABLE two;",
    );

    let store = MigrationStore::new(dir.path());
    let ledger = sqlite_ledger(&dir).await;

    run(&store, &ledger, Direction::Up, UNBOUNDED).await.unwrap();
    let first_pass: HashSet<String> = ledger.list_keys(true).await.unwrap();

    run(&store, &ledger, Direction::Down, UNBOUNDED)
        .await
        .unwrap();
    run(&store, &ledger, Direction::Up, UNBOUNDED).await.unwrap();

    let second_pass: HashSet<String> = ledger.list_keys(true).await.unwrap();
    assert_eq!(first_pass, second_pass);

    // rolled-back keys keep their row; the cycle must not duplicate it
    let entries = ledger.list_all().await.unwrap();
    assert_eq!(entries.len(), 2);
}

#[tokio::test]
async fn partial_failure_stops_the_sequence() {
    let dir = tempfile::tempdir().unwrap();
    write_pair(
        dir.path(),
        "20240101000000-ok",
        "CREATE TABLE ok_table (id INTEGER);",
        "DROP TABLE ok_table;",
    );
    write_pair(
        dir.path(),
        "20240102000000-broken",
        "INSERT INTO missing_table (id) VALUES (1);",
        "SELECT 1;",
    );
    write_pair(
        dir.path(),
        "20240103000000-never",
        "CREATE TABLE never_table (id INTEGER);",
        "DROP TABLE never_table;",
    );

    let store = MigrationStore::new(dir.path());
    let ledger = sqlite_ledger(&dir).await;

    let err = run(&store, &ledger, Direction::Up, UNBOUNDED)
        .await
        .unwrap_err();
    assert!(matches!(err, MigrationError::Database { .. }));

    // migration 1 committed, migration 2 left untouched, 3 never attempted
    let applied = ledger.list_keys(true).await.unwrap();
    assert_eq!(applied.len(), 1);
    assert!(applied.contains("20240101000000-ok"));
    assert_eq!(ledger.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn ledger_update_failure_is_reported_as_divergence() {
    let dir = tempfile::tempdir().unwrap();
    // the script sabotages the control table itself, so the SQL runs
    // but the commit step cannot
    write_pair(
        dir.path(),
        "20240101000000-sabotage",
        "DROP TABLE migrations;",
        "SELECT 1;",
    );

    let store = MigrationStore::new(dir.path());
    let ledger = sqlite_ledger(&dir).await;

    let err = run(&store, &ledger, Direction::Up, UNBOUNDED)
        .await
        .unwrap_err();
    assert!(err.is_divergence());
    match err {
        MigrationError::Divergence { key, direction, .. } => {
            assert_eq!(key, "20240101000000-sabotage");
            assert_eq!(direction, Direction::Up);
        }
        other => panic!("expected divergence, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_directory_is_a_noop() {
    let dir = tempfile::tempdir().unwrap();
    let store = MigrationStore::new(dir.path());
    let ledger = sqlite_ledger(&dir).await;

    let completed = run(&store, &ledger, Direction::Up, UNBOUNDED).await.unwrap();
    assert!(completed.is_empty());
    assert!(ledger.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn fully_applied_directory_is_a_noop() {
    let dir = tempfile::tempdir().unwrap();
    write_pair(
        dir.path(),
        "20240101000000-only",
        "CREATE TABLE only_table (id INTEGER);",
        "DROP TABLE only_table;",
    );

    let store = MigrationStore::new(dir.path());
    let ledger = sqlite_ledger(&dir).await;

    run(&store, &ledger, Direction::Up, UNBOUNDED).await.unwrap();
    let completed = run(&store, &ledger, Direction::Up, UNBOUNDED).await.unwrap();
    assert!(completed.is_empty());
}

#[tokio::test]
async fn limit_pattern_bounds_the_run() {
    let dir = tempfile::tempdir().unwrap();
    for (key, table) in [
        ("20240101000000-first", "t_first"),
        ("20240102000000-second", "t_second"),
        ("20240103000000-third", "t_third"),
    ] {
        write_pair(
            dir.path(),
            key,
            &format!("CREATE TABLE {table} (id INTEGER);"),
            &format!("DROP TABLE {table};"),
        );
    }

    let store = MigrationStore::new(dir.path());
    let ledger = sqlite_ledger(&dir).await;

    let completed = run(&store, &ledger, Direction::Up, "*-second")
        .await
        .unwrap();
    assert_eq!(
        completed,
        vec!["20240101000000-first", "20240102000000-second"]
    );
    assert!(!ledger
        .list_keys(true)
        .await
        .unwrap()
        .contains("20240103000000-third"));
}

#[tokio::test]
async fn ledger_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = sqlite_ledger(&dir).await;

    // ensure_schema is idempotent
    ledger.ensure_schema().await.unwrap();

    ledger.insert("20240101000000-init").await.unwrap();
    let entries = ledger.list_all().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].id > 0);
    assert_eq!(entries[0].key, "20240101000000-init");
    assert!(!entries[0].is_applied);
    assert!(!entries[0].created_at.is_empty());
    assert!(!entries[0].updated_at.is_empty());

    ledger.mark_applied("20240101000000-init").await.unwrap();
    assert!(ledger
        .list_keys(true)
        .await
        .unwrap()
        .contains("20240101000000-init"));
    assert!(ledger.list_keys(false).await.unwrap().is_empty());

    ledger.mark_unapplied("20240101000000-init").await.unwrap();
    assert!(ledger.list_keys(true).await.unwrap().is_empty());
}

#[tokio::test]
async fn marking_a_missing_row_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = sqlite_ledger(&dir).await;

    let err = ledger.mark_applied("20240101000000-ghost").await.unwrap_err();
    assert!(matches!(err, MigrationError::LedgerRowMissing(key) if key == "20240101000000-ghost"));
}
