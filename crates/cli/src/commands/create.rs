use std::fs;

use chrono::Utc;
use console::style;
use stele_core::{MigrationError, MigrationResult};

use crate::paths;

/// Maximum length of a migration name, matching the key slug limit.
const MAX_NAME_LEN: usize = 255;

pub fn run(name: &str) -> MigrationResult<()> {
    if !is_valid_name(name) {
        return Err(MigrationError::InvalidName(name.to_string()));
    }

    let dir = paths::find_migration_dir()?;
    let datestamp = Utc::now().format("%Y%m%d%H%M%S").to_string();

    for suffix in [".up.sql", ".down.sql"] {
        let filename = format!("{datestamp}-{name}{suffix}");
        let path = dir.join(&filename);

        if path.exists() {
            println!(
                "{}",
                style(format!("Migration file {filename} already exists")).yellow()
            );
            continue;
        }

        fs::write(&path, "").map_err(|e| MigrationError::Io {
            path: path.clone(),
            source: e,
        })?;
    }

    println!(
        "{}",
        style(format!("Created migration {datestamp}-{name}")).green()
    );
    Ok(())
}

fn is_valid_name(name: &str) -> bool {
    let name = name.trim();
    !name.is_empty()
        && name.len() <= MAX_NAME_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
