use std::fs;

use console::style;
use regex::Regex;
use stele_core::{MigrationError, MigrationResult};

use crate::{interactive, paths};

pub fn run(name: &str, yes: bool) -> MigrationResult<()> {
    let dir = paths::find_migration_dir()?;

    let matcher = Regex::new(&format!(
        r"^[0-9]{{14}}-{}\.(up|down)\.sql$",
        regex::escape(name)
    ))
    .map_err(|e| MigrationError::Configuration(format!("could not build file matcher: {e}")))?;

    let entries = fs::read_dir(&dir).map_err(|e| MigrationError::Io {
        path: dir.clone(),
        source: e,
    })?;

    let mut files_to_delete = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| MigrationError::Io {
            path: dir.clone(),
            source: e,
        })?;
        if entry.path().is_dir() {
            continue;
        }
        let filename = entry.file_name().to_string_lossy().to_string();
        if matcher.is_match(&filename) {
            files_to_delete.push(filename);
        }
    }

    if files_to_delete.is_empty() {
        return Err(MigrationError::Configuration(format!(
            "no migrations matching '{name}' found"
        )));
    }

    files_to_delete.sort();
    println!("The following migration files will be deleted:");
    for file in &files_to_delete {
        println!("  - {file}");
    }

    if !yes && !interactive::confirm("Delete these files?", false)? {
        println!("{}", style("Aborting").yellow());
        return Ok(());
    }

    for file in &files_to_delete {
        let path = dir.join(file);
        fs::remove_file(&path).map_err(|e| MigrationError::Io { path, source: e })?;
    }

    println!("{}", style("Migration files deleted").green());
    Ok(())
}
