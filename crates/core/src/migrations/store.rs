//! Migration Store - File system discovery of migration scripts
//!
//! Scans one directory, non-recursively, for files named
//! `<key>.up.sql` / `<key>.down.sql`. The store makes no ordering
//! promise; sorting is the resolver's job.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MigrationError, MigrationResult};

use super::definitions::{is_valid_key, Direction, MigrationFile, MigrationObject};

/// Reads migration scripts from a directory.
pub struct MigrationStore {
    dir: PathBuf,
}

impl MigrationStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory this store reads from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Discover every script that qualifies for `direction`.
    ///
    /// A missing directory and an empty directory both yield zero
    /// migrations; only an unreadable directory is an error.
    /// Subdirectories and files whose stripped name is not a valid key
    /// are skipped.
    pub fn discover(&self, direction: Direction) -> MigrationResult<Vec<MigrationObject>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.dir).map_err(|e| MigrationError::Io {
            path: self.dir.clone(),
            source: e,
        })?;

        let mut found = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| MigrationError::Io {
                path: self.dir.clone(),
                source: e,
            })?;

            let path = entry.path();
            if path.is_dir() {
                continue;
            }

            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(key) = name.strip_suffix(direction.file_suffix()) else {
                continue;
            };

            if !is_valid_key(key) {
                tracing::warn!(file = name, "skipping migration file with malformed key");
                continue;
            }

            found.push(MigrationObject {
                key: key.to_string(),
                file: MigrationFile {
                    key: key.to_string(),
                    direction,
                    path,
                },
            });
        }

        Ok(found)
    }

    /// Read the SQL text of one discovered script.
    pub fn read_script(&self, file: &MigrationFile) -> MigrationResult<String> {
        fs::read_to_string(&file.path).map_err(|e| MigrationError::Io {
            path: file.path.clone(),
            source: e,
        })
    }
}
