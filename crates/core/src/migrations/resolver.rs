//! Resolver - Computes the ordered subset of migrations to run next
//!
//! Migrations apply in strict creation order and roll back in strict
//! reverse order, because later scripts may assume the schema state the
//! earlier ones produced. The limit pattern is a prefix cutoff over the
//! sorted order, not an arbitrary filter: it lets an operator say "run
//! everything up to this one" without enumerating the keys in between.

use std::collections::HashSet;

use glob::Pattern;

use crate::error::{MigrationError, MigrationResult};

use super::definitions::{Direction, MigrationObject};

/// Pattern that never cuts the walk short.
pub const UNBOUNDED: &str = "*";

/// Compute which migrations to run, in which order.
///
/// Sorts `all` by key (reversed for [`Direction::Down`]), then walks the
/// sequence collecting eligible migrations: pending ones when going up,
/// applied ones when going down. The walk stops at the first key that
/// fails to match `limit_pattern` after a match has been seen, so a
/// pattern naming one migration selects the contiguous leading run that
/// ends with it. A pattern matching no key at all selects nothing.
pub fn resolve(
    direction: Direction,
    limit_pattern: &str,
    mut all: Vec<MigrationObject>,
    applied_keys: &HashSet<String>,
) -> MigrationResult<Vec<MigrationObject>> {
    let pattern = Pattern::new(limit_pattern).map_err(|e| MigrationError::Pattern {
        pattern: limit_pattern.to_string(),
        source: e,
    })?;

    all.sort_by(|a, b| a.key.cmp(&b.key));
    if direction == Direction::Down {
        all.reverse();
    }

    let mut plan = Vec::new();
    let mut matched = false;

    for migration in all {
        let hit = pattern.matches(&migration.key);
        if matched && !hit {
            break;
        }
        matched = matched || hit;

        let eligible = match direction {
            Direction::Up => !applied_keys.contains(&migration.key),
            Direction::Down => applied_keys.contains(&migration.key),
        };
        if eligible {
            plan.push(migration);
        }
    }

    if !matched {
        return Ok(Vec::new());
    }

    Ok(plan)
}
