//! Flag/env resolution for CLI inputs
//!
//! Precedence: explicit flag, then environment variable. The env file
//! is loaded before flags are resolved so variables from `.env` are
//! visible to both.

/// Load an env file if one exists. A missing file is not an error; the
/// operator may be supplying everything through flags or the shell.
pub fn load_env_file(filename: Option<&str>) {
    let result = match filename {
        Some(name) => dotenv::from_filename(name).map(|_| ()),
        None => dotenv::dotenv().map(|_| ()),
    };

    if let Err(err) = result {
        tracing::debug!("no env file loaded: {}", err);
    }
}

/// Resolve a value from a flag, falling back to an environment
/// variable. Empty strings count as absent.
pub fn flag_or_env(flag: Option<String>, env_key: &str) -> Option<String> {
    flag.filter(|value| !value.is_empty())
        .or_else(|| std::env::var(env_key).ok().filter(|value| !value.is_empty()))
}
