//! Environment snapshots.
//!
//! Collectors take environment snapshots rather than reading the process
//! environment, so tests never need to mutate global state.

/// Build an owned environment snapshot from literal pairs.
pub fn env_vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}
