//! Small helpers used while booting

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable naming the domain this process runs in.
pub const DOMAIN_ENV: &str = "DOMAIN";

/// Return `default` when `origin` is empty.
pub fn default_if_empty<'a>(origin: &'a str, default: &'a str) -> &'a str {
    if origin.is_empty() { default } else { origin }
}

/// Whether an entry configured for `domain` should start in the current
/// domain, read from the `DOMAIN` environment variable.
///
/// An empty domain or `*` matches every environment.
pub fn is_valid_domain(domain: &str) -> bool {
    let current = std::env::var(DOMAIN_ENV).unwrap_or_default();
    domain_matches(domain, &current)
}

/// [`is_valid_domain`] against an explicit current domain.
pub fn domain_matches(domain: &str, current: &str) -> bool {
    let domain = default_if_empty(domain, "*");
    domain == "*" || domain == current
}

/// Read a boot document from disk. Relative paths are resolved against the
/// current working directory.
pub fn read_local_file(path: impl AsRef<Path>) -> Result<String> {
    let path = resolve(path.as_ref())?;
    fs::read_to_string(&path).map_err(|source| Error::Read { path, source })
}

fn resolve(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
