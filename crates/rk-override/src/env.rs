//! Environment variable names as override paths
//!
//! Environment variable names only carry `[A-Za-z0-9_]`, so the path grammar
//! is folded into underscores: `RK_GIN_0_COMMONSERVICE_ENABLED` addresses
//! `gin[0].commonservice.enabled`. A purely numeric component indexes the
//! sequence named by the component before it.

/// Prefix used when none is configured.
pub const DEFAULT_PREFIX: &str = "RK";

/// Converts prefixed environment variable names into override paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvKeyReformatter {
    /// Upper-cased prefix including the trailing `_`
    marker: String,
}

impl Default for EnvKeyReformatter {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl EnvKeyReformatter {
    /// Create a reformatter for `prefix`, given without the `_` separator.
    pub fn new(prefix: &str) -> Self {
        let prefix = prefix.trim().trim_end_matches('_');
        Self {
            marker: format!("{}_", prefix.to_ascii_uppercase()),
        }
    }

    /// The configured prefix, upper-cased, without separator.
    pub fn prefix(&self) -> &str {
        &self.marker[..self.marker.len() - 1]
    }

    /// Whether `name` starts with `<PREFIX>_`, ignoring ASCII case.
    pub fn matches(&self, name: &str) -> bool {
        name.len() > self.marker.len()
            && name.is_char_boundary(self.marker.len())
            && name[..self.marker.len()].eq_ignore_ascii_case(&self.marker)
    }

    /// Reformat a variable name into an override path.
    ///
    /// Returns `None` when the name does not carry the prefix.
    pub fn reformat(&self, name: &str) -> Option<String> {
        if !self.matches(name) {
            return None;
        }

        let dotted = name[self.marker.len()..].to_lowercase().replace('_', ".");
        Some(fold_indices(&dotted))
    }
}

/// Fold purely numeric segments into an index on the preceding segment:
/// `gin.0.port` becomes `gin[0].port`.
///
/// A numeric segment stays a literal key when there is no preceding segment
/// or when the preceding segment already carries an index.
pub fn fold_indices(dotted: &str) -> String {
    let mut segments: Vec<String> = Vec::new();

    for token in dotted.split('.') {
        let index = (!token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()))
            .then(|| token.parse::<usize>().ok())
            .flatten();

        match (index, segments.last_mut()) {
            (Some(index), Some(previous)) if !previous.ends_with(']') => {
                previous.push_str(&format!("[{index}]"));
            }
            _ => segments.push(token.to_string()),
        }
    }

    segments.join(".")
}
