//! Error types for rk-override
//!
//! Nothing in this crate is fatal. A malformed assignment becomes a
//! [`ParseError`] and is skipped, and every failure of one override source is
//! gathered into a single [`CollectionError`] for reporting.

use std::fmt;

use crate::collect::Source;

/// Result type for rk-override operations
pub type Result<T> = std::result::Result<T, ParseError>;

/// One malformed assignment or path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Assignment '{assignment}' has no '=' separating path and value")]
    MissingEquals { assignment: String },

    #[error("Path '{path}' is empty")]
    EmptyPath { path: String },

    #[error("Path '{path}' contains an empty segment")]
    EmptySegment { path: String },

    #[error("Path '{path}' has an unmatched bracket in segment '{segment}'")]
    UnmatchedBracket { path: String, segment: String },

    #[error("Path '{path}' has a non-integer index '{index}'")]
    InvalidIndex { path: String, index: String },

    #[error("Path '{path}' has unexpected characters after ']' in segment '{segment}'")]
    TrailingCharacters { path: String, segment: String },

    #[error("Path '{path}' has index {index}, above the maximum of {max}")]
    IndexTooLarge {
        path: String,
        index: String,
        max: usize,
    },
}

impl ParseError {
    /// The raw text the error refers to.
    pub fn input(&self) -> &str {
        match self {
            Self::MissingEquals { assignment } => assignment,
            Self::EmptyPath { path }
            | Self::EmptySegment { path }
            | Self::UnmatchedBracket { path, .. }
            | Self::InvalidIndex { path, .. }
            | Self::TrailingCharacters { path, .. }
            | Self::IndexTooLarge { path, .. } => path,
        }
    }
}

/// Every parse failure collected from one override source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionError {
    pub origin: Source,
    pub errors: Vec<ParseError>,
}

impl CollectionError {
    pub fn new(origin: Source, errors: Vec<ParseError>) -> Self {
        Self { origin, errors }
    }
}

impl fmt::Display for CollectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} malformed {} override(s) ignored",
            self.errors.len(),
            self.origin
        )?;
        for error in &self.errors {
            write!(f, "; {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for CollectionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_error_lists_every_failure() {
        let error = CollectionError::new(
            Source::Flag,
            vec![
                ParseError::MissingEquals {
                    assignment: "a.b".to_string(),
                },
                ParseError::InvalidIndex {
                    path: "a[x]".to_string(),
                    index: "x".to_string(),
                },
            ],
        );

        let message = error.to_string();
        assert!(message.starts_with("2 malformed flag override(s) ignored"));
        assert!(message.contains("'a.b'"));
        assert!(message.contains("non-integer index 'x'"));
    }

    #[test]
    fn test_input_returns_offending_text() {
        let error = ParseError::UnmatchedBracket {
            path: "gin[0.port".to_string(),
            segment: "gin[0".to_string(),
        };
        assert_eq!(error.input(), "gin[0.port");
    }
}
