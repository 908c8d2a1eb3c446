//! Override assignment grammar
//!
//! Overrides are written as flattened assignments:
//!
//! - Dot-separated keys: `gin.port=8080`
//! - Array indexing: `gin[0].port=8080`
//! - Several assignments separated by commas: `gin[0].port=8080,gin[0].name=greeter`
//!
//! Only the first `=` of an assignment separates the path from the value, so
//! values may contain `=`. Whitespace around every token is ignored.
//!
//! # Examples
//!
//! ```
//! use rk_override::path::{parse, Segment};
//!
//! let parsed = parse("gin[0].port=2008, gin[0].name = greeter");
//! assert!(parsed.errors.is_empty());
//! assert_eq!(parsed.assignments.len(), 2);
//! assert_eq!(
//!     parsed.assignments[0].path.segments(),
//!     &[Segment::indexed("gin", 0), Segment::key("port")]
//! );
//! assert_eq!(parsed.assignments[1].value, "greeter");
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{ParseError, Result};

/// Largest sequence index an override may address.
///
/// Building an override tree pads sequences up to the index, so the bound
/// caps what a single assignment can allocate.
pub const MAX_INDEX: usize = 65_536;

/// One dotted component of a [`Path`]: a key, optionally indexing into a
/// sequence stored under that key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    pub key: String,
    pub index: Option<usize>,
}

impl Segment {
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            index: None,
        }
    }

    pub fn indexed(key: impl Into<String>, index: usize) -> Self {
        Self {
            key: key.into(),
            index: Some(index),
        }
    }

    fn parse(text: &str, path: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ParseError::EmptySegment {
                path: path.to_string(),
            });
        }

        let unmatched = || ParseError::UnmatchedBracket {
            path: path.to_string(),
            segment: text.to_string(),
        };

        let Some(open) = text.find('[') else {
            if text.contains(']') {
                return Err(unmatched());
            }
            return Ok(Self::key(text));
        };

        let key = text[..open].trim();
        if key.is_empty() {
            return Err(ParseError::EmptySegment {
                path: path.to_string(),
            });
        }
        if key.contains(']') {
            return Err(unmatched());
        }

        let rest = &text[open + 1..];
        let close = rest.find(']').ok_or_else(unmatched)?;
        let raw_index = rest[..close].trim();
        if raw_index.contains('[') {
            return Err(unmatched());
        }
        if !rest[close + 1..].trim().is_empty() {
            return Err(ParseError::TrailingCharacters {
                path: path.to_string(),
                segment: text.to_string(),
            });
        }

        // `usize::from_str` accepts a leading '+', the grammar does not.
        if raw_index.is_empty() || !raw_index.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::InvalidIndex {
                path: path.to_string(),
                index: raw_index.to_string(),
            });
        }
        match raw_index.parse::<usize>() {
            Ok(index) if index <= MAX_INDEX => Ok(Self::indexed(key, index)),
            _ => Err(ParseError::IndexTooLarge {
                path: path.to_string(),
                index: raw_index.to_string(),
                max: MAX_INDEX,
            }),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}[{}]", self.key, index),
            None => write!(f, "{}", self.key),
        }
    }
}

/// A non-empty sequence of segments addressing one node of a tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// Build a path from segments. Returns `None` for an empty list.
    pub fn new(segments: Vec<Segment>) -> Option<Self> {
        (!segments.is_empty()).then_some(Self { segments })
    }

    /// Parse a single path such as `gin[0].commonService.enabled`.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyPath {
                path: text.to_string(),
            });
        }

        let segments = trimmed
            .split('.')
            .map(|segment| Segment::parse(segment, trimmed))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The terminal segment and the segments leading to it.
    pub fn split_last(&self) -> (&Segment, &[Segment]) {
        match self.segments.split_last() {
            Some(split) => split,
            None => unreachable!("paths are never empty"),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// One `path=value` override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub path: Path,
    pub value: String,
}

impl Assignment {
    pub fn new(path: Path, value: impl Into<String>) -> Self {
        Self {
            path,
            value: value.into(),
        }
    }

    /// Parse a single assignment. Commas are not treated as separators here.
    pub fn parse(text: &str) -> Result<Self> {
        let (path, value) = text
            .split_once('=')
            .ok_or_else(|| ParseError::MissingEquals {
                assignment: text.trim().to_string(),
            })?;

        Ok(Self {
            path: Path::parse(path)?,
            value: value.trim().to_string(),
        })
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.path, self.value)
    }
}

impl FromStr for Assignment {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Result of parsing an assignment list: the well-formed assignments in input
/// order and one error per malformed assignment that was skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parsed {
    pub assignments: Vec<Assignment>,
    pub errors: Vec<ParseError>,
}

impl Parsed {
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty() && self.errors.is_empty()
    }
}

/// Parse a comma-separated assignment list.
///
/// Malformed assignments are skipped and reported in [`Parsed::errors`];
/// their well-formed siblings are still returned. Empty pieces (for example a
/// trailing comma) are ignored.
pub fn parse(raw: &str) -> Parsed {
    let mut parsed = Parsed::default();

    for piece in raw.split(',') {
        if piece.trim().is_empty() {
            continue;
        }
        match Assignment::parse(piece) {
            Ok(assignment) => parsed.assignments.push(assignment),
            Err(error) => {
                tracing::debug!(%error, "Skipping malformed override assignment");
                parsed.errors.push(error);
            }
        }
    }

    parsed
}
