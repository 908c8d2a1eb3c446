//! Override collectors
//!
//! A collector gathers raw assignments from one source, parses them and
//! builds the override tree for that source. Parse failures never abort a
//! collection; they are returned alongside the tree and logged once per
//! collector.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::env::EnvKeyReformatter;
use crate::error::{CollectionError, ParseError};
use crate::node::Node;
use crate::path::{self, Assignment};
use crate::tree;

/// Where overrides came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Environment,
    Flag,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Environment => write!(f, "environment"),
            Self::Flag => write!(f, "flag"),
        }
    }
}

/// A guard that lets exactly one caller through.
#[derive(Debug, Default)]
pub struct OneShot(AtomicBool);

impl OneShot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` the first time it is called, `false` afterwards.
    pub fn fire(&self) -> bool {
        !self.0.swap(true, Ordering::AcqRel)
    }

    pub fn has_fired(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// The overrides gathered from one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overrides {
    source: Source,
    /// Human-readable description of each raw entry that was collected
    entries: Vec<String>,
    assignments: Vec<Assignment>,
    errors: Vec<ParseError>,
    tree: Node,
}

impl Overrides {
    fn from_input(source: Source, entries: Vec<String>, input: &str) -> Self {
        let parsed = path::parse(input);
        let tree = tree::build(&parsed.assignments);
        Self {
            source,
            entries,
            assignments: parsed.assignments,
            errors: parsed.errors,
            tree,
        }
    }

    /// No overrides at all.
    pub fn empty(source: Source) -> Self {
        Self {
            source,
            entries: Vec::new(),
            assignments: Vec::new(),
            errors: Vec::new(),
            tree: Node::empty_mapping(),
        }
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// The override tree, always a mapping.
    pub fn tree(&self) -> &Node {
        &self.tree
    }

    pub fn into_tree(self) -> Node {
        self.tree
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All parse failures of this source, if there were any.
    pub fn error(&self) -> Option<CollectionError> {
        (!self.errors.is_empty()).then(|| CollectionError::new(self.source, self.errors.clone()))
    }

    fn log(&self) {
        if self.entries.is_empty() {
            return;
        }
        match self.error() {
            Some(error) => tracing::warn!(
                source = %self.source,
                entries = ?self.entries,
                %error,
                "Found overrides, but some failed to parse, ignoring those"
            ),
            None => tracing::info!(
                source = %self.source,
                entries = ?self.entries,
                "Found overrides, applying"
            ),
        }
    }
}

/// Collects overrides from environment variables carrying a prefix.
///
/// `RK_GIN_0_PORT=2008` becomes the assignment `gin[0].port=2008`.
#[derive(Debug, Default)]
pub struct EnvCollector {
    reformatter: EnvKeyReformatter,
    logged: OneShot,
}

impl EnvCollector {
    pub fn new(prefix: &str) -> Self {
        Self {
            reformatter: EnvKeyReformatter::new(prefix),
            logged: OneShot::new(),
        }
    }

    pub fn prefix(&self) -> &str {
        self.reformatter.prefix()
    }

    /// Collect overrides from a snapshot of environment variables.
    ///
    /// Variables are visited in name order so that two names reformatting to
    /// the same path resolve deterministically.
    pub fn collect<I, K, V>(&self, vars: I) -> Overrides
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut vars: Vec<(K, V)> = vars.into_iter().collect();
        vars.sort_by(|a, b| a.0.as_ref().cmp(b.0.as_ref()));

        let mut entries = Vec::new();
        let mut raw = Vec::new();
        for (name, value) in &vars {
            let (name, value) = (name.as_ref(), value.as_ref());
            let Some(path) = self.reformatter.reformat(name) else {
                continue;
            };
            entries.push(format!("{name}={value} => {path}={value}"));
            raw.push(format!("{path}={value}"));
        }

        let overrides = Overrides::from_input(Source::Environment, entries, &raw.join(","));
        if self.logged.fire() {
            overrides.log();
        }
        overrides
    }

    /// Collect overrides from the current process environment.
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    pub fn collect_process(&self) -> Overrides {
        self.collect(std::env::vars_os().filter_map(|(name, value)| {
            Some((name.into_string().ok()?, value.into_string().ok()?))
        }))
    }
}

/// Collects overrides from the values of the `--rkset` flag.
#[derive(Debug, Default)]
pub struct FlagCollector {
    logged: OneShot,
}

impl FlagCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect overrides from every occurrence of the flag, in order.
    pub fn collect<S: AsRef<str>>(&self, values: &[S]) -> Overrides {
        let entries: Vec<String> = values
            .iter()
            .map(|value| value.as_ref().trim().to_string())
            .filter(|value| !value.is_empty())
            .collect();

        let overrides = Overrides::from_input(Source::Flag, entries.clone(), &entries.join(","));
        if self.logged.fire() {
            overrides.log();
        }
        overrides
    }
}
