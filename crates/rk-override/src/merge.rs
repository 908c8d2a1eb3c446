//! Kind-aware deep merge of an override tree into a base tree
//!
//! The merge never changes the shape of the base tree. An override is only
//! applied where the base already holds a node of the same variant at the
//! same path; everything else (unknown keys, out-of-range indices, variant
//! mismatches) is discarded and merging continues with the siblings.
//!
//! Discarded overrides are not errors. The typed projection that follows the
//! merge relies on the base tree keeping the shape of the decoded document.

use crate::node::Node;

/// Why an override was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// The base has no key of that name
    UnknownKey,
    /// The base sequence is shorter than the index
    OutOfBounds,
    /// The base holds a different variant at that path
    KindMismatch,
}

impl std::fmt::Display for DiscardReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownKey => write!(f, "unknown key"),
            Self::OutOfBounds => write!(f, "index out of bounds"),
            Self::KindMismatch => write!(f, "kind mismatch"),
        }
    }
}

/// An override subtree that was dropped during a merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discarded {
    /// Grammar path of the dropped subtree, empty for the root
    pub path: String,
    pub reason: DiscardReason,
}

/// What a merge did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Number of base scalars replaced
    pub replaced: usize,
    pub discarded: Vec<Discarded>,
}

impl MergeReport {
    pub fn is_clean(&self) -> bool {
        self.discarded.is_empty()
    }
}

/// Merge `overrides` into `base` in place.
///
/// - Mapping into mapping: recurse into keys present in both with the same variant.
/// - Sequence into sequence: recurse into indices below the base length with the same variant.
/// - Scalar into scalar: the override replaces the base value.
/// - Anything else: the override is discarded.
pub fn merge(base: &mut Node, overrides: &Node) -> MergeReport {
    let mut report = MergeReport::default();
    merge_node(base, overrides, &mut String::new(), &mut report);

    for discarded in &report.discarded {
        tracing::debug!(
            path = %discarded.path,
            reason = %discarded.reason,
            "Discarding override that does not match the base document"
        );
    }

    report
}

fn merge_node(base: &mut Node, overrides: &Node, path: &mut String, report: &mut MergeReport) {
    match (base, overrides) {
        (Node::Mapping(base_map), Node::Mapping(override_map)) => {
            for (key, override_value) in override_map {
                let len = path.len();
                if !path.is_empty() {
                    path.push('.');
                }
                path.push_str(key);

                match base_map.get_mut(key) {
                    Some(base_value) if base_value.same_kind(override_value) => {
                        merge_node(base_value, override_value, path, report);
                    }
                    Some(_) => discard(report, path, DiscardReason::KindMismatch),
                    None => discard(report, path, DiscardReason::UnknownKey),
                }

                path.truncate(len);
            }
        }
        (Node::Sequence(base_items), Node::Sequence(override_items)) => {
            for (index, override_item) in override_items.iter().enumerate() {
                let len = path.len();
                path.push_str(&format!("[{index}]"));

                match base_items.get_mut(index) {
                    Some(base_item) if base_item.same_kind(override_item) => {
                        merge_node(base_item, override_item, path, report);
                    }
                    Some(_) => discard(report, path, DiscardReason::KindMismatch),
                    None => discard(report, path, DiscardReason::OutOfBounds),
                }

                path.truncate(len);
            }
        }
        (Node::Scalar(base_value), Node::Scalar(override_value)) => {
            base_value.clone_from(override_value);
            report.replaced += 1;
        }
        _ => discard(report, path, DiscardReason::KindMismatch),
    }
}

fn discard(report: &mut MergeReport, path: &str, reason: DiscardReason) {
    report.discarded.push(Discarded {
        path: path.to_string(),
        reason,
    });
}
