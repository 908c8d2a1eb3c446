//! Building override trees from assignments.

use crate::node::{Mapping, Node};
use crate::path::{Assignment, MAX_INDEX, Segment};

/// Insert one assignment into `tree`, creating containers along the path.
///
/// Intermediate slots holding an incompatible variant are overwritten.
/// Indexed segments grow the sequence with empty mappings up to the index.
/// The terminal segment always receives a [`Node::Scalar`], replacing
/// whatever was there.
///
/// Assignments indexing past [`MAX_INDEX`] are skipped with a warning.
pub fn insert(tree: &mut Mapping, assignment: &Assignment) {
    let oversized = assignment
        .path
        .segments()
        .iter()
        .any(|segment| padded_len(segment).is_none());
    if oversized {
        tracing::warn!(%assignment, max = MAX_INDEX, "Skipping override with an oversized index");
        return;
    }

    let (last, parents) = assignment.path.split_last();

    let mut current = tree;
    for segment in parents {
        current = descend(current, segment);
    }

    let leaf = Node::Scalar(assignment.value.clone());
    let slot = current
        .entry(last.key.clone())
        .or_insert_with(Node::empty_mapping);
    match (last.index, padded_len(last)) {
        (Some(index), Some(len)) => slot.ensure_sequence(len)[index] = leaf,
        _ => *slot = leaf,
    }
}

/// Sequence length needed to address `segment`, or `None` past the bound.
fn padded_len(segment: &Segment) -> Option<usize> {
    match segment.index {
        Some(index) if index > MAX_INDEX => None,
        Some(index) => index.checked_add(1),
        None => Some(0),
    }
}

fn descend<'a>(map: &'a mut Mapping, segment: &Segment) -> &'a mut Mapping {
    let slot = map
        .entry(segment.key.clone())
        .or_insert_with(Node::empty_mapping);
    match (segment.index, padded_len(segment)) {
        (Some(index), Some(len)) => slot.ensure_sequence(len)[index].ensure_mapping(),
        _ => slot.ensure_mapping(),
    }
}

/// Build an override tree from assignments, later assignments winning.
pub fn build<'a, I>(assignments: I) -> Node
where
    I: IntoIterator<Item = &'a Assignment>,
{
    let mut tree = Mapping::new();
    for assignment in assignments {
        insert(&mut tree, assignment);
    }
    Node::Mapping(tree)
}
