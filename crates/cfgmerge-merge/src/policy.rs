//! Overwrite policy for destination slots.
//!
//! When a structured source value arrives at a slot that is already occupied,
//! the policy decides whether it replaces the slot with a fresh node or merges
//! into the node already there.

use cfgmerge_tree::{Forest, NodeId, Shape, TreeResult, Value};

/// What to do with a structured value arriving at a destination slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// The slot is overwritable: install a fresh node (or a previously merged
    /// one for the same source node).
    Replace,
    /// The slot holds a compatible node: merge the source's children into it.
    MergeInto(NodeId),
}

/// Decide how an incoming value of shape `incoming` treats `existing`.
///
/// Only a mapping arriving on a mapping is merged into. Empty slots, null,
/// scalars, and every classification mismatch are replaced outright. A
/// sequence arriving on a sequence is replaced as a whole; sequences are never
/// merged element by element.
pub fn disposition(
    forest: &Forest,
    existing: Option<&Value>,
    incoming: Shape,
) -> TreeResult<Disposition> {
    let Some(Value::Node(id)) = existing else {
        return Ok(Disposition::Replace);
    };
    match (forest.node(*id)?.shape(), incoming) {
        (Shape::Mapping, Shape::Mapping) => Ok(Disposition::MergeInto(*id)),
        _ => Ok(Disposition::Replace),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_scalar_slots_are_replaced() {
        let forest = Forest::new();
        for existing in [None, Some(Value::null()), Some(Value::from(0)), Some(Value::from(""))] {
            let decision = disposition(&forest, existing.as_ref(), Shape::Mapping).unwrap();
            assert_eq!(decision, Disposition::Replace);
        }
    }

    #[test]
    fn mapping_on_mapping_merges() {
        let mut forest = Forest::new();
        let map = forest.new_mapping();
        let decision = disposition(&forest, Some(&Value::Node(map)), Shape::Mapping).unwrap();
        assert_eq!(decision, Disposition::MergeInto(map));
    }

    #[test]
    fn sequences_are_always_replaced() {
        let mut forest = Forest::new();
        let seq = forest.new_sequence();
        let map = forest.new_mapping();
        let on_seq = Some(Value::Node(seq));
        let on_map = Some(Value::Node(map));

        assert_eq!(disposition(&forest, on_seq.as_ref(), Shape::Sequence).unwrap(), Disposition::Replace);
        assert_eq!(disposition(&forest, on_seq.as_ref(), Shape::Mapping).unwrap(), Disposition::Replace);
        assert_eq!(disposition(&forest, on_map.as_ref(), Shape::Sequence).unwrap(), Disposition::Replace);
    }
}
