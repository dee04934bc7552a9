//! Stack-driven deep merge.
//!
//! Every source is applied as one pass over an explicit stack of work items.
//! A work item carries a source value, the key it will be installed under,
//! and the destination node. Structured values either get a fresh node (the
//! slot is overwritable) or are merged into the node already at the slot;
//! scalars are assigned directly.
//!
//! # Invariants
//!
//! - The result is allocated by this call; no input node is ever written to
//!   or attached to the output.
//! - Within one call, a source node that was given a fresh output node keeps
//!   mapping to it (the identity map), so shared and cyclic source structure
//!   is reproduced instead of duplicated or looped over.
//! - A (source node, destination node) pair is never entered again while it
//!   is still being merged, so cyclic input that meets an already merged
//!   cycle terminates. Pairs that are revisited after their first merge
//!   completed are merged again, keeping later keys authoritative.

use std::collections::{HashMap, HashSet};

use serde_json::Value as Json;
use tracing::{debug, trace, warn};

use cfgmerge_tree::{Forest, Key, Node, NodeId, Scalar, Shape, TreeError, TreeResult, Value};

use crate::error::{MergeError, MergeResult};
use crate::policy::{disposition, Disposition};

/// Counters describing one merge invocation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Passes run, one per structured target plus one per source.
    pub passes: usize,
    /// Work items popped from the stack.
    pub work_items: usize,
    /// Output nodes allocated, the accumulator included.
    pub nodes_allocated: usize,
    /// Slots filled with an already merged node via the identity map.
    pub shared_reuses: usize,
    /// Merges skipped because the same pair was already being merged
    /// further up the current path.
    pub revisits_skipped: usize,
}

/// A pending unit of merge work.
struct WorkItem {
    value: Value,
    /// `None` for the root of a source, which merges into `dest` itself.
    key: Option<Key>,
    dest: NodeId,
}

enum Frame {
    Work(WorkItem),
    /// Every child of `source` merged into `dest` has been processed.
    Leave { source: NodeId, dest: NodeId },
}

struct Merger<'f> {
    forest: &'f mut Forest,
    /// Source node -> output node created for it during this call.
    identity: HashMap<NodeId, NodeId>,
    stats: MergeStats,
}

/// Merge `sources` left to right onto `target` and return the result.
///
/// The result is a new node of the target's shape; a scalar target yields a
/// mapping. Later sources win at conflicting leaves. Fails with
/// [`MergeError::MissingTarget`] when `target` is `None` or null.
pub fn merge(forest: &mut Forest, target: Option<&Value>, sources: &[Value]) -> MergeResult<Value> {
    merge_with_stats(forest, target, sources).map(|(value, _)| value)
}

/// Like [`merge`], also returning counters for the invocation.
pub fn merge_with_stats(
    forest: &mut Forest,
    target: Option<&Value>,
    sources: &[Value],
) -> MergeResult<(Value, MergeStats)> {
    let target = match target {
        None | Some(Value::Scalar(Scalar::Null)) => return Err(MergeError::MissingTarget),
        Some(target) => target,
    };

    let shape = forest.shape_of(target)?;
    if shape == Shape::Scalar {
        debug!("scalar merge target promoted to an empty mapping");
    }
    let acc = forest.alloc(Node::empty(shape));

    let mut merger = Merger {
        forest,
        identity: HashMap::new(),
        stats: MergeStats {
            nodes_allocated: 1,
            ..Default::default()
        },
    };

    if target.as_node().is_some() {
        merger.run_pass(target, acc)?;
    }
    for source in sources {
        merger.run_pass(source, acc)?;
    }

    let stats = merger.stats;
    debug!(
        sources = sources.len(),
        work_items = stats.work_items,
        allocated = stats.nodes_allocated,
        shared = stats.shared_reuses,
        "deep merge complete"
    );
    Ok((Value::Node(acc), stats))
}

/// Merge plain JSON trees.
///
/// The inputs are copied into a private forest, merged, and rendered back.
/// Plain JSON cannot share or cycle, so the rendering always succeeds.
pub fn merge_json(target: &Json, sources: &[Json]) -> MergeResult<Json> {
    let mut forest = Forest::new();
    let target = forest.import(target)?;
    let sources = sources
        .iter()
        .map(|source| forest.import(source))
        .collect::<TreeResult<Vec<_>>>()?;

    let merged = merge(&mut forest, Some(&target), &sources)?;
    Ok(forest.export(&merged)?)
}

impl Merger<'_> {
    fn run_pass(&mut self, source: &Value, acc: NodeId) -> MergeResult<()> {
        self.stats.passes += 1;
        let mut on_path: HashSet<(NodeId, NodeId)> = HashSet::new();
        let mut stack = vec![Frame::Work(WorkItem {
            value: source.clone(),
            key: None,
            dest: acc,
        })];

        while let Some(frame) = stack.pop() {
            let WorkItem { value, key, dest } = match frame {
                Frame::Work(item) => item,
                Frame::Leave { source, dest } => {
                    on_path.remove(&(source, dest));
                    continue;
                }
            };
            self.stats.work_items += 1;

            let src = match value {
                Value::Node(src) => src,
                scalar @ Value::Scalar(_) => {
                    match key {
                        Some(key) => {
                            self.install(dest, key, scalar)?;
                        }
                        None => debug!("scalar source contributes no keys"),
                    }
                    continue;
                }
            };

            let target = match key {
                None => dest,
                Some(key) => {
                    let incoming = self.forest.node(src)?.shape();
                    let existing = self.forest.slot(dest, &key)?;
                    match disposition(self.forest, existing, incoming)? {
                        Disposition::Replace => {
                            if let Some(&merged) = self.identity.get(&src) {
                                trace!(source = %src, merged = %merged, key = %key, "reusing merged node");
                                if self.install(dest, key, Value::Node(merged))? {
                                    self.stats.shared_reuses += 1;
                                }
                                continue;
                            }
                            let fresh = self.forest.alloc(Node::empty(incoming));
                            self.stats.nodes_allocated += 1;
                            trace!(source = %src, fresh = %fresh, key = %key, "allocated output node");
                            self.identity.insert(src, fresh);
                            if !self.install(dest, key, Value::Node(fresh))? {
                                self.identity.remove(&src);
                                continue;
                            }
                            fresh
                        }
                        Disposition::MergeInto(existing) => {
                            trace!(source = %src, into = %existing, key = %key, "merging into existing node");
                            existing
                        }
                    }
                }
            };

            if !on_path.insert((src, target)) {
                self.stats.revisits_skipped += 1;
                trace!(source = %src, dest = %target, "pair already being merged; skipped");
                continue;
            }
            stack.push(Frame::Leave {
                source: src,
                dest: target,
            });
            for (child_key, child) in self.forest.node(src)?.entries() {
                stack.push(Frame::Work(WorkItem {
                    value: child,
                    key: Some(child_key),
                    dest: target,
                }));
            }
        }

        Ok(())
    }

    /// Write `value` at `key` in `dest`. Returns `false` if the destination
    /// cannot hold the key and the entry was dropped.
    fn install(&mut self, dest: NodeId, key: Key, value: Value) -> MergeResult<bool> {
        match self.forest.set(dest, key, value) {
            Ok(()) => Ok(true),
            Err(TreeError::KeyShapeMismatch { node, key }) => {
                warn!(node = %node, key = %key, "sequence cannot hold key; entry dropped");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}
