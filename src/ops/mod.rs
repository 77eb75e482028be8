// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Workchart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mutation operations for diagrams.
//!
//! Ops are applied as a batch to a working copy and committed only if every op succeeds, so a
//! failed batch never leaves the diagram partially mutated. Each batch produces a coarse delta the
//! UI can use to refresh derived state.

use std::collections::BTreeSet;
use std::fmt;

use crate::model::{Diagram, Edge, EdgeId, Node, NodeId, NodeKind, Position, Viewport};

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    AddNode {
        node_id: NodeId,
        kind: NodeKind,
        label: String,
        position: Position,
    },
    RenameNode {
        node_id: NodeId,
        label: String,
    },
    MoveNode {
        node_id: NodeId,
        position: Position,
    },
    RemoveNode {
        node_id: NodeId,
    },
    /// Connects `source_id` to `target_id` under the derived id `<source>-<target>`.
    AddEdge {
        source_id: NodeId,
        target_id: NodeId,
        label: Option<String>,
    },
    RenameEdge {
        edge_id: EdgeId,
        label: Option<String>,
    },
    RemoveEdge {
        edge_id: EdgeId,
    },
    /// Replaces `edge_id` with `source -> node_id -> target`, inserting the new node.
    SplitEdge {
        edge_id: EdgeId,
        node_id: NodeId,
        kind: NodeKind,
        label: String,
        position: Position,
    },
    SetViewport {
        viewport: Viewport,
    },
    /// Removes every node and edge; the viewport is kept.
    Clear,
}

/// A reference to a diagram object, used in deltas and errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectRef {
    Node(NodeId),
    Edge(EdgeId),
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(node_id) => write!(f, "node:{node_id}"),
            Self::Edge(edge_id) => write!(f, "edge:{edge_id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    pub applied: usize,
    pub delta: Delta,
}

/// Minimal delta describing which objects changed as the result of applying ops.
///
/// Refs are sorted (nodes before edges, then by id) and coalesced across the batch: an object
/// added and removed in the same batch is reported only as removed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delta {
    pub added: Vec<ObjectRef>,
    pub removed: Vec<ObjectRef>,
    pub updated: Vec<ObjectRef>,
    pub viewport_changed: bool,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && self.updated.is_empty()
            && !self.viewport_changed
    }
}

#[derive(Debug, Default)]
struct DeltaBuilder {
    added: BTreeSet<ObjectRef>,
    removed: BTreeSet<ObjectRef>,
    updated: BTreeSet<ObjectRef>,
    viewport_changed: bool,
}

impl DeltaBuilder {
    fn record_added(&mut self, object_ref: ObjectRef) {
        self.removed.remove(&object_ref);
        self.updated.remove(&object_ref);
        self.added.insert(object_ref);
    }

    fn record_removed(&mut self, object_ref: ObjectRef) {
        self.added.remove(&object_ref);
        self.updated.remove(&object_ref);
        self.removed.insert(object_ref);
    }

    fn record_updated(&mut self, object_ref: ObjectRef) {
        if self.added.contains(&object_ref) || self.removed.contains(&object_ref) {
            return;
        }
        self.updated.insert(object_ref);
    }

    fn record_viewport(&mut self) {
        self.viewport_changed = true;
    }

    fn finish(self) -> Delta {
        Delta {
            added: self.added.into_iter().collect(),
            removed: self.removed.into_iter().collect(),
            updated: self.updated.into_iter().collect(),
            viewport_changed: self.viewport_changed,
        }
    }
}

pub fn apply_ops(diagram: &mut Diagram, ops: &[Op]) -> Result<ApplyResult, ApplyError> {
    if ops.is_empty() {
        return Ok(ApplyResult {
            applied: 0,
            delta: Delta::default(),
        });
    }

    let mut working = diagram.clone();
    let mut delta = DeltaBuilder::default();

    for op in ops {
        apply_op(&mut working, op, &mut delta)?;
    }

    *diagram = working;
    Ok(ApplyResult {
        applied: ops.len(),
        delta: delta.finish(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApplyError {
    #[error("object already exists ({0})")]
    AlreadyExists(ObjectRef),
    #[error("object not found ({0})")]
    NotFound(ObjectRef),
    #[error("edge endpoint node not found (id={node_id})")]
    MissingNode { node_id: NodeId },
}

// Extracted per-op mutation implementation.
include!("ops_impl.rs");
