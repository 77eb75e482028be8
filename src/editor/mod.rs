// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Workchart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The diagram store: single source of truth for the diagram being edited.
//!
//! All mutations funnel through [`crate::ops::apply_ops`], so each one is atomic. Subscribers are
//! notified once per committed mutation, in registration order, with the full current diagram.

use std::fmt;

use tracing::debug;

use crate::model::{Diagram, EdgeId, NodeId, NodeKind, Position, Viewport};
use crate::ops::{apply_ops, ApplyError, ApplyResult, Op};

type Subscriber = Box<dyn FnMut(&Diagram) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

pub struct DiagramStore {
    diagram: Diagram,
    rev: u64,
    next_subscription: u64,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
}

impl fmt::Debug for DiagramStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagramStore")
            .field("diagram", &self.diagram)
            .field("rev", &self.rev)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Default for DiagramStore {
    fn default() -> Self {
        Self::new(Diagram::default())
    }
}

impl DiagramStore {
    pub fn new(diagram: Diagram) -> Self {
        Self {
            diagram,
            rev: 0,
            next_subscription: 0,
            subscribers: Vec::new(),
        }
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    /// Bumped once per committed mutation.
    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&Diagram) + Send + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription = self.next_subscription.saturating_add(1);
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before_len = self.subscribers.len();
        self.subscribers.retain(|(candidate, _)| *candidate != id);
        self.subscribers.len() != before_len
    }

    /// Applies a batch of ops atomically; notifies once if anything was applied.
    pub fn apply(&mut self, ops: &[Op]) -> Result<ApplyResult, ApplyError> {
        let result = apply_ops(&mut self.diagram, ops)?;
        if result.applied > 0 {
            self.commit();
        }
        Ok(result)
    }

    /// Replaces the whole diagram, e.g. after loading a snapshot.
    pub fn replace(&mut self, diagram: Diagram) {
        self.diagram = diagram;
        self.commit();
    }

    /// Adds a node; the label defaults to `"<Kind> <ordinal>"`.
    pub fn add_node(&mut self, kind: NodeKind, position: Position, label: Option<String>) -> NodeId {
        let node_id = self.diagram.next_node_id(kind);
        let label = label.unwrap_or_else(|| self.diagram.next_default_label(kind));
        let op = Op::AddNode {
            node_id: node_id.clone(),
            kind,
            label,
            position,
        };
        // The id was chosen to be free, so this cannot conflict.
        if let Err(err) = self.apply(&[op]) {
            debug!(%node_id, %err, "add_node rejected");
        }
        node_id
    }

    /// Connects two nodes with the edge `<source>-<target>`.
    ///
    /// Connecting the same pair twice is a silent no-op: the existing edge (and its label) is
    /// kept and its id returned without notifying subscribers.
    pub fn add_edge(&mut self, source_id: &NodeId, target_id: &NodeId) -> Result<EdgeId, ApplyError> {
        if let Some(existing) = self.diagram.edge_between(source_id, target_id) {
            let edge_id = existing.edge_id().clone();
            debug!(%edge_id, "add_edge ignored duplicate connection");
            return Ok(edge_id);
        }
        let edge_id = EdgeId::between(source_id, target_id);
        self.apply(&[Op::AddEdge {
            source_id: source_id.clone(),
            target_id: target_id.clone(),
            label: None,
        }])?;
        Ok(edge_id)
    }

    pub fn rename_node(&mut self, node_id: &NodeId, label: impl Into<String>) -> bool {
        self.apply_or_ignore(Op::RenameNode {
            node_id: node_id.clone(),
            label: label.into(),
        })
    }

    /// Sets the edge label; an empty label clears it.
    pub fn rename_edge(&mut self, edge_id: &EdgeId, label: impl Into<String>) -> bool {
        self.apply_or_ignore(Op::RenameEdge {
            edge_id: edge_id.clone(),
            label: Some(label.into()),
        })
    }

    pub fn move_node(&mut self, node_id: &NodeId, position: Position) -> bool {
        self.apply_or_ignore(Op::MoveNode {
            node_id: node_id.clone(),
            position,
        })
    }

    /// Removes the node and every edge referencing it.
    pub fn remove_node(&mut self, node_id: &NodeId) -> bool {
        self.apply_or_ignore(Op::RemoveNode {
            node_id: node_id.clone(),
        })
    }

    pub fn remove_edge(&mut self, edge_id: &EdgeId) -> bool {
        self.apply_or_ignore(Op::RemoveEdge {
            edge_id: edge_id.clone(),
        })
    }

    /// Inserts a new node in the middle of an edge; `None` if the edge is unknown or dangling.
    pub fn split_edge(
        &mut self,
        edge_id: &EdgeId,
        kind: NodeKind,
        position: Position,
    ) -> Option<NodeId> {
        let node_id = self.diagram.next_node_id(kind);
        let label = self.diagram.next_default_label(kind);
        let applied = self.apply_or_ignore(Op::SplitEdge {
            edge_id: edge_id.clone(),
            node_id: node_id.clone(),
            kind,
            label,
            position,
        });
        applied.then_some(node_id)
    }

    pub fn set_viewport(&mut self, x: f64, y: f64, zoom: f64) {
        let viewport = Viewport::new(x, y, zoom);
        if self.diagram.viewport() == viewport {
            return;
        }
        self.apply_or_ignore(Op::SetViewport { viewport });
    }

    /// Removes every node and edge.
    pub fn clear(&mut self) {
        if self.diagram.is_empty() {
            return;
        }
        self.apply_or_ignore(Op::Clear);
    }

    fn apply_or_ignore(&mut self, op: Op) -> bool {
        match self.apply(std::slice::from_ref(&op)) {
            Ok(_) => true,
            Err(ApplyError::NotFound(object_ref)) => {
                debug!(object = %object_ref, "mutation ignored: object not found");
                false
            }
            Err(err) => {
                debug!(%err, "mutation ignored");
                false
            }
        }
    }

    fn commit(&mut self) {
        self.rev = self.rev.saturating_add(1);
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&self.diagram);
        }
    }
}

#[cfg(test)]
mod tests;
