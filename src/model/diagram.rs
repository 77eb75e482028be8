// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Workchart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::edge::Edge;
use super::ids::{EdgeId, NodeId};
use super::node::{Node, NodeKind, Position};

/// Pan/zoom state of the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Viewport {
    pub fn new(x: f64, y: f64, zoom: f64) -> Self {
        Self { x, y, zoom }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

/// The whole user-visible chart: nodes and edges in insertion order, plus the viewport.
///
/// Ids are unique within each collection. Edges may reference nodes that no longer exist
/// (e.g. after loading a hand-edited snapshot); those are kept here and skipped on export.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Diagram {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    viewport: Viewport,
}

impl Diagram {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>, viewport: Viewport) -> Self {
        Self {
            nodes,
            edges,
            viewport,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut Vec<Node> {
        &mut self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edges_mut(&mut self) -> &mut Vec<Edge> {
        &mut self.edges
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node(&self, node_id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| node.node_id() == node_id)
    }

    pub fn node_mut(&mut self, node_id: &NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|node| node.node_id() == node_id)
    }

    pub fn contains_node(&self, node_id: &NodeId) -> bool {
        self.node(node_id).is_some()
    }

    pub fn edge(&self, edge_id: &EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|edge| edge.edge_id() == edge_id)
    }

    pub fn edge_mut(&mut self, edge_id: &EdgeId) -> Option<&mut Edge> {
        self.edges.iter_mut().find(|edge| edge.edge_id() == edge_id)
    }

    pub fn contains_edge(&self, edge_id: &EdgeId) -> bool {
        self.edge(edge_id).is_some()
    }

    pub fn count_of_kind(&self, kind: NodeKind) -> usize {
        self.nodes.iter().filter(|node| node.kind() == kind).count()
    }

    /// Default label for the next node of `kind`: `"<Kind> <ordinal>"`.
    ///
    /// The ordinal is derived from the current node set, not from a counter, so it can repeat
    /// after deletions.
    pub fn next_default_label(&self, kind: NodeKind) -> String {
        format!("{} {}", kind.display_name(), self.count_of_kind(kind) + 1)
    }

    /// A fresh `<kind>-<n>` node id, starting from `node_count + 1` and skipping taken ids.
    ///
    /// Endpoints of dangling edges count as taken, so a new node never adopts a stale edge.
    pub fn next_node_id(&self, kind: NodeKind) -> NodeId {
        let mut n = self.nodes.len() + 1;
        loop {
            let candidate = format!("{}-{n}", kind.as_str());
            if !self.is_node_id_referenced(&candidate) {
                if let Ok(node_id) = NodeId::new(candidate) {
                    return node_id;
                }
            }
            n += 1;
        }
    }

    fn is_node_id_referenced(&self, candidate: &str) -> bool {
        self.nodes
            .iter()
            .any(|node| node.node_id().as_str() == candidate)
            || self.edges.iter().any(|edge| {
                edge.source_id().as_str() == candidate || edge.target_id().as_str() == candidate
            })
    }

    /// The edge running from `source_id` to `target_id`, whatever its id.
    pub fn edge_between(&self, source_id: &NodeId, target_id: &NodeId) -> Option<&Edge> {
        self.edges
            .iter()
            .find(|edge| edge.source_id() == source_id && edge.target_id() == target_id)
    }

    /// Halfway point between the endpoints of a resolved edge.
    pub fn edge_midpoint(&self, edge_id: &EdgeId) -> Option<Position> {
        let edge = self.edge(edge_id)?;
        let source = self.node(edge.source_id())?.position();
        let target = self.node(edge.target_id())?.position();
        Some(Position::new(
            (source.x + target.x) / 2.0,
            (source.y + target.y) / 2.0,
        ))
    }

    /// Edges whose endpoints both resolve to existing nodes.
    pub fn resolved_edges(&self) -> impl Iterator<Item = (&Edge, &Node, &Node)> + '_ {
        self.edges.iter().filter_map(move |edge| {
            let source = self.node(edge.source_id())?;
            let target = self.node(edge.target_id())?;
            Some((edge, source, target))
        })
    }
}
