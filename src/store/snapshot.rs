// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Workchart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{MalformedReason, StoreError};
use crate::model::{Diagram, Edge, EdgeId, Node, NodeId, NodeKind, Position, Viewport};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DiagramJson {
    #[serde(default)]
    nodes: Vec<NodeJson>,
    #[serde(default)]
    edges: Vec<EdgeJson>,
    #[serde(default)]
    viewport: ViewportJson,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct NodeJson {
    id: String,
    kind: String,
    label: String,
    position: PositionJson,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EdgeJson {
    id: String,
    source_id: String,
    target_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct PositionJson {
    x: f64,
    y: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct ViewportJson {
    x: f64,
    y: f64,
    zoom: f64,
}

impl Default for ViewportJson {
    fn default() -> Self {
        let viewport = Viewport::default();
        Self {
            x: viewport.x,
            y: viewport.y,
            zoom: viewport.zoom,
        }
    }
}

/// Serializes the full diagram, including dangling edges.
pub fn encode_snapshot(diagram: &Diagram) -> Result<String, StoreError> {
    let json = diagram_to_json(diagram);
    Ok(serde_json::to_string_pretty(&json)?)
}

pub fn decode_snapshot(raw: &str) -> Result<Diagram, StoreError> {
    let json: DiagramJson = serde_json::from_str(raw)?;
    diagram_from_json(json).map_err(|reason| StoreError::Malformed { reason })
}

fn diagram_to_json(diagram: &Diagram) -> DiagramJson {
    let viewport = diagram.viewport();
    DiagramJson {
        nodes: diagram
            .nodes()
            .iter()
            .map(|node| NodeJson {
                id: node.node_id().to_string(),
                kind: node.kind().as_str().to_owned(),
                label: node.label().to_owned(),
                position: PositionJson {
                    x: node.position().x,
                    y: node.position().y,
                },
            })
            .collect(),
        edges: diagram
            .edges()
            .iter()
            .map(|edge| EdgeJson {
                id: edge.edge_id().to_string(),
                source_id: edge.source_id().to_string(),
                target_id: edge.target_id().to_string(),
                label: edge.label().map(ToOwned::to_owned),
            })
            .collect(),
        viewport: ViewportJson {
            x: viewport.x,
            y: viewport.y,
            zoom: viewport.zoom,
        },
    }
}

fn diagram_from_json(json: DiagramJson) -> Result<Diagram, MalformedReason> {
    let mut seen_nodes = BTreeSet::new();
    let mut nodes = Vec::with_capacity(json.nodes.len());
    for node in json.nodes {
        let node_id = parse_node_id(&node.id, "nodes[].id")?;
        let kind = node
            .kind
            .parse::<NodeKind>()
            .map_err(|_| MalformedReason::UnknownKind {
                node_id: node.id.clone(),
                kind: node.kind.clone(),
            })?;
        if !seen_nodes.insert(node_id.clone()) {
            return Err(MalformedReason::DuplicateNode { node_id: node.id });
        }
        let position = Position::new(node.position.x, node.position.y);
        nodes.push(Node::new(node_id, kind, node.label, position));
    }

    let mut seen_edges = BTreeSet::new();
    let mut edges = Vec::with_capacity(json.edges.len());
    for edge in json.edges {
        let edge_id = EdgeId::new(edge.id.clone())
            .map_err(|_| MalformedReason::EmptyId { field: "edges[].id" })?;
        let source_id = parse_node_id(&edge.source_id, "edges[].sourceId")?;
        let target_id = parse_node_id(&edge.target_id, "edges[].targetId")?;
        if !seen_edges.insert(edge_id.clone()) {
            return Err(MalformedReason::DuplicateEdge { edge_id: edge.id });
        }
        edges.push(Edge::new(edge_id, source_id, target_id).with_label(edge.label));
    }

    let viewport = Viewport::new(json.viewport.x, json.viewport.y, json.viewport.zoom);
    Ok(Diagram::new(nodes, edges, viewport))
}

fn parse_node_id(raw: &str, field: &'static str) -> Result<NodeId, MalformedReason> {
    NodeId::new(raw.to_owned()).map_err(|_| MalformedReason::EmptyId { field })
}
