// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Workchart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpNode {
    pub id: String,
    /// `action`, `state`, or `choice`.
    pub kind: String,
    pub label: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpEdge {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    pub label: Option<String>,
    /// False when either endpoint no longer exists; such edges are left out of Mermaid output.
    pub resolved: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub struct McpViewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DiagramReadResponse {
    pub rev: u64,
    pub nodes: Vec<McpNode>,
    pub edges: Vec<McpEdge>,
    pub viewport: McpViewport,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct MermaidParams {
    /// Wrap the output in a ```` ```mermaid ```` fence.
    pub fenced: Option<bool>,
    /// `label` (default) keys nodes by their label, `id` keys them by stable node id.
    pub keying: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MermaidResponse {
    pub rev: u64,
    pub mermaid: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpLabelCollision {
    pub mermaid_id: String,
    pub node_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CollisionsResponse {
    pub rev: u64,
    pub collisions: Vec<McpLabelCollision>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ChangeResponse {
    pub rev: u64,
    pub changed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DeltaSummary {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub updated: Vec<String>,
    pub viewport_changed: bool,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ApplyOpsParams {
    pub ops: Vec<McpOp>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ApplyOpsResponse {
    pub new_rev: u64,
    pub applied: u64,
    pub delta: DeltaSummary,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum McpOp {
    AddNode {
        node_id: String,
        kind: String,
        label: String,
        x: f64,
        y: f64,
    },
    RenameNode {
        node_id: String,
        label: String,
    },
    MoveNode {
        node_id: String,
        x: f64,
        y: f64,
    },
    RemoveNode {
        node_id: String,
    },
    /// The edge id is always `<source_id>-<target_id>`.
    AddEdge {
        source_id: String,
        target_id: String,
        label: Option<String>,
    },
    RenameEdge {
        edge_id: String,
        label: Option<String>,
    },
    RemoveEdge {
        edge_id: String,
    },
    SplitEdge {
        edge_id: String,
        node_id: String,
        kind: String,
        label: String,
        x: f64,
        y: f64,
    },
    SetViewport {
        x: f64,
        y: f64,
        zoom: f64,
    },
    Clear,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct NodeAddParams {
    pub kind: String,
    /// Defaults to `<Kind> <n>`.
    pub label: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NodeAddResponse {
    pub rev: u64,
    pub node_id: String,
    pub label: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct NodeRenameParams {
    pub node_id: String,
    pub label: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct NodeMoveParams {
    pub node_id: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct NodeRemoveParams {
    pub node_id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct EdgeAddParams {
    pub source_id: String,
    pub target_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EdgeAddResponse {
    pub rev: u64,
    pub edge_id: String,
    pub changed: bool,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct EdgeRenameParams {
    pub edge_id: String,
    /// An empty label removes it.
    pub label: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct EdgeRemoveParams {
    pub edge_id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct EdgeSplitParams {
    pub edge_id: String,
    pub kind: String,
    /// Defaults to the midpoint between the edge endpoints.
    pub x: Option<f64>,
    pub y: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EdgeSplitResponse {
    pub rev: u64,
    pub node_id: Option<String>,
    pub changed: bool,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ViewportSetParams {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExportParams {
    /// `svg` or `png`.
    pub format: String,
    /// Target directory; defaults to the server's export directory.
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExportResponse {
    pub rev: u64,
    pub path: String,
}
