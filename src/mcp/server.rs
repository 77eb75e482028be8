// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Workchart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::{Json, Parameters};
use rmcp::model::{ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData, ServerHandler, ServiceExt};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::editor::DiagramStore;
use crate::export::{export_image, ImageFormat, SceneRenderer};
use crate::format::mermaid::{
    export_flowchart_with, fenced, label_collisions, MermaidOptions, NodeKeying,
};
use crate::model::{Diagram, EdgeId, NodeId, NodeKind, Position, Viewport};
use crate::ops::{ApplyError, Delta, ObjectRef, Op};

use super::types::*;

/// MCP surface over the shared diagram store.
///
/// Every tool locks the store for the duration of one mutation, so edits from the TUI and from
/// agents never interleave.
#[derive(Clone)]
pub struct WorkchartMcp {
    store: Arc<Mutex<DiagramStore>>,
    export_dir: PathBuf,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl WorkchartMcp {
    pub fn new(store: Arc<Mutex<DiagramStore>>) -> Self {
        Self {
            store,
            export_dir: PathBuf::from("."),
            tool_router: Self::tool_router(),
        }
    }

    pub fn from_diagram(diagram: Diagram) -> Self {
        Self::new(Arc::new(Mutex::new(DiagramStore::new(diagram))))
    }

    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    pub fn store(&self) -> &Arc<Mutex<DiagramStore>> {
        &self.store
    }

    pub async fn serve_stdio(self) -> Result<(), rmcp::RmcpError> {
        let service = self.serve((tokio::io::stdin(), tokio::io::stdout())).await?;
        service.waiting().await?;
        Ok(())
    }

    /// Read the whole diagram: nodes with positions, edges (including dangling ones), and the
    /// viewport.
    #[tool(name = "diagram.read")]
    async fn diagram_read(&self) -> Result<Json<DiagramReadResponse>, ErrorData> {
        let store = self.store.lock().await;
        Ok(Json(diagram_to_response(store.diagram(), store.rev())))
    }

    /// Render the diagram as Mermaid flowchart text (`graph TD`); regenerated on every call.
    #[tool(name = "diagram.mermaid")]
    async fn diagram_mermaid(
        &self,
        params: Parameters<MermaidParams>,
    ) -> Result<Json<MermaidResponse>, ErrorData> {
        let MermaidParams { fenced: wrap, keying } = params.0;
        let keying = parse_keying(keying.as_deref())?;

        let store = self.store.lock().await;
        let mermaid = export_flowchart_with(store.diagram(), MermaidOptions { keying });
        let mermaid = if wrap.unwrap_or(false) { fenced(&mermaid) } else { mermaid };
        Ok(Json(MermaidResponse {
            rev: store.rev(),
            mermaid,
        }))
    }

    /// List label keys shared by several nodes; such nodes merge into one Mermaid node.
    #[tool(name = "diagram.collisions")]
    async fn diagram_collisions(&self) -> Result<Json<CollisionsResponse>, ErrorData> {
        let store = self.store.lock().await;
        let collisions = label_collisions(store.diagram())
            .into_iter()
            .map(|collision| McpLabelCollision {
                mermaid_id: collision.mermaid_id,
                node_ids: collision.node_ids.iter().map(ToString::to_string).collect(),
            })
            .collect();
        Ok(Json(CollisionsResponse {
            rev: store.rev(),
            collisions,
        }))
    }

    /// Remove every node and edge. The viewport is kept.
    #[tool(name = "diagram.clear")]
    async fn diagram_clear(&self) -> Result<Json<ChangeResponse>, ErrorData> {
        let mut store = self.store.lock().await;
        let before = store.rev();
        store.clear();
        Ok(Json(change_response(&store, before)))
    }

    /// Apply a batch of ops atomically: either every op applies or none does.
    #[tool(name = "diagram.apply_ops")]
    async fn diagram_apply_ops(
        &self,
        params: Parameters<ApplyOpsParams>,
    ) -> Result<Json<ApplyOpsResponse>, ErrorData> {
        let ops = params.0.ops.iter().map(mcp_op_to_internal).collect::<Result<Vec<_>, _>>()?;

        let mut store = self.store.lock().await;
        let result = store.apply(&ops).map_err(map_apply_error)?;
        info!(applied = result.applied, rev = store.rev(), "applied ops over mcp");

        Ok(Json(ApplyOpsResponse {
            new_rev: store.rev(),
            applied: result.applied as u64,
            delta: delta_summary(&result.delta),
        }))
    }

    /// Add a node of kind `action`, `state`, or `choice`. Ids are generated as `<kind>-<n>`.
    #[tool(name = "node.add")]
    async fn node_add(
        &self,
        params: Parameters<NodeAddParams>,
    ) -> Result<Json<NodeAddResponse>, ErrorData> {
        let NodeAddParams { kind, label, x, y } = params.0;
        let kind = parse_kind(&kind)?;
        let position = Position::new(x.unwrap_or(0.0), y.unwrap_or(0.0));

        let mut store = self.store.lock().await;
        let node_id = store.add_node(kind, position, label);
        let label = store
            .diagram()
            .node(&node_id)
            .map(|node| node.label().to_owned())
            .unwrap_or_default();
        Ok(Json(NodeAddResponse {
            rev: store.rev(),
            node_id: node_id.into_string(),
            label,
        }))
    }

    /// Replace a node label. Unknown ids report `changed: false`.
    #[tool(name = "node.rename")]
    async fn node_rename(
        &self,
        params: Parameters<NodeRenameParams>,
    ) -> Result<Json<ChangeResponse>, ErrorData> {
        let NodeRenameParams { node_id, label } = params.0;
        let node_id = parse_node_id(&node_id)?;

        let mut store = self.store.lock().await;
        let before = store.rev();
        store.rename_node(&node_id, label);
        Ok(Json(change_response(&store, before)))
    }

    /// Move a node to an absolute canvas position.
    #[tool(name = "node.move")]
    async fn node_move(
        &self,
        params: Parameters<NodeMoveParams>,
    ) -> Result<Json<ChangeResponse>, ErrorData> {
        let NodeMoveParams { node_id, x, y } = params.0;
        let node_id = parse_node_id(&node_id)?;

        let mut store = self.store.lock().await;
        let before = store.rev();
        store.move_node(&node_id, Position::new(x, y));
        Ok(Json(change_response(&store, before)))
    }

    /// Remove a node together with every edge touching it.
    #[tool(name = "node.remove")]
    async fn node_remove(
        &self,
        params: Parameters<NodeRemoveParams>,
    ) -> Result<Json<ChangeResponse>, ErrorData> {
        let node_id = parse_node_id(&params.0.node_id)?;

        let mut store = self.store.lock().await;
        let before = store.rev();
        store.remove_node(&node_id);
        Ok(Json(change_response(&store, before)))
    }

    /// Connect two nodes. The edge id is `<source>-<target>`; connecting the same pair twice keeps
    /// the existing edge.
    #[tool(name = "edge.add")]
    async fn edge_add(
        &self,
        params: Parameters<EdgeAddParams>,
    ) -> Result<Json<EdgeAddResponse>, ErrorData> {
        let EdgeAddParams { source_id, target_id } = params.0;
        let source_id = parse_node_id(&source_id)?;
        let target_id = parse_node_id(&target_id)?;

        let mut store = self.store.lock().await;
        let before = store.rev();
        let edge_id = store.add_edge(&source_id, &target_id).map_err(map_apply_error)?;
        Ok(Json(EdgeAddResponse {
            rev: store.rev(),
            edge_id: edge_id.into_string(),
            changed: store.rev() != before,
        }))
    }

    /// Set an edge label; an empty label removes it.
    #[tool(name = "edge.rename")]
    async fn edge_rename(
        &self,
        params: Parameters<EdgeRenameParams>,
    ) -> Result<Json<ChangeResponse>, ErrorData> {
        let EdgeRenameParams { edge_id, label } = params.0;
        let edge_id = parse_edge_id(&edge_id)?;

        let mut store = self.store.lock().await;
        let before = store.rev();
        store.rename_edge(&edge_id, label);
        Ok(Json(change_response(&store, before)))
    }

    #[tool(name = "edge.remove")]
    async fn edge_remove(
        &self,
        params: Parameters<EdgeRemoveParams>,
    ) -> Result<Json<ChangeResponse>, ErrorData> {
        let edge_id = parse_edge_id(&params.0.edge_id)?;

        let mut store = self.store.lock().await;
        let before = store.rev();
        store.remove_edge(&edge_id);
        Ok(Json(change_response(&store, before)))
    }

    /// Insert a new node into an edge, replacing `a-b` with `a-new` and `new-b`.
    #[tool(name = "edge.split")]
    async fn edge_split(
        &self,
        params: Parameters<EdgeSplitParams>,
    ) -> Result<Json<EdgeSplitResponse>, ErrorData> {
        let EdgeSplitParams { edge_id, kind, x, y } = params.0;
        let edge_id = parse_edge_id(&edge_id)?;
        let kind = parse_kind(&kind)?;

        let mut store = self.store.lock().await;
        let default_position = store.diagram().edge_midpoint(&edge_id).unwrap_or_default();
        let position = Position::new(
            x.unwrap_or(default_position.x),
            y.unwrap_or(default_position.y),
        );
        let node_id = store.split_edge(&edge_id, kind, position);
        Ok(Json(EdgeSplitResponse {
            rev: store.rev(),
            changed: node_id.is_some(),
            node_id: node_id.map(NodeId::into_string),
        }))
    }

    #[tool(name = "viewport.set")]
    async fn viewport_set(
        &self,
        params: Parameters<ViewportSetParams>,
    ) -> Result<Json<ChangeResponse>, ErrorData> {
        let ViewportSetParams { x, y, zoom } = params.0;
        let viewport = parse_viewport(x, y, zoom)?;

        let mut store = self.store.lock().await;
        let before = store.rev();
        store.set_viewport(viewport.x, viewport.y, viewport.zoom);
        Ok(Json(change_response(&store, before)))
    }

    /// Write `workchart.svg` or `workchart.png` into a directory and return the file path.
    #[tool(name = "diagram.export")]
    async fn diagram_export(
        &self,
        params: Parameters<ExportParams>,
    ) -> Result<Json<ExportResponse>, ErrorData> {
        let ExportParams { format, dir } = params.0;
        let format = parse_image_format(&format)?;
        let dir = dir.map(PathBuf::from).unwrap_or_else(|| self.export_dir.clone());

        let (diagram, rev) = {
            let store = self.store.lock().await;
            (store.diagram().clone(), store.rev())
        };

        let path = export_image(&SceneRenderer, &diagram, format, &dir).map_err(|err| {
            warn!(error = %err, "mcp export failed");
            ErrorData::internal_error(
                format!("export failed: {err}"),
                Some(serde_json::json!({ "dir": dir.display().to_string() })),
            )
        })?;
        Ok(Json(ExportResponse {
            rev,
            path: path.display().to_string(),
        }))
    }
}

#[tool_handler]
impl ServerHandler for WorkchartMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Workchart flowchart editor (tools: diagram.read, diagram.mermaid, diagram.collisions, diagram.clear, diagram.apply_ops, diagram.export, node.add, node.rename, node.move, node.remove, edge.add, edge.rename, edge.remove, edge.split, viewport.set)"
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// Mapping and parsing helpers for the tool handlers.
include!("server/helpers.rs");

#[cfg(test)]
mod tests;
