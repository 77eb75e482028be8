// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Workchart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

fn diagram_to_response(diagram: &Diagram, rev: u64) -> DiagramReadResponse {
    let viewport = diagram.viewport();
    DiagramReadResponse {
        rev,
        nodes: diagram
            .nodes()
            .iter()
            .map(|node| McpNode {
                id: node.node_id().to_string(),
                kind: node.kind().as_str().to_owned(),
                label: node.label().to_owned(),
                x: node.position().x,
                y: node.position().y,
            })
            .collect(),
        edges: diagram
            .edges()
            .iter()
            .map(|edge| McpEdge {
                id: edge.edge_id().to_string(),
                source_id: edge.source_id().to_string(),
                target_id: edge.target_id().to_string(),
                label: edge.label().map(ToOwned::to_owned),
                resolved: diagram.contains_node(edge.source_id())
                    && diagram.contains_node(edge.target_id()),
            })
            .collect(),
        viewport: McpViewport {
            x: viewport.x,
            y: viewport.y,
            zoom: viewport.zoom,
        },
    }
}

fn change_response(store: &DiagramStore, before: u64) -> ChangeResponse {
    ChangeResponse {
        rev: store.rev(),
        changed: store.rev() != before,
    }
}

fn delta_summary(delta: &Delta) -> DeltaSummary {
    let names = |refs: &[ObjectRef]| refs.iter().map(ToString::to_string).collect::<Vec<_>>();
    DeltaSummary {
        added: names(&delta.added),
        removed: names(&delta.removed),
        updated: names(&delta.updated),
        viewport_changed: delta.viewport_changed,
    }
}

fn map_apply_error(err: ApplyError) -> ErrorData {
    match err {
        ApplyError::AlreadyExists(object_ref) => ErrorData::invalid_params(
            "object already exists",
            Some(serde_json::json!({ "object_ref": object_ref.to_string() })),
        ),
        ApplyError::NotFound(object_ref) => ErrorData::invalid_params(
            "object not found",
            Some(serde_json::json!({ "object_ref": object_ref.to_string() })),
        ),
        ApplyError::MissingNode { node_id } => ErrorData::invalid_params(
            "edge endpoint node not found",
            Some(serde_json::json!({ "node_id": node_id.to_string() })),
        ),
    }
}

fn parse_node_id(value: &str) -> Result<NodeId, ErrorData> {
    NodeId::new(value.to_owned()).map_err(|err| {
        ErrorData::invalid_params(
            format!("invalid node_id: {err}"),
            Some(serde_json::json!({ "node_id": value })),
        )
    })
}

fn parse_edge_id(value: &str) -> Result<EdgeId, ErrorData> {
    EdgeId::new(value.to_owned()).map_err(|err| {
        ErrorData::invalid_params(
            format!("invalid edge_id: {err}"),
            Some(serde_json::json!({ "edge_id": value })),
        )
    })
}

fn parse_kind(value: &str) -> Result<NodeKind, ErrorData> {
    value.parse::<NodeKind>().map_err(|err| {
        ErrorData::invalid_params(
            err.to_string(),
            Some(serde_json::json!({ "kind": value, "expected": ["action", "state", "choice"] })),
        )
    })
}

fn parse_keying(value: Option<&str>) -> Result<NodeKeying, ErrorData> {
    let Some(value) = value else {
        return Ok(NodeKeying::default());
    };
    value.parse::<NodeKeying>().map_err(|err| {
        ErrorData::invalid_params(err, Some(serde_json::json!({ "keying": value })))
    })
}

fn parse_image_format(value: &str) -> Result<ImageFormat, ErrorData> {
    match value.trim().to_ascii_lowercase().as_str() {
        "svg" => Ok(ImageFormat::Svg),
        "png" => Ok(ImageFormat::Png),
        _ => Err(ErrorData::invalid_params(
            "unsupported export format",
            Some(serde_json::json!({ "format": value, "expected": ["svg", "png"] })),
        )),
    }
}

fn parse_viewport(x: f64, y: f64, zoom: f64) -> Result<Viewport, ErrorData> {
    if !(zoom.is_finite() && zoom > 0.0) {
        return Err(ErrorData::invalid_params(
            "zoom must be a positive number",
            Some(serde_json::json!({ "zoom": zoom })),
        ));
    }
    Ok(Viewport::new(x, y, zoom))
}

fn mcp_op_to_internal(op: &McpOp) -> Result<Op, ErrorData> {
    Ok(match op {
        McpOp::AddNode { node_id, kind, label, x, y } => Op::AddNode {
            node_id: parse_node_id(node_id)?,
            kind: parse_kind(kind)?,
            label: label.clone(),
            position: Position::new(*x, *y),
        },
        McpOp::RenameNode { node_id, label } => Op::RenameNode {
            node_id: parse_node_id(node_id)?,
            label: label.clone(),
        },
        McpOp::MoveNode { node_id, x, y } => Op::MoveNode {
            node_id: parse_node_id(node_id)?,
            position: Position::new(*x, *y),
        },
        McpOp::RemoveNode { node_id } => Op::RemoveNode {
            node_id: parse_node_id(node_id)?,
        },
        McpOp::AddEdge { source_id, target_id, label } => Op::AddEdge {
            source_id: parse_node_id(source_id)?,
            target_id: parse_node_id(target_id)?,
            label: label.clone(),
        },
        McpOp::RenameEdge { edge_id, label } => Op::RenameEdge {
            edge_id: parse_edge_id(edge_id)?,
            label: label.clone(),
        },
        McpOp::RemoveEdge { edge_id } => Op::RemoveEdge {
            edge_id: parse_edge_id(edge_id)?,
        },
        McpOp::SplitEdge { edge_id, node_id, kind, label, x, y } => Op::SplitEdge {
            edge_id: parse_edge_id(edge_id)?,
            node_id: parse_node_id(node_id)?,
            kind: parse_kind(kind)?,
            label: label.clone(),
            position: Position::new(*x, *y),
        },
        McpOp::SetViewport { x, y, zoom } => Op::SetViewport {
            viewport: parse_viewport(*x, *y, *zoom)?,
        },
        McpOp::Clear => Op::Clear,
    })
}
