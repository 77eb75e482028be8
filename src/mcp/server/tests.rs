// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Workchart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::*;
use crate::model::fixtures;

fn server() -> WorkchartMcp {
    WorkchartMcp::from_diagram(fixtures::action_to_state())
}

fn scratch_dir(test_name: &str) -> PathBuf {
    use std::time::{SystemTime, UNIX_EPOCH};

    let mut dir = std::env::temp_dir();
    let pid = std::process::id();
    let nanos =
        SystemTime::now().duration_since(UNIX_EPOCH).expect("clock is monotonic").as_nanos();
    dir.push(format!("workchart-{test_name}-{pid}-{nanos}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

#[tokio::test]
async fn diagram_read_reports_nodes_edges_and_viewport() {
    let server = server();
    let Json(read) = server.diagram_read().await.expect("diagram.read");

    assert_eq!(read.rev, 0);
    let ids = read.nodes.iter().map(|node| node.id.as_str()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["n1", "n2"]);
    assert_eq!(read.nodes[0].kind, "action");
    assert_eq!(read.nodes[1].y, 120.0);
    assert_eq!(read.edges.len(), 1);
    assert_eq!(read.edges[0].source_id, "n1");
    assert!(read.edges[0].resolved);
    assert_eq!(read.viewport.zoom, 1.0);
}

#[tokio::test]
async fn diagram_mermaid_matches_worked_example() {
    let server = server();
    let Json(plain) = server
        .diagram_mermaid(Parameters(MermaidParams::default()))
        .await
        .expect("diagram.mermaid");
    assert_eq!(
        plain.mermaid,
        "graph TD\n  Action_1[Action 1]\n  State_1((State 1))\n  Action_1 --> State_1\n"
    );

    let Json(by_id) = server
        .diagram_mermaid(Parameters(MermaidParams {
            fenced: Some(true),
            keying: Some("id".to_owned()),
        }))
        .await
        .expect("diagram.mermaid fenced");
    assert!(by_id.mermaid.starts_with("```mermaid\ngraph TD\n  n1[Action 1]\n"));
    assert!(by_id.mermaid.contains("  n1 --> n2\n"));
}

#[tokio::test]
async fn diagram_mermaid_rejects_unknown_keying() {
    let err = server()
        .diagram_mermaid(Parameters(MermaidParams {
            fenced: None,
            keying: Some("hash".to_owned()),
        }))
        .await
        .err().expect("expected Err");
    assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
}

#[tokio::test]
async fn node_add_generates_ids_and_default_labels() {
    let server = server();
    let Json(added) = server
        .node_add(Parameters(NodeAddParams {
            kind: "action".to_owned(),
            label: None,
            x: Some(10.0),
            y: None,
        }))
        .await
        .expect("node.add");

    assert_eq!(added.label, "Action 2");
    assert_eq!(added.node_id, "action-3");
    assert_eq!(added.rev, 1);

    let Json(read) = server.diagram_read().await.expect("diagram.read");
    let node = read.nodes.iter().find(|node| node.id == added.node_id).expect("added node");
    assert_eq!((node.x, node.y), (10.0, 0.0));
}

#[tokio::test]
async fn node_add_rejects_unknown_kind() {
    let err = server()
        .node_add(Parameters(NodeAddParams {
            kind: "gateway".to_owned(),
            label: None,
            x: None,
            y: None,
        }))
        .await
        .err().expect("expected Err");
    assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
}

#[tokio::test]
async fn lenient_tools_report_no_change_for_unknown_ids() {
    let server = server();

    let Json(renamed) = server
        .node_rename(Parameters(NodeRenameParams {
            node_id: "ghost".to_owned(),
            label: "Boo".to_owned(),
        }))
        .await
        .expect("node.rename");
    assert!(!renamed.changed);

    let Json(removed) = server
        .edge_remove(Parameters(EdgeRemoveParams { edge_id: "ghost".to_owned() }))
        .await
        .expect("edge.remove");
    assert!(!removed.changed);
    assert_eq!(removed.rev, 0);
}

#[tokio::test]
async fn empty_ids_are_invalid_params() {
    let err = server()
        .node_remove(Parameters(NodeRemoveParams { node_id: String::new() }))
        .await
        .err().expect("expected Err");
    assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
}

#[tokio::test]
async fn edge_add_is_idempotent_and_rejects_missing_endpoints() {
    let server = server();

    let Json(again) = server
        .edge_add(Parameters(EdgeAddParams {
            source_id: "n1".to_owned(),
            target_id: "n2".to_owned(),
        }))
        .await
        .expect("edge.add duplicate");
    assert_eq!(again.edge_id, "n1-n2");
    assert!(!again.changed);

    let Json(reverse) = server
        .edge_add(Parameters(EdgeAddParams {
            source_id: "n2".to_owned(),
            target_id: "n1".to_owned(),
        }))
        .await
        .expect("edge.add reverse");
    assert_eq!(reverse.edge_id, "n2-n1");
    assert!(reverse.changed);

    let err = server
        .edge_add(Parameters(EdgeAddParams {
            source_id: "n1".to_owned(),
            target_id: "ghost".to_owned(),
        }))
        .await
        .err().expect("expected Err");
    assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
}

#[tokio::test]
async fn edge_split_places_node_at_midpoint_by_default() {
    let server = server();
    let Json(split) = server
        .edge_split(Parameters(EdgeSplitParams {
            edge_id: "n1-n2".to_owned(),
            kind: "state".to_owned(),
            x: None,
            y: None,
        }))
        .await
        .expect("edge.split");

    assert!(split.changed);
    let node_id = split.node_id.expect("new node id");
    let Json(read) = server.diagram_read().await.expect("diagram.read");
    let node = read.nodes.iter().find(|node| node.id == node_id).expect("split node");
    assert_eq!((node.x, node.y), (0.0, 60.0));
    let edge_ids = read.edges.iter().map(|edge| edge.id.clone()).collect::<Vec<_>>();
    assert_eq!(edge_ids, vec![format!("n1-{node_id}"), format!("{node_id}-n2")]);
}

#[tokio::test]
async fn apply_ops_is_atomic() {
    let server = server();
    let err = server
        .diagram_apply_ops(Parameters(ApplyOpsParams {
            ops: vec![
                McpOp::RenameNode {
                    node_id: "n1".to_owned(),
                    label: "Start".to_owned(),
                },
                McpOp::RemoveEdge {
                    edge_id: "missing".to_owned(),
                },
            ],
        }))
        .await
        .err().expect("expected Err");
    assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);

    let Json(read) = server.diagram_read().await.expect("diagram.read");
    assert_eq!(read.rev, 0);
    assert_eq!(read.nodes[0].label, "Action 1");
}

#[tokio::test]
async fn apply_ops_reports_delta() {
    let server = server();
    let Json(result) = server
        .diagram_apply_ops(Parameters(ApplyOpsParams {
            ops: vec![
                McpOp::AddNode {
                    node_id: "n3".to_owned(),
                    kind: "choice".to_owned(),
                    label: "Done?".to_owned(),
                    x: 0.0,
                    y: 240.0,
                },
                McpOp::AddEdge {
                    source_id: "n2".to_owned(),
                    target_id: "n3".to_owned(),
                    label: Some("next".to_owned()),
                },
                McpOp::SetViewport { x: 5.0, y: 5.0, zoom: 1.5 },
            ],
        }))
        .await
        .expect("diagram.apply_ops");

    assert_eq!(result.new_rev, 1);
    assert_eq!(result.applied, 3);
    assert_eq!(result.delta.added, vec!["node:n3".to_owned(), "edge:n2-n3".to_owned()]);
    assert!(result.delta.viewport_changed);

    let Json(mermaid) = server
        .diagram_mermaid(Parameters(MermaidParams::default()))
        .await
        .expect("diagram.mermaid");
    assert!(mermaid.mermaid.contains("  State_1 -->|next| Done?\n"));
}

#[tokio::test]
async fn collisions_list_nodes_sharing_a_label_key() {
    let server = server();
    server
        .node_rename(Parameters(NodeRenameParams {
            node_id: "n2".to_owned(),
            label: "Action 1".to_owned(),
        }))
        .await
        .expect("node.rename");

    let Json(result) = server.diagram_collisions().await.expect("diagram.collisions");
    assert_eq!(result.collisions.len(), 1);
    assert_eq!(result.collisions[0].mermaid_id, "Action_1");
    assert_eq!(result.collisions[0].node_ids, vec!["n1".to_owned(), "n2".to_owned()]);
}

#[tokio::test]
async fn clear_keeps_viewport_and_is_idempotent() {
    let server = server();
    server
        .viewport_set(Parameters(ViewportSetParams { x: 3.0, y: 4.0, zoom: 2.0 }))
        .await
        .expect("viewport.set");

    let Json(first) = server.diagram_clear().await.expect("diagram.clear");
    let Json(second) = server.diagram_clear().await.expect("diagram.clear again");
    assert!(first.changed);
    assert!(!second.changed);

    let Json(read) = server.diagram_read().await.expect("diagram.read");
    assert!(read.nodes.is_empty());
    assert_eq!((read.viewport.x, read.viewport.y, read.viewport.zoom), (3.0, 4.0, 2.0));
}

#[tokio::test]
async fn viewport_set_rejects_non_positive_zoom() {
    let err = server()
        .viewport_set(Parameters(ViewportSetParams { x: 0.0, y: 0.0, zoom: 0.0 }))
        .await
        .err().expect("expected Err");
    assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
}

#[tokio::test]
async fn apply_ops_rejects_non_positive_zoom() {
    let server = server();
    let err = server
        .diagram_apply_ops(Parameters(ApplyOpsParams {
            ops: vec![McpOp::SetViewport { x: 1.0, y: 1.0, zoom: -2.0 }],
        }))
        .await
        .err().expect("expected Err");
    assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);

    let Json(read) = server.diagram_read().await.expect("diagram.read");
    assert_eq!(read.rev, 0);
    assert_eq!(read.viewport.zoom, 1.0);
}

#[tokio::test]
async fn apply_ops_cannot_connect_a_pair_twice() {
    let server = server();
    let err = server
        .diagram_apply_ops(Parameters(ApplyOpsParams {
            ops: vec![McpOp::AddEdge {
                source_id: "n1".to_owned(),
                target_id: "n2".to_owned(),
                label: Some("again".to_owned()),
            }],
        }))
        .await
        .err().expect("expected Err");
    assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);

    let Json(mermaid) = server
        .diagram_mermaid(Parameters(MermaidParams::default()))
        .await
        .expect("diagram.mermaid");
    assert_eq!(mermaid.mermaid.matches("Action_1 -->").count(), 1);
}

#[tokio::test]
async fn diagram_export_writes_svg_into_dir() {
    let dir = scratch_dir("mcp-export");
    let server = server();
    let Json(result) = server
        .diagram_export(Parameters(ExportParams {
            format: "svg".to_owned(),
            dir: Some(dir.display().to_string()),
        }))
        .await
        .expect("diagram.export");

    let path = PathBuf::from(&result.path);
    assert_eq!(path, dir.join("workchart.svg"));
    assert!(std::fs::read_to_string(&path).expect("svg").contains(">State 1</text>"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn shared_store_sees_mcp_mutations() {
    let server = server();
    let store = server.store().clone();
    server
        .node_remove(Parameters(NodeRemoveParams { node_id: "n2".to_owned() }))
        .await
        .expect("node.remove");

    let store = store.lock().await;
    assert_eq!(store.rev(), 1);
    assert!(store.diagram().edges().is_empty());
}
