// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Workchart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Per-op mutation helpers used by `apply_ops`.
/// Keeps `ops::mod` focused on public op types and orchestration.
fn apply_op(diagram: &mut Diagram, op: &Op, delta: &mut DeltaBuilder) -> Result<(), ApplyError> {
    match op {
        Op::AddNode {
            node_id,
            kind,
            label,
            position,
        } => {
            insert_node(diagram, node_id, *kind, label, *position)?;
            delta.record_added(ObjectRef::Node(node_id.clone()));
            Ok(())
        }
        Op::RenameNode { node_id, label } => {
            let Some(existing) = diagram.node_mut(node_id) else {
                return Err(ApplyError::NotFound(ObjectRef::Node(node_id.clone())));
            };
            existing.set_label(label.clone());
            delta.record_updated(ObjectRef::Node(node_id.clone()));
            Ok(())
        }
        Op::MoveNode { node_id, position } => {
            let Some(existing) = diagram.node_mut(node_id) else {
                return Err(ApplyError::NotFound(ObjectRef::Node(node_id.clone())));
            };
            existing.set_position(*position);
            delta.record_updated(ObjectRef::Node(node_id.clone()));
            Ok(())
        }
        Op::RemoveNode { node_id } => {
            let before_len = diagram.nodes().len();
            diagram.nodes_mut().retain(|node| node.node_id() != node_id);
            if diagram.nodes().len() == before_len {
                return Err(ApplyError::NotFound(ObjectRef::Node(node_id.clone())));
            }

            let removed_edge_ids = diagram
                .edges()
                .iter()
                .filter(|edge| edge.touches(node_id))
                .map(|edge| edge.edge_id().clone())
                .collect::<Vec<_>>();
            diagram.edges_mut().retain(|edge| !edge.touches(node_id));
            for edge_id in removed_edge_ids {
                delta.record_removed(ObjectRef::Edge(edge_id));
            }
            delta.record_removed(ObjectRef::Node(node_id.clone()));
            Ok(())
        }
        Op::AddEdge {
            source_id,
            target_id,
            label,
        } => {
            let edge = Edge::between(source_id.clone(), target_id.clone()).with_label(label.clone());
            let edge_id = edge.edge_id().clone();
            insert_edge(diagram, edge)?;
            delta.record_added(ObjectRef::Edge(edge_id));
            Ok(())
        }
        Op::RenameEdge { edge_id, label } => {
            let Some(existing) = diagram.edge_mut(edge_id) else {
                return Err(ApplyError::NotFound(ObjectRef::Edge(edge_id.clone())));
            };
            existing.set_label(label.clone());
            delta.record_updated(ObjectRef::Edge(edge_id.clone()));
            Ok(())
        }
        Op::RemoveEdge { edge_id } => {
            let before_len = diagram.edges().len();
            diagram.edges_mut().retain(|edge| edge.edge_id() != edge_id);
            if diagram.edges().len() == before_len {
                return Err(ApplyError::NotFound(ObjectRef::Edge(edge_id.clone())));
            }
            delta.record_removed(ObjectRef::Edge(edge_id.clone()));
            Ok(())
        }
        Op::SplitEdge {
            edge_id,
            node_id,
            kind,
            label,
            position,
        } => {
            let Some(existing) = diagram.edge(edge_id) else {
                return Err(ApplyError::NotFound(ObjectRef::Edge(edge_id.clone())));
            };
            let source_id = existing.source_id().clone();
            let target_id = existing.target_id().clone();

            diagram.edges_mut().retain(|edge| edge.edge_id() != edge_id);
            delta.record_removed(ObjectRef::Edge(edge_id.clone()));

            insert_node(diagram, node_id, *kind, label, *position)?;
            delta.record_added(ObjectRef::Node(node_id.clone()));

            for edge in [
                Edge::between(source_id, node_id.clone()),
                Edge::between(node_id.clone(), target_id),
            ] {
                let new_edge_id = edge.edge_id().clone();
                insert_edge(diagram, edge)?;
                delta.record_added(ObjectRef::Edge(new_edge_id));
            }
            Ok(())
        }
        Op::SetViewport { viewport } => {
            diagram.set_viewport(*viewport);
            delta.record_viewport();
            Ok(())
        }
        Op::Clear => {
            for edge in diagram.edges_mut().drain(..) {
                delta.record_removed(ObjectRef::Edge(edge.edge_id().clone()));
            }
            for node in diagram.nodes_mut().drain(..) {
                delta.record_removed(ObjectRef::Node(node.node_id().clone()));
            }
            Ok(())
        }
    }
}

fn insert_node(
    diagram: &mut Diagram,
    node_id: &NodeId,
    kind: NodeKind,
    label: &str,
    position: Position,
) -> Result<(), ApplyError> {
    if diagram.contains_node(node_id) {
        return Err(ApplyError::AlreadyExists(ObjectRef::Node(node_id.clone())));
    }
    diagram
        .nodes_mut()
        .push(Node::new(node_id.clone(), kind, label, position));
    Ok(())
}

/// A pair of nodes is connected at most once, whatever id the existing edge carries.
fn insert_edge(diagram: &mut Diagram, edge: Edge) -> Result<(), ApplyError> {
    if diagram.contains_edge(edge.edge_id()) {
        return Err(ApplyError::AlreadyExists(ObjectRef::Edge(
            edge.edge_id().clone(),
        )));
    }
    if let Some(existing) = diagram.edge_between(edge.source_id(), edge.target_id()) {
        return Err(ApplyError::AlreadyExists(ObjectRef::Edge(
            existing.edge_id().clone(),
        )));
    }
    for node_id in [edge.source_id(), edge.target_id()] {
        if !diagram.contains_node(node_id) {
            return Err(ApplyError::MissingNode {
                node_id: node_id.clone(),
            });
        }
    }
    diagram.edges_mut().push(edge);
    Ok(())
}
