// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Workchart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::model::{Diagram, Node, NodeId, NodeKind};

use super::ident::{safe_id, safe_id_from_node_id};

/// How nodes are named in the exported Mermaid text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeKeying {
    /// Sanitized display label. Nodes sharing a label collapse into one Mermaid node; see
    /// [`label_collisions`].
    #[default]
    Label,
    /// Sanitized stable node id; labels only appear inside the shape brackets.
    StableId,
}

impl FromStr for NodeKeying {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "label" => Ok(Self::Label),
            "id" | "stable_id" => Ok(Self::StableId),
            other => Err(format!("unknown node keying: {other:?} (expected label or id)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MermaidOptions {
    pub keying: NodeKeying,
}

/// Two or more nodes exported under the same Mermaid identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelCollision {
    pub mermaid_id: String,
    pub node_ids: Vec<NodeId>,
}

/// Export a diagram to Mermaid `graph TD` text, keyed by label.
///
/// Export is a pure function of the diagram:
/// - Nodes are emitted in insertion order.
/// - Edges are emitted in insertion order; edges with a missing endpoint, or an endpoint whose
///   identifier is empty, are skipped.
/// - Every line, including the header, ends with `\n`.
pub fn export_flowchart(diagram: &Diagram) -> String {
    export_flowchart_with(diagram, MermaidOptions::default())
}

pub fn export_flowchart_with(diagram: &Diagram, options: MermaidOptions) -> String {
    let mut out = String::new();
    out.push_str("graph TD\n");

    for node in diagram.nodes() {
        let (open, close) = shape_delimiters(node.kind());
        out.push_str("  ");
        out.push_str(&mermaid_id_for_node(node, options.keying));
        out.push_str(open);
        out.push_str(node.label());
        out.push_str(close);
        out.push('\n');
    }

    for (edge, source, target) in diagram.resolved_edges() {
        let source_id = mermaid_id_for_node(source, options.keying);
        let target_id = mermaid_id_for_node(target, options.keying);
        // An endpoint with an empty identifier cannot be referenced.
        if source_id.is_empty() || target_id.is_empty() {
            continue;
        }
        out.push_str("  ");
        out.push_str(&source_id);
        out.push_str(" -->");
        if let Some(label) = edge.label().filter(|label| !label.is_empty()) {
            out.push('|');
            out.push_str(label);
            out.push('|');
        }
        out.push(' ');
        out.push_str(&target_id);
        out.push('\n');
    }

    out
}

/// Wraps Mermaid text in a fenced Markdown code block, as used by "copy with prefix".
pub fn fenced(mermaid: &str) -> String {
    format!("```mermaid\n{mermaid}\n```")
}

/// Safe ids shared by more than one node under label keying, in first-seen order.
pub fn label_collisions(diagram: &Diagram) -> Vec<LabelCollision> {
    let mut order = Vec::<String>::new();
    let mut by_id = BTreeMap::<String, Vec<NodeId>>::new();

    for node in diagram.nodes() {
        let mermaid_id = safe_id(node.label());
        let entry = by_id.entry(mermaid_id.clone()).or_default();
        if entry.is_empty() {
            order.push(mermaid_id);
        }
        entry.push(node.node_id().clone());
    }

    order
        .into_iter()
        .filter_map(|mermaid_id| {
            let node_ids = by_id.remove(&mermaid_id)?;
            (node_ids.len() > 1).then_some(LabelCollision {
                mermaid_id,
                node_ids,
            })
        })
        .collect()
}

fn mermaid_id_for_node(node: &Node, keying: NodeKeying) -> String {
    match keying {
        NodeKeying::Label => safe_id(node.label()),
        NodeKeying::StableId => safe_id_from_node_id(node.node_id().as_str()),
    }
}

fn shape_delimiters(kind: NodeKind) -> (&'static str, &'static str) {
    match kind {
        NodeKind::State => ("((", "))"),
        NodeKind::Action => ("[", "]"),
        NodeKind::Choice => ("{", "}"),
    }
}
