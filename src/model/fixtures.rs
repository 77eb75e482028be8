// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Workchart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::diagram::{Diagram, Viewport};
use super::edge::Edge;
use super::ids::NodeId;
use super::node::{Node, NodeKind, Position};

fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("node id")
}

/// The worked example: an action feeding a state.
pub(crate) fn action_to_state() -> Diagram {
    Diagram::new(
        vec![
            Node::new(nid("n1"), NodeKind::Action, "Action 1", Position::new(0.0, 0.0)),
            Node::new(nid("n2"), NodeKind::State, "State 1", Position::new(0.0, 120.0)),
        ],
        vec![Edge::between(nid("n1"), nid("n2"))],
        Viewport::default(),
    )
}

/// A small approval workflow touching every node kind and a labelled branch.
pub(crate) fn review_workflow() -> Diagram {
    Diagram::new(
        vec![
            Node::new(nid("state-1"), NodeKind::State, "Draft", Position::new(0.0, 0.0)),
            Node::new(nid("action-2"), NodeKind::Action, "Submit for review", Position::new(0.0, 120.0)),
            Node::new(nid("choice-3"), NodeKind::Choice, "Approved?", Position::new(0.0, 240.0)),
            Node::new(nid("state-4"), NodeKind::State, "Published", Position::new(-160.0, 360.0)),
        ],
        vec![
            Edge::between(nid("state-1"), nid("action-2")),
            Edge::between(nid("action-2"), nid("choice-3")),
            Edge::between(nid("choice-3"), nid("state-4")).with_label(Some("yes")),
            Edge::between(nid("choice-3"), nid("state-1")).with_label(Some("no")),
        ],
        Viewport::new(40.0, -12.5, 0.75),
    )
}
