// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Workchart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use super::ids::NodeId;

/// The semantic type of a node; decides the Mermaid shape it is exported with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    State,
    Action,
    Choice,
}

impl NodeKind {
    pub const ALL: [NodeKind; 3] = [NodeKind::Action, NodeKind::State, NodeKind::Choice];

    /// Wire name used in persisted snapshots and node ids.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::State => "state",
            Self::Action => "action",
            Self::Choice => "choice",
        }
    }

    /// Human-facing name used for default labels (`"Action 1"`).
    pub fn display_name(self) -> &'static str {
        match self {
            Self::State => "State",
            Self::Action => "Action",
            Self::Choice => "Choice",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown node kind: {value:?} (expected state, action, or choice)")]
pub struct ParseNodeKindError {
    value: String,
}

impl FromStr for NodeKind {
    type Err = ParseNodeKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "state" => Ok(Self::State),
            "action" => Ok(Self::Action),
            // Older snapshots and menus call this kind "Condition".
            "choice" | "condition" => Ok(Self::Choice),
            _ => Err(ParseNodeKindError {
                value: s.to_owned(),
            }),
        }
    }
}

/// Canvas coordinates of a node.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    node_id: NodeId,
    kind: NodeKind,
    label: String,
    position: Position,
}

impl Node {
    pub fn new(
        node_id: NodeId,
        kind: NodeKind,
        label: impl Into<String>,
        position: Position,
    ) -> Self {
        Self {
            node_id,
            kind,
            label: label.into(),
            position,
        }
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }
}
