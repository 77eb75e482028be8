// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Workchart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::{EdgeId, NodeId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    edge_id: EdgeId,
    source_id: NodeId,
    target_id: NodeId,
    label: Option<String>,
}

impl Edge {
    pub fn new(edge_id: EdgeId, source_id: NodeId, target_id: NodeId) -> Self {
        Self {
            edge_id,
            source_id,
            target_id,
            label: None,
        }
    }

    /// Builds the edge with its deterministic `<source>-<target>` id.
    pub fn between(source_id: NodeId, target_id: NodeId) -> Self {
        let edge_id = EdgeId::between(&source_id, &target_id);
        Self::new(edge_id, source_id, target_id)
    }

    pub fn with_label<T: Into<String>>(mut self, label: Option<T>) -> Self {
        self.set_label(label);
        self
    }

    pub fn edge_id(&self) -> &EdgeId {
        &self.edge_id
    }

    pub fn source_id(&self) -> &NodeId {
        &self.source_id
    }

    pub fn target_id(&self) -> &NodeId {
        &self.target_id
    }

    /// The edge label; empty labels are stored as `None`.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label<T: Into<String>>(&mut self, label: Option<T>) {
        self.label = label.map(Into::into).filter(|label| !label.is_empty());
    }

    pub fn touches(&self, node_id: &NodeId) -> bool {
        &self.source_id == node_id || &self.target_id == node_id
    }
}
