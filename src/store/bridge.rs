// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Workchart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use tracing::{info, warn};

use super::{decode_snapshot, encode_snapshot, DurableSlot, StoreError};
use crate::editor::{DiagramStore, SubscriptionId};
use crate::model::Diagram;

/// Loads the diagram from a slot once and keeps the slot in sync with a [`DiagramStore`].
#[derive(Debug)]
pub struct PersistenceBridge<S> {
    slot: Arc<S>,
}

impl<S> Clone for PersistenceBridge<S> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<S: DurableSlot + Send + Sync + 'static> PersistenceBridge<S> {
    pub fn new(slot: S) -> Self {
        Self {
            slot: Arc::new(slot),
        }
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    /// Absent, unreadable, and malformed slots all load as an empty diagram.
    pub fn load(&self) -> Diagram {
        let raw = match self.slot.read() {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!("no saved diagram, starting empty");
                return Diagram::default();
            }
            Err(err) => {
                warn!(error = %err, "failed to read saved diagram, starting empty");
                return Diagram::default();
            }
        };

        match decode_snapshot(&raw) {
            Ok(diagram) => {
                info!(
                    nodes = diagram.nodes().len(),
                    edges = diagram.edges().len(),
                    "loaded saved diagram"
                );
                diagram
            }
            Err(err) => {
                warn!(error = %err, "saved diagram is malformed, starting empty");
                Diagram::default()
            }
        }
    }

    pub fn save(&self, diagram: &Diagram) -> Result<(), StoreError> {
        let raw = encode_snapshot(diagram)?;
        self.slot.write(&raw)
    }

    /// Writes a snapshot after every committed change. Failed writes are logged and skipped.
    pub fn attach(&self, store: &mut DiagramStore) -> SubscriptionId {
        let bridge = self.clone();
        store.subscribe(move |diagram| {
            if let Err(err) = bridge.save(diagram) {
                warn!(error = %err, "failed to persist diagram");
            }
        })
    }
}
