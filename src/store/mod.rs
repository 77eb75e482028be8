// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Workchart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence for the diagram snapshot.
//!
//! A [`DurableSlot`] holds one JSON document. The [`PersistenceBridge`] loads the diagram from it
//! at startup and writes a full snapshot after every committed change.

mod bridge;
mod slot;
mod snapshot;

use std::fmt;
use std::path::PathBuf;

pub use bridge::PersistenceBridge;
pub use slot::{DurableSlot, FileSlot, MemorySlot, WriteDurability};
pub use snapshot::{decode_snapshot, encode_snapshot};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("snapshot json error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
    #[error("malformed snapshot: {reason}")]
    Malformed { reason: MalformedReason },
    #[error("refusing to write through symlink at {path:?}")]
    SymlinkRefused { path: PathBuf },
}

/// Why a structurally valid JSON document was rejected as a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    EmptyId { field: &'static str },
    UnknownKind { node_id: String, kind: String },
    DuplicateNode { node_id: String },
    DuplicateEdge { edge_id: String },
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId { field } => write!(f, "empty id in {field}"),
            Self::UnknownKind { node_id, kind } => {
                write!(f, "unknown kind {kind:?} for node {node_id}")
            }
            Self::DuplicateNode { node_id } => write!(f, "duplicate node id {node_id}"),
            Self::DuplicateEdge { edge_id } => write!(f, "duplicate edge id {edge_id}"),
        }
    }
}
