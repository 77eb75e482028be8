// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Workchart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A diagram is an ordered set of typed nodes, the edges between them, and the canvas viewport.

pub mod diagram;
pub mod edge;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod ids;
pub mod node;

pub use diagram::{Diagram, Viewport};
pub use edge::Edge;
pub use ids::{EdgeId, Id, IdError, NodeId};
pub use node::{Node, NodeKind, ParseNodeKindError, Position};
