// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Workchart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mermaid export for workflow diagrams.

pub mod flowchart;
mod ident;

pub use flowchart::{
    export_flowchart, export_flowchart_with, fenced, label_collisions, LabelCollision,
    MermaidOptions, NodeKeying,
};
pub use ident::safe_id;
