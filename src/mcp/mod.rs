// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Workchart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Model Context Protocol (MCP) server surface.
//!
//! Agents read the diagram, rewrite it with ops, and pull Mermaid text or images through the
//! same store the TUI edits.

mod server;
mod types;

pub use server::WorkchartMcp;
