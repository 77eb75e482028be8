// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Workchart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Workchart: a terminal workflow editor that keeps a typed flowchart in a durable slot and
//! translates it to Mermaid.
//!
//! The [`editor::DiagramStore`] is the single owner of the diagram; the TUI and the MCP server
//! both mutate it, and [`store::PersistenceBridge`] mirrors every change into the slot.

pub mod editor;
pub mod export;
pub mod format;
pub mod mcp;
pub mod model;
pub mod ops;
pub mod store;
pub mod tui;
