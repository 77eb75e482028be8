// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Workchart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Diagram text formats.
//!
//! Currently this module only covers exporting workflow diagrams as Mermaid `graph TD` text.

pub mod mermaid;
