// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Workchart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::OnceLock;

use regex::Regex;

fn whitespace_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static whitespace regex"))
}

/// Mermaid identifier derived from a display label: every whitespace run becomes `_`.
///
/// Other characters are passed through untouched, so distinct nodes with equal labels map to the
/// same identifier.
pub fn safe_id(label: &str) -> String {
    whitespace_runs().replace_all(label, "_").into_owned()
}

/// Mermaid identifier derived from a stable node id: anything outside `[A-Za-z0-9_]` becomes `_`.
pub(super) fn safe_id_from_node_id(node_id: &str) -> String {
    node_id
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() || ch == '_' { ch } else { '_' })
        .collect()
}
