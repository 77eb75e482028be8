// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Workchart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::io::Write;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::{info, warn};

use super::ExportError;
use crate::format::mermaid::{export_flowchart, fenced};
use crate::model::Diagram;

/// Destination for copied text.
pub trait ClipboardSink {
    fn write_text(&mut self, text: &str) -> Result<(), ExportError>;
}

/// Copies through the terminal via an OSC 52 escape sequence.
#[derive(Debug)]
pub struct Osc52Clipboard<W> {
    out: W,
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl Osc52Clipboard<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ClipboardSink for Osc52Clipboard<W> {
    fn write_text(&mut self, text: &str) -> Result<(), ExportError> {
        self.out
            .write_all(osc52_sequence(text).as_bytes())
            .and_then(|()| self.out.flush())
            .map_err(|source| ExportError::Clipboard { source })
    }
}

pub fn osc52_sequence(text: &str) -> String {
    let encoded = STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x1b\\")
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CopyFormat {
    #[default]
    Plain,
    /// Wrapped in a ```` ```mermaid ```` fence.
    Fenced,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    Failed(String),
}

impl CopyOutcome {
    pub fn is_copied(&self) -> bool {
        matches!(self, Self::Copied)
    }
}

impl fmt::Display for CopyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Copied => f.write_str("Copied!"),
            Self::Failed(reason) => write!(f, "Copy failed: {reason}"),
        }
    }
}

/// Regenerates the Mermaid text from `diagram` and writes it to `sink`.
///
/// Sink failures are logged and reported through [`CopyOutcome::Failed`].
pub fn copy_mermaid(sink: &mut dyn ClipboardSink, diagram: &Diagram, format: CopyFormat) -> CopyOutcome {
    let mermaid = export_flowchart(diagram);
    let text = match format {
        CopyFormat::Plain => mermaid,
        CopyFormat::Fenced => fenced(&mermaid),
    };

    match sink.write_text(&text) {
        Ok(()) => {
            info!(bytes = text.len(), ?format, "copied mermaid");
            CopyOutcome::Copied
        }
        Err(err) => {
            warn!(error = %err, "failed to copy mermaid");
            CopyOutcome::Failed(err.to_string())
        }
    }
}
