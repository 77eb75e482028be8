// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Workchart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Adapters that hand the current diagram to the outside world: the clipboard and image files.

mod clipboard;
mod image;

use std::path::PathBuf;

pub use clipboard::{copy_mermaid, osc52_sequence, ClipboardSink, CopyFormat, CopyOutcome, Osc52Clipboard};
pub use image::{export_image, DiagramRenderer, ImageFormat, SceneRenderer};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("clipboard write failed: {source}")]
    Clipboard {
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("generated svg could not be parsed: {source}")]
    Svg {
        #[from]
        source: resvg::usvg::Error,
    },
    #[error("cannot allocate a {width}x{height} pixmap")]
    Pixmap { width: u32, height: u32 },
    #[error("png encoding failed: {reason}")]
    Png { reason: String },
}
