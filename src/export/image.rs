// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Workchart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{fontdb, Options, Tree};
use tracing::info;

use super::ExportError;
use crate::model::{Diagram, Node, NodeKind};

const NODE_WIDTH: f64 = 150.0;
const NODE_HEIGHT: f64 = 40.0;
const MARGIN: f64 = 20.0;
/// Upper bound on rasterized PNG area; larger scenes are scaled down to fit.
pub const MAX_PNG_PIXELS: u64 = 16_000_000;

/// Turns a diagram snapshot into image bytes.
pub trait DiagramRenderer {
    fn render_svg(&self, diagram: &Diagram) -> Result<String, ExportError>;
    fn render_png(&self, diagram: &Diagram) -> Result<Vec<u8>, ExportError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Png => "workchart.png",
            Self::Svg => "workchart.svg",
        }
    }
}

/// Renders every node at its stored position.
///
/// Positions are top-left corners of a fixed-size box. PNG output rasterizes the same SVG.
#[derive(Debug, Default, Clone, Copy)]
pub struct SceneRenderer;

impl SceneRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl DiagramRenderer for SceneRenderer {
    fn render_svg(&self, diagram: &Diagram) -> Result<String, ExportError> {
        Ok(build_svg(diagram).svg)
    }

    fn render_png(&self, diagram: &Diagram) -> Result<Vec<u8>, ExportError> {
        render_png_within(diagram, MAX_PNG_PIXELS)
    }
}

/// Rasterizes the scene, scaling it down uniformly when it would exceed `max_pixels`.
fn render_png_within(diagram: &Diagram, max_pixels: u64) -> Result<Vec<u8>, ExportError> {
    let scene = build_svg(diagram);

    let mut options = Options::default();
    options.fontdb = system_fonts();
    let tree = Tree::from_str(&scene.svg, &options)?;

    let size = tree.size();
    let (width, height, scale) =
        raster_size(f64::from(size.width()), f64::from(size.height()), max_pixels);
    if scale < 1.0 {
        info!(
            scene_width = scene.width,
            scene_height = scene.height,
            width,
            height,
            "scaling png export down to the pixel budget"
        );
    }

    let mut pixmap = Pixmap::new(width, height).ok_or(ExportError::Pixmap { width, height })?;
    resvg::render(
        &tree,
        Transform::from_scale(scale as f32, scale as f32),
        &mut pixmap.as_mut(),
    );

    pixmap.encode_png().map_err(|err| ExportError::Png {
        reason: err.to_string(),
    })
}

/// Pixel dimensions and scale factor for a scene of `width` by `height` units.
fn raster_size(width: f64, height: f64, max_pixels: u64) -> (u32, u32, f64) {
    let width = width.max(1.0);
    let height = height.max(1.0);
    let area = width * height;
    let scale = if area > max_pixels as f64 {
        (max_pixels as f64 / area).sqrt()
    } else {
        1.0
    };
    let to_px = |units: f64| ((units * scale).floor() as u32).max(1);
    // A degenerate strip clamps its thin side to one pixel, so cap the long side as well.
    let cap = |other: u32| u32::try_from(max_pixels / u64::from(other)).unwrap_or(u32::MAX).max(1);
    let px_width = to_px(width).min(cap(to_px(height)));
    let px_height = to_px(height).min(cap(px_width));
    (px_width, px_height, scale)
}

/// Renders `diagram` and writes it as `workchart.<ext>` inside `dir`.
pub fn export_image(
    renderer: &dyn DiagramRenderer,
    diagram: &Diagram,
    format: ImageFormat,
    dir: &Path,
) -> Result<PathBuf, ExportError> {
    let bytes = match format {
        ImageFormat::Svg => renderer.render_svg(diagram)?.into_bytes(),
        ImageFormat::Png => renderer.render_png(diagram)?,
    };

    let path = dir.join(format.file_name());
    fs::write(&path, &bytes).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), bytes = bytes.len(), "exported image");
    Ok(path)
}

fn system_fonts() -> Arc<fontdb::Database> {
    static FONTS: OnceLock<Arc<fontdb::Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            Arc::new(db)
        })
        .clone()
}

struct Scene {
    svg: String,
    width: u32,
    height: u32,
}

struct Bounds {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Bounds {
    fn of(diagram: &Diagram) -> Self {
        let mut bounds = Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        };
        for node in diagram.nodes() {
            let position = node.position();
            bounds.min_x = bounds.min_x.min(position.x);
            bounds.min_y = bounds.min_y.min(position.y);
            bounds.max_x = bounds.max_x.max(position.x + NODE_WIDTH);
            bounds.max_y = bounds.max_y.max(position.y + NODE_HEIGHT);
        }
        if !bounds.min_x.is_finite() || !bounds.min_y.is_finite() {
            bounds = Self {
                min_x: 0.0,
                min_y: 0.0,
                max_x: NODE_WIDTH,
                max_y: NODE_HEIGHT,
            };
        }
        bounds
    }
}

fn build_svg(diagram: &Diagram) -> Scene {
    let bounds = Bounds::of(diagram);
    let width = ((bounds.max_x - bounds.min_x) + 2.0 * MARGIN).ceil().max(1.0) as u32;
    let height = ((bounds.max_y - bounds.min_y) + 2.0 * MARGIN).ceil().max(1.0) as u32;
    let map_x = |x: f64| x - bounds.min_x + MARGIN;
    let map_y = |y: f64| y - bounds.min_y + MARGIN;
    let center = |node: &Node| {
        let position = node.position();
        (
            map_x(position.x + NODE_WIDTH / 2.0),
            map_y(position.y + NODE_HEIGHT / 2.0),
        )
    };

    let mut out = String::new();
    let _ = writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">"
    );
    let _ = writeln!(out, "<defs>");
    let _ = writeln!(
        out,
        "  <marker id=\"arrow\" markerWidth=\"10\" markerHeight=\"7\" refX=\"10\" refY=\"3.5\" orient=\"auto\">\n    <polygon points=\"0 0, 10 3.5, 0 7\" fill=\"#555\"/>\n  </marker>"
    );
    let _ = writeln!(out, "</defs>");
    let _ = writeln!(out, "<rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>");

    let _ = writeln!(out, "<g class=\"edges\">");
    for (edge, source, target) in diagram.resolved_edges() {
        let (sx, sy) = center(source);
        let (tx, ty) = center(target);
        let (ex, ey) = clip_to_box(sx, sy, tx, ty);
        let _ = writeln!(
            out,
            "  <line x1=\"{sx:.1}\" y1=\"{sy:.1}\" x2=\"{ex:.1}\" y2=\"{ey:.1}\" stroke=\"#555\" stroke-width=\"2\" marker-end=\"url(#arrow)\"/>"
        );
        if let Some(label) = edge.label() {
            let _ = writeln!(
                out,
                "  <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"12\" fill=\"#333\" text-anchor=\"middle\" dominant-baseline=\"central\">{}</text>",
                (sx + tx) / 2.0,
                (sy + ty) / 2.0,
                escape_xml(label)
            );
        }
    }
    let _ = writeln!(out, "</g>");

    let _ = writeln!(out, "<g class=\"nodes\">");
    for node in diagram.nodes() {
        let position = node.position();
        let x = map_x(position.x);
        let y = map_y(position.y);
        let (cx, cy) = center(node);
        match node.kind() {
            NodeKind::Action => {
                let _ = writeln!(
                    out,
                    "  <rect x=\"{x:.1}\" y=\"{y:.1}\" width=\"{NODE_WIDTH:.1}\" height=\"{NODE_HEIGHT:.1}\" rx=\"5\" ry=\"5\" fill=\"#dbeafe\" stroke=\"#1e3a8a\" stroke-width=\"2\"/>"
                );
            }
            NodeKind::State => {
                let _ = writeln!(
                    out,
                    "  <ellipse cx=\"{cx:.1}\" cy=\"{cy:.1}\" rx=\"{:.1}\" ry=\"{:.1}\" fill=\"#dcfce7\" stroke=\"#14532d\" stroke-width=\"2\"/>",
                    NODE_WIDTH / 2.0,
                    NODE_HEIGHT / 2.0
                );
            }
            NodeKind::Choice => {
                let _ = writeln!(
                    out,
                    "  <polygon points=\"{cx:.1},{y:.1} {:.1},{cy:.1} {cx:.1},{:.1} {x:.1},{cy:.1}\" fill=\"#fef9c3\" stroke=\"#713f12\" stroke-width=\"2\"/>",
                    x + NODE_WIDTH,
                    y + NODE_HEIGHT
                );
            }
        }
        let _ = writeln!(
            out,
            "  <text x=\"{cx:.1}\" y=\"{cy:.1}\" font-size=\"12\" fill=\"#000\" text-anchor=\"middle\" dominant-baseline=\"central\">{}</text>",
            escape_xml(node.label())
        );
    }
    let _ = writeln!(out, "</g>");
    let _ = writeln!(out, "</svg>");

    Scene {
        svg: out,
        width,
        height,
    }
}

/// End point of a center-to-center line, pulled back to the target box edge.
fn clip_to_box(sx: f64, sy: f64, tx: f64, ty: f64) -> (f64, f64) {
    let dx = tx - sx;
    let dy = ty - sy;
    if dx == 0.0 && dy == 0.0 {
        return (tx, ty);
    }
    let half_w = NODE_WIDTH / 2.0;
    let half_h = NODE_HEIGHT / 2.0;
    let scale_x = if dx == 0.0 { f64::INFINITY } else { half_w / dx.abs() };
    let scale_y = if dy == 0.0 { f64::INFINITY } else { half_h / dy.abs() };
    let scale = scale_x.min(scale_y).min(1.0);
    (tx - dx * scale, ty - dy * scale)
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
