//! Board export to image formats.
//!
//! Renders a [`Session`] to SVG, and to PNG by rasterizing that SVG with the
//! resvg/tiny-skia pipeline. Shapes are painted in session order with no fill,
//! stroked in their palette color.

use std::fmt::Write;
use std::path::Path;

use sketch_core::shape::path_extent;
use sketch_core::{Geometry, PathPoint, PathPointKind, Position, Session, Shape};

use crate::error::{RenderError, RenderResult};

/// File name offered when the board is saved as a picture.
pub const DEFAULT_FILE_NAME: &str = "picture.png";

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// PNG image.
    Png,
    /// SVG vector graphics (returns the SVG XML string as UTF-8 bytes).
    Svg,
}

impl ExportFormat {
    /// Guess the format from a file extension, defaulting to PNG.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => Self::Svg,
            _ => Self::Png,
        }
    }
}

/// Configuration for board export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Output width in pixels (default: board width).
    pub width: Option<u32>,
    /// Output height in pixels (default: board height).
    pub height: Option<u32>,
    /// Background CSS color (default: board background).
    pub background: Option<String>,
    /// Scale factor (e.g. 2.0 for retina).
    pub scale: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            background: None,
            scale: 1.0,
        }
    }
}

/// Exports a [`Session`] to image formats.
pub struct BoardExporter {
    config: ExportConfig,
}

impl BoardExporter {
    /// Create a new exporter with the given configuration.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Create an exporter with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ExportConfig::default())
    }

    /// Export a board to the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if the board cannot be rendered or encoded.
    pub fn export(&self, session: &Session, format: ExportFormat) -> RenderResult<Vec<u8>> {
        tracing::debug!(
            "Exporting {} shapes as {:?}",
            session.len(),
            format
        );
        match format {
            ExportFormat::Png => self.render_to_png(session),
            ExportFormat::Svg => Ok(self.render_to_svg(session).into_bytes()),
        }
    }

    /// Export a board and write it to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails or the file cannot be written.
    pub fn export_to_file(
        &self,
        session: &Session,
        path: &Path,
        format: ExportFormat,
    ) -> RenderResult<()> {
        let bytes = self.export(session, format)?;
        std::fs::write(path, &bytes)?;
        tracing::info!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }

    /// Export the board to an SVG string.
    #[must_use]
    pub fn render_to_svg(&self, session: &Session) -> String {
        let board = session.config();
        let (out_w, out_h) = self.output_dimensions(session);
        let view_w = self.config.width.unwrap_or(board.width).max(1);
        let view_h = self.config.height.unwrap_or(board.height).max(1);

        let mut svg = String::with_capacity(4096);
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{out_w}\" height=\"{out_h}\" viewBox=\"0 0 {view_w} {view_h}\">",
        );

        let background = self
            .config
            .background
            .as_deref()
            .unwrap_or(&board.background);
        let _ = write!(
            svg,
            "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
            escape_xml(background),
        );

        for shape in session.shapes() {
            render_shape_svg(&mut svg, shape);
        }

        svg.push_str("</svg>");
        svg
    }

    /// Export the board to PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if rasterizing or encoding fails, or if PNG support
    /// was not compiled in.
    pub fn render_to_png(&self, session: &Session) -> RenderResult<Vec<u8>> {
        #[cfg(feature = "png")]
        {
            let svg_string = self.render_to_svg(session);
            let pixmap = Self::rasterize_svg(&svg_string)?;

            pixmap
                .encode_png()
                .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))
        }
        #[cfg(not(feature = "png"))]
        {
            let _ = session;
            Err(RenderError::Unsupported(
                "PNG export requires the `png` feature".to_string(),
            ))
        }
    }

    /// Get output dimensions (width, height) in pixels.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn output_dimensions(&self, session: &Session) -> (u32, u32) {
        let board = session.config();
        let base_w = self.config.width.unwrap_or(board.width);
        let base_h = self.config.height.unwrap_or(board.height);

        #[allow(clippy::cast_precision_loss)]
        let out_w = (base_w as f32 * self.config.scale) as u32;
        #[allow(clippy::cast_precision_loss)]
        let out_h = (base_h as f32 * self.config.scale) as u32;
        (out_w.max(1), out_h.max(1))
    }

    /// Rasterize an SVG string to a tiny-skia Pixmap.
    #[cfg(feature = "png")]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn rasterize_svg(svg_string: &str) -> RenderResult<tiny_skia::Pixmap> {
        let opt = usvg::Options::default();
        let tree = usvg::Tree::from_str(svg_string, &opt)
            .map_err(|e| RenderError::Export(format!("SVG parsing failed: {e}")))?;

        let px_w = tree.size().width() as u32;
        let px_h = tree.size().height() as u32;

        let mut pixmap = tiny_skia::Pixmap::new(px_w.max(1), px_h.max(1))
            .ok_or_else(|| RenderError::Export("Failed to create pixmap".to_string()))?;

        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        Ok(pixmap)
    }
}

/// Render a single shape to SVG.
fn render_shape_svg(svg: &mut String, shape: &Shape) {
    let Position { x, y } = shape.position();
    let stroke = shape.color().css();
    let stroke_width = shape.thickness().width();
    let style =
        format!("fill=\"none\" stroke=\"{stroke}\" stroke-width=\"{stroke_width}\"");

    match shape.geometry() {
        Geometry::Circle { radius } => {
            let cx = x + radius;
            let cy = y + radius;
            let _ = write!(svg, "<circle cx=\"{cx}\" cy=\"{cy}\" r=\"{radius}\" {style}/>");
        }

        Geometry::Rectangle { width, height } => {
            let _ = write!(
                svg,
                "<rect x=\"{x}\" y=\"{y}\" width=\"{width}\" height=\"{height}\" {style}/>",
            );
        }

        Geometry::Line { from, to, .. } => {
            // endpoints are placed so that their bounding box starts at the position
            let dx = x - from.x.min(to.x);
            let dy = y - from.y.min(to.y);
            let _ = write!(
                svg,
                "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke-linecap=\"round\" {style}/>",
                from.x + dx,
                from.y + dy,
                to.x + dx,
                to.y + dy,
            );
        }

        Geometry::FreehandPath { path } => {
            let Some((min, _)) = path_extent(path) else {
                return;
            };
            let d = path_data(path, x - min.x, y - min.y);
            let _ = write!(
                svg,
                "<path d=\"{d}\" stroke-linecap=\"round\" stroke-linejoin=\"round\" {style}/>",
            );
        }
    }
}

/// Build SVG path data from recorded points, shifted by `(dx, dy)`.
///
/// Smoothed points are drawn as straight segments; only their end point is
/// recorded.
fn path_data(path: &[PathPoint], dx: f32, dy: f32) -> String {
    let mut d = String::with_capacity(path.len() * 16);
    for (idx, point) in path.iter().enumerate() {
        let (px, py) = (point.x + dx, point.y + dy);
        let command = match point.kind {
            PathPointKind::ClosePath => {
                if !d.is_empty() {
                    d.push_str(" Z");
                }
                continue;
            }
            PathPointKind::LineTo | PathPointKind::QuadTo if idx > 0 => 'L',
            PathPointKind::LineTo | PathPointKind::QuadTo | PathPointKind::MoveTo => 'M',
        };
        if !d.is_empty() {
            d.push(' ');
        }
        let _ = write!(d, "{command}{px},{py}");
    }
    d
}

/// Escape special XML characters.
fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
