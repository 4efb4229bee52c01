//! Drawing session state.
//!
//! A [`Session`] is the single source of truth for one board: the ordered
//! shape collection plus the tool configuration applied to new shapes.
//! The collection is published as an immutable snapshot; every change
//! installs a new [`Arc`], so observers can detect it with [`Arc::ptr_eq`].

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::shape::{Color, Position, Shape, ShapeId, ShapeKind, Thickness};
use crate::{BoardConfig, SketchError, SketchResult};

/// Radius of a newly created circle.
pub const DEFAULT_RADIUS: f32 = 50.0;

/// Width and height of a newly created rectangle.
pub const DEFAULT_RECT_SIZE: (f32, f32) = (50.0, 50.0);

/// Endpoints of a newly created line.
pub const DEFAULT_LINE_ENDPOINTS: ([f32; 2], [f32; 2]) = ([50.0, 0.0], [100.0, 50.0]);

/// Bounding box of a newly created line.
pub const DEFAULT_LINE_SIZE: (f32, f32) = (50.0, 50.0);

/// How raw pointer gestures on the board are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolMode {
    /// Gestures move and scale existing shapes.
    #[default]
    Placement,
    /// Gestures record freehand strokes.
    Drawing,
}

/// New geometry reported by the rendering surface after a scale gesture.
///
/// Only the fields relevant to the target's kind are used; see
/// [`Session::resize`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResizeParams {
    /// New anchor position. Always applied.
    pub position: Position,
    /// New width (rectangles).
    #[serde(default)]
    pub width: Option<f32>,
    /// New height (rectangles).
    #[serde(default)]
    pub height: Option<f32>,
    /// New first endpoint (lines).
    #[serde(default)]
    pub from: Option<Position>,
    /// New second endpoint (lines).
    #[serde(default)]
    pub to: Option<Position>,
    /// New radius (circles).
    #[serde(default)]
    pub radius: Option<f32>,
}

impl ResizeParams {
    /// Params that only move the shape.
    #[must_use]
    pub fn at(position: impl Into<Position>) -> Self {
        Self {
            position: position.into(),
            ..Self::default()
        }
    }

    /// Set width and height.
    #[must_use]
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Set line endpoints.
    #[must_use]
    pub fn with_endpoints(mut self, from: impl Into<Position>, to: impl Into<Position>) -> Self {
        self.from = Some(from.into());
        self.to = Some(to.into());
        self
    }

    /// Set the radius.
    #[must_use]
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = Some(radius);
        self
    }
}

/// Serializable form of a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionDocument {
    /// Board surface configuration.
    pub config: BoardConfig,
    /// Session color.
    pub color: Color,
    /// Session thickness.
    pub thickness: Thickness,
    /// Tool mode at save time.
    pub tool_mode: ToolMode,
    /// Shapes in paint order.
    pub shapes: Vec<Shape>,
}

/// One editing instance: shapes plus current tool configuration.
#[derive(Debug, Clone)]
pub struct Session {
    config: BoardConfig,
    shapes: Arc<Vec<Shape>>,
    tool_mode: ToolMode,
    color: Color,
    thickness: Thickness,
    revision: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(BoardConfig::default())
    }
}

impl Session {
    /// Create an empty session for a board.
    #[must_use]
    pub fn new(config: BoardConfig) -> Self {
        Self {
            config,
            shapes: Arc::new(Vec::new()),
            tool_mode: ToolMode::Placement,
            color: Color::default(),
            thickness: Thickness::default(),
            revision: 0,
        }
    }

    /// Board configuration.
    #[must_use]
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Shapes in paint order.
    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// The current immutable snapshot of the shape collection.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Vec<Shape>> {
        Arc::clone(&self.shapes)
    }

    /// Counter bumped on every change to the shape collection.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Look up a shape by ID.
    #[must_use]
    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    /// Number of shapes on the board.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Check if the board is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Current tool mode.
    #[must_use]
    pub fn tool_mode(&self) -> ToolMode {
        self.tool_mode
    }

    /// Whether pointer gestures currently record freehand strokes.
    #[must_use]
    pub fn is_drawable(&self) -> bool {
        self.tool_mode == ToolMode::Drawing
    }

    /// Color applied to newly created shapes.
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Thickness applied to newly created shapes.
    #[must_use]
    pub fn thickness(&self) -> Thickness {
        self.thickness
    }

    /// Reject a collection with invalid extents or repeated IDs.
    fn validate_shapes(shapes: &[Shape]) -> SketchResult<()> {
        let mut seen = HashSet::with_capacity(shapes.len());
        for shape in shapes {
            shape.validate()?;
            if !seen.insert(shape.id()) {
                return Err(SketchError::DuplicateShape(shape.id()));
            }
        }
        Ok(())
    }

    fn publish(&mut self, shapes: Vec<Shape>) {
        self.shapes = Arc::new(shapes);
        self.revision += 1;
    }

    fn push(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        let mut next = Vec::with_capacity(self.shapes.len() + 1);
        next.extend_from_slice(&self.shapes);
        next.push(shape);
        self.publish(next);
        id
    }

    /// Apply `edit` to a copy of the shape and publish it on success.
    fn update_shape<F>(&mut self, id: ShapeId, edit: F) -> SketchResult<()>
    where
        F: FnOnce(&mut Shape) -> SketchResult<()>,
    {
        let index = self
            .shapes
            .iter()
            .position(|s| s.id() == id)
            .ok_or(SketchError::ShapeNotFound(id))?;

        let mut next = self.shapes.as_ref().clone();
        edit(&mut next[index])?;
        self.publish(next);
        Ok(())
    }

    /// Append a new shape of `kind` at `position` using the session style.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::UnsupportedKind`] for [`ShapeKind::FreehandPath`];
    /// strokes only enter the board through [`Session::add_freehand_path`].
    pub fn create_shape(&mut self, kind: ShapeKind, position: Position) -> SketchResult<ShapeId> {
        let (color, thickness) = (self.color, self.thickness);
        let shape = match kind {
            ShapeKind::Circle => Shape::circle(color, thickness, position, DEFAULT_RADIUS)?,
            ShapeKind::Rectangle => {
                let (width, height) = DEFAULT_RECT_SIZE;
                Shape::rectangle(color, thickness, position, width, height)?
            }
            ShapeKind::Line => {
                let (from, to) = DEFAULT_LINE_ENDPOINTS;
                let (width, height) = DEFAULT_LINE_SIZE;
                Shape::line(
                    color,
                    thickness,
                    position,
                    from.into(),
                    to.into(),
                    width,
                    height,
                )?
            }
            ShapeKind::FreehandPath => {
                tracing::warn!("Refusing to create {kind} through the shape factory");
                return Err(SketchError::UnsupportedKind(kind));
            }
        };

        let id = self.push(shape);
        tracing::debug!("Created {kind} {id} at ({}, {})", position.x, position.y);
        Ok(id)
    }

    /// Append a finished freehand stroke verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::InvalidOperation`] if `shape` is not a freehand path,
    /// or [`SketchError::DuplicateShape`] if its ID is already on the board.
    pub fn add_freehand_path(&mut self, shape: Shape) -> SketchResult<ShapeId> {
        let kind = shape.kind();
        if kind != ShapeKind::FreehandPath {
            return Err(SketchError::InvalidOperation {
                operation: "add_freehand_path",
                kind,
            });
        }
        if self.shape(shape.id()).is_some() {
            return Err(SketchError::DuplicateShape(shape.id()));
        }
        let id = self.push(shape);
        tracing::debug!("Added freehand path {id}");
        Ok(id)
    }

    /// Switch between freehand drawing and shape placement.
    ///
    /// Existing shapes and toolbar actions are unaffected; only the meaning
    /// of raw pointer gestures changes.
    pub fn set_tool_mode(&mut self, drawable: bool) {
        self.tool_mode = if drawable {
            ToolMode::Drawing
        } else {
            ToolMode::Placement
        };
        tracing::debug!("Tool mode: {:?}", self.tool_mode);
    }

    /// Flip the tool mode, as the brush button does.
    pub fn toggle_draw_mode(&mut self) {
        self.set_tool_mode(!self.is_drawable());
    }

    /// Set the thickness for shapes created from now on.
    pub fn set_thickness(&mut self, thickness: Thickness) {
        self.thickness = thickness;
    }

    /// Set the color for shapes created from now on.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Move a shape.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::ShapeNotFound`] if the ID is unknown.
    pub fn reposition(&mut self, id: ShapeId, position: Position) -> SketchResult<()> {
        self.update_shape(id, |shape| {
            shape.change_position(position);
            Ok(())
        })
    }

    /// Apply new geometry from a scale gesture.
    ///
    /// Rectangles take `width` + `height`, lines take `from` + `to`, circles
    /// take `radius`. When the fields for the shape's kind are missing the
    /// size update is skipped, but `position` is still applied. Freehand
    /// paths are never resized and are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::ShapeNotFound`] if the ID is unknown, or
    /// [`SketchError::InvalidExtent`] for a negative size.
    pub fn resize(&mut self, id: ShapeId, params: &ResizeParams) -> SketchResult<()> {
        let kind = self
            .shape(id)
            .map(Shape::kind)
            .ok_or(SketchError::ShapeNotFound(id))?;
        if kind == ShapeKind::FreehandPath {
            tracing::trace!("Ignoring resize of freehand path {id}");
            return Ok(());
        }

        self.update_shape(id, |shape| {
            match kind {
                ShapeKind::Rectangle => {
                    if let (Some(width), Some(height)) = (params.width, params.height) {
                        shape.change_size(width, height)?;
                    }
                }
                ShapeKind::Line => {
                    if let (Some(from), Some(to)) = (params.from, params.to) {
                        shape.change_coordinates(from, to)?;
                    }
                }
                ShapeKind::Circle => {
                    if let Some(radius) = params.radius {
                        shape.change_radius(radius)?;
                    }
                }
                ShapeKind::FreehandPath => {}
            }
            shape.change_position(params.position);
            Ok(())
        })
    }

    /// Remove every shape.
    pub fn clear(&mut self) {
        if !self.shapes.is_empty() {
            self.publish(Vec::new());
        }
    }

    /// Replace the whole collection, e.g. when loading a saved board.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::InvalidExtent`] or [`SketchError::DuplicateShape`]
    /// if any shape breaks the collection invariants. The board is left as is.
    pub fn replace_shapes(&mut self, shapes: Vec<Shape>) -> SketchResult<()> {
        Self::validate_shapes(&shapes)?;
        self.publish(shapes);
        Ok(())
    }

    /// Capture the session as a serializable document.
    #[must_use]
    pub fn to_document(&self) -> SessionDocument {
        SessionDocument {
            config: self.config.clone(),
            color: self.color,
            thickness: self.thickness,
            tool_mode: self.tool_mode,
            shapes: self.shapes.as_ref().clone(),
        }
    }

    /// Rebuild a session from a document.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::InvalidExtent`] or [`SketchError::DuplicateShape`]
    /// if a saved shape breaks the collection invariants.
    pub fn from_document(document: SessionDocument) -> SketchResult<Self> {
        Self::validate_shapes(&document.shapes)?;
        let mut session = Self::new(document.config);
        session.color = document.color;
        session.thickness = document.thickness;
        session.tool_mode = document.tool_mode;
        session.shapes = Arc::new(document.shapes);
        Ok(session)
    }

    /// Serialize the session to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> SketchResult<String> {
        serde_json::to_string(&self.to_document()).map_err(SketchError::Serialization)
    }

    /// Deserialize a session from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails or a shape is invalid.
    pub fn from_json(json: &str) -> SketchResult<Self> {
        let document: SessionDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }
}
