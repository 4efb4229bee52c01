//! Shapes - the drawable entities placed on a board.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{SketchError, SketchResult};

/// Unique identifier for a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeId(Uuid);

impl ShapeId {
    /// Create a new unique shape ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ShapeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A point on the board, in canvas pixels from the top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal offset.
    pub x: f32,
    /// Vertical offset.
    pub y: f32,
}

impl Position {
    /// Create a position from its coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<[f32; 2]> for Position {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

/// The fixed stroke palette.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// Black (the initial session color).
    #[default]
    Black,
    /// Blue.
    Blue,
    /// Red.
    Red,
    /// Yellow.
    Yellow,
}

impl Color {
    /// Every palette entry in toolbar order.
    pub const ALL: [Color; 4] = [Color::Black, Color::Blue, Color::Red, Color::Yellow];

    /// CSS color name used when the shape is rendered.
    #[must_use]
    pub const fn css(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::Blue => "blue",
            Self::Red => "red",
            Self::Yellow => "yellow",
        }
    }
}

/// Enumerated stroke width.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Thickness {
    /// One pixel (the initial session thickness).
    #[default]
    Light = 1,
    /// Two pixels.
    Medium = 2,
    /// Three pixels.
    Bold = 3,
}

impl Thickness {
    /// Every thickness level in toolbar order.
    pub const ALL: [Thickness; 3] = [Thickness::Light, Thickness::Medium, Thickness::Bold];

    /// Stroke width in pixels.
    #[must_use]
    pub fn width(self) -> f32 {
        f32::from(self as u8)
    }
}

impl TryFrom<u8> for Thickness {
    type Error = SketchError;

    fn try_from(value: u8) -> SketchResult<Self> {
        match value {
            1 => Ok(Self::Light),
            2 => Ok(Self::Medium),
            3 => Ok(Self::Bold),
            other => Err(SketchError::InvalidExtent(format!(
                "thickness {other} is not one of 1, 2, 3"
            ))),
        }
    }
}

/// Discriminant of a shape's geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    /// A circle.
    Circle,
    /// An axis-aligned rectangle.
    Rectangle,
    /// A straight line segment.
    Line,
    /// A freehand brush stroke.
    FreehandPath,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Circle => "circle",
            Self::Rectangle => "rectangle",
            Self::Line => "line",
            Self::FreehandPath => "freehand path",
        };
        f.write_str(name)
    }
}

/// Point-type tag of a freehand path point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathPointKind {
    /// Start a new sub-path at the point.
    MoveTo,
    /// Straight segment to the point.
    LineTo,
    /// Smoothed segment ending at the point.
    QuadTo,
    /// Close the current sub-path.
    ClosePath,
}

/// One recorded point of a freehand stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
    /// How the stroke reaches this point.
    pub kind: PathPointKind,
}

impl PathPoint {
    /// Create a path point.
    #[must_use]
    pub const fn new(x: f32, y: f32, kind: PathPointKind) -> Self {
        Self { x, y, kind }
    }
}

/// Per-kind payload of a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Geometry {
    /// Circle anchored at its bounding box top-left.
    Circle {
        /// Radius in pixels.
        radius: f32,
    },
    /// Rectangle anchored at its top-left corner.
    Rectangle {
        /// Width in pixels.
        width: f32,
        /// Height in pixels.
        height: f32,
    },
    /// Line segment with a redundantly stored bounding box.
    Line {
        /// First endpoint.
        from: Position,
        /// Second endpoint.
        to: Position,
        /// Bounding box width.
        width: f32,
        /// Bounding box height.
        height: f32,
    },
    /// Recorded brush stroke, in stroke order.
    FreehandPath {
        /// Points of the stroke.
        path: Vec<PathPoint>,
    },
}

impl Geometry {
    /// The kind tag for this payload.
    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Circle { .. } => ShapeKind::Circle,
            Self::Rectangle { .. } => ShapeKind::Rectangle,
            Self::Line { .. } => ShapeKind::Line,
            Self::FreehandPath { .. } => ShapeKind::FreehandPath,
        }
    }
}

/// Axis-aligned box a shape occupies on the board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

/// A drawable shape: shared style attributes plus a per-kind geometry.
///
/// The geometry variant is fixed at construction, so a shape's kind never
/// changes. Color, thickness, position and the extents inside the geometry
/// may be mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    id: ShapeId,
    color: Color,
    thickness: Thickness,
    position: Position,
    geometry: Geometry,
}

fn check_extent(name: &str, value: f32) -> SketchResult<f32> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(SketchError::InvalidExtent(format!(
            "{name} must be a non-negative number, got {value}"
        )))
    }
}

impl Shape {
    fn build(color: Color, thickness: Thickness, position: Position, geometry: Geometry) -> Self {
        Self {
            id: ShapeId::new(),
            color,
            thickness,
            position,
            geometry,
        }
    }

    /// Create a circle.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::InvalidExtent`] if `radius` is negative or not finite.
    pub fn circle(
        color: Color,
        thickness: Thickness,
        position: Position,
        radius: f32,
    ) -> SketchResult<Self> {
        let radius = check_extent("radius", radius)?;
        Ok(Self::build(color, thickness, position, Geometry::Circle { radius }))
    }

    /// Create a rectangle.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::InvalidExtent`] if either side is negative or not finite.
    pub fn rectangle(
        color: Color,
        thickness: Thickness,
        position: Position,
        width: f32,
        height: f32,
    ) -> SketchResult<Self> {
        let width = check_extent("width", width)?;
        let height = check_extent("height", height)?;
        Ok(Self::build(
            color,
            thickness,
            position,
            Geometry::Rectangle { width, height },
        ))
    }

    /// Create a line.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::InvalidExtent`] if the bounding box is negative or not finite.
    pub fn line(
        color: Color,
        thickness: Thickness,
        position: Position,
        from: Position,
        to: Position,
        width: f32,
        height: f32,
    ) -> SketchResult<Self> {
        let width = check_extent("width", width)?;
        let height = check_extent("height", height)?;
        Ok(Self::build(
            color,
            thickness,
            position,
            Geometry::Line {
                from,
                to,
                width,
                height,
            },
        ))
    }

    /// Create a finished freehand stroke.
    #[must_use]
    pub fn freehand(
        color: Color,
        thickness: Thickness,
        position: Position,
        path: Vec<PathPoint>,
    ) -> Self {
        Self::build(color, thickness, position, Geometry::FreehandPath { path })
    }

    /// Stable identifier.
    #[must_use]
    pub fn id(&self) -> ShapeId {
        self.id
    }

    /// Kind tag, derived from the geometry.
    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    /// Stroke color.
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Stroke thickness.
    #[must_use]
    pub fn thickness(&self) -> Thickness {
        self.thickness
    }

    /// Anchor position.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Per-kind payload.
    #[must_use]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Replace the position. No constraints apply.
    pub fn change_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Replace the stroke thickness.
    pub fn change_thickness(&mut self, thickness: Thickness) {
        self.thickness = thickness;
    }

    /// Replace the stroke color.
    pub fn change_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Replace width and height of a rectangle or of a line's bounding box.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::InvalidOperation`] for circles and freehand paths,
    /// or [`SketchError::InvalidExtent`] for a negative size.
    pub fn change_size(&mut self, new_width: f32, new_height: f32) -> SketchResult<()> {
        let kind = self.kind();
        match &mut self.geometry {
            Geometry::Rectangle { width, height } | Geometry::Line { width, height, .. } => {
                let checked = (
                    check_extent("width", new_width)?,
                    check_extent("height", new_height)?,
                );
                (*width, *height) = checked;
                Ok(())
            }
            Geometry::Circle { .. } | Geometry::FreehandPath { .. } => {
                Err(SketchError::InvalidOperation {
                    operation: "change_size",
                    kind,
                })
            }
        }
    }

    /// Replace a circle's radius.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::InvalidOperation`] for anything but a circle,
    /// or [`SketchError::InvalidExtent`] for a negative radius.
    pub fn change_radius(&mut self, new_radius: f32) -> SketchResult<()> {
        let kind = self.kind();
        if let Geometry::Circle { radius } = &mut self.geometry {
            *radius = check_extent("radius", new_radius)?;
            Ok(())
        } else {
            Err(SketchError::InvalidOperation {
                operation: "change_radius",
                kind,
            })
        }
    }

    /// Replace a line's endpoints. The stored bounding box is left as is.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::InvalidOperation`] for anything but a line.
    pub fn change_coordinates(&mut self, new_from: Position, new_to: Position) -> SketchResult<()> {
        let kind = self.kind();
        if let Geometry::Line { from, to, .. } = &mut self.geometry {
            *from = new_from;
            *to = new_to;
            Ok(())
        } else {
            Err(SketchError::InvalidOperation {
                operation: "change_coordinates",
                kind,
            })
        }
    }

    /// Check the extents against the limits the constructors enforce.
    ///
    /// Needed for shapes that did not come through a constructor, such as
    /// ones read from a saved board.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::InvalidExtent`] for a negative or non-finite extent.
    pub fn validate(&self) -> SketchResult<()> {
        match &self.geometry {
            Geometry::Circle { radius } => {
                check_extent("radius", *radius)?;
            }
            Geometry::Rectangle { width, height } | Geometry::Line { width, height, .. } => {
                check_extent("width", *width)?;
                check_extent("height", *height)?;
            }
            Geometry::FreehandPath { .. } => {}
        }
        Ok(())
    }

    /// The box this shape occupies, anchored at its position.
    ///
    /// Freehand paths take their extent from the recorded points.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        let Position { x, y } = self.position;
        let (width, height) = match &self.geometry {
            Geometry::Circle { radius } => (radius * 2.0, radius * 2.0),
            Geometry::Rectangle { width, height } | Geometry::Line { width, height, .. } => {
                (*width, *height)
            }
            Geometry::FreehandPath { path } => path_extent(path)
                .map_or((0.0, 0.0), |(min, max)| (max.x - min.x, max.y - min.y)),
        };
        Bounds {
            x,
            y,
            width,
            height,
        }
    }
}

/// Minimum and maximum corner of a set of path points.
#[must_use]
pub fn path_extent(path: &[PathPoint]) -> Option<(Position, Position)> {
    let first = path.first()?;
    let init = (
        Position::new(first.x, first.y),
        Position::new(first.x, first.y),
    );
    Some(path.iter().fold(init, |(min, max), p| {
        (
            Position::new(min.x.min(p.x), min.y.min(p.y)),
            Position::new(max.x.max(p.x), max.y.max(p.y)),
        )
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> Shape {
        Shape::rectangle(Color::Red, Thickness::Bold, Position::new(1.0, 2.0), 30.0, 40.0)
            .expect("valid rectangle")
    }

    #[test]
    fn test_constructors_reject_negative_extents() {
        let origin = Position::default();
        assert!(matches!(
            Shape::circle(Color::Black, Thickness::Light, origin, -1.0),
            Err(SketchError::InvalidExtent(_))
        ));
        assert!(Shape::rectangle(Color::Black, Thickness::Light, origin, 10.0, -0.5).is_err());
        assert!(Shape::rectangle(Color::Black, Thickness::Light, origin, f32::NAN, 1.0).is_err());
        assert!(Shape::circle(Color::Black, Thickness::Light, origin, 0.0).is_ok());
    }

    #[test]
    fn test_change_size_on_rectangle_and_line() {
        let mut shape = rect();
        shape.change_size(5.0, 6.0).expect("rectangle resizes");
        assert_eq!(
            shape.geometry(),
            &Geometry::Rectangle {
                width: 5.0,
                height: 6.0
            }
        );

        let mut line = Shape::line(
            Color::Blue,
            Thickness::Light,
            Position::default(),
            Position::new(50.0, 0.0),
            Position::new(100.0, 50.0),
            50.0,
            50.0,
        )
        .expect("valid line");
        line.change_size(80.0, 20.0).expect("line resizes");
        assert!(matches!(
            line.geometry(),
            Geometry::Line { width, height, .. } if (*width - 80.0).abs() < f32::EPSILON && (*height - 20.0).abs() < f32::EPSILON
        ));
    }

    #[test]
    fn test_change_size_rejected_for_circle_and_freehand() {
        let mut circle =
            Shape::circle(Color::Black, Thickness::Light, Position::default(), 10.0).expect("ok");
        let err = circle.change_size(1.0, 1.0).expect_err("circle has no size");
        assert!(matches!(
            err,
            SketchError::InvalidOperation {
                kind: ShapeKind::Circle,
                ..
            }
        ));

        let mut path = Shape::freehand(Color::Black, Thickness::Light, Position::default(), vec![]);
        assert!(path.change_size(1.0, 1.0).is_err());
    }

    #[test]
    fn test_change_radius_only_on_circle() {
        let mut circle =
            Shape::circle(Color::Black, Thickness::Light, Position::default(), 10.0).expect("ok");
        circle.change_radius(25.0).expect("circle radius");
        assert_eq!(circle.geometry(), &Geometry::Circle { radius: 25.0 });

        let mut shape = rect();
        assert!(matches!(
            shape.change_radius(3.0),
            Err(SketchError::InvalidOperation {
                operation: "change_radius",
                ..
            })
        ));
    }

    #[test]
    fn test_change_coordinates_keeps_bounding_box() {
        let mut line = Shape::line(
            Color::Blue,
            Thickness::Light,
            Position::default(),
            Position::new(50.0, 0.0),
            Position::new(100.0, 50.0),
            50.0,
            50.0,
        )
        .expect("valid line");
        line.change_coordinates(Position::new(0.0, 0.0), Position::new(10.0, 10.0))
            .expect("line coordinates");

        assert_eq!(
            line.geometry(),
            &Geometry::Line {
                from: Position::new(0.0, 0.0),
                to: Position::new(10.0, 10.0),
                width: 50.0,
                height: 50.0,
            }
        );
        assert!(rect()
            .change_coordinates(Position::default(), Position::default())
            .is_err());
    }

    #[test]
    fn test_kind_survives_mutation() {
        let mut shape = rect();
        shape.change_position(Position::new(9.0, 9.0));
        shape.change_thickness(Thickness::Light);
        shape.change_color(Color::Yellow);
        assert_eq!(shape.kind(), ShapeKind::Rectangle);
        assert_eq!(shape.color(), Color::Yellow);
        assert_eq!(shape.thickness(), Thickness::Light);
    }

    #[test]
    fn test_bounds_per_kind() {
        let circle =
            Shape::circle(Color::Black, Thickness::Light, Position::new(10.0, 20.0), 5.0)
                .expect("ok");
        assert_eq!(
            circle.bounds(),
            Bounds {
                x: 10.0,
                y: 20.0,
                width: 10.0,
                height: 10.0
            }
        );

        let stroke = Shape::freehand(
            Color::Black,
            Thickness::Light,
            Position::new(3.0, 4.0),
            vec![
                PathPoint::new(3.0, 4.0, PathPointKind::MoveTo),
                PathPoint::new(13.0, 6.0, PathPointKind::QuadTo),
                PathPoint::new(8.0, 24.0, PathPointKind::LineTo),
            ],
        );
        let bounds = stroke.bounds();
        assert!((bounds.width - 10.0).abs() < f32::EPSILON);
        assert!((bounds.height - 20.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_validate_catches_deserialized_extents() {
        let json = serde_json::to_string(&rect())
            .expect("serialize")
            .replace("\"height\":40.0", "\"height\":-40.0");
        let shape: Shape = serde_json::from_str(&json).expect("still well-formed");
        assert!(matches!(shape.validate(), Err(SketchError::InvalidExtent(_))));
        assert!(rect().validate().is_ok());
    }

    #[test]
    fn test_thickness_from_numeric_level() {
        assert_eq!(Thickness::try_from(2).expect("medium"), Thickness::Medium);
        assert!(Thickness::try_from(4).is_err());
        assert!((Thickness::Bold.width() - 3.0).abs() < f32::EPSILON);
    }
}
