//! Binding between a session and an external rendering surface.
//!
//! The surface draws shapes as its own objects, addressed by opaque handles.
//! [`RenderBinding`] keeps the `ShapeId <-> handle` side table and turns
//! gestures reported by the surface back into session mutations.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::shape::{Color, PathPoint, Position, Shape, ShapeId, ShapeKind, Thickness};
use crate::{ResizeParams, Session, SketchError, SketchResult};

/// A gesture reported by the rendering surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SurfaceEvent<H> {
    /// A drawn object is being dragged.
    ObjectMoving {
        /// Object being dragged.
        handle: H,
        /// New left edge, if the surface reported one.
        #[serde(default)]
        left: Option<f32>,
        /// New top edge, if the surface reported one.
        #[serde(default)]
        top: Option<f32>,
    },
    /// A drawn object is being scaled with its transform handles.
    ObjectScaling {
        /// Object being scaled.
        handle: H,
        /// Left edge of the object's bounding rect.
        bounds_left: f32,
        /// Top edge of the object's bounding rect.
        bounds_top: f32,
        /// Width after scaling.
        scaled_width: f32,
        /// Height after scaling.
        scaled_height: f32,
        /// First corner, reported for line objects.
        #[serde(default)]
        line_from: Option<Position>,
        /// Opposite corner, reported for line objects.
        #[serde(default)]
        line_to: Option<Position>,
        /// Horizontal radius, reported for circle objects.
        #[serde(default)]
        radius: Option<f32>,
    },
    /// A freehand gesture completed and the surface created a path object.
    PathFinished {
        /// Path object the surface created for the stroke.
        handle: H,
        /// Brush color.
        color: Color,
        /// Brush thickness, if the surface reported one.
        #[serde(default)]
        thickness: Option<Thickness>,
        /// Left edge of the path object.
        #[serde(default)]
        left: Option<f32>,
        /// Top edge of the path object.
        #[serde(default)]
        top: Option<f32>,
        /// Recorded points.
        #[serde(default)]
        path: Vec<PathPoint>,
    },
}

/// What handling a surface event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The shape was moved.
    Moved(ShapeId),
    /// The shape was resized.
    Resized(ShapeId),
    /// A freehand stroke was added to the session.
    StrokeAdded(ShapeId),
    /// The event did not map onto the session.
    Ignored,
}

/// Result of reconciling the side table with a session snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport<H> {
    /// Shapes that received a new handle, in paint order.
    pub created: Vec<ShapeId>,
    /// Handles whose shapes are gone; the surface should drop them.
    pub removed: Vec<H>,
}

impl<H> Default for SyncReport<H> {
    fn default() -> Self {
        Self {
            created: Vec::new(),
            removed: Vec::new(),
        }
    }
}

impl<H> SyncReport<H> {
    /// Whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.removed.is_empty()
    }
}

/// Side table mapping shapes to surface handles.
#[derive(Debug, Clone)]
pub struct RenderBinding<H> {
    by_shape: HashMap<ShapeId, H>,
    by_handle: HashMap<H, ShapeId>,
    last_snapshot: Option<Arc<Vec<Shape>>>,
}

impl<H> Default for RenderBinding<H> {
    fn default() -> Self {
        Self {
            by_shape: HashMap::new(),
            by_handle: HashMap::new(),
            last_snapshot: None,
        }
    }
}

impl<H> RenderBinding<H>
where
    H: Clone + Eq + Hash,
{
    /// Create an empty binding.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle bound to a shape.
    #[must_use]
    pub fn handle(&self, id: ShapeId) -> Option<&H> {
        self.by_shape.get(&id)
    }

    /// Shape bound to a handle.
    #[must_use]
    pub fn shape_for(&self, handle: &H) -> Option<ShapeId> {
        self.by_handle.get(handle).copied()
    }

    /// Number of bound shapes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_shape.len()
    }

    /// Check if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_shape.is_empty()
    }

    /// Bind a handle to a shape, replacing any previous binding of either.
    pub fn bind(&mut self, id: ShapeId, handle: H) {
        if let Some(old) = self.by_shape.insert(id, handle.clone()) {
            self.by_handle.remove(&old);
        }
        if let Some(old_id) = self.by_handle.insert(handle, id) {
            if old_id != id {
                self.by_shape.remove(&old_id);
                // the evicted shape needs a fresh handle on the next sync
                self.last_snapshot = None;
            }
        }
    }

    /// Reconcile the side table with the session's current snapshot.
    ///
    /// `create` is called for every unbound shape in paint order. Bindings
    /// whose shapes left the session are dropped and reported. Does nothing
    /// if the snapshot has not changed since the last sync.
    pub fn sync<F>(&mut self, session: &Session, mut create: F) -> SyncReport<H>
    where
        F: FnMut(&Shape) -> H,
    {
        let snapshot = session.snapshot();
        if self
            .last_snapshot
            .as_ref()
            .is_some_and(|last| Arc::ptr_eq(last, &snapshot))
        {
            return SyncReport::default();
        }

        let mut report = SyncReport::default();
        for shape in snapshot.iter() {
            if !self.by_shape.contains_key(&shape.id()) {
                let handle = create(shape);
                self.bind(shape.id(), handle);
                report.created.push(shape.id());
            }
        }

        let stale: Vec<ShapeId> = self
            .by_shape
            .keys()
            .filter(|id| session.shape(**id).is_none())
            .copied()
            .collect();
        for id in stale {
            if let Some(handle) = self.by_shape.remove(&id) {
                self.by_handle.remove(&handle);
                report.removed.push(handle);
            }
        }

        tracing::debug!(
            "Synced render binding: {} created, {} removed",
            report.created.len(),
            report.removed.len()
        );
        self.last_snapshot = Some(snapshot);
        report
    }

    /// Apply a surface gesture to the session.
    ///
    /// Gestures on handles the table does not know, or on shapes the session
    /// no longer holds, are ignored: the surface may be ahead of the last sync.
    ///
    /// # Errors
    ///
    /// Propagates contract violations from the session, such as a negative
    /// extent reported by a scale gesture.
    pub fn handle_event(
        &mut self,
        session: &mut Session,
        event: SurfaceEvent<H>,
    ) -> SketchResult<EventOutcome> {
        match event {
            SurfaceEvent::ObjectMoving { handle, left, top } => {
                let Some(shape) = self.lookup(session, &handle) else {
                    return Ok(EventOutcome::Ignored);
                };
                let current = shape.position();
                let id = shape.id();
                let position = Position::new(left.unwrap_or(current.x), top.unwrap_or(current.y));
                ignore_missing(session.reposition(id, position), EventOutcome::Moved(id))
            }
            SurfaceEvent::ObjectScaling {
                handle,
                bounds_left,
                bounds_top,
                scaled_width,
                scaled_height,
                line_from,
                line_to,
                radius,
            } => {
                let Some(shape) = self.lookup(session, &handle) else {
                    return Ok(EventOutcome::Ignored);
                };
                let id = shape.id();
                if shape.kind() == ShapeKind::FreehandPath {
                    tracing::trace!("Ignoring scale gesture on freehand path {id}");
                    return Ok(EventOutcome::Ignored);
                }
                let params = ResizeParams {
                    position: Position::new(bounds_left, bounds_top),
                    width: Some(scaled_width),
                    height: Some(scaled_height),
                    from: line_from,
                    to: line_to,
                    radius,
                };
                ignore_missing(session.resize(id, &params), EventOutcome::Resized(id))
            }
            SurfaceEvent::PathFinished {
                handle,
                color,
                thickness,
                left,
                top,
                path,
            } => {
                if !session.is_drawable() {
                    tracing::trace!("Ignoring finished path outside draw mode");
                    return Ok(EventOutcome::Ignored);
                }
                let stroke = Shape::freehand(
                    color,
                    thickness.unwrap_or_default(),
                    Position::new(left.unwrap_or(0.0), top.unwrap_or(0.0)),
                    path,
                );
                session.set_tool_mode(false);
                let id = session.add_freehand_path(stroke)?;
                self.bind(id, handle);
                Ok(EventOutcome::StrokeAdded(id))
            }
        }
    }

    fn lookup<'s>(&self, session: &'s Session, handle: &H) -> Option<&'s Shape> {
        let Some(id) = self.shape_for(handle) else {
            tracing::trace!("Ignoring event for unbound handle");
            return None;
        };
        let shape = session.shape(id);
        if shape.is_none() {
            tracing::trace!("Ignoring event for shape {id} no longer in session");
        }
        shape
    }
}

fn ignore_missing(result: SketchResult<()>, outcome: EventOutcome) -> SketchResult<EventOutcome> {
    match result {
        Ok(()) => Ok(outcome),
        Err(SketchError::ShapeNotFound(_)) => Ok(EventOutcome::Ignored),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{Geometry, PathPointKind};

    fn bound_session() -> (Session, RenderBinding<u32>, ShapeId) {
        let mut session = Session::default();
        let id = session
            .create_shape(ShapeKind::Rectangle, Position::default())
            .expect("rectangle");
        let mut binding = RenderBinding::new();
        let mut next = 0;
        binding.sync(&session, |_| {
            next += 1;
            next
        });
        (session, binding, id)
    }

    #[test]
    fn test_sync_binds_new_shapes_once() {
        let (mut session, mut binding, first) = bound_session();
        assert_eq!(binding.handle(first), Some(&1));

        let report = binding.sync(&session, |_| 99);
        assert!(report.is_empty());

        let second = session
            .create_shape(ShapeKind::Circle, Position::default())
            .expect("circle");
        let report = binding.sync(&session, |_| 2);
        assert_eq!(report.created, vec![second]);
        assert_eq!(binding.shape_for(&2), Some(second));
        assert_eq!(binding.len(), 2);
    }

    #[test]
    fn test_sync_drops_cleared_shapes() {
        let (mut session, mut binding, _) = bound_session();
        session.clear();
        let report = binding.sync(&session, |_| 0);
        assert_eq!(report.removed, vec![1]);
        assert!(binding.is_empty());
    }

    #[test]
    fn test_moving_falls_back_to_current_coordinates() {
        let (mut session, mut binding, id) = bound_session();
        let outcome = binding
            .handle_event(
                &mut session,
                SurfaceEvent::ObjectMoving {
                    handle: 1,
                    left: Some(12.0),
                    top: None,
                },
            )
            .expect("move");
        assert_eq!(outcome, EventOutcome::Moved(id));
        assert_eq!(
            session.shape(id).map(Shape::position),
            Some(Position::new(12.0, 0.0))
        );
    }

    #[test]
    fn test_unknown_handle_is_ignored() {
        let (mut session, mut binding, _) = bound_session();
        let revision = session.revision();
        let outcome = binding
            .handle_event(
                &mut session,
                SurfaceEvent::ObjectMoving {
                    handle: 42,
                    left: Some(1.0),
                    top: Some(1.0),
                },
            )
            .expect("ignored");
        assert_eq!(outcome, EventOutcome::Ignored);
        assert_eq!(session.revision(), revision);
    }

    #[test]
    fn test_stale_binding_is_ignored() {
        let (mut session, mut binding, _) = bound_session();
        session.clear();
        let outcome = binding
            .handle_event(
                &mut session,
                SurfaceEvent::ObjectScaling {
                    handle: 1,
                    bounds_left: 0.0,
                    bounds_top: 0.0,
                    scaled_width: 10.0,
                    scaled_height: 10.0,
                    line_from: None,
                    line_to: None,
                    radius: None,
                },
            )
            .expect("ignored");
        assert_eq!(outcome, EventOutcome::Ignored);
    }

    #[test]
    fn test_scaling_rectangle_applies_size_and_bounds() {
        let (mut session, mut binding, id) = bound_session();
        binding
            .handle_event(
                &mut session,
                SurfaceEvent::ObjectScaling {
                    handle: 1,
                    bounds_left: 4.0,
                    bounds_top: 5.0,
                    scaled_width: 70.0,
                    scaled_height: 35.0,
                    line_from: None,
                    line_to: None,
                    radius: None,
                },
            )
            .expect("scale");
        let shape = session.shape(id).expect("shape");
        assert_eq!(shape.position(), Position::new(4.0, 5.0));
        assert_eq!(
            shape.geometry(),
            &Geometry::Rectangle {
                width: 70.0,
                height: 35.0
            }
        );
    }

    #[test]
    fn test_finished_path_added_only_in_draw_mode() {
        let mut session = Session::default();
        let mut binding: RenderBinding<u32> = RenderBinding::new();
        let path = vec![
            PathPoint::new(1.0, 1.0, PathPointKind::MoveTo),
            PathPoint::new(5.0, 3.0, PathPointKind::LineTo),
        ];
        let finished = SurfaceEvent::PathFinished {
            handle: 7,
            color: Color::Red,
            thickness: None,
            left: Some(1.0),
            top: Some(1.0),
            path: path.clone(),
        };

        let outcome = binding
            .handle_event(&mut session, finished.clone())
            .expect("ignored");
        assert_eq!(outcome, EventOutcome::Ignored);
        assert!(session.is_empty());

        session.set_tool_mode(true);
        let EventOutcome::StrokeAdded(id) = binding
            .handle_event(&mut session, finished)
            .expect("stroke")
        else {
            panic!("stroke should be added");
        };

        assert!(!session.is_drawable());
        assert_eq!(binding.handle(id), Some(&7));
        let stroke = session.shape(id).expect("stroke");
        assert_eq!(stroke.thickness(), Thickness::Light);
        assert_eq!(stroke.geometry(), &Geometry::FreehandPath { path });

        // the surface already owns an object for the stroke
        assert!(binding.sync(&session, |_| 0).created.is_empty());
    }

    #[test]
    fn test_scaling_freehand_path_is_ignored() {
        let mut session = Session::default();
        let id = session
            .add_freehand_path(Shape::freehand(
                Color::Black,
                Thickness::Light,
                Position::new(2.0, 2.0),
                vec![PathPoint::new(2.0, 2.0, PathPointKind::MoveTo)],
            ))
            .expect("stroke");
        let mut binding = RenderBinding::new();
        binding.bind(id, 5_u32);
        let revision = session.revision();

        let outcome = binding
            .handle_event(
                &mut session,
                SurfaceEvent::ObjectScaling {
                    handle: 5,
                    bounds_left: 40.0,
                    bounds_top: 40.0,
                    scaled_width: 10.0,
                    scaled_height: 10.0,
                    line_from: None,
                    line_to: None,
                    radius: None,
                },
            )
            .expect("ignored");

        assert_eq!(outcome, EventOutcome::Ignored);
        assert_eq!(session.revision(), revision);
        assert_eq!(
            session.shape(id).map(Shape::position),
            Some(Position::new(2.0, 2.0))
        );
    }

    #[test]
    fn test_evicted_shape_is_rebound_on_next_sync() {
        let (mut session, mut binding, first) = bound_session();
        let second = session
            .create_shape(ShapeKind::Circle, Position::default())
            .expect("circle");
        binding.sync(&session, |_| 2);

        // handle 1 moves to the circle; the rectangle loses its binding
        binding.bind(second, 1);
        assert_eq!(binding.handle(first), None);

        let report = binding.sync(&session, |_| 3);
        assert_eq!(report.created, vec![first]);
        assert_eq!(binding.handle(first), Some(&3));
        assert_eq!(binding.handle(second), Some(&1));
    }

    #[test]
    fn test_rebinding_a_handle_releases_old_shape() {
        let mut binding = RenderBinding::new();
        let (a, b) = (ShapeId::new(), ShapeId::new());
        binding.bind(a, "obj");
        binding.bind(b, "obj");
        assert_eq!(binding.shape_for(&"obj"), Some(b));
        assert_eq!(binding.handle(a), None);
        assert_eq!(binding.len(), 1);
    }
}
