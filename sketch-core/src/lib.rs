//! # Sketchboard Core
//!
//! Shape model and drawing-session state for a vector drawing board.
//! Compiles to WASM so the browser host can drive it directly.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               sketch-core                   │
//! ├─────────────────────────────────────────────┤
//! │  Shape Model     │  Session                 │
//! │  - Circle        │  - Ordered snapshot      │
//! │  - Rectangle     │  - Tool mode             │
//! │  - Line          │  - Color / thickness     │
//! │  - Freehand path │  - Toolbar actions       │
//! ├─────────────────────────────────────────────┤
//! │  Render Binding (ShapeId <-> surface handle)│
//! │  - Gesture events -> session mutations      │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod adapter;
pub mod config;
pub mod error;
pub mod session;
pub mod shape;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use action::{toolbar, Action, ActionOutcome, Control, DropdownOption};
pub use adapter::{EventOutcome, RenderBinding, SurfaceEvent, SyncReport};
pub use config::BoardConfig;
pub use error::{SketchError, SketchResult};
pub use session::{ResizeParams, Session, SessionDocument, ToolMode};
pub use shape::{
    Bounds, Color, Geometry, PathPoint, PathPointKind, Position, Shape, ShapeId, ShapeKind,
    Thickness,
};

/// Sketch core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
