//! # Sketchboard Renderer
//!
//! Turns a drawing session into a picture.
//!
//! ## Export Pipeline
//!
//! ```text
//! ┌──────────┐    ┌───────────┐    ┌──────────────────┐
//! │ Session  │ -> │ SVG text  │ -> │ resvg/tiny-skia  │ -> PNG
//! │ snapshot │    │ (always)  │    │ (`png` feature)  │
//! └──────────┘    └───────────┘    └──────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod export;

pub use error::{RenderError, RenderResult};
pub use export::{BoardExporter, ExportConfig, ExportFormat, DEFAULT_FILE_NAME};
