//! # Sketchboard CLI
//!
//! Headless host for the drawing board. Replays a script of toolbar actions
//! and surface gestures against a fresh session, then saves the picture.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p sketch-cli -- --script board.json --output picture.png
//! ```
//!
//! ## Script format
//!
//! A JSON array of steps. Each step is either a toolbar action or a gesture.
//! Gestures address shapes by their index in paint order:
//!
//! ```json
//! [
//!   { "action": "set_color", "value": "red" },
//!   { "action": "create_shape", "value": "rectangle" },
//!   { "event": "object_moving", "handle": 0, "left": 20, "top": 30 },
//!   { "action": "toggle_draw_mode" },
//!   { "event": "path_finished", "handle": 1, "color": "red",
//!     "path": [{ "x": 0, "y": 0, "kind": "move_to" },
//!              { "x": 40, "y": 10, "kind": "line_to" }] }
//! ]
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use sketch_core::config::{DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH};
use sketch_core::{
    Action, ActionOutcome, BoardConfig, EventOutcome, RenderBinding, Session, SketchResult,
    SurfaceEvent,
};
use sketch_renderer::{BoardExporter, ExportConfig, ExportFormat, DEFAULT_FILE_NAME};

/// Output format selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// PNG image.
    Png,
    /// SVG document.
    Svg,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Png => Self::Png,
            FormatArg::Svg => Self::Svg,
        }
    }
}

/// Command-line arguments for the sketch binary.
#[derive(Debug, Clone, Parser)]
#[command(name = "sketch")]
#[command(about = "Replay a drawing board script and save the picture")]
#[command(version)]
pub struct CliArgs {
    /// JSON script of actions and gestures to replay
    #[arg(long, env = "SKETCH_SCRIPT")]
    pub script: Option<PathBuf>,

    /// Where to write the picture
    #[arg(long, short, default_value = DEFAULT_FILE_NAME)]
    pub output: PathBuf,

    /// Output format (guessed from the output extension if omitted)
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Board width in pixels
    #[arg(long, env = "SKETCH_WIDTH", default_value_t = DEFAULT_BOARD_WIDTH)]
    pub width: u32,

    /// Board height in pixels
    #[arg(long, env = "SKETCH_HEIGHT", default_value_t = DEFAULT_BOARD_HEIGHT)]
    pub height: u32,

    /// Board background as a CSS color
    #[arg(long, default_value = "white")]
    pub background: String,

    /// Pixel scale of the exported picture
    #[arg(long, default_value_t = 1.0)]
    pub scale: f32,

    /// Emit logs as JSON lines
    #[arg(long, env = "SKETCH_LOG_JSON")]
    pub log_json: bool,
}

/// Resolved configuration for one run.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Board the script is replayed on.
    pub board: BoardConfig,
    /// Export settings.
    pub export: ExportConfig,
    /// Script to replay, if any.
    pub script: Option<PathBuf>,
    /// Output path.
    pub output: PathBuf,
    /// Output format.
    pub format: ExportFormat,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            board: BoardConfig::default(),
            export: ExportConfig::default(),
            script: None,
            output: PathBuf::from(DEFAULT_FILE_NAME),
            format: ExportFormat::Png,
        }
    }
}

impl From<CliArgs> for CliConfig {
    fn from(args: CliArgs) -> Self {
        let format = args
            .format
            .map_or_else(|| ExportFormat::from_path(&args.output), ExportFormat::from);
        Self {
            board: BoardConfig::default()
                .with_size(args.width, args.height)
                .with_background(args.background),
            export: ExportConfig {
                scale: args.scale,
                ..ExportConfig::default()
            },
            script: args.script,
            output: args.output,
            format,
        }
    }
}

/// One step of a board script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ScriptStep {
    /// A toolbar action.
    Action(Action),
    /// A gesture on a drawn shape, addressed by paint-order index.
    Gesture(SurfaceEvent<usize>),
}

/// Parse a board script.
///
/// # Errors
///
/// Returns an error if the text is not a JSON array of steps.
pub fn parse_script(text: &str) -> serde_json::Result<Vec<ScriptStep>> {
    serde_json::from_str(text)
}

/// Counts gathered while replaying a script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Steps applied.
    pub steps: usize,
    /// Shapes created from the toolbar.
    pub created: usize,
    /// Freehand strokes added.
    pub strokes: usize,
    /// Gestures that did not map onto a shape.
    pub ignored: usize,
    /// Save requests seen in the script.
    pub export_requests: usize,
}

/// Replays scripted steps against a session.
///
/// Stands in for a rendering surface: every shape gets its paint-order index
/// as its handle.
#[derive(Debug, Default)]
pub struct Replayer {
    binding: RenderBinding<usize>,
    summary: ReplaySummary,
}

impl Replayer {
    /// Create a replayer with an empty side table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts gathered so far.
    #[must_use]
    pub fn summary(&self) -> ReplaySummary {
        self.summary
    }

    /// Apply a single step.
    ///
    /// # Errors
    ///
    /// Propagates session errors, such as a negative extent in a scale gesture.
    pub fn step(&mut self, session: &mut Session, step: ScriptStep) -> SketchResult<()> {
        match step {
            ScriptStep::Action(action) => match session.apply(action)? {
                ActionOutcome::Created(id) => {
                    tracing::debug!("Created shape {id}");
                    self.summary.created += 1;
                }
                ActionOutcome::ExportRequested => {
                    tracing::info!("Script requested a save");
                    self.summary.export_requests += 1;
                }
                ActionOutcome::Configured => {}
            },
            ScriptStep::Gesture(event) => {
                self.sync(session);
                let event = match event {
                    SurfaceEvent::PathFinished {
                        handle,
                        color,
                        thickness,
                        left,
                        top,
                        path,
                    } => {
                        // the stroke takes the next paint-order slot
                        let next = session.len();
                        if handle != next {
                            tracing::warn!("Stroke handle {handle} renumbered to {next}");
                        }
                        SurfaceEvent::PathFinished {
                            handle: next,
                            color,
                            thickness,
                            left,
                            top,
                            path,
                        }
                    }
                    other => other,
                };
                match self.binding.handle_event(session, event)? {
                    EventOutcome::StrokeAdded(_) => self.summary.strokes += 1,
                    EventOutcome::Ignored => self.summary.ignored += 1,
                    EventOutcome::Moved(_) | EventOutcome::Resized(_) => {}
                }
            }
        }
        self.summary.steps += 1;
        Ok(())
    }

    /// Apply every step in order.
    ///
    /// # Errors
    ///
    /// Stops at the first failing step.
    pub fn replay(
        &mut self,
        session: &mut Session,
        steps: impl IntoIterator<Item = ScriptStep>,
    ) -> SketchResult<ReplaySummary> {
        for step in steps {
            self.step(session, step)?;
        }
        self.sync(session);
        Ok(self.summary)
    }

    fn sync(&mut self, session: &Session) {
        let mut next = self.binding.len();
        self.binding.sync(session, |_| {
            let handle = next;
            next += 1;
            handle
        });
    }
}

/// Read a script file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_script(path: &Path) -> anyhow::Result<Vec<ScriptStep>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    parse_script(&text).with_context(|| format!("Invalid script {}", path.display()))
}

/// Replay the configured script and write the picture.
///
/// # Errors
///
/// Returns an error if the script cannot be loaded or replayed, or if the
/// picture cannot be written.
pub fn run(config: &CliConfig) -> anyhow::Result<Session> {
    let mut session = Session::new(config.board.clone());

    if let Some(path) = &config.script {
        let steps = load_script(path)?;
        tracing::info!("Replaying {} steps from {}", steps.len(), path.display());
        let summary = Replayer::new()
            .replay(&mut session, steps)
            .context("Script replay failed")?;
        tracing::info!(
            "Replayed {} steps: {} shapes, {} strokes, {} ignored",
            summary.steps,
            summary.created,
            summary.strokes,
            summary.ignored
        );
    }

    BoardExporter::new(config.export.clone())
        .export_to_file(&session, &config.output, config.format)
        .with_context(|| format!("Failed to save {}", config.output.display()))?;

    Ok(session)
}
