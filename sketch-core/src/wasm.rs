//! WebAssembly bindings for sketch-core.
//!
//! This module provides JavaScript-callable functions when compiled to WASM.

use wasm_bindgen::prelude::*;

use crate::{Action, ActionOutcome, BoardConfig, Position, Session, ShapeKind};

/// Initialize the sketchboard WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

fn parse_kind(kind: &str) -> Result<ShapeKind, String> {
    serde_json::from_value(serde_json::Value::String(kind.to_string()))
        .map_err(|e| format!("Unknown shape kind `{kind}`: {e}"))
}

/// Board session instance for WASM.
#[wasm_bindgen]
pub struct WasmBoard {
    session: Session,
}

#[wasm_bindgen]
impl WasmBoard {
    /// Create a board with the given surface size.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            session: Session::new(BoardConfig::default().with_size(width, height)),
        }
    }

    /// Create a shape of `kind` (`circle`, `rectangle`, `line`) and return its ID.
    ///
    /// # Errors
    ///
    /// Returns an error string for unknown or unsupported kinds.
    #[wasm_bindgen(js_name = createShape)]
    pub fn create_shape(&mut self, kind: &str, x: f32, y: f32) -> Result<String, String> {
        let kind = parse_kind(kind)?;
        self.session
            .create_shape(kind, Position::new(x, y))
            .map(|id| id.to_string())
            .map_err(|e| e.to_string())
    }

    /// Apply a toolbar action serialized as JSON.
    ///
    /// Returns `true` when the host should export the board.
    ///
    /// # Errors
    ///
    /// Returns an error string if parsing or the action fails.
    #[wasm_bindgen(js_name = applyAction)]
    pub fn apply_action(&mut self, json: &str) -> Result<bool, String> {
        let action: Action = serde_json::from_str(json).map_err(|e| e.to_string())?;
        let outcome = self.session.apply(action).map_err(|e| e.to_string())?;
        Ok(outcome == ActionOutcome::ExportRequested)
    }

    /// Whether pointer gestures currently record freehand strokes.
    #[wasm_bindgen(js_name = isDrawable)]
    #[must_use]
    pub fn is_drawable(&self) -> bool {
        self.session.is_drawable()
    }

    /// Revision counter of the shape collection.
    #[wasm_bindgen(js_name = getRevision)]
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.session.revision()
    }

    /// Get the current session as JSON.
    #[wasm_bindgen(js_name = getSessionJson)]
    #[must_use]
    pub fn get_session_json(&self) -> String {
        self.session.to_json().unwrap_or_default()
    }

    /// Replace the session from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error string if JSON parsing fails.
    #[wasm_bindgen(js_name = loadSessionJson)]
    pub fn load_session_json(&mut self, json: &str) -> Result<(), String> {
        self.session = Session::from_json(json).map_err(|e| e.to_string())?;
        Ok(())
    }

    /// Remove every shape.
    pub fn clear(&mut self) {
        self.session.clear();
    }
}

impl Default for WasmBoard {
    fn default() -> Self {
        let config = BoardConfig::default();
        Self::new(config.width, config.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasm_board_creates_shapes() {
        let mut board = WasmBoard::default();
        let id = board.create_shape("circle", 10.0, 20.0).expect("circle");
        assert!(!id.is_empty());
        assert_eq!(board.revision(), 1);
    }

    #[test]
    fn wasm_board_rejects_freehand_and_unknown_kinds() {
        let mut board = WasmBoard::default();
        assert!(board.create_shape("freehand_path", 0.0, 0.0).is_err());
        assert!(board.create_shape("hexagon", 0.0, 0.0).is_err());
    }

    #[test]
    fn apply_action_reports_export() {
        let mut board = WasmBoard::default();
        assert!(!board
            .apply_action(r#"{"action":"toggle_draw_mode"}"#)
            .expect("toggle"));
        assert!(board.is_drawable());
        assert!(board.apply_action(r#"{"action":"export"}"#).expect("export"));
    }

    #[test]
    fn session_json_roundtrip() {
        let mut board = WasmBoard::new(300, 200);
        board.create_shape("line", 1.0, 2.0).expect("line");
        let json = board.get_session_json();
        let mut other = WasmBoard::default();
        other.load_session_json(&json).expect("load");
        assert_eq!(other.get_session_json(), json);
    }

    #[test]
    fn load_session_json_rejects_invalid_json() {
        let mut board = WasmBoard::default();
        assert!(board.load_session_json("{ not valid json }").is_err());
    }

    #[test]
    fn load_session_json_rejects_invalid_shapes() {
        let mut board = WasmBoard::default();
        board.create_shape("rectangle", 0.0, 0.0).expect("rectangle");
        let json = board
            .get_session_json()
            .replace("\"width\":50.0", "\"width\":-1.0");

        let mut other = WasmBoard::default();
        assert!(other.load_session_json(&json).is_err());
        assert_eq!(other.revision(), 0);
    }
}
