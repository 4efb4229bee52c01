//! Board configuration.

use serde::{Deserialize, Serialize};

/// Default board width in pixels.
pub const DEFAULT_BOARD_WIDTH: u32 = 1024;

/// Default board height in pixels.
pub const DEFAULT_BOARD_HEIGHT: u32 = 768;

/// Size and background of the drawing surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Board width in pixels.
    pub width: u32,
    /// Board height in pixels.
    pub height: u32,
    /// Background fill as a CSS color.
    pub background: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_BOARD_WIDTH,
            height: DEFAULT_BOARD_HEIGHT,
            background: "white".to_string(),
        }
    }
}

impl BoardConfig {
    /// Set the board size.
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the background color.
    #[must_use]
    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = background.into();
        self
    }
}
