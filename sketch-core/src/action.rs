//! Named board operations bound to toolbar controls.

use serde::{Deserialize, Serialize};

use crate::shape::{Color, Position, ShapeId, ShapeKind, Thickness};
use crate::{Session, SketchResult};

/// Where toolbar-created shapes are placed.
pub const TOOLBAR_ORIGIN: Position = Position::new(0.0, 0.0);

/// A toolbar action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "snake_case")]
pub enum Action {
    /// Place a new shape of this kind at the board origin.
    CreateShape(ShapeKind),
    /// Flip freehand drawing on or off.
    ToggleDrawMode,
    /// Change the session thickness.
    SetThickness(Thickness),
    /// Change the session color.
    SetColor(Color),
    /// Ask the host to export the board as an image.
    Export,
}

/// What applying an action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// A shape was added to the board.
    Created(ShapeId),
    /// Tool configuration changed; the shape collection did not.
    Configured,
    /// The host should export the current board.
    ExportRequested,
}

impl Session {
    /// Apply a toolbar action.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Session::create_shape`].
    pub fn apply(&mut self, action: Action) -> SketchResult<ActionOutcome> {
        tracing::debug!("Applying action {action:?}");
        match action {
            Action::CreateShape(kind) => self
                .create_shape(kind, TOOLBAR_ORIGIN)
                .map(ActionOutcome::Created),
            Action::ToggleDrawMode => {
                self.toggle_draw_mode();
                Ok(ActionOutcome::Configured)
            }
            Action::SetThickness(thickness) => {
                self.set_thickness(thickness);
                Ok(ActionOutcome::Configured)
            }
            Action::SetColor(color) => {
                self.set_color(color);
                Ok(ActionOutcome::Configured)
            }
            Action::Export => Ok(ActionOutcome::ExportRequested),
        }
    }
}

/// One entry of a dropdown control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownOption {
    /// Visible label.
    pub label: &'static str,
    /// Action fired when the option is picked.
    pub action: Action,
}

/// A toolbar control descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    /// A button firing a single action.
    Button {
        /// Control name, also used as accessible label.
        name: &'static str,
        /// Action fired on click.
        action: Action,
    },
    /// A dropdown with a fixed set of options.
    Dropdown {
        /// Control name.
        name: &'static str,
        /// Options in display order.
        options: Vec<DropdownOption>,
    },
}

impl Control {
    /// Control name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Button { name, .. } | Self::Dropdown { name, .. } => *name,
        }
    }
}

fn thickness_label(thickness: Thickness) -> &'static str {
    match thickness {
        Thickness::Light => "Thickness 1",
        Thickness::Medium => "Thickness 2",
        Thickness::Bold => "Thickness 3",
    }
}

fn color_label(color: Color) -> &'static str {
    match color {
        Color::Black => "Black",
        Color::Blue => "Blue",
        Color::Red => "Red",
        Color::Yellow => "Yellow",
    }
}

/// The toolbar in display order.
#[must_use]
pub fn toolbar() -> Vec<Control> {
    vec![
        Control::Button {
            name: "Circle",
            action: Action::CreateShape(ShapeKind::Circle),
        },
        Control::Button {
            name: "Rectangle",
            action: Action::CreateShape(ShapeKind::Rectangle),
        },
        Control::Button {
            name: "Line",
            action: Action::CreateShape(ShapeKind::Line),
        },
        Control::Button {
            name: "Brush",
            action: Action::ToggleDrawMode,
        },
        Control::Dropdown {
            name: "Thickness",
            options: Thickness::ALL
                .iter()
                .map(|&t| DropdownOption {
                    label: thickness_label(t),
                    action: Action::SetThickness(t),
                })
                .collect(),
        },
        Control::Dropdown {
            name: "Color",
            options: Color::ALL
                .iter()
                .map(|&c| DropdownOption {
                    label: color_label(c),
                    action: Action::SetColor(c),
                })
                .collect(),
        },
        Control::Button {
            name: "Save",
            action: Action::Export,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toolbar_layout() {
        let names: Vec<_> = toolbar().iter().map(Control::name).collect();
        assert_eq!(
            names,
            ["Circle", "Rectangle", "Line", "Brush", "Thickness", "Color", "Save"]
        );
    }

    #[test]
    fn test_color_dropdown_offers_palette() {
        let controls = toolbar();
        let Some(Control::Dropdown { options, .. }) = controls.iter().find(|c| c.name() == "Color")
        else {
            panic!("color dropdown missing");
        };
        let actions: Vec<_> = options.iter().map(|o| o.action).collect();
        assert_eq!(
            actions,
            Color::ALL.map(Action::SetColor).to_vec(),
        );
    }

    #[test]
    fn test_apply_create_places_at_origin() {
        let mut session = Session::default();
        let outcome = session
            .apply(Action::CreateShape(ShapeKind::Rectangle))
            .expect("create");
        let ActionOutcome::Created(id) = outcome else {
            panic!("expected a created shape, got {outcome:?}");
        };
        assert_eq!(session.shape(id).map(|s| s.position()), Some(TOOLBAR_ORIGIN));
    }

    #[test]
    fn test_apply_configuration_actions() {
        let mut session = Session::default();
        assert_eq!(
            session.apply(Action::SetColor(Color::Blue)).expect("color"),
            ActionOutcome::Configured
        );
        session
            .apply(Action::SetThickness(Thickness::Medium))
            .expect("thickness");
        session.apply(Action::ToggleDrawMode).expect("toggle");

        assert_eq!(session.color(), Color::Blue);
        assert_eq!(session.thickness(), Thickness::Medium);
        assert!(session.is_drawable());
        assert!(session.is_empty());
    }

    #[test]
    fn test_export_does_not_touch_state() {
        let mut session = Session::default();
        let before = session.revision();
        assert_eq!(
            session.apply(Action::Export).expect("export"),
            ActionOutcome::ExportRequested
        );
        assert_eq!(session.revision(), before);
    }

    #[test]
    fn test_action_json_shape() {
        let action: Action =
            serde_json::from_str(r#"{"action":"set_color","value":"red"}"#).expect("parse");
        assert_eq!(action, Action::SetColor(Color::Red));
        let toggle: Action = serde_json::from_str(r#"{"action":"toggle_draw_mode"}"#).expect("parse");
        assert_eq!(toggle, Action::ToggleDrawMode);
    }
}
