//! # Toolbar
//!
//! Actions a drawing widget's toolbar can send to its surface. Each button
//! in the rendered toolbar carries its action in a `data-action` attribute,
//! which [`ToolbarAction::parse`] reads back when the button is pressed.

use crate::{CanvasError, Color};
use scrawl_common::DomElement;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Brush,
    Rectangle,
}

impl Tool {
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Brush => "brush",
            Tool::Rectangle => "rectangle",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolbarAction {
    SelectTool(Tool),
    SetColor(Color),
    Undo,
    Redo,
    Save,
}

impl ToolbarAction {
    /// Parse a `data-action` value
    pub fn parse(value: &str) -> Result<Self, CanvasError> {
        let unknown = || CanvasError::UnknownAction(value.to_string());
        match value.split_once(':') {
            Some(("tool", "brush")) => Ok(ToolbarAction::SelectTool(Tool::Brush)),
            Some(("tool", "rectangle")) => Ok(ToolbarAction::SelectTool(Tool::Rectangle)),
            Some(("color", hex)) => Color::from_hex(hex)
                .map(ToolbarAction::SetColor)
                .map_err(|_| unknown()),
            None if value == "undo" => Ok(ToolbarAction::Undo),
            None if value == "redo" => Ok(ToolbarAction::Redo),
            None if value == "save" => Ok(ToolbarAction::Save),
            _ => Err(unknown()),
        }
    }
}

impl fmt::Display for ToolbarAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolbarAction::SelectTool(tool) => write!(f, "tool:{}", tool.name()),
            ToolbarAction::SetColor(color) => write!(f, "color:{}", color),
            ToolbarAction::Undo => f.write_str("undo"),
            ToolbarAction::Redo => f.write_str("redo"),
            ToolbarAction::Save => f.write_str("save"),
        }
    }
}

fn button(action: ToolbarAction, label: &str, active: bool) -> DomElement {
    let element = DomElement::new("button")
        .with_attribute("data-action", action.to_string())
        .with_text(label);
    if active {
        element.set_attribute("class", "active");
    }
    element
}

/// Toolbar with only a save button
pub fn render_save_only() -> DomElement {
    let toolbar = DomElement::new("div").with_attribute("class", "scrawl-toolbar");
    toolbar.append_child(button(ToolbarAction::Save, "Save", false));
    toolbar
}

/// Full toolbar: tools, swatches, history and save
pub fn render_full(palette: &[Color], tool: Tool, color: Color) -> DomElement {
    let toolbar = DomElement::new("div").with_attribute("class", "scrawl-toolbar");

    for (candidate, label) in [(Tool::Brush, "Brush"), (Tool::Rectangle, "Rectangle")] {
        toolbar.append_child(button(ToolbarAction::SelectTool(candidate), label, candidate == tool));
    }
    for swatch in palette {
        let element = button(ToolbarAction::SetColor(*swatch), "", *swatch == color);
        element.set_attribute("style", format!("background: {}", swatch));
        toolbar.append_child(element);
    }
    toolbar.append_child(button(ToolbarAction::Undo, "Undo", false));
    toolbar.append_child(button(ToolbarAction::Redo, "Redo", false));
    toolbar.append_child(button(ToolbarAction::Save, "Save", false));

    toolbar
}
