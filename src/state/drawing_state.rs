use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::tools::{Style, Tool, ToolSelection};

/// Everything the UI controls mutate: the active tool and the paint style.
///
/// Not versioned with the history; undo only restores pixels.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawingState {
    pub tool: ToolSelection,
    pub style: Style,
}

impl DrawingState {
    pub fn select_tool(&mut self, tool: Tool) {
        self.tool = ToolSelection::Known(tool);
    }

    /// Select a tool by name. Unknown names are kept and paint nothing.
    pub fn select_tool_named(&mut self, name: &str) {
        self.tool = ToolSelection::from_name(name);
    }

    pub fn set_color(&mut self, color: Color32) {
        self.style.set_color(color);
    }

    pub fn set_stroke_width(&mut self, width: f32) {
        self.style.set_stroke_width(width);
    }

    pub fn set_fill_enabled(&mut self, fill: bool) {
        self.style.fill_enabled = fill;
    }
}
