use serde::{Deserialize, Serialize};

mod style;

pub use style::{BACKGROUND_COLOR, ColorParseError, Ink, Style, parse_color};

/// The drawing tools available on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Tool {
    #[default]
    Brush,
    Eraser,
    Rectangle,
    Circle,
    Triangle,
    Line,
    Star,
}

impl Tool {
    pub const ALL: [Tool; 7] = [
        Tool::Brush,
        Tool::Eraser,
        Tool::Rectangle,
        Tool::Circle,
        Tool::Triangle,
        Tool::Line,
        Tool::Star,
    ];

    /// Lowercase name used by controls and settings
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Brush => "brush",
            Tool::Eraser => "eraser",
            Tool::Rectangle => "rectangle",
            Tool::Circle => "circle",
            Tool::Triangle => "triangle",
            Tool::Line => "line",
            Tool::Star => "star",
        }
    }

    /// Label shown in the tools panel
    pub fn label(&self) -> &'static str {
        match self {
            Tool::Brush => "🖌 Brush",
            Tool::Eraser => "⌫ Eraser",
            Tool::Rectangle => "▭ Rectangle",
            Tool::Circle => "◯ Circle",
            Tool::Triangle => "△ Triangle",
            Tool::Line => "╱ Line",
            Tool::Star => "☆ Star",
        }
    }

    pub fn from_name(name: &str) -> Option<Tool> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Freehand tools paint incremental segments instead of an anchor-based preview
    pub fn is_freehand(&self) -> bool {
        matches!(self, Tool::Brush | Tool::Eraser)
    }
}

/// What the user picked in the tool selector.
///
/// Selections arriving by name may not match any known tool; those are kept
/// so the UI can show them, but they paint nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolSelection {
    Known(Tool),
    Unrecognized(String),
}

impl Default for ToolSelection {
    fn default() -> Self {
        Self::Known(Tool::default())
    }
}

impl ToolSelection {
    pub fn from_name(name: &str) -> Self {
        match Tool::from_name(name) {
            Some(tool) => Self::Known(tool),
            None => Self::Unrecognized(name.to_owned()),
        }
    }

    pub fn tool(&self) -> Option<Tool> {
        match self {
            Self::Known(tool) => Some(*tool),
            Self::Unrecognized(_) => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Known(tool) => tool.name(),
            Self::Unrecognized(name) => name,
        }
    }
}

impl From<Tool> for ToolSelection {
    fn from(tool: Tool) -> Self {
        Self::Known(tool)
    }
}
