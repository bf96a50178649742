use egui::Color32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Tool;

/// Color every surface starts with and every clear goes back to
pub const BACKGROUND_COLOR: Color32 = Color32::WHITE;

const DEFAULT_STROKE_WIDTH: f32 = 5.0;
const MIN_STROKE_WIDTH: f32 = 0.1;

/// Errors that can occur when parsing a color string
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("Invalid hex color: {0}")]
    InvalidHex(String),
    #[error("Invalid rgb() color: {0}")]
    InvalidRgb(String),
    #[error("Unknown color name: {0}")]
    UnknownName(String),
}

/// Brush settings shared by every tool
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub stroke_width: f32,
    pub color: Color32,
    pub fill_enabled: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            stroke_width: DEFAULT_STROKE_WIDTH,
            color: Color32::BLACK,
            fill_enabled: false,
        }
    }
}

impl Style {
    /// Set the stroke width. Non-positive or non-finite values are clamped to a hairline.
    pub fn set_stroke_width(&mut self, width: f32) {
        self.stroke_width = if width.is_finite() {
            width.max(MIN_STROKE_WIDTH)
        } else {
            MIN_STROKE_WIDTH
        };
    }

    /// Set the paint color. The surface is always opaque, so alpha is dropped.
    pub fn set_color(&mut self, color: Color32) {
        self.color = opaque(color);
    }

    /// The concrete paint a tool lays down with this style
    pub fn ink_for(&self, tool: Tool) -> Ink {
        match tool {
            Tool::Eraser => Ink {
                color: BACKGROUND_COLOR,
                width: self.stroke_width,
                fill: false,
            },
            Tool::Brush | Tool::Line => Ink {
                color: opaque(self.color),
                width: self.stroke_width,
                fill: false,
            },
            Tool::Rectangle | Tool::Circle | Tool::Triangle | Tool::Star => Ink {
                color: opaque(self.color),
                width: self.stroke_width,
                fill: self.fill_enabled,
            },
        }
    }
}

/// Resolved paint parameters for a single paint operation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ink {
    pub color: Color32,
    pub width: f32,
    /// Fill closed shapes instead of outlining them
    pub fill: bool,
}

fn opaque(color: Color32) -> Color32 {
    Color32::from_rgb(color.r(), color.g(), color.b())
}

/// Parse `#rgb`, `#rrggbb`, `rgb(r, g, b)` or a CSS color name into an opaque color
pub fn parse_color(input: &str) -> Result<Color32, ColorParseError> {
    let text = input.trim();

    if let Some(hex) = text.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| ColorParseError::InvalidHex(text.to_owned()));
    }

    let lower = text.to_ascii_lowercase();
    if let Some(args) = lower.strip_prefix("rgb(").and_then(|rest| rest.strip_suffix(')')) {
        return parse_rgb_args(args).ok_or_else(|| ColorParseError::InvalidRgb(text.to_owned()));
    }

    named_color(&lower).ok_or_else(|| ColorParseError::UnknownName(text.to_owned()))
}

fn parse_hex(hex: &str) -> Option<Color32> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|d| d * 17);
            Some(Color32::from_rgb(digit(0)?, digit(1)?, digit(2)?))
        }
        6 => {
            let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            Some(Color32::from_rgb(byte(0)?, byte(2)?, byte(4)?))
        }
        _ => None,
    }
}

fn parse_rgb_args(args: &str) -> Option<Color32> {
    let channels: Vec<u8> = args
        .split(',')
        .map(|part| part.trim().parse::<u8>().ok())
        .collect::<Option<_>>()?;
    match channels.as_slice() {
        [r, g, b] => Some(Color32::from_rgb(*r, *g, *b)),
        _ => None,
    }
}

fn named_color(name: &str) -> Option<Color32> {
    let color = match name {
        "black" => Color32::from_rgb(0, 0, 0),
        "white" => Color32::from_rgb(255, 255, 255),
        "red" => Color32::from_rgb(255, 0, 0),
        "green" => Color32::from_rgb(0, 128, 0),
        "lime" => Color32::from_rgb(0, 255, 0),
        "blue" => Color32::from_rgb(0, 0, 255),
        "yellow" => Color32::from_rgb(255, 255, 0),
        "orange" => Color32::from_rgb(255, 165, 0),
        "purple" => Color32::from_rgb(128, 0, 128),
        "gray" | "grey" => Color32::from_rgb(128, 128, 128),
        "brown" => Color32::from_rgb(165, 42, 42),
        "pink" => Color32::from_rgb(255, 192, 203),
        "cyan" | "aqua" => Color32::from_rgb(0, 255, 255),
        "magenta" | "fuchsia" => Color32::from_rgb(255, 0, 255),
        _ => return None,
    };
    Some(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_hex() {
        assert_eq!(parse_color("#000"), Ok(Color32::BLACK));
        assert_eq!(parse_color("#fff"), Ok(Color32::WHITE));
        assert_eq!(parse_color("#1e90ff"), Ok(Color32::from_rgb(0x1e, 0x90, 0xff)));
        assert!(matches!(parse_color("#12345"), Err(ColorParseError::InvalidHex(_))));
        assert!(matches!(parse_color("#ggg"), Err(ColorParseError::InvalidHex(_))));
    }

    #[test]
    fn parses_rgb_function_and_names() {
        assert_eq!(parse_color("rgb(10, 20, 30)"), Ok(Color32::from_rgb(10, 20, 30)));
        assert_eq!(parse_color("Red"), Ok(Color32::from_rgb(255, 0, 0)));
        assert!(matches!(parse_color("rgb(1,2)"), Err(ColorParseError::InvalidRgb(_))));
        assert!(matches!(parse_color("rgb(1,2,300)"), Err(ColorParseError::InvalidRgb(_))));
        assert!(matches!(parse_color("chartreuse-ish"), Err(ColorParseError::UnknownName(_))));
    }

    #[test]
    fn eraser_ink_uses_background() {
        let style = Style {
            fill_enabled: true,
            ..Style::default()
        };
        let ink = style.ink_for(Tool::Eraser);
        assert_eq!(ink.color, BACKGROUND_COLOR);
        assert!(!ink.fill);
        assert!(style.ink_for(Tool::Circle).fill);
        assert!(!style.ink_for(Tool::Line).fill);
    }

    #[test]
    fn width_and_color_setters_sanitize() {
        let mut style = Style::default();
        style.set_stroke_width(-3.0);
        assert_eq!(style.stroke_width, MIN_STROKE_WIDTH);
        style.set_stroke_width(12.0);
        assert_eq!(style.stroke_width, 12.0);

        style.set_color(Color32::from_rgba_unmultiplied(10, 20, 30, 40));
        assert_eq!(style.color.a(), 255);
    }
}
