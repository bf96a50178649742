use egui::{Pos2, Rect, pos2};

mod translator;
pub use translator::PointerTranslator;

/// Where an event was delivered, used to decide which listeners see it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTarget {
    /// The drawing canvas itself
    Canvas,
    /// Anywhere else in the window (panels, margins, outside the canvas during a drag)
    Window,
}

/// Phase of a pointer interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Press,
    Move,
    Release,
}

/// A raw pointer reading, before any coordinate conversion.
///
/// Positions are in client (window) coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerSample {
    Mouse { client: Pos2 },
    /// Active touches, in the order the platform reports them
    Touch { touches: Vec<Pos2> },
}

impl PointerSample {
    pub fn mouse(x: f32, y: f32) -> Self {
        Self::Mouse { client: pos2(x, y) }
    }

    pub fn touch(touches: impl IntoIterator<Item = Pos2>) -> Self {
        Self::Touch {
            touches: touches.into_iter().collect(),
        }
    }

    /// The single client position this sample stands for: the mouse position or the first touch
    pub fn client_position(&self) -> Option<Pos2> {
        match self {
            Self::Mouse { client } => Some(*client),
            Self::Touch { touches } => touches.first().copied(),
        }
    }
}

/// A pointer event as delivered to listeners
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub sample: PointerSample,
    pub target: EventTarget,
}

impl PointerEvent {
    pub fn new(phase: PointerPhase, sample: PointerSample, target: EventTarget) -> Self {
        Self {
            phase,
            sample,
            target,
        }
    }
}

/// Convert a pointer sample into surface buffer coordinates.
///
/// `displayed` is the rect the surface occupies on screen and `buffer_size` its size in pixels.
/// A zero-sized display rect falls back to a scale of 1, so the result is always best effort.
/// Returns `None` only when the sample carries no position (a touch with no active touches).
pub fn normalize(sample: &PointerSample, displayed: Rect, buffer_size: [u32; 2]) -> Option<Pos2> {
    let client = sample.client_position()?;
    let scale_x = axis_scale(buffer_size[0], displayed.width());
    let scale_y = axis_scale(buffer_size[1], displayed.height());

    Some(pos2(
        (client.x - displayed.left()) * scale_x,
        (client.y - displayed.top()) * scale_y,
    ))
}

fn axis_scale(buffer_extent: u32, displayed_extent: f32) -> f32 {
    if displayed_extent > 0.0 && displayed_extent.is_finite() {
        buffer_extent as f32 / displayed_extent
    } else {
        1.0
    }
}
