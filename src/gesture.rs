//! The press → move* → release state machine behind every stroke and shape.
//!
//! # State Transitions
//!
//! ```text
//!              press (records undo snapshot)
//!   ┌────────┐ ─────────────────────────────► ┌────────────┐
//!   │  Idle  │                                │  Dragging  │ ◄─┐ move
//!   └────────┘ ◄───────────────────────────── └────────────┘ ──┘ (paint / preview)
//!      ▲  │      release, or abandon on
//!      └──┘      clear / undo
//!      move (ignored)
//! ```
//!
//! Freehand tools paint a segment from the previous pointer position on every move, so the
//! stroke accumulates. Shape tools first restore the snapshot taken at press and then paint
//! the shape from the anchor to the current pointer, so only the latest preview frame is ever
//! visible. Release has nothing to finalize: whatever the last move painted is the result, and
//! the press snapshot stays on the history as the undo target.
use egui::Pos2;

use crate::geometry;
use crate::history::SnapshotHistory;
use crate::surface::Surface;
use crate::tools::{Style, ToolSelection};

/// Data for a gesture in progress
#[derive(Debug, Clone)]
pub struct Gesture {
    /// Where the pointer went down
    pub anchor: Pos2,
    /// Most recent pointer position; start of the next freehand segment
    pub last: Pos2,
    /// Paint settings captured at press
    pub style: Style,
}

/// The possible states of the gesture controller
#[derive(Debug, Clone, Default)]
pub enum GestureState {
    /// No pointer held down
    #[default]
    Idle,
    /// Pointer held down on the canvas
    Dragging(Gesture),
}

impl GestureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, GestureState::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, GestureState::Dragging(_))
    }

    /// Returns the active gesture, if any
    pub fn gesture(&self) -> Option<&Gesture> {
        match self {
            GestureState::Dragging(gesture) => Some(gesture),
            GestureState::Idle => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GestureState::Idle => "Idle",
            GestureState::Dragging(_) => "Dragging",
        }
    }
}

/// Drives one gesture at a time against a surface and its history
#[derive(Debug, Default)]
pub struct GestureController {
    state: GestureState,
}

impl GestureController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging()
    }

    /// Start a gesture at `point`.
    ///
    /// Pushes the current surface onto the history before anything is painted.
    /// Returns false if a gesture is already in progress.
    pub fn press(
        &mut self,
        point: Pos2,
        style: Style,
        surface: &Surface,
        history: &mut SnapshotHistory,
    ) -> bool {
        if self.state.is_dragging() {
            log::warn!("Ignoring press at {point:?}: a gesture is already in progress");
            return false;
        }

        history.record_before_mutation(surface);
        self.state = GestureState::Dragging(Gesture {
            anchor: point,
            last: point,
            style,
        });
        log::debug!("Gesture started at {point:?}");
        true
    }

    /// Advance the gesture to `point` and paint.
    ///
    /// Shape previews restore the top of `history`, which is the snapshot taken at press
    /// as long as the gesture is alive. Returns true if the surface was painted. Moves while
    /// idle and moves with an unrecognized tool selected paint nothing.
    pub fn move_to(
        &mut self,
        point: Pos2,
        tool: &ToolSelection,
        surface: &mut Surface,
        history: &SnapshotHistory,
    ) -> bool {
        let GestureState::Dragging(gesture) = &mut self.state else {
            return false;
        };
        let Some(tool) = tool.tool() else {
            log::trace!("No paint for unrecognized tool {:?}", tool.name());
            return false;
        };

        let ink = gesture.style.ink_for(tool);
        if tool.is_freehand() {
            surface.stroke_or_fill(&geometry::brush_segment(gesture.last, point), &ink);
        } else if let Some(path) = geometry::shape_for_tool(tool, gesture.anchor, point) {
            match history.top() {
                Some(before) => {
                    surface.restore(before);
                }
                None => log::warn!("No pre-gesture snapshot to preview against"),
            }
            surface.stroke_or_fill(&path, &ink);
        }
        gesture.last = point;
        true
    }

    /// End the gesture. Returns false if there was none.
    pub fn release(&mut self) -> bool {
        match std::mem::take(&mut self.state) {
            GestureState::Dragging(gesture) => {
                log::debug!("Gesture committed from {:?} to {:?}", gesture.anchor, gesture.last);
                true
            }
            GestureState::Idle => false,
        }
    }

    /// Drop an in-progress gesture without touching the surface
    pub fn abandon(&mut self) {
        if self.state.is_dragging() {
            log::debug!("Gesture abandoned");
        }
        self.state = GestureState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::Tool;
    use egui::pos2;

    #[test]
    fn press_then_release_round_trips_states() {
        let mut controller = GestureController::new();
        let mut history = SnapshotHistory::new();
        let surface = Surface::new(8, 8);

        assert!(controller.state().is_idle());
        assert!(controller.press(pos2(1.0, 1.0), Style::default(), &surface, &mut history));
        assert_eq!(controller.state().name(), "Dragging");
        assert_eq!(history.len(), 1);

        assert!(!controller.press(pos2(2.0, 2.0), Style::default(), &surface, &mut history));
        assert_eq!(history.len(), 1);

        assert!(controller.release());
        assert!(!controller.release());
    }

    #[test]
    fn move_while_idle_paints_nothing() {
        let mut controller = GestureController::new();
        let mut surface = Surface::new(8, 8);
        let revision = surface.revision();
        let history = SnapshotHistory::new();
        assert!(!controller.move_to(pos2(3.0, 3.0), &Tool::Brush.into(), &mut surface, &history));
        assert_eq!(surface.revision(), revision);
    }

    #[test]
    fn shape_preview_restores_press_snapshot() {
        let mut controller = GestureController::new();
        let mut history = SnapshotHistory::new();
        let mut surface = Surface::new(16, 16);
        let tool = Tool::Rectangle.into();
        controller.press(pos2(2.0, 2.0), Style::default(), &surface, &mut history);

        controller.move_to(pos2(14.0, 14.0), &tool, &mut surface, &history);
        controller.move_to(pos2(6.0, 6.0), &tool, &mut surface, &history);

        let mut expected = Surface::new(16, 16);
        expected.stroke_or_fill(
            &geometry::rectangle(pos2(2.0, 2.0), pos2(6.0, 6.0)),
            &Style::default().ink_for(Tool::Rectangle),
        );
        assert_eq!(surface.snapshot(), expected.snapshot());
        assert_eq!(history.len(), 1);
    }
}
