//! The drawing engine: one surface, its undo history and the gesture driving it.
//!
//! `DrawingEngine` is the single entry point the host talks to. Pointer input arrives in
//! client coordinates and is normalized against the rect the surface is displayed in; control
//! actions are plain setters on the owned [`DrawingState`].
//!
//! Until [`DrawingEngine::mount`] has created a non-empty surface every paint operation, clear
//! and undo is a no-op. That window is a startup race, not an error.
use egui::{Color32, Pos2, Rect};

use crate::gesture::{GestureController, GestureState};
use crate::history::SnapshotHistory;
use crate::input::{self, PointerSample};
use crate::state::DrawingState;
use crate::surface::{Surface, SurfaceError};
use crate::tools::{ColorParseError, Tool, ToolSelection, parse_color};

#[derive(Debug, Default)]
pub struct DrawingEngine {
    surface: Option<Surface>,
    history: SnapshotHistory,
    controller: GestureController,
    state: DrawingState,
    /// Where the surface is drawn on screen, in client coordinates
    display_rect: Option<Rect>,
}

impl DrawingEngine {
    pub fn new(state: DrawingState) -> Self {
        Self {
            state,
            ..Default::default()
        }
    }

    /// Create the surface. The size is fixed for the lifetime of the engine;
    /// later calls are ignored and return false.
    pub fn mount(&mut self, width: u32, height: u32) -> bool {
        if self.surface.is_some() {
            log::warn!("Surface already mounted, ignoring mount at {width}x{height}");
            return false;
        }
        log::info!("Mounting {width}x{height} drawing surface");
        self.surface = Some(Surface::new(width, height));
        true
    }

    pub fn is_mounted(&self) -> bool {
        self.ready_surface().is_some()
    }

    /// Record where the surface is displayed, for pointer normalization
    pub fn set_display_rect(&mut self, rect: Rect) {
        self.display_rect = Some(rect);
    }

    pub fn display_rect(&self) -> Option<Rect> {
        self.display_rect
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn history(&self) -> &SnapshotHistory {
        &self.history
    }

    pub fn state(&self) -> &DrawingState {
        &self.state
    }

    pub fn gesture_state(&self) -> &GestureState {
        self.controller.state()
    }

    pub fn is_dragging(&self) -> bool {
        self.controller.is_dragging()
    }

    pub fn can_undo(&self) -> bool {
        self.is_mounted() && self.history.can_undo()
    }

    fn ready_surface(&self) -> Option<&Surface> {
        self.surface.as_ref().filter(|surface| surface.is_ready())
    }

    fn ready_surface_mut(&mut self) -> Option<&mut Surface> {
        self.surface.as_mut().filter(|surface| surface.is_ready())
    }

    // Controls

    pub fn select_tool(&mut self, tool: Tool) {
        log::info!("Tool selected: {}", tool.name());
        self.state.select_tool(tool);
    }

    pub fn select_tool_named(&mut self, name: &str) {
        self.state.select_tool_named(name);
        if let ToolSelection::Unrecognized(name) = &self.state.tool {
            log::warn!("Unrecognized tool {name:?} selected; pointer moves will not paint");
        }
    }

    pub fn set_color(&mut self, color: Color32) {
        self.state.set_color(color);
    }

    /// Set the color from CSS text such as `#000`, `rgb(0, 0, 0)` or `black`.
    /// Invalid text leaves the color unchanged.
    pub fn set_color_css(&mut self, text: &str) -> Result<Color32, ColorParseError> {
        let color = parse_color(text)?;
        self.set_color(color);
        Ok(color)
    }

    pub fn set_stroke_width(&mut self, width: f32) {
        self.state.set_stroke_width(width);
    }

    pub fn set_fill_enabled(&mut self, fill: bool) {
        self.state.set_fill_enabled(fill);
    }

    /// Replace tool and style at once, e.g. from restored settings
    pub fn set_drawing_state(&mut self, state: DrawingState) {
        self.state = state;
    }

    // Pointer input

    /// Convert a client-space sample into surface coordinates
    pub fn normalize(&self, sample: &PointerSample) -> Option<Pos2> {
        let surface = self.ready_surface()?;
        let displayed = self.display_rect.unwrap_or_else(|| {
            Rect::from_min_size(
                Pos2::ZERO,
                egui::vec2(surface.width() as f32, surface.height() as f32),
            )
        });
        input::normalize(sample, displayed, surface.size())
    }

    pub fn pointer_down(&mut self, sample: &PointerSample) -> bool {
        match self.normalize(sample) {
            Some(point) => self.press(point),
            None => false,
        }
    }

    pub fn pointer_move(&mut self, sample: &PointerSample) -> bool {
        if !self.controller.is_dragging() {
            return false;
        }
        match self.normalize(sample) {
            Some(point) => self.drag_to(point),
            None => false,
        }
    }

    pub fn pointer_up(&mut self) -> bool {
        self.release()
    }

    /// Start a gesture at a point in surface coordinates
    pub fn press(&mut self, point: Pos2) -> bool {
        let style = self.state.style;
        let Some(surface) = self.surface.as_ref().filter(|surface| surface.is_ready()) else {
            return false;
        };
        self.controller.press(point, style, surface, &mut self.history)
    }

    /// Continue the gesture to a point in surface coordinates
    pub fn drag_to(&mut self, point: Pos2) -> bool {
        let Some(surface) = self.surface.as_mut().filter(|surface| surface.is_ready()) else {
            return false;
        };
        self.controller.move_to(point, &self.state.tool, surface, &self.history)
    }

    pub fn release(&mut self) -> bool {
        self.controller.release()
    }

    // Whole-surface actions

    /// Wipe the surface back to the background, keeping the old pixels undoable
    pub fn clear(&mut self) -> bool {
        self.controller.abandon();
        let Some(surface) = self.surface.as_mut().filter(|surface| surface.is_ready()) else {
            return false;
        };
        self.history.record_before_mutation(surface);
        surface.set_background();
        log::info!("Surface cleared");
        true
    }

    /// Restore the surface as it was before the last gesture or clear.
    /// Does nothing when the history is empty.
    pub fn undo(&mut self) -> bool {
        self.controller.abandon();
        let Some(surface) = self.surface.as_mut().filter(|surface| surface.is_ready()) else {
            return false;
        };
        self.history.undo(surface)
    }

    /// Encode the current surface as a PNG data URI
    pub fn to_data_uri(&self) -> Result<String, SurfaceError> {
        self.ready_surface()
            .ok_or(SurfaceError::Empty)?
            .to_data_uri()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn unmounted_engine_ignores_everything() {
        let mut engine = DrawingEngine::default();
        assert!(!engine.press(pos2(1.0, 1.0)));
        assert!(!engine.drag_to(pos2(2.0, 2.0)));
        assert!(!engine.clear());
        assert!(!engine.undo());
        assert!(engine.history().is_empty());
        assert!(matches!(engine.to_data_uri(), Err(SurfaceError::Empty)));
    }

    #[test]
    fn zero_sized_mount_stays_unready() {
        let mut engine = DrawingEngine::default();
        assert!(engine.mount(0, 120));
        assert!(!engine.is_mounted());
        assert!(!engine.press(pos2(0.0, 0.0)));
    }

    #[test]
    fn mount_happens_once() {
        let mut engine = DrawingEngine::default();
        assert!(engine.mount(10, 10));
        assert!(!engine.mount(20, 20));
        assert_eq!(engine.surface().map(Surface::size), Some([10, 10]));
    }

    #[test]
    fn pointer_samples_are_scaled_by_display_rect() {
        let mut engine = DrawingEngine::default();
        engine.mount(200, 200);
        engine.set_display_rect(Rect::from_min_size(pos2(50.0, 50.0), egui::vec2(100.0, 100.0)));
        assert_eq!(engine.normalize(&PointerSample::mouse(100.0, 75.0)), Some(pos2(100.0, 50.0)));
    }

    #[test]
    fn clear_mid_drag_abandons_gesture() {
        let mut engine = DrawingEngine::default();
        engine.mount(10, 10);
        engine.press(pos2(1.0, 1.0));
        assert!(engine.is_dragging());
        engine.clear();
        assert!(!engine.is_dragging());
        assert_eq!(engine.history().len(), 2);
    }
}
