use egui::{Context, Event, LayerId, PointerButton, Pos2, Rect};

use super::{EventTarget, PointerEvent, PointerPhase, PointerSample};

/// Turns raw egui input into [`PointerEvent`]s for the listener registry.
///
/// egui already folds the primary touch into pointer events, so only pointer
/// events are read here and everything arrives as a mouse sample.
///
/// An event targets the canvas only when it lands inside the canvas rect and no other
/// layer (popup, window, tooltip) covers that point.
#[derive(Debug, Default)]
pub struct PointerTranslator {
    canvas_rect: Option<Rect>,
    canvas_layer: Option<LayerId>,
    last_pointer_pos: Option<Pos2>,
}

impl PointerTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update where the canvas is drawn this frame and which layer it is painted on
    pub fn set_canvas(&mut self, rect: Rect, layer: LayerId) {
        self.canvas_rect = Some(rect);
        self.canvas_layer = Some(layer);
    }

    fn target_for(&self, ctx: &Context, pos: Pos2) -> EventTarget {
        let Some(rect) = self.canvas_rect.filter(|rect| rect.contains(pos)) else {
            return EventTarget::Window;
        };
        // Panels have no area of their own, so nothing found means the background owns the point
        match (ctx.layer_id_at(pos), self.canvas_layer) {
            (None, _) => EventTarget::Canvas,
            (Some(top), Some(canvas)) if top == canvas => EventTarget::Canvas,
            (Some(top), _) => {
                log::trace!("Pointer at {pos:?} in {rect:?} is covered by {top:?}");
                EventTarget::Window
            }
        }
    }

    fn make_event(&self, ctx: &Context, phase: PointerPhase, pos: Pos2) -> PointerEvent {
        PointerEvent::new(
            phase,
            PointerSample::Mouse { client: pos },
            self.target_for(ctx, pos),
        )
    }

    /// Collect this frame's primary-button pointer events, in arrival order
    pub fn collect(&mut self, ctx: &Context) -> Vec<PointerEvent> {
        // Copy the raw events out first; layer lookups need the context again
        let raw = ctx.input(|input| input.events.clone());
        let mut events = Vec::new();

        for event in raw {
            match event {
                Event::PointerMoved(pos) => {
                    if self.last_pointer_pos != Some(pos) {
                        events.push(self.make_event(ctx, PointerPhase::Move, pos));
                    }
                    self.last_pointer_pos = Some(pos);
                }
                Event::PointerButton {
                    pos,
                    button: PointerButton::Primary,
                    pressed,
                    ..
                } => {
                    let phase = if pressed {
                        PointerPhase::Press
                    } else {
                        PointerPhase::Release
                    };
                    events.push(self.make_event(ctx, phase, pos));
                    self.last_pointer_pos = Some(pos);
                }
                Event::PointerGone => {
                    self.last_pointer_pos = None;
                }
                _ => {}
            }
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Modifiers, RawInput, pos2, vec2};

    fn run_frame(translator: &mut PointerTranslator, events: Vec<Event>) -> Vec<PointerEvent> {
        let ctx = Context::default();
        let raw = RawInput {
            events,
            ..Default::default()
        };
        let mut collected = Vec::new();
        let _ = ctx.run(raw, |ctx| {
            collected = translator.collect(ctx);
        });
        collected
    }

    #[test]
    fn press_inside_canvas_targets_canvas() {
        let mut translator = PointerTranslator::new();
        translator.set_canvas(
            Rect::from_min_size(pos2(0.0, 0.0), vec2(100.0, 100.0)),
            LayerId::background(),
        );

        let events = run_frame(
            &mut translator,
            vec![
                Event::PointerMoved(pos2(10.0, 10.0)),
                Event::PointerButton {
                    pos: pos2(10.0, 10.0),
                    button: PointerButton::Primary,
                    pressed: true,
                    modifiers: Modifiers::default(),
                },
                Event::PointerMoved(pos2(150.0, 10.0)),
                Event::PointerButton {
                    pos: pos2(150.0, 10.0),
                    button: PointerButton::Primary,
                    pressed: false,
                    modifiers: Modifiers::default(),
                },
            ],
        );

        let phases: Vec<_> = events.iter().map(|e| (e.phase, e.target)).collect();
        assert_eq!(
            phases,
            vec![
                (PointerPhase::Move, EventTarget::Canvas),
                (PointerPhase::Press, EventTarget::Canvas),
                (PointerPhase::Move, EventTarget::Window),
                (PointerPhase::Release, EventTarget::Window),
            ]
        );
    }

    #[test]
    fn secondary_button_is_ignored() {
        let mut translator = PointerTranslator::new();
        let events = run_frame(
            &mut translator,
            vec![Event::PointerButton {
                pos: pos2(1.0, 1.0),
                button: PointerButton::Secondary,
                pressed: true,
                modifiers: Modifiers::default(),
            }],
        );
        assert!(events.is_empty());
    }

    #[test]
    fn press_under_a_covering_area_targets_window() {
        let ctx = Context::default();
        let mut translator = PointerTranslator::new();
        translator.set_canvas(
            Rect::from_min_size(pos2(0.0, 0.0), vec2(100.0, 100.0)),
            LayerId::background(),
        );
        let overlay = |ctx: &Context| {
            egui::Area::new(egui::Id::new("overlay"))
                .order(egui::Order::Foreground)
                .fixed_pos(pos2(20.0, 20.0))
                .show(ctx, |ui| {
                    ui.allocate_space(vec2(40.0, 40.0));
                });
        };
        // New areas are laid out invisibly first
        for _ in 0..2 {
            let _ = ctx.run(RawInput::default(), overlay);
        }

        let raw = RawInput {
            events: vec![
                Event::PointerButton {
                    pos: pos2(30.0, 30.0),
                    button: PointerButton::Primary,
                    pressed: true,
                    modifiers: Modifiers::default(),
                },
                Event::PointerButton {
                    pos: pos2(90.0, 90.0),
                    button: PointerButton::Primary,
                    pressed: true,
                    modifiers: Modifiers::default(),
                },
            ],
            ..Default::default()
        };
        let mut collected = Vec::new();
        let _ = ctx.run(raw, |ctx| {
            overlay(ctx);
            collected = translator.collect(ctx);
        });

        let targets: Vec<_> = collected.iter().map(|e| e.target).collect();
        assert_eq!(targets, vec![EventTarget::Window, EventTarget::Canvas]);
    }
}
