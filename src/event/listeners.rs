use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::{EventBus, ListenerScope, Subscription};
use crate::engine::DrawingEngine;
use crate::input::{PointerEvent, PointerPhase};

/// The pointer listeners that feed a drawing engine.
///
/// Press is only heard on the canvas; move and release are heard window-wide so a drag that
/// leaves the canvas (or ends outside it) still finishes cleanly. The handlers hold a weak
/// reference to the engine, and every listener is removed when this value is dropped.
#[derive(Debug)]
pub struct SurfaceListeners {
    subscriptions: Vec<Subscription>,
}

impl SurfaceListeners {
    pub fn attach(bus: &Rc<EventBus>, engine: &Rc<RefCell<DrawingEngine>>) -> Self {
        let engine = Rc::downgrade(engine);
        let subscriptions = vec![
            bus.subscribe(
                ListenerScope::Canvas,
                PointerPhase::Press,
                forward(engine.clone(), |engine, event| engine.pointer_down(&event.sample)),
            ),
            bus.subscribe(
                ListenerScope::Window,
                PointerPhase::Move,
                forward(engine.clone(), |engine, event| engine.pointer_move(&event.sample)),
            ),
            bus.subscribe(
                ListenerScope::Window,
                PointerPhase::Release,
                forward(engine, |engine, _| engine.pointer_up()),
            ),
        ];
        log::debug!("Attached {} surface listeners", subscriptions.len());
        Self { subscriptions }
    }

    /// Remove every listener now instead of waiting for drop
    pub fn detach(self) {
        log::debug!("Detaching {} surface listeners", self.subscriptions.len());
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

/// Wrap an engine action as a listener that skips events once the engine is gone
fn forward<F>(engine: Weak<RefCell<DrawingEngine>>, action: F) -> impl FnMut(&PointerEvent) + 'static
where
    F: Fn(&mut DrawingEngine, &PointerEvent) -> bool + 'static,
{
    move |event: &PointerEvent| {
        let Some(engine) = engine.upgrade() else {
            return;
        };
        match engine.try_borrow_mut() {
            Ok(mut engine) => {
                action(&mut engine, event);
            }
            Err(_) => log::warn!("Drawing engine busy, dropping {:?} event", event.phase),
        };
    }
}
