//! Scoped pointer listeners.
//!
//! Handlers subscribe to one pointer phase at either canvas or window scope. Canvas-scope
//! handlers only see events delivered to the canvas; window-scope handlers see every event,
//! including those that started on the canvas. Each subscription is an RAII handle.

mod bus;
mod listeners;

pub use bus::{EventBus, ListenerScope, Subscription};
pub use listeners::SurfaceListeners;

use crate::input::PointerEvent;

pub trait EventHandler {
    fn handle_event(&mut self, event: &PointerEvent);
}

impl<F> EventHandler for F
where
    F: FnMut(&PointerEvent),
{
    fn handle_event(&mut self, event: &PointerEvent) {
        self(event)
    }
}
