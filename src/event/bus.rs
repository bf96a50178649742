use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::event::EventHandler;
use crate::input::{EventTarget, PointerEvent, PointerPhase};

/// Where a listener is registered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerScope {
    /// Only events delivered to the canvas
    Canvas,
    /// Every event, wherever the pointer is
    Window,
}

impl ListenerScope {
    fn receives(&self, target: EventTarget) -> bool {
        match self {
            ListenerScope::Window => true,
            ListenerScope::Canvas => target == EventTarget::Canvas,
        }
    }
}

struct Registered {
    id: u64,
    scope: ListenerScope,
    phase: PointerPhase,
    handler: Box<dyn EventHandler>,
}

/// Dispatches pointer events to subscribed handlers
pub struct EventBus {
    handlers: RefCell<Vec<Registered>>,
    // Changes requested while a dispatch was running
    pending_additions: RefCell<Vec<Registered>>,
    pending_removals: RefCell<Vec<u64>>,
    next_id: Cell<u64>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &format!("<{} handlers>", self.len()))
            .finish()
    }
}

impl EventBus {
    /// Creates a new event bus
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            handlers: RefCell::new(Vec::new()),
            pending_additions: RefCell::new(Vec::new()),
            pending_removals: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        })
    }

    /// Register a handler for one phase at one scope.
    ///
    /// The handler stays registered until the returned [`Subscription`] is dropped. Handlers
    /// added while an event is being dispatched only see the events after it.
    pub fn subscribe(
        self: &Rc<Self>,
        scope: ListenerScope,
        phase: PointerPhase,
        handler: impl EventHandler + 'static,
    ) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let registered = Registered {
            id,
            scope,
            phase,
            handler: Box::new(handler),
        };
        match self.handlers.try_borrow_mut() {
            Ok(mut handlers) => handlers.push(registered),
            Err(_) => self.pending_additions.borrow_mut().push(registered),
        }
        Subscription {
            id,
            bus: Rc::downgrade(self),
        }
    }

    /// Deliver an event to every matching handler. Returns how many handlers ran.
    pub fn emit(&self, event: &PointerEvent) -> usize {
        let mut delivered = 0;
        {
            let mut handlers = self.handlers.borrow_mut();
            for registered in handlers.iter_mut() {
                if registered.phase == event.phase && registered.scope.receives(event.target) {
                    registered.handler.handle_event(event);
                    delivered += 1;
                }
            }
        }
        self.apply_pending();
        delivered
    }

    /// Number of registered handlers, including ones added during the current dispatch
    pub fn len(&self) -> usize {
        let pending = self.pending_additions.borrow().len();
        match self.handlers.try_borrow() {
            Ok(handlers) => handlers.len() + pending,
            Err(_) => pending,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn unsubscribe(&self, id: u64) {
        self.pending_additions
            .borrow_mut()
            .retain(|registered| registered.id != id);
        match self.handlers.try_borrow_mut() {
            Ok(mut handlers) => handlers.retain(|registered| registered.id != id),
            Err(_) => self.pending_removals.borrow_mut().push(id),
        }
    }

    fn apply_pending(&self) {
        let added: Vec<Registered> = self.pending_additions.borrow_mut().drain(..).collect();
        let removed: Vec<u64> = self.pending_removals.borrow_mut().drain(..).collect();
        if added.is_empty() && removed.is_empty() {
            return;
        }
        let mut handlers = self.handlers.borrow_mut();
        handlers.extend(added);
        handlers.retain(|registered| !removed.contains(&registered.id));
    }
}

/// Handle for a registered listener; dropping it removes the listener
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    bus: Weak<EventBus>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.unsubscribe(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::PointerSample;

    fn event(phase: PointerPhase, target: EventTarget) -> PointerEvent {
        PointerEvent::new(phase, PointerSample::mouse(0.0, 0.0), target)
    }

    #[test]
    fn canvas_scope_only_sees_canvas_events() {
        let bus = EventBus::new();
        let seen = Rc::new(Cell::new(0));
        let counter = Rc::clone(&seen);
        let _sub = bus.subscribe(ListenerScope::Canvas, PointerPhase::Press, move |_: &PointerEvent| {
            counter.set(counter.get() + 1);
        });

        assert_eq!(bus.emit(&event(PointerPhase::Press, EventTarget::Window)), 0);
        assert_eq!(bus.emit(&event(PointerPhase::Press, EventTarget::Canvas)), 1);
        assert_eq!(bus.emit(&event(PointerPhase::Move, EventTarget::Canvas)), 0);
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn window_scope_sees_everything() {
        let bus = EventBus::new();
        let _sub = bus.subscribe(ListenerScope::Window, PointerPhase::Move, |_: &PointerEvent| {});
        assert_eq!(bus.emit(&event(PointerPhase::Move, EventTarget::Window)), 1);
        assert_eq!(bus.emit(&event(PointerPhase::Move, EventTarget::Canvas)), 1);
    }

    #[test]
    fn dropping_subscription_unregisters() {
        let bus = EventBus::new();
        let sub = bus.subscribe(ListenerScope::Window, PointerPhase::Release, |_: &PointerEvent| {});
        assert_eq!(bus.len(), 1);
        drop(sub);
        assert!(bus.is_empty());
        assert_eq!(bus.emit(&event(PointerPhase::Release, EventTarget::Window)), 0);
    }

    #[test]
    fn subscription_outliving_bus_is_harmless() {
        let bus = EventBus::new();
        let sub = bus.subscribe(ListenerScope::Window, PointerPhase::Move, |_: &PointerEvent| {});
        drop(bus);
        drop(sub);
    }

    #[test]
    fn subscribe_during_dispatch_is_deferred() {
        let bus = EventBus::new();
        let added: Rc<RefCell<Vec<Subscription>>> = Rc::new(RefCell::new(Vec::new()));
        let calls = Rc::new(Cell::new(0));

        let inner_bus = Rc::clone(&bus);
        let inner_added = Rc::clone(&added);
        let inner_calls = Rc::clone(&calls);
        let _sub = bus.subscribe(ListenerScope::Window, PointerPhase::Move, move |_: &PointerEvent| {
            let counter = Rc::clone(&inner_calls);
            let sub = inner_bus.subscribe(ListenerScope::Window, PointerPhase::Move, move |_: &PointerEvent| {
                counter.set(counter.get() + 1);
            });
            inner_added.borrow_mut().push(sub);
        });

        assert_eq!(bus.emit(&event(PointerPhase::Move, EventTarget::Window)), 1);
        assert_eq!(bus.len(), 2);
        assert_eq!(calls.get(), 0);

        assert_eq!(bus.emit(&event(PointerPhase::Move, EventTarget::Window)), 2);
        assert_eq!(calls.get(), 1);
        assert_eq!(bus.len(), 3);
        added.borrow_mut().clear();
    }

    #[test]
    fn unsubscribe_during_dispatch_is_deferred() {
        let bus = EventBus::new();
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let inner = Rc::clone(&slot);
        let sub = bus.subscribe(ListenerScope::Window, PointerPhase::Move, move |_: &PointerEvent| {
            inner.borrow_mut().take();
        });
        *slot.borrow_mut() = Some(sub);

        assert_eq!(bus.emit(&event(PointerPhase::Move, EventTarget::Window)), 1);
        assert!(bus.is_empty());
    }
}
