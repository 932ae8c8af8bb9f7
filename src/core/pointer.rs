//! Host-wide pointer listeners.
//!
//! Widgets that must observe presses anywhere on the host (for example to dismiss a popup when
//! the user clicks elsewhere) subscribe here. A subscription lives exactly as long as the
//! returned [`ListenerGuard`].

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use crate::core::component::ComponentId;
use crate::core::input_event::MouseInput;

/// A mouse report in host coordinates, tagged with the component it landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub mouse: MouseInput,
    /// `None` when the report hit no mounted component.
    pub target: Option<ComponentId>,
}

impl PointerEvent {
    pub fn is_press(&self) -> bool {
        self.mouse.is_press()
    }

    /// A press that landed anywhere other than `owner`.
    pub fn is_press_outside(&self, owner: ComponentId) -> bool {
        self.is_press() && self.target != Some(owner)
    }
}

type Listener = Rc<RefCell<Box<dyn FnMut(&PointerEvent)>>>;

#[derive(Default)]
struct HubState {
    listeners: BTreeMap<u64, Listener>,
    next_id: u64,
}

/// Cloneable handle to one host's pointer listener table.
#[derive(Clone, Default)]
pub struct PointerHub {
    state: Rc<RefCell<HubState>>,
}

impl PointerHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl FnMut(&PointerEvent) + 'static) -> ListenerGuard {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        state
            .listeners
            .insert(id, Rc::new(RefCell::new(Box::new(listener))));
        ListenerGuard {
            hub: Rc::downgrade(&self.state),
            id,
        }
    }

    /// Delivers `event` to every listener registered when dispatch started.
    ///
    /// Listeners may drop their own (or any other) guard while running; a listener removed
    /// before its turn is skipped. Returns the number of listeners invoked.
    pub fn dispatch(&self, event: &PointerEvent) -> usize {
        let snapshot: Vec<(u64, Listener)> = self
            .state
            .borrow()
            .listeners
            .iter()
            .map(|(id, listener)| (*id, Rc::clone(listener)))
            .collect();

        let mut invoked = 0;
        for (id, listener) in snapshot {
            if !self.state.borrow().listeners.contains_key(&id) {
                continue;
            }
            let Ok(mut listener) = listener.try_borrow_mut() else {
                tracing::trace!(listener = id, "skipping re-entrant pointer listener");
                continue;
            };
            (*listener)(event);
            invoked += 1;
        }
        invoked
    }

    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }
}

/// Keeps a pointer listener registered; dropping it unregisters the listener.
#[must_use = "the listener is removed as soon as the guard is dropped"]
pub struct ListenerGuard {
    hub: Weak<RefCell<HubState>>,
    id: u64,
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(state) = self.hub.upgrade() {
            state.borrow_mut().listeners.remove(&self.id);
        }
    }
}

impl std::fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerGuard").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{ListenerGuard, PointerEvent, PointerHub};
    use crate::core::component::ComponentId;
    use crate::core::input_event::{MouseButton, MouseInput, MousePhase};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn press(target: Option<u64>) -> PointerEvent {
        PointerEvent {
            mouse: MouseInput {
                phase: MousePhase::Down,
                button: Some(MouseButton::Left),
                column: 0,
                row: 0,
            },
            target: target.map(ComponentId::from_raw),
        }
    }

    #[test]
    fn guard_drop_unregisters_listener() {
        let hub = PointerHub::new();
        let hits = Rc::new(RefCell::new(0));
        let hits_ref = Rc::clone(&hits);
        let guard = hub.subscribe(move |_| *hits_ref.borrow_mut() += 1);
        assert_eq!(hub.listener_count(), 1);

        assert_eq!(hub.dispatch(&press(None)), 1);
        drop(guard);
        assert_eq!(hub.listener_count(), 0);
        assert_eq!(hub.dispatch(&press(None)), 0);
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn listener_may_release_its_own_guard_during_dispatch() {
        let hub = PointerHub::new();
        let slot: Rc<RefCell<Option<ListenerGuard>>> = Rc::new(RefCell::new(None));
        let slot_ref = Rc::clone(&slot);
        let guard = hub.subscribe(move |_| {
            slot_ref.borrow_mut().take();
        });
        *slot.borrow_mut() = Some(guard);

        assert_eq!(hub.dispatch(&press(None)), 1);
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn listener_removed_mid_dispatch_is_skipped() {
        let hub = PointerHub::new();
        let second: Rc<RefCell<Option<ListenerGuard>>> = Rc::new(RefCell::new(None));
        let second_ref = Rc::clone(&second);
        let _first = hub.subscribe(move |_| {
            second_ref.borrow_mut().take();
        });
        let calls = Rc::new(RefCell::new(0));
        let calls_ref = Rc::clone(&calls);
        *second.borrow_mut() = Some(hub.subscribe(move |_| *calls_ref.borrow_mut() += 1));

        assert_eq!(hub.dispatch(&press(None)), 1);
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn press_outside_compares_targets() {
        let owner = ComponentId::from_raw(7);
        assert!(press(None).is_press_outside(owner));
        assert!(press(Some(3)).is_press_outside(owner));
        assert!(!press(Some(7)).is_press_outside(owner));
    }
}
