//! Component and Focusable traits.

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::input_event::InputEvent;
use crate::core::pointer::PointerHub;

/// Stable identifier for a component mounted on a host.
///
/// Semantics:
/// - IDs are unique within one host instance.
/// - IDs are never reused for the lifetime of that host.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ComponentId(u64);

impl ComponentId {
    pub fn raw(self) -> u64 {
        self.0
    }

    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

/// Host services handed to a component when it is mounted.
#[derive(Clone)]
pub struct MountContext {
    pub id: ComponentId,
    pub pointer: PointerHub,
}

/// Notification queued by a component while it is borrowed.
pub type Deferred = Box<dyn FnOnce()>;

/// Renderable component interface.
pub trait Component {
    /// Render to a list of lines at the given width.
    fn render(&mut self, width: usize) -> Vec<String>;

    /// Handle input events.
    ///
    /// Mouse events arrive in component-local coordinates: row 0 is the first line
    /// returned by the last `render()`.
    fn handle_event(&mut self, _event: &InputEvent) {}

    /// Handle an event, returning caller notifications instead of running them.
    ///
    /// Wrappers that hold a borrow of the component while forwarding events run the
    /// returned callbacks only after releasing it, so callbacks may reach back into the
    /// component through a shared handle.
    fn handle_event_deferred(&mut self, event: &InputEvent) -> Vec<Deferred> {
        self.handle_event(event);
        Vec::new()
    }

    /// Invalidate any cached state.
    fn invalidate(&mut self) {}

    /// Called once the host has registered the component.
    fn mounted(&mut self, _ctx: &MountContext) {}

    /// Called right before the host releases the component.
    ///
    /// Components must drop every host resource acquired since `mounted`.
    fn unmounted(&mut self) {}

    /// Optional focusable behavior.
    fn as_focusable(&mut self) -> Option<&mut dyn Focusable> {
        None
    }
}

/// Focusable behavior for components that track focus.
pub trait Focusable {
    fn set_focused(&mut self, focused: bool);
    fn is_focused(&self) -> bool;
}

/// Lets a host own a component while the caller keeps a handle to it.
///
/// Deferred notifications run after the borrow is released, so a commit callback may update
/// the component through this handle. `render` must not reach back into the handle.
impl<C: Component + ?Sized> Component for Rc<RefCell<C>> {
    fn render(&mut self, width: usize) -> Vec<String> {
        self.borrow_mut().render(width)
    }

    fn handle_event(&mut self, event: &InputEvent) {
        let deferred = self.borrow_mut().handle_event_deferred(event);
        for notify in deferred {
            notify();
        }
    }

    fn handle_event_deferred(&mut self, event: &InputEvent) -> Vec<Deferred> {
        self.borrow_mut().handle_event_deferred(event)
    }

    fn invalidate(&mut self) {
        self.borrow_mut().invalidate();
    }

    fn mounted(&mut self, ctx: &MountContext) {
        self.borrow_mut().mounted(ctx);
    }

    fn unmounted(&mut self) {
        self.borrow_mut().unmounted();
    }

    fn as_focusable(&mut self) -> Option<&mut dyn Focusable> {
        if self.borrow_mut().as_focusable().is_some() {
            Some(self)
        } else {
            None
        }
    }
}

impl<C: Component + ?Sized> Focusable for Rc<RefCell<C>> {
    fn set_focused(&mut self, focused: bool) {
        if let Some(inner) = self.borrow_mut().as_focusable() {
            inner.set_focused(focused);
        }
    }

    fn is_focused(&self) -> bool {
        self.borrow_mut()
            .as_focusable()
            .is_some_and(|inner| inner.is_focused())
    }
}
