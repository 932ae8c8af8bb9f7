//! Host that stacks mounted components vertically and routes terminal input to them.
//!
//! Routing rules:
//! - keys, text and pastes go to the focused component;
//! - every mouse report is first offered to the pointer hub, tagged with the component it hit;
//! - a button press then moves focus to the component under the pointer (or clears it);
//! - finally the report is delivered to that component in its local coordinates.

use std::ops::Range;

use crate::core::component::{Component, ComponentId, MountContext};
use crate::core::input::{is_kitty_protocol_active, KeyEventType};
use crate::core::input_event::{parse_input_events, InputEvent, MouseInput};
use crate::core::pointer::{PointerEvent, PointerHub};
use crate::runtime::component_registry::ComponentRegistry;
use crate::runtime::focus::FocusState;

#[derive(Default)]
pub struct Screen {
    registry: ComponentRegistry,
    order: Vec<ComponentId>,
    focus: FocusState,
    pointer: PointerHub,
    spans: Vec<(ComponentId, Range<usize>)>,
}

impl Screen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer(&self) -> &PointerHub {
        &self.pointer
    }

    /// Appends `component` below the ones already mounted.
    pub fn mount(&mut self, component: Box<dyn Component>) -> ComponentId {
        let id = self.registry.register_boxed(component);
        self.order.push(id);
        let ctx = MountContext {
            id,
            pointer: self.pointer.clone(),
        };
        if let Some(component) = self.registry.get_mut(id) {
            component.mounted(&ctx);
        }
        tracing::debug!(component = id.raw(), "component mounted");
        id
    }

    /// Removes a component, releasing its host resources, and hands it back.
    pub fn unmount(&mut self, id: ComponentId) -> Option<Box<dyn Component>> {
        if self.focus.focused() == Some(id) {
            self.focus.clear(&mut self.registry);
        }
        let mut component = self.registry.remove(id)?;
        self.order.retain(|mounted| *mounted != id);
        self.spans.retain(|(mounted, _)| *mounted != id);
        component.unmounted();
        tracing::debug!(component = id.raw(), "component unmounted");
        Some(component)
    }

    pub fn set_focus(&mut self, target: Option<ComponentId>) {
        self.focus.set_focus(&mut self.registry, target);
    }

    pub fn focused(&self) -> Option<ComponentId> {
        self.focus.focused()
    }

    pub fn render(&mut self, width: usize) -> Vec<String> {
        let mut lines = Vec::new();
        self.spans.clear();
        for id in self.order.iter().copied() {
            let Some(component) = self.registry.get_mut(id) else {
                continue;
            };
            let start = lines.len();
            lines.extend(component.render(width));
            self.spans.push((id, start..lines.len()));
        }
        lines
    }

    /// Component whose last render covered `row`, with the first row it occupies.
    pub fn component_at(&self, row: u16) -> Option<(ComponentId, usize)> {
        let row = usize::from(row);
        self.spans
            .iter()
            .find(|(_, span)| span.contains(&row))
            .map(|(id, span)| (*id, span.start))
    }

    /// Parses raw terminal input and routes every resulting event.
    pub fn handle_input(&mut self, data: &str) {
        for event in parse_input_events(data, is_kitty_protocol_active()) {
            self.handle_event(event);
        }
    }

    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::Mouse(mouse) => self.dispatch_mouse(mouse),
            InputEvent::Key {
                event_type: KeyEventType::Release,
                ..
            } => {}
            InputEvent::UnknownRaw { raw } => {
                tracing::trace!(raw = ?raw, "unrecognized input dropped");
            }
            event => {
                let Some(id) = self.focus.focused() else {
                    return;
                };
                if let Some(component) = self.registry.get_mut(id) {
                    component.handle_event(&event);
                }
            }
        }
    }

    fn dispatch_mouse(&mut self, mouse: MouseInput) {
        let hit = self.component_at(mouse.row);
        let target = hit.map(|(id, _)| id);

        self.pointer.dispatch(&PointerEvent { mouse, target });

        if mouse.is_press() {
            self.set_focus(target);
        }

        let Some((id, start)) = hit else {
            return;
        };
        let local = MouseInput {
            row: mouse.row.saturating_sub(u16::try_from(start).unwrap_or(u16::MAX)),
            ..mouse
        };
        if let Some(component) = self.registry.get_mut(id) {
            component.handle_event(&InputEvent::Mouse(local));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Screen;
    use crate::core::component::{Component, Focusable, MountContext};
    use crate::core::input_event::InputEvent;
    use crate::core::pointer::ListenerGuard;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Probe {
        lines: Vec<String>,
        events: Rc<RefCell<Vec<InputEvent>>>,
        focused: bool,
    }

    impl Probe {
        fn new(lines: &[&str], events: &Rc<RefCell<Vec<InputEvent>>>) -> Self {
            Self {
                lines: lines.iter().map(|line| line.to_string()).collect(),
                events: Rc::clone(events),
                focused: false,
            }
        }
    }

    impl Component for Probe {
        fn render(&mut self, _width: usize) -> Vec<String> {
            self.lines.clone()
        }

        fn handle_event(&mut self, event: &InputEvent) {
            self.events.borrow_mut().push(event.clone());
        }

        fn as_focusable(&mut self) -> Option<&mut dyn Focusable> {
            Some(self)
        }
    }

    impl Focusable for Probe {
        fn set_focused(&mut self, focused: bool) {
            self.focused = focused;
        }

        fn is_focused(&self) -> bool {
            self.focused
        }
    }

    #[test]
    fn render_stacks_components_and_records_spans() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut screen = Screen::new();
        let top = screen.mount(Box::new(Probe::new(&["a", "b"], &events)));
        let bottom = screen.mount(Box::new(Probe::new(&["c"], &events)));

        assert_eq!(screen.render(10), vec!["a", "b", "c"]);
        assert_eq!(screen.component_at(1), Some((top, 0)));
        assert_eq!(screen.component_at(2), Some((bottom, 2)));
        assert_eq!(screen.component_at(3), None);
    }

    #[test]
    fn keys_reach_only_the_focused_component() {
        let first_events = Rc::new(RefCell::new(Vec::new()));
        let second_events = Rc::new(RefCell::new(Vec::new()));
        let mut screen = Screen::new();
        let _first = screen.mount(Box::new(Probe::new(&["one"], &first_events)));
        let second = screen.mount(Box::new(Probe::new(&["two"], &second_events)));

        screen.handle_input("\r");
        assert!(first_events.borrow().is_empty());

        screen.set_focus(Some(second));
        screen.handle_input("\r");
        assert!(first_events.borrow().is_empty());
        assert_eq!(second_events.borrow().len(), 1);
    }

    #[test]
    fn presses_focus_the_hit_component_and_use_local_rows() {
        let first_events = Rc::new(RefCell::new(Vec::new()));
        let second_events = Rc::new(RefCell::new(Vec::new()));
        let mut screen = Screen::new();
        let _first = screen.mount(Box::new(Probe::new(&["one", "one"], &first_events)));
        let second = screen.mount(Box::new(Probe::new(&["two"], &second_events)));
        screen.render(10);

        screen.handle_input("\x1b[<0;4;3M");
        assert_eq!(screen.focused(), Some(second));
        let received = second_events.borrow();
        let InputEvent::Mouse(mouse) = received[0] else {
            panic!("expected mouse event, got {:?}", received[0]);
        };
        assert_eq!((mouse.column, mouse.row), (3, 0));
        drop(received);

        screen.handle_input("\x1b[<0;1;9M");
        assert_eq!(screen.focused(), None);
    }

    struct Subscriber {
        guard: Option<ListenerGuard>,
        unmounted: Rc<RefCell<bool>>,
    }

    impl Component for Subscriber {
        fn render(&mut self, _width: usize) -> Vec<String> {
            vec!["sub".to_string()]
        }

        fn mounted(&mut self, ctx: &MountContext) {
            self.guard = Some(ctx.pointer.subscribe(|_| {}));
        }

        fn unmounted(&mut self) {
            self.guard = None;
            *self.unmounted.borrow_mut() = true;
        }
    }

    #[test]
    fn unmount_runs_hook_and_drops_listeners() {
        let unmounted = Rc::new(RefCell::new(false));
        let mut screen = Screen::new();
        let id = screen.mount(Box::new(Subscriber {
            guard: None,
            unmounted: Rc::clone(&unmounted),
        }));
        assert_eq!(screen.pointer().listener_count(), 1);

        assert!(screen.unmount(id).is_some());
        assert!(*unmounted.borrow());
        assert_eq!(screen.pointer().listener_count(), 0);
        assert!(screen.unmount(id).is_none());
        assert!(screen.render(10).is_empty());
    }
}
