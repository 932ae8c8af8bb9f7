//! Keyboard focus tracking.

use crate::core::component::ComponentId;
use crate::runtime::component_registry::ComponentRegistry;

#[derive(Debug, Default)]
pub struct FocusState {
    focused: Option<ComponentId>,
}

impl FocusState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves focus, toggling `Focusable` flags on the old and new components.
    ///
    /// Targets that are not mounted or not focusable clear focus instead.
    pub fn set_focus(&mut self, registry: &mut ComponentRegistry, target: Option<ComponentId>) {
        if self.focused == target {
            return;
        }

        if let Some(prev) = self.focused.take() {
            if let Some(focusable) = registry.get_mut(prev).and_then(|c| c.as_focusable()) {
                focusable.set_focused(false);
            }
        }

        let Some(next) = target else {
            return;
        };
        if let Some(focusable) = registry.get_mut(next).and_then(|c| c.as_focusable()) {
            focusable.set_focused(true);
            self.focused = Some(next);
        }
    }

    pub fn clear(&mut self, registry: &mut ComponentRegistry) {
        self.set_focus(registry, None);
    }

    /// Forgets `id` without touching the component (used when it is being removed).
    pub fn forget(&mut self, id: ComponentId) {
        if self.focused == Some(id) {
            self.focused = None;
        }
    }

    pub fn focused(&self) -> Option<ComponentId> {
        self.focused
    }
}
