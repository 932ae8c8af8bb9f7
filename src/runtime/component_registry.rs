//! Component registry keyed by [`ComponentId`].

use std::collections::BTreeMap;

use crate::core::component::{Component, ComponentId};

#[derive(Default)]
pub struct ComponentRegistry {
    entries: BTreeMap<ComponentId, Box<dyn Component>>,
    next_id: u64,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `component` under a fresh id. IDs are never reused.
    pub fn register_boxed(&mut self, component: Box<dyn Component>) -> ComponentId {
        let id = ComponentId::from_raw(self.next_id);
        self.next_id += 1;
        self.entries.insert(id, component);
        id
    }

    pub fn get_mut(&mut self, id: ComponentId) -> Option<&mut Box<dyn Component>> {
        self.entries.get_mut(&id)
    }

    pub fn remove(&mut self, id: ComponentId) -> Option<Box<dyn Component>> {
        self.entries.remove(&id)
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::ComponentRegistry;
    use crate::core::component::Component;

    struct Blank;

    impl Component for Blank {
        fn render(&mut self, _width: usize) -> Vec<String> {
            Vec::new()
        }
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut registry = ComponentRegistry::new();
        let first = registry.register_boxed(Box::new(Blank));
        assert!(registry.remove(first).is_some());
        assert!(!registry.contains(first));
        assert!(registry.remove(first).is_none());

        let second = registry.register_boxed(Box::new(Blank));
        assert_ne!(first, second);
        assert!(registry.get_mut(second).is_some());
        assert!(registry.get_mut(first).is_none());
    }

    #[test]
    fn removed_entries_are_not_retained() {
        let mut registry = ComponentRegistry::new();
        for _ in 0..100 {
            let id = registry.register_boxed(Box::new(Blank));
            assert!(registry.remove(id).is_some());
        }
        assert!(registry.is_empty());

        let kept = registry.register_boxed(Box::new(Blank));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(kept));
    }
}
