//! Combobox keybindings.

use std::collections::HashMap;
use std::sync::LazyLock;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use crate::core::input::matches_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComboboxAction {
    /// Toggle the list, or commit the focused option while open.
    Activate,
    Dismiss,
    FocusNext,
    FocusPrevious,
}

pub type KeyId = String;

#[derive(Debug, Clone)]
pub enum KeyBinding {
    Single(KeyId),
    Multiple(Vec<KeyId>),
}

impl From<&str> for KeyBinding {
    fn from(value: &str) -> Self {
        KeyBinding::Single(value.to_string())
    }
}

impl From<String> for KeyBinding {
    fn from(value: String) -> Self {
        KeyBinding::Single(value)
    }
}

impl From<Vec<&str>> for KeyBinding {
    fn from(value: Vec<&str>) -> Self {
        KeyBinding::Multiple(value.into_iter().map(|item| item.to_string()).collect())
    }
}

impl From<Vec<String>> for KeyBinding {
    fn from(value: Vec<String>) -> Self {
        KeyBinding::Multiple(value)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ComboboxKeybindingsConfig {
    entries: HashMap<ComboboxAction, KeyBinding>,
}

impl ComboboxKeybindingsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<K: Into<KeyBinding>>(&mut self, action: ComboboxAction, keys: K) {
        self.entries.insert(action, keys.into());
    }
}

pub static DEFAULT_COMBOBOX_KEYBINDINGS: LazyLock<HashMap<ComboboxAction, Vec<KeyId>>> =
    LazyLock::new(|| {
        use ComboboxAction::*;

        let mut map = HashMap::new();
        map.insert(Activate, vec!["enter".to_string(), "space".to_string()]);
        map.insert(Dismiss, vec!["escape".to_string()]);
        map.insert(FocusNext, vec!["down".to_string()]);
        map.insert(FocusPrevious, vec!["up".to_string()]);
        map
    });

pub struct ComboboxKeybindingsManager {
    action_to_keys: HashMap<ComboboxAction, Vec<KeyId>>,
}

impl ComboboxKeybindingsManager {
    pub fn new(config: ComboboxKeybindingsConfig) -> Self {
        let mut manager = Self {
            action_to_keys: HashMap::new(),
        };
        manager.build_maps(&config);
        manager
    }

    fn build_maps(&mut self, config: &ComboboxKeybindingsConfig) {
        self.action_to_keys.clear();

        for (action, keys) in DEFAULT_COMBOBOX_KEYBINDINGS.iter() {
            self.action_to_keys.insert(*action, keys.clone());
        }

        for (action, binding) in config.entries.iter() {
            let key_list = match binding {
                KeyBinding::Single(key) => vec![key.clone()],
                KeyBinding::Multiple(keys) => keys.clone(),
            };
            self.action_to_keys.insert(*action, key_list);
        }
    }

    pub fn matches(&self, data: &str, action: ComboboxAction) -> bool {
        let Some(keys) = self.action_to_keys.get(&action) else {
            return false;
        };
        keys.iter().any(|key| matches_key(data, key))
    }

    /// First action bound to `data`, checked in a fixed order.
    pub fn action_for(&self, data: &str) -> Option<ComboboxAction> {
        [
            ComboboxAction::Dismiss,
            ComboboxAction::Activate,
            ComboboxAction::FocusNext,
            ComboboxAction::FocusPrevious,
        ]
        .into_iter()
        .find(|action| self.matches(data, *action))
    }

    pub fn get_keys(&self, action: ComboboxAction) -> Vec<KeyId> {
        self.action_to_keys.get(&action).cloned().unwrap_or_default()
    }

    pub fn set_config(&mut self, config: ComboboxKeybindingsConfig) {
        self.build_maps(&config);
    }
}

static GLOBAL_COMBOBOX_KEYBINDINGS: OnceLock<Arc<Mutex<ComboboxKeybindingsManager>>> =
    OnceLock::new();

pub fn get_combobox_keybindings() -> Arc<Mutex<ComboboxKeybindingsManager>> {
    GLOBAL_COMBOBOX_KEYBINDINGS
        .get_or_init(|| {
            Arc::new(Mutex::new(ComboboxKeybindingsManager::new(
                ComboboxKeybindingsConfig::default(),
            )))
        })
        .clone()
}

pub fn set_combobox_keybindings(manager: ComboboxKeybindingsManager) {
    let global = get_combobox_keybindings();
    *lock_keybindings(&global) = manager;
}

/// Locks a keybindings manager, recovering the data if a previous holder panicked.
pub fn lock_keybindings(
    manager: &Mutex<ComboboxKeybindingsManager>,
) -> MutexGuard<'_, ComboboxKeybindingsManager> {
    manager
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
