//! Environment configuration.

use std::env;

use crate::widgets::combobox::DEFAULT_MAX_VISIBLE;

#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub write_log: Option<String>,
    pub debug: bool,
    pub max_visible: Option<usize>,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            write_log: env_string_opt("COMBO_TUI_WRITE_LOG"),
            debug: env_flag("COMBO_TUI_DEBUG"),
            max_visible: env_usize_opt("COMBO_TUI_MAX_VISIBLE"),
        }
    }

    /// Scroll window size to pass to `Combobox::set_max_visible`.
    pub fn combobox_max_visible(&self) -> usize {
        self.max_visible.unwrap_or(DEFAULT_MAX_VISIBLE)
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}

fn env_usize_opt(key: &str) -> Option<usize> {
    let value = env_string_opt(key)?;
    match value.trim().parse::<usize>() {
        Ok(parsed) if parsed > 0 => Some(parsed),
        _ => {
            tracing::warn!(key, value = %value, "ignoring non-positive or malformed size");
            None
        }
    }
}
