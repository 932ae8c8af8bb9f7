//! Single-select combobox for inline terminal UIs.
//!
//! Invariant: the combobox is controlled. Callers own the selected value and the option list;
//! the widget reports confirmed choices through its commit callback and never updates its own
//! selection.
//!
//! # Public API Overview
//! - Build a [`Combobox`] from a [`SelectOption`] list and mount it on a [`Screen`].
//! - Feed raw terminal input to [`Screen::handle_input`]; keys go to the focused widget and
//!   mouse presses are routed by row and offered to the [`PointerHub`] for outside dismissal.
//! - Drive the pure [`ComboboxController`] directly when no host is involved.
//! - Decode catalog records and build search-form options with [`catalog`].

#![allow(clippy::type_complexity)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;

pub mod core;
pub mod runtime;
pub mod widgets;

pub use crate::error::{Error, Result};

/// Runtime component traits and host services.
pub use crate::core::component::{Component, ComponentId, Deferred, Focusable, MountContext};
pub use crate::core::pointer::{ListenerGuard, PointerEvent, PointerHub};

/// Keybinding configuration and default mappings.
pub use crate::core::keybindings::{
    get_combobox_keybindings, set_combobox_keybindings, ComboboxAction, ComboboxKeybindingsConfig,
    ComboboxKeybindingsManager, KeyBinding, KeyId, DEFAULT_COMBOBOX_KEYBINDINGS,
};

/// Keyboard and mouse input parsing.
pub use crate::core::input::{is_key_release, is_key_repeat, matches_key, parse_key, KeyEventType};
pub use crate::core::input_event::{
    parse_input_events, InputEvent, MouseButton, MouseInput, MousePhase,
};

/// Combobox widget and its state machine.
pub use crate::widgets::combobox::{
    Combobox, ComboboxAccessibility, ComboboxController, ComboboxTheme, ControllerInput,
    OptionAccessibility, OptionList, SelectOption, Transition, DEFAULT_MAX_VISIBLE,
};

pub use crate::runtime::Screen;

/// Returns whether a component exposes focus behavior via [`Focusable`].
pub fn is_focusable(component: &mut dyn Component) -> bool {
    component.as_focusable().is_some()
}

/// ANSI-aware truncation helper.
pub use crate::core::text::utils::truncate_to_width;
/// Visible width helper that ignores ANSI control sequences.
pub use crate::core::text::width::visible_width;
