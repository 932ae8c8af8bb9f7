//! Core interfaces and types shared by widgets and the host runtime.

pub mod component;
pub mod input;
pub mod input_event;
pub mod keybindings;
pub mod pointer;
pub mod text;
