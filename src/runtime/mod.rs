//! Host runtime: component registry, focus, and input routing.

pub mod component_registry;
pub mod focus;
pub mod screen;

pub use screen::Screen;
