//! Text helpers (ANSI scanning, width calculations, truncation).
//!
//! These helpers are pure (string in/string out) so widgets can depend on them without
//! touching the host runtime.

pub mod ansi;
pub mod utils;
pub mod width;
