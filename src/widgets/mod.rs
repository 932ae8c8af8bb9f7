//! Widgets built on the core component contract.

pub mod combobox;

pub use combobox::{
    Combobox, ComboboxAccessibility, ComboboxTheme, OptionAccessibility, OptionList, SelectOption,
};
