//! Option list supplied by the caller on every render.

use std::collections::HashSet;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Ordered, caller-owned options. Widgets index into it and never mutate it.
///
/// Values should be unique. When they are not, every entry still renders in order but
/// value lookups resolve to the first match.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OptionList {
    options: Vec<SelectOption>,
}

impl OptionList {
    pub fn new(options: Vec<SelectOption>) -> Self {
        let list = Self { options };
        if let Some(value) = list.first_duplicate() {
            tracing::warn!(
                value,
                count = list.len(),
                "duplicate option value; lookups resolve to the first match"
            );
        }
        list
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SelectOption> {
        self.options.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SelectOption> {
        self.options.iter()
    }

    pub fn as_slice(&self) -> &[SelectOption] {
        &self.options
    }

    /// Index of the first option whose value equals `value`. An empty value never matches.
    pub fn position(&self, value: &str) -> Option<usize> {
        if value.is_empty() {
            return None;
        }
        self.options.iter().position(|option| option.value == value)
    }

    pub fn label_for(&self, value: &str) -> Option<&str> {
        self.position(value)
            .and_then(|index| self.options.get(index))
            .map(|option| option.label.as_str())
    }

    pub fn first_duplicate(&self) -> Option<&str> {
        let mut seen = HashSet::with_capacity(self.options.len());
        self.options
            .iter()
            .find(|option| !seen.insert(option.value.as_str()))
            .map(|option| option.value.as_str())
    }
}

impl From<Vec<SelectOption>> for OptionList {
    fn from(options: Vec<SelectOption>) -> Self {
        Self::new(options)
    }
}

impl FromIterator<SelectOption> for OptionList {
    fn from_iter<I: IntoIterator<Item = SelectOption>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a OptionList {
    type Item = &'a SelectOption;
    type IntoIter = std::slice::Iter<'a, SelectOption>;

    fn into_iter(self) -> Self::IntoIter {
        self.options.iter()
    }
}
