//! Single-select combobox widget.
//!
//! The widget is controlled: the caller owns the selected value and the option list, and is
//! notified through the commit callback when the user confirms a choice. The widget keeps only
//! its open/focus state and, while open, a host pointer listener that closes the list when the
//! user presses anywhere outside it.

pub mod controller;
pub mod options;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::core::component::{Component, ComponentId, Deferred, Focusable, MountContext};
use crate::core::input::KeyEventType;
use crate::core::input_event::InputEvent;
use crate::core::keybindings::{get_combobox_keybindings, lock_keybindings, ComboboxAction};
use crate::core::pointer::{ListenerGuard, PointerEvent, PointerHub};
use crate::core::text::utils::{normalize_to_single_line, pad_to_width, truncate_to_width};
use crate::core::text::width::visible_width;

pub use controller::{ComboboxController, ControllerInput, Transition};
pub use options::{OptionList, SelectOption};

pub const DEFAULT_MAX_VISIBLE: usize = 8;

const FOCUS_PREFIX: &str = "→ ";
const BLANK_PREFIX: &str = "  ";
const SELECTED_MARK: &str = " ✓";
const ARROW_CLOSED: &str = "▾";
const ARROW_OPEN: &str = "▴";
const ELLIPSIS: &str = "…";
const NO_OPTIONS: &str = "  No options";

type Style = Box<dyn Fn(&str) -> String>;
type CommitHandler = Rc<RefCell<Box<dyn FnMut(&str)>>>;

pub struct ComboboxTheme {
    pub label: Style,
    pub trigger: Style,
    pub trigger_focused: Style,
    pub placeholder: Style,
    pub option: Style,
    pub selected: Style,
    pub focused: Style,
    pub scroll_info: Style,
    pub empty: Style,
}

impl ComboboxTheme {
    /// Theme that leaves every string unstyled.
    pub fn plain() -> Self {
        Self {
            label: Box::new(|text| text.to_string()),
            trigger: Box::new(|text| text.to_string()),
            trigger_focused: Box::new(|text| text.to_string()),
            placeholder: Box::new(|text| text.to_string()),
            option: Box::new(|text| text.to_string()),
            selected: Box::new(|text| text.to_string()),
            focused: Box::new(|text| text.to_string()),
            scroll_info: Box::new(|text| text.to_string()),
            empty: Box::new(|text| text.to_string()),
        }
    }
}

/// Snapshot of the widget's accessible state, mirroring the ARIA combobox pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboboxAccessibility {
    pub role: &'static str,
    pub has_popup: &'static str,
    pub expanded: bool,
    pub label: Option<String>,
    /// Text shown on the trigger: the selected label or the placeholder.
    pub value_text: String,
    /// Value of the keyboard-focused option, when open.
    pub active_descendant: Option<String>,
    /// Listbox entries; empty while collapsed since the list is not rendered.
    pub options: Vec<OptionAccessibility>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionAccessibility {
    pub value: String,
    pub label: String,
    pub selected: bool,
    pub focused: bool,
}

/// Row roles recorded by the last render, used for hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowHit {
    Label,
    Trigger,
    Option(usize),
    Decoration,
}

#[derive(Debug, Default)]
struct RenderedRows {
    rows: Vec<RowHit>,
}

impl RenderedRows {
    fn hit(&self, row: u16) -> Option<RowHit> {
        self.rows.get(usize::from(row)).copied()
    }
}

/// State reachable from the outside-press listener.
#[derive(Default)]
struct Shared {
    controller: ComboboxController,
    dismissal: Option<ListenerGuard>,
}

struct Attachment {
    pointer: PointerHub,
    owner: ComponentId,
}

pub struct Combobox {
    shared: Rc<RefCell<Shared>>,
    options: OptionList,
    selection: String,
    placeholder: String,
    label: Option<String>,
    max_visible: usize,
    theme: ComboboxTheme,
    on_commit: Option<CommitHandler>,
    /// Collects commit notifications while a wrapper holds this widget borrowed.
    deferred: Option<Vec<Deferred>>,
    focused: bool,
    rows: RenderedRows,
    attachment: Option<Attachment>,
}

impl Combobox {
    pub fn new(
        selection: impl Into<String>,
        options: impl Into<OptionList>,
        placeholder: impl Into<String>,
        theme: ComboboxTheme,
    ) -> Self {
        Self {
            shared: Rc::new(RefCell::new(Shared::default())),
            options: options.into(),
            selection: selection.into(),
            placeholder: placeholder.into(),
            label: None,
            max_visible: DEFAULT_MAX_VISIBLE,
            theme,
            on_commit: None,
            deferred: None,
            focused: false,
            rows: RenderedRows::default(),
            attachment: None,
        }
    }

    pub fn set_on_commit(&mut self, handler: Option<Box<dyn FnMut(&str)>>) {
        self.on_commit = handler.map(|handler| Rc::new(RefCell::new(handler)));
    }

    pub fn set_selection(&mut self, selection: impl Into<String>) {
        self.selection = selection.into();
    }

    pub fn selection(&self) -> &str {
        &self.selection
    }

    /// Replaces the option list. Keyboard focus is reconciled on the next render or input.
    pub fn set_options(&mut self, options: impl Into<OptionList>) {
        self.options = options.into();
    }

    pub fn options(&self) -> &OptionList {
        &self.options
    }

    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.placeholder = placeholder.into();
    }

    pub fn set_label(&mut self, label: Option<String>) {
        self.label = label;
    }

    pub fn set_max_visible(&mut self, max_visible: usize) {
        self.max_visible = max_visible.max(1);
    }

    pub fn is_open(&self) -> bool {
        self.shared.borrow().controller.is_open()
    }

    /// Keyboard-focused option index as the next render will show it.
    pub fn focused_index(&self) -> Option<usize> {
        self.shared
            .borrow()
            .controller
            .focused_within(self.options.len())
    }

    /// Index of the option matching the current selection, found by linear scan.
    pub fn selected_index(&self) -> Option<usize> {
        self.options.position(&self.selection)
    }

    /// Whether an outside-press listener is currently registered.
    pub fn is_dismissal_active(&self) -> bool {
        self.shared.borrow().dismissal.is_some()
    }

    /// Closes the list without committing.
    pub fn close(&mut self) {
        let transition = self.shared.borrow_mut().controller.close();
        self.finish(transition);
    }

    /// Feeds one controller input, committing through the callback when the input confirms a
    /// choice.
    pub fn apply(&mut self, input: ControllerInput) -> Transition {
        let transition = self
            .shared
            .borrow_mut()
            .controller
            .apply(input, self.options.len());
        self.finish(transition);
        transition
    }

    pub fn accessibility(&self) -> ComboboxAccessibility {
        let expanded = self.is_open();
        let focused = self.focused_index();
        let selected = self.selected_index();

        let options = if expanded {
            self.options
                .iter()
                .enumerate()
                .map(|(index, option)| OptionAccessibility {
                    value: option.value.clone(),
                    label: option.label.clone(),
                    selected: Some(index) == selected,
                    focused: Some(index) == focused,
                })
                .collect()
        } else {
            Vec::new()
        };

        ComboboxAccessibility {
            role: "combobox",
            has_popup: "listbox",
            expanded,
            label: self.label.clone(),
            value_text: self.trigger_text().to_string(),
            active_descendant: focused
                .and_then(|index| self.options.get(index))
                .map(|option| option.value.clone()),
            options,
        }
    }

    fn finish(&mut self, transition: Transition) {
        if let Transition::Committed(index) = transition {
            self.commit(index);
        }
        self.sync_dismissal();
    }

    fn commit(&mut self, index: usize) {
        let Some(option) = self.options.get(index) else {
            return;
        };
        let value = option.value.clone();
        tracing::debug!(value = %value, index, "combobox commit");
        let Some(handler) = self.on_commit.clone() else {
            return;
        };
        match self.deferred.as_mut() {
            Some(queue) => queue.push(Box::new(move || notify_commit(&handler, &value))),
            None => notify_commit(&handler, &value),
        }
    }

    /// Holds the outside-press listener exactly while the list is open.
    fn sync_dismissal(&mut self) {
        let mut shared = self.shared.borrow_mut();
        if !shared.controller.is_open() {
            if shared.dismissal.take().is_some() {
                tracing::trace!("outside-press listener released");
            }
            return;
        }
        if shared.dismissal.is_some() {
            return;
        }
        let Some(attachment) = self.attachment.as_ref() else {
            return;
        };
        let weak = Rc::downgrade(&self.shared);
        let owner = attachment.owner;
        shared.dismissal = Some(
            attachment
                .pointer
                .subscribe(move |event| dismiss_on_outside_press(&weak, owner, event)),
        );
        tracing::trace!(owner = owner.raw(), "outside-press listener acquired");
    }

    fn trigger_text(&self) -> &str {
        self.options
            .label_for(&self.selection)
            .unwrap_or(&self.placeholder)
    }

    fn render_trigger(&self, width: usize, open: bool) -> String {
        let arrow = if open { ARROW_OPEN } else { ARROW_CLOSED };
        let text_width = width.saturating_sub(visible_width(arrow) + 1);
        let text = match self.options.label_for(&self.selection) {
            Some(label) => pad_to_width(
                &truncate_to_width(&normalize_to_single_line(label), text_width, ELLIPSIS, false),
                text_width,
            ),
            None => {
                let placeholder = truncate_to_width(
                    &normalize_to_single_line(&self.placeholder),
                    text_width,
                    ELLIPSIS,
                    false,
                );
                let padding = " ".repeat(text_width.saturating_sub(visible_width(&placeholder)));
                format!("{}{padding}", (self.theme.placeholder)(&placeholder))
            }
        };

        let line = truncate_to_width(&format!("{text} {arrow}"), width, "", false);
        if self.focused {
            (self.theme.trigger_focused)(&line)
        } else {
            (self.theme.trigger)(&line)
        }
    }

    fn render_option(
        &self,
        width: usize,
        index: usize,
        option: &SelectOption,
        focused: Option<usize>,
        selected: Option<usize>,
    ) -> String {
        let is_focused = focused == Some(index);
        let is_selected = selected == Some(index);

        let prefix = if is_focused { FOCUS_PREFIX } else { BLANK_PREFIX };
        let suffix = if is_selected { SELECTED_MARK } else { "" };
        let label_width = width.saturating_sub(visible_width(prefix) + visible_width(suffix));
        let label = truncate_to_width(&normalize_to_single_line(&option.label), label_width, ELLIPSIS, false);
        let line = truncate_to_width(&format!("{prefix}{label}{suffix}"), width, "", false);

        match (is_selected, is_focused) {
            (true, true) => (self.theme.focused)(&(self.theme.selected)(&line)),
            (true, false) => (self.theme.selected)(&line),
            (false, true) => (self.theme.focused)(&line),
            (false, false) => (self.theme.option)(&line),
        }
    }

    /// Visible option range: a window of `max_visible` rows kept around the focused option (or
    /// the selected one, or the top).
    fn visible_range(&self, focused: Option<usize>, selected: Option<usize>) -> (usize, usize) {
        let len = self.options.len();
        let max_visible = self.max_visible.max(1).min(len);
        if len <= max_visible {
            return (0, len);
        }
        let anchor = focused.or(selected).unwrap_or(0);
        let start = anchor.saturating_sub(max_visible / 2).min(len - max_visible);
        (start, start + max_visible)
    }

    fn handle_key(&mut self, raw: &str) {
        let action = {
            let keybindings = get_combobox_keybindings();
            let keybindings = lock_keybindings(&keybindings);
            keybindings.action_for(raw)
        };
        let Some(action) = action else {
            return;
        };
        let input = match action {
            ComboboxAction::Activate => ControllerInput::Activate,
            ComboboxAction::Dismiss => ControllerInput::Dismiss,
            ComboboxAction::FocusNext => ControllerInput::FocusNext,
            ComboboxAction::FocusPrevious => ControllerInput::FocusPrevious,
        };
        self.apply(input);
    }
}

fn notify_commit(handler: &CommitHandler, value: &str) {
    let Ok(mut handler) = handler.try_borrow_mut() else {
        tracing::warn!(value, "commit callback re-entered; notification dropped");
        return;
    };
    (*handler)(value);
}

fn dismiss_on_outside_press(shared: &Weak<RefCell<Shared>>, owner: ComponentId, event: &PointerEvent) {
    if !event.is_press_outside(owner) {
        return;
    }
    let Some(shared) = shared.upgrade() else {
        return;
    };
    let Ok(mut shared) = shared.try_borrow_mut() else {
        tracing::trace!(owner = owner.raw(), "combobox busy; outside press ignored");
        return;
    };
    if shared.controller.apply(ControllerInput::PressOutside, usize::MAX) == Transition::Closed {
        tracing::debug!(owner = owner.raw(), "combobox dismissed by outside press");
    }
    let released = shared.dismissal.take();
    drop(shared);
    drop(released);
}

impl Component for Combobox {
    fn render(&mut self, width: usize) -> Vec<String> {
        let (open, focused) = {
            let mut shared = self.shared.borrow_mut();
            shared.controller.reconcile(self.options.len());
            (shared.controller.is_open(), shared.controller.focused())
        };

        let mut lines = Vec::new();
        let mut rows = Vec::new();

        if let Some(label) = self.label.as_deref() {
            let label = truncate_to_width(&normalize_to_single_line(label), width, ELLIPSIS, false);
            lines.push((self.theme.label)(&label));
            rows.push(RowHit::Label);
        }

        lines.push(self.render_trigger(width, open));
        rows.push(RowHit::Trigger);

        if open {
            if self.options.is_empty() {
                lines.push((self.theme.empty)(NO_OPTIONS));
                rows.push(RowHit::Decoration);
            } else {
                let selected = self.selected_index();
                let (start, end) = self.visible_range(focused, selected);
                for index in start..end {
                    let Some(option) = self.options.get(index) else {
                        continue;
                    };
                    lines.push(self.render_option(width, index, option, focused, selected));
                    rows.push(RowHit::Option(index));
                }

                if start > 0 || end < self.options.len() {
                    let position = focused.or(selected).unwrap_or(start);
                    let info = format!("  ({}/{})", position + 1, self.options.len());
                    let info = truncate_to_width(&info, width, "", false);
                    lines.push((self.theme.scroll_info)(&info));
                    rows.push(RowHit::Decoration);
                }
            }
        }

        self.rows = RenderedRows { rows };
        lines
    }

    fn handle_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::Key {
                raw, event_type, ..
            }
            | InputEvent::Text {
                raw, event_type, ..
            } => {
                if *event_type != KeyEventType::Release {
                    self.handle_key(raw);
                }
            }
            InputEvent::Mouse(mouse) if mouse.is_primary_press() => {
                match self.rows.hit(mouse.row) {
                    Some(RowHit::Trigger) => {
                        self.apply(ControllerInput::Activate);
                    }
                    Some(RowHit::Option(index)) => {
                        self.apply(ControllerInput::ClickOption(index));
                    }
                    Some(RowHit::Label | RowHit::Decoration) => {}
                    None => {
                        self.apply(ControllerInput::PressOutside);
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_event_deferred(&mut self, event: &InputEvent) -> Vec<Deferred> {
        let outer = self.deferred.replace(Vec::new());
        self.handle_event(event);
        std::mem::replace(&mut self.deferred, outer).unwrap_or_default()
    }

    fn invalidate(&mut self) {
        self.rows = RenderedRows::default();
    }

    fn mounted(&mut self, ctx: &MountContext) {
        self.attachment = Some(Attachment {
            pointer: ctx.pointer.clone(),
            owner: ctx.id,
        });
        self.sync_dismissal();
    }

    fn unmounted(&mut self) {
        self.shared.borrow_mut().controller.close();
        self.sync_dismissal();
        self.attachment = None;
    }

    fn as_focusable(&mut self) -> Option<&mut dyn Focusable> {
        Some(self)
    }
}

impl Focusable for Combobox {
    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn is_focused(&self) -> bool {
        self.focused
    }
}
