//! Open/close and keyboard-focus state machine for a single-select combobox.
//!
//! The controller owns no options. Every call receives the length of the option list as
//! currently held by the widget and reconciles against it first, so callers may replace the
//! list at any time without notifying the controller.

/// Discrete input understood by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerInput {
    /// Trigger click, or Enter/Space.
    Activate,
    Dismiss,
    FocusNext,
    FocusPrevious,
    ClickOption(usize),
    PressOutside,
}

/// Observable result of one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Opened,
    Closed,
    Focused(usize),
    /// The list closed and the option at this index must be committed.
    Committed(usize),
    Ignored,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComboboxController {
    open: bool,
    focused: Option<usize>,
}

impl ComboboxController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Keyboard-focused option. Always `None` while closed.
    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    /// Focused index as it will be after reconciling against `option_count`.
    pub fn focused_within(&self, option_count: usize) -> Option<usize> {
        let last = option_count.checked_sub(1)?;
        self.focused.map(|index| index.min(last))
    }

    /// Clamps the focused index into the current list. Returns whether it changed.
    pub fn reconcile(&mut self, option_count: usize) -> bool {
        let clamped = self.focused_within(option_count);
        if clamped == self.focused {
            return false;
        }
        tracing::debug!(
            from = ?self.focused,
            to = ?clamped,
            option_count,
            "focused option clamped to shrunken list"
        );
        self.focused = clamped;
        true
    }

    pub fn apply(&mut self, input: ControllerInput, option_count: usize) -> Transition {
        self.reconcile(option_count);

        let transition = if !self.open {
            match input {
                ControllerInput::Activate
                | ControllerInput::FocusNext
                | ControllerInput::FocusPrevious => self.open_list(),
                ControllerInput::Dismiss
                | ControllerInput::ClickOption(_)
                | ControllerInput::PressOutside => Transition::Ignored,
            }
        } else {
            match input {
                ControllerInput::Activate => match self.focused {
                    Some(index) if index < option_count => self.commit(index),
                    _ => self.close(),
                },
                ControllerInput::Dismiss | ControllerInput::PressOutside => self.close(),
                ControllerInput::FocusNext => match option_count.checked_sub(1) {
                    Some(last) => {
                        let next = self.focused.map_or(0, |index| (index + 1).min(last));
                        self.focus(next)
                    }
                    None => Transition::Ignored,
                },
                ControllerInput::FocusPrevious => {
                    if option_count == 0 {
                        Transition::Ignored
                    } else {
                        let previous = self.focused.map_or(0, |index| index.saturating_sub(1));
                        self.focus(previous)
                    }
                }
                ControllerInput::ClickOption(index) if index < option_count => self.commit(index),
                ControllerInput::ClickOption(index) => {
                    tracing::debug!(index, option_count, "click on stale option ignored");
                    Transition::Ignored
                }
            }
        };

        tracing::trace!(?input, ?transition, focused = ?self.focused, "combobox transition");
        transition
    }

    /// Closes without committing. A no-op when already closed.
    pub fn close(&mut self) -> Transition {
        if !self.open {
            return Transition::Ignored;
        }
        self.open = false;
        self.focused = None;
        Transition::Closed
    }

    fn open_list(&mut self) -> Transition {
        self.open = true;
        self.focused = None;
        Transition::Opened
    }

    fn focus(&mut self, index: usize) -> Transition {
        self.focused = Some(index);
        Transition::Focused(index)
    }

    fn commit(&mut self, index: usize) -> Transition {
        self.close();
        Transition::Committed(index)
    }
}

#[cfg(test)]
mod tests {
    use super::{ComboboxController, ControllerInput, Transition};

    fn opened() -> ComboboxController {
        let mut controller = ComboboxController::new();
        assert_eq!(controller.apply(ControllerInput::Activate, 3), Transition::Opened);
        controller
    }

    #[test]
    fn starts_closed_without_focus() {
        let controller = ComboboxController::new();
        assert!(!controller.is_open());
        assert_eq!(controller.focused(), None);
    }

    #[test]
    fn activate_toggles_when_nothing_is_focused() {
        let mut controller = opened();
        assert_eq!(controller.focused(), None);
        assert_eq!(controller.apply(ControllerInput::Activate, 3), Transition::Closed);
        assert!(!controller.is_open());
    }

    #[test]
    fn arrows_open_a_closed_list_without_moving_focus() {
        let mut controller = ComboboxController::new();
        assert_eq!(controller.apply(ControllerInput::FocusPrevious, 3), Transition::Opened);
        assert_eq!(controller.focused(), None);

        let mut controller = ComboboxController::new();
        assert_eq!(controller.apply(ControllerInput::FocusNext, 3), Transition::Opened);
        assert_eq!(controller.focused(), None);
    }

    #[test]
    fn focus_next_strictly_increases_then_saturates() {
        for count in 1..6 {
            let mut controller = ComboboxController::new();
            controller.apply(ControllerInput::Activate, count);
            let mut previous = None;
            for _ in 0..count + 3 {
                controller.apply(ControllerInput::FocusNext, count);
                let focused = controller.focused().expect("focus after arrow");
                assert!(focused < count);
                if let Some(previous) = previous {
                    assert!(focused > previous || focused == count - 1);
                }
                previous = Some(focused);
            }
            assert_eq!(controller.focused(), Some(count - 1));
        }
    }

    #[test]
    fn focus_previous_saturates_at_zero() {
        let mut controller = opened();
        assert_eq!(controller.apply(ControllerInput::FocusPrevious, 3), Transition::Focused(0));
        controller.apply(ControllerInput::FocusNext, 3);
        controller.apply(ControllerInput::FocusNext, 3);
        for _ in 0..5 {
            controller.apply(ControllerInput::FocusPrevious, 3);
        }
        assert_eq!(controller.focused(), Some(0));
        assert!(controller.is_open());
    }

    #[test]
    fn activate_commits_focused_option_and_closes() {
        let mut controller = opened();
        controller.apply(ControllerInput::FocusNext, 3);
        controller.apply(ControllerInput::FocusNext, 3);
        assert_eq!(controller.apply(ControllerInput::Activate, 3), Transition::Committed(1));
        assert!(!controller.is_open());
        assert_eq!(controller.focused(), None);
    }

    #[test]
    fn reopening_resets_focus() {
        let mut controller = opened();
        controller.apply(ControllerInput::FocusNext, 3);
        controller.apply(ControllerInput::Dismiss, 3);
        controller.apply(ControllerInput::Activate, 3);
        assert_eq!(controller.focused(), None);
    }

    #[test]
    fn click_commits_regardless_of_focus() {
        let mut controller = opened();
        controller.apply(ControllerInput::FocusNext, 3);
        assert_eq!(controller.apply(ControllerInput::ClickOption(2), 3), Transition::Committed(2));
    }

    #[test]
    fn closed_inputs_without_open_semantics_are_ignored() {
        let mut controller = ComboboxController::new();
        assert_eq!(controller.apply(ControllerInput::Dismiss, 3), Transition::Ignored);
        assert_eq!(controller.apply(ControllerInput::PressOutside, 3), Transition::Ignored);
        assert_eq!(controller.apply(ControllerInput::ClickOption(0), 3), Transition::Ignored);
        assert_eq!(controller, ComboboxController::new());
    }

    #[test]
    fn outside_press_closes_without_commit() {
        let mut controller = opened();
        controller.apply(ControllerInput::FocusNext, 3);
        assert_eq!(controller.apply(ControllerInput::PressOutside, 3), Transition::Closed);
    }

    #[test]
    fn shrinking_list_clamps_focus() {
        let mut controller = ComboboxController::new();
        controller.apply(ControllerInput::Activate, 5);
        for _ in 0..5 {
            controller.apply(ControllerInput::FocusNext, 5);
        }
        assert_eq!(controller.focused(), Some(4));

        assert_eq!(controller.focused_within(2), Some(1));
        assert!(controller.reconcile(2));
        assert_eq!(controller.focused(), Some(1));
        assert!(!controller.reconcile(2));

        assert!(controller.reconcile(0));
        assert_eq!(controller.focused(), None);
    }

    #[test]
    fn stale_inputs_after_shrink_are_no_ops() {
        let mut controller = ComboboxController::new();
        controller.apply(ControllerInput::Activate, 5);
        assert_eq!(controller.apply(ControllerInput::ClickOption(4), 2), Transition::Ignored);
        assert!(controller.is_open());

        assert_eq!(controller.apply(ControllerInput::FocusNext, 0), Transition::Ignored);
        assert_eq!(controller.apply(ControllerInput::FocusPrevious, 0), Transition::Ignored);
        assert_eq!(controller.apply(ControllerInput::Activate, 0), Transition::Closed);
    }

    #[test]
    fn enter_after_shrink_commits_clamped_index() {
        let mut controller = ComboboxController::new();
        controller.apply(ControllerInput::Activate, 5);
        for _ in 0..5 {
            controller.apply(ControllerInput::FocusNext, 5);
        }
        assert_eq!(controller.apply(ControllerInput::Activate, 2), Transition::Committed(1));
    }
}
