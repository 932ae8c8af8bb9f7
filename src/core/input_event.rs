//! Structured input events produced by the host.

use crate::core::input::{parse_key, parse_key_event_type, parse_text, KeyEventType};

/// Phase of a mouse report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MousePhase {
    Down,
    Up,
    Drag,
    Move,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    WheelUp,
    WheelDown,
}

/// Mouse report in 0-based cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseInput {
    pub phase: MousePhase,
    pub button: Option<MouseButton>,
    pub column: u16,
    pub row: u16,
}

impl MouseInput {
    /// A button going down (wheel ticks excluded).
    pub fn is_press(&self) -> bool {
        self.phase == MousePhase::Down
            && matches!(
                self.button,
                Some(MouseButton::Left | MouseButton::Middle | MouseButton::Right)
            )
    }

    pub fn is_primary_press(&self) -> bool {
        self.phase == MousePhase::Down && self.button == Some(MouseButton::Left)
    }
}

/// Input event delivered to components.
///
/// Notes:
/// - `raw` is the exact sequence received from the terminal when applicable.
/// - `key_id` is a best-effort normalized identifier for matching keybindings.
/// - Mouse events carry no raw text: hosts rewrite their coordinates per component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key {
        raw: String,
        key_id: String,
        event_type: KeyEventType,
    },
    Text {
        raw: String,
        text: String,
        event_type: KeyEventType,
    },
    Paste {
        raw: String,
        text: String,
    },
    Mouse(MouseInput),
    UnknownRaw {
        raw: String,
    },
}

impl InputEvent {
    pub fn raw(&self) -> Option<&str> {
        match self {
            InputEvent::Key { raw, .. }
            | InputEvent::Text { raw, .. }
            | InputEvent::Paste { raw, .. }
            | InputEvent::UnknownRaw { raw } => Some(raw),
            InputEvent::Mouse(_) => None,
        }
    }
}

const PASTE_START: &str = "\x1b[200~";
const PASTE_END: &str = "\x1b[201~";
const SGR_MOUSE_PREFIX: &str = "\x1b[<";

pub fn parse_input_events(data: &str, kitty_active: bool) -> Vec<InputEvent> {
    if data.is_empty() {
        return Vec::new();
    }

    let mut events = Vec::new();
    let mut remaining = data;
    loop {
        let Some(start) = remaining.find(PASTE_START) else {
            events.extend(parse_non_paste(remaining, kitty_active));
            break;
        };

        let before = &remaining[..start];
        events.extend(parse_non_paste(before, kitty_active));

        let after_start = &remaining[start + PASTE_START.len()..];
        let Some(end_rel) = after_start.find(PASTE_END) else {
            events.push(InputEvent::UnknownRaw {
                raw: remaining[start..].to_string(),
            });
            break;
        };

        let raw_end = start + PASTE_START.len() + end_rel + PASTE_END.len();
        events.push(InputEvent::Paste {
            raw: remaining[start..raw_end].to_string(),
            text: after_start[..end_rel].to_string(),
        });

        remaining = &after_start[end_rel + PASTE_END.len()..];
        if remaining.is_empty() {
            break;
        }
    }

    events
}

fn parse_non_paste(data: &str, kitty_active: bool) -> Vec<InputEvent> {
    let mut events = Vec::new();
    let mut remaining = data;
    while let Some(start) = remaining.find(SGR_MOUSE_PREFIX) {
        if let Some(event) = parse_single(&remaining[..start], kitty_active) {
            events.push(event);
        }
        let report = &remaining[start..];
        match parse_sgr_mouse(report) {
            Some((mouse, consumed)) => {
                events.push(InputEvent::Mouse(mouse));
                remaining = &report[consumed..];
            }
            None => {
                events.push(InputEvent::UnknownRaw {
                    raw: report.to_string(),
                });
                return events;
            }
        }
    }
    if let Some(event) = parse_single(remaining, kitty_active) {
        events.push(event);
    }
    events
}

fn parse_single(data: &str, kitty_active: bool) -> Option<InputEvent> {
    if data.is_empty() {
        return None;
    }

    let event_type = parse_key_event_type(data);

    if let Some(text) = parse_text(data, kitty_active) {
        if event_type == KeyEventType::Release {
            return None;
        }
        return Some(InputEvent::Text {
            raw: data.to_string(),
            text,
            event_type,
        });
    }

    if let Some(key_id) = parse_key(data) {
        return Some(InputEvent::Key {
            raw: data.to_string(),
            key_id,
            event_type,
        });
    }

    Some(InputEvent::UnknownRaw {
        raw: data.to_string(),
    })
}

/// Parses one SGR (1006) mouse report at the start of `data`.
///
/// Returns the decoded report and the number of bytes it occupied.
pub fn parse_sgr_mouse(data: &str) -> Option<(MouseInput, usize)> {
    let body = data.strip_prefix(SGR_MOUSE_PREFIX)?;
    let end = body.find(['M', 'm'])?;
    let released = body.as_bytes()[end] == b'm';

    let mut fields = body[..end].split(';');
    let code: u16 = fields.next()?.parse().ok()?;
    let column: u16 = fields.next()?.parse().ok()?;
    let row: u16 = fields.next()?.parse().ok()?;
    if fields.next().is_some() {
        return None;
    }

    let motion = code & 32 != 0;
    let wheel = code & 64 != 0;
    let button = if wheel {
        match code & 0b11 {
            0 => Some(MouseButton::WheelUp),
            1 => Some(MouseButton::WheelDown),
            _ => None,
        }
    } else {
        match code & 0b11 {
            0 => Some(MouseButton::Left),
            1 => Some(MouseButton::Middle),
            2 => Some(MouseButton::Right),
            _ => None,
        }
    };

    let phase = if released {
        MousePhase::Up
    } else if motion && button.is_none() {
        MousePhase::Move
    } else if motion {
        MousePhase::Drag
    } else {
        MousePhase::Down
    };

    let mouse = MouseInput {
        phase,
        button,
        column: column.saturating_sub(1),
        row: row.saturating_sub(1),
    };
    Some((mouse, SGR_MOUSE_PREFIX.len() + end + 1))
}
