//! Key parsing and matching.
//!
//! Key ids are `+`-joined strings such as `"enter"`, `"shift+tab"` or `"ctrl+c"`. Modifiers are
//! always emitted in `ctrl`, `alt`, `shift` order; matching is case-insensitive and accepts the
//! `esc`/`return` aliases.

use std::sync::atomic::{AtomicBool, Ordering};

static KITTY_PROTOCOL_ACTIVE: AtomicBool = AtomicBool::new(false);

pub fn set_kitty_protocol_active(active: bool) {
    KITTY_PROTOCOL_ACTIVE.store(active, Ordering::SeqCst);
}

pub fn is_kitty_protocol_active() -> bool {
    KITTY_PROTOCOL_ACTIVE.load(Ordering::SeqCst)
}

const MOD_SHIFT: u8 = 1;
const MOD_ALT: u8 = 2;
const MOD_CTRL: u8 = 4;
const LOCK_MASK: u8 = 64 + 128;

const CODEPOINT_ESCAPE: u32 = 27;
const CODEPOINT_TAB: u32 = 9;
const CODEPOINT_ENTER: u32 = 13;
const CODEPOINT_SPACE: u32 = 32;
const CODEPOINT_BACKSPACE: u32 = 127;
const CODEPOINT_KP_ENTER: u32 = 57414;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventType {
    Press,
    Repeat,
    Release,
}

/// A decoded `CSI ... <final>` key report (legacy modifier form or kitty keyboard protocol).
#[derive(Debug, Clone, PartialEq, Eq)]
struct CsiKey {
    base: String,
    modifier: u8,
    event_type: KeyEventType,
    codepoint: Option<u32>,
}

pub fn is_key_release(data: &str) -> bool {
    if data.contains("\x1b[200~") {
        return false;
    }
    parse_key_event_type(data) == KeyEventType::Release
}

pub fn is_key_repeat(data: &str) -> bool {
    parse_key_event_type(data) == KeyEventType::Repeat
}

pub fn parse_key_event_type(data: &str) -> KeyEventType {
    parse_csi_key(data)
        .map(|key| key.event_type)
        .unwrap_or(KeyEventType::Press)
}

/// Returns whether `data` is the key described by `key_id`.
pub fn matches_key(data: &str, key_id: &str) -> bool {
    let Some(expected) = normalize_key_id(key_id) else {
        return false;
    };
    let Some(actual) = parse_key(data) else {
        return false;
    };
    normalize_key_id(&actual).is_some_and(|actual| actual == expected)
}

/// Parses a single key sequence into a key id.
pub fn parse_key(data: &str) -> Option<String> {
    let kitty_active = is_kitty_protocol_active();

    if let Some(key) = legacy_key_id(data, kitty_active) {
        return Some(key.to_string());
    }

    if let Some(key) = parse_csi_key(data) {
        return Some(format_key_id(&key.base, key.modifier));
    }

    let mut chars = data.chars();
    let first = chars.next()?;
    let rest = chars.as_str();

    if rest.is_empty() {
        if let Some(letter) = ctrl_letter(first) {
            return Some(format!("ctrl+{letter}"));
        }
        if !first.is_control() {
            return Some(first.to_string());
        }
        return None;
    }

    if first == '\x1b' {
        let mut rest_chars = rest.chars();
        let second = rest_chars.next()?;
        if rest_chars.next().is_none() {
            if second == '\x7f' || second == '\x08' {
                return Some("alt+backspace".to_string());
            }
            if let Some(letter) = ctrl_letter(second) {
                return Some(format!("ctrl+alt+{letter}"));
            }
            if !second.is_control() {
                return Some(format!("alt+{second}"));
            }
        }
    }

    None
}

/// Returns the printable text carried by `data`, if any.
///
/// Space is treated as text; widgets that bind it as a key match on the raw sequence.
pub fn parse_text(data: &str, kitty_active: bool) -> Option<String> {
    if data.is_empty() {
        return None;
    }

    if kitty_active {
        if let Some(key) = parse_csi_key(data) {
            let codepoint = key.codepoint?;
            if key.modifier & !MOD_SHIFT != 0 {
                return None;
            }
            let ch = char::from_u32(codepoint)?;
            if ch.is_control() {
                return None;
            }
            return Some(ch.to_string());
        }
    }

    if data.chars().any(|ch| ch.is_control()) {
        return None;
    }
    Some(data.to_string())
}

fn legacy_key_id(data: &str, kitty_active: bool) -> Option<&'static str> {
    let key = match data {
        "\x1b" => "escape",
        "\r" => "enter",
        "\n" if kitty_active => "shift+enter",
        "\n" => "enter",
        "\x1b\r" => "alt+enter",
        "\t" => "tab",
        "\x1b[Z" => "shift+tab",
        " " => "space",
        "\x00" => "ctrl+space",
        "\x7f" | "\x08" => "backspace",
        "\x1b[A" | "\x1bOA" => "up",
        "\x1b[B" | "\x1bOB" => "down",
        "\x1b[C" | "\x1bOC" => "right",
        "\x1b[D" | "\x1bOD" => "left",
        "\x1b[H" | "\x1bOH" | "\x1b[1~" | "\x1b[7~" => "home",
        "\x1b[F" | "\x1bOF" | "\x1b[4~" | "\x1b[8~" => "end",
        "\x1b[2~" => "insert",
        "\x1b[3~" => "delete",
        "\x1b[5~" => "pageUp",
        "\x1b[6~" => "pageDown",
        _ => return None,
    };
    Some(key)
}

fn ctrl_letter(ch: char) -> Option<char> {
    let code = ch as u32;
    if (1..=26).contains(&code) && !matches!(ch, '\t' | '\r' | '\n' | '\x08') {
        return char::from_u32(code + 96);
    }
    None
}

fn parse_csi_key(data: &str) -> Option<CsiKey> {
    let body = data.strip_prefix("\x1b[")?;
    let final_char = body.chars().last()?;
    let params = &body[..body.len() - final_char.len_utf8()];
    if params.starts_with('<') || params.starts_with('?') {
        return None;
    }

    let mut fields = params.split(';');
    let key_field = fields.next().unwrap_or("");
    let mod_field = fields.next();
    if fields.next().is_some() && final_char != 'u' {
        return None;
    }

    let (modifier, event_type) = parse_modifier_field(mod_field)?;
    let key_number = key_field.split(':').next().unwrap_or("");

    let (base, codepoint) = match final_char {
        'u' => {
            let codepoint: u32 = key_number.parse().ok()?;
            (codepoint_key_name(codepoint)?, Some(codepoint))
        }
        'A' | 'B' | 'C' | 'D' | 'H' | 'F' => {
            if !(key_number.is_empty() || key_number == "1") || mod_field.is_none() {
                return None;
            }
            let base = match final_char {
                'A' => "up",
                'B' => "down",
                'C' => "right",
                'D' => "left",
                'H' => "home",
                _ => "end",
            };
            (base.to_string(), None)
        }
        '~' => {
            if mod_field.is_none() {
                return None;
            }
            let base = match key_number {
                "1" | "7" => "home",
                "2" => "insert",
                "3" => "delete",
                "4" | "8" => "end",
                "5" => "pageUp",
                "6" => "pageDown",
                _ => return None,
            };
            (base.to_string(), None)
        }
        _ => return None,
    };

    Some(CsiKey {
        base,
        modifier,
        event_type,
        codepoint,
    })
}

fn parse_modifier_field(field: Option<&str>) -> Option<(u8, KeyEventType)> {
    let Some(field) = field else {
        return Some((0, KeyEventType::Press));
    };
    let mut parts = field.split(':');
    let raw_modifier: u8 = match parts.next() {
        Some("") | None => 1,
        Some(value) => value.parse().ok()?,
    };
    let event_type = match parts.next() {
        None | Some("1") => KeyEventType::Press,
        Some("2") => KeyEventType::Repeat,
        Some("3") => KeyEventType::Release,
        Some(_) => return None,
    };
    let modifier = raw_modifier.saturating_sub(1) & !LOCK_MASK;
    Some((modifier, event_type))
}

fn codepoint_key_name(codepoint: u32) -> Option<String> {
    let name = match codepoint {
        CODEPOINT_ESCAPE => "escape".to_string(),
        CODEPOINT_TAB => "tab".to_string(),
        CODEPOINT_ENTER | CODEPOINT_KP_ENTER => "enter".to_string(),
        CODEPOINT_SPACE => "space".to_string(),
        CODEPOINT_BACKSPACE => "backspace".to_string(),
        _ => {
            let ch = char::from_u32(codepoint)?;
            if ch.is_control() {
                return None;
            }
            ch.to_lowercase().to_string()
        }
    };
    Some(name)
}

fn format_key_id(base: &str, modifier: u8) -> String {
    let mut key = String::new();
    if modifier & MOD_CTRL != 0 {
        key.push_str("ctrl+");
    }
    if modifier & MOD_ALT != 0 {
        key.push_str("alt+");
    }
    if modifier & MOD_SHIFT != 0 {
        key.push_str("shift+");
    }
    key.push_str(base);
    key
}

fn normalize_key_id(key_id: &str) -> Option<String> {
    let lowered = key_id.trim().to_lowercase();
    if lowered.is_empty() {
        return None;
    }
    // "+" on its own (or as the final segment after a modifier) is the plus key.
    let (modifiers, base) = match lowered.strip_suffix("++") {
        Some(prefix) => (prefix, "+"),
        None if lowered == "+" => ("", "+"),
        None => match lowered.rsplit_once('+') {
            Some((modifiers, base)) => (modifiers, base),
            None => ("", lowered.as_str()),
        },
    };

    let mut modifier = 0u8;
    for part in modifiers.split('+').filter(|part| !part.is_empty()) {
        modifier |= match part {
            "ctrl" => MOD_CTRL,
            "alt" => MOD_ALT,
            "shift" => MOD_SHIFT,
            _ => return None,
        };
    }

    let base = match base {
        "esc" => "escape",
        "return" => "enter",
        other => other,
    };
    Some(format_key_id(base, modifier))
}
