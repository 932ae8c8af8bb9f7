//! Truncation and padding helpers.

use unicode_segmentation::UnicodeSegmentation;

use super::ansi::extract_ansi_code;
use super::width::visible_width;

const ANSI_RESET: &str = "\x1b[0m";

/// Collapses line breaks into single spaces and trims the result.
pub fn normalize_to_single_line(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_break = false;
    for ch in text.chars() {
        if ch == '\n' || ch == '\r' {
            if !last_was_break {
                out.push(' ');
            }
            last_was_break = true;
        } else {
            out.push(ch);
            last_was_break = false;
        }
    }
    out.trim().to_string()
}

/// Right-pads `text` with spaces up to `width` visible cells.
pub fn pad_to_width(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(visible_width(text));
    if padding == 0 {
        return text.to_string();
    }
    format!("{text}{}", " ".repeat(padding))
}

pub fn truncate_to_width(text: &str, max_width: usize, ellipsis: &str, pad: bool) -> String {
    if max_width == 0 {
        return String::new();
    }

    let text_width = visible_width(text);
    if text_width <= max_width {
        return if pad {
            pad_to_width(text, max_width)
        } else {
            text.to_string()
        };
    }

    let target_width = max_width.saturating_sub(visible_width(ellipsis));
    if target_width == 0 {
        return ellipsis.chars().take(max_width).collect();
    }

    let mut truncated = String::new();
    let mut current_width = 0;
    let mut idx = 0;
    'scan: while idx < text.len() {
        if let Some(ansi) = extract_ansi_code(text, idx) {
            truncated.push_str(&ansi.code);
            idx += ansi.length;
            continue;
        }

        let run_end = next_ansi_or_end(text, idx);
        for grapheme in text[idx..run_end].graphemes(true) {
            let width = visible_width(grapheme);
            if current_width + width > target_width {
                break 'scan;
            }
            truncated.push_str(grapheme);
            current_width += width;
        }
        idx = run_end;
    }

    truncated.push_str(ANSI_RESET);
    truncated.push_str(ellipsis);

    if pad {
        return pad_to_width(&truncated, max_width);
    }
    truncated
}

fn next_ansi_or_end(input: &str, mut idx: usize) -> usize {
    while idx < input.len() {
        if extract_ansi_code(input, idx).is_some() {
            break;
        }
        let Some(ch) = input[idx..].chars().next() else {
            break;
        };
        idx += ch.len_utf8();
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::{normalize_to_single_line, pad_to_width, truncate_to_width};
    use crate::core::text::width::visible_width;

    #[test]
    fn truncate_returns_original_when_shorter() {
        assert_eq!(truncate_to_width("hello", 6, "...", false), "hello");
    }

    #[test]
    fn truncate_adds_ellipsis_and_reset() {
        let truncated = truncate_to_width("hello", 4, "...", false);
        assert_eq!(truncated, "h\x1b[0m...");
        assert_eq!(visible_width(&truncated), 4);
    }

    #[test]
    fn truncate_preserves_ansi_prefix() {
        let truncated = truncate_to_width("\x1b[31mhello", 4, "...", false);
        assert_eq!(truncated, "\x1b[31mh\x1b[0m...");
    }

    #[test]
    fn truncate_pads_when_requested() {
        assert_eq!(truncate_to_width("hi", 4, "...", true), "hi  ");
    }

    #[test]
    fn truncate_handles_small_max_width() {
        assert_eq!(truncate_to_width("hello", 2, "...", false), "..");
    }

    #[test]
    fn labels_collapse_to_one_line() {
        assert_eq!(normalize_to_single_line(" Birch\r\nplywood \n"), "Birch plywood");
        assert_eq!(pad_to_width("ab", 4), "ab  ");
    }
}
