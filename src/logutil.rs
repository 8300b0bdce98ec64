//! Log-safe rendering of chat text and user identifiers.

use std::fmt::Write;

/// Longest preview of user text kept in a log line, in characters.
pub const MAX_LOG_CHARS: usize = 200;

/// Escape `s` so it fits on one log line: backslash, newline, carriage return and tab
/// become their escape sequences, other control characters become `\xNN`. Output is
/// cut at [`MAX_LOG_CHARS`] input characters with a trailing ellipsis.
pub fn escape_log(s: &str) -> String {
    escape_log_max(s, MAX_LOG_CHARS)
}

pub fn escape_log_max(s: &str, max_chars: usize) -> String {
    let mut out = String::with_capacity(s.len().min(max_chars) + 4);
    for (i, ch) in s.chars().enumerate() {
        if i == max_chars {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

/// `name (id)` with both halves escaped, for lines that mention a player.
pub fn who(display_name: &str, user_id: &str) -> String {
    format!("{} ({})", escape_log(display_name), escape_log(user_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_line_chat_stays_on_one_line() {
        assert_eq!(escape_log("!buy\nJutsu\tScroll"), "!buy\\nJutsu\\tScroll");
        assert_eq!(escape_log("a\\b\u{1}"), "a\\\\b\\x01");
    }

    #[test]
    fn long_text_is_cut() {
        let out = escape_log_max("abcdef", 3);
        assert_eq!(out, "abc…");
        assert_eq!(escape_log_max("abc", 3), "abc");
    }

    #[test]
    fn who_escapes_both_parts() {
        assert_eq!(who("Rock\nLee", "42"), "Rock\\nLee (42)");
    }
}
