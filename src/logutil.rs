//! Helpers for keeping log lines single-line when they carry authored or
//! player-supplied names (travel point names come from config files and admin commands).

use std::borrow::Cow;
use std::fmt::Write;

const MAX_PREVIEW: usize = 120;

/// Escape control characters (`\n`, `\r`, `\t`, others as `\xNN`) and backslashes,
/// and cut overly long names with an ellipsis. Clean short input is returned borrowed.
pub fn escape_log(s: &str) -> Cow<'_, str> {
    let clean = s.chars().count() <= MAX_PREVIEW
        && !s.chars().any(|c| c == '\\' || c.is_control());
    if clean {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len().min(MAX_PREVIEW) + 8);
    for (count, ch) in s.chars().enumerate() {
        if count >= MAX_PREVIEW {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(&mut out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}
