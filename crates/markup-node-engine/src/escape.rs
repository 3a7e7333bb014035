//! Entity escaping for attribute values and text content.

use std::borrow::Cow;

/// Replace `&`, `'`, `>`, `<` and `"` with their entities.
///
/// Ampersands are handled first so the entities produced for the other
/// characters are never escaped twice. Tag and attribute names are never
/// passed through here.
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '\'', '>', '<', '"']) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&apos;"),
            '>' => out.push_str("&gt;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}
