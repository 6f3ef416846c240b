//! String escape decoding and encoding.
//!
//! Decoding handles the JSON escapes `\" \\ \/ \b \f \n \r \t` and `\uXXXX`,
//! joining UTF-16 surrogate pairs. A surrogate without its partner decodes to
//! U+FFFD rather than failing the parse.
//!
//! Encoding writes a quoted JSON string. Stored strings are byte strings; any
//! bytes that are not valid UTF-8 are written as U+FFFD.

use std::fmt::Write;

/// Decode the body of a string token (without the quotes).
///
/// On a malformed escape, returns the byte offset of its backslash.
pub(crate) fn unescape(body: &str) -> Result<String, usize> {
    if !body.contains('\\') {
        return Ok(body.to_owned());
    }
    let mut out = String::with_capacity(body.len());
    let mut rest = body;
    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let offset = body.len() - rest.len() + pos;
        let after = &rest[pos + 1..];
        let (decoded, used) = decode_escape(after).ok_or(offset)?;
        out.push(decoded);
        rest = &after[used..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Decode one escape given the text after the backslash. Returns the
/// character and how many bytes of `after` it consumed.
fn decode_escape(after: &str) -> Option<(char, usize)> {
    let simple = match after.as_bytes().first()? {
        b'"' => '"',
        b'\\' => '\\',
        b'/' => '/',
        b'b' => '\u{8}',
        b'f' => '\u{c}',
        b'n' => '\n',
        b'r' => '\r',
        b't' => '\t',
        b'u' => return decode_unicode(&after[1..]).map(|(c, used)| (c, used + 1)),
        _ => return None,
    };
    Some((simple, 1))
}

/// Decode `XXXX` (and a following `\uXXXX` low surrogate, if any).
fn decode_unicode(hex: &str) -> Option<(char, usize)> {
    let high = hex4(hex)?;
    if !(0xD800..0xDC00).contains(&high) {
        // BMP scalar, or a lone low surrogate.
        return Some((char::from_u32(high).unwrap_or(char::REPLACEMENT_CHARACTER), 4));
    }
    let low = hex
        .get(4..6)
        .filter(|prefix| *prefix == "\\u")
        .and_then(|_| hex4(&hex[6..]))
        .filter(|low| (0xDC00..0xE000).contains(low));
    match low {
        Some(low) => {
            let scalar = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
            Some((char::from_u32(scalar).unwrap_or(char::REPLACEMENT_CHARACTER), 10))
        }
        None => Some((char::REPLACEMENT_CHARACTER, 4)),
    }
}

fn hex4(text: &str) -> Option<u32> {
    let digits = text.get(..4)?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

/// Append `bytes` to `out` as a quoted JSON string.
///
/// With `ascii`, every non-ASCII character is written as `\uXXXX`
/// (a surrogate pair above the BMP).
pub(crate) fn escape_into(out: &mut String, bytes: &[u8], ascii: bool) {
    out.push('"');
    for c in String::from_utf8_lossy(bytes).chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if c < ' ' || c == '\u{7f}' => push_unit(out, u32::from(c)),
            c if ascii && !c.is_ascii() => {
                let mut units = [0_u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    push_unit(out, u32::from(*unit));
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

fn push_unit(out: &mut String, unit: u32) {
    // Writing to a String cannot fail.
    let _ = write!(out, "\\u{unit:04x}");
}

#[cfg(test)]
mod tests;
