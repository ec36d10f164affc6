//! Minimal character reference decoding
//!
//! Contract:
//! - Named references decoded: `&amp;`, `&lt;`, `&gt;`, `&quot;`, `&apos;`, `&nbsp;`.
//! - Numeric references decoded only when well-formed and `;`-terminated:
//!   `&#123;` and `&#x1F4A9;`.
//! - NUL, surrogates and out-of-range values decode to U+FFFD.
//! - Anything else is left as written.

use memchr::memchr;
use std::borrow::Cow;

const MAX_HEX_DIGITS: usize = 6;
const MAX_DEC_DIGITS: usize = 7;

const NAMED: &[(&str, char)] = &[
    ("amp", '&'),
    ("lt", '<'),
    ("gt", '>'),
    ("quot", '"'),
    ("apos", '\''),
    ("nbsp", '\u{a0}'),
];

pub(crate) fn decode_entities(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    let Some(first) = memchr(b'&', bytes) else {
        return Cow::Borrowed(s);
    };

    let mut out = String::with_capacity(s.len());
    out.push_str(&s[..first]);
    let mut i = first;

    while i < bytes.len() {
        if bytes[i] != b'&' {
            let next = memchr(b'&', &bytes[i..]).map_or(bytes.len(), |rel| i + rel);
            out.push_str(&s[i..next]);
            i = next;
            continue;
        }

        match decode_at(bytes, i + 1) {
            Some((ch, end)) => {
                out.push(ch);
                i = end;
            }
            None => {
                out.push('&');
                i += 1;
            }
        }
    }

    Cow::Owned(out)
}

/// Decode the reference starting right after `&`; returns the char and the
/// index just past the `;`
fn decode_at(bytes: &[u8], start: usize) -> Option<(char, usize)> {
    if bytes.get(start) == Some(&b'#') {
        let (digits_start, radix, max) = match bytes.get(start + 1) {
            Some(b'x') | Some(b'X') => (start + 2, 16, MAX_HEX_DIGITS),
            _ => (start + 1, 10, MAX_DEC_DIGITS),
        };
        let semi = scan_digits(bytes, digits_start, radix, max)?;
        // Digits are ASCII, so the slice is valid UTF-8.
        let digits = std::str::from_utf8(&bytes[digits_start..semi]).ok()?;
        let value = u32::from_str_radix(digits, radix).ok()?;
        let ch = match value {
            0 => '\u{fffd}',
            v => char::from_u32(v).unwrap_or('\u{fffd}'),
        };
        return Some((ch, semi + 1));
    }

    NAMED.iter().find_map(|&(name, ch)| {
        let end = start + name.len();
        (bytes.len() > end && &bytes[start..end] == name.as_bytes() && bytes[end] == b';')
            .then_some((ch, end + 1))
    })
}

fn scan_digits(bytes: &[u8], start: usize, radix: u32, max: usize) -> Option<usize> {
    let mut j = start;
    while j < bytes.len() {
        let b = bytes[j];
        if b == b';' {
            return (j > start).then_some(j);
        }
        if j - start == max || !(b as char).is_digit(radix) {
            return None;
        }
        j += 1;
    }
    None
}
