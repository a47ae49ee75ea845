//! In-place decoding of backslash escapes inside string literals.
//!
//! Every escape sequence is at least as long as the bytes it decodes to: a
//! two-byte escape yields one byte, `\uXXXX` yields at most three bytes and a
//! surrogate pair (twelve bytes) yields four. Decoded output can therefore be
//! written behind the read cursor of the same buffer without clobbering
//! unread input.

use crate::error::SyntaxError;

/// Accumulates exactly four ASCII hexadecimal digits into a code unit.
#[derive(Debug, Default)]
struct HexAccumulator {
    acc: u32,
}

impl HexAccumulator {
    #[inline]
    fn hex_val(b: u8) -> Option<u32> {
        match b {
            b'0'..=b'9' => Some(u32::from(b - b'0')),
            b'a'..=b'f' => Some(u32::from(b - b'a') + 10),
            b'A'..=b'F' => Some(u32::from(b - b'A') + 10),
            _ => None,
        }
    }

    fn feed(&mut self, b: u8) -> Result<(), SyntaxError> {
        let d = Self::hex_val(b).ok_or(SyntaxError::InvalidEscape)?;
        self.acc = (self.acc << 4) | d;
        Ok(())
    }
}

/// Reads the four hex digits of a `\u` escape whose backslash is at `at`.
fn code_unit(buf: &[u8], at: usize) -> Result<u32, SyntaxError> {
    let digits = buf
        .get(at + 2..at + 6)
        .ok_or(SyntaxError::UnexpectedEndOfInput)?;
    let mut hex = HexAccumulator::default();
    for &b in digits {
        hex.feed(b)?;
    }
    Ok(hex.acc)
}

/// Decodes the escape whose backslash is at `buf[read]`, writing the result
/// to `buf[write..]`.
///
/// Returns the advanced `(read, write)` cursors. Requires `write <= read`.
pub(crate) fn unescape_in_place(
    buf: &mut [u8],
    read: usize,
    write: usize,
) -> Result<(usize, usize), SyntaxError> {
    debug_assert!(write <= read);
    let kind = *buf.get(read + 1).ok_or(SyntaxError::UnexpectedEndOfInput)?;
    let decoded = match kind {
        b'"' => b'"',
        b'\\' => b'\\',
        b'/' => b'/',
        b'b' => 0x08,
        b'f' => 0x0C,
        b'n' => b'\n',
        b'r' => b'\r',
        b't' => b'\t',
        b'u' => return unescape_unicode(buf, read, write),
        _ => return Err(SyntaxError::InvalidEscape),
    };
    buf[write] = decoded;
    Ok((read + 2, write + 1))
}

fn unescape_unicode(
    buf: &mut [u8],
    read: usize,
    write: usize,
) -> Result<(usize, usize), SyntaxError> {
    let high = code_unit(buf, read)?;
    let (scalar, consumed) = match high {
        0xD800..=0xDBFF => {
            if buf.get(read + 6..read + 8) != Some(&b"\\u"[..]) {
                return Err(SyntaxError::InvalidUnicodeEscape(high));
            }
            let low = code_unit(buf, read + 6)?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return Err(SyntaxError::InvalidUnicodeEscape(low));
            }
            (0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00), 12)
        }
        0xDC00..=0xDFFF => return Err(SyntaxError::InvalidUnicodeEscape(high)),
        _ => (high, 6),
    };

    let ch = char::from_u32(scalar).ok_or(SyntaxError::InvalidUnicodeEscape(scalar))?;
    let mut utf8 = [0u8; 4];
    let encoded = ch.encode_utf8(&mut utf8).as_bytes();
    buf[write..write + encoded.len()].copy_from_slice(encoded);
    Ok((read + consumed, write + encoded.len()))
}
