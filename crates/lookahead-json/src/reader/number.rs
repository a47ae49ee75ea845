use crate::{error::SyntaxError, event::Number};

/// Lexical hint so conversion can distinguish ints vs floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NumberLexeme<'a> {
    Integer(&'a str), // no '.' and no exponent
    Float(&'a str),   // has '.' or exponent
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Measures the number literal at the start of `bytes`.
///
/// Returns the literal's length and whether it is an integer. The literal ends
/// at the first byte the number grammar cannot continue with; the caller's
/// grammar decides whether that byte is acceptable.
pub(crate) fn scan_number(bytes: &[u8]) -> Result<(usize, bool), SyntaxError> {
    let mut i = 0;
    if bytes.first() == Some(&b'-') {
        i += 1;
    }
    match bytes.get(i) {
        Some(b'0') => i += 1,
        Some(b'1'..=b'9') => i += 1 + count_digits(&bytes[i + 1..]),
        _ => return Err(SyntaxError::InvalidNumber),
    }

    let mut integer = true;
    if bytes.get(i) == Some(&b'.') {
        let digits = count_digits(&bytes[i + 1..]);
        if digits == 0 {
            return Err(SyntaxError::InvalidNumber);
        }
        i += 1 + digits;
        integer = false;
    }
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let digits = count_digits(&bytes[i..]);
        if digits == 0 {
            return Err(SyntaxError::InvalidNumber);
        }
        i += digits;
        integer = false;
    }
    Ok((i, integer))
}

/// Converts a scanned literal to a [`Number`].
///
/// Integers that overflow `u64`/`i64` fall back to `f64`; results that are not
/// finite are rejected.
pub(crate) fn convert(lexeme: NumberLexeme<'_>) -> Result<Number, SyntaxError> {
    let text = match lexeme {
        NumberLexeme::Integer(text) => {
            let exact = if text.starts_with('-') {
                text.parse::<i64>()
                    .ok()
                    .map(|i| if i == 0 { Number::PosInt(0) } else { Number::NegInt(i) })
            } else {
                text.parse::<u64>().ok().map(Number::PosInt)
            };
            if let Some(number) = exact {
                return Ok(number);
            }
            text
        }
        NumberLexeme::Float(text) => text,
    };

    match text.parse::<f64>() {
        Ok(f) if f.is_finite() => Ok(Number::Float(f)),
        _ => Err(SyntaxError::NumberOutOfRange),
    }
}
