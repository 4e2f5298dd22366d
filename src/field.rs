//! Flat-JSON field extractor.
//!
//! Request payloads on this node are tiny single-level objects such as
//! `{"threshold":55}` or `{"action":true}`.  Rather than deserialising the
//! whole object, endpoints pull out the one field they need with
//! [`extract`] and its typed helpers.
//!
//! ## Accepted grammar
//!
//! ```text
//! object := ws '{' ws [ member (ws ',' ws member)* ] ws '}' ws
//! member := string ws ':' ws (string | scalar)
//! scalar := one or more bytes up to ',' '}' or whitespace
//! ```
//!
//! Nested objects and arrays are rejected with [`FieldError::Syntax`].
//! String contents are returned raw (escape sequences are skipped over,
//! not decoded).  The extracted value is copied into a caller-owned
//! `heapless::String`, truncated to `min(N, VALUE_CAP)` bytes on a UTF-8
//! boundary, so the output buffer is never overrun.

use log::debug;

use crate::error::FieldError;

/// Hard cap on the number of value bytes copied out of a payload.
pub const VALUE_CAP: usize = 32;

/// Default output buffer for extracted values.
pub type FieldValue = heapless::String<VALUE_CAP>;

/// Raw view of one value inside the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Token<'a> {
    text: &'a str,
    quoted: bool,
}

/// Byte cursor over the payload.
struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, byte: u8) -> Result<(), FieldError> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(FieldError::Syntax)
        }
    }

    /// Consume a quoted string and return its raw contents.
    fn string(&mut self) -> Result<&'a str, FieldError> {
        self.expect(b'"')?;
        let start = self.pos;
        loop {
            match self.peek() {
                None => return Err(FieldError::Syntax),
                Some(b'\\') => self.pos += 2,
                Some(b'"') => {
                    let text = self.src.get(start..self.pos).ok_or(FieldError::Syntax)?;
                    self.pos += 1;
                    return Ok(text);
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    /// Consume an unquoted scalar (`55`, `true`, `-3`, `null`, ...).
    fn scalar(&mut self) -> Result<&'a str, FieldError> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            match b {
                b',' | b'}' | b' ' | b'\t' | b'\r' | b'\n' => break,
                b'{' | b'[' | b']' | b':' | b'"' => return Err(FieldError::Syntax),
                _ => self.pos += 1,
            }
        }
        if self.pos == start {
            return Err(FieldError::Syntax);
        }
        self.src.get(start..self.pos).ok_or(FieldError::Syntax)
    }

    fn value(&mut self) -> Result<Token<'a>, FieldError> {
        if self.peek() == Some(b'"') {
            Ok(Token { text: self.string()?, quoted: true })
        } else {
            Ok(Token { text: self.scalar()?, quoted: false })
        }
    }
}

/// Walk the whole object and return the first value stored under `key`.
///
/// The object is validated to its closing brace and trailing whitespace
/// even after the key matched, so the outcome never depends on key order.
fn find<'a>(json: &'a str, key: &str) -> Result<Token<'a>, FieldError> {
    let mut sc = Scanner::new(json);
    sc.skip_ws();
    sc.expect(b'{')?;
    sc.skip_ws();

    let mut found = None;
    if sc.peek() == Some(b'}') {
        sc.pos += 1;
    } else {
        loop {
            let name = sc.string()?;
            sc.skip_ws();
            sc.expect(b':')?;
            sc.skip_ws();
            let token = sc.value()?;
            if found.is_none() && name == key {
                found = Some(token);
            }
            sc.skip_ws();
            match sc.peek() {
                Some(b',') => {
                    sc.pos += 1;
                    sc.skip_ws();
                }
                Some(b'}') => {
                    sc.pos += 1;
                    break;
                }
                _ => return Err(FieldError::Syntax),
            }
        }
    }

    sc.skip_ws();
    if sc.peek().is_some() {
        return Err(FieldError::Syntax);
    }
    found.ok_or(FieldError::KeyNotFound)
}

/// Copy at most `min(N, VALUE_CAP)` bytes of `text` into `out`, never
/// splitting a UTF-8 sequence.
fn copy_bounded<const N: usize>(text: &str, out: &mut heapless::String<N>) {
    out.clear();
    let cap = N.min(VALUE_CAP);
    let mut end = text.len().min(cap);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    // `end <= N`, so the push cannot fail.
    let _ = out.push_str(&text[..end]);
}

/// Extract the value stored under `key` into `out`.
///
/// String values are copied without their quotes.  Values longer than the
/// output capacity (or [`VALUE_CAP`]) are truncated.
pub fn extract<const N: usize>(
    json: &str,
    key: &str,
    out: &mut heapless::String<N>,
) -> Result<(), FieldError> {
    match find(json, key) {
        Ok(token) => {
            copy_bounded(token.text, out);
            debug!("field '{}' = '{}'", key, out);
            Ok(())
        }
        Err(e) => {
            debug!("field '{}' not extracted from '{}': {}", key, json, e);
            Err(e)
        }
    }
}

/// Convenience wrapper returning a [`FieldValue`].
pub fn get(json: &str, key: &str) -> Result<FieldValue, FieldError> {
    let mut out = FieldValue::new();
    extract(json, key, &mut out)?;
    Ok(out)
}

/// Extract an integer field.  Accepts `55` and `"55"`; rejects `55.5`,
/// `5e1`, empty strings and anything that overflows `i32`.
pub fn get_i32(json: &str, key: &str) -> Result<i32, FieldError> {
    let token = find(json, key)?;
    let text = token.text;
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FieldError::InvalidValue);
    }
    text.parse::<i32>().map_err(|_| FieldError::InvalidValue)
}

/// Extract a boolean field.  Accepts the literals `true`/`false`, bare or
/// quoted; everything else is [`FieldError::InvalidValue`].
pub fn get_bool(json: &str, key: &str) -> Result<bool, FieldError> {
    let token = find(json, key)?;
    match token.text {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => {
            debug!("field '{}' is not a boolean (quoted={})", key, token.quoted);
            Err(FieldError::InvalidValue)
        }
    }
}
