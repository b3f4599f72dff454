//! Streaming JSON tokenizer.
//!
//! [`JsonReader`] lexes JSON-like text into a token stream. `next()` advances
//! to the next token; accessor methods expose the current token's decoded
//! scalar payload. The payload slots are transient and overwritten on each
//! advance, so callers that need a value past the next `next()` must copy it.
//!
//! In lenient mode (the default used by the mapper) extraneous and trailing
//! commas between elements, members, and before closing brackets are skipped
//! transparently, so `[1,2,3,]` and `{"a":1,}` tokenize the same as their
//! strict forms.
//!
//! A string immediately followed by `:` is reclassified as a field name, and
//! the reader remembers that the next call must parse exactly one value.
//! This models "after colon, one value" without a parser-side lookahead
//! stack.
//!
//! ## Examples
//!
//! ```rust
//! use jsonbind::{JsonReader, Token};
//!
//! let mut r = JsonReader::new(r#"{"a": 1}"#, true);
//! assert_eq!(r.next().unwrap(), Token::StartObject);
//! assert_eq!(r.next().unwrap(), Token::FieldName);
//! assert_eq!(r.string(), "a");
//! assert_eq!(r.next().unwrap(), Token::Num);
//! assert_eq!(r.long_val(), 1);
//! assert_eq!(r.next().unwrap(), Token::EndObject);
//! assert_eq!(r.next().unwrap(), Token::Eof);
//! ```

use crate::{Error, Result};

/// The kind of the current token.
///
/// Scalar payloads (string, integer, float, bool) live on the [`JsonReader`]
/// and are valid only while the corresponding token is current.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    /// `{`
    StartObject,
    /// `}`
    EndObject,
    /// `[`
    StartArray,
    /// `]`
    EndArray,
    /// A string followed by `:` inside an object.
    FieldName,
    /// A string value.
    Str,
    /// A number value; see [`JsonReader::is_double`] for its classification.
    Num,
    /// `true` or `false`.
    Bool,
    /// `null`.
    Null,
    /// End of input.
    Eof,
}

/// A single-use, single-thread tokenizer over an in-memory string.
pub struct JsonReader<'de> {
    input: &'de str,
    bytes: &'de [u8],
    cur: usize,
    lenient: bool,
    token: Token,
    str_val: String,
    long_val: i64,
    double_val: f64,
    is_double: bool,
    bool_val: bool,
    // set after a field name: the next call reads exactly one value
    pending_value: bool,
}

impl<'de> JsonReader<'de> {
    /// Creates a reader over `input`. When `lenient` is true, extraneous and
    /// trailing commas are skipped between tokens.
    pub fn new(input: &'de str, lenient: bool) -> Self {
        JsonReader {
            input,
            bytes: input.as_bytes(),
            cur: 0,
            lenient,
            token: Token::Eof,
            str_val: String::new(),
            long_val: 0,
            double_val: 0.0,
            is_double: false,
            bool_val: false,
            pending_value: false,
        }
    }

    /// The current token. [`Token::Eof`] before the first advance.
    pub fn token(&self) -> Token {
        self.token
    }

    /// The current string or field-name payload.
    pub fn string(&self) -> &str {
        &self.str_val
    }

    /// Takes the current string payload, leaving an empty slot behind.
    pub fn take_string(&mut self) -> String {
        std::mem::take(&mut self.str_val)
    }

    /// The current integral number payload.
    pub fn long_val(&self) -> i64 {
        self.long_val
    }

    /// The current floating number payload.
    pub fn double_val(&self) -> f64 {
        self.double_val
    }

    /// Whether the current number lexeme contained `.` or an exponent marker.
    pub fn is_double(&self) -> bool {
        self.is_double
    }

    /// The current boolean payload.
    pub fn bool_val(&self) -> bool {
        self.bool_val
    }

    /// Absolute byte offset of the read position.
    pub fn offset(&self) -> usize {
        self.cur
    }

    /// Advances to and returns the next token.
    pub fn next(&mut self) -> Result<Token> {
        if self.pending_value {
            self.pending_value = false;
            self.skip_filler();
            self.read_value_token()?;
            return Ok(self.token);
        }

        loop {
            self.skip_filler();
            let Some(b) = self.peek() else {
                self.token = Token::Eof;
                return Ok(self.token);
            };
            self.cur += 1;

            match b {
                b'{' => {
                    self.token = Token::StartObject;
                    return Ok(self.token);
                }
                b'}' => {
                    self.token = Token::EndObject;
                    return Ok(self.token);
                }
                b'[' => {
                    self.token = Token::StartArray;
                    return Ok(self.token);
                }
                b']' => {
                    self.token = Token::EndArray;
                    return Ok(self.token);
                }
                // stray colons are skipped
                b':' => continue,
                b',' => {
                    if !self.lenient {
                        self.skip_ws();
                        match self.peek() {
                            Some(b']') | Some(b'}') | Some(b',') | None => {
                                return Err(Error::lexical(self.cur, "unexpected comma"));
                            }
                            _ => {}
                        }
                    }
                    continue;
                }
                b'"' => {
                    self.str_val = self.read_string()?;
                    self.skip_ws();
                    if self.peek() == Some(b':') {
                        self.cur += 1;
                        self.token = Token::FieldName;
                        self.pending_value = true;
                    } else {
                        self.token = Token::Str;
                    }
                    return Ok(self.token);
                }
                b't' | b'f' => {
                    self.cur -= 1;
                    self.bool_val = self.read_bool()?;
                    self.token = Token::Bool;
                    return Ok(self.token);
                }
                b'n' => {
                    self.cur -= 1;
                    self.read_null()?;
                    self.token = Token::Null;
                    return Ok(self.token);
                }
                b'-' | b'0'..=b'9' => {
                    self.cur -= 1;
                    self.read_number()?;
                    self.token = Token::Num;
                    return Ok(self.token);
                }
                b if is_ws(b) => continue,
                other => {
                    return Err(Error::lexical(
                        self.cur - 1,
                        format!("illegal character {}", printable(other)),
                    ));
                }
            }
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.cur).copied()
    }

    /// Skips whitespace, and extraneous commas when lenient.
    fn skip_filler(&mut self) {
        while let Some(b) = self.peek() {
            if is_ws(b) || (b == b',' && self.lenient) {
                self.cur += 1;
            } else {
                break;
            }
        }
    }

    fn skip_ws(&mut self) {
        while let Some(b) = self.peek() {
            if is_ws(b) {
                self.cur += 1;
            } else {
                break;
            }
        }
    }

    /// Reads exactly one value token after a field name.
    fn read_value_token(&mut self) -> Result<()> {
        loop {
            let Some(b) = self.peek() else {
                return Err(Error::lexical(self.cur, "missing value after field name"));
            };
            self.cur += 1;
            match b {
                b'"' => {
                    self.str_val = self.read_string()?;
                    self.token = Token::Str;
                    return Ok(());
                }
                b'{' => {
                    self.token = Token::StartObject;
                    return Ok(());
                }
                b'[' => {
                    self.token = Token::StartArray;
                    return Ok(());
                }
                b't' | b'f' => {
                    self.cur -= 1;
                    self.bool_val = self.read_bool()?;
                    self.token = Token::Bool;
                    return Ok(());
                }
                b'n' => {
                    self.cur -= 1;
                    self.read_null()?;
                    self.token = Token::Null;
                    return Ok(());
                }
                b'-' | b'0'..=b'9' => {
                    self.cur -= 1;
                    self.read_number()?;
                    self.token = Token::Num;
                    return Ok(());
                }
                b if is_ws(b) || (b == b',' && self.lenient) => {
                    self.cur -= 1;
                    self.skip_filler();
                    continue;
                }
                other => {
                    return Err(Error::lexical(
                        self.cur - 1,
                        format!("illegal character at value start: {}", printable(other)),
                    ));
                }
            }
        }
    }

    /// Reads string content; the opening quote is already consumed.
    fn read_string(&mut self) -> Result<String> {
        let mut s = String::with_capacity(16);
        loop {
            let Some(b) = self.peek() else {
                return Err(Error::lexical(self.cur, "unterminated string"));
            };
            match b {
                b'"' => {
                    self.cur += 1;
                    return Ok(s);
                }
                b'\\' => {
                    self.cur += 1;
                    let Some(e) = self.peek() else {
                        return Err(Error::lexical(self.cur, "incomplete escape sequence"));
                    };
                    self.cur += 1;
                    match e {
                        b'"' => s.push('"'),
                        b'\\' => s.push('\\'),
                        b'/' => s.push('/'),
                        b'b' => s.push('\u{0008}'),
                        b'f' => s.push('\u{000C}'),
                        b'n' => s.push('\n'),
                        b'r' => s.push('\r'),
                        b't' => s.push('\t'),
                        b'u' => s.push(self.read_unicode_escape()?),
                        other => {
                            return Err(Error::lexical(
                                self.cur - 1,
                                format!("unknown escape \\{}", printable(other)),
                            ));
                        }
                    }
                }
                b if b < 0x20 => {
                    return Err(Error::lexical(
                        self.cur,
                        format!("unescaped control character U+{:04X} in string", b),
                    ));
                }
                b if b < 0x80 => {
                    s.push(b as char);
                    self.cur += 1;
                }
                _ => {
                    // multi-byte character; the input is valid UTF-8
                    let Some(ch) = self.input[self.cur..].chars().next() else {
                        return Err(Error::lexical(self.cur, "invalid UTF-8 in string"));
                    };
                    s.push(ch);
                    self.cur += ch.len_utf8();
                }
            }
        }
    }

    /// Decodes `\uXXXX` (the `\u` is already consumed), reconstructing
    /// surrogate pairs. Unpaired surrogates are a lexical error: Rust strings
    /// cannot hold lone surrogates.
    fn read_unicode_escape(&mut self) -> Result<char> {
        let cp1 = self.read_unicode4()?;
        if (0xDC00..=0xDFFF).contains(&cp1) {
            return Err(Error::lexical(
                self.cur,
                format!("unexpected low surrogate \\u{cp1:04x}"),
            ));
        }
        if (0xD800..=0xDBFF).contains(&cp1) {
            if self.bytes.get(self.cur) == Some(&b'\\') && self.bytes.get(self.cur + 1) == Some(&b'u')
            {
                self.cur += 2;
                let cp2 = self.read_unicode4()?;
                if !(0xDC00..=0xDFFF).contains(&cp2) {
                    return Err(Error::lexical(
                        self.cur,
                        format!("high surrogate \\u{cp1:04x} followed by \\u{cp2:04x}"),
                    ));
                }
                let cp = 0x10000 + ((cp1 - 0xD800) << 10) + (cp2 - 0xDC00);
                return char::from_u32(cp).ok_or_else(|| {
                    Error::lexical(self.cur, format!("invalid code point U+{cp:X}"))
                });
            }
            return Err(Error::lexical(
                self.cur,
                format!("unpaired high surrogate \\u{cp1:04x}"),
            ));
        }
        char::from_u32(cp1)
            .ok_or_else(|| Error::lexical(self.cur, format!("invalid code point U+{cp1:X}")))
    }

    fn read_unicode4(&mut self) -> Result<u32> {
        if self.cur + 4 > self.bytes.len() {
            return Err(Error::lexical(self.cur, "incomplete unicode escape"));
        }
        let mut code = 0u32;
        for i in 0..4 {
            code = code << 4 | self.hex(self.bytes[self.cur + i])?;
        }
        self.cur += 4;
        Ok(code)
    }

    fn hex(&self, b: u8) -> Result<u32> {
        match b {
            b'0'..=b'9' => Ok((b - b'0') as u32),
            b'a'..=b'f' => Ok((b - b'a') as u32 + 10),
            b'A'..=b'F' => Ok((b - b'A') as u32 + 10),
            other => Err(Error::lexical(
                self.cur,
                format!("illegal hex digit {}", printable(other)),
            )),
        }
    }

    fn read_bool(&mut self) -> Result<bool> {
        if self.match_keyword(b"true") {
            return Ok(true);
        }
        if self.match_keyword(b"false") {
            return Ok(false);
        }
        Err(Error::lexical(self.cur, "illegal boolean literal"))
    }

    fn read_null(&mut self) -> Result<()> {
        if self.match_keyword(b"null") {
            Ok(())
        } else {
            Err(Error::lexical(self.cur, "illegal null literal"))
        }
    }

    fn match_keyword(&mut self, kw: &[u8]) -> bool {
        if self.cur + kw.len() > self.bytes.len() {
            return false;
        }
        if &self.bytes[self.cur..self.cur + kw.len()] == kw {
            self.cur += kw.len();
            true
        } else {
            false
        }
    }

    fn read_number(&mut self) -> Result<()> {
        let start = self.cur;
        let mut has_dot = false;
        let mut has_exp = false;

        if matches!(self.peek(), Some(b'-') | Some(b'+')) {
            self.cur += 1;
        }

        if !matches!(self.peek(), Some(b'0'..=b'9')) {
            return Err(Error::lexical(self.cur, "malformed number"));
        }
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.cur += 1;
        }

        if self.peek() == Some(b'.') {
            has_dot = true;
            self.cur += 1;
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(Error::lexical(self.cur, "missing digits after decimal point"));
            }
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.cur += 1;
            }
        }

        if matches!(self.peek(), Some(b'e') | Some(b'E')) {
            has_exp = true;
            self.cur += 1;
            if matches!(self.peek(), Some(b'+') | Some(b'-')) {
                self.cur += 1;
            }
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(Error::lexical(self.cur, "missing exponent digits"));
            }
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.cur += 1;
            }
        }

        let text = &self.input[start..self.cur];
        if has_dot || has_exp {
            self.is_double = true;
            self.double_val = text
                .parse::<f64>()
                .map_err(|_| Error::lexical(start, format!("malformed number {text}")))?;
        } else {
            self.is_double = false;
            self.long_val = text
                .parse::<i64>()
                .map_err(|_| Error::lexical(start, format!("integer out of range: {text}")))?;
        }
        Ok(())
    }
}

fn is_ws(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

fn printable(b: u8) -> String {
    if b < 0x20 || b >= 0x7f {
        format!("\\u{:04x}", b)
    } else {
        format!("'{}'", b as char)
    }
}
