//! Curly-brace device configuration dialect (libconfig).
//!
//! ```text
//! # comment
//! version = "1.0";
//! network: {
//!     mtu = 9000;
//!     dns = [ "1.1.1.1", "8.8.8.8" ];
//!     routes = ( { dest = "0.0.0.0/0"; via = "10.0.0.1"; } );
//! };
//! ```
//!
//! Groups become mappings; arrays (`[]`) and lists (`()`) both become sequences.

use super::{DecodeOptions, Decoder};
use confdiff_common::{CanonicalValue, ConfDiffError, Mapping, Number};

const FORMAT: &str = "libconfig";

/// Maximum nesting of groups, arrays and lists
const MAX_DEPTH: usize = 128;

pub struct LibconfigDecoder;

impl Decoder for LibconfigDecoder {
    fn decode(&self, text: &str, _options: &DecodeOptions) -> Result<CanonicalValue, ConfDiffError> {
        let mut parser = Parser { text, pos: 0, depth: 0 };
        let root = parser
            .parse_settings(None)
            .map_err(|message| ConfDiffError::parse(FORMAT, message))?;
        Ok(CanonicalValue::Mapping(root))
    }
}

type ParseResult<T> = std::result::Result<T, String>;

struct Parser<'a> {
    text: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.text.as_bytes().get(self.pos + offset).copied()
    }

    fn error(&self, message: impl Into<String>) -> String {
        let consumed = &self.text.as_bytes()[..self.pos];
        let line = consumed.iter().filter(|&&b| b == b'\n').count() + 1;
        let column = consumed.iter().rev().take_while(|&&b| b != b'\n').count() + 1;
        format!("line {} column {}: {}", line, column, message.into())
    }

    fn skip_line(&mut self) {
        match self.text[self.pos..].find('\n') {
            Some(i) => self.pos += i + 1,
            None => self.pos = self.text.len(),
        }
    }

    /// Skip whitespace and all three comment styles
    fn skip_trivia(&mut self) -> ParseResult<()> {
        loop {
            match self.peek() {
                Some(b) if b.is_ascii_whitespace() => self.pos += 1,
                Some(b'#') => self.skip_line(),
                Some(b'/') if self.peek_at(1) == Some(b'/') => self.skip_line(),
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    match self.text[self.pos + 2..].find("*/") {
                        Some(end) => self.pos += end + 4,
                        None => return Err(self.error("unterminated block comment")),
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// Parse settings until `close` (or end of input at top level)
    fn parse_settings(&mut self, close: Option<u8>) -> ParseResult<Mapping> {
        let mut map = Mapping::new();
        loop {
            self.skip_trivia()?;
            match self.peek() {
                None => {
                    return match close {
                        None => Ok(map),
                        Some(c) => Err(self.error(format!("expected '{}' before end of input", c as char))),
                    };
                }
                Some(b) if Some(b) == close => {
                    self.pos += 1;
                    return Ok(map);
                }
                Some(b'@') => return Err(self.error("@include directives are not supported")),
                Some(_) => {
                    let (name, value) = self.parse_setting()?;
                    map.insert(name, value);
                }
            }
        }
    }

    fn parse_setting(&mut self) -> ParseResult<(String, CanonicalValue)> {
        let name = self.parse_name()?;
        self.skip_trivia()?;
        match self.peek() {
            Some(b'=') | Some(b':') => self.pos += 1,
            _ => return Err(self.error(format!("expected '=' or ':' after setting '{}'", name))),
        }
        self.skip_trivia()?;
        let value = self.parse_value()?;
        self.skip_trivia()?;
        if matches!(self.peek(), Some(b';') | Some(b',')) {
            self.pos += 1;
        }
        Ok((name, value))
    }

    fn parse_name(&mut self) -> ParseResult<String> {
        let start = self.pos;
        match self.peek() {
            Some(b) if b.is_ascii_alphabetic() || b == b'*' => self.pos += 1,
            _ => return Err(self.error("expected setting name")),
        }
        while let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'*') {
                self.pos += 1;
            } else {
                break;
            }
        }
        Ok(self.text[start..self.pos].to_string())
    }

    fn parse_value(&mut self) -> ParseResult<CanonicalValue> {
        match self.peek() {
            Some(b'{') => self.nested(|p| Ok(CanonicalValue::Mapping(p.parse_settings(Some(b'}'))?))),
            Some(b'[') => self.nested(|p| p.parse_sequence(b']')),
            Some(b'(') => self.nested(|p| p.parse_sequence(b')')),
            Some(b'"') => self.parse_strings(),
            Some(b) if b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.') => self.parse_number(),
            Some(b) if b.is_ascii_alphabetic() => self.parse_bool(),
            Some(_) => Err(self.error("unexpected character")),
            None => Err(self.error("expected a value before end of input")),
        }
    }

    /// Step past an opening bracket and parse its contents one level deeper
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        self.pos += 1;
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn parse_sequence(&mut self, close: u8) -> ParseResult<CanonicalValue> {
        let mut items = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.peek() == Some(close) {
                self.pos += 1;
                return Ok(CanonicalValue::Sequence(items));
            }
            items.push(self.parse_value()?);
            self.skip_trivia()?;
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b) if b == close => {}
                _ => return Err(self.error(format!("expected ',' or '{}'", close as char))),
            }
        }
    }

    /// Adjacent string literals are concatenated; `\xHH` escapes are raw bytes of UTF-8 text
    fn parse_strings(&mut self) -> ParseResult<CanonicalValue> {
        let start = self.pos;
        let mut out = Vec::new();
        loop {
            self.parse_string_into(&mut out)?;
            self.skip_trivia()?;
            if self.peek() != Some(b'"') {
                break;
            }
        }
        match String::from_utf8(out) {
            Ok(text) => Ok(CanonicalValue::String(text)),
            Err(_) => {
                self.pos = start;
                Err(self.error("string is not valid UTF-8"))
            }
        }
    }

    fn parse_string_into(&mut self, out: &mut Vec<u8>) -> ParseResult<()> {
        let start = self.pos;
        self.pos += 1;
        loop {
            let rest = &self.text[self.pos..];
            let Some(i) = rest.find(|c: char| c == '"' || c == '\\') else {
                self.pos = start;
                return Err(self.error("unterminated string"));
            };
            out.extend_from_slice(rest[..i].as_bytes());
            self.pos += i;

            if self.peek() == Some(b'"') {
                self.pos += 1;
                return Ok(());
            }

            self.pos += 1;
            let escaped = match self.peek() {
                Some(b'n') => b'\n',
                Some(b't') => b'\t',
                Some(b'r') => b'\r',
                Some(b'f') => 0x0c,
                Some(b'"') => b'"',
                Some(b'\\') => b'\\',
                Some(b'x') => {
                    let byte = self
                        .text
                        .get(self.pos + 1..self.pos + 3)
                        .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                        .ok_or_else(|| self.error("invalid \\x escape"))?;
                    self.pos += 2;
                    byte
                }
                _ => return Err(self.error("invalid escape sequence")),
            };
            out.push(escaped);
            self.pos += 1;
        }
    }

    fn parse_number(&mut self) -> ParseResult<CanonicalValue> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            let signed_exponent = matches!(b, b'+' | b'-')
                && (self.pos == start || matches!(self.text.as_bytes()[self.pos - 1], b'e' | b'E'));
            if b.is_ascii_alphanumeric() || b == b'.' || signed_exponent {
                self.pos += 1;
            } else {
                break;
            }
        }

        let token = &self.text[start..self.pos];
        match parse_number_token(token) {
            Some(number) => Ok(CanonicalValue::Number(number)),
            None => {
                self.pos = start;
                Err(self.error(format!("invalid number '{}'", token)))
            }
        }
    }

    fn parse_bool(&mut self) -> ParseResult<CanonicalValue> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() || b == b'_' {
                self.pos += 1;
            } else {
                break;
            }
        }

        let token = &self.text[start..self.pos];
        match token.to_ascii_lowercase().as_str() {
            "true" => Ok(CanonicalValue::Bool(true)),
            "false" => Ok(CanonicalValue::Bool(false)),
            _ => {
                self.pos = start;
                Err(self.error(format!("unexpected token '{}'", token)))
            }
        }
    }
}

/// Decimal or hex integers (optional `L`/`LL` suffix) and floats
fn parse_number_token(token: &str) -> Option<Number> {
    let (negative, body) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };
    let lower = body.to_ascii_lowercase();

    if let Some(hex) = lower.strip_prefix("0x") {
        let value = u64::from_str_radix(hex.trim_end_matches('l'), 16).ok()?;
        return apply_sign(negative, value);
    }

    if lower.contains(|c: char| c == '.' || c == 'e') {
        return token.parse::<f64>().ok().map(Number::Float);
    }

    let value = lower.trim_end_matches('l').parse::<u64>().ok()?;
    apply_sign(negative, value)
}

fn apply_sign(negative: bool, value: u64) -> Option<Number> {
    if !negative {
        return Some(Number::from_u64(value));
    }
    if value == 1u64 << 63 {
        return Some(Number::Int(i64::MIN));
    }
    i64::try_from(value).ok().map(|v| Number::Int(-v))
}
