//! Decoding file bytes into text and splitting it into terminated lines.

use std::fmt;

use crate::editorconfig::{Charset, EndOfLine};

const BINARY_CHECK_SIZE: usize = 8192;

/// Why a file was not inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    Empty,
    Binary,
    /// Bytes are not valid for the charset their BOM (or lack of one) implies.
    Undecodable(Charset),
}

impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Skip::Empty => f.write_str("empty"),
            Skip::Binary => f.write_str("binary"),
            Skip::Undecodable(charset) => write!(f, "not valid {charset}"),
        }
    }
}

/// Check if content is binary by looking for null bytes in first 8192 bytes
pub fn is_binary(content: &[u8]) -> bool {
    let check_len = content.len().min(BINARY_CHECK_SIZE);
    content[..check_len].contains(&0)
}

/// Best-effort charset detection: BOM first, then UTF-8 validity.
pub fn sniff_charset(bytes: &[u8]) -> Charset {
    [Charset::Utf8Bom, Charset::Utf16Be, Charset::Utf16Le]
        .into_iter()
        .find(|charset| bytes.starts_with(charset.bom()))
        .unwrap_or_else(|| {
            if std::str::from_utf8(bytes).is_ok() {
                Charset::Utf8
            } else {
                Charset::Latin1
            }
        })
}

/// File contents decoded to text, remembering the charset they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub charset: Charset,
    /// Decoded text without the byte order mark.
    pub text: String,
}

impl Document {
    pub fn decode(bytes: &[u8]) -> Result<Self, Skip> {
        let charset = sniff_charset(bytes);
        let wide = matches!(charset, Charset::Utf16Be | Charset::Utf16Le);
        if !wide && is_binary(bytes) {
            return Err(Skip::Binary);
        }

        let body = &bytes[charset.bom().len()..];
        let text = match charset {
            Charset::Utf8 | Charset::Utf8Bom => {
                String::from_utf8(body.to_vec()).map_err(|_| Skip::Undecodable(charset))?
            }
            Charset::Latin1 => body.iter().copied().map(char::from).collect(),
            Charset::Utf16Be | Charset::Utf16Le => decode_utf16(body, charset)?,
        };

        Ok(Self { charset, text })
    }
}

fn decode_utf16(body: &[u8], charset: Charset) -> Result<String, Skip> {
    if body.len() % 2 != 0 {
        return Err(Skip::Undecodable(charset));
    }
    let units: Vec<u16> = body
        .chunks_exact(2)
        .map(|pair| match charset {
            Charset::Utf16Be => u16::from_be_bytes([pair[0], pair[1]]),
            _ => u16::from_le_bytes([pair[0], pair[1]]),
        })
        .collect();
    String::from_utf16(&units).map_err(|_| Skip::Undecodable(charset))
}

/// Encode `text` in `charset`, BOM included.
///
/// Fails with the first character latin1 cannot represent.
pub fn encode(text: &str, charset: Charset) -> Result<Vec<u8>, char> {
    let mut out = charset.bom().to_vec();
    match charset {
        Charset::Utf8 | Charset::Utf8Bom => out.extend_from_slice(text.as_bytes()),
        Charset::Latin1 => {
            for ch in text.chars() {
                let byte = u8::try_from(u32::from(ch)).map_err(|_| ch)?;
                out.push(byte);
            }
        }
        Charset::Utf16Be => text
            .encode_utf16()
            .for_each(|unit| out.extend_from_slice(&unit.to_be_bytes())),
        Charset::Utf16Le => text
            .encode_utf16()
            .for_each(|unit| out.extend_from_slice(&unit.to_le_bytes())),
    }
    Ok(out)
}

/// One line of text and the terminator that ended it (none on the last line
/// of a file without a final newline).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    pub body: &'a str,
    pub ending: Option<EndOfLine>,
}

/// Split text on `\n`, `\r\n` and lone `\r`, keeping track of which was used.
pub fn lines(text: &str) -> Lines<'_> {
    Lines { rest: text }
}

#[derive(Debug, Clone)]
pub struct Lines<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Lines<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Line<'a>> {
        if self.rest.is_empty() {
            return None;
        }

        let Some(pos) = self.rest.find(['\r', '\n']) else {
            let body = self.rest;
            self.rest = "";
            return Some(Line { body, ending: None });
        };

        let body = &self.rest[..pos];
        let tail = &self.rest[pos..];
        let (ending, len) = if tail.starts_with("\r\n") {
            (EndOfLine::CrLf, 2)
        } else if tail.starts_with('\r') {
            (EndOfLine::Cr, 1)
        } else {
            (EndOfLine::Lf, 1)
        };
        self.rest = &tail[len..];

        Some(Line {
            body,
            ending: Some(ending),
        })
    }
}
