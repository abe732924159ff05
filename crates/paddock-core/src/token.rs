//! Component address codec.
//!
//! Interactive components (buttons, menus) survive a full process restart
//! because the opaque token attached to them is their *entire* persisted
//! state: `encode` packs a handler name and an ordered argument list into a
//! bounded, delimiter-safe string, and `decode` unpacks it with no server-side
//! session table. Both directions are pure functions, so a restarted process
//! that re-registers the same handler names resolves tokens issued before
//! the restart.
//!
//! # Wire shape
//!
//! ```text
//! <name>:<tagged arg>:<tagged arg>...       total length <= 100
//! ```
//!
//! Each argument segment starts with a one-character type tag: `i` for
//! integers, `t` for text, `b` for flags. The delimiter and the escape
//! character are percent-escaped inside the name and text segments, so
//! `decode(encode(name, args)) == (name, args)` for every representable
//! input within the length bound.

use crate::error::{DecodeResult, EncodeResult, TokenDecodeError, TokenEncodeError};

/// Hard upper bound the platform imposes on component tokens.
pub const MAX_TOKEN_LEN: usize = 100;

const DELIMITER: char = ':';

/// One primitive value carried inside a component token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenArg {
    /// A signed integer, rendered in decimal.
    Int(i64),
    /// A text fragment. Prefer small ids over free text: the length bound
    /// is a hard constraint and encoding never truncates.
    Text(String),
    /// A boolean flag.
    Flag(bool),
}

impl From<i64> for TokenArg {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for TokenArg {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<bool> for TokenArg {
    fn from(v: bool) -> Self {
        Self::Flag(v)
    }
}

/// Encodes a handler name and argument list into a component token.
///
/// Fails with [`TokenEncodeError::TooLarge`] when the serialized form
/// exceeds [`MAX_TOKEN_LEN`]; the output is never truncated.
pub fn encode(name: &str, args: &[TokenArg]) -> EncodeResult<String> {
    let mut token = escape(name);
    for arg in args {
        token.push(DELIMITER);
        match arg {
            TokenArg::Int(v) => {
                token.push('i');
                token.push_str(&v.to_string());
            }
            TokenArg::Text(v) => {
                token.push('t');
                token.push_str(&escape(v));
            }
            TokenArg::Flag(v) => {
                token.push('b');
                token.push(if *v { '1' } else { '0' });
            }
        }
    }

    if token.len() > MAX_TOKEN_LEN {
        return Err(TokenEncodeError::TooLarge {
            len: token.len(),
            max: MAX_TOKEN_LEN,
        });
    }
    Ok(token)
}

/// Decodes a component token back into its handler name and argument list.
///
/// Malformed input yields a tagged [`TokenDecodeError`]; this function never
/// panics on untrusted tokens.
pub fn decode(token: &str) -> DecodeResult<(String, Vec<TokenArg>)> {
    if token.is_empty() {
        return Err(TokenDecodeError::Empty);
    }

    let mut segments = token.split(DELIMITER);
    // split() yields at least one segment for a non-empty input
    let name = unescape(segments.next().unwrap_or_default())?;
    if name.is_empty() {
        return Err(TokenDecodeError::Empty);
    }

    let mut args = Vec::new();
    for segment in segments {
        let mut chars = segment.chars();
        let tag = chars.next().ok_or(TokenDecodeError::EmptyArgument)?;
        let body = chars.as_str();
        let arg = match tag {
            'i' => TokenArg::Int(body.parse().map_err(|_| TokenDecodeError::BadInt {
                segment: segment.to_string(),
            })?),
            't' => TokenArg::Text(unescape(body)?),
            'b' => match body {
                "1" => TokenArg::Flag(true),
                "0" => TokenArg::Flag(false),
                _ => {
                    return Err(TokenDecodeError::BadFlag {
                        segment: segment.to_string(),
                    });
                }
            },
            tag => return Err(TokenDecodeError::UnknownTag { tag }),
        };
        args.push(arg);
    }

    Ok((name, args))
}

fn escape(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for c in segment.chars() {
        match c {
            '%' => out.push_str("%25"),
            DELIMITER => out.push_str("%3A"),
            c => out.push(c),
        }
    }
    out
}

fn unescape(segment: &str) -> DecodeResult<String> {
    let mut out = String::with_capacity(segment.len());
    let mut chars = segment.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let pair: String = chars.by_ref().take(2).collect();
        match pair.as_str() {
            "25" => out.push('%'),
            "3A" | "3a" => out.push(DELIMITER),
            _ => {
                return Err(TokenDecodeError::BadEscape {
                    segment: segment.to_string(),
                });
            }
        }
    }
    Ok(out)
}
