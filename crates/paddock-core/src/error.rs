//! Error types for the paddock core.
//!
//! This module covers the component-token codec. Routing-level errors
//! (registry, dispatch, handler) are defined in `paddock-framework`.

use thiserror::Error;

/// Errors that can occur while encoding a component token.
///
/// Encoding failures are construction-time programming errors: the caller
/// issued a component whose arguments cannot fit the platform bound and must
/// redesign them (prefer small integer ids over free text).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenEncodeError {
    /// The serialized token exceeds the platform length limit.
    ///
    /// The token is never silently truncated.
    #[error("encoded token is {len} chars, platform limit is {max}")]
    TooLarge {
        /// Length the serialized form would have had.
        len: usize,
        /// The platform bound that was exceeded.
        max: usize,
    },
}

/// Errors that can occur while decoding a component token.
///
/// Decoding rejects malformed input with a tagged result instead of
/// panicking; the registry maps all of these to a stale-component outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenDecodeError {
    /// The token is the empty string.
    #[error("token is empty")]
    Empty,

    /// An argument segment had no content at all.
    #[error("argument segment is empty")]
    EmptyArgument,

    /// An argument segment started with a tag this codec does not know.
    #[error("unknown argument tag '{tag}'")]
    UnknownTag {
        /// The offending tag character.
        tag: char,
    },

    /// An integer argument did not parse.
    #[error("malformed integer argument '{segment}'")]
    BadInt {
        /// The offending segment.
        segment: String,
    },

    /// A flag argument was neither `0` nor `1`.
    #[error("malformed flag argument '{segment}'")]
    BadFlag {
        /// The offending segment.
        segment: String,
    },

    /// A text segment carried an escape sequence this codec did not emit.
    #[error("malformed escape sequence in '{segment}'")]
    BadEscape {
        /// The offending segment.
        segment: String,
    },
}

/// Result type for token encoding.
pub type EncodeResult<T> = Result<T, TokenEncodeError>;

/// Result type for token decoding.
pub type DecodeResult<T> = Result<T, TokenDecodeError>;
