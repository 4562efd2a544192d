use crate::alloc::string::String;
use core::fmt::{self, Display};

use nom::error::{ErrorKind, FromExternalError, ParseError};

/// Every error the codec or the address tree can raise.
///
/// The variant names are the contract: callers match on them, not on the
/// message text carried by a few of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OscError {
    /// A decode needed more bytes than were available.
    Truncated,
    /// The type-tag string was missing its leading `,` or named an
    /// unsupported tag.
    BadTypeTag(String),
    /// A bundle decode did not begin with `#bundle\0`.
    NotABundle,
    /// An `i` argument was outside `[-2^31, 2^31 - 1]`.
    Overflow,
    /// An address part contained one of `SPACE # , /`.
    InvalidAddressPart(String),
    /// `remove_callback`/`remove_all_callbacks` named a path with no node.
    NoSuchPath,
    /// `remove_callback` named a callback that isn't registered at that path.
    NoSuchCallback,
    /// A decoded OSC string was not valid UTF-8/ASCII.
    BadString,
    /// Generic parser failure surfaced by `nom` that doesn't fit one of the
    /// named kinds above (kept so `OscError` can implement `ParseError`).
    Parser(ErrorKind),
}

impl Display for OscError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OscError::Truncated => f.write_str("packet truncated before expected end"),
            OscError::BadTypeTag(msg) => write!(f, "bad type-tag string: {msg}"),
            OscError::NotABundle => f.write_str("packet is not a bundle"),
            OscError::Overflow => f.write_str("integer argument overflows i32"),
            OscError::InvalidAddressPart(part) => {
                write!(f, "invalid address part: {part:?}")
            }
            OscError::NoSuchPath => f.write_str("no node registered at that path"),
            OscError::NoSuchCallback => f.write_str("no such callback registered at that path"),
            OscError::BadString => f.write_str("osc string is not valid utf-8"),
            OscError::Parser(kind) => write!(f, "parser error: {kind:?}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for OscError {}

impl<I> ParseError<I> for OscError {
    fn from_error_kind(_input: I, kind: ErrorKind) -> Self {
        OscError::Parser(kind)
    }

    fn append(_input: I, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

impl<I> FromExternalError<I, OscError> for OscError {
    fn from_external_error(_input: I, _kind: ErrorKind, e: OscError) -> Self {
        e
    }
}

/// Crate-wide result alias, mirroring the teacher crate's `types::Result`.
pub type Result<T> = core::result::Result<T, OscError>;
