// Copyright (c) SimpleStaking, Viable Systems and Tezedge Contributors
// SPDX-License-Identifier: MIT

//! Decoding errors.

use std::fmt;

use nom::error::{ErrorKind, FromExternalError, ParseError};

/// Classification of a decoding failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeErrorKind {
    /// The input ended in the middle of a field.
    TruncatedInput,
    /// No identifier kind matches the leading tag or text prefix.
    UnrecognizedIdentifier,
    ChecksumMismatch,
    LengthMismatch,
    UnknownPrimitive,
    /// The value does not have the shape required by its type schema.
    SchemaMismatch,
    UnknownOperationKind,
    /// A tag byte that is not valid at this position.
    InvalidTag,
    /// Well-framed bytes that do not form a valid value.
    InvalidValue,
    /// Bytes left over after a complete value.
    TrailingBytes,
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::TruncatedInput => "truncated input",
            Self::UnrecognizedIdentifier => "unrecognized identifier",
            Self::ChecksumMismatch => "checksum mismatch",
            Self::LengthMismatch => "length mismatch",
            Self::UnknownPrimitive => "unknown primitive",
            Self::SchemaMismatch => "schema mismatch",
            Self::UnknownOperationKind => "unknown operation kind",
            Self::InvalidTag => "invalid tag",
            Self::InvalidValue => "invalid value",
            Self::TrailingBytes => "trailing bytes",
        };
        f.write_str(s)
    }
}

/// Decoding error, carrying the number of input bytes that were left
/// unread at the failing position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    kind: DecodeErrorKind,
    remaining: usize,
    detail: Option<String>,
}

impl DecodeError {
    pub fn new(input: &[u8], kind: DecodeErrorKind) -> Self {
        Self {
            kind,
            remaining: input.len(),
            detail: None,
        }
    }

    /// Error detached from any input position.
    pub fn from_kind(kind: DecodeErrorKind) -> Self {
        Self {
            kind,
            remaining: 0,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn truncated(input: &[u8]) -> Self {
        Self::new(input, DecodeErrorKind::TruncatedInput)
    }

    pub fn invalid_tag(input: &[u8], tag: u8) -> Self {
        Self::new(input, DecodeErrorKind::InvalidTag).with_detail(format!("0x{tag:02x}"))
    }

    pub fn invalid_value(input: &[u8], detail: impl Into<String>) -> Self {
        Self::new(input, DecodeErrorKind::InvalidValue).with_detail(detail)
    }

    pub fn unknown_operation_kind(input: &[u8], tag: u8) -> Self {
        Self::new(input, DecodeErrorKind::UnknownOperationKind).with_detail(format!("0x{tag:02x}"))
    }

    pub fn unknown_primitive(input: &[u8], code: u8) -> Self {
        Self::new(input, DecodeErrorKind::UnknownPrimitive).with_detail(format!("0x{code:02x}"))
    }

    pub fn trailing_bytes(input: &[u8]) -> Self {
        Self::new(input, DecodeErrorKind::TrailingBytes)
            .with_detail(format!("{} unread bytes", input.len()))
    }

    pub fn kind(&self) -> DecodeErrorKind {
        self.kind
    }

    /// Number of input bytes left unread when the error was raised.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(detail) = &self.detail {
            write!(f, " ({detail})")?;
        }
        write!(f, " with {} bytes remaining", self.remaining)
    }
}

impl std::error::Error for DecodeError {}

impl<'a> ParseError<&'a [u8]> for DecodeError {
    fn from_error_kind(input: &'a [u8], kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Eof | ErrorKind::Complete => Self::truncated(input),
            ErrorKind::Tag => Self::new(input, DecodeErrorKind::InvalidTag),
            other => Self::invalid_value(input, other.description()),
        }
    }

    fn append(_input: &'a [u8], _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

impl<'a, E: fmt::Display> FromExternalError<&'a [u8], E> for DecodeError {
    fn from_external_error(input: &'a [u8], _kind: ErrorKind, e: E) -> Self {
        Self::invalid_value(input, e.to_string())
    }
}

/// Flattens a nom error into the underlying [`DecodeError`].
pub fn convert_error(err: nom::Err<DecodeError>) -> DecodeError {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => e,
        nom::Err::Incomplete(_) => DecodeError::from_kind(DecodeErrorKind::TruncatedInput),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nom::number::complete::be_u32;

    #[test]
    fn eof_is_truncation() {
        let err = be_u32::<_, DecodeError>(&[0u8, 1][..]).unwrap_err();
        let err = convert_error(err);
        assert_eq!(err.kind(), DecodeErrorKind::TruncatedInput);
        assert_eq!(err.remaining(), 2);
    }

    #[test]
    fn display_includes_detail() {
        let err = DecodeError::unknown_operation_kind(&[0u8], 0);
        assert_eq!(
            err.to_string(),
            "unknown operation kind (0x00) with 1 bytes remaining"
        );
    }
}
