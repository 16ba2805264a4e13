//! # Error Types
//!
//! This module defines the error types used throughout the library.
//!
//! Two layers exist:
//! - [`Error`] is the nom error carried by the sentence decoders while they walk
//!   the payload. It keeps a reference to the offending input.
//! - [`NmeaError`] is the owned, caller-facing error produced once a frame has been
//!   fully processed (by the stream parser or by [`Codec::parse_payload`]).
//!
//! [`Codec::parse_payload`]: crate::sentences::Codec::parse_payload

use nom::error::{ErrorKind, FromExternalError, ParseError};

/// Holds the result of parsing functions.
///
/// It depends on the input type `I`, the output type `O`, and the error type `E`
/// (by default `nom::error::Error<I>`).
///
/// The `Ok` side is a pair containing the remainder of the input (the part of the data that
/// was not parsed) and the produced value. The `Err` side contains an instance of `nom::Err`.
///
/// Outside of the parsing code, you can use the [nom::Finish::finish] method to convert
/// it to a more common result type.
pub type IResult<I, O, E = nom::error::Error<I>> = nom::IResult<I, O, Error<I, E>>;

/// The concrete decoder error used for `&str` payloads.
pub type StrError<'a> = Error<&'a str, nom::error::Error<&'a str>>;

/// Represents all possible errors that can occur while decoding a sentence.
#[derive(Debug, PartialEq)]
pub enum Error<I, E> {
    /// The provided input contains non-ASCII characters.
    ///
    /// NMEA sentences must be ASCII-only for proper parsing and checksum calculation.
    NonAscii,

    /// The checksum of the sentence was corrupt or incorrect.
    ChecksumMismatch {
        /// The checksum calculated from the sentence content
        expected: u8,
        /// The checksum found in the sentence
        found: u8,
    },

    /// The sentence structure was invalid (missing delimiter, wrong field count,
    /// trailing data).
    ParsingError(E),

    /// The sentence type token is not one of the supported sentence types.
    ///
    /// Contains the offending token.
    UnrecognizedMessage(I),

    /// A field was present but could not be decoded.
    ///
    /// Contains the field token that caused the error.
    InvalidField(I),
}

impl<I, E> ParseError<I> for Error<I, E>
where
    E: ParseError<I>,
{
    fn from_error_kind(input: I, kind: ErrorKind) -> Self {
        Error::ParsingError(E::from_error_kind(input, kind))
    }

    fn append(_: I, _: ErrorKind, other: Self) -> Self {
        other
    }
}

impl<I, E, EX> FromExternalError<I, EX> for Error<I, E>
where
    E: FromExternalError<I, EX>,
{
    fn from_external_error(input: I, kind: ErrorKind, e: EX) -> Self {
        Error::ParsingError(E::from_external_error(input, kind, e))
    }
}

/// Errors reported for a single frame.
///
/// None of these abort a stream: the frame is dropped and processing continues
/// with the next `$`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NmeaError {
    /// Structural problem: missing delimiter, wrong field count, non-hex
    /// checksum characters, non-ASCII payload.
    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    /// The transmitted checksum does not match the XOR of the payload.
    #[error("checksum mismatch: calculated {expected:02X}, found {found:02X}")]
    ChecksumMismatch {
        /// The checksum calculated from the payload
        expected: u8,
        /// The checksum transmitted with the frame
        found: u8,
    },

    /// A present field failed its type-specific decode.
    #[error("invalid field format: {0:?}")]
    InvalidFieldFormat(String),

    /// Well-formed frame carrying a sentence type this crate does not handle.
    #[error("unsupported sentence type: {0:?}")]
    UnsupportedSentenceType(String),

    /// The frame exceeded the maximum sentence length.
    #[error("sentence exceeds {0} bytes")]
    BufferOverflow(usize),
}

impl<'a> From<StrError<'a>> for NmeaError {
    fn from(error: StrError<'a>) -> Self {
        match error {
            Error::NonAscii => NmeaError::MalformedFrame("non-ASCII content".into()),
            Error::ChecksumMismatch { expected, found } => {
                NmeaError::ChecksumMismatch { expected, found }
            }
            Error::ParsingError(e) => {
                NmeaError::MalformedFrame(format!("{:?} at {:?}", e.code, e.input))
            }
            Error::UnrecognizedMessage(token) => NmeaError::UnsupportedSentenceType(token.into()),
            Error::InvalidField(token) => NmeaError::InvalidFieldFormat(token.into()),
        }
    }
}

impl<'a> From<nom::Err<StrError<'a>>> for NmeaError {
    fn from(error: nom::Err<StrError<'a>>) -> Self {
        match error {
            nom::Err::Error(e) | nom::Err::Failure(e) => e.into(),
            nom::Err::Incomplete(_) => NmeaError::MalformedFrame("incomplete sentence".into()),
        }
    }
}
