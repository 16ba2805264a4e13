//! # NMEA 0183 Framing
//!
//! Checksum computation and validation, plus a one-shot parser for a single
//! complete frame: `$HHHHH,D1,D2,...,Dn*CC\r\n`.
//!
//! The one-shot parser is configurable to handle:
//! - Checksum requirements (required or optional)
//! - Line ending requirements (CRLF required or forbidden)
//!
//! Streams of bytes that are not aligned to sentence boundaries are handled by
//! [`NmeaParser`](crate::NmeaParser) instead.

use nom::{Parser, character::complete::char, error::ErrorKind, error::ParseError};

use crate::{Error, IResult, NmeaError, StrError};

/// Defines how a parser should handle sentence checksums.
///
/// NMEA 0183 sentences can include a checksum in the format `*CC` where
/// CC is a two-digit hexadecimal value representing the XOR of all bytes in the
/// sentence content (excluding the `$` prefix and `*` delimiter).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumMode {
    /// Checksum is required and must be present and valid.
    #[default]
    Required,

    /// Checksum is optional but will be validated if present.
    ///
    /// Use this mode with legacy equipment that may not always include checksums.
    Optional,
}

/// Defines how the one-shot parser should handle CRLF line endings.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LineEndingMode {
    /// The frame must end with `\r\n`.
    ///
    /// Use this mode when parsing log files or serial port lines.
    #[default]
    Required,

    /// The frame must not end with a line ending.
    ///
    /// Use this mode for sentences whose line endings were stripped upstream.
    Forbidden,
}

/// Builder for a one-shot NMEA 0183 frame parser.
///
/// The framing (`$`, checksum, line ending) is handled here, the content after `$`
/// and before `*` is handed to a user supplied content parser.
///
/// # Examples
///
/// ```rust
/// use nmea0183_nav::{ChecksumMode, IResult, LineEndingMode, Nmea0183ParserBuilder};
/// use nom::Parser;
///
/// fn content_parser(i: &str) -> IResult<&str, bool> {
///     Ok((i, true))
/// }
///
/// let mut strict_parser = Nmea0183ParserBuilder::new().build(content_parser);
/// assert!(strict_parser.parse("$GPGGA,data*6A\r\n").is_ok());
/// assert!(strict_parser.parse("$GPGGA,data*6A").is_err()); // (missing CRLF)
/// assert!(strict_parser.parse("$GPGGA,data\r\n").is_err()); // (missing checksum)
///
/// let mut lenient_parser = Nmea0183ParserBuilder::new()
///     .checksum_mode(ChecksumMode::Optional)
///     .line_ending_mode(LineEndingMode::Forbidden)
///     .build(content_parser);
/// assert!(lenient_parser.parse("$GPGGA,data*6A").is_ok());
/// assert!(lenient_parser.parse("$GPGGA,data").is_ok());
/// assert!(lenient_parser.parse("$GPGGA,data*99").is_err()); // (invalid checksum)
/// ```
#[must_use]
#[derive(Debug, Default, Clone, Copy)]
pub struct Nmea0183ParserBuilder {
    checksum_mode: ChecksumMode,
    line_ending_mode: LineEndingMode,
}

impl Nmea0183ParserBuilder {
    /// Creates a builder with [`ChecksumMode::Required`] and [`LineEndingMode::Required`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the checksum mode for the parser.
    pub fn checksum_mode(mut self, mode: ChecksumMode) -> Self {
        self.checksum_mode = mode;
        self
    }

    /// Sets the line ending mode for the parser.
    pub fn line_ending_mode(mut self, mode: LineEndingMode) -> Self {
        self.line_ending_mode = mode;
        self
    }

    /// Builds the frame parser around `content_parser`.
    ///
    /// The returned parser will:
    /// * Validate that the input is ASCII-only
    /// * Expect the frame to start with `$`
    /// * Split the content (everything before `*`, `\r` or `\n`) from the tail
    /// * Parse the tail according to the configured modes and compare checksums
    /// * Call `content_parser` on the content
    pub fn build<'a, O, F>(self, mut content_parser: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
    where
        F: Parser<&'a str, Output = O, Error = StrError<'a>>,
    {
        move |i: &'a str| {
            if !i.is_ascii() {
                return Err(nom::Err::Error(Error::NonAscii));
            }

            let (i, _) = start_delimiter(i)?;
            let end = i.find(['*', '\r', '\n']).unwrap_or(i.len());
            let (data, tail) = i.split_at(end);
            let (_, found) = checksum_crlf(self.checksum_mode, self.line_ending_mode)(tail)?;
            let (data, expected) = checksum(data);

            if let Some(found) = found
                && found != expected
            {
                return Err(nom::Err::Error(Error::ChecksumMismatch { expected, found }));
            }

            content_parser.parse(data)
        }
    }
}

fn start_delimiter(i: &str) -> IResult<&str, char> {
    char('$').parse(i)
}

/// Parses the tail of a frame: the optional `*CC` checksum and the line ending.
///
/// Returns the transmitted checksum ([`None`] if no checksum is present).
///
/// # Message Format Expectations
///
/// - [`ChecksumMode::Required`], [`LineEndingMode::Required`]: Expects `*CC\r\n`
/// - [`ChecksumMode::Required`], [`LineEndingMode::Forbidden`]: Expects `*CC`
/// - [`ChecksumMode::Optional`], [`LineEndingMode::Required`]: Expects `\r\n` or `*CC\r\n`
/// - [`ChecksumMode::Optional`], [`LineEndingMode::Forbidden`]: Expects nothing or `*CC`
///
/// # Examples
///
/// ```rust
/// use nmea0183_nav::{ChecksumMode, IResult, LineEndingMode, checksum_crlf};
///
/// let result: IResult<_, _> = checksum_crlf(ChecksumMode::Required, LineEndingMode::Required)("*51\r\n");
/// assert_eq!(result, Ok(("", Some(0x51))));
///
/// let result: IResult<_, _> = checksum_crlf(ChecksumMode::Optional, LineEndingMode::Forbidden)("");
/// assert_eq!(result, Ok(("", None)));
/// ```
pub fn checksum_crlf<'a>(
    cc: ChecksumMode,
    le: LineEndingMode,
) -> impl Fn(&'a str) -> IResult<&'a str, Option<u8>> {
    move |i: &'a str| {
        let body = match le {
            LineEndingMode::Required => i
                .strip_suffix("\r\n")
                .ok_or(nom::Err::Error(StrError::from_error_kind(i, ErrorKind::CrLf)))?,
            LineEndingMode::Forbidden if i.ends_with(['\r', '\n']) => {
                return Err(nom::Err::Error(StrError::from_error_kind(i, ErrorKind::CrLf)));
            }
            LineEndingMode::Forbidden => i,
        };

        match body.strip_prefix('*') {
            Some(hex) => match hex.as_bytes() {
                [high, low] => parse_checksum([*high, *low])
                    .map(|cc| (&hex[2..], Some(cc)))
                    .ok_or(nom::Err::Error(StrError::from_error_kind(hex, ErrorKind::HexDigit))),
                _ => Err(nom::Err::Error(StrError::from_error_kind(hex, ErrorKind::Count))),
            },
            None if body.is_empty() && cc == ChecksumMode::Optional => Ok((body, None)),
            None => Err(nom::Err::Error(StrError::from_error_kind(body, ErrorKind::Char))),
        }
    }
}

/// Calculates the NMEA 0183 checksum for the given sentence content.
///
/// The checksum is the XOR of every byte between `$` and `*`, excluding both
/// delimiters.
///
/// Returns the input unchanged together with the checksum.
///
/// # Examples
///
/// ```rust
/// use nmea0183_nav::checksum;
///
/// let (_, cc) = checksum("GPGGA,123456,data");
/// assert_eq!(cc, 0x41);
/// ```
pub fn checksum<I: AsRef<[u8]>>(input: I) -> (I, u8) {
    let calculated_checksum = input
        .as_ref()
        .iter()
        .fold(0u8, |accumulated_xor, &byte| accumulated_xor ^ byte);

    (input, calculated_checksum)
}

/// Decodes two ASCII hex digits (either case) into a checksum value.
///
/// Returns [`None`] if either character is not a hex digit.
pub fn parse_checksum(hex: [u8; 2]) -> Option<u8> {
    let high = (hex[0] as char).to_digit(16)?;
    let low = (hex[1] as char).to_digit(16)?;
    Some((high << 4 | low) as u8)
}

/// Checks a payload against its two transmitted checksum characters.
///
/// Returns `Ok(true)` on a match and `Ok(false)` on a mismatch. Characters that
/// are not hex digits are a decode failure, reported as
/// [`NmeaError::MalformedFrame`].
///
/// # Examples
///
/// ```rust
/// use nmea0183_nav::validate_checksum;
///
/// let payload = b"GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,";
/// assert_eq!(validate_checksum(payload, *b"47"), Ok(true));
/// assert_eq!(validate_checksum(payload, *b"00"), Ok(false));
/// assert!(validate_checksum(payload, *b"4G").is_err());
/// ```
pub fn validate_checksum(payload: &[u8], hex: [u8; 2]) -> Result<bool, NmeaError> {
    let found = parse_checksum(hex).ok_or_else(|| {
        NmeaError::MalformedFrame(format!(
            "invalid checksum characters {:?}",
            String::from_utf8_lossy(&hex)
        ))
    })?;
    let (_, expected) = checksum(payload);

    Ok(found == expected)
}

/// Formats a checksum value as a two-digit uppercase hexadecimal string.
///
/// # Examples
///
/// ```rust
/// use nmea0183_nav::format_checksum;
///
/// assert_eq!(format_checksum(0x41), "41");
/// assert_eq!(format_checksum(0x0A), "0A");
/// ```
pub fn format_checksum(checksum: u8) -> String {
    format!("{checksum:02X}")
}

/// Wraps sentence content into a complete frame: `$content*CC\r\n`.
///
/// # Examples
///
/// ```rust
/// use nmea0183_nav::frame;
///
/// assert_eq!(frame("GPGGA,123456,data"), "$GPGGA,123456,data*41\r\n");
/// ```
pub fn frame(content: &str) -> String {
    let (content, cc) = checksum(content);
    format!("${content}*{}\r\n", format_checksum(cc))
}
