//! # Parsing Utilities
//!
//! Field-level combinators shared by every sentence decoder.
//!
//! NMEA fields are positional and comma separated. An empty token means the
//! field is absent, which is not the same thing as a zero value. [`field`]
//! captures exactly that: it yields `None` for an empty token, `Some` for a
//! token that decodes completely, and an [`Error::InvalidField`] for anything
//! else. Missing separators and trailing data are structural errors and are
//! reported by [`comma`] and [`consumed`].

use nom::{
    Parser,
    character::complete::char,
    error::{ErrorKind, ParseError},
};

use crate::{Error, IResult, StrError};

/// Parses the `,` field delimiter.
pub fn comma(i: &str) -> IResult<&str, char> {
    char(',').parse(i)
}

/// Decodes one positional field.
///
/// The token runs up to the next `,` (or the end of input). The inner parser
/// must consume the whole token, otherwise the field is reported as invalid.
///
/// # Examples
///
/// ```rust
/// use nmea0183_nav::{IResult, parsing::field};
/// use nom::{Parser, character::complete::u8};
///
/// let result: IResult<_, _> = field(u8).parse("08,0.9");
/// assert_eq!(result, Ok((",0.9", Some(8))));
///
/// let result: IResult<_, _> = field(u8).parse(",0.9");
/// assert_eq!(result, Ok((",0.9", None)));
///
/// let result: IResult<_, Option<u8>> = field(u8).parse("A8,0.9");
/// assert!(result.is_err());
/// ```
pub fn field<'a, O, F>(mut f: F) -> impl FnMut(&'a str) -> IResult<&'a str, Option<O>>
where
    F: Parser<&'a str, Output = O, Error = StrError<'a>>,
{
    move |i: &'a str| {
        let end = i.find(',').unwrap_or(i.len());
        let (token, rest) = i.split_at(end);

        if token.is_empty() {
            return Ok((rest, None));
        }

        match f.parse(token) {
            Ok(("", value)) => Ok((rest, Some(value))),
            _ => Err(nom::Err::Error(Error::InvalidField(token))),
        }
    }
}

/// Like [`field`], but an empty token is an error too.
pub fn required<'a, O, F>(f: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: Parser<&'a str, Output = O, Error = StrError<'a>>,
{
    let mut f = field(f);
    move |i: &'a str| match f(i)? {
        (rest, Some(value)) => Ok((rest, value)),
        (_, None) => Err(nom::Err::Error(Error::InvalidField(i))),
    }
}

/// Ensures that the parser consumes all input.
///
/// Used at the end of every sentence so that extra fields are rejected.
///
/// # Examples
///
/// ```rust
/// use nmea0183_nav::{IResult, parsing::consumed};
/// use nom::{Parser, bytes::complete::take, error::ErrorKind};
///
/// let mut parser = consumed(take(3u8), ErrorKind::Eof);
/// let result: IResult<_, _> = parser.parse("abc");
/// assert!(result.is_ok());
///
/// let result: IResult<_, _> = parser.parse("abcd");
/// assert!(result.is_err());
/// ```
pub fn consumed<'a, O, F>(mut f: F, e: ErrorKind) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: Parser<&'a str, Output = O, Error = StrError<'a>>,
{
    move |i: &'a str| {
        let (i, o) = f.parse(i)?;

        if !i.is_empty() {
            return Err(nom::Err::Error(Error::from_error_kind(i, e)));
        }

        Ok((i, o))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nom::character::complete::u16;

    #[test]
    fn test_required() {
        let result: IResult<_, _> = required(u16).parse("0042,x");
        assert_eq!(result, Ok((",x", 42)));

        let result: IResult<_, u16> = required(u16).parse(",x");
        assert_eq!(result, Err(nom::Err::Error(Error::InvalidField(",x"))));
    }

    #[test]
    fn test_field_rejects_partial_token() {
        let result: IResult<_, Option<u16>> = field(u16).parse("12a,3");
        assert_eq!(result, Err(nom::Err::Error(Error::InvalidField("12a"))));
    }
}
