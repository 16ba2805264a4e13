//! # Field Decoders
//!
//! Decoders for the fixed-format ASCII tokens found in NMEA sentences, and the
//! matching renderers used when generating sentences.
//!
//! Every decoder parses a single token. Presence handling (empty token means
//! absent) is done by [`field`](crate::parsing::field), so these decoders never
//! see an empty input in practice.

use std::{fmt, str::FromStr};

use nom::{
    Parser,
    bytes::complete::take_while_m_n,
    character::complete::{char, digit1, one_of, satisfy},
    combinator::{opt, recognize},
    error::{ErrorKind, ParseError},
    number::complete::recognize_float,
    sequence::preceded,
};
use time::{Date, Time};

use crate::{Error, IResult, StrError, parsing::comma, parsing::field};

fn verify_error(i: &str) -> nom::Err<StrError<'_>> {
    nom::Err::Error(StrError::from_error_kind(i, ErrorKind::Verify))
}

/// Exactly `n` decimal digits, parsed as `T`.
pub fn digits<'a, T: FromStr>(n: usize) -> impl FnMut(&'a str) -> IResult<&'a str, T> {
    move |i: &'a str| {
        take_while_m_n(n, n, |c: char| c.is_ascii_digit())
            .map_res(str::parse::<T>)
            .parse(i)
    }
}

/// A decimal number such as `545.4`, `-21.3` or `0.9`.
///
/// Infinite and NaN spellings are rejected.
pub fn decimal(i: &str) -> IResult<&str, f64> {
    let result: IResult<&str, f64> = recognize_float.map_res(str::parse::<f64>).parse(i);
    let (rest, value) = result?;

    if !value.is_finite() {
        return Err(verify_error(i));
    }

    Ok((rest, value))
}

/// UTC time of day: `HHMMSS`, `HHMMSS.h`, `HHMMSS.hh` or `HHMMSS.hhh`.
///
/// The fraction is kept in hundredths of a second; a third fractional digit is
/// truncated.
///
/// # Examples
///
/// ```rust
/// use nmea0183_nav::{IResult, parse::utc_time};
///
/// let (_, time) = utc_time("123519.43").unwrap();
/// assert_eq!(time.as_hms_milli(), (12, 35, 19, 430));
///
/// let (_, time) = utc_time("123519.4").unwrap();
/// assert_eq!(time.millisecond(), 400);
///
/// let (_, time) = utc_time("123519.437").unwrap();
/// assert_eq!(time.millisecond(), 430);
/// ```
pub fn utc_time(i: &str) -> IResult<&str, Time> {
    let (i, (hour, minute, second)) = (digits::<u8>(2), digits::<u8>(2), digits::<u8>(2)).parse(i)?;
    let (i, fraction) = fraction(i)?;

    let hundredths = match fraction {
        None => 0,
        Some(fraction) => {
            let value = fraction
                .bytes()
                .fold(0u16, |acc, b| acc * 10 + u16::from(b - b'0'));
            match fraction.len() {
                1 => value * 10,
                2 => value,
                _ => value / 10,
            }
        }
    };

    let time = Time::from_hms_milli(hour, minute, second, hundredths * 10)
        .map_err(|_| verify_error(i))?;

    Ok((i, time))
}

fn fraction(i: &str) -> IResult<&str, Option<&str>> {
    opt(preceded(
        char('.'),
        take_while_m_n(1, 3, |c: char| c.is_ascii_digit()),
    ))
    .parse(i)
}

/// UTC date: `DDMMYY`.
///
/// Two-digit years `83..=99` map to 19xx, everything else to 20xx.
pub fn utc_date(i: &str) -> IResult<&str, Date> {
    let (i, (day, month, year)) = (digits::<u8>(2), digits::<u8>(2), digits::<i32>(2)).parse(i)?;

    let month = time::Month::try_from(month).map_err(|_| verify_error(i))?;
    let year = match year {
        83..=99 => year + 1900,
        _ => year + 2000,
    };

    let date = Date::from_calendar_date(year, month, day).map_err(|_| verify_error(i))?;

    Ok((i, date))
}

/// An NDEG magnitude (`DDMM.MMMM` or `DDDMM.MMMM`) in decimal degrees.
///
/// `width` is the number of degree digits, `max_degrees` the largest allowed
/// magnitude.
fn ndeg<'a>(width: usize, max_degrees: u16) -> impl FnMut(&'a str) -> IResult<&'a str, f64> {
    move |i: &'a str| {
        let (rest, degrees) = digits::<u16>(width).parse(i)?;
        let (rest, minutes) = recognize((digits::<u8>(2), opt((char('.'), digit1))))
            .map_res(str::parse::<f64>)
            .parse(rest)?;

        if minutes >= 60.0 || degrees > max_degrees || (degrees == max_degrees && minutes > 0.0) {
            return Err(verify_error(i));
        }

        Ok((rest, f64::from(degrees) + minutes / 60.0))
    }
}

/// A coordinate field pair: NDEG magnitude then hemisphere.
///
/// Both tokens empty means the coordinate is absent. One without the other is
/// an invalid field.
fn coordinate<'a>(
    width: usize,
    max_degrees: u16,
    hemispheres: &'static str,
) -> impl FnMut(&'a str) -> IResult<&'a str, Option<f64>> {
    move |i: &'a str| {
        let (rest, magnitude) = field(ndeg(width, max_degrees)).parse(i)?;
        let (rest, _) = comma(rest)?;
        let (rest, hemisphere) = field(one_of(hemispheres)).parse(rest)?;

        match (magnitude, hemisphere) {
            (Some(value), Some('S' | 'W')) => Ok((rest, Some(-value))),
            (Some(value), Some(_)) => Ok((rest, Some(value))),
            (None, None) => Ok((rest, None)),
            _ => Err(nom::Err::Error(Error::InvalidField(&i[..i.len() - rest.len()]))),
        }
    }
}

/// Latitude field pair `DDMM.MMMM,N|S` in signed decimal degrees.
///
/// # Examples
///
/// ```rust
/// use nmea0183_nav::parse::latitude;
///
/// let (_, lat) = latitude("4807.038,N").unwrap();
/// assert!((lat.unwrap() - 48.1173).abs() < 1e-9);
///
/// let (_, lat) = latitude(",").unwrap();
/// assert_eq!(lat, None);
///
/// assert!(latitude("4807.038,").is_err());
/// ```
pub fn latitude(i: &str) -> IResult<&str, Option<f64>> {
    coordinate(2, 90, "NS").parse(i)
}

/// Longitude field pair `DDDMM.MMMM,E|W` in signed decimal degrees.
pub fn longitude(i: &str) -> IResult<&str, Option<f64>> {
    coordinate(3, 180, "EW").parse(i)
}

/// Magnetic variation field pair `x.x,E|W`; west is negative.
pub fn magnetic_variation(i: &str) -> IResult<&str, Option<f64>> {
    let (rest, magnitude) = field(decimal).parse(i)?;
    let (rest, _) = comma(rest)?;
    let (rest, direction) = field(one_of("EW")).parse(rest)?;

    match (magnitude, direction) {
        (Some(value), Some('W')) => Ok((rest, Some(-value))),
        (Some(value), Some(_)) => Ok((rest, Some(value))),
        (None, None) => Ok((rest, None)),
        _ => Err(nom::Err::Error(Error::InvalidField(&i[..i.len() - rest.len()]))),
    }
}

/// A single unit letter, e.g. `M` after an elevation.
pub fn unit<'a>(letter: char) -> impl FnMut(&'a str) -> IResult<&'a str, char> {
    move |i: &'a str| char(letter).parse(i)
}

/// Any unit letter; the caller decides which ones it accepts.
pub fn unit_letter(i: &str) -> IResult<&str, char> {
    satisfy(|c| c.is_ascii_alphabetic()).parse(i)
}

/// A decimal value followed by its fixed unit letter, e.g. `054.7,T`.
///
/// The unit on its own is accepted (some receivers always send it), a value
/// without its unit is an invalid field.
pub fn with_unit<'a>(letter: char) -> impl FnMut(&'a str) -> IResult<&'a str, Option<f64>> {
    move |i: &'a str| {
        let (rest, value) = field(decimal).parse(i)?;
        let (rest, _) = comma(rest)?;
        let (rest, unit) = field(unit(letter)).parse(rest)?;

        match (value, unit) {
            (Some(_), None) => Err(nom::Err::Error(Error::InvalidField(&i[..i.len() - rest.len()]))),
            (value, _) => Ok((rest, value)),
        }
    }
}

/// Writes `HHMMSS.hh`.
pub fn write_time<W: fmt::Write>(out: &mut W, time: Option<Time>) -> fmt::Result {
    match time {
        Some(time) => write!(
            out,
            "{:02}{:02}{:02}.{:02}",
            time.hour(),
            time.minute(),
            time.second(),
            time.millisecond() / 10
        ),
        None => Ok(()),
    }
}

/// Writes `DDMMYY`.
pub fn write_date<W: fmt::Write>(out: &mut W, date: Option<Date>) -> fmt::Result {
    match date {
        Some(date) => write!(
            out,
            "{:02}{:02}{:02}",
            date.day(),
            u8::from(date.month()),
            date.year().rem_euclid(100)
        ),
        None => Ok(()),
    }
}

fn write_ndeg<W: fmt::Write>(
    out: &mut W,
    value: Option<f64>,
    width: usize,
    hemispheres: (char, char),
) -> fmt::Result {
    let Some(value) = value else {
        return out.write_char(',');
    };

    let hemisphere = if value < 0.0 { hemispheres.1 } else { hemispheres.0 };
    // ten-thousandths of a minute
    let total = (value.abs() * 600_000.0).round() as u64;
    let degrees = total / 600_000;
    let minutes = total % 600_000;

    write!(
        out,
        "{degrees:0width$}{:02}.{:04},{hemisphere}",
        minutes / 10_000,
        minutes % 10_000
    )
}

/// Writes the latitude field pair `DDMM.MMMM,N`.
pub fn write_latitude<W: fmt::Write>(out: &mut W, value: Option<f64>) -> fmt::Result {
    write_ndeg(out, value, 2, ('N', 'S'))
}

/// Writes the longitude field pair `DDDMM.MMMM,E`.
pub fn write_longitude<W: fmt::Write>(out: &mut W, value: Option<f64>) -> fmt::Result {
    write_ndeg(out, value, 3, ('E', 'W'))
}

/// Writes the magnetic variation field pair `x.x,E`.
pub fn write_magnetic_variation<W: fmt::Write>(out: &mut W, value: Option<f64>) -> fmt::Result {
    match value {
        Some(value) if value < 0.0 => write!(out, "{:.1},W", -value),
        Some(value) => write!(out, "{value:.1},E"),
        None => out.write_char(','),
    }
}

/// Writes the field pair `x.x,U`; the unit letter is always written.
pub fn write_with_unit<W: fmt::Write>(out: &mut W, value: Option<f64>, letter: char) -> fmt::Result {
    write_fixed(out, value, 1)?;
    write!(out, ",{letter}")
}

/// Writes a number with a fixed count of decimals, or nothing.
pub fn write_fixed<W: fmt::Write>(out: &mut W, value: Option<f64>, precision: usize) -> fmt::Result {
    match value {
        Some(value) => write!(out, "{value:.precision$}"),
        None => Ok(()),
    }
}

/// Writes a zero-padded integer, or nothing.
pub fn write_padded<W: fmt::Write, T: fmt::Display>(
    out: &mut W,
    value: Option<T>,
    width: usize,
) -> fmt::Result {
    match value {
        Some(value) => write!(out, "{value:0width$}"),
        None => Ok(()),
    }
}

/// Writes a single character, or nothing.
pub fn write_char<W: fmt::Write>(out: &mut W, value: Option<char>) -> fmt::Result {
    match value {
        Some(c) => out.write_char(c),
        None => Ok(()),
    }
}
