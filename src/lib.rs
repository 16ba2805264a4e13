//! # NMEA 0183 Navigation Parser
//!
//! This library turns a raw NMEA 0183 byte stream into one navigation snapshot,
//! and generates NMEA sentences back from that snapshot.
//!
//! Frames have the format `$HHHHH,D1,D2,...,Dn*CC\r\n`. The supported sentences
//! are `GPGGA`, `GPGSA`, `GPGSV`, `GPRMC` and `GPVTG`.
//!
//! The library is split into layers:
//! - [`checksum`], [`validate_checksum`] and [`Nmea0183ParserBuilder`] handle the
//!   framing of a single sentence
//! - [`parse`] decodes individual fields (time, date, coordinates, numbers)
//! - [`sentences`] holds one record type per sentence, each able to parse,
//!   generate and merge itself into a [`NavInfo`]
//! - [`NmeaParser`] drives the whole thing from an unaligned byte stream
//! - [`generate()`] renders a [`NavInfo`] as a block of sentences
//!
//! ## Usage
//!
//! ```rust
//! use nmea0183_nav::{NavInfo, NmeaParser, Present};
//!
//! let mut parser = NmeaParser::new();
//! let mut info = NavInfo::default();
//!
//! let outcome = parser.parse(
//!     b"garbage$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n\
//!       $GPVTG,054.7,T,034.4,M,005.5,N,010.2,K*48\r\n",
//!     &mut info,
//! );
//!
//! assert_eq!(outcome.merged, 2);
//! assert_eq!(info.speed, Some(10.2));
//! assert!(info.present().contains(Present::LAT | Present::TRACK));
//! ```

pub mod error;
pub mod generate;
pub mod info;
mod nmea0183;
pub mod parse;
pub mod parsing;
pub mod sentences;
pub mod stream;

pub use error::{Error, IResult, NmeaError, StrError};
pub use generate::generate;
pub use info::{MAX_SATELLITES, MAX_SATELLITES_IN_USE, NavInfo, Present, SentenceMask};
pub use nmea0183::*;
pub use sentences::{Codec, NmeaSentence, Parsable, SentenceKind};
pub use stream::{
    DiagnosticSink, LogSink, MAX_SENTENCE_LENGTH, NmeaParser, NmeaParserBuilder, ParseOutcome,
};

#[cfg(doctest)]
#[doc = include_str!("../README.md")]
struct README;

#[cfg(test)]
mod tests {
    mod framing;
    mod generate;
    mod stream;
}
