//! # Sentence Codecs
//!
//! Strongly-typed records for the supported GPS sentences, each with a decoder
//! ([`Parsable`]), an encoder and the conversions to and from the unified
//! [`NavInfo`] snapshot ([`Codec`]).

mod gga;
mod gsa;
mod gsv;
mod rmc;
mod vtg;

use std::fmt;

pub use gga::GGA;
pub use gsa::GSA;
pub use gsv::{GSV, MAX_MESSAGES, SATELLITES_PER_MESSAGE};
pub use rmc::{KNOTS_TO_KPH, RMC};
pub use vtg::VTG;

use nom::{
    Finish, Parser,
    character::complete::{u8, u16},
    combinator::verify,
    error::{ErrorKind, ParseError},
};

use crate::{
    Error, IResult, Nmea0183ParserBuilder, NmeaError, StrError, frame,
    info::{NavInfo, Present, SentenceMask},
    parse::write_padded,
    parsing::{comma, consumed, field},
};

/// A trait for types that can be parsed from a string input.
///
/// Implemented by every sentence record, the single-character code enums and
/// the [`NmeaSentence`] enum. Records parse the fields that follow the
/// sentence type token; [`NmeaSentence`] parses the whole payload.
pub trait Parsable: Sized {
    /// Parses the input and returns a result.
    ///
    /// # Returns
    ///
    /// Returns an [`IResult`] containing:
    /// - On success: A tuple of `(remaining_input, parsed_value)`.
    /// - On failure: An [`Error`] indicating the parsing error.
    ///
    /// # Example
    ///
    /// ```rust
    /// use nmea0183_nav::sentences::{NmeaSentence, Parsable};
    ///
    /// let content = "GPGGA,123519.43,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,";
    /// let result = NmeaSentence::parser(content);
    /// assert!(result.is_ok());
    /// ```
    fn parser(input: &str) -> IResult<&str, Self>;
}

/// Encoding and snapshot conversion for one sentence record.
pub trait Codec: Parsable {
    /// The sentence type this record encodes.
    const KIND: SentenceKind;

    /// Writes the fields that follow the type token, each preceded by `,`.
    ///
    /// Absent fields are written as empty tokens.
    fn write_fields<W: fmt::Write>(&self, out: &mut W) -> fmt::Result;

    /// The snapshot fields this record supplies when merged.
    fn present(&self) -> Present;

    /// Merges every present field into `info`.
    ///
    /// Fields this record does not carry are left untouched.
    fn merge_into(&self, info: &mut NavInfo);

    /// Renders the record as a complete frame, `$GPxxx,...*hh\r\n`.
    fn generate(&self) -> String {
        struct Content<'a, T: ?Sized>(&'a T);

        impl<T: Codec + ?Sized> fmt::Display for Content<'_, T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(T::KIND.as_str())?;
                self.0.write_fields(f)
            }
        }

        frame(&Content(self).to_string())
    }

    /// Decodes a payload (the text between `$` and `*`) of this sentence type.
    fn parse_payload(payload: &str) -> Result<Self, NmeaError> {
        let fields = payload
            .strip_prefix(Self::KIND.as_str())
            .and_then(|rest| rest.strip_prefix(','))
            .ok_or_else(|| {
                NmeaError::MalformedFrame(format!("expected a {} payload", Self::KIND))
            })?;

        let (_, record) = consumed(Self::parser, ErrorKind::Eof)
            .parse(fields)
            .finish()?;

        Ok(record)
    }
}

/// The supported sentence types.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SentenceKind {
    /// Global Positioning System Fix Data
    GPGGA,
    /// GPS DOP and active satellites
    GPGSA,
    /// Satellites in View
    GPGSV,
    /// Recommended Minimum Navigation Information
    GPRMC,
    /// Track made good and Ground speed
    GPVTG,
}

impl SentenceKind {
    /// Every kind, in generation order.
    pub const ALL: [Self; 5] = [Self::GPGGA, Self::GPGSA, Self::GPGSV, Self::GPRMC, Self::GPVTG];

    /// The talker + type token, e.g. `"GPGGA"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GPGGA => "GPGGA",
            Self::GPGSA => "GPGSA",
            Self::GPGSV => "GPGSV",
            Self::GPRMC => "GPRMC",
            Self::GPVTG => "GPVTG",
        }
    }

    /// Looks up a talker + type token.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == token)
    }

    /// The bit for this kind in a [`SentenceMask`].
    pub fn mask(self) -> SentenceMask {
        match self {
            Self::GPGGA => SentenceMask::GPGGA,
            Self::GPGSA => SentenceMask::GPGSA,
            Self::GPGSV => SentenceMask::GPGSV,
            Self::GPRMC => SentenceMask::GPRMC,
            Self::GPVTG => SentenceMask::GPVTG,
        }
    }
}

impl fmt::Display for SentenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unified enum over the supported sentence records.
///
/// [`NmeaSentence::parser`] reads the type token, dispatches to the matching
/// record parser and rejects trailing fields. Alphanumeric tokens outside the
/// supported set, proprietary ones included, are reported as
/// [`Error::UnrecognizedMessage`].
///
/// ```rust
/// use nmea0183_nav::sentences::{NmeaSentence, Parsable};
///
/// // This will fail - unsupported sentence type
/// let result = NmeaSentence::parser("GPZDA,123456.78,29,02,2024,03,00");
/// assert!(result.is_err());
///
/// // This will fail - malformed GGA sentence
/// let result = NmeaSentence::parser("GPGGA,invalid,data");
/// assert!(result.is_err());
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum NmeaSentence {
    /// Global Positioning System Fix Data
    GGA(GGA),
    /// GPS DOP and active satellites
    GSA(GSA),
    /// Satellites in View
    GSV(GSV),
    /// Recommended Minimum Navigation Information
    RMC(RMC),
    /// Track made good and Ground speed
    VTG(VTG),
}

impl Parsable for NmeaSentence {
    fn parser(i: &str) -> IResult<&str, Self> {
        let end = i.find(',').unwrap_or(i.len());
        let (token, rest) = i.split_at(end);

        let Some(kind) = SentenceKind::from_token(token) else {
            if !token.is_empty() && token.bytes().all(|b| b.is_ascii_alphanumeric()) {
                return Err(nom::Err::Error(Error::UnrecognizedMessage(token)));
            }
            return Err(nom::Err::Error(StrError::from_error_kind(i, ErrorKind::Tag)));
        };

        let (i, _) = comma(rest)?;

        match kind {
            SentenceKind::GPGGA => consumed(GGA::parser, ErrorKind::Eof).map(Self::GGA).parse(i),
            SentenceKind::GPGSA => consumed(GSA::parser, ErrorKind::Eof).map(Self::GSA).parse(i),
            SentenceKind::GPGSV => consumed(GSV::parser, ErrorKind::Eof).map(Self::GSV).parse(i),
            SentenceKind::GPRMC => consumed(RMC::parser, ErrorKind::Eof).map(Self::RMC).parse(i),
            SentenceKind::GPVTG => consumed(VTG::parser, ErrorKind::Eof).map(Self::VTG).parse(i),
        }
    }
}

impl NmeaSentence {
    /// Decodes a payload (the text between `$` and `*`).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nmea0183_nav::{NmeaError, sentences::{NmeaSentence, SentenceKind}};
    ///
    /// let sentence = NmeaSentence::parse_payload("GPVTG,054.7,T,034.4,M,005.5,N,010.2,K").unwrap();
    /// assert_eq!(sentence.kind(), SentenceKind::GPVTG);
    ///
    /// let error = NmeaSentence::parse_payload("GPZDA,201530.00,04,07,2002,00,00").unwrap_err();
    /// assert_eq!(error, NmeaError::UnsupportedSentenceType("GPZDA".into()));
    /// ```
    pub fn parse_payload(payload: &str) -> Result<Self, NmeaError> {
        let (_, sentence) = Self::parser(payload).finish()?;
        Ok(sentence)
    }

    /// Decodes one complete frame, `$...*hh\r\n`, with the checksum and line
    /// ending both required.
    ///
    /// Use [`Nmea0183ParserBuilder`] directly for the lenient modes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nmea0183_nav::{NmeaError, sentences::NmeaSentence};
    ///
    /// let frame = "$GPGGA,123519.43,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*6E\r\n";
    /// assert!(NmeaSentence::parse_frame(frame).is_ok());
    ///
    /// let frame = "$GPGGA,123519.43,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*00\r\n";
    /// assert!(matches!(
    ///     NmeaSentence::parse_frame(frame),
    ///     Err(NmeaError::ChecksumMismatch { expected: 0x6E, found: 0x00 })
    /// ));
    /// ```
    pub fn parse_frame(frame: &str) -> Result<Self, NmeaError> {
        let mut parser = Nmea0183ParserBuilder::new().build(Self::parser);
        let (_, sentence) = parser(frame).finish()?;
        Ok(sentence)
    }

    /// The sentence type of this record.
    pub fn kind(&self) -> SentenceKind {
        match self {
            Self::GGA(_) => GGA::KIND,
            Self::GSA(_) => GSA::KIND,
            Self::GSV(_) => GSV::KIND,
            Self::RMC(_) => RMC::KIND,
            Self::VTG(_) => VTG::KIND,
        }
    }

    /// See [`Codec::present`].
    pub fn present(&self) -> Present {
        match self {
            Self::GGA(gga) => gga.present(),
            Self::GSA(gsa) => gsa.present(),
            Self::GSV(gsv) => gsv.present(),
            Self::RMC(rmc) => rmc.present(),
            Self::VTG(vtg) => vtg.present(),
        }
    }

    /// See [`Codec::merge_into`].
    pub fn merge_into(&self, info: &mut NavInfo) {
        match self {
            Self::GGA(gga) => gga.merge_into(info),
            Self::GSA(gsa) => gsa.merge_into(info),
            Self::GSV(gsv) => gsv.merge_into(info),
            Self::RMC(rmc) => rmc.merge_into(info),
            Self::VTG(vtg) => vtg.merge_into(info),
        }
    }

    /// See [`Codec::generate`].
    pub fn generate(&self) -> String {
        match self {
            Self::GGA(gga) => gga.generate(),
            Self::GSA(gsa) => gsa.generate(),
            Self::GSV(gsv) => gsv.generate(),
            Self::RMC(rmc) => rmc.generate(),
            Self::VTG(vtg) => vtg.generate(),
        }
    }
}

macro_rules! parsable_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $char:literal => $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )*
        }

        impl Parsable for $name {
            fn parser(i: &str) -> IResult<&str, Self> {
                nom::branch::alt(($(
                    nom::character::complete::char($char).map(|_| Self::$variant),
                )*)).parse(i)
            }
        }

        impl $name {
            /// The wire character of this code.
            pub fn as_char(self) -> char {
                match self {
                    $(Self::$variant => $char,)*
                }
            }
        }
    };
}

parsable_enum! {
    /// Status Mode Indicator
    pub enum Status {
        /// A - Valid
        'A' => Valid,
        /// V - Invalid
        'V' => Invalid,
    }
}

parsable_enum! {
    /// FAA Mode Indicator
    ///
    /// <https://gpsd.gitlab.io/gpsd/NMEA.html#_sentence_mixes_and_nmea_variations>
    pub enum FaaMode {
        /// A - Autonomous mode
        'A' => Autonomous,
        /// C - Quectel Querk, "Caution"
        'C' => Caution,
        /// D - Differential Mode
        'D' => Differential,
        /// E - Estimated (dead-reckoning) mode
        'E' => Estimated,
        /// F - RTK Float mode
        'F' => FloatRtk,
        /// M - Manual Input Mode
        'M' => Manual,
        /// N - Data Not Valid
        'N' => DataNotValid,
        /// P - Precise
        'P' => Precise,
        /// R - RTK Integer mode
        'R' => FixedRtk,
        /// S - Simulated Mode
        'S' => Simulator,
        /// U - Quectel Querk, "Unsafe"
        'U' => Unsafe,
    }
}

impl FaaMode {
    /// The GGA quality a fix in this mode corresponds to.
    pub fn quality(self) -> Quality {
        match self {
            Self::Autonomous | Self::Caution | Self::Unsafe => Quality::GPSFix,
            Self::Differential => Quality::DGPSFix,
            Self::Estimated => Quality::Estimated,
            Self::FloatRtk => Quality::FloatRTK,
            Self::FixedRtk => Quality::RTK,
            Self::Manual => Quality::Manual,
            Self::Precise => Quality::PPSFix,
            Self::Simulator => Quality::Simulation,
            Self::DataNotValid => Quality::NoFix,
        }
    }
}

parsable_enum! {
    /// Quality of the GPS fix
    pub enum Quality {
        /// 0 - Fix not available
        '0' => NoFix,
        /// 1 - GPS fix
        '1' => GPSFix,
        /// 2 - Differential GPS fix
        '2' => DGPSFix,
        /// 3 - PPS fix
        '3' => PPSFix,
        /// 4 - Real Time Kinematic
        '4' => RTK,
        /// 5 - Float RTK
        '5' => FloatRTK,
        /// 6 - estimated (dead reckoning)
        '6' => Estimated,
        /// 7 - Manual input mode
        '7' => Manual,
        /// 8 - Simulation mode
        '8' => Simulation,
    }
}

parsable_enum! {
    /// Selection Mode
    pub enum SelectionMode {
        /// A - Automatic, 2D/3D
        'A' => Automatic,
        /// M - Manual, forced to operate in 2D or 3D
        'M' => Manual,
    }
}

parsable_enum! {
    /// Fix Mode
    pub enum FixMode {
        /// 1 - No fix
        '1' => NoFix,
        /// 2 - 2D Fix
        '2' => Fix2D,
        /// 3 - 3D Fix
        '3' => Fix3D,
    }
}

/// A satellite in view, as carried by GSV.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Satellite {
    /// Satellite PRN number
    pub prn: u8,
    /// Elevation in degrees, 90 maximum
    pub elevation: Option<u8>,
    /// Azimuth in degrees true, 000 to 359
    pub azimuth: Option<u16>,
    /// SNR in dB, 00-99, empty when not tracking
    pub snr: Option<u8>,
}

impl Satellite {
    /// Parses one `,prn,elevation,azimuth,snr` slot.
    ///
    /// A slot with all four tokens empty is padding and yields [`None`].
    pub(crate) fn slot(i: &str) -> IResult<&str, Option<Self>> {
        let start = i;
        let (i, _) = comma(i)?;
        let (i, prn) = field(u8).parse(i)?;
        let (i, _) = comma(i)?;
        let (i, elevation) = field(verify(u8, |v: &u8| *v <= 90)).parse(i)?;
        let (i, _) = comma(i)?;
        let (i, azimuth) = field(verify(u16, |v: &u16| *v < 360)).parse(i)?;
        let (i, _) = comma(i)?;
        let (i, snr) = field(verify(u8, |v: &u8| *v <= 99)).parse(i)?;

        match prn {
            Some(prn) => Ok((
                i,
                Some(Self {
                    prn,
                    elevation,
                    azimuth,
                    snr,
                }),
            )),
            None if elevation.is_none() && azimuth.is_none() && snr.is_none() => Ok((i, None)),
            None => Err(nom::Err::Error(Error::InvalidField(
                &start[1..start.len() - i.len()],
            ))),
        }
    }

    pub(crate) fn write<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        out.write_char(',')?;
        write_padded(out, Some(self.prn), 2)?;
        out.write_char(',')?;
        write_padded(out, self.elevation, 2)?;
        out.write_char(',')?;
        write_padded(out, self.azimuth, 3)?;
        out.write_char(',')?;
        write_padded(out, self.snr, 2)
    }
}
