//! # Sentence Generation
//!
//! Renders a [`NavInfo`] snapshot as a block of NMEA sentences.

use crate::{
    info::{NavInfo, SentenceMask},
    sentences::{Codec, GGA, GSA, GSV, RMC, SentenceKind, VTG},
};

/// Generates the sentences selected by `mask` from a sanitised copy of `info`.
///
/// Sentences are emitted in GGA, GSA, GSV, RMC, VTG order; GSV expands to the
/// whole group. Each one ends with `\r\n`.
///
/// # Examples
///
/// ```rust
/// use nmea0183_nav::{NavInfo, NmeaParser, SentenceMask, generate};
///
/// let info = NavInfo {
///     latitude: Some(48.1173),
///     longitude: Some(11.516_666),
///     speed: Some(10.2),
///     ..NavInfo::default()
/// };
///
/// let text = generate(&info, SentenceMask::GPGGA | SentenceMask::GPVTG);
/// assert!(text.starts_with("$GPGGA,,4807.0380,N,01131.0000,E,"));
/// assert!(text.contains("\r\n$GPVTG,"));
///
/// let mut parsed = NavInfo::default();
/// let outcome = NmeaParser::new().parse(text.as_bytes(), &mut parsed);
/// assert_eq!(outcome.merged, 2);
/// ```
pub fn generate(info: &NavInfo, mask: SentenceMask) -> String {
    let info = info.sanitised();
    let mut out = String::new();

    for kind in SentenceKind::ALL {
        if !mask.contains(kind.mask()) {
            continue;
        }

        match kind {
            SentenceKind::GPGGA => out.push_str(&GGA::from_info(&info).generate()),
            SentenceKind::GPGSA => out.push_str(&GSA::from_info(&info).generate()),
            SentenceKind::GPGSV => {
                for gsv in GSV::group_from_info(&info) {
                    out.push_str(&gsv.generate());
                }
            }
            SentenceKind::GPRMC => out.push_str(&RMC::from_info(&info).generate()),
            SentenceKind::GPVTG => out.push_str(&VTG::from_info(&info).generate()),
        }
    }

    out
}
