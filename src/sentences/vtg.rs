use std::fmt;

use nom::Parser;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    IResult,
    info::{NavInfo, Present},
    parse::{with_unit, write_with_unit},
    parsing::{comma, field},
    sentences::{Codec, FaaMode, KNOTS_TO_KPH, Parsable, SentenceKind},
};

/// VTG - Track made good and Ground speed
///
/// <https://gpsd.gitlab.io/gpsd/NMEA.html#_vtg_track_made_good_and_ground_speed>
///
/// ```text
///          1  2  3  4  5  6  7  8 9
///          |  |  |  |  |  |  |  | |
///  $--VTG,x.x,T,x.x,M,x.x,N,x.x,K,m*hh<CR><LF>
/// ```
///
/// Field 9, the FAA mode indicator, was added in NMEA 2.3 and may be missing.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct VTG {
    /// Course over ground in degrees true
    pub track: Option<f64>,
    /// Course over ground in degrees magnetic
    pub magnetic_track: Option<f64>,
    /// Speed over ground in knots
    pub speed_knots: Option<f64>,
    /// Speed over ground in kilometers per hour
    pub speed_kph: Option<f64>,
    /// FAA Mode Indicator
    pub mode: Option<FaaMode>,
}

impl Parsable for VTG {
    fn parser(i: &str) -> IResult<&str, Self> {
        let (i, track) = with_unit('T')(i)?;
        let (i, _) = comma(i)?;
        let (i, magnetic_track) = with_unit('M')(i)?;
        let (i, _) = comma(i)?;
        let (i, speed_knots) = with_unit('N')(i)?;
        let (i, _) = comma(i)?;
        let (i, speed_kph) = with_unit('K')(i)?;
        let (i, mode) = match comma(i) {
            Ok((i, _)) => field(FaaMode::parser).parse(i)?,
            Err(_) => (i, None),
        };

        Ok((
            i,
            Self {
                track,
                magnetic_track,
                speed_knots,
                speed_kph,
                mode,
            },
        ))
    }
}

impl VTG {
    /// Projects the VTG fields out of a snapshot, with the speed in both units.
    pub fn from_info(info: &NavInfo) -> Self {
        Self {
            track: info.track,
            magnetic_track: info.mtrack,
            speed_knots: info.speed.map(|kph| kph / KNOTS_TO_KPH),
            speed_kph: info.speed,
            mode: None,
        }
    }

    /// Ground speed in kilometers per hour, from the `K` field or else the
    /// `N` field.
    pub fn speed(&self) -> Option<f64> {
        self.speed_kph.or(self.speed_knots.map(|knots| knots * KNOTS_TO_KPH))
    }
}

impl Codec for VTG {
    const KIND: SentenceKind = SentenceKind::GPVTG;

    fn write_fields<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        out.write_char(',')?;
        write_with_unit(out, self.track, 'T')?;
        out.write_char(',')?;
        write_with_unit(out, self.magnetic_track, 'M')?;
        out.write_char(',')?;
        write_with_unit(out, self.speed_knots, 'N')?;
        out.write_char(',')?;
        write_with_unit(out, self.speed_kph, 'K')?;
        if let Some(mode) = self.mode {
            write!(out, ",{}", mode.as_char())?;
        }
        Ok(())
    }

    fn present(&self) -> Present {
        let mut present = Present::SMASK;
        present.set(Present::TRACK, self.track.is_some());
        present.set(Present::MTRACK, self.magnetic_track.is_some());
        present.set(Present::SPEED, self.speed().is_some());
        present
    }

    fn merge_into(&self, info: &mut NavInfo) {
        info.smask |= Self::KIND.mask();

        if let Some(track) = self.track {
            info.track = Some(track);
        }
        if let Some(magnetic_track) = self.magnetic_track {
            info.mtrack = Some(magnetic_track);
        }
        if let Some(speed) = self.speed() {
            info.speed = Some(speed);
        }
    }
}
