use std::fmt;

use nom::Parser;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use time::{Date, Time};

use crate::{
    IResult,
    info::{NavInfo, Present},
    parse::{
        decimal, latitude, longitude, magnetic_variation, utc_date, utc_time, write_char,
        write_date, write_fixed, write_latitude, write_longitude, write_magnetic_variation,
        write_time,
    },
    parsing::{comma, field},
    sentences::{Codec, FaaMode, FixMode, Parsable, Quality, SentenceKind, Status},
};

/// Knots to kilometers per hour.
pub const KNOTS_TO_KPH: f64 = 1.852;

/// RMC - Recommended Minimum Navigation Information
///
/// <https://gpsd.gitlab.io/gpsd/NMEA.html#_rmc_recommended_minimum_navigation_information>
///
/// ```text
///                                                            12
///         1         2 3       4 5        6  7   8   9    10 11|
///         |         | |       | |        |  |   |   |    |  | |
///  $--RMC,hhmmss.ss,A,ddmm.mm,a,dddmm.mm,a,x.x,x.x,xxxx,x.x,a,m*hh<CR><LF>
/// ```
///
/// Field 12, the FAA mode indicator, was added in NMEA 2.3 and may be missing.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RMC {
    /// Fix time in UTC
    pub time: Option<Time>,
    /// Status Mode Indicator
    pub status: Option<Status>,
    /// Latitude in signed decimal degrees, north positive
    pub latitude: Option<f64>,
    /// Longitude in signed decimal degrees, east positive
    pub longitude: Option<f64>,
    /// Speed over ground in knots
    pub speed_knots: Option<f64>,
    /// Track made good in degrees true
    pub track: Option<f64>,
    /// Fix date in UTC
    pub date: Option<Date>,
    /// Magnetic variation in degrees, west negative
    pub magnetic_variation: Option<f64>,
    /// FAA Mode Indicator
    pub mode: Option<FaaMode>,
}

impl Parsable for RMC {
    fn parser(i: &str) -> IResult<&str, Self> {
        let (i, time) = field(utc_time).parse(i)?;
        let (i, _) = comma(i)?;
        let (i, status) = field(Status::parser).parse(i)?;
        let (i, _) = comma(i)?;
        let (i, latitude) = latitude(i)?;
        let (i, _) = comma(i)?;
        let (i, longitude) = longitude(i)?;
        let (i, _) = comma(i)?;
        let (i, speed_knots) = field(decimal).parse(i)?;
        let (i, _) = comma(i)?;
        let (i, track) = field(decimal).parse(i)?;
        let (i, _) = comma(i)?;
        let (i, date) = field(utc_date).parse(i)?;
        let (i, _) = comma(i)?;
        let (i, magnetic_variation) = magnetic_variation(i)?;
        let (i, mode) = match comma(i) {
            Ok((i, _)) => field(FaaMode::parser).parse(i)?,
            Err(_) => (i, None),
        };

        Ok((
            i,
            Self {
                time,
                status,
                latitude,
                longitude,
                speed_knots,
                track,
                date,
                magnetic_variation,
                mode,
            },
        ))
    }
}

impl RMC {
    /// Projects the RMC fields out of a snapshot.
    ///
    /// The status is active whenever the snapshot holds a fix better than
    /// "no fix".
    pub fn from_info(info: &NavInfo) -> Self {
        let active = matches!(info.sig, Some(sig) if sig != Quality::NoFix)
            || matches!(info.fix, Some(FixMode::Fix2D | FixMode::Fix3D));
        let known = info.sig.is_some() || info.fix.is_some();

        Self {
            time: info.utc_time,
            status: known.then_some(if active { Status::Valid } else { Status::Invalid }),
            latitude: info.latitude,
            longitude: info.longitude,
            speed_knots: info.speed.map(|kph| kph / KNOTS_TO_KPH),
            track: info.track,
            date: info.utc_date,
            magnetic_variation: info.magvar,
            mode: None,
        }
    }

    /// Status `A` with any FAA mode other than `N`.
    fn is_active(&self) -> bool {
        self.status == Some(Status::Valid) && self.mode != Some(FaaMode::DataNotValid)
    }
}

impl Codec for RMC {
    const KIND: SentenceKind = SentenceKind::GPRMC;

    fn write_fields<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        out.write_char(',')?;
        write_time(out, self.time)?;
        out.write_char(',')?;
        write_char(out, self.status.map(Status::as_char))?;
        out.write_char(',')?;
        write_latitude(out, self.latitude)?;
        out.write_char(',')?;
        write_longitude(out, self.longitude)?;
        out.write_char(',')?;
        write_fixed(out, self.speed_knots, 1)?;
        out.write_char(',')?;
        write_fixed(out, self.track, 1)?;
        out.write_char(',')?;
        write_date(out, self.date)?;
        out.write_char(',')?;
        write_magnetic_variation(out, self.magnetic_variation)?;
        if let Some(mode) = self.mode {
            write!(out, ",{}", mode.as_char())?;
        }
        Ok(())
    }

    fn present(&self) -> Present {
        let active = self.is_active();

        let mut present = Present::SMASK;
        present.set(Present::UTCTIME, self.time.is_some());
        present.set(Present::UTCDATE, self.date.is_some());
        present.set(Present::SIG | Present::FIX, self.status.is_some());
        present.set(Present::LAT, active && self.latitude.is_some());
        present.set(Present::LON, active && self.longitude.is_some());
        present.set(Present::SPEED, active && self.speed_knots.is_some());
        present.set(Present::TRACK, active && self.track.is_some());
        present.set(Present::MAGVAR, active && self.magnetic_variation.is_some());
        present
    }

    fn merge_into(&self, info: &mut NavInfo) {
        info.smask |= Self::KIND.mask();

        if let Some(time) = self.time {
            info.utc_time = Some(time);
        }
        if let Some(date) = self.date {
            info.utc_date = Some(date);
        }

        match self.status {
            Some(_) if !self.is_active() => {
                info.sig = Some(Quality::NoFix);
                info.fix = Some(FixMode::NoFix);
                return;
            }
            Some(_) => {
                if let Some(mode) = self.mode {
                    info.sig = Some(mode.quality());
                } else if matches!(info.sig, None | Some(Quality::NoFix)) {
                    info.sig = Some(Quality::GPSFix);
                }
                if matches!(info.fix, None | Some(FixMode::NoFix)) {
                    info.fix = Some(FixMode::Fix2D);
                }
            }
            None => return,
        }

        if let Some(latitude) = self.latitude {
            info.latitude = Some(latitude);
        }
        if let Some(longitude) = self.longitude {
            info.longitude = Some(longitude);
        }
        if let Some(knots) = self.speed_knots {
            info.speed = Some(knots * KNOTS_TO_KPH);
        }
        if let Some(track) = self.track {
            info.track = Some(track);
        }
        if let Some(magnetic_variation) = self.magnetic_variation {
            info.magvar = Some(magnetic_variation);
        }
    }
}
