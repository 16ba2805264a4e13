use std::fmt;

use nom::{
    Parser,
    character::complete::{u8, u16},
    combinator::verify,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use time::Time;

use crate::{
    IResult,
    info::{NavInfo, Present},
    parse::{
        decimal, latitude, longitude, unit_letter, utc_time, write_char, write_fixed,
        write_latitude, write_longitude, write_padded, write_time,
    },
    parsing::{comma, field},
    sentences::{Codec, Parsable, Quality, SentenceKind},
};

/// GGA - Global Positioning System Fix Data
///
/// <https://gpsd.gitlab.io/gpsd/NMEA.html#_gga_global_positioning_system_fix_data>
///
/// ```text
///                                                      11
///         1         2       3 4        5 6 7  8   9  10 |  12 13  14
///         |         |       | |        | | |  |   |   | |   | |   |
///  $--GGA,hhmmss.ss,ddmm.mm,a,dddmm.mm,a,x,xx,x.x,x.x,M,x.x,M,x.x,xxxx*hh<CR><LF>
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GGA {
    /// Fix time in UTC
    pub time: Option<Time>,
    /// Latitude in signed decimal degrees, north positive
    pub latitude: Option<f64>,
    /// Longitude in signed decimal degrees, east positive
    pub longitude: Option<f64>,
    /// GPS Quality Indicator
    pub quality: Option<Quality>,
    /// Number of satellites
    pub satellites: Option<u8>,
    /// Horizontal Dilution of Precision
    pub hdop: Option<f64>,
    /// Antenna altitude above/below mean sea level (geoid)
    pub elevation: Option<f64>,
    /// Units of antenna altitude, `M` for meters
    pub elevation_unit: Option<char>,
    /// Geoidal separation, the difference between the WGS-84 earth ellipsoid
    /// and mean sea level (geoid)
    pub geoid_height: Option<f64>,
    /// Units of geoidal separation, `M` for meters
    pub geoid_unit: Option<char>,
    /// Age of Differential GPS data in seconds
    pub dgps_age: Option<f64>,
    /// Differential reference station ID, 0000-1023
    pub dgps_station: Option<u16>,
}

impl Parsable for GGA {
    fn parser(i: &str) -> IResult<&str, Self> {
        let (i, time) = field(utc_time).parse(i)?;
        let (i, _) = comma(i)?;
        let (i, latitude) = latitude(i)?;
        let (i, _) = comma(i)?;
        let (i, longitude) = longitude(i)?;
        let (i, _) = comma(i)?;
        let (i, quality) = field(Quality::parser).parse(i)?;
        let (i, _) = comma(i)?;
        let (i, satellites) = field(u8).parse(i)?;
        let (i, _) = comma(i)?;
        let (i, hdop) = field(decimal).parse(i)?;
        let (i, _) = comma(i)?;
        let (i, elevation) = field(decimal).parse(i)?;
        let (i, _) = comma(i)?;
        let (i, elevation_unit) = field(unit_letter).parse(i)?;
        let (i, _) = comma(i)?;
        let (i, geoid_height) = field(decimal).parse(i)?;
        let (i, _) = comma(i)?;
        let (i, geoid_unit) = field(unit_letter).parse(i)?;
        let (i, _) = comma(i)?;
        let (i, dgps_age) = field(decimal).parse(i)?;
        let (i, _) = comma(i)?;
        let (i, dgps_station) = field(verify(u16, |id: &u16| *id <= 1023)).parse(i)?;

        Ok((
            i,
            Self {
                time,
                latitude,
                longitude,
                quality,
                satellites,
                hdop,
                elevation,
                elevation_unit,
                geoid_height,
                geoid_unit,
                dgps_age,
                dgps_station,
            },
        ))
    }
}

impl GGA {
    /// Projects the GGA fields out of a snapshot.
    ///
    /// Geoid height and DGPS data are not tracked by the snapshot and stay
    /// empty.
    pub fn from_info(info: &NavInfo) -> Self {
        Self {
            time: info.utc_time,
            latitude: info.latitude,
            longitude: info.longitude,
            quality: info.sig,
            satellites: info.satellites_in_view_count,
            hdop: info.hdop,
            elevation: info.elevation,
            elevation_unit: info.elevation.map(|_| 'M'),
            ..Self::default()
        }
    }

    fn elevation_meters(&self) -> Option<f64> {
        match self.elevation_unit {
            Some('M') => self.elevation,
            _ => None,
        }
    }
}

impl Codec for GGA {
    const KIND: SentenceKind = SentenceKind::GPGGA;

    fn write_fields<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        out.write_char(',')?;
        write_time(out, self.time)?;
        out.write_char(',')?;
        write_latitude(out, self.latitude)?;
        out.write_char(',')?;
        write_longitude(out, self.longitude)?;
        out.write_char(',')?;
        write_char(out, self.quality.map(Quality::as_char))?;
        out.write_char(',')?;
        write_padded(out, self.satellites, 2)?;
        out.write_char(',')?;
        write_fixed(out, self.hdop, 1)?;
        out.write_char(',')?;
        write_fixed(out, self.elevation, 1)?;
        out.write_char(',')?;
        write_char(out, self.elevation_unit)?;
        out.write_char(',')?;
        write_fixed(out, self.geoid_height, 1)?;
        out.write_char(',')?;
        write_char(out, self.geoid_unit)?;
        out.write_char(',')?;
        write_fixed(out, self.dgps_age, 1)?;
        out.write_char(',')?;
        write_padded(out, self.dgps_station, 4)
    }

    fn present(&self) -> Present {
        let mut present = Present::SMASK;
        present.set(Present::UTCTIME, self.time.is_some());
        present.set(Present::LAT, self.latitude.is_some());
        present.set(Present::LON, self.longitude.is_some());
        present.set(Present::SIG, self.quality.is_some());
        present.set(Present::SATINVIEWCOUNT, self.satellites.is_some());
        present.set(Present::HDOP, self.hdop.is_some());
        present.set(Present::ELV, self.elevation_meters().is_some());
        present
    }

    fn merge_into(&self, info: &mut NavInfo) {
        info.smask |= Self::KIND.mask();

        if let Some(time) = self.time {
            info.utc_time = Some(time);
        }
        if let Some(latitude) = self.latitude {
            info.latitude = Some(latitude);
        }
        if let Some(longitude) = self.longitude {
            info.longitude = Some(longitude);
        }
        if let Some(quality) = self.quality {
            info.sig = Some(quality);
        }
        if let Some(satellites) = self.satellites {
            info.satellites_in_view_count = Some(satellites);
        }
        if let Some(hdop) = self.hdop {
            info.hdop = Some(hdop);
        }
        if let Some(elevation) = self.elevation_meters() {
            info.elevation = Some(elevation);
        }
    }
}
