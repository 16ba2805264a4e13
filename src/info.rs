//! # Navigation Snapshot
//!
//! [`NavInfo`] is the caller-owned aggregate that every parsed sentence is
//! merged into. Each field is an [`Option`]: `None` means the value has never
//! been supplied, which is distinct from a zero value. [`NavInfo::present`]
//! summarises the populated fields as a [`Present`] bit set.

use time::{Date, Time};

use crate::sentences::{FixMode, Quality, Satellite};

/// Most satellites tracked in view (16 GSV messages of 4).
pub const MAX_SATELLITES: usize = 64;

/// Most satellites reported in use by GSA.
pub const MAX_SATELLITES_IN_USE: usize = 12;

bitflags::bitflags! {
    /// Which snapshot fields hold a value.
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Present: u32 {
        /// At least one sentence kind has been merged
        const SMASK = 1 << 0;
        /// UTC date
        const UTCDATE = 1 << 1;
        /// UTC time of day
        const UTCTIME = 1 << 2;
        /// Signal quality
        const SIG = 1 << 3;
        /// Fix mode
        const FIX = 1 << 4;
        /// Position dilution of precision
        const PDOP = 1 << 5;
        /// Horizontal dilution of precision
        const HDOP = 1 << 6;
        /// Vertical dilution of precision
        const VDOP = 1 << 7;
        /// Latitude
        const LAT = 1 << 8;
        /// Longitude
        const LON = 1 << 9;
        /// Elevation
        const ELV = 1 << 10;
        /// Speed over ground
        const SPEED = 1 << 11;
        /// True track
        const TRACK = 1 << 12;
        /// Magnetic track
        const MTRACK = 1 << 13;
        /// Magnetic variation
        const MAGVAR = 1 << 14;
        /// Count of satellites in use
        const SATINUSECOUNT = 1 << 15;
        /// PRNs of satellites in use
        const SATINUSE = 1 << 16;
        /// Count of satellites in view
        const SATINVIEWCOUNT = 1 << 17;
        /// Detail of satellites in view
        const SATINVIEW = 1 << 18;
    }
}

bitflags::bitflags! {
    /// A set of sentence kinds.
    ///
    /// Records which kinds have been merged into a snapshot, and selects the
    /// kinds to emit when generating.
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SentenceMask: u8 {
        /// Global Positioning System Fix Data
        const GPGGA = 1 << 0;
        /// GPS DOP and active satellites
        const GPGSA = 1 << 1;
        /// Satellites in View
        const GPGSV = 1 << 2;
        /// Recommended Minimum Navigation Information
        const GPRMC = 1 << 3;
        /// Track made good and Ground speed
        const GPVTG = 1 << 4;
    }
}

/// The unified navigation snapshot.
///
/// Speeds are kept in kilometers per hour, elevation in meters and angles in
/// degrees. Latitude and longitude are signed decimal degrees.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct NavInfo {
    /// Sentence kinds merged so far
    pub smask: SentenceMask,
    /// UTC date
    pub utc_date: Option<Date>,
    /// UTC time of day
    pub utc_time: Option<Time>,
    /// Signal quality
    pub sig: Option<Quality>,
    /// Fix mode
    pub fix: Option<FixMode>,
    /// Position dilution of precision
    pub pdop: Option<f64>,
    /// Horizontal dilution of precision
    pub hdop: Option<f64>,
    /// Vertical dilution of precision
    pub vdop: Option<f64>,
    /// Latitude, north positive
    pub latitude: Option<f64>,
    /// Longitude, east positive
    pub longitude: Option<f64>,
    /// Antenna elevation above mean sea level in meters
    pub elevation: Option<f64>,
    /// Speed over ground in km/h
    pub speed: Option<f64>,
    /// True track in degrees
    pub track: Option<f64>,
    /// Magnetic track in degrees
    pub mtrack: Option<f64>,
    /// Magnetic variation in degrees, west negative
    pub magvar: Option<f64>,
    /// Count of satellites in use
    pub satellites_in_use_count: Option<u8>,
    /// PRNs of satellites in use
    pub satellites_in_use: Option<heapless::Vec<u8, MAX_SATELLITES_IN_USE>>,
    /// Count of satellites in view
    pub satellites_in_view_count: Option<u8>,
    /// Satellites in view, indexed by their position in the GSV group
    pub satellites_in_view: Option<heapless::Vec<Option<Satellite>, MAX_SATELLITES>>,
}

impl NavInfo {
    /// The set of populated fields.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nmea0183_nav::{NavInfo, Present};
    ///
    /// let info = NavInfo {
    ///     hdop: Some(0.0),
    ///     ..NavInfo::default()
    /// };
    /// assert_eq!(info.present(), Present::HDOP);
    /// ```
    pub fn present(&self) -> Present {
        let mut present = Present::empty();
        present.set(Present::SMASK, !self.smask.is_empty());
        present.set(Present::UTCDATE, self.utc_date.is_some());
        present.set(Present::UTCTIME, self.utc_time.is_some());
        present.set(Present::SIG, self.sig.is_some());
        present.set(Present::FIX, self.fix.is_some());
        present.set(Present::PDOP, self.pdop.is_some());
        present.set(Present::HDOP, self.hdop.is_some());
        present.set(Present::VDOP, self.vdop.is_some());
        present.set(Present::LAT, self.latitude.is_some());
        present.set(Present::LON, self.longitude.is_some());
        present.set(Present::ELV, self.elevation.is_some());
        present.set(Present::SPEED, self.speed.is_some());
        present.set(Present::TRACK, self.track.is_some());
        present.set(Present::MTRACK, self.mtrack.is_some());
        present.set(Present::MAGVAR, self.magvar.is_some());
        present.set(Present::SATINUSECOUNT, self.satellites_in_use_count.is_some());
        present.set(Present::SATINUSE, self.satellites_in_use.is_some());
        present.set(Present::SATINVIEWCOUNT, self.satellites_in_view_count.is_some());
        present.set(Present::SATINVIEW, self.satellites_in_view.is_some());
        present
    }

    /// Brings every present value into its valid range.
    ///
    /// A latitude past a pole is reflected back and moves the longitude by
    /// 180°. Longitude and magnetic variation wrap into [-180, 180), tracks
    /// into [0, 360). Speed and dilutions of precision become non-negative.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nmea0183_nav::NavInfo;
    ///
    /// let mut info = NavInfo {
    ///     latitude: Some(95.0),
    ///     longitude: Some(10.0),
    ///     track: Some(-90.0),
    ///     ..NavInfo::default()
    /// };
    /// info.sanitise();
    ///
    /// assert_eq!(info.latitude, Some(85.0));
    /// assert_eq!(info.longitude, Some(-170.0));
    /// assert_eq!(info.track, Some(270.0));
    /// ```
    pub fn sanitise(&mut self) {
        if let Some(latitude) = self.latitude {
            let mut latitude = wrap_180(latitude);
            if latitude.abs() > 90.0 {
                latitude = latitude.signum() * 180.0 - latitude;
                self.longitude = self.longitude.map(|longitude| longitude + 180.0);
            }
            self.latitude = Some(latitude);
        }

        self.longitude = self.longitude.map(wrap_180);
        self.magvar = self.magvar.map(wrap_180);
        self.track = self.track.map(wrap_360);
        self.mtrack = self.mtrack.map(wrap_360);
        self.speed = self.speed.map(f64::abs);
        self.pdop = self.pdop.map(f64::abs);
        self.hdop = self.hdop.map(f64::abs);
        self.vdop = self.vdop.map(f64::abs);
    }

    /// A sanitised copy of the snapshot.
    pub fn sanitised(&self) -> Self {
        let mut info = self.clone();
        info.sanitise();
        info
    }
}

fn wrap_180(degrees: f64) -> f64 {
    if (-180.0..180.0).contains(&degrees) {
        degrees
    } else {
        (degrees + 180.0).rem_euclid(360.0) - 180.0
    }
}

fn wrap_360(degrees: f64) -> f64 {
    if (0.0..360.0).contains(&degrees) {
        degrees
    } else {
        degrees.rem_euclid(360.0)
    }
}
