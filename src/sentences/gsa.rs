use std::fmt;

use nom::{Parser, character::complete::u8};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    IResult,
    info::{MAX_SATELLITES_IN_USE, NavInfo, Present},
    parse::{decimal, write_char, write_fixed, write_padded},
    parsing::{comma, field},
    sentences::{Codec, FixMode, Parsable, SelectionMode, SentenceKind},
};

/// GSA - GPS DOP and active satellites
///
/// <https://gpsd.gitlab.io/gpsd/NMEA.html#_gsa_gps_dop_and_active_satellites>
///
/// ```text
///         1 2 3                        14 15  16  17
///         | | |                         |  |   |   |
///  $--GSA,a,a,x,x,x,x,x,x,x,x,x,x,x,x,x,x,x.x,x.x,x.x*hh<CR><LF>
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GSA {
    /// Selection mode
    pub selection_mode: Option<SelectionMode>,
    /// Fix mode
    pub fix_mode: Option<FixMode>,
    /// PRNs of the satellites used in the fix, one per slot
    pub satellites: [Option<u8>; MAX_SATELLITES_IN_USE],
    /// Position Dilution of Precision
    pub pdop: Option<f64>,
    /// Horizontal Dilution of Precision
    pub hdop: Option<f64>,
    /// Vertical Dilution of Precision
    pub vdop: Option<f64>,
}

impl Parsable for GSA {
    fn parser(i: &str) -> IResult<&str, Self> {
        let (i, selection_mode) = field(SelectionMode::parser).parse(i)?;
        let (i, _) = comma(i)?;
        let (mut i, fix_mode) = field(FixMode::parser).parse(i)?;

        let mut satellites = [None; MAX_SATELLITES_IN_USE];
        for slot in satellites.iter_mut() {
            let (rest, _) = comma(i)?;
            let (rest, prn) = field(u8).parse(rest)?;
            *slot = prn;
            i = rest;
        }

        let (i, _) = comma(i)?;
        let (i, pdop) = field(decimal).parse(i)?;
        let (i, _) = comma(i)?;
        let (i, hdop) = field(decimal).parse(i)?;
        let (i, _) = comma(i)?;
        let (i, vdop) = field(decimal).parse(i)?;

        Ok((
            i,
            Self {
                selection_mode,
                fix_mode,
                satellites,
                pdop,
                hdop,
                vdop,
            },
        ))
    }
}

impl GSA {
    /// Projects the GSA fields out of a snapshot.
    ///
    /// The selection mode is not tracked by the snapshot; it is written as
    /// automatic whenever a fix mode is known.
    pub fn from_info(info: &NavInfo) -> Self {
        let mut satellites = [None; MAX_SATELLITES_IN_USE];
        if let Some(in_use) = &info.satellites_in_use {
            for (slot, prn) in satellites.iter_mut().zip(in_use) {
                *slot = Some(*prn);
            }
        }

        Self {
            selection_mode: info.fix.map(|_| SelectionMode::Automatic),
            fix_mode: info.fix,
            satellites,
            pdop: info.pdop,
            hdop: info.hdop,
            vdop: info.vdop,
        }
    }

    /// The PRNs in use, in slot order.
    pub fn prns(&self) -> impl Iterator<Item = u8> + '_ {
        self.satellites.iter().flatten().copied()
    }
}

impl Codec for GSA {
    const KIND: SentenceKind = SentenceKind::GPGSA;

    fn write_fields<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        out.write_char(',')?;
        write_char(out, self.selection_mode.map(SelectionMode::as_char))?;
        out.write_char(',')?;
        write_char(out, self.fix_mode.map(FixMode::as_char))?;
        for prn in self.satellites {
            out.write_char(',')?;
            write_padded(out, prn, 2)?;
        }
        out.write_char(',')?;
        write_fixed(out, self.pdop, 1)?;
        out.write_char(',')?;
        write_fixed(out, self.hdop, 1)?;
        out.write_char(',')?;
        write_fixed(out, self.vdop, 1)
    }

    fn present(&self) -> Present {
        let in_use = self.prns().next().is_some();

        let mut present = Present::SMASK;
        present.set(Present::FIX, self.fix_mode.is_some());
        present.set(Present::SATINUSE | Present::SATINUSECOUNT, in_use);
        present.set(Present::PDOP, self.pdop.is_some());
        present.set(Present::HDOP, self.hdop.is_some());
        present.set(Present::VDOP, self.vdop.is_some());
        present
    }

    fn merge_into(&self, info: &mut NavInfo) {
        info.smask |= Self::KIND.mask();

        if let Some(fix_mode) = self.fix_mode {
            info.fix = Some(fix_mode);
        }

        let in_use: heapless::Vec<u8, MAX_SATELLITES_IN_USE> = self.prns().collect();
        if !in_use.is_empty() {
            info.satellites_in_use_count = Some(in_use.len() as u8);
            info.satellites_in_use = Some(in_use);
        }

        if let Some(pdop) = self.pdop {
            info.pdop = Some(pdop);
        }
        if let Some(hdop) = self.hdop {
            info.hdop = Some(hdop);
        }
        if let Some(vdop) = self.vdop {
            info.vdop = Some(vdop);
        }
    }
}
