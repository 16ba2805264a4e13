use std::{fmt, iter};

use nom::{Parser, character::complete::u8, combinator::verify};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    Error, IResult,
    info::{MAX_SATELLITES, NavInfo, Present},
    parse::write_padded,
    parsing::{comma, field, required},
    sentences::{Codec, Parsable, Satellite, SentenceKind},
};

/// Satellites carried by one GSV message.
pub const SATELLITES_PER_MESSAGE: usize = 4;

/// Largest number of messages in a GSV group.
pub const MAX_MESSAGES: u8 = (MAX_SATELLITES / SATELLITES_PER_MESSAGE) as u8;

/// GSV - Satellites in View
///
/// <https://gpsd.gitlab.io/gpsd/NMEA.html#_gsv_satellites_in_view>
///
/// ```text
///         1 2 3 4 5 6 7     n
///         | | | | | | |     |
///  $--GSV,x,x,x,x,x,x,x,...,x*hh<CR><LF>
/// ```
///
/// Message `n` of a group describes satellites `4 * (n - 1)` to `4 * n - 1`.
/// Slots with all four fields empty are padding and are not kept.
///
/// Merging message 1 starts a new group, so satellites left over from an
/// earlier group are forgotten. Slots past `4 * total_messages` are cleared by
/// every message of the group.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq)]
pub struct GSV {
    /// Total number of GSV sentences to be transmitted in this group
    pub total_messages: u8,
    /// Sentence number of this GSV message within current group
    pub message_number: u8,
    /// Total number of satellites in view
    pub satellites_in_view: Option<u8>,
    /// Satellite information
    pub satellites: heapless::Vec<Satellite, SATELLITES_PER_MESSAGE>,
}

impl Parsable for GSV {
    fn parser(i: &str) -> IResult<&str, Self> {
        let (i, total_messages) = required(verify(u8, |n: &u8| (1..=MAX_MESSAGES).contains(n))).parse(i)?;
        let (i, _) = comma(i)?;
        let number_token = i;
        let (i, message_number) = required(u8).parse(i)?;
        if message_number == 0 || message_number > total_messages {
            return Err(nom::Err::Error(Error::InvalidField(
                &number_token[..number_token.len() - i.len()],
            )));
        }
        let (i, _) = comma(i)?;
        let (mut i, satellites_in_view) =
            field(verify(u8, |n: &u8| usize::from(*n) <= MAX_SATELLITES)).parse(i)?;

        let mut satellites = heapless::Vec::new();
        for _ in 0..SATELLITES_PER_MESSAGE {
            if i.is_empty() {
                break;
            }

            let (rest, satellite) = Satellite::slot(i)?;
            satellites.extend(satellite);
            i = rest;
        }

        Ok((
            i,
            Self {
                total_messages,
                message_number,
                satellites_in_view,
                satellites,
            },
        ))
    }
}

impl GSV {
    /// Number of GSV messages needed to describe the satellites of `info`.
    ///
    /// Always at least one, so the satellite count is reported even when no
    /// satellite detail is known.
    pub fn message_count(info: &NavInfo) -> u8 {
        let counted = Self::count_from_info(info).map_or(0, usize::from);
        let described = info
            .satellites_in_view
            .as_ref()
            .and_then(|slots| slots.iter().rposition(Option::is_some))
            .map_or(0, |last| last + 1);

        counted
            .max(described)
            .div_ceil(SATELLITES_PER_MESSAGE)
            .clamp(1, usize::from(MAX_MESSAGES)) as u8
    }

    /// Projects message `message_number` of the GSV group out of a snapshot.
    pub fn from_info(info: &NavInfo, message_number: u8) -> Self {
        let total_messages = Self::message_count(info);
        let first = usize::from(message_number.saturating_sub(1)) * SATELLITES_PER_MESSAGE;

        let satellites = info
            .satellites_in_view
            .iter()
            .flat_map(|slots| slots.iter().skip(first).take(SATELLITES_PER_MESSAGE))
            .flatten()
            .copied()
            .collect();

        Self {
            total_messages,
            message_number,
            satellites_in_view: Self::count_from_info(info),
            satellites,
        }
    }

    /// Satellites in view as a GSV count field can carry it.
    fn count_from_info(info: &NavInfo) -> Option<u8> {
        info.satellites_in_view_count
            .map(|count| count.min(MAX_SATELLITES as u8))
    }

    /// Every message of the GSV group for `info`.
    pub fn group_from_info(info: &NavInfo) -> impl Iterator<Item = Self> + '_ {
        (1..=Self::message_count(info)).map(|number| Self::from_info(info, number))
    }
}

impl Codec for GSV {
    const KIND: SentenceKind = SentenceKind::GPGSV;

    fn write_fields<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        write!(out, ",{},{},", self.total_messages, self.message_number)?;
        write_padded(out, self.satellites_in_view, 2)?;
        for satellite in &self.satellites {
            satellite.write(out)?;
        }
        Ok(())
    }

    fn present(&self) -> Present {
        let mut present = Present::SMASK;
        present.set(Present::SATINVIEWCOUNT, self.satellites_in_view.is_some());
        present.set(Present::SATINVIEW, !self.satellites.is_empty());
        present
    }

    fn merge_into(&self, info: &mut NavInfo) {
        info.smask |= Self::KIND.mask();

        if let Some(count) = self.satellites_in_view {
            info.satellites_in_view_count = Some(count);
        }

        let first = usize::from(self.message_number.saturating_sub(1)) * SATELLITES_PER_MESSAGE;
        if !(1..=self.total_messages).contains(&self.message_number)
            || first + SATELLITES_PER_MESSAGE > MAX_SATELLITES
        {
            return;
        }

        if self.message_number == 1 {
            info.satellites_in_view = None;
        }

        if let Some(slots) = info.satellites_in_view.as_mut() {
            let group_end = usize::from(self.total_messages) * SATELLITES_PER_MESSAGE;
            slots.iter_mut().skip(group_end).for_each(|slot| *slot = None);
        }

        if self.satellites.is_empty() {
            return;
        }

        let slots = info.satellites_in_view.get_or_insert_with(Default::default);
        slots.extend(iter::repeat(None).take(MAX_SATELLITES - slots.len()));

        for (offset, slot) in slots[first..first + SATELLITES_PER_MESSAGE].iter_mut().enumerate() {
            *slot = self.satellites.get(offset).copied();
        }
    }
}
