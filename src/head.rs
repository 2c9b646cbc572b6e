//! The `head` table mostly contains information that is carried over as is,
//! except for the `loca` format, which depends on the size of the glyph data,
//! and the checksum adjustment, which is recalculated in the very end.

use crate::stream::{Reader, Writeable, Writer};
use crate::Error::{RangeCheck, TableReadOverrun, UnsupportedVersion};
use crate::{Error, Result, Tag};

const OVERRUN: Error = TableReadOverrun(Tag::HEAD);

/// Byte offset of the `checksumAdjustment` field.
pub(crate) const CHECKSUM_ADJUSTMENT_OFFSET: usize = 8;

/// Short offsets (`Offset16`, divided by two) in the `loca` table.
pub(crate) const LOCA_SHORT: i16 = 0;
/// Long offsets (`Offset32`) in the `loca` table.
pub(crate) const LOCA_LONG: i16 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Head {
    pub major_version: u16,
    pub minor_version: u16,
    pub font_revision: u32,
    pub checksum_adjustment: u32,
    pub magic_number: u32,
    pub flags: u16,
    pub units_per_em: u16,
    pub created: i64,
    pub modified: i64,
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
    pub mac_style: u16,
    pub lowest_rec_ppem: u16,
    pub font_direction_hint: i16,
    pub index_to_loc_format: i16,
    pub glyph_data_format: i16,
}

impl Head {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut r = Reader::new(data);
        let major_version = r.read::<u16>().ok_or(OVERRUN)?;
        if major_version != 1 {
            return Err(UnsupportedVersion { tag: Tag::HEAD, version: u32::from(major_version) });
        }

        let head = Head {
            major_version,
            minor_version: r.read::<u16>().ok_or(OVERRUN)?,
            font_revision: r.read::<u32>().ok_or(OVERRUN)?,
            checksum_adjustment: r.read::<u32>().ok_or(OVERRUN)?,
            magic_number: r.read::<u32>().ok_or(OVERRUN)?,
            flags: r.read::<u16>().ok_or(OVERRUN)?,
            units_per_em: r.read::<u16>().ok_or(OVERRUN)?,
            created: r.read::<i64>().ok_or(OVERRUN)?,
            modified: r.read::<i64>().ok_or(OVERRUN)?,
            x_min: r.read::<i16>().ok_or(OVERRUN)?,
            y_min: r.read::<i16>().ok_or(OVERRUN)?,
            x_max: r.read::<i16>().ok_or(OVERRUN)?,
            y_max: r.read::<i16>().ok_or(OVERRUN)?,
            mac_style: r.read::<u16>().ok_or(OVERRUN)?,
            lowest_rec_ppem: r.read::<u16>().ok_or(OVERRUN)?,
            font_direction_hint: r.read::<i16>().ok_or(OVERRUN)?,
            index_to_loc_format: r.read::<i16>().ok_or(OVERRUN)?,
            glyph_data_format: r.read::<i16>().ok_or(OVERRUN)?,
        };

        if head.magic_number != 0x5F0F3CF5 {
            log::warn!("head table has a bad magic number {:#x}", head.magic_number);
        }

        if !matches!(head.index_to_loc_format, LOCA_SHORT | LOCA_LONG) {
            return Err(RangeCheck("head.indexToLocFormat must be 0 or 1"));
        }

        Ok(head)
    }

    pub fn short_loca(&self) -> bool {
        self.index_to_loc_format == LOCA_SHORT
    }
}

impl Writeable for Head {
    fn write(&self, w: &mut Writer) {
        w.write::<u16>(self.major_version);
        w.write::<u16>(self.minor_version);
        w.write::<u32>(self.font_revision);
        w.write::<u32>(self.checksum_adjustment);
        w.write::<u32>(self.magic_number);
        w.write::<u16>(self.flags);
        w.write::<u16>(self.units_per_em);
        w.write::<i64>(self.created);
        w.write::<i64>(self.modified);
        w.write::<i16>(self.x_min);
        w.write::<i16>(self.y_min);
        w.write::<i16>(self.x_max);
        w.write::<i16>(self.y_max);
        w.write::<u16>(self.mac_style);
        w.write::<u16>(self.lowest_rec_ppem);
        w.write::<i16>(self.font_direction_hint);
        w.write::<i16>(self.index_to_loc_format);
        w.write::<i16>(self.glyph_data_format);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Head {
        Head {
            major_version: 1,
            minor_version: 0,
            font_revision: 0x00010000,
            checksum_adjustment: 0xDEADBEEF,
            magic_number: 0x5F0F3CF5,
            flags: 3,
            units_per_em: 1000,
            created: 0,
            modified: 1,
            x_min: -10,
            y_min: -200,
            x_max: 900,
            y_max: 800,
            mac_style: 0,
            lowest_rec_ppem: 8,
            font_direction_hint: 2,
            index_to_loc_format: LOCA_LONG,
            glyph_data_format: 0,
        }
    }

    #[test]
    fn write_then_parse() {
        let mut w = Writer::new();
        w.write(sample());
        let data = w.finish();
        assert_eq!(data.len(), 54);
        assert_eq!(&data[CHECKSUM_ADJUSTMENT_OFFSET..12], &[0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(Head::parse(&data).unwrap(), sample());
    }

    #[test]
    fn rejects_bad_loca_format_and_truncation() {
        let mut head = sample();
        head.index_to_loc_format = 2;
        let mut w = Writer::new();
        w.write(head);
        let data = w.finish();
        assert!(matches!(Head::parse(&data), Err(RangeCheck(_))));
        assert!(matches!(Head::parse(&data[..40]), Err(TableReadOverrun(Tag::HEAD))));
    }
}
