use crate::stream::{Reader, Writeable, Writer};
use crate::Error::{RangeCheck, TableReadOverrun};
use crate::{Error, Result, Tag};

const OVERRUN: Error = TableReadOverrun(Tag::HHEA);

/// The horizontal header. Everything except `numberOfHMetrics` is carried
/// over unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Hhea {
    pub version: u32,
    pub ascender: i16,
    pub descender: i16,
    pub line_gap: i16,
    pub advance_width_max: u16,
    pub min_left_side_bearing: i16,
    pub min_right_side_bearing: i16,
    pub x_max_extent: i16,
    pub caret_slope_rise: i16,
    pub caret_slope_run: i16,
    pub caret_offset: i16,
    pub reserved: [u8; 8],
    pub metric_data_format: i16,
    pub number_of_h_metrics: u16,
}

impl Hhea {
    pub fn parse(data: &[u8], num_glyphs: u16) -> Result<Self> {
        let mut r = Reader::new(data);
        let hhea = Self {
            version: r.read::<u32>().ok_or(OVERRUN)?,
            ascender: r.read::<i16>().ok_or(OVERRUN)?,
            descender: r.read::<i16>().ok_or(OVERRUN)?,
            line_gap: r.read::<i16>().ok_or(OVERRUN)?,
            advance_width_max: r.read::<u16>().ok_or(OVERRUN)?,
            min_left_side_bearing: r.read::<i16>().ok_or(OVERRUN)?,
            min_right_side_bearing: r.read::<i16>().ok_or(OVERRUN)?,
            x_max_extent: r.read::<i16>().ok_or(OVERRUN)?,
            caret_slope_rise: r.read::<i16>().ok_or(OVERRUN)?,
            caret_slope_run: r.read::<i16>().ok_or(OVERRUN)?,
            caret_offset: r.read::<i16>().ok_or(OVERRUN)?,
            reserved: r.read::<[u8; 8]>().ok_or(OVERRUN)?,
            metric_data_format: r.read::<i16>().ok_or(OVERRUN)?,
            number_of_h_metrics: r.read::<u16>().ok_or(OVERRUN)?,
        };

        if hhea.number_of_h_metrics > num_glyphs {
            return Err(RangeCheck("hhea.numberOfHMetrics exceeds maxp.numGlyphs"));
        }

        Ok(hhea)
    }
}

impl Writeable for Hhea {
    fn write(&self, w: &mut Writer) {
        w.write::<u32>(self.version);
        w.write::<i16>(self.ascender);
        w.write::<i16>(self.descender);
        w.write::<i16>(self.line_gap);
        w.write::<u16>(self.advance_width_max);
        w.write::<i16>(self.min_left_side_bearing);
        w.write::<i16>(self.min_right_side_bearing);
        w.write::<i16>(self.x_max_extent);
        w.write::<i16>(self.caret_slope_rise);
        w.write::<i16>(self.caret_slope_run);
        w.write::<i16>(self.caret_offset);
        w.write::<[u8; 8]>(self.reserved);
        w.write::<i16>(self.metric_data_format);
        w.write::<u16>(self.number_of_h_metrics);
    }
}
