use super::{runs, search_fields, OVERRUN};
use crate::stream::{Reader, Writeable, Writer};
use crate::Error::RangeCheck;
use crate::Result;
use std::collections::BTreeMap;

/// A format 4 subtable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Subtable4 {
    pub language: u16,
    pub end_codes: Vec<u16>,
    pub start_codes: Vec<u16>,
    pub id_deltas: Vec<i16>,
    pub id_range_offsets: Vec<u16>,
    pub glyph_id_array: Vec<u16>,
}

impl Subtable4 {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut r = Reader::new(data);
        r.skip_bytes(2).ok_or(OVERRUN)?; // format
        let length = r.read::<u16>().ok_or(OVERRUN)?;
        let language = r.read::<u16>().ok_or(OVERRUN)?;
        let seg_count_x2 = r.read::<u16>().ok_or(OVERRUN)?;

        if seg_count_x2 < 2 || seg_count_x2 % 2 != 0 {
            return Err(RangeCheck("cmap format 4 segCountX2 must be even and non-zero"));
        }

        let seg_count = usize::from(seg_count_x2 / 2);
        r.skip_bytes(6).ok_or(OVERRUN)?; // search range + entry selector + range shift
        let end_codes = r.read_vector::<u16>(seg_count).ok_or(OVERRUN)?;
        r.skip_bytes(2).ok_or(OVERRUN)?; // reserved pad
        let start_codes = r.read_vector::<u16>(seg_count).ok_or(OVERRUN)?;
        let id_deltas = r.read_vector::<i16>(seg_count).ok_or(OVERRUN)?;
        let id_range_offsets = r.read_vector::<u16>(seg_count).ok_or(OVERRUN)?;

        // The glyph ID array takes up the rest of the subtable. Some fonts
        // declare a length beyond the end of the table, so clamp it.
        let end = usize::from(length).min(data.len());
        let remaining = end.saturating_sub(r.offset()) / 2;
        let glyph_id_array = r.read_vector::<u16>(remaining).ok_or(OVERRUN)?;

        Ok(Self { language, end_codes, start_codes, id_deltas, id_range_offsets, glyph_id_array })
    }

    /// Build a subtable from an ordered charcode to glyph map. Charcodes
    /// beyond the Basic Multilingual Plane are left out.
    pub fn from_mapping(language: u16, mapping: &BTreeMap<u32, u16>) -> Self {
        let mut table = Self {
            language,
            end_codes: vec![],
            start_codes: vec![],
            id_deltas: vec![],
            id_range_offsets: vec![],
            glyph_id_array: vec![],
        };

        let bmp = mapping.range(..=0xFFFF).map(|(&c, &g)| (c, g));
        for run in runs(bmp) {
            let start = run.start as u16;
            table.start_codes.push(start);
            table.end_codes.push(run.end as u16);
            table.id_deltas.push(run.start_gid.wrapping_sub(start) as i16);
            table.id_range_offsets.push(0);
        }

        // "For the search to terminate, the final start code and endCode values must
        // be 0xFFFF. This segment need not contain any valid mappings. (It can just map the
        // single character code 0xFFFF to missingGlyph). However, the segment must be present."
        if table.end_codes.last().map_or(true, |&end| end < 0xFFFF) {
            table.start_codes.push(0xFFFF);
            table.end_codes.push(0xFFFF);
            table.id_deltas.push(1);
            table.id_range_offsets.push(0);
        }

        table
    }

    /// The number of bytes the subtable takes up when written.
    pub fn size(&self) -> usize {
        // (format + length + language + seg_count_x2 + search_range +
        // entry_selector + range_shift + reserved_pad) + seg_count *
        // (end_code + start_code + id_delta + id_range_offsets) + glyph_id_array
        2 * 8 + 2 * 4 * self.start_codes.len() + 2 * self.glyph_id_array.len()
    }

    /// Whether the subtable fits into the 16-bit length field.
    pub fn fits(&self) -> bool {
        self.size() <= usize::from(u16::MAX)
    }

    /// Calls `f` for each mapped code point.
    pub fn mappings(&self, mut f: impl FnMut(u32, u16)) {
        let seg_count = self.start_codes.len();
        for (i, (&start, &end)) in self.start_codes.iter().zip(&self.end_codes).enumerate() {
            let id_delta = self.id_deltas[i] as u16;
            let id_range_offset = self.id_range_offsets[i];

            // The terminating 0xFFFF segment maps to the missing glyph. A
            // segment for 0xFFFF with any other glyph is a real mapping.
            if start == 0xFFFF
                && end == 0xFFFF
                && id_range_offset == 0
                && 0xFFFFu16.wrapping_add(id_delta) == 0
            {
                continue;
            }

            for code_point in start..=end {
                if id_range_offset == 0 {
                    f(u32::from(code_point), code_point.wrapping_add(id_delta));
                    continue;
                }

                // Some malformed fonts have 0xFFFF as the last offset, which
                // is invalid and should be ignored.
                if id_range_offset == 0xFFFF {
                    break;
                }

                // The offset is relative to the position of the offset itself.
                let index = usize::from(id_range_offset / 2) + usize::from(code_point - start);
                let Some(index) = index.checked_sub(seg_count - i) else {
                    continue;
                };

                // 0 indicates missing glyph.
                match self.glyph_id_array.get(index) {
                    Some(0) | None => {}
                    Some(&glyph) => f(u32::from(code_point), glyph.wrapping_add(id_delta)),
                }
            }
        }
    }
}

impl Writeable for Subtable4 {
    fn write(&self, w: &mut Writer) {
        let seg_count = self.start_codes.len() as u16;
        let (search_range, entry_selector, range_shift) = search_fields(seg_count);

        // Subtables that do not fit are dropped by `Cmap` before writing.
        w.write::<u16>(4);
        w.write::<u16>(self.size() as u16);
        w.write::<u16>(self.language);
        w.write::<u16>(2 * seg_count);
        w.write::<u16>(search_range);
        w.write::<u16>(entry_selector);
        w.write::<u16>(range_shift);

        w.write_slice(&self.end_codes);
        w.write::<u16>(0); // reserved pad
        w.write_slice(&self.start_codes);
        w.write_slice(&self.id_deltas);
        w.write_slice(&self.id_range_offsets);
        w.write_slice(&self.glyph_id_array);
    }
}
