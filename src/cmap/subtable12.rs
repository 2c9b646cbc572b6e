use super::{runs, OVERRUN};
use crate::stream::{Readable, Reader, Writeable, Writer};
use crate::Error::RangeCheck;
use crate::Result;
use std::collections::BTreeMap;

/// The largest Unicode code point.
const MAX_CODE_POINT: u32 = 0x10FFFF;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct SequentialMapGroupRecord {
    pub start_char_code: u32,
    pub end_char_code: u32,
    pub start_glyph_id: u32,
}

impl Readable<'_> for SequentialMapGroupRecord {
    const SIZE: usize = 12;

    fn read(r: &mut Reader<'_>) -> Option<Self> {
        let start_char_code = r.read::<u32>()?;
        let end_char_code = r.read::<u32>()?;
        let start_glyph_id = r.read::<u32>()?;

        Some(Self { start_char_code, end_char_code, start_glyph_id })
    }
}

impl Writeable for SequentialMapGroupRecord {
    fn write(&self, w: &mut Writer) {
        w.write::<u32>(self.start_char_code);
        w.write::<u32>(self.end_char_code);
        w.write::<u32>(self.start_glyph_id);
    }
}

/// A format 12 subtable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Subtable12 {
    pub language: u32,
    pub groups: Vec<SequentialMapGroupRecord>,
}

impl Subtable12 {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut r = Reader::new(data);
        r.read::<u16>().ok_or(OVERRUN)?; // format
        r.read::<u16>().ok_or(OVERRUN)?; // reserved
        r.read::<u32>().ok_or(OVERRUN)?; // length
        let language = r.read::<u32>().ok_or(OVERRUN)?;
        let num_groups = r.read::<u32>().ok_or(OVERRUN)?;

        let groups = r
            .read_vector::<SequentialMapGroupRecord>(num_groups as usize)
            .ok_or(OVERRUN)?;

        if groups.iter().any(|g| g.start_char_code > g.end_char_code) {
            return Err(RangeCheck("cmap format 12 group ends before it starts"));
        }

        Ok(Self { language, groups })
    }

    /// Build a subtable from an ordered charcode to glyph map.
    pub fn from_mapping(language: u32, mapping: &BTreeMap<u32, u16>) -> Self {
        let groups = runs(mapping.iter().map(|(&c, &g)| (c, g)))
            .into_iter()
            .map(|run| SequentialMapGroupRecord {
                start_char_code: run.start,
                end_char_code: run.end,
                start_glyph_id: u32::from(run.start_gid),
            })
            .collect();

        Self { language, groups }
    }

    /// Calls `f` for each mapped code point.
    pub fn mappings(&self, mut f: impl FnMut(u32, u16)) {
        for group in &self.groups {
            let end = group.end_char_code.min(MAX_CODE_POINT);
            for code_point in group.start_char_code..=end {
                let id = group
                    .start_glyph_id
                    .checked_add(code_point - group.start_char_code)
                    .and_then(|id| u16::try_from(id).ok());
                match id {
                    Some(id) => f(code_point, id),
                    None => break,
                }
            }
        }
    }
}

impl Writeable for Subtable12 {
    fn write(&self, w: &mut Writer) {
        // format + reserved + length + language + num_groups + num_groups * (start_char,
        // end_char, start_glyph_id)
        let length = 2 + 2 + 4 + 4 + 4 + (4 + 4 + 4) * self.groups.len();

        w.write::<u16>(12);
        w.write::<u16>(0);
        w.write::<u32>(length as u32);
        w.write::<u32>(self.language);
        w.write::<u32>(self.groups.len() as u32);
        w.write_slice(&self.groups);
    }
}
