//! The `cmap` table maps character codes to glyph IDs.
//!
//! Every subtable is decoded into an ordered charcode to glyph map. When
//! subsetting, format 4 and 12 subtables are rebuilt from such a map, while
//! format 0 and 6 subtables are either dropped or have their unused entries
//! zeroed.

mod subtable0;
mod subtable12;
mod subtable4;
mod subtable6;

use self::subtable0::Subtable0;
use self::subtable12::Subtable12;
use self::subtable4::Subtable4;
use self::subtable6::Subtable6;
use crate::stream::{Readable, Reader, Writeable, Writer};
use crate::Error::TableReadOverrun;
use crate::{Error, Result, Tag};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

const OVERRUN: Error = TableReadOverrun(Tag::CMAP);

/// A `(platformID, encodingID)` pair.
pub(crate) type SubtableKey = (u16, u16);

/// The format of a cmap subtable.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CmapFormat {
    /// Byte encoding table.
    Format0,
    /// Segment mapping to delta values.
    Format4,
    /// Trimmed table mapping.
    Format6,
    /// Segmented coverage.
    Format12,
}

/// Summary of a cmap subtable.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SubtableInfo {
    /// The platform ID.
    pub platform_id: u16,
    /// The platform-specific encoding ID.
    pub encoding_id: u16,
    /// The subtable format.
    pub format: CmapFormat,
    /// The number of mapped character codes.
    pub num_mappings: usize,
}

#[derive(Debug)]
struct EncodingRecord {
    platform_id: u16,
    encoding_id: u16,
    subtable_offset: u32,
}

impl Readable<'_> for EncodingRecord {
    const SIZE: usize = 8;

    fn read(r: &mut Reader) -> Option<Self> {
        Some(EncodingRecord {
            platform_id: r.read::<u16>()?,
            encoding_id: r.read::<u16>()?,
            subtable_offset: r.read::<u32>()?,
        })
    }
}

impl Writeable for EncodingRecord {
    fn write(&self, w: &mut Writer) {
        w.write::<u16>(self.platform_id);
        w.write::<u16>(self.encoding_id);
        w.write::<u32>(self.subtable_offset);
    }
}

/// The format-specific part of a subtable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Payload {
    Format0(Subtable0),
    Format4(Subtable4),
    Format6(Subtable6),
    Format12(Subtable12),
}

impl Payload {
    fn parse(data: &[u8]) -> Result<Option<Self>> {
        let format = u16::read_at(data, 0).ok_or(OVERRUN)?;
        Ok(Some(match format {
            0 => Payload::Format0(Subtable0::parse(data)?),
            4 => Payload::Format4(Subtable4::parse(data)?),
            6 => Payload::Format6(Subtable6::parse(data)?),
            12 => Payload::Format12(Subtable12::parse(data)?),
            _ => {
                log::warn!("skipping cmap subtable with unsupported format {format}");
                return Ok(None);
            }
        }))
    }

    fn format(&self) -> CmapFormat {
        match self {
            Payload::Format0(_) => CmapFormat::Format0,
            Payload::Format4(_) => CmapFormat::Format4,
            Payload::Format6(_) => CmapFormat::Format6,
            Payload::Format12(_) => CmapFormat::Format12,
        }
    }

    /// Decode every mapping of the subtable.
    fn mapping(&self) -> BTreeMap<u32, u16> {
        let mut mapping = BTreeMap::new();
        let mut f = |c: u32, g: u16| {
            mapping.insert(c, g);
        };
        match self {
            Payload::Format0(t) => t.mappings(&mut f),
            Payload::Format4(t) => t.mappings(&mut f),
            Payload::Format6(t) => t.mappings(&mut f),
            Payload::Format12(t) => t.mappings(&mut f),
        }
        mapping
    }
}

impl Writeable for Payload {
    fn write(&self, w: &mut Writer) {
        match self {
            Payload::Format0(t) => t.write(w),
            Payload::Format4(t) => t.write(w),
            Payload::Format6(t) => t.write(w),
            Payload::Format12(t) => t.write(w),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CmapSubtable {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub payload: Payload,
    /// The decoded charcode to glyph map.
    pub mapping: BTreeMap<u32, u16>,
}

impl CmapSubtable {
    fn new(platform_id: u16, encoding_id: u16, payload: Payload) -> Self {
        let mapping = payload.mapping();
        Self { platform_id, encoding_id, payload, mapping }
    }

    pub fn info(&self) -> SubtableInfo {
        SubtableInfo {
            platform_id: self.platform_id,
            encoding_id: self.encoding_id,
            format: self.payload.format(),
            num_mappings: self.mapping.len(),
        }
    }

    /// Re-encode the subtable with a new mapping. Format 0 and 6 subtables
    /// keep their arrays and only unmap glyphs of `num_glyphs` or more.
    ///
    /// Returns `None` if a format 4 subtable would exceed its 16-bit length.
    fn rebuild(&self, mapping: &BTreeMap<u32, u16>, num_glyphs: u16) -> Option<Self> {
        let payload = match &self.payload {
            Payload::Format0(t) => Payload::Format0(t.truncate(num_glyphs)),
            Payload::Format4(t) => {
                let table = Subtable4::from_mapping(t.language, mapping);
                if !table.fits() {
                    log::warn!(
                        "dropping format 4 cmap subtable ({}, {}) with {} segments, it is too large",
                        self.platform_id,
                        self.encoding_id,
                        table.start_codes.len(),
                    );
                    return None;
                }
                Payload::Format4(table)
            }
            Payload::Format6(t) => Payload::Format6(t.truncate(num_glyphs)),
            Payload::Format12(t) => Payload::Format12(Subtable12::from_mapping(t.language, mapping)),
        };
        Some(Self::new(self.platform_id, self.encoding_id, payload))
    }

    /// The mapping as characters. Charcodes that are no Unicode scalar values
    /// are left out.
    pub fn runes(&self) -> BTreeMap<char, u16> {
        self.mapping
            .iter()
            .filter_map(|(&c, &g)| Some((char::from_u32(c)?, g)))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Cmap {
    pub version: u16,
    /// The subtable keys in on-disk order.
    pub keys: Vec<SubtableKey>,
    pub subtables: FxHashMap<SubtableKey, CmapSubtable>,
}

impl Cmap {
    pub fn parse(data: &[u8], num_glyphs: u16) -> Result<Self> {
        let mut r = Reader::new(data);
        let version = r.read::<u16>().ok_or(OVERRUN)?;
        let num_tables = r.read::<u16>().ok_or(OVERRUN)?;
        let records =
            r.read_vector::<EncodingRecord>(usize::from(num_tables)).ok_or(OVERRUN)?;

        let mut keys = vec![];
        let mut subtables = FxHashMap::default();

        for record in records {
            let key = (record.platform_id, record.encoding_id);
            if subtables.contains_key(&key) {
                log::warn!("duplicate cmap subtable {key:?}, keeping the first one");
                continue;
            }

            let subtable_data = data.get(record.subtable_offset as usize..).ok_or(OVERRUN)?;
            let Some(payload) = Payload::parse(subtable_data)? else {
                continue;
            };

            let mut subtable = CmapSubtable::new(key.0, key.1, payload);
            let mut mapping = subtable.mapping.clone();
            mapping.retain(|_, g| *g < num_glyphs);
            if mapping.len() != subtable.mapping.len() {
                log::warn!(
                    "dropped {} mappings to glyphs outside of the font from cmap subtable {key:?}",
                    subtable.mapping.len() - mapping.len(),
                );
                match subtable.rebuild(&mapping, num_glyphs) {
                    Some(rebuilt) => subtable = rebuilt,
                    None => continue,
                }
            }

            keys.push(key);
            subtables.insert(key, subtable);
        }

        Ok(Self { version, keys, subtables })
    }

    pub fn get(&self, platform_id: u16, encoding_id: u16) -> Option<&CmapSubtable> {
        self.subtables.get(&(platform_id, encoding_id))
    }

    /// The subtables in on-disk order.
    pub fn iter(&self) -> impl Iterator<Item = &CmapSubtable> + '_ {
        self.keys.iter().filter_map(|key| self.subtables.get(key))
    }

    /// Rebuild the table for a new set of glyphs. Format 4 and 12 subtables
    /// all get the same `mapping`, format 0 and 6 subtables are dropped.
    pub fn rebuild(&self, mapping: &BTreeMap<u32, u16>) -> Self {
        self.filter_map(|subtable| match subtable.payload {
            Payload::Format0(_) | Payload::Format6(_) => None,
            Payload::Format4(_) | Payload::Format12(_) => subtable.rebuild(mapping, u16::MAX),
        })
    }

    /// Remove every mapping to a glyph ID of `num_glyphs` or more. Format 4
    /// and 12 subtables are rebuilt, format 0 and 6 subtables are zeroed in
    /// place.
    pub fn truncate(&self, num_glyphs: u16) -> Self {
        self.filter_map(|subtable| {
            let mut mapping = subtable.mapping.clone();
            mapping.retain(|_, g| *g < num_glyphs);
            subtable.rebuild(&mapping, num_glyphs)
        })
    }

    fn filter_map(&self, mut f: impl FnMut(&CmapSubtable) -> Option<CmapSubtable>) -> Self {
        let mut keys = vec![];
        let mut subtables = FxHashMap::default();
        for subtable in self.iter() {
            if let Some(new) = f(subtable) {
                let key = (new.platform_id, new.encoding_id);
                keys.push(key);
                subtables.insert(key, new);
            }
        }
        Self { version: self.version, keys, subtables }
    }
}

impl Writeable for Cmap {
    fn write(&self, w: &mut Writer) {
        let mut subtables = Writer::new();
        let num_tables = self.keys.len() as u16;
        let mut subtable_offset = (2 * 2 + num_tables as usize * 8) as u32;

        w.write::<u16>(self.version);
        w.write::<u16>(num_tables);

        for subtable in self.iter() {
            let start = subtables.len();
            subtables.write(&subtable.payload);
            subtables.align(4);

            w.write(EncodingRecord {
                platform_id: subtable.platform_id,
                encoding_id: subtable.encoding_id,
                subtable_offset,
            });
            subtable_offset += (subtables.len() - start) as u32;
        }

        w.extend(&subtables.finish());
    }
}

/// A run of consecutive charcodes mapped to consecutive glyph IDs.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct Run {
    pub start: u32,
    pub end: u32,
    pub start_gid: u16,
}

/// Split an ordered mapping into maximal runs in which both the charcode and
/// the glyph ID increase by one from entry to entry.
pub(crate) fn runs(mapping: impl IntoIterator<Item = (u32, u16)>) -> Vec<Run> {
    let mut runs: Vec<Run> = vec![];

    for (c, g) in mapping {
        if let Some(run) = runs.last_mut() {
            let len = run.end - run.start + 1;
            if c == run.end + 1 && u32::from(g) == u32::from(run.start_gid) + len {
                run.end = c;
                continue;
            }
        }

        runs.push(Run { start: c, end: c, start_gid: g });
    }

    runs
}

/// The binary search header fields `(searchRange, entrySelector,
/// rangeShift)` for `count` segments.
pub(crate) fn search_fields(count: u16) -> (u16, u16, u16) {
    if count == 0 {
        return (0, 0, 0);
    }

    let entry_selector = (u16::BITS - count.leading_zeros() - 1) as u16;
    let search_range = 2 * 2u16.pow(u32::from(entry_selector));
    let range_shift = (2 * count).saturating_sub(search_range);
    (search_range, entry_selector, range_shift)
}
