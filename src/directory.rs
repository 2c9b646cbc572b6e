//! The offset table and the table directory that follows it.

use crate::stream::{Readable, Reader, Writeable, Writer};
use crate::Error::{MissingData, TableReadOverrun, UnknownKind};
use crate::{Result, Tag};
use rustc_hash::FxHashMap;

/// What kind of contents the file has.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum FontKind {
    /// TrueType outlines, stored with version `0x00010000` or `true`.
    TrueType(u32),
    /// CFF outlines.
    Cff,
    /// A font collection.
    Collection,
}

impl FontKind {
    fn from_u32(version: u32) -> Option<Self> {
        match version {
            0x00010000 | 0x74727565 => Some(FontKind::TrueType(version)),
            0x4F54544F => Some(FontKind::Cff),
            0x74746366 => Some(FontKind::Collection),
            _ => None,
        }
    }

    fn to_u32(self) -> u32 {
        match self {
            FontKind::TrueType(version) => version,
            FontKind::Cff => 0x4F54544F,
            FontKind::Collection => 0x74746366,
        }
    }
}

/// The header of the table directory.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct OffsetTable {
    pub kind: FontKind,
    pub num_tables: u16,
    pub search_range: u16,
    pub entry_selector: u16,
    pub range_shift: u16,
}

impl OffsetTable {
    /// Build the header for a directory with `num_tables` records.
    pub fn new(kind: FontKind, num_tables: u16) -> Self {
        let entry_selector = if num_tables == 0 {
            0
        } else {
            (u16::BITS - num_tables.leading_zeros() - 1) as u16
        };
        let search_range = 2u16.pow(u32::from(entry_selector)) * 16;
        let range_shift = (num_tables * 16).saturating_sub(search_range);
        Self { kind, num_tables, search_range, entry_selector, range_shift }
    }

    fn read(r: &mut Reader) -> Option<Result<Self>> {
        let kind = match FontKind::from_u32(r.read::<u32>()?) {
            Some(kind) => kind,
            None => return Some(Err(UnknownKind)),
        };

        Some(Ok(Self {
            kind,
            num_tables: r.read::<u16>()?,
            search_range: r.read::<u16>()?,
            entry_selector: r.read::<u16>()?,
            range_shift: r.read::<u16>()?,
        }))
    }
}

impl Writeable for OffsetTable {
    fn write(&self, w: &mut Writer) {
        w.write::<u32>(self.kind.to_u32());
        w.write::<u16>(self.num_tables);
        w.write::<u16>(self.search_range);
        w.write::<u16>(self.entry_selector);
        w.write::<u16>(self.range_shift);
    }
}

/// Locates a table in the font file.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct TableRecord {
    pub tag: Tag,
    pub checksum: u32,
    pub offset: u32,
    pub length: u32,
}

impl TableRecord {
    /// The byte range of the table inside the file.
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = self.offset as usize;
        start..start + self.length as usize
    }
}

impl Readable<'_> for TableRecord {
    const SIZE: usize = 16;

    fn read(r: &mut Reader) -> Option<Self> {
        Some(TableRecord {
            tag: r.read::<Tag>()?,
            checksum: r.read::<u32>()?,
            offset: r.read::<u32>()?,
            length: r.read::<u32>()?,
        })
    }
}

impl Writeable for TableRecord {
    fn write(&self, w: &mut Writer) {
        w.write::<Tag>(self.tag);
        w.write::<u32>(self.checksum);
        w.write::<u32>(self.offset);
        w.write::<u32>(self.length);
    }
}

/// The table directory of a single font: the records in on-disk order plus a
/// lookup by tag.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TableDirectory {
    pub offset_table: OffsetTable,
    pub records: Vec<TableRecord>,
    index: FxHashMap<Tag, usize>,
}

impl TableDirectory {
    /// Parse the directory of the font at `index` in `data`. For plain fonts,
    /// `index` should be 0.
    pub fn parse(data: &[u8], index: u32) -> Result<Self> {
        let mut r = Reader::new(data);
        let mut offset_table = OffsetTable::read(&mut r).ok_or(MissingData)??;

        // Parse font collection header if necessary.
        if offset_table.kind == FontKind::Collection {
            let offset = u32::read_at(data, 12 + 4 * (index as usize)).ok_or(MissingData)?;
            r = Reader::new_at(data, offset as usize);
            offset_table = OffsetTable::read(&mut r).ok_or(MissingData)??;
            if offset_table.kind == FontKind::Collection {
                return Err(UnknownKind);
            }
        }

        // Read table records.
        let records = r
            .read_vector::<TableRecord>(usize::from(offset_table.num_tables))
            .ok_or(MissingData)?;

        let mut index = FxHashMap::default();
        for (i, record) in records.iter().enumerate() {
            if data.get(record.range()).is_none() {
                return Err(TableReadOverrun(record.tag));
            }

            if index.insert(record.tag, i).is_some() {
                log::warn!("duplicate {} table record, using the last one", record.tag);
            }
        }

        Ok(Self { offset_table, records, index })
    }

    /// Look up the record of a table.
    pub fn get(&self, tag: Tag) -> Option<&TableRecord> {
        self.index.get(&tag).and_then(|&i| self.records.get(i))
    }

    /// Slice the data of a table out of the file.
    pub fn table<'a>(&self, data: &'a [u8], tag: Tag) -> Option<&'a [u8]> {
        data.get(self.get(tag)?.range())
    }
}
