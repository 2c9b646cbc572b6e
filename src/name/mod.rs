//! The `name` table stores human-readable strings about the font. Every
//! record owns its string, and the string storage is rebuilt, with
//! duplicates shared, whenever the table is written.

mod read;
mod subset;

use crate::stream::{Writeable, Writer};
use rustc_hash::FxHashMap;

/// The size of a name record.
const RECORD_SIZE: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NameRecord {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub language_id: u16,
    pub name_id: u16,
    pub string: Vec<u8>,
}

impl NameRecord {
    pub fn is_unicode(&self) -> bool {
        self.platform_id == 0
            || (self.platform_id == 3 && [0, 1, 10].contains(&self.encoding_id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Name {
    pub version: u16,
    pub records: Vec<NameRecord>,
    /// The language tag strings of version 1.
    pub lang_tags: Vec<Vec<u8>>,
}

/// Collects strings into the storage area, sharing duplicates.
#[derive(Default)]
struct Storage<'a> {
    data: Vec<u8>,
    offsets: FxHashMap<&'a [u8], u16>,
}

impl<'a> Storage<'a> {
    /// Add a string and return its `(length, offset)`.
    fn push(&mut self, string: &'a [u8]) -> (u16, u16) {
        let data = &mut self.data;
        let offset = *self.offsets.entry(string).or_insert_with(|| {
            let offset = data.len() as u16;
            data.extend(string);
            offset
        });
        (string.len() as u16, offset)
    }
}

impl Writeable for Name {
    fn write(&self, w: &mut Writer) {
        let count = self.records.len();
        let mut storage_offset = 2 * 3 + count * RECORD_SIZE;
        if self.version >= 1 {
            storage_offset += 2 + 4 * self.lang_tags.len();
        }

        let mut storage = Storage::default();

        w.write::<u16>(self.version);
        w.write::<u16>(count as u16);
        w.write::<u16>(storage_offset as u16);

        for record in &self.records {
            let (length, offset) = storage.push(&record.string);
            w.write::<u16>(record.platform_id);
            w.write::<u16>(record.encoding_id);
            w.write::<u16>(record.language_id);
            w.write::<u16>(record.name_id);
            w.write::<u16>(length);
            w.write::<u16>(offset);
        }

        if self.version >= 1 {
            w.write::<u16>(self.lang_tags.len() as u16);
            for tag in &self.lang_tags {
                let (length, offset) = storage.push(tag);
                w.write::<u16>(length);
                w.write::<u16>(offset);
            }
        }

        w.extend(&storage.data);
    }
}
