use super::*;
use crate::stream::Reader;
use crate::Error::{TableReadOverrun, UnsupportedVersion};
use crate::{Error, Result, Tag};

const OVERRUN: Error = TableReadOverrun(Tag::NAME);

impl Name {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut r = Reader::new(data);

        let version = r.read::<u16>().ok_or(OVERRUN)?;
        if version > 1 {
            return Err(UnsupportedVersion { tag: Tag::NAME, version: u32::from(version) });
        }

        let count = r.read::<u16>().ok_or(OVERRUN)?;
        let storage_offset = usize::from(r.read::<u16>().ok_or(OVERRUN)?);
        let storage = data.get(storage_offset..).ok_or(OVERRUN)?;
        let string = |length: u16, offset: u16| {
            let start = usize::from(offset);
            storage.get(start..start + usize::from(length)).map(<[u8]>::to_vec).ok_or(OVERRUN)
        };

        let mut records = Vec::with_capacity(usize::from(count));
        for _ in 0..count {
            let platform_id = r.read::<u16>().ok_or(OVERRUN)?;
            let encoding_id = r.read::<u16>().ok_or(OVERRUN)?;
            let language_id = r.read::<u16>().ok_or(OVERRUN)?;
            let name_id = r.read::<u16>().ok_or(OVERRUN)?;
            let length = r.read::<u16>().ok_or(OVERRUN)?;
            let offset = r.read::<u16>().ok_or(OVERRUN)?;

            records.push(NameRecord {
                platform_id,
                encoding_id,
                language_id,
                name_id,
                string: string(length, offset)?,
            });
        }

        let mut lang_tags = vec![];
        if version == 1 {
            let lang_tag_count = r.read::<u16>().ok_or(OVERRUN)?;
            for _ in 0..lang_tag_count {
                let length = r.read::<u16>().ok_or(OVERRUN)?;
                let offset = r.read::<u16>().ok_or(OVERRUN)?;
                lang_tags.push(string(length, offset)?);
            }
        }

        Ok(Self { version, records, lang_tags })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(platform_id: u16, name_id: u16, string: &[u8]) -> NameRecord {
        NameRecord {
            platform_id,
            encoding_id: if platform_id == 3 { 1 } else { 0 },
            language_id: 0,
            name_id,
            string: string.to_vec(),
        }
    }

    #[test]
    fn rebuilds_storage_with_shared_strings() {
        let table = Name {
            version: 0,
            records: vec![
                record(1, 1, b"Sans"),
                record(3, 1, b"\0S\0a\0n\0s"),
                record(3, 4, b"\0S\0a\0n\0s"),
            ],
            lang_tags: vec![],
        };

        let mut w = Writer::new();
        w.write(&table);
        let data = w.finish();
        assert_eq!(data.len(), 6 + 3 * 12 + 4 + 8);
        // The third record shares the second one's string.
        assert_eq!(&data[6 + 24 + 8..6 + 36], &[0, 8, 0, 4]);
        assert_eq!(Name::parse(&data).unwrap(), table);
    }

    #[test]
    fn version_1_lang_tags() {
        let table = Name {
            version: 1,
            records: vec![NameRecord { language_id: 0x8000, ..record(0, 1, b"\0x") }],
            lang_tags: vec![b"\0d\0e".to_vec()],
        };

        let mut w = Writer::new();
        w.write(&table);
        let data = w.finish();
        assert_eq!(u16::from_be_bytes([data[4], data[5]]), 6 + 12 + 2 + 4);
        assert_eq!(Name::parse(&data).unwrap(), table);
    }

    #[test]
    fn rejects_strings_outside_of_storage_and_unknown_versions() {
        let data = [0, 0, 0, 1, 0, 18, 0, 3, 0, 1, 0, 0, 0, 1, 0, 4, 0, 0, 1, 2];
        assert!(matches!(Name::parse(&data), Err(TableReadOverrun(Tag::NAME))));
        assert!(matches!(Name::parse(&[0, 2, 0, 0, 0, 6]), Err(UnsupportedVersion { .. })));
    }
}
