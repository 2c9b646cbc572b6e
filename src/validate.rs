use crate::directory::TableDirectory;
use crate::head::CHECKSUM_ADJUSTMENT_OFFSET;
use crate::stream::Readable;
use crate::Error::{ChecksumMismatch, FileChecksumMismatch, RequiredFieldMissing, TableReadOverrun};
use crate::{checksum, Font, Result, Tag, CHECKSUM_MAGIC};
use std::path::Path;

/// Check that a font file is well-formed: every table checksum matches, all
/// tables can be parsed and agree with each other, and the checksum of the
/// whole file matches `head.checksumAdjustment`.
///
/// Table checksums are checked first, so that a corrupted table is reported
/// by its tag.
pub fn validate_bytes(data: &[u8]) -> Result<()> {
    let directory = TableDirectory::parse(data, 0)?;

    for record in &directory.records {
        let table = data.get(record.range()).ok_or(TableReadOverrun(record.tag))?;
        if table.len() != record.length as usize {
            return Err(TableReadOverrun(record.tag));
        }

        let sum = if record.tag == Tag::HEAD {
            let mut head = table.to_vec();
            let field = CHECKSUM_ADJUSTMENT_OFFSET..CHECKSUM_ADJUSTMENT_OFFSET + 4;
            head.get_mut(field).ok_or(TableReadOverrun(Tag::HEAD))?.fill(0);
            checksum(&head)
        } else {
            checksum(table)
        };

        if sum != record.checksum {
            log::debug!(
                "{} table checksum is {sum:#010x}, expected {:#010x}",
                record.tag,
                record.checksum,
            );
            return Err(ChecksumMismatch(record.tag));
        }
    }

    Font::parse(data)?;

    let head = directory.get(Tag::HEAD).ok_or(RequiredFieldMissing(Tag::HEAD))?;
    let position = head.offset as usize + CHECKSUM_ADJUSTMENT_OFFSET;
    let adjustment = u32::read_at(data, position).ok_or(TableReadOverrun(Tag::HEAD))?;

    let mut file = data.to_vec();
    file[position..position + 4].fill(0);
    if CHECKSUM_MAGIC.wrapping_sub(checksum(&file)) != adjustment {
        return Err(FileChecksumMismatch);
    }

    Ok(())
}

/// Read a font file and check that it is well-formed. See [`validate_bytes`].
pub fn validate_file(path: impl AsRef<Path>) -> Result<()> {
    let data = std::fs::read(path)?;
    validate_bytes(&data)
}
