mod common;

use subfont::{validate_bytes, validate_file, Error, Font, Tag};

#[test]
fn fixture_is_valid() {
    common::init_logging();
    let data = common::font();
    validate_bytes(&data).unwrap();
    assert_eq!(common::checksum(&data), 0xB1B0AFBA);
}

#[test]
fn written_fonts_satisfy_checksum_law() {
    common::init_logging();
    let font = Font::parse(&common::font()).unwrap();
    for out in [font.to_vec().unwrap(), font.subset(&['B', 'E']).unwrap().to_vec().unwrap()] {
        assert_eq!(common::checksum(&out), 0xB1B0AFBA);
        assert_eq!(out.len() % 4, 0);
        validate_bytes(&out).unwrap();
    }
}

#[test]
fn writing_is_idempotent() {
    common::init_logging();
    let font = Font::parse(&common::font()).unwrap();
    let first = font.to_vec().unwrap();
    let reparsed = Font::parse(&first).unwrap();
    assert_eq!(reparsed.cmap_subtables(), font.cmap_subtables());
    assert_eq!(reparsed.table_tags(), font.table_tags());
    assert_eq!(reparsed.to_vec().unwrap(), first);
}

#[test]
fn corrupted_table_is_reported() {
    common::init_logging();
    let mut data = common::font();
    let glyf = common::table_offset(&data, b"glyf").unwrap();
    data[glyf + 3] ^= 0x10;

    let glyf = Tag::new(b"glyf");
    assert!(matches!(validate_bytes(&data), Err(Error::ChecksumMismatch(tag)) if tag == glyf));
}

#[test]
fn corrupted_adjustment_is_reported() {
    let mut data = common::font();
    let head = common::table_offset(&data, b"head").unwrap();
    data[head + 11] ^= 0x01;
    assert!(matches!(validate_bytes(&data), Err(Error::FileChecksumMismatch)));
}

#[test]
fn truncated_file_is_reported() {
    let mut data = common::font();
    data.truncate(data.len() - 8);
    assert!(matches!(validate_bytes(&data), Err(Error::TableReadOverrun(_))));

    assert!(matches!(validate_bytes(&data[..10]), Err(Error::MissingData)));
    assert!(matches!(validate_bytes(b"wOFF\0\0\0\0\0\0\0\0"), Err(Error::UnknownKind)));
}

#[test]
fn inconsistent_tables_are_reported() {
    common::init_logging();

    // numberOfHMetrics larger than numGlyphs.
    let mut tables = common::tables();
    let mut hhea = tables.iter().find(|(tag, _)| tag == b"hhea").unwrap().1.clone();
    hhea[34..36].copy_from_slice(&8u16.to_be_bytes());
    common::replace(&mut tables, b"hhea", hhea);
    let data = common::assemble(tables);
    assert!(matches!(validate_bytes(&data), Err(Error::RangeCheck(_))));

    // Unknown maxp version.
    let mut tables = common::tables();
    let mut maxp = tables.iter().find(|(tag, _)| tag == b"maxp").unwrap().1.clone();
    maxp[0..4].copy_from_slice(&0x00020000u32.to_be_bytes());
    common::replace(&mut tables, b"maxp", maxp);
    let data = common::assemble(tables);
    assert!(matches!(
        validate_bytes(&data),
        Err(Error::UnsupportedVersion { version: 0x00020000, .. })
    ));

    // Missing head table.
    let tables = common::tables().into_iter().filter(|(tag, _)| tag != b"head").collect();
    let data = common::assemble(tables);
    assert!(matches!(validate_bytes(&data), Err(Error::RequiredFieldMissing(_))));

    // glyf without loca.
    let tables = common::tables().into_iter().filter(|(tag, _)| tag != b"loca").collect();
    let data = common::assemble(tables);
    let loca = Tag::new(b"loca");
    assert!(matches!(Font::parse(&data), Err(Error::RequiredFieldMissing(tag)) if tag == loca));
}

#[test]
fn missing_file_is_reported() {
    assert!(matches!(validate_file("does/not/exist.ttf"), Err(Error::Io(_))));
}
