//! A small, hand-assembled TrueType font used by the integration tests.
//!
//! | gid | name           | chars | glyph                    |
//! |-----|----------------|-------|--------------------------|
//! | 0   | .notdef        |       | triangle                 |
//! | 1   | A              | 'A'   | triangle                 |
//! | 2   | B              | 'B'   | triangle                 |
//! | 3   | C              | 'C'   | triangle                 |
//! | 4   | D              | 'D'   | composite of 1 and 5     |
//! | 5   | ring.component |       | triangle                 |
//! | 6   | E              | 'E'   | triangle                 |

#![allow(dead_code)]

pub type Table = ([u8; 4], Vec<u8>);

pub const NUM_GLYPHS: u16 = 7;
pub const NUM_H_METRICS: u16 = 5;
pub const ADVANCES: [u16; 7] = [500, 600, 620, 640, 660, 660, 660];

/// The bounding boxes of all glyphs as (x_min, y_min, x_max, y_max).
pub const BBOXES: [(i16, i16, i16, i16); 7] = [
    (0, 0, 400, 600),
    (0, 0, 500, 700),
    (0, 0, 520, 700),
    (0, 0, 540, 700),
    (0, 0, 600, 800),
    (0, 0, 100, 100),
    (0, 0, 560, 700),
];

/// Character to glyph runs as (first char, last char, first glyph).
const RUNS: [(u32, u32, u16); 2] = [(0x41, 0x44, 1), (0x45, 0x45, 6)];

/// Initialize logging for a test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// The complete fixture font.
pub fn font() -> Vec<u8> {
    assemble(tables())
}

/// All tables of the fixture font, sorted by tag.
pub fn tables() -> Vec<Table> {
    let (glyf, loca) = glyf_and_loca();
    vec![
        (*b"cmap", cmap()),
        (*b"glyf", glyf),
        (*b"head", head()),
        (*b"hhea", hhea()),
        (*b"hmtx", hmtx()),
        (*b"loca", loca),
        (*b"maxp", maxp()),
        (*b"name", name()),
        (*b"post", post()),
        (*b"prep", vec![0xb0, 0x01, 0x2c, 0x00]),
    ]
}

/// The tables of the fixture font with a long `loca` table.
pub fn long_loca_tables() -> Vec<Table> {
    let mut tables = tables();

    let mut loca = vec![];
    let mut offset = 0u32;
    for glyph in glyphs() {
        push_u32(&mut loca, offset);
        offset += glyph.len() as u32;
    }
    push_u32(&mut loca, offset);
    replace(&mut tables, b"loca", loca);

    let mut head = head();
    head[50..52].copy_from_slice(&1i16.to_be_bytes());
    replace(&mut tables, b"head", head);

    tables
}

/// Replace one table of the fixture.
pub fn replace(tables: &mut [Table], tag: &[u8; 4], data: Vec<u8>) {
    for (t, table) in tables.iter_mut() {
        if t == tag {
            *table = data.clone();
        }
    }
}

/// Build a font file from tables that are sorted by tag, with correct
/// checksums and `head.checksumAdjustment`.
pub fn assemble(tables: Vec<Table>) -> Vec<u8> {
    let mut w = Vec::new();
    let n = tables.len() as u16;
    let pow = 1u16 << (15 - n.leading_zeros());
    push_u32(&mut w, 0x00010000);
    push_u16(&mut w, n);
    push_u16(&mut w, pow * 16);
    push_u16(&mut w, pow.trailing_zeros() as u16);
    push_u16(&mut w, n * 16 - pow * 16);

    let mut offset = 12 + 16 * tables.len();
    let mut head_offset = None;
    for (tag, data) in &tables {
        if tag == b"head" {
            head_offset = Some(offset);
        }
        w.extend(tag);
        push_u32(&mut w, checksum(data));
        push_u32(&mut w, offset as u32);
        push_u32(&mut w, data.len() as u32);
        offset += data.len().next_multiple_of(4);
    }

    for (_, data) in &tables {
        w.extend(data);
        w.resize(w.len().next_multiple_of(4), 0);
    }

    if let Some(head) = head_offset {
        let adjustment = 0xB1B0AFBAu32.wrapping_sub(checksum(&w));
        w[head + 8..head + 12].copy_from_slice(&adjustment.to_be_bytes());
    }

    w
}

/// The sum of all big-endian `u32`s of some zero-padded data.
pub fn checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}

/// The offset of a table in a font file built by [`assemble`].
pub fn table_offset(font: &[u8], tag: &[u8; 4]) -> Option<usize> {
    let n = u16::from_be_bytes([font[4], font[5]]) as usize;
    (0..n).map(|i| 12 + 16 * i).find_map(|r| {
        (&font[r..r + 4] == tag).then(|| {
            u32::from_be_bytes([font[r + 8], font[r + 9], font[r + 10], font[r + 11]]) as usize
        })
    })
}

fn push_u16(w: &mut Vec<u8>, v: u16) {
    w.extend(v.to_be_bytes());
}

fn push_i16(w: &mut Vec<u8>, v: i16) {
    w.extend(v.to_be_bytes());
}

fn push_u32(w: &mut Vec<u8>, v: u32) {
    w.extend(v.to_be_bytes());
}

fn triangle((x_min, y_min, x_max, y_max): (i16, i16, i16, i16)) -> Vec<u8> {
    let mut w = vec![];
    push_i16(&mut w, 1);
    for v in [x_min, y_min, x_max, y_max] {
        push_i16(&mut w, v);
    }
    push_u16(&mut w, 2);
    push_u16(&mut w, 0);
    // Three on-curve points with word deltas.
    w.extend([1, 1, 1]);
    for dx in [x_min, x_max - x_min, x_min - x_max] {
        push_i16(&mut w, dx);
    }
    for dy in [y_min, 0, y_max - y_min] {
        push_i16(&mut w, dy);
    }
    w.push(0);
    w
}

fn composite(bbox: (i16, i16, i16, i16), components: &[(u16, i16, i16)]) -> Vec<u8> {
    let mut w = vec![];
    push_i16(&mut w, -1);
    for v in [bbox.0, bbox.1, bbox.2, bbox.3] {
        push_i16(&mut w, v);
    }
    for (i, &(gid, dx, dy)) in components.iter().enumerate() {
        let more = if i + 1 < components.len() { 0x20 } else { 0 };
        push_u16(&mut w, 0x0001 | 0x0002 | more);
        push_u16(&mut w, gid);
        push_i16(&mut w, dx);
        push_i16(&mut w, dy);
    }
    w
}

/// The glyph descriptions.
pub fn glyphs() -> Vec<Vec<u8>> {
    (0..NUM_GLYPHS as usize)
        .map(|gid| match gid {
            4 => composite(BBOXES[4], &[(1, 0, 0), (5, 200, 700)]),
            _ => triangle(BBOXES[gid]),
        })
        .collect()
}

fn glyf_and_loca() -> (Vec<u8>, Vec<u8>) {
    let mut glyf = vec![];
    let mut loca = vec![];
    for glyph in glyphs() {
        push_u16(&mut loca, (glyf.len() / 2) as u16);
        glyf.extend(glyph);
    }
    push_u16(&mut loca, (glyf.len() / 2) as u16);
    (glyf, loca)
}

fn head() -> Vec<u8> {
    let mut w = vec![];
    push_u32(&mut w, 0x00010000);
    push_u32(&mut w, 0x00010000);
    push_u32(&mut w, 0);
    push_u32(&mut w, 0x5F0F3CF5);
    push_u16(&mut w, 0x000B);
    push_u16(&mut w, 1000);
    w.extend([0; 16]);
    for v in [0, 0, 600, 800] {
        push_i16(&mut w, v);
    }
    push_u16(&mut w, 0);
    push_u16(&mut w, 8);
    push_i16(&mut w, 2);
    push_i16(&mut w, 0);
    push_i16(&mut w, 0);
    w
}

fn maxp() -> Vec<u8> {
    let mut w = vec![];
    push_u32(&mut w, 0x00010000);
    push_u16(&mut w, NUM_GLYPHS);
    for v in [3, 1, 6, 2, 2, 0, 0, 0, 0, 0, 0, 2, 1] {
        push_u16(&mut w, v);
    }
    w
}

fn hhea() -> Vec<u8> {
    let mut w = vec![];
    push_u32(&mut w, 0x00010000);
    for v in [800, -200, 0] {
        push_i16(&mut w, v);
    }
    push_u16(&mut w, 660);
    for v in [0, 0, 600, 1, 0, 0, 0, 0, 0, 0, 0] {
        push_i16(&mut w, v);
    }
    push_u16(&mut w, NUM_H_METRICS);
    w
}

fn hmtx() -> Vec<u8> {
    let mut w = vec![];
    for gid in 0..NUM_GLYPHS as usize {
        if gid < NUM_H_METRICS as usize {
            push_u16(&mut w, ADVANCES[gid]);
        }
        push_i16(&mut w, BBOXES[gid].0);
    }
    w
}

fn cmap() -> Vec<u8> {
    let subtables = [(0, 3, format4()), (1, 0, format0()), (3, 1, format4()), (3, 10, format12())];

    let mut w = vec![];
    push_u16(&mut w, 0);
    push_u16(&mut w, subtables.len() as u16);

    let mut offset = 4 + 8 * subtables.len();
    for (platform_id, encoding_id, data) in &subtables {
        push_u16(&mut w, *platform_id);
        push_u16(&mut w, *encoding_id);
        push_u32(&mut w, offset as u32);
        offset += data.len();
    }

    for (_, _, data) in subtables {
        w.extend(data);
    }
    w
}

fn format0() -> Vec<u8> {
    let mut w = vec![];
    push_u16(&mut w, 0);
    push_u16(&mut w, 262);
    push_u16(&mut w, 0);
    let mut glyphs = [0u8; 256];
    for (start, end, gid) in RUNS {
        for c in start..=end {
            glyphs[c as usize] = (gid + (c - start) as u16) as u8;
        }
    }
    w.extend(glyphs);
    w
}

fn format4() -> Vec<u8> {
    let mut segments: Vec<(u16, u16, i16)> = RUNS
        .iter()
        .map(|&(start, end, gid)| (start as u16, end as u16, (gid as i16) - (start as i16)))
        .collect();
    segments.push((0xFFFF, 0xFFFF, 1));

    let seg_count = segments.len() as u16;
    let pow = 1u16 << (15 - seg_count.leading_zeros());

    let mut w = vec![];
    push_u16(&mut w, 4);
    push_u16(&mut w, 16 + 8 * seg_count);
    push_u16(&mut w, 0);
    push_u16(&mut w, seg_count * 2);
    push_u16(&mut w, pow * 2);
    push_u16(&mut w, pow.trailing_zeros() as u16);
    push_u16(&mut w, seg_count * 2 - pow * 2);
    for &(_, end, _) in &segments {
        push_u16(&mut w, end);
    }
    push_u16(&mut w, 0);
    for &(start, _, _) in &segments {
        push_u16(&mut w, start);
    }
    for &(_, _, delta) in &segments {
        push_i16(&mut w, delta);
    }
    for _ in &segments {
        push_u16(&mut w, 0);
    }
    w
}

fn format12() -> Vec<u8> {
    let mut w = vec![];
    push_u16(&mut w, 12);
    push_u16(&mut w, 0);
    push_u32(&mut w, 16 + 12 * RUNS.len() as u32);
    push_u32(&mut w, 0);
    push_u32(&mut w, RUNS.len() as u32);
    for (start, end, gid) in RUNS {
        push_u32(&mut w, start);
        push_u32(&mut w, end);
        push_u32(&mut w, u32::from(gid));
    }
    w
}

/// `post` version 2.0 with one custom glyph name.
fn post() -> Vec<u8> {
    let mut w = vec![];
    push_u32(&mut w, 0x00020000);
    push_u32(&mut w, 0);
    push_i16(&mut w, -100);
    push_i16(&mut w, 50);
    w.extend([0; 20]);
    push_u16(&mut w, NUM_GLYPHS);
    for index in [0, 36, 37, 38, 39, 258, 40] {
        push_u16(&mut w, index);
    }
    let custom = b"ring.component";
    w.push(custom.len() as u8);
    w.extend(custom);
    w
}

/// The records of the `name` table as (platform, encoding, language, name id,
/// text).
pub const NAMES: [(u16, u16, u16, u16, &str); 4] = [
    (1, 0, 0, 1, "Fixture"),
    (3, 1, 0x409, 1, "Fixture"),
    (3, 1, 0x409, 4, "Fixture Regular"),
    (3, 1, 0x409, 16, "Fixture Family"),
];

fn name() -> Vec<u8> {
    let mut records = vec![];
    let mut storage = vec![];
    for (platform_id, encoding_id, language_id, name_id, text) in NAMES {
        let bytes: Vec<u8> = if platform_id == 1 {
            text.bytes().collect()
        } else {
            text.encode_utf16().flat_map(u16::to_be_bytes).collect()
        };
        for v in [platform_id, encoding_id, language_id, name_id] {
            push_u16(&mut records, v);
        }
        push_u16(&mut records, bytes.len() as u16);
        push_u16(&mut records, storage.len() as u16);
        storage.extend(bytes);
    }

    let mut w = vec![];
    push_u16(&mut w, 0);
    push_u16(&mut w, NAMES.len() as u16);
    push_u16(&mut w, 6 + records.len() as u16);
    w.extend(records);
    w.extend(storage);
    w
}
