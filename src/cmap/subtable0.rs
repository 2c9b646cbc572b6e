use super::OVERRUN;
use crate::stream::{Reader, Writeable, Writer};
use crate::Result;

/// A format 0 subtable: one glyph ID byte for each of the first 256
/// character codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Subtable0 {
    pub language: u16,
    pub glyph_ids: Vec<u8>,
}

impl Subtable0 {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut r = Reader::new(data);
        r.skip_bytes(4).ok_or(OVERRUN)?; // format + length
        let language = r.read::<u16>().ok_or(OVERRUN)?;
        let glyph_ids = r.read_bytes(256).ok_or(OVERRUN)?.to_vec();
        Ok(Self { language, glyph_ids })
    }

    /// Calls `f` for each mapped code point. Glyph 0 means unmapped.
    pub fn mappings(&self, mut f: impl FnMut(u32, u16)) {
        for (code_point, &glyph_id) in self.glyph_ids.iter().enumerate() {
            if glyph_id != 0 {
                f(code_point as u32, u16::from(glyph_id));
            }
        }
    }

    /// Unmap every code point that maps to `num_glyphs` or above.
    pub fn truncate(&self, num_glyphs: u16) -> Self {
        let glyph_ids = self
            .glyph_ids
            .iter()
            .map(|&g| if u16::from(g) < num_glyphs { g } else { 0 })
            .collect();
        Self { language: self.language, glyph_ids }
    }
}

impl Writeable for Subtable0 {
    fn write(&self, w: &mut Writer) {
        w.write::<u16>(0);
        w.write::<u16>(6 + self.glyph_ids.len() as u16);
        w.write::<u16>(self.language);
        w.extend(&self.glyph_ids);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_not_all_256_codepoints() {
        let mut data = vec![
            0x00, 0x00, // format: 0
            0x01, 0x06, // subtable size: 262
            0x00, 0x00, // language ID: 0
        ];

        // Map (only) codepoint 0x40 to 100 and 0x41 to 3.
        data.extend(std::iter::repeat(0).take(256));
        data[6 + 0x40] = 100;
        data[6 + 0x41] = 3;

        let table = Subtable0::parse(&data).unwrap();
        let mut pairs = vec![];
        table.mappings(|c, g| pairs.push((c, g)));
        assert_eq!(pairs, vec![(0x40, 100), (0x41, 3)]);

        let truncated = table.truncate(50);
        assert_eq!(truncated.glyph_ids.len(), 256);
        assert_eq!(truncated.glyph_ids[0x40], 0);
        assert_eq!(truncated.glyph_ids[0x41], 3);

        let mut w = Writer::new();
        w.write(&table);
        assert_eq!(w.finish(), data);

        assert!(Subtable0::parse(&data[..100]).is_err());
    }
}
