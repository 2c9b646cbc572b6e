use super::OVERRUN;
use crate::stream::{Reader, Writeable, Writer};
use crate::Result;

/// A format 6 subtable: a dense glyph ID array for a range of character
/// codes starting at `first_code`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Subtable6 {
    pub language: u16,
    pub first_code: u16,
    pub glyph_ids: Vec<u16>,
}

impl Subtable6 {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut r = Reader::new(data);
        r.skip_bytes(4).ok_or(OVERRUN)?; // format + length
        let language = r.read::<u16>().ok_or(OVERRUN)?;
        let first_code = r.read::<u16>().ok_or(OVERRUN)?;
        let count = r.read::<u16>().ok_or(OVERRUN)?;
        let glyph_ids = r.read_vector::<u16>(usize::from(count)).ok_or(OVERRUN)?;
        Ok(Self { language, first_code, glyph_ids })
    }

    /// Calls `f` for each mapped code point. Glyph 0 means unmapped.
    pub fn mappings(&self, mut f: impl FnMut(u32, u16)) {
        let first = u32::from(self.first_code);
        for (i, &glyph_id) in self.glyph_ids.iter().enumerate() {
            let code_point = first + i as u32;
            if glyph_id != 0 && code_point <= 0xFFFF {
                f(code_point, glyph_id);
            }
        }
    }

    /// Unmap every code point that maps to `num_glyphs` or above.
    pub fn truncate(&self, num_glyphs: u16) -> Self {
        let glyph_ids =
            self.glyph_ids.iter().map(|&g| if g < num_glyphs { g } else { 0 }).collect();
        Self { language: self.language, first_code: self.first_code, glyph_ids }
    }
}

impl Writeable for Subtable6 {
    fn write(&self, w: &mut Writer) {
        let length = 10 + 2 * self.glyph_ids.len();
        w.write::<u16>(6);
        w.write::<u16>(length as u16);
        w.write::<u16>(self.language);
        w.write::<u16>(self.first_code);
        w.write::<u16>(self.glyph_ids.len() as u16);
        w.write_slice(&self.glyph_ids);
    }
}
