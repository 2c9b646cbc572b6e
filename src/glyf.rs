//! The `glyf` table contains the main description of the glyphs, and the
//! `loca` table stores where each glyph description starts. Both are kept as
//! a list of raw glyph descriptions; the offsets are recalculated whenever
//! the font is written.
//!
//! Glyphs can reference other glyphs (composite glyphs). When keeping a set
//! of glyphs, we need to form the glyph closure: if glyph 1 references glyph
//! 2, both of them must stay.

use crate::stream::{Reader, Writer};
use crate::Error::{RangeCheck, TableReadOverrun};
use crate::{Error, Result, Tag};
use rustc_hash::FxHashSet;

const OVERRUN: Error = TableReadOverrun(Tag::GLYF);

/// The largest final offset that the short `loca` format can represent.
const MAX_SHORT_OFFSET: usize = 2 * (u16::MAX as usize);

// Composite glyph flags.
const ARG_1_AND_2_ARE_WORDS: u16 = 0x0001;
const WE_HAVE_A_SCALE: u16 = 0x0008;
const MORE_COMPONENTS: u16 = 0x0020;
const WE_HAVE_AN_X_AND_Y_SCALE: u16 = 0x0040;
const WE_HAVE_A_TWO_BY_TWO: u16 = 0x0080;

/// The glyph descriptions, indexed by glyph ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Glyf {
    pub glyphs: Vec<Vec<u8>>,
}

impl Glyf {
    /// Split the `glyf` table along the offsets stored in the `loca` table.
    pub fn parse(glyf: &[u8], loca: &[u8], short: bool, num_glyphs: u16) -> Result<Self> {
        let offsets = read_loca(loca, short, num_glyphs)?;

        let mut glyphs = Vec::with_capacity(usize::from(num_glyphs));
        for window in offsets.windows(2) {
            let (start, end) = (window[0] as usize, window[1] as usize);
            if start > end {
                return Err(RangeCheck("loca offsets must not decrease"));
            }
            glyphs.push(glyf.get(start..end).ok_or(OVERRUN)?.to_vec());
        }

        Ok(Self { glyphs })
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Whether the glyph descriptions need the long `loca` format.
    pub fn needs_long_loca(&self) -> bool {
        let size: usize = self.glyphs.iter().map(|g| g.len() + g.len() % 2).sum();
        size > MAX_SHORT_OFFSET
    }

    /// The `numGlyphs + 1` byte offsets of the glyph descriptions as they
    /// will be written. In the short format, descriptions are padded to an
    /// even length.
    pub fn offsets(&self, short: bool) -> Vec<u32> {
        let mut offsets = Vec::with_capacity(self.glyphs.len() + 1);
        let mut offset = 0;
        offsets.push(0);
        for glyph in &self.glyphs {
            offset += glyph.len();
            if short {
                offset += glyph.len() % 2;
            }
            offsets.push(offset as u32);
        }
        offsets
    }

    /// Serialize into a `glyf` and a `loca` table.
    pub fn write(&self, short: bool) -> (Vec<u8>, Vec<u8>) {
        let mut sub_glyf = Writer::new();
        let mut sub_loca = Writer::new();

        let mut write_offset = |offset: usize| {
            if short {
                sub_loca.write::<u16>((offset / 2) as u16);
            } else {
                sub_loca.write::<u32>(offset as u32);
            }
        };

        for glyph in &self.glyphs {
            write_offset(sub_glyf.len());
            sub_glyf.extend(glyph);

            if short {
                sub_glyf.align(2);
            }
        }

        // Write the final offset.
        write_offset(sub_glyf.len());

        (sub_glyf.finish(), sub_loca.finish())
    }

    /// The glyph IDs directly referenced by a glyph.
    pub fn components(&self, gid: u16) -> Result<Vec<u16>> {
        let glyph = self.glyphs.get(usize::from(gid)).ok_or(OVERRUN)?;
        let components = components(glyph)?;
        if components.iter().any(|&c| usize::from(c) >= self.glyphs.len()) {
            return Err(RangeCheck("composite glyph references a glyph outside of the font"));
        }
        Ok(components)
    }

    /// Whether a glyph is a composite glyph.
    pub fn is_composite(&self, gid: u16) -> bool {
        self.glyphs
            .get(usize::from(gid))
            .and_then(|g| Reader::new(g).read::<i16>())
            .is_some_and(|n| n < 0)
    }

    /// Extend a set of glyphs with all the glyphs they transitively
    /// reference. The result is sorted.
    pub fn closure(&self, seeds: impl IntoIterator<Item = u16>) -> Result<Vec<u16>> {
        let mut visited = FxHashSet::default();
        let mut worklist = vec![];

        for gid in seeds {
            if visited.insert(gid) {
                worklist.push(gid);
            }
        }

        while let Some(gid) = worklist.pop() {
            for component in self.components(gid)? {
                if visited.insert(component) {
                    worklist.push(component);
                }
            }
        }

        let mut glyphs: Vec<u16> = visited.into_iter().collect();
        glyphs.sort_unstable();
        Ok(glyphs)
    }
}

fn read_loca(loca: &[u8], short: bool, num_glyphs: u16) -> Result<Vec<u32>> {
    let mut r = Reader::new(loca);
    let count = usize::from(num_glyphs) + 1;
    let overrun = TableReadOverrun(Tag::LOCA);

    if short {
        let offsets = r.read_vector::<u16>(count).ok_or(overrun)?;
        Ok(offsets.into_iter().map(|o| 2 * u32::from(o)).collect())
    } else {
        r.read_vector::<u32>(count).ok_or(overrun)
    }
}

/// Parse the component glyph IDs of a glyph description. Simple and empty
/// glyphs have none.
fn components(glyph: &[u8]) -> Result<Vec<u16>> {
    let mut r = Reader::new(glyph);
    let mut components = vec![];

    if glyph.is_empty() || r.read::<i16>().ok_or(OVERRUN)? >= 0 {
        return Ok(components);
    }

    // Skip the bounding box.
    r.skip_bytes(8).ok_or(OVERRUN)?;

    loop {
        let flags = r.read::<u16>().ok_or(OVERRUN)?;
        components.push(r.read::<u16>().ok_or(OVERRUN)?);

        let mut skip = if flags & ARG_1_AND_2_ARE_WORDS != 0 { 4 } else { 2 };
        if flags & WE_HAVE_A_SCALE != 0 {
            skip += 2;
        } else if flags & WE_HAVE_AN_X_AND_Y_SCALE != 0 {
            skip += 4;
        } else if flags & WE_HAVE_A_TWO_BY_TWO != 0 {
            skip += 8;
        }
        r.skip_bytes(skip).ok_or(OVERRUN)?;

        if flags & MORE_COMPONENTS == 0 {
            break;
        }
    }

    Ok(components)
}
