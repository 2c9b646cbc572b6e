use std::collections::{BTreeMap, BTreeSet};

/// A remapper that allows to assign a new ordering to a subset of glyphs.
/// For example, let's say that we want to subset a font that only contains the
/// glyphs 4, 9 and 16. In this case, the remapper could yield a remapping
/// that assigns the following glyph IDs:
/// 0 -> 0 (The .notdef glyph will always be included)
/// 4 -> 1
/// 9 -> 2
/// 16 -> 3
/// This is necessary because a font needs to have a contiguous sequence of
/// glyph IDs that start from 0, so we cannot just reuse the old ones, but we
/// need to define a mapping.
#[derive(Debug, Clone)]
pub(crate) struct GlyphRemapper {
    /// Maps glyphs from their old ID to their new ID.
    forward: BTreeMap<u16, u16>,
    /// Maps glyphs from their new ID back to their old ID.
    backward: Vec<u16>,
}

impl GlyphRemapper {
    /// Create a new remapper that only contains `.notdef`.
    pub fn new() -> Self {
        let mut remapper = Self { forward: BTreeMap::new(), backward: Vec::new() };
        // .notdef is always a part of a subset.
        remapper.remap(0);
        remapper
    }

    /// Create a remapper from an existing set of glyphs. The method
    /// will ensure that the mapping is monotonically increasing.
    pub fn new_from_glyphs(glyphs: &[u16]) -> Self {
        let mut map = Self::new();
        for glyph in BTreeSet::from_iter(glyphs) {
            map.remap(*glyph);
        }
        map
    }

    /// Remap a glyph ID, or return the existing mapping if the
    /// glyph ID has already been remapped before.
    pub fn remap(&mut self, old: u16) -> u16 {
        let backward = &mut self.backward;
        *self.forward.entry(old).or_insert_with(|| {
            // There are at most 65536 distinct old IDs, so the new IDs fit.
            let new = backward.len() as u16;
            backward.push(old);
            new
        })
    }

    /// Get the mapping of a glyph ID, if it has been remapped before.
    pub fn get(&self, old: u16) -> Option<u16> {
        self.forward.get(&old).copied()
    }

    /// Get the number of glyphs that have been remapped.
    pub fn num_gids(&self) -> usize {
        self.backward.len()
    }

    /// Return an iterator that yields the old glyphs, in ascending order that
    /// is defined by the remapping. For example, if we perform the following remappings:
    /// 3, 39, 8, 3, 10, 2
    /// Then the iterator will yield the following items in the order below. The order
    /// also implicitly defines the glyph IDs in the new mapping:
    /// 0 (0), 3 (1), 39 (2), 8 (3), 10 (4), 2 (5)
    pub fn remapped_gids(&self) -> impl Iterator<Item = u16> + '_ {
        self.backward.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order() {
        let mut remapper = GlyphRemapper::new();
        for old in [3, 39, 8, 3, 10, 2] {
            remapper.remap(old);
        }
        assert_eq!(remapper.remapped_gids().collect::<Vec<_>>(), vec![0, 3, 39, 8, 10, 2]);
        assert_eq!(remapper.get(8), Some(3));
        assert_eq!(remapper.get(9), None);
        assert_eq!(remapper.num_gids(), 6);
    }

    #[test]
    fn from_glyphs_is_monotonic() {
        let remapper = GlyphRemapper::new_from_glyphs(&[16, 4, 9, 4]);
        assert_eq!(remapper.remapped_gids().collect::<Vec<_>>(), vec![0, 4, 9, 16]);
        assert_eq!(remapper.get(16), Some(3));
    }
}
