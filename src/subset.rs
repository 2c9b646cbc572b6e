//! Subsetting a font. There are three strategies:
//! 1. Keep exactly the glyphs of some characters and give them new, dense
//!    glyph IDs. Components of composite glyphs are not followed.
//! 2. Keep the glyph IDs intact and only empty the descriptions of glyphs
//!    that are not needed. Here, the components of composite glyphs are kept
//!    as well.
//! 3. Drop all glyphs from some glyph ID on.
//!
//! Every strategy produces a new font in which `maxp`, `hhea`, `hmtx`,
//! `glyf`/`loca`, `cmap` and `post` agree on the glyphs.

use crate::glyf::Glyf;
use crate::remapper::GlyphRemapper;
use crate::Error::{RangeCheck, RequiredFieldMissing};
use crate::{Font, Result, RuneLookup, Tag};
use std::collections::BTreeMap;

impl Font {
    /// Keep only the glyphs of `runes` (and `.notdef`) and renumber them
    /// densely, in the order of their old glyph IDs.
    ///
    /// Every format 4 and 12 cmap subtable maps exactly the found characters
    /// afterwards, other cmap subtables are dropped. Characters without a
    /// glyph are skipped with a warning. Use [`Font::subset_with_lookup`] to
    /// find out which ones.
    pub fn subset(&self, runes: &[char]) -> Result<Font> {
        self.subset_with_lookup(runes).map(|(font, _)| font)
    }

    /// Like [`Font::subset`], but also returns the lookup of `runes`, whose
    /// `unmatched` field lists the characters without a glyph.
    pub fn subset_with_lookup(&self, runes: &[char]) -> Result<(Font, RuneLookup)> {
        let glyf = self.glyf.as_ref().ok_or(RequiredFieldMissing(Tag::GLYF))?;

        let lookup = self.lookup_runes(runes);
        if !lookup.unmatched.is_empty() {
            log::warn!("no glyphs found for {:?}", lookup.unmatched);
        }

        let remapper = GlyphRemapper::new_from_glyphs(&lookup.glyphs);
        let old_gids: Vec<u16> = remapper.remapped_gids().collect();

        let mut glyphs = Vec::with_capacity(old_gids.len());
        for &gid in &old_gids {
            if glyf.is_composite(gid) {
                log::warn!("keeping composite glyph {gid} without its components");
            }
            let glyph = glyf.glyphs.get(usize::from(gid));
            glyphs.push(glyph.ok_or(RangeCheck("glyph index outside of font"))?.clone());
        }

        let mut font = self.clone();
        font.maxp.num_glyphs = remapper.num_gids() as u16;
        font.glyf = Some(Glyf { glyphs });

        if let Some(hmtx) = &self.hmtx {
            let mut hmtx = hmtx.select(old_gids.iter().copied())?;
            hmtx.optimize();
            font.hmtx = Some(hmtx);
        }

        if let Some(cmap) = &self.cmap {
            let mut mapping: BTreeMap<u32, u16> = lookup
                .mapping
                .iter()
                .filter_map(|(&rune, &gid)| Some((u32::from(rune), remapper.get(gid)?)))
                .collect();
            mapping.entry(0).or_insert(0);
            font.cmap = Some(cmap.rebuild(&mapping));
        }

        font.post = self.post.as_ref().map(|post| post.subset(old_gids.iter().copied()));
        font.name = self.name.as_ref().map(|name| name.subset());
        font.sync_hhea();

        Ok((font, lookup))
    }

    /// Keep the glyphs of `runes` while preserving all glyph IDs. See
    /// [`Font::subset_keep_indices`].
    pub fn subset_keep_runes(&self, runes: &[char]) -> Result<Font> {
        let lookup = self.lookup_runes(runes);
        self.subset_keep_indices(&lookup.glyphs)
    }

    /// Keep the glyphs with the given IDs, `.notdef` and all glyphs they
    /// reference while preserving all glyph IDs. The descriptions of all other
    /// glyphs are emptied, and glyphs after the last kept one are dropped.
    pub fn subset_keep_indices(&self, indices: &[u16]) -> Result<Font> {
        let glyf = self.glyf.as_ref().ok_or(RequiredFieldMissing(Tag::GLYF))?;

        if indices.iter().any(|&gid| gid >= self.num_glyphs()) {
            return Err(RangeCheck("glyph index outside of font"));
        }

        let keep = glyf.closure(indices.iter().copied().chain([0]))?;
        log::debug!("keeping {} of {} glyphs", keep.len(), self.num_glyphs());

        let glyphs = glyf
            .glyphs
            .iter()
            .enumerate()
            .map(|(gid, glyph)| {
                if keep.binary_search(&(gid as u16)).is_ok() {
                    glyph.clone()
                } else {
                    vec![]
                }
            })
            .collect();

        let mut font = self.clone();
        font.glyf = Some(Glyf { glyphs });

        let last = keep.last().copied().unwrap_or(0);
        font.subset_first(last + 1)
    }

    /// Keep only the first `num_glyphs` glyphs.
    ///
    /// Does not check whether the kept glyphs reference dropped ones.
    pub fn subset_first(&self, num_glyphs: u16) -> Result<Font> {
        if num_glyphs == 0 {
            return Err(RangeCheck("cannot drop the .notdef glyph"));
        }

        if num_glyphs >= self.num_glyphs() {
            log::debug!("font already has at most {num_glyphs} glyphs");
            return Ok(self.clone());
        }

        let mut font = self.clone();
        font.maxp.num_glyphs = num_glyphs;

        if let Some(glyf) = &mut font.glyf {
            glyf.glyphs.truncate(usize::from(num_glyphs));
        }

        if let Some(hmtx) = &self.hmtx {
            let mut hmtx = hmtx.select(0..num_glyphs)?;
            hmtx.optimize();
            font.hmtx = Some(hmtx);
        }

        font.cmap = self.cmap.as_ref().map(|cmap| cmap.truncate(num_glyphs));
        font.post = self.post.as_ref().map(|post| post.subset(0..num_glyphs));
        font.sync_hhea();

        Ok(font)
    }

    /// Remove optional tables. Supported are `"cmap"`, `"post"` and
    /// `"name"`; other names are ignored.
    pub fn prune_tables(&mut self, tables: &[&str]) {
        for &table in tables {
            match table {
                "cmap" => self.cmap = None,
                "post" => self.post = None,
                "name" => self.name = None,
                _ => log::warn!("cannot prune unsupported table {table:?}"),
            }
        }
    }

    /// Collapse trailing horizontal metrics with equal advance widths.
    pub fn optimize(&mut self) {
        if let Some(hmtx) = &mut self.hmtx {
            hmtx.optimize();
        }
        self.sync_hhea();
    }

    /// Update `hhea.numberOfHMetrics` after the glyphs changed.
    fn sync_hhea(&mut self) {
        let Some(hhea) = &mut self.hhea else { return };
        hhea.number_of_h_metrics = match &self.hmtx {
            Some(hmtx) => hmtx.number_of_h_metrics(),
            None => hhea.number_of_h_metrics.min(self.maxp.num_glyphs),
        };
    }
}
