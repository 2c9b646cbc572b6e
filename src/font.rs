//! The in-memory model of a whole font, and how it is read from and written
//! to an sfnt file.

use crate::cmap::{Cmap, SubtableInfo};
use crate::directory::{FontKind, OffsetTable, TableDirectory, TableRecord};
use crate::glyf::Glyf;
use crate::head::{Head, CHECKSUM_ADJUSTMENT_OFFSET, LOCA_LONG, LOCA_SHORT};
use crate::hhea::Hhea;
use crate::hmtx::Hmtx;
use crate::maxp::Maxp;
use crate::name::Name;
use crate::post::{Names, Post, MACINTOSH_NAMES};
use crate::stream::{Readable, Writeable, Writer};
use crate::Error::{RangeCheck, RequiredFieldMissing, UnsupportedVersion};
use crate::{checksum, Result, Tag, CHECKSUM_MAGIC};
use std::collections::BTreeMap;
use std::io;
use std::path::Path;

/// The cmap subtables consulted when looking up characters, in order of
/// preference.
const LOOKUP_ORDER: [(u16, u16); 4] = [(3, 1), (1, 0), (0, 3), (3, 10)];

/// A parsed TrueType font.
///
/// All tables that are understood are fully decoded; all other tables are
/// carried along as opaque bytes. Cloning a font copies all of its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    pub(crate) kind: FontKind,
    pub(crate) head: Head,
    pub(crate) maxp: Maxp,
    pub(crate) hhea: Option<Hhea>,
    pub(crate) hmtx: Option<Hmtx>,
    pub(crate) glyf: Option<Glyf>,
    pub(crate) cmap: Option<Cmap>,
    pub(crate) post: Option<Post>,
    pub(crate) name: Option<Name>,
    /// Tables that are passed through unchanged, in directory order.
    pub(crate) tables: Vec<(Tag, Vec<u8>)>,
}

/// The result of looking up characters in a font.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuneLookup {
    /// The glyphs of all found characters plus `.notdef`, sorted and free of
    /// duplicates.
    pub glyphs: Vec<u16>,
    /// For each entry of `glyphs`, a character that maps to it, or `'\0'`
    /// for glyphs that no requested character maps to.
    pub runes: Vec<char>,
    /// The characters that no cmap subtable maps.
    pub unmatched: Vec<char>,
    /// The glyph of every found character.
    pub mapping: BTreeMap<char, u16>,
}

impl Font {
    /// Parse a font from a file.
    ///
    /// Collections are supported with [`Font::parse_at`].
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::parse_at(data, 0)
    }

    /// Parse the font at `index` of a font collection. For fonts that are no
    /// collection, `index` should be 0.
    pub fn parse_at(data: &[u8], index: u32) -> Result<Self> {
        let directory = TableDirectory::parse(data, index)?;
        let table = |tag| directory.table(data, tag);

        let head = Head::parse(table(Tag::HEAD).ok_or(RequiredFieldMissing(Tag::HEAD))?)?;
        let maxp = Maxp::parse(table(Tag::MAXP).ok_or(RequiredFieldMissing(Tag::MAXP))?)?;
        let num_glyphs = maxp.num_glyphs;

        let hhea = table(Tag::HHEA).map(|data| Hhea::parse(data, num_glyphs)).transpose()?;
        let hmtx = match (table(Tag::HMTX), &hhea) {
            (Some(data), Some(hhea)) => {
                Some(Hmtx::parse(data, hhea.number_of_h_metrics, num_glyphs)?)
            }
            (Some(_), None) => return Err(RequiredFieldMissing(Tag::HHEA)),
            (None, _) => None,
        };

        let glyf = match (table(Tag::GLYF), table(Tag::LOCA)) {
            (Some(glyf), Some(loca)) => {
                Some(Glyf::parse(glyf, loca, head.short_loca(), num_glyphs)?)
            }
            (Some(_), None) => return Err(RequiredFieldMissing(Tag::LOCA)),
            (None, Some(_)) => return Err(RequiredFieldMissing(Tag::GLYF)),
            (None, None) => None,
        };

        let cmap = table(Tag::CMAP).map(|data| Cmap::parse(data, num_glyphs)).transpose()?;
        let post = table(Tag::POST).map(|data| Post::parse(data, num_glyphs)).transpose()?;

        let mut tables = vec![];
        let name = match table(Tag::NAME).map(Name::parse) {
            Some(Ok(name)) => Some(name),
            Some(Err(UnsupportedVersion { version, .. })) => {
                log::warn!("name table version {version} is not supported, keeping it as is");
                None
            }
            Some(Err(err)) => return Err(err),
            None => None,
        };

        for record in &directory.records {
            let known = [
                Tag::HEAD,
                Tag::MAXP,
                Tag::HHEA,
                Tag::HMTX,
                Tag::GLYF,
                Tag::LOCA,
                Tag::CMAP,
                Tag::POST,
            ];
            if known.contains(&record.tag) || (record.tag == Tag::NAME && name.is_some()) {
                continue;
            }

            if tables.iter().any(|(tag, _)| *tag == record.tag) {
                continue;
            }

            if let Some(data) = table(record.tag) {
                tables.push((record.tag, data.to_vec()));
            }
        }

        Ok(Self {
            kind: directory.offset_table.kind,
            head,
            maxp,
            hhea,
            hmtx,
            glyf,
            cmap,
            post,
            name,
            tables,
        })
    }

    /// Read and parse a font file.
    pub fn parse_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::parse(&data)
    }

    /// The number of glyphs in the font.
    pub fn num_glyphs(&self) -> u16 {
        self.maxp.num_glyphs
    }

    /// The number of font design units per em.
    pub fn units_per_em(&self) -> u16 {
        self.head.units_per_em
    }

    /// The `loca` format the font is written with: 0 for short offsets, 1 for
    /// long offsets.
    pub fn index_to_loc_format(&self) -> i16 {
        if self.short_loca() {
            LOCA_SHORT
        } else {
            LOCA_LONG
        }
    }

    /// The number of explicit horizontal metrics.
    pub fn number_of_h_metrics(&self) -> Option<u16> {
        Some(self.hmtx.as_ref()?.number_of_h_metrics())
    }

    /// The raw `glyf` data of a glyph.
    pub fn glyph_data(&self, gid: u16) -> Option<&[u8]> {
        self.glyf.as_ref()?.glyphs.get(usize::from(gid)).map(Vec::as_slice)
    }

    /// The `numGlyphs + 1` glyph offsets as the `loca` table is written.
    pub fn loca_offsets(&self) -> Option<Vec<u32>> {
        Some(self.glyf.as_ref()?.offsets(self.short_loca()))
    }

    /// The PostScript name of a glyph, if the `post` table has one.
    pub fn glyph_name(&self, gid: u16) -> Option<&str> {
        self.post.as_ref()?.glyph_name(gid)
    }

    /// The advance width and left side bearing of a glyph.
    pub fn horizontal_metrics(&self, gid: u16) -> Option<(u16, i16)> {
        if gid >= self.num_glyphs() {
            return None;
        }
        self.hmtx.as_ref()?.metric(gid)
    }

    /// The tags of all tables, sorted.
    pub fn table_tags(&self) -> Vec<Tag> {
        let mut tags = vec![Tag::HEAD, Tag::MAXP];
        let optional = [
            (Tag::HHEA, self.hhea.is_some()),
            (Tag::HMTX, self.hmtx.is_some()),
            (Tag::GLYF, self.glyf.is_some()),
            (Tag::LOCA, self.glyf.is_some()),
            (Tag::CMAP, self.cmap.is_some()),
            (Tag::POST, self.post.is_some()),
            (Tag::NAME, self.name.is_some()),
        ];
        tags.extend(optional.into_iter().filter(|&(_, present)| present).map(|(tag, _)| tag));
        tags.extend(self.tables.iter().map(|(tag, _)| *tag));
        tags.sort();
        tags
    }

    /// Whether the font has a table.
    pub fn has_table(&self, tag: Tag) -> bool {
        self.table_tags().contains(&tag)
    }

    /// Summaries of the cmap subtables, in file order.
    pub fn cmap_subtables(&self) -> Vec<SubtableInfo> {
        self.cmap.iter().flat_map(|cmap| cmap.iter().map(|s| s.info())).collect()
    }

    /// The character map of the subtable with the given platform and encoding.
    pub fn get_cmap(&self, platform_id: u16, encoding_id: u16) -> Option<BTreeMap<char, u16>> {
        Some(self.cmap.as_ref()?.get(platform_id, encoding_id)?.runes())
    }

    /// Look up the glyphs of some characters.
    ///
    /// Each character is looked up in the (3, 1), (1, 0), (0, 3) and (3, 10)
    /// subtables, in that order, and the first match wins. `.notdef` is always
    /// part of the result.
    pub fn lookup_runes(&self, runes: &[char]) -> RuneLookup {
        let mut runes = runes.to_vec();
        runes.sort_unstable();
        runes.dedup();

        let maps: Vec<_> = match &self.cmap {
            Some(cmap) => LOOKUP_ORDER
                .iter()
                .filter_map(|&(platform_id, encoding_id)| cmap.get(platform_id, encoding_id))
                .collect(),
            None => vec![],
        };

        let mut lookup = RuneLookup::default();
        let mut representatives = BTreeMap::from([(0, '\0')]);

        for rune in runes {
            match maps.iter().find_map(|subtable| subtable.mapping.get(&u32::from(rune))) {
                Some(&gid) => {
                    lookup.mapping.insert(rune, gid);
                    representatives.entry(gid).or_insert(rune);
                }
                None => lookup.unmatched.push(rune),
            }
        }

        lookup.glyphs = representatives.keys().copied().collect();
        lookup.runes = representatives.values().copied().collect();

        log::debug!("looked up glyphs {:?} for {:?}", lookup.glyphs, lookup.runes);
        if !lookup.unmatched.is_empty() {
            log::debug!("no glyphs for {:?}", lookup.unmatched);
        }

        lookup
    }

    /// Serialize the font into a writer.
    pub fn write(&self, mut w: impl io::Write) -> Result<()> {
        w.write_all(&self.to_vec()?)?;
        Ok(())
    }

    /// Serialize the font into a file.
    pub fn write_file(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_vec()?)?;
        Ok(())
    }

    /// Serialize the font. All offsets, lengths and checksums are
    /// recalculated.
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        self.check_consistency()?;

        fn encode(table: impl Writeable) -> Vec<u8> {
            let mut w = Writer::new();
            w.write(table);
            w.finish()
        }

        let mut tables = vec![];
        let mut head = self.head.clone();
        head.checksum_adjustment = 0;

        if let Some(glyf) = &self.glyf {
            let short = self.short_loca();
            if head.short_loca() && !short {
                log::debug!("glyph data too large for short loca offsets, using long ones");
            }
            head.index_to_loc_format = self.index_to_loc_format();

            let (glyf_data, loca_data) = glyf.write(short);
            tables.push((Tag::GLYF, glyf_data));
            tables.push((Tag::LOCA, loca_data));
        }

        tables.push((Tag::HEAD, encode(&head)));
        tables.push((Tag::MAXP, encode(&self.maxp)));

        if let Some(hhea) = &self.hhea {
            let mut hhea = hhea.clone();
            if let Some(hmtx) = &self.hmtx {
                hhea.number_of_h_metrics = hmtx.number_of_h_metrics();
            }
            tables.push((Tag::HHEA, encode(&hhea)));
        }

        if let Some(hmtx) = &self.hmtx {
            tables.push((Tag::HMTX, encode(hmtx)));
        }

        if let Some(cmap) = &self.cmap {
            tables.push((Tag::CMAP, encode(cmap)));
        }

        if let Some(post) = &self.post {
            tables.push((Tag::POST, encode(post)));
        }

        if let Some(name) = &self.name {
            tables.push((Tag::NAME, encode(name)));
        }

        tables.extend(self.tables.iter().cloned());

        Ok(construct(self.kind, tables))
    }

    /// Whether the `loca` table is written with short offsets.
    fn short_loca(&self) -> bool {
        self.head.short_loca() && !self.glyf.as_ref().is_some_and(Glyf::needs_long_loca)
    }

    /// Make sure that all tables agree on the number of glyphs.
    fn check_consistency(&self) -> Result<()> {
        let num_glyphs = usize::from(self.num_glyphs());

        if self.glyf.as_ref().is_some_and(|glyf| glyf.len() != num_glyphs) {
            return Err(RangeCheck("glyf glyph count must match maxp.numGlyphs"));
        }

        if let Some(hmtx) = &self.hmtx {
            if hmtx.len() != num_glyphs {
                return Err(RangeCheck("hmtx glyph count must match maxp.numGlyphs"));
            }
            if hmtx.metrics.is_empty() && num_glyphs > 0 {
                return Err(RangeCheck("hmtx must have at least one full metric"));
            }
        }

        let names_ok = match self.post.as_ref().map(|post| &post.names) {
            Some(Names::Macintosh) => num_glyphs == MACINTOSH_NAMES.len(),
            Some(Names::Indexed { indices, .. }) => indices.len() == num_glyphs,
            Some(Names::Offsets(offsets)) => offsets.len() == num_glyphs,
            Some(Names::None) | None => true,
        };
        if !names_ok {
            return Err(RangeCheck("post glyph count must match maxp.numGlyphs"));
        }

        Ok(())
    }
}

/// Construct a font file from its tables.
fn construct(kind: FontKind, mut tables: Vec<(Tag, Vec<u8>)>) -> Vec<u8> {
    let mut w = Writer::new();

    // Tables shall be sorted by tag.
    tables.sort_by_key(|&(tag, _)| tag);

    // Write table directory.
    w.write(OffsetTable::new(kind, tables.len() as u16));

    // This variable will hold the offset to the checksum adjustment field
    // in the head table, which we'll have to write in the end (after
    // checksumming the whole font).
    let mut checksum_adjustment_offset = None;

    // Write table records.
    let mut offset = 12 + tables.len() * TableRecord::SIZE;
    for (tag, data) in &tables {
        if *tag == Tag::HEAD {
            checksum_adjustment_offset = Some(offset + CHECKSUM_ADJUSTMENT_OFFSET);
        }

        let len = data.len();
        w.write(TableRecord {
            tag: *tag,
            checksum: checksum(data),
            offset: offset as u32,
            length: len as u32,
        });

        // Increase offset, plus padding zeros to align to 4 bytes.
        offset += len;
        while offset % 4 != 0 {
            offset += 1;
        }
    }

    // Write tables.
    for (_, data) in &tables {
        // Write data plus padding zeros to align to 4 bytes.
        w.extend(data);
        w.align(4);
    }

    // Write checksum adjustment field in head table.
    let mut data = w.finish();
    if let Some(i) = checksum_adjustment_offset {
        let sum = checksum(&data);
        let val = CHECKSUM_MAGIC.wrapping_sub(sum);
        data[i..i + 4].copy_from_slice(&val.to_be_bytes());
    }

    data
}
