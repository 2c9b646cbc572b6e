/*!
Parses, validates and subsets TrueType fonts.

A [`Font`] is a fully decoded, owned model of an sfnt file. Every subsetting
operation returns a new `Font` whose tables are consistent with each other
(`maxp`, `hhea`, `hmtx`, `loca`, `glyf`, `cmap` and `post` all agree on the
number and order of glyphs), and [`Font::write`] recomputes every offset,
length and checksum from the model.

# Example
Keep only the glyphs needed to render "Hello" and write the result:

```no_run
use subfont::{validate_bytes, Font};

# fn main() -> Result<(), Box<dyn std::error::Error>> {
let font = Font::parse_file("fonts/NotoSans-Regular.ttf")?;
let runes: Vec<char> = "Hello".chars().collect();

// Glyphs are renumbered densely, starting with `.notdef`.
let sub = font.subset(&runes)?;
let data = sub.to_vec()?;
validate_bytes(&data)?;
std::fs::write("target/Noto-Hello.ttf", data)?;
# Ok(())
# }
```

There are three ways to subset a font:
- [`Font::subset`] keeps exactly the glyphs of some characters and renumbers
  them. Components of composite glyphs are not followed.
- [`Font::subset_keep_indices`] and [`Font::subset_keep_runes`] keep glyph
  numbering intact and only empty the outlines of unused glyphs, following
  composite glyph components.
- [`Font::subset_first`] truncates the font to its first `n` glyphs.
*/

#![deny(unsafe_code)]
#![deny(missing_docs)]

mod cmap;
mod directory;
mod font;
mod glyf;
mod head;
mod hhea;
mod hmtx;
mod maxp;
mod name;
mod post;
mod remapper;
mod stream;
mod subset;
mod validate;

pub use crate::cmap::{CmapFormat, SubtableInfo};
pub use crate::font::{Font, RuneLookup};
pub use crate::validate::{validate_bytes, validate_file};

use std::fmt::{self, Debug, Display, Formatter};

/// Calculate a checksum over the sliced data as a sum of u32s. If the data
/// length is not a multiple of four, it is treated as if padded with zero to a
/// length that is a multiple of four.
pub(crate) fn checksum(data: &[u8]) -> u32 {
    let mut sum = 0u32;
    for chunk in data.chunks(4) {
        let mut bytes = [0; 4];
        bytes[..chunk.len()].copy_from_slice(chunk);
        sum = sum.wrapping_add(u32::from_be_bytes(bytes));
    }
    sum
}

/// The value the checksum of a whole font file must add up to.
pub(crate) const CHECKSUM_MAGIC: u32 = 0xB1B0AFBA;

/// A 4-byte OpenType tag.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Tag(pub [u8; 4]);

impl Tag {
    // General tables.
    pub(crate) const CMAP: Self = Self(*b"cmap");
    pub(crate) const HEAD: Self = Self(*b"head");
    pub(crate) const HHEA: Self = Self(*b"hhea");
    pub(crate) const HMTX: Self = Self(*b"hmtx");
    pub(crate) const MAXP: Self = Self(*b"maxp");
    pub(crate) const NAME: Self = Self(*b"name");
    pub(crate) const POST: Self = Self(*b"post");

    // TrueType.
    pub(crate) const GLYF: Self = Self(*b"glyf");
    pub(crate) const LOCA: Self = Self(*b"loca");

    /// Create a tag from its four bytes.
    pub const fn new(tag: &[u8; 4]) -> Self {
        Self(*tag)
    }
}

impl Debug for Tag {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "Tag({self})")
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.pad(std::str::from_utf8(&self.0).unwrap_or("..."))
    }
}

/// The result type for everything.
pub type Result<T> = std::result::Result<T, Error>;

/// Parsing, subsetting, writing or validating a font failed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The file does not start with a known sfnt version or collection tag.
    #[error("unknown font kind")]
    UnknownKind,
    /// The file ended before the offset table or table directory did.
    #[error("missing more data")]
    MissingData,
    /// A mandatory table is absent, or a table depends on another one that is
    /// absent (e.g. `glyf` without `loca`).
    #[error("missing required {0} table")]
    RequiredFieldMissing(Tag),
    /// A count, version or index is inconsistent with another value.
    #[error("range check failed: {0}")]
    RangeCheck(&'static str),
    /// A read would have crossed the boundary of the table it belongs to.
    #[error("read outside of {0} table")]
    TableReadOverrun(Tag),
    /// The stored checksum of a table does not match its contents.
    #[error("checksum mismatch in {0} table")]
    ChecksumMismatch(Tag),
    /// The whole-file checksum does not match `head.checksumAdjustment`.
    #[error("file checksum mismatch")]
    FileChecksumMismatch,
    /// A structurally required table has a version this crate cannot read.
    #[error("unsupported {tag} table version {version:#010x}")]
    UnsupportedVersion {
        /// The table with the unknown version.
        tag: Tag,
        /// The version as stored in the font.
        version: u32,
    },
    /// Reading or writing a file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
