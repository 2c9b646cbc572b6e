//! The `post` table holds PostScript printing information and, depending on
//! its version, the names of the glyphs.

mod macintosh;
mod read;
mod subset;

pub(crate) use self::macintosh::MACINTOSH_NAMES;

use crate::stream::{Writeable, Writer};

pub(crate) const VERSION_1_0: u32 = 0x00010000;
pub(crate) const VERSION_2_0: u32 = 0x00020000;
pub(crate) const VERSION_2_5: u32 = 0x00025000;
pub(crate) const VERSION_3_0: u32 = 0x00030000;

/// The fields shared by all versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PostHeader {
    pub version: u32,
    pub italic_angle: i32,
    pub underline_position: i16,
    pub underline_thickness: i16,
    pub is_fixed_pitch: u32,
    pub min_mem_type42: u32,
    pub max_mem_type42: u32,
    pub min_mem_type1: u32,
    pub max_mem_type1: u32,
}

/// How glyph names are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Names {
    /// Version 1.0: the glyphs are exactly the standard Macintosh glyphs.
    Macintosh,
    /// Version 2.0: a name index per glyph. Indices below 258 refer to the
    /// standard names, the others to the custom `names`.
    Indexed { indices: Vec<u16>, names: Vec<Vec<u8>> },
    /// Version 2.5: per-glyph offsets into the standard order.
    Offsets(Vec<i8>),
    /// Version 3.0 and unknown versions: no names.
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Post {
    pub header: PostHeader,
    pub names: Names,
}

impl Post {
    /// The name of a glyph, if the table stores one.
    pub fn glyph_name(&self, gid: u16) -> Option<&str> {
        let gid = usize::from(gid);
        match &self.names {
            Names::Macintosh => MACINTOSH_NAMES.get(gid).copied(),
            Names::Indexed { indices, names } => {
                let index = usize::from(*indices.get(gid)?);
                if let Some(name) = MACINTOSH_NAMES.get(index) {
                    Some(name)
                } else {
                    std::str::from_utf8(names.get(index - MACINTOSH_NAMES.len())?).ok()
                }
            }
            Names::Offsets(offsets) => {
                let index = gid.checked_add_signed(isize::from(*offsets.get(gid)?))?;
                MACINTOSH_NAMES.get(index).copied()
            }
            Names::None => None,
        }
    }
}

impl Writeable for Post {
    fn write(&self, w: &mut Writer) {
        let version = match self.names {
            Names::Macintosh => VERSION_1_0,
            Names::Indexed { .. } => VERSION_2_0,
            Names::Offsets(_) => VERSION_2_5,
            Names::None => VERSION_3_0,
        };

        let header = &self.header;
        w.write::<u32>(version);
        w.write::<i32>(header.italic_angle);
        w.write::<i16>(header.underline_position);
        w.write::<i16>(header.underline_thickness);
        w.write::<u32>(header.is_fixed_pitch);
        w.write::<u32>(header.min_mem_type42);
        w.write::<u32>(header.max_mem_type42);
        w.write::<u32>(header.min_mem_type1);
        w.write::<u32>(header.max_mem_type1);

        match &self.names {
            Names::Macintosh | Names::None => {}
            Names::Indexed { indices, names } => {
                w.write::<u16>(indices.len() as u16);
                w.write_slice(indices);
                for name in names {
                    w.write::<u8>(name.len() as u8);
                    w.extend(name);
                }
            }
            Names::Offsets(offsets) => {
                w.write::<u16>(offsets.len() as u16);
                w.write_slice(offsets);
            }
        }
    }
}
