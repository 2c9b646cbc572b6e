use super::*;
use crate::stream::Reader;
use crate::Error::{RangeCheck, TableReadOverrun};
use crate::{Error, Result, Tag};

const OVERRUN: Error = TableReadOverrun(Tag::POST);

/// Indices above this are reserved and name nothing.
const MAX_NAME_INDEX: u16 = 32767;

impl Post {
    pub fn parse(data: &[u8], num_glyphs: u16) -> Result<Self> {
        let mut r = Reader::new(data);
        let header = PostHeader {
            version: r.read::<u32>().ok_or(OVERRUN)?,
            italic_angle: r.read::<i32>().ok_or(OVERRUN)?,
            underline_position: r.read::<i16>().ok_or(OVERRUN)?,
            underline_thickness: r.read::<i16>().ok_or(OVERRUN)?,
            is_fixed_pitch: r.read::<u32>().ok_or(OVERRUN)?,
            min_mem_type42: r.read::<u32>().ok_or(OVERRUN)?,
            max_mem_type42: r.read::<u32>().ok_or(OVERRUN)?,
            min_mem_type1: r.read::<u32>().ok_or(OVERRUN)?,
            max_mem_type1: r.read::<u32>().ok_or(OVERRUN)?,
        };

        let names = match header.version {
            VERSION_1_0 => {
                if usize::from(num_glyphs) != MACINTOSH_NAMES.len() {
                    return Err(RangeCheck("post 1.0 requires exactly 258 glyphs"));
                }
                Names::Macintosh
            }
            VERSION_2_0 => read_indexed(&mut r, num_glyphs)?,
            VERSION_2_5 => {
                read_num_glyphs(&mut r, num_glyphs)?;
                Names::Offsets(r.read_vector::<i8>(usize::from(num_glyphs)).ok_or(OVERRUN)?)
            }
            VERSION_3_0 => Names::None,
            version => {
                log::warn!("unknown post table version {version:#010x}, dropping glyph names");
                Names::None
            }
        };

        Ok(Self { header, names })
    }
}

fn read_num_glyphs(r: &mut Reader, num_glyphs: u16) -> Result<()> {
    if r.read::<u16>().ok_or(OVERRUN)? != num_glyphs {
        return Err(RangeCheck("post.numGlyphs must match maxp.numGlyphs"));
    }
    Ok(())
}

fn read_indexed(r: &mut Reader, num_glyphs: u16) -> Result<Names> {
    read_num_glyphs(r, num_glyphs)?;
    let mut indices = r.read_vector::<u16>(usize::from(num_glyphs)).ok_or(OVERRUN)?;

    // Glyph names are stored as Pascal strings, until the end of the table.
    let mut names = vec![];
    while !r.at_end() {
        let Some(len) = r.read::<u8>() else { break };
        let Some(name) = r.read_bytes(usize::from(len)) else { break };
        names.push(name.to_vec());
    }

    let standard = MACINTOSH_NAMES.len();
    for index in &mut indices {
        if *index > MAX_NAME_INDEX {
            // Reserved, treat as an empty custom name.
            *index = (standard + names.len()) as u16;
            names.push(vec![]);
        } else if usize::from(*index) >= standard + names.len() {
            return Err(RangeCheck("post name index refers to a missing name"));
        }
    }

    Ok(Names::Indexed { indices, names })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::Writer;

    fn header(version: u32) -> PostHeader {
        PostHeader {
            version,
            italic_angle: -12 << 16,
            underline_position: -100,
            underline_thickness: 50,
            is_fixed_pitch: 0,
            min_mem_type42: 0,
            max_mem_type42: 0,
            min_mem_type1: 0,
            max_mem_type1: 0,
        }
    }

    fn write(post: &Post) -> Vec<u8> {
        let mut w = Writer::new();
        w.write(post);
        w.finish()
    }

    #[test]
    fn version_2_names() {
        let post = Post {
            header: header(VERSION_2_0),
            names: Names::Indexed {
                indices: vec![0, 258, 36, 259],
                names: vec![b"alpha".to_vec(), b"beta".to_vec()],
            },
        };
        let data = write(&post);
        assert_eq!(data.len(), 32 + 2 + 8 + 6 + 5);

        let parsed = Post::parse(&data, 4).unwrap();
        assert_eq!(parsed, post);
        assert_eq!(parsed.glyph_name(0), Some(".notdef"));
        assert_eq!(parsed.glyph_name(1), Some("alpha"));
        assert_eq!(parsed.glyph_name(2), Some("A"));
        assert_eq!(parsed.glyph_name(3), Some("beta"));
        assert_eq!(parsed.glyph_name(4), None);
    }

    #[test]
    fn version_2_rejects_bad_counts_and_indices() {
        let post = Post {
            header: header(VERSION_2_0),
            names: Names::Indexed { indices: vec![0, 260], names: vec![b"a".to_vec()] },
        };
        let data = write(&post);
        assert!(matches!(Post::parse(&data, 2), Err(RangeCheck(_))));
        assert!(matches!(Post::parse(&data, 3), Err(RangeCheck(_))));
    }

    #[test]
    fn version_1_and_2_5() {
        let data = write(&Post { header: header(VERSION_1_0), names: Names::Macintosh });
        assert_eq!(data.len(), 32);
        assert_eq!(Post::parse(&data, 258).unwrap().glyph_name(257), Some("dcroat"));
        assert!(matches!(Post::parse(&data, 5), Err(RangeCheck(_))));

        let post = Post { header: header(VERSION_2_5), names: Names::Offsets(vec![0, 1, 0]) };
        let parsed = Post::parse(&write(&post), 3).unwrap();
        assert_eq!(parsed.glyph_name(1), Some("nonmarkingreturn"));
        assert_eq!(parsed.glyph_name(2), Some("nonmarkingreturn"));
    }

    #[test]
    fn unknown_version_is_written_as_3() {
        let data = write(&Post { header: header(0x00040000), names: Names::None });
        let parsed = Post::parse(&data, 10).unwrap();
        assert_eq!(parsed.names, Names::None);
        assert_eq!(&write(&parsed)[..4], &[0, 3, 0, 0]);
        assert!(matches!(Post::parse(&data[..20], 10), Err(TableReadOverrun(Tag::POST))));
    }
}
