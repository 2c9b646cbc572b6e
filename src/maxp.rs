use crate::stream::{Reader, Writeable, Writer};
use crate::Error::{TableReadOverrun, UnsupportedVersion};
use crate::{Error, Result, Tag};

const OVERRUN: Error = TableReadOverrun(Tag::MAXP);

/// Version 0.5, only carries the number of glyphs.
const VERSION_0_5: u32 = 0x00005000;
/// Version 1.0, followed by the TrueType profile.
const VERSION_1_0: u32 = 0x00010000;
/// The TrueType profile fields of version 1.0 after `numGlyphs`.
const PROFILE_LEN: usize = 26;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Maxp {
    pub version: u32,
    pub num_glyphs: u16,
    /// The maxPoints .. maxComponentDepth fields of version 1.0, carried over
    /// as is.
    pub profile: Vec<u8>,
}

impl Maxp {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut r = Reader::new(data);
        let version = r.read::<u32>().ok_or(OVERRUN)?;
        let num_glyphs = r.read::<u16>().ok_or(OVERRUN)?;

        let profile = match version {
            VERSION_0_5 => vec![],
            VERSION_1_0 => r.read_bytes(PROFILE_LEN).ok_or(OVERRUN)?.to_vec(),
            _ => return Err(UnsupportedVersion { tag: Tag::MAXP, version }),
        };

        Ok(Self { version, num_glyphs, profile })
    }
}

impl Writeable for Maxp {
    fn write(&self, w: &mut Writer) {
        w.write::<u32>(self.version);
        w.write::<u16>(self.num_glyphs);
        w.extend(&self.profile);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_versions() {
        let short = [0, 0, 0x50, 0, 0, 7];
        assert_eq!(
            Maxp::parse(&short).unwrap(),
            Maxp { version: VERSION_0_5, num_glyphs: 7, profile: vec![] }
        );

        let mut long = vec![0, 1, 0, 0, 0x01, 0x00];
        long.extend(1..=26);
        let maxp = Maxp::parse(&long).unwrap();
        assert_eq!(maxp.num_glyphs, 256);
        assert_eq!(maxp.profile.len(), PROFILE_LEN);

        let mut w = Writer::new();
        w.write(&maxp);
        assert_eq!(w.finish(), long);
    }

    #[test]
    fn rejects_unknown_version() {
        let data = [0, 2, 0, 0, 0, 1];
        assert!(matches!(
            Maxp::parse(&data),
            Err(UnsupportedVersion { tag: Tag::MAXP, version: 0x00020000 })
        ));
    }
}
