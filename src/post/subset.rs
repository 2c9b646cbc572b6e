use super::*;
use rustc_hash::FxHashMap;

/// Where the name of a glyph comes from.
enum NameRef<'a> {
    Standard(u16),
    Custom(&'a [u8]),
}

impl Post {
    fn name_ref(&self, gid: u16) -> Option<NameRef<'_>> {
        let standard = MACINTOSH_NAMES.len();
        match &self.names {
            Names::Macintosh => (usize::from(gid) < standard).then_some(NameRef::Standard(gid)),
            Names::Indexed { indices, names } => {
                let index = *indices.get(usize::from(gid))?;
                match usize::from(index).checked_sub(standard) {
                    None => Some(NameRef::Standard(index)),
                    Some(i) => Some(NameRef::Custom(names.get(i)?)),
                }
            }
            Names::Offsets(offsets) => {
                let index = usize::from(gid)
                    .checked_add_signed(isize::from(*offsets.get(usize::from(gid))?))?;
                (index < standard).then_some(NameRef::Standard(index as u16))
            }
            Names::None => None,
        }
    }

    /// Reproject the glyph names onto a new glyph order in which glyph `k`
    /// is the old glyph `gids[k]`. Tables with names become version 2.0 with
    /// a rebuilt string pool; glyphs without a name are called `.notdef`.
    pub fn subset(&self, gids: impl IntoIterator<Item = u16>) -> Self {
        if self.names == Names::None {
            return self.clone();
        }

        let mut indices = vec![];
        let mut names: Vec<Vec<u8>> = vec![];
        let mut pool: FxHashMap<&[u8], u16> = FxHashMap::default();

        for gid in gids {
            let index = match self.name_ref(gid) {
                Some(NameRef::Standard(index)) => index,
                Some(NameRef::Custom(name)) => *pool.entry(name).or_insert_with(|| {
                    names.push(name.to_vec());
                    (MACINTOSH_NAMES.len() + names.len() - 1) as u16
                }),
                None => 0,
            };
            indices.push(index);
        }

        let mut header = self.header.clone();
        header.version = VERSION_2_0;
        Self { header, names: Names::Indexed { indices, names } }
    }
}
