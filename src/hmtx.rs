use crate::stream::{Reader, Writeable, Writer};
use crate::Error::TableReadOverrun;
use crate::{Error, Result, Tag};

const OVERRUN: Error = TableReadOverrun(Tag::HMTX);

/// The horizontal metrics of all glyphs.
///
/// The first `metrics.len()` glyphs have an explicit advance width, all
/// following glyphs share the advance of the last explicit metric and only
/// store their left side bearing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Hmtx {
    /// `(advanceWidth, lsb)` pairs.
    pub metrics: Vec<(u16, i16)>,
    pub lsbs: Vec<i16>,
}

impl Hmtx {
    pub fn parse(data: &[u8], number_of_h_metrics: u16, num_glyphs: u16) -> Result<Self> {
        let mut r = Reader::new(data);

        let mut metrics = Vec::with_capacity(usize::from(number_of_h_metrics));
        for _ in 0..number_of_h_metrics {
            let advance = r.read::<u16>().ok_or(OVERRUN)?;
            let lsb = r.read::<i16>().ok_or(OVERRUN)?;
            metrics.push((advance, lsb));
        }

        let lsbs = r
            .read_vector::<i16>(usize::from(num_glyphs.saturating_sub(number_of_h_metrics)))
            .ok_or(OVERRUN)?;

        Ok(Self { metrics, lsbs })
    }

    /// The number of glyphs covered.
    pub fn len(&self) -> usize {
        self.metrics.len() + self.lsbs.len()
    }

    pub fn number_of_h_metrics(&self) -> u16 {
        self.metrics.len() as u16
    }

    /// The advance width and left side bearing of a glyph.
    pub fn metric(&self, gid: u16) -> Option<(u16, i16)> {
        let gid = usize::from(gid);
        if let Some(&metric) = self.metrics.get(gid) {
            return Some(metric);
        }

        let (advance, _) = *self.metrics.last()?;
        let lsb = *self.lsbs.get(gid - self.metrics.len())?;
        Some((advance, lsb))
    }

    /// Build metrics for a new glyph order in which glyph `k` is the old glyph
    /// `gids[k]`. Every glyph gets an explicit metric, so the result should
    /// be optimized afterwards.
    pub fn select(&self, gids: impl IntoIterator<Item = u16>) -> Result<Self> {
        let metrics = gids
            .into_iter()
            .map(|gid| self.metric(gid).ok_or(OVERRUN))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { metrics, lsbs: vec![] })
    }

    /// Collapse the trailing run of glyphs with equal advance widths into the
    /// shared tail.
    pub fn optimize(&mut self) {
        let full: Vec<(u16, i16)> =
            (0..self.len() as u16).filter_map(|gid| self.metric(gid)).collect();

        let Some(&(last_advance, _)) = full.last() else {
            return;
        };

        let mut start = full.len() - 1;
        while start > 0 && full[start - 1].0 == last_advance {
            start -= 1;
        }

        self.lsbs = full[start + 1..].iter().map(|&(_, lsb)| lsb).collect();
        self.metrics = full;
        self.metrics.truncate(start + 1);
    }
}

impl Writeable for Hmtx {
    fn write(&self, w: &mut Writer) {
        for &(advance, lsb) in &self.metrics {
            w.write::<u16>(advance);
            w.write::<i16>(lsb);
        }
        w.write_slice(&self.lsbs);
    }
}
