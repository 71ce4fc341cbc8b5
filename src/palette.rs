use crate::Error;
use rgb::{ComponentBytes, RGB8, RGBA8};

/// Colors for `PLTE`, with optional per-entry alpha for `tRNS`.
///
/// The alpha list may be shorter than the palette. Entries past its end are
/// fully opaque, which is how PNG itself interprets a short `tRNS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<RGB8>,
    alpha: Vec<u8>,
}

impl Palette {
    /// Max number of entries in a PNG palette
    pub const MAX_LEN: usize = 256;

    pub fn new(colors: Vec<RGB8>, alpha: Option<Vec<u8>>) -> Result<Self, Error> {
        if colors.is_empty() {
            return Err(Error::PaletteEmpty);
        }
        if colors.len() > Self::MAX_LEN {
            return Err(Error::PaletteTooLarge { len: colors.len(), max: Self::MAX_LEN });
        }
        let alpha = alpha.unwrap_or_default();
        if alpha.len() > colors.len() {
            return Err(Error::TransparencyLengthMismatch { alpha: alpha.len(), palette: colors.len() });
        }
        Ok(Self { colors, alpha })
    }

    /// Opaque palette from `(r, g, b)` triples
    pub fn from_rgb(colors: &[(u8, u8, u8)]) -> Result<Self, Error> {
        Self::new(colors.iter().map(|&(r, g, b)| RGB8::new(r, g, b)).collect(), None)
    }

    /// `n` entries where entry `i` is the grey level `i`
    pub fn grayscale(n: usize) -> Result<Self, Error> {
        Self::new((0..n).map(|i| {
            let v = i.min(255) as u8;
            RGB8::new(v, v, v)
        }).collect(), None)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    #[inline]
    pub fn colors(&self) -> &[RGB8] {
        &self.colors
    }

    /// Alpha values as given, possibly shorter than the palette
    #[inline]
    pub fn alpha(&self) -> &[u8] {
        &self.alpha
    }

    /// Color and effective alpha of an entry
    pub fn get(&self, index: usize) -> Option<RGBA8> {
        let c = self.colors.get(index)?;
        let a = self.alpha.get(index).copied().unwrap_or(255);
        Some(RGBA8::new(c.r, c.g, c.b, a))
    }

    /// Alpha values that need to go into `tRNS`.
    ///
    /// The tail of entries with alpha 255 doesn't have to be encoded.
    pub fn trns(&self) -> &[u8] {
        let amount = self.alpha.iter().rposition(|&a| a != 255).map_or(0, |i| i + 1);
        &self.alpha[..amount]
    }

    /// No entry is translucent, so no `tRNS` is needed
    #[inline]
    pub fn is_opaque(&self) -> bool {
        self.trns().is_empty()
    }

    /// `PLTE` payload: RGB triples in index order
    pub(crate) fn plte_data(&self) -> &[u8] {
        self.colors.as_bytes()
    }
}
