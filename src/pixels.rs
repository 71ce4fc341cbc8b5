use crate::color::max_sample;
use crate::{ColorType, Error, Palette};
use fallible_collections::FallibleVec;

/// PNG's largest allowed width and height
const MAX_DIMENSION: u32 = (1 << 31) - 1;

/// A width×height grid of samples in a given color type and bit depth.
///
/// Samples are stored interleaved, row-major, top to bottom, e.g. `R,G,B,A,R,G,B,A,...`
/// for RGBA. Palette images store one index per pixel. Every sample is checked
/// against the bit depth on construction, so a `PixelBuffer` is always encodable
/// (except for palette indices, which are checked against the palette by the encoder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    colortype: ColorType,
    bitdepth: u8,
    samples: Vec<u16>,
    key: Option<[u16; 3]>,
}

impl PixelBuffer {
    /// Build the image by calling `f(x, y)` once for every pixel, row by row.
    pub fn from_fn<S, F>(width: u32, height: u32, colortype: ColorType, bitdepth: u8, mut f: F) -> Result<Self, Error>
    where
        S: AsRef<[u16]>,
        F: FnMut(usize, usize) -> S,
    {
        check_header(width, height, colortype, bitdepth)?;
        let (w, h) = (width as usize, height as usize);
        let channels = colortype.channels();
        let mut samples: Vec<u16> = try_buffer(w, h, channels)?;
        for y in 0..h {
            for x in 0..w {
                let px = f(x, y);
                check_pixel(px.as_ref(), x, y, channels, bitdepth)?;
                samples.extend_from_slice(px.as_ref());
            }
        }
        Ok(Self::from_checked(width, height, colortype, bitdepth, samples))
    }

    /// Build the image from `((x, y), samples)` pairs in any order.
    ///
    /// Every coordinate of the image must be given exactly once.
    pub fn from_pixels<S, I>(width: u32, height: u32, colortype: ColorType, bitdepth: u8, pixels: I) -> Result<Self, Error>
    where
        S: AsRef<[u16]>,
        I: IntoIterator<Item = ((usize, usize), S)>,
    {
        check_header(width, height, colortype, bitdepth)?;
        let (w, h) = (width as usize, height as usize);
        let channels = colortype.channels();
        let mut samples: Vec<u16> = try_buffer(w, h, channels)?;
        samples.resize(w * h * channels, 0u16);
        let mut seen: Vec<bool> = try_buffer(w, h, 1)?;
        seen.resize(w * h, false);
        for ((x, y), px) in pixels {
            if x >= w || y >= h {
                return Err(Error::PixelOutOfBounds { x, y });
            }
            let px = px.as_ref();
            check_pixel(px, x, y, channels, bitdepth)?;
            let i = y * w + x;
            if seen[i] {
                return Err(Error::DuplicatePixel { x, y });
            }
            seen[i] = true;
            samples[i * channels..(i + 1) * channels].copy_from_slice(px);
        }
        if let Some(i) = seen.iter().position(|&s| !s) {
            return Err(Error::MissingPixel { x: i % w, y: i / w });
        }
        Ok(Self::from_checked(width, height, colortype, bitdepth, samples))
    }

    /// Build the image from interleaved samples, row-major
    pub fn from_samples(width: u32, height: u32, colortype: ColorType, bitdepth: u8, samples: Vec<u16>) -> Result<Self, Error> {
        check_header(width, height, colortype, bitdepth)?;
        let channels = colortype.channels();
        let expected = buffer_len::<u16>(width as usize, height as usize, channels).ok_or(Error::OutOfMemory)?;
        if samples.len() != expected {
            return Err(Error::InvalidDataLength { expected, actual: samples.len() });
        }
        let max = max_sample(bitdepth);
        if let Some(i) = samples.iter().position(|&s| s > max) {
            let px = i / channels;
            return Err(Error::SampleOutOfRange {
                x: px % width as usize,
                y: px / width as usize,
                value: samples[i],
                bitdepth,
            });
        }
        Ok(Self::from_checked(width, height, colortype, bitdepth, samples))
    }

    /// 8-bit interleaved bytes, one byte per sample
    pub fn from_bytes(width: u32, height: u32, colortype: ColorType, bytes: &[u8]) -> Result<Self, Error> {
        Self::from_samples(width, height, colortype, 8, bytes.iter().map(|&b| u16::from(b)).collect())
    }

    fn from_checked(width: u32, height: u32, colortype: ColorType, bitdepth: u8, samples: Vec<u16>) -> Self {
        debug_assert_eq!(samples.len(), width as usize * height as usize * colortype.channels());
        Self { width, height, colortype, bitdepth, samples, key: None }
    }

    /// Mark one color as fully transparent (`tRNS` color key).
    ///
    /// Takes one grey sample, or three RGB samples, in the image's bit depth.
    pub fn with_key(mut self, key: &[u16]) -> Result<Self, Error> {
        if !self.colortype.can_have_key() {
            return Err(Error::KeyNotAllowed(self.colortype));
        }
        let rgb = match (self.colortype.channels(), key) {
            (1, &[v]) => [v, v, v],
            (3, &[r, g, b]) => [r, g, b],
            (expected, _) => return Err(Error::ArityMismatch { x: 0, y: 0, expected, actual: key.len() }),
        };
        let max = max_sample(self.bitdepth);
        if let Some(&value) = rgb.iter().find(|&&v| v > max) {
            return Err(Error::SampleOutOfRange { x: 0, y: 0, value, bitdepth: self.bitdepth });
        }
        self.key = Some(rgb);
        Ok(self)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn colortype(&self) -> ColorType {
        self.colortype
    }

    #[inline]
    pub fn bitdepth(&self) -> u8 {
        self.bitdepth
    }

    /// Transparent color key as `(r, g, b)`; grey keys have all three equal
    #[inline]
    pub fn key(&self) -> Option<(u16, u16, u16)> {
        self.key.map(|[r, g, b]| (r, g, b))
    }

    /// All samples, interleaved, row-major
    #[inline]
    pub fn samples(&self) -> &[u16] {
        &self.samples
    }

    /// Samples of a single pixel
    pub fn pixel(&self, x: usize, y: usize) -> Option<&[u16]> {
        if x >= self.width as usize || y >= self.height as usize {
            return None;
        }
        let channels = self.colortype.channels();
        let start = (y * self.width as usize + x) * channels;
        Some(&self.samples[start..start + channels])
    }

    /// Rows top to bottom; each row is `width * channels` interleaved samples
    pub fn rows(&self) -> Rows<'_> {
        Rows {
            inner: self.samples.chunks_exact(self.width as usize * self.colortype.channels()),
        }
    }

    /// Every palette index must point into the palette
    pub(crate) fn check_palette_indices(&self, palette: &Palette) -> Result<(), Error> {
        let len = palette.len();
        match self.samples.iter().position(|&i| usize::from(i) >= len) {
            Some(i) => Err(Error::PaletteIndexOutOfRange {
                x: i % self.width as usize,
                y: i / self.width as usize,
                index: self.samples[i],
                len,
            }),
            None => Ok(()),
        }
    }
}

/// Iterator over the rows of a [`PixelBuffer`]
#[derive(Clone)]
pub struct Rows<'a> {
    inner: std::slice::ChunksExact<'a, u16>,
}

impl<'a> Iterator for Rows<'a> {
    type Item = &'a [u16];

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Rows<'_> {}

fn check_header(width: u32, height: u32, colortype: ColorType, bitdepth: u8) -> Result<(), Error> {
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(Error::InvalidDimensions { width, height });
    }
    colortype.check_bitdepth(bitdepth)
}

/// Number of items for `width * height * per_pixel`, if it can be allocated at all
fn buffer_len<T>(width: usize, height: usize, per_pixel: usize) -> Option<usize> {
    let len = width.checked_mul(height)?.checked_mul(per_pixel)?;
    let bytes = len.checked_mul(std::mem::size_of::<T>())?;
    if bytes > isize::MAX as usize {
        return None;
    }
    Some(len)
}

/// Empty vec with room for the whole image, or `OutOfMemory`
fn try_buffer<T>(width: usize, height: usize, per_pixel: usize) -> Result<Vec<T>, Error> {
    let len = buffer_len::<T>(width, height, per_pixel).ok_or(Error::OutOfMemory)?;
    let mut v = Vec::new();
    FallibleVec::try_reserve(&mut v, len)?;
    Ok(v)
}

fn check_pixel(px: &[u16], x: usize, y: usize, channels: usize, bitdepth: u8) -> Result<(), Error> {
    if px.len() != channels {
        return Err(Error::ArityMismatch { x, y, expected: channels, actual: px.len() });
    }
    let max = max_sample(bitdepth);
    match px.iter().find(|&&v| v > max) {
        Some(&value) => Err(Error::SampleOutOfRange { x, y, value, bitdepth }),
        None => Ok(()),
    }
}
