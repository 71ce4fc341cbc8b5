//! Turns a `PixelBuffer` into the filtered scanlines that go into `IDAT`.
//!
//! Only filter type 0 (none) is written, so the output is easy to inspect
//! byte by byte. Packing still follows the bit depth:
//!
//!  * below 8 bits, samples are packed most significant bit first, and the
//!    last byte of each scanline is padded with zero bits
//!  * 8-bit samples are one byte each
//!  * 16-bit samples are two bytes each, big-endian

use crate::{Error, PixelBuffer, Rows};
use fallible_collections::FallibleVec;

/// Filter type byte written at the start of every scanline
pub const FILTER_NONE: u8 = 0;

/// Size of one scanline in bytes, not including the filter type byte
#[inline]
pub(crate) fn linebytes(width: usize, bpp: usize) -> usize {
    (width * bpp + 7) / 8
}

/// Lazy sequence of filtered scanlines, one per image row.
///
/// It only borrows the image, so calling [`PixelBuffer::scanlines`] again
/// gives the same bytes.
#[derive(Clone)]
pub struct Scanlines<'a> {
    rows: Rows<'a>,
    bitdepth: u8,
    linebytes: usize,
}

impl<'a> Scanlines<'a> {
    pub fn new(image: &'a PixelBuffer) -> Self {
        let bpp = image.colortype().bpp(image.bitdepth());
        Self {
            rows: image.rows(),
            bitdepth: image.bitdepth(),
            linebytes: linebytes(image.width() as usize, bpp),
        }
    }

    /// Length of each item: filter byte plus packed samples
    #[inline]
    pub fn scanline_len(&self) -> usize {
        1 + self.linebytes
    }
}

impl Iterator for Scanlines<'_> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        let row = self.rows.next()?;
        let mut out = Vec::with_capacity(1 + self.linebytes);
        out.push(FILTER_NONE);
        pack_row(&mut out, row, self.bitdepth);
        debug_assert_eq!(out.len(), 1 + self.linebytes);
        Some(out)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl ExactSizeIterator for Scanlines<'_> {}

impl PixelBuffer {
    /// Filtered scanlines of this image, see [`Scanlines`]
    pub fn scanlines(&self) -> Scanlines<'_> {
        Scanlines::new(self)
    }

    /// Total size of the uncompressed `IDAT` data
    pub fn filtered_len(&self) -> usize {
        let bpp = self.colortype().bpp(self.bitdepth());
        self.height() as usize * (1 + linebytes(self.width() as usize, bpp))
    }
}

/// Appends one row of samples, packed for the bit depth
fn pack_row(out: &mut Vec<u8>, row: &[u16], bitdepth: u8) {
    match bitdepth {
        16 => {
            for &s in row {
                out.extend_from_slice(&s.to_be_bytes());
            }
        },
        8 => out.extend(row.iter().map(|&s| s as u8)),
        _ => {
            let bits = u32::from(bitdepth);
            let mut acc = 0u8;
            let mut filled = 0;
            for &s in row {
                acc |= (s as u8) << (8 - bits - filled);
                filled += bits;
                if filled == 8 {
                    out.push(acc);
                    acc = 0;
                    filled = 0;
                }
            }
            /*padding bits stay zero*/
            if filled != 0 {
                out.push(acc);
            }
        },
    }
}

/// Concatenation of all scanlines, ready for the compressor
pub(crate) fn filtered_data(image: &PixelBuffer) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();
    FallibleVec::try_reserve(&mut out, image.filtered_len())?;
    for line in image.scanlines() {
        out.extend_from_slice(&line);
    }
    Ok(out)
}
