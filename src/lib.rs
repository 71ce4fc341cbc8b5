//! Byte-exact PNG encoder for deterministic test fixtures.
//!
//! Builds a PNG from an explicit [`PixelBuffer`] (and a [`Palette`] for indexed
//! images) in every standard color type: grey, palette, RGB, RGBA and grey+alpha,
//! at any bit depth PNG allows. Scanlines are never filtered (filter type 0), so
//! the uncompressed `IDAT` data is exactly the packed samples, and the same input
//! always produces the same bytes.
//!
//! ```
//! use pngfixture::{ColorType, PixelBuffer};
//!
//! let image = PixelBuffer::from_bytes(2, 2, ColorType::GREY, &[0, 85, 170, 255])?;
//! let png = pngfixture::encode(&image, None)?;
//! assert_eq!(&png.as_bytes()[1..4], b"PNG");
//! # Ok::<(), pngfixture::Error>(())
//! ```

pub mod chunk;
mod color;
mod crc;
mod encoder;
mod error;
pub mod filter;
pub mod fixtures;
pub mod iter;
mod palette;
mod pixels;
mod zlib;

pub use crate::chunk::ChunkRef;
pub use crate::color::ColorType;
pub use crate::crc::{crc32, Crc32};
pub use crate::encoder::{custom_compress_callback, CompressSettings, EncodedImage, Encoder, EncoderSettings, SIGNATURE};
pub use crate::error::Error;
pub use crate::filter::Scanlines;
pub use crate::palette::Palette;
pub use crate::pixels::{PixelBuffer, Rows};
pub use rgb::{RGB8, RGBA8};

use std::path::Path;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Encodes with default settings. `palette` is required for, and only allowed with, `ColorType::PALETTE`.
pub fn encode(image: &PixelBuffer, palette: Option<&Palette>) -> Result<EncodedImage> {
    Encoder::new().encode(image, palette)
}

/// Encodes with default settings and saves to `filepath`
pub fn encode_file<P: AsRef<Path>>(filepath: P, image: &PixelBuffer, palette: Option<&Palette>) -> Result<()> {
    Encoder::new().encode_file(filepath, image, palette)
}
