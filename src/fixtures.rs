//! The reference set of 2×2, 8-bit test images, one per PNG color model,
//! plus a palette image with `tRNS` transparency.

use crate::{ColorType, EncodedImage, Encoder, Error, Palette, PixelBuffer};
use rgb::RGB8;
use std::path::{Path, PathBuf};

/// A named test image
#[derive(Debug, Clone)]
pub struct Fixture {
    /// File name the image is saved under
    pub name: &'static str,
    pub image: PixelBuffer,
    pub palette: Option<Palette>,
}

impl Fixture {
    pub fn encode(&self) -> Result<EncodedImage, Error> {
        Encoder::new().encode(&self.image, self.palette.as_ref())
    }
}

/// Black, dark grey, light grey, white
pub fn grayscale() -> Result<Fixture, Error> {
    Ok(Fixture {
        name: "test_grayscale_2x2.png",
        image: PixelBuffer::from_pixels(2, 2, ColorType::GREY, 8, [
            ((0, 0), [0u16]),
            ((1, 0), [85]),
            ((0, 1), [170]),
            ((1, 1), [255]),
        ])?,
        palette: None,
    })
}

/// Indices 0, 85, 170, 255 into a full 256-entry grey ramp
pub fn palette() -> Result<Fixture, Error> {
    Ok(Fixture {
        name: "test_palette_2x2.png",
        image: PixelBuffer::from_pixels(2, 2, ColorType::PALETTE, 8, [
            ((0, 0), [0u16]),
            ((1, 0), [85]),
            ((0, 1), [170]),
            ((1, 1), [255]),
        ])?,
        palette: Some(Palette::grayscale(256)?),
    })
}

/// Red, green, blue, white
pub fn rgb() -> Result<Fixture, Error> {
    Ok(Fixture {
        name: "test_rgb_2x2.png",
        image: PixelBuffer::from_pixels(2, 2, ColorType::RGB, 8, [
            ((0, 0), [255u16, 0, 0]),
            ((1, 0), [0, 255, 0]),
            ((0, 1), [0, 0, 255]),
            ((1, 1), [255, 255, 255]),
        ])?,
        palette: None,
    })
}

/// Red, green, blue, white with alpha going from opaque to fully transparent
pub fn rgba() -> Result<Fixture, Error> {
    Ok(Fixture {
        name: "test_rgba_2x2.png",
        image: PixelBuffer::from_pixels(2, 2, ColorType::RGBA, 8, [
            ((0, 0), [255u16, 0, 0, 255]),
            ((1, 0), [0, 255, 0, 170]),
            ((0, 1), [0, 0, 255, 85]),
            ((1, 1), [255, 255, 255, 0]),
        ])?,
        palette: None,
    })
}

pub fn grayscale_alpha() -> Result<Fixture, Error> {
    Ok(Fixture {
        name: "test_grayscale_alpha_2x2.png",
        image: PixelBuffer::from_pixels(2, 2, ColorType::GREY_ALPHA, 8, [
            ((0, 0), [0u16, 255]),
            ((1, 0), [85, 170]),
            ((0, 1), [170, 85]),
            ((1, 1), [255, 0]),
        ])?,
        palette: None,
    })
}

/// Red, green, blue, white padded to 256 entries with mid grey.
/// Only the first 4 entries get alpha, the rest are implicitly opaque.
pub fn palette_trans() -> Result<Fixture, Error> {
    let mut colors = vec![RGB8::new(255, 0, 0), RGB8::new(0, 255, 0), RGB8::new(0, 0, 255), RGB8::new(255, 255, 255)];
    colors.resize(256, RGB8::new(128, 128, 128));
    Ok(Fixture {
        name: "test_palette_trans_2x2.png",
        image: PixelBuffer::from_pixels(2, 2, ColorType::PALETTE, 8, [
            ((0, 0), [0u16]),
            ((1, 0), [1]),
            ((0, 1), [2]),
            ((1, 1), [3]),
        ])?,
        palette: Some(Palette::new(colors, Some(vec![255, 170, 85, 0]))?),
    })
}

/// All six fixtures, in the order they are generated
pub fn all() -> Result<Vec<Fixture>, Error> {
    Ok(vec![grayscale()?, palette()?, rgb()?, rgba()?, grayscale_alpha()?, palette_trans()?])
}

/// Encodes every fixture and saves it into `dir`, creating the directory if needed.
///
/// All images are encoded before anything is written.
pub fn write_all<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>, Error> {
    let dir = dir.as_ref();
    let encoded = all()?
        .into_iter()
        .map(|f| Ok((f.name, f.encode()?)))
        .collect::<Result<Vec<_>, Error>>()?;

    std::fs::create_dir_all(dir)?;
    let mut paths = Vec::with_capacity(encoded.len());
    for (name, png) in encoded {
        let path = dir.join(name);
        png.save(&path)?;
        log::info!("png: wrote {}", path.display());
        paths.push(path);
    }
    Ok(paths)
}
