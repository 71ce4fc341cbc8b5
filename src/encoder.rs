use crate::chunk::{write_chunk, MAX_CHUNK_LEN};
use crate::filter::filtered_data;
use crate::iter::{ChunksIter, ChunksIterFallible};
use crate::{zlib, ColorType, Error, Palette, PixelBuffer};
use std::fmt;
use std::io::Write;
use std::path::Path;

/// 8 bytes PNG signature, aka the magic bytes
pub const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

#[allow(non_camel_case_types)]
pub type custom_compress_callback = Option<fn(input: &[u8], output: &mut dyn Write, context: &CompressSettings) -> Result<(), Error>>;

/// Settings for zlib compression of the `IDAT` data
#[derive(Clone)]
pub struct CompressSettings {
    level: u8,
    /// use custom zlib encoder instead of the built in one (default: None).
    /// It must write a complete zlib stream.
    pub custom_zlib: custom_compress_callback,
}

impl CompressSettings {
    pub fn new() -> Self {
        Self {
            level: 6,
            custom_zlib: None,
        }
    }

    /// 0 (none), 1 (fast) to 9 (best)
    pub fn set_level(&mut self, level: u8) {
        self.level = level.min(9);
    }

    /// zlib compression level
    pub fn level(&self) -> u8 {
        self.level
    }
}

impl Default for CompressSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CompressSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("CompressSettings");
        s.field("level", &self.level);
        s.field("custom_zlib", &self.custom_zlib.is_some());
        s.finish()
    }
}

#[derive(Clone, Debug, Default)]
pub struct EncoderSettings {
    /// settings for the zlib encoder
    pub zlibsettings: CompressSettings,
    /// Split the compressed data into `IDAT` chunks of at most this many bytes.
    /// `None` writes a single `IDAT`.
    pub max_idat_size: Option<usize>,
}

/// PNG encoder with its settings. Holds no per-image state, so one encoder
/// can be shared between threads and reused for any number of images.
#[derive(Clone, Debug, Default)]
pub struct Encoder {
    settings: EncoderSettings,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn settings(&self) -> &EncoderSettings {
        &self.settings
    }

    #[inline]
    pub fn settings_mut(&mut self) -> &mut EncoderSettings {
        &mut self.settings
    }

    /// zlib level, 0 (stored) to 9 (best)
    pub fn set_level(&mut self, level: u8) {
        self.settings.zlibsettings.set_level(level);
    }

    pub fn set_max_idat_size(&mut self, max: Option<usize>) {
        self.settings.max_idat_size = max;
    }

    pub fn set_custom_zlib(&mut self, callback: custom_compress_callback) {
        self.settings.zlibsettings.custom_zlib = callback;
    }

    /// Encodes the image. `palette` must be given for, and only for, `ColorType::PALETTE`.
    ///
    /// All validation happens before the first chunk is written.
    pub fn encode(&self, image: &PixelBuffer, palette: Option<&Palette>) -> Result<EncodedImage, Error> {
        check_palette(image, palette)?;

        let scanlines = filtered_data(image)?;
        let compressed = zlib::compress(&scanlines, &self.settings.zlibsettings)?;

        let mut out = ChunkStream::new(image.filtered_len() / 2 + compressed.len() + 128)?;
        out.emit(Stage::Header, b"IHDR", &ihdr_data(image))?;
        if let Some(palette) = palette {
            out.emit(Stage::Palette, b"PLTE", &palette.plte_data())?;
            if !palette.is_opaque() {
                out.emit(Stage::Transparency, b"tRNS", palette.trns())?;
            }
        }
        if let Some(key) = image.key() {
            out.emit(Stage::Transparency, b"tRNS", &key_trns_data(image.colortype(), key))?;
        }
        let max = self.settings.max_idat_size.map_or(MAX_CHUNK_LEN, |m| m.clamp(1, MAX_CHUNK_LEN));
        if compressed.len() > max {
            log::debug!("png: splitting {} bytes of image data into {}-byte IDAT chunks", compressed.len(), max);
        }
        for part in compressed.chunks(max) {
            out.emit(Stage::Data, b"IDAT", part)?;
        }
        out.emit(Stage::End, b"IEND", &[])?;

        let encoded = out.finish()?;
        log::info!("png: encoded {}x{} {:?} {}-bit image, {} bytes",
            image.width(), image.height(), image.colortype(), image.bitdepth(), encoded.len());
        Ok(encoded)
    }

    /// Encodes the image and writes it to `path`. Nothing is written if encoding fails.
    pub fn encode_file<P: AsRef<Path>>(&self, path: P, image: &PixelBuffer, palette: Option<&Palette>) -> Result<(), Error> {
        let encoded = self.encode(image, palette)?;
        encoded.save(path)
    }
}

fn check_palette(image: &PixelBuffer, palette: Option<&Palette>) -> Result<(), Error> {
    let colortype = image.colortype();
    match palette {
        None if colortype.is_palette_type() => Err(Error::PaletteRequired),
        None => Ok(()),
        Some(_) if !colortype.is_palette_type() => Err(Error::PaletteForbidden(colortype)),
        Some(palette) => {
            let max = (1usize << image.bitdepth()).min(Palette::MAX_LEN);
            if palette.len() > max {
                return Err(Error::PaletteTooLarge { len: palette.len(), max });
            }
            image.check_palette_indices(palette)
        },
    }
}

fn ihdr_data(image: &PixelBuffer) -> [u8; 13] {
    let mut header = [0u8; 13];
    header[0..4].copy_from_slice(&image.width().to_be_bytes());
    header[4..8].copy_from_slice(&image.height().to_be_bytes());
    header[8] = image.bitdepth();
    header[9] = image.colortype() as u8;
    /*compression, filter and interlace method are all 0*/
    header
}

/// Color key `tRNS`: one 16-bit grey sample, or three 16-bit RGB samples
fn key_trns_data(colortype: ColorType, (r, g, b): (u16, u16, u16)) -> Vec<u8> {
    if colortype == ColorType::GREY {
        r.to_be_bytes().to_vec()
    } else {
        [r, g, b].iter().flat_map(|c| c.to_be_bytes()).collect()
    }
}

/// Where in the file the encoder is. Chunks can only move forward through these.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Stage {
    Signature,
    Header,
    Palette,
    Transparency,
    Data,
    End,
}

struct ChunkStream {
    out: Vec<u8>,
    stage: Stage,
    last: [u8; 4],
}

impl ChunkStream {
    fn new(capacity: usize) -> Result<Self, Error> {
        let mut out: Vec<u8> = Vec::new();
        fallible_collections::FallibleVec::try_reserve(&mut out, capacity)?;
        out.extend_from_slice(&SIGNATURE);
        Ok(Self { out, stage: Stage::Signature, last: [0; 4] })
    }

    /// Only `IDAT` may repeat, and only consecutively
    fn emit(&mut self, stage: Stage, type_: &[u8; 4], data: &[u8]) -> Result<(), Error> {
        if stage < self.stage || (stage == self.stage && stage != Stage::Data) {
            return Err(Error::ChunkOrder { chunk: *type_, after: self.last });
        }
        write_chunk(&mut self.out, type_, data)?;
        log::debug!("png: {} chunk, {} bytes", String::from_utf8_lossy(type_), data.len());
        self.stage = stage;
        self.last = *type_;
        Ok(())
    }

    fn finish(self) -> Result<EncodedImage, Error> {
        if self.stage != Stage::End {
            return Err(Error::ChunkOrder { chunk: *b"IEND", after: self.last });
        }
        Ok(EncodedImage { data: self.out })
    }
}

/// A complete PNG file in memory: signature followed by chunks
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage {
    data: Vec<u8>,
}

impl EncodedImage {
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Chunks in file order
    pub fn chunks(&self) -> ChunksIter<'_> {
        ChunksIter::new(&self.data[SIGNATURE.len()..])
    }

    pub fn chunks_fallible(&self) -> ChunksIterFallible<'_> {
        ChunksIterFallible::new(&self.data[SIGNATURE.len()..])
    }

    /// The filtered scanlines, recovered by inflating all `IDAT` data
    pub fn scanline_data(&self) -> Result<Vec<u8>, Error> {
        let mut idat = Vec::new();
        for ch in self.chunks_fallible() {
            let ch = ch?;
            if !ch.check_crc() {
                return Err(Error::CrcMismatch { chunk: ch.name() });
            }
            if ch.is_type(b"IDAT") {
                idat.extend_from_slice(ch.data());
            }
        }
        zlib::decompress(&idat)
    }

    /// Writes the whole file in one go
    pub fn write_to<W: Write>(&self, mut sink: W) -> Result<(), Error> {
        sink.write_all(&self.data)?;
        sink.flush()?;
        Ok(())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        std::fs::write(path, &self.data)?;
        Ok(())
    }
}

impl TryFrom<Vec<u8>> for EncodedImage {
    type Error = Error;

    /// Accepts a PNG byte stream after checking its signature and chunk CRCs
    fn try_from(data: Vec<u8>) -> Result<Self, Error> {
        if !data.starts_with(&SIGNATURE) {
            return Err(Error::BadSignature);
        }
        for ch in ChunksIterFallible::new(&data[SIGNATURE.len()..]) {
            let ch = ch?;
            if !ch.check_crc() {
                return Err(Error::CrcMismatch { chunk: ch.name() });
            }
        }
        Ok(Self { data })
    }
}

impl AsRef<[u8]> for EncodedImage {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.chunks()).finish()
    }
}
