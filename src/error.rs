use crate::ColorType;
use std::error;
use std::fmt;
use std::io;

/// Everything that can go wrong while building pixel data or encoding a PNG.
///
/// Input errors are detected before any chunk bytes are produced, so an `Err`
/// never comes with a half-written image.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// Width or height is zero, or larger than PNG allows (2^31-1)
    InvalidDimensions { width: u32, height: u32 },
    /// The color type can't be stored with this many bits per sample
    InvalidBitDepth { colortype: ColorType, bitdepth: u8 },
    /// A sample doesn't fit in `bitdepth` bits
    SampleOutOfRange { x: usize, y: usize, value: u16, bitdepth: u8 },
    /// Pixel has a different number of samples than the color type needs
    ArityMismatch { x: usize, y: usize, expected: usize, actual: usize },
    /// Flat sample buffer has the wrong number of samples
    InvalidDataLength { expected: usize, actual: usize },
    /// Coordinate outside of the image
    PixelOutOfBounds { x: usize, y: usize },
    /// Same coordinate given twice
    DuplicatePixel { x: usize, y: usize },
    /// Coordinate never given
    MissingPixel { x: usize, y: usize },
    /// Palette color type, but no palette
    PaletteRequired,
    /// A palette was given for a color type that can't have one
    PaletteForbidden(ColorType),
    /// `PLTE` must have at least one entry
    PaletteEmpty,
    /// More than 256 entries, or more than the bit depth can index
    PaletteTooLarge { len: usize, max: usize },
    /// More alpha values than palette entries
    TransparencyLengthMismatch { alpha: usize, palette: usize },
    /// A pixel refers to a palette entry that doesn't exist
    PaletteIndexOutOfRange { x: usize, y: usize, index: u16, len: usize },
    /// Transparent color key is only possible for grey and RGB images
    KeyNotAllowed(ColorType),
    /// Chunk payload longer than 2^31-1 bytes
    ChunkTooLarge(usize),
    /// A chunk was emitted out of the order PNG requires
    ChunkOrder { chunk: [u8; 4], after: [u8; 4] },
    /// Chunk header claims more data than there is
    TruncatedChunk,
    /// Stored CRC doesn't match the chunk's type and data
    CrcMismatch { chunk: [u8; 4] },
    /// Data doesn't start with the PNG signature
    BadSignature,
    /// IDAT payload isn't a valid zlib stream
    InvalidZlib,
    /// Allocation failed
    OutOfMemory,
    /// Writing the encoded image failed
    Io(io::Error),
}

impl Error {
    /// Short English description of the kind of error, without details
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidDimensions { .. } => "invalid image dimensions",
            Self::InvalidBitDepth { .. } => "invalid combination of color type and bit depth",
            Self::SampleOutOfRange { .. } => "sample value too large for the bit depth",
            Self::ArityMismatch { .. } => "wrong number of samples per pixel for the color type",
            Self::InvalidDataLength { .. } => "sample buffer size doesn't match image size",
            Self::PixelOutOfBounds { .. } => "pixel coordinate outside of the image",
            Self::DuplicatePixel { .. } => "pixel coordinate given more than once",
            Self::MissingPixel { .. } => "pixel coordinate not given",
            Self::PaletteRequired => "palette color type requires a palette",
            Self::PaletteForbidden(_) => "palette given for a color type that doesn't use one",
            Self::PaletteEmpty => "palette must have at least one entry",
            Self::PaletteTooLarge { .. } => "palette has too many entries",
            Self::TransparencyLengthMismatch { .. } => "more alpha values than palette entries",
            Self::PaletteIndexOutOfRange { .. } => "palette index past the end of the palette",
            Self::KeyNotAllowed(_) => "color key is only allowed for grey and RGB images",
            Self::ChunkTooLarge(_) => "chunk data too large",
            Self::ChunkOrder { .. } => "chunk emitted out of order",
            Self::TruncatedChunk => "chunk length exceeds the available data",
            Self::CrcMismatch { .. } => "chunk CRC mismatch",
            Self::BadSignature => "not a PNG signature",
            Self::InvalidZlib => "invalid zlib stream",
            Self::OutOfMemory => "out of memory",
            Self::Io(_) => "I/O error",
        }
    }
}

fn chunk_name(name: &[u8; 4]) -> &str {
    std::str::from_utf8(name).unwrap_or("????")
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions { width, height } => write!(f, "{}: {}x{}", self.as_str(), width, height),
            Self::InvalidBitDepth { colortype, bitdepth } => write!(f, "{}: {:?} at {} bits", self.as_str(), colortype, bitdepth),
            Self::SampleOutOfRange { x, y, value, bitdepth } => write!(f, "{}: {} at ({}, {}) exceeds {} bits", self.as_str(), value, x, y, bitdepth),
            Self::ArityMismatch { x, y, expected, actual } => write!(f, "{}: expected {}, got {} at ({}, {})", self.as_str(), expected, actual, x, y),
            Self::InvalidDataLength { expected, actual } => write!(f, "{}: expected {} samples, got {}", self.as_str(), expected, actual),
            Self::PixelOutOfBounds { x, y } | Self::DuplicatePixel { x, y } | Self::MissingPixel { x, y } => {
                write!(f, "{}: ({}, {})", self.as_str(), x, y)
            },
            Self::PaletteForbidden(ct) | Self::KeyNotAllowed(ct) => write!(f, "{}: {:?}", self.as_str(), ct),
            Self::PaletteTooLarge { len, max } => write!(f, "{}: {} (max {})", self.as_str(), len, max),
            Self::TransparencyLengthMismatch { alpha, palette } => write!(f, "{}: {} alpha values for {} colors", self.as_str(), alpha, palette),
            Self::PaletteIndexOutOfRange { x, y, index, len } => write!(f, "{}: index {} at ({}, {}), palette has {}", self.as_str(), index, x, y, len),
            Self::ChunkTooLarge(len) => write!(f, "{}: {} bytes", self.as_str(), len),
            Self::ChunkOrder { chunk, after } => write!(f, "{}: {} after {}", self.as_str(), chunk_name(chunk), chunk_name(after)),
            Self::CrcMismatch { chunk } => write!(f, "{} in {}", self.as_str(), chunk_name(chunk)),
            Self::Io(err) => write!(f, "{}: {}", self.as_str(), err),
            _ => f.write_str(self.as_str()),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        match err.kind() {
            io::ErrorKind::OutOfMemory => Error::OutOfMemory,
            _ => Error::Io(err),
        }
    }
}

impl From<fallible_collections::TryReserveError> for Error {
    #[cold]
    fn from(_: fallible_collections::TryReserveError) -> Error {
        Error::OutOfMemory
    }
}

#[test]
fn display_includes_details() {
    let err = Error::PaletteTooLarge { len: 257, max: 256 };
    assert_eq!(err.to_string(), "palette has too many entries: 257 (max 256)");

    let err = Error::ChunkOrder { chunk: *b"PLTE", after: *b"IDAT" };
    assert_eq!(err.to_string(), "chunk emitted out of order: PLTE after IDAT");
}

#[test]
fn io_errors_keep_their_source() {
    let err = Error::from(io::Error::new(io::ErrorKind::PermissionDenied, "nope"));
    assert!(matches!(err, Error::Io(_)));
    assert!(error::Error::source(&err).is_some());
}
