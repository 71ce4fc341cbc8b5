use crate::crc::{crc32, Crc32};
use crate::Error;
use fallible_collections::FallibleVec;

/// Largest chunk payload PNG allows
pub const MAX_CHUNK_LEN: usize = (1 << 31) - 1;

/// Appends a chunk to `out`: length (big-endian), type, data, CRC (big-endian).
///
/// The CRC covers the 4 type letters and the data, not the length.
pub fn write_chunk(out: &mut Vec<u8>, type_: &[u8; 4], data: &[u8]) -> Result<(), Error> {
    let length = data.len();
    if length > MAX_CHUNK_LEN {
        return Err(Error::ChunkTooLarge(length));
    }
    FallibleVec::try_reserve(out, length + 12)?;

    let mut crc = Crc32::new();
    crc.update(type_);
    crc.update(data);

    out.extend_from_slice(&(length as u32).to_be_bytes());
    out.extend_from_slice(type_);
    out.extend_from_slice(data);
    out.extend_from_slice(&crc.finish().to_be_bytes());
    Ok(())
}

/// A chunk borrowed from an encoded PNG byte stream
#[derive(Copy, Clone)]
pub struct ChunkRef<'a> {
    data: &'a [u8],
}

impl<'a> ChunkRef<'a> {
    /// `data` must start at a chunk's length field. Anything after the chunk is ignored.
    pub fn new(data: &'a [u8]) -> Result<Self, Error> {
        if data.len() < 12 {
            return Err(Error::TruncatedChunk);
        }
        let len = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
        if len > MAX_CHUNK_LEN {
            return Err(Error::ChunkTooLarge(len));
        }
        if data.len() - 12 < len {
            return Err(Error::TruncatedChunk);
        }
        Ok(Self { data: &data[..len + 12] })
    }

    /// Length of the payload
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len() - 12
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Chunk type, e.g. `b"IHDR"`
    #[inline]
    pub fn name(&self) -> [u8; 4] {
        [self.data[4], self.data[5], self.data[6], self.data[7]]
    }

    #[inline]
    pub fn is_type<C: AsRef<[u8]>>(&self, name: C) -> bool {
        self.name() == name.as_ref()
    }

    /// Payload
    #[inline]
    pub fn data(&self) -> &'a [u8] {
        &self.data[8..self.data.len() - 4]
    }

    /// Stored CRC
    #[inline]
    pub fn crc(&self) -> u32 {
        let c = &self.data[self.data.len() - 4..];
        u32::from_be_bytes([c[0], c[1], c[2], c[3]])
    }

    pub fn check_crc(&self) -> bool {
        self.crc() == crc32(&self.data[4..self.data.len() - 4])
    }

    #[inline]
    pub fn is_ancillary(&self) -> bool {
        (self.data[4] & 32) != 0
    }

    #[inline]
    pub fn is_private(&self) -> bool {
        (self.data[6] & 32) != 0
    }

    #[inline]
    pub fn is_safe_to_copy(&self) -> bool {
        (self.data[7] & 32) != 0
    }

    /// Length, type, data and CRC
    #[inline]
    pub fn whole_chunk_data(&self) -> &'a [u8] {
        self.data
    }
}

impl std::fmt::Debug for ChunkRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkRef")
            .field("name", &String::from_utf8_lossy(&self.name()))
            .field("len", &self.len())
            .finish()
    }
}
