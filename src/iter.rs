use crate::ChunkRef;
use crate::Error;

/// Chunks of an encoded PNG, stopping at the first malformed one
pub struct ChunksIter<'a> {
    pub(crate) iter: ChunksIterFallible<'a>,
}

impl<'a> ChunksIter<'a> {
    /// `data` must start at the first chunk, i.e. after the signature
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            iter: ChunksIterFallible {
                data
            }
        }
    }
}

impl<'a> Iterator for ChunksIter<'a> {
    type Item = ChunkRef<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().and_then(|item| item.ok())
    }
}

/// Chunks of an encoded PNG, reporting malformed ones
pub struct ChunksIterFallible<'a> {
    pub(crate) data: &'a [u8],
}

impl<'a> ChunksIterFallible<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }
}

impl<'a> Iterator for ChunksIterFallible<'a> {
    type Item = Result<ChunkRef<'a>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.data.is_empty() {
            return None;
        }
        let ch = match ChunkRef::new(self.data) {
            Ok(ch) => ch,
            Err(e) => {
                self.data = &[];
                return Some(Err(e));
            },
        };
        self.data = &self.data[ch.len() + 12..];
        Some(Ok(ch))
    }
}

#[test]
fn walks_consecutive_chunks() {
    let mut out = Vec::new();
    crate::chunk::write_chunk(&mut out, b"IDAT", &[1, 2]).unwrap();
    crate::chunk::write_chunk(&mut out, b"IEND", &[]).unwrap();
    let names: Vec<_> = ChunksIter::new(&out).map(|c| c.name()).collect();
    assert_eq!(names, vec![*b"IDAT", *b"IEND"]);

    out.truncate(out.len() - 3);
    let mut it = ChunksIterFallible::new(&out);
    assert!(it.next().unwrap().is_ok());
    assert!(matches!(it.next(), Some(Err(Error::TruncatedChunk))));
    assert!(it.next().is_none());
}
