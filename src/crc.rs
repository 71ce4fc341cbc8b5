/* CRC polynomial: 0xedb88320 (IEEE 802.3, reflected) */
const CRC32_TABLE: [u32; 256] = make_table();

const fn make_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut n = 0;
    while n < 256 {
        let mut c = n as u32;
        let mut k = 0;
        while k < 8 {
            c = if c & 1 != 0 { 0xedb88320 ^ (c >> 1) } else { c >> 1 };
            k += 1;
        }
        table[n] = c;
        n += 1;
    }
    table
}

/// Running CRC, so a chunk's type and data can be hashed without concatenating them
#[derive(Clone, Copy)]
pub struct Crc32(u32);

impl Crc32 {
    #[inline]
    pub fn new() -> Self {
        Self(0xffffffff)
    }

    pub fn update(&mut self, data: &[u8]) {
        let mut r = self.0;
        for &d in data {
            r = CRC32_TABLE[((r ^ u32::from(d)) & 255) as usize] ^ (r >> 8);
        }
        self.0 = r;
    }

    #[inline]
    pub fn finish(self) -> u32 {
        self.0 ^ 0xffffffff
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

/// CRC of the whole buffer
pub fn crc32(data: &[u8]) -> u32 {
    let mut crc = Crc32::new();
    crc.update(data);
    crc.finish()
}

#[test]
fn known_values() {
    assert_eq!(crc32(b""), 0);
    assert_eq!(crc32(b"123456789"), 0xCBF43926);
    assert_eq!(crc32(b"IEND"), 0xAE426082);
}

#[test]
fn incremental_matches_whole() {
    let mut crc = Crc32::new();
    crc.update(b"IHDR");
    crc.update(&[0, 0, 0, 2, 0, 0, 0, 2, 8, 0, 0, 0, 0]);
    assert_eq!(crc.finish(), crc32(b"IHDR\0\0\0\x02\0\0\0\x02\x08\0\0\0\0"));
}
