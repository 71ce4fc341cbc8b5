use crate::{CompressSettings, Error};
use flate2::write::{ZlibDecoder, ZlibEncoder};
use flate2::Compression;
use std::io::Write;

fn check_zlib_stream(inp: &[u8]) -> Result<(), Error> {
    if inp.len() < 2 {
        return Err(Error::InvalidZlib);
    }
    /*256 * in[0] + in[1] must be a multiple of 31, the FCHECK value is supposed to be made that way*/
    if (u32::from(inp[0]) * 256 + u32::from(inp[1])) % 31 != 0 {
        return Err(Error::InvalidZlib);
    }
    let cm = u32::from(inp[0]) & 15;
    let cinfo = (u32::from(inp[0]) >> 4) & 15;
    let fdict = (u32::from(inp[1]) >> 5) & 1;
    /*only compression method 8: inflate with sliding window of 32k is supported by PNG*/
    if cm != 8 || cinfo > 7 {
        return Err(Error::InvalidZlib);
    }
    /*"The additional flags shall not specify a preset dictionary."*/
    if fdict != 0 {
        return Err(Error::InvalidZlib);
    }
    Ok(())
}

pub(crate) fn new_compressor<W: Write>(outv: W, settings: &CompressSettings) -> ZlibEncoder<W> {
    let level = settings.level();
    let level = if level == 0 {
        Compression::none()
    } else {
        Compression::new(level.min(9).into())
    };
    ZlibEncoder::new(outv, level)
}

/// Compresses the filtered scanlines into a zlib stream, the `IDAT` payload
#[inline(never)]
pub(crate) fn compress_into(out: &mut dyn Write, inp: &[u8], settings: &CompressSettings) -> Result<(), Error> {
    if let Some(cb) = settings.custom_zlib {
        (cb)(inp, out, settings)?;
    } else {
        let mut z = new_compressor(out, settings);
        z.write_all(inp)?;
        z.finish()?;
    }
    Ok(())
}

pub(crate) fn compress(inp: &[u8], settings: &CompressSettings) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();
    compress_into(&mut out, inp, settings)?;
    Ok(out)
}

/// Inflates a concatenated `IDAT` payload back into filtered scanlines
#[inline(never)]
pub(crate) fn decompress(inp: &[u8]) -> Result<Vec<u8>, Error> {
    check_zlib_stream(inp)?;
    let mut dec = ZlibDecoder::new(Vec::new());
    dec.write_all(inp).map_err(|_| Error::InvalidZlib)?;
    dec.finish().map_err(|_| Error::InvalidZlib)
}
