use pngfixture::*;

// top-level files create new executables, which is slower
mod roundtrip {
    mod roundtrip_test;
}

struct Decoded {
    info: png::OutputInfo,
    pixels: Vec<u8>,
    palette: Option<Vec<u8>>,
    trns: Option<Vec<u8>>,
}

fn decode(file: &EncodedImage) -> Decoded {
    let mut reader = png::Decoder::new(file.as_bytes()).read_info().unwrap();
    let mut pixels = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut pixels).unwrap();
    pixels.truncate(info.buffer_size());
    Decoded {
        info,
        pixels,
        palette: reader.info().palette.as_ref().map(|p| p.to_vec()),
        trns: reader.info().trns.as_ref().map(|t| t.to_vec()),
    }
}

fn chunk_names(file: &EncodedImage) -> Vec<String> {
    file.chunks().map(|c| String::from_utf8_lossy(&c.name()).into_owned()).collect()
}

#[test]
fn grayscale_fixture() {
    let png = fixtures::grayscale().unwrap().encode().unwrap();
    let d = decode(&png);
    assert_eq!((d.info.width, d.info.height), (2, 2));
    assert_eq!(d.info.color_type, png::ColorType::Grayscale);
    assert_eq!(d.info.bit_depth, png::BitDepth::Eight);
    assert_eq!(d.pixels, [0, 85, 170, 255]);
    assert_eq!(png.scanline_data().unwrap(), [0, 0, 85, 0, 170, 255]);
}

#[test]
fn palette_fixture() {
    let png = fixtures::palette().unwrap().encode().unwrap();
    let d = decode(&png);
    assert_eq!(d.info.color_type, png::ColorType::Indexed);
    assert_eq!(d.pixels, [0, 85, 170, 255]);
    let palette = d.palette.unwrap();
    assert_eq!(palette.len(), 256 * 3);
    assert_eq!(&palette[85 * 3..86 * 3], &[85, 85, 85]);
    assert!(d.trns.is_none());
    assert_eq!(chunk_names(&png), ["IHDR", "PLTE", "IDAT", "IEND"]);
}

#[test]
fn rgb_fixture() {
    let png = fixtures::rgb().unwrap().encode().unwrap();
    let d = decode(&png);
    assert_eq!(d.info.color_type, png::ColorType::Rgb);
    assert_eq!(d.pixels, [255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255]);
}

#[test]
fn rgba_fixture() {
    let png = fixtures::rgba().unwrap().encode().unwrap();
    let d = decode(&png);
    assert_eq!(d.info.color_type, png::ColorType::Rgba);
    assert_eq!(d.pixels, [255, 0, 0, 255, 0, 255, 0, 170, 0, 0, 255, 85, 255, 255, 255, 0]);
}

#[test]
fn grayscale_alpha_fixture() {
    let png = fixtures::grayscale_alpha().unwrap().encode().unwrap();
    let d = decode(&png);
    assert_eq!(d.info.color_type, png::ColorType::GrayscaleAlpha);
    assert_eq!(d.pixels, [0, 255, 85, 170, 170, 85, 255, 0]);
}

#[test]
fn palette_trans_fixture() {
    let png = fixtures::palette_trans().unwrap().encode().unwrap();
    let d = decode(&png);
    assert_eq!(d.info.color_type, png::ColorType::Indexed);
    assert_eq!(d.pixels, [0, 1, 2, 3]);
    assert_eq!(d.trns.unwrap(), [255, 170, 85, 0]);
    let palette = d.palette.unwrap();
    assert_eq!(&palette[..12], &[255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255]);
    assert_eq!(&palette[12..15], &[128, 128, 128]);
    assert_eq!(chunk_names(&png), ["IHDR", "PLTE", "tRNS", "IDAT", "IEND"]);
}

#[test]
fn write_all_fixtures() {
    let dir = std::env::temp_dir().join(format!("pngfixture-all-{}", std::process::id()));
    let paths = fixtures::write_all(&dir).unwrap();
    assert_eq!(paths.len(), 6);
    for (path, fixture) in paths.iter().zip(fixtures::all().unwrap()) {
        assert_eq!(path.file_name().unwrap(), fixture.name);
        assert_eq!(std::fs::read(path).unwrap(), fixture.encode().unwrap().into_vec());
    }
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn signature_and_iend_always() {
    for colortype in [ColorType::GREY, ColorType::RGB, ColorType::RGBA, ColorType::GREY_ALPHA] {
        let image = PixelBuffer::from_fn(3, 2, colortype, 8, |x, y| vec![(x + y) as u16; colortype.channels()]).unwrap();
        let png = encode(&image, None).unwrap();
        let bytes = png.as_bytes();
        assert_eq!(&bytes[..8], &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);
        assert_eq!(&bytes[bytes.len() - 8..], &[b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82]);
        let last = png.chunks().last().unwrap();
        assert!(last.is_type(b"IEND") && last.is_empty());
    }
}

#[test]
fn chunk_order_and_crcs() {
    let palette = Palette::new(vec![RGB8::new(1, 2, 3); 16], Some(vec![0, 128])).unwrap();
    let image = PixelBuffer::from_fn(40, 40, ColorType::PALETTE, 4, |x, y| [((x * y) % 16) as u16]).unwrap();
    let mut enc = Encoder::new();
    enc.set_level(0);
    enc.set_max_idat_size(Some(100));
    let png = enc.encode(&image, Some(&palette)).unwrap();

    let names = chunk_names(&png);
    assert_eq!(names[0], "IHDR");
    assert_eq!(names.last().unwrap(), "IEND");
    let pos = |n: &str| names.iter().position(|c| c == n).unwrap();
    assert!(pos("PLTE") < pos("tRNS"));
    assert!(pos("tRNS") < pos("IDAT"));
    let idats: Vec<_> = names.iter().enumerate().filter(|(_, n)| *n == "IDAT").map(|(i, _)| i).collect();
    assert!(idats.len() > 1);
    assert!(idats.windows(2).all(|w| w[1] == w[0] + 1), "IDAT chunks must be consecutive");

    for ch in png.chunks() {
        let whole = ch.whole_chunk_data();
        assert_eq!(crc32(&whole[4..whole.len() - 4]), ch.crc());
    }
    assert_eq!(decode(&png).trns.unwrap(), [0, 128]);
}

#[test]
fn palette_size_boundary() {
    assert!(Palette::grayscale(256).is_ok());
    assert!(matches!(Palette::grayscale(257), Err(Error::PaletteTooLarge { len: 257, .. })));
}

#[test]
fn colour_key_is_understood_by_decoder() {
    let image = PixelBuffer::from_bytes(2, 1, ColorType::RGB, &[10, 20, 30, 40, 50, 60]).unwrap().with_key(&[40, 50, 60]).unwrap();
    let png = encode(&image, None).unwrap();
    let trns = png.chunks().find(|c| c.is_type(b"tRNS")).unwrap();
    assert_eq!(trns.data(), &[0, 40, 0, 50, 0, 60]);
    // the decoder reports an 8-bit key as one byte per channel
    assert_eq!(decode(&png).trns.unwrap(), [40, 50, 60]);
}

#[test]
fn errors_are_detected_before_encoding() {
    let image = PixelBuffer::from_bytes(2, 1, ColorType::PALETTE, &[0, 1]).unwrap();
    assert!(matches!(encode(&image, None), Err(Error::PaletteRequired)));
    let grey = PixelBuffer::from_bytes(2, 1, ColorType::GREY, &[0, 1]).unwrap();
    let palette = Palette::grayscale(2).unwrap();
    assert!(matches!(encode(&grey, Some(&palette)), Err(Error::PaletteForbidden(ColorType::GREY))));
    assert!(matches!(PixelBuffer::from_samples(1, 1, ColorType::RGB, 16, vec![0, 0]), Err(Error::InvalidDataLength { .. })));
    assert!(matches!(PixelBuffer::from_samples(1, 1, ColorType::RGB, 4, vec![0, 0, 0]), Err(Error::InvalidBitDepth { .. })));
}

#[test]
fn random() {
    let mut data = vec![0u8; 639 * 479 * 3];
    for (i, px) in data.iter_mut().enumerate() {
        *px = ((i ^ (13 + i * 17) ^ (i * 13) ^ (i / 113 * 11)) >> 5) as u8;
    }

    let image = PixelBuffer::from_bytes(639, 479, ColorType::RGB, &data).unwrap();
    let png = encode(&image, None).unwrap();
    let d = decode(&png);
    assert_eq!(d.pixels, data);
}

#[test]
fn custom_compressor() {
    fn stored(inp: &[u8], out: &mut dyn std::io::Write, _: &CompressSettings) -> Result<(), Error> {
        use std::io::Write;
        let mut z = flate2::write::ZlibEncoder::new(out, flate2::Compression::none());
        z.write_all(inp)?;
        z.finish()?;
        Ok(())
    }

    let image = PixelBuffer::from_bytes(2, 2, ColorType::GREY, &[0, 85, 170, 255]).unwrap();
    let mut enc = Encoder::new();
    enc.set_custom_zlib(Some(stored));
    let png = enc.encode(&image, None).unwrap();
    let idat = png.chunks().find(|c| c.is_type(b"IDAT")).unwrap();
    assert!(idat.data().windows(6).any(|w| w == [0, 0, 85, 0, 170, 255]));
    assert_eq!(decode(&png).pixels, [0, 85, 170, 255]);
}
