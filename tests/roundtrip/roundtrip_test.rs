use pngfixture::*;

#[test]
fn roundtrip_grey() {
    roundtrip_color(ColorType::GREY, &[1, 2, 4, 8, 16]);
}

#[test]
fn roundtrip_rgb() {
    roundtrip_color(ColorType::RGB, &[8, 16]);
}

#[test]
fn roundtrip_rgba() {
    roundtrip_color(ColorType::RGBA, &[8, 16]);
}

#[test]
fn roundtrip_grey_alpha() {
    roundtrip_color(ColorType::GREY_ALPHA, &[8, 16]);
}

#[test]
fn roundtrip_palette() {
    roundtrip_color(ColorType::PALETTE, &[1, 2, 4, 8]);
}

#[track_caller]
fn roundtrip_color(colortype: ColorType, bitdepths: &[u8]) {
    let mut seed = 1u32;
    for &bitdepth in bitdepths {
        for width in [1, 2, 3, 4, 5, 7, 8, 9, 15, 16, 17, 33] {
            for height in [1, 2, 3, 5, 8, 13] {
                let samples = randomize(&mut seed, width * height * colortype.channels(), bitdepth);
                roundtrip_data(samples, width as u32, height as u32, colortype, bitdepth);
            }
        }
    }
}

fn randomize(seed: &mut u32, len: usize, bitdepth: u8) -> Vec<u16> {
    let mask = ((1u32 << bitdepth) - 1) as u16;
    (0..len).map(|_| {
        *seed = 1103515245u32.wrapping_mul(*seed).wrapping_add(12345);
        (*seed >> 8) as u16 & mask
    }).collect()
}

#[track_caller]
fn roundtrip_data(samples: Vec<u16>, width: u32, height: u32, colortype: ColorType, bitdepth: u8) {
    let image = PixelBuffer::from_samples(width, height, colortype, bitdepth, samples).unwrap();
    let palette = if colortype == ColorType::PALETTE {
        Some(Palette::grayscale(1 << bitdepth).unwrap())
    } else {
        None
    };

    let file = encode(&image, palette.as_ref()).unwrap();

    let decoder = png::Decoder::new(file.as_bytes());
    let mut reader = decoder.read_info().unwrap();
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).unwrap();

    assert_eq!(info.width, width);
    assert_eq!(info.height, height);
    assert_eq!(info.color_type as u8, colortype as u8);
    assert_eq!(info.bit_depth as u8, bitdepth);
    assert_eq!(unpack(&buf[..info.buffer_size()], info.line_size, width as usize * colortype.channels(), bitdepth), image.samples());
}

/// Decoded rows back into one sample per item
fn unpack(buf: &[u8], line_size: usize, samples_per_row: usize, bitdepth: u8) -> Vec<u16> {
    let mut out = Vec::new();
    for row in buf.chunks(line_size) {
        match bitdepth {
            16 => out.extend(row.chunks_exact(2).take(samples_per_row).map(|b| u16::from_be_bytes([b[0], b[1]]))),
            8 => out.extend(row.iter().take(samples_per_row).map(|&b| u16::from(b))),
            bits => {
                let per_byte = 8 / bits as usize;
                let mask = (1u8 << bits) - 1;
                out.extend((0..samples_per_row).map(|i| {
                    let shift = 8 - bits as usize * (i % per_byte + 1);
                    u16::from((row[i / per_byte] >> shift) & mask)
                }));
            },
        }
    }
    out
}
