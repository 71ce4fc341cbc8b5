#![no_main]
#[macro_use] extern crate libfuzzer_sys;
use pngfixture::{ColorType, Encoder, Palette, PixelBuffer};

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    let (colortype, bitdepth) = match data[0] % 5 {
        0 => (ColorType::GREY, [1, 2, 4, 8, 16][data[1] as usize % 5]),
        1 => (ColorType::RGB, [8, 16][data[1] as usize % 2]),
        2 => (ColorType::PALETTE, [1, 2, 4, 8][data[1] as usize % 4]),
        3 => (ColorType::GREY_ALPHA, [8, 16][data[1] as usize % 2]),
        _ => (ColorType::RGBA, [8, 16][data[1] as usize % 2]),
    };
    let max = (1u32 << bitdepth) - 1;
    let samples: Vec<u16> = data[4..].iter().map(|&b| (u32::from(b) * 257 % (max + 1)) as u16).collect();
    let channels = colortype.channels();
    let width = (data[2] as usize).clamp(1, 64);
    let height = samples.len() / channels / width;
    if height == 0 {
        return;
    }
    let samples = samples[..width * height * channels].to_vec();
    let image = PixelBuffer::from_samples(width as u32, height as u32, colortype, bitdepth, samples).unwrap();
    let palette = if colortype == ColorType::PALETTE {
        Some(Palette::grayscale(1 << bitdepth).unwrap())
    } else {
        None
    };

    let mut enc = Encoder::new();
    enc.set_level(data[3] % 10);
    enc.set_max_idat_size(Some(1 + data[3] as usize * 7));
    let png = enc.encode(&image, palette.as_ref()).unwrap();

    assert!(png.chunks().all(|c| c.check_crc()));
    assert!(png.chunks().last().unwrap().is_type(b"IEND"));
    let scanlines: Vec<u8> = image.scanlines().flatten().collect();
    assert_eq!(png.scanline_data().unwrap(), scanlines);
});
