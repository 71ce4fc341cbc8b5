use crate::Error;

/// PNG color type. The discriminants are the `IHDR` color type codes.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ColorType {
    /// greyscale: 1, 2, 4, 8, 16 bit
    GREY = 0,
    /// RGB: 8, 16 bit
    RGB = 2,
    /// palette: 1, 2, 4, 8 bit
    PALETTE = 3,
    /// greyscale with alpha: 8, 16 bit
    GREY_ALPHA = 4,
    /// RGB with alpha: 8, 16 bit
    RGBA = 6,
}

impl ColorType {
    /// Samples per pixel. A palette pixel is a single index sample.
    #[inline]
    pub fn channels(self) -> usize {
        match self {
            Self::GREY | Self::PALETTE => 1,
            Self::GREY_ALPHA => 2,
            Self::RGB => 3,
            Self::RGBA => 4,
        }
    }

    /// Bits per pixel for the given bit depth
    #[inline]
    pub fn bpp(self, bitdepth: u8) -> usize {
        self.channels() * usize::from(bitdepth)
    }

    #[inline]
    pub fn is_palette_type(self) -> bool {
        self == Self::PALETTE
    }

    #[inline]
    pub fn is_alpha_type(self) -> bool {
        matches!(self, Self::GREY_ALPHA | Self::RGBA)
    }

    /// Only these can carry a `tRNS` color key
    #[inline]
    pub fn can_have_key(self) -> bool {
        !self.is_palette_type() && !self.is_alpha_type()
    }

    /// Checks the color type / bit depth combinations allowed by PNG
    pub fn check_bitdepth(self, bitdepth: u8) -> Result<(), Error> {
        let ok = match self {
            Self::GREY => matches!(bitdepth, 1 | 2 | 4 | 8 | 16),
            Self::PALETTE => matches!(bitdepth, 1 | 2 | 4 | 8),
            Self::RGB | Self::GREY_ALPHA | Self::RGBA => matches!(bitdepth, 8 | 16),
        };
        if ok {
            Ok(())
        } else {
            Err(Error::InvalidBitDepth { colortype: self, bitdepth })
        }
    }
}

/// Largest value a sample can hold at this bit depth
#[inline]
pub(crate) fn max_sample(bitdepth: u8) -> u16 {
    ((1u32 << bitdepth) - 1) as u16
}

#[test]
fn color_type_codes() {
    assert_eq!(ColorType::GREY as u8, 0);
    assert_eq!(ColorType::RGB as u8, 2);
    assert_eq!(ColorType::PALETTE as u8, 3);
    assert_eq!(ColorType::GREY_ALPHA as u8, 4);
    assert_eq!(ColorType::RGBA as u8, 6);
}

#[test]
fn bitdepth_validity() {
    for bd in [1, 2, 4, 8, 16] {
        assert!(ColorType::GREY.check_bitdepth(bd).is_ok());
    }
    assert!(ColorType::PALETTE.check_bitdepth(16).is_err());
    assert!(ColorType::RGB.check_bitdepth(4).is_err());
    assert!(ColorType::RGBA.check_bitdepth(16).is_ok());
    assert!(ColorType::GREY_ALPHA.check_bitdepth(3).is_err());
    assert_eq!(max_sample(1), 1);
    assert_eq!(max_sample(8), 255);
    assert_eq!(max_sample(16), 65535);
}

#[test]
fn type_classes() {
    let all = [ColorType::GREY, ColorType::RGB, ColorType::PALETTE, ColorType::GREY_ALPHA, ColorType::RGBA];
    let palette: Vec<_> = all.iter().filter(|c| c.is_palette_type()).collect();
    assert_eq!(palette, [&ColorType::PALETTE]);
    let alpha: Vec<_> = all.iter().filter(|c| c.is_alpha_type()).collect();
    assert_eq!(alpha, [&ColorType::GREY_ALPHA, &ColorType::RGBA]);
    let keyed: Vec<_> = all.iter().filter(|c| c.can_have_key()).collect();
    assert_eq!(keyed, [&ColorType::GREY, &ColorType::RGB]);
}
