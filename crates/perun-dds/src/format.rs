//! Pixel format enumeration and layout metadata.
//!
//! Every pitch and size computation in the crate goes through the lookup
//! functions here; a format added to [`PixelFormat`] must also be added to
//! the tables below or its subresources will come out zero-sized.

/// A pixel encoding supported by the container and codec.
///
/// Discriminants are the on-disk extended-format codes carried by the
/// DX10 extension header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PixelFormat {
    /// 128-bit, four 32-bit floats.
    R32G32B32A32Float = 2,
    /// 64-bit, four 16-bit floats.
    R16G16B16A16Float = 10,
    /// 64-bit, four 16-bit unsigned normalized.
    R16G16B16A16Unorm = 11,
    /// 64-bit, four 16-bit signed normalized.
    R16G16B16A16Snorm = 13,
    /// 64-bit, two 32-bit floats.
    R32G32Float = 16,
    /// 32-bit packed, 10:10:10:2 unsigned normalized.
    R10G10B10A2Unorm = 24,
    /// 32-bit packed, 11:11:10 float.
    R11G11B10Float = 26,
    /// 32-bit, four 8-bit unsigned normalized.
    R8G8B8A8Unorm = 28,
    /// 32-bit, four 8-bit unsigned normalized, sRGB.
    R8G8B8A8UnormSrgb = 29,
    /// 32-bit, four 8-bit signed normalized.
    R8G8B8A8Snorm = 31,
    /// 32-bit, two 16-bit floats.
    R16G16Float = 34,
    /// 32-bit, two 16-bit unsigned normalized.
    R16G16Unorm = 35,
    /// 32-bit, two 16-bit signed normalized.
    R16G16Snorm = 37,
    /// 32-bit float depth.
    D32Float = 40,
    /// 32-bit float.
    R32Float = 41,
    /// 32-bit unsigned integer.
    R32Uint = 42,
    /// 24-bit unsigned normalized depth + 8-bit stencil.
    D24UnormS8Uint = 45,
    /// 16-bit, two 8-bit unsigned normalized.
    R8G8Unorm = 49,
    /// 16-bit, two 8-bit signed normalized.
    R8G8Snorm = 51,
    /// 16-bit float.
    R16Float = 54,
    /// 16-bit unsigned normalized depth.
    D16Unorm = 55,
    /// 16-bit unsigned normalized.
    R16Unorm = 56,
    /// 16-bit signed normalized.
    R16Snorm = 58,
    /// 8-bit unsigned normalized.
    R8Unorm = 61,
    /// 8-bit signed normalized.
    R8Snorm = 63,
    /// 8-bit alpha only.
    A8Unorm = 65,
    /// BC1 block compression (DXT1), 8 bytes per 4x4 block.
    Bc1Unorm = 71,
    /// BC1 block compression, sRGB.
    Bc1UnormSrgb = 72,
    /// BC2 block compression (DXT2/3), 16 bytes per 4x4 block.
    Bc2Unorm = 74,
    /// BC2 block compression, sRGB.
    Bc2UnormSrgb = 75,
    /// BC3 block compression (DXT4/5), 16 bytes per 4x4 block.
    Bc3Unorm = 77,
    /// BC3 block compression, sRGB.
    Bc3UnormSrgb = 78,
    /// BC4 single-channel block compression, 8 bytes per 4x4 block.
    Bc4Unorm = 80,
    /// BC4 single-channel block compression, signed.
    Bc4Snorm = 81,
    /// BC5 two-channel block compression, 16 bytes per 4x4 block.
    Bc5Unorm = 83,
    /// BC5 two-channel block compression, signed.
    Bc5Snorm = 84,
    /// 16-bit packed, 5:6:5 unsigned normalized.
    B5G6R5Unorm = 85,
    /// 16-bit packed, 5:5:5:1 unsigned normalized.
    B5G5R5A1Unorm = 86,
    /// 32-bit, four 8-bit unsigned normalized, BGRA order.
    B8G8R8A8Unorm = 87,
    /// 32-bit, three 8-bit unsigned normalized, BGRX order.
    B8G8R8X8Unorm = 88,
    /// 32-bit BGRA, sRGB.
    B8G8R8A8UnormSrgb = 91,
    /// 32-bit BGRX, sRGB.
    B8G8R8X8UnormSrgb = 93,
    /// BC6H HDR block compression, unsigned half floats.
    Bc6hUf16 = 95,
    /// BC6H HDR block compression, signed half floats.
    Bc6hSf16 = 96,
    /// BC7 block compression, 16 bytes per 4x4 block.
    Bc7Unorm = 98,
    /// BC7 block compression, sRGB.
    Bc7UnormSrgb = 99,
    /// Planar 4:2:0 video, 8-bit samples.
    Nv12 = 103,
    /// Planar 4:2:0 video, 10-bit samples in 16-bit words.
    P010 = 104,
    /// Planar 4:2:0 video, 16-bit samples.
    P016 = 105,
    /// Packed 4:2:2 video, 8-bit samples.
    Yuy2 = 107,
    /// 16-bit packed, 4:4:4:4 unsigned normalized.
    B4G4R4A4Unorm = 115,
}

impl PixelFormat {
    /// Map an on-disk extended-format code to a pixel format.
    pub fn from_wire(code: u32) -> Option<Self> {
        use PixelFormat::*;
        Some(match code {
            2 => R32G32B32A32Float,
            10 => R16G16B16A16Float,
            11 => R16G16B16A16Unorm,
            13 => R16G16B16A16Snorm,
            16 => R32G32Float,
            24 => R10G10B10A2Unorm,
            26 => R11G11B10Float,
            28 => R8G8B8A8Unorm,
            29 => R8G8B8A8UnormSrgb,
            31 => R8G8B8A8Snorm,
            34 => R16G16Float,
            35 => R16G16Unorm,
            37 => R16G16Snorm,
            40 => D32Float,
            41 => R32Float,
            42 => R32Uint,
            45 => D24UnormS8Uint,
            49 => R8G8Unorm,
            51 => R8G8Snorm,
            54 => R16Float,
            55 => D16Unorm,
            56 => R16Unorm,
            58 => R16Snorm,
            61 => R8Unorm,
            63 => R8Snorm,
            65 => A8Unorm,
            71 => Bc1Unorm,
            72 => Bc1UnormSrgb,
            74 => Bc2Unorm,
            75 => Bc2UnormSrgb,
            77 => Bc3Unorm,
            78 => Bc3UnormSrgb,
            80 => Bc4Unorm,
            81 => Bc4Snorm,
            83 => Bc5Unorm,
            84 => Bc5Snorm,
            85 => B5G6R5Unorm,
            86 => B5G5R5A1Unorm,
            87 => B8G8R8A8Unorm,
            88 => B8G8R8X8Unorm,
            91 => B8G8R8A8UnormSrgb,
            93 => B8G8R8X8UnormSrgb,
            95 => Bc6hUf16,
            96 => Bc6hSf16,
            98 => Bc7Unorm,
            99 => Bc7UnormSrgb,
            103 => Nv12,
            104 => P010,
            105 => P016,
            107 => Yuy2,
            115 => B4G4R4A4Unorm,
            _ => return None,
        })
    }

    /// The on-disk extended-format code for this pixel format.
    #[inline]
    pub const fn wire_code(self) -> u32 {
        self as u32
    }
}

/// Bytes per 4x4 block for block-compressed formats, 0 otherwise.
pub const fn block_size(format: PixelFormat) -> u32 {
    use PixelFormat::*;
    match format {
        Bc1Unorm | Bc1UnormSrgb | Bc4Unorm | Bc4Snorm => 8,
        Bc2Unorm | Bc2UnormSrgb | Bc3Unorm | Bc3UnormSrgb | Bc5Unorm | Bc5Snorm | Bc6hUf16
        | Bc6hSf16 | Bc7Unorm | Bc7UnormSrgb => 16,
        _ => 0,
    }
}

/// Bits per pixel for non-block-compressed formats, 0 for block-compressed.
///
/// Planar 4:2:0 formats report their average (12 or 24 bits); row pitch for
/// those goes through the dedicated packed/planar formulas instead.
pub const fn bits_per_pixel(format: PixelFormat) -> u32 {
    use PixelFormat::*;
    match format {
        R32G32B32A32Float => 128,
        R16G16B16A16Float | R16G16B16A16Unorm | R16G16B16A16Snorm | R32G32Float => 64,
        R10G10B10A2Unorm | R11G11B10Float | R8G8B8A8Unorm | R8G8B8A8UnormSrgb | R8G8B8A8Snorm
        | R16G16Float | R16G16Unorm | R16G16Snorm | D32Float | R32Float | R32Uint
        | D24UnormS8Uint | B8G8R8A8Unorm | B8G8R8X8Unorm | B8G8R8A8UnormSrgb
        | B8G8R8X8UnormSrgb => 32,
        P010 | P016 => 24,
        R8G8Unorm | R8G8Snorm | R16Float | D16Unorm | R16Unorm | R16Snorm | B5G6R5Unorm
        | B5G5R5A1Unorm | B4G4R4A4Unorm | Yuy2 => 16,
        Nv12 => 12,
        R8Unorm | R8Snorm | A8Unorm => 8,
        Bc1Unorm | Bc1UnormSrgb | Bc2Unorm | Bc2UnormSrgb | Bc3Unorm | Bc3UnormSrgb | Bc4Unorm
        | Bc4Snorm | Bc5Unorm | Bc5Snorm | Bc6hUf16 | Bc6hSf16 | Bc7Unorm | Bc7UnormSrgb => 0,
    }
}

/// Whether the format stores fixed-size compressed blocks.
#[inline]
pub const fn is_compressed(format: PixelFormat) -> bool {
    block_size(format) != 0
}

/// Number of color/data channels the format encodes.
pub const fn channel_count(format: PixelFormat) -> u32 {
    use PixelFormat::*;
    match format {
        R32G32B32A32Float | R16G16B16A16Float | R16G16B16A16Unorm | R16G16B16A16Snorm
        | R10G10B10A2Unorm | R8G8B8A8Unorm | R8G8B8A8UnormSrgb | R8G8B8A8Snorm
        | B8G8R8A8Unorm | B8G8R8A8UnormSrgb | B5G5R5A1Unorm | B4G4R4A4Unorm | Bc1Unorm
        | Bc1UnormSrgb | Bc2Unorm | Bc2UnormSrgb | Bc3Unorm | Bc3UnormSrgb | Bc7Unorm
        | Bc7UnormSrgb => 4,
        R11G11B10Float | B5G6R5Unorm | B8G8R8X8Unorm | B8G8R8X8UnormSrgb | Bc6hUf16
        | Bc6hSf16 | Nv12 | P010 | P016 | Yuy2 => 3,
        R32G32Float | R16G16Float | R16G16Unorm | R16G16Snorm | R8G8Unorm | R8G8Snorm
        | D24UnormS8Uint | Bc5Unorm | Bc5Snorm => 2,
        D32Float | R32Float | R32Uint | R16Float | D16Unorm | R16Unorm | R16Snorm | R8Unorm
        | R8Snorm | A8Unorm | Bc4Unorm | Bc4Snorm => 1,
    }
}

/// Depth bits for depth/stencil formats, 0 otherwise.
pub const fn depth_bits(format: PixelFormat) -> u32 {
    use PixelFormat::*;
    match format {
        D16Unorm => 16,
        D24UnormS8Uint => 24,
        D32Float => 32,
        _ => 0,
    }
}

/// Stencil bits for depth/stencil formats, 0 otherwise.
pub const fn stencil_bits(format: PixelFormat) -> u32 {
    use PixelFormat::*;
    match format {
        D24UnormS8Uint => 8,
        _ => 0,
    }
}

/// Alpha bits the format encodes, 0 if it has no alpha channel.
pub const fn alpha_bits(format: PixelFormat) -> u32 {
    use PixelFormat::*;
    match format {
        R32G32B32A32Float => 32,
        R16G16B16A16Float | R16G16B16A16Unorm | R16G16B16A16Snorm => 16,
        A8Unorm | R8G8B8A8Unorm | R8G8B8A8UnormSrgb | R8G8B8A8Snorm | B8G8R8A8Unorm
        | B8G8R8A8UnormSrgb | Bc2Unorm | Bc2UnormSrgb | Bc3Unorm | Bc3UnormSrgb | Bc7Unorm
        | Bc7UnormSrgb => 8,
        B4G4R4A4Unorm => 4,
        R10G10B10A2Unorm => 2,
        B5G5R5A1Unorm | Bc1Unorm | Bc1UnormSrgb => 1,
        _ => 0,
    }
}

/// Packed video formats (two pixels share one 32-bit word).
#[inline]
pub(crate) const fn is_packed(format: PixelFormat) -> bool {
    matches!(format, PixelFormat::Yuy2)
}

/// Planar 4:2:0 video formats (separate chroma plane at half height).
#[inline]
pub(crate) const fn is_planar(format: PixelFormat) -> bool {
    matches!(
        format,
        PixelFormat::Nv12 | PixelFormat::P010 | PixelFormat::P016
    )
}

/// Bytes per packed element (a 2x1 pixel pair or one plane sample pair).
pub(crate) const fn packed_element_bytes(format: PixelFormat) -> u32 {
    use PixelFormat::*;
    match format {
        Yuy2 => 4,
        Nv12 => 2,
        P010 | P016 => 4,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_sizes() {
        assert_eq!(block_size(PixelFormat::Bc1Unorm), 8);
        assert_eq!(block_size(PixelFormat::Bc4Snorm), 8);
        assert_eq!(block_size(PixelFormat::Bc3Unorm), 16);
        assert_eq!(block_size(PixelFormat::Bc7UnormSrgb), 16);
        assert_eq!(block_size(PixelFormat::R8G8B8A8Unorm), 0);
    }

    #[test]
    fn test_bits_per_pixel() {
        assert_eq!(bits_per_pixel(PixelFormat::R32G32B32A32Float), 128);
        assert_eq!(bits_per_pixel(PixelFormat::R8G8B8A8Unorm), 32);
        assert_eq!(bits_per_pixel(PixelFormat::B5G6R5Unorm), 16);
        assert_eq!(bits_per_pixel(PixelFormat::R8Unorm), 8);
        // Block-compressed formats report zero; block_size covers them.
        assert_eq!(bits_per_pixel(PixelFormat::Bc1Unorm), 0);
    }

    #[test]
    fn test_compressed_flag() {
        assert!(is_compressed(PixelFormat::Bc1Unorm));
        assert!(is_compressed(PixelFormat::Bc6hSf16));
        assert!(!is_compressed(PixelFormat::R8G8B8A8Unorm));
        assert!(!is_compressed(PixelFormat::Nv12));
    }

    #[test]
    fn test_depth_stencil_bits() {
        assert_eq!(depth_bits(PixelFormat::D16Unorm), 16);
        assert_eq!(depth_bits(PixelFormat::D24UnormS8Uint), 24);
        assert_eq!(stencil_bits(PixelFormat::D24UnormS8Uint), 8);
        assert_eq!(depth_bits(PixelFormat::D32Float), 32);
        assert_eq!(stencil_bits(PixelFormat::D32Float), 0);
        assert_eq!(depth_bits(PixelFormat::R32Float), 0);
    }

    #[test]
    fn test_alpha_and_channels() {
        assert_eq!(alpha_bits(PixelFormat::A8Unorm), 8);
        assert_eq!(alpha_bits(PixelFormat::R10G10B10A2Unorm), 2);
        assert_eq!(alpha_bits(PixelFormat::B5G6R5Unorm), 0);
        assert_eq!(channel_count(PixelFormat::Bc7Unorm), 4);
        assert_eq!(channel_count(PixelFormat::Bc5Unorm), 2);
        assert_eq!(channel_count(PixelFormat::A8Unorm), 1);
    }

    #[test]
    fn test_wire_round_trip() {
        for code in 0..200 {
            if let Some(format) = PixelFormat::from_wire(code) {
                assert_eq!(format.wire_code(), code);
            }
        }
        assert_eq!(PixelFormat::from_wire(0), None);
        // Palette and 4:2:0-opaque codes are not representable.
        assert_eq!(PixelFormat::from_wire(106), None);
        assert_eq!(PixelFormat::from_wire(113), None);
        assert_eq!(PixelFormat::from_wire(114), None);
    }
}
