//! DDS header structures and flag constants.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// DDS file header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct DdsHeader {
    /// Header size (must be 124).
    pub size: u32,
    /// Header flags (DDSD_*).
    pub flags: u32,
    /// Image height.
    pub height: u32,
    /// Image width.
    pub width: u32,
    /// Pitch of the top mip (uncompressed) or its linear size (compressed).
    pub pitch_or_linear_size: u32,
    /// Depth (for volume textures).
    pub depth: u32,
    /// Number of mipmap levels.
    pub mipmap_count: u32,
    /// Reserved.
    pub reserved1: [u32; 11],
    /// Pixel format.
    pub pixel_format: DdsPixelFormat,
    /// Surface capabilities (DDSCAPS_*).
    pub caps: u32,
    /// Cubemap/volume capabilities (DDSCAPS2_*).
    pub caps2: u32,
    /// Surface capabilities 3.
    pub caps3: u32,
    /// Surface capabilities 4.
    pub caps4: u32,
    /// Reserved.
    pub reserved2: u32,
}

impl DdsHeader {
    /// Expected header size.
    pub const SIZE: u32 = 124;

    /// Check if the pixel format defers to the DX10 extension header.
    pub fn is_dx10(&self) -> bool {
        self.pixel_format.four_cc == FourCC::DX10
    }
}

/// DDS pixel format sub-record.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct DdsPixelFormat {
    /// Structure size (must be 32).
    pub size: u32,
    /// Pixel format flags (DDPF_*).
    pub flags: u32,
    /// Four-character code for compressed or extended formats.
    pub four_cc: FourCC,
    /// Number of bits per pixel (for uncompressed formats).
    pub rgb_bit_count: u32,
    /// Red bit mask.
    pub r_bit_mask: u32,
    /// Green bit mask.
    pub g_bit_mask: u32,
    /// Blue bit mask.
    pub b_bit_mask: u32,
    /// Alpha bit mask.
    pub a_bit_mask: u32,
}

impl DdsPixelFormat {
    /// Expected sub-record size.
    pub const SIZE: u32 = 32;
}

/// Four-character code identifying a legacy compression or format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(transparent)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    /// BC1 compression.
    pub const DXT1: Self = Self(*b"DXT1");
    /// BC2 compression, premultiplied alpha.
    pub const DXT2: Self = Self(*b"DXT2");
    /// BC2 compression.
    pub const DXT3: Self = Self(*b"DXT3");
    /// BC3 compression, premultiplied alpha.
    pub const DXT4: Self = Self(*b"DXT4");
    /// BC3 compression.
    pub const DXT5: Self = Self(*b"DXT5");
    /// BC4 unsigned (ATI naming).
    pub const ATI1: Self = Self(*b"ATI1");
    /// BC5 unsigned (ATI naming).
    pub const ATI2: Self = Self(*b"ATI2");
    /// BC4 unsigned.
    pub const BC4U: Self = Self(*b"BC4U");
    /// BC4 signed.
    pub const BC4S: Self = Self(*b"BC4S");
    /// BC5 unsigned.
    pub const BC5U: Self = Self(*b"BC5U");
    /// BC5 signed.
    pub const BC5S: Self = Self(*b"BC5S");
    /// Packed 4:2:2 video.
    pub const YUY2: Self = Self(*b"YUY2");
    /// Extended-format sentinel: a DX10 header follows.
    pub const DX10: Self = Self(*b"DX10");

    /// Build a FourCC from a legacy numeric D3D format code.
    pub const fn from_code(code: u32) -> Self {
        Self(code.to_le_bytes())
    }

    /// Interpret the FourCC as a little-endian u32.
    pub const fn as_u32(self) -> u32 {
        u32::from_le_bytes(self.0)
    }
}

/// DX10 extension header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct DdsHeaderDx10 {
    /// Extended format code.
    pub dxgi_format: u32,
    /// Resource dimension (DDS_DIMENSION_*).
    pub resource_dimension: u32,
    /// Misc flags (bit 2 = cubemap).
    pub misc_flag: u32,
    /// Array size (logical; faces not included for cubemaps).
    pub array_size: u32,
    /// Misc flags 2 (low 3 bits = alpha mode).
    pub misc_flags2: u32,
}

impl DdsHeaderDx10 {
    /// Expected extension header size.
    pub const SIZE: usize = 20;
}

// Header flags.
pub const DDSD_CAPS: u32 = 0x1;
pub const DDSD_HEIGHT: u32 = 0x2;
pub const DDSD_WIDTH: u32 = 0x4;
pub const DDSD_PITCH: u32 = 0x8;
pub const DDSD_PIXELFORMAT: u32 = 0x1000;
pub const DDSD_MIPMAPCOUNT: u32 = 0x20000;
pub const DDSD_LINEARSIZE: u32 = 0x80000;
pub const DDSD_DEPTH: u32 = 0x800000;

// Pixel format flags.
pub const DDPF_ALPHAPIXELS: u32 = 0x1;
pub const DDPF_ALPHA: u32 = 0x2;
pub const DDPF_FOURCC: u32 = 0x4;
pub const DDPF_RGB: u32 = 0x40;
pub const DDPF_LUMINANCE: u32 = 0x20000;
pub const DDPF_BUMPDUDV: u32 = 0x80000;

// Surface caps.
pub const DDSCAPS_COMPLEX: u32 = 0x8;
pub const DDSCAPS_TEXTURE: u32 = 0x1000;
pub const DDSCAPS_MIPMAP: u32 = 0x400000;

// Cubemap/volume caps.
pub const DDSCAPS2_CUBEMAP: u32 = 0x200;
pub const DDSCAPS2_CUBEMAP_ALLFACES: u32 = 0xFC00;
pub const DDSCAPS2_VOLUME: u32 = 0x200000;

// DX10 resource dimensions.
pub const DDS_DIMENSION_TEXTURE1D: u32 = 2;
pub const DDS_DIMENSION_TEXTURE2D: u32 = 3;
pub const DDS_DIMENSION_TEXTURE3D: u32 = 4;

/// DX10 misc flag marking a cubemap.
pub const DDS_RESOURCE_MISC_TEXTURECUBE: u32 = 0x4;

/// Mask for the alpha-mode bits of `misc_flags2`.
pub const DDS_MISC_FLAGS2_ALPHA_MODE_MASK: u32 = 0x7;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_sizes() {
        assert_eq!(std::mem::size_of::<DdsHeader>(), 124);
        assert_eq!(std::mem::size_of::<DdsPixelFormat>(), 32);
        assert_eq!(std::mem::size_of::<DdsHeaderDx10>(), 20);
    }

    #[test]
    fn test_fourcc_codes() {
        assert_eq!(FourCC::DX10.as_u32(), u32::from_le_bytes(*b"DX10"));
        assert_eq!(FourCC::from_code(36).as_u32(), 36);
    }
}
