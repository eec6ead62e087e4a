//! DDS decoding.
//!
//! The decoder validates an untrusted byte buffer against the legacy and
//! extended header forms, resolves the pixel format and dimension, walks
//! the subresource region computing the exact byte layout, and copies the
//! retained levels into a freshly constructed [`Image`].

use perun_common::SpanReader;

use crate::format::{self, PixelFormat};
use crate::header::{
    DdsHeader, DdsHeaderDx10, DdsPixelFormat, FourCC, DDPF_ALPHA, DDPF_BUMPDUDV, DDPF_FOURCC,
    DDPF_LUMINANCE, DDPF_RGB, DDSCAPS2_CUBEMAP, DDSCAPS2_CUBEMAP_ALLFACES, DDSD_DEPTH,
    DDSD_HEIGHT, DDS_DIMENSION_TEXTURE1D, DDS_DIMENSION_TEXTURE2D, DDS_DIMENSION_TEXTURE3D,
    DDS_MISC_FLAGS2_ALPHA_MODE_MASK, DDS_RESOURCE_MISC_TEXTURECUBE,
};
use crate::image::{
    compute_surface_size, row_pitch_bytes, slice_pitch_bytes, Image, ImageAlphaMode,
    ImageDimension, ImageSize,
};
use crate::{Error, Result, DDS_MAGIC};

/// Mip chain length cap.
pub(crate) const MAX_MIP_LEVELS: u32 = 15;
/// Maximum extent for 1D, 2D and cubemap textures.
pub(crate) const MAX_TEXTURE_EXTENT: u32 = 16384;
/// Maximum extent for volume textures.
pub(crate) const MAX_TEXTURE3D_EXTENT: u32 = 2048;
/// Maximum length of the array axis.
pub(crate) const MAX_ARRAY_LAYERS: u32 = 2048;
/// Ceiling on `mip_count * array_count`.
pub(crate) const MAX_SUBRESOURCES: u64 = 30720;

/// Header fields after format/dimension resolution.
struct Resolved {
    format: PixelFormat,
    dimension: ImageDimension,
    size: ImageSize,
    array_count: u32,
    alpha_mode: ImageAlphaMode,
}

/// One subresource of the input buffer, as laid out by the walk.
struct PendingSurface {
    src_offset: usize,
    len: usize,
    line_pitch: usize,
    slice_pitch: usize,
    size: ImageSize,
    mip_level: u32,
}

/// Decode a DDS file from a byte buffer.
pub fn decode(data: &[u8]) -> Result<Image> {
    decode_with_max_size(data, 0)
}

/// Decode a DDS file, dropping leading mip levels larger than `max_size`.
///
/// With `max_size = 0` every level is retained. When a ceiling is set and
/// the file has more than one mip level, levels whose width, height or
/// depth exceed the ceiling are skipped (their bytes are still walked
/// over) and the first retained level becomes the image's top level.
pub fn decode_with_max_size(data: &[u8], max_size: u32) -> Result<Image> {
    if data.len() < 4 + std::mem::size_of::<DdsHeader>() {
        return Err(Error::InvalidHeader("file too small".into()));
    }

    // Verify magic
    let magic = [data[0], data[1], data[2], data[3]];
    if &magic != DDS_MAGIC {
        return Err(Error::InvalidMagic(magic));
    }

    let mut reader = SpanReader::new(&data[4..]);
    let header: DdsHeader = reader.read_struct()?;

    let header_size = header.size;
    if header_size != DdsHeader::SIZE {
        return Err(Error::InvalidHeader(format!(
            "header size must be {}, got {}",
            DdsHeader::SIZE,
            header_size
        )));
    }
    let pf_size = header.pixel_format.size;
    if pf_size != DdsPixelFormat::SIZE {
        return Err(Error::InvalidHeader(format!(
            "pixel format size must be {}, got {}",
            DdsPixelFormat::SIZE,
            pf_size
        )));
    }

    let resolved = if header.is_dx10() {
        let dx10: DdsHeaderDx10 = reader
            .read_struct()
            .map_err(|_| Error::InvalidHeader("missing DX10 extension header".into()))?;
        resolve_dx10(&header, &dx10)?
    } else {
        resolve_legacy(&header)?
    };

    let mip_count = header.mipmap_count.max(1);
    validate_limits(&resolved, mip_count)?;

    let data_offset = 4 + reader.position();
    walk_and_materialize(data, data_offset, &resolved, mip_count, max_size)
}

/// Resolve format and dimension from the DX10 extension header.
fn resolve_dx10(header: &DdsHeader, dx10: &DdsHeaderDx10) -> Result<Resolved> {
    let mut array_count = dx10.array_size;
    if array_count == 0 {
        return Err(Error::InvalidHeader("array size must be at least 1".into()));
    }

    let alpha_bits = dx10.misc_flags2 & DDS_MISC_FLAGS2_ALPHA_MODE_MASK;
    let alpha_mode = ImageAlphaMode::from_wire(alpha_bits)
        .ok_or_else(|| Error::InvalidHeader(format!("invalid alpha mode {alpha_bits}")))?;

    let code = dx10.dxgi_format;
    let format = match code {
        // 4:2:0 opaque has no CPU-accessible layout.
        106 => {
            return Err(Error::UnsupportedFormat(
                "4:2:0 opaque video format".into(),
            ))
        }
        // P8 / A8P8 palette formats.
        113 | 114 => {
            return Err(Error::UnsupportedFormat(
                "palette formats are not supported".into(),
            ))
        }
        _ => PixelFormat::from_wire(code)
            .ok_or_else(|| Error::UnsupportedFormat(format!("extended format code {code}")))?,
    };

    let width = header.width;
    let height = header.height;

    if format::is_planar(format) && (width % 2 != 0 || height % 2 != 0) {
        return Err(Error::UnsupportedFormat(format!(
            "planar format requires even dimensions, got {width}x{height}"
        )));
    }
    if format::is_packed(format) && width % 2 != 0 {
        return Err(Error::UnsupportedFormat(format!(
            "packed format requires even width, got {width}"
        )));
    }

    let resource_dimension = dx10.resource_dimension;
    let (dimension, size) = match resource_dimension {
        DDS_DIMENSION_TEXTURE1D => {
            if header.flags & DDSD_HEIGHT != 0 && height != 1 {
                return Err(Error::InvalidHeader(format!(
                    "1D texture with height {height}"
                )));
            }
            (ImageDimension::Texture1D, ImageSize::new(width, 1, 1))
        }
        DDS_DIMENSION_TEXTURE2D => {
            if dx10.misc_flag & DDS_RESOURCE_MISC_TEXTURECUBE != 0 {
                array_count *= Image::CUBE_FACES;
                (ImageDimension::TextureCube, ImageSize::new(width, height, 1))
            } else {
                (ImageDimension::Texture2D, ImageSize::new(width, height, 1))
            }
        }
        DDS_DIMENSION_TEXTURE3D => {
            if header.flags & DDSD_DEPTH == 0 {
                return Err(Error::InvalidHeader(
                    "volume texture without depth flag".into(),
                ));
            }
            if array_count > 1 {
                return Err(Error::UnsupportedLayout(
                    "volume textures cannot be arrayed".into(),
                ));
            }
            let depth = header.depth.max(1);
            (ImageDimension::Texture3D, ImageSize::new(width, height, depth))
        }
        other => {
            return Err(Error::UnsupportedLayout(format!(
                "resource dimension {other}"
            )))
        }
    };

    Ok(Resolved {
        format,
        dimension,
        size,
        array_count,
        alpha_mode,
    })
}

/// Resolve format and dimension from the legacy header alone.
fn resolve_legacy(header: &DdsHeader) -> Result<Resolved> {
    let pixel_format = header.pixel_format;
    let (format, alpha_mode) = format_from_legacy(&pixel_format)
        .ok_or_else(|| Error::UnsupportedFormat(describe_pixel_format(&pixel_format)))?;

    let width = header.width;
    if format::is_packed(format) && width % 2 != 0 {
        return Err(Error::UnsupportedFormat(format!(
            "packed format requires even width, got {width}"
        )));
    }

    let caps2 = header.caps2;
    let (dimension, size, array_count) = if header.flags & DDSD_DEPTH != 0 {
        let depth = header.depth.max(1);
        (
            ImageDimension::Texture3D,
            ImageSize::new(width, header.height, depth),
            1,
        )
    } else if caps2 & DDSCAPS2_CUBEMAP != 0 {
        // Partial cubemaps were legal in old writers but have no place in
        // the container model.
        if caps2 & DDSCAPS2_CUBEMAP_ALLFACES != DDSCAPS2_CUBEMAP_ALLFACES {
            return Err(Error::UnsupportedLayout(
                "cubemap with incomplete face set".into(),
            ));
        }
        (
            ImageDimension::TextureCube,
            ImageSize::new(width, header.height, 1),
            Image::CUBE_FACES,
        )
    } else {
        (
            ImageDimension::Texture2D,
            ImageSize::new(width, header.height, 1),
            1,
        )
    };

    Ok(Resolved {
        format,
        dimension,
        size,
        array_count,
        alpha_mode,
    })
}

/// Map the legacy bit-mask/FourCC pixel format record to a pixel format.
///
/// Matching is exact; any record outside the table is unsupported. DXT2
/// and DXT4 additionally imply premultiplied alpha.
fn format_from_legacy(pf: &DdsPixelFormat) -> Option<(PixelFormat, ImageAlphaMode)> {
    use PixelFormat::*;

    let flags = pf.flags;
    let bit_count = pf.rgb_bit_count;
    let masks = (pf.r_bit_mask, pf.g_bit_mask, pf.b_bit_mask, pf.a_bit_mask);

    let format = if flags & DDPF_RGB != 0 {
        match (bit_count, masks) {
            (32, (0xff, 0xff00, 0xff0000, 0xff000000)) => R8G8B8A8Unorm,
            (32, (0xff0000, 0xff00, 0xff, 0xff000000)) => B8G8R8A8Unorm,
            (32, (0xff0000, 0xff00, 0xff, 0)) => B8G8R8X8Unorm,
            (32, (0x3ff, 0xffc00, 0x3ff00000, 0xc0000000)) => R10G10B10A2Unorm,
            (32, (0xffff, 0xffff0000, 0, 0)) => R16G16Unorm,
            (32, (0xffffffff, 0, 0, 0)) => R32Float,
            (16, (0x7c00, 0x3e0, 0x1f, 0x8000)) => B5G5R5A1Unorm,
            (16, (0xf800, 0x7e0, 0x1f, 0)) => B5G6R5Unorm,
            (16, (0xf00, 0xf0, 0xf, 0xf000)) => B4G4R4A4Unorm,
            _ => return None,
        }
    } else if flags & DDPF_LUMINANCE != 0 {
        match (bit_count, masks) {
            (8, (0xff, 0, 0, 0)) => R8Unorm,
            (16, (0xffff, 0, 0, 0)) => R16Unorm,
            (16, (0xff, 0, 0, 0xff00)) => R8G8Unorm,
            _ => return None,
        }
    } else if flags & DDPF_ALPHA != 0 {
        match bit_count {
            8 => A8Unorm,
            _ => return None,
        }
    } else if flags & DDPF_BUMPDUDV != 0 {
        match (bit_count, masks) {
            (16, (0xff, 0xff00, 0, 0)) => R8G8Snorm,
            (32, (0xff, 0xff00, 0xff0000, 0xff000000)) => R8G8B8A8Snorm,
            (32, (0xffff, 0xffff0000, 0, 0)) => R16G16Snorm,
            _ => return None,
        }
    } else if flags & DDPF_FOURCC != 0 {
        let (format, alpha) = match pf.four_cc {
            FourCC::DXT1 => (Bc1Unorm, ImageAlphaMode::Unknown),
            FourCC::DXT2 => (Bc2Unorm, ImageAlphaMode::Premultiplied),
            FourCC::DXT3 => (Bc2Unorm, ImageAlphaMode::Unknown),
            FourCC::DXT4 => (Bc3Unorm, ImageAlphaMode::Premultiplied),
            FourCC::DXT5 => (Bc3Unorm, ImageAlphaMode::Unknown),
            FourCC::ATI1 | FourCC::BC4U => (Bc4Unorm, ImageAlphaMode::Unknown),
            FourCC::BC4S => (Bc4Snorm, ImageAlphaMode::Unknown),
            FourCC::ATI2 | FourCC::BC5U => (Bc5Unorm, ImageAlphaMode::Unknown),
            FourCC::BC5S => (Bc5Snorm, ImageAlphaMode::Unknown),
            FourCC::YUY2 => (Yuy2, ImageAlphaMode::Unknown),
            // Numeric D3DFMT codes used by old writers.
            other => {
                let format = match other.as_u32() {
                    36 => R16G16B16A16Unorm,
                    110 => R16G16B16A16Snorm,
                    111 => R16Float,
                    112 => R16G16Float,
                    113 => R16G16B16A16Float,
                    114 => R32Float,
                    115 => R32G32Float,
                    116 => R32G32B32A32Float,
                    _ => return None,
                };
                (format, ImageAlphaMode::Unknown)
            }
        };
        return Some((format, alpha));
    } else {
        return None;
    };

    Some((format, ImageAlphaMode::Unknown))
}

fn describe_pixel_format(pf: &DdsPixelFormat) -> String {
    let flags = pf.flags;
    if flags & DDPF_FOURCC != 0 {
        let cc = pf.four_cc;
        format!("fourcc {:?}", cc.0)
    } else {
        let (bit_count, r, g, b, a) = (
            pf.rgb_bit_count,
            pf.r_bit_mask,
            pf.g_bit_mask,
            pf.b_bit_mask,
            pf.a_bit_mask,
        );
        format!(
            "flags {flags:#x}, {bit_count} bpp, masks {r:#010x}/{g:#010x}/{b:#010x}/{a:#010x}"
        )
    }
}

/// Enforce dimension-dependent extent and count ceilings.
fn validate_limits(resolved: &Resolved, mip_count: u32) -> Result<()> {
    if mip_count > MAX_MIP_LEVELS {
        return Err(Error::UnsupportedLayout(format!(
            "mip count {mip_count} exceeds {MAX_MIP_LEVELS}"
        )));
    }

    let ImageSize {
        width,
        height,
        depth,
    } = resolved.size;
    let array_count = resolved.array_count;

    match resolved.dimension {
        ImageDimension::Texture1D => {
            if array_count > MAX_ARRAY_LAYERS || width > MAX_TEXTURE_EXTENT {
                return Err(Error::UnsupportedLayout(format!(
                    "1D texture {width} x{array_count} exceeds limits"
                )));
            }
        }
        ImageDimension::Texture2D => {
            if array_count > MAX_ARRAY_LAYERS
                || width > MAX_TEXTURE_EXTENT
                || height > MAX_TEXTURE_EXTENT
            {
                return Err(Error::UnsupportedLayout(format!(
                    "2D texture {width}x{height} x{array_count} exceeds limits"
                )));
            }
        }
        ImageDimension::TextureCube => {
            if width != height {
                return Err(Error::UnsupportedLayout(format!(
                    "cubemap faces must be square, got {width}x{height}"
                )));
            }
            if array_count > MAX_ARRAY_LAYERS || width > MAX_TEXTURE_EXTENT {
                return Err(Error::UnsupportedLayout(format!(
                    "cubemap {width}x{height} x{array_count} exceeds limits"
                )));
            }
        }
        ImageDimension::Texture3D => {
            if width > MAX_TEXTURE3D_EXTENT
                || height > MAX_TEXTURE3D_EXTENT
                || depth > MAX_TEXTURE3D_EXTENT
            {
                return Err(Error::UnsupportedLayout(format!(
                    "volume texture {width}x{height}x{depth} exceeds limits"
                )));
            }
        }
        ImageDimension::Unknown => {
            return Err(Error::UnsupportedLayout("unknown dimension".into()))
        }
    }

    let subresources = mip_count as u64 * array_count as u64;
    if subresources > MAX_SUBRESOURCES {
        return Err(Error::UnsupportedLayout(format!(
            "{subresources} subresources exceed {MAX_SUBRESOURCES}"
        )));
    }

    Ok(())
}

/// Walk the subresource region, then build and fill the image.
fn walk_and_materialize(
    data: &[u8],
    data_offset: usize,
    resolved: &Resolved,
    mip_count: u32,
    max_size: u32,
) -> Result<Image> {
    let format = resolved.format;
    let base = resolved.size;

    let mut pending: Vec<PendingSurface> = Vec::new();
    // Counted on array slice 0 only; the skip itself applies to every
    // slice. The counter feeds the retained mip count, nothing else.
    let mut skipped_leading = 0u32;
    let mut top_size: Option<ImageSize> = None;
    let mut cursor = data_offset;

    for array in 0..resolved.array_count {
        let mut retained_in_slice = 0u32;
        for mip in 0..mip_count {
            let mip_size = compute_surface_size(format, base, mip);
            let line_pitch = row_pitch_bytes(format, mip_size.width);
            let slice_pitch = slice_pitch_bytes(format, mip_size.width, mip_size.height);
            let len = slice_pitch * mip_size.depth as usize;

            let end = cursor + len;
            if end > data.len() {
                return Err(Error::Truncated {
                    needed: end - data_offset,
                    available: data.len() - data_offset,
                });
            }

            let retain = mip_count <= 1
                || max_size == 0
                || (mip_size.width <= max_size
                    && mip_size.height <= max_size
                    && mip_size.depth <= max_size);

            if retain {
                if top_size.is_none() {
                    top_size = Some(mip_size);
                }
                pending.push(PendingSurface {
                    src_offset: cursor,
                    len,
                    line_pitch,
                    slice_pitch,
                    size: mip_size,
                    mip_level: retained_in_slice,
                });
                retained_in_slice += 1;
            } else if array == 0 {
                skipped_leading += 1;
            }

            cursor = end;
        }
    }

    let top = top_size.ok_or_else(|| Error::InvalidHeader("no subresources retained".into()))?;
    let retained_mips = mip_count - skipped_leading;

    let mut image = match resolved.dimension {
        ImageDimension::Texture1D => Image::new_1d(
            format,
            top.width,
            retained_mips,
            resolved.array_count,
            resolved.alpha_mode,
        ),
        ImageDimension::Texture2D => Image::new_2d(
            format,
            top.width,
            top.height,
            retained_mips,
            resolved.array_count,
            resolved.alpha_mode,
        ),
        ImageDimension::TextureCube => Image::new_cube(
            format,
            top.width,
            top.height,
            retained_mips,
            resolved.array_count / Image::CUBE_FACES,
            resolved.alpha_mode,
        ),
        ImageDimension::Texture3D => Image::new_3d(
            format,
            top.width,
            top.height,
            top.depth,
            retained_mips,
            resolved.alpha_mode,
        ),
        ImageDimension::Unknown => {
            return Err(Error::UnsupportedLayout("unknown dimension".into()))
        }
    };

    // The container computed its own layout from the resolved parameters;
    // both must agree element-for-element before any bytes move.
    if image.subresource_count() != pending.len() {
        return Err(Error::LayoutMismatch { index: 0 });
    }
    for (index, surface) in pending.iter().enumerate() {
        let (len, line_pitch, slice_pitch, size, mip_level) = image
            .surface_layout(index)
            .ok_or(Error::LayoutMismatch { index })?;
        if len != surface.len
            || line_pitch != surface.line_pitch
            || slice_pitch != surface.slice_pitch
            || size != surface.size
            || mip_level != surface.mip_level
        {
            return Err(Error::LayoutMismatch { index });
        }
    }

    for (index, surface) in pending.iter().enumerate() {
        let dst = image
            .subresource_mut(index)
            .ok_or(Error::LayoutMismatch { index })?;
        dst.copy_from_slice(&data[surface.src_offset..surface.src_offset + surface.len]);
    }

    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{
        DDPF_FOURCC, DDPF_RGB, DDSCAPS_TEXTURE, DDSD_CAPS, DDSD_MIPMAPCOUNT, DDSD_PIXELFORMAT,
        DDSD_WIDTH,
    };
    use zerocopy::IntoBytes;

    fn base_header(width: u32, height: u32, mipmap_count: u32) -> DdsHeader {
        DdsHeader {
            size: DdsHeader::SIZE,
            flags: DDSD_CAPS | DDSD_HEIGHT | DDSD_WIDTH | DDSD_PIXELFORMAT | DDSD_MIPMAPCOUNT,
            height,
            width,
            pitch_or_linear_size: 0,
            depth: 1,
            mipmap_count,
            reserved1: [0; 11],
            pixel_format: DdsPixelFormat {
                size: DdsPixelFormat::SIZE,
                flags: 0,
                four_cc: FourCC([0; 4]),
                rgb_bit_count: 0,
                r_bit_mask: 0,
                g_bit_mask: 0,
                b_bit_mask: 0,
                a_bit_mask: 0,
            },
            caps: DDSCAPS_TEXTURE,
            caps2: 0,
            caps3: 0,
            caps4: 0,
            reserved2: 0,
        }
    }

    fn fourcc_file(four_cc: FourCC, width: u32, height: u32, mips: u32, payload: usize) -> Vec<u8> {
        let mut header = base_header(width, height, mips);
        header.pixel_format.flags = DDPF_FOURCC;
        header.pixel_format.four_cc = four_cc;

        let mut out = DDS_MAGIC.to_vec();
        out.extend_from_slice(header.as_bytes());
        out.extend(std::iter::repeat(0xAB).take(payload));
        out
    }

    #[test]
    fn test_decode_legacy_dxt1() {
        // 16x16 BC1, 3 mips: 128 + 32 + 8 bytes.
        let file = fourcc_file(FourCC::DXT1, 16, 16, 3, 168);
        let image = decode(&file).unwrap();

        assert_eq!(image.format(), PixelFormat::Bc1Unorm);
        assert_eq!(image.dimension(), ImageDimension::Texture2D);
        assert_eq!(image.mip_count(), 3);
        assert_eq!(image.alpha_mode(), ImageAlphaMode::Unknown);
        assert_eq!(image.subresource(0).unwrap().data.len(), 128);
        assert_eq!(image.subresource(2).unwrap().data.len(), 8);
    }

    #[test]
    fn test_decode_dxt2_implies_premultiplied() {
        let file = fourcc_file(FourCC::DXT2, 4, 4, 1, 16);
        let image = decode(&file).unwrap();
        assert_eq!(image.format(), PixelFormat::Bc2Unorm);
        assert_eq!(image.alpha_mode(), ImageAlphaMode::Premultiplied);
    }

    #[test]
    fn test_decode_legacy_bitmask_rgba() {
        let mut header = base_header(2, 2, 1);
        header.pixel_format.flags = DDPF_RGB;
        header.pixel_format.rgb_bit_count = 32;
        header.pixel_format.r_bit_mask = 0xff;
        header.pixel_format.g_bit_mask = 0xff00;
        header.pixel_format.b_bit_mask = 0xff0000;
        header.pixel_format.a_bit_mask = 0xff000000;

        let mut file = DDS_MAGIC.to_vec();
        file.extend_from_slice(header.as_bytes());
        file.extend_from_slice(&[0x11; 16]);

        let image = decode(&file).unwrap();
        assert_eq!(image.format(), PixelFormat::R8G8B8A8Unorm);
        assert_eq!(image.subresource(0).unwrap().data, &[0x11; 16]);
    }

    #[test]
    fn test_decode_rejects_bad_magic() {
        let mut file = fourcc_file(FourCC::DXT1, 4, 4, 1, 8);
        file[0..4].copy_from_slice(b"DDX ");
        assert!(matches!(decode(&file), Err(Error::InvalidMagic(_))));
    }

    #[test]
    fn test_decode_rejects_bad_header_size() {
        let mut header = base_header(4, 4, 1);
        header.size = 120;
        header.pixel_format.flags = DDPF_FOURCC;
        header.pixel_format.four_cc = FourCC::DXT1;

        let mut file = DDS_MAGIC.to_vec();
        file.extend_from_slice(header.as_bytes());
        file.extend_from_slice(&[0; 8]);

        assert!(matches!(decode(&file), Err(Error::InvalidHeader(_))));
    }

    #[test]
    fn test_decode_rejects_unknown_bitmask() {
        let mut header = base_header(2, 2, 1);
        header.pixel_format.flags = DDPF_RGB;
        header.pixel_format.rgb_bit_count = 24;
        header.pixel_format.r_bit_mask = 0xff0000;
        header.pixel_format.g_bit_mask = 0xff00;
        header.pixel_format.b_bit_mask = 0xff;

        let mut file = DDS_MAGIC.to_vec();
        file.extend_from_slice(header.as_bytes());
        file.extend_from_slice(&[0; 12]);

        assert!(matches!(decode(&file), Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn test_decode_truncated_by_one_byte() {
        let file = fourcc_file(FourCC::DXT1, 16, 16, 3, 167);
        assert!(matches!(decode(&file), Err(Error::Truncated { .. })));
    }

    #[test]
    fn test_decode_legacy_cubemap() {
        let mut header = base_header(8, 8, 1);
        header.pixel_format.flags = DDPF_FOURCC;
        header.pixel_format.four_cc = FourCC::DXT5;
        header.caps2 = DDSCAPS2_CUBEMAP | DDSCAPS2_CUBEMAP_ALLFACES;

        let mut file = DDS_MAGIC.to_vec();
        file.extend_from_slice(header.as_bytes());
        file.extend_from_slice(&vec![0; 6 * 64]);

        let image = decode(&file).unwrap();
        assert_eq!(image.dimension(), ImageDimension::TextureCube);
        assert_eq!(image.array_count(), 6);

        // Partial face sets are rejected outright.
        let mut partial = base_header(8, 8, 1);
        partial.pixel_format.flags = DDPF_FOURCC;
        partial.pixel_format.four_cc = FourCC::DXT5;
        partial.caps2 = DDSCAPS2_CUBEMAP | 0x400;

        let mut file = DDS_MAGIC.to_vec();
        file.extend_from_slice(partial.as_bytes());
        file.extend_from_slice(&vec![0; 6 * 64]);
        assert!(matches!(decode(&file), Err(Error::UnsupportedLayout(_))));
    }

    fn dx10_file(
        format_code: u32,
        resource_dimension: u32,
        misc_flag: u32,
        array_size: u32,
        width: u32,
        height: u32,
        mips: u32,
        payload: usize,
    ) -> Vec<u8> {
        let mut header = base_header(width, height, mips);
        header.pixel_format.flags = DDPF_FOURCC;
        header.pixel_format.four_cc = FourCC::DX10;

        let dx10 = DdsHeaderDx10 {
            dxgi_format: format_code,
            resource_dimension,
            misc_flag,
            array_size,
            misc_flags2: 0,
        };

        let mut out = DDS_MAGIC.to_vec();
        out.extend_from_slice(header.as_bytes());
        out.extend_from_slice(dx10.as_bytes());
        out.extend(std::iter::repeat(0xCD).take(payload));
        out
    }

    #[test]
    fn test_decode_dx10_texture_array() {
        // R8 4x4, 1 mip, 3 array slices.
        let file = dx10_file(61, DDS_DIMENSION_TEXTURE2D, 0, 3, 4, 4, 1, 3 * 16);
        let image = decode(&file).unwrap();
        assert_eq!(image.format(), PixelFormat::R8Unorm);
        assert_eq!(image.array_count(), 3);
        assert_eq!(image.subresource_count(), 3);
    }

    #[test]
    fn test_decode_dx10_missing_extension_header() {
        let mut header = base_header(4, 4, 1);
        header.pixel_format.flags = DDPF_FOURCC;
        header.pixel_format.four_cc = FourCC::DX10;

        let mut file = DDS_MAGIC.to_vec();
        file.extend_from_slice(header.as_bytes());
        // No extension header, no payload.
        assert!(matches!(decode(&file), Err(Error::InvalidHeader(_))));
    }

    #[test]
    fn test_decode_dx10_rejects_palette_and_zero_array() {
        let file = dx10_file(113, DDS_DIMENSION_TEXTURE2D, 0, 1, 4, 4, 1, 64);
        assert!(matches!(decode(&file), Err(Error::UnsupportedFormat(_))));

        let file = dx10_file(28, DDS_DIMENSION_TEXTURE2D, 0, 0, 4, 4, 1, 64);
        assert!(matches!(decode(&file), Err(Error::InvalidHeader(_))));
    }

    #[test]
    fn test_decode_dx10_planar_parity() {
        // NV12 6x4 is fine: 6 * 6 rows = 36 bytes.
        let file = dx10_file(103, DDS_DIMENSION_TEXTURE2D, 0, 1, 6, 4, 1, 36);
        let image = decode(&file).unwrap();
        assert_eq!(image.format(), PixelFormat::Nv12);

        // Odd width is rejected before any size accounting.
        let file = dx10_file(103, DDS_DIMENSION_TEXTURE2D, 0, 1, 5, 4, 1, 64);
        assert!(matches!(decode(&file), Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn test_decode_dx10_limits() {
        let file = dx10_file(61, DDS_DIMENSION_TEXTURE2D, 0, 1, 32768, 4, 1, 16);
        assert!(matches!(decode(&file), Err(Error::UnsupportedLayout(_))));

        // 16 mip levels is one past the cap.
        let file = dx10_file(61, DDS_DIMENSION_TEXTURE2D, 0, 1, 4, 4, 16, 16);
        assert!(matches!(decode(&file), Err(Error::UnsupportedLayout(_))));
    }

    fn luminance_file(width: u32, height: u32, mips: u32, payload: usize) -> Vec<u8> {
        let mut header = base_header(width, height, mips);
        header.pixel_format.flags = DDPF_LUMINANCE;
        header.pixel_format.rgb_bit_count = 8;
        header.pixel_format.r_bit_mask = 0xff;

        let mut file = DDS_MAGIC.to_vec();
        file.extend_from_slice(header.as_bytes());
        file.extend((0..payload).map(|i| i as u8));
        file
    }

    #[test]
    fn test_decode_max_size_skips_leading_mips() {
        // R8 8x8 with 4 mips: 64 + 16 + 4 + 1 bytes.
        let file = luminance_file(8, 8, 4, 85);

        let image = decode_with_max_size(&file, 4).unwrap();
        assert_eq!(image.size(), ImageSize::new(4, 4, 1));
        assert_eq!(image.mip_count(), 3);
        // The 8x8 level was walked over, so mip 0 starts at byte 64.
        assert_eq!(image.subresource(0).unwrap().data[0], 64);

        // A ceiling below every level retains nothing: 8x8 with 2 mips
        // (8 and 4 wide) against a ceiling of 2.
        let file = luminance_file(8, 8, 2, 80);
        assert!(matches!(
            decode_with_max_size(&file, 2),
            Err(Error::InvalidHeader(_))
        ));
    }
}
