//! DDS encoding.
//!
//! The encoder always writes the DX10 extension header form; legacy
//! bit-mask-only files are read, never produced.

use std::io::Write;

use zerocopy::IntoBytes;

use crate::decode::MAX_MIP_LEVELS;
use crate::format;
use crate::header::{
    DdsHeader, DdsHeaderDx10, DdsPixelFormat, FourCC, DDPF_FOURCC, DDSCAPS2_CUBEMAP,
    DDSCAPS2_CUBEMAP_ALLFACES, DDSCAPS2_VOLUME, DDSCAPS_COMPLEX, DDSCAPS_MIPMAP, DDSCAPS_TEXTURE,
    DDSD_CAPS, DDSD_DEPTH, DDSD_HEIGHT, DDSD_LINEARSIZE, DDSD_MIPMAPCOUNT, DDSD_PITCH,
    DDSD_PIXELFORMAT, DDSD_WIDTH, DDS_DIMENSION_TEXTURE1D, DDS_DIMENSION_TEXTURE2D,
    DDS_DIMENSION_TEXTURE3D, DDS_RESOURCE_MISC_TEXTURECUBE,
};
use crate::image::{row_pitch_bytes, slice_pitch_bytes, Image, ImageDimension};
use crate::{Error, Result, DDS_MAGIC};

/// Serialize an image to a DDS file through a byte sink.
///
/// Subresources are written back to back in the image's native order
/// (mip-major within each array slice). A failed write aborts the encode;
/// bytes already written stay with the sink.
pub fn encode<W: Write>(writer: &mut W, image: &Image) -> Result<()> {
    let mip_count = image.mip_count();
    if mip_count == 0 || mip_count > MAX_MIP_LEVELS {
        return Err(Error::UnsupportedLayout(format!(
            "mip count {mip_count} outside 1..={MAX_MIP_LEVELS}"
        )));
    }
    let array_count = image.array_count();
    if array_count == 0 {
        return Err(Error::UnsupportedLayout(
            "array count must be at least 1".into(),
        ));
    }

    let size = image.size();
    let format = image.format();

    let mut flags = DDSD_CAPS | DDSD_HEIGHT | DDSD_WIDTH | DDSD_PIXELFORMAT;
    let mut caps = DDSCAPS_TEXTURE;
    if mip_count > 1 {
        flags |= DDSD_MIPMAPCOUNT;
        caps |= DDSCAPS_MIPMAP | DDSCAPS_COMPLEX;
    }

    let mut caps2 = 0;
    let mut depth = 1;
    let (resource_dimension, array_size) = match image.dimension() {
        ImageDimension::Texture1D => (DDS_DIMENSION_TEXTURE1D, array_count),
        ImageDimension::Texture2D => {
            if size.depth != 1 {
                return Err(Error::UnsupportedLayout(format!(
                    "2D texture with depth {}",
                    size.depth
                )));
            }
            (DDS_DIMENSION_TEXTURE2D, array_count)
        }
        ImageDimension::TextureCube => {
            if size.width != size.height {
                return Err(Error::UnsupportedLayout(format!(
                    "cubemap faces must be square, got {}x{}",
                    size.width, size.height
                )));
            }
            if size.depth != 1 {
                return Err(Error::UnsupportedLayout(format!(
                    "cubemap with depth {}",
                    size.depth
                )));
            }
            if array_count % Image::CUBE_FACES != 0 {
                return Err(Error::UnsupportedLayout(format!(
                    "cubemap array count {array_count} not divisible by 6"
                )));
            }
            caps |= DDSCAPS_COMPLEX;
            caps2 |= DDSCAPS2_CUBEMAP | DDSCAPS2_CUBEMAP_ALLFACES;
            (DDS_DIMENSION_TEXTURE2D, array_count / Image::CUBE_FACES)
        }
        ImageDimension::Texture3D => {
            if array_count != 1 {
                return Err(Error::UnsupportedLayout(
                    "volume textures cannot be arrayed".into(),
                ));
            }
            flags |= DDSD_DEPTH;
            caps2 |= DDSCAPS2_VOLUME;
            depth = size.depth;
            (DDS_DIMENSION_TEXTURE3D, 1)
        }
        ImageDimension::Unknown => {
            return Err(Error::UnsupportedLayout("unknown image dimension".into()))
        }
    };

    let pitch_or_linear_size = if format::is_compressed(format) {
        flags |= DDSD_LINEARSIZE;
        slice_pitch_bytes(format, size.width, size.height) as u32
    } else {
        flags |= DDSD_PITCH;
        row_pitch_bytes(format, size.width) as u32
    };

    let header = DdsHeader {
        size: DdsHeader::SIZE,
        flags,
        height: size.height,
        width: size.width,
        pitch_or_linear_size,
        depth,
        mipmap_count: mip_count,
        reserved1: [0; 11],
        pixel_format: DdsPixelFormat {
            size: DdsPixelFormat::SIZE,
            flags: DDPF_FOURCC,
            four_cc: FourCC::DX10,
            rgb_bit_count: 0,
            r_bit_mask: 0,
            g_bit_mask: 0,
            b_bit_mask: 0,
            a_bit_mask: 0,
        },
        caps,
        caps2,
        caps3: 0,
        caps4: 0,
        reserved2: 0,
    };

    let misc_flag = if image.dimension() == ImageDimension::TextureCube {
        DDS_RESOURCE_MISC_TEXTURECUBE
    } else {
        0
    };
    let dx10 = DdsHeaderDx10 {
        dxgi_format: format.wire_code(),
        resource_dimension,
        misc_flag,
        array_size,
        misc_flags2: image.alpha_mode().wire_bits(),
    };

    writer.write_all(DDS_MAGIC)?;
    writer.write_all(header.as_bytes())?;
    writer.write_all(dx10.as_bytes())?;

    for index in 0..image.subresource_count() {
        let surface = image
            .subresource(index)
            .ok_or(Error::LayoutMismatch { index })?;
        writer.write_all(surface.data)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{decode, decode_with_max_size};
    use crate::format::PixelFormat;
    use crate::image::{ImageAlphaMode, ImageSize};

    fn fill(image: &mut Image) {
        for index in 0..image.subresource_count() {
            let salt = index as u8;
            let data = image.subresource_mut(index).unwrap();
            for (i, byte) in data.iter_mut().enumerate() {
                *byte = salt.wrapping_add(i as u8).wrapping_mul(31);
            }
        }
    }

    fn assert_round_trip(image: &Image) {
        let mut file = Vec::new();
        encode(&mut file, image).unwrap();
        let decoded = decode(&file).unwrap();

        assert_eq!(decoded.size(), image.size());
        assert_eq!(decoded.mip_count(), image.mip_count());
        assert_eq!(decoded.array_count(), image.array_count());
        assert_eq!(decoded.dimension(), image.dimension());
        assert_eq!(decoded.format(), image.format());
        assert_eq!(decoded.alpha_mode(), image.alpha_mode());
        assert_eq!(decoded.subresource_count(), image.subresource_count());

        for index in 0..image.subresource_count() {
            let a = image.subresource(index).unwrap();
            let b = decoded.subresource(index).unwrap();
            assert_eq!(a.data, b.data, "subresource {index} bytes");
            assert_eq!(a.line_pitch, b.line_pitch);
            assert_eq!(a.slice_pitch, b.slice_pitch);
            assert_eq!(a.size, b.size);
            assert_eq!(a.mip_level, b.mip_level);
        }
    }

    #[test]
    fn test_round_trip_bc1_2d() {
        // 16x16 BC1 with 3 mips: 128, 32 and 8 bytes per level.
        let mut image = Image::new_2d(
            PixelFormat::Bc1Unorm,
            16,
            16,
            3,
            1,
            ImageAlphaMode::Unknown,
        );
        fill(&mut image);

        let sizes: Vec<usize> = (0..3)
            .map(|i| image.subresource(i).unwrap().data.len())
            .collect();
        assert_eq!(sizes, vec![128, 32, 8]);
        let pitches: Vec<usize> = (0..3)
            .map(|i| image.subresource(i).unwrap().line_pitch)
            .collect();
        assert_eq!(pitches, vec![32, 16, 8]);

        assert_round_trip(&image);
    }

    #[test]
    fn test_round_trip_2d_array() {
        let mut image = Image::new_2d(
            PixelFormat::R8G8B8A8Unorm,
            10,
            6,
            2,
            3,
            ImageAlphaMode::Straight,
        );
        fill(&mut image);
        assert_round_trip(&image);
    }

    #[test]
    fn test_round_trip_1d() {
        let mut image = Image::new_1d(PixelFormat::R16Float, 64, 4, 2, ImageAlphaMode::Opaque);
        fill(&mut image);
        assert_round_trip(&image);
    }

    #[test]
    fn test_round_trip_cube() {
        let mut image = Image::new_cube(
            PixelFormat::Bc7Unorm,
            8,
            8,
            2,
            2,
            ImageAlphaMode::Premultiplied,
        );
        fill(&mut image);
        assert_eq!(image.array_count(), 12);
        assert_round_trip(&image);

        // The file carries the logical array size, not the face count.
        let mut file = Vec::new();
        encode(&mut file, &image).unwrap();
        let dx10_array = u32::from_le_bytes(file[4 + 124 + 12..4 + 124 + 16].try_into().unwrap());
        assert_eq!(dx10_array, 2);
    }

    #[test]
    fn test_round_trip_volume() {
        let mut image = Image::new_3d(
            PixelFormat::R32Float,
            8,
            4,
            4,
            3,
            ImageAlphaMode::Unknown,
        );
        fill(&mut image);
        assert_round_trip(&image);
    }

    #[test]
    fn test_round_trip_depth_format() {
        let mut image = Image::new_2d(
            PixelFormat::D24UnormS8Uint,
            32,
            32,
            1,
            1,
            ImageAlphaMode::Unknown,
        );
        fill(&mut image);
        assert_round_trip(&image);
    }

    #[test]
    fn test_encode_rejects_bad_shapes() {
        // Non-square cubemap.
        let image = Image::new_cube(PixelFormat::Bc1Unorm, 8, 4, 1, 1, ImageAlphaMode::Unknown);
        let mut out = Vec::new();
        assert!(matches!(
            encode(&mut out, &image),
            Err(Error::UnsupportedLayout(_))
        ));

        // Mip count past the cap.
        let image = Image::new_2d(PixelFormat::R8Unorm, 4, 4, 16, 1, ImageAlphaMode::Unknown);
        let mut out = Vec::new();
        assert!(matches!(
            encode(&mut out, &image),
            Err(Error::UnsupportedLayout(_))
        ));
    }

    #[test]
    fn test_encode_write_failure() {
        struct FailingSink;
        impl Write for FailingSink {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "sink full"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let image = Image::new_2d(PixelFormat::R8Unorm, 4, 4, 1, 1, ImageAlphaMode::Unknown);
        let mut sink = FailingSink;
        assert!(matches!(encode(&mut sink, &image), Err(Error::Io(_))));
    }

    #[test]
    fn test_decode_encoded_with_max_size() {
        // Encode a full chain, decode it truncated to 8 pixels.
        let mut image = Image::new_2d(PixelFormat::R8Unorm, 32, 32, 6, 1, ImageAlphaMode::Unknown);
        fill(&mut image);
        let mut file = Vec::new();
        encode(&mut file, &image).unwrap();

        let decoded = decode_with_max_size(&file, 8).unwrap();
        assert_eq!(decoded.size(), ImageSize::new(8, 8, 1));
        assert_eq!(decoded.mip_count(), 4);
        // Retained levels carry the same bytes as the original's tail.
        let original = image.subresource(2).unwrap();
        let retained = decoded.subresource(0).unwrap();
        assert_eq!(original.data, retained.data);
    }
}
