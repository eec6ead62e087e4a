//! Texture image container.
//!
//! An [`Image`] owns a single contiguous buffer holding every subresource
//! (mip level x array slice) of a texture, plus a table of lightweight
//! descriptors indexing into that buffer. The pitch and size formulas here
//! are the single source of truth; the codec computes its layouts with the
//! same functions and cross-checks them against the container's.

use crate::format::{
    self, bits_per_pixel, block_size, is_compressed, packed_element_bytes, PixelFormat,
};

/// Logical extents of a texture or one of its mip levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Depth in pixels (1 for non-volumetric images).
    pub depth: u32,
}

impl ImageSize {
    /// Create a new size; flat images pass `depth = 1`.
    pub const fn new(width: u32, height: u32, depth: u32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }
}

/// The resource dimensionality of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageDimension {
    /// Not yet resolved.
    #[default]
    Unknown,
    /// One-dimensional texture (height and depth are 1).
    Texture1D,
    /// Two-dimensional texture.
    Texture2D,
    /// Volume texture.
    Texture3D,
    /// Cubemap (six 2D faces per logical array element).
    TextureCube,
}

/// How the alpha channel of an image should be interpreted.
///
/// Metadata only; round-tripped by the codec, never applied to pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageAlphaMode {
    /// No stated alpha semantics.
    #[default]
    Unknown,
    /// Straight (non-premultiplied) alpha.
    Straight,
    /// Color channels are premultiplied by alpha.
    Premultiplied,
    /// Alpha is fully opaque.
    Opaque,
    /// Application-defined semantics.
    Custom,
}

impl ImageAlphaMode {
    /// Decode the 3-bit wire encoding.
    pub fn from_wire(bits: u32) -> Option<Self> {
        Some(match bits {
            0 => Self::Unknown,
            1 => Self::Straight,
            2 => Self::Premultiplied,
            3 => Self::Opaque,
            4 => Self::Custom,
            _ => return None,
        })
    }

    /// The 3-bit wire encoding.
    pub const fn wire_bits(self) -> u32 {
        match self {
            Self::Unknown => 0,
            Self::Straight => 1,
            Self::Premultiplied => 2,
            Self::Opaque => 3,
            Self::Custom => 4,
        }
    }
}

/// Byte stride between consecutive rows (or block rows) of a subresource.
///
/// Block-compressed formats round the width up to whole 4-pixel blocks;
/// packed and planar video formats round up to whole 2-pixel elements;
/// linear formats round bits-per-row up to the next whole byte.
pub fn row_pitch_bytes(format: PixelFormat, width: u32) -> usize {
    let width = width as usize;
    if is_compressed(format) {
        let blocks = width.div_ceil(4).max(1);
        blocks * block_size(format) as usize
    } else if format::is_packed(format) || format::is_planar(format) {
        width.div_ceil(2) * packed_element_bytes(format) as usize
    } else {
        (width * bits_per_pixel(format) as usize).div_ceil(8)
    }
}

/// Number of rows (or block rows) a subresource plane stores.
///
/// Planar 4:2:0 formats append a half-height chroma region below the luma
/// plane, so they report one-and-a-half times the pixel height.
pub fn row_count(format: PixelFormat, height: u32) -> usize {
    let height = height as usize;
    if is_compressed(format) {
        height.div_ceil(4).max(1)
    } else if format::is_planar(format) {
        height + height.div_ceil(2)
    } else {
        height
    }
}

/// Byte size of one full 2D plane (one depth slice) of a subresource.
pub fn slice_pitch_bytes(format: PixelFormat, width: u32, height: u32) -> usize {
    row_pitch_bytes(format, width) * row_count(format, height)
}

/// Total byte size of a subresource with the given logical extents.
pub fn surface_size_bytes(format: PixelFormat, size: ImageSize) -> usize {
    slice_pitch_bytes(format, size.width, size.height) * size.depth as usize
}

/// Logical extents of a mip level.
///
/// Width and height floor at 4 for block-compressed formats (a compressed
/// mip chain bottoms out at one 4x4 block) and at 1 otherwise; depth
/// floors at 1.
pub fn compute_surface_size(format: PixelFormat, size: ImageSize, mip_level: u32) -> ImageSize {
    let min = if is_compressed(format) { 4 } else { 1 };
    ImageSize {
        width: (size.width >> mip_level).max(min),
        height: (size.height >> mip_level).max(min),
        depth: (size.depth >> mip_level).max(1),
    }
}

/// Number of mip levels a full chain for `size` holds; always at least 1.
pub fn compute_mip_levels(format: PixelFormat, size: ImageSize) -> u32 {
    let min = if is_compressed(format) { 4 } else { 1 };
    let mut width = size.width;
    let mut height = size.height;
    let mut depth = size.depth;
    let mut levels = 1;

    while width > min || height > min || depth > 1 {
        width = (width >> 1).max(min);
        height = (height >> 1).max(min);
        depth = (depth >> 1).max(1);
        levels += 1;
    }

    levels
}

/// Offset-based subresource descriptor.
///
/// Offsets rather than pointers keep the table valid when the owning
/// image moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SurfaceDesc {
    offset: usize,
    len: usize,
    line_pitch: usize,
    slice_pitch: usize,
    size: ImageSize,
    mip_level: u32,
}

/// A borrowed view of one subresource of an [`Image`].
#[derive(Debug, Clone, Copy)]
pub struct ImageSurface<'a> {
    /// Raw bytes of this subresource.
    pub data: &'a [u8],
    /// Byte stride between rows (or block rows).
    pub line_pitch: usize,
    /// Byte size of one depth slice.
    pub slice_pitch: usize,
    /// Logical extents at this mip level.
    pub size: ImageSize,
    /// Mip level this surface belongs to.
    pub mip_level: u32,
}

/// A multi-dimensional, mip-mapped, array/cubemap texture in memory.
///
/// All subresources live in one contiguous buffer, ordered mip-major
/// within each array slice: `index = mip + array * mip_count`. The shape
/// (size, counts, format) is fixed at construction.
#[derive(Debug, Clone)]
pub struct Image {
    size: ImageSize,
    mip_count: u32,
    array_count: u32,
    dimension: ImageDimension,
    format: PixelFormat,
    alpha_mode: ImageAlphaMode,
    buffer: Vec<u8>,
    surfaces: Vec<SurfaceDesc>,
}

impl Image {
    /// Faces per cubemap array element.
    pub const CUBE_FACES: u32 = 6;

    fn new(
        format: PixelFormat,
        size: ImageSize,
        mip_count: u32,
        array_count: u32,
        dimension: ImageDimension,
        alpha_mode: ImageAlphaMode,
    ) -> Self {
        let count = (mip_count as usize) * (array_count as usize);
        let mut surfaces = Vec::with_capacity(count);
        let mut total = 0usize;

        for _array in 0..array_count {
            for mip in 0..mip_count {
                let mip_size = compute_surface_size(format, size, mip);
                let line_pitch = row_pitch_bytes(format, mip_size.width);
                let slice_pitch = slice_pitch_bytes(format, mip_size.width, mip_size.height);
                let len = slice_pitch * mip_size.depth as usize;

                surfaces.push(SurfaceDesc {
                    offset: total,
                    len,
                    line_pitch,
                    slice_pitch,
                    size: mip_size,
                    mip_level: mip,
                });
                total += len;
            }
        }

        Self {
            size,
            mip_count,
            array_count,
            dimension,
            format,
            alpha_mode,
            buffer: vec![0; total],
            surfaces,
        }
    }

    /// Create a one-dimensional texture.
    ///
    /// The mip count is taken as-is; callers wanting a full chain pass
    /// [`compute_mip_levels`].
    pub fn new_1d(
        format: PixelFormat,
        width: u32,
        mip_count: u32,
        array_count: u32,
        alpha_mode: ImageAlphaMode,
    ) -> Self {
        Self::new(
            format,
            ImageSize::new(width, 1, 1),
            mip_count,
            array_count,
            ImageDimension::Texture1D,
            alpha_mode,
        )
    }

    /// Create a two-dimensional texture.
    pub fn new_2d(
        format: PixelFormat,
        width: u32,
        height: u32,
        mip_count: u32,
        array_count: u32,
        alpha_mode: ImageAlphaMode,
    ) -> Self {
        Self::new(
            format,
            ImageSize::new(width, height, 1),
            mip_count,
            array_count,
            ImageDimension::Texture2D,
            alpha_mode,
        )
    }

    /// Create a volume texture. Volume textures have no array axis.
    pub fn new_3d(
        format: PixelFormat,
        width: u32,
        height: u32,
        depth: u32,
        mip_count: u32,
        alpha_mode: ImageAlphaMode,
    ) -> Self {
        Self::new(
            format,
            ImageSize::new(width, height, depth),
            mip_count,
            1,
            ImageDimension::Texture3D,
            alpha_mode,
        )
    }

    /// Create a cubemap.
    ///
    /// The stored array count is `6 * array_count`, one slice per face.
    pub fn new_cube(
        format: PixelFormat,
        width: u32,
        height: u32,
        mip_count: u32,
        array_count: u32,
        alpha_mode: ImageAlphaMode,
    ) -> Self {
        Self::new(
            format,
            ImageSize::new(width, height, 1),
            mip_count,
            array_count * Self::CUBE_FACES,
            ImageDimension::TextureCube,
            alpha_mode,
        )
    }

    /// Mip-0 extents.
    pub const fn size(&self) -> ImageSize {
        self.size
    }

    /// Number of mip levels per array slice.
    pub const fn mip_count(&self) -> u32 {
        self.mip_count
    }

    /// Total number of 2D array slices (faces included for cubemaps).
    pub const fn array_count(&self) -> u32 {
        self.array_count
    }

    /// Resource dimensionality.
    pub const fn dimension(&self) -> ImageDimension {
        self.dimension
    }

    /// Pixel format of every subresource.
    pub const fn format(&self) -> PixelFormat {
        self.format
    }

    /// Alpha interpretation metadata.
    pub const fn alpha_mode(&self) -> ImageAlphaMode {
        self.alpha_mode
    }

    /// Total number of subresources.
    pub fn subresource_count(&self) -> usize {
        self.surfaces.len()
    }

    /// The backing buffer holding every subresource contiguously.
    pub fn data(&self) -> &[u8] {
        &self.buffer
    }

    /// Get a subresource view by flat index.
    pub fn subresource(&self, index: usize) -> Option<ImageSurface<'_>> {
        let desc = self.surfaces.get(index)?;
        Some(ImageSurface {
            data: &self.buffer[desc.offset..desc.offset + desc.len],
            line_pitch: desc.line_pitch,
            slice_pitch: desc.slice_pitch,
            size: desc.size,
            mip_level: desc.mip_level,
        })
    }

    /// Get a subresource view by array slice and mip level.
    pub fn subresource_at(&self, array_index: u32, mip_index: u32) -> Option<ImageSurface<'_>> {
        if mip_index >= self.mip_count || array_index >= self.array_count {
            return None;
        }
        self.subresource((mip_index + array_index * self.mip_count) as usize)
    }

    /// Get a cubemap face subresource.
    ///
    /// The face index folds into the array axis as `array * 6 + face`.
    pub fn cube_face(
        &self,
        face: u32,
        array_index: u32,
        mip_index: u32,
    ) -> Option<ImageSurface<'_>> {
        if self.dimension != ImageDimension::TextureCube || face >= Self::CUBE_FACES {
            return None;
        }
        self.subresource_at(array_index * Self::CUBE_FACES + face, mip_index)
    }

    /// Mutable access to one subresource's bytes, for filling pixel data.
    pub fn subresource_mut(&mut self, index: usize) -> Option<&mut [u8]> {
        let desc = self.surfaces.get(index)?;
        let (offset, len) = (desc.offset, desc.len);
        Some(&mut self.buffer[offset..offset + len])
    }

    /// Per-subresource layout as the codec sees it: byte length, line
    /// pitch, slice pitch, logical size and mip level by flat index.
    pub(crate) fn surface_layout(
        &self,
        index: usize,
    ) -> Option<(usize, usize, usize, ImageSize, u32)> {
        let desc = self.surfaces.get(index)?;
        Some((
            desc.len,
            desc.line_pitch,
            desc.slice_pitch,
            desc.size,
            desc.mip_level,
        ))
    }
}
