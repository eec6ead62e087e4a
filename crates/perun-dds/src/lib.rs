//! Texture image container and DDS binary codec.
//!
//! This crate represents multi-dimensional, mip-mapped, array and cubemap
//! texture data in memory with exact byte-layout control, and converts
//! between that model and the DDS container format:
//!
//! - [`PixelFormat`] and the `format` lookup functions describe the byte
//!   layout of every supported pixel encoding.
//! - [`Image`] owns all subresources of a texture in one contiguous
//!   buffer, indexed mip-major within each array slice.
//! - [`decode`] parses an untrusted byte buffer into an [`Image`];
//!   [`encode`] serializes an [`Image`] through any [`std::io::Write`]
//!   sink. Pixel data is carried opaquely; nothing is decompressed.
//!
//! # Example
//!
//! ```
//! use perun_dds::{decode, encode, Image, ImageAlphaMode, PixelFormat};
//!
//! let image = Image::new_2d(PixelFormat::Bc1Unorm, 16, 16, 3, 1, ImageAlphaMode::Unknown);
//!
//! let mut file = Vec::new();
//! encode(&mut file, &image)?;
//!
//! let decoded = decode(&file)?;
//! assert_eq!(decoded.mip_count(), 3);
//! # Ok::<(), perun_dds::Error>(())
//! ```

mod decode;
mod encode;
mod error;
pub mod format;
mod header;
mod image;

pub use decode::{decode, decode_with_max_size};
pub use encode::encode;
pub use error::{Error, Result};
pub use format::PixelFormat;
pub use header::{DdsHeader, DdsHeaderDx10, DdsPixelFormat, FourCC};
pub use image::{
    compute_mip_levels, compute_surface_size, row_pitch_bytes, slice_pitch_bytes,
    surface_size_bytes, Image, ImageAlphaMode, ImageDimension, ImageSize, ImageSurface,
};

/// DDS file magic bytes ("DDS ").
pub const DDS_MAGIC: &[u8; 4] = b"DDS ";
