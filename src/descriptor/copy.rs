//! Texel copy locations for buffer/texture copies and texture writes.

use crate::buffer::Buffer;
use crate::error::Result;
use crate::ffi::*;
use crate::marshal::Marshal;
use crate::region::Region;
use crate::texture::Texture;
use crate::types::{Extent3d, Origin3d, TextureAspect};

pub(crate) fn native_extent(size: Extent3d) -> WGPUExtent3D {
    WGPUExtent3D {
        width: size.width,
        height: size.height,
        depthOrArrayLayers: size.depth_or_array_layers,
    }
}

/// How texel rows and images are laid out in linear memory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TexelCopyBufferLayout {
    /// Byte offset of the first texel.
    pub offset: u64,
    /// Bytes between rows. Required when copying more than one row; a
    /// multiple of 256 for buffer copies.
    pub bytes_per_row: Option<u32>,
    /// Rows between images. Required when copying more than one image.
    pub rows_per_image: Option<u32>,
}

impl TexelCopyBufferLayout {
    pub(crate) fn to_native(self) -> WGPUTexelCopyBufferLayout {
        WGPUTexelCopyBufferLayout {
            offset: self.offset,
            bytesPerRow: self.bytes_per_row.unwrap_or(WGPU_COPY_STRIDE_UNDEFINED),
            rowsPerImage: self.rows_per_image.unwrap_or(WGPU_COPY_STRIDE_UNDEFINED),
        }
    }
}

/// A buffer as the source or destination of a texel copy.
#[derive(Debug, Clone, Copy)]
pub struct TexelCopyBufferInfo<'a> {
    pub buffer: &'a Buffer,
    /// Where the texels sit inside `buffer`.
    pub layout: TexelCopyBufferLayout,
}

impl Marshal for TexelCopyBufferInfo<'_> {
    type Native = WGPUTexelCopyBufferInfo;

    fn to_native(&self, _region: &Region) -> Result<Self::Native> {
        Ok(WGPUTexelCopyBufferInfo {
            layout: self.layout.to_native(),
            buffer: self.buffer.raw()?,
        })
    }
}

/// A texture subresource as the source or destination of a texel copy.
#[derive(Debug, Clone, Copy)]
pub struct TexelCopyTextureInfo<'a> {
    pub texture: &'a Texture,
    /// Mip level copied to or from.
    pub mip_level: u32,
    /// Texel the copy starts at.
    pub origin: Origin3d,
    /// Aspect of a depth-stencil texture. Must name a single aspect for
    /// combined formats.
    pub aspect: TextureAspect,
}

impl<'a> TexelCopyTextureInfo<'a> {
    /// All aspects of mip level 0, starting at the origin.
    pub fn new(texture: &'a Texture) -> Self {
        Self {
            texture,
            mip_level: 0,
            origin: Origin3d::default(),
            aspect: TextureAspect::All,
        }
    }
}

impl Marshal for TexelCopyTextureInfo<'_> {
    type Native = WGPUTexelCopyTextureInfo;

    fn to_native(&self, _region: &Region) -> Result<Self::Native> {
        Ok(WGPUTexelCopyTextureInfo {
            texture: self.texture.raw()?,
            mipLevel: self.mip_level,
            origin: WGPUOrigin3D {
                x: self.origin.x,
                y: self.origin.y,
                z: self.origin.z,
            },
            aspect: self.aspect.to_native(),
        })
    }
}
