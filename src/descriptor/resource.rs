//! Buffer, texture, sampler and shader module descriptors.

use std::ptr;

use crate::descriptor::native_extent;
use crate::error::Result;
use crate::ffi::*;
use crate::marshal::{self, native_bool, Extension, Marshal};
use crate::region::Region;
use crate::types::{
    AddressMode, CompareFunction, Extent3d, FilterMode, MipmapFilterMode, TextureAspect, TextureDimension,
    TextureFormat, TextureUsage, TextureViewDimension, BufferUsage,
};

/// Describes a [`Buffer`](crate::Buffer).
#[derive(Debug, Clone, Default)]
pub struct BufferDescriptor<'a> {
    /// Debug label.
    pub label: Option<&'a str>,
    /// Allowed uses. Must not be empty.
    pub usage: BufferUsage,
    /// Size in bytes.
    pub size: u64,
    /// Start mapped for writing. `size` must then be a multiple of 4.
    pub mapped_at_creation: bool,
}

impl Marshal for BufferDescriptor<'_> {
    type Native = WGPUBufferDescriptor;

    fn to_native(&self, region: &Region) -> Result<Self::Native> {
        Ok(WGPUBufferDescriptor {
            nextInChain: ptr::null(),
            label: region.opt_str_view(self.label),
            usage: self.usage.bits(),
            size: self.size,
            mappedAtCreation: native_bool(self.mapped_at_creation),
        })
    }
}

/// Describes a [`Texture`](crate::Texture).
#[derive(Debug, Clone)]
pub struct TextureDescriptor<'a> {
    /// Debug label.
    pub label: Option<&'a str>,
    pub usage: TextureUsage,
    pub dimension: TextureDimension,
    /// Size of mip level 0.
    pub size: Extent3d,
    pub format: TextureFormat,
    /// At least 1.
    pub mip_level_count: u32,
    /// 1, or 4 for a multisampled render target.
    pub sample_count: u32,
    /// Extra formats views of this texture may use.
    pub view_formats: &'a [TextureFormat],
}

impl Default for TextureDescriptor<'_> {
    fn default() -> Self {
        Self {
            label: None,
            usage: TextureUsage::empty(),
            dimension: TextureDimension::D2,
            size: Extent3d::default(),
            format: TextureFormat::Undefined,
            mip_level_count: 1,
            sample_count: 1,
            view_formats: &[],
        }
    }
}

impl Marshal for TextureDescriptor<'_> {
    type Native = WGPUTextureDescriptor;

    fn to_native(&self, region: &Region) -> Result<Self::Native> {
        let formats = self.view_formats;
        let (view_formats, view_format_count) = region.array(formats.len(), |i| Ok(formats[i].to_native()))?;
        Ok(WGPUTextureDescriptor {
            nextInChain: ptr::null(),
            label: region.opt_str_view(self.label),
            usage: self.usage.bits(),
            dimension: self.dimension.to_native(),
            size: native_extent(self.size),
            format: self.format.to_native(),
            mipLevelCount: self.mip_level_count,
            sampleCount: self.sample_count,
            viewFormatCount: view_format_count,
            viewFormats: view_formats,
        })
    }
}

/// Options for a texture view. `None` counts cover the rest of the texture.
#[derive(Debug, Clone, Default)]
pub struct TextureViewDescriptor<'a> {
    /// Debug label.
    pub label: Option<&'a str>,
    /// `Undefined` inherits the texture's format.
    pub format: TextureFormat,
    /// `Undefined` follows the texture's dimension.
    pub dimension: TextureViewDimension,
    /// First mip level visible through the view.
    pub base_mip_level: u32,
    pub mip_level_count: Option<u32>,
    /// First array layer visible through the view.
    pub base_array_layer: u32,
    pub array_layer_count: Option<u32>,
    /// Which aspects of a depth-stencil texture the view exposes.
    pub aspect: TextureAspect,
    /// Empty inherits the texture's usage.
    pub usage: TextureUsage,
}

impl Marshal for TextureViewDescriptor<'_> {
    type Native = WGPUTextureViewDescriptor;

    fn to_native(&self, region: &Region) -> Result<Self::Native> {
        Ok(WGPUTextureViewDescriptor {
            nextInChain: ptr::null(),
            label: region.opt_str_view(self.label),
            format: self.format.to_native(),
            dimension: self.dimension.to_native(),
            baseMipLevel: self.base_mip_level,
            mipLevelCount: self.mip_level_count.unwrap_or(WGPU_MIP_LEVEL_COUNT_UNDEFINED),
            baseArrayLayer: self.base_array_layer,
            arrayLayerCount: self.array_layer_count.unwrap_or(WGPU_ARRAY_LAYER_COUNT_UNDEFINED),
            aspect: self.aspect.to_native(),
            usage: self.usage.bits(),
        })
    }
}

/// Describes a [`Sampler`](crate::Sampler).
#[derive(Debug, Clone)]
pub struct SamplerDescriptor<'a> {
    /// Debug label.
    pub label: Option<&'a str>,
    /// Addressing outside `[0, 1]` along the width.
    pub address_mode_u: AddressMode,
    /// Addressing outside `[0, 1]` along the height.
    pub address_mode_v: AddressMode,
    /// Addressing outside `[0, 1]` along the depth.
    pub address_mode_w: AddressMode,
    /// Filter when a texel covers more than one pixel.
    pub mag_filter: FilterMode,
    /// Filter when a pixel covers more than one texel.
    pub min_filter: FilterMode,
    /// Filter between mip levels.
    pub mipmap_filter: MipmapFilterMode,
    /// Lowest mip level of detail sampled.
    pub lod_min_clamp: f32,
    /// Highest mip level of detail sampled.
    pub lod_max_clamp: f32,
    /// `Some` makes this a comparison sampler.
    pub compare: Option<CompareFunction>,
    /// Anisotropic filtering samples. Values above 1 need linear filters.
    pub max_anisotropy: u16,
}

impl Default for SamplerDescriptor<'_> {
    fn default() -> Self {
        Self {
            label: None,
            address_mode_u: AddressMode::ClampToEdge,
            address_mode_v: AddressMode::ClampToEdge,
            address_mode_w: AddressMode::ClampToEdge,
            mag_filter: FilterMode::Nearest,
            min_filter: FilterMode::Nearest,
            mipmap_filter: MipmapFilterMode::Nearest,
            lod_min_clamp: 0.0,
            lod_max_clamp: 32.0,
            compare: None,
            max_anisotropy: 1,
        }
    }
}

impl Marshal for SamplerDescriptor<'_> {
    type Native = WGPUSamplerDescriptor;

    fn to_native(&self, region: &Region) -> Result<Self::Native> {
        Ok(WGPUSamplerDescriptor {
            nextInChain: ptr::null(),
            label: region.opt_str_view(self.label),
            addressModeU: self.address_mode_u.to_native(),
            addressModeV: self.address_mode_v.to_native(),
            addressModeW: self.address_mode_w.to_native(),
            magFilter: self.mag_filter.to_native(),
            minFilter: self.min_filter.to_native(),
            mipmapFilter: self.mipmap_filter.to_native(),
            lodMinClamp: self.lod_min_clamp,
            lodMaxClamp: self.lod_max_clamp,
            compare: self.compare.unwrap_or(CompareFunction::Undefined).to_native(),
            maxAnisotropy: self.max_anisotropy,
        })
    }
}

/// Source code of a shader module.
#[derive(Debug, Clone, Copy)]
pub enum ShaderSource<'a> {
    Wgsl(&'a str),
    /// SPIR-V words.
    SpirV(&'a [u32]),
}

impl Default for ShaderSource<'_> {
    fn default() -> Self {
        ShaderSource::Wgsl("")
    }
}

/// Describes a [`ShaderModule`](crate::ShaderModule).
#[derive(Debug, Clone, Default)]
pub struct ShaderModuleDescriptor<'a> {
    /// Debug label.
    pub label: Option<&'a str>,
    /// WGSL text or SPIR-V words.
    pub source: ShaderSource<'a>,
}

impl Marshal for ShaderModuleDescriptor<'_> {
    type Native = WGPUShaderModuleDescriptor;

    fn to_native(&self, region: &Region) -> Result<Self::Native> {
        let source = match self.source {
            ShaderSource::Wgsl(code) => Extension::ShaderSourceWgsl(code),
            ShaderSource::SpirV(words) => Extension::ShaderSourceSpirv(words),
        };
        Ok(WGPUShaderModuleDescriptor {
            nextInChain: marshal::chain(&[source], region)?,
            label: region.opt_str_view(self.label),
        })
    }
}
