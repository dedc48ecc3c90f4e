//! Bind group, pipeline layout and compute pipeline descriptors.

use std::ptr;

use crate::buffer::Buffer;
use crate::error::Result;
use crate::ffi::*;
use crate::marshal::{marshal_slice, native_bool, Marshal};
use crate::pipeline::{BindGroupLayout, PipelineLayout, ShaderModule};
use crate::region::Region;
use crate::texture::{Sampler, TextureView};
use crate::types::{
    BufferBindingType, SamplerBindingType, ShaderStage, StorageTextureAccess, TextureFormat, TextureSampleType,
    TextureViewDimension,
};

/// Layout of a buffer binding.
#[derive(Debug, Clone, Copy, Default)]
pub struct BufferBindingLayout {
    /// Uniform, storage or read-only storage.
    pub ty: BufferBindingType,
    /// Whether the offset is supplied when the group is set.
    pub has_dynamic_offset: bool,
    /// Smallest bound size the shader accepts. Zero skips the check.
    pub min_binding_size: u64,
}

/// Layout of a sampler binding.
#[derive(Debug, Clone, Copy, Default)]
pub struct SamplerBindingLayout {
    /// Filtering, non-filtering or comparison.
    pub ty: SamplerBindingType,
}

/// Layout of a sampled texture binding.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextureBindingLayout {
    /// Component type the shader samples.
    pub sample_type: TextureSampleType,
    /// Dimension of the bound view.
    pub view_dimension: TextureViewDimension,
    /// Whether the bound texture has more than one sample.
    pub multisampled: bool,
}

/// Layout of a storage texture binding.
#[derive(Debug, Clone, Copy, Default)]
pub struct StorageTextureBindingLayout {
    /// Read, write or both.
    pub access: StorageTextureAccess,
    /// Format of the bound view.
    pub format: TextureFormat,
    /// Dimension of the bound view.
    pub view_dimension: TextureViewDimension,
}

/// What a bind group layout slot holds.
#[derive(Debug, Clone, Copy)]
pub enum BindingType {
    Buffer(BufferBindingLayout),
    Sampler(SamplerBindingLayout),
    Texture(TextureBindingLayout),
    StorageTexture(StorageTextureBindingLayout),
}

/// One slot of a bind group layout.
#[derive(Debug, Clone, Copy)]
pub struct BindGroupLayoutEntry {
    /// Binding number used by the shader.
    pub binding: u32,
    /// Stages that see the binding.
    pub visibility: ShaderStage,
    /// What the slot holds.
    pub ty: BindingType,
}

impl Marshal for BindGroupLayoutEntry {
    type Native = WGPUBindGroupLayoutEntry;

    /// Only the selected member is filled in; the others stay `BindingNotUsed`.
    fn to_native(&self, _region: &Region) -> Result<Self::Native> {
        let mut buffer = BufferBindingLayout::default();
        let mut sampler = SamplerBindingLayout::default();
        let mut texture = TextureBindingLayout::default();
        let mut storage = StorageTextureBindingLayout::default();
        match self.ty {
            BindingType::Buffer(layout) => buffer = layout,
            BindingType::Sampler(layout) => sampler = layout,
            BindingType::Texture(layout) => texture = layout,
            BindingType::StorageTexture(layout) => storage = layout,
        }

        Ok(WGPUBindGroupLayoutEntry {
            nextInChain: ptr::null(),
            binding: self.binding,
            visibility: self.visibility.bits(),
            buffer: WGPUBufferBindingLayout {
                nextInChain: ptr::null(),
                type_: buffer.ty.to_native(),
                hasDynamicOffset: native_bool(buffer.has_dynamic_offset),
                minBindingSize: buffer.min_binding_size,
            },
            sampler: WGPUSamplerBindingLayout {
                nextInChain: ptr::null(),
                type_: sampler.ty.to_native(),
            },
            texture: WGPUTextureBindingLayout {
                nextInChain: ptr::null(),
                sampleType: texture.sample_type.to_native(),
                viewDimension: texture.view_dimension.to_native(),
                multisampled: native_bool(texture.multisampled),
            },
            storageTexture: WGPUStorageTextureBindingLayout {
                nextInChain: ptr::null(),
                access: storage.access.to_native(),
                format: storage.format.to_native(),
                viewDimension: storage.view_dimension.to_native(),
            },
        })
    }
}

/// Describes a [`BindGroupLayout`].
#[derive(Debug, Clone, Default)]
pub struct BindGroupLayoutDescriptor<'a> {
    /// Debug label.
    pub label: Option<&'a str>,
    /// Slots, each with a distinct binding number.
    pub entries: &'a [BindGroupLayoutEntry],
}

impl Marshal for BindGroupLayoutDescriptor<'_> {
    type Native = WGPUBindGroupLayoutDescriptor;

    fn to_native(&self, region: &Region) -> Result<Self::Native> {
        let (entries, entry_count) = marshal_slice(self.entries, region)?;
        Ok(WGPUBindGroupLayoutDescriptor {
            nextInChain: ptr::null(),
            label: region.opt_str_view(self.label),
            entryCount: entry_count,
            entries,
        })
    }
}

/// A resource bound into a bind group slot.
#[derive(Debug, Clone, Copy)]
pub enum BindingResource<'a> {
    Buffer {
        buffer: &'a Buffer,
        offset: u64,
        /// `None` binds to the end of the buffer.
        size: Option<u64>,
    },
    Sampler(&'a Sampler),
    TextureView(&'a TextureView),
}

/// A resource bound to one slot of a bind group.
#[derive(Debug, Clone, Copy)]
pub struct BindGroupEntry<'a> {
    /// Slot of the layout this entry fills.
    pub binding: u32,
    pub resource: BindingResource<'a>,
}

impl Marshal for BindGroupEntry<'_> {
    type Native = WGPUBindGroupEntry;

    fn to_native(&self, _region: &Region) -> Result<Self::Native> {
        let mut native = WGPUBindGroupEntry {
            nextInChain: ptr::null(),
            binding: self.binding,
            buffer: WGPUBuffer::null(),
            offset: 0,
            size: WGPU_WHOLE_SIZE,
            sampler: WGPUSampler::null(),
            textureView: WGPUTextureView::null(),
        };
        match self.resource {
            BindingResource::Buffer { buffer, offset, size } => {
                native.buffer = buffer.raw()?;
                native.offset = offset;
                native.size = size.unwrap_or(WGPU_WHOLE_SIZE);
            }
            BindingResource::Sampler(sampler) => native.sampler = sampler.raw()?,
            BindingResource::TextureView(view) => native.textureView = view.raw()?,
        }
        Ok(native)
    }
}

/// Describes a [`BindGroup`](crate::BindGroup).
#[derive(Debug, Clone)]
pub struct BindGroupDescriptor<'a> {
    /// Debug label.
    pub label: Option<&'a str>,
    /// Layout the entries must match.
    pub layout: &'a BindGroupLayout,
    /// One entry per layout slot.
    pub entries: &'a [BindGroupEntry<'a>],
}

impl Marshal for BindGroupDescriptor<'_> {
    type Native = WGPUBindGroupDescriptor;

    fn to_native(&self, region: &Region) -> Result<Self::Native> {
        let layout = self.layout.raw()?;
        let (entries, entry_count) = marshal_slice(self.entries, region)?;
        Ok(WGPUBindGroupDescriptor {
            nextInChain: ptr::null(),
            label: region.opt_str_view(self.label),
            layout,
            entryCount: entry_count,
            entries,
        })
    }
}

/// Describes a [`PipelineLayout`].
#[derive(Debug, Clone, Default)]
pub struct PipelineLayoutDescriptor<'a> {
    /// Debug label.
    pub label: Option<&'a str>,
    /// Layout of each bind group, indexed by group number.
    pub bind_group_layouts: &'a [&'a BindGroupLayout],
}

impl Marshal for PipelineLayoutDescriptor<'_> {
    type Native = WGPUPipelineLayoutDescriptor;

    fn to_native(&self, region: &Region) -> Result<Self::Native> {
        let layouts = self.bind_group_layouts;
        let (bind_group_layouts, layout_count) = region.array(layouts.len(), |i| layouts[i].raw())?;
        Ok(WGPUPipelineLayoutDescriptor {
            nextInChain: ptr::null(),
            label: region.opt_str_view(self.label),
            bindGroupLayoutCount: layout_count,
            bindGroupLayouts: bind_group_layouts,
        })
    }
}

/// Pipeline-overridable constant.
#[derive(Debug, Clone, Copy)]
pub struct ConstantEntry<'a> {
    /// Name or numeric id of the `override` declaration.
    pub key: &'a str,
    pub value: f64,
}

impl Marshal for ConstantEntry<'_> {
    type Native = WGPUConstantEntry;

    fn to_native(&self, region: &Region) -> Result<Self::Native> {
        Ok(WGPUConstantEntry {
            nextInChain: ptr::null(),
            key: region.str_view(self.key),
            value: self.value,
        })
    }
}

/// Describes a [`ComputePipeline`](crate::ComputePipeline).
#[derive(Debug, Clone)]
pub struct ComputePipelineDescriptor<'a> {
    /// Debug label.
    pub label: Option<&'a str>,
    /// `None` derives the layout from the shader.
    pub layout: Option<&'a PipelineLayout>,
    /// Module holding the entry point.
    pub module: &'a ShaderModule,
    /// `None` picks the module's single compute entry point.
    pub entry_point: Option<&'a str>,
    /// Values for the module's overridable constants.
    pub constants: &'a [ConstantEntry<'a>],
}

impl Marshal for ComputePipelineDescriptor<'_> {
    type Native = WGPUComputePipelineDescriptor;

    fn to_native(&self, region: &Region) -> Result<Self::Native> {
        let layout = match self.layout {
            Some(layout) => layout.raw()?,
            None => WGPUPipelineLayout::null(),
        };
        let module = self.module.raw()?;
        let (constants, constant_count) = marshal_slice(self.constants, region)?;
        Ok(WGPUComputePipelineDescriptor {
            nextInChain: ptr::null(),
            label: region.opt_str_view(self.label),
            layout,
            compute: WGPUComputeState {
                nextInChain: ptr::null(),
                module,
                entryPoint: region.opt_str_view(self.entry_point),
                constantCount: constant_count,
                constants,
            },
        })
    }
}
