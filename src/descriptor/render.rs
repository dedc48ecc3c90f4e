//! Render pipeline, render pass and render bundle descriptors.

use std::ptr;

use crate::descriptor::ConstantEntry;
use crate::error::Result;
use crate::ffi::*;
use crate::marshal::{marshal_slice, native_bool, Marshal};
use crate::pipeline::{PipelineLayout, ShaderModule};
use crate::query::QuerySet;
use crate::region::Region;
use crate::texture::TextureView;
use crate::types::{
    BlendFactor, BlendOperation, Color, ColorWriteMask, CompareFunction, CullMode, FrontFace, IndexFormat, LoadOp,
    PrimitiveTopology, StencilOperation, StoreOp, TextureFormat, VertexFormat, VertexStepMode,
};

fn native_optional_bool(value: Option<bool>) -> WGPUEnum {
    match value {
        Some(true) => WGPUOptionalBool_True,
        Some(false) => WGPUOptionalBool_False,
        None => WGPUOptionalBool_Undefined,
    }
}

fn native_color(color: Color) -> WGPUColor {
    WGPUColor {
        r: color.r,
        g: color.g,
        b: color.b,
        a: color.a,
    }
}

// ============================================================================
// Vertex input
// ============================================================================

/// One attribute within a vertex buffer element.
#[derive(Debug, Clone, Copy)]
pub struct VertexAttribute {
    /// Component type and count read from the buffer.
    pub format: VertexFormat,
    /// Byte offset from the start of the element.
    pub offset: u64,
    /// `@location` the attribute feeds in the vertex shader.
    pub shader_location: u32,
}

impl Marshal for VertexAttribute {
    type Native = WGPUVertexAttribute;

    fn to_native(&self, _region: &Region) -> Result<Self::Native> {
        Ok(WGPUVertexAttribute {
            format: self.format.to_native(),
            offset: self.offset,
            shaderLocation: self.shader_location,
        })
    }
}

/// Layout of one vertex buffer slot.
#[derive(Debug, Clone, Copy, Default)]
pub struct VertexBufferLayout<'a> {
    /// Bytes between consecutive elements.
    pub array_stride: u64,
    /// Advance per vertex or per instance.
    pub step_mode: VertexStepMode,
    /// Attributes read from each element.
    pub attributes: &'a [VertexAttribute],
}

impl Marshal for VertexBufferLayout<'_> {
    type Native = WGPUVertexBufferLayout;

    fn to_native(&self, region: &Region) -> Result<Self::Native> {
        let (attributes, attribute_count) = marshal_slice(self.attributes, region)?;
        Ok(WGPUVertexBufferLayout {
            arrayStride: self.array_stride,
            stepMode: self.step_mode.to_native(),
            attributeCount: attribute_count,
            attributes,
        })
    }
}

/// Vertex stage of a render pipeline.
#[derive(Debug, Clone, Copy)]
pub struct VertexState<'a> {
    /// Module holding the vertex entry point.
    pub module: &'a ShaderModule,
    /// `None` picks the module's single vertex entry point.
    pub entry_point: Option<&'a str>,
    /// Values for the module's overridable constants.
    pub constants: &'a [ConstantEntry<'a>],
    /// Slot `i` of the pipeline reads through `buffers[i]`.
    pub buffers: &'a [VertexBufferLayout<'a>],
}

impl Marshal for VertexState<'_> {
    type Native = WGPUVertexState;

    fn to_native(&self, region: &Region) -> Result<Self::Native> {
        let module = self.module.raw()?;
        let (constants, constant_count) = marshal_slice(self.constants, region)?;
        let (buffers, buffer_count) = marshal_slice(self.buffers, region)?;
        Ok(WGPUVertexState {
            nextInChain: ptr::null(),
            module,
            entryPoint: region.opt_str_view(self.entry_point),
            constantCount: constant_count,
            constants,
            bufferCount: buffer_count,
            buffers,
        })
    }
}

// ============================================================================
// Fixed-function state
// ============================================================================

/// Primitive assembly and rasterization options.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimitiveState {
    /// How vertices assemble into primitives.
    pub topology: PrimitiveTopology,
    /// Required for strip topologies drawn with an index buffer.
    pub strip_index_format: Option<IndexFormat>,
    /// Winding order of front-facing triangles.
    pub front_face: FrontFace,
    /// Which faces are discarded.
    pub cull_mode: CullMode,
    /// Disable depth clipping. Needs the `DepthClipControl` feature.
    pub unclipped_depth: bool,
}

impl Marshal for PrimitiveState {
    type Native = WGPUPrimitiveState;

    fn to_native(&self, _region: &Region) -> Result<Self::Native> {
        Ok(WGPUPrimitiveState {
            nextInChain: ptr::null(),
            topology: self.topology.to_native(),
            stripIndexFormat: self.strip_index_format.unwrap_or(IndexFormat::Undefined).to_native(),
            frontFace: self.front_face.to_native(),
            cullMode: self.cull_mode.to_native(),
            unclippedDepth: native_bool(self.unclipped_depth),
        })
    }
}

/// Stencil test for one face orientation.
#[derive(Debug, Clone, Copy)]
pub struct StencilFaceState {
    /// Test against the stencil reference.
    pub compare: CompareFunction,
    /// Applied when the stencil test fails.
    pub fail_op: StencilOperation,
    /// Applied when the stencil test passes and the depth test fails.
    pub depth_fail_op: StencilOperation,
    /// Applied when both tests pass.
    pub pass_op: StencilOperation,
}

impl Default for StencilFaceState {
    fn default() -> Self {
        Self {
            compare: CompareFunction::Always,
            fail_op: StencilOperation::Keep,
            depth_fail_op: StencilOperation::Keep,
            pass_op: StencilOperation::Keep,
        }
    }
}

impl StencilFaceState {
    fn to_native(self) -> WGPUStencilFaceState {
        WGPUStencilFaceState {
            compare: self.compare.to_native(),
            failOp: self.fail_op.to_native(),
            depthFailOp: self.depth_fail_op.to_native(),
            passOp: self.pass_op.to_native(),
        }
    }
}

/// Depth and stencil testing against the pass's depth-stencil attachment.
#[derive(Debug, Clone, Copy)]
pub struct DepthStencilState {
    /// Format of the depth-stencil attachment.
    pub format: TextureFormat,
    /// `None` leaves it undefined, which is only valid for formats without
    /// depth.
    pub depth_write_enabled: Option<bool>,
    /// Test a fragment's depth against the stored depth.
    pub depth_compare: CompareFunction,
    /// Stencil state for front-facing primitives.
    pub stencil_front: StencilFaceState,
    /// Stencil state for back-facing primitives.
    pub stencil_back: StencilFaceState,
    /// Bits read by the stencil test.
    pub stencil_read_mask: u32,
    /// Bits written by stencil operations.
    pub stencil_write_mask: u32,
    /// Constant depth bias added to each fragment.
    pub depth_bias: i32,
    /// Depth bias scaled by the fragment's depth slope.
    pub depth_bias_slope_scale: f32,
    /// Largest bias applied. Zero means no clamp.
    pub depth_bias_clamp: f32,
}

impl Default for DepthStencilState {
    fn default() -> Self {
        Self {
            format: TextureFormat::Depth24Plus,
            depth_write_enabled: Some(true),
            depth_compare: CompareFunction::Less,
            stencil_front: StencilFaceState::default(),
            stencil_back: StencilFaceState::default(),
            stencil_read_mask: !0,
            stencil_write_mask: !0,
            depth_bias: 0,
            depth_bias_slope_scale: 0.0,
            depth_bias_clamp: 0.0,
        }
    }
}

impl Marshal for DepthStencilState {
    type Native = WGPUDepthStencilState;

    fn to_native(&self, _region: &Region) -> Result<Self::Native> {
        Ok(WGPUDepthStencilState {
            nextInChain: ptr::null(),
            format: self.format.to_native(),
            depthWriteEnabled: native_optional_bool(self.depth_write_enabled),
            depthCompare: self.depth_compare.to_native(),
            stencilFront: self.stencil_front.to_native(),
            stencilBack: self.stencil_back.to_native(),
            stencilReadMask: self.stencil_read_mask,
            stencilWriteMask: self.stencil_write_mask,
            depthBias: self.depth_bias,
            depthBiasSlopeScale: self.depth_bias_slope_scale,
            depthBiasClamp: self.depth_bias_clamp,
        })
    }
}

/// Multisampling of the pipeline's render targets.
#[derive(Debug, Clone, Copy)]
pub struct MultisampleState {
    /// Samples per pixel. Must match the attachments.
    pub count: u32,
    /// Bitmask of samples that are written.
    pub mask: u32,
    /// Derive the coverage mask from the first target's alpha.
    pub alpha_to_coverage_enabled: bool,
}

impl Default for MultisampleState {
    fn default() -> Self {
        Self {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        }
    }
}

impl Marshal for MultisampleState {
    type Native = WGPUMultisampleState;

    fn to_native(&self, _region: &Region) -> Result<Self::Native> {
        Ok(WGPUMultisampleState {
            nextInChain: ptr::null(),
            count: self.count,
            mask: self.mask,
            alphaToCoverageEnabled: native_bool(self.alpha_to_coverage_enabled),
        })
    }
}

/// Blend equation for one channel group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlendComponent {
    /// How the weighted source and destination combine.
    pub operation: BlendOperation,
    /// Weight of the fragment's output.
    pub src_factor: BlendFactor,
    /// Weight of the value already in the target.
    pub dst_factor: BlendFactor,
}

impl BlendComponent {
    /// Overwrite the target with the source.
    pub const REPLACE: Self = Self {
        operation: BlendOperation::Add,
        src_factor: BlendFactor::One,
        dst_factor: BlendFactor::Zero,
    };

    /// Source over destination, weighted by source alpha.
    pub const OVER: Self = Self {
        operation: BlendOperation::Add,
        src_factor: BlendFactor::SrcAlpha,
        dst_factor: BlendFactor::OneMinusSrcAlpha,
    };

    fn to_native(self) -> WGPUBlendComponent {
        WGPUBlendComponent {
            operation: self.operation.to_native(),
            srcFactor: self.src_factor.to_native(),
            dstFactor: self.dst_factor.to_native(),
        }
    }
}

/// Blending of the color and alpha channels of a render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlendState {
    /// Blending of the red, green and blue channels.
    pub color: BlendComponent,
    /// Blending of the alpha channel.
    pub alpha: BlendComponent,
}

impl BlendState {
    /// Overwrite every channel.
    pub const REPLACE: Self = Self {
        color: BlendComponent::REPLACE,
        alpha: BlendComponent::REPLACE,
    };

    /// Standard non-premultiplied alpha blending.
    pub const ALPHA_BLENDING: Self = Self {
        color: BlendComponent::OVER,
        alpha: BlendComponent::OVER,
    };
}

/// A render target written by the fragment stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorTargetState {
    /// Format of the attachment bound to this target.
    pub format: TextureFormat,
    /// `None` disables blending.
    pub blend: Option<BlendState>,
    /// Channels the target is written through.
    pub write_mask: ColorWriteMask,
}

impl Marshal for ColorTargetState {
    type Native = WGPUColorTargetState;

    fn to_native(&self, region: &Region) -> Result<Self::Native> {
        let blend: *const WGPUBlendState = match self.blend {
            Some(blend) => region.alloc(WGPUBlendState {
                color: blend.color.to_native(),
                alpha: blend.alpha.to_native(),
            }),
            None => ptr::null(),
        };
        Ok(WGPUColorTargetState {
            nextInChain: ptr::null(),
            format: self.format.to_native(),
            blend,
            writeMask: self.write_mask.bits(),
        })
    }
}

/// Fragment stage of a render pipeline.
#[derive(Debug, Clone, Copy)]
pub struct FragmentState<'a> {
    /// Module holding the fragment entry point.
    pub module: &'a ShaderModule,
    /// `None` picks the module's single fragment entry point.
    pub entry_point: Option<&'a str>,
    /// Values for the module's overridable constants.
    pub constants: &'a [ConstantEntry<'a>],
    /// Target `i` receives the shader's `@location(i)` output.
    pub targets: &'a [ColorTargetState],
}

impl Marshal for FragmentState<'_> {
    type Native = WGPUFragmentState;

    fn to_native(&self, region: &Region) -> Result<Self::Native> {
        let module = self.module.raw()?;
        let (constants, constant_count) = marshal_slice(self.constants, region)?;
        let (targets, target_count) = marshal_slice(self.targets, region)?;
        Ok(WGPUFragmentState {
            nextInChain: ptr::null(),
            module,
            entryPoint: region.opt_str_view(self.entry_point),
            constantCount: constant_count,
            constants,
            targetCount: target_count,
            targets,
        })
    }
}

#[derive(Debug, Clone)]
pub struct RenderPipelineDescriptor<'a> {
    /// Debug label.
    pub label: Option<&'a str>,
    /// `None` derives the layout from the shaders.
    pub layout: Option<&'a PipelineLayout>,
    /// Vertex shader and buffer layouts.
    pub vertex: VertexState<'a>,
    /// Primitive assembly and culling.
    pub primitive: PrimitiveState,
    /// `None` for passes without a depth-stencil attachment.
    pub depth_stencil: Option<DepthStencilState>,
    /// Sample count and mask. Must match the attachments.
    pub multisample: MultisampleState,
    /// `None` for depth-only pipelines.
    pub fragment: Option<FragmentState<'a>>,
}

impl Marshal for RenderPipelineDescriptor<'_> {
    type Native = WGPURenderPipelineDescriptor;

    fn to_native(&self, region: &Region) -> Result<Self::Native> {
        let layout = match self.layout {
            Some(layout) => layout.raw()?,
            None => WGPUPipelineLayout::null(),
        };
        let depth_stencil: *const WGPUDepthStencilState = match &self.depth_stencil {
            Some(state) => state.marshal(region)?,
            None => ptr::null(),
        };
        let fragment: *const WGPUFragmentState = match &self.fragment {
            Some(state) => state.marshal(region)?,
            None => ptr::null(),
        };
        Ok(WGPURenderPipelineDescriptor {
            nextInChain: ptr::null(),
            label: region.opt_str_view(self.label),
            layout,
            vertex: self.vertex.to_native(region)?,
            primitive: self.primitive.to_native(region)?,
            depthStencil: depth_stencil,
            multisample: self.multisample.to_native(region)?,
            fragment,
        })
    }
}

// ============================================================================
// Render passes
// ============================================================================

/// A color attachment of a render pass.
#[derive(Debug, Clone, Copy)]
pub struct RenderPassColorAttachment<'a> {
    /// View rendered into.
    pub view: &'a TextureView,
    /// Slice of a 3D view to render into.
    pub depth_slice: Option<u32>,
    /// Multisampled output is resolved into this view.
    pub resolve_target: Option<&'a TextureView>,
    /// What the pass starts from.
    pub load_op: LoadOp,
    /// Whether results are kept after the pass.
    pub store_op: StoreOp,
    /// Used when `load_op` is [`LoadOp::Clear`].
    pub clear_value: Color,
}

impl Marshal for RenderPassColorAttachment<'_> {
    type Native = WGPURenderPassColorAttachment;

    fn to_native(&self, _region: &Region) -> Result<Self::Native> {
        let resolve_target = match self.resolve_target {
            Some(view) => view.raw()?,
            None => WGPUTextureView::null(),
        };
        Ok(WGPURenderPassColorAttachment {
            nextInChain: ptr::null(),
            view: self.view.raw()?,
            depthSlice: self.depth_slice.unwrap_or(WGPU_DEPTH_SLICE_UNDEFINED),
            resolveTarget: resolve_target,
            loadOp: self.load_op.to_native(),
            storeOp: self.store_op.to_native(),
            clearValue: native_color(self.clear_value),
        })
    }
}

/// The depth-stencil attachment of a render pass.
///
/// Operations for an aspect that is read-only, or absent from the view's
/// format, must stay [`LoadOp::Undefined`] and [`StoreOp::Undefined`].
#[derive(Debug, Clone, Copy)]
pub struct RenderPassDepthStencilAttachment<'a> {
    /// Depth-stencil view tested and written by the pass.
    pub view: &'a TextureView,
    pub depth_load_op: LoadOp,
    pub depth_store_op: StoreOp,
    /// Used when `depth_load_op` is [`LoadOp::Clear`]. Between 0 and 1.
    pub depth_clear_value: f32,
    /// The pass never writes depth.
    pub depth_read_only: bool,
    pub stencil_load_op: LoadOp,
    pub stencil_store_op: StoreOp,
    /// Used when `stencil_load_op` is [`LoadOp::Clear`].
    pub stencil_clear_value: u32,
    /// The pass never writes stencil.
    pub stencil_read_only: bool,
}

impl Marshal for RenderPassDepthStencilAttachment<'_> {
    type Native = WGPURenderPassDepthStencilAttachment;

    fn to_native(&self, _region: &Region) -> Result<Self::Native> {
        Ok(WGPURenderPassDepthStencilAttachment {
            view: self.view.raw()?,
            depthLoadOp: self.depth_load_op.to_native(),
            depthStoreOp: self.depth_store_op.to_native(),
            depthClearValue: self.depth_clear_value,
            depthReadOnly: native_bool(self.depth_read_only),
            stencilLoadOp: self.stencil_load_op.to_native(),
            stencilStoreOp: self.stencil_store_op.to_native(),
            stencilClearValue: self.stencil_clear_value,
            stencilReadOnly: native_bool(self.stencil_read_only),
        })
    }
}

/// Attachments of a render pass. Timestamp writes are not supported.
#[derive(Debug, Clone, Default)]
pub struct RenderPassDescriptor<'a> {
    /// Debug label.
    pub label: Option<&'a str>,
    /// Attachment `i` receives fragment target `i`.
    pub color_attachments: &'a [RenderPassColorAttachment<'a>],
    /// Required when the pipelines used have depth-stencil state.
    pub depth_stencil_attachment: Option<RenderPassDepthStencilAttachment<'a>>,
    /// Target of the pass's occlusion queries.
    pub occlusion_query_set: Option<&'a QuerySet>,
}

impl Marshal for RenderPassDescriptor<'_> {
    type Native = WGPURenderPassDescriptor;

    fn to_native(&self, region: &Region) -> Result<Self::Native> {
        let (color_attachments, color_attachment_count) = marshal_slice(self.color_attachments, region)?;
        let depth_stencil: *const WGPURenderPassDepthStencilAttachment = match &self.depth_stencil_attachment {
            Some(attachment) => attachment.marshal(region)?,
            None => ptr::null(),
        };
        let occlusion_query_set = match self.occlusion_query_set {
            Some(query_set) => query_set.raw()?,
            None => WGPUQuerySet::null(),
        };
        Ok(WGPURenderPassDescriptor {
            nextInChain: ptr::null(),
            label: region.opt_str_view(self.label),
            colorAttachmentCount: color_attachment_count,
            colorAttachments: color_attachments,
            depthStencilAttachment: depth_stencil,
            occlusionQuerySet: occlusion_query_set,
            timestampWrites: ptr::null(),
        })
    }
}

// ============================================================================
// Render bundles
// ============================================================================

/// Attachment formats the bundle will be executed against.
#[derive(Debug, Clone)]
pub struct RenderBundleEncoderDescriptor<'a> {
    /// Debug label.
    pub label: Option<&'a str>,
    /// Color attachment formats of the passes that will run the bundle.
    pub color_formats: &'a [TextureFormat],
    /// `Undefined` for passes without a depth-stencil attachment.
    pub depth_stencil_format: TextureFormat,
    /// Sample count of the passes that will run the bundle.
    pub sample_count: u32,
    /// The bundle never writes depth.
    pub depth_read_only: bool,
    /// The bundle never writes stencil.
    pub stencil_read_only: bool,
}

impl Default for RenderBundleEncoderDescriptor<'_> {
    fn default() -> Self {
        Self {
            label: None,
            color_formats: &[],
            depth_stencil_format: TextureFormat::Undefined,
            sample_count: 1,
            depth_read_only: false,
            stencil_read_only: false,
        }
    }
}

impl Marshal for RenderBundleEncoderDescriptor<'_> {
    type Native = WGPURenderBundleEncoderDescriptor;

    fn to_native(&self, region: &Region) -> Result<Self::Native> {
        let formats = self.color_formats;
        let (color_formats, color_format_count) = region.array(formats.len(), |i| Ok(formats[i].to_native()))?;
        Ok(WGPURenderBundleEncoderDescriptor {
            nextInChain: ptr::null(),
            label: region.opt_str_view(self.label),
            colorFormatCount: color_format_count,
            colorFormats: color_formats,
            depthStencilFormat: self.depth_stencil_format.to_native(),
            sampleCount: self.sample_count,
            depthReadOnly: native_bool(self.depth_read_only),
            stencilReadOnly: native_bool(self.stencil_read_only),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenderBundleDescriptor<'a> {
    /// Debug label.
    pub label: Option<&'a str>,
}

impl Marshal for RenderBundleDescriptor<'_> {
    type Native = WGPURenderBundleDescriptor;

    fn to_native(&self, region: &Region) -> Result<Self::Native> {
        Ok(WGPURenderBundleDescriptor {
            nextInChain: ptr::null(),
            label: region.opt_str_view(self.label),
        })
    }
}
