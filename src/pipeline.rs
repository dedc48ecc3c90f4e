//! Shader modules, binding layouts and pipelines.

use crate::error::Result;
use crate::ffi::{self, *};
use crate::resource::define_resource;

define_resource!(
    /// Compiled shader code.
    ShaderModule,
    WGPUShaderModule
);

define_resource!(
    /// Shape of a bind group: which resource kinds sit at which bindings.
    BindGroupLayout,
    WGPUBindGroupLayout
);

define_resource!(
    /// A set of resources bound together.
    BindGroup,
    WGPUBindGroup
);

define_resource!(
    /// Bind group layouts of a pipeline, indexed by group number.
    PipelineLayout,
    WGPUPipelineLayout
);

define_resource!(
    /// A compiled compute pipeline.
    ComputePipeline,
    WGPUComputePipeline
);

impl ComputePipeline {
    /// Layout of bind group `index`, as derived or declared.
    pub fn bind_group_layout(&self, index: u32) -> Result<BindGroupLayout> {
        let raw = self.raw()?;
        let get_layout = entry!(self.library().procs(), compute_pipeline_get_bind_group_layout)?;
        let layout = ffi::check_handle(
            "wgpuComputePipelineGetBindGroupLayout",
            unsafe { get_layout(raw, index) },
            WGPUBindGroupLayout::is_null,
        )?;
        unsafe { BindGroupLayout::from_raw(self.library().clone(), layout) }
    }
}

define_resource!(
    /// A compiled render pipeline.
    RenderPipeline,
    WGPURenderPipeline
);

impl RenderPipeline {
    /// Layout of bind group `index`, as derived or declared.
    pub fn bind_group_layout(&self, index: u32) -> Result<BindGroupLayout> {
        let raw = self.raw()?;
        let get_layout = entry!(self.library().procs(), render_pipeline_get_bind_group_layout)?;
        let layout = ffi::check_handle(
            "wgpuRenderPipelineGetBindGroupLayout",
            unsafe { get_layout(raw, index) },
            WGPUBindGroupLayout::is_null,
        )?;
        unsafe { BindGroupLayout::from_raw(self.library().clone(), layout) }
    }
}
