//! Logical devices: resource factories, error scopes and loss tracking.

use std::ptr;
use std::sync::Arc;

use crate::buffer::Buffer;
use crate::command::CommandEncoder;
use crate::descriptor::*;
use crate::error::Result;
use crate::ffi::{self, *};
use crate::marshal::{native_bool, Marshal};
use crate::pending::{self, DeviceEvents, NativeFuture};
use crate::pipeline::{BindGroup, BindGroupLayout, ComputePipeline, PipelineLayout, RenderPipeline, ShaderModule};
use crate::query::QuerySet;
use crate::queue::Queue;
use crate::region::Region;
use crate::render::RenderBundleEncoder;
use crate::resource::{impl_resource, NativeHandle, Owned};
use crate::texture::{Sampler, Texture};
use crate::types::{DeviceLost, ErrorFilter, FeatureName, GpuError};

type CreateFn<N, H> = unsafe extern "C" fn(WGPUDevice, *const N) -> H;

/// A logical device.
///
/// Every resource is created through a device. Dropping or closing the device
/// does not invalidate resources created from it; each is released on its
/// own.
pub struct Device {
    inner: Owned<WGPUDevice>,
    events: Arc<DeviceEvents>,
}

impl_resource!(Device, WGPUDevice);

impl Device {
    /// Take ownership of a raw device handle.
    ///
    /// A device adopted this way has no device-lost or uncaptured-error
    /// registration, so [`Device::lost`] never resolves for it.
    ///
    /// # Safety
    ///
    /// `raw` must be null or a live handle created through `library` whose
    /// reference is transferred to the wrapper.
    pub unsafe fn from_raw(library: crate::library::Library, raw: WGPUDevice) -> Result<Self> {
        Self::from_parts(library, raw, None, Arc::default())
    }

    pub(crate) fn from_parts(
        library: crate::library::Library,
        raw: WGPUDevice,
        region: Option<Region>,
        events: Arc<DeviceEvents>,
    ) -> Result<Self> {
        let inner = match region {
            Some(region) => Owned::with_region(library, raw, region)?,
            None => Owned::new(library, raw)?,
        };
        Ok(Self { inner, events })
    }

    fn create<D, H>(&self, op: &'static str, create: Result<CreateFn<D::Native, H>>, desc: &D) -> Result<H>
    where
        D: Marshal,
        H: NativeHandle,
    {
        let raw = self.raw()?;
        let create = create?;

        let region = Region::call();
        let native = desc.marshal(&region)?;
        let handle = unsafe { create(raw, native) };
        region.close();

        ffi::check_handle(op, handle, H::is_null)
    }

    /// Create a buffer. Contents start zeroed.
    pub fn create_buffer(&self, desc: &BufferDescriptor<'_>) -> Result<Buffer> {
        let procs = self.library().procs();
        let raw = self.create("wgpuDeviceCreateBuffer", entry!(procs, device_create_buffer), desc)?;
        unsafe { Buffer::from_raw(self.library().clone(), raw) }
    }

    /// Create a texture. Contents start zeroed.
    pub fn create_texture(&self, desc: &TextureDescriptor<'_>) -> Result<Texture> {
        let procs = self.library().procs();
        let raw = self.create("wgpuDeviceCreateTexture", entry!(procs, device_create_texture), desc)?;
        unsafe { Texture::from_raw(self.library().clone(), raw) }
    }

    /// Create a sampler (default options for `None`).
    pub fn create_sampler(&self, desc: Option<&SamplerDescriptor<'_>>) -> Result<Sampler> {
        let default = SamplerDescriptor::default();
        let procs = self.library().procs();
        let raw = self.create(
            "wgpuDeviceCreateSampler",
            entry!(procs, device_create_sampler),
            desc.unwrap_or(&default),
        )?;
        unsafe { Sampler::from_raw(self.library().clone(), raw) }
    }

    /// Compile WGSL or load SPIR-V. Compilation errors go to the error
    /// scope or uncaptured handler; the module is still returned.
    pub fn create_shader_module(&self, desc: &ShaderModuleDescriptor<'_>) -> Result<ShaderModule> {
        let procs = self.library().procs();
        let raw = self.create(
            "wgpuDeviceCreateShaderModule",
            entry!(procs, device_create_shader_module),
            desc,
        )?;
        unsafe { ShaderModule::from_raw(self.library().clone(), raw) }
    }

    /// Create an explicit bind group layout.
    pub fn create_bind_group_layout(&self, desc: &BindGroupLayoutDescriptor<'_>) -> Result<BindGroupLayout> {
        let procs = self.library().procs();
        let raw = self.create(
            "wgpuDeviceCreateBindGroupLayout",
            entry!(procs, device_create_bind_group_layout),
            desc,
        )?;
        unsafe { BindGroupLayout::from_raw(self.library().clone(), raw) }
    }

    /// Bind resources according to `desc.layout`.
    pub fn create_bind_group(&self, desc: &BindGroupDescriptor<'_>) -> Result<BindGroup> {
        let procs = self.library().procs();
        let raw = self.create("wgpuDeviceCreateBindGroup", entry!(procs, device_create_bind_group), desc)?;
        unsafe { BindGroup::from_raw(self.library().clone(), raw) }
    }

    pub fn create_pipeline_layout(&self, desc: &PipelineLayoutDescriptor<'_>) -> Result<PipelineLayout> {
        let procs = self.library().procs();
        let raw = self.create(
            "wgpuDeviceCreatePipelineLayout",
            entry!(procs, device_create_pipeline_layout),
            desc,
        )?;
        unsafe { PipelineLayout::from_raw(self.library().clone(), raw) }
    }

    /// Create a compute pipeline. An invalid descriptor is reported as a
    /// validation error, not as a failed call.
    pub fn create_compute_pipeline(&self, desc: &ComputePipelineDescriptor<'_>) -> Result<ComputePipeline> {
        let procs = self.library().procs();
        let raw = self.create(
            "wgpuDeviceCreateComputePipeline",
            entry!(procs, device_create_compute_pipeline),
            desc,
        )?;
        unsafe { ComputePipeline::from_raw(self.library().clone(), raw) }
    }

    /// Create a render pipeline from its shader stages and fixed-function
    /// state.
    pub fn create_render_pipeline(&self, desc: &RenderPipelineDescriptor<'_>) -> Result<RenderPipeline> {
        let procs = self.library().procs();
        let raw = self.create(
            "wgpuDeviceCreateRenderPipeline",
            entry!(procs, device_create_render_pipeline),
            desc,
        )?;
        unsafe { RenderPipeline::from_raw(self.library().clone(), raw) }
    }

    /// Create an encoder for a render bundle matching `desc`'s attachments.
    pub fn create_render_bundle_encoder(
        &self,
        desc: &RenderBundleEncoderDescriptor<'_>,
    ) -> Result<RenderBundleEncoder> {
        let procs = self.library().procs();
        let raw = self.create(
            "wgpuDeviceCreateRenderBundleEncoder",
            entry!(procs, device_create_render_bundle_encoder),
            desc,
        )?;
        unsafe { RenderBundleEncoder::from_raw(self.library().clone(), raw) }
    }

    /// Create a query set. Timestamp queries need the `TimestampQuery`
    /// feature.
    pub fn create_query_set(&self, desc: &QuerySetDescriptor<'_>) -> Result<QuerySet> {
        let procs = self.library().procs();
        let raw = self.create("wgpuDeviceCreateQuerySet", entry!(procs, device_create_query_set), desc)?;
        unsafe { QuerySet::from_raw(self.library().clone(), raw) }
    }

    /// Create a command encoder (default options for `None`).
    pub fn create_command_encoder(&self, desc: Option<&CommandEncoderDescriptor<'_>>) -> Result<CommandEncoder> {
        let default = CommandEncoderDescriptor::default();
        let procs = self.library().procs();
        let raw = self.create(
            "wgpuDeviceCreateCommandEncoder",
            entry!(procs, device_create_command_encoder),
            desc.unwrap_or(&default),
        )?;
        unsafe { CommandEncoder::from_raw(self.library().clone(), raw) }
    }

    /// The device's queue. Each call returns a new reference.
    pub fn queue(&self) -> Result<Queue> {
        let raw = self.raw()?;
        let get_queue = entry!(self.library().procs(), device_get_queue)?;
        let queue = ffi::check_handle("wgpuDeviceGetQueue", unsafe { get_queue(raw) }, WGPUQueue::is_null)?;
        unsafe { Queue::from_raw(self.library().clone(), queue) }
    }

    /// Check if the device was created with `feature`.
    pub fn has_feature(&self, feature: FeatureName) -> Result<bool> {
        let raw = self.raw()?;
        let has_feature = entry!(self.library().procs(), device_has_feature)?;
        Ok(unsafe { has_feature(raw, feature.to_native()) } != WGPU_FALSE)
    }

    /// Start capturing errors matching `filter`.
    pub fn push_error_scope(&self, filter: ErrorFilter) -> Result<()> {
        let raw = self.raw()?;
        let push = entry!(self.library().procs(), device_push_error_scope)?;
        unsafe { push(raw, filter.to_native()) };
        Ok(())
    }

    /// Stop capturing errors for the innermost scope.
    ///
    /// Resolves to `None` when no error was captured. Popping an empty stack
    /// resolves to [`Error::Native`](crate::Error::Native).
    pub fn pop_error_scope(&self) -> Result<NativeFuture<Option<GpuError>>> {
        let raw = self.raw()?;
        let pop = entry!(self.library().procs(), device_pop_error_scope)?;

        Ok(pending::begin(
            pending::POP_ERROR_SCOPE,
            Region::operation(),
            None,
            (),
            |userdata| {
                let info = WGPUPopErrorScopeCallbackInfo {
                    callback: Some(pending::pop_error_scope_callback),
                    userdata1: userdata,
                    ..Default::default()
                };
                unsafe { pop(raw, info) }
            },
        ))
    }

    /// Future resolving once the device is lost.
    ///
    /// Any number of futures may be requested, before or after the loss.
    pub fn lost(&self) -> Result<NativeFuture<DeviceLost>> {
        self.raw()?;
        Ok(self.events.subscribe())
    }

    /// The loss reason, if the device has been lost.
    pub fn lost_reason(&self) -> Option<DeviceLost> {
        self.events.get()
    }

    /// Drive the device's callbacks. With `wait`, block until submitted work
    /// completes. Returns whether the queue is empty.
    pub fn poll(&self, wait: bool) -> Result<bool> {
        let raw = self.raw()?;
        let poll = entry!(self.library().procs(), device_poll)?;
        Ok(unsafe { poll(raw, native_bool(wait), ptr::null()) } != WGPU_FALSE)
    }

    /// Destroy the device's GPU state. The handle still needs closing.
    pub fn destroy(&self) -> Result<()> {
        let raw = self.raw()?;
        let destroy = entry!(self.library().procs(), device_destroy)?;
        unsafe { destroy(raw) };
        Ok(())
    }
}
