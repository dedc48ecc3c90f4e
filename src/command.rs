//! Command recording.

use std::ptr;

use crate::buffer::Buffer;
use crate::descriptor::{
    native_extent, CommandBufferDescriptor, ComputePassDescriptor, RenderPassDescriptor, TexelCopyBufferInfo,
    TexelCopyTextureInfo,
};
use crate::error::Result;
use crate::ffi::{self, *};
use crate::marshal::Marshal;
use crate::pipeline::{BindGroup, ComputePipeline};
use crate::query::QuerySet;
use crate::region::Region;
use crate::render::RenderPassEncoder;
use crate::resource::define_resource;
use crate::types::Extent3d;

define_resource!(
    /// Records commands into a [`CommandBuffer`].
    CommandEncoder,
    WGPUCommandEncoder
);

define_resource!(
    /// Records one compute pass. Call [`ComputePassEncoder::end`] before
    /// finishing the parent encoder.
    ComputePassEncoder,
    WGPUComputePassEncoder
);

define_resource!(
    /// Recorded commands, ready for [`Queue::submit`](crate::Queue::submit).
    CommandBuffer,
    WGPUCommandBuffer
);

impl CommandEncoder {
    /// Begin a compute pass (default options for `None`).
    pub fn begin_compute_pass(&mut self, desc: Option<&ComputePassDescriptor<'_>>) -> Result<ComputePassEncoder> {
        let raw = self.raw()?;
        let begin = entry!(self.library().procs(), command_encoder_begin_compute_pass)?;

        let region = Region::call();
        let native: *const WGPUComputePassDescriptor = match desc {
            Some(desc) => desc.marshal(&region)?,
            None => ptr::null(),
        };
        let pass = unsafe { begin(raw, native) };
        region.close();

        let pass = ffi::check_handle(
            "wgpuCommandEncoderBeginComputePass",
            pass,
            WGPUComputePassEncoder::is_null,
        )?;
        unsafe { ComputePassEncoder::from_raw(self.library().clone(), pass) }
    }

    /// Begin a render pass into the descriptor's attachments.
    pub fn begin_render_pass(&mut self, desc: &RenderPassDescriptor<'_>) -> Result<RenderPassEncoder> {
        let raw = self.raw()?;
        let begin = entry!(self.library().procs(), command_encoder_begin_render_pass)?;

        let region = Region::call();
        let native = desc.marshal(&region)?;
        let pass = unsafe { begin(raw, native) };
        region.close();

        let pass = ffi::check_handle(
            "wgpuCommandEncoderBeginRenderPass",
            pass,
            WGPURenderPassEncoder::is_null,
        )?;
        unsafe { RenderPassEncoder::from_raw(self.library().clone(), pass) }
    }

    /// Copy `size` bytes between buffers.
    pub fn copy_buffer_to_buffer(
        &mut self,
        source: &Buffer,
        source_offset: u64,
        destination: &Buffer,
        destination_offset: u64,
        size: u64,
    ) -> Result<()> {
        let raw = self.raw()?;
        let src = source.raw()?;
        let dst = destination.raw()?;
        let copy = entry!(self.library().procs(), command_encoder_copy_buffer_to_buffer)?;
        unsafe { copy(raw, src, source_offset, dst, destination_offset, size) };
        Ok(())
    }

    /// Zero `size` bytes of `buffer` at `offset` (`None` clears to the end).
    pub fn clear_buffer(&mut self, buffer: &Buffer, offset: u64, size: Option<u64>) -> Result<()> {
        let raw = self.raw()?;
        let target = buffer.raw()?;
        let clear = entry!(self.library().procs(), command_encoder_clear_buffer)?;
        unsafe { clear(raw, target, offset, size.unwrap_or(WGPU_WHOLE_SIZE)) };
        Ok(())
    }

    /// Copy texels from a buffer into a texture.
    pub fn copy_buffer_to_texture(
        &mut self,
        source: &TexelCopyBufferInfo<'_>,
        destination: &TexelCopyTextureInfo<'_>,
        copy_size: Extent3d,
    ) -> Result<()> {
        let raw = self.raw()?;
        let copy = entry!(self.library().procs(), command_encoder_copy_buffer_to_texture)?;

        let region = Region::call();
        let src = source.marshal(&region)?;
        let dst = destination.marshal(&region)?;
        let size = native_extent(copy_size);
        unsafe { copy(raw, src, dst, &size) };
        Ok(())
    }

    /// Copy texels from a texture into a buffer.
    pub fn copy_texture_to_buffer(
        &mut self,
        source: &TexelCopyTextureInfo<'_>,
        destination: &TexelCopyBufferInfo<'_>,
        copy_size: Extent3d,
    ) -> Result<()> {
        let raw = self.raw()?;
        let copy = entry!(self.library().procs(), command_encoder_copy_texture_to_buffer)?;

        let region = Region::call();
        let src = source.marshal(&region)?;
        let dst = destination.marshal(&region)?;
        let size = native_extent(copy_size);
        unsafe { copy(raw, src, dst, &size) };
        Ok(())
    }

    /// Copy texels between textures of compatible formats.
    pub fn copy_texture_to_texture(
        &mut self,
        source: &TexelCopyTextureInfo<'_>,
        destination: &TexelCopyTextureInfo<'_>,
        copy_size: Extent3d,
    ) -> Result<()> {
        let raw = self.raw()?;
        let copy = entry!(self.library().procs(), command_encoder_copy_texture_to_texture)?;

        let region = Region::call();
        let src = source.marshal(&region)?;
        let dst = destination.marshal(&region)?;
        let size = native_extent(copy_size);
        unsafe { copy(raw, src, dst, &size) };
        Ok(())
    }

    /// Write the results of queries `first_query..first_query + query_count`
    /// into `destination` at `destination_offset`, 8 bytes per query.
    pub fn resolve_query_set(
        &mut self,
        query_set: &QuerySet,
        first_query: u32,
        query_count: u32,
        destination: &Buffer,
        destination_offset: u64,
    ) -> Result<()> {
        let raw = self.raw()?;
        let query_set = query_set.raw()?;
        let dst = destination.raw()?;
        let resolve = entry!(self.library().procs(), command_encoder_resolve_query_set)?;
        unsafe { resolve(raw, query_set, first_query, query_count, dst, destination_offset) };
        Ok(())
    }

    /// Finish recording. The encoder cannot record afterwards.
    pub fn finish(&mut self, desc: Option<&CommandBufferDescriptor<'_>>) -> Result<CommandBuffer> {
        let raw = self.raw()?;
        let finish = entry!(self.library().procs(), command_encoder_finish)?;

        let region = Region::call();
        let native: *const WGPUCommandBufferDescriptor = match desc {
            Some(desc) => desc.marshal(&region)?,
            None => ptr::null(),
        };
        let buffer = unsafe { finish(raw, native) };
        region.close();

        let buffer = ffi::check_handle("wgpuCommandEncoderFinish", buffer, WGPUCommandBuffer::is_null)?;
        unsafe { CommandBuffer::from_raw(self.library().clone(), buffer) }
    }
}

impl ComputePassEncoder {
    /// Use `pipeline` for subsequent dispatches.
    pub fn set_pipeline(&mut self, pipeline: &ComputePipeline) -> Result<()> {
        let raw = self.raw()?;
        let pipeline = pipeline.raw()?;
        let set_pipeline = entry!(self.library().procs(), compute_pass_set_pipeline)?;
        unsafe { set_pipeline(raw, pipeline) };
        Ok(())
    }

    /// Bind `group` at `index`, with one offset per dynamic binding.
    pub fn set_bind_group(&mut self, index: u32, group: &BindGroup, dynamic_offsets: &[u32]) -> Result<()> {
        let raw = self.raw()?;
        let group = group.raw()?;
        let set_bind_group = entry!(self.library().procs(), compute_pass_set_bind_group)?;

        let region = Region::call();
        let (offsets, count) = region.slice(dynamic_offsets);
        unsafe { set_bind_group(raw, index, group, count, offsets) };
        Ok(())
    }

    /// Run an `x` by `y` by `z` grid of workgroups.
    pub fn dispatch_workgroups(&mut self, x: u32, y: u32, z: u32) -> Result<()> {
        let raw = self.raw()?;
        let dispatch = entry!(self.library().procs(), compute_pass_dispatch_workgroups)?;
        unsafe { dispatch(raw, x, y, z) };
        Ok(())
    }

    /// End the pass. The handle still needs closing.
    pub fn end(&mut self) -> Result<()> {
        let raw = self.raw()?;
        let end = entry!(self.library().procs(), compute_pass_end)?;
        unsafe { end(raw) };
        Ok(())
    }
}
