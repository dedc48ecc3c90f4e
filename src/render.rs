//! Render pass and render bundle recording.
//!
//! [`RenderPassEncoder`] and [`RenderBundleEncoder`] share the same draw
//! command set. A bundle records those commands once so that any number of
//! passes can replay them with [`RenderPassEncoder::execute_bundles`].

use std::ptr;

use crate::buffer::Buffer;
use crate::descriptor::RenderBundleDescriptor;
use crate::error::Result;
use crate::ffi::{self, *};
use crate::marshal::Marshal;
use crate::pipeline::{BindGroup, RenderPipeline};
use crate::region::Region;
use crate::resource::define_resource;
use crate::types::{Color, IndexFormat};

define_resource!(
    /// Records one render pass. Call [`RenderPassEncoder::end`] before
    /// finishing the parent encoder.
    RenderPassEncoder,
    WGPURenderPassEncoder
);

define_resource!(
    /// Records draw commands into a reusable [`RenderBundle`].
    RenderBundleEncoder,
    WGPURenderBundleEncoder
);

define_resource!(
    /// Prerecorded draw commands.
    RenderBundle,
    WGPURenderBundle
);

/// Implement the draw commands shared by render passes and bundles.
macro_rules! draw_commands {
    (
        $name:ident,
        $set_pipeline:ident,
        $set_bind_group:ident,
        $set_vertex_buffer:ident,
        $set_index_buffer:ident,
        $draw:ident,
        $draw_indexed:ident
    ) => {
        impl $name {
            /// Use `pipeline` for subsequent draws.
            pub fn set_pipeline(&mut self, pipeline: &RenderPipeline) -> Result<()> {
                let raw = self.raw()?;
                let pipeline = pipeline.raw()?;
                let set_pipeline = entry!(self.library().procs(), $set_pipeline)?;
                unsafe { set_pipeline(raw, pipeline) };
                Ok(())
            }

            /// Bind `group` at `index`, with one offset per dynamic binding.
            pub fn set_bind_group(&mut self, index: u32, group: &BindGroup, dynamic_offsets: &[u32]) -> Result<()> {
                let raw = self.raw()?;
                let group = group.raw()?;
                let set_bind_group = entry!(self.library().procs(), $set_bind_group)?;

                let region = Region::call();
                let (offsets, count) = region.slice(dynamic_offsets);
                unsafe { set_bind_group(raw, index, group, count, offsets) };
                Ok(())
            }

            /// Feed vertex buffer `slot` from `buffer` at `offset`. `None`
            /// uses the rest of the buffer.
            pub fn set_vertex_buffer(&mut self, slot: u32, buffer: &Buffer, offset: u64, size: Option<u64>) -> Result<()> {
                let raw = self.raw()?;
                let buffer = buffer.raw()?;
                let set_vertex_buffer = entry!(self.library().procs(), $set_vertex_buffer)?;
                unsafe { set_vertex_buffer(raw, slot, buffer, offset, size.unwrap_or(WGPU_WHOLE_SIZE)) };
                Ok(())
            }

            /// Read indices of `format` from `buffer` at `offset`. `None`
            /// uses the rest of the buffer.
            pub fn set_index_buffer(
                &mut self,
                buffer: &Buffer,
                format: IndexFormat,
                offset: u64,
                size: Option<u64>,
            ) -> Result<()> {
                let raw = self.raw()?;
                let buffer = buffer.raw()?;
                let set_index_buffer = entry!(self.library().procs(), $set_index_buffer)?;
                unsafe { set_index_buffer(raw, buffer, format.to_native(), offset, size.unwrap_or(WGPU_WHOLE_SIZE)) };
                Ok(())
            }

            /// Draw `vertex_count` vertices for each of `instance_count`
            /// instances.
            pub fn draw(
                &mut self,
                vertex_count: u32,
                instance_count: u32,
                first_vertex: u32,
                first_instance: u32,
            ) -> Result<()> {
                let raw = self.raw()?;
                let draw = entry!(self.library().procs(), $draw)?;
                unsafe { draw(raw, vertex_count, instance_count, first_vertex, first_instance) };
                Ok(())
            }

            /// Draw using the bound index buffer. `base_vertex` is added to
            /// every index.
            pub fn draw_indexed(
                &mut self,
                index_count: u32,
                instance_count: u32,
                first_index: u32,
                base_vertex: i32,
                first_instance: u32,
            ) -> Result<()> {
                let raw = self.raw()?;
                let draw_indexed = entry!(self.library().procs(), $draw_indexed)?;
                unsafe { draw_indexed(raw, index_count, instance_count, first_index, base_vertex, first_instance) };
                Ok(())
            }
        }
    };
}

draw_commands!(
    RenderPassEncoder,
    render_pass_set_pipeline,
    render_pass_set_bind_group,
    render_pass_set_vertex_buffer,
    render_pass_set_index_buffer,
    render_pass_draw,
    render_pass_draw_indexed
);

draw_commands!(
    RenderBundleEncoder,
    render_bundle_encoder_set_pipeline,
    render_bundle_encoder_set_bind_group,
    render_bundle_encoder_set_vertex_buffer,
    render_bundle_encoder_set_index_buffer,
    render_bundle_encoder_draw,
    render_bundle_encoder_draw_indexed
);

impl RenderPassEncoder {
    /// Map normalized device coordinates to this pixel rectangle and depth
    /// range.
    pub fn set_viewport(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        min_depth: f32,
        max_depth: f32,
    ) -> Result<()> {
        let raw = self.raw()?;
        let set_viewport = entry!(self.library().procs(), render_pass_set_viewport)?;
        unsafe { set_viewport(raw, x, y, width, height, min_depth, max_depth) };
        Ok(())
    }

    /// Discard fragments outside this pixel rectangle.
    pub fn set_scissor_rect(&mut self, x: u32, y: u32, width: u32, height: u32) -> Result<()> {
        let raw = self.raw()?;
        let set_scissor_rect = entry!(self.library().procs(), render_pass_set_scissor_rect)?;
        unsafe { set_scissor_rect(raw, x, y, width, height) };
        Ok(())
    }

    /// Color used by the `Constant` blend factors.
    pub fn set_blend_constant(&mut self, color: Color) -> Result<()> {
        let raw = self.raw()?;
        let set_blend_constant = entry!(self.library().procs(), render_pass_set_blend_constant)?;
        let native = WGPUColor {
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        };
        unsafe { set_blend_constant(raw, &native) };
        Ok(())
    }

    /// Value the stencil test compares against.
    pub fn set_stencil_reference(&mut self, reference: u32) -> Result<()> {
        let raw = self.raw()?;
        let set_stencil_reference = entry!(self.library().procs(), render_pass_set_stencil_reference)?;
        unsafe { set_stencil_reference(raw, reference) };
        Ok(())
    }

    /// Start counting samples into query `index` of the pass's occlusion
    /// query set.
    pub fn begin_occlusion_query(&mut self, index: u32) -> Result<()> {
        let raw = self.raw()?;
        let begin = entry!(self.library().procs(), render_pass_begin_occlusion_query)?;
        unsafe { begin(raw, index) };
        Ok(())
    }

    /// End the query started by [`RenderPassEncoder::begin_occlusion_query`].
    pub fn end_occlusion_query(&mut self) -> Result<()> {
        let raw = self.raw()?;
        let end = entry!(self.library().procs(), render_pass_end_occlusion_query)?;
        unsafe { end(raw) };
        Ok(())
    }

    /// Replay `bundles` in order.
    ///
    /// Every bundle is checked before anything is recorded.
    pub fn execute_bundles(&mut self, bundles: &[&RenderBundle]) -> Result<()> {
        let raw = self.raw()?;
        let execute = entry!(self.library().procs(), render_pass_execute_bundles)?;

        let region = Region::call();
        let (natives, count) = region.array(bundles.len(), |i| bundles[i].raw())?;
        unsafe { execute(raw, count, natives) };
        Ok(())
    }

    /// End the pass. The handle still needs closing.
    pub fn end(&mut self) -> Result<()> {
        let raw = self.raw()?;
        let end = entry!(self.library().procs(), render_pass_end)?;
        unsafe { end(raw) };
        Ok(())
    }
}

impl RenderBundleEncoder {
    /// Finish recording. The encoder cannot record afterwards.
    pub fn finish(&mut self, desc: Option<&RenderBundleDescriptor<'_>>) -> Result<RenderBundle> {
        let raw = self.raw()?;
        let finish = entry!(self.library().procs(), render_bundle_encoder_finish)?;

        let region = Region::call();
        let native: *const WGPURenderBundleDescriptor = match desc {
            Some(desc) => desc.marshal(&region)?,
            None => ptr::null(),
        };
        let bundle = unsafe { finish(raw, native) };
        region.close();

        let bundle = ffi::check_handle("wgpuRenderBundleEncoderFinish", bundle, WGPURenderBundle::is_null)?;
        unsafe { RenderBundle::from_raw(self.library().clone(), bundle) }
    }
}
