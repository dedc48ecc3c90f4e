//! Command submission.

use crate::buffer::Buffer;
use crate::command::CommandBuffer;
use crate::descriptor::{native_extent, TexelCopyBufferLayout, TexelCopyTextureInfo};
use crate::error::Result;
use crate::ffi::*;
use crate::marshal::Marshal;
use crate::pending::{self, NativeFuture};
use crate::region::Region;
use crate::resource::define_resource;
use crate::types::Extent3d;

define_resource!(
    /// A device's submission queue.
    Queue,
    WGPUQueue
);

impl Queue {
    /// Submit command buffers for execution, in order.
    ///
    /// Every buffer is checked before anything is submitted. An empty list
    /// is a no-op.
    pub fn submit(&self, command_buffers: &[&CommandBuffer]) -> Result<()> {
        let raw = self.raw()?;
        let submit = entry!(self.library().procs(), queue_submit)?;

        let region = Region::call();
        let (commands, count) = region.array(command_buffers.len(), |i| {
            command_buffers[i].raw().inspect_err(|_| {
                log::debug!("command buffer {} of {} is closed", i, command_buffers.len());
            })
        })?;
        if count == 0 {
            return Ok(());
        }

        unsafe { submit(raw, count, commands) };
        log::trace!("submitted {} command buffers", count);
        Ok(())
    }

    /// Schedule a write of `data` into `buffer` at `offset`.
    pub fn write_buffer(&self, buffer: &Buffer, offset: u64, data: &[u8]) -> Result<()> {
        let raw = self.raw()?;
        let target = buffer.raw()?;
        let write = entry!(self.library().procs(), queue_write_buffer)?;
        unsafe { write(raw, target, offset, data.as_ptr().cast(), data.len()) };
        Ok(())
    }

    /// Schedule a write of `data`, laid out as `data_layout` describes, into
    /// a `size` region of a texture.
    pub fn write_texture(
        &self,
        destination: &TexelCopyTextureInfo<'_>,
        data: &[u8],
        data_layout: TexelCopyBufferLayout,
        size: Extent3d,
    ) -> Result<()> {
        let raw = self.raw()?;
        let write = entry!(self.library().procs(), queue_write_texture)?;

        let region = Region::call();
        let dst = destination.marshal(&region)?;
        let layout = data_layout.to_native();
        let extent = native_extent(size);
        unsafe { write(raw, dst, data.as_ptr().cast(), data.len(), &layout, &extent) };
        Ok(())
    }

    /// Future resolving once all work submitted so far has completed.
    pub fn on_submitted_work_done(&self) -> Result<NativeFuture<()>> {
        let raw = self.raw()?;
        let work_done = entry!(self.library().procs(), queue_on_submitted_work_done)?;

        Ok(pending::begin(
            pending::WORK_DONE,
            Region::operation(),
            None,
            (),
            |userdata| {
                let info = WGPUQueueWorkDoneCallbackInfo {
                    callback: Some(pending::work_done_callback),
                    userdata1: userdata,
                    ..Default::default()
                };
                unsafe { work_done(raw, info) }
            },
        ))
    }
}
