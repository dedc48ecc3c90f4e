//! GPU buffers and host mapping.

use std::slice;

use crate::error::{Error, Result};
use crate::ffi::*;
use crate::pending::{self, NativeFuture};
use crate::region::Region;
use crate::resource::define_resource;
use crate::types::{BufferMapState, BufferUsage, MapMode};

define_resource!(
    /// A block of GPU memory.
    ///
    /// Mapped ranges borrow the buffer, while [`Buffer::unmap`],
    /// [`Buffer::destroy`] and `close` take it mutably, so a mapped slice
    /// cannot outlive the mapping:
    ///
    /// ```compile_fail
    /// fn read_after_destroy(buffer: &mut wgpu_bind::Buffer) -> wgpu_bind::Result<u8> {
    ///     let view = buffer.mapped_range(0, 16)?;
    ///     buffer.destroy()?;
    ///     Ok(view[0])
    /// }
    /// ```
    Buffer,
    WGPUBuffer
);

impl Buffer {
    /// Size in bytes.
    pub fn size(&self) -> Result<u64> {
        let raw = self.raw()?;
        let get_size = entry!(self.library().procs(), buffer_get_size)?;
        Ok(unsafe { get_size(raw) })
    }

    /// Usage the buffer was created with.
    pub fn usage(&self) -> Result<BufferUsage> {
        let raw = self.raw()?;
        let get_usage = entry!(self.library().procs(), buffer_get_usage)?;
        Ok(BufferUsage::from_bits_retain(unsafe { get_usage(raw) }))
    }

    /// Current mapping state.
    pub fn map_state(&self) -> Result<BufferMapState> {
        let raw = self.raw()?;
        let get_state = entry!(self.library().procs(), buffer_get_map_state)?;
        BufferMapState::try_from(unsafe { get_state(raw) })
    }

    /// Map `size` bytes at `offset` for host access (`None` maps to the end).
    pub fn map_async(&self, mode: MapMode, offset: usize, size: Option<usize>) -> Result<NativeFuture<()>> {
        let raw = self.raw()?;
        if mode.is_empty() {
            return Err(Error::InvalidArgument("map mode must not be empty".into()));
        }
        let map = entry!(self.library().procs(), buffer_map_async)?;
        let size = size.unwrap_or(WGPU_WHOLE_MAP_SIZE);

        Ok(pending::begin(
            pending::BUFFER_MAP,
            Region::operation(),
            None,
            (),
            |userdata| {
                let info = WGPUBufferMapCallbackInfo {
                    callback: Some(pending::buffer_map_callback),
                    userdata1: userdata,
                    ..Default::default()
                };
                unsafe { map(raw, mode.bits(), offset, size, info) }
            },
        ))
    }

    /// Read access to a mapped range.
    pub fn mapped_range(&self, offset: usize, size: usize) -> Result<&[u8]> {
        let raw = self.raw()?;
        let get_range = entry!(self.library().procs(), buffer_get_const_mapped_range)?;
        let data = unsafe { get_range(raw, offset, size) };
        if data.is_null() {
            return Err(Error::NullResult {
                op: "wgpuBufferGetConstMappedRange",
            });
        }
        Ok(unsafe { slice::from_raw_parts(data.cast::<u8>(), size) })
    }

    /// Write access to a range mapped for writing.
    pub fn mapped_range_mut(&mut self, offset: usize, size: usize) -> Result<&mut [u8]> {
        let raw = self.raw()?;
        let get_range = entry!(self.library().procs(), buffer_get_mapped_range)?;
        let data = unsafe { get_range(raw, offset, size) };
        if data.is_null() {
            return Err(Error::NullResult {
                op: "wgpuBufferGetMappedRange",
            });
        }
        Ok(unsafe { slice::from_raw_parts_mut(data.cast::<u8>(), size) })
    }

    /// End host access. Invalidates mapped ranges.
    pub fn unmap(&mut self) -> Result<()> {
        let raw = self.raw()?;
        let unmap = entry!(self.library().procs(), buffer_unmap)?;
        unsafe { unmap(raw) };
        Ok(())
    }

    /// Free the buffer's GPU memory, unmapping it. The handle still needs
    /// closing.
    pub fn destroy(&mut self) -> Result<()> {
        let raw = self.raw()?;
        let destroy = entry!(self.library().procs(), buffer_destroy)?;
        unsafe { destroy(raw) };
        Ok(())
    }
}
