//! Ownership of native handles.
//!
//! [`Owned`] is the base every public resource wrapper is built on: it owns
//! exactly one native handle, the [`Library`] the handle came from and,
//! optionally, a resource-scoped [`Region`] the handle depends on.
//!
//! A resource is open until [`Owned::close`] runs; the transition to closed
//! happens at most once and releases the handle exactly once. Dropping an open
//! resource closes it as a safety net and logs, since it usually means the
//! caller forgot to close it.

use std::fmt;

use crate::error::{Error, Result};
use crate::ffi::*;
use crate::library::Library;
use crate::region::{Region, Scope};

/// A native handle type together with its release entry point.
pub trait NativeHandle: Copy + fmt::Debug + Send + Sync + 'static {
    /// Human readable object kind.
    const KIND: &'static str;

    /// Check if this is the null handle.
    fn is_null(&self) -> bool;

    /// Object address, for logging.
    fn addr(&self) -> usize;

    /// Drop the caller's reference to the native object.
    ///
    /// # Safety
    ///
    /// The handle must be live and owned by the caller; it must not be used
    /// afterwards.
    unsafe fn release(self, procs: &NativeProcs) -> Result<()>;
}

macro_rules! native_handle {
    ($( $handle:ident => $release:ident; )*) => {
        $(
            impl NativeHandle for $handle {
                const KIND: &'static str = $handle::KIND;

                fn is_null(&self) -> bool {
                    $handle::is_null(self)
                }

                fn addr(&self) -> usize {
                    $handle::addr(self)
                }

                unsafe fn release(self, procs: &NativeProcs) -> Result<()> {
                    let release = entry!(procs, $release)?;
                    release(self);
                    Ok(())
                }
            }
        )*
    };
}

native_handle! {
    WGPUInstance => instance_release;
    WGPUAdapter => adapter_release;
    WGPUDevice => device_release;
    WGPUQueue => queue_release;
    WGPUBuffer => buffer_release;
    WGPUTexture => texture_release;
    WGPUTextureView => texture_view_release;
    WGPUSampler => sampler_release;
    WGPUShaderModule => shader_module_release;
    WGPUBindGroupLayout => bind_group_layout_release;
    WGPUBindGroup => bind_group_release;
    WGPUPipelineLayout => pipeline_layout_release;
    WGPUComputePipeline => compute_pipeline_release;
    WGPURenderPipeline => render_pipeline_release;
    WGPUQuerySet => query_set_release;
    WGPUCommandEncoder => command_encoder_release;
    WGPUComputePassEncoder => compute_pass_release;
    WGPURenderPassEncoder => render_pass_release;
    WGPURenderBundleEncoder => render_bundle_encoder_release;
    WGPURenderBundle => render_bundle_release;
    WGPUCommandBuffer => command_buffer_release;
}

/// Exclusive owner of one native handle.
pub struct Owned<H: NativeHandle> {
    raw: Option<H>,
    library: Library,
    region: Option<Region>,
}

impl<H: NativeHandle> Owned<H> {
    /// Take ownership of `raw`.
    ///
    /// Fails with [`Error::NullHandle`] for the null handle; nothing is
    /// released in that case.
    pub fn new(library: Library, raw: H) -> Result<Self> {
        if raw.is_null() {
            return Err(Error::NullHandle(H::KIND));
        }
        log::debug!("{} {:#x} opened", H::KIND, raw.addr());
        Ok(Self {
            raw: Some(raw),
            library,
            region: None,
        })
    }

    /// Take ownership of `raw` together with the resource-scoped region it
    /// depends on.
    pub fn with_region(library: Library, raw: H, region: Region) -> Result<Self> {
        if region.scope() != Scope::Resource {
            return Err(Error::InvalidArgument(format!(
                "{} cannot own a {:?} region",
                H::KIND,
                region.scope()
            )));
        }
        let mut owned = Self::new(library, raw)?;
        owned.region = Some(region);
        Ok(owned)
    }

    /// The native handle, or [`Error::ResourceClosed`].
    pub fn raw(&self) -> Result<H> {
        self.raw.ok_or(Error::ResourceClosed(H::KIND))
    }

    /// Check if this resource has been closed.
    pub fn is_closed(&self) -> bool {
        self.raw.is_none()
    }

    /// Check if a resource-scoped region is attached.
    pub fn has_region(&self) -> bool {
        self.region.is_some()
    }

    /// The library this resource was created through.
    pub fn library(&self) -> &Library {
        &self.library
    }

    /// Release the native handle, then the attached region.
    ///
    /// Idempotent. A failed release is logged and the resource is still
    /// marked closed.
    pub fn close(&mut self) {
        let Some(raw) = self.raw.take() else {
            return;
        };
        self.release(raw);
        log::debug!("{} {:#x} closed", H::KIND, raw.addr());
    }

    fn release(&mut self, raw: H) {
        if let Err(e) = unsafe { raw.release(self.library.procs()) } {
            log::warn!("failed to release {} {:#x}: {}", H::KIND, raw.addr(), e);
        }
        if let Some(region) = self.region.take() {
            region.close();
        }
    }
}

impl<H: NativeHandle> Drop for Owned<H> {
    fn drop(&mut self) {
        let Some(raw) = self.raw.take() else {
            return;
        };
        if self.library.options().warn_on_implicit_release {
            log::warn!("{} {:#x} was never closed, releasing on drop", H::KIND, raw.addr());
        } else {
            log::debug!("{} {:#x} released on drop", H::KIND, raw.addr());
        }
        self.release(raw);
    }
}

impl<H: NativeHandle> fmt::Debug for Owned<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Owned")
            .field("kind", &H::KIND)
            .field("raw", &self.raw.map(|raw| raw.addr()))
            .field("has_region", &self.region.is_some())
            .finish()
    }
}

// The region is only reached through `&mut self` (close) or by value (drop),
// so sharing `&Owned` across threads never touches it.
unsafe impl<H: NativeHandle> Sync for Owned<H> {}

/// Implement the common resource surface for a wrapper with an
/// `inner: Owned<H>` field.
macro_rules! impl_resource {
    ($name:ident, $handle:ty) => {
        impl $name {
            /// The native handle, or [`Error::ResourceClosed`](crate::Error::ResourceClosed).
            pub fn raw(&self) -> $crate::error::Result<$handle> {
                self.inner.raw()
            }

            /// Check if this resource has been closed.
            pub fn is_closed(&self) -> bool {
                self.inner.is_closed()
            }

            /// Release the native object. Later calls are no-ops.
            pub fn close(&mut self) {
                self.inner.close()
            }

            /// The library this resource was created through.
            pub fn library(&self) -> &$crate::library::Library {
                self.inner.library()
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("raw", &self.inner.raw().ok())
                    .finish()
            }
        }
    };
}

/// Define a wrapper that holds nothing but its [`Owned`] handle.
macro_rules! define_resource {
    ($(#[$meta:meta])* $name:ident, $handle:ty) => {
        $(#[$meta])*
        pub struct $name {
            inner: $crate::resource::Owned<$handle>,
        }

        impl $name {
            /// Take ownership of a raw native handle.
            ///
            /// # Safety
            ///
            /// `raw` must be null or a live handle created through `library`
            /// whose reference is transferred to the wrapper.
            pub unsafe fn from_raw(library: $crate::library::Library, raw: $handle) -> $crate::error::Result<Self> {
                Ok(Self {
                    inner: $crate::resource::Owned::new(library, raw)?,
                })
            }
        }

        $crate::resource::impl_resource!($name, $handle);
    };
}

pub(crate) use define_resource;
pub(crate) use impl_resource;
