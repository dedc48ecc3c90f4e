//! Handle types for opaque references to native WebGPU objects.
//!
//! Each handle type is a newtype wrapper around the native object pointer to
//! provide type safety. Equality is address equality.

use std::os::raw::c_void;

/// Macro to define a handle type.
macro_rules! define_handle {
    ($name:ident, $kind:literal) => {
        #[doc = concat!("Opaque handle to a native ", $kind, " object.")]
        #[repr(transparent)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name {
            _h: *mut c_void,
        }

        impl $name {
            /// Human readable object kind, used in errors and logs.
            pub const KIND: &'static str = $kind;

            /// Create a null handle ("no object").
            #[inline]
            pub const fn null() -> Self {
                Self {
                    _h: std::ptr::null_mut(),
                }
            }

            /// Wrap a raw native pointer.
            #[inline]
            pub const fn from_ptr(ptr: *mut c_void) -> Self {
                Self { _h: ptr }
            }

            /// The raw native pointer.
            #[inline]
            pub const fn as_ptr(&self) -> *mut c_void {
                self._h
            }

            /// Check if this handle is null.
            #[inline]
            pub fn is_null(&self) -> bool {
                self._h.is_null()
            }

            /// Address of the native object, for logging.
            #[inline]
            pub fn addr(&self) -> usize {
                self._h as usize
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::null()
            }
        }

        // Handles are plain addresses; thread-safety of the object behind
        // them is the native library's contract.
        unsafe impl Send for $name {}
        unsafe impl Sync for $name {}
    };
}

define_handle!(WGPUInstance, "instance");
define_handle!(WGPUAdapter, "adapter");
define_handle!(WGPUDevice, "device");
define_handle!(WGPUQueue, "queue");
define_handle!(WGPUBuffer, "buffer");
define_handle!(WGPUTexture, "texture");
define_handle!(WGPUTextureView, "texture view");
define_handle!(WGPUSampler, "sampler");
define_handle!(WGPUShaderModule, "shader module");
define_handle!(WGPUBindGroupLayout, "bind group layout");
define_handle!(WGPUBindGroup, "bind group");
define_handle!(WGPUPipelineLayout, "pipeline layout");
define_handle!(WGPUComputePipeline, "compute pipeline");
define_handle!(WGPURenderPipeline, "render pipeline");
define_handle!(WGPUCommandEncoder, "command encoder");
define_handle!(WGPUComputePassEncoder, "compute pass encoder");
define_handle!(WGPURenderPassEncoder, "render pass encoder");
define_handle!(WGPURenderBundleEncoder, "render bundle encoder");
define_handle!(WGPURenderBundle, "render bundle");
define_handle!(WGPUCommandBuffer, "command buffer");
define_handle!(WGPUSurface, "surface");
define_handle!(WGPUQuerySet, "query set");
