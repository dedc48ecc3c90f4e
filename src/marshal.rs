//! Descriptor marshalling into native struct layouts.
//!
//! Every descriptor implements [`Marshal`], copying its fields into the
//! `#[repr(C)]` struct `webgpu.h` expects. All memory the native struct points
//! to (strings, arrays, extension structs) is carved from the [`Region`]
//! passed in, so it lives exactly as long as that region.

use std::ptr;

use crate::descriptor::{DeviceExtras, InstanceExtras};
use crate::error::{Error, Result};
use crate::ffi::{self, WGPUBool, WGPUChainedStruct, WGPUEnum};
use crate::region::Region;

/// Conversion of a descriptor into its native layout.
pub trait Marshal {
    /// Native struct produced by this descriptor.
    type Native: Copy;

    /// Build the native struct by value. Pointed-to data is allocated in
    /// `region`.
    fn to_native(&self, region: &Region) -> Result<Self::Native>;

    /// Build the native struct and place it in `region`.
    fn marshal<'r>(&self, region: &'r Region) -> Result<&'r Self::Native> {
        let native = self.to_native(region)?;
        Ok(region.alloc(native))
    }
}

/// Marshal a slice of descriptors into one contiguous native array.
pub fn marshal_slice<M: Marshal>(items: &[M], region: &Region) -> Result<(*const M::Native, usize)> {
    region.array(items.len(), |i| items[i].to_native(region))
}

pub(crate) fn native_bool(value: bool) -> WGPUBool {
    if value {
        ffi::WGPU_TRUE
    } else {
        ffi::WGPU_FALSE
    }
}

/// An extension struct appended to a descriptor through `nextInChain`.
#[derive(Debug, Clone)]
pub enum Extension<'a> {
    /// wgpu-native instance options.
    InstanceExtras(InstanceExtras<'a>),
    /// wgpu-native device options.
    DeviceExtras(DeviceExtras<'a>),
    /// WGSL shader source.
    ShaderSourceWgsl(&'a str),
    /// SPIR-V shader source, in 32-bit words.
    ShaderSourceSpirv(&'a [u32]),
}

impl Extension<'_> {
    /// Native `sType` tag of this extension.
    pub fn s_type(&self) -> WGPUEnum {
        match self {
            Extension::InstanceExtras(_) => ffi::WGPUSType_InstanceExtras,
            Extension::DeviceExtras(_) => ffi::WGPUSType_DeviceExtras,
            Extension::ShaderSourceWgsl(_) => ffi::WGPUSType_ShaderSourceWGSL,
            Extension::ShaderSourceSpirv(_) => ffi::WGPUSType_ShaderSourceSPIRV,
        }
    }

    /// Allocate this extension with `next` as its successor and return a
    /// pointer to its chain header.
    fn link(&self, next: *const WGPUChainedStruct, region: &Region) -> Result<*const WGPUChainedStruct> {
        let chain = WGPUChainedStruct {
            next,
            sType: self.s_type(),
        };
        let header: *const WGPUChainedStruct = match self {
            Extension::InstanceExtras(extras) => {
                let native = region.alloc(ffi::WGPUInstanceExtras {
                    chain,
                    backends: extras.backends.bits(),
                    flags: extras.flags.bits(),
                    dx12ShaderCompiler: extras.dx12_shader_compiler.to_native(),
                    gles3MinorVersion: extras.gles3_minor_version.to_native(),
                    glFenceBehaviour: 0,
                    dxilPath: region.opt_str_view(extras.dxil_path),
                    dxcPath: region.opt_str_view(extras.dxc_path),
                    dxcMaxShaderModel: 0,
                });
                &native.chain
            }
            Extension::DeviceExtras(extras) => {
                let native = region.alloc(ffi::WGPUDeviceExtras {
                    chain,
                    tracePath: region.opt_str_view(extras.trace_path),
                });
                &native.chain
            }
            Extension::ShaderSourceWgsl(code) => {
                if code.is_empty() {
                    return Err(Error::InvalidArgument("empty WGSL source".into()));
                }
                let native = region.alloc(ffi::WGPUShaderSourceWGSL {
                    chain,
                    code: region.str_view(code),
                });
                &native.chain
            }
            Extension::ShaderSourceSpirv(words) => {
                if words.is_empty() {
                    return Err(Error::InvalidArgument("empty SPIR-V source".into()));
                }
                let code_size = u32::try_from(words.len())
                    .map_err(|_| Error::InvalidArgument("SPIR-V source too large".into()))?;
                let (code, _) = region.slice(words);
                let native = region.alloc(ffi::WGPUShaderSourceSPIRV {
                    chain,
                    codeSize: code_size,
                    code,
                });
                &native.chain
            }
        };
        Ok(header)
    }
}

/// Build a null-terminated extension chain preserving the order of
/// `extensions`. An empty list yields a null pointer.
pub fn chain(extensions: &[Extension<'_>], region: &Region) -> Result<*const WGPUChainedStruct> {
    let mut next = ptr::null();
    for extension in extensions.iter().rev() {
        next = extension.link(next, region)?;
    }
    Ok(next)
}

/// Collect the `sType` tags of a native chain, head first.
///
/// # Safety
///
/// `head` must be null or point to a valid, acyclic chain.
pub unsafe fn chain_types(mut head: *const WGPUChainedStruct) -> Vec<WGPUEnum> {
    let mut types = Vec::new();
    while !head.is_null() {
        types.push((*head).sType);
        head = (*head).next;
    }
    types
}
