//! Instance, adapter and device descriptors.

use std::ptr;

use crate::error::Result;
use crate::ffi::*;
use crate::marshal::{self, native_bool, Extension, Marshal};
use crate::region::Region;
use crate::types::{
    BackendType, Dx12Compiler, ErrorHandler, FeatureLevel, FeatureName, Gles3MinorVersion,
    InstanceBackend, InstanceFlag, PowerPreference,
};

/// wgpu-native instance options.
#[derive(Debug, Clone, Default)]
pub struct InstanceExtras<'a> {
    /// Backends to enumerate; empty means all.
    pub backends: InstanceBackend,
    /// Debugging and validation switches.
    pub flags: InstanceFlag,
    /// Shader compiler used by the DX12 backend.
    pub dx12_shader_compiler: Dx12Compiler,
    pub gles3_minor_version: Gles3MinorVersion,
    /// Path to `dxil.dll` for the DXC compiler.
    pub dxil_path: Option<&'a str>,
    /// Path to `dxcompiler.dll` for the DXC compiler.
    pub dxc_path: Option<&'a str>,
}

/// Options for creating an [`Instance`](crate::Instance).
#[derive(Debug, Clone, Default)]
pub struct InstanceDescriptor<'a> {
    /// Enable timed waits on futures.
    pub timed_wait_any: bool,
    /// Most futures one timed wait may watch.
    pub timed_wait_any_max_count: usize,
    /// Chained wgpu-native options.
    pub extras: Option<InstanceExtras<'a>>,
}

impl Marshal for InstanceDescriptor<'_> {
    type Native = WGPUInstanceDescriptor;

    fn to_native(&self, region: &Region) -> Result<Self::Native> {
        let extensions: Vec<Extension<'_>> = self
            .extras
            .iter()
            .cloned()
            .map(Extension::InstanceExtras)
            .collect();
        Ok(WGPUInstanceDescriptor {
            nextInChain: marshal::chain(&extensions, region)?,
            features: WGPUInstanceCapabilities {
                nextInChain: ptr::null_mut(),
                timedWaitAnyEnable: native_bool(self.timed_wait_any),
                timedWaitAnyMaxCount: self.timed_wait_any_max_count,
            },
        })
    }
}

/// Adapter selection criteria.
#[derive(Debug, Clone, Default)]
pub struct RequestAdapterOptions {
    /// Core or compatibility feature level.
    pub feature_level: FeatureLevel,
    /// Prefer a low-power or a high-performance adapter.
    pub power_preference: PowerPreference,
    /// Only return a software adapter.
    pub force_fallback_adapter: bool,
    /// Restrict to one backend; `Undefined` means any.
    pub backend_type: BackendType,
}

impl Marshal for RequestAdapterOptions {
    type Native = WGPURequestAdapterOptions;

    fn to_native(&self, _region: &Region) -> Result<Self::Native> {
        Ok(WGPURequestAdapterOptions {
            nextInChain: ptr::null(),
            featureLevel: self.feature_level.to_native(),
            powerPreference: self.power_preference.to_native(),
            forceFallbackAdapter: native_bool(self.force_fallback_adapter),
            backendType: self.backend_type.to_native(),
            compatibleSurface: WGPUSurface::null(),
        })
    }
}

/// wgpu-native device options.
#[derive(Debug, Clone, Default)]
pub struct DeviceExtras<'a> {
    /// Directory to write an API trace to.
    pub trace_path: Option<&'a str>,
}

/// Describes the device's default queue.
#[derive(Debug, Clone, Default)]
pub struct QueueDescriptor<'a> {
    /// Debug label.
    pub label: Option<&'a str>,
}

impl Marshal for QueueDescriptor<'_> {
    type Native = WGPUQueueDescriptor;

    fn to_native(&self, region: &Region) -> Result<Self::Native> {
        Ok(WGPUQueueDescriptor {
            nextInChain: ptr::null(),
            label: region.opt_str_view(self.label),
        })
    }
}

/// Options for requesting a [`Device`](crate::Device).
///
/// The device-lost callback is always installed; observe it through
/// [`Device::lost`](crate::Device::lost). Errors no error scope captures go to
/// `on_uncaptured_error`, or to `log::error!` when it is `None`.
#[derive(Clone, Default)]
pub struct DeviceDescriptor<'a> {
    /// Debug label.
    pub label: Option<&'a str>,
    /// Features the adapter must provide. The request fails otherwise.
    pub required_features: &'a [FeatureName],
    /// Options for the queue returned by [`Device::queue`](crate::Device::queue).
    pub default_queue: QueueDescriptor<'a>,
    /// Chained wgpu-native options.
    pub extras: Option<DeviceExtras<'a>>,
    /// Receives errors that no error scope captures.
    pub on_uncaptured_error: Option<ErrorHandler>,
}

impl Marshal for DeviceDescriptor<'_> {
    type Native = WGPUDeviceDescriptor;

    /// Callback infos are left empty; the device request fills them in.
    fn to_native(&self, region: &Region) -> Result<Self::Native> {
        let extensions: Vec<Extension<'_>> = self
            .extras
            .iter()
            .cloned()
            .map(Extension::DeviceExtras)
            .collect();
        let features = self.required_features;
        let (required_features, feature_count) = region.array(features.len(), |i| Ok(features[i].to_native()))?;

        Ok(WGPUDeviceDescriptor {
            nextInChain: marshal::chain(&extensions, region)?,
            label: region.opt_str_view(self.label),
            requiredFeatureCount: feature_count,
            requiredFeatures: required_features,
            requiredLimits: ptr::null(),
            defaultQueue: self.default_queue.to_native(region)?,
            deviceLostCallbackInfo: WGPUDeviceLostCallbackInfo::default(),
            uncapturedErrorCallbackInfo: WGPUUncapturedErrorCallbackInfo::default(),
        })
    }
}

impl std::fmt::Debug for DeviceDescriptor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceDescriptor")
            .field("label", &self.label)
            .field("required_features", &self.required_features)
            .field("default_queue", &self.default_queue)
            .field("extras", &self.extras)
            .field("on_uncaptured_error", &self.on_uncaptured_error.is_some())
            .finish()
    }
}
