//! Raw C types for the wgpu-native API.
//!
//! This module mirrors the structs, enums and callback signatures of
//! `webgpu.h` and `wgpu.h`. Field order, size and alignment must match the
//! native ABI exactly. Users should prefer the safe Rust wrappers in the
//! parent modules.

#![allow(non_camel_case_types, non_snake_case)]

use std::os::raw::{c_char, c_void};
use std::ptr;

use super::handles::*;

/// Native boolean (`uint32_t`).
pub type WGPUBool = u32;
/// Native flag word (`uint64_t`).
pub type WGPUFlags = u64;
/// Native enum word.
pub type WGPUEnum = u32;

pub const WGPU_TRUE: WGPUBool = 1;
pub const WGPU_FALSE: WGPUBool = 0;

// Sentinels for "unset" values.
pub const WGPU_STRLEN: usize = usize::MAX;
pub const WGPU_WHOLE_SIZE: u64 = u64::MAX;
pub const WGPU_WHOLE_MAP_SIZE: usize = usize::MAX;
pub const WGPU_MIP_LEVEL_COUNT_UNDEFINED: u32 = u32::MAX;
pub const WGPU_ARRAY_LAYER_COUNT_UNDEFINED: u32 = u32::MAX;
pub const WGPU_DEPTH_SLICE_UNDEFINED: u32 = u32::MAX;
pub const WGPU_COPY_STRIDE_UNDEFINED: u32 = u32::MAX;

// WGPUSType
pub const WGPUSType_ShaderSourceSPIRV: WGPUEnum = 0x0000_0001;
pub const WGPUSType_ShaderSourceWGSL: WGPUEnum = 0x0000_0002;
pub const WGPUSType_DeviceExtras: WGPUEnum = 0x0003_0001;
pub const WGPUSType_InstanceExtras: WGPUEnum = 0x0003_0006;

// WGPUCallbackMode
pub const WGPUCallbackMode_WaitAnyOnly: WGPUEnum = 0x0000_0001;
pub const WGPUCallbackMode_AllowProcessEvents: WGPUEnum = 0x0000_0002;
pub const WGPUCallbackMode_AllowSpontaneous: WGPUEnum = 0x0000_0003;

// WGPUStatus
pub const WGPUStatus_Success: WGPUEnum = 0x0000_0001;
pub const WGPUStatus_Error: WGPUEnum = 0x0000_0002;

// WGPURequestAdapterStatus
pub const WGPURequestAdapterStatus_Success: WGPUEnum = 0x0000_0001;
pub const WGPURequestAdapterStatus_InstanceDropped: WGPUEnum = 0x0000_0002;
pub const WGPURequestAdapterStatus_Unavailable: WGPUEnum = 0x0000_0003;
pub const WGPURequestAdapterStatus_Error: WGPUEnum = 0x0000_0004;

// WGPURequestDeviceStatus
pub const WGPURequestDeviceStatus_Success: WGPUEnum = 0x0000_0001;
pub const WGPURequestDeviceStatus_InstanceDropped: WGPUEnum = 0x0000_0002;
pub const WGPURequestDeviceStatus_Error: WGPUEnum = 0x0000_0003;

// WGPUMapAsyncStatus
pub const WGPUMapAsyncStatus_Success: WGPUEnum = 0x0000_0001;
pub const WGPUMapAsyncStatus_InstanceDropped: WGPUEnum = 0x0000_0002;
pub const WGPUMapAsyncStatus_Error: WGPUEnum = 0x0000_0003;
pub const WGPUMapAsyncStatus_Aborted: WGPUEnum = 0x0000_0004;

// WGPUQueueWorkDoneStatus
pub const WGPUQueueWorkDoneStatus_Success: WGPUEnum = 0x0000_0001;
pub const WGPUQueueWorkDoneStatus_InstanceDropped: WGPUEnum = 0x0000_0002;
pub const WGPUQueueWorkDoneStatus_Error: WGPUEnum = 0x0000_0003;

// WGPUPopErrorScopeStatus
pub const WGPUPopErrorScopeStatus_Success: WGPUEnum = 0x0000_0001;
pub const WGPUPopErrorScopeStatus_InstanceDropped: WGPUEnum = 0x0000_0002;
pub const WGPUPopErrorScopeStatus_EmptyStack: WGPUEnum = 0x0000_0003;

// WGPUErrorType
pub const WGPUErrorType_NoError: WGPUEnum = 0x0000_0001;
pub const WGPUErrorType_Validation: WGPUEnum = 0x0000_0002;
pub const WGPUErrorType_OutOfMemory: WGPUEnum = 0x0000_0003;
pub const WGPUErrorType_Internal: WGPUEnum = 0x0000_0004;
pub const WGPUErrorType_Unknown: WGPUEnum = 0x0000_0005;

// WGPUDeviceLostReason
pub const WGPUDeviceLostReason_Unknown: WGPUEnum = 0x0000_0001;
pub const WGPUDeviceLostReason_Destroyed: WGPUEnum = 0x0000_0002;
pub const WGPUDeviceLostReason_InstanceDropped: WGPUEnum = 0x0000_0003;
pub const WGPUDeviceLostReason_FailedCreation: WGPUEnum = 0x0000_0004;

// WGPULogLevel (wgpu.h)
pub const WGPULogLevel_Off: WGPUEnum = 0x0000_0000;
pub const WGPULogLevel_Error: WGPUEnum = 0x0000_0001;
pub const WGPULogLevel_Warn: WGPUEnum = 0x0000_0002;
pub const WGPULogLevel_Info: WGPUEnum = 0x0000_0003;
pub const WGPULogLevel_Debug: WGPUEnum = 0x0000_0004;
pub const WGPULogLevel_Trace: WGPUEnum = 0x0000_0005;

// WGPUOptionalBool
pub const WGPUOptionalBool_False: WGPUEnum = 0x0000_0000;
pub const WGPUOptionalBool_True: WGPUEnum = 0x0000_0001;
pub const WGPUOptionalBool_Undefined: WGPUEnum = 0x0000_0002;

/// Explicit-length UTF-8 string view.
///
/// `{NULL, WGPU_STRLEN}` is the null value, `{NULL, 0}` the empty string,
/// `{ptr, WGPU_STRLEN}` a NUL-terminated string.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUStringView {
    pub data: *const c_char,
    pub length: usize,
}

impl WGPUStringView {
    /// The null string view (absent value).
    pub const NULL: Self = Self {
        data: ptr::null(),
        length: WGPU_STRLEN,
    };

    /// The empty string view.
    pub const EMPTY: Self = Self {
        data: ptr::null(),
        length: 0,
    };
}

impl Default for WGPUStringView {
    fn default() -> Self {
        Self::NULL
    }
}

/// Header of every chained extension struct.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUChainedStruct {
    pub next: *const WGPUChainedStruct,
    pub sType: WGPUEnum,
}

/// Header of every chained extension struct filled in by the native side.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUChainedStructOut {
    pub next: *mut WGPUChainedStructOut,
    pub sType: WGPUEnum,
}

/// Token naming one in-flight asynchronous operation; `id == 0` is invalid.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WGPUFuture {
    pub id: u64,
}

// ============================================================================
// Callback signatures
// ============================================================================

pub type WGPURequestAdapterCallback = Option<
    unsafe extern "C" fn(
        status: WGPUEnum,
        adapter: WGPUAdapter,
        message: WGPUStringView,
        userdata1: *mut c_void,
        userdata2: *mut c_void,
    ),
>;

pub type WGPURequestDeviceCallback = Option<
    unsafe extern "C" fn(
        status: WGPUEnum,
        device: WGPUDevice,
        message: WGPUStringView,
        userdata1: *mut c_void,
        userdata2: *mut c_void,
    ),
>;

pub type WGPUBufferMapCallback = Option<
    unsafe extern "C" fn(
        status: WGPUEnum,
        message: WGPUStringView,
        userdata1: *mut c_void,
        userdata2: *mut c_void,
    ),
>;

pub type WGPUQueueWorkDoneCallback =
    Option<unsafe extern "C" fn(status: WGPUEnum, userdata1: *mut c_void, userdata2: *mut c_void)>;

pub type WGPUPopErrorScopeCallback = Option<
    unsafe extern "C" fn(
        status: WGPUEnum,
        error_type: WGPUEnum,
        message: WGPUStringView,
        userdata1: *mut c_void,
        userdata2: *mut c_void,
    ),
>;

pub type WGPUDeviceLostCallback = Option<
    unsafe extern "C" fn(
        device: *const WGPUDevice,
        reason: WGPUEnum,
        message: WGPUStringView,
        userdata1: *mut c_void,
        userdata2: *mut c_void,
    ),
>;

pub type WGPUUncapturedErrorCallback = Option<
    unsafe extern "C" fn(
        device: *const WGPUDevice,
        error_type: WGPUEnum,
        message: WGPUStringView,
        userdata1: *mut c_void,
        userdata2: *mut c_void,
    ),
>;

pub type WGPULogCallback =
    Option<unsafe extern "C" fn(level: WGPUEnum, message: WGPUStringView, userdata: *mut c_void)>;

macro_rules! define_callback_info {
    ($name:ident, $callback:ty) => {
        #[repr(C)]
        #[derive(Debug, Clone, Copy)]
        pub struct $name {
            pub nextInChain: *const WGPUChainedStruct,
            pub mode: WGPUEnum,
            pub callback: $callback,
            pub userdata1: *mut c_void,
            pub userdata2: *mut c_void,
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    nextInChain: ptr::null(),
                    mode: WGPUCallbackMode_AllowSpontaneous,
                    callback: None,
                    userdata1: ptr::null_mut(),
                    userdata2: ptr::null_mut(),
                }
            }
        }
    };
}

define_callback_info!(WGPURequestAdapterCallbackInfo, WGPURequestAdapterCallback);
define_callback_info!(WGPURequestDeviceCallbackInfo, WGPURequestDeviceCallback);
define_callback_info!(WGPUBufferMapCallbackInfo, WGPUBufferMapCallback);
define_callback_info!(WGPUQueueWorkDoneCallbackInfo, WGPUQueueWorkDoneCallback);
define_callback_info!(WGPUPopErrorScopeCallbackInfo, WGPUPopErrorScopeCallback);
define_callback_info!(WGPUDeviceLostCallbackInfo, WGPUDeviceLostCallback);

/// The uncaptured-error callback has no mode: it may fire at any time.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUUncapturedErrorCallbackInfo {
    pub nextInChain: *const WGPUChainedStruct,
    pub callback: WGPUUncapturedErrorCallback,
    pub userdata1: *mut c_void,
    pub userdata2: *mut c_void,
}

impl Default for WGPUUncapturedErrorCallbackInfo {
    fn default() -> Self {
        Self {
            nextInChain: ptr::null(),
            callback: None,
            userdata1: ptr::null_mut(),
            userdata2: ptr::null_mut(),
        }
    }
}

// ============================================================================
// Instance / adapter / device
// ============================================================================

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUInstanceCapabilities {
    pub nextInChain: *mut WGPUChainedStructOut,
    pub timedWaitAnyEnable: WGPUBool,
    pub timedWaitAnyMaxCount: usize,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUInstanceDescriptor {
    pub nextInChain: *const WGPUChainedStruct,
    pub features: WGPUInstanceCapabilities,
}

/// wgpu-native extension chained onto [`WGPUInstanceDescriptor`].
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUInstanceExtras {
    pub chain: WGPUChainedStruct,
    pub backends: WGPUFlags,
    pub flags: WGPUFlags,
    pub dx12ShaderCompiler: WGPUEnum,
    pub gles3MinorVersion: WGPUEnum,
    pub glFenceBehaviour: WGPUEnum,
    pub dxilPath: WGPUStringView,
    pub dxcPath: WGPUStringView,
    pub dxcMaxShaderModel: WGPUEnum,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPURequestAdapterOptions {
    pub nextInChain: *const WGPUChainedStruct,
    pub featureLevel: WGPUEnum,
    pub powerPreference: WGPUEnum,
    pub forceFallbackAdapter: WGPUBool,
    pub backendType: WGPUEnum,
    pub compatibleSurface: WGPUSurface,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUAdapterInfo {
    pub nextInChain: *mut WGPUChainedStructOut,
    pub vendor: WGPUStringView,
    pub architecture: WGPUStringView,
    pub device: WGPUStringView,
    pub description: WGPUStringView,
    pub backendType: WGPUEnum,
    pub adapterType: WGPUEnum,
    pub vendorID: u32,
    pub deviceID: u32,
}

impl Default for WGPUAdapterInfo {
    fn default() -> Self {
        Self {
            nextInChain: ptr::null_mut(),
            vendor: WGPUStringView::NULL,
            architecture: WGPUStringView::NULL,
            device: WGPUStringView::NULL,
            description: WGPUStringView::NULL,
            backendType: 0,
            adapterType: 0,
            vendorID: 0,
            deviceID: 0,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUQueueDescriptor {
    pub nextInChain: *const WGPUChainedStruct,
    pub label: WGPUStringView,
}

/// Opaque limits struct; only passed by pointer (null = defaults).
#[repr(C)]
pub struct WGPULimits {
    _private: [u8; 0],
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUDeviceDescriptor {
    pub nextInChain: *const WGPUChainedStruct,
    pub label: WGPUStringView,
    pub requiredFeatureCount: usize,
    pub requiredFeatures: *const WGPUEnum,
    pub requiredLimits: *const WGPULimits,
    pub defaultQueue: WGPUQueueDescriptor,
    pub deviceLostCallbackInfo: WGPUDeviceLostCallbackInfo,
    pub uncapturedErrorCallbackInfo: WGPUUncapturedErrorCallbackInfo,
}

/// wgpu-native extension chained onto [`WGPUDeviceDescriptor`].
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUDeviceExtras {
    pub chain: WGPUChainedStruct,
    pub tracePath: WGPUStringView,
}

// ============================================================================
// Resources
// ============================================================================

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUBufferDescriptor {
    pub nextInChain: *const WGPUChainedStruct,
    pub label: WGPUStringView,
    pub usage: WGPUFlags,
    pub size: u64,
    pub mappedAtCreation: WGPUBool,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WGPUExtent3D {
    pub width: u32,
    pub height: u32,
    pub depthOrArrayLayers: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUTextureDescriptor {
    pub nextInChain: *const WGPUChainedStruct,
    pub label: WGPUStringView,
    pub usage: WGPUFlags,
    pub dimension: WGPUEnum,
    pub size: WGPUExtent3D,
    pub format: WGPUEnum,
    pub mipLevelCount: u32,
    pub sampleCount: u32,
    pub viewFormatCount: usize,
    pub viewFormats: *const WGPUEnum,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUTextureViewDescriptor {
    pub nextInChain: *const WGPUChainedStruct,
    pub label: WGPUStringView,
    pub format: WGPUEnum,
    pub dimension: WGPUEnum,
    pub baseMipLevel: u32,
    pub mipLevelCount: u32,
    pub baseArrayLayer: u32,
    pub arrayLayerCount: u32,
    pub aspect: WGPUEnum,
    pub usage: WGPUFlags,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUSamplerDescriptor {
    pub nextInChain: *const WGPUChainedStruct,
    pub label: WGPUStringView,
    pub addressModeU: WGPUEnum,
    pub addressModeV: WGPUEnum,
    pub addressModeW: WGPUEnum,
    pub magFilter: WGPUEnum,
    pub minFilter: WGPUEnum,
    pub mipmapFilter: WGPUEnum,
    pub lodMinClamp: f32,
    pub lodMaxClamp: f32,
    pub compare: WGPUEnum,
    pub maxAnisotropy: u16,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUShaderModuleDescriptor {
    pub nextInChain: *const WGPUChainedStruct,
    pub label: WGPUStringView,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUShaderSourceWGSL {
    pub chain: WGPUChainedStruct,
    pub code: WGPUStringView,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUShaderSourceSPIRV {
    pub chain: WGPUChainedStruct,
    pub codeSize: u32,
    pub code: *const u32,
}

// ============================================================================
// Binding
// ============================================================================

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUBufferBindingLayout {
    pub nextInChain: *const WGPUChainedStruct,
    pub type_: WGPUEnum,
    pub hasDynamicOffset: WGPUBool,
    pub minBindingSize: u64,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUSamplerBindingLayout {
    pub nextInChain: *const WGPUChainedStruct,
    pub type_: WGPUEnum,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUTextureBindingLayout {
    pub nextInChain: *const WGPUChainedStruct,
    pub sampleType: WGPUEnum,
    pub viewDimension: WGPUEnum,
    pub multisampled: WGPUBool,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUStorageTextureBindingLayout {
    pub nextInChain: *const WGPUChainedStruct,
    pub access: WGPUEnum,
    pub format: WGPUEnum,
    pub viewDimension: WGPUEnum,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUBindGroupLayoutEntry {
    pub nextInChain: *const WGPUChainedStruct,
    pub binding: u32,
    pub visibility: WGPUFlags,
    pub buffer: WGPUBufferBindingLayout,
    pub sampler: WGPUSamplerBindingLayout,
    pub texture: WGPUTextureBindingLayout,
    pub storageTexture: WGPUStorageTextureBindingLayout,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUBindGroupLayoutDescriptor {
    pub nextInChain: *const WGPUChainedStruct,
    pub label: WGPUStringView,
    pub entryCount: usize,
    pub entries: *const WGPUBindGroupLayoutEntry,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUBindGroupEntry {
    pub nextInChain: *const WGPUChainedStruct,
    pub binding: u32,
    pub buffer: WGPUBuffer,
    pub offset: u64,
    pub size: u64,
    pub sampler: WGPUSampler,
    pub textureView: WGPUTextureView,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUBindGroupDescriptor {
    pub nextInChain: *const WGPUChainedStruct,
    pub label: WGPUStringView,
    pub layout: WGPUBindGroupLayout,
    pub entryCount: usize,
    pub entries: *const WGPUBindGroupEntry,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUPipelineLayoutDescriptor {
    pub nextInChain: *const WGPUChainedStruct,
    pub label: WGPUStringView,
    pub bindGroupLayoutCount: usize,
    pub bindGroupLayouts: *const WGPUBindGroupLayout,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUConstantEntry {
    pub nextInChain: *const WGPUChainedStruct,
    pub key: WGPUStringView,
    pub value: f64,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUComputeState {
    pub nextInChain: *const WGPUChainedStruct,
    pub module: WGPUShaderModule,
    pub entryPoint: WGPUStringView,
    pub constantCount: usize,
    pub constants: *const WGPUConstantEntry,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUComputePipelineDescriptor {
    pub nextInChain: *const WGPUChainedStruct,
    pub label: WGPUStringView,
    pub layout: WGPUPipelineLayout,
    pub compute: WGPUComputeState,
}

// ============================================================================
// Commands
// ============================================================================

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUCommandEncoderDescriptor {
    pub nextInChain: *const WGPUChainedStruct,
    pub label: WGPUStringView,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUCommandBufferDescriptor {
    pub nextInChain: *const WGPUChainedStruct,
    pub label: WGPUStringView,
}

/// Opaque; timestamp writes are not wrapped and always passed as null.
#[repr(C)]
pub struct WGPUPassTimestampWrites {
    _private: [u8; 0],
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUComputePassDescriptor {
    pub nextInChain: *const WGPUChainedStruct,
    pub label: WGPUStringView,
    pub timestampWrites: *const WGPUPassTimestampWrites,
}

// ============================================================================
// Render pipelines
// ============================================================================

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUVertexAttribute {
    pub format: WGPUEnum,
    pub offset: u64,
    pub shaderLocation: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUVertexBufferLayout {
    pub arrayStride: u64,
    pub stepMode: WGPUEnum,
    pub attributeCount: usize,
    pub attributes: *const WGPUVertexAttribute,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUVertexState {
    pub nextInChain: *const WGPUChainedStruct,
    pub module: WGPUShaderModule,
    pub entryPoint: WGPUStringView,
    pub constantCount: usize,
    pub constants: *const WGPUConstantEntry,
    pub bufferCount: usize,
    pub buffers: *const WGPUVertexBufferLayout,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUPrimitiveState {
    pub nextInChain: *const WGPUChainedStruct,
    pub topology: WGPUEnum,
    pub stripIndexFormat: WGPUEnum,
    pub frontFace: WGPUEnum,
    pub cullMode: WGPUEnum,
    pub unclippedDepth: WGPUBool,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUStencilFaceState {
    pub compare: WGPUEnum,
    pub failOp: WGPUEnum,
    pub depthFailOp: WGPUEnum,
    pub passOp: WGPUEnum,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUDepthStencilState {
    pub nextInChain: *const WGPUChainedStruct,
    pub format: WGPUEnum,
    /// `WGPUOptionalBool`.
    pub depthWriteEnabled: WGPUEnum,
    pub depthCompare: WGPUEnum,
    pub stencilFront: WGPUStencilFaceState,
    pub stencilBack: WGPUStencilFaceState,
    pub stencilReadMask: u32,
    pub stencilWriteMask: u32,
    pub depthBias: i32,
    pub depthBiasSlopeScale: f32,
    pub depthBiasClamp: f32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUMultisampleState {
    pub nextInChain: *const WGPUChainedStruct,
    pub count: u32,
    pub mask: u32,
    pub alphaToCoverageEnabled: WGPUBool,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUBlendComponent {
    pub operation: WGPUEnum,
    pub srcFactor: WGPUEnum,
    pub dstFactor: WGPUEnum,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUBlendState {
    pub color: WGPUBlendComponent,
    pub alpha: WGPUBlendComponent,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUColorTargetState {
    pub nextInChain: *const WGPUChainedStruct,
    pub format: WGPUEnum,
    pub blend: *const WGPUBlendState,
    pub writeMask: WGPUFlags,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUFragmentState {
    pub nextInChain: *const WGPUChainedStruct,
    pub module: WGPUShaderModule,
    pub entryPoint: WGPUStringView,
    pub constantCount: usize,
    pub constants: *const WGPUConstantEntry,
    pub targetCount: usize,
    pub targets: *const WGPUColorTargetState,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPURenderPipelineDescriptor {
    pub nextInChain: *const WGPUChainedStruct,
    pub label: WGPUStringView,
    pub layout: WGPUPipelineLayout,
    pub vertex: WGPUVertexState,
    pub primitive: WGPUPrimitiveState,
    pub depthStencil: *const WGPUDepthStencilState,
    pub multisample: WGPUMultisampleState,
    pub fragment: *const WGPUFragmentState,
}

// ============================================================================
// Render passes and bundles
// ============================================================================

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WGPUColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPURenderPassColorAttachment {
    pub nextInChain: *const WGPUChainedStruct,
    pub view: WGPUTextureView,
    pub depthSlice: u32,
    pub resolveTarget: WGPUTextureView,
    pub loadOp: WGPUEnum,
    pub storeOp: WGPUEnum,
    pub clearValue: WGPUColor,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPURenderPassDepthStencilAttachment {
    pub view: WGPUTextureView,
    pub depthLoadOp: WGPUEnum,
    pub depthStoreOp: WGPUEnum,
    pub depthClearValue: f32,
    pub depthReadOnly: WGPUBool,
    pub stencilLoadOp: WGPUEnum,
    pub stencilStoreOp: WGPUEnum,
    pub stencilClearValue: u32,
    pub stencilReadOnly: WGPUBool,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPURenderPassDescriptor {
    pub nextInChain: *const WGPUChainedStruct,
    pub label: WGPUStringView,
    pub colorAttachmentCount: usize,
    pub colorAttachments: *const WGPURenderPassColorAttachment,
    pub depthStencilAttachment: *const WGPURenderPassDepthStencilAttachment,
    pub occlusionQuerySet: WGPUQuerySet,
    pub timestampWrites: *const WGPUPassTimestampWrites,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPURenderBundleEncoderDescriptor {
    pub nextInChain: *const WGPUChainedStruct,
    pub label: WGPUStringView,
    pub colorFormatCount: usize,
    pub colorFormats: *const WGPUEnum,
    pub depthStencilFormat: WGPUEnum,
    pub sampleCount: u32,
    pub depthReadOnly: WGPUBool,
    pub stencilReadOnly: WGPUBool,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPURenderBundleDescriptor {
    pub nextInChain: *const WGPUChainedStruct,
    pub label: WGPUStringView,
}

// ============================================================================
// Queries and texel copies
// ============================================================================

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUQuerySetDescriptor {
    pub nextInChain: *const WGPUChainedStruct,
    pub label: WGPUStringView,
    pub type_: WGPUEnum,
    pub count: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WGPUOrigin3D {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WGPUTexelCopyBufferLayout {
    pub offset: u64,
    pub bytesPerRow: u32,
    pub rowsPerImage: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUTexelCopyBufferInfo {
    pub layout: WGPUTexelCopyBufferLayout,
    pub buffer: WGPUBuffer,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WGPUTexelCopyTextureInfo {
    pub texture: WGPUTexture,
    pub mipLevel: u32,
    pub origin: WGPUOrigin3D,
    pub aspect: WGPUEnum,
}

/// Submission index returned by `wgpuQueueSubmitForIndex` (wgpu.h).
pub type WGPUSubmissionIndex = u64;
