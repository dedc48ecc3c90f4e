//! In-process stand-in for the wgpu-native library.
//!
//! Every fake object is a leaked heap allocation whose address is the handle,
//! so a double release can be counted instead of crashing. Objects remember
//! the [`World`] they were created in, which keeps counters of tests running
//! in parallel apart.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::CStr;
use std::os::raw::c_void;
use std::ptr;
use std::slice;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use parking_lot::{Mutex, MutexGuard};
use wgpu_bind::ffi::*;
use wgpu_bind::{
    Adapter, Device, DeviceDescriptor, DeviceLostReason, ErrorType, Instance, InstanceDescriptor, Library,
    LibraryOptions, NativeProcs,
};

/// Packed version reported by the fake (24.0.3.1).
pub const FAKE_VERSION: u32 = 0x1800_0301;

/// Features every fake adapter supports.
pub const ADAPTER_FEATURES: [u32; 2] = [0x03, 0x0A];

/// Install a test logger once per test binary.
pub fn init_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .is_test(true)
        .try_init();
}

// ============================================================================
// World
// ============================================================================

/// How the fake completes asynchronous calls.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Delivery {
    /// The callback fires inside the issuing call.
    #[default]
    Immediate,
    /// The callback fires during the next `wgpuInstanceProcessEvents` or
    /// `wgpuDevicePoll`.
    Deferred,
    /// The callback fires on a new thread.
    Thread,
    /// The call returns a zero future and the callback never fires.
    Reject,
    /// The callback reports failure with this message.
    Fail(String),
    /// The callback reports success without delivering an object.
    Missing,
}

enum Outcome {
    Success,
    Fail(String),
    Missing,
}

type Job = Box<dyn FnOnce() + Send>;

/// Descriptor contents the fake saw, for marshalling checks.
#[derive(Debug, Default)]
pub struct Recorded {
    pub instance_backends: Option<u64>,
    pub instance_flags: Option<u64>,
    pub dxc_path: Option<String>,
    pub timed_wait_any: bool,
    pub power_preference: Option<u32>,
    pub force_fallback_adapter: bool,
    pub device_label: Option<String>,
    pub queue_label: Option<String>,
    pub required_features: Vec<u32>,
    pub trace_path: Option<String>,
    pub buffer_labels: Vec<Option<String>>,
    pub texture_view_formats: Vec<u32>,
    pub view_counts: Option<(u32, u32)>,
    pub sampler_compare: Option<u32>,
    pub sampler_lod_max: Option<f32>,
    pub shaders: Vec<ShaderRecord>,
    pub layout_entries: Vec<LayoutEntryRecord>,
    pub bind_group_entries: Vec<BindEntryRecord>,
    pub pipeline_layout_count: Option<usize>,
    pub entry_point: Option<Option<String>>,
    pub constants: Vec<(String, f64)>,
    pub pipeline_has_layout: Option<bool>,
    pub pass_labels: Vec<Option<String>>,
    pub dynamic_offsets: Vec<u32>,
    pub dispatches: Vec<(u32, u32, u32)>,
    pub submitted: Vec<usize>,
    pub render_pipeline: Option<RenderPipelineRecord>,
    pub render_passes: Vec<RenderPassRecord>,
    pub draws: Vec<DrawRecord>,
    pub vertex_buffers: Vec<(u32, usize, u64, u64)>,
    pub index_buffer: Option<(usize, u32, u64, u64)>,
    pub viewport: Option<[f32; 6]>,
    pub scissor: Option<[u32; 4]>,
    pub blend_constant: Option<[f64; 4]>,
    pub stencil_reference: Option<u32>,
    pub occlusion_queries: Vec<u32>,
    pub bundle_encoder: Option<(Vec<u32>, u32, u32)>,
    pub executed_bundles: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VertexBufferRecord {
    pub stride: u64,
    pub step_mode: u32,
    /// `(format, offset, shader location)` per attribute.
    pub attributes: Vec<(u32, u64, u32)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TargetRecord {
    pub format: u32,
    /// Color `(operation, src, dst)` when blending is enabled.
    pub blend: Option<(u32, u32, u32)>,
    pub write_mask: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderPipelineRecord {
    pub label: Option<String>,
    pub vertex_entry: Option<String>,
    pub vertex_buffers: Vec<VertexBufferRecord>,
    pub topology: u32,
    pub cull_mode: u32,
    /// `(format, depth write, depth compare)`.
    pub depth_stencil: Option<(u32, u32, u32)>,
    pub sample_count: u32,
    pub fragment_entry: Option<Option<String>>,
    pub targets: Vec<TargetRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorAttachmentRecord {
    pub view: usize,
    pub resolve_target: usize,
    pub depth_slice: u32,
    pub load_op: u32,
    pub store_op: u32,
    pub clear: [f64; 4],
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderPassRecord {
    pub label: Option<String>,
    pub colors: Vec<ColorAttachmentRecord>,
    /// `(view, depth load op, depth clear value, depth read-only)`.
    pub depth: Option<(usize, u32, f32, u32)>,
    pub occlusion_query_set: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawRecord {
    Draw {
        vertices: u32,
        instances: u32,
        first_vertex: u32,
        first_instance: u32,
    },
    Indexed {
        indices: u32,
        instances: u32,
        first_index: u32,
        base_vertex: i32,
        first_instance: u32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShaderRecord {
    Wgsl { label: Option<String>, code: String },
    SpirV { label: Option<String>, words: Vec<u32> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEntryRecord {
    pub binding: u32,
    pub visibility: u64,
    pub buffer_type: u32,
    pub sampler_type: u32,
    pub sample_type: u32,
    pub storage_access: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BindEntryRecord {
    pub binding: u32,
    pub buffer: usize,
    pub offset: u64,
    pub size: u64,
    pub sampler: usize,
    pub texture_view: usize,
}

/// Shared state of one fake native runtime.
#[derive(Default)]
pub struct World {
    delivery: Mutex<Delivery>,
    deferred: Mutex<Vec<Job>>,
    next_future: AtomicU64,
    created: Mutex<HashMap<&'static str, usize>>,
    released: Mutex<HashMap<&'static str, usize>>,
    double_released: AtomicUsize,
    info_frees: AtomicUsize,
    recorded: Mutex<Recorded>,
}

impl World {
    fn issue(&self, job: impl FnOnce(Outcome) + Send + 'static) -> WGPUFuture {
        let delivery = self.delivery.lock().clone();
        let id = self.next_future.fetch_add(1, Ordering::SeqCst) + 1;
        match delivery {
            Delivery::Immediate => job(Outcome::Success),
            Delivery::Fail(message) => job(Outcome::Fail(message)),
            Delivery::Missing => job(Outcome::Missing),
            Delivery::Deferred => self.deferred.lock().push(Box::new(move || job(Outcome::Success))),
            Delivery::Thread => {
                thread::spawn(move || job(Outcome::Success));
            }
            Delivery::Reject => return WGPUFuture { id: 0 },
        }
        WGPUFuture { id }
    }

    fn run_deferred(&self) -> usize {
        let jobs = std::mem::take(&mut *self.deferred.lock());
        let count = jobs.len();
        for job in jobs {
            job();
        }
        count
    }
}

thread_local! {
    static CURRENT: RefCell<Option<Arc<World>>> = const { RefCell::new(None) };
}

// ============================================================================
// Objects
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum Command {
    Copy {
        src: usize,
        src_offset: u64,
        dst: usize,
        dst_offset: u64,
        size: u64,
    },
    Clear {
        buffer: usize,
        offset: u64,
        size: u64,
    },
    BufferToTexture {
        src: WGPUTexelCopyBufferInfo,
        dst: WGPUTexelCopyTextureInfo,
        size: WGPUExtent3D,
    },
    TextureToBuffer {
        src: WGPUTexelCopyTextureInfo,
        dst: WGPUTexelCopyBufferInfo,
        size: WGPUExtent3D,
    },
    TextureToTexture {
        src: WGPUTexelCopyTextureInfo,
        dst: WGPUTexelCopyTextureInfo,
        size: WGPUExtent3D,
    },
    Resolve {
        first: u32,
        count: u32,
        dst: usize,
        offset: u64,
    },
}

#[derive(Default)]
struct DeviceState {
    features: Vec<u32>,
    scopes: Vec<(u32, Option<(u32, String)>)>,
    lost: Option<WGPUDeviceLostCallbackInfo>,
    uncaptured: Option<WGPUUncapturedErrorCallbackInfo>,
}

struct BufferState {
    data: Vec<u8>,
    usage: u64,
    mapped: bool,
    pending: bool,
}

/// Texture contents. Only mip level 0 is backed, at 4 bytes per texel.
struct TextureState {
    width: u32,
    height: u32,
    layers: u32,
    mips: u32,
    samples: u32,
    dimension: u32,
    format: u32,
    usage: u64,
    data: Vec<u8>,
}

const TEXEL: usize = 4;

enum State {
    Plain,
    Device(DeviceState),
    Buffer(BufferState),
    Commands(Vec<Command>),
    Pass { encoder: usize },
    Texture(TextureState),
    Draws(Vec<DrawRecord>),
    QuerySet { ty: u32, count: u32 },
}

struct Obj {
    kind: &'static str,
    world: Arc<World>,
    released: AtomicBool,
    state: Mutex<State>,
}

fn new_obj(world: &Arc<World>, kind: &'static str, state: State) -> *mut c_void {
    *world.created.lock().entry(kind).or_default() += 1;
    Box::into_raw(Box::new(Obj {
        kind,
        world: world.clone(),
        released: AtomicBool::new(false),
        state: Mutex::new(state),
    }))
    .cast()
}

unsafe fn obj<'a>(handle: *mut c_void) -> &'a Obj {
    &*(handle as *const Obj)
}

unsafe fn release(handle: *mut c_void) {
    let obj = obj(handle);
    if obj.released.swap(true, Ordering::SeqCst) {
        obj.world.double_released.fetch_add(1, Ordering::SeqCst);
        return;
    }
    *obj.world.released.lock().entry(obj.kind).or_default() += 1;
}

/// Moves raw native values into jobs that may run on another thread.
struct Sendable<T>(T);

unsafe impl<T> Send for Sendable<T> {}

impl<T> Sendable<T> {
    fn take(self) -> T {
        self.0
    }
}

unsafe fn view_string(view: WGPUStringView) -> Option<String> {
    if view.data.is_null() {
        return if view.length == 0 { Some(String::new()) } else { None };
    }
    if view.length == WGPU_STRLEN {
        return Some(CStr::from_ptr(view.data).to_string_lossy().into_owned());
    }
    let bytes = slice::from_raw_parts(view.data.cast::<u8>(), view.length);
    Some(String::from_utf8_lossy(bytes).into_owned())
}

fn view_of(s: &str) -> WGPUStringView {
    WGPUStringView {
        data: s.as_ptr().cast(),
        length: s.len(),
    }
}

unsafe fn native_slice<'a, T>(data: *const T, count: usize) -> &'a [T] {
    if data.is_null() || count == 0 {
        &[]
    } else {
        slice::from_raw_parts(data, count)
    }
}

unsafe fn chain_of(mut next: *const WGPUChainedStruct) -> Vec<*const WGPUChainedStruct> {
    let mut links = Vec::new();
    while !next.is_null() {
        links.push(next);
        next = (*next).next;
    }
    links
}

// ============================================================================
// Global entry points
// ============================================================================

static LOG_LEVEL: AtomicU32 = AtomicU32::new(u32::MAX);
static LOG_CALLBACK: Mutex<(WGPULogCallback, usize)> = parking_lot::const_mutex((None, 0));

/// Last level passed to `wgpuSetLogLevel`.
pub fn native_log_level() -> u32 {
    LOG_LEVEL.load(Ordering::SeqCst)
}

/// Emit a log line through the registered native log callback.
pub fn emit_native_log(level: u32, message: &str) -> bool {
    let (callback, userdata) = *LOG_CALLBACK.lock();
    match callback {
        Some(callback) => {
            unsafe { callback(level, view_of(message), userdata as *mut c_void) };
            true
        }
        None => false,
    }
}

unsafe extern "C" fn get_version() -> u32 {
    FAKE_VERSION
}

unsafe extern "C" fn set_log_callback(callback: WGPULogCallback, userdata: *mut c_void) {
    *LOG_CALLBACK.lock() = (callback, userdata as usize);
}

unsafe extern "C" fn set_log_level(level: WGPUEnum) {
    LOG_LEVEL.store(level, Ordering::SeqCst);
}

// ============================================================================
// Instance and adapter
// ============================================================================

unsafe extern "C" fn create_instance(desc: *const WGPUInstanceDescriptor) -> WGPUInstance {
    let Some(world) = CURRENT.with(|current| current.borrow().clone()) else {
        return WGPUInstance::null();
    };
    if let Some(desc) = desc.as_ref() {
        let mut recorded = world.recorded.lock();
        recorded.timed_wait_any = desc.features.timedWaitAnyEnable != WGPU_FALSE;
        for link in chain_of(desc.nextInChain) {
            if (*link).sType == WGPUSType_InstanceExtras {
                let extras = &*(link as *const WGPUInstanceExtras);
                recorded.instance_backends = Some(extras.backends);
                recorded.instance_flags = Some(extras.flags);
                recorded.dxc_path = view_string(extras.dxcPath);
            }
        }
    }
    WGPUInstance::from_ptr(new_obj(&world, "instance", State::Plain))
}

unsafe extern "C" fn instance_process_events(instance: WGPUInstance) {
    obj(instance.as_ptr()).world.run_deferred();
}

unsafe extern "C" fn instance_request_adapter(
    instance: WGPUInstance,
    options: *const WGPURequestAdapterOptions,
    info: WGPURequestAdapterCallbackInfo,
) -> WGPUFuture {
    let world = obj(instance.as_ptr()).world.clone();
    if let Some(options) = options.as_ref() {
        let mut recorded = world.recorded.lock();
        recorded.power_preference = Some(options.powerPreference);
        recorded.force_fallback_adapter = options.forceFallbackAdapter != WGPU_FALSE;
    }

    let info = Sendable(info);
    let target = world.clone();
    world.issue(move |outcome| {
        let info = info.take();
        let Some(callback) = info.callback else {
            return;
        };
        match outcome {
            Outcome::Success => {
                let adapter = WGPUAdapter::from_ptr(new_obj(&target, "adapter", State::Plain));
                unsafe {
                    callback(
                        WGPURequestAdapterStatus_Success,
                        adapter,
                        WGPUStringView::NULL,
                        info.userdata1,
                        info.userdata2,
                    )
                };
            }
            Outcome::Missing => unsafe {
                callback(
                    WGPURequestAdapterStatus_Success,
                    WGPUAdapter::null(),
                    WGPUStringView::NULL,
                    info.userdata1,
                    info.userdata2,
                )
            },
            Outcome::Fail(message) => unsafe {
                callback(
                    WGPURequestAdapterStatus_Unavailable,
                    WGPUAdapter::null(),
                    view_of(&message),
                    info.userdata1,
                    info.userdata2,
                )
            },
        }
    })
}

const VENDOR: &str = "Fake Vendor";
const DEVICE_NAME: &str = "Fake Device";
const DESCRIPTION: &[u8] = b"in-process test adapter\0";

unsafe extern "C" fn adapter_get_info(_adapter: WGPUAdapter, info: *mut WGPUAdapterInfo) -> WGPUEnum {
    let Some(info) = info.as_mut() else {
        return WGPUStatus_Error;
    };
    info.vendor = view_of(VENDOR);
    info.architecture = WGPUStringView::EMPTY;
    info.device = view_of(DEVICE_NAME);
    info.description = WGPUStringView {
        data: DESCRIPTION.as_ptr().cast(),
        length: WGPU_STRLEN,
    };
    info.backendType = 1;
    info.adapterType = 3;
    info.vendorID = 0x10de;
    info.deviceID = 0x1234;
    WGPUStatus_Success
}

unsafe extern "C" fn adapter_info_free_members(info: WGPUAdapterInfo) {
    // Only the fake's static strings end up here.
    let _ = info;
    CURRENT.with(|current| {
        if let Some(world) = current.borrow().as_ref() {
            world.info_frees.fetch_add(1, Ordering::SeqCst);
        }
    });
}

unsafe extern "C" fn adapter_has_feature(_adapter: WGPUAdapter, feature: WGPUEnum) -> WGPUBool {
    ADAPTER_FEATURES.contains(&feature) as WGPUBool
}

unsafe extern "C" fn adapter_request_device(
    adapter: WGPUAdapter,
    desc: *const WGPUDeviceDescriptor,
    info: WGPURequestDeviceCallbackInfo,
) -> WGPUFuture {
    let world = obj(adapter.as_ptr()).world.clone();
    let mut state = DeviceState::default();
    if let Some(desc) = desc.as_ref() {
        let mut recorded = world.recorded.lock();
        recorded.device_label = view_string(desc.label);
        recorded.queue_label = view_string(desc.defaultQueue.label);
        recorded.required_features = native_slice(desc.requiredFeatures, desc.requiredFeatureCount).to_vec();
        for link in chain_of(desc.nextInChain) {
            if (*link).sType == WGPUSType_DeviceExtras {
                let extras = &*(link as *const WGPUDeviceExtras);
                recorded.trace_path = view_string(extras.tracePath);
            }
        }
        state.features = recorded.required_features.clone();
        state.lost = desc.deviceLostCallbackInfo.callback.map(|_| desc.deviceLostCallbackInfo);
        state.uncaptured = desc
            .uncapturedErrorCallbackInfo
            .callback
            .map(|_| desc.uncapturedErrorCallbackInfo);
    }

    let info = Sendable(info);
    let state = Sendable(state);
    let target = world.clone();
    world.issue(move |outcome| {
        let info = info.take();
        let state = state.take();
        let Some(callback) = info.callback else {
            return;
        };
        match outcome {
            Outcome::Success => {
                let device = WGPUDevice::from_ptr(new_obj(&target, "device", State::Device(state)));
                unsafe {
                    callback(
                        WGPURequestDeviceStatus_Success,
                        device,
                        WGPUStringView::NULL,
                        info.userdata1,
                        info.userdata2,
                    )
                };
            }
            Outcome::Missing => unsafe {
                callback(
                    WGPURequestDeviceStatus_Success,
                    WGPUDevice::null(),
                    WGPUStringView::NULL,
                    info.userdata1,
                    info.userdata2,
                )
            },
            Outcome::Fail(message) => {
                // A failed request still reports the loss of the device it
                // never created.
                if let Some(lost) = state.lost {
                    if let Some(lost_callback) = lost.callback {
                        unsafe {
                            lost_callback(
                                ptr::null(),
                                WGPUDeviceLostReason_FailedCreation,
                                view_of(&message),
                                lost.userdata1,
                                lost.userdata2,
                            )
                        };
                    }
                }
                unsafe {
                    callback(
                        WGPURequestDeviceStatus_Error,
                        WGPUDevice::null(),
                        view_of(&message),
                        info.userdata1,
                        info.userdata2,
                    )
                };
            }
        }
    })
}

// ============================================================================
// Device
// ============================================================================

unsafe fn with_device<R>(device: WGPUDevice, f: impl FnOnce(&mut DeviceState) -> R) -> Option<R> {
    let obj = obj(device.as_ptr());
    let mut state = obj.state.lock();
    match &mut *state {
        State::Device(device) => Some(f(device)),
        _ => None,
    }
}

unsafe fn fire_lost(device: WGPUDevice, reason: WGPUEnum, message: &str) {
    let Some(Some(lost)) = with_device(device, |state| state.lost.take()) else {
        return;
    };
    if let Some(callback) = lost.callback {
        callback(&device, reason, view_of(message), lost.userdata1, lost.userdata2);
    }
}

unsafe extern "C" fn device_create_buffer(device: WGPUDevice, desc: *const WGPUBufferDescriptor) -> WGPUBuffer {
    let world = &obj(device.as_ptr()).world;
    let Some(desc) = desc.as_ref() else {
        return WGPUBuffer::null();
    };
    world.recorded.lock().buffer_labels.push(view_string(desc.label));
    if desc.usage == 0 {
        return WGPUBuffer::null();
    }
    let state = State::Buffer(BufferState {
        data: vec![0; desc.size as usize],
        usage: desc.usage,
        mapped: desc.mappedAtCreation != WGPU_FALSE,
        pending: false,
    });
    WGPUBuffer::from_ptr(new_obj(world, "buffer", state))
}

unsafe extern "C" fn device_create_texture(device: WGPUDevice, desc: *const WGPUTextureDescriptor) -> WGPUTexture {
    let world = &obj(device.as_ptr()).world;
    let Some(desc) = desc.as_ref() else {
        return WGPUTexture::null();
    };
    world.recorded.lock().texture_view_formats = native_slice(desc.viewFormats, desc.viewFormatCount).to_vec();
    let size = desc.size;
    let state = State::Texture(TextureState {
        width: size.width,
        height: size.height,
        layers: size.depthOrArrayLayers,
        mips: desc.mipLevelCount,
        samples: desc.sampleCount,
        dimension: desc.dimension,
        format: desc.format,
        usage: desc.usage,
        data: vec![0; (size.width * size.height * size.depthOrArrayLayers) as usize * TEXEL],
    });
    WGPUTexture::from_ptr(new_obj(world, "texture", state))
}

unsafe extern "C" fn device_create_sampler(device: WGPUDevice, desc: *const WGPUSamplerDescriptor) -> WGPUSampler {
    let world = &obj(device.as_ptr()).world;
    if let Some(desc) = desc.as_ref() {
        let mut recorded = world.recorded.lock();
        recorded.sampler_compare = Some(desc.compare);
        recorded.sampler_lod_max = Some(desc.lodMaxClamp);
    }
    WGPUSampler::from_ptr(new_obj(world, "sampler", State::Plain))
}

unsafe extern "C" fn device_create_shader_module(
    device: WGPUDevice,
    desc: *const WGPUShaderModuleDescriptor,
) -> WGPUShaderModule {
    let world = &obj(device.as_ptr()).world;
    let Some(desc) = desc.as_ref() else {
        return WGPUShaderModule::null();
    };
    let label = view_string(desc.label);
    let mut record = None;
    for link in chain_of(desc.nextInChain) {
        match (*link).sType {
            WGPUSType_ShaderSourceWGSL => {
                let source = &*(link as *const WGPUShaderSourceWGSL);
                record = Some(ShaderRecord::Wgsl {
                    label: label.clone(),
                    code: view_string(source.code).unwrap_or_default(),
                });
            }
            WGPUSType_ShaderSourceSPIRV => {
                let source = &*(link as *const WGPUShaderSourceSPIRV);
                record = Some(ShaderRecord::SpirV {
                    label: label.clone(),
                    words: native_slice(source.code, source.codeSize as usize).to_vec(),
                });
            }
            _ => {}
        }
    }
    let Some(record) = record else {
        return WGPUShaderModule::null();
    };
    world.recorded.lock().shaders.push(record);
    WGPUShaderModule::from_ptr(new_obj(world, "shader module", State::Plain))
}

unsafe extern "C" fn device_create_bind_group_layout(
    device: WGPUDevice,
    desc: *const WGPUBindGroupLayoutDescriptor,
) -> WGPUBindGroupLayout {
    let world = &obj(device.as_ptr()).world;
    let Some(desc) = desc.as_ref() else {
        return WGPUBindGroupLayout::null();
    };
    world.recorded.lock().layout_entries = native_slice(desc.entries, desc.entryCount)
        .iter()
        .map(|entry| LayoutEntryRecord {
            binding: entry.binding,
            visibility: entry.visibility,
            buffer_type: entry.buffer.type_,
            sampler_type: entry.sampler.type_,
            sample_type: entry.texture.sampleType,
            storage_access: entry.storageTexture.access,
        })
        .collect();
    WGPUBindGroupLayout::from_ptr(new_obj(world, "bind group layout", State::Plain))
}

unsafe extern "C" fn device_create_bind_group(device: WGPUDevice, desc: *const WGPUBindGroupDescriptor) -> WGPUBindGroup {
    let world = &obj(device.as_ptr()).world;
    let Some(desc) = desc.as_ref() else {
        return WGPUBindGroup::null();
    };
    if desc.layout.is_null() {
        return WGPUBindGroup::null();
    }
    world.recorded.lock().bind_group_entries = native_slice(desc.entries, desc.entryCount)
        .iter()
        .map(|entry| BindEntryRecord {
            binding: entry.binding,
            buffer: entry.buffer.addr(),
            offset: entry.offset,
            size: entry.size,
            sampler: entry.sampler.addr(),
            texture_view: entry.textureView.addr(),
        })
        .collect();
    WGPUBindGroup::from_ptr(new_obj(world, "bind group", State::Plain))
}

unsafe extern "C" fn device_create_pipeline_layout(
    device: WGPUDevice,
    desc: *const WGPUPipelineLayoutDescriptor,
) -> WGPUPipelineLayout {
    let world = &obj(device.as_ptr()).world;
    let Some(desc) = desc.as_ref() else {
        return WGPUPipelineLayout::null();
    };
    let layouts = native_slice(desc.bindGroupLayouts, desc.bindGroupLayoutCount);
    if layouts.iter().any(|layout| layout.is_null()) {
        return WGPUPipelineLayout::null();
    }
    world.recorded.lock().pipeline_layout_count = Some(layouts.len());
    WGPUPipelineLayout::from_ptr(new_obj(world, "pipeline layout", State::Plain))
}

unsafe extern "C" fn device_create_compute_pipeline(
    device: WGPUDevice,
    desc: *const WGPUComputePipelineDescriptor,
) -> WGPUComputePipeline {
    let world = &obj(device.as_ptr()).world;
    let Some(desc) = desc.as_ref() else {
        return WGPUComputePipeline::null();
    };
    if desc.compute.module.is_null() {
        return WGPUComputePipeline::null();
    }
    {
        let mut recorded = world.recorded.lock();
        recorded.entry_point = Some(view_string(desc.compute.entryPoint));
        recorded.pipeline_has_layout = Some(!desc.layout.is_null());
        recorded.constants = native_slice(desc.compute.constants, desc.compute.constantCount)
            .iter()
            .map(|constant| (view_string(constant.key).unwrap_or_default(), constant.value))
            .collect();
    }
    WGPUComputePipeline::from_ptr(new_obj(world, "compute pipeline", State::Plain))
}

unsafe extern "C" fn device_create_render_pipeline(
    device: WGPUDevice,
    desc: *const WGPURenderPipelineDescriptor,
) -> WGPURenderPipeline {
    let world = &obj(device.as_ptr()).world;
    let Some(desc) = desc.as_ref() else {
        return WGPURenderPipeline::null();
    };
    if desc.vertex.module.is_null() {
        return WGPURenderPipeline::null();
    }
    let vertex_buffers = native_slice(desc.vertex.buffers, desc.vertex.bufferCount)
        .iter()
        .map(|layout| VertexBufferRecord {
            stride: layout.arrayStride,
            step_mode: layout.stepMode,
            attributes: native_slice(layout.attributes, layout.attributeCount)
                .iter()
                .map(|attribute| (attribute.format, attribute.offset, attribute.shaderLocation))
                .collect(),
        })
        .collect();
    let depth_stencil = desc
        .depthStencil
        .as_ref()
        .map(|state| (state.format, state.depthWriteEnabled, state.depthCompare));
    let fragment = desc.fragment.as_ref();
    let targets = fragment
        .map(|fragment| native_slice(fragment.targets, fragment.targetCount))
        .unwrap_or_default()
        .iter()
        .map(|target| TargetRecord {
            format: target.format,
            blend: target
                .blend
                .as_ref()
                .map(|blend| (blend.color.operation, blend.color.srcFactor, blend.color.dstFactor)),
            write_mask: target.writeMask,
        })
        .collect();
    world.recorded.lock().render_pipeline = Some(RenderPipelineRecord {
        label: view_string(desc.label),
        vertex_entry: view_string(desc.vertex.entryPoint),
        vertex_buffers,
        topology: desc.primitive.topology,
        cull_mode: desc.primitive.cullMode,
        depth_stencil,
        sample_count: desc.multisample.count,
        fragment_entry: fragment.map(|fragment| view_string(fragment.entryPoint)),
        targets,
    });
    WGPURenderPipeline::from_ptr(new_obj(world, "render pipeline", State::Plain))
}

unsafe extern "C" fn device_create_render_bundle_encoder(
    device: WGPUDevice,
    desc: *const WGPURenderBundleEncoderDescriptor,
) -> WGPURenderBundleEncoder {
    let world = &obj(device.as_ptr()).world;
    let Some(desc) = desc.as_ref() else {
        return WGPURenderBundleEncoder::null();
    };
    world.recorded.lock().bundle_encoder = Some((
        native_slice(desc.colorFormats, desc.colorFormatCount).to_vec(),
        desc.depthStencilFormat,
        desc.sampleCount,
    ));
    WGPURenderBundleEncoder::from_ptr(new_obj(world, "render bundle encoder", State::Draws(Vec::new())))
}

/// Most queries a fake query set holds.
pub const MAX_QUERIES: u32 = 4096;

unsafe extern "C" fn device_create_query_set(device: WGPUDevice, desc: *const WGPUQuerySetDescriptor) -> WGPUQuerySet {
    let world = &obj(device.as_ptr()).world;
    let Some(desc) = desc.as_ref() else {
        return WGPUQuerySet::null();
    };
    if desc.count > MAX_QUERIES {
        return WGPUQuerySet::null();
    }
    let state = State::QuerySet {
        ty: desc.type_,
        count: desc.count,
    };
    WGPUQuerySet::from_ptr(new_obj(world, "query set", state))
}

unsafe extern "C" fn device_create_command_encoder(
    device: WGPUDevice,
    _desc: *const WGPUCommandEncoderDescriptor,
) -> WGPUCommandEncoder {
    let world = &obj(device.as_ptr()).world;
    WGPUCommandEncoder::from_ptr(new_obj(world, "command encoder", State::Commands(Vec::new())))
}

unsafe extern "C" fn device_get_queue(device: WGPUDevice) -> WGPUQueue {
    let world = &obj(device.as_ptr()).world;
    WGPUQueue::from_ptr(new_obj(world, "queue", State::Plain))
}

unsafe extern "C" fn device_has_feature(device: WGPUDevice, feature: WGPUEnum) -> WGPUBool {
    with_device(device, |state| state.features.contains(&feature)).unwrap_or(false) as WGPUBool
}

unsafe extern "C" fn device_push_error_scope(device: WGPUDevice, filter: WGPUEnum) {
    with_device(device, |state| state.scopes.push((filter, None)));
}

unsafe extern "C" fn device_pop_error_scope(device: WGPUDevice, info: WGPUPopErrorScopeCallbackInfo) -> WGPUFuture {
    let world = obj(device.as_ptr()).world.clone();
    let delivery = world.delivery.lock().clone();
    // A rejected pop leaves the stack alone.
    let scope = if delivery == Delivery::Reject {
        None
    } else {
        with_device(device, |state| state.scopes.pop()).flatten()
    };

    let info = Sendable(info);
    world.issue(move |outcome| {
        let info = info.take();
        let Some(callback) = info.callback else {
            return;
        };
        let (status, error_type, message) = match (outcome, scope) {
            (Outcome::Fail(message), _) => (WGPUPopErrorScopeStatus_InstanceDropped, 0, message),
            (_, None) => (
                WGPUPopErrorScopeStatus_EmptyStack,
                0,
                "no error scope to pop".to_string(),
            ),
            (_, Some((_, None))) => (WGPUPopErrorScopeStatus_Success, WGPUErrorType_NoError, String::new()),
            (_, Some((_, Some((error_type, message))))) => (WGPUPopErrorScopeStatus_Success, error_type, message),
        };
        unsafe { callback(status, error_type, view_of(&message), info.userdata1, info.userdata2) };
    })
}

unsafe extern "C" fn device_poll(device: WGPUDevice, _wait: WGPUBool, _index: *const WGPUSubmissionIndex) -> WGPUBool {
    obj(device.as_ptr()).world.run_deferred();
    WGPU_TRUE
}

unsafe extern "C" fn device_destroy(device: WGPUDevice) {
    fire_lost(device, WGPUDeviceLostReason_Destroyed, "device destroyed");
}

// ============================================================================
// Queue
// ============================================================================

unsafe fn with_buffer<R>(buffer: usize, f: impl FnOnce(&mut BufferState) -> R) -> Option<R> {
    let obj = obj(buffer as *mut c_void);
    let mut state = obj.state.lock();
    match &mut *state {
        State::Buffer(buffer) => Some(f(buffer)),
        _ => None,
    }
}

unsafe fn with_texture<R>(texture: WGPUTexture, f: impl FnOnce(&mut TextureState) -> R) -> Option<R> {
    let obj = obj(texture.as_ptr());
    let mut state = obj.state.lock();
    match &mut *state {
        State::Texture(texture) => Some(f(texture)),
        _ => None,
    }
}

/// Byte offset of texel `(x, y, z)` of a copy in linear memory.
fn linear_offset(layout: WGPUTexelCopyBufferLayout, size: WGPUExtent3D, x: u32, y: u32, z: u32) -> usize {
    let row = match layout.bytesPerRow {
        WGPU_COPY_STRIDE_UNDEFINED => size.width as usize * TEXEL,
        bytes => bytes as usize,
    };
    let rows = match layout.rowsPerImage {
        WGPU_COPY_STRIDE_UNDEFINED => size.height as usize,
        rows => rows as usize,
    };
    layout.offset as usize + (z as usize * rows + y as usize) * row + x as usize * TEXEL
}

fn texels(size: WGPUExtent3D) -> impl Iterator<Item = (u32, u32, u32)> {
    (0..size.depthOrArrayLayers)
        .flat_map(move |z| (0..size.height).flat_map(move |y| (0..size.width).map(move |x| (x, y, z))))
}

unsafe fn read_texel(info: &WGPUTexelCopyTextureInfo, x: u32, y: u32, z: u32) -> Option<Vec<u8>> {
    with_texture(info.texture, |state| {
        let at = texel_index(state, info, x, y, z)?;
        Some(state.data[at..at + TEXEL].to_vec())
    })
    .flatten()
}

unsafe fn write_texel(info: &WGPUTexelCopyTextureInfo, x: u32, y: u32, z: u32, texel: &[u8]) {
    with_texture(info.texture, |state| {
        if let Some(at) = texel_index(state, info, x, y, z) {
            state.data[at..at + TEXEL].copy_from_slice(texel);
        }
    });
}

fn texel_index(state: &TextureState, info: &WGPUTexelCopyTextureInfo, x: u32, y: u32, z: u32) -> Option<usize> {
    let (x, y, z) = (info.origin.x + x, info.origin.y + y, info.origin.z + z);
    if info.mipLevel != 0 || x >= state.width || y >= state.height || z >= state.layers {
        return None;
    }
    Some(((z as usize * state.height as usize + y as usize) * state.width as usize + x as usize) * TEXEL)
}

unsafe fn read_linear(buffer: WGPUBuffer, at: usize) -> Option<Vec<u8>> {
    with_buffer(buffer.addr(), |state| state.data.get(at..at + TEXEL).map(<[u8]>::to_vec)).flatten()
}

unsafe fn write_linear(buffer: WGPUBuffer, at: usize, texel: &[u8]) {
    with_buffer(buffer.addr(), |state| {
        if let Some(target) = state.data.get_mut(at..at + TEXEL) {
            target.copy_from_slice(texel);
        }
    });
}

unsafe fn execute(command: Command) {
    match command {
        Command::BufferToTexture { src, dst, size } => {
            for (x, y, z) in texels(size) {
                if let Some(texel) = read_linear(src.buffer, linear_offset(src.layout, size, x, y, z)) {
                    write_texel(&dst, x, y, z, &texel);
                }
            }
        }
        Command::TextureToBuffer { src, dst, size } => {
            for (x, y, z) in texels(size) {
                if let Some(texel) = read_texel(&src, x, y, z) {
                    write_linear(dst.buffer, linear_offset(dst.layout, size, x, y, z), &texel);
                }
            }
        }
        Command::TextureToTexture { src, dst, size } => {
            for (x, y, z) in texels(size) {
                if let Some(texel) = read_texel(&src, x, y, z) {
                    write_texel(&dst, x, y, z, &texel);
                }
            }
        }
        Command::Resolve {
            first,
            count,
            dst,
            offset,
        } => {
            // The fake result of query `i` is `i + 1`.
            with_buffer(dst, |state| {
                for i in 0..count {
                    let at = offset as usize + i as usize * 8;
                    let value = (first + i) as u64 + 1;
                    if let Some(target) = state.data.get_mut(at..at + 8) {
                        target.copy_from_slice(&value.to_le_bytes());
                    }
                }
            });
        }
        Command::Copy {
            src,
            src_offset,
            dst,
            dst_offset,
            size,
        } => {
            let (from, to) = (src_offset as usize, (src_offset + size) as usize);
            let Some(bytes) = with_buffer(src, |state| state.data[from..to].to_vec()) else {
                return;
            };
            with_buffer(dst, |state| {
                let start = dst_offset as usize;
                state.data[start..start + bytes.len()].copy_from_slice(&bytes);
            });
        }
        Command::Clear { buffer, offset, size } => {
            with_buffer(buffer, |state| {
                let start = offset as usize;
                let end = if size == WGPU_WHOLE_SIZE {
                    state.data.len()
                } else {
                    start + size as usize
                };
                state.data[start..end].fill(0);
            });
        }
    }
}

unsafe extern "C" fn queue_submit(queue: WGPUQueue, count: usize, commands: *const WGPUCommandBuffer) {
    let world = &obj(queue.as_ptr()).world;
    world.recorded.lock().submitted.push(count);
    for buffer in native_slice(commands, count) {
        let recorded = match &mut *obj(buffer.as_ptr()).state.lock() {
            State::Commands(commands) => std::mem::take(commands),
            _ => Vec::new(),
        };
        for command in recorded {
            execute(command);
        }
    }
}

unsafe extern "C" fn queue_write_buffer(
    _queue: WGPUQueue,
    buffer: WGPUBuffer,
    offset: u64,
    data: *const c_void,
    size: usize,
) {
    let bytes = native_slice(data.cast::<u8>(), size).to_vec();
    with_buffer(buffer.addr(), |state| {
        let start = offset as usize;
        state.data[start..start + bytes.len()].copy_from_slice(&bytes);
    });
}

unsafe extern "C" fn queue_write_texture(
    _queue: WGPUQueue,
    destination: *const WGPUTexelCopyTextureInfo,
    data: *const c_void,
    data_size: usize,
    data_layout: *const WGPUTexelCopyBufferLayout,
    write_size: *const WGPUExtent3D,
) {
    let (Some(dst), Some(layout), Some(size)) = (destination.as_ref(), data_layout.as_ref(), write_size.as_ref()) else {
        return;
    };
    let bytes = native_slice(data.cast::<u8>(), data_size);
    for (x, y, z) in texels(*size) {
        let at = linear_offset(*layout, *size, x, y, z);
        if let Some(texel) = bytes.get(at..at + TEXEL) {
            write_texel(dst, x, y, z, texel);
        }
    }
}

unsafe extern "C" fn queue_on_submitted_work_done(queue: WGPUQueue, info: WGPUQueueWorkDoneCallbackInfo) -> WGPUFuture {
    let world = obj(queue.as_ptr()).world.clone();
    let info = Sendable(info);
    world.issue(move |outcome| {
        let info = info.take();
        let Some(callback) = info.callback else {
            return;
        };
        let status = match outcome {
            Outcome::Fail(_) => WGPUQueueWorkDoneStatus_Error,
            _ => WGPUQueueWorkDoneStatus_Success,
        };
        unsafe { callback(status, info.userdata1, info.userdata2) };
    })
}

// ============================================================================
// Buffer
// ============================================================================

unsafe extern "C" fn buffer_map_async(
    buffer: WGPUBuffer,
    _mode: WGPUFlags,
    _offset: usize,
    _size: usize,
    info: WGPUBufferMapCallbackInfo,
) -> WGPUFuture {
    let world = obj(buffer.as_ptr()).world.clone();
    if *world.delivery.lock() != Delivery::Reject {
        with_buffer(buffer.addr(), |state| state.pending = true);
    }

    let info = Sendable(info);
    let target = buffer.addr();
    world.issue(move |outcome| {
        let info = info.take();
        let status = match &outcome {
            Outcome::Fail(_) => WGPUMapAsyncStatus_Error,
            _ => WGPUMapAsyncStatus_Success,
        };
        unsafe {
            with_buffer(target, |state| {
                state.pending = false;
                state.mapped = status == WGPUMapAsyncStatus_Success;
            })
        };
        let Some(callback) = info.callback else {
            return;
        };
        let message = match outcome {
            Outcome::Fail(message) => message,
            _ => String::new(),
        };
        unsafe { callback(status, view_of(&message), info.userdata1, info.userdata2) };
    })
}

unsafe fn mapped_ptr(buffer: WGPUBuffer, offset: usize, size: usize) -> *mut c_void {
    with_buffer(buffer.addr(), |state| {
        let len = state.data.len();
        let size = if size == WGPU_WHOLE_MAP_SIZE {
            len.saturating_sub(offset)
        } else {
            size
        };
        if !state.mapped || offset + size > len {
            return ptr::null_mut();
        }
        state.data.as_mut_ptr().add(offset).cast::<c_void>()
    })
    .unwrap_or(ptr::null_mut())
}

unsafe extern "C" fn buffer_get_mapped_range(buffer: WGPUBuffer, offset: usize, size: usize) -> *mut c_void {
    mapped_ptr(buffer, offset, size)
}

unsafe extern "C" fn buffer_get_const_mapped_range(buffer: WGPUBuffer, offset: usize, size: usize) -> *const c_void {
    mapped_ptr(buffer, offset, size)
}

unsafe extern "C" fn buffer_unmap(buffer: WGPUBuffer) {
    with_buffer(buffer.addr(), |state| state.mapped = false);
}

unsafe extern "C" fn buffer_get_size(buffer: WGPUBuffer) -> u64 {
    with_buffer(buffer.addr(), |state| state.data.len() as u64).unwrap_or(0)
}

unsafe extern "C" fn buffer_get_usage(buffer: WGPUBuffer) -> WGPUFlags {
    with_buffer(buffer.addr(), |state| state.usage).unwrap_or(0)
}

unsafe extern "C" fn buffer_get_map_state(buffer: WGPUBuffer) -> WGPUEnum {
    with_buffer(buffer.addr(), |state| match (state.mapped, state.pending) {
        (true, _) => 3,
        (false, true) => 2,
        (false, false) => 1,
    })
    .unwrap_or(1)
}

unsafe extern "C" fn buffer_destroy(buffer: WGPUBuffer) {
    with_buffer(buffer.addr(), |state| state.mapped = false);
}

// ============================================================================
// Textures
// ============================================================================

unsafe extern "C" fn texture_create_view(texture: WGPUTexture, desc: *const WGPUTextureViewDescriptor) -> WGPUTextureView {
    let world = &obj(texture.as_ptr()).world;
    if let Some(desc) = desc.as_ref() {
        world.recorded.lock().view_counts = Some((desc.mipLevelCount, desc.arrayLayerCount));
    }
    WGPUTextureView::from_ptr(new_obj(world, "texture view", State::Plain))
}

unsafe extern "C" fn texture_get_width(texture: WGPUTexture) -> u32 {
    with_texture(texture, |state| state.width).unwrap_or(0)
}

unsafe extern "C" fn texture_get_height(texture: WGPUTexture) -> u32 {
    with_texture(texture, |state| state.height).unwrap_or(0)
}

unsafe extern "C" fn texture_get_depth_or_array_layers(texture: WGPUTexture) -> u32 {
    with_texture(texture, |state| state.layers).unwrap_or(0)
}

unsafe extern "C" fn texture_get_mip_level_count(texture: WGPUTexture) -> u32 {
    with_texture(texture, |state| state.mips).unwrap_or(0)
}

unsafe extern "C" fn texture_get_sample_count(texture: WGPUTexture) -> u32 {
    with_texture(texture, |state| state.samples).unwrap_or(0)
}

unsafe extern "C" fn texture_get_dimension(texture: WGPUTexture) -> WGPUEnum {
    with_texture(texture, |state| state.dimension).unwrap_or(0)
}

unsafe extern "C" fn texture_get_format(texture: WGPUTexture) -> WGPUEnum {
    with_texture(texture, |state| state.format).unwrap_or(0)
}

unsafe extern "C" fn texture_get_usage(texture: WGPUTexture) -> WGPUFlags {
    with_texture(texture, |state| state.usage).unwrap_or(0)
}

unsafe extern "C" fn texture_destroy(_texture: WGPUTexture) {}

unsafe extern "C" fn compute_pipeline_get_bind_group_layout(
    pipeline: WGPUComputePipeline,
    index: u32,
) -> WGPUBindGroupLayout {
    if index > 3 {
        return WGPUBindGroupLayout::null();
    }
    let world = &obj(pipeline.as_ptr()).world;
    WGPUBindGroupLayout::from_ptr(new_obj(world, "bind group layout", State::Plain))
}

unsafe extern "C" fn render_pipeline_get_bind_group_layout(
    pipeline: WGPURenderPipeline,
    index: u32,
) -> WGPUBindGroupLayout {
    if index > 3 {
        return WGPUBindGroupLayout::null();
    }
    let world = &obj(pipeline.as_ptr()).world;
    WGPUBindGroupLayout::from_ptr(new_obj(world, "bind group layout", State::Plain))
}

unsafe extern "C" fn query_set_get_type(query_set: WGPUQuerySet) -> WGPUEnum {
    match &*obj(query_set.as_ptr()).state.lock() {
        State::QuerySet { ty, .. } => *ty,
        _ => 0,
    }
}

unsafe extern "C" fn query_set_get_count(query_set: WGPUQuerySet) -> u32 {
    match &*obj(query_set.as_ptr()).state.lock() {
        State::QuerySet { count, .. } => *count,
        _ => 0,
    }
}

unsafe extern "C" fn query_set_destroy(_query_set: WGPUQuerySet) {}

// ============================================================================
// Commands
// ============================================================================

unsafe fn record(encoder: usize, command: Command) {
    if let State::Commands(commands) = &mut *obj(encoder as *mut c_void).state.lock() {
        commands.push(command);
    }
}

unsafe extern "C" fn command_encoder_begin_compute_pass(
    encoder: WGPUCommandEncoder,
    desc: *const WGPUComputePassDescriptor,
) -> WGPUComputePassEncoder {
    let world = &obj(encoder.as_ptr()).world;
    let label = desc.as_ref().and_then(|desc| view_string(desc.label));
    world.recorded.lock().pass_labels.push(label);
    let state = State::Pass {
        encoder: encoder.addr(),
    };
    WGPUComputePassEncoder::from_ptr(new_obj(world, "compute pass encoder", state))
}

unsafe extern "C" fn command_encoder_copy_buffer_to_buffer(
    encoder: WGPUCommandEncoder,
    source: WGPUBuffer,
    source_offset: u64,
    destination: WGPUBuffer,
    destination_offset: u64,
    size: u64,
) {
    record(
        encoder.addr(),
        Command::Copy {
            src: source.addr(),
            src_offset: source_offset,
            dst: destination.addr(),
            dst_offset: destination_offset,
            size,
        },
    );
}

unsafe extern "C" fn command_encoder_clear_buffer(encoder: WGPUCommandEncoder, buffer: WGPUBuffer, offset: u64, size: u64) {
    record(
        encoder.addr(),
        Command::Clear {
            buffer: buffer.addr(),
            offset,
            size,
        },
    );
}

unsafe extern "C" fn command_encoder_begin_render_pass(
    encoder: WGPUCommandEncoder,
    desc: *const WGPURenderPassDescriptor,
) -> WGPURenderPassEncoder {
    let world = &obj(encoder.as_ptr()).world;
    let Some(desc) = desc.as_ref() else {
        return WGPURenderPassEncoder::null();
    };
    let colors = native_slice(desc.colorAttachments, desc.colorAttachmentCount)
        .iter()
        .map(|attachment| ColorAttachmentRecord {
            view: attachment.view.addr(),
            resolve_target: attachment.resolveTarget.addr(),
            depth_slice: attachment.depthSlice,
            load_op: attachment.loadOp,
            store_op: attachment.storeOp,
            clear: [
                attachment.clearValue.r,
                attachment.clearValue.g,
                attachment.clearValue.b,
                attachment.clearValue.a,
            ],
        })
        .collect();
    let depth = desc.depthStencilAttachment.as_ref().map(|attachment| {
        (
            attachment.view.addr(),
            attachment.depthLoadOp,
            attachment.depthClearValue,
            attachment.depthReadOnly,
        )
    });
    world.recorded.lock().render_passes.push(RenderPassRecord {
        label: view_string(desc.label),
        colors,
        depth,
        occlusion_query_set: desc.occlusionQuerySet.addr(),
    });
    let state = State::Pass {
        encoder: encoder.addr(),
    };
    WGPURenderPassEncoder::from_ptr(new_obj(world, "render pass encoder", state))
}

unsafe extern "C" fn command_encoder_copy_buffer_to_texture(
    encoder: WGPUCommandEncoder,
    source: *const WGPUTexelCopyBufferInfo,
    destination: *const WGPUTexelCopyTextureInfo,
    copy_size: *const WGPUExtent3D,
) {
    if let (Some(src), Some(dst), Some(size)) = (source.as_ref(), destination.as_ref(), copy_size.as_ref()) {
        record(
            encoder.addr(),
            Command::BufferToTexture {
                src: *src,
                dst: *dst,
                size: *size,
            },
        );
    }
}

unsafe extern "C" fn command_encoder_copy_texture_to_buffer(
    encoder: WGPUCommandEncoder,
    source: *const WGPUTexelCopyTextureInfo,
    destination: *const WGPUTexelCopyBufferInfo,
    copy_size: *const WGPUExtent3D,
) {
    if let (Some(src), Some(dst), Some(size)) = (source.as_ref(), destination.as_ref(), copy_size.as_ref()) {
        record(
            encoder.addr(),
            Command::TextureToBuffer {
                src: *src,
                dst: *dst,
                size: *size,
            },
        );
    }
}

unsafe extern "C" fn command_encoder_copy_texture_to_texture(
    encoder: WGPUCommandEncoder,
    source: *const WGPUTexelCopyTextureInfo,
    destination: *const WGPUTexelCopyTextureInfo,
    copy_size: *const WGPUExtent3D,
) {
    if let (Some(src), Some(dst), Some(size)) = (source.as_ref(), destination.as_ref(), copy_size.as_ref()) {
        record(
            encoder.addr(),
            Command::TextureToTexture {
                src: *src,
                dst: *dst,
                size: *size,
            },
        );
    }
}

unsafe extern "C" fn command_encoder_resolve_query_set(
    encoder: WGPUCommandEncoder,
    _query_set: WGPUQuerySet,
    first_query: u32,
    query_count: u32,
    destination: WGPUBuffer,
    destination_offset: u64,
) {
    record(
        encoder.addr(),
        Command::Resolve {
            first: first_query,
            count: query_count,
            dst: destination.addr(),
            offset: destination_offset,
        },
    );
}

unsafe extern "C" fn command_encoder_finish(
    encoder: WGPUCommandEncoder,
    _desc: *const WGPUCommandBufferDescriptor,
) -> WGPUCommandBuffer {
    let obj = obj(encoder.as_ptr());
    let commands = match &mut *obj.state.lock() {
        State::Commands(commands) => std::mem::take(commands),
        _ => Vec::new(),
    };
    WGPUCommandBuffer::from_ptr(new_obj(&obj.world, "command buffer", State::Commands(commands)))
}

unsafe extern "C" fn compute_pass_set_pipeline(_pass: WGPUComputePassEncoder, _pipeline: WGPUComputePipeline) {}

unsafe extern "C" fn compute_pass_set_bind_group(
    pass: WGPUComputePassEncoder,
    _index: u32,
    _group: WGPUBindGroup,
    count: usize,
    offsets: *const u32,
) {
    let world = &obj(pass.as_ptr()).world;
    world.recorded.lock().dynamic_offsets = native_slice(offsets, count).to_vec();
}

unsafe extern "C" fn compute_pass_dispatch_workgroups(pass: WGPUComputePassEncoder, x: u32, y: u32, z: u32) {
    let world = &obj(pass.as_ptr()).world;
    world.recorded.lock().dispatches.push((x, y, z));
}

unsafe extern "C" fn compute_pass_end(_pass: WGPUComputePassEncoder) {}

// ============================================================================
// Render passes and bundles
// ============================================================================

unsafe fn recorded_of<'a>(handle: *mut c_void) -> MutexGuard<'a, Recorded> {
    obj(handle).world.recorded.lock()
}

/// Pass draws are recorded directly; bundle draws stay with the bundle until
/// it is executed.
unsafe fn push_draw(handle: *mut c_void, draw: DrawRecord) {
    let obj = obj(handle);
    if let State::Draws(draws) = &mut *obj.state.lock() {
        draws.push(draw);
        return;
    }
    obj.world.recorded.lock().draws.push(draw);
}

macro_rules! draw_fns {
    (
        $handle:ty,
        $set_pipeline:ident,
        $set_bind_group:ident,
        $set_vertex_buffer:ident,
        $set_index_buffer:ident,
        $draw:ident,
        $draw_indexed:ident
    ) => {
        unsafe extern "C" fn $set_pipeline(_encoder: $handle, _pipeline: WGPURenderPipeline) {}

        unsafe extern "C" fn $set_bind_group(
            encoder: $handle,
            _index: u32,
            _group: WGPUBindGroup,
            count: usize,
            offsets: *const u32,
        ) {
            recorded_of(encoder.as_ptr()).dynamic_offsets = native_slice(offsets, count).to_vec();
        }

        unsafe extern "C" fn $set_vertex_buffer(encoder: $handle, slot: u32, buffer: WGPUBuffer, offset: u64, size: u64) {
            recorded_of(encoder.as_ptr())
                .vertex_buffers
                .push((slot, buffer.addr(), offset, size));
        }

        unsafe extern "C" fn $set_index_buffer(
            encoder: $handle,
            buffer: WGPUBuffer,
            format: WGPUEnum,
            offset: u64,
            size: u64,
        ) {
            recorded_of(encoder.as_ptr()).index_buffer = Some((buffer.addr(), format, offset, size));
        }

        unsafe extern "C" fn $draw(
            encoder: $handle,
            vertices: u32,
            instances: u32,
            first_vertex: u32,
            first_instance: u32,
        ) {
            push_draw(
                encoder.as_ptr(),
                DrawRecord::Draw {
                    vertices,
                    instances,
                    first_vertex,
                    first_instance,
                },
            );
        }

        unsafe extern "C" fn $draw_indexed(
            encoder: $handle,
            indices: u32,
            instances: u32,
            first_index: u32,
            base_vertex: i32,
            first_instance: u32,
        ) {
            push_draw(
                encoder.as_ptr(),
                DrawRecord::Indexed {
                    indices,
                    instances,
                    first_index,
                    base_vertex,
                    first_instance,
                },
            );
        }
    };
}

draw_fns!(
    WGPURenderPassEncoder,
    render_pass_set_pipeline,
    render_pass_set_bind_group,
    render_pass_set_vertex_buffer,
    render_pass_set_index_buffer,
    render_pass_draw,
    render_pass_draw_indexed
);

draw_fns!(
    WGPURenderBundleEncoder,
    render_bundle_encoder_set_pipeline,
    render_bundle_encoder_set_bind_group,
    render_bundle_encoder_set_vertex_buffer,
    render_bundle_encoder_set_index_buffer,
    render_bundle_encoder_draw,
    render_bundle_encoder_draw_indexed
);

unsafe extern "C" fn render_pass_set_viewport(
    pass: WGPURenderPassEncoder,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    min_depth: f32,
    max_depth: f32,
) {
    recorded_of(pass.as_ptr()).viewport = Some([x, y, width, height, min_depth, max_depth]);
}

unsafe extern "C" fn render_pass_set_scissor_rect(pass: WGPURenderPassEncoder, x: u32, y: u32, width: u32, height: u32) {
    recorded_of(pass.as_ptr()).scissor = Some([x, y, width, height]);
}

unsafe extern "C" fn render_pass_set_blend_constant(pass: WGPURenderPassEncoder, color: *const WGPUColor) {
    if let Some(color) = color.as_ref() {
        recorded_of(pass.as_ptr()).blend_constant = Some([color.r, color.g, color.b, color.a]);
    }
}

unsafe extern "C" fn render_pass_set_stencil_reference(pass: WGPURenderPassEncoder, reference: u32) {
    recorded_of(pass.as_ptr()).stencil_reference = Some(reference);
}

unsafe extern "C" fn render_pass_begin_occlusion_query(pass: WGPURenderPassEncoder, index: u32) {
    recorded_of(pass.as_ptr()).occlusion_queries.push(index);
}

unsafe extern "C" fn render_pass_end_occlusion_query(_pass: WGPURenderPassEncoder) {}

unsafe extern "C" fn render_pass_execute_bundles(
    pass: WGPURenderPassEncoder,
    count: usize,
    bundles: *const WGPURenderBundle,
) {
    for bundle in native_slice(bundles, count) {
        let draws = match &*obj(bundle.as_ptr()).state.lock() {
            State::Draws(draws) => draws.clone(),
            _ => Vec::new(),
        };
        let mut recorded = recorded_of(pass.as_ptr());
        recorded.executed_bundles.push(bundle.addr());
        recorded.draws.extend(draws);
    }
}

unsafe extern "C" fn render_pass_end(_pass: WGPURenderPassEncoder) {}

unsafe extern "C" fn render_bundle_encoder_finish(
    encoder: WGPURenderBundleEncoder,
    _desc: *const WGPURenderBundleDescriptor,
) -> WGPURenderBundle {
    let obj = obj(encoder.as_ptr());
    let draws = match &mut *obj.state.lock() {
        State::Draws(draws) => std::mem::take(draws),
        _ => Vec::new(),
    };
    WGPURenderBundle::from_ptr(new_obj(&obj.world, "render bundle", State::Draws(draws)))
}

// ============================================================================
// Releases
// ============================================================================

macro_rules! release_fns {
    ($( $name:ident($handle:ty); )*) => {
        $(
            unsafe extern "C" fn $name(handle: $handle) {
                release(handle.as_ptr());
            }
        )*
    };
}

release_fns! {
    instance_release(WGPUInstance);
    adapter_release(WGPUAdapter);
    device_release(WGPUDevice);
    queue_release(WGPUQueue);
    buffer_release(WGPUBuffer);
    texture_release(WGPUTexture);
    texture_view_release(WGPUTextureView);
    sampler_release(WGPUSampler);
    shader_module_release(WGPUShaderModule);
    bind_group_layout_release(WGPUBindGroupLayout);
    bind_group_release(WGPUBindGroup);
    pipeline_layout_release(WGPUPipelineLayout);
    compute_pipeline_release(WGPUComputePipeline);
    render_pipeline_release(WGPURenderPipeline);
    query_set_release(WGPUQuerySet);
    command_encoder_release(WGPUCommandEncoder);
    compute_pass_release(WGPUComputePassEncoder);
    render_pass_release(WGPURenderPassEncoder);
    render_bundle_encoder_release(WGPURenderBundleEncoder);
    render_bundle_release(WGPURenderBundle);
    command_buffer_release(WGPUCommandBuffer);
}

/// Entry-point table backed by the fake.
pub fn procs() -> NativeProcs {
    NativeProcs {
        get_version: Some(get_version),
        set_log_callback: Some(set_log_callback),
        set_log_level: Some(set_log_level),
        create_instance: Some(create_instance),
        instance_process_events: Some(instance_process_events),
        instance_request_adapter: Some(instance_request_adapter),
        instance_release: Some(instance_release),
        adapter_get_info: Some(adapter_get_info),
        adapter_info_free_members: Some(adapter_info_free_members),
        adapter_has_feature: Some(adapter_has_feature),
        adapter_request_device: Some(adapter_request_device),
        adapter_release: Some(adapter_release),
        device_create_buffer: Some(device_create_buffer),
        device_create_texture: Some(device_create_texture),
        device_create_sampler: Some(device_create_sampler),
        device_create_shader_module: Some(device_create_shader_module),
        device_create_bind_group_layout: Some(device_create_bind_group_layout),
        device_create_bind_group: Some(device_create_bind_group),
        device_create_pipeline_layout: Some(device_create_pipeline_layout),
        device_create_compute_pipeline: Some(device_create_compute_pipeline),
        device_create_render_pipeline: Some(device_create_render_pipeline),
        device_create_render_bundle_encoder: Some(device_create_render_bundle_encoder),
        device_create_query_set: Some(device_create_query_set),
        device_create_command_encoder: Some(device_create_command_encoder),
        device_get_queue: Some(device_get_queue),
        device_has_feature: Some(device_has_feature),
        device_push_error_scope: Some(device_push_error_scope),
        device_pop_error_scope: Some(device_pop_error_scope),
        device_poll: Some(device_poll),
        device_destroy: Some(device_destroy),
        device_release: Some(device_release),
        queue_submit: Some(queue_submit),
        queue_write_buffer: Some(queue_write_buffer),
        queue_write_texture: Some(queue_write_texture),
        queue_on_submitted_work_done: Some(queue_on_submitted_work_done),
        queue_release: Some(queue_release),
        buffer_map_async: Some(buffer_map_async),
        buffer_get_mapped_range: Some(buffer_get_mapped_range),
        buffer_get_const_mapped_range: Some(buffer_get_const_mapped_range),
        buffer_unmap: Some(buffer_unmap),
        buffer_get_size: Some(buffer_get_size),
        buffer_get_usage: Some(buffer_get_usage),
        buffer_get_map_state: Some(buffer_get_map_state),
        buffer_destroy: Some(buffer_destroy),
        buffer_release: Some(buffer_release),
        texture_create_view: Some(texture_create_view),
        texture_get_width: Some(texture_get_width),
        texture_get_height: Some(texture_get_height),
        texture_get_format: Some(texture_get_format),
        texture_get_depth_or_array_layers: Some(texture_get_depth_or_array_layers),
        texture_get_mip_level_count: Some(texture_get_mip_level_count),
        texture_get_sample_count: Some(texture_get_sample_count),
        texture_get_dimension: Some(texture_get_dimension),
        texture_get_usage: Some(texture_get_usage),
        texture_destroy: Some(texture_destroy),
        texture_release: Some(texture_release),
        texture_view_release: Some(texture_view_release),
        sampler_release: Some(sampler_release),
        shader_module_release: Some(shader_module_release),
        bind_group_layout_release: Some(bind_group_layout_release),
        bind_group_release: Some(bind_group_release),
        pipeline_layout_release: Some(pipeline_layout_release),
        compute_pipeline_get_bind_group_layout: Some(compute_pipeline_get_bind_group_layout),
        compute_pipeline_release: Some(compute_pipeline_release),
        render_pipeline_get_bind_group_layout: Some(render_pipeline_get_bind_group_layout),
        render_pipeline_release: Some(render_pipeline_release),
        query_set_get_type: Some(query_set_get_type),
        query_set_get_count: Some(query_set_get_count),
        query_set_destroy: Some(query_set_destroy),
        query_set_release: Some(query_set_release),
        command_encoder_begin_compute_pass: Some(command_encoder_begin_compute_pass),
        command_encoder_copy_buffer_to_buffer: Some(command_encoder_copy_buffer_to_buffer),
        command_encoder_clear_buffer: Some(command_encoder_clear_buffer),
        command_encoder_begin_render_pass: Some(command_encoder_begin_render_pass),
        command_encoder_copy_buffer_to_texture: Some(command_encoder_copy_buffer_to_texture),
        command_encoder_copy_texture_to_buffer: Some(command_encoder_copy_texture_to_buffer),
        command_encoder_copy_texture_to_texture: Some(command_encoder_copy_texture_to_texture),
        command_encoder_resolve_query_set: Some(command_encoder_resolve_query_set),
        command_encoder_finish: Some(command_encoder_finish),
        command_encoder_release: Some(command_encoder_release),
        compute_pass_set_pipeline: Some(compute_pass_set_pipeline),
        compute_pass_set_bind_group: Some(compute_pass_set_bind_group),
        compute_pass_dispatch_workgroups: Some(compute_pass_dispatch_workgroups),
        compute_pass_end: Some(compute_pass_end),
        compute_pass_release: Some(compute_pass_release),
        render_pass_set_pipeline: Some(render_pass_set_pipeline),
        render_pass_set_bind_group: Some(render_pass_set_bind_group),
        render_pass_set_vertex_buffer: Some(render_pass_set_vertex_buffer),
        render_pass_set_index_buffer: Some(render_pass_set_index_buffer),
        render_pass_set_viewport: Some(render_pass_set_viewport),
        render_pass_set_scissor_rect: Some(render_pass_set_scissor_rect),
        render_pass_set_blend_constant: Some(render_pass_set_blend_constant),
        render_pass_set_stencil_reference: Some(render_pass_set_stencil_reference),
        render_pass_draw: Some(render_pass_draw),
        render_pass_draw_indexed: Some(render_pass_draw_indexed),
        render_pass_begin_occlusion_query: Some(render_pass_begin_occlusion_query),
        render_pass_end_occlusion_query: Some(render_pass_end_occlusion_query),
        render_pass_execute_bundles: Some(render_pass_execute_bundles),
        render_pass_end: Some(render_pass_end),
        render_pass_release: Some(render_pass_release),
        render_bundle_encoder_set_pipeline: Some(render_bundle_encoder_set_pipeline),
        render_bundle_encoder_set_bind_group: Some(render_bundle_encoder_set_bind_group),
        render_bundle_encoder_set_vertex_buffer: Some(render_bundle_encoder_set_vertex_buffer),
        render_bundle_encoder_set_index_buffer: Some(render_bundle_encoder_set_index_buffer),
        render_bundle_encoder_draw: Some(render_bundle_encoder_draw),
        render_bundle_encoder_draw_indexed: Some(render_bundle_encoder_draw_indexed),
        render_bundle_encoder_finish: Some(render_bundle_encoder_finish),
        render_bundle_encoder_release: Some(render_bundle_encoder_release),
        render_bundle_release: Some(render_bundle_release),
        command_buffer_release: Some(command_buffer_release),
    }
}

// ============================================================================
// Test handle
// ============================================================================

/// One fake runtime plus a [`Library`] bound to it.
///
/// Creating a `Fake` makes it the runtime that `wgpuCreateInstance` uses on
/// the current thread.
pub struct Fake {
    world: Arc<World>,
    library: Library,
}

impl Fake {
    pub fn new() -> Self {
        Self::with_procs(|_| {})
    }

    /// Fake whose entry-point table is adjusted by `edit` first.
    pub fn with_procs(edit: impl FnOnce(&mut NativeProcs)) -> Self {
        init_logger();
        let world = Arc::new(World::default());
        CURRENT.with(|current| *current.borrow_mut() = Some(world.clone()));

        let mut table = procs();
        edit(&mut table);
        let library = Library::from_procs(
            table,
            LibraryOptions {
                warn_on_implicit_release: false,
                ..Default::default()
            },
        );
        Self { world, library }
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn set_delivery(&self, delivery: Delivery) {
        *self.world.delivery.lock() = delivery;
    }

    /// Run deferred callbacks without going through an instance.
    pub fn run_deferred(&self) -> usize {
        self.world.run_deferred()
    }

    pub fn deferred_jobs(&self) -> usize {
        self.world.deferred.lock().len()
    }

    pub fn created(&self, kind: &str) -> usize {
        self.world.created.lock().get(kind).copied().unwrap_or(0)
    }

    pub fn released(&self, kind: &str) -> usize {
        self.world.released.lock().get(kind).copied().unwrap_or(0)
    }

    /// Objects created but not yet released.
    pub fn live(&self) -> usize {
        let created: usize = self.world.created.lock().values().sum();
        let released: usize = self.world.released.lock().values().sum();
        created - released
    }

    pub fn double_released(&self) -> usize {
        self.world.double_released.load(Ordering::SeqCst)
    }

    pub fn info_frees(&self) -> usize {
        self.world.info_frees.load(Ordering::SeqCst)
    }

    pub fn recorded(&self) -> MutexGuard<'_, Recorded> {
        self.world.recorded.lock()
    }

    pub fn instance(&self) -> Instance {
        Instance::new(&self.library, &InstanceDescriptor::default()).expect("instance creation should succeed")
    }

    /// Instance, adapter and device, all requested with immediate delivery.
    pub fn device(&self) -> (Instance, Adapter, Device) {
        self.device_with(&DeviceDescriptor::default())
    }

    pub fn device_with(&self, desc: &DeviceDescriptor<'_>) -> (Instance, Adapter, Device) {
        let previous = std::mem::take(&mut *self.world.delivery.lock());
        let instance = self.instance();
        let adapter = instance
            .wait(instance.request_adapter(None).expect("request_adapter should issue"))
            .expect("adapter request should succeed");
        let device = instance
            .wait(adapter.request_device(Some(desc)).expect("request_device should issue"))
            .expect("device request should succeed");
        *self.world.delivery.lock() = previous;
        (instance, adapter, device)
    }

    /// Report a device error the way the native runtime would: to the
    /// innermost matching error scope, or else to the uncaptured handler.
    pub fn emit_error(&self, device: &Device, kind: ErrorType, message: &str) {
        self.emit_error_raw(device.raw().expect("device should be open"), kind, message);
    }

    /// [`Fake::emit_error`] on a native device that may have no open wrapper,
    /// as when its children keep it alive.
    pub fn emit_error_raw(&self, raw: WGPUDevice, kind: ErrorType, message: &str) {
        let filter = match kind {
            ErrorType::Validation => 1,
            ErrorType::OutOfMemory => 2,
            _ => 3,
        };
        let uncaptured = unsafe {
            with_device(raw, |state| {
                match state.scopes.iter_mut().rev().find(|(scope, _)| *scope == filter) {
                    Some((_, slot)) => {
                        if slot.is_none() {
                            *slot = Some((kind.to_native(), message.to_string()));
                        }
                        None
                    }
                    None => state.uncaptured,
                }
            })
        }
        .flatten();

        if let Some(info) = uncaptured {
            if let Some(callback) = info.callback {
                unsafe { callback(&raw, kind.to_native(), view_of(message), info.userdata1, info.userdata2) };
            }
        }
    }

    /// Fire the device-lost callback.
    pub fn lose(&self, device: &Device, reason: DeviceLostReason, message: &str) {
        self.lose_raw(device.raw().expect("device should be open"), reason, message);
    }

    /// Fire the device-lost callback of a native device directly.
    pub fn lose_raw(&self, raw: WGPUDevice, reason: DeviceLostReason, message: &str) {
        unsafe { fire_lost(raw, reason.to_native(), message) };
    }

    /// Read a texture's mip level 0 directly.
    pub fn texture_contents(&self, texture: &wgpu_bind::Texture) -> Vec<u8> {
        let raw = texture.raw().expect("texture should be open");
        unsafe { with_texture(raw, |state| state.data.clone()) }.unwrap_or_default()
    }

    /// Read a buffer's contents directly.
    pub fn buffer_contents(&self, buffer: &wgpu_bind::Buffer) -> Vec<u8> {
        let raw = buffer.raw().expect("buffer should be open");
        unsafe { with_buffer(raw.addr(), |state| state.data.clone()) }.unwrap_or_default()
    }
}
