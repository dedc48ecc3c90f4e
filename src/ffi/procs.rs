//! Typed entry-point table for the wgpu-native API.
//!
//! Every native function the binding layer calls is reached through a
//! [`NativeProcs`] field. A table can be filled from the statically linked
//! library (`link` feature) or by the embedder; fields left as `None` make the
//! operations that need them fail with [`Error::MissingEntryPoint`].
//!
//! [`Error::MissingEntryPoint`]: crate::Error::MissingEntryPoint

use std::os::raw::c_void;

use super::handles::*;
use super::raw::*;

/// Macro to define the proc table and, with the `link` feature, the matching
/// `extern "C"` declarations.
macro_rules! define_procs {
    ($( $field:ident => $symbol:ident ( $($arg:ident : $ty:ty),* $(,)? ) $(-> $ret:ty)? ; )*) => {
        /// Table of native entry points.
        #[derive(Debug, Clone, Copy, Default)]
        pub struct NativeProcs {
            $(
                #[doc = concat!("`", stringify!($symbol), "`")]
                pub $field: Option<unsafe extern "C" fn($($ty),*) $(-> $ret)?>,
            )*
        }

        impl NativeProcs {
            /// Native symbol name of a table field, for diagnostics.
            pub fn symbol_name(field: &str) -> Option<&'static str> {
                match field {
                    $( stringify!($field) => Some(stringify!($symbol)), )*
                    _ => None,
                }
            }

            /// Number of entry points present in this table.
            pub fn available(&self) -> usize {
                let mut count = 0;
                $( if self.$field.is_some() { count += 1; } )*
                count
            }
        }

        #[cfg(feature = "link")]
        mod linked {
            use super::*;

            extern "C" {
                $( pub fn $symbol($($arg: $ty),*) $(-> $ret)?; )*
            }
        }

        #[cfg(feature = "link")]
        impl NativeProcs {
            /// Table filled from the linked `wgpu_native` library.
            pub fn linked() -> Self {
                Self {
                    $( $field: Some(linked::$symbol), )*
                }
            }
        }
    };
}

define_procs! {
    get_version => wgpuGetVersion() -> u32;
    set_log_callback => wgpuSetLogCallback(callback: WGPULogCallback, userdata: *mut c_void);
    set_log_level => wgpuSetLogLevel(level: WGPUEnum);

    // Instance
    create_instance => wgpuCreateInstance(descriptor: *const WGPUInstanceDescriptor) -> WGPUInstance;
    instance_process_events => wgpuInstanceProcessEvents(instance: WGPUInstance);
    instance_request_adapter => wgpuInstanceRequestAdapter(
        instance: WGPUInstance,
        options: *const WGPURequestAdapterOptions,
        callback_info: WGPURequestAdapterCallbackInfo,
    ) -> WGPUFuture;
    instance_release => wgpuInstanceRelease(instance: WGPUInstance);

    // Adapter
    adapter_get_info => wgpuAdapterGetInfo(adapter: WGPUAdapter, info: *mut WGPUAdapterInfo) -> WGPUEnum;
    adapter_info_free_members => wgpuAdapterInfoFreeMembers(info: WGPUAdapterInfo);
    adapter_has_feature => wgpuAdapterHasFeature(adapter: WGPUAdapter, feature: WGPUEnum) -> WGPUBool;
    adapter_request_device => wgpuAdapterRequestDevice(
        adapter: WGPUAdapter,
        descriptor: *const WGPUDeviceDescriptor,
        callback_info: WGPURequestDeviceCallbackInfo,
    ) -> WGPUFuture;
    adapter_release => wgpuAdapterRelease(adapter: WGPUAdapter);

    // Device
    device_create_buffer => wgpuDeviceCreateBuffer(
        device: WGPUDevice,
        descriptor: *const WGPUBufferDescriptor,
    ) -> WGPUBuffer;
    device_create_texture => wgpuDeviceCreateTexture(
        device: WGPUDevice,
        descriptor: *const WGPUTextureDescriptor,
    ) -> WGPUTexture;
    device_create_sampler => wgpuDeviceCreateSampler(
        device: WGPUDevice,
        descriptor: *const WGPUSamplerDescriptor,
    ) -> WGPUSampler;
    device_create_shader_module => wgpuDeviceCreateShaderModule(
        device: WGPUDevice,
        descriptor: *const WGPUShaderModuleDescriptor,
    ) -> WGPUShaderModule;
    device_create_bind_group_layout => wgpuDeviceCreateBindGroupLayout(
        device: WGPUDevice,
        descriptor: *const WGPUBindGroupLayoutDescriptor,
    ) -> WGPUBindGroupLayout;
    device_create_bind_group => wgpuDeviceCreateBindGroup(
        device: WGPUDevice,
        descriptor: *const WGPUBindGroupDescriptor,
    ) -> WGPUBindGroup;
    device_create_pipeline_layout => wgpuDeviceCreatePipelineLayout(
        device: WGPUDevice,
        descriptor: *const WGPUPipelineLayoutDescriptor,
    ) -> WGPUPipelineLayout;
    device_create_compute_pipeline => wgpuDeviceCreateComputePipeline(
        device: WGPUDevice,
        descriptor: *const WGPUComputePipelineDescriptor,
    ) -> WGPUComputePipeline;
    device_create_render_pipeline => wgpuDeviceCreateRenderPipeline(
        device: WGPUDevice,
        descriptor: *const WGPURenderPipelineDescriptor,
    ) -> WGPURenderPipeline;
    device_create_render_bundle_encoder => wgpuDeviceCreateRenderBundleEncoder(
        device: WGPUDevice,
        descriptor: *const WGPURenderBundleEncoderDescriptor,
    ) -> WGPURenderBundleEncoder;
    device_create_query_set => wgpuDeviceCreateQuerySet(
        device: WGPUDevice,
        descriptor: *const WGPUQuerySetDescriptor,
    ) -> WGPUQuerySet;
    device_create_command_encoder => wgpuDeviceCreateCommandEncoder(
        device: WGPUDevice,
        descriptor: *const WGPUCommandEncoderDescriptor,
    ) -> WGPUCommandEncoder;
    device_get_queue => wgpuDeviceGetQueue(device: WGPUDevice) -> WGPUQueue;
    device_has_feature => wgpuDeviceHasFeature(device: WGPUDevice, feature: WGPUEnum) -> WGPUBool;
    device_push_error_scope => wgpuDevicePushErrorScope(device: WGPUDevice, filter: WGPUEnum);
    device_pop_error_scope => wgpuDevicePopErrorScope(
        device: WGPUDevice,
        callback_info: WGPUPopErrorScopeCallbackInfo,
    ) -> WGPUFuture;
    device_poll => wgpuDevicePoll(
        device: WGPUDevice,
        wait: WGPUBool,
        submission_index: *const WGPUSubmissionIndex,
    ) -> WGPUBool;
    device_destroy => wgpuDeviceDestroy(device: WGPUDevice);
    device_release => wgpuDeviceRelease(device: WGPUDevice);

    // Queue
    queue_submit => wgpuQueueSubmit(
        queue: WGPUQueue,
        command_count: usize,
        commands: *const WGPUCommandBuffer,
    );
    queue_write_buffer => wgpuQueueWriteBuffer(
        queue: WGPUQueue,
        buffer: WGPUBuffer,
        buffer_offset: u64,
        data: *const c_void,
        size: usize,
    );
    queue_write_texture => wgpuQueueWriteTexture(
        queue: WGPUQueue,
        destination: *const WGPUTexelCopyTextureInfo,
        data: *const c_void,
        data_size: usize,
        data_layout: *const WGPUTexelCopyBufferLayout,
        write_size: *const WGPUExtent3D,
    );
    queue_on_submitted_work_done => wgpuQueueOnSubmittedWorkDone(
        queue: WGPUQueue,
        callback_info: WGPUQueueWorkDoneCallbackInfo,
    ) -> WGPUFuture;
    queue_release => wgpuQueueRelease(queue: WGPUQueue);

    // Buffer
    buffer_map_async => wgpuBufferMapAsync(
        buffer: WGPUBuffer,
        mode: WGPUFlags,
        offset: usize,
        size: usize,
        callback_info: WGPUBufferMapCallbackInfo,
    ) -> WGPUFuture;
    buffer_get_mapped_range => wgpuBufferGetMappedRange(
        buffer: WGPUBuffer,
        offset: usize,
        size: usize,
    ) -> *mut c_void;
    buffer_get_const_mapped_range => wgpuBufferGetConstMappedRange(
        buffer: WGPUBuffer,
        offset: usize,
        size: usize,
    ) -> *const c_void;
    buffer_unmap => wgpuBufferUnmap(buffer: WGPUBuffer);
    buffer_get_size => wgpuBufferGetSize(buffer: WGPUBuffer) -> u64;
    buffer_get_usage => wgpuBufferGetUsage(buffer: WGPUBuffer) -> WGPUFlags;
    buffer_get_map_state => wgpuBufferGetMapState(buffer: WGPUBuffer) -> WGPUEnum;
    buffer_destroy => wgpuBufferDestroy(buffer: WGPUBuffer);
    buffer_release => wgpuBufferRelease(buffer: WGPUBuffer);

    // Texture
    texture_create_view => wgpuTextureCreateView(
        texture: WGPUTexture,
        descriptor: *const WGPUTextureViewDescriptor,
    ) -> WGPUTextureView;
    texture_get_width => wgpuTextureGetWidth(texture: WGPUTexture) -> u32;
    texture_get_height => wgpuTextureGetHeight(texture: WGPUTexture) -> u32;
    texture_get_format => wgpuTextureGetFormat(texture: WGPUTexture) -> WGPUEnum;
    texture_get_depth_or_array_layers => wgpuTextureGetDepthOrArrayLayers(texture: WGPUTexture) -> u32;
    texture_get_mip_level_count => wgpuTextureGetMipLevelCount(texture: WGPUTexture) -> u32;
    texture_get_sample_count => wgpuTextureGetSampleCount(texture: WGPUTexture) -> u32;
    texture_get_dimension => wgpuTextureGetDimension(texture: WGPUTexture) -> WGPUEnum;
    texture_get_usage => wgpuTextureGetUsage(texture: WGPUTexture) -> WGPUFlags;
    texture_destroy => wgpuTextureDestroy(texture: WGPUTexture);
    texture_release => wgpuTextureRelease(texture: WGPUTexture);
    texture_view_release => wgpuTextureViewRelease(view: WGPUTextureView);
    sampler_release => wgpuSamplerRelease(sampler: WGPUSampler);

    // Pipelines and binding
    shader_module_release => wgpuShaderModuleRelease(module: WGPUShaderModule);
    bind_group_layout_release => wgpuBindGroupLayoutRelease(layout: WGPUBindGroupLayout);
    bind_group_release => wgpuBindGroupRelease(group: WGPUBindGroup);
    pipeline_layout_release => wgpuPipelineLayoutRelease(layout: WGPUPipelineLayout);
    compute_pipeline_get_bind_group_layout => wgpuComputePipelineGetBindGroupLayout(
        pipeline: WGPUComputePipeline,
        group_index: u32,
    ) -> WGPUBindGroupLayout;
    compute_pipeline_release => wgpuComputePipelineRelease(pipeline: WGPUComputePipeline);
    render_pipeline_get_bind_group_layout => wgpuRenderPipelineGetBindGroupLayout(
        pipeline: WGPURenderPipeline,
        group_index: u32,
    ) -> WGPUBindGroupLayout;
    render_pipeline_release => wgpuRenderPipelineRelease(pipeline: WGPURenderPipeline);

    // Queries
    query_set_get_type => wgpuQuerySetGetType(query_set: WGPUQuerySet) -> WGPUEnum;
    query_set_get_count => wgpuQuerySetGetCount(query_set: WGPUQuerySet) -> u32;
    query_set_destroy => wgpuQuerySetDestroy(query_set: WGPUQuerySet);
    query_set_release => wgpuQuerySetRelease(query_set: WGPUQuerySet);

    // Commands
    command_encoder_begin_compute_pass => wgpuCommandEncoderBeginComputePass(
        encoder: WGPUCommandEncoder,
        descriptor: *const WGPUComputePassDescriptor,
    ) -> WGPUComputePassEncoder;
    command_encoder_copy_buffer_to_buffer => wgpuCommandEncoderCopyBufferToBuffer(
        encoder: WGPUCommandEncoder,
        source: WGPUBuffer,
        source_offset: u64,
        destination: WGPUBuffer,
        destination_offset: u64,
        size: u64,
    );
    command_encoder_clear_buffer => wgpuCommandEncoderClearBuffer(
        encoder: WGPUCommandEncoder,
        buffer: WGPUBuffer,
        offset: u64,
        size: u64,
    );
    command_encoder_begin_render_pass => wgpuCommandEncoderBeginRenderPass(
        encoder: WGPUCommandEncoder,
        descriptor: *const WGPURenderPassDescriptor,
    ) -> WGPURenderPassEncoder;
    command_encoder_copy_buffer_to_texture => wgpuCommandEncoderCopyBufferToTexture(
        encoder: WGPUCommandEncoder,
        source: *const WGPUTexelCopyBufferInfo,
        destination: *const WGPUTexelCopyTextureInfo,
        copy_size: *const WGPUExtent3D,
    );
    command_encoder_copy_texture_to_buffer => wgpuCommandEncoderCopyTextureToBuffer(
        encoder: WGPUCommandEncoder,
        source: *const WGPUTexelCopyTextureInfo,
        destination: *const WGPUTexelCopyBufferInfo,
        copy_size: *const WGPUExtent3D,
    );
    command_encoder_copy_texture_to_texture => wgpuCommandEncoderCopyTextureToTexture(
        encoder: WGPUCommandEncoder,
        source: *const WGPUTexelCopyTextureInfo,
        destination: *const WGPUTexelCopyTextureInfo,
        copy_size: *const WGPUExtent3D,
    );
    command_encoder_resolve_query_set => wgpuCommandEncoderResolveQuerySet(
        encoder: WGPUCommandEncoder,
        query_set: WGPUQuerySet,
        first_query: u32,
        query_count: u32,
        destination: WGPUBuffer,
        destination_offset: u64,
    );
    command_encoder_finish => wgpuCommandEncoderFinish(
        encoder: WGPUCommandEncoder,
        descriptor: *const WGPUCommandBufferDescriptor,
    ) -> WGPUCommandBuffer;
    command_encoder_release => wgpuCommandEncoderRelease(encoder: WGPUCommandEncoder);
    compute_pass_set_pipeline => wgpuComputePassEncoderSetPipeline(
        pass: WGPUComputePassEncoder,
        pipeline: WGPUComputePipeline,
    );
    compute_pass_set_bind_group => wgpuComputePassEncoderSetBindGroup(
        pass: WGPUComputePassEncoder,
        group_index: u32,
        group: WGPUBindGroup,
        dynamic_offset_count: usize,
        dynamic_offsets: *const u32,
    );
    compute_pass_dispatch_workgroups => wgpuComputePassEncoderDispatchWorkgroups(
        pass: WGPUComputePassEncoder,
        x: u32,
        y: u32,
        z: u32,
    );
    compute_pass_end => wgpuComputePassEncoderEnd(pass: WGPUComputePassEncoder);
    compute_pass_release => wgpuComputePassEncoderRelease(pass: WGPUComputePassEncoder);
    render_pass_set_pipeline => wgpuRenderPassEncoderSetPipeline(
        pass: WGPURenderPassEncoder,
        pipeline: WGPURenderPipeline,
    );
    render_pass_set_bind_group => wgpuRenderPassEncoderSetBindGroup(
        pass: WGPURenderPassEncoder,
        group_index: u32,
        group: WGPUBindGroup,
        dynamic_offset_count: usize,
        dynamic_offsets: *const u32,
    );
    render_pass_set_vertex_buffer => wgpuRenderPassEncoderSetVertexBuffer(
        pass: WGPURenderPassEncoder,
        slot: u32,
        buffer: WGPUBuffer,
        offset: u64,
        size: u64,
    );
    render_pass_set_index_buffer => wgpuRenderPassEncoderSetIndexBuffer(
        pass: WGPURenderPassEncoder,
        buffer: WGPUBuffer,
        format: WGPUEnum,
        offset: u64,
        size: u64,
    );
    render_pass_set_viewport => wgpuRenderPassEncoderSetViewport(
        pass: WGPURenderPassEncoder,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        min_depth: f32,
        max_depth: f32,
    );
    render_pass_set_scissor_rect => wgpuRenderPassEncoderSetScissorRect(
        pass: WGPURenderPassEncoder,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    );
    render_pass_set_blend_constant => wgpuRenderPassEncoderSetBlendConstant(
        pass: WGPURenderPassEncoder,
        color: *const WGPUColor,
    );
    render_pass_set_stencil_reference => wgpuRenderPassEncoderSetStencilReference(
        pass: WGPURenderPassEncoder,
        reference: u32,
    );
    render_pass_draw => wgpuRenderPassEncoderDraw(
        pass: WGPURenderPassEncoder,
        vertex_count: u32,
        instance_count: u32,
        first_vertex: u32,
        first_instance: u32,
    );
    render_pass_draw_indexed => wgpuRenderPassEncoderDrawIndexed(
        pass: WGPURenderPassEncoder,
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        base_vertex: i32,
        first_instance: u32,
    );
    render_pass_begin_occlusion_query => wgpuRenderPassEncoderBeginOcclusionQuery(
        pass: WGPURenderPassEncoder,
        query_index: u32,
    );
    render_pass_end_occlusion_query => wgpuRenderPassEncoderEndOcclusionQuery(pass: WGPURenderPassEncoder);
    render_pass_execute_bundles => wgpuRenderPassEncoderExecuteBundles(
        pass: WGPURenderPassEncoder,
        bundle_count: usize,
        bundles: *const WGPURenderBundle,
    );
    render_pass_end => wgpuRenderPassEncoderEnd(pass: WGPURenderPassEncoder);
    render_pass_release => wgpuRenderPassEncoderRelease(pass: WGPURenderPassEncoder);
    render_bundle_encoder_set_pipeline => wgpuRenderBundleEncoderSetPipeline(
        encoder: WGPURenderBundleEncoder,
        pipeline: WGPURenderPipeline,
    );
    render_bundle_encoder_set_bind_group => wgpuRenderBundleEncoderSetBindGroup(
        encoder: WGPURenderBundleEncoder,
        group_index: u32,
        group: WGPUBindGroup,
        dynamic_offset_count: usize,
        dynamic_offsets: *const u32,
    );
    render_bundle_encoder_set_vertex_buffer => wgpuRenderBundleEncoderSetVertexBuffer(
        encoder: WGPURenderBundleEncoder,
        slot: u32,
        buffer: WGPUBuffer,
        offset: u64,
        size: u64,
    );
    render_bundle_encoder_set_index_buffer => wgpuRenderBundleEncoderSetIndexBuffer(
        encoder: WGPURenderBundleEncoder,
        buffer: WGPUBuffer,
        format: WGPUEnum,
        offset: u64,
        size: u64,
    );
    render_bundle_encoder_draw => wgpuRenderBundleEncoderDraw(
        encoder: WGPURenderBundleEncoder,
        vertex_count: u32,
        instance_count: u32,
        first_vertex: u32,
        first_instance: u32,
    );
    render_bundle_encoder_draw_indexed => wgpuRenderBundleEncoderDrawIndexed(
        encoder: WGPURenderBundleEncoder,
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        base_vertex: i32,
        first_instance: u32,
    );
    render_bundle_encoder_finish => wgpuRenderBundleEncoderFinish(
        encoder: WGPURenderBundleEncoder,
        descriptor: *const WGPURenderBundleDescriptor,
    ) -> WGPURenderBundle;
    render_bundle_encoder_release => wgpuRenderBundleEncoderRelease(encoder: WGPURenderBundleEncoder);
    render_bundle_release => wgpuRenderBundleRelease(bundle: WGPURenderBundle);
    command_buffer_release => wgpuCommandBufferRelease(buffer: WGPUCommandBuffer);
}

/// Fetch an entry point from a proc table, failing with
/// [`Error::MissingEntryPoint`](crate::Error::MissingEntryPoint).
macro_rules! entry {
    ($procs:expr, $field:ident) => {
        $procs.$field.ok_or_else(|| {
            $crate::error::Error::MissingEntryPoint(
                $crate::ffi::NativeProcs::symbol_name(stringify!($field))
                    .unwrap_or(stringify!($field)),
            )
        })
    };
}

pub(crate) use entry;
