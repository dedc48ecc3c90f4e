//! Double every element of a storage buffer on the GPU and read it back.
//!
//! Run with: cargo run --example compute --features link

use wgpu_bind::{
    BindGroupDescriptor, BindGroupEntry, BindingResource, BufferDescriptor, BufferUsage, ComputePipelineDescriptor,
    Instance, InstanceDescriptor, Library, LibraryOptions, LogLevel, MapMode, ShaderModuleDescriptor, ShaderSource,
};

const SHADER: &str = r#"
@group(0) @binding(0) var<storage, read_write> data: array<u32>;

@compute @workgroup_size(64)
fn main(@builtin(global_invocation_id) id: vec3<u32>) {
    if (id.x < arrayLength(&data)) {
        data[id.x] = data[id.x] * 2u;
    }
}
"#;

const COUNT: usize = 256;

fn main() -> wgpu_bind::Result<()> {
    env_logger::init();

    // Initialize the library
    wgpu_bind::init(Library::linked(LibraryOptions {
        native_log_level: Some(LogLevel::Warn),
        forward_native_logs: true,
        ..Default::default()
    }))?;
    println!("wgpu-native {}", wgpu_bind::version()?);

    let instance = Instance::create(&InstanceDescriptor::default())?;
    let adapter = instance.wait(instance.request_adapter(None)?)?;
    let info = adapter.info()?;
    println!("Adapter: {} ({:?}, {:?})", info.device, info.backend_type, info.adapter_type);

    let device = instance.wait(adapter.request_device(None)?)?;
    let queue = device.queue()?;

    let input: Vec<u32> = (0..COUNT as u32).collect();
    let bytes: Vec<u8> = input.iter().flat_map(|v| v.to_le_bytes()).collect();
    let size = bytes.len() as u64;

    let storage = device.create_buffer(&BufferDescriptor {
        label: Some("storage"),
        size,
        usage: BufferUsage::STORAGE | BufferUsage::COPY_SRC | BufferUsage::COPY_DST,
        ..Default::default()
    })?;
    let mut staging = device.create_buffer(&BufferDescriptor {
        label: Some("staging"),
        size,
        usage: BufferUsage::MAP_READ | BufferUsage::COPY_DST,
        ..Default::default()
    })?;
    queue.write_buffer(&storage, 0, &bytes)?;

    let module = device.create_shader_module(&ShaderModuleDescriptor {
        label: Some("double"),
        source: ShaderSource::Wgsl(SHADER),
    })?;
    let pipeline = device.create_compute_pipeline(&ComputePipelineDescriptor {
        label: Some("double"),
        layout: None,
        module: &module,
        entry_point: Some("main"),
        constants: &[],
    })?;
    let layout = pipeline.bind_group_layout(0)?;
    let group = device.create_bind_group(&BindGroupDescriptor {
        label: None,
        layout: &layout,
        entries: &[BindGroupEntry {
            binding: 0,
            resource: BindingResource::Buffer {
                buffer: &storage,
                offset: 0,
                size: None,
            },
        }],
    })?;

    let mut encoder = device.create_command_encoder(None)?;
    let mut pass = encoder.begin_compute_pass(None)?;
    pass.set_pipeline(&pipeline)?;
    pass.set_bind_group(0, &group, &[])?;
    pass.dispatch_workgroups(COUNT.div_ceil(64) as u32, 1, 1)?;
    pass.end()?;
    pass.close();
    encoder.copy_buffer_to_buffer(&storage, 0, &staging, 0, size)?;
    let commands = encoder.finish(None)?;
    queue.submit(&[&commands])?;

    instance.wait(staging.map_async(MapMode::READ, 0, None)?)?;
    let output: Vec<u32> = staging
        .mapped_range(0, bytes.len())?
        .chunks_exact(4)
        .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();
    staging.unmap()?;

    println!("First results: {:?}", &output[..8]);
    let correct = output.iter().zip(&input).all(|(out, inp)| *out == inp * 2);
    println!("All {} values doubled: {}", COUNT, correct);

    Ok(())
}
