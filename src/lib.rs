//! Safe Rust bindings for the wgpu-native C API.
//!
//! This crate wraps the opaque objects of `webgpu.h` (instances, adapters,
//! devices, buffers, pipelines and passes) in owning Rust types and turns the
//! native callback-based asynchronous calls into awaitable futures.
//!
//! Three pieces do the work:
//!
//! - [`region::Region`] arenas hold marshalled descriptor data for exactly as
//!   long as the native side reads it;
//! - [`resource::Owned`] gives every native handle a single owner and a
//!   single release;
//! - [`NativeFuture`] bridges one native callback into one result.
//!
//! The native library is reached through a [`NativeProcs`] entry-point table,
//! linked at build time with the `link` feature or supplied by the embedder.
//!
//! # Example
//!
//! ```no_run
//! use wgpu_bind::{BufferDescriptor, BufferUsage, Instance, InstanceDescriptor};
//!
//! fn main() -> wgpu_bind::Result<()> {
//!     // Assumes `wgpu_bind::init` installed a library, e.g.
//!     // `Library::linked(LibraryOptions::default())` with the `link` feature.
//!     let instance = Instance::create(&InstanceDescriptor::default())?;
//!     let adapter = instance.wait(instance.request_adapter(None)?)?;
//!     let device = instance.wait(adapter.request_device(None)?)?;
//!
//!     let buffer = device.create_buffer(&BufferDescriptor {
//!         label: Some("scratch"),
//!         size: 1024,
//!         usage: BufferUsage::STORAGE | BufferUsage::COPY_SRC,
//!         ..Default::default()
//!     })?;
//!     println!("buffer of {} bytes", buffer.size()?);
//!
//!     // Resources are released when closed, or on drop.
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod buffer;
pub mod command;
pub mod descriptor;
pub mod device;
pub mod error;
pub mod ffi;
pub mod instance;
pub mod library;
pub mod logging;
pub mod marshal;
pub mod pending;
pub mod pipeline;
pub mod query;
pub mod queue;
pub mod region;
pub mod render;
pub mod resource;
pub mod texture;
pub mod types;

// Re-export main types at the crate root
pub use adapter::Adapter;
pub use buffer::Buffer;
pub use command::{CommandBuffer, CommandEncoder, ComputePassEncoder};
pub use descriptor::*;
pub use device::Device;
pub use error::{Error, Result};
pub use ffi::NativeProcs;
pub use instance::Instance;
pub use library::{init, is_loaded, library, version, Library, LibraryOptions, Version};
pub use logging::LogLevel;
pub use marshal::{Extension, Marshal};
pub use pending::NativeFuture;
pub use pipeline::{BindGroup, BindGroupLayout, ComputePipeline, PipelineLayout, RenderPipeline, ShaderModule};
pub use query::QuerySet;
pub use queue::Queue;
pub use region::{Region, Scope};
pub use render::{RenderBundle, RenderBundleEncoder, RenderPassEncoder};
pub use texture::{Sampler, Texture, TextureView};
pub use types::*;
