//! Descriptors for creating resources and issuing operations.
//!
//! Descriptors are plain values with public fields. Those that do not borrow
//! another resource implement `Default`, so the usual way to build one is
//! struct-update syntax:
//!
//! ```
//! use wgpu_bind::{BufferDescriptor, BufferUsage};
//!
//! let desc = BufferDescriptor {
//!     label: Some("staging"),
//!     size: 256,
//!     usage: BufferUsage::MAP_READ | BufferUsage::COPY_DST,
//!     ..Default::default()
//! };
//! assert!(!desc.mapped_at_creation);
//! ```
//!
//! Descriptors borrow the resources they reference. Marshalling one that
//! references a closed resource fails with
//! [`Error::ResourceClosed`](crate::Error::ResourceClosed) before any native
//! call is made.

mod binding;
mod command;
mod copy;
mod device;
mod render;
mod resource;

pub use binding::*;
pub use command::*;
pub use copy::*;
pub use device::*;
pub use render::*;
pub use resource::*;
