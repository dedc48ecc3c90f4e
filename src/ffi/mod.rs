//! FFI bindings to wgpu-native.
//!
//! This module contains the low-level C layouts, handles and the entry-point
//! table. Users should prefer the safe Rust wrappers in the parent modules;
//! it is public so that embedders can build a [`NativeProcs`] table.

pub mod error;
pub mod handles;
pub mod procs;
pub mod raw;

pub use error::{check_handle, error_from_status, message_from_view, string_from_view};
pub use handles::*;
pub(crate) use procs::entry;
pub use procs::NativeProcs;
pub use raw::*;
