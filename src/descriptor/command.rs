//! Command encoding descriptors.

use std::ptr;

use crate::error::Result;
use crate::ffi::*;
use crate::marshal::Marshal;
use crate::region::Region;
use crate::types::QueryType;

/// Describes a [`CommandEncoder`](crate::CommandEncoder).
#[derive(Debug, Clone, Default)]
pub struct CommandEncoderDescriptor<'a> {
    /// Debug label.
    pub label: Option<&'a str>,
}

impl Marshal for CommandEncoderDescriptor<'_> {
    type Native = WGPUCommandEncoderDescriptor;

    fn to_native(&self, region: &Region) -> Result<Self::Native> {
        Ok(WGPUCommandEncoderDescriptor {
            nextInChain: ptr::null(),
            label: region.opt_str_view(self.label),
        })
    }
}

/// Describes the [`CommandBuffer`](crate::CommandBuffer) a finished
/// encoder produces.
#[derive(Debug, Clone, Default)]
pub struct CommandBufferDescriptor<'a> {
    /// Debug label.
    pub label: Option<&'a str>,
}

impl Marshal for CommandBufferDescriptor<'_> {
    type Native = WGPUCommandBufferDescriptor;

    fn to_native(&self, region: &Region) -> Result<Self::Native> {
        Ok(WGPUCommandBufferDescriptor {
            nextInChain: ptr::null(),
            label: region.opt_str_view(self.label),
        })
    }
}

/// Options for a compute pass. Timestamp writes are not supported.
#[derive(Debug, Clone, Default)]
pub struct ComputePassDescriptor<'a> {
    /// Debug label.
    pub label: Option<&'a str>,
}

impl Marshal for ComputePassDescriptor<'_> {
    type Native = WGPUComputePassDescriptor;

    fn to_native(&self, region: &Region) -> Result<Self::Native> {
        Ok(WGPUComputePassDescriptor {
            nextInChain: ptr::null(),
            label: region.opt_str_view(self.label),
            timestampWrites: ptr::null(),
        })
    }
}

/// A set of queries of one type.
#[derive(Debug, Clone)]
pub struct QuerySetDescriptor<'a> {
    /// Debug label.
    pub label: Option<&'a str>,
    /// What every query in the set measures.
    pub ty: QueryType,
    /// Number of queries, at most 4096.
    pub count: u32,
}

impl Marshal for QuerySetDescriptor<'_> {
    type Native = WGPUQuerySetDescriptor;

    fn to_native(&self, region: &Region) -> Result<Self::Native> {
        Ok(WGPUQuerySetDescriptor {
            nextInChain: ptr::null(),
            label: region.opt_str_view(self.label),
            type_: self.ty.to_native(),
            count: self.count,
        })
    }
}
