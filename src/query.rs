//! Query sets.

use crate::error::Result;
use crate::ffi::*;
use crate::resource::define_resource;
use crate::types::QueryType;

define_resource!(
    /// Storage for occlusion or timestamp query results. Results are read
    /// by resolving them into a buffer with
    /// [`CommandEncoder::resolve_query_set`](crate::CommandEncoder::resolve_query_set).
    QuerySet,
    WGPUQuerySet
);

impl QuerySet {
    /// Kind of query the set holds.
    pub fn ty(&self) -> Result<QueryType> {
        let raw = self.raw()?;
        let get_type = entry!(self.library().procs(), query_set_get_type)?;
        QueryType::try_from(unsafe { get_type(raw) })
    }

    /// Number of queries in the set.
    pub fn count(&self) -> Result<u32> {
        let raw = self.raw()?;
        let get_count = entry!(self.library().procs(), query_set_get_count)?;
        Ok(unsafe { get_count(raw) })
    }

    /// Free the set's storage. The handle still needs closing.
    pub fn destroy(&self) -> Result<()> {
        let raw = self.raw()?;
        let destroy = entry!(self.library().procs(), query_set_destroy)?;
        unsafe { destroy(raw) };
        Ok(())
    }
}
