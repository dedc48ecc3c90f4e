//! Error conversion utilities for FFI.

use std::ffi::CStr;

use super::raw::{WGPUStringView, WGPU_STRLEN};
use crate::error::{Error, Result};

/// Longest native message the binding layer will copy.
pub const MAX_MESSAGE_LEN: usize = 1 << 20;

/// Placeholder used whenever a native message cannot be read.
pub const MESSAGE_UNAVAILABLE: &str = "message unavailable";

/// Read a native string view into an owned string.
///
/// Returns `None` for a null pointer, a zero length or an oversized length
/// rather than dereferencing it. `WGPU_STRLEN` marks a NUL-terminated string.
///
/// # Safety
///
/// If `view.data` is non-null it must point to `view.length` readable bytes
/// (or to a NUL-terminated string when the length is `WGPU_STRLEN`).
pub unsafe fn string_from_view(view: WGPUStringView) -> Option<String> {
    if view.data.is_null() || view.length == 0 {
        return None;
    }

    if view.length == WGPU_STRLEN {
        let s = CStr::from_ptr(view.data).to_string_lossy().into_owned();
        return if s.is_empty() { None } else { Some(s) };
    }

    if view.length > MAX_MESSAGE_LEN {
        return None;
    }

    let bytes = std::slice::from_raw_parts(view.data.cast::<u8>(), view.length);
    Some(String::from_utf8_lossy(bytes).into_owned())
}

/// Read a native message, synthesizing a placeholder when it is unreadable.
///
/// # Safety
///
/// Same contract as [`string_from_view`].
pub unsafe fn message_from_view(view: WGPUStringView) -> String {
    string_from_view(view).unwrap_or_else(|| MESSAGE_UNAVAILABLE.to_string())
}

/// Convert a native failure status and message into an [`Error`].
///
/// # Safety
///
/// Same contract as [`string_from_view`].
pub unsafe fn error_from_status(op: &'static str, status: u32, message: WGPUStringView) -> Error {
    Error::Native {
        op,
        status,
        message: message_from_view(message),
    }
}

/// Check the handle returned by a synchronous native factory call.
pub fn check_handle<H>(op: &'static str, raw: H, is_null: impl FnOnce(&H) -> bool) -> Result<H> {
    if is_null(&raw) {
        log::error!("{} returned a null handle", op);
        return Err(Error::NullResult { op });
    }
    Ok(raw)
}
