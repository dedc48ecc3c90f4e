//! Native log callback registration.
//!
//! The native library holds a single process-wide log callback. This module
//! mirrors that: at most one handler is current at a time, and replacing or
//! clearing it drops the previous handler exactly once.
//!
//! The native side is always handed the same trampoline with null user data;
//! the trampoline looks up the current sink itself, so no native-side state
//! ever points at a sink that has been replaced.

use std::os::raw::c_void;
use std::panic::{self, AssertUnwindSafe};
use std::ptr;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::Result;
use crate::ffi::{self, entry, WGPUEnum, WGPUStringView};
use crate::library::Library;

/// Native log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    /// Logging disabled.
    Off,
    /// Errors only.
    Error,
    /// Warnings and errors.
    Warn,
    /// Informational messages.
    Info,
    /// Debug output.
    Debug,
    /// Everything.
    Trace,
}

impl LogLevel {
    /// Native `WGPULogLevel` value.
    pub fn to_native(self) -> WGPUEnum {
        match self {
            LogLevel::Off => ffi::WGPULogLevel_Off,
            LogLevel::Error => ffi::WGPULogLevel_Error,
            LogLevel::Warn => ffi::WGPULogLevel_Warn,
            LogLevel::Info => ffi::WGPULogLevel_Info,
            LogLevel::Debug => ffi::WGPULogLevel_Debug,
            LogLevel::Trace => ffi::WGPULogLevel_Trace,
        }
    }

    /// Decode a native level; unknown values read as `Info`.
    pub fn from_native(value: WGPUEnum) -> Self {
        match value {
            ffi::WGPULogLevel_Off => LogLevel::Off,
            ffi::WGPULogLevel_Error => LogLevel::Error,
            ffi::WGPULogLevel_Warn => LogLevel::Warn,
            ffi::WGPULogLevel_Debug => LogLevel::Debug,
            ffi::WGPULogLevel_Trace => LogLevel::Trace,
            _ => LogLevel::Info,
        }
    }

    /// Matching `log` level; `None` for [`LogLevel::Off`].
    pub fn to_log(self) -> Option<log::Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(log::Level::Error),
            LogLevel::Warn => Some(log::Level::Warn),
            LogLevel::Info => Some(log::Level::Info),
            LogLevel::Debug => Some(log::Level::Debug),
            LogLevel::Trace => Some(log::Level::Trace),
        }
    }
}

impl From<log::LevelFilter> for LogLevel {
    fn from(filter: log::LevelFilter) -> Self {
        match filter {
            log::LevelFilter::Off => LogLevel::Off,
            log::LevelFilter::Error => LogLevel::Error,
            log::LevelFilter::Warn => LogLevel::Warn,
            log::LevelFilter::Info => LogLevel::Info,
            log::LevelFilter::Debug => LogLevel::Debug,
            log::LevelFilter::Trace => LogLevel::Trace,
        }
    }
}

type Handler = dyn Fn(LogLevel, &str) + Send + Sync;

struct LogSink {
    handler: Box<Handler>,
}

static CURRENT: Mutex<Option<Arc<LogSink>>> = parking_lot::const_mutex(None);

unsafe extern "C" fn log_trampoline(level: WGPUEnum, message: WGPUStringView, _userdata: *mut c_void) {
    // Clone out of the lock so a handler may replace the registration.
    let sink = CURRENT.lock().clone();
    let Some(sink) = sink else {
        return;
    };
    let message = ffi::message_from_view(message);
    let level = LogLevel::from_native(level);
    if panic::catch_unwind(AssertUnwindSafe(|| (sink.handler)(level, &message))).is_err() {
        log::error!("native log handler panicked");
    }
}

/// Set the native log verbosity.
pub fn set_log_level(library: &Library, level: LogLevel) -> Result<()> {
    let set_level = entry!(library.procs(), set_log_level)?;
    unsafe { set_level(level.to_native()) };
    Ok(())
}

/// Register `handler` as the process-wide native log callback.
///
/// Any previously registered handler is dropped once the new one is in place.
pub fn set_log_callback<F>(library: &Library, handler: F) -> Result<()>
where
    F: Fn(LogLevel, &str) + Send + Sync + 'static,
{
    let set_callback = entry!(library.procs(), set_log_callback)?;
    let sink = Arc::new(LogSink {
        handler: Box::new(handler),
    });

    let previous = CURRENT.lock().replace(sink);
    unsafe { set_callback(Some(log_trampoline), ptr::null_mut()) };

    if previous.is_some() {
        log::debug!("replaced native log callback");
    }
    drop(previous);
    Ok(())
}

/// Remove the process-wide native log callback.
pub fn clear_log_callback(library: &Library) -> Result<()> {
    let set_callback = entry!(library.procs(), set_log_callback)?;
    let previous = CURRENT.lock().take();
    unsafe { set_callback(None, ptr::null_mut()) };
    drop(previous);
    Ok(())
}

/// Check if a native log callback is registered.
pub fn is_log_callback_set() -> bool {
    CURRENT.lock().is_some()
}

/// Route native log lines into the `log` facade under the `wgpu_native`
/// target.
pub fn forward_to_log(library: &Library) -> Result<()> {
    set_log_callback(library, |level, message| {
        if let Some(level) = level.to_log() {
            log::log!(target: "wgpu_native", level, "{}", message);
        }
    })
}
