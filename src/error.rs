//! Error types for the wgpu_bind crate.

use thiserror::Error;

/// Result type alias for wgpu_bind operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for wgpu_bind operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Resource was already closed.
    #[error("{0} has been closed")]
    ResourceClosed(&'static str),

    /// A resource was constructed from a null native handle.
    #[error("invalid {0} handle: null")]
    NullHandle(&'static str),

    /// Function argument is invalid.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No native library has been installed.
    #[error("native library not loaded")]
    LibraryNotLoaded,

    /// A process-wide native library was already installed.
    #[error("native library already loaded")]
    AlreadyLoaded,

    /// The proc table has no entry for a native function.
    #[error("native entry point {0} is not available")]
    MissingEntryPoint(&'static str),

    /// A native call reported a non-success status.
    #[error("{op} failed with status {status}: {message}")]
    Native {
        /// Native entry point that failed.
        op: &'static str,
        /// Native status code.
        status: u32,
        /// Message extracted from the native string view.
        message: String,
    },

    /// A synchronous native call returned null instead of an object.
    #[error("{op} returned null")]
    NullResult {
        /// Native entry point that failed.
        op: &'static str,
    },

    /// The native callback reported success but delivered no object.
    #[error("{op} reported success despite missing object")]
    MissingObject {
        /// Native entry point whose callback misbehaved.
        op: &'static str,
    },

    /// The native runtime refused to schedule an asynchronous operation.
    #[error("{op} was rejected by the native runtime")]
    Rejected {
        /// Native entry point that was rejected.
        op: &'static str,
    },

    /// The pending operation was torn down before its callback fired.
    #[error("{op} callback was dropped without firing")]
    CallbackDropped {
        /// Native entry point whose callback never fired.
        op: &'static str,
    },

    /// A native query returned a value outside the known enum range.
    #[error("unexpected {kind} value {value:#x}")]
    UnexpectedValue {
        /// Enum name.
        kind: &'static str,
        /// Raw native value.
        value: u32,
    },

    /// Operation exceeded time limit.
    #[error("timeout")]
    Timeout,
}

impl Error {
    /// Check if this is a closed-resource error.
    pub fn is_closed(&self) -> bool {
        matches!(self, Error::ResourceClosed(_))
    }

    /// Check if this error was reported by the native library.
    pub fn is_native(&self) -> bool {
        matches!(
            self,
            Error::Native { .. }
                | Error::NullResult { .. }
                | Error::MissingObject { .. }
                | Error::Rejected { .. }
        )
    }

    /// Check if this is a timeout error.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout)
    }

    /// Native status code, if the native library reported one.
    pub fn native_status(&self) -> Option<u32> {
        match self {
            Error::Native { status, .. } => Some(*status),
            _ => None,
        }
    }
}
