//! Native library handle and the process-wide default library.
//!
//! A [`Library`] pairs an entry-point table with the options that govern how
//! resources created through it behave. Every resource keeps a clone of the
//! library it was created through, so several tables (for example a fake one
//! in tests and the linked one) can coexist in one process.

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::error::{Error, Result};
use crate::ffi::{entry, NativeProcs};
use crate::logging::{self, LogLevel};

/// Options applied to a [`Library`].
#[derive(Debug, Clone)]
pub struct LibraryOptions {
    /// Log at `warn` (instead of `debug`) when an open resource is released by
    /// `Drop` rather than an explicit `close()`.
    pub warn_on_implicit_release: bool,
    /// Native log level to apply when the library is installed with [`init`].
    pub native_log_level: Option<LogLevel>,
    /// Forward native log lines into the `log` facade when installed with
    /// [`init`].
    pub forward_native_logs: bool,
}

impl Default for LibraryOptions {
    fn default() -> Self {
        Self {
            warn_on_implicit_release: true,
            native_log_level: None,
            forward_native_logs: false,
        }
    }
}

struct Inner {
    procs: NativeProcs,
    options: LibraryOptions,
}

/// Shared handle to a native entry-point table.
#[derive(Clone)]
pub struct Library {
    inner: Arc<Inner>,
}

impl Library {
    /// Build a library from an entry-point table.
    pub fn from_procs(procs: NativeProcs, options: LibraryOptions) -> Self {
        log::debug!(
            "native library table with {} entry points",
            procs.available()
        );
        Self {
            inner: Arc::new(Inner { procs, options }),
        }
    }

    /// Library backed by the linked `wgpu_native` symbols.
    #[cfg(feature = "link")]
    pub fn linked(options: LibraryOptions) -> Self {
        Self::from_procs(NativeProcs::linked(), options)
    }

    /// The entry-point table.
    pub fn procs(&self) -> &NativeProcs {
        &self.inner.procs
    }

    /// The options this library was built with.
    pub fn options(&self) -> &LibraryOptions {
        &self.inner.options
    }

    /// Query the native library version.
    pub fn version(&self) -> Result<Version> {
        let get_version = entry!(self.procs(), get_version)?;
        let raw = unsafe { get_version() };
        Ok(Version::from_packed(raw))
    }

    /// Check if two handles share one table.
    pub fn ptr_eq(&self, other: &Library) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn apply_log_options(&self) -> Result<()> {
        if let Some(level) = self.options().native_log_level {
            logging::set_log_level(self, level)?;
        }
        if self.options().forward_native_logs {
            logging::forward_to_log(self)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Library")
            .field("entry_points", &self.inner.procs.available())
            .field("options", &self.inner.options)
            .finish()
    }
}

/// Native library version, decoded from `wgpuGetVersion`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    /// Major version.
    pub major: u8,
    /// Minor version.
    pub minor: u8,
    /// Patch version.
    pub patch: u8,
    /// Build number.
    pub build: u8,
}

impl Version {
    /// Decode the packed `0xMMmmppbb` representation.
    pub fn from_packed(raw: u32) -> Self {
        Self {
            major: (raw >> 24) as u8,
            minor: (raw >> 16) as u8,
            patch: (raw >> 8) as u8,
            build: raw as u8,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}.{}", self.major, self.minor, self.patch, self.build)
    }
}

static GLOBAL: OnceLock<Library> = OnceLock::new();

/// Install the process-wide default library.
///
/// Applies the library's log options, then makes it available through
/// [`library`]. Fails with [`Error::AlreadyLoaded`] if a library was
/// installed before.
pub fn init(library: Library) -> Result<()> {
    if GLOBAL.get().is_some() {
        return Err(Error::AlreadyLoaded);
    }
    library.apply_log_options()?;
    GLOBAL.set(library).map_err(|_| Error::AlreadyLoaded)?;
    log::debug!("native library installed");
    Ok(())
}

/// Check if a process-wide library has been installed.
pub fn is_loaded() -> bool {
    GLOBAL.get().is_some()
}

/// The process-wide default library.
pub fn library() -> Result<Library> {
    GLOBAL.get().cloned().ok_or(Error::LibraryNotLoaded)
}

/// Version of the process-wide default library.
pub fn version() -> Result<Version> {
    library()?.version()
}
