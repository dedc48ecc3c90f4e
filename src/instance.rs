//! Instance management and event processing.

use std::ptr;
use std::thread;
use std::time::{Duration, Instant};

use crate::adapter::Adapter;
use crate::descriptor::{InstanceDescriptor, RequestAdapterOptions};
use crate::error::{Error, Result};
use crate::ffi::{self, entry, WGPUInstance, WGPURequestAdapterCallbackInfo, WGPURequestAdapterOptions};
use crate::library::{self, Library};
use crate::marshal::Marshal;
use crate::pending::{self, NativeFuture};
use crate::region::Region;
use crate::resource::define_resource;

define_resource!(
    /// Entry point to the native runtime.
    ///
    /// Adapters are requested from an instance, and the instance is the
    /// polling point for callbacks the native runtime defers.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use wgpu_bind::{Instance, InstanceDescriptor};
    ///
    /// let instance = Instance::create(&InstanceDescriptor::default())?;
    /// let adapter = instance.wait(instance.request_adapter(None)?)?;
    /// println!("{:?}", adapter.info()?);
    /// # Ok::<(), wgpu_bind::Error>(())
    /// ```
    Instance,
    WGPUInstance
);

impl Instance {
    /// Create an instance through `library`.
    pub fn new(library: &Library, desc: &InstanceDescriptor<'_>) -> Result<Self> {
        let create = entry!(library.procs(), create_instance)?;

        let region = Region::call();
        let native = desc.marshal(&region)?;
        let raw = unsafe { create(native) };
        region.close();

        let raw = ffi::check_handle("wgpuCreateInstance", raw, WGPUInstance::is_null)?;
        unsafe { Self::from_raw(library.clone(), raw) }
    }

    /// Create an instance through the process-wide library.
    pub fn create(desc: &InstanceDescriptor<'_>) -> Result<Self> {
        Self::new(&library::library()?, desc)
    }

    /// Let callbacks the native runtime deferred to a polling point fire.
    pub fn process_events(&self) -> Result<()> {
        let raw = self.raw()?;
        let process = entry!(self.library().procs(), instance_process_events)?;
        unsafe { process(raw) };
        Ok(())
    }

    /// Request an adapter matching `options` (any adapter for `None`).
    pub fn request_adapter(&self, options: Option<&RequestAdapterOptions>) -> Result<NativeFuture<Adapter>> {
        let raw = self.raw()?;
        let request = entry!(self.library().procs(), instance_request_adapter)?;

        let scratch = Region::operation();
        let options: *const WGPURequestAdapterOptions = match options {
            Some(options) => options.marshal(&scratch)?,
            None => ptr::null(),
        };

        Ok(pending::begin(
            pending::REQUEST_ADAPTER,
            scratch,
            None,
            self.library().clone(),
            |userdata| {
                let info = WGPURequestAdapterCallbackInfo {
                    callback: Some(pending::request_adapter_callback),
                    userdata1: userdata,
                    ..Default::default()
                };
                unsafe { request(raw, options, info) }
            },
        ))
    }

    /// Process events until `future` resolves.
    pub fn wait<T>(&self, future: NativeFuture<T>) -> Result<T> {
        self.wait_until(future, None)
    }

    /// Process events until `future` resolves or `timeout` elapses.
    ///
    /// On [`Error::Timeout`] the operation stays in flight; its result is
    /// discarded when it arrives.
    pub fn wait_timeout<T>(&self, future: NativeFuture<T>, timeout: Duration) -> Result<T> {
        self.wait_until(future, Some(Instant::now() + timeout))
    }

    fn wait_until<T>(&self, mut future: NativeFuture<T>, deadline: Option<Instant>) -> Result<T> {
        loop {
            if let Some(result) = future.try_take() {
                return result;
            }
            self.process_events()?;
            if let Some(result) = future.try_take() {
                return result;
            }
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                log::debug!("timed out waiting for {}", future.op());
                return Err(Error::Timeout);
            }
            thread::yield_now();
        }
    }
}
