//! Bridge from native callbacks to awaitable futures.
//!
//! An asynchronous native call registers a callback that fires exactly once,
//! possibly inside the registering call, later on an arbitrary thread, or
//! during [`Instance::process_events`](crate::Instance::process_events).
//! [`begin`] packages everything that must survive until then into an
//! [`Arc`]ed `PendingOperation`, hands one strong reference to the native side
//! as `userdata1` and returns a [`NativeFuture`] for the result.
//!
//! The callback is resolved through a single `Mutex<Option<_>>::take`: the
//! path that takes the parts is the only one that closes the operation's
//! regions and the only one that sends a result. A second claim finds nothing
//! and is logged as a native contract violation.
//!
//! Each callback family has its own trampoline:
//!
//! - request-adapter and request-device deliver an object; success with a
//!   null object is [`Error::MissingObject`];
//! - buffer-map and queue-work-done deliver nothing on success;
//! - pop-error-scope delivers `Option<GpuError>` where `None` is the good
//!   outcome;
//! - device-lost fires a one-shot signal that fans out to every
//!   `Device::lost` future;
//! - uncaptured-error fires any number of times and calls the device's
//!   handler, or logs.
//!
//! The last two share one `DeviceEvents` owned by the native registration,
//! so they stay valid for as long as the native device can call them.

use std::future::Future;
use std::os::raw::c_void;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::channel::oneshot;
use parking_lot::Mutex;

use crate::adapter::Adapter;
use crate::device::Device;
use crate::error::{Error, Result};
use crate::ffi::{self, WGPUAdapter, WGPUDevice, WGPUEnum, WGPUFuture, WGPUStringView};
use crate::library::Library;
use crate::region::Region;
use crate::resource::NativeHandle;
use crate::types::{DeviceLost, DeviceLostReason, ErrorHandler, ErrorType, GpuError};

pub(crate) const REQUEST_ADAPTER: &str = "wgpuInstanceRequestAdapter";
pub(crate) const REQUEST_DEVICE: &str = "wgpuAdapterRequestDevice";
pub(crate) const BUFFER_MAP: &str = "wgpuBufferMapAsync";
pub(crate) const WORK_DONE: &str = "wgpuQueueOnSubmittedWorkDone";
pub(crate) const POP_ERROR_SCOPE: &str = "wgpuDevicePopErrorScope";
pub(crate) const DEVICE_LOST: &str = "device lost";

/// Result of an asynchronous native operation.
///
/// Resolves exactly once. Dropping the future does not cancel the native
/// operation; its result is discarded when it arrives.
#[must_use = "futures do nothing unless polled or waited on"]
pub struct NativeFuture<T> {
    op: &'static str,
    id: u64,
    rx: oneshot::Receiver<Result<T>>,
}

impl<T> NativeFuture<T> {
    fn new(op: &'static str, id: u64, rx: oneshot::Receiver<Result<T>>) -> Self {
        Self { op, id, rx }
    }

    /// Native future id; 0 for futures not backed by a native token.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Name of the native operation.
    pub fn op(&self) -> &'static str {
        self.op
    }

    /// Take the result if it has arrived, without blocking.
    pub fn try_take(&mut self) -> Option<Result<T>> {
        match self.rx.try_recv() {
            Ok(Some(result)) => Some(result),
            Ok(None) => None,
            Err(oneshot::Canceled) => Some(Err(Error::CallbackDropped { op: self.op })),
        }
    }
}

impl<T> Future for NativeFuture<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let op = self.op;
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(Err(Error::CallbackDropped { op })),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T> std::fmt::Debug for NativeFuture<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeFuture")
            .field("op", &self.op)
            .field("id", &self.id)
            .finish()
    }
}

struct Parts<T, C> {
    scratch: Region,
    retained: Option<Region>,
    context: C,
    tx: oneshot::Sender<Result<T>>,
}

/// State of one in-flight native call.
pub(crate) struct PendingOperation<T, C> {
    op: &'static str,
    state: Mutex<Option<Parts<T, C>>>,
}

impl<T, C> PendingOperation<T, C> {
    /// Claim the operation and resolve it with the result of `f`.
    ///
    /// `f` receives the context and the retained region; the scratch region
    /// is closed after `f` returns. Returns `false` if the operation had
    /// already been resolved.
    fn resolve(&self, f: impl FnOnce(C, Option<Region>) -> Result<T>) -> bool {
        let Some(parts) = self.state.lock().take() else {
            log::error!("{} callback fired for an operation that already resolved", self.op);
            return false;
        };
        let Parts {
            scratch,
            retained,
            context,
            tx,
        } = parts;

        let result = f(context, retained);
        scratch.close();

        if let Err(e) = &result {
            log::debug!("{} failed: {}", self.op, e);
        }
        if tx.send(result).is_err() {
            log::debug!("{} resolved after its future was dropped", self.op);
        }
        true
    }

    /// Take back the reference handed to the native side.
    ///
    /// # Safety
    ///
    /// `userdata` must come from [`begin`] for this exact `T` and `C`, and
    /// must be reclaimed at most once.
    unsafe fn reclaim(userdata: *mut c_void) -> Arc<Self> {
        Arc::from_raw(userdata as *const Self)
    }
}

/// Issue an asynchronous native call.
///
/// `scratch` must already hold everything the call reads. `retained` is the
/// region the result may depend on after the callback returns; the resolving
/// path either promotes it into the result or closes it. `issue` receives the
/// `userdata1` pointer for the callback info and performs the native call.
///
/// A zero future id means the native side refused the call: the operation is
/// resolved with [`Error::Rejected`] and its regions are closed before this
/// function returns.
pub(crate) fn begin<T, C>(
    op: &'static str,
    scratch: Region,
    retained: Option<Region>,
    context: C,
    issue: impl FnOnce(*mut c_void) -> WGPUFuture,
) -> NativeFuture<T>
where
    T: Send + 'static,
    C: Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    let pending = Arc::new(PendingOperation {
        op,
        state: Mutex::new(Some(Parts {
            scratch,
            retained,
            context,
            tx,
        })),
    });

    let userdata = Arc::into_raw(Arc::clone(&pending)) as *mut c_void;
    let future = issue(userdata);

    if future.id == 0 {
        log::warn!("{} returned a null future", op);
        // Winning the claim means the callback never ran and never will, so
        // the native side's reference is still outstanding.
        if pending.resolve(|_, _| Err(Error::Rejected { op })) {
            drop(unsafe { PendingOperation::<T, C>::reclaim(userdata) });
        }
    } else {
        log::trace!("{} issued as future {}", op, future.id);
    }

    NativeFuture::new(op, future.id, rx)
}

/// Shared status/object rule of the request-adapter and request-device
/// families.
unsafe fn object_result<H: NativeHandle, R>(
    op: &'static str,
    status: WGPUEnum,
    success: WGPUEnum,
    raw: H,
    message: WGPUStringView,
    wrap: impl FnOnce(H) -> Result<R>,
) -> Result<R> {
    if status != success {
        return Err(ffi::error_from_status(op, status, message));
    }
    if raw.is_null() {
        log::error!("{} reported success despite missing object", op);
        return Err(Error::MissingObject { op });
    }
    wrap(raw)
}

unsafe fn status_result(op: &'static str, status: WGPUEnum, success: WGPUEnum, message: WGPUStringView) -> Result<()> {
    if status == success {
        Ok(())
    } else {
        Err(ffi::error_from_status(op, status, message))
    }
}

// ============================================================================
// Object results
// ============================================================================

pub(crate) unsafe extern "C" fn request_adapter_callback(
    status: WGPUEnum,
    adapter: WGPUAdapter,
    message: WGPUStringView,
    userdata1: *mut c_void,
    _userdata2: *mut c_void,
) {
    let pending = PendingOperation::<Adapter, Library>::reclaim(userdata1);
    pending.resolve(|library, _| {
        object_result(
            REQUEST_ADAPTER,
            status,
            ffi::WGPURequestAdapterStatus_Success,
            adapter,
            message,
            |raw| Adapter::from_raw(library, raw),
        )
    });
}

/// Context carried by a device request.
pub(crate) struct DeviceRequest {
    pub(crate) library: Library,
    pub(crate) events: Arc<DeviceEvents>,
}

pub(crate) unsafe extern "C" fn request_device_callback(
    status: WGPUEnum,
    device: WGPUDevice,
    message: WGPUStringView,
    userdata1: *mut c_void,
    _userdata2: *mut c_void,
) {
    let pending = PendingOperation::<Device, DeviceRequest>::reclaim(userdata1);
    pending.resolve(|request, retained| {
        object_result(
            REQUEST_DEVICE,
            status,
            ffi::WGPURequestDeviceStatus_Success,
            device,
            message,
            |raw| {
                let region = retained.map(Region::promote).transpose()?;
                Device::from_parts(request.library, raw, region, request.events)
            },
        )
    });
}

// ============================================================================
// Unit results
// ============================================================================

pub(crate) unsafe extern "C" fn buffer_map_callback(
    status: WGPUEnum,
    message: WGPUStringView,
    userdata1: *mut c_void,
    _userdata2: *mut c_void,
) {
    let pending = PendingOperation::<(), ()>::reclaim(userdata1);
    pending.resolve(|(), _| status_result(BUFFER_MAP, status, ffi::WGPUMapAsyncStatus_Success, message));
}

pub(crate) unsafe extern "C" fn work_done_callback(status: WGPUEnum, userdata1: *mut c_void, _userdata2: *mut c_void) {
    let pending = PendingOperation::<(), ()>::reclaim(userdata1);
    pending.resolve(|(), _| {
        status_result(
            WORK_DONE,
            status,
            ffi::WGPUQueueWorkDoneStatus_Success,
            WGPUStringView::NULL,
        )
    });
}

// ============================================================================
// Error scopes
// ============================================================================

pub(crate) unsafe extern "C" fn pop_error_scope_callback(
    status: WGPUEnum,
    error_type: WGPUEnum,
    message: WGPUStringView,
    userdata1: *mut c_void,
    _userdata2: *mut c_void,
) {
    let pending = PendingOperation::<Option<GpuError>, ()>::reclaim(userdata1);
    pending.resolve(|(), _| {
        status_result(POP_ERROR_SCOPE, status, ffi::WGPUPopErrorScopeStatus_Success, message)?;
        match ErrorType::try_from(error_type)? {
            ErrorType::NoError => Ok(None),
            kind => Ok(Some(GpuError {
                kind,
                message: ffi::message_from_view(message),
            })),
        }
    });
}

// ============================================================================
// Device events
// ============================================================================

#[derive(Default)]
struct LostState {
    lost: Option<DeviceLost>,
    waiters: Vec<oneshot::Sender<Result<DeviceLost>>>,
}

/// Device-lost signal and uncaptured-error handler of one native device.
///
/// The native device, not the [`Device`] wrapper, decides how long this must
/// live: children keep the native device alive after the wrapper is closed
/// and may still report errors through it. The native side therefore owns
/// two strong references (see [`DeviceEvents::register`]), both reclaimed by
/// [`device_lost_callback`], the last callback a native device makes.
#[derive(Default)]
pub(crate) struct DeviceEvents {
    state: Mutex<LostState>,
    handler: Option<ErrorHandler>,
}

/// The userdata pointers handed to the native side for one device.
pub(crate) struct Registration {
    /// Device-lost `userdata1`.
    pub(crate) lost: *mut c_void,
    /// Uncaptured-error `userdata1`, repeated as device-lost `userdata2`.
    pub(crate) uncaptured: *mut c_void,
}

impl Registration {
    /// Take back both references when the native side will never call.
    ///
    /// # Safety
    ///
    /// No callback of this registration may run, now or later.
    pub(crate) unsafe fn revoke(self) {
        drop(Arc::from_raw(self.lost as *const DeviceEvents));
        drop(Arc::from_raw(self.uncaptured as *const DeviceEvents));
    }
}

impl DeviceEvents {
    pub(crate) fn new(handler: Option<ErrorHandler>) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::default(),
            handler,
        })
    }

    /// Hand two strong references to the native side, one per callback.
    pub(crate) fn register(self: &Arc<Self>) -> Registration {
        Registration {
            lost: Arc::into_raw(Arc::clone(self)) as *mut c_void,
            uncaptured: Arc::into_raw(Arc::clone(self)) as *mut c_void,
        }
    }

    /// Future resolving once the device is lost, immediately if it already
    /// was.
    pub(crate) fn subscribe(&self) -> NativeFuture<DeviceLost> {
        let (tx, rx) = oneshot::channel();
        let mut state = self.state.lock();
        match &state.lost {
            Some(lost) => {
                let _ = tx.send(Ok(lost.clone()));
            }
            None => state.waiters.push(tx),
        }
        NativeFuture::new(DEVICE_LOST, 0, rx)
    }

    pub(crate) fn get(&self) -> Option<DeviceLost> {
        self.state.lock().lost.clone()
    }

    fn fire(&self, lost: DeviceLost) {
        let waiters = {
            let mut state = self.state.lock();
            if state.lost.is_some() {
                log::error!("device lost callback fired twice");
                return;
            }
            state.lost = Some(lost.clone());
            std::mem::take(&mut state.waiters)
        };
        for tx in waiters {
            let _ = tx.send(Ok(lost.clone()));
        }
    }

    fn report(&self, error: GpuError) {
        match &self.handler {
            Some(handler) => {
                if panic::catch_unwind(AssertUnwindSafe(|| handler(&error))).is_err() {
                    log::error!("uncaptured error handler panicked");
                }
            }
            None => log::error!("uncaptured device error: {}", error),
        }
    }
}

pub(crate) unsafe extern "C" fn device_lost_callback(
    _device: *const WGPUDevice,
    reason: WGPUEnum,
    message: WGPUStringView,
    userdata1: *mut c_void,
    userdata2: *mut c_void,
) {
    if userdata1.is_null() {
        return;
    }
    let events = Arc::from_raw(userdata1 as *const DeviceEvents);
    let reason = DeviceLostReason::try_from(reason).unwrap_or_else(|e| {
        log::warn!("{}", e);
        DeviceLostReason::Unknown
    });
    let message = ffi::message_from_view(message);
    log::debug!("device lost ({:?}): {}", reason, message);
    events.fire(DeviceLost { reason, message });

    // The uncaptured-error registration ends with the device.
    if !userdata2.is_null() {
        drop(Arc::from_raw(userdata2 as *const DeviceEvents));
    }
}

pub(crate) unsafe extern "C" fn uncaptured_error_callback(
    _device: *const WGPUDevice,
    error_type: WGPUEnum,
    message: WGPUStringView,
    userdata1: *mut c_void,
    _userdata2: *mut c_void,
) {
    let error = GpuError {
        kind: ErrorType::try_from(error_type).unwrap_or(ErrorType::Unknown),
        message: ffi::message_from_view(message),
    };
    match (userdata1 as *const DeviceEvents).as_ref() {
        Some(events) => events.report(error),
        None => log::error!("uncaptured device error: {}", error),
    }
}
