//! Physical adapters and device requests.

use crate::descriptor::DeviceDescriptor;
use crate::device::Device;
use crate::error::Result;
use crate::ffi::{self, *};
use crate::marshal::Marshal;
use crate::pending::{self, DeviceEvents, DeviceRequest, NativeFuture};
use crate::region::Region;
use crate::resource::define_resource;
use crate::types::{AdapterInfo, AdapterType, BackendType, FeatureName};

define_resource!(
    /// A physical GPU (or software implementation) devices are requested from.
    Adapter,
    WGPUAdapter
);

impl Adapter {
    /// Describe this adapter.
    pub fn info(&self) -> Result<AdapterInfo> {
        let raw = self.raw()?;
        let procs = self.library().procs();
        let get_info = entry!(procs, adapter_get_info)?;
        let free_members = entry!(procs, adapter_info_free_members)?;

        let mut native = WGPUAdapterInfo::default();
        let status = unsafe { get_info(raw, &mut native) };
        if status != WGPUStatus_Success {
            return Err(unsafe { ffi::error_from_status("wgpuAdapterGetInfo", status, WGPUStringView::NULL) });
        }

        let info = unsafe {
            AdapterInfo {
                vendor: ffi::string_from_view(native.vendor).unwrap_or_default(),
                architecture: ffi::string_from_view(native.architecture).unwrap_or_default(),
                device: ffi::string_from_view(native.device).unwrap_or_default(),
                description: ffi::string_from_view(native.description).unwrap_or_default(),
                backend_type: BackendType::try_from(native.backendType).unwrap_or_default(),
                adapter_type: AdapterType::try_from(native.adapterType).ok(),
                vendor_id: native.vendorID,
                device_id: native.deviceID,
            }
        };
        unsafe { free_members(native) };
        Ok(info)
    }

    /// Check if the adapter supports `feature`.
    pub fn has_feature(&self, feature: FeatureName) -> Result<bool> {
        let raw = self.raw()?;
        let has_feature = entry!(self.library().procs(), adapter_has_feature)?;
        Ok(unsafe { has_feature(raw, feature.to_native()) } != WGPU_FALSE)
    }

    /// Request a logical device (default options for `None`).
    ///
    /// The device-lost and uncaptured-error callbacks are registered as part
    /// of the request. Their shared state belongs to the native registration
    /// and is released when the native device reports its loss, so errors
    /// raised through children after [`Device::close`] still reach the
    /// handler.
    pub fn request_device(&self, desc: Option<&DeviceDescriptor<'_>>) -> Result<NativeFuture<Device>> {
        let raw = self.raw()?;
        let request = entry!(self.library().procs(), adapter_request_device)?;

        let default = DeviceDescriptor::default();
        let desc = desc.unwrap_or(&default);

        let scratch = Region::operation();
        let mut native = desc.to_native(&scratch)?;

        let events = DeviceEvents::new(desc.on_uncaptured_error.clone());
        let registration = events.register();
        native.uncapturedErrorCallbackInfo = WGPUUncapturedErrorCallbackInfo {
            callback: Some(pending::uncaptured_error_callback),
            userdata1: registration.uncaptured,
            ..Default::default()
        };
        native.deviceLostCallbackInfo = WGPUDeviceLostCallbackInfo {
            callback: Some(pending::device_lost_callback),
            userdata1: registration.lost,
            userdata2: registration.uncaptured,
            ..Default::default()
        };
        let native: *const WGPUDeviceDescriptor = scratch.alloc(native);

        let context = DeviceRequest {
            library: self.library().clone(),
            events,
        };
        let future = pending::begin(pending::REQUEST_DEVICE, scratch, None, context, |userdata| {
            let info = WGPURequestDeviceCallbackInfo {
                callback: Some(pending::request_device_callback),
                userdata1: userdata,
                ..Default::default()
            };
            unsafe { request(raw, native, info) }
        });

        if future.id() == 0 {
            // A refused request never calls back, device-lost included.
            unsafe { registration.revoke() };
        }
        Ok(future)
    }
}
