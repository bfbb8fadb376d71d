use std::time::Duration;

use hidapi::{HidApi, HidDevice};
use tracing::debug;

use crate::error::{HidError, Result};

/// USB vendor id of the supported CO2 monitor (Holtek).
pub const VENDOR_ID: u16 = 0x04d9;

/// USB product id of the supported CO2 monitor.
pub const PRODUCT_ID: u16 = 0xa052;

/// The device operations the session layer depends on.
///
/// Both calls report byte counts so callers can verify the device accepted
/// or produced exactly what the protocol expects. Implemented by
/// [`SensorDevice`] for real hardware and by scripted fakes in tests.
pub trait DeviceTransport: Send + 'static {
    /// Send a feature report (report-id byte included). Returns the number
    /// of bytes the device accepted.
    fn send_feature_report(&mut self, data: &[u8]) -> Result<usize>;

    /// Blocking read with a timeout. Returns the number of bytes read.
    /// A device-side timeout is reported as [`HidError::ReadTimeout`].
    fn read_timeout(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize>;
}

/// An open CO2 monitor.
///
/// Owns the `hidapi` subsystem handle alongside the device so the subsystem
/// outlives the open handle. Both are released when the value drops; that
/// drop is the sole teardown path.
pub struct SensorDevice {
    device: HidDevice,
    _api: HidApi,
}

impl SensorDevice {
    /// Open the first attached device matching the given identity.
    pub fn open_first(vendor_id: u16, product_id: u16) -> Result<Self> {
        let api = HidApi::new().map_err(HidError::Init)?;

        let attached = api
            .device_list()
            .any(|info| info.vendor_id() == vendor_id && info.product_id() == product_id);
        if !attached {
            return Err(HidError::NotFound {
                vendor_id,
                product_id,
            });
        }

        let device = api
            .open(vendor_id, product_id)
            .map_err(|source| HidError::Open {
                vendor_id,
                product_id,
                source,
            })?;

        debug!(vendor_id, product_id, "opened HID device");

        Ok(Self { device, _api: api })
    }

    /// Product string reported by the device, if any.
    pub fn product_string(&self) -> Option<String> {
        self.device.get_product_string().ok().flatten()
    }

    /// Manufacturer string reported by the device, if any.
    pub fn manufacturer_string(&self) -> Option<String> {
        self.device.get_manufacturer_string().ok().flatten()
    }
}

impl DeviceTransport for SensorDevice {
    fn send_feature_report(&mut self, data: &[u8]) -> Result<usize> {
        self.device
            .send_feature_report(data)
            .map_err(HidError::FeatureReport)?;
        // hidapi surfaces success only when the full report was accepted;
        // the C-level byte count is consumed by the binding.
        Ok(data.len())
    }

    fn read_timeout(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize> {
        let millis = i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX);
        let read = self
            .device
            .read_timeout(buf, millis)
            .map_err(HidError::Read)?;

        if read == 0 {
            return Err(HidError::ReadTimeout(timeout));
        }

        Ok(read)
    }
}

impl std::fmt::Debug for SensorDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SensorDevice")
            .field("product", &self.product_string())
            .finish()
    }
}
