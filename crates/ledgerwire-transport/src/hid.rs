//! Device access through `hidapi`.
//!
//! Enumeration is intentionally thin: find a Ledger by vendor id, open the
//! first matching product id. The opened handle is owned by [`HidDevice`] and
//! closed when it is dropped.

use std::time::Duration;

use hidapi::{DeviceInfo, HidApi};
use tracing::debug;

use crate::error::{Result, TransportError};
use crate::traits::{HidTransport, REPORT_SIZE};

/// USB vendor id assigned to Ledger.
pub const LEDGER_VENDOR_ID: u16 = 0x2c97;

/// Nano S product id (system menu, and apps on firmware before 1.6).
pub const NANO_S_PRODUCT_ID: u16 = 0x0001;

/// Nano S product id reported while an app runs on firmware 1.6 and later.
pub const NANO_S_APP_PRODUCT_ID: u16 = 0x1005;

/// Product ids tried, in order, when the caller does not pick one.
pub const DEFAULT_PRODUCT_IDS: [u16; 2] = [NANO_S_PRODUCT_ID, NANO_S_APP_PRODUCT_ID];

/// Usage page of the Ledger APDU interface on platforms that expose it.
const LEDGER_USAGE_PAGE: u16 = 0xffa0;

/// Configuration for an opened device.
#[derive(Debug, Clone, Default)]
pub struct HidConfig {
    /// Read timeout. `None` blocks until the device answers.
    pub read_timeout: Option<Duration>,
}

/// An opened Ledger HID device.
pub struct HidDevice {
    device: hidapi::HidDevice,
    product_id: u16,
    config: HidConfig,
}

impl HidDevice {
    /// Open the device described by `info`.
    pub fn open(api: &HidApi, info: &DeviceInfo, config: HidConfig) -> Result<Self> {
        let device = info.open_device(api).map_err(hid_error)?;
        debug!(
            vendor_id = info.vendor_id(),
            product_id = info.product_id(),
            "opened HID device"
        );
        Ok(Self {
            device,
            product_id: info.product_id(),
            config,
        })
    }

    /// USB product id of the opened device.
    pub fn product_id(&self) -> u16 {
        self.product_id
    }

    /// Current device configuration.
    pub fn config(&self) -> &HidConfig {
        &self.config
    }
}

impl HidTransport for HidDevice {
    fn write_report(&mut self, report: &[u8; REPORT_SIZE]) -> Result<usize> {
        // hidapi expects the report id in front of the report body.
        let mut buf = [0u8; REPORT_SIZE + 1];
        buf[1..].copy_from_slice(report);
        let written = self.device.write(&buf).map_err(hid_error)?;
        Ok(written.saturating_sub(1).min(REPORT_SIZE))
    }

    fn read_report(&mut self, buf: &mut [u8; REPORT_SIZE]) -> Result<usize> {
        match self.config.read_timeout {
            Some(timeout) => {
                let millis = i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX);
                let n = self
                    .device
                    .read_timeout(buf, millis)
                    .map_err(hid_error)?;
                if n == 0 {
                    return Err(TransportError::Timeout(timeout));
                }
                Ok(n)
            }
            None => self.device.read(buf).map_err(hid_error),
        }
    }
}

impl std::fmt::Debug for HidDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HidDevice")
            .field("product_id", &format_args!("0x{:04x}", self.product_id))
            .field("config", &self.config)
            .finish()
    }
}

/// List every attached Ledger APDU interface.
pub fn list_devices(api: &HidApi) -> Vec<&DeviceInfo> {
    api.device_list()
        .filter(|info| info.vendor_id() == LEDGER_VENDOR_ID)
        .filter(|info| info.interface_number() == 0 || info.usage_page() == LEDGER_USAGE_PAGE)
        .collect()
}

/// Open the first attached Ledger matching `product_ids`, tried in order.
pub fn open_first(api: &HidApi, product_ids: &[u16], config: HidConfig) -> Result<HidDevice> {
    let devices = list_devices(api);
    for product_id in product_ids {
        if let Some(info) = devices.iter().find(|info| info.product_id() == *product_id) {
            return HidDevice::open(api, info, config);
        }
        debug!(product_id, "no Ledger with product id");
    }
    Err(TransportError::NotFound {
        vendor_id: LEDGER_VENDOR_ID,
        product_ids: product_ids.to_vec(),
    })
}

fn hid_error(err: hidapi::HidError) -> TransportError {
    TransportError::Hid(err.to_string())
}
