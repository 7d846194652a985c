use ledgerwire_transport::list_devices;
use serde::Serialize;

use super::{open_hid_api, DevicesArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print, OutputFormat, Render};

#[derive(Debug, Serialize)]
struct DeviceRecord {
    product_id: String,
    product: Option<String>,
    serial: Option<String>,
    interface: i32,
    path: String,
}

#[derive(Debug, Serialize)]
struct DeviceList {
    devices: Vec<DeviceRecord>,
}

impl Render for DeviceList {
    fn fields(&self) -> Vec<(&'static str, String)> {
        if self.devices.is_empty() {
            return vec![("devices", "none".to_string())];
        }
        self.devices
            .iter()
            .map(|device| {
                let product = device.product.as_deref().unwrap_or("-");
                (
                    "device",
                    format!("{} {} ({})", device.product_id, product, device.path),
                )
            })
            .collect()
    }

    fn raw(&self) -> String {
        self.devices
            .iter()
            .map(|device| device.path.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn run(_args: DevicesArgs, format: OutputFormat) -> CliResult<i32> {
    let api = open_hid_api()?;
    let devices = list_devices(&api)
        .into_iter()
        .map(|info| DeviceRecord {
            product_id: format!("0x{:04x}", info.product_id()),
            product: info.product_string().map(str::to_string),
            serial: info.serial_number().map(str::to_string),
            interface: info.interface_number(),
            path: info.path().to_string_lossy().into_owned(),
        })
        .collect();

    print(&DeviceList { devices }, format);
    Ok(SUCCESS)
}
