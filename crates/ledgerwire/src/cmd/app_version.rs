use ledgerwire_minter::AppVersion;
use serde::Serialize;

use super::{AppVersionArgs, DeviceArgs};
use crate::exit::{minter_error, CliResult, SUCCESS};
use crate::output::{print, OutputFormat, Render};

#[derive(Debug, Serialize)]
struct AppVersionRecord {
    version: String,
    major: u8,
    minor: u8,
    patch: u8,
}

impl From<AppVersion> for AppVersionRecord {
    fn from(version: AppVersion) -> Self {
        Self {
            version: version.to_string(),
            major: version.major,
            minor: version.minor,
            patch: version.patch,
        }
    }
}

impl Render for AppVersionRecord {
    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![("app", "Minter".to_string()), ("version", self.version.clone())]
    }

    fn raw(&self) -> String {
        self.version.clone()
    }
}

pub fn run(_args: AppVersionArgs, device: &DeviceArgs, format: OutputFormat) -> CliResult<i32> {
    let mut conn = device.connect()?;
    let version = conn
        .app
        .version()
        .map_err(|err| minter_error("get version failed", err))?;

    print(&AppVersionRecord::from(version), format);
    Ok(SUCCESS)
}
