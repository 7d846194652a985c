use std::time::Duration;

use clap::{Args, Subcommand};
use ledgerwire_minter::MinterApp;
use ledgerwire_transport::{open_first, HidApi, HidConfig, HidDevice, DEFAULT_PRODUCT_IDS};
use tracing::info;

use crate::exit::{transport_error, CliError, CliResult, TRANSPORT_ERROR, USAGE};
use crate::output::OutputFormat;

pub mod address;
pub mod app_version;
pub mod devices;
pub mod sign;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List attached Ledger devices.
    Devices(DevicesArgs),
    /// Show the Minter app version running on the device.
    AppVersion(AppVersionArgs),
    /// Derive the address for a key index.
    Address(AddressArgs),
    /// Sign a 32-byte transaction hash.
    Sign(SignArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, device: &DeviceArgs, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Devices(args) => devices::run(args, format),
        Command::AppVersion(args) => app_version::run(args, device, format),
        Command::Address(args) => address::run(args, device, format),
        Command::Sign(args) => sign::run(args, device, format),
        Command::Version(args) => version::run(args),
    }
}

/// Device selection, shared by every command that talks to the app.
#[derive(Args, Debug)]
pub struct DeviceArgs {
    /// USB product ids to try, in order (hex). Default: 0x0001,0x1005.
    #[arg(
        long = "product-id",
        value_name = "PID",
        value_delimiter = ',',
        value_parser = parse_product_id,
        global = true
    )]
    pub product_ids: Vec<u16>,

    /// Give up on a device read after this long (e.g. 30s, 500ms).
    #[arg(long, value_name = "DURATION", global = true)]
    pub read_timeout: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct DevicesArgs {}

#[derive(Args, Debug, Default)]
pub struct AppVersionArgs {}

#[derive(Args, Debug)]
pub struct AddressArgs {
    /// Key derivation index.
    #[arg(long, short = 'i', default_value = "0")]
    pub index: u32,
    /// Show the address on the device and wait for the user.
    #[arg(long)]
    pub confirm: bool,
}

#[derive(Args, Debug)]
pub struct SignArgs {
    /// Transaction hash, 64 hex digits (optional 0x prefix).
    pub hash: String,
    /// Key derivation index.
    #[arg(long, short = 'i', default_value = "0")]
    pub index: u32,
    /// Ask the user to approve the signature on the device.
    #[arg(long)]
    pub confirm: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// An opened device with the Minter app on top.
///
/// Fields drop in order: the device handle closes before the HID context.
pub struct Connection {
    pub app: MinterApp<HidDevice>,
    _api: HidApi,
}

impl DeviceArgs {
    fn product_ids(&self) -> Vec<u16> {
        if self.product_ids.is_empty() {
            DEFAULT_PRODUCT_IDS.to_vec()
        } else {
            self.product_ids.clone()
        }
    }

    fn hid_config(&self) -> CliResult<HidConfig> {
        let read_timeout = self
            .read_timeout
            .as_deref()
            .map(parse_duration)
            .transpose()?;
        Ok(HidConfig { read_timeout })
    }

    /// Open the first matching device.
    pub fn connect(&self) -> CliResult<Connection> {
        let config = self.hid_config()?;
        let api = open_hid_api()?;
        let device = open_first(&api, &self.product_ids(), config)
            .map_err(|err| transport_error("open failed", err))?;
        info!(
            product_id = device.product_id(),
            "using Ledger device"
        );

        Ok(Connection {
            app: MinterApp::new(device),
            _api: api,
        })
    }
}

pub fn open_hid_api() -> CliResult<HidApi> {
    HidApi::new().map_err(|err| {
        CliError::new(TRANSPORT_ERROR, format!("could not create HID context: {err}"))
    })
}

fn parse_product_id(input: &str) -> Result<u16, String> {
    let digits = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);
    u16::from_str_radix(digits, 16).map_err(|err| format!("invalid product id {input:?}: {err}"))
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;
    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    Ok(if millis {
        Duration::from_millis(value)
    } else {
        Duration::from_secs(value)
    })
}
