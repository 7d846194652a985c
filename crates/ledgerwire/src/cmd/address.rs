use ledgerwire_minter::MinterAddress;
use serde::Serialize;

use super::{AddressArgs, DeviceArgs};
use crate::exit::{minter_error, CliResult, SUCCESS};
use crate::output::{print, OutputFormat, Render};

#[derive(Debug, Serialize)]
struct AddressRecord {
    index: u32,
    address: MinterAddress,
    confirmed: bool,
}

impl Render for AddressRecord {
    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("index", self.index.to_string()),
            ("address", self.address.to_string()),
            ("confirmed", self.confirmed.to_string()),
        ]
    }

    fn raw(&self) -> String {
        self.address.to_string()
    }
}

pub fn run(args: AddressArgs, device: &DeviceArgs, format: OutputFormat) -> CliResult<i32> {
    let mut conn = device.connect()?;
    if args.confirm {
        eprintln!("confirm address #{} on the device", args.index);
    }
    let address = conn
        .app
        .address(args.index, !args.confirm)
        .map_err(|err| minter_error("get address failed", err))?;

    let record = AddressRecord {
        index: args.index,
        address,
        confirmed: args.confirm,
    };
    print(&record, format);
    Ok(SUCCESS)
}
