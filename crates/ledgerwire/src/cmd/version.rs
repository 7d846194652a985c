use serde::Serialize;

use super::VersionArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::to_json;

#[derive(Debug, Serialize)]
struct VersionInfo {
    name: &'static str,
    version: &'static str,
    target: &'static str,
    protocol: ProtocolInfo,
}

#[derive(Debug, Serialize)]
struct ProtocolInfo {
    channel: String,
    packet_size: usize,
    max_apdu_payload: usize,
    cla: String,
}

fn version_info() -> VersionInfo {
    VersionInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        target: env!("LEDGERWIRE_BUILD_TARGET"),
        protocol: ProtocolInfo {
            channel: format!("0x{:04x}", ledgerwire_frame::CHANNEL_ID),
            packet_size: ledgerwire_frame::PACKET_SIZE,
            max_apdu_payload: ledgerwire_apdu::MAX_APDU_PAYLOAD,
            cla: format!("0x{:02x}", ledgerwire_apdu::DEFAULT_CLA),
        },
    }
}

pub fn run(args: VersionArgs) -> CliResult<i32> {
    let info = version_info();
    if args.extended {
        println!("{}", to_json(&info));
    } else {
        println!("{} {}", info.name, info.version);
    }
    Ok(SUCCESS)
}
