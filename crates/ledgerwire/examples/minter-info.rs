//! Print the app version and first address of an attached Nano S.
//!
//! Run with: cargo run -p ledgerwire --example minter-info --features hid

use ledgerwire::minter::MinterApp;
use ledgerwire::transport::{open_first, HidApi, HidConfig, DEFAULT_PRODUCT_IDS};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let api = HidApi::new()?;
    let device = open_first(&api, &DEFAULT_PRODUCT_IDS, HidConfig::default())?;
    println!("[using Nano S with product id: 0x{:04x}]", device.product_id());

    let mut app = MinterApp::new(device);
    println!("Ledger app version: {}", app.version()?);
    println!("My address: {}", app.address(0, true)?);
    Ok(())
}
