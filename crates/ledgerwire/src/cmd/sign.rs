use ledgerwire_minter::MinterSignature;
use serde::Serialize;

use super::{DeviceArgs, SignArgs};
use crate::exit::{minter_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print, OutputFormat, Render};

const HASH_SIZE: usize = 32;

#[derive(Debug, Serialize)]
struct SignatureRecord {
    index: u32,
    hash: String,
    r: String,
    s: String,
    v: u8,
    signature: MinterSignature,
}

impl SignatureRecord {
    fn new(index: u32, hash: &[u8; HASH_SIZE], signature: MinterSignature) -> Self {
        Self {
            index,
            hash: hex::encode(hash),
            r: hex::encode(signature.r),
            s: hex::encode(signature.s),
            v: signature.v,
            signature,
        }
    }
}

impl Render for SignatureRecord {
    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("index", self.index.to_string()),
            ("hash", self.hash.clone()),
            ("r", self.r.clone()),
            ("s", self.s.clone()),
            ("v", self.v.to_string()),
        ]
    }

    fn raw(&self) -> String {
        self.signature.to_string()
    }
}

/// Parse a 32-byte hash given as hex, with or without `0x`.
fn parse_hash(input: &str) -> CliResult<[u8; HASH_SIZE]> {
    let digits = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);
    if digits.len() != HASH_SIZE * 2 {
        return Err(CliError::new(
            USAGE,
            format!(
                "hash must be {} hex digits, got {}",
                HASH_SIZE * 2,
                digits.len()
            ),
        ));
    }

    let mut hash = [0u8; HASH_SIZE];
    hex::decode_to_slice(digits, &mut hash)
        .map_err(|err| CliError::new(USAGE, format!("invalid hash: {err}")))?;
    Ok(hash)
}

pub fn run(args: SignArgs, device: &DeviceArgs, format: OutputFormat) -> CliResult<i32> {
    let hash = parse_hash(&args.hash)?;

    let mut conn = device.connect()?;
    if args.confirm {
        eprintln!("approve the signature on the device");
    }
    let signature = conn
        .app
        .sign_hash(&hash, args.index, !args.confirm)
        .map_err(|err| minter_error("sign failed", err))?;

    print(&SignatureRecord::new(args.index, &hash, signature), format);
    Ok(SUCCESS)
}
