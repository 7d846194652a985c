use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::{MinterError, Result};

/// Size of a Minter address, in bytes.
pub const ADDRESS_SIZE: usize = 20;

/// Size of a recoverable signature: r (32) + s (32) + v (1).
pub const SIGNATURE_SIZE: usize = 65;

const ADDRESS_PREFIX: &str = "Mx";

/// Version of the Minter app running on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AppVersion {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl AppVersion {
    /// Parse the 3-byte get-version response.
    pub fn from_response(body: &[u8]) -> Result<Self> {
        match body {
            [major, minor, patch] => Ok(Self {
                major: *major,
                minor: *minor,
                patch: *patch,
            }),
            _ => Err(MinterError::MalformedResponse {
                what: "version",
                expected: "exactly 3",
                actual: body.len(),
            }),
        }
    }
}

impl fmt::Display for AppVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl Serialize for AppVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A 20-byte Minter address, shown as `Mx` followed by 40 hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MinterAddress([u8; ADDRESS_SIZE]);

impl MinterAddress {
    pub fn new(bytes: [u8; ADDRESS_SIZE]) -> Self {
        Self(bytes)
    }

    /// Take the address from the first 20 bytes of a get-address response.
    pub fn from_response(body: &[u8]) -> Result<Self> {
        let bytes = body
            .get(..ADDRESS_SIZE)
            .and_then(|b| <[u8; ADDRESS_SIZE]>::try_from(b).ok())
            .ok_or(MinterError::MalformedResponse {
                what: "address",
                expected: "at least 20",
                actual: body.len(),
            })?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_SIZE] {
        &self.0
    }
}

impl fmt::Display for MinterAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ADDRESS_PREFIX}{}", hex::encode(self.0))
    }
}

impl FromStr for MinterAddress {
    type Err = MinterError;

    /// Accepts 40 hex digits, optionally behind an `Mx` or `0x` prefix.
    fn from_str(s: &str) -> Result<Self> {
        let digits = match s.len() {
            40 => s,
            42 => {
                let (Some(prefix), Some(rest)) = (s.get(..2), s.get(2..)) else {
                    return Err(MinterError::InvalidAddress(
                        "prefix is not two ASCII chars".to_string(),
                    ));
                };
                if !prefix.eq_ignore_ascii_case(ADDRESS_PREFIX) && prefix != "0x" {
                    return Err(MinterError::InvalidAddress(format!(
                        "unknown prefix {prefix:?}"
                    )));
                }
                rest
            }
            len => {
                return Err(MinterError::InvalidAddress(format!(
                    "hex string length must be 40 or 42 chars, got {len}"
                )))
            }
        };

        let mut bytes = [0u8; ADDRESS_SIZE];
        hex::decode_to_slice(digits, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl Serialize for MinterAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Recoverable ECDSA signature returned by sign-hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinterSignature {
    pub r: [u8; 32],
    pub s: [u8; 32],
    pub v: u8,
}

impl MinterSignature {
    /// Wire layout: r, s, v.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_SIZE] {
        let mut out = [0u8; SIGNATURE_SIZE];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.v;
        out
    }
}

impl TryFrom<&[u8]> for MinterSignature {
    type Error = MinterError;

    fn try_from(body: &[u8]) -> Result<Self> {
        let bytes: &[u8; SIGNATURE_SIZE] =
            body.try_into().map_err(|_| MinterError::MalformedResponse {
                what: "signature",
                expected: "exactly 65",
                actual: body.len(),
            })?;

        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        Ok(Self { r, s, v: bytes[64] })
    }
}

impl fmt::Display for MinterSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.to_bytes()))
    }
}

impl Serialize for MinterSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
