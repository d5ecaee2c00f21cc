//! Conversions from untyped byte slices into fixed-length addresses.

use std::net::Ipv4Addr;

use pnet::util::MacAddr;

use crate::constants::{IP_V4_LEN, MAC_ADDR_LEN};
use crate::error::{AddressKind, Error, Result};

/// Interprets `bytes` as a MAC address. Anything but exactly 6 bytes is rejected.
pub fn mac_from_slice(bytes: &[u8]) -> Result<MacAddr> {
    let octets: [u8; MAC_ADDR_LEN as usize] =
        bytes.try_into().map_err(|_| Error::MalformedAddress {
            kind: AddressKind::Mac,
            expected: MAC_ADDR_LEN as usize,
            actual: bytes.len(),
        })?;
    Ok(MacAddr::from(octets))
}

/// Interprets `bytes` as an IPv4 address. Anything but exactly 4 bytes is rejected.
pub fn ipv4_from_slice(bytes: &[u8]) -> Result<Ipv4Addr> {
    let octets: [u8; IP_V4_LEN as usize] =
        bytes.try_into().map_err(|_| Error::MalformedAddress {
            kind: AddressKind::Ipv4,
            expected: IP_V4_LEN as usize,
            actual: bytes.len(),
        })?;
    Ok(Ipv4Addr::from(octets))
}
