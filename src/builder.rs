//! Stateless construction of outbound ARP frames.
//!
//! The slice-based functions validate address lengths before encoding anything;
//! the typed `*_frame` variants are for callers that already hold
//! [`Ipv4Addr`]/[`MacAddr`] values.

use std::net::Ipv4Addr;

use pnet::util::MacAddr;

use crate::address::{ipv4_from_slice, mac_from_slice};
use crate::error::Result;
use crate::frame::{ArpFrame, EthernetEnvelope, Operation};

/// Builds a broadcast ARP request asking who owns `target_ip`.
///
/// # Errors
/// Returns [`crate::error::Error::MalformedAddress`] if an IP address is not 4
/// bytes long or the MAC address is not 6 bytes long.
///
/// # Example
/// ```
/// use arp_resolver::builder::build_request;
///
/// let frame = build_request(
///     &[192, 0, 2, 1],
///     &[0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff],
///     &[192, 0, 2, 2],
/// )
/// .unwrap();
/// assert_eq!(frame.len(), 42);
/// assert_eq!(&frame[..6], &[0xff; 6]);
/// ```
pub fn build_request(source_ip: &[u8], source_mac: &[u8], target_ip: &[u8]) -> Result<Vec<u8>> {
    let source_ip = ipv4_from_slice(source_ip)?;
    let target_ip = ipv4_from_slice(target_ip)?;
    let source_mac = mac_from_slice(source_mac)?;
    request_frame(source_ip, source_mac, target_ip)
}

/// Builds an ARP reply telling `target_mac` that `source_ip` lives at `source_mac`.
///
/// # Errors
/// Returns [`crate::error::Error::MalformedAddress`] if an IP address is not 4
/// bytes long or a MAC address is not 6 bytes long.
pub fn build_reply(
    source_ip: &[u8],
    source_mac: &[u8],
    target_ip: &[u8],
    target_mac: &[u8],
) -> Result<Vec<u8>> {
    let source_ip = ipv4_from_slice(source_ip)?;
    let target_ip = ipv4_from_slice(target_ip)?;
    let source_mac = mac_from_slice(source_mac)?;
    let target_mac = mac_from_slice(target_mac)?;
    reply_frame(source_ip, source_mac, target_ip, target_mac)
}

pub fn request_frame(
    source_ip: Ipv4Addr,
    source_mac: MacAddr,
    target_ip: Ipv4Addr,
) -> Result<Vec<u8>> {
    EthernetEnvelope {
        source_mac,
        destination_mac: MacAddr::broadcast(),
        payload: ArpFrame {
            operation: Operation::Request,
            sender_ip: source_ip,
            sender_mac: source_mac,
            target_ip,
            target_mac: MacAddr::zero(),
        },
    }
    .encode()
}

pub fn reply_frame(
    source_ip: Ipv4Addr,
    source_mac: MacAddr,
    target_ip: Ipv4Addr,
    target_mac: MacAddr,
) -> Result<Vec<u8>> {
    EthernetEnvelope {
        source_mac,
        destination_mac: target_mac,
        payload: ArpFrame {
            operation: Operation::Reply,
            sender_ip: source_ip,
            sender_mac: source_mac,
            target_ip,
            target_mac,
        },
    }
    .encode()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AddressKind, Error};

    const SOURCE_IP: [u8; 4] = [192, 0, 2, 1];
    const SOURCE_MAC: [u8; 6] = [0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff];
    const TARGET_IP: [u8; 4] = [192, 0, 2, 2];
    const TARGET_MAC: [u8; 6] = [0x02, 0x42, 0xac, 0x11, 0x00, 0x02];

    #[test]
    fn test_request_wire_layout() {
        let frame = build_request(&SOURCE_IP, &SOURCE_MAC, &TARGET_IP).unwrap();
        assert_eq!(frame.len(), 42);
        assert_eq!(&frame[0..6], &[0xff; 6]);
        assert_eq!(&frame[6..12], &SOURCE_MAC);
        assert_eq!(&frame[12..14], &[0x08, 0x06]);
        // htype, ptype, hlen, plen
        assert_eq!(&frame[14..20], &[0x00, 0x01, 0x08, 0x00, 6, 4]);
        assert_eq!(&frame[20..22], &[0x00, 0x01]);
        assert_eq!(&frame[22..28], &SOURCE_MAC);
        assert_eq!(&frame[28..32], &SOURCE_IP);
        assert_eq!(&frame[32..38], &[0; 6]);
        assert_eq!(&frame[38..42], &TARGET_IP);
    }

    #[test]
    fn test_request_decodes_back() {
        let frame = build_request(&SOURCE_IP, &SOURCE_MAC, &TARGET_IP).unwrap();
        let arp = ArpFrame::decode(&frame).unwrap();
        assert_eq!(arp.operation, Operation::Request);
        assert_eq!(arp.sender_ip, Ipv4Addr::from(SOURCE_IP));
        assert_eq!(arp.sender_mac, MacAddr::from(SOURCE_MAC));
        assert_eq!(arp.target_ip, Ipv4Addr::from(TARGET_IP));
        assert_eq!(arp.target_mac, MacAddr::zero());
    }

    #[test]
    fn test_reply_decodes_back() {
        let frame = build_reply(&SOURCE_IP, &SOURCE_MAC, &TARGET_IP, &TARGET_MAC).unwrap();
        assert_eq!(&frame[0..6], &TARGET_MAC);
        assert_eq!(&frame[20..22], &[0x00, 0x02]);

        let envelope = EthernetEnvelope::decode(&frame).unwrap();
        assert_eq!(envelope.source_mac, MacAddr::from(SOURCE_MAC));
        assert_eq!(envelope.destination_mac, MacAddr::from(TARGET_MAC));
        assert_eq!(
            envelope.payload,
            ArpFrame {
                operation: Operation::Reply,
                sender_ip: Ipv4Addr::from(SOURCE_IP),
                sender_mac: MacAddr::from(SOURCE_MAC),
                target_ip: Ipv4Addr::from(TARGET_IP),
                target_mac: MacAddr::from(TARGET_MAC),
            }
        );
    }

    #[test]
    fn test_edge_addresses_decode_back() {
        let ips: [[u8; 4]; 3] = [[0, 0, 0, 0], [255, 255, 255, 255], [192, 0, 2, 77]];
        let macs: [[u8; 6]; 3] = [[0xff; 6], [0; 6], [0x3c, 0x22, 0xfb, 0x01, 0x9a, 0x7e]];

        for source_ip in ips {
            for target_ip in ips {
                for source_mac in macs {
                    let request = build_request(&source_ip, &source_mac, &target_ip).unwrap();
                    let envelope = EthernetEnvelope::decode(&request).unwrap();
                    assert_eq!(envelope.source_mac, MacAddr::from(source_mac));
                    assert_eq!(envelope.destination_mac, MacAddr::broadcast());
                    assert_eq!(
                        envelope.payload,
                        ArpFrame {
                            operation: Operation::Request,
                            sender_ip: Ipv4Addr::from(source_ip),
                            sender_mac: MacAddr::from(source_mac),
                            target_ip: Ipv4Addr::from(target_ip),
                            target_mac: MacAddr::zero(),
                        }
                    );

                    for target_mac in macs {
                        let reply =
                            build_reply(&source_ip, &source_mac, &target_ip, &target_mac).unwrap();
                        let envelope = EthernetEnvelope::decode(&reply).unwrap();
                        assert_eq!(envelope.source_mac, MacAddr::from(source_mac));
                        assert_eq!(envelope.destination_mac, MacAddr::from(target_mac));
                        assert_eq!(
                            envelope.payload,
                            ArpFrame {
                                operation: Operation::Reply,
                                sender_ip: Ipv4Addr::from(source_ip),
                                sender_mac: MacAddr::from(source_mac),
                                target_ip: Ipv4Addr::from(target_ip),
                                target_mac: MacAddr::from(target_mac),
                            }
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_short_and_long_ip_rejected() {
        for bad_ip in [&[192u8, 0, 2][..], &[192, 0, 2, 1, 7]] {
            assert!(matches!(
                build_request(bad_ip, &SOURCE_MAC, &TARGET_IP),
                Err(Error::MalformedAddress {
                    kind: AddressKind::Ipv4,
                    ..
                })
            ));
            assert!(matches!(
                build_request(&SOURCE_IP, &SOURCE_MAC, bad_ip),
                Err(Error::MalformedAddress {
                    kind: AddressKind::Ipv4,
                    ..
                })
            ));
            assert!(matches!(
                build_reply(&SOURCE_IP, &SOURCE_MAC, bad_ip, &TARGET_MAC),
                Err(Error::MalformedAddress {
                    kind: AddressKind::Ipv4,
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_bad_mac_rejected() {
        assert!(matches!(
            build_request(&SOURCE_IP, &SOURCE_MAC[..5], &TARGET_IP),
            Err(Error::MalformedAddress {
                kind: AddressKind::Mac,
                expected: 6,
                actual: 5,
            })
        ));
        assert!(matches!(
            build_reply(&SOURCE_IP, &SOURCE_MAC, &TARGET_IP, &[0; 7]),
            Err(Error::MalformedAddress {
                kind: AddressKind::Mac,
                expected: 6,
                actual: 7,
            })
        ));
    }
}
