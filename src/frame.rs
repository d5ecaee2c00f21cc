//! Decoded ARP frames and their Ethernet framing.

use std::net::Ipv4Addr;

use pnet::{
    packet::{
        arp::{ArpHardwareTypes, ArpOperation, ArpOperations, ArpPacket, MutableArpPacket},
        ethernet::{EtherType, EtherTypes, EthernetPacket, MutableEthernetPacket},
        Packet,
    },
    util::MacAddr,
};
use thiserror::Error as ThisError;

use crate::constants::{ARP_PACK_LEN, ETH_PACK_LEN, IP_V4_LEN, MAC_ADDR_LEN};
use crate::error::{Error, Result};

/// Reasons a raw frame does not carry a usable ARP payload.
#[derive(ThisError, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    #[error("frame too short for an Ethernet header")]
    TruncatedEthernet,
    #[error("not an ARP frame (ether-type {0})")]
    NotArp(EtherType),
    #[error("frame too short for an ARP payload")]
    TruncatedArp,
    #[error("ARP payload does not map IPv4 to 6-byte hardware addresses")]
    UnsupportedAddressFormat,
}

/// ARP op code. Only requests and replies carry meaning here; anything else is
/// kept as its raw value so consumers can skip it.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Operation {
    Request,
    Reply,
    Other(u16),
}

impl From<ArpOperation> for Operation {
    fn from(operation: ArpOperation) -> Self {
        if operation == ArpOperations::Request {
            Operation::Request
        } else if operation == ArpOperations::Reply {
            Operation::Reply
        } else {
            Operation::Other(operation.0)
        }
    }
}

impl From<Operation> for ArpOperation {
    fn from(operation: Operation) -> Self {
        match operation {
            Operation::Request => ArpOperations::Request,
            Operation::Reply => ArpOperations::Reply,
            Operation::Other(code) => ArpOperation::new(code),
        }
    }
}

/// One ARP message mapping IPv4 addresses to Ethernet hardware addresses.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ArpFrame {
    pub operation: Operation,
    pub sender_ip: Ipv4Addr,
    pub sender_mac: MacAddr,
    pub target_ip: Ipv4Addr,
    pub target_mac: MacAddr,
}

impl ArpFrame {
    /// Decodes the ARP sub-layer of a raw Ethernet frame.
    pub fn decode(bytes: &[u8]) -> std::result::Result<Self, DecodeError> {
        EthernetEnvelope::decode(bytes).map(|envelope| envelope.payload)
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub(crate) struct EthernetEnvelope {
    pub(crate) source_mac: MacAddr,
    pub(crate) destination_mac: MacAddr,
    pub(crate) payload: ArpFrame,
}

impl EthernetEnvelope {
    pub(crate) fn decode(bytes: &[u8]) -> std::result::Result<Self, DecodeError> {
        let ethernet_packet = EthernetPacket::new(bytes).ok_or(DecodeError::TruncatedEthernet)?;
        let ethertype = ethernet_packet.get_ethertype();
        if ethertype != EtherTypes::Arp {
            return Err(DecodeError::NotArp(ethertype));
        }
        let arp_packet =
            ArpPacket::new(ethernet_packet.payload()).ok_or(DecodeError::TruncatedArp)?;
        if arp_packet.get_protocol_type() != EtherTypes::Ipv4
            || arp_packet.get_hw_addr_len() != MAC_ADDR_LEN
            || arp_packet.get_proto_addr_len() != IP_V4_LEN
        {
            return Err(DecodeError::UnsupportedAddressFormat);
        }

        Ok(Self {
            source_mac: ethernet_packet.get_source(),
            destination_mac: ethernet_packet.get_destination(),
            payload: ArpFrame {
                operation: arp_packet.get_operation().into(),
                sender_ip: arp_packet.get_sender_proto_addr(),
                sender_mac: arp_packet.get_sender_hw_addr(),
                target_ip: arp_packet.get_target_proto_addr(),
                target_mac: arp_packet.get_target_hw_addr(),
            },
        })
    }

    /// Serializes the envelope into a 42-byte Ethernet II frame.
    pub(crate) fn encode(&self) -> Result<Vec<u8>> {
        let frame = &self.payload;

        let mut arp_buf = [0; ARP_PACK_LEN];
        let mut arp_packet = MutableArpPacket::new(&mut arp_buf)
            .ok_or(Error::Opaque("failed to create ARP packet".into()))?;
        arp_packet.set_hardware_type(ArpHardwareTypes::Ethernet);
        arp_packet.set_protocol_type(EtherTypes::Ipv4);
        arp_packet.set_hw_addr_len(MAC_ADDR_LEN);
        arp_packet.set_proto_addr_len(IP_V4_LEN);
        arp_packet.set_operation(frame.operation.into());
        arp_packet.set_sender_hw_addr(frame.sender_mac);
        arp_packet.set_sender_proto_addr(frame.sender_ip);
        arp_packet.set_target_hw_addr(frame.target_mac);
        arp_packet.set_target_proto_addr(frame.target_ip);

        let mut eth_buf = vec![0; ETH_PACK_LEN];
        {
            let mut eth_packet = MutableEthernetPacket::new(&mut eth_buf)
                .ok_or(Error::Opaque("failed to create Ethernet frame".into()))?;
            eth_packet.set_destination(self.destination_mac);
            eth_packet.set_source(self.source_mac);
            eth_packet.set_ethertype(EtherTypes::Arp);
            eth_packet.set_payload(arp_packet.packet());
        }
        Ok(eth_buf)
    }
}
