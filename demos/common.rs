#![allow(dead_code)]

use clap::Parser;
use ipnet::Ipv4Net;
use pnet::datalink::{self, NetworkInterface};
use std::net::IpAddr;

/// Resolve every host of the interface's IPv4 subnet, one at a time
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub(crate) struct Args {
    /// Network interface name to send and receive ARP messages
    #[arg(short, long)]
    pub(crate) iface: String,
    /// Milliseconds to wait per attempt
    #[arg(long, default_value_t = 100)]
    pub(crate) interval_ms: u64,
    /// Attempts per host
    #[arg(long, default_value_t = 3)]
    pub(crate) attempts: usize,
}

pub(crate) fn interface_from(interface_name: &str) -> NetworkInterface {
    datalink::interfaces()
        .into_iter()
        .find(|iface| iface.name == interface_name)
        .ok_or_else(|| format!("interface {} not found", interface_name))
        .unwrap()
}

pub(crate) fn net_from(interface: &NetworkInterface) -> Option<Ipv4Net> {
    let net = interface.ips.iter().find(|net| net.is_ipv4())?;
    if let IpAddr::V4(ipv4) = net.ip() {
        Ipv4Net::new(ipv4, net.prefix()).ok()
    } else {
        None
    }
}
