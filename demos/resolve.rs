use arp_resolver::{transport, Resolver, ResolverConfigBuilder};
use clap::Parser;
use pnet::datalink;
use std::io::Write;
use std::net::{IpAddr, Ipv4Addr};

/// Broadcast one ARP request and report the target hardware address of the
/// first observed request or reply aimed at the given IPv4 address
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Network interface name to send and receive ARP messages
    #[arg(short, long)]
    iface: String,
    /// Target protocol address to watch for
    #[arg(short, long)]
    target: Ipv4Addr,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();
    let interface = datalink::interfaces()
        .into_iter()
        .find(|iface| iface.name == args.iface)
        .ok_or_else(|| format!("interface {} not found", args.iface))
        .unwrap();
    let source_mac = interface
        .mac
        .ok_or("interface does not have mac address")
        .unwrap();
    let source_ip = interface
        .ips
        .iter()
        .find_map(|net| match net.ip() {
            IpAddr::V4(ipv4) => Some(ipv4),
            IpAddr::V6(_) => None,
        })
        .ok_or("interface does not have an IPv4 address")
        .unwrap();

    let stream = transport::open(&args.iface).unwrap();
    let mut resolver = Resolver::new(
        stream,
        source_ip,
        source_mac,
        ResolverConfigBuilder::new().build(),
    );

    let outcome = resolver.resolve(args.target).await;
    {
        let mut stdout = std::io::stdout().lock();
        match outcome {
            Ok(mac) => writeln!(stdout, "{} is at {}", args.target, mac).unwrap(),
            Err(err) => writeln!(stdout, "{}", err).unwrap(),
        }
    }
}
