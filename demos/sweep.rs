use arp_resolver::{transport, Resolver, ResolverConfigBuilder};
use clap::Parser;
use std::io::Write;
use std::net::Ipv4Addr;
use std::time::{Duration, Instant};

mod common;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = common::Args::parse();
    let interface = common::interface_from(&args.iface);
    let net = common::net_from(&interface).unwrap();
    let source_mac = interface
        .mac
        .ok_or("interface does not have mac address")
        .unwrap();

    let mut resolver = Resolver::new(
        transport::open(&args.iface).unwrap(),
        net.addr(),
        source_mac,
        ResolverConfigBuilder::new()
            .with_max_attempts(args.attempts)
            .with_attempt_interval(Duration::from_millis(args.interval_ms))
            .build(),
    );
    let targets: Vec<Ipv4Addr> = net.hosts().filter(|ip| *ip != net.addr()).collect();

    let start = Instant::now();
    let outcomes = resolver.resolve_all(&targets).await.unwrap();
    let scan_duration = start.elapsed();

    {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "Found hosts:").unwrap();
        for outcome in outcomes {
            if let Some(mac) = outcome.mac {
                writeln!(stdout, "{} is at {}", outcome.target_ip, mac).unwrap();
            }
        }
        writeln!(stdout, "Sweep took {:?}", scan_duration).unwrap();
    }
}
