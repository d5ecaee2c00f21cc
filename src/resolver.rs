use std::{net::Ipv4Addr, time::Duration};

use log::{debug, warn};
use pnet::util::MacAddr;
use tokio_util::sync::CancellationToken;

use crate::builder::{reply_frame, request_frame};
use crate::constants::{DEFAULT_ATTEMPT_INTERVAL_MS, DEFAULT_MAX_ATTEMPTS};
use crate::error::{Error, Result};
use crate::frame::{ArpFrame, Operation};
use crate::observer::Observer;
use crate::transport::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    pub max_attempts: usize,
    pub attempt_interval: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfigBuilder::new().build()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResolverConfigBuilder {
    max_attempts: Option<usize>,
    attempt_interval: Option<Duration>,
}

impl ResolverConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of observed frames (or empty waits) to inspect before giving up.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Both the longest wait for one frame and the pause after a frame that
    /// did not match.
    pub fn with_attempt_interval(mut self, interval: Duration) -> Self {
        self.attempt_interval = Some(interval);
        self
    }

    pub fn build(self) -> ResolverConfig {
        ResolverConfig {
            max_attempts: self.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS),
            attempt_interval: self
                .attempt_interval
                .unwrap_or(Duration::from_millis(DEFAULT_ATTEMPT_INTERVAL_MS)),
        }
    }
}

/// Result of one lookup inside [`Resolver::resolve_all`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ResolveOutcome {
    pub target_ip: Ipv4Addr,
    /// `None` when the target never answered.
    pub mac: Option<MacAddr>,
}

impl ResolveOutcome {
    pub fn new(target_ip: Ipv4Addr, mac: Option<MacAddr>) -> Self {
        Self { target_ip, mac }
    }
}

#[derive(Debug)]
struct ResolutionQuery {
    target_ip: Ipv4Addr,
    source_ip: Ipv4Addr,
    source_mac: MacAddr,
    attempts_remaining: usize,
    per_attempt_timeout: Duration,
}

impl ResolutionQuery {
    fn matches(&self, frame: &ArpFrame) -> bool {
        matches!(frame.operation, Operation::Request | Operation::Reply)
            && frame.target_ip == self.target_ip
    }
}

enum Resolution {
    Resolved(MacAddr),
    Exhausted,
    ObserverEnded,
}

/// Resolves IPv4 addresses to MAC addresses over a raw-frame transport.
///
/// Each [`Resolver::resolve`] call starts its own [`Observer`], broadcasts a
/// single request and then inspects observed frames until one answers the
/// query or the attempt budget runs out. Resolutions take `&mut self`, so only
/// one observer reads from the transport at a time; use separate transports
/// for concurrent lookups.
///
/// # Example
/// ```no_run
/// use arp_resolver::{transport, Resolver, ResolverConfigBuilder};
/// use pnet::util::MacAddr;
/// use std::{net::Ipv4Addr, time::Duration};
///
/// tokio_test::block_on(async {
///     let stream = transport::open("eth0").unwrap();
///     let mut resolver = Resolver::new(
///         stream,
///         Ipv4Addr::new(192, 168, 1, 100),
///         MacAddr::new(0x00, 0x1A, 0x2B, 0x3C, 0x4D, 0x5E),
///         ResolverConfigBuilder::new()
///             .with_attempt_interval(Duration::from_millis(200))
///             .build(),
///     );
///     match resolver.resolve(Ipv4Addr::new(192, 168, 1, 1)).await {
///         Ok(mac) => println!("gateway is at {}", mac),
///         Err(err) => println!("lookup failed: {}", err),
///     }
/// })
/// ```
#[derive(Debug)]
pub struct Resolver<T> {
    transport: T,
    source_ip: Ipv4Addr,
    source_mac: MacAddr,
    config: ResolverConfig,
}

impl<T: Transport> Resolver<T> {
    pub fn new(
        transport: T,
        source_ip: Ipv4Addr,
        source_mac: MacAddr,
        config: ResolverConfig,
    ) -> Self {
        Self {
            transport,
            source_ip,
            source_mac,
            config,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Looks up the hardware address paired with `target_ip`.
    ///
    /// The first observed request or reply whose target protocol address is
    /// `target_ip` answers the query with its target hardware address.
    ///
    /// # Errors
    /// - [`Error::NotFound`] if no matching frame showed up within the attempt budget.
    /// - [`Error::Send`] if the request could not be transmitted.
    /// - [`Error::Receive`] if the transport stopped delivering frames.
    pub async fn resolve(&mut self, target_ip: Ipv4Addr) -> Result<MacAddr> {
        let mut query = ResolutionQuery {
            target_ip,
            source_ip: self.source_ip,
            source_mac: self.source_mac,
            attempts_remaining: self.config.max_attempts,
            per_attempt_timeout: self.config.attempt_interval,
        };
        let mut observer = Observer::start(self.transport.clone(), CancellationToken::new());

        let resolution = self.run_query(&mut query, &mut observer).await;
        let stopped = observer.stop().await;

        if let Ok(Resolution::ObserverEnded) = resolution {
            stopped?;
            return Err(Error::Opaque("observer ended without an error".into()));
        }
        if let Err(err) = stopped {
            warn!("observer for {} failed during shutdown: {}", target_ip, err);
        }
        match resolution? {
            Resolution::Resolved(mac) => {
                debug!("resolved {} to {}", target_ip, mac);
                Ok(mac)
            }
            _ => {
                debug!("no answer for {}", target_ip);
                Err(Error::NotFound(target_ip))
            }
        }
    }

    /// Resolves every target in turn.
    ///
    /// Targets that never answer are reported with `mac: None`; a transport
    /// fault aborts the batch.
    pub async fn resolve_all(&mut self, targets: &[Ipv4Addr]) -> Result<Vec<ResolveOutcome>> {
        let mut outcomes = Vec::with_capacity(targets.len());
        for &target_ip in targets {
            let mac = match self.resolve(target_ip).await {
                Ok(mac) => Some(mac),
                Err(Error::NotFound(_)) => None,
                Err(err) => return Err(err),
            };
            outcomes.push(ResolveOutcome::new(target_ip, mac));
        }
        Ok(outcomes)
    }

    /// Broadcasts a single request for `target_ip` without waiting for an answer.
    pub async fn request(&mut self, target_ip: Ipv4Addr) -> Result<()> {
        let frame = request_frame(self.source_ip, self.source_mac, target_ip)?;
        self.send(&frame).await
    }

    /// Tells `target_mac` that this resolver's source IP lives at its source MAC.
    pub async fn reply(&mut self, target_ip: Ipv4Addr, target_mac: MacAddr) -> Result<()> {
        let frame = reply_frame(self.source_ip, self.source_mac, target_ip, target_mac)?;
        self.send(&frame).await
    }

    async fn send(&mut self, frame: &[u8]) -> Result<()> {
        self.transport.send(frame).await.map_err(Error::Send)
    }

    async fn run_query(
        &mut self,
        query: &mut ResolutionQuery,
        observer: &mut Observer,
    ) -> Result<Resolution> {
        let frame = request_frame(query.source_ip, query.source_mac, query.target_ip)?;
        self.send(&frame).await?;
        debug!("sent request for {}", query.target_ip);

        while query.attempts_remaining > 0 {
            query.attempts_remaining -= 1;
            match tokio::time::timeout(query.per_attempt_timeout, observer.recv()).await {
                Ok(Some(frame)) if query.matches(&frame) => {
                    return Ok(Resolution::Resolved(frame.target_mac));
                }
                Ok(Some(frame)) => {
                    debug!(
                        "{:?} does not answer {}, {} attempts left",
                        frame, query.target_ip, query.attempts_remaining
                    );
                    tokio::time::sleep(query.per_attempt_timeout).await;
                }
                Ok(None) => return Ok(Resolution::ObserverEnded),
                Err(_) => {
                    debug!(
                        "nothing observed for {}, {} attempts left",
                        query.target_ip, query.attempts_remaining
                    );
                }
            }
        }
        Ok(Resolution::Exhausted)
    }
}
