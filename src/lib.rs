//! ARP frame construction, observation and IPv4 to MAC resolution on top of
//! any raw-frame [`transport::Transport`].
//!
//! ## Example
//! Following example resolves a single host on the local segment.
//! To run it locally, specify the network interface (e.g., `eth0` or `wlan0`) and the target IPv4 address.
//! ```no_run
#![doc = include_str!("../demos/resolve.rs")]
//! ```
//! Frames can also be encoded without any I/O through the [`builder`] module,
//! and raw traffic can be watched with an [`observer::Observer`].

pub mod address;
pub mod builder;
pub mod error;
pub mod frame;
pub mod observer;
pub mod resolver;
pub mod transport;

pub(crate) mod constants;

pub use error::{Error, Result};
pub use frame::{ArpFrame, Operation};
pub use observer::Observer;
pub use resolver::{ResolveOutcome, Resolver, ResolverConfig, ResolverConfigBuilder};
pub use transport::Transport;
