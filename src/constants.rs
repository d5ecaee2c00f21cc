pub(crate) const MAC_ADDR_LEN: u8 = 6;
pub(crate) const IP_V4_LEN: u8 = 4;

pub(crate) const ETH_HEADER_LEN: usize = 14;
pub(crate) const ARP_PACK_LEN: usize = 28;
pub(crate) const ETH_PACK_LEN: usize = ETH_HEADER_LEN + ARP_PACK_LEN;

// Large enough for any untagged Ethernet frame; longer reads are truncated by the socket.
pub(crate) const MAX_FRAME_LEN: usize = 1518;

// Rendezvous-like hand-off between the observer task and its consumer.
pub(crate) const OBSERVER_CHANNEL_CAPACITY: usize = 1;

pub(crate) const DEFAULT_MAX_ATTEMPTS: usize = 10;
pub(crate) const DEFAULT_ATTEMPT_INTERVAL_MS: u64 = 1000;
