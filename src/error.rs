use std::{fmt, io, net::Ipv4Addr};

use thiserror::Error as ThisError;

pub type OpaqueError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AddressKind {
    Mac,
    Ipv4,
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressKind::Mac => f.write_str("MAC"),
            AddressKind::Ipv4 => f.write_str("IPv4"),
        }
    }
}

#[derive(ThisError, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("malformed {kind} address: expected {expected} bytes, got {actual}")]
    MalformedAddress {
        kind: AddressKind,
        expected: usize,
        actual: usize,
    },
    #[error("failed to send frame, reason: {0}")]
    Send(#[source] io::Error),
    #[error("failed to receive frame, reason: {0}")]
    Receive(#[source] io::Error),
    #[error("could not find {0}")]
    NotFound(Ipv4Addr),
    #[error("{0}")]
    Opaque(#[from] OpaqueError),
}

impl Error {
    /// Returns `true` when the medium itself failed, as opposed to a target
    /// that simply never answered.
    pub fn is_transport_fault(&self) -> bool {
        matches!(self, Error::Send(_) | Error::Receive(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
