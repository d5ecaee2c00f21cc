use std::{future::Future, io};

use afpacket::tokio::RawPacketStream;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::error::{Error, Result};

/// A raw link-layer frame channel.
///
/// Clones must share the underlying medium: the resolver sends through one
/// handle while its observer reads through another.
pub trait Transport: Clone + Send + 'static {
    /// Injects one complete Ethernet frame.
    fn send(&mut self, frame: &[u8]) -> impl Future<Output = io::Result<()>> + Send;

    /// Waits for the next observed frame and copies it into `buf`, returning
    /// the number of bytes written.
    fn receive(&mut self, buf: &mut [u8]) -> impl Future<Output = io::Result<usize>> + Send;
}

impl Transport for RawPacketStream {
    async fn send(&mut self, frame: &[u8]) -> io::Result<()> {
        self.write_all(frame).await
    }

    async fn receive(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read(buf).await
    }
}

/// Opens a raw packet stream bound to `interface_name`.
///
/// Must be called from within a tokio runtime, and needs `CAP_NET_RAW`.
///
/// # Errors
/// Returns an error if the packet stream cannot be created or if binding to
/// the specified network interface fails.
pub fn open(interface_name: &str) -> Result<RawPacketStream> {
    let mut stream = RawPacketStream::new().map_err(|err| {
        Error::Opaque(format!("failed to create packet stream, reason: {}", err).into())
    })?;
    stream.bind(interface_name).map_err(|err| {
        Error::Opaque(format!("failed to bind interface to stream, reason {}", err).into())
    })?;
    Ok(stream)
}
