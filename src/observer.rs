use std::{
    io,
    pin::Pin,
    task::{Context, Poll},
};

use futures::Stream;
use log::{trace, warn};
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::constants::{MAX_FRAME_LEN, OBSERVER_CHANNEL_CAPACITY};
use crate::error::{Error, Result};
use crate::frame::ArpFrame;
use crate::transport::Transport;

/// A background task republishing every ARP frame seen on a transport.
///
/// Frames that are not ARP, or that fail to decode, are dropped silently.
/// Decoded frames are handed over in arrival order through a channel with a
/// single slot, so a slow consumer stalls the capture loop instead of losing
/// frames.
///
/// The task stops when the cancellation token is raised, when [`Observer::stop`]
/// is called, or when the `Observer` is dropped.
#[derive(Debug)]
pub struct Observer {
    token: CancellationToken,
    frames: mpsc::Receiver<ArpFrame>,
    handle: Option<JoinHandle<Result<()>>>,
}

impl Observer {
    /// Spawns the capture loop on the current tokio runtime.
    pub fn start<T: Transport>(transport: T, token: CancellationToken) -> Self {
        let (sender, frames) = mpsc::channel(OBSERVER_CHANNEL_CAPACITY);
        let listener = Listener {
            transport,
            frames: sender,
        };
        let task_token = token.clone();
        let handle = tokio::task::spawn(async move {
            tokio::select! {
                biased;
                _ = task_token.cancelled() => Ok(()),
                result = listener.listen() => result,
            }
        });
        Self {
            token,
            frames,
            handle: Some(handle),
        }
    }

    /// Waits for the next decoded frame.
    ///
    /// Returns `None` once the observer has been cancelled or its capture loop
    /// has ended.
    pub async fn recv(&mut self) -> Option<ArpFrame> {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => None,
            frame = self.frames.recv() => frame,
        }
    }

    /// Returns `true` once the cancellation token has been raised; no frames
    /// are handed out after that.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Cancels the capture loop and waits for it to wind down.
    ///
    /// # Errors
    /// Returns [`Error::Receive`] if the loop had already died on a transport
    /// read failure.
    pub async fn stop(mut self) -> Result<()> {
        self.token.cancel();
        self.frames.close();
        match self.handle.take() {
            Some(handle) => handle.await.map_err(|err| {
                Error::Opaque(format!("observer task failed, reason: {}", err).into())
            })?,
            None => Ok(()),
        }
    }
}

impl Stream for Observer {
    type Item = ArpFrame;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.token.is_cancelled() {
            return Poll::Ready(None);
        }
        self.frames.poll_recv(cx)
    }
}

impl Drop for Observer {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

struct Listener<T> {
    transport: T,
    frames: mpsc::Sender<ArpFrame>,
}

impl<T: Transport> Listener<T> {
    async fn listen(mut self) -> Result<()> {
        let mut buf = [0; MAX_FRAME_LEN];
        loop {
            let read_bytes = match self.transport.receive(&mut buf).await {
                Ok(0) => Err(io::Error::from(io::ErrorKind::UnexpectedEof)),
                other => other,
            }
            .map_err(|err| {
                warn!("observer stopped, error while reading the interface traffic: {}", err);
                Error::Receive(err)
            })?;
            match ArpFrame::decode(&buf[..read_bytes]) {
                Ok(frame) => {
                    trace!("observed {:?}", frame);
                    if self.frames.send(frame).await.is_err() {
                        // consumer went away
                        return Ok(());
                    }
                }
                Err(err) => trace!("discarding frame: {}", err),
            }
        }
    }
}
