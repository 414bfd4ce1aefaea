use std::net::SocketAddr;

use futures::SinkExt;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::FramedWrite;
use tracing::{debug, warn};

use crate::core::{Result, TelemetryEvent};
use crate::protocol::TelemetryCodec;

/// Queue depth for in-flight telemetry events
const TELEMETRY_QUEUE_DEPTH: usize = 64;

/// Handle for publishing telemetry without blocking the motion loop.
///
/// Delivery is at-most-once, best effort: a full queue or an unreachable
/// console drops the event for that tick.
#[derive(Clone)]
pub struct TelemetryHandle {
    event_tx: mpsc::Sender<TelemetryEvent>,
}

impl TelemetryHandle {
    pub(crate) fn new(event_tx: mpsc::Sender<TelemetryEvent>) -> Self {
        TelemetryHandle { event_tx }
    }

    /// Queues an event for delivery, dropping it if the queue is full.
    pub fn publish(&self, event: TelemetryEvent) {
        if let Err(e) = self.event_tx.try_send(event) {
            warn!("telemetry event dropped: {}", e);
        }
    }
}

/// Pushes telemetry reports to the operator console, one connection per event.
pub struct TelemetryPublisher {
    /// Operator console address
    console_addr: SocketAddr,
    /// Queued events
    event_rx: mpsc::Receiver<TelemetryEvent>,
}

impl TelemetryPublisher {
    /// Creates the publisher and the handle its producers use.
    pub fn channel(console_addr: SocketAddr) -> (TelemetryHandle, Self) {
        let (tx, rx) = mpsc::channel(TELEMETRY_QUEUE_DEPTH);
        (
            TelemetryHandle::new(tx),
            TelemetryPublisher {
                console_addr,
                event_rx: rx,
            },
        )
    }

    /// Drains the event queue until every handle is dropped. Send failures
    /// are logged and the event discarded; no retry, no backoff.
    pub async fn run(mut self) {
        while let Some(event) = self.event_rx.recv().await {
            match self.push(event.clone()).await {
                Ok(()) => debug!("sent update: {}", event),
                Err(e) => warn!("failed to send update {}: {}", event, e),
            }
        }
    }

    async fn push(&self, event: TelemetryEvent) -> Result<()> {
        let stream = TcpStream::connect(self.console_addr).await?;
        let mut framed = FramedWrite::new(stream, TelemetryCodec);
        framed.send(event).await?;
        Ok(())
    }
}
