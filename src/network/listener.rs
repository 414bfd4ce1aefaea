use std::net::SocketAddr;
use std::sync::Arc;

use futures::StreamExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio_util::codec::FramedRead;
use tracing::{info, warn};

use crate::core::{Error, Result};
use crate::nav::{check_and_report, SafeWaterSet, VesselState};
use crate::network::TelemetryHandle;
use crate::protocol::CommandCodec;

/// Accepts operator command connections, one token per connection.
///
/// Decoded commands mutate the shared vessel state and a fresh snapshot is
/// pushed to the console. A failing connection is abandoned and the loop
/// keeps accepting; the motion loop is never blocked beyond the time it
/// takes to acquire the state lock.
pub struct CommandListener {
    /// Bound TCP socket
    listener: TcpListener,
    /// Shared vessel state
    state: Arc<Mutex<VesselState>>,
    /// Safe-water chart
    chart: Arc<SafeWaterSet>,
    /// Telemetry hand-off
    telemetry: TelemetryHandle,
}

impl CommandListener {
    /// Binds the listener socket. Failure here is fatal at startup.
    pub async fn bind(
        addr: SocketAddr,
        state: Arc<Mutex<VesselState>>,
        chart: Arc<SafeWaterSet>,
        telemetry: TelemetryHandle,
    ) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| Error::protocol(format!("failed to bind command listener: {}", e)))?;
        Ok(CommandListener {
            listener,
            state,
            chart,
            telemetry,
        })
    }

    /// Returns the local socket address
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .map_err(|e| Error::protocol(format!("failed to get local address: {}", e)))
    }

    /// Runs the accept loop. Never returns under normal operation.
    pub async fn run(self) -> Result<()> {
        info!("listening for commands on {}", self.local_addr()?);
        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(pair) => pair,
                Err(e) => {
                    warn!("accept failed: {}", e);
                    continue;
                }
            };
            if let Err(e) = self.handle_connection(stream).await {
                warn!("abandoned command connection from {}: {}", peer, e);
            }
        }
    }

    async fn handle_connection(&self, stream: TcpStream) -> Result<()> {
        let mut framed = FramedRead::new(stream, CommandCodec::new());
        let command = match framed.next().await {
            Some(Ok(command)) => command,
            Some(Err(Error::UnknownCommand(token))) => {
                // Recoverable: logged, no state mutation, connection done.
                warn!("ignoring unknown command token: {}", token);
                return Ok(());
            }
            Some(Err(e)) => return Err(e),
            None => return Ok(()),
        };

        info!("received command: {}", command);
        let mut state = self.state.lock().await;
        state.apply(command);
        check_and_report(&mut state, &self.chart, &self.telemetry);
        Ok(())
    }
}
