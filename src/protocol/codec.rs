use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::core::{Command, Error, TelemetryEvent, MAX_COMMAND_SIZE};

/// Decodes the single command token carried by one connection.
///
/// The peer writes one token and closes the stream, so the token is only
/// complete at EOF; `decode` just accumulates until then.
#[derive(Debug, Clone, Default)]
pub struct CommandCodec;

impl CommandCodec {
    /// Creates a new command codec
    pub fn new() -> Self {
        CommandCodec
    }
}

impl Decoder for CommandCodec {
    type Item = Command;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Command>, Error> {
        if src.len() > MAX_COMMAND_SIZE {
            return Err(Error::protocol(format!(
                "command payload exceeds {} bytes",
                MAX_COMMAND_SIZE
            )));
        }
        Ok(None)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Command>, Error> {
        if src.is_empty() {
            return Ok(None);
        }
        let bytes = src.split_to(src.len());
        let token = std::str::from_utf8(&bytes)
            .map_err(|e| Error::protocol(format!("command is not valid UTF-8: {}", e)))?;
        token.parse().map(Some)
    }
}

/// Encodes telemetry events as single-line text reports.
#[derive(Debug, Clone, Default)]
pub struct TelemetryCodec;

impl Encoder<TelemetryEvent> for TelemetryCodec {
    type Error = Error;

    fn encode(&mut self, item: TelemetryEvent, dst: &mut BytesMut) -> Result<(), Error> {
        dst.extend_from_slice(item.to_string().as_bytes());
        Ok(())
    }
}
