//! Wire protocol: command tokens in, telemetry lines out
//!
//! Commands arrive as one UTF-8 token per connection; telemetry leaves as
//! one text line per connection. Framing lives here, behavior lives in
//! [`crate::nav`].

pub mod codec;

pub use self::codec::{CommandCodec, TelemetryCodec};
