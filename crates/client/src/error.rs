//! Client error taxonomy
//!
//! Callers can tell a capability mismatch (recoverable: pick a command the
//! device supports) from transport, protocol and decode failures (usually
//! fatal to the current connection).

use protocol::{DecodeError, ProtocolError, TransportError};
use std::time::Duration;
use thiserror::Error;

/// A command was issued against a device kind that does not support it.
///
/// Raised before any bytes are written to the device.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityError {
    /// Kettle-only command on a non-kettle
    #[error("this operation requires a kettle")]
    KettleRequired,

    /// Coffee-maker-only command on a non-coffee-maker
    #[error("this operation requires a coffee maker")]
    CoffeeRequired,
}

/// Anything that can go wrong while talking to the appliance.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Socket-level failure or mid-message close
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Outbound framing violation or unrecognized inbound id
    #[error("protocol error: {0}")]
    Protocol(ProtocolError),

    /// Recognized response with an undecodable payload
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Command not supported by the connected device kind
    #[error(transparent)]
    Capability(#[from] CapabilityError),

    /// The device did not settle within the configured deadline.
    /// The wire protocol itself has no timeouts; this is a client-side
    /// guard so an unresponsive device cannot block the caller forever.
    #[error("device did not settle within {0:?}")]
    Timeout(Duration),

    /// A timeout may have left a partial exchange on the wire, so the
    /// stream position is unknown; the connection refuses further use
    #[error("connection desynchronized after a timeout; reconnect to the device")]
    Desynchronized,
}

impl From<ProtocolError> for ClientError {
    fn from(err: ProtocolError) -> Self {
        // Surface decode failures under their own taxon; they carry the
        // offending response id and do not imply a framing bug.
        match err {
            ProtocolError::Decode(decode) => ClientError::Decode(decode),
            other => ClientError::Protocol(other),
        }
    }
}

/// Type alias for client results
pub type Result<T> = std::result::Result<T, ClientError>;
