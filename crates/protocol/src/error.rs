//! Protocol error types

use thiserror::Error;

/// Errors raised while moving bytes to or from the device.
#[derive(Debug, Error)]
pub enum TransportError {
    /// I/O failure on the underlying stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended before a complete message was read
    #[error("connection closed before a full message was read")]
    Closed,
}

/// Errors raised while decoding a framed response into typed fields.
///
/// A decode failure is all-or-nothing: no session state is touched for
/// the offending message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Payload shorter than the response's field layout requires
    #[error("{response} response too short: expected at least {expected} bytes, got {actual}")]
    ShortResponse {
        /// Response kind being decoded
        response: &'static str,
        /// Minimum length its layout requires
        expected: usize,
        /// Length actually received
        actual: usize,
    },

    /// Payload long enough but with a field value that cannot be interpreted
    #[error("malformed {response} response: {reason}")]
    MalformedPayload {
        /// Response kind being decoded
        response: &'static str,
        /// What was wrong with it
        reason: String,
    },
}

/// Errors raised when building outbound messages or classifying inbound ids.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// An id byte alone is the shortest legal message; zero bytes is not one
    #[error("cannot send an empty message")]
    EmptyMessage,

    /// Inbound message id not in the response set
    #[error("unrecognized response id: 0x{0:02X}")]
    UnknownResponse(u8),

    /// A recognized response whose payload could not be decoded
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DecodeError::ShortResponse {
            response: "device-info",
            expected: 4,
            actual: 2,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("device-info"));
        assert!(msg.contains("4"));
        assert!(msg.contains("2"));
    }

    #[test]
    fn test_decode_error_wraps_into_protocol_error() {
        let err: ProtocolError = DecodeError::MalformedPayload {
            response: "wifi-list",
            reason: "bad signal".into(),
        }
        .into();
        assert!(matches!(err, ProtocolError::Decode(_)));
        assert!(format!("{}", err).contains("wifi-list"));
    }
}
