//! Wire protocol for network-attached kettle and coffee-maker appliances
//!
//! This crate implements the byte-level request/response protocol the
//! appliances speak over a raw TCP stream: typed command and response
//! definitions, field codecs, and a stream framer. It performs no
//! connection management; the client crate owns the socket and the
//! exchange policy.
//!
//! # Wire Format
//!
//! Every message is `[id: 1 byte][payload: variable][tail: 1 byte]` with
//! tail byte `0x7e`. Because `0x7e` can also occur inside payload fields,
//! the framer consults a per-id minimum-length table before accepting a
//! tail byte as terminal (see [`constants::min_response_length`]).
//!
//! # Example
//!
//! ```
//! use protocol::{Command, DeviceKind, Response};
//!
//! // Encode a command
//! let frame = Command::DeviceInfo.encode().unwrap();
//! assert_eq!(frame, vec![0x64, 0x7e]);
//!
//! // Decode a response
//! let reply = Response::decode(&[0x65, 0x01, 0x13, 0x7e], DeviceKind::Unknown).unwrap();
//! assert_eq!(
//!     reply,
//!     Response::DeviceInfo { kind: DeviceKind::Kettle, firmware: 0x13 }
//! );
//! ```

pub mod codec;
pub mod commands;
pub mod constants;
pub mod error;
pub mod framer;
pub mod responses;
pub mod types;

pub use codec::frame_payload;
pub use commands::Command;
pub use constants::{MESSAGE_TAIL, min_response_length};
pub use error::{DecodeError, ProtocolError, TransportError};
pub use framer::{read_message, write_frame};

#[cfg(feature = "async")]
pub use framer::{read_message_async, write_frame_async};
pub use responses::{Response, StatusUpdate};
pub use types::{
    Capability, CoffeeStatus, CommandResult, DeviceKind, KettleActivity, KettleSettings,
    KettleStatus, Strength, WifiNetwork,
};
