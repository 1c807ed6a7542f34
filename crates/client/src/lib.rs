//! brewlink client library
//!
//! Connects to network-attached kettle and coffee-maker appliances and
//! drives their binary request/response protocol: a session per connection,
//! a capability gate keeping family-specific commands off the wrong device,
//! and an exchange engine that tolerates the device's unsolicited status
//! pushes. The `brewlink` binary is a thin CLI over this library.

pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod network;

pub use config::ClientConfig;
pub use error::{CapabilityError, ClientError, Result};
pub use network::{CommandOutcome, DEFAULT_PORT, DeviceConnection, DeviceIdentity, DeviceSession};
