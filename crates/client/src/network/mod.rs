//! Network subsystem
//!
//! TCP transport, per-connection session state and the request/response
//! exchange engine.

pub mod connection;
pub mod session;

// Re-export public types
pub use connection::{CommandOutcome, DEFAULT_PORT, DeviceConnection};
pub use session::{DeviceIdentity, DeviceSession};
