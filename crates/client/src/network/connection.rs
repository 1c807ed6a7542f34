//! Appliance connection handling
//!
//! Owns the socket, the per-connection [`DeviceSession`] and the
//! request/response exchange. The device is strictly half-duplex but emits
//! unsolicited status pushes at any time, including between a command and
//! its acknowledgement, so every exchange runs through
//! [`DeviceConnection::execute`] and its drain-then-settle read loop.

use protocol::{Command, CommandResult, DeviceKind, Response, TransportError, codec, framer};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, info, trace, warn};

use super::session::DeviceSession;
use crate::error::{ClientError, Result};

/// TCP port the appliances listen on.
pub const DEFAULT_PORT: u16 = 2081;

/// What [`DeviceConnection::execute`] observed for one command.
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    /// The command's direct (non-status) reply, already applied to the
    /// session
    pub reply: Response,
    /// Result code when the reply was a plain acknowledgement
    pub result: Option<CommandResult>,
}

impl CommandOutcome {
    /// Whether the device accepted the command. Replies that carry data
    /// instead of a result code count as accepted.
    pub fn is_success(&self) -> bool {
        self.result.is_none_or(CommandResult::is_success)
    }
}

/// One half-duplex connection to an appliance.
///
/// At most one exchange may be in flight at a time; the protocol has no
/// request identifiers to match replies with, so the `&mut self` receivers
/// are load-bearing, not a convenience.
pub struct DeviceConnection<S = TcpStream> {
    stream: S,
    session: DeviceSession,
    command_timeout: Option<Duration>,
    desynced: bool,
}

impl DeviceConnection<TcpStream> {
    /// Connect to a device and run the greeting handshake: apply the status
    /// push the device sends on accept, identify it, and for kettles
    /// prefetch the stored boil settings and base calibration.
    pub async fn connect(
        host: &str,
        port: u16,
        command_timeout: Option<Duration>,
    ) -> Result<Self> {
        info!(host, port, "connecting");
        let stream = match command_timeout {
            Some(limit) => timeout(limit, TcpStream::connect((host, port)))
                .await
                .map_err(|_| ClientError::Timeout(limit))?
                .map_err(TransportError::from)?,
            None => TcpStream::connect((host, port))
                .await
                .map_err(TransportError::from)?,
        };
        let mut connection = Self::from_stream(stream);
        connection.command_timeout = command_timeout;
        connection.handshake().await?;
        info!(
            device = %connection.session.device_kind(),
            firmware = connection.session.identity().firmware,
            "connected"
        );
        Ok(connection)
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> DeviceConnection<S> {
    /// Wrap an established byte stream. Used by [`DeviceConnection::connect`]
    /// and directly by loopback tests.
    pub fn from_stream(stream: S) -> Self {
        Self {
            stream,
            session: DeviceSession::new(),
            command_timeout: None,
            desynced: false,
        }
    }

    /// Bound every subsequent exchange to `limit`. `None` restores the wire
    /// protocol's native behavior of waiting forever.
    pub fn set_command_timeout(&mut self, limit: Option<Duration>) {
        self.command_timeout = limit;
    }

    /// State observed from the device so far.
    pub fn session(&self) -> &DeviceSession {
        &self.session
    }

    /// Shut the stream down and drop all session state.
    pub async fn close(mut self) -> Result<()> {
        self.session.reset();
        self.stream.shutdown().await.map_err(TransportError::from)?;
        Ok(())
    }

    /// Read the next message and fold it into the session.
    ///
    /// Blocks until the device sends something; useful on its own for
    /// following the spontaneous status stream.
    pub async fn read_and_apply(&mut self) -> Result<Response> {
        self.ensure_synced()?;
        let message = framer::read_message_async(&mut self.stream).await?;
        trace!(frame = %hex(&message), "received");
        let response = Response::decode(&message, self.session.device_kind())?;
        self.session.apply(&response);
        Ok(response)
    }

    /// Run one command exchange.
    ///
    /// Status pushes that race ahead of the reply are applied and skipped;
    /// the first non-status message is the command's reply; reading then
    /// continues until the device settles with one more status message.
    /// Stopping at the reply would leave that settle status in the stream
    /// and desynchronize the next exchange.
    pub async fn execute(&mut self, command: Command) -> Result<CommandOutcome> {
        self.ensure_synced()?;
        if let Some(capability) = command.required_capability() {
            self.session.require(capability)?;
        }
        debug!(?command, "executing");
        let frame = command.encode()?;
        self.run_exchange(frame).await
    }

    /// Frame and send raw payload bytes, then run the standard exchange.
    /// Escape hatch for poking at undocumented commands.
    pub async fn send_raw(&mut self, payload: &[u8]) -> Result<CommandOutcome> {
        self.ensure_synced()?;
        let frame = codec::frame_payload(payload)?;
        self.run_exchange(frame).await
    }

    async fn run_exchange(&mut self, frame: Vec<u8>) -> Result<CommandOutcome> {
        let deadline = self.command_timeout;
        match deadline {
            Some(limit) => match timeout(limit, self.exchange(frame)).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    self.desynced = true;
                    warn!(?limit, "exchange timed out; connection needs a reconnect");
                    Err(ClientError::Timeout(limit))
                }
            },
            None => self.exchange(frame).await,
        }
    }

    async fn exchange(&mut self, frame: Vec<u8>) -> Result<CommandOutcome> {
        framer::write_frame_async(&mut self.stream, &frame).await?;
        trace!(frame = %hex(&frame), "sent");

        // Drain pushes that were already in flight; they never stand in
        // for the reply.
        let mut reply = self.read_and_apply().await?;
        while reply.is_status() {
            reply = self.read_and_apply().await?;
        }

        // The device always settles into a fresh status after processing
        // a command; consume exactly one.
        loop {
            if self.read_and_apply().await?.is_status() {
                break;
            }
        }

        let result = match &reply {
            Response::CommandStatus(result) => Some(*result),
            _ => None,
        };
        Ok(CommandOutcome { reply, result })
    }

    async fn handshake(&mut self) -> Result<()> {
        // The device greets every new connection with a status push.
        let deadline = self.command_timeout;
        match deadline {
            Some(limit) => match timeout(limit, self.read_and_apply()).await {
                Ok(greeting) => greeting?,
                Err(_) => {
                    self.desynced = true;
                    return Err(ClientError::Timeout(limit));
                }
            },
            None => self.read_and_apply().await?,
        };

        self.execute(Command::DeviceInfo).await?;
        if self.session.device_kind() == DeviceKind::Kettle {
            self.execute(Command::GetKettleSettings).await?;
            self.execute(Command::CalibrateBase).await?;
        }
        Ok(())
    }

    fn ensure_synced(&self) -> Result<()> {
        if self.desynced {
            return Err(ClientError::Desynchronized);
        }
        Ok(())
    }
}

// ============================================================================
// Commands: general
// ============================================================================

impl<S: AsyncRead + AsyncWrite + Unpin> DeviceConnection<S> {
    /// Re-query device kind and firmware version.
    pub async fn device_info(&mut self) -> Result<CommandOutcome> {
        self.execute(Command::DeviceInfo).await
    }

    /// Stop the current heating or brewing cycle.
    pub async fn stop(&mut self) -> Result<CommandOutcome> {
        self.execute(Command::Stop).await
    }

    /// Restore factory defaults.
    pub async fn reset(&mut self) -> Result<CommandOutcome> {
        self.execute(Command::Reset).await
    }

    /// Start a firmware update cycle.
    pub async fn firmware_update(&mut self) -> Result<CommandOutcome> {
        self.execute(Command::FirmwareUpdate).await
    }

    /// Query the device clock.
    pub async fn device_time(&mut self) -> Result<CommandOutcome> {
        self.execute(Command::DeviceTime).await
    }

    /// Request the usage history block.
    pub async fn history(&mut self) -> Result<CommandOutcome> {
        self.execute(Command::History).await
    }
}

// ============================================================================
// Commands: water-sensor calibration
// ============================================================================

impl<S: AsyncRead + AsyncWrite + Unpin> DeviceConnection<S> {
    /// Run a water-sensor calibration cycle. The vessel must be empty.
    pub async fn calibrate(&mut self) -> Result<CommandOutcome> {
        self.execute(Command::Calibrate).await
    }

    /// Fetch the stored base value into the session.
    pub async fn calibrate_base(&mut self) -> Result<CommandOutcome> {
        self.execute(Command::CalibrateBase).await
    }

    /// Store a new base value; values below 256 are clamped up on encode.
    pub async fn store_base_calibration(&mut self, base: u16) -> Result<CommandOutcome> {
        self.execute(Command::StoreBaseCalibration { base }).await
    }
}

// ============================================================================
// Commands: kettle
// ============================================================================

impl<S: AsyncRead + AsyncWrite + Unpin> DeviceConnection<S> {
    /// Fetch the stored default boil settings into the session.
    pub async fn kettle_settings(&mut self) -> Result<CommandOutcome> {
        self.execute(Command::GetKettleSettings).await
    }

    /// Store new default boil settings.
    pub async fn store_kettle_settings(
        &mut self,
        temperature: u8,
        keep_warm_minutes: u8,
        formula: bool,
        formula_temperature: u8,
    ) -> Result<CommandOutcome> {
        self.execute(Command::StoreKettleSettings {
            temperature,
            keep_warm_minutes,
            formula,
            formula_temperature,
        })
        .await
    }

    /// Boil with the stored default settings.
    pub async fn heat(&mut self) -> Result<CommandOutcome> {
        self.execute(Command::Heat).await
    }

    /// Boil, then cool down to the formula temperature.
    pub async fn heat_formula(&mut self) -> Result<CommandOutcome> {
        self.execute(Command::HeatFormula).await
    }
}

// ============================================================================
// Commands: coffee maker
// ============================================================================

impl<S: AsyncRead + AsyncWrite + Unpin> DeviceConnection<S> {
    /// Start brewing with the current cup and strength settings.
    pub async fn brew(&mut self) -> Result<CommandOutcome> {
        self.execute(Command::Brew).await
    }

    /// Turn the hotplate on for `minutes`.
    pub async fn hotplate_on(&mut self, minutes: u8) -> Result<CommandOutcome> {
        self.execute(Command::HotplateOn { minutes }).await
    }

    /// Turn the hotplate off.
    pub async fn hotplate_off(&mut self) -> Result<CommandOutcome> {
        self.execute(Command::HotplateOff).await
    }

    /// Toggle the bean grinder.
    pub async fn grind(&mut self) -> Result<CommandOutcome> {
        self.execute(Command::Grind).await
    }

    /// Select how many cups to brew.
    pub async fn set_cups(&mut self, cups: u8) -> Result<CommandOutcome> {
        self.execute(Command::SetCups { cups }).await
    }

    /// Select the brew strength.
    pub async fn set_strength(&mut self, strength: protocol::Strength) -> Result<CommandOutcome> {
        self.execute(Command::SetStrength { strength }).await
    }
}

// ============================================================================
// Commands: wireless
// ============================================================================

impl<S: AsyncRead + AsyncWrite + Unpin> DeviceConnection<S> {
    /// Scan for visible wireless networks; results land in the session,
    /// strongest first.
    pub async fn wifi_scan(&mut self) -> Result<CommandOutcome> {
        self.execute(Command::WifiScan).await
    }

    /// Leave the configured network and return to access-point mode.
    pub async fn wifi_reset(&mut self) -> Result<CommandOutcome> {
        self.execute(Command::WifiReset).await
    }

    /// Join the configured network.
    pub async fn wifi_connect(&mut self) -> Result<CommandOutcome> {
        self.execute(Command::WifiConnect).await
    }

    /// Set the password used when joining.
    pub async fn wifi_password(&mut self, password: &str) -> Result<CommandOutcome> {
        self.execute(Command::WifiPassword {
            password: password.to_string(),
        })
        .await
    }

    /// Set the SSID used when joining.
    pub async fn wifi_name(&mut self, ssid: &str) -> Result<CommandOutcome> {
        self.execute(Command::WifiName {
            ssid: ssid.to_string(),
        })
        .await
    }

    /// Fetch the wireless module's firmware banner into the session.
    pub async fn wifi_firmware(&mut self) -> Result<CommandOutcome> {
        self.execute(Command::WifiFirmware).await
    }
}

fn hex(frame: &[u8]) -> String {
    frame
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_rendering() {
        assert_eq!(hex(&[0x64, 0x7e]), "64 7e");
        assert_eq!(hex(&[]), "");
    }

    #[test]
    fn test_outcome_success_rules() {
        let acked = CommandOutcome {
            reply: Response::CommandStatus(CommandResult::Success),
            result: Some(CommandResult::Success),
        };
        assert!(acked.is_success());

        let refused = CommandOutcome {
            reply: Response::CommandStatus(CommandResult::NoWater),
            result: Some(CommandResult::NoWater),
        };
        assert!(!refused.is_success());

        let data_reply = CommandOutcome {
            reply: Response::History,
            result: None,
        };
        assert!(data_reply.is_success());
    }
}
