//! Device session state and the capability gate
//!
//! One [`DeviceSession`] per connection, owning everything observed from
//! the device. Each decoded response replaces exactly one state group
//! wholesale; groups are never partially merged. The session is also the
//! authority on which commands are legal for the connected device kind.

use protocol::{
    Capability, CoffeeStatus, CommandResult, DeviceKind, KettleSettings, KettleStatus, Response,
    StatusUpdate, WifiNetwork,
};
use tracing::debug;

use crate::error::CapabilityError;

/// Identity reported by the device-info response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceIdentity {
    /// What the appliance is
    pub kind: DeviceKind,
    /// Firmware version number, 0 until identified
    pub firmware: u8,
}

/// All state observed from the device over one connection.
///
/// Created empty when the connection opens, refreshed by every decoded
/// response, and reset to empty on disconnect.
#[derive(Debug, Clone, Default)]
pub struct DeviceSession {
    identity: DeviceIdentity,
    kettle: Option<KettleStatus>,
    coffee: Option<CoffeeStatus>,
    settings: Option<KettleSettings>,
    water_sensor_base: Option<u16>,
    wifi_networks: Option<Vec<WifiNetwork>>,
    wifi_firmware: Option<String>,
    last_command: Option<CommandResult>,
}

impl DeviceSession {
    /// Fresh, empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one decoded response into the state group it touches.
    pub fn apply(&mut self, response: &Response) {
        match response {
            Response::CommandStatus(result) => self.last_command = Some(*result),
            Response::DeviceInfo { kind, firmware } => {
                self.identity = DeviceIdentity {
                    kind: *kind,
                    firmware: *firmware,
                };
                debug!(kind = %self.identity.kind, firmware = self.identity.firmware, "device identified");
            }
            Response::Status(StatusUpdate::Kettle(status)) => self.kettle = Some(status.clone()),
            Response::Status(StatusUpdate::Coffee(status)) => self.coffee = Some(status.clone()),
            // Pushes read before identification carry no decodable fields.
            Response::Status(StatusUpdate::Unclassified) => {}
            Response::BaseCalibration { base } => self.water_sensor_base = Some(*base),
            Response::Settings(settings) => self.settings = Some(settings.clone()),
            Response::History => {}
            Response::WifiFirmware(banner) => self.wifi_firmware = Some(banner.clone()),
            Response::WifiList(networks) => self.wifi_networks = Some(networks.clone()),
        }
    }

    /// Reject commands the connected device kind cannot execute.
    ///
    /// Runs before any bytes are written; a rejected command transmits
    /// nothing.
    pub fn require(&self, capability: Capability) -> Result<(), CapabilityError> {
        match (capability, self.identity.kind) {
            (Capability::Kettle, DeviceKind::Kettle) => Ok(()),
            (Capability::Coffee, DeviceKind::CoffeeMaker) => Ok(()),
            (Capability::Kettle, _) => Err(CapabilityError::KettleRequired),
            (Capability::Coffee, _) => Err(CapabilityError::CoffeeRequired),
        }
    }

    /// Drop everything observed on this connection.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Identity reported by the device, if identified.
    pub fn identity(&self) -> DeviceIdentity {
        self.identity
    }

    /// Convenience accessor for the device kind.
    pub fn device_kind(&self) -> DeviceKind {
        self.identity.kind
    }

    /// Latest kettle status push, if any.
    pub fn kettle(&self) -> Option<&KettleStatus> {
        self.kettle.as_ref()
    }

    /// Latest coffee-maker status push, if any.
    pub fn coffee(&self) -> Option<&CoffeeStatus> {
        self.coffee.as_ref()
    }

    /// Stored default boil settings, if fetched.
    pub fn settings(&self) -> Option<&KettleSettings> {
        self.settings.as_ref()
    }

    /// Stored water-sensor base value, if fetched.
    pub fn water_sensor_base(&self) -> Option<u16> {
        self.water_sensor_base
    }

    /// Networks from the latest wireless scan, strongest first.
    pub fn wifi_networks(&self) -> Option<&[WifiNetwork]> {
        self.wifi_networks.as_deref()
    }

    /// Wireless module firmware banner, if fetched.
    pub fn wifi_firmware(&self) -> Option<&str> {
        self.wifi_firmware.as_deref()
    }

    /// Result of the most recently acknowledged command.
    pub fn last_command(&self) -> Option<CommandResult> {
        self.last_command
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protocol::KettleActivity;

    fn kettle_status(temperature: u8) -> Response {
        Response::Status(StatusUpdate::Kettle(KettleStatus {
            activity: KettleActivity::Heating,
            temperature,
            on_base: true,
            water_sensor: 1500,
        }))
    }

    #[test]
    fn test_apply_replaces_groups_wholesale() {
        let mut session = DeviceSession::new();
        session.apply(&kettle_status(40));
        session.apply(&kettle_status(80));
        assert_eq!(session.kettle().unwrap().temperature, 80);
        // Untouched groups stay empty.
        assert!(session.settings().is_none());
        assert!(session.coffee().is_none());
    }

    #[test]
    fn test_apply_is_idempotent() {
        let mut session = DeviceSession::new();
        let response = Response::DeviceInfo {
            kind: DeviceKind::Kettle,
            firmware: 19,
        };
        session.apply(&response);
        let first = session.clone();
        session.apply(&response);
        assert_eq!(session.identity(), first.identity());
        assert_eq!(session.kettle(), first.kettle());
    }

    #[test]
    fn test_capability_gate() {
        let mut session = DeviceSession::new();
        // Nothing identified yet: both families are rejected.
        assert_eq!(
            session.require(Capability::Kettle),
            Err(CapabilityError::KettleRequired)
        );
        assert_eq!(
            session.require(Capability::Coffee),
            Err(CapabilityError::CoffeeRequired)
        );

        session.apply(&Response::DeviceInfo {
            kind: DeviceKind::CoffeeMaker,
            firmware: 5,
        });
        assert!(session.require(Capability::Coffee).is_ok());
        assert_eq!(
            session.require(Capability::Kettle),
            Err(CapabilityError::KettleRequired)
        );
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = DeviceSession::new();
        session.apply(&Response::DeviceInfo {
            kind: DeviceKind::Kettle,
            firmware: 19,
        });
        session.apply(&kettle_status(90));
        session.apply(&Response::BaseCalibration { base: 1024 });
        session.reset();
        assert_eq!(session.device_kind(), DeviceKind::Unknown);
        assert!(session.kettle().is_none());
        assert!(session.water_sensor_base().is_none());
    }

    #[test]
    fn test_unclassified_status_leaves_state_alone() {
        let mut session = DeviceSession::new();
        session.apply(&Response::Status(StatusUpdate::Unclassified));
        assert!(session.kettle().is_none());
        assert!(session.coffee().is_none());
    }
}
