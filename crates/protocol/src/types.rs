//! Typed views of device-reported values
//!
//! This module defines the enumerations and records the codec produces:
//! device identity, status codes, brew settings and wireless scan entries.

use std::fmt;
use std::str::FromStr;

/// Which appliance is on the other end of the connection.
///
/// Fixed by the first device-info response of a connection and used to
/// select the status decoder and to gate device-specific commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceKind {
    /// Electric kettle
    Kettle,
    /// Filter coffee maker
    CoffeeMaker,
    /// Not identified yet, or an unrecognized selector byte
    #[default]
    Unknown,
}

impl DeviceKind {
    /// Map the device-info selector byte (1 = kettle, 2 = coffee maker).
    pub fn from_selector(raw: u8) -> Self {
        match raw {
            1 => DeviceKind::Kettle,
            2 => DeviceKind::CoffeeMaker,
            _ => DeviceKind::Unknown,
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceKind::Kettle => write!(f, "kettle"),
            DeviceKind::CoffeeMaker => write!(f, "coffee maker"),
            DeviceKind::Unknown => write!(f, "unknown device"),
        }
    }
}

/// Device family a command may be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Kettle-only commands (boil, stored boil settings)
    Kettle,
    /// Coffee-maker-only commands (brew, grinder, hotplate, cups, strength)
    Coffee,
}

/// Brew strength selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strength {
    /// Weakest grind/water ratio
    Weak,
    /// Factory default
    #[default]
    Medium,
    /// Strongest grind/water ratio
    Strong,
}

impl Strength {
    /// Wire code for this strength.
    pub fn to_raw(self) -> u8 {
        match self {
            Strength::Weak => 0,
            Strength::Medium => 1,
            Strength::Strong => 2,
        }
    }

    /// Decode a wire code; out-of-range codes are not a strength.
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Strength::Weak),
            1 => Some(Strength::Medium),
            2 => Some(Strength::Strong),
            _ => None,
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strength::Weak => write!(f, "weak"),
            Strength::Medium => write!(f, "medium"),
            Strength::Strong => write!(f, "strong"),
        }
    }
}

impl FromStr for Strength {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "weak" => Ok(Strength::Weak),
            "medium" => Ok(Strength::Medium),
            "strong" => Ok(Strength::Strong),
            other => Err(format!(
                "unknown strength {other:?}, expected weak, medium or strong"
            )),
        }
    }
}

/// Kettle activity code from a status response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KettleActivity {
    /// Idle, waiting for a command
    Ready,
    /// Heating towards the target temperature
    Heating,
    /// Holding the keep-warm temperature
    KeepWarm,
    /// A boil cycle just completed
    CycleFinished,
    /// Cooling down to the formula temperature
    Cooling,
    /// Code not in the known set
    Unknown(u8),
}

impl From<u8> for KettleActivity {
    fn from(code: u8) -> Self {
        match code {
            0x00 => KettleActivity::Ready,
            0x01 => KettleActivity::Heating,
            0x02 => KettleActivity::KeepWarm,
            0x03 => KettleActivity::CycleFinished,
            0x04 => KettleActivity::Cooling,
            other => KettleActivity::Unknown(other),
        }
    }
}

impl fmt::Display for KettleActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KettleActivity::Ready => write!(f, "ready"),
            KettleActivity::Heating => write!(f, "heating"),
            KettleActivity::KeepWarm => write!(f, "keeping warm"),
            KettleActivity::CycleFinished => write!(f, "cycle finished"),
            KettleActivity::Cooling => write!(f, "cooling"),
            KettleActivity::Unknown(code) => write!(f, "unknown activity (0x{code:02X})"),
        }
    }
}

/// Result code carried by a command-status acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandResult {
    /// Command accepted
    Success,
    /// Device busy with a previous cycle
    Busy,
    /// Carafe missing
    NoCarafe,
    /// Water tank empty or kettle off base
    NoWater,
    /// Command understood but could not be carried out
    Failed,
    /// Command not recognized by this firmware
    InvalidCommand,
    /// Code not in the known set
    Unknown(u8),
}

impl CommandResult {
    /// Whether the device accepted the command.
    pub fn is_success(self) -> bool {
        self == CommandResult::Success
    }
}

impl From<u8> for CommandResult {
    fn from(code: u8) -> Self {
        match code {
            0x00 => CommandResult::Success,
            0x01 => CommandResult::Busy,
            0x02 => CommandResult::NoCarafe,
            0x03 => CommandResult::NoWater,
            0x04 => CommandResult::Failed,
            0x69 => CommandResult::InvalidCommand,
            other => CommandResult::Unknown(other),
        }
    }
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandResult::Success => write!(f, "success"),
            CommandResult::Busy => write!(f, "device busy"),
            CommandResult::NoCarafe => write!(f, "no carafe"),
            CommandResult::NoWater => write!(f, "no water"),
            CommandResult::Failed => write!(f, "failed"),
            CommandResult::InvalidCommand => write!(f, "invalid command"),
            CommandResult::Unknown(code) => write!(f, "unknown result (0x{code:02X})"),
        }
    }
}

/// A kettle status push, decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KettleStatus {
    /// What the kettle is doing
    pub activity: KettleActivity,
    /// Water temperature in °C; 0 when off base
    pub temperature: u8,
    /// Whether the kettle sits on its powered base
    pub on_base: bool,
    /// Combined water-sensor reading
    pub water_sensor: u16,
}

/// A coffee-maker status push, decoded.
///
/// The status byte is carried raw; its bit layout differs between firmware
/// revisions and is not fully understood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoffeeStatus {
    /// Raw status code
    pub status: u8,
    /// Combined water-sensor reading
    pub water_sensor: u16,
    /// Selected brew strength
    pub strength: Strength,
    /// Selected cup count
    pub cups: u8,
}

/// Stored default-boil settings as reported by the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KettleSettings {
    /// Default boil target in °C
    pub temperature: u8,
    /// Keep-warm time in minutes, 0 = off
    pub keep_warm_minutes: u8,
    /// Formula-mode cool-down target in °C; `None` when formula mode is off
    pub formula_temperature: Option<u8>,
}

/// One wireless network seen by a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiNetwork {
    /// Network name
    pub ssid: String,
    /// Received signal strength in dBm (more positive is stronger)
    pub signal_dbm: i16,
}

impl WifiNetwork {
    /// Signal quality on a 0-100 scale, for display.
    pub fn signal_quality(&self) -> u8 {
        (2 * (i32::from(self.signal_dbm) + 100)).clamp(0, 100) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_kind_selector() {
        assert_eq!(DeviceKind::from_selector(1), DeviceKind::Kettle);
        assert_eq!(DeviceKind::from_selector(2), DeviceKind::CoffeeMaker);
        assert_eq!(DeviceKind::from_selector(0), DeviceKind::Unknown);
        assert_eq!(DeviceKind::from_selector(200), DeviceKind::Unknown);
    }

    #[test]
    fn test_strength_raw_roundtrip() {
        for strength in [Strength::Weak, Strength::Medium, Strength::Strong] {
            assert_eq!(Strength::from_raw(strength.to_raw()), Some(strength));
        }
        assert_eq!(Strength::from_raw(3), None);
    }

    #[test]
    fn test_strength_from_str() {
        assert_eq!("Strong".parse::<Strength>(), Ok(Strength::Strong));
        assert!("espresso".parse::<Strength>().is_err());
    }

    #[test]
    fn test_command_result_codes() {
        assert!(CommandResult::from(0x00).is_success());
        assert!(!CommandResult::from(0x03).is_success());
        assert_eq!(CommandResult::from(0x69), CommandResult::InvalidCommand);
        assert_eq!(CommandResult::from(0x42), CommandResult::Unknown(0x42));
    }

    #[test]
    fn test_signal_quality_scale() {
        let strong = WifiNetwork {
            ssid: "a".into(),
            signal_dbm: -40,
        };
        let weak = WifiNetwork {
            ssid: "b".into(),
            signal_dbm: -90,
        };
        let dead = WifiNetwork {
            ssid: "c".into(),
            signal_dbm: -120,
        };
        assert_eq!(strong.signal_quality(), 100);
        assert_eq!(weak.signal_quality(), 20);
        assert_eq!(dead.signal_quality(), 0);
    }
}
