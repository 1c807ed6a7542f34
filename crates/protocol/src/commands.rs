//! Commands accepted by the appliance

use crate::codec;
use crate::constants::*;
use crate::error::ProtocolError;
use crate::types::{Capability, Strength};

/// Client → device commands.
///
/// [`Command::encode`] produces the complete framed message, tail included.
/// Commands restricted to one device family report it through
/// [`Command::required_capability`]; the session gate checks that before
/// any bytes leave the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Ask the device what it is and which firmware it runs.
    DeviceInfo,

    /// Stop the current heating or brewing cycle.
    Stop,

    /// Restore factory defaults.
    Reset,

    /// Start a firmware update cycle.
    FirmwareUpdate,

    /// Query the device clock. The reply layout is not understood yet.
    DeviceTime,

    /// Request the usage history block.
    History,

    /// Run a water-sensor calibration cycle.
    Calibrate,

    /// Read the stored water-sensor base value.
    CalibrateBase,

    /// Store a new water-sensor base value.
    StoreBaseCalibration {
        /// Requested base; values below 256 are clamped up before encoding
        base: u16,
    },

    /// Store new default boil settings.
    StoreKettleSettings {
        /// Boil target in °C
        temperature: u8,
        /// Keep-warm time in minutes, 0 = off
        keep_warm_minutes: u8,
        /// Whether to cool down to the formula temperature after the boil
        formula: bool,
        /// Formula-mode cool-down target in °C
        formula_temperature: u8,
    },

    /// Read the stored default boil settings.
    GetKettleSettings,

    /// Boil with the stored default settings.
    Heat,

    /// Boil, then cool down to the formula temperature.
    HeatFormula,

    /// Start brewing with the current cup and strength settings.
    Brew,

    /// Turn the hotplate on.
    HotplateOn {
        /// How long to keep it on, in minutes
        minutes: u8,
    },

    /// Turn the hotplate off.
    HotplateOff,

    /// Toggle the bean grinder.
    Grind,

    /// Select how many cups to brew.
    SetCups {
        /// Cup count, held to the carafe's 1-12 range
        cups: u8,
    },

    /// Select the brew strength.
    SetStrength {
        /// Strength selector
        strength: Strength,
    },

    /// Scan for visible wireless networks.
    WifiScan,

    /// Leave the configured network and return to access-point mode.
    WifiReset,

    /// Join the network configured with [`Command::WifiName`] and
    /// [`Command::WifiPassword`].
    WifiConnect,

    /// Set the password used when joining a wireless network.
    WifiPassword {
        /// Password, sent as raw ASCII bytes
        password: String,
    },

    /// Set the SSID used when joining a wireless network.
    WifiName {
        /// Network name, sent as raw ASCII bytes
        ssid: String,
    },

    /// Read the wireless module's firmware banner.
    WifiFirmware,
}

impl Command {
    /// Wire id byte for this command.
    pub fn id(&self) -> u8 {
        match self {
            Command::DeviceInfo => CMD_DEVICE_INFO,
            Command::Stop => CMD_STOP,
            Command::Reset => CMD_RESET,
            Command::FirmwareUpdate => CMD_UPDATE,
            Command::DeviceTime => CMD_DEVICE_TIME,
            Command::History => CMD_HISTORY,
            Command::Calibrate => CMD_CALIBRATE,
            Command::CalibrateBase => CMD_CALIBRATE_BASE,
            Command::StoreBaseCalibration { .. } => CMD_STORE_BASE,
            Command::StoreKettleSettings { .. } => CMD_STORE_SETTINGS,
            Command::GetKettleSettings => CMD_GET_SETTINGS,
            Command::Heat => CMD_HEAT,
            Command::HeatFormula => CMD_HEAT_FORMULA,
            Command::Brew => CMD_BREW,
            Command::HotplateOn { .. } => CMD_HOTPLATE_ON,
            Command::HotplateOff => CMD_HOTPLATE_OFF,
            Command::Grind => CMD_GRINDER,
            Command::SetCups { .. } => CMD_CUPS,
            Command::SetStrength { .. } => CMD_STRENGTH,
            Command::WifiScan => CMD_WIFI_SCAN,
            Command::WifiReset => CMD_WIFI_LEAVE,
            Command::WifiConnect => CMD_WIFI_JOIN,
            Command::WifiPassword { .. } => CMD_WIFI_PASSWORD,
            Command::WifiName { .. } => CMD_WIFI_NAME,
            Command::WifiFirmware => CMD_WIFI_FIRMWARE,
        }
    }

    /// Device family this command requires, if it is family-specific.
    pub fn required_capability(&self) -> Option<Capability> {
        match self {
            Command::StoreKettleSettings { .. }
            | Command::GetKettleSettings
            | Command::Heat
            | Command::HeatFormula => Some(Capability::Kettle),
            Command::Brew
            | Command::HotplateOn { .. }
            | Command::HotplateOff
            | Command::Grind
            | Command::SetCups { .. }
            | Command::SetStrength { .. } => Some(Capability::Coffee),
            _ => None,
        }
    }

    /// Encode into a complete framed message.
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        let mut payload = vec![self.id()];
        match self {
            Command::StoreBaseCalibration { base } => {
                payload.extend_from_slice(&codec::water_sensor_to_raw(*base));
            }
            Command::StoreKettleSettings {
                temperature,
                keep_warm_minutes,
                formula,
                formula_temperature,
            } => {
                payload.push(codec::temperature_to_raw(*temperature));
                payload.push(*keep_warm_minutes);
                payload.push(codec::bool_to_raw(*formula));
                payload.push(codec::temperature_to_raw(*formula_temperature));
            }
            Command::HotplateOn { minutes } => payload.push(*minutes),
            Command::SetCups { cups } => payload.push(codec::cups_to_raw(*cups)),
            Command::SetStrength { strength } => payload.push(strength.to_raw()),
            Command::WifiPassword { password } => payload.extend_from_slice(password.as_bytes()),
            Command::WifiName { ssid } => payload.extend_from_slice(ssid.as_bytes()),
            _ => {}
        }
        codec::frame_payload(&payload)
    }
}
