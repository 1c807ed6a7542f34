//! Wire-level protocol constants
//!
//! Command codes, response codes and the per-response minimum message
//! lengths. The minimum-length table is what lets the framer tell a
//! tail-valued payload byte apart from the real end of a message, so it
//! must stay in lock-step with the field layouts in `responses`.

/// Sentinel byte terminating every protocol message.
pub const MESSAGE_TAIL: u8 = 0x7e;

// ============================================================================
// Command codes (client → device)
// ============================================================================

/// Set the device clock.
pub const CMD_DEVICE_TIME: u8 = 0x02;
/// Set the SSID used when joining a wireless network.
pub const CMD_WIFI_NAME: u8 = 0x05;
/// Set the password used when joining a wireless network.
pub const CMD_WIFI_PASSWORD: u8 = 0x07;
/// Join the configured wireless network.
pub const CMD_WIFI_JOIN: u8 = 0x0c;
/// Scan for visible wireless networks.
pub const CMD_WIFI_SCAN: u8 = 0x0d;
/// Leave the configured network and fall back to access-point mode.
pub const CMD_WIFI_LEAVE: u8 = 0x0f;
/// Restore factory defaults.
pub const CMD_RESET: u8 = 0x10;
/// Boil with the stored default settings.
pub const CMD_HEAT: u8 = 0x15;
/// Stop the current heating or brewing cycle.
pub const CMD_STOP: u8 = 0x16;
/// Boil, then cool down to the formula temperature.
pub const CMD_HEAT_FORMULA: u8 = 0x19;
/// Store new default boil settings.
pub const CMD_STORE_SETTINGS: u8 = 0x1f;
/// Request the usage history block.
pub const CMD_HISTORY: u8 = 0x28;
/// Run a water-sensor calibration cycle.
pub const CMD_CALIBRATE: u8 = 0x2a;
/// Read the stored water-sensor base value.
pub const CMD_CALIBRATE_BASE: u8 = 0x2b;
/// Store a new water-sensor base value.
pub const CMD_STORE_BASE: u8 = 0x2c;
/// Read the stored default boil settings.
pub const CMD_GET_SETTINGS: u8 = 0x2e;
/// Select the brew strength.
pub const CMD_STRENGTH: u8 = 0x35;
/// Select how many cups to brew.
pub const CMD_CUPS: u8 = 0x36;
/// Start brewing with the current cup and strength settings.
pub const CMD_BREW: u8 = 0x37;
/// Toggle the bean grinder.
pub const CMD_GRINDER: u8 = 0x3c;
/// Turn the hotplate on for a number of minutes.
pub const CMD_HOTPLATE_ON: u8 = 0x3e;
/// Turn the hotplate off.
pub const CMD_HOTPLATE_OFF: u8 = 0x4a;
/// Ask the device what it is and which firmware it runs.
pub const CMD_DEVICE_INFO: u8 = 0x64;
/// Read the wireless module's firmware banner.
pub const CMD_WIFI_FIRMWARE: u8 = 0x6a;
/// Start a firmware update cycle.
pub const CMD_UPDATE: u8 = 0x6d;

// ============================================================================
// Response codes (device → client)
// ============================================================================

/// Acknowledgement carrying the result of the previous command.
pub const RESP_COMMAND_STATUS: u8 = 0x03;
/// Wireless scan results.
pub const RESP_WIFI_LIST: u8 = 0x0e;
/// Status push, solicited or not.
pub const RESP_STATUS: u8 = 0x14;
/// Usage history block.
pub const RESP_HISTORY: u8 = 0x29;
/// Stored water-sensor base value.
pub const RESP_BASE: u8 = 0x2d;
/// Stored default boil settings.
pub const RESP_SETTINGS: u8 = 0x2f;
/// Device kind and firmware version.
pub const RESP_DEVICE_INFO: u8 = 0x65;
/// Wireless module firmware banner.
pub const RESP_WIFI_FIRMWARE: u8 = 0x6b;

// ============================================================================
// Field sentinels and scaling
// ============================================================================

/// Value of the status temperature byte when the kettle is off its base.
pub const OFF_BASE_SENTINEL: u8 = 0x7f;

/// Smallest water-sensor base value the device accepts; requested values
/// below this are clamped up before encoding.
pub const WATER_SENSOR_FLOOR: u16 = 256;

/// Minimum total length (id and tail included) of a response message.
///
/// Returns 0 for variable-length and unknown ids, where the first tail
/// byte genuinely ends the message.
pub fn min_response_length(id: u8) -> usize {
    match id {
        RESP_COMMAND_STATUS => 3,
        // Kettle layout. Coffee status runs one byte longer, but its extra
        // byte is a cup count (1..=12) and can never read as a tail.
        RESP_STATUS => 6,
        RESP_BASE => 4,
        RESP_SETTINGS => 5,
        RESP_DEVICE_INFO => 4,
        _ => 0,
    }
}
