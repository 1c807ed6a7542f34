//! Responses and pushes emitted by the appliance
//!
//! One decoder per response id, each reading fixed id-relative offsets.
//! Decoding is all-or-nothing: a malformed message yields an error and
//! nothing else, so previously accumulated session state stays intact.

use crate::codec;
use crate::constants::*;
use crate::error::{DecodeError, ProtocolError};
use crate::types::{
    CoffeeStatus, CommandResult, DeviceKind, KettleActivity, KettleSettings, KettleStatus,
    Strength, WifiNetwork,
};

/// Status payload variant, selected by the session's device kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdate {
    /// Kettle field layout
    Kettle(KettleStatus),
    /// Coffee-maker field layout
    Coffee(CoffeeStatus),
    /// Received before the device kind is known; fields left undecoded
    Unclassified,
}

/// Device → client messages, one variant per response id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Acknowledgement carrying the result of the previous command
    CommandStatus(CommandResult),
    /// Identity report: device kind and firmware version
    DeviceInfo {
        /// What the appliance is
        kind: DeviceKind,
        /// Firmware version number
        firmware: u8,
    },
    /// Status push, spontaneous or marking a command as settled
    Status(StatusUpdate),
    /// Stored water-sensor base value
    BaseCalibration {
        /// Combined sensor reading for the empty vessel
        base: u16,
    },
    /// Stored default boil settings
    Settings(KettleSettings),
    /// Usage history block; layout is not understood and kept opaque
    History,
    /// Wireless module firmware banner
    WifiFirmware(String),
    /// Wireless scan results, strongest signal first
    WifiList(Vec<WifiNetwork>),
}

impl Response {
    /// Decode one framed message.
    ///
    /// `kind` selects the status field layout. Before the device kind is
    /// known a status message decodes to [`StatusUpdate::Unclassified`]
    /// rather than guessing at offsets.
    pub fn decode(message: &[u8], kind: DeviceKind) -> Result<Self, ProtocolError> {
        let Some(&id) = message.first() else {
            return Err(ProtocolError::EmptyMessage);
        };
        let response = match id {
            RESP_COMMAND_STATUS => {
                require_len(message, "command-status", 3)?;
                Response::CommandStatus(CommandResult::from(message[1]))
            }
            RESP_DEVICE_INFO => {
                require_len(message, "device-info", 4)?;
                Response::DeviceInfo {
                    kind: DeviceKind::from_selector(message[1]),
                    firmware: message[2],
                }
            }
            RESP_STATUS => Response::Status(decode_status(message, kind)?),
            RESP_BASE => {
                require_len(message, "base-calibration", 4)?;
                Response::BaseCalibration {
                    base: codec::water_sensor_from_raw(message[1], message[2]),
                }
            }
            RESP_SETTINGS => {
                require_len(message, "settings", 5)?;
                Response::Settings(KettleSettings {
                    temperature: message[1],
                    keep_warm_minutes: message[2],
                    formula_temperature: match message[3] {
                        0 => None,
                        celsius => Some(celsius),
                    },
                })
            }
            RESP_HISTORY => Response::History,
            RESP_WIFI_FIRMWARE => Response::WifiFirmware(decode_printable(message)),
            RESP_WIFI_LIST => Response::WifiList(decode_wifi_list(message)?),
            other => return Err(ProtocolError::UnknownResponse(other)),
        };
        Ok(response)
    }

    /// Whether this message is a status-class push, the kind that drains
    /// ahead of a reply and that settles a command exchange.
    pub fn is_status(&self) -> bool {
        matches!(self, Response::Status(_))
    }
}

fn require_len(
    message: &[u8],
    response: &'static str,
    expected: usize,
) -> Result<(), DecodeError> {
    if message.len() < expected {
        return Err(DecodeError::ShortResponse {
            response,
            expected,
            actual: message.len(),
        });
    }
    Ok(())
}

fn decode_status(message: &[u8], kind: DeviceKind) -> Result<StatusUpdate, DecodeError> {
    let update = match kind {
        DeviceKind::Kettle => {
            require_len(message, "status", 6)?;
            StatusUpdate::Kettle(KettleStatus {
                activity: KettleActivity::from(message[1]),
                temperature: codec::temperature_from_raw(message[2]),
                on_base: codec::is_on_base(message[2]),
                water_sensor: codec::water_sensor_from_raw(message[3], message[4]),
            })
        }
        DeviceKind::CoffeeMaker => {
            require_len(message, "status", 7)?;
            StatusUpdate::Coffee(CoffeeStatus {
                status: message[1],
                water_sensor: codec::water_sensor_from_raw(message[2], message[3]),
                strength: Strength::from_raw(message[4]).ok_or_else(|| {
                    DecodeError::MalformedPayload {
                        response: "status",
                        reason: format!("invalid strength code 0x{:02X}", message[4]),
                    }
                })?,
                cups: message[5],
            })
        }
        DeviceKind::Unknown => StatusUpdate::Unclassified,
    };
    Ok(update)
}

/// Printable bytes between id and tail, as text.
fn decode_printable(message: &[u8]) -> String {
    payload_of(message)
        .iter()
        .copied()
        .filter(|&b| b.is_ascii_graphic() || b" \t\r\n".contains(&b))
        .map(|b| b as char)
        .collect()
}

/// Parse the brace/comma-delimited scan list: each record is
/// `ssid,signal}`, signal in dBm. Unterminated trailing records are
/// dropped, matching the device's own sloppy formatting.
fn decode_wifi_list(message: &[u8]) -> Result<Vec<WifiNetwork>, DecodeError> {
    let mut networks = Vec::new();
    let mut ssid = String::new();
    let mut signal = String::new();
    let mut in_signal = false;
    for &byte in payload_of(message) {
        match byte {
            b',' => {
                in_signal = true;
                signal.clear();
            }
            b'}' => {
                let signal_dbm =
                    signal
                        .parse::<i16>()
                        .map_err(|_| DecodeError::MalformedPayload {
                            response: "wifi-list",
                            reason: format!("invalid signal value {signal:?}"),
                        })?;
                networks.push(WifiNetwork {
                    ssid: std::mem::take(&mut ssid),
                    signal_dbm,
                });
                in_signal = false;
            }
            byte if byte.is_ascii_graphic() || byte == b' ' => {
                if in_signal {
                    signal.push(byte as char);
                } else {
                    ssid.push(byte as char);
                }
            }
            _ => {}
        }
    }
    networks.sort_by(|a, b| b.signal_dbm.cmp(&a.signal_dbm));
    Ok(networks)
}

fn payload_of(message: &[u8]) -> &[u8] {
    message
        .get(1..message.len().saturating_sub(1))
        .unwrap_or(&[])
}
