//! Human-readable rendering of session state
//!
//! Pure string builders backing the CLI output; nothing here touches the
//! connection.

use protocol::{CoffeeStatus, KettleSettings, KettleStatus, WifiNetwork};

use crate::network::{DeviceIdentity, DeviceSession};

/// One-line device identity, e.g. `kettle, firmware v19`.
pub fn device_line(identity: DeviceIdentity) -> String {
    format!("{}, firmware v{}", identity.kind, identity.firmware)
}

/// Pluralized cup count.
pub fn cups_line(cups: u8) -> String {
    if cups == 1 {
        "1 cup".to_string()
    } else {
        format!("{cups} cups")
    }
}

/// The stored boil program as one sentence, e.g.
/// `Boil water to 100°C, let it cool down to 75°C and keep it warm for 10 minutes`.
pub fn settings_line(settings: &KettleSettings) -> String {
    let mut line = format!("Boil water to {}°C", settings.temperature);
    if let Some(formula) = settings.formula_temperature {
        let sep = if settings.keep_warm_minutes > 0 {
            ","
        } else {
            " and"
        };
        line.push_str(&format!("{sep} let it cool down to {formula}°C"));
    }
    if settings.keep_warm_minutes > 0 {
        line.push_str(&format!(
            " and keep it warm for {} minutes",
            settings.keep_warm_minutes
        ));
    }
    line
}

fn kettle_report(status: &KettleStatus, session: &DeviceSession) -> Vec<String> {
    let mut lines = Vec::new();
    if status.on_base {
        lines.push(format!("Status         {}", status.activity));
        lines.push(format!("Temperature    {}°C", status.temperature));
        match session.water_sensor_base() {
            Some(base) => lines.push(format!(
                "Water sensor   {} (calibration base {base})",
                status.water_sensor
            )),
            None => lines.push(format!("Water sensor   {}", status.water_sensor)),
        }
    } else {
        lines.push("Status         off base".to_string());
    }
    if let Some(settings) = session.settings() {
        lines.push(format!("Default boil   {}", settings_line(settings)));
    }
    lines
}

fn coffee_report(status: &CoffeeStatus) -> Vec<String> {
    vec![
        format!("Status         0x{:02X}", status.status),
        format!("Water sensor   {}", status.water_sensor),
        format!(
            "Setting        {} {}",
            status.strength,
            cups_line(status.cups)
        ),
    ]
}

/// Multi-line status report for whatever the session knows about.
pub fn status_report(session: &DeviceSession) -> Vec<String> {
    if let Some(status) = session.kettle() {
        return kettle_report(status, session);
    }
    if let Some(status) = session.coffee() {
        return coffee_report(status);
    }
    vec!["No status received yet".to_string()]
}

/// A 10-slot signal bar, filled from the right, e.g. `      ████`.
pub fn signal_bar(quality: u8) -> String {
    let filled = usize::from(quality / 10);
    let mut bar = " ".repeat(10 - filled);
    bar.push_str(&"█".repeat(filled));
    bar
}

/// Scan results as a table, strongest network on top.
pub fn wifi_table(networks: &[WifiNetwork]) -> Vec<String> {
    let mut lines = vec!["    Signal      Wireless Network".to_string()];
    for network in networks {
        lines.push(format!(
            "    {}  {}",
            signal_bar(network.signal_quality()),
            network.ssid
        ));
    }
    lines
}
