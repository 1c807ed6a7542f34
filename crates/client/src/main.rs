//! brewlink CLI
//!
//! Command-line client for network-attached kettle and coffee-maker
//! appliances: connect, inspect status, start cycles and manage the
//! device's wireless setup.

use anyhow::{Context, Result, anyhow, ensure};
use clap::{Parser, Subcommand};
use client::network::CommandOutcome;
use client::{ClientConfig, DeviceConnection, display, logging::setup_logging};
use protocol::Strength;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "brewlink")]
#[command(author, version, about = "brewlink - drive smart kettles and coffee makers")]
#[command(long_about = "
Command-line client for network-attached kettle and coffee-maker appliances.

EXAMPLES:
    # Show the connected device's status
    brewlink status

    # Boil with the stored defaults
    brewlink --host 10.0.0.7 heat

    # Brew six strong cups
    brewlink cups 6 && brewlink strength strong && brewlink brew

    # Point the device at your wireless network
    brewlink wifi-name HomeNet
    brewlink wifi-password hunter2
    brewlink wifi-join

CONFIGURATION:
    The client looks for configuration files in the following order:
    1. Path specified with --config
    2. ~/.config/brewlink/client.toml
    3. /etc/brewlink/client.toml
    4. Built-in defaults
")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<std::path::PathBuf>,

    /// Save default configuration to default location and exit
    #[arg(long)]
    save_config: bool,

    /// Device address (overrides config)
    #[arg(long, value_name = "HOST")]
    host: Option<String>,

    /// Device TCP port (overrides config)
    #[arg(long, value_name = "PORT")]
    port: Option<u16>,

    /// Command timeout in seconds, 0 to wait forever (overrides config)
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Show the device's current status (default)
    Status,
    /// Show device kind and firmware version
    Info,
    /// Stop the current heating or brewing cycle
    Stop,
    /// Restore factory defaults
    Reset,
    /// Start a firmware update cycle
    Update,
    /// Query the device clock
    Time,
    /// Request the usage history block
    History,

    /// Boil with the stored default settings (kettle)
    Heat,
    /// Boil, then cool down to the formula temperature (kettle)
    FormulaHeat,
    /// Show the stored default boil settings (kettle)
    Settings,
    /// Store new default boil settings (kettle)
    StoreSettings {
        /// Boil target in °C
        #[arg(long, default_value_t = 100)]
        temperature: u8,
        /// Keep-warm time in minutes, 0 = off
        #[arg(long, default_value_t = 0)]
        keep_warm: u8,
        /// Cool down to this temperature after the boil (enables formula mode)
        #[arg(long)]
        formula_temperature: Option<u8>,
    },

    /// Start brewing (coffee maker)
    Brew,
    /// Toggle the bean grinder (coffee maker)
    Grind,
    /// Turn the hotplate on (coffee maker)
    HotplateOn {
        /// How long to keep it on, in minutes
        #[arg(default_value_t = 5)]
        minutes: u8,
    },
    /// Turn the hotplate off (coffee maker)
    HotplateOff,
    /// Select how many cups to brew (coffee maker)
    Cups {
        /// Cup count, 1-12
        count: u8,
    },
    /// Select the brew strength (coffee maker)
    Strength {
        /// weak, medium or strong
        level: Strength,
    },

    /// Run a water-sensor calibration cycle with an empty vessel
    Calibrate,
    /// Show the stored water-sensor base value
    CalibrateBase,
    /// Store a new water-sensor base value (values below 256 are clamped up)
    StoreBase {
        /// Requested base value
        value: u16,
    },

    /// Scan for visible wireless networks
    WifiScan,
    /// Show the wireless module's firmware banner
    WifiFirmware,
    /// Set the SSID used when joining a wireless network
    WifiName {
        /// Network name
        ssid: String,
    },
    /// Set the password used when joining a wireless network
    WifiPassword {
        /// Network password
        password: String,
    },
    /// Join the configured wireless network
    WifiJoin,
    /// Leave the network and return to access-point mode
    WifiLeave,

    /// Send raw hex codes, e.g. `raw "64 7e"` (tail is appended if missing)
    Raw {
        /// Hex byte codes, whitespace optional
        codes: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Handle --save-config flag early (before loading config)
    if args.save_config {
        let config = ClientConfig::default();
        let path = ClientConfig::default_path();
        config.save(&path).context("Failed to save configuration")?;
        println!("Configuration saved to: {}", path.display());
        return Ok(());
    }

    let mut config = if let Some(ref path) = args.config {
        ClientConfig::load(Some(path.clone())).context("Failed to load configuration")?
    } else {
        ClientConfig::load_or_default()
    };

    // CLI flags override file values
    if let Some(host) = args.host {
        config.device.host = host;
    }
    if let Some(port) = args.port {
        config.device.port = port;
    }
    if let Some(timeout) = args.timeout {
        config.device.command_timeout_secs = timeout;
    }

    let log_level = args
        .log_level
        .as_deref()
        .unwrap_or(&config.client.log_level);
    setup_logging(log_level).context("Failed to setup logging")?;

    info!("brewlink v{}", env!("CARGO_PKG_VERSION"));

    let mut device = DeviceConnection::connect(
        &config.device.host,
        config.device.port,
        config.command_timeout(),
    )
    .await
    .with_context(|| {
        format!(
            "Failed to connect to {}:{}",
            config.device.host, config.device.port
        )
    })?;

    println!(
        "Connected to {} ({})",
        display::device_line(device.session().identity()),
        config.device.host
    );

    let result = run_command(&mut device, args.command.unwrap_or(Cmd::Status)).await;
    device.close().await.context("Failed to close connection")?;
    result
}

async fn run_command(device: &mut DeviceConnection, command: Cmd) -> Result<()> {
    match command {
        Cmd::Status => {
            for line in display::status_report(device.session()) {
                println!("{line}");
            }
        }
        Cmd::Info => {
            device.device_info().await?;
            println!("{}", display::device_line(device.session().identity()));
        }
        Cmd::Stop => print_outcome(&device.stop().await?),
        Cmd::Reset => print_outcome(&device.reset().await?),
        Cmd::Update => print_outcome(&device.firmware_update().await?),
        Cmd::Time => print_outcome(&device.device_time().await?),
        Cmd::History => print_outcome(&device.history().await?),

        Cmd::Heat => print_outcome(&device.heat().await?),
        Cmd::FormulaHeat => print_outcome(&device.heat_formula().await?),
        Cmd::Settings => {
            device.kettle_settings().await?;
            match device.session().settings() {
                Some(settings) => println!("{}", display::settings_line(settings)),
                None => println!("No settings reported"),
            }
        }
        Cmd::StoreSettings {
            temperature,
            keep_warm,
            formula_temperature,
        } => {
            let outcome = device
                .store_kettle_settings(
                    temperature,
                    keep_warm,
                    formula_temperature.is_some(),
                    formula_temperature.unwrap_or(75),
                )
                .await?;
            print_outcome(&outcome);
        }

        Cmd::Brew => print_outcome(&device.brew().await?),
        Cmd::Grind => print_outcome(&device.grind().await?),
        Cmd::HotplateOn { minutes } => print_outcome(&device.hotplate_on(minutes).await?),
        Cmd::HotplateOff => print_outcome(&device.hotplate_off().await?),
        Cmd::Cups { count } => print_outcome(&device.set_cups(count).await?),
        Cmd::Strength { level } => print_outcome(&device.set_strength(level).await?),

        Cmd::Calibrate => print_outcome(&device.calibrate().await?),
        Cmd::CalibrateBase => {
            device.calibrate_base().await?;
            match device.session().water_sensor_base() {
                Some(base) => println!("Water sensor calibration base: {base}"),
                None => println!("No calibration base reported"),
            }
        }
        Cmd::StoreBase { value } => print_outcome(&device.store_base_calibration(value).await?),

        Cmd::WifiScan => {
            device.wifi_scan().await?;
            match device.session().wifi_networks() {
                Some(networks) if !networks.is_empty() => {
                    for line in display::wifi_table(networks) {
                        println!("{line}");
                    }
                }
                _ => println!("No networks found"),
            }
        }
        Cmd::WifiFirmware => {
            device.wifi_firmware().await?;
            match device.session().wifi_firmware() {
                Some(banner) => println!("{banner}"),
                None => println!("No firmware banner reported"),
            }
        }
        Cmd::WifiName { ssid } => print_outcome(&device.wifi_name(&ssid).await?),
        Cmd::WifiPassword { password } => print_outcome(&device.wifi_password(&password).await?),
        Cmd::WifiJoin => print_outcome(&device.wifi_connect().await?),
        Cmd::WifiLeave => print_outcome(&device.wifi_reset().await?),

        Cmd::Raw { codes } => {
            let payload = parse_hex_codes(&codes)?;
            let outcome = device.send_raw(&payload).await?;
            println!("Reply: {:?}", outcome.reply);
            print_outcome(&outcome);
        }
    }
    Ok(())
}

fn print_outcome(outcome: &CommandOutcome) {
    if let Some(result) = outcome.result {
        println!("Command replied: {result}");
    }
}

fn parse_hex_codes(codes: &str) -> Result<Vec<u8>> {
    let compact: String = codes.chars().filter(|c| !c.is_whitespace()).collect();
    ensure!(
        compact.len() % 2 == 0,
        "hex codes need an even number of digits"
    );
    (0..compact.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&compact[i..i + 2], 16)
                .map_err(|_| anyhow!("invalid hex byte {:?}", &compact[i..i + 2]))
        })
        .collect()
}
