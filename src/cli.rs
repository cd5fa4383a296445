use crate::config::{self, Backend, FileConfig};
use crate::error::{Error, Result};

use clap::Parser;
use log::warn;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_CHECK: i64 = 5;
const MIN_CHECK: i64 = 1;
const MAX_CHECK: i64 = 59;

const DEFAULT_ADAPTER: &str = "hci0";

/// Switch a bluetooth headset to the a2dp_sink profile when PulseAudio
/// connects it with a different one.
#[derive(Debug, Default, Parser)]
#[command(version, about)]
pub struct Cli {
    /// ID of the bluetooth device (XX:XX:XX:XX:XX:XX or XX_XX_XX_XX_XX_XX)
    #[arg(short, long, visible_alias = "id")]
    pub device: Option<String>,

    /// Check period, in seconds (1-59) [default: 5]
    #[arg(short, long, allow_negative_numbers = true)]
    pub check: Option<i64>,

    /// How to change the profile [default: pacmd]
    #[arg(long, value_enum)]
    pub backend: Option<Backend>,

    /// Bluetooth adapter used to watch connections [default: hci0]
    #[arg(long)]
    pub adapter: Option<String>,

    /// Check immediately when the device is connected (needs D-Bus)
    #[arg(long)]
    pub watch: bool,

    /// Check once and exit
    #[arg(long)]
    pub once: bool,

    /// Read settings from a TOML file. Command line values take precedence
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Show debug messages
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// Device ID with `_` as separator.
    pub device: String,
    pub interval: Duration,
    pub backend: Backend,
    pub adapter: String,
    pub watch: bool,
    pub once: bool,
}

impl Settings {
    pub fn load(cli: Cli) -> Result<Settings> {
        let file = match &cli.config {
            Some(path) => config::load(path)?,
            None => FileConfig::default(),
        };

        Settings::merge(cli, file)
    }

    fn merge(cli: Cli, file: FileConfig) -> Result<Settings> {
        let device = cli.device.or(file.device).ok_or(Error::MissingDevice)?;
        let check = cli.check.or(file.check).unwrap_or(DEFAULT_CHECK);

        Ok(Settings {
            device: normalize_device(&device)?,
            interval: Duration::from_secs(clamp_check(check)),
            backend: cli.backend.or(file.backend).unwrap_or_default(),
            adapter: cli
                .adapter
                .or(file.adapter)
                .unwrap_or_else(|| DEFAULT_ADAPTER.to_owned()),
            watch: cli.watch || file.watch.unwrap_or(false),
            once: cli.once,
        })
    }
}

/// Replace `:` with `_`, as in the names of the bluez cards.
fn normalize_device(device: &str) -> Result<String> {
    let device = device.replace(':', "_");
    if valid_mac(&device) {
        Ok(device)
    } else {
        Err(Error::InvalidDevice(device))
    }
}

fn valid_mac(mac: &str) -> bool {
    mac.split('_')
        .all(|x| x.len() == 2 && u8::from_str_radix(x, 16).is_ok())
        && mac.split('_').count() == 6
}

fn clamp_check(check: i64) -> u64 {
    let clamped = check.clamp(MIN_CHECK, MAX_CHECK);
    if clamped != check {
        warn!(
            "value of '--check' is '{}', but must be in range {}-{}; autocorrect to: {}",
            check, MIN_CHECK, MAX_CHECK, clamped
        );
    }

    clamped as u64
}
