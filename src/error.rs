use std::io;
use std::num::ParseIntError;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot convert card index '{value}' to an integer: {source}")]
    CardIndex {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("cannot start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` failed: {status}")]
    Command { command: String, status: ExitStatus },

    #[error("invalid bluetooth device '{0}' (expected XX:XX:XX:XX:XX:XX)")]
    InvalidDevice(String),

    #[error("missing bluetooth device; use --device or set `device` in the config file")]
    MissingDevice,

    #[error("cannot read {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("PulseAudio: {0}")]
    Pulse(String),

    #[error("D-Bus: {0}")]
    DBus(#[from] dbus::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
