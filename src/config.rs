//! Optional TOML file with the same settings as the command line.
//!
//! ```toml
//! device = "60:AB:D2:29:7E:F8"
//! check = 5
//! backend = "native"
//! adapter = "hci0"
//! watch = true
//! ```

use crate::error::{Error, Result};

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// How to change the profile of a card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Run `pacmd set-card-profile`.
    #[default]
    Pacmd,

    /// Use the PulseAudio client library.
    Native,
}

#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub device: Option<String>,
    pub check: Option<i64>,
    pub backend: Option<Backend>,
    pub adapter: Option<String>,
    pub watch: Option<bool>,
}

pub fn load(path: &Path) -> Result<FileConfig> {
    let contents = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
        path: path.to_owned(),
        source,
    })?;

    toml::from_str(&contents).map_err(|source| Error::ConfigParse {
        path: path.to_owned(),
        source,
    })
}
