//! Find the active profile of a bluetooth card in the output of
//! `pacmd list-cards`.
//!
//! The output is a tree where nesting is encoded only by indentation. A card
//! record looks like this (tabs shown as `→`):
//!
//! ```text
//!     index: 3
//! →name: <bluez_card.60_AB_D2_29_7E_F8>
//! →driver: <module-bluez5-device.c>
//! →profiles:
//! →→a2dp_sink: High Fidelity Playback (A2DP Sink)
//! →active profile: <headset_head_unit>
//! ```
//!
//! The scan is a single forward pass: it looks for the `name:` line of the
//! card, and then for the first `active profile:` line before the block is
//! closed by a line with less indentation.

use crate::error::Error;

use log::{debug, warn};

const INDEX_MARKER: &str = "index:";
const ACTIVE_PROFILE_MARKER: &str = "active profile:";

/// Replace every tab with two spaces.
pub fn normalize(line: &str) -> String {
    line.replace('\t', "  ")
}

/// Number of spaces before the first non-space character. Tabs have to be
/// replaced before, with [`normalize`].
pub fn indentation(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// Text of the `name:` line for the card of a bluetooth device. `device` is
/// expected with `_` as separator, like `60_AB_D2_29_7E_F8`.
pub fn device_marker(device: &str) -> String {
    format!("name: <bluez_card.{}>", device)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// There is no card for the device.
    NotFound,

    /// The card was found, but its block has no `active profile:` line.
    NoProfile,

    /// The `active profile:` line of the card, after tabs are normalized.
    Active(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scan {
    pub outcome: Outcome,

    /// Last valid `index:` value seen before the scan stopped. It can belong
    /// to a different card if the block of the device has no index line.
    pub card_index: u32,
}

impl Scan {
    pub fn into_pair(self) -> (String, u32) {
        match self.outcome {
            Outcome::Active(line) => (line, self.card_index),
            Outcome::NotFound | Outcome::NoProfile => (String::new(), self.card_index),
        }
    }
}

#[derive(Clone, Copy)]
enum State {
    Searching,
    InBlock { indent: usize },
}

/// Scan the lines looking for the active profile of `device`.
pub fn scan<I, S>(lines: I, device: &str) -> Scan
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let marker = device_marker(device);
    let mut state = State::Searching;
    let mut card_index = 0;

    for line in lines {
        let line = normalize(line.as_ref());

        // Index lines can appear at any level, and they never open or close
        // a block.
        if line.contains(INDEX_MARKER) {
            match parse_index(&line) {
                Ok(index) => card_index = index,
                Err(e) => warn!("{}", e),
            }
            continue;
        }

        match state {
            State::Searching => {
                if line.contains(&marker) {
                    debug!("Found headset in line: {}", line);
                    state = State::InBlock {
                        indent: indentation(&line),
                    };
                }
            }

            State::InBlock { indent } => {
                if indentation(&line) < indent {
                    debug!("Found indentation change in line: {}", line);
                    return Scan {
                        outcome: Outcome::NoProfile,
                        card_index,
                    };
                }

                if line.contains(ACTIVE_PROFILE_MARKER) {
                    return Scan {
                        outcome: Outcome::Active(line),
                        card_index,
                    };
                }
            }
        }
    }

    let outcome = match state {
        State::Searching => Outcome::NotFound,
        State::InBlock { .. } => Outcome::NoProfile,
    };

    Scan {
        outcome,
        card_index,
    }
}

/// Same as [`scan`], with the result collapsed to `(profile_line, card_index)`.
pub fn find_profile<I, S>(lines: I, device: &str) -> (String, u32)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    scan(lines, device).into_pair()
}

/// Parse the value between the first and the second `:` of an index line.
fn parse_index(line: &str) -> Result<u32, Error> {
    let value = line.split(':').nth(1).unwrap_or_default();
    value.trim().parse().map_err(|source| Error::CardIndex {
        value: value.to_owned(),
        source,
    })
}
