//! Run `pacmd` to read the cards, and to change their profiles.

use crate::cycle::{CardSource, ProfileSwitcher};
use crate::error::{Error, Result};

use log::debug;
use std::process::{Command, Stdio};

pub struct Pacmd {
    program: &'static str,
}

impl Default for Pacmd {
    fn default() -> Self {
        Pacmd { program: "pacmd" }
    }
}

impl Pacmd {
    #[cfg(test)]
    fn with_program(program: &'static str) -> Self {
        Pacmd { program }
    }

    /// Run the program and return its standard output.
    fn run(&self, args: &[&str]) -> Result<Vec<u8>> {
        let command = format!("{} {}", self.program, args.join(" "));
        debug!("run: {}", command);

        let output = Command::new(self.program)
            .args(args)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| Error::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(Error::Command {
                command,
                status: output.status,
            });
        }

        Ok(output.stdout)
    }
}

impl CardSource for Pacmd {
    fn list_cards(&self) -> Result<Vec<String>> {
        let stdout = self.run(&["list-cards"])?;
        Ok(String::from_utf8_lossy(&stdout)
            .lines()
            .map(String::from)
            .collect())
    }
}

impl ProfileSwitcher for Pacmd {
    fn set_card_profile(&self, card_index: u32, profile: &str) -> Result<()> {
        self.run(&["set-card-profile", &card_index.to_string(), profile])?;
        Ok(())
    }
}
