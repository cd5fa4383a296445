use pulse::context::Context;
use pulse::mainloop::standard::Mainloop;

use crate::cycle::ProfileSwitcher;
use crate::error::{Error, Result};

use log::{debug, warn};

use std::cell::Cell;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

const ATTEMPTS: usize = 10;
const RETRY_DELAY: Duration = Duration::from_millis(250);

/// Change card profiles with the PulseAudio client library, instead of
/// running `pacmd`.
pub struct Native;

impl ProfileSwitcher for Native {
    fn set_card_profile(&self, card_index: u32, profile: &str) -> Result<()> {
        for attempt in 1..=ATTEMPTS {
            match set_card_profile(card_index, profile) {
                Ok(true) => return Ok(()),
                Ok(false) => debug!("set-profile: attempt {} failed", attempt),
                Err(e) => warn!("set-profile: attempt {}: {}", attempt, e),
            }

            thread::sleep(RETRY_DELAY);
        }

        Err(Error::Pulse(format!(
            "cannot set profile '{}' for card {}",
            profile, card_index
        )))
    }
}

fn set_card_profile(card_index: u32, profile: &str) -> Result<bool> {
    // Connect to PulseAudio and prepare an Introspector instance
    let mut mainloop =
        Mainloop::new().ok_or_else(|| Error::Pulse("cannot create main loop".into()))?;

    let mut context = Context::new(&mainloop, env!("CARGO_PKG_NAME"))
        .ok_or_else(|| Error::Pulse("cannot create context".into()))?;

    context
        .connect(None, pulse::context::FlagSet::NOFLAGS, None)
        .map_err(|e| Error::Pulse(format!("cannot connect context: {:?}", e)))?;

    loop {
        if !mainloop.iterate(false).is_success() {
            return Err(Error::Pulse("main loop iteration failed".into()));
        }

        match context.get_state() {
            pulse::context::State::Ready => {
                break;
            }
            pulse::context::State::Failed | pulse::context::State::Terminated => {
                return Err(Error::Pulse("context failed".into()));
            }
            _ => thread::sleep(Duration::from_millis(100)),
        }
    }

    let mut introspect = context.introspect();

    // None until the server replies
    let result = Rc::new(Cell::new(None));

    let result2 = result.clone();
    introspect.set_card_profile_by_index(
        card_index,
        profile,
        Some(Box::new(move |success| {
            debug!(
                "set-profile: {}",
                if success { "success" } else { "failed" }
            );

            result2.set(Some(success));
        })),
    );

    while result.get().is_none() {
        if !mainloop.iterate(true).is_success() {
            break;
        }
    }

    context.disconnect();

    Ok(result.get().unwrap_or(false))
}
