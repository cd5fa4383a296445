use crate::cycle::{Action, Cycle};

use log::{error, info};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

/// Events that request a check before the next tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    Connected,
}

/// When the headset is connected, PulseAudio needs some time to create the
/// card.
const SETTLE_ATTEMPTS: usize = 10;
const SETTLE_DELAY: Duration = Duration::from_millis(250);

/// Check the headset every `interval`, and every time a trigger is received.
pub fn run(cycle: &Cycle, interval: Duration, triggers: Receiver<Trigger>) {
    tick(cycle);

    loop {
        step(cycle, interval, &triggers);
    }
}

/// Wait for the next tick or trigger, and check the headset.
fn step(cycle: &Cycle, interval: Duration, triggers: &Receiver<Trigger>) -> Option<Action> {
    match triggers.recv_timeout(interval) {
        Ok(Trigger::Connected) => {
            info!("Headset {} connected", cycle.device());
            settle(cycle, SETTLE_ATTEMPTS, SETTLE_DELAY)
        }

        Err(RecvTimeoutError::Timeout) => tick(cycle),

        Err(RecvTimeoutError::Disconnected) => {
            thread::sleep(interval);
            tick(cycle)
        }
    }
}

/// Run a single check. Errors are logged.
pub fn tick(cycle: &Cycle) -> Option<Action> {
    match cycle.check() {
        Ok(action) => Some(action),
        Err(e) => {
            error!("Cannot check headset {}: {}", cycle.device(), e);
            None
        }
    }
}

/// Check until the card of the headset is visible.
fn settle(cycle: &Cycle, attempts: usize, delay: Duration) -> Option<Action> {
    for attempt in 1..=attempts {
        match tick(cycle) {
            Some(Action::Absent) | None if attempt < attempts => thread::sleep(delay),
            action => return action,
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle::fakes::{Dumps, Recorder};
    use pretty_assertions::assert_eq;
    use std::sync::mpsc;

    const DEVICE: &str = "60_AB_D2_29_7E_F8";

    const NO_HEADSET: &str = "1 card(s) available.
    index: 0
\tname: <alsa_card.pci-0000_00_1f.3>
\tactive profile: <output:analog-stereo>
";

    const HEADSET: &str = "    index: 2
\tname: <bluez_card.60_AB_D2_29_7E_F8>
\tactive profile: <headset_head_unit>
";

    const TICK: Duration = Duration::from_millis(5);

    #[test]
    fn timeout_is_a_tick() {
        let cards = Dumps::new(vec![Some(HEADSET)]);
        let switcher = Recorder::default();
        let cycle = Cycle::new(DEVICE, &cards, &switcher);
        let (_tx, rx) = mpsc::channel();

        assert_eq!(
            step(&cycle, TICK, &rx),
            Some(Action::Switch { card_index: 2 })
        );
        assert_eq!(cards.calls(), 1);
    }

    #[test]
    fn closed_channel_keeps_ticking() {
        let cards = Dumps::new(vec![Some(NO_HEADSET)]);
        let switcher = Recorder::default();
        let cycle = Cycle::new(DEVICE, &cards, &switcher);
        let (tx, rx) = mpsc::channel();
        drop(tx);

        assert_eq!(step(&cycle, TICK, &rx), Some(Action::Absent));
        assert_eq!(step(&cycle, TICK, &rx), Some(Action::Absent));
        assert_eq!(cards.calls(), 2);
    }

    #[test]
    fn connected_waits_for_the_card() {
        let cards = Dumps::new(vec![Some(NO_HEADSET), None, Some(HEADSET)]);
        let switcher = Recorder::default();
        let cycle = Cycle::new(DEVICE, &cards, &switcher);
        let (tx, rx) = mpsc::channel();
        tx.send(Trigger::Connected).unwrap();

        assert_eq!(
            step(&cycle, Duration::from_secs(60), &rx),
            Some(Action::Switch { card_index: 2 })
        );
        assert_eq!(cards.calls(), 3);
        assert_eq!(switcher.calls.borrow().len(), 1);
    }

    #[test]
    fn settle_gives_up() {
        let cards = Dumps::new(vec![Some(NO_HEADSET)]);
        let switcher = Recorder::default();
        let cycle = Cycle::new(DEVICE, &cards, &switcher);

        assert_eq!(settle(&cycle, 3, TICK), Some(Action::Absent));
        assert_eq!(cards.calls(), 3);
    }

    #[test]
    fn errors_do_not_stop_the_ticks() {
        let cards = Dumps::new(vec![None, Some(HEADSET)]);
        let switcher = Recorder::default();
        let cycle = Cycle::new(DEVICE, &cards, &switcher);

        assert_eq!(tick(&cycle), None);
        assert_eq!(tick(&cycle), Some(Action::Switch { card_index: 2 }));
    }
}
