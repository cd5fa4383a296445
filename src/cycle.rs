//! One check of the headset: read the cards, find the active profile of the
//! device, and switch it to `a2dp_sink` if needed.

use crate::error::Result;
use crate::profile;

use log::{debug, info};

/// Profile expected for the headset.
pub const PREFERRED_PROFILE: &str = "a2dp_sink";

/// Source of the `pacmd list-cards` output.
pub trait CardSource {
    fn list_cards(&self) -> Result<Vec<String>>;
}

pub trait ProfileSwitcher {
    fn set_card_profile(&self, card_index: u32, profile: &str) -> Result<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// The headset is using the preferred profile.
    Keep,

    /// The headset is not connected, or it has no active profile.
    Absent,

    /// The profile of the card was changed.
    Switch { card_index: u32 },
}

/// Decide what to do with the result of a scan.
pub fn decide(profile_line: &str, card_index: u32) -> Action {
    if profile_line.contains(PREFERRED_PROFILE) {
        Action::Keep
    } else if profile_line.is_empty() {
        Action::Absent
    } else {
        Action::Switch { card_index }
    }
}

pub struct Cycle<'a> {
    device: &'a str,
    cards: &'a dyn CardSource,
    switcher: &'a dyn ProfileSwitcher,
}

impl<'a> Cycle<'a> {
    pub fn new(
        device: &'a str,
        cards: &'a dyn CardSource,
        switcher: &'a dyn ProfileSwitcher,
    ) -> Self {
        Cycle {
            device,
            cards,
            switcher,
        }
    }

    pub fn device(&self) -> &str {
        self.device
    }

    pub fn check(&self) -> Result<Action> {
        let lines = self.cards.list_cards()?;
        let (profile_line, card_index) = profile::find_profile(&lines, self.device);

        let action = decide(&profile_line, card_index);
        match action {
            Action::Keep => debug!("Profile found, nothing to do"),

            Action::Absent => debug!("Headset {} is not active, nothing to do", self.device),

            Action::Switch { card_index } => {
                info!(
                    "Headset {} is active, but with wrong profile ({}), will switch card {} to '{}'",
                    self.device,
                    profile_line.trim(),
                    card_index,
                    PREFERRED_PROFILE
                );

                self.switcher
                    .set_card_profile(card_index, PREFERRED_PROFILE)?;
            }
        }

        Ok(action)
    }
}


#[cfg(test)]
mod tests {
    use super::fakes::{Dumps, Recorder};
    use super::*;
    use pretty_assertions::assert_eq;

    const DEVICE: &str = "60_AB_D2_29_7E_F8";

    const HEADSET_HEAD_UNIT: &str = "    index: 4
\tname: <bluez_card.60_AB_D2_29_7E_F8>
\tactive profile: <headset_head_unit>
";

    const A2DP_SINK: &str = "    index: 4
\tname: <bluez_card.60_AB_D2_29_7E_F8>
\tactive profile: <a2dp_sink>
";

    #[test]
    fn decisions() {
        assert_eq!(decide("  active profile: <a2dp_sink>", 5), Action::Keep);
        assert_eq!(decide("", 5), Action::Absent);
        assert_eq!(
            decide("  active profile: <headset_head_unit>", 5),
            Action::Switch { card_index: 5 }
        );
        assert_eq!(
            decide("  active profile: <off>", 0),
            Action::Switch { card_index: 0 }
        );
    }

    #[test]
    fn switch_wrong_profile() {
        let cards = Dumps::new(vec![Some(HEADSET_HEAD_UNIT)]);
        let switcher = Recorder::default();
        let cycle = Cycle::new(DEVICE, &cards, &switcher);

        assert_eq!(cycle.check().unwrap(), Action::Switch { card_index: 4 });
        assert_eq!(
            *switcher.calls.borrow(),
            vec![(4, PREFERRED_PROFILE.to_string())]
        );
    }

    #[test]
    fn keep_preferred_profile() {
        let cards = Dumps::new(vec![Some(A2DP_SINK)]);
        let switcher = Recorder::default();
        let cycle = Cycle::new(DEVICE, &cards, &switcher);

        assert_eq!(cycle.check().unwrap(), Action::Keep);
        assert!(switcher.calls.borrow().is_empty());
    }

    #[test]
    fn headset_not_connected() {
        let cards = Dumps::new(vec![Some("1 card(s) available.\n    index: 0\n")]);
        let switcher = Recorder::default();
        let cycle = Cycle::new(DEVICE, &cards, &switcher);

        assert_eq!(cycle.check().unwrap(), Action::Absent);
        assert!(switcher.calls.borrow().is_empty());
    }

    #[test]
    fn errors_are_propagated() {
        let switcher = Recorder::default();
        let cards = Dumps::new(vec![None]);
        assert!(Cycle::new(DEVICE, &cards, &switcher).check().is_err());

        let failing = Recorder {
            fail: true,
            ..Recorder::default()
        };
        let cards = Dumps::new(vec![Some(HEADSET_HEAD_UNIT)]);
        assert!(Cycle::new(DEVICE, &cards, &failing).check().is_err());
        assert_eq!(failing.calls.borrow().len(), 1);
    }
}
