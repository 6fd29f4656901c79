//! Screen state machine.

use thiserror::Error;
use trader_core::ScreenMode;

/// Request to change screens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScreenSignal {
    /// Menu selection of a screen.
    Select(ScreenMode),
    /// Leave the current screen (back action, finished travel).
    Exit,
    /// Close request; ends the session.
    Quit,
}

/// Result of a legal transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    pub next: ScreenMode,
    pub ends_session: bool,
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("cannot open {to:?} from {from:?}")]
    IllegalTransition { from: ScreenMode, to: ScreenMode },
}

/// Transition table over every (mode, signal) pair.
///
/// Selections are only honoured from Neutral and only towards a non-Neutral
/// screen. Exit and Quit always land on Neutral; Quit also ends the session.
pub fn transition(current: ScreenMode, signal: ScreenSignal) -> Result<Step, TransitionError> {
    match (current, signal) {
        (ScreenMode::Neutral, ScreenSignal::Select(to)) if !to.is_neutral() => Ok(Step {
            next: to,
            ends_session: false,
        }),
        (from, ScreenSignal::Select(to)) => Err(TransitionError::IllegalTransition { from, to }),
        (_, ScreenSignal::Exit) => Ok(Step {
            next: ScreenMode::Neutral,
            ends_session: false,
        }),
        (_, ScreenSignal::Quit) => Ok(Step {
            next: ScreenMode::Neutral,
            ends_session: true,
        }),
    }
}

/// Holds the current screen and applies [`transition`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScreenMachine {
    mode: ScreenMode,
}

impl ScreenMachine {
    pub fn mode(&self) -> ScreenMode {
        self.mode
    }

    /// Apply `signal`; an illegal one leaves the mode unchanged.
    pub fn apply(&mut self, signal: ScreenSignal) -> Result<Step, TransitionError> {
        let step = transition(self.mode, signal)?;
        self.mode = step.next;
        Ok(step)
    }
}
