//! Fixed-rate loop driver and input sources.

use std::collections::VecDeque;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};
use trader_core::InputEvent;

use crate::session::{Session, TickOutcome};

/// Frames per second of the reference loop.
pub const TICK_RATE: u32 = 60;

/// Elapsed time of one frame at [`TICK_RATE`].
pub fn frame_duration() -> Duration {
    Duration::from_secs(1) / TICK_RATE
}

/// Something that yields the input batch for each tick.
pub trait InputSource {
    /// Drain everything that arrived since the last poll, in order.
    fn poll(&mut self) -> Vec<InputEvent>;

    /// True once the source will never produce input again.
    fn is_done(&self) -> bool {
        false
    }
}

/// Pre-recorded input: one batch per tick.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    ticks: VecDeque<Vec<InputEvent>>,
}

impl ScriptedInput {
    pub fn new(ticks: impl IntoIterator<Item = Vec<InputEvent>>) -> Self {
        Self {
            ticks: ticks.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.ticks.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Vec<InputEvent> {
        self.ticks.pop_front().unwrap_or_default()
    }

    fn is_done(&self) -> bool {
        self.ticks.is_empty()
    }
}

/// How a driven run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub quit: bool,
}

/// Tick `session` with input from `source` until it quits, the source runs
/// dry, or `max_ticks` frames have elapsed.
pub fn run_session<S: InputSource>(
    session: &mut Session,
    source: &mut S,
    dt: Duration,
    max_ticks: u64,
) -> RunSummary {
    let mut ticks = 0;
    let mut quit = !session.is_running();
    while !quit && ticks < max_ticks && !source.is_done() {
        let events = source.poll();
        if !events.is_empty() {
            debug!(tick = ticks, ?events, "input");
        }
        quit = session.tick(&events, dt) == TickOutcome::Quit;
        ticks += 1;
    }
    info!(ticks, quit, mode = ?session.mode(), "run finished");
    RunSummary { ticks, quit }
}
