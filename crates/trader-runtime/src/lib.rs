#![deny(warnings)]

//! Session runtime for Space Trader: screen state machine, star map
//! navigation and the per-frame session loop.

pub mod driver;
pub mod nav;
pub mod screen;
pub mod session;

pub use driver::{frame_duration, run_session, InputSource, RunSummary, ScriptedInput, TICK_RATE};
pub use nav::{HoverView, Navigator, Starmap, Travel};
pub use screen::{transition, ScreenMachine, ScreenSignal, Step, TransitionError};
pub use session::{
    Analytics, Session, SessionError, SessionSnapshot, StatusView, TickOutcome, TravelNotice,
};
