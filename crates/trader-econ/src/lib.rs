#![deny(warnings)]

//! Economy engine for Space Trader.
//!
//! This crate provides:
//! - The ship ledger (cargo holds, capacity, credits) and its mutation primitives
//! - Seeded market generation from port templates
//! - The trade desk: buy/sell validation with edge-triggered row input
//!
//! Ship mutators are crate-private; outside this crate the ledger can only be
//! changed through [`trade::buy`], [`trade::sell`] and [`TradeDesk::press`].

pub mod market;
pub mod ship;
pub mod trade;

pub use market::{choose_start, generate_locations, seeded_rng};
pub use ship::{CargoHold, InvariantViolation, Ship};
pub use trade::{buy, sell, status_for, Trade, TradeDesk, TradeRejection, TradeSide};
