//! Ship ledger: cargo holds, capacity and credits.

use serde::Serialize;
use thiserror::Error;
use trader_core::Commodity;

/// Units of one commodity aboard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CargoHold {
    pub commodity: Commodity,
    pub quantity: u32,
}

/// Broken ledger invariant.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("cargo total {total} exceeds capacity {capacity}")]
    OverCapacity { total: u64, capacity: u32 },
    #[error("running total {tracked} disagrees with holds sum {actual}")]
    TotalMismatch { tracked: u32, actual: u64 },
    #[error("{commodity} has more than one hold")]
    DuplicateHold { commodity: Commodity },
}

/// The player's ship.
///
/// Quantities and credits are unsigned, so non-negativity holds by
/// construction; the capacity ceiling is enforced by the mutators.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Ship {
    holds: Vec<CargoHold>,
    capacity: u32,
    used: u32,
    credits: u64,
}

impl Ship {
    /// Empty ship with one hold per commodity, in the given order.
    pub fn new(
        commodities: impl IntoIterator<Item = Commodity>,
        capacity: u32,
        credits: u64,
    ) -> Self {
        let holds = commodities
            .into_iter()
            .map(|commodity| CargoHold {
                commodity,
                quantity: 0,
            })
            .collect();
        Self {
            holds,
            capacity,
            used: 0,
            credits,
        }
    }

    /// Ship with preloaded holds, e.g. to resume a scripted scenario.
    pub fn with_cargo(
        holds: Vec<CargoHold>,
        capacity: u32,
        credits: u64,
    ) -> Result<Self, InvariantViolation> {
        for (i, h) in holds.iter().enumerate() {
            if holds[..i].iter().any(|prev| prev.commodity == h.commodity) {
                return Err(InvariantViolation::DuplicateHold {
                    commodity: h.commodity.clone(),
                });
            }
        }
        let total: u64 = holds.iter().map(|h| u64::from(h.quantity)).sum();
        if total > u64::from(capacity) {
            return Err(InvariantViolation::OverCapacity { total, capacity });
        }
        Ok(Self {
            holds,
            capacity,
            used: total as u32,
            credits,
        })
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Sum of all cargo quantities.
    pub fn used(&self) -> u32 {
        self.used
    }

    pub fn free_space(&self) -> u32 {
        self.capacity - self.used
    }

    pub fn credits(&self) -> u64 {
        self.credits
    }

    pub fn holds(&self) -> &[CargoHold] {
        &self.holds
    }

    /// Units of `commodity` aboard; 0 when the ship has no hold for it.
    pub fn quantity(&self, commodity: &Commodity) -> u32 {
        self.hold(commodity).map(|h| h.quantity).unwrap_or(0)
    }

    /// Re-derive the ledger invariants from scratch.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let actual: u64 = self.holds.iter().map(|h| u64::from(h.quantity)).sum();
        if actual != u64::from(self.used) {
            return Err(InvariantViolation::TotalMismatch {
                tracked: self.used,
                actual,
            });
        }
        if actual > u64::from(self.capacity) {
            return Err(InvariantViolation::OverCapacity {
                total: actual,
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    pub(crate) fn add_cargo(&mut self, commodity: &Commodity, qty: u32) -> bool {
        if qty == 0 || qty > self.free_space() {
            return false;
        }
        let Some(hold) = self.hold_mut(commodity) else {
            return false;
        };
        hold.quantity += qty;
        self.used += qty;
        debug_assert_eq!(self.check_invariants(), Ok(()));
        true
    }

    pub(crate) fn remove_cargo(&mut self, commodity: &Commodity, qty: u32) -> bool {
        let Some(hold) = self.hold_mut(commodity) else {
            return false;
        };
        if hold.quantity < qty {
            return false;
        }
        hold.quantity -= qty;
        self.used -= qty;
        debug_assert_eq!(self.check_invariants(), Ok(()));
        true
    }

    pub(crate) fn credit(&mut self, amount: u64) -> bool {
        match self.credits.checked_add(amount) {
            Some(total) => {
                self.credits = total;
                true
            }
            None => false,
        }
    }

    pub(crate) fn debit(&mut self, amount: u64) -> bool {
        if amount > self.credits {
            return false;
        }
        self.credits -= amount;
        true
    }

    fn hold(&self, commodity: &Commodity) -> Option<&CargoHold> {
        self.holds.iter().find(|h| &h.commodity == commodity)
    }

    fn hold_mut(&mut self, commodity: &Commodity) -> Option<&mut CargoHold> {
        self.holds.iter_mut().find(|h| &h.commodity == commodity)
    }
}
