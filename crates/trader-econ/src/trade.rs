//! Trade desk: buy/sell validation against the active port's prices.
//!
//! A single price per commodity is used in both directions; selling at a port
//! pays exactly what buying would cost there.

use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use trader_core::{
    Button, ButtonState, Commodity, InputEdgeState, Location, Position, Rect, StatusKind,
    StatusMessage, TradeTableLayout,
};

use crate::ship::Ship;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TradeSide {
    Buy,
    Sell,
}

/// A completed one-unit trade.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Trade {
    pub side: TradeSide,
    pub commodity: Commodity,
    pub price: u32,
}

impl Trade {
    pub fn message(&self) -> String {
        match self.side {
            TradeSide::Buy => format!("Bought {}!", self.commodity),
            TradeSide::Sell => format!("Sold {} for {}c!", self.commodity, self.price),
        }
    }
}

/// Why a trade was refused. Refusals never change the ship.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TradeRejection {
    #[error("Not enough Credits")]
    InsufficientFunds { price: u32, credits: u64 },
    #[error("Cargo full!")]
    CargoFull { capacity: u32 },
    #[error("Not enough stock to sell!")]
    NoStock { commodity: Commodity },
    #[error("{commodity} is not traded here")]
    NotTraded { commodity: Commodity },
    /// A ledger primitive failed after the guards passed; the trade was rolled back.
    #[error("Trade of {commodity} aborted")]
    Aborted { commodity: Commodity },
}

impl TradeRejection {
    pub fn kind(&self) -> StatusKind {
        match self {
            TradeRejection::InsufficientFunds { .. } => StatusKind::InsufficientFunds,
            TradeRejection::CargoFull { .. } => StatusKind::CargoFull,
            TradeRejection::NoStock { .. } => StatusKind::NoStock,
            TradeRejection::NotTraded { .. } => StatusKind::NotTraded,
            TradeRejection::Aborted { .. } => StatusKind::Aborted,
        }
    }
}

/// Buy one unit of `commodity` at `location`.
pub fn buy(
    ship: &mut Ship,
    location: &Location,
    commodity: &Commodity,
) -> Result<Trade, TradeRejection> {
    let price = location
        .prices
        .price_of(commodity)
        .ok_or_else(|| TradeRejection::NotTraded {
            commodity: commodity.clone(),
        })?;
    if ship.used() >= ship.capacity() {
        return Err(TradeRejection::CargoFull {
            capacity: ship.capacity(),
        });
    }
    if u64::from(price) > ship.credits() {
        return Err(TradeRejection::InsufficientFunds {
            price,
            credits: ship.credits(),
        });
    }
    if !ship.debit(u64::from(price)) {
        warn!(%commodity, price, "debit failed after guards passed");
        return Err(TradeRejection::Aborted {
            commodity: commodity.clone(),
        });
    }
    if !ship.add_cargo(commodity, 1) {
        // refund; crediting back what was just debited cannot overflow
        ship.credit(u64::from(price));
        warn!(%commodity, price, "cargo add failed after guards passed");
        return Err(TradeRejection::Aborted {
            commodity: commodity.clone(),
        });
    }
    Ok(Trade {
        side: TradeSide::Buy,
        commodity: commodity.clone(),
        price,
    })
}

/// Sell one unit of `commodity` at `location`.
pub fn sell(
    ship: &mut Ship,
    location: &Location,
    commodity: &Commodity,
) -> Result<Trade, TradeRejection> {
    let price = location
        .prices
        .price_of(commodity)
        .ok_or_else(|| TradeRejection::NotTraded {
            commodity: commodity.clone(),
        })?;
    if ship.quantity(commodity) == 0 {
        return Err(TradeRejection::NoStock {
            commodity: commodity.clone(),
        });
    }
    if !ship.remove_cargo(commodity, 1) {
        return Err(TradeRejection::Aborted {
            commodity: commodity.clone(),
        });
    }
    if !ship.credit(u64::from(price)) {
        // the unit just removed always fits back in its hold
        let restored = ship.add_cargo(commodity, 1);
        debug_assert!(restored);
        warn!(%commodity, price, "credit overflow, sale rolled back");
        return Err(TradeRejection::Aborted {
            commodity: commodity.clone(),
        });
    }
    Ok(Trade {
        side: TradeSide::Sell,
        commodity: commodity.clone(),
        price,
    })
}

/// Status message for a trade outcome.
pub fn status_for(result: &Result<Trade, TradeRejection>, duration: Duration) -> StatusMessage {
    match result {
        Ok(trade) => {
            let kind = match trade.side {
                TradeSide::Buy => StatusKind::Bought,
                TradeSide::Sell => StatusKind::Sold,
            };
            StatusMessage::new(kind, trade.message(), duration)
        }
        Err(rejection) => StatusMessage::new(rejection.kind(), rejection.to_string(), duration),
    }
}

#[derive(Clone, Debug)]
struct TradeRow {
    commodity: Commodity,
    rect: Rect,
    edge: InputEdgeState,
}

/// Clickable trade table for the port being visited.
///
/// Each row keeps its own edge latch. Any button press sets every latch, so a
/// trade fires only on the row under the pointer at the moment of the press,
/// and dragging a held button onto another row does nothing. Latches clear when
/// all buttons are up.
#[derive(Clone, Debug, Default)]
pub struct TradeDesk {
    layout: TradeTableLayout,
    rows: Vec<TradeRow>,
}

impl TradeDesk {
    pub fn new(layout: TradeTableLayout) -> Self {
        Self {
            layout,
            rows: Vec::new(),
        }
    }

    /// Lay out one row per commodity priced at `location`.
    ///
    /// Latches start held when a button is already down, so a click carried
    /// over from the menu does not trade.
    pub fn open(&mut self, location: &Location, buttons: ButtonState) {
        self.rows = location
            .prices
            .entries()
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let mut edge = InputEdgeState::default();
                edge.arm(buttons.any_down());
                TradeRow {
                    commodity: entry.commodity.clone(),
                    rect: self.layout.row_rect(i),
                    edge,
                }
            })
            .collect();
    }

    pub fn close(&mut self) {
        self.rows.clear();
    }

    /// Row hit boxes in display order.
    pub fn rows(&self) -> impl Iterator<Item = (&Commodity, Rect)> + '_ {
        self.rows.iter().map(|r| (&r.commodity, r.rect))
    }

    /// Index of the row under `pointer`.
    pub fn hovered_row(&self, pointer: Position) -> Option<usize> {
        self.rows.iter().position(|r| r.rect.contains(pointer))
    }

    /// Handle a press of `button` at `pointer`: primary buys, secondary sells.
    ///
    /// Returns `None` when no row saw a fresh edge under the pointer.
    pub fn press(
        &mut self,
        button: Button,
        pointer: Position,
        ship: &mut Ship,
        location: &Location,
    ) -> Option<Result<Trade, TradeRejection>> {
        let mut fired: Option<Commodity> = None;
        for row in &mut self.rows {
            let edge = row.edge.press();
            if edge && fired.is_none() && row.rect.contains(pointer) {
                fired = Some(row.commodity.clone());
            }
        }
        let commodity = fired?;
        let result = match button {
            Button::Primary => buy(ship, location, &commodity),
            Button::Secondary => sell(ship, location, &commodity),
        };
        match &result {
            Ok(trade) => debug!(
                side = ?trade.side,
                commodity = %trade.commodity,
                price = trade.price,
                credits = ship.credits(),
                "trade"
            ),
            Err(rejection) => debug!(%commodity, %rejection, "trade rejected"),
        }
        Some(result)
    }

    /// All buttons are up: re-arm every row.
    pub fn release_all(&mut self) {
        for row in &mut self.rows {
            row.edge.release();
        }
    }

    #[cfg(test)]
    fn latches_held(&self) -> Vec<bool> {
        self.rows.iter().map(|r| r.edge.is_held()).collect()
    }
}
