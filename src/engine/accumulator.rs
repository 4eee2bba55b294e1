//! Weighted-average-cost fold over a single symbol's trade sequence.

use chrono::{DateTime, Utc};

use crate::domain::{Decimal, PositionSnapshot, Side, Symbol, TradeEvent};

use super::{ReconciliationError, AVG_COST_SCALE};

/// Running state of a position while replaying one symbol's trades.
///
/// Invariants: `quantity >= 0`, `cost_basis >= 0`, and `cost_basis == 0`
/// whenever `quantity == 0`. Average cost is derived, never stored, so
/// rounding error cannot compound across trades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PositionState {
    quantity: Decimal,
    cost_basis: Decimal,
}

impl PositionState {
    /// The empty (flat) state every symbol's replay starts from.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Net held quantity.
    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    /// Total cost attributed to the held quantity, unrounded.
    pub fn cost_basis(&self) -> Decimal {
        self.cost_basis
    }

    /// True if nothing is held.
    pub fn is_flat(&self) -> bool {
        self.quantity.is_zero()
    }

    /// Cost per unit; None when flat (undefined).
    pub fn average_cost(&self) -> Option<Decimal> {
        if self.is_flat() {
            None
        } else {
            self.cost_basis.checked_div(self.quantity)
        }
    }

    /// Fold one trade onto this state, producing the next state.
    ///
    /// Buys add quantity and notional cost. Sells reduce quantity at an
    /// unchanged average cost: the cost basis is scaled to the remaining
    /// quantity, and a full close zeroes it. A sell exceeding the held
    /// quantity is a ledger inconsistency and fails the fold.
    pub fn apply(self, trade: &TradeEvent) -> Result<PositionState, ReconciliationError> {
        let overflow = || ReconciliationError::Overflow {
            symbol: trade.symbol.clone(),
            sequence_id: trade.sequence_id,
        };

        match trade.side {
            Side::Buy => {
                let notional = trade
                    .price
                    .checked_mul(trade.quantity)
                    .ok_or_else(overflow)?;
                let quantity = self
                    .quantity
                    .checked_add(trade.quantity)
                    .ok_or_else(overflow)?;
                let cost_basis = self.cost_basis.checked_add(notional).ok_or_else(overflow)?;
                Ok(PositionState {
                    quantity,
                    cost_basis,
                })
            }
            Side::Sell => {
                let remaining = self
                    .quantity
                    .checked_sub(trade.quantity)
                    .ok_or_else(overflow)?;
                if remaining.is_negative() {
                    return Err(ReconciliationError::Oversell {
                        symbol: trade.symbol.clone(),
                        sequence_id: trade.sequence_id,
                        sell_quantity: trade.quantity,
                        held_quantity: self.quantity,
                    });
                }
                if remaining.is_zero() {
                    return Ok(PositionState::empty());
                }
                // self.quantity > 0 here since remaining > 0 and the sell
                // quantity is positive; average cost survives the sell.
                let average_cost = self
                    .cost_basis
                    .checked_div(self.quantity)
                    .ok_or_else(overflow)?;
                let cost_basis = average_cost.checked_mul(remaining).ok_or_else(overflow)?;
                Ok(PositionState {
                    quantity: remaining,
                    cost_basis,
                })
            }
        }
    }

    /// Materialize the final snapshot, or None if the position is closed.
    ///
    /// Average cost is rounded here and only here.
    pub fn into_snapshot(
        self,
        symbol: Symbol,
        stock_name: String,
        as_of: DateTime<Utc>,
    ) -> Option<PositionSnapshot> {
        let average_cost = self.average_cost()?.round_dp(AVG_COST_SCALE);
        Some(PositionSnapshot {
            symbol,
            stock_name,
            quantity: self.quantity,
            average_cost,
            cost_basis: self.cost_basis,
            as_of,
        })
    }
}
