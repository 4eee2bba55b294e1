//! Pure computation engine for deterministic ledger replay.
//!
//! Nothing in this module performs I/O; reconciliation is a pure fold from a
//! trade list to a position map, so re-running it with the same input always
//! reproduces the same output.

use crate::domain::{Decimal, Symbol};
use thiserror::Error;

pub mod accumulator;
pub mod reconciler;
pub mod valuation;

pub use accumulator::PositionState;
pub use reconciler::reconcile;
pub use valuation::{value_positions, HoldingValuation, PortfolioSummary};

/// Fractional digits applied to average cost when a snapshot is materialized.
/// Intermediate cost basis is never rounded.
pub const AVG_COST_SCALE: u32 = 8;

/// Why a trade record failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidTradeReason {
    /// Quantity must be strictly positive.
    NonPositiveQuantity,
    /// Price must be strictly positive.
    NonPositivePrice,
    /// Symbol must be non-empty.
    EmptySymbol,
    /// Trade belongs to a different account than the one being reconciled.
    ForeignAccount,
}

impl std::fmt::Display for InvalidTradeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidTradeReason::NonPositiveQuantity => write!(f, "quantity must be positive"),
            InvalidTradeReason::NonPositivePrice => write!(f, "price must be positive"),
            InvalidTradeReason::EmptySymbol => write!(f, "symbol must be non-empty"),
            InvalidTradeReason::ForeignAccount => {
                write!(f, "trade belongs to a different account")
            }
        }
    }
}

/// Errors that abort an entire reconciliation run.
///
/// A run either produces a complete position map or nothing; partial output
/// would leave holdings invisibly stale for the failing symbol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconciliationError {
    /// A trade record violates basic invariants.
    #[error("invalid trade {sequence_id} ({symbol}): {reason}")]
    InvalidTrade {
        sequence_id: i64,
        symbol: Symbol,
        reason: InvalidTradeReason,
    },

    /// A sell would drive the held quantity negative: the journal itself is
    /// inconsistent and needs investigation, not an automatic retry.
    #[error(
        "oversell on {symbol}: trade {sequence_id} sells {sell_quantity} \
         but only {held_quantity} held"
    )]
    Oversell {
        symbol: Symbol,
        sequence_id: i64,
        sell_quantity: Decimal,
        held_quantity: Decimal,
    },

    /// Decimal arithmetic overflowed while folding a trade.
    #[error("arithmetic overflow while folding trade {sequence_id} ({symbol})")]
    Overflow { symbol: Symbol, sequence_id: i64 },
}
