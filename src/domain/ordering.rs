//! Stable trade ordering for deterministic replay.

use crate::domain::TradeEvent;
use chrono::{DateTime, Utc};

/// Stable ordering key for trades.
///
/// Replay order is a correctness requirement, not a presentation choice:
/// average cost is order-sensitive when buys and sells interleave.
/// Ordering: occurred_at -> sequence_id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TradeOrderingKey {
    /// Trade timestamp (primary sort).
    pub occurred_at: DateTime<Utc>,
    /// Journal sequence id (tie-break for identical timestamps).
    pub sequence_id: i64,
}

impl TradeOrderingKey {
    /// Create an ordering key from a TradeEvent.
    pub fn from_trade(trade: &TradeEvent) -> Self {
        TradeOrderingKey {
            occurred_at: trade.occurred_at,
            sequence_id: trade.sequence_id,
        }
    }

    /// Compare two trades for deterministic ordering.
    ///
    /// Returns true if trade_a should be replayed before trade_b.
    pub fn should_come_before(trade_a: &TradeEvent, trade_b: &TradeEvent) -> bool {
        Self::from_trade(trade_a) < Self::from_trade(trade_b)
    }
}

/// Sort trades chronologically, sequence id ascending on timestamp ties.
pub fn sort_trades_chronological(trades: &mut [TradeEvent]) {
    trades.sort_by_key(TradeOrderingKey::from_trade);
}
