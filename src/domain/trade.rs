//! TradeEvent: one journaled execution for an account.

use crate::domain::{AccountId, Decimal, Side, Symbol};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single trade from the account's journal.
///
/// Immutable input to reconciliation; fees are excluded from cost-basis math.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeEvent {
    /// Monotonically increasing journal identifier; deterministic tie-break
    /// for trades sharing a timestamp.
    pub sequence_id: i64,
    /// Account this trade belongs to.
    pub account_id: AccountId,
    /// Security being traded.
    pub symbol: Symbol,
    /// Display name of the security at trade time.
    pub stock_name: String,
    /// Trade side (Buy or Sell).
    pub side: Side,
    /// Quantity traded; always positive.
    pub quantity: Decimal,
    /// Price per unit; always positive.
    pub price: Decimal,
    /// When the trade occurred; primary chronological ordering key.
    pub occurred_at: DateTime<Utc>,
}

impl TradeEvent {
    /// Create a new TradeEvent.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sequence_id: i64,
        account_id: AccountId,
        symbol: Symbol,
        stock_name: String,
        side: Side,
        quantity: Decimal,
        price: Decimal,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        TradeEvent {
            sequence_id,
            account_id,
            symbol,
            stock_name,
            side,
            quantity,
            price,
            occurred_at,
        }
    }

    /// True if this trade adds to the position.
    pub fn is_buy(&self) -> bool {
        self.side == Side::Buy
    }
}
