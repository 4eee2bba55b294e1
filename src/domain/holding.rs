//! PositionSnapshot: the reconciled holding for one symbol.

use crate::domain::{Decimal, Symbol};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reconciled holdings for one account, keyed by symbol.
///
/// A symbol whose position is fully closed is absent from the map.
pub type PositionMap = BTreeMap<Symbol, PositionSnapshot>;

/// Final position for one symbol after replaying the full trade journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSnapshot {
    /// Security symbol.
    pub symbol: Symbol,
    /// Display name carried from the most recent buy.
    pub stock_name: String,
    /// Net held quantity; always positive (closed positions are not emitted).
    pub quantity: Decimal,
    /// Weighted-average cost per unit, rounded only at materialization.
    pub average_cost: Decimal,
    /// Total capital attributed to the held quantity, unrounded.
    pub cost_basis: Decimal,
    /// Timestamp of the last trade folded into this position.
    pub as_of: DateTime<Utc>,
}
