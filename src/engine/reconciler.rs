//! Account-level reconciliation: group, order, validate, fold, prune.

use std::collections::BTreeMap;

use crate::domain::{
    sort_trades_chronological, AccountId, PositionMap, Side, Symbol, TradeEvent,
};

use super::{InvalidTradeReason, PositionState, ReconciliationError};

/// Recompute the account's holdings from its full trade journal.
///
/// Trades are grouped by symbol and replayed in strict chronological order
/// (`occurred_at` ascending, `sequence_id` as tie-break); the input may
/// arrive in any order. Symbols whose final quantity is zero are pruned from
/// the result. Any validation failure, oversell, or arithmetic overflow
/// aborts the whole run; no partial map is ever returned.
///
/// This function is pure: no I/O, and identical input always reproduces an
/// identical map, which makes caller-side retries safe.
pub fn reconcile(
    account_id: AccountId,
    trades: &[TradeEvent],
) -> Result<PositionMap, ReconciliationError> {
    for trade in trades {
        validate_trade(account_id, trade)?;
    }

    let mut groups: BTreeMap<Symbol, Vec<TradeEvent>> = BTreeMap::new();
    for trade in trades {
        groups
            .entry(trade.symbol.clone())
            .or_default()
            .push(trade.clone());
    }

    let mut positions = PositionMap::new();
    for (symbol, mut group) in groups {
        sort_trades_chronological(&mut group);

        let mut state = PositionState::empty();
        // The display name follows the most recent buy, as the source
        // journal is the only authority on it.
        let mut stock_name = group[0].stock_name.clone();
        for trade in &group {
            state = state.apply(trade)?;
            if trade.side == Side::Buy {
                stock_name = trade.stock_name.clone();
            }
        }

        let as_of = group[group.len() - 1].occurred_at;
        if let Some(snapshot) = state.into_snapshot(symbol.clone(), stock_name, as_of) {
            positions.insert(symbol, snapshot);
        }
    }

    Ok(positions)
}

fn validate_trade(
    account_id: AccountId,
    trade: &TradeEvent,
) -> Result<(), ReconciliationError> {
    let invalid = |reason| ReconciliationError::InvalidTrade {
        sequence_id: trade.sequence_id,
        symbol: trade.symbol.clone(),
        reason,
    };

    if trade.symbol.as_str().is_empty() {
        return Err(invalid(InvalidTradeReason::EmptySymbol));
    }
    if !trade.quantity.is_positive() {
        return Err(invalid(InvalidTradeReason::NonPositiveQuantity));
    }
    if !trade.price.is_positive() {
        return Err(invalid(InvalidTradeReason::NonPositivePrice));
    }
    if trade.account_id != account_id {
        return Err(invalid(InvalidTradeReason::ForeignAccount));
    }
    Ok(())
}
