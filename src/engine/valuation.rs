//! Market valuation of reconciled holdings.
//!
//! Pure: prices come from the caller; a symbol without a quote is valued at
//! zero rather than failing the whole report.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{Decimal, PositionMap, Symbol};

/// Money figures are presented at two fractional digits.
const MONEY_SCALE: u32 = 2;

/// One holding with market value and profit/loss attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoldingValuation {
    pub symbol: Symbol,
    pub stock_name: String,
    pub quantity: Decimal,
    pub average_cost: Decimal,
    pub current_price: Decimal,
    pub cost_basis: Decimal,
    pub market_value: Decimal,
    pub profit_loss: Decimal,
    pub profit_loss_percent: Decimal,
}

/// Account-level totals across all holdings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortfolioSummary {
    pub total_holdings: usize,
    pub total_cost: Decimal,
    pub total_value: Decimal,
    pub total_profit_loss: Decimal,
    pub total_profit_loss_percent: Decimal,
}

/// Value every holding against the given price table.
pub fn value_positions(
    positions: &PositionMap,
    prices: &HashMap<Symbol, Decimal>,
) -> (Vec<HoldingValuation>, PortfolioSummary) {
    let mut items = Vec::with_capacity(positions.len());
    let mut total_cost = Decimal::zero();
    let mut total_value = Decimal::zero();

    for snapshot in positions.values() {
        let current_price = prices
            .get(&snapshot.symbol)
            .copied()
            .unwrap_or_else(Decimal::zero);

        let cost_basis = snapshot.cost_basis.round_dp(MONEY_SCALE);
        let market_value = (snapshot.quantity * current_price).round_dp(MONEY_SCALE);
        let profit_loss = market_value - cost_basis;
        let profit_loss_percent = percent_of(profit_loss, cost_basis);

        total_cost = total_cost + cost_basis;
        total_value = total_value + market_value;

        items.push(HoldingValuation {
            symbol: snapshot.symbol.clone(),
            stock_name: snapshot.stock_name.clone(),
            quantity: snapshot.quantity,
            average_cost: snapshot.average_cost,
            current_price,
            cost_basis,
            market_value,
            profit_loss,
            profit_loss_percent,
        });
    }

    let total_profit_loss = total_value - total_cost;
    let summary = PortfolioSummary {
        total_holdings: items.len(),
        total_cost,
        total_value,
        total_profit_loss,
        total_profit_loss_percent: percent_of(total_profit_loss, total_cost),
    };

    (items, summary)
}

fn percent_of(part: Decimal, base: Decimal) -> Decimal {
    if base.is_positive() {
        ((part / base) * Decimal::hundred()).round_dp(MONEY_SCALE)
    } else {
        Decimal::zero()
    }
}
