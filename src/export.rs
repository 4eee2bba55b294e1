//! CSV export of holdings and trades.

use std::io;

use serde::Serialize;

use crate::domain::{PositionMap, TradeEvent};

#[derive(Serialize)]
struct HoldingRecord<'a> {
    symbol: &'a str,
    stock_name: &'a str,
    quantity: String,
    average_cost: String,
    cost_basis: String,
    as_of: String,
}

#[derive(Serialize)]
struct TradeRecord<'a> {
    sequence_id: i64,
    account_id: i64,
    symbol: &'a str,
    stock_name: &'a str,
    side: &'a str,
    quantity: String,
    price: String,
    occurred_at: String,
}

/// Write a position map as CSV, one row per symbol, sorted by symbol.
pub fn write_holdings_csv<W: io::Write>(
    writer: W,
    positions: &PositionMap,
) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for snapshot in positions.values() {
        wtr.serialize(HoldingRecord {
            symbol: snapshot.symbol.as_str(),
            stock_name: &snapshot.stock_name,
            quantity: snapshot.quantity.to_canonical_string(),
            average_cost: snapshot.average_cost.to_canonical_string(),
            cost_basis: snapshot.cost_basis.to_canonical_string(),
            as_of: snapshot.as_of.to_rfc3339(),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write a trade list as CSV in the given order.
pub fn write_trades_csv<W: io::Write>(
    writer: W,
    trades: &[TradeEvent],
) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for trade in trades {
        wtr.serialize(TradeRecord {
            sequence_id: trade.sequence_id,
            account_id: trade.account_id.as_i64(),
            symbol: trade.symbol.as_str(),
            stock_name: &trade.stock_name,
            side: trade.side.as_str(),
            quantity: trade.quantity.to_canonical_string(),
            price: trade.price.to_canonical_string(),
            occurred_at: trade.occurred_at.to_rfc3339(),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountId, Decimal, PositionSnapshot, Side, Symbol};
    use chrono::{TimeZone, Utc};

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[test]
    fn test_write_holdings_csv() {
        let mut positions = PositionMap::new();
        positions.insert(
            Symbol::new("AAPL".to_string()),
            PositionSnapshot {
                symbol: Symbol::new("AAPL".to_string()),
                stock_name: "Apple Inc.".to_string(),
                quantity: d("40"),
                average_cost: d("10"),
                cost_basis: d("400"),
                as_of: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            },
        );

        let mut buf = Vec::new();
        write_holdings_csv(&mut buf, &positions).unwrap();
        let out = String::from_utf8(buf).unwrap();

        let mut lines = out.lines();
        assert_eq!(
            lines.next().unwrap(),
            "symbol,stock_name,quantity,average_cost,cost_basis,as_of"
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("AAPL,Apple Inc.,40,10,400,"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_write_trades_csv() {
        let trades = vec![TradeEvent::new(
            3,
            AccountId::new(1),
            Symbol::new("MSFT".to_string()),
            "Microsoft".to_string(),
            Side::Sell,
            d("5"),
            d("300.5"),
            Utc.with_ymd_and_hms(2024, 3, 2, 9, 30, 0).unwrap(),
        )];

        let mut buf = Vec::new();
        write_trades_csv(&mut buf, &trades).unwrap();
        let out = String::from_utf8(buf).unwrap();

        assert!(out.starts_with(
            "sequence_id,account_id,symbol,stock_name,side,quantity,price,occurred_at"
        ));
        assert!(out.contains("3,1,MSFT,Microsoft,sell,5,300.5,"));
    }

    #[test]
    fn test_write_holdings_csv_empty_map_has_header_only() {
        let mut buf = Vec::new();
        write_holdings_csv(&mut buf, &PositionMap::new()).unwrap();
        let out = String::from_utf8(buf).unwrap();
        // csv only emits the header once a record is written; empty export is empty.
        assert!(out.is_empty());
    }
}
