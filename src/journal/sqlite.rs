//! SQLite-backed trade journal.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::db::{Repository, TradeRow};
use crate::domain::{AccountId, Decimal, Side, Symbol, TradeEvent};

use super::{JournalError, TradeJournalSource};

/// Reads the full trade journal from the trades table, page by page.
///
/// Soft-deleted rows are excluded at the query level; stored text is
/// converted to typed records here, at the I/O boundary.
#[derive(Debug, Clone)]
pub struct SqliteTradeJournal {
    repo: Arc<Repository>,
    page_size: u32,
}

impl SqliteTradeJournal {
    pub fn new(repo: Arc<Repository>, page_size: u32) -> Self {
        Self { repo, page_size }
    }
}

#[async_trait]
impl TradeJournalSource for SqliteTradeJournal {
    async fn fetch_trades(
        &self,
        account_id: AccountId,
        symbol: Option<&Symbol>,
    ) -> Result<Vec<TradeEvent>, JournalError> {
        let mut trades = Vec::new();
        let mut offset = 0u64;

        loop {
            let rows = self
                .repo
                .query_trades_page(account_id, symbol, self.page_size, offset)
                .await?;
            let fetched = rows.len();

            for row in rows {
                trades.push(trade_from_row(row)?);
            }

            if fetched < self.page_size as usize {
                break;
            }
            offset += fetched as u64;
        }

        Ok(trades)
    }
}

fn trade_from_row(row: TradeRow) -> Result<TradeEvent, JournalError> {
    let malformed = |reason: String| JournalError::MalformedRecord {
        sequence_id: row.trade_id,
        reason,
    };

    let side = Side::from_str(&row.side).map_err(|e| malformed(e.to_string()))?;
    let quantity = Decimal::from_str_canonical(&row.quantity)
        .map_err(|e| malformed(format!("bad quantity {:?}: {}", row.quantity, e)))?;
    let price = Decimal::from_str_canonical(&row.price)
        .map_err(|e| malformed(format!("bad price {:?}: {}", row.price, e)))?;
    let occurred_at = DateTime::parse_from_rfc3339(&row.occurred_at)
        .map_err(|e| malformed(format!("bad timestamp {:?}: {}", row.occurred_at, e)))?
        .with_timezone(&Utc);

    Ok(TradeEvent {
        sequence_id: row.trade_id,
        account_id: AccountId::new(row.account_id),
        symbol: Symbol::new(row.symbol.clone()),
        stock_name: row.stock_name.clone(),
        side,
        quantity,
        price,
        occurred_at,
    })
}
