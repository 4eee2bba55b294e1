//! Repository: row-level access to the trade journal and holdings tables.
//!
//! Rows cross this boundary as raw text; typed conversion happens in the
//! journal/sink layers so that malformed stored data surfaces as an explicit
//! error instead of a panic.

use chrono::Utc;
use sqlx::sqlite::SqlitePool;
use sqlx::Row;

use crate::domain::{AccountId, PositionMap, Symbol, TradeEvent};

/// A raw trade row as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeRow {
    pub trade_id: i64,
    pub account_id: i64,
    pub symbol: String,
    pub stock_name: String,
    pub side: String,
    pub quantity: String,
    pub price: String,
    pub occurred_at: String,
}

/// A raw holding row as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoldingRow {
    pub account_id: i64,
    pub symbol: String,
    pub stock_name: String,
    pub quantity: String,
    pub average_cost: String,
    pub cost_basis: String,
    pub as_of: String,
    pub updated_at: String,
}

/// SQLite-backed storage for trades and holdings.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert trades idempotently, keyed by their journal sequence id.
    ///
    /// Returns the number of newly inserted rows.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_trades_batch(&self, trades: &[TradeEvent]) -> Result<u64, sqlx::Error> {
        if trades.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut inserted = 0u64;

        for trade in trades {
            let result = sqlx::query(
                r#"
                INSERT OR IGNORE INTO trades
                (trade_id, account_id, symbol, stock_name, side, quantity, price, occurred_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(trade.sequence_id)
            .bind(trade.account_id.as_i64())
            .bind(trade.symbol.as_str())
            .bind(&trade.stock_name)
            .bind(trade.side.as_str())
            .bind(trade.quantity.to_canonical_string())
            .bind(trade.price.to_canonical_string())
            .bind(trade.occurred_at.to_rfc3339())
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    /// Fetch one page of an account's live (non-deleted) trades.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn query_trades_page(
        &self,
        account_id: AccountId,
        symbol: Option<&Symbol>,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<TradeRow>, sqlx::Error> {
        let sql = if symbol.is_some() {
            r#"
            SELECT trade_id, account_id, symbol, stock_name, side, quantity, price, occurred_at
            FROM trades
            WHERE account_id = ? AND symbol = ? AND is_deleted = 0
            ORDER BY trade_id ASC
            LIMIT ? OFFSET ?
            "#
        } else {
            r#"
            SELECT trade_id, account_id, symbol, stock_name, side, quantity, price, occurred_at
            FROM trades
            WHERE account_id = ? AND is_deleted = 0
            ORDER BY trade_id ASC
            LIMIT ? OFFSET ?
            "#
        };

        let mut query = sqlx::query(sql).bind(account_id.as_i64());
        if let Some(symbol) = symbol {
            query = query.bind(symbol.as_str());
        }
        query = query.bind(limit).bind(offset as i64);

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows
            .into_iter()
            .map(|row| TradeRow {
                trade_id: row.get::<i64, _>("trade_id"),
                account_id: row.get::<i64, _>("account_id"),
                symbol: row.get::<String, _>("symbol"),
                stock_name: row.get::<String, _>("stock_name"),
                side: row.get::<String, _>("side"),
                quantity: row.get::<String, _>("quantity"),
                price: row.get::<String, _>("price"),
                occurred_at: row.get::<String, _>("occurred_at"),
            })
            .collect())
    }

    /// Replace the account's holdings with the given position map, in one
    /// transaction. Symbols previously held but absent from the map are
    /// removed, so readers never see a mix of old and new rows.
    ///
    /// Returns the number of holdings written.
    ///
    /// # Errors
    /// Returns an error if the transaction fails; nothing is applied.
    pub async fn replace_account_holdings(
        &self,
        account_id: AccountId,
        positions: &PositionMap,
    ) -> Result<u64, sqlx::Error> {
        let updated_at = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM holdings WHERE account_id = ?")
            .bind(account_id.as_i64())
            .execute(&mut *tx)
            .await?;

        let mut written = 0u64;
        for snapshot in positions.values() {
            sqlx::query(
                r#"
                INSERT INTO holdings
                (account_id, symbol, stock_name, quantity, average_cost, cost_basis, as_of, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(account_id.as_i64())
            .bind(snapshot.symbol.as_str())
            .bind(&snapshot.stock_name)
            .bind(snapshot.quantity.to_canonical_string())
            .bind(snapshot.average_cost.to_canonical_string())
            .bind(snapshot.cost_basis.to_canonical_string())
            .bind(snapshot.as_of.to_rfc3339())
            .bind(&updated_at)
            .execute(&mut *tx)
            .await?;
            written += 1;
        }

        tx.commit().await?;
        Ok(written)
    }

    /// Query the account's current holdings, ordered by symbol.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn query_holdings(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<HoldingRow>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT account_id, symbol, stock_name, quantity, average_cost, cost_basis, as_of, updated_at
            FROM holdings
            WHERE account_id = ?
            ORDER BY symbol ASC
            "#,
        )
        .bind(account_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| HoldingRow {
                account_id: row.get::<i64, _>("account_id"),
                symbol: row.get::<String, _>("symbol"),
                stock_name: row.get::<String, _>("stock_name"),
                quantity: row.get::<String, _>("quantity"),
                average_cost: row.get::<String, _>("average_cost"),
                cost_basis: row.get::<String, _>("cost_basis"),
                as_of: row.get::<String, _>("as_of"),
                updated_at: row.get::<String, _>("updated_at"),
            })
            .collect())
    }
}
