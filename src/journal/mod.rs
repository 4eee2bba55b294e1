//! Trade journal access: the read-only source reconciliation replays from.

use crate::domain::{AccountId, Symbol, TradeEvent};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub mod mock;
pub mod sqlite;

pub use mock::MockTradeJournal;
pub use sqlite::SqliteTradeJournal;

/// Source of the complete trade journal for an account.
///
/// Implementations are not required to return trades in any particular
/// order; the reconciliation engine sorts each symbol group itself.
#[async_trait]
pub trait TradeJournalSource: Send + Sync + fmt::Debug {
    /// Fetch every live trade for the account, optionally narrowed to one
    /// symbol.
    async fn fetch_trades(
        &self,
        account_id: AccountId,
        symbol: Option<&Symbol>,
    ) -> Result<Vec<TradeEvent>, JournalError>;
}

/// Error type for journal operations.
#[derive(Debug, Error)]
pub enum JournalError {
    /// Underlying storage failed.
    #[error("journal storage error: {0}")]
    Storage(#[from] sqlx::Error),
    /// A stored trade row could not be converted to a typed TradeEvent.
    #[error("malformed trade record {sequence_id}: {reason}")]
    MalformedRecord { sequence_id: i64, reason: String },
}
