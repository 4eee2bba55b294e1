//! Holding sink: where reconciled positions are committed.

use crate::domain::{AccountId, PositionMap};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryHoldingSink;
pub use sqlite::SqliteHoldingSink;

/// Destination for a reconciled position map.
///
/// The map is authoritative and complete for the account: implementations
/// must apply it with replace semantics in a single transaction, removing any
/// symbol previously held but absent from the map.
#[async_trait]
pub trait HoldingSink: Send + Sync + fmt::Debug {
    /// Atomically replace the account's holdings.
    ///
    /// Returns the number of holdings written.
    async fn replace_account_holdings(
        &self,
        account_id: AccountId,
        positions: &PositionMap,
    ) -> Result<u64, SinkError>;
}

/// Error type for sink operations.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Underlying storage failed; nothing was applied.
    #[error("holding storage error: {0}")]
    Storage(#[from] sqlx::Error),
}
