//! In-memory holding sink for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{AccountId, PositionMap};

use super::{HoldingSink, SinkError};

/// Holding sink that keeps everything in memory, for exercising the sync
/// flow without a database.
#[derive(Debug, Default)]
pub struct MemoryHoldingSink {
    holdings: Mutex<HashMap<AccountId, PositionMap>>,
}

impl MemoryHoldingSink {
    /// Create an empty in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current holdings for an account; empty map if never synced.
    pub fn holdings_for(&self, account_id: AccountId) -> PositionMap {
        self.holdings
            .lock()
            .expect("holding sink mutex poisoned")
            .get(&account_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl HoldingSink for MemoryHoldingSink {
    async fn replace_account_holdings(
        &self,
        account_id: AccountId,
        positions: &PositionMap,
    ) -> Result<u64, SinkError> {
        let mut holdings = self
            .holdings
            .lock()
            .expect("holding sink mutex poisoned");
        holdings.insert(account_id, positions.clone());
        Ok(positions.len() as u64)
    }
}
