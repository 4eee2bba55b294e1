//! SQLite-backed holding sink.

use std::sync::Arc;

use async_trait::async_trait;

use crate::db::Repository;
use crate::domain::{AccountId, PositionMap};

use super::{HoldingSink, SinkError};

/// Commits position maps to the holdings table via the shared repository.
#[derive(Debug, Clone)]
pub struct SqliteHoldingSink {
    repo: Arc<Repository>,
}

impl SqliteHoldingSink {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl HoldingSink for SqliteHoldingSink {
    async fn replace_account_holdings(
        &self,
        account_id: AccountId,
        positions: &PositionMap,
    ) -> Result<u64, SinkError> {
        Ok(self
            .repo
            .replace_account_holdings(account_id, positions)
            .await?)
    }
}
