//! Holding synchronization: journal → reconcile → sink, per account.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::domain::{AccountId, PositionMap};
use crate::engine::{reconcile, ReconciliationError};
use crate::journal::{JournalError, TradeJournalSource};
use crate::sink::{HoldingSink, SinkError};

/// Recomputes holdings for accounts from their full trade journals.
///
/// Collaborators are injected; the syncer owns no storage of its own.
#[derive(Clone)]
pub struct HoldingSyncer {
    journal: Arc<dyn TradeJournalSource>,
    sink: Arc<dyn HoldingSink>,
}

impl HoldingSyncer {
    pub fn new(journal: Arc<dyn TradeJournalSource>, sink: Arc<dyn HoldingSink>) -> Self {
        Self { journal, sink }
    }

    /// Rebuild one account's holdings from scratch.
    ///
    /// Fetches the complete journal, reconciles it, and commits the result
    /// with replace semantics. Any failure aborts before the sink is
    /// touched, so prior holdings survive a bad run; re-running with the
    /// same journal always reproduces the same holdings.
    pub async fn sync_account(&self, account_id: AccountId) -> Result<SyncReport, SyncError> {
        let run_id = Uuid::new_v4();
        tracing::info!(%account_id, %run_id, "starting holding sync");

        let trades = self.journal.fetch_trades(account_id, None).await?;
        let trades_replayed = trades.len();

        let positions = reconcile(account_id, &trades)?;
        let holdings_written = self
            .sink
            .replace_account_holdings(account_id, &positions)
            .await?;

        tracing::info!(
            %account_id,
            %run_id,
            trades_replayed,
            holdings_written,
            "holding sync complete"
        );

        Ok(SyncReport {
            account_id,
            run_id,
            trades_replayed,
            holdings_written,
            positions,
        })
    }

    /// Sync several accounts concurrently.
    ///
    /// Accounts share no state, so this is the one place parallelism is
    /// expressed; within an account the replay stays sequential.
    pub async fn sync_accounts(
        &self,
        accounts: &[AccountId],
    ) -> Result<Vec<SyncReport>, SyncError> {
        let runs = accounts.iter().map(|&account| self.sync_account(account));
        futures::future::try_join_all(runs).await
    }
}

/// Outcome of one account sync.
#[derive(Debug)]
pub struct SyncReport {
    pub account_id: AccountId,
    pub run_id: Uuid,
    pub trades_replayed: usize,
    pub holdings_written: u64,
    /// The reconciled map as committed to the sink.
    pub positions: PositionMap,
}

/// Error type for a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Journal(#[from] JournalError),
    #[error(transparent)]
    Reconciliation(#[from] ReconciliationError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Decimal, Side, Symbol, TradeEvent};
    use crate::journal::MockTradeJournal;
    use crate::sink::MemoryHoldingSink;
    use chrono::{TimeZone, Utc};

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn trade(
        account: i64,
        symbol: &str,
        side: Side,
        quantity: &str,
        price: &str,
        ts_secs: i64,
        sequence_id: i64,
    ) -> TradeEvent {
        TradeEvent::new(
            sequence_id,
            AccountId::new(account),
            Symbol::new(symbol.to_string()),
            format!("{} Corp", symbol),
            side,
            d(quantity),
            d(price),
            Utc.timestamp_opt(ts_secs, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_sync_account_writes_reconciled_holdings() {
        let journal = Arc::new(MockTradeJournal::new().with_trades(vec![
            trade(1, "AAPL", Side::Buy, "100", "10", 1000, 1),
            trade(1, "AAPL", Side::Sell, "60", "12", 2000, 2),
        ]));
        let sink = Arc::new(MemoryHoldingSink::new());
        let syncer = HoldingSyncer::new(journal, sink.clone());

        let report = syncer.sync_account(AccountId::new(1)).await.unwrap();
        assert_eq!(report.trades_replayed, 2);
        assert_eq!(report.holdings_written, 1);

        let holdings = sink.holdings_for(AccountId::new(1));
        let aapl = &holdings[&Symbol::new("AAPL".to_string())];
        assert_eq!(aapl.quantity, d("40"));
        assert_eq!(aapl.average_cost, d("10"));
        assert_eq!(aapl.cost_basis, d("400"));
    }

    #[tokio::test]
    async fn test_oversell_aborts_before_sink() {
        let journal = Arc::new(MockTradeJournal::new().with_trades(vec![
            trade(1, "AAPL", Side::Buy, "100", "10", 1000, 1),
            trade(1, "AAPL", Side::Sell, "150", "12", 2000, 2),
        ]));
        let sink = Arc::new(MemoryHoldingSink::new());

        // Seed prior state to prove a failed run leaves it alone.
        let good_journal = Arc::new(MockTradeJournal::new().with_trade(trade(
            1, "AAPL", Side::Buy, "5", "10", 500, 1,
        )));
        HoldingSyncer::new(good_journal, sink.clone())
            .sync_account(AccountId::new(1))
            .await
            .unwrap();

        let err = HoldingSyncer::new(journal, sink.clone())
            .sync_account(AccountId::new(1))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SyncError::Reconciliation(ReconciliationError::Oversell { .. })
        ));

        let holdings = sink.holdings_for(AccountId::new(1));
        assert_eq!(holdings[&Symbol::new("AAPL".to_string())].quantity, d("5"));
    }

    #[tokio::test]
    async fn test_resync_is_idempotent() {
        let journal = Arc::new(MockTradeJournal::new().with_trade(trade(
            1, "AAPL", Side::Buy, "10", "100", 1000, 1,
        )));
        let sink = Arc::new(MemoryHoldingSink::new());
        let syncer = HoldingSyncer::new(journal, sink.clone());

        syncer.sync_account(AccountId::new(1)).await.unwrap();
        let first = sink.holdings_for(AccountId::new(1));

        syncer.sync_account(AccountId::new(1)).await.unwrap();
        let second = sink.holdings_for(AccountId::new(1));

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_sync_accounts_covers_each_account() {
        let journal = Arc::new(MockTradeJournal::new().with_trades(vec![
            trade(1, "AAPL", Side::Buy, "10", "100", 1000, 1),
            trade(2, "MSFT", Side::Buy, "5", "300", 1000, 2),
        ]));
        let sink = Arc::new(MemoryHoldingSink::new());
        let syncer = HoldingSyncer::new(journal, sink.clone());

        let reports = syncer
            .sync_accounts(&[AccountId::new(1), AccountId::new(2)])
            .await
            .unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(sink.holdings_for(AccountId::new(1)).len(), 1);
        assert_eq!(sink.holdings_for(AccountId::new(2)).len(), 1);
    }
}
