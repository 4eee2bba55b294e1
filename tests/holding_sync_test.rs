use std::sync::Arc;

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use folio_recon::journal::SqliteTradeJournal;
use folio_recon::sink::SqliteHoldingSink;
use folio_recon::{
    init_db, AccountId, Decimal, HoldingSyncer, ReconciliationError, Repository, Side, SyncError,
    Symbol, TradeEvent,
};

fn d(s: &str) -> Decimal {
    Decimal::from_str_canonical(s).unwrap()
}

fn trade(
    sequence_id: i64,
    account: i64,
    symbol: &str,
    side: Side,
    quantity: &str,
    price: &str,
    ts_secs: i64,
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

async fn setup() -> (Arc<Repository>, HoldingSyncer, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();
    let pool = init_db(&db_path).await.expect("init_db failed");
    let repo = Arc::new(Repository::new(pool));

    let journal = Arc::new(SqliteTradeJournal::new(repo.clone(), 2));
    let sink = Arc::new(SqliteHoldingSink::new(repo.clone()));
    let syncer = HoldingSyncer::new(journal, sink);

    (repo, syncer, temp_dir)
}

#[tokio::test]
async fn test_sync_writes_holdings_from_stored_journal() {
    let (repo, syncer, _temp) = setup().await;
    let account = AccountId::new(1);

    repo.insert_trades_batch(&[
        trade(1, 1, "AAPL", Side::Buy, "100", "10", 1000),
        trade(2, 1, "AAPL", Side::Sell, "60", "15", 2000),
        trade(3, 1, "MSFT", Side::Buy, "5", "300", 3000),
    ])
    .await
    .unwrap();

    let report = syncer.sync_account(account).await.unwrap();
    assert_eq!(report.trades_replayed, 3);
    assert_eq!(report.holdings_written, 2);

    let rows = repo.query_holdings(account).await.unwrap();
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].symbol, "AAPL");
    assert_eq!(rows[0].quantity, "40");
    assert_eq!(rows[0].average_cost, "10");
    assert_eq!(rows[0].cost_basis, "400");

    assert_eq!(rows[1].symbol, "MSFT");
    assert_eq!(rows[1].quantity, "5");
    assert_eq!(rows[1].cost_basis, "1500");
}

#[tokio::test]
async fn test_resync_is_idempotent() {
    let (repo, syncer, _temp) = setup().await;
    let account = AccountId::new(1);

    repo.insert_trades_batch(&[
        trade(1, 1, "AAPL", Side::Buy, "100", "10", 1000),
        trade(2, 1, "AAPL", Side::Sell, "60", "15", 2000),
    ])
    .await
    .unwrap();

    syncer.sync_account(account).await.unwrap();
    let first = repo.query_holdings(account).await.unwrap();

    syncer.sync_account(account).await.unwrap();
    let second = repo.query_holdings(account).await.unwrap();

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.symbol, b.symbol);
        assert_eq!(a.quantity, b.quantity);
        assert_eq!(a.average_cost, b.average_cost);
        assert_eq!(a.cost_basis, b.cost_basis);
        assert_eq!(a.as_of, b.as_of);
    }
}

#[tokio::test]
async fn test_resync_removes_newly_closed_symbol() {
    let (repo, syncer, _temp) = setup().await;
    let account = AccountId::new(1);

    repo.insert_trades_batch(&[trade(1, 1, "AAPL", Side::Buy, "100", "10", 1000)])
        .await
        .unwrap();
    syncer.sync_account(account).await.unwrap();
    assert_eq!(repo.query_holdings(account).await.unwrap().len(), 1);

    // The position is closed by a later journal entry; the next sync must
    // drop the row rather than leave a zero-quantity holding behind.
    repo.insert_trades_batch(&[trade(2, 1, "AAPL", Side::Sell, "100", "12", 2000)])
        .await
        .unwrap();
    syncer.sync_account(account).await.unwrap();
    assert!(repo.query_holdings(account).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_oversell_aborts_and_preserves_prior_holdings() {
    let (repo, syncer, _temp) = setup().await;
    let account = AccountId::new(1);

    repo.insert_trades_batch(&[trade(1, 1, "AAPL", Side::Buy, "10", "10", 1000)])
        .await
        .unwrap();
    syncer.sync_account(account).await.unwrap();

    repo.insert_trades_batch(&[trade(2, 1, "AAPL", Side::Sell, "25", "12", 2000)])
        .await
        .unwrap();

    let err = syncer.sync_account(account).await.unwrap_err();
    assert!(matches!(
        err,
        SyncError::Reconciliation(ReconciliationError::Oversell { .. })
    ));

    let rows = repo.query_holdings(account).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].quantity, "10");
}

#[tokio::test]
async fn test_journal_paging_replays_every_trade() {
    // Page size is 2 in setup(); five trades force three pages.
    let (repo, syncer, _temp) = setup().await;
    let account = AccountId::new(1);

    let trades: Vec<_> = (1..=5)
        .map(|i| trade(i, 1, "AAPL", Side::Buy, "10", "10", i * 60))
        .collect();
    repo.insert_trades_batch(&trades).await.unwrap();

    let report = syncer.sync_account(account).await.unwrap();
    assert_eq!(report.trades_replayed, 5);

    let rows = repo.query_holdings(account).await.unwrap();
    assert_eq!(rows[0].quantity, "50");
    assert_eq!(rows[0].cost_basis, "500");
}

#[tokio::test]
async fn test_sync_accounts_isolates_accounts() {
    let (repo, syncer, _temp) = setup().await;

    repo.insert_trades_batch(&[
        trade(1, 1, "AAPL", Side::Buy, "10", "100", 1000),
        trade(2, 2, "MSFT", Side::Buy, "5", "300", 1000),
    ])
    .await
    .unwrap();

    let reports = syncer
        .sync_accounts(&[AccountId::new(1), AccountId::new(2)])
        .await
        .unwrap();
    assert_eq!(reports.len(), 2);

    let first = repo.query_holdings(AccountId::new(1)).await.unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].symbol, "AAPL");

    let second = repo.query_holdings(AccountId::new(2)).await.unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].symbol, "MSFT");
}
