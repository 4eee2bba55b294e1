pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod export;
pub mod journal;
pub mod orchestration;
pub mod sink;

pub use config::Config;
pub use db::{init_db, Repository};
pub use domain::{
    AccountId, Decimal, PositionMap, PositionSnapshot, Side, Symbol, TradeEvent,
};
pub use engine::{reconcile, PositionState, ReconciliationError};
pub use journal::{JournalError, MockTradeJournal, SqliteTradeJournal, TradeJournalSource};
pub use orchestration::{HoldingSyncer, SyncError, SyncReport};
pub use sink::{HoldingSink, MemoryHoldingSink, SinkError, SqliteHoldingSink};
