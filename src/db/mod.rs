//! SQLite storage: initialization, migrations, and row-level access.

pub mod migrations;
pub mod repo;

pub use migrations::init_db;
pub use repo::{HoldingRow, Repository, TradeRow};
