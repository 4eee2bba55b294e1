//! Typed domain records shared across the crate.

pub mod decimal;
pub mod holding;
pub mod ordering;
pub mod primitives;
pub mod trade;

pub use decimal::Decimal;
pub use holding::{PositionMap, PositionSnapshot};
pub use ordering::{sort_trades_chronological, TradeOrderingKey};
pub use primitives::{AccountId, ParseSideError, Side, Symbol};
pub use trade::TradeEvent;
