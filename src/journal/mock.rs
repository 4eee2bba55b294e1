//! Mock trade journal for testing without storage.

use async_trait::async_trait;

use crate::domain::{AccountId, Symbol, TradeEvent};

use super::{JournalError, TradeJournalSource};

/// Mock journal that serves predefined trades.
#[derive(Debug, Clone, Default)]
pub struct MockTradeJournal {
    trades: Vec<TradeEvent>,
}

impl MockTradeJournal {
    /// Create a new mock journal with no trades.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a trade to the mock journal.
    pub fn with_trade(mut self, trade: TradeEvent) -> Self {
        self.trades.push(trade);
        self
    }

    /// Add multiple trades to the mock journal.
    pub fn with_trades(mut self, trades: Vec<TradeEvent>) -> Self {
        self.trades.extend(trades);
        self
    }
}

#[async_trait]
impl TradeJournalSource for MockTradeJournal {
    async fn fetch_trades(
        &self,
        account_id: AccountId,
        symbol: Option<&Symbol>,
    ) -> Result<Vec<TradeEvent>, JournalError> {
        Ok(self
            .trades
            .iter()
            .filter(|t| {
                t.account_id == account_id && symbol.map_or(true, |s| &t.symbol == s)
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Decimal, Side};
    use chrono::{TimeZone, Utc};

    fn make_trade(account: i64, symbol: &str) -> TradeEvent {
        TradeEvent::new(
            1,
            AccountId::new(account),
            Symbol::new(symbol.to_string()),
            format!("{} Corp", symbol),
            Side::Buy,
            Decimal::from_str_canonical("10").unwrap(),
            Decimal::from_str_canonical("100").unwrap(),
            Utc.timestamp_opt(1000, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_mock_journal_filters_by_account() {
        let journal = MockTradeJournal::new()
            .with_trade(make_trade(1, "AAPL"))
            .with_trade(make_trade(2, "AAPL"));

        let trades = journal.fetch_trades(AccountId::new(1), None).await.unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].account_id, AccountId::new(1));
    }

    #[tokio::test]
    async fn test_mock_journal_filters_by_symbol() {
        let journal = MockTradeJournal::new()
            .with_trades(vec![make_trade(1, "AAPL"), make_trade(1, "MSFT")]);

        let msft = Symbol::new("MSFT".to_string());
        let trades = journal
            .fetch_trades(AccountId::new(1), Some(&msft))
            .await
            .unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].symbol, msft);
    }
}
