use std::time::Duration;

use moka::future::Cache;

use crate::types::{EarningsEvent, StockData};

const QUOTE_TTL_SECS: u64 = 65;
const CALENDAR_TTL_SECS: u64 = 6 * 60 * 60;

/// In-process TTL caches for read-mostly responses. Quotes go stale after
/// about a minute; calendar ranges only move when companies reschedule, so
/// they keep for hours.
pub struct StockCache {
    quotes: Cache<String, StockData>,
    calendar: Cache<String, Vec<EarningsEvent>>,
}

impl StockCache {
    pub fn new() -> Self {
        let quotes = Cache::builder()
            .time_to_live(Duration::from_secs(QUOTE_TTL_SECS))
            .build();

        let calendar = Cache::builder()
            .time_to_live(Duration::from_secs(CALENDAR_TTL_SECS))
            .build();

        Self { quotes, calendar }
    }

    pub async fn get_quote(&self, symbol: &str) -> Option<StockData> {
        self.quotes.get(symbol).await
    }

    pub async fn set_quote(&self, symbol: String, quote: StockData) {
        self.quotes.insert(symbol, quote).await;
    }

    pub async fn get_calendar(&self, start: &str, end: &str) -> Option<Vec<EarningsEvent>> {
        self.calendar.get(&format!("{}:{}", start, end)).await
    }

    pub async fn set_calendar(&self, start: &str, end: &str, events: Vec<EarningsEvent>) {
        self.calendar.insert(format!("{}:{}", start, end), events).await;
    }
}

impl Default for StockCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(symbol: &str) -> StockData {
        StockData {
            symbol: symbol.to_string(),
            price: 185.2,
            change: 1.3,
            change_percent: 0.7,
            volume: 1_200_000,
            market_cap: None,
            last_update: "2025-01-15T16:00:00Z".to_string(),
        }
    }

    #[tokio::test]
    async fn quote_round_trip_and_miss() {
        let cache = StockCache::new();
        assert!(cache.get_quote("AAPL").await.is_none());

        cache.set_quote("AAPL".to_string(), quote("AAPL")).await;
        let hit = cache.get_quote("AAPL").await.unwrap();
        assert_eq!(hit.symbol, "AAPL");

        assert!(cache.get_quote("MSFT").await.is_none());
    }

    #[tokio::test]
    async fn calendar_keys_on_the_full_range() {
        let cache = StockCache::new();
        cache.set_calendar("2025-01-01", "2025-01-31", Vec::new()).await;

        assert!(cache.get_calendar("2025-01-01", "2025-01-31").await.is_some());
        assert!(cache.get_calendar("2025-01-01", "2025-02-28").await.is_none());
    }
}
