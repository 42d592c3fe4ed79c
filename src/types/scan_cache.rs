use serde_json::Value;
use tracing::warn;

use crate::{
    error::Error,
    types::{HardLiquidationEvent, MarketKey, MarketSeries},
};

/// Cache key holding the hard-liquidation event array instead of a
/// market entry.
pub const HARD_LIQUIDATIONS_KEY: &str = "hard_liquidations";

#[derive(Debug, Clone)]
pub struct MarketEntry {
    pub key: MarketKey,
    pub raw_key: String,
    pub series: MarketSeries,
}

/// The immutable owning context built once per load from the raw JSON
/// cache object. Malformed keys and entries are skipped with a warning
/// rather than failing the load; the event list is optional.
#[derive(Debug, Clone, Default)]
pub struct ScanCache {
    pub markets: Vec<MarketEntry>,
    pub hard_liquidations: Vec<HardLiquidationEvent>,
}

impl ScanCache {
    pub fn from_slice(data: &[u8]) -> Result<ScanCache, Error> {
        let value: Value = serde_json::from_slice(data)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<ScanCache, Error> {
        let Value::Object(entries) = value else {
            return Err(Error::CacheLoadError(String::from(
                "cache root is not a JSON object",
            )));
        };

        let mut cache = ScanCache::default();

        for (key, entry) in entries {
            if key == HARD_LIQUIDATIONS_KEY {
                cache.hard_liquidations = parse_event_list(entry);
                continue;
            }

            let Some(market_key) = MarketKey::parse(&key) else {
                warn!("skipping malformed market key: {:?}", key);
                continue;
            };

            match serde_json::from_value::<MarketSeries>(entry) {
                Ok(series) => cache.markets.push(MarketEntry {
                    key: market_key,
                    raw_key: key,
                    series,
                }),
                Err(e) => warn!("skipping market {}: {}", key, e),
            }
        }

        Ok(cache)
    }
}

fn parse_event_list(value: Value) -> Vec<HardLiquidationEvent> {
    let Value::Array(items) = value else {
        warn!("hard liquidation field is not an array, ignoring");
        return Vec::new();
    };

    let mut events = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<HardLiquidationEvent>(item) {
            Ok(event) => events.push(event),
            Err(e) => warn!("skipping hard liquidation event: {}", e),
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_cache_loads_to_empty_model() {
        let cache = ScanCache::from_slice(b"{}").unwrap();
        assert!(cache.markets.is_empty());
        assert!(cache.hard_liquidations.is_empty());
    }

    #[test]
    fn splits_event_list_from_market_entries() {
        let cache = ScanCache::from_value(json!({
            "hard_liquidations": [
                {"date": "2025-03-02", "network": "arbitrum",
                 "market": "WETH", "debt_repaid": 500.0}
            ],
            "ethereum_controller_wstETH": {
                "range": {"from_block": 100, "to_block": 200},
                "results": [{"block_number": 100, "soft_liq_count": 2,
                             "total_collateral_usd": 1000.0}]
            }
        }))
        .unwrap();

        assert_eq!(cache.hard_liquidations.len(), 1);
        assert_eq!(cache.markets.len(), 1);
        assert_eq!(cache.markets[0].key.network, "ethereum");
        assert_eq!(cache.markets[0].key.market, "wstETH");
    }

    #[test]
    fn malformed_entries_are_skipped_not_fatal() {
        let cache = ScanCache::from_value(json!({
            "ethereum_controller_wstETH": "not an object",
            "hard_liquidations": [
                {"date": "not a date", "network": "x", "market": "y"},
                {"date": "2025-03-02", "network": "arbitrum", "market": "z"}
            ],
            "arbitrum_controller_WETH": {"results": []}
        }))
        .unwrap();

        assert_eq!(cache.markets.len(), 1);
        assert_eq!(cache.hard_liquidations.len(), 1);
    }

    #[test]
    fn non_object_root_is_a_load_error() {
        assert!(ScanCache::from_slice(b"[1,2,3]").is_err());
    }
}
