use std::fmt;

use serde::{Deserialize, Serialize};

/// Binary platform classifier inferred from the composite market key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub enum Platform {
    CrvUsd,
    LlamaLend,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Platform::CrvUsd => write!(f, "crvUSD"),
            Platform::LlamaLend => write!(f, "LlamaLend"),
        }
    }
}

/// Structured form of the composite cache key `{network}_..._{market}`.
/// Parsed once at ingestion; downstream code never re-splits strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarketKey {
    pub network: String,
    pub platform: Platform,
    pub market: String,
}

impl MarketKey {
    /// The first underscore-delimited token is the network, the last
    /// one the market name. This is a fixed convention of the input
    /// format, not inferred.
    pub fn parse(raw: &str) -> Option<MarketKey> {
        let network = raw.split('_').next()?;
        if network.is_empty() {
            return None;
        }
        let market = raw.rsplit('_').next()?;

        let platform = if raw.to_lowercase().contains("crvusd") {
            Platform::CrvUsd
        } else {
            Platform::LlamaLend
        };

        Some(MarketKey {
            network: network.to_owned(),
            platform,
            market: market.to_owned(),
        })
    }
}

impl fmt::Display for MarketKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.market)
    }
}
