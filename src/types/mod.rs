pub use self::{
    hard_liquidation::{parse_event_date, HardLiquidationEvent},
    market_key::{MarketKey, Platform},
    market_series::{BlockRange, MarketSeries},
    scan_cache::{MarketEntry, ScanCache, HARD_LIQUIDATIONS_KEY},
    snapshot::{PositionDetail, Snapshot},
};

mod hard_liquidation;
mod market_key;
mod market_series;
mod scan_cache;
mod snapshot;
