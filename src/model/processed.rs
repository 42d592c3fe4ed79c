use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::HardLiquidationEvent;

/// One calendar day's synthesis: the day's hard-liquidation events
/// plus exactly one snapshot per market (the last one by block
/// number). Never a sum of all snapshots on the day.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyBucket {
    pub soft: u64,
    pub hard: u64,
    pub volume: f64,
    pub positions: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkAggregate {
    pub soft: u64,
    pub hard: u64,
    pub volume: f64,
    pub first_seen: Option<NaiveDate>,
    pub last_seen: Option<NaiveDate>,
}

impl NetworkAggregate {
    pub fn observe(&mut self, day: NaiveDate) {
        self.first_seen = Some(match self.first_seen {
            Some(first) => first.min(day),
            None => day,
        });
        self.last_seen = Some(match self.last_seen {
            Some(last) => last.max(day),
            None => day,
        });
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketAggregate {
    pub network: String,
    pub soft: u64,
    pub hard: u64,
    pub volume: f64,
}

impl MarketAggregate {
    pub fn new(network: String) -> Self {
        MarketAggregate {
            network,
            soft: 0,
            hard: 0,
            volume: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Totals {
    pub soft_liquidations: u64,
    pub hard_liquidations: u64,
    pub total_volume: f64,
    pub unique_markets: HashSet<String>,
}

/// The canonical processed model: three parallel group-by views plus
/// running totals and the raw event list. Rebuilt in full on every
/// cache load, never mutated by queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessedModel {
    pub by_date: BTreeMap<NaiveDate, DailyBucket>,
    pub by_network: HashMap<String, NetworkAggregate>,
    pub by_market: HashMap<String, MarketAggregate>,
    pub totals: Totals,
    pub hard_liquidations: Vec<HardLiquidationEvent>,
}
