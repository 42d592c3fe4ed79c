use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Value/label pair rendered as a dashboard stat card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatCard {
    pub value: String,
    pub label: String,
}

/// Main time series: per-day soft/hard counts with a volume overlay.
/// Dates ascend, so labels are chronological.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeSeries {
    pub dates: Vec<NaiveDate>,
    pub soft: Vec<u64>,
    pub hard: Vec<u64>,
    pub volume: Vec<f64>,
}

/// Stacked soft-vs-hard comparison bars.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StackedSeries {
    pub dates: Vec<NaiveDate>,
    pub soft: Vec<u64>,
    pub hard: Vec<u64>,
}

/// Category distribution (pie-style), labels paired with USD values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Distribution {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkDistribution {
    pub soft: Distribution,
    pub hard: Distribution,
}

/// Ranked horizontal bars, descending by value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankedBars {
    pub names: Vec<String>,
    pub values: Vec<f64>,
}

/// The funds-saved triple. The identity
/// `funds_saved == liquidation_protection - full_liquidations`
/// holds exactly for every filter.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FundsSaved {
    pub liquidation_protection: f64,
    pub full_liquidations: f64,
    pub funds_saved: f64,
}

impl FundsSaved {
    pub fn add_protection(&mut self, amount: f64) {
        self.liquidation_protection += amount;
        self.funds_saved = self.liquidation_protection - self.full_liquidations;
    }

    pub fn add_liquidation(&mut self, amount: f64) {
        self.full_liquidations += amount;
        self.funds_saved = self.liquidation_protection - self.full_liquidations;
    }
}

/// Grouped funds-saved bars (one label per network or platform).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FundsSavedChart {
    pub labels: Vec<String>,
    pub protection: Vec<f64>,
    pub liquidations: Vec<f64>,
    pub saved: Vec<f64>,
}

/// Observed data range of one network, for the cache-info panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkRange {
    pub network: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub markets: usize,
}
