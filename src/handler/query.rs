use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{Duration, NaiveDate, Utc};
use serde::Deserialize;

use crate::{
    estimator::BlockTimeEstimator,
    helpers::extract_token,
    model::{DailyBucket, FundsSaved, NetworkRange, ProcessedModel},
    types::{HardLiquidationEvent, MarketEntry, Platform, ScanCache, Snapshot},
};

/// Network selector: "all" or a single named network. An unknown name
/// simply matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkFilter {
    All,
    Named(String),
}

impl NetworkFilter {
    pub fn from_param(raw: Option<&str>) -> NetworkFilter {
        match raw {
            None => NetworkFilter::All,
            Some(name) if name.eq_ignore_ascii_case("all") => {
                NetworkFilter::All
            }
            Some(name) => NetworkFilter::Named(name.to_owned()),
        }
    }

    pub fn matches(&self, network: &str) -> bool {
        match self {
            NetworkFilter::All => true,
            NetworkFilter::Named(name) => name == network,
        }
    }
}

/// One user selection: network filter plus an inclusive date range.
#[derive(Debug, Clone)]
pub struct Selection {
    pub network: NetworkFilter,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl Selection {
    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.from && day <= self.to
    }
}

/// Query parameters shared by every chart endpoint. Missing dates
/// default to the trailing 30 days, missing network to "all".
#[derive(Debug, Deserialize)]
pub struct FilterQuery {
    pub network: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl FilterQuery {
    pub fn selection(&self) -> Selection {
        let to = self.to.unwrap_or_else(|| Utc::now().date_naive());
        let from = self.from.unwrap_or(to - Duration::days(30));
        Selection {
            network: NetworkFilter::from_param(self.network.as_deref()),
            from,
            to,
        }
    }
}

/// Stat-card figures: running maxima over the window, not final state.
/// They answer "how much was ever at risk" in the period.
#[derive(Debug, Clone, Default)]
pub struct StatSummary {
    pub max_soft_count: u64,
    pub hard_liquidation_count: u64,
    pub max_total_volume: f64,
    pub active_markets: usize,
}

/// Stateless query layer over the immutable cache and processed model.
/// Every method recomputes its view from scratch; identical arguments
/// on an unchanged cache yield identical results.
#[derive(Debug, Clone, Copy)]
pub struct Queries<'a> {
    pub cache: &'a ScanCache,
    pub model: &'a ProcessedModel,
    pub estimator: &'a BlockTimeEstimator,
}

impl<'a> Queries<'a> {
    /// Daily buckets whose date falls in range. The buckets already
    /// merge all networks, so the network filter cannot be applied to
    /// this view; a known imprecision of the daily series, kept rather
    /// than silently reshaped.
    pub fn filtered_buckets(
        &self,
        selection: &'a Selection,
    ) -> BTreeMap<NaiveDate, &'a DailyBucket> {
        self.model
            .by_date
            .range(selection.from..=selection.to)
            .map(|(day, bucket)| (*day, bucket))
            .collect()
    }

    pub fn stat_summary(&self, selection: &'a Selection) -> StatSummary {
        let mut summary = StatSummary::default();
        let mut active_markets: HashSet<&str> = HashSet::new();

        for entry in self.filtered_markets(selection) {
            let mut max_volume = 0.0_f64;
            let mut max_soft = 0_u64;
            let mut has_data = false;

            for snapshot in self.in_range(entry, selection) {
                has_data = true;
                max_volume = max_volume.max(snapshot.detailed_volume());
                max_soft = max_soft.max(snapshot.soft_liq_count);
            }

            if has_data {
                active_markets.insert(&entry.key.market);
                summary.max_total_volume += max_volume;
                summary.max_soft_count += max_soft;
            }
        }

        summary.hard_liquidation_count =
            self.filtered_events(selection).count() as u64;
        summary.active_markets = active_markets.len();
        summary
    }

    /// Funds saved = protected volume minus hard-liquidated volume.
    /// Protection uses each market's LAST in-range snapshot (final
    /// state), unlike the stat cards' running maxima.
    pub fn funds_saved(&self, selection: &'a Selection) -> FundsSaved {
        let mut totals = FundsSaved::default();

        for entry in self.filtered_markets(selection) {
            if let Some(last) = self.last_in_range(entry, selection) {
                totals.add_protection(last.total_collateral_usd);
            }
        }

        for event in self.filtered_events(selection) {
            totals.add_liquidation(event.debt_repaid);
        }

        totals
    }

    pub fn funds_saved_by_network(
        &self,
        selection: &'a Selection,
    ) -> BTreeMap<String, FundsSaved> {
        let mut groups: BTreeMap<String, FundsSaved> = BTreeMap::new();

        for entry in self.filtered_markets(selection) {
            if let Some(last) = self.last_in_range(entry, selection) {
                groups
                    .entry(entry.key.network.clone())
                    .or_default()
                    .add_protection(last.total_collateral_usd);
            }
        }

        for event in self.filtered_events(selection) {
            groups
                .entry(event.network.clone())
                .or_default()
                .add_liquidation(event.debt_repaid);
        }

        groups
    }

    /// Platform split. Hard liquidations are attributed entirely to
    /// LlamaLend; crvUSD markets rarely appear in the event feed and
    /// the cache carries no per-event platform, so this stays a
    /// documented heuristic.
    pub fn funds_saved_by_platform(
        &self,
        selection: &'a Selection,
    ) -> BTreeMap<String, FundsSaved> {
        let mut groups: BTreeMap<String, FundsSaved> = BTreeMap::new();
        groups.insert(Platform::CrvUsd.to_string(), FundsSaved::default());
        groups.insert(Platform::LlamaLend.to_string(), FundsSaved::default());

        for entry in self.filtered_markets(selection) {
            if let Some(last) = self.last_in_range(entry, selection) {
                groups
                    .entry(entry.key.platform.to_string())
                    .or_default()
                    .add_protection(last.total_collateral_usd);
            }
        }

        for event in self.filtered_events(selection) {
            groups
                .entry(Platform::LlamaLend.to_string())
                .or_default()
                .add_liquidation(event.debt_repaid);
        }

        groups
    }

    /// Per-market maximum in-range volume, zero-volume markets
    /// excluded, descending, top 10. Multiple controllers for the same
    /// market name sum their maxima.
    pub fn top_markets(&self, selection: &'a Selection) -> Vec<(String, f64)> {
        let mut volumes: HashMap<&str, f64> = HashMap::new();

        for entry in self.filtered_markets(selection) {
            let max_volume = self
                .in_range(entry, selection)
                .map(Snapshot::detailed_volume)
                .fold(0.0_f64, f64::max);
            *volumes.entry(&entry.key.market).or_default() += max_volume;
        }

        let mut ranked: Vec<(String, f64)> = volumes
            .into_iter()
            .filter(|(_, volume)| *volume > 0.0)
            .map(|(market, volume)| (market.to_owned(), volume))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(10);
        ranked
    }

    /// Hard-liquidation debt grouped by the token extracted from the
    /// market name, descending, top 15.
    pub fn top_tokens(&self, selection: &'a Selection) -> Vec<(String, f64)> {
        let mut debts: HashMap<String, f64> = HashMap::new();

        for event in self.filtered_events(selection) {
            *debts.entry(extract_token(&event.market)).or_default() +=
                event.debt_repaid;
        }

        let mut ranked: Vec<(String, f64)> = debts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(15);
        ranked
    }

    /// Per-network USD volume distributions. The soft side is a gross
    /// exposure sum over every in-range snapshot, intentionally not
    /// de-duplicated; the hard side sums repaid debt.
    pub fn network_distribution(
        &self,
        selection: &'a Selection,
    ) -> (BTreeMap<String, f64>, BTreeMap<String, f64>) {
        let mut soft: BTreeMap<String, f64> = BTreeMap::new();
        let mut hard: BTreeMap<String, f64> = BTreeMap::new();

        for entry in self.filtered_markets(selection) {
            let volume: f64 = self
                .in_range(entry, selection)
                .map(|s| s.total_collateral_usd)
                .sum();
            *soft.entry(entry.key.network.clone()).or_default() += volume;
        }

        for event in self.filtered_events(selection) {
            *hard.entry(event.network.clone()).or_default() +=
                event.debt_repaid;
        }

        (soft, hard)
    }

    /// Estimated per-network data ranges from each market's scanned
    /// block range, plus distinct market counts. Unfiltered.
    pub fn network_ranges(&self) -> Vec<NetworkRange> {
        struct Observed<'a> {
            from: NaiveDate,
            to: NaiveDate,
            markets: HashSet<&'a str>,
        }

        let mut networks: BTreeMap<&str, Observed> = BTreeMap::new();

        for entry in &self.cache.markets {
            let Some(range) = &entry.series.range else {
                continue;
            };
            let network = entry.key.network.as_str();
            let from = self.estimator.estimate_day(network, range.from_block);
            let to = self.estimator.estimate_day(network, range.to_block);

            let observed = networks.entry(network).or_insert(Observed {
                from,
                to,
                markets: HashSet::new(),
            });
            observed.from = observed.from.min(from);
            observed.to = observed.to.max(to);
            observed.markets.insert(&entry.key.market);
        }

        networks
            .into_iter()
            .map(|(network, observed)| NetworkRange {
                network: network.to_owned(),
                from: observed.from,
                to: observed.to,
                markets: observed.markets.len(),
            })
            .collect()
    }

    fn filtered_markets(
        &self,
        selection: &'a Selection,
    ) -> impl Iterator<Item = &'a MarketEntry> {
        self.cache
            .markets
            .iter()
            .filter(move |entry| selection.network.matches(&entry.key.network))
    }

    fn filtered_events(
        &self,
        selection: &'a Selection,
    ) -> impl Iterator<Item = &'a HardLiquidationEvent> {
        self.model.hard_liquidations.iter().filter(move |event| {
            selection.contains(event.day())
                && selection.network.matches(&event.network)
        })
    }

    fn in_range(
        &self,
        entry: &'a MarketEntry,
        selection: &'a Selection,
    ) -> impl Iterator<Item = &'a Snapshot> {
        let network = entry.key.network.as_str();
        let estimator = self.estimator;
        entry.series.snapshots().iter().filter(move |snapshot| {
            selection
                .contains(estimator.estimate_day(network, snapshot.block_number))
        })
    }

    fn last_in_range(
        &self,
        entry: &'a MarketEntry,
        selection: &'a Selection,
    ) -> Option<&'a Snapshot> {
        self.in_range(entry, selection)
            .max_by_key(|snapshot| snapshot.block_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::aggregate::aggregate;
    use serde_json::json;

    // Ethereum reference block is 2025-01-01; one day is 7200 blocks.
    fn eth_block(day_offset: u64) -> u64 {
        21_515_000 + day_offset * 7200
    }

    fn fixture() -> (ScanCache, ProcessedModel, BlockTimeEstimator) {
        let cache = ScanCache::from_value(json!({
            "hard_liquidations": [
                {"date": "2025-01-02", "network": "ethereum",
                 "market": "wstETH-long", "debt_repaid": 100.0},
                {"date": "2025-01-03", "network": "fraxtal",
                 "market": "sfrxETH", "debt_repaid": 40.0},
                {"date": "2025-02-15", "network": "ethereum",
                 "market": "WBTC", "debt_repaid": 999.0}
            ],
            "ethereum_market_wstETH": {
                "range": {"from_block": eth_block(0),
                          "to_block": eth_block(2)},
                "results": [
                    {"block_number": eth_block(0), "soft_liq_count": 4,
                     "total_collateral_usd": 1000.0},
                    {"block_number": eth_block(2), "soft_liq_count": 1,
                     "total_collateral_usd": 400.0}
                ]
            },
            "ethereum_crvusd_USDe": {
                "range": {"from_block": eth_block(1),
                          "to_block": eth_block(1)},
                "results": [
                    {"block_number": eth_block(1), "soft_liq_count": 2,
                     "total_collateral_usd": 250.0}
                ]
            },
            "fraxtal_controller_sfrxETH": {
                "results": [
                    {"block_number": 19_840_000, "soft_liq_count": 3,
                     "total_collateral_usd": 600.0}
                ]
            }
        }))
        .unwrap();
        let estimator = BlockTimeEstimator::default();
        let model = aggregate(&cache, &estimator);
        (cache, model, estimator)
    }

    fn selection(network: NetworkFilter, from: &str, to: &str) -> Selection {
        Selection {
            network,
            from: from.parse().unwrap(),
            to: to.parse().unwrap(),
        }
    }

    fn january(network: NetworkFilter) -> Selection {
        selection(network, "2025-01-01", "2025-01-31")
    }

    #[test]
    fn funds_saved_identity_holds() {
        let (cache, model, estimator) = fixture();
        let queries = Queries {
            cache: &cache,
            model: &model,
            estimator: &estimator,
        };

        let sel = january(NetworkFilter::All);
        let funds = queries.funds_saved(&sel);

        // Last in-range snapshots: 400 + 250 + 600; events: 100 + 40.
        assert!((funds.liquidation_protection - 1250.0).abs() < 1e-6);
        assert!((funds.full_liquidations - 140.0).abs() < 1e-6);
        assert!(
            (funds.funds_saved
                - (funds.liquidation_protection - funds.full_liquidations))
                .abs()
                < 1e-6
        );
    }

    #[test]
    fn stats_use_maxima_where_funds_saved_uses_last() {
        let (cache, model, estimator) = fixture();
        let queries = Queries {
            cache: &cache,
            model: &model,
            estimator: &estimator,
        };

        let sel = january(NetworkFilter::Named(String::from("ethereum")));
        let summary = queries.stat_summary(&sel);
        let funds = queries.funds_saved(&sel);

        // wstETH peaks at 1000 but ends the window at 400.
        assert!((summary.max_total_volume - 1250.0).abs() < 1e-6);
        assert!((funds.liquidation_protection - 650.0).abs() < 1e-6);
        assert_eq!(summary.max_soft_count, 4 + 2);
        assert_eq!(summary.hard_liquidation_count, 1);
        assert_eq!(summary.active_markets, 2);
    }

    #[test]
    fn unknown_network_filter_matches_nothing() {
        let (cache, model, estimator) = fixture();
        let queries = Queries {
            cache: &cache,
            model: &model,
            estimator: &estimator,
        };

        let sel = january(NetworkFilter::Named(String::from("optimism")));
        let summary = queries.stat_summary(&sel);
        let funds = queries.funds_saved(&sel);

        assert_eq!(summary.active_markets, 0);
        assert_eq!(summary.hard_liquidation_count, 0);
        assert_eq!(funds.liquidation_protection, 0.0);
        assert_eq!(funds.funds_saved, 0.0);
    }

    #[test]
    fn empty_date_range_yields_zero_aggregates() {
        let (cache, model, estimator) = fixture();
        let queries = Queries {
            cache: &cache,
            model: &model,
            estimator: &estimator,
        };

        let sel =
            selection(NetworkFilter::All, "2020-01-01", "2020-01-31");
        assert!(queries.filtered_buckets(&sel).is_empty());
        assert_eq!(queries.stat_summary(&sel).max_soft_count, 0);
        assert!(queries.top_markets(&sel).is_empty());
        assert!(queries.top_tokens(&sel).is_empty());
        assert_eq!(queries.funds_saved(&sel).funds_saved, 0.0);
    }

    #[test]
    fn queries_are_idempotent() {
        let (cache, model, estimator) = fixture();
        let queries = Queries {
            cache: &cache,
            model: &model,
            estimator: &estimator,
        };
        let sel = january(NetworkFilter::All);

        let first = queries.funds_saved(&sel);
        let second = queries.funds_saved(&sel);
        assert_eq!(first.liquidation_protection, second.liquidation_protection);
        assert_eq!(first.funds_saved, second.funds_saved);
        assert_eq!(
            queries.top_markets(&sel),
            queries.top_markets(&sel)
        );
    }

    #[test]
    fn filtered_buckets_are_inclusive_of_both_endpoints() {
        let (cache, model, estimator) = fixture();
        let queries = Queries {
            cache: &cache,
            model: &model,
            estimator: &estimator,
        };

        let sel =
            selection(NetworkFilter::All, "2025-01-01", "2025-01-03");
        let buckets = queries.filtered_buckets(&sel);
        let days: Vec<String> =
            buckets.keys().map(|d| d.to_string()).collect();
        assert_eq!(
            days,
            vec!["2025-01-01", "2025-01-02", "2025-01-03"]
        );
    }

    #[test]
    fn top_markets_rank_by_max_volume_and_drop_zeroes() {
        let (cache, model, estimator) = fixture();
        let queries = Queries {
            cache: &cache,
            model: &model,
            estimator: &estimator,
        };

        let ranked = queries.top_markets(&january(NetworkFilter::All));
        let names: Vec<&str> =
            ranked.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["wstETH", "sfrxETH", "USDe"]);
        assert!(ranked.iter().all(|(_, volume)| *volume > 0.0));
    }

    #[test]
    fn top_tokens_group_hard_debt_by_extracted_token() {
        let (cache, model, estimator) = fixture();
        let queries = Queries {
            cache: &cache,
            model: &model,
            estimator: &estimator,
        };

        let ranked = queries.top_tokens(&january(NetworkFilter::All));
        // wstETH-long extracts to wstETH, sfrxETH to sfrxETH; the
        // February WBTC event is out of range.
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].0, "wstETH");
        assert_eq!(ranked[0].1, 100.0);
        assert_eq!(ranked[1].0, "sfrxETH");
    }

    #[test]
    fn platform_split_attributes_hard_events_to_llamalend() {
        let (cache, model, estimator) = fixture();
        let queries = Queries {
            cache: &cache,
            model: &model,
            estimator: &estimator,
        };

        let groups =
            queries.funds_saved_by_platform(&january(NetworkFilter::All));
        assert_eq!(groups.len(), 2);

        let crvusd = &groups["crvUSD"];
        let llamalend = &groups["LlamaLend"];
        assert!((crvusd.liquidation_protection - 250.0).abs() < 1e-6);
        assert_eq!(crvusd.full_liquidations, 0.0);
        assert!((llamalend.full_liquidations - 140.0).abs() < 1e-6);
        assert!((llamalend.liquidation_protection - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn network_split_groups_protection_and_events() {
        let (cache, model, estimator) = fixture();
        let queries = Queries {
            cache: &cache,
            model: &model,
            estimator: &estimator,
        };

        let groups =
            queries.funds_saved_by_network(&january(NetworkFilter::All));
        let ethereum = &groups["ethereum"];
        assert!((ethereum.liquidation_protection - 650.0).abs() < 1e-6);
        assert!((ethereum.full_liquidations - 100.0).abs() < 1e-6);
        let fraxtal = &groups["fraxtal"];
        assert!((fraxtal.funds_saved - 560.0).abs() < 1e-6);
    }

    #[test]
    fn network_distribution_sums_gross_snapshot_volume() {
        let (cache, model, estimator) = fixture();
        let queries = Queries {
            cache: &cache,
            model: &model,
            estimator: &estimator,
        };

        let (soft, hard) =
            queries.network_distribution(&january(NetworkFilter::All));
        // Gross sum over every in-range snapshot, not last-per-day.
        assert!((soft["ethereum"] - 1650.0).abs() < 1e-6);
        assert!((soft["fraxtal"] - 600.0).abs() < 1e-6);
        assert!((hard["ethereum"] - 100.0).abs() < 1e-6);
        assert!((hard["fraxtal"] - 40.0).abs() < 1e-6);
    }

    #[test]
    fn network_ranges_follow_scanned_block_ranges() {
        let (cache, model, estimator) = fixture();
        let queries = Queries {
            cache: &cache,
            model: &model,
            estimator: &estimator,
        };

        let ranges = queries.network_ranges();
        // fraxtal entry has no range field, so only ethereum reports.
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].network, "ethereum");
        assert_eq!(ranges[0].from.to_string(), "2025-01-01");
        assert_eq!(ranges[0].to.to_string(), "2025-01-03");
        assert_eq!(ranges[0].markets, 2);
    }

    #[test]
    fn filter_query_defaults_to_all_networks() {
        let query = FilterQuery {
            network: None,
            from: Some("2025-01-01".parse().unwrap()),
            to: Some("2025-01-31".parse().unwrap()),
        };
        assert_eq!(query.selection().network, NetworkFilter::All);

        let query = FilterQuery {
            network: Some(String::from("All")),
            from: None,
            to: None,
        };
        let sel = query.selection();
        assert_eq!(sel.network, NetworkFilter::All);
        assert_eq!(sel.to - sel.from, Duration::days(30));
    }
}
