//! Pure reshaping of derived views into label/value sequences for the
//! rendering sink. Dates ascend chronologically, rankings descend by
//! value; no business logic lives here.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::{
    handler::query::StatSummary,
    helpers::{capitalize, format_usd_millions, group_thousands},
    model::{
        DailyBucket, Distribution, FundsSaved, FundsSavedChart,
        NetworkDistribution, RankedBars, StackedSeries, StatCard,
        TimeSeries,
    },
};

pub fn time_series(
    buckets: &BTreeMap<NaiveDate, &DailyBucket>,
) -> TimeSeries {
    let mut series = TimeSeries::default();
    for (day, bucket) in buckets {
        series.dates.push(*day);
        series.soft.push(bucket.soft);
        series.hard.push(bucket.hard);
        series.volume.push(bucket.volume);
    }
    series
}

pub fn stacked_series(
    buckets: &BTreeMap<NaiveDate, &DailyBucket>,
) -> StackedSeries {
    let mut series = StackedSeries::default();
    for (day, bucket) in buckets {
        series.dates.push(*day);
        series.soft.push(bucket.soft);
        series.hard.push(bucket.hard);
    }
    series
}

/// Network volume split, soft and hard as independent distributions
/// with capitalized network labels.
pub fn network_distribution(
    soft: &BTreeMap<String, f64>,
    hard: &BTreeMap<String, f64>,
) -> NetworkDistribution {
    NetworkDistribution {
        soft: distribution(soft, true),
        hard: distribution(hard, true),
    }
}

fn distribution(
    volumes: &BTreeMap<String, f64>,
    capitalize_labels: bool,
) -> Distribution {
    let mut result = Distribution::default();
    for (label, volume) in volumes {
        result.labels.push(if capitalize_labels {
            capitalize(label)
        } else {
            label.clone()
        });
        result.values.push(*volume);
    }
    result
}

pub fn ranked_bars(entries: Vec<(String, f64)>) -> RankedBars {
    let mut bars = RankedBars::default();
    for (name, value) in entries {
        bars.names.push(name);
        bars.values.push(value);
    }
    bars
}

pub fn funds_saved_networks(
    groups: &BTreeMap<String, FundsSaved>,
) -> FundsSavedChart {
    funds_saved_chart(groups, true)
}

pub fn funds_saved_platforms(
    groups: &BTreeMap<String, FundsSaved>,
) -> FundsSavedChart {
    funds_saved_chart(groups, false)
}

fn funds_saved_chart(
    groups: &BTreeMap<String, FundsSaved>,
    capitalize_labels: bool,
) -> FundsSavedChart {
    let mut chart = FundsSavedChart::default();
    for (label, funds) in groups {
        chart.labels.push(if capitalize_labels {
            capitalize(label)
        } else {
            label.clone()
        });
        chart.protection.push(funds.liquidation_protection);
        chart.liquidations.push(funds.full_liquidations);
        chart.saved.push(funds.funds_saved);
    }
    chart
}

pub fn stat_cards(summary: &StatSummary) -> Vec<StatCard> {
    vec![
        StatCard {
            value: group_thousands(summary.max_soft_count),
            label: String::from("Liquidation Protection Mode"),
        },
        StatCard {
            value: group_thousands(summary.hard_liquidation_count),
            label: String::from("Hard Liquidations"),
        },
        StatCard {
            value: format_usd_millions(summary.max_total_volume),
            label: String::from("Max Volume for Period"),
        },
        StatCard {
            value: summary.active_markets.to_string(),
            label: String::from("Active Markets"),
        },
    ]
}
