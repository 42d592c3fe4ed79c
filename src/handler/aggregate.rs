use crate::{
    estimator::BlockTimeEstimator,
    handler::normalize::last_snapshot_per_day,
    model::{MarketAggregate, ProcessedModel},
    types::ScanCache,
};

/// Folds the immutable cache into the canonical processed model: the
/// by-date, by-network and by-market views plus running totals.
///
/// Hard counts come from the explicit event list when the cache has
/// one; a cache without events falls back to deriving hard counts per
/// snapshot by subtraction. Both input shapes flow through the same
/// pipeline.
pub fn aggregate(
    cache: &ScanCache,
    estimator: &BlockTimeEstimator,
) -> ProcessedModel {
    let mut model = ProcessedModel {
        hard_liquidations: cache.hard_liquidations.clone(),
        ..ProcessedModel::default()
    };

    for event in &cache.hard_liquidations {
        let day = event.day();

        let bucket = model.by_date.entry(day).or_default();
        bucket.hard += 1;
        bucket.volume += event.debt_repaid;

        model
            .by_network
            .entry(event.network.clone())
            .or_default()
            .hard += 1;

        model
            .by_market
            .entry(event.market.clone())
            .or_insert_with(|| MarketAggregate::new(event.network.clone()))
            .hard += 1;

        model.totals.hard_liquidations += 1;
    }

    let derive_hard = cache.hard_liquidations.is_empty();

    for entry in &cache.markets {
        for (day, snapshot) in last_snapshot_per_day(entry, estimator) {
            let soft = snapshot.soft_liq_count;
            let volume = snapshot.total_collateral_usd;
            let hard = if derive_hard {
                snapshot.derived_hard_count()
            } else {
                0
            };

            let bucket = model.by_date.entry(day).or_default();
            bucket.soft += soft;
            bucket.hard += hard;
            bucket.volume += volume;
            if let Some(details) = &snapshot.position_details {
                bucket.positions.extend(details.keys().cloned());
            }

            let network = model
                .by_network
                .entry(entry.key.network.clone())
                .or_default();
            network.soft += soft;
            network.hard += hard;
            network.volume += volume;
            network.observe(day);

            let market = model
                .by_market
                .entry(entry.key.market.clone())
                .or_insert_with(|| {
                    MarketAggregate::new(entry.key.network.clone())
                });
            market.soft += soft;
            market.hard += hard;
            market.volume += volume;

            model.totals.soft_liquidations += soft;
            model.totals.hard_liquidations += hard;
            model.totals.total_volume += volume;
            model
                .totals
                .unique_markets
                .insert(entry.key.market.clone());
        }
    }

    model
}
