use std::collections::{btree_map::Entry, BTreeMap};

use chrono::NaiveDate;

use crate::{
    estimator::BlockTimeEstimator,
    types::{MarketEntry, Snapshot},
};

/// Last-snapshot-per-day view of one market series: for each estimated
/// calendar day, the snapshot with the highest block number. Snapshots
/// are cumulative state, so summing a day's snapshots would over-count;
/// a strictly greater block replaces the stored one, an equal block
/// keeps the first seen.
pub fn last_snapshot_per_day<'a>(
    entry: &'a MarketEntry,
    estimator: &BlockTimeEstimator,
) -> BTreeMap<NaiveDate, &'a Snapshot> {
    let mut daily: BTreeMap<NaiveDate, &Snapshot> = BTreeMap::new();

    for snapshot in entry.series.snapshots() {
        let day =
            estimator.estimate_day(&entry.key.network, snapshot.block_number);

        match daily.entry(day) {
            Entry::Vacant(vacant) => {
                vacant.insert(snapshot);
            }
            Entry::Occupied(mut occupied) => {
                if snapshot.block_number > occupied.get().block_number {
                    occupied.insert(snapshot);
                }
            }
        }
    }

    daily
}
