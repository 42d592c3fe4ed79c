use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::debug;

// 2025-01-01T00:00:00Z, the reference date of the built-in table.
const REFERENCE_EPOCH: i64 = 1_735_689_600;

/// Per-network linear block-time model: a reference (block, date) pair
/// plus a constant seconds-per-block rate.
#[derive(Debug, Clone)]
pub struct NetworkTiming {
    pub reference_block: u64,
    pub reference_date: DateTime<Utc>,
    pub seconds_per_block: f64,
}

/// Maps a (network, block number) pair to an approximate calendar
/// date. The mapping is explicitly an estimate, not a guarantee.
#[derive(Debug, Clone)]
pub struct BlockTimeEstimator {
    networks: HashMap<String, NetworkTiming>,
}

impl BlockTimeEstimator {
    pub fn new(networks: HashMap<String, NetworkTiming>) -> Self {
        BlockTimeEstimator { networks }
    }

    /// Built-in table for the supported networks.
    pub fn default_timings() -> HashMap<String, NetworkTiming> {
        let reference_date = DateTime::from_timestamp(REFERENCE_EPOCH, 0)
            .unwrap_or(DateTime::UNIX_EPOCH);

        let mut networks = HashMap::new();
        for (name, block, seconds_per_block) in [
            ("ethereum", 21_515_000, 12.0),
            ("arbitrum", 290_658_752, 0.25),
            ("fraxtal", 19_840_000, 2.0),
        ] {
            networks.insert(
                name.to_owned(),
                NetworkTiming {
                    reference_block: block,
                    reference_date,
                    seconds_per_block,
                },
            );
        }
        networks
    }

    /// Unknown networks fall back to the current wall-clock time. A
    /// deliberate silent-fallback policy carried over from the data
    /// producer; see DESIGN.md.
    pub fn estimate(
        &self,
        network: &str,
        block_number: u64,
    ) -> DateTime<Utc> {
        let Some(timing) = self.networks.get(network) else {
            debug!(
                "no block timing for network {}, falling back to now",
                network
            );
            return Utc::now();
        };

        let block_diff =
            block_number as i64 - timing.reference_block as i64;
        let millis = block_diff as f64 * timing.seconds_per_block * 1000.0;
        timing.reference_date + Duration::milliseconds(millis as i64)
    }

    pub fn estimate_day(&self, network: &str, block_number: u64) -> NaiveDate {
        self.estimate(network, block_number).date_naive()
    }
}

impl Default for BlockTimeEstimator {
    fn default() -> Self {
        BlockTimeEstimator::new(Self::default_timings())
    }
}
