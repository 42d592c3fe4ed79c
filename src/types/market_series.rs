use serde::{Deserialize, Serialize};

use crate::types::Snapshot;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockRange {
    pub from_block: u64,
    pub to_block: u64,
}

/// One market's entry in the snapshot cache: an ordered snapshot list
/// plus the scanned block range. Either field may be absent in the
/// source; consumers that need a missing field skip the entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSeries {
    #[serde(default)]
    pub range: Option<BlockRange>,
    #[serde(default)]
    pub results: Option<Vec<Snapshot>>,
}

impl MarketSeries {
    pub fn snapshots(&self) -> &[Snapshot] {
        self.results.as_deref().unwrap_or_default()
    }
}
