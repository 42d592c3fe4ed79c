pub mod cache_info;
pub mod comparison_series;
pub mod funds_saved;
pub mod funds_saved_by_network;
pub mod funds_saved_by_platform;
pub mod liquidations_series;
pub mod network_distribution;
pub mod stats;
pub mod top_markets;
pub mod top_tokens;
pub mod version;
