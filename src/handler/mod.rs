pub use self::{
    aggregate::aggregate,
    normalize::last_snapshot_per_day,
    query::{
        FilterQuery, NetworkFilter, Queries, Selection, StatSummary,
    },
};

pub mod aggregate;
pub mod charts;
pub mod normalize;
pub mod query;
