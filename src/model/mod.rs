pub use self::{
    processed::{
        DailyBucket, MarketAggregate, NetworkAggregate, ProcessedModel,
        Totals,
    },
    responses::{
        Distribution, FundsSaved, FundsSavedChart, NetworkDistribution,
        NetworkRange, RankedBars, StackedSeries, StatCard, TimeSeries,
    },
};

mod processed;
mod responses;
