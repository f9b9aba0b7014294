//! Descriptive statistics and group-by aggregation over the merged table.

mod grouping;
mod statistics;

pub use grouping::{
    group_counts, group_moments, group_samples, missing_rates, pivot_mean, unique_values,
    GroupCount, GroupMoments, MissingRate, Pivot,
};
pub use statistics::{Moments, StreamingStats};
