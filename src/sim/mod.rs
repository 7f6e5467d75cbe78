//! Dead-hour aggregation and uplift simulation.

pub mod aggregate;
pub mod uplift;

pub use aggregate::{Bucket, group_by_bucket};
pub use uplift::{aggregate_and_simulate, global_avg_spend, simulate};
