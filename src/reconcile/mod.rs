pub mod aggregate;
pub mod duration;
pub mod earnings;
pub mod engine;
pub mod period;

pub use aggregate::{aggregate_by_key, AdjustmentMode, WorkAggregate};
pub use duration::{format_hms, to_seconds, to_seconds_opt};
pub use earnings::{effective_rate, Earnings, EarningsInput};
pub use engine::{ReconcileConfig, Reconciler};
pub use period::{PeriodFilter, RepBucket};
