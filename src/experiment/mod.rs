//! Experiment results: trial records, their aggregation, and result files.
//!
//! ## Overview
//!
//! ```text
//! ResultStore ──load_records──> [TrialRecord] (one per seed)
//!                                     │
//!                      ┌──────────────┴───────────────┐
//!                 aggregate                 aggregate_normalized
//!                      │                  (Normalizer, baseline)
//!                      └──────────────┬───────────────┘
//!                                 Aggregate
//!                         name -> (mean, std, count)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use trial_stats::experiment::{aggregate, aggregate_normalized, TrialRecord};
//!
//! let records = vec![
//!     TrialRecord::builder()
//!         .scalar("steps", 1.0)
//!         .array("random_reward", vec![1.0, 2.0])
//!         .array("ppo_reward", vec![2.0, 6.0])
//!         .build(),
//!     TrialRecord::builder()
//!         .scalar("steps", 3.0)
//!         .array("random_reward", vec![2.0, 2.0])
//!         .array("ppo_reward", vec![4.0, 2.0])
//!         .build(),
//! ];
//!
//! let raw = aggregate(&records);
//! assert_eq!(raw.mean("steps"), Some(2.0));
//!
//! let relative = aggregate_normalized(&records, Some("random"));
//! assert_eq!(relative.mean("ppo_reward"), Some(2.0));
//! ```

mod aggregator;
mod metric_value;
mod normalize;
mod store;
mod trial_record;

pub use aggregator::{aggregate, Aggregate, MetricSummary};
pub use metric_value::MetricValue;
pub use normalize::{
    aggregate_normalized, normalize_series, suffix_group, try_normalize, Baseline,
    NormalizationSkipped, Normalizer, NormalizerBuilder, DEFAULT_SEPARATOR,
};
pub use store::{ResultFile, ResultStore};
pub use trial_record::{TrialRecord, TrialRecordBuilder};
