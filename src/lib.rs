//! # trial-stats: Aggregation of Repeated Experiment Trials
//!
//! **Version**: 0.1.0
//!
//! trial-stats collapses the results of repeated experiment runs (one record
//! per seed) into a mean and population standard deviation per metric,
//! optionally after dividing every metric by a baseline metric of the same
//! group. It also reads and writes the JSON result files trials are stored in.
//!
//! ## Design Principles
//!
//! - **Closed value shapes**: metric values are classified once, at
//!   ingestion, into [`experiment::MetricValue`]
//! - **Best-effort normalization**: a metric that cannot be divided by its
//!   baseline passes through unchanged instead of failing the aggregation
//! - **No shared state**: aggregation is a pure function of its input, and
//!   normalization works on copies
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use serde_json::Map;
//! use trial_stats::experiment::{aggregate_normalized, ResultStore};
//!
//! let store = ResultStore::new("results/bandit");
//! let records = store.load_records("baseline_bandit", &Map::new())?;
//!
//! for (metric, summary) in aggregate_normalized(&records, Some("random")).iter() {
//!     println!("{metric}: {:.3} ± {:.3}", summary.mean, summary.std);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod error;
pub mod experiment;

pub use error::{Error, Result};
pub use experiment::{aggregate, aggregate_normalized, Aggregate, MetricSummary, TrialRecord};
