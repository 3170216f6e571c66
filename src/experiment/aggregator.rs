//! Trial Aggregator - mean and standard deviation of each metric across trials

use rustc_hash::FxHashMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::trace;

use super::TrialRecord;

/// Mean, population standard deviation and observation count of one metric.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct MetricSummary {
    /// Arithmetic mean of the pooled observations.
    pub mean: f64,
    /// Population standard deviation (divides by `count`).
    pub std: f64,
    /// Number of pooled observations.
    pub count: usize,
}

impl MetricSummary {
    /// Summarize a pool of observations.
    ///
    /// Returns `None` for an empty pool.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_observations(observations: &[f64]) -> Option<Self> {
        if observations.is_empty() {
            return None;
        }
        let count = observations.len();
        let n = count as f64;
        let mean = observations.iter().sum::<f64>() / n;
        let variance = observations.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Some(Self {
            mean,
            std: variance.sqrt(),
            count,
        })
    }

    /// The `(mean, std)` pair.
    #[must_use]
    pub const fn as_pair(&self) -> (f64, f64) {
        (self.mean, self.std)
    }
}

/// Per-metric summaries across a collection of trials.
///
/// Iteration follows the order in which metrics first appeared, which carries
/// no meaning beyond being stable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregate {
    entries: Vec<(String, MetricSummary)>,
}

impl Aggregate {
    /// Summary for a metric, if it had any observations.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&MetricSummary> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, summary)| summary)
    }

    /// Mean of a metric.
    #[must_use]
    pub fn mean(&self, name: &str) -> Option<f64> {
        self.get(name).map(|s| s.mean)
    }

    /// Standard deviation of a metric.
    #[must_use]
    pub fn std(&self, name: &str) -> Option<f64> {
        self.get(name).map(|s| s.std)
    }

    /// Check whether a metric is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of summarized metrics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no metric had observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(name, summary)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricSummary)> {
        self.entries.iter().map(|(name, summary)| (name.as_str(), summary))
    }

    /// Iterate metric names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl Serialize for Aggregate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, summary) in &self.entries {
            map.serialize_entry(name, summary)?;
        }
        map.end()
    }
}

/// Collapse trial records into a mean and standard deviation per metric.
///
/// Every record contributes the observations of each of its metrics (see
/// [`super::MetricValue`]) to a pool shared by all records. Pools that end up
/// empty are left out of the result.
///
/// ## Example
///
/// ```rust
/// use trial_stats::experiment::{aggregate, TrialRecord};
///
/// let records = vec![
///     TrialRecord::builder().scalar("reward", 1.0).build(),
///     TrialRecord::builder().scalar("reward", 3.0).build(),
/// ];
///
/// let summary = aggregate(&records);
/// assert_eq!(summary.get("reward").map(|s| s.as_pair()), Some((2.0, 1.0)));
/// ```
#[must_use]
pub fn aggregate(records: &[TrialRecord]) -> Aggregate {
    let mut index: FxHashMap<&str, usize> = FxHashMap::default();
    let mut pools: Vec<(&str, Vec<f64>)> = Vec::new();

    for record in records {
        for (name, value) in record.iter() {
            let slot = *index.entry(name).or_insert_with(|| {
                pools.push((name, Vec::new()));
                pools.len() - 1
            });
            pools[slot].1.extend_from_slice(value.observations());
        }
    }

    let entries: Vec<(String, MetricSummary)> = pools
        .into_iter()
        .filter_map(|(name, pool)| {
            let summary = MetricSummary::from_observations(&pool);
            if summary.is_none() {
                trace!(metric = name, "no observations, omitting");
            }
            summary.map(|s| (name.to_string(), s))
        })
        .collect();

    trace!(records = records.len(), metrics = entries.len(), "aggregated trials");
    Aggregate { entries }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_summary_population_std() {
        let summary = MetricSummary::from_observations(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0])
            .unwrap();
        assert!(approx(summary.mean, 5.0));
        assert!(approx(summary.std, 2.0));
        assert_eq!(summary.count, 8);
    }

    #[test]
    fn test_summary_empty() {
        assert!(MetricSummary::from_observations(&[]).is_none());
    }

    #[test]
    fn test_aggregate_empty_collection() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn test_aggregate_first_seen_order() {
        let records = vec![
            TrialRecord::builder().scalar("b", 1.0).build(),
            TrialRecord::builder().scalar("a", 1.0).scalar("b", 2.0).build(),
        ];
        let result = aggregate(&records);
        assert_eq!(result.names().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn test_aggregate_omits_empty_pools() {
        let records = vec![TrialRecord::builder()
            .array("empty", vec![])
            .nested_list("empty_nested", vec![vec![]])
            .scalar("kept", 1.0)
            .build()];
        let result = aggregate(&records);
        assert_eq!(result.len(), 1);
        assert!(!result.contains("empty"));
        assert!(!result.contains("empty_nested"));
    }
}
