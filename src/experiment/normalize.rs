//! Baseline normalization of trial metrics before aggregation
//!
//! Metrics are grouped by the suffix after their last separator, so
//! `random_reward`, `ppo_reward` and `dqn_reward` share the `reward` group.
//! With baseline `random`, the metric `random_reward` is the reference for
//! that group: every metric of the group is divided by it, record by record.
//!
//! ```text
//! record ──> into_series ──> find baselines ──> divide group members ──> aggregate
//! ```
//!
//! A group whose baseline is missing from a record is left untouched in that
//! record. Divisions that cannot be carried out leave the metric as it was.

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;

use super::{aggregate, Aggregate, MetricValue, TrialRecord};

/// Default separator between a metric's prefix and its suffix group.
pub const DEFAULT_SEPARATOR: char = '_';

/// Reason a metric was passed through without normalization.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizationSkipped {
    /// Metric and baseline series differ in length.
    #[error("series length {metric} does not match baseline length {baseline}")]
    LengthMismatch {
        /// Metric series length
        metric: usize,
        /// Baseline series length
        baseline: usize,
    },

    /// The metric has no series to divide.
    #[error("{0} metric cannot be divided by this baseline")]
    NotASeries(&'static str),

    /// The metric series is empty.
    #[error("metric series is empty")]
    EmptySeries,

    /// The scalar baseline is zero.
    #[error("baseline is zero")]
    ZeroBaseline,
}

/// Reference values for one suffix group within one record.
#[derive(Debug, Clone, PartialEq)]
pub enum Baseline {
    /// Element-wise reference series.
    Series(Vec<f64>),
    /// Single reference value.
    Scalar(f64),
}

impl Baseline {
    /// Baseline carried by a metric value.
    #[must_use]
    pub fn from_value(value: &MetricValue) -> Option<Self> {
        match value {
            MetricValue::Scalar(v) => Some(Self::Scalar(*v)),
            MetricValue::ScalarList(values) => values.first().copied().map(Self::Scalar),
            MetricValue::NestedList(lists) => lists.first().cloned().map(Self::Series),
            MetricValue::Array(values) => Some(Self::Series(values.clone())),
        }
    }
}

/// Suffix group of a metric name: everything after the last `separator`, or
/// the whole name when it has none.
#[must_use]
pub fn suffix_group(name: &str, separator: char) -> &str {
    name.rsplit(separator).next().unwrap_or(name)
}

/// Divide `metric` by `baseline` element-wise over the positions where the
/// baseline is nonzero. Positions with a zero baseline are dropped, so the
/// result may be shorter than the input.
///
/// # Errors
///
/// Returns [`NormalizationSkipped::LengthMismatch`] if the lengths differ.
pub fn normalize_series(metric: &[f64], baseline: &[f64]) -> Result<Vec<f64>, NormalizationSkipped> {
    if metric.len() != baseline.len() {
        return Err(NormalizationSkipped::LengthMismatch {
            metric: metric.len(),
            baseline: baseline.len(),
        });
    }
    Ok(metric
        .iter()
        .zip(baseline)
        .filter(|(_, b)| **b != 0.0)
        .map(|(m, b)| m / b)
        .collect())
}

/// Normalize one metric value against its group's baseline.
///
/// A series baseline divides an array metric element-wise. A scalar baseline
/// divides the first element of an array or list metric.
///
/// # Errors
///
/// Returns the reason the value cannot be normalized; callers keep the
/// original value in that case.
pub fn try_normalize(
    metric: &MetricValue,
    baseline: &Baseline,
) -> Result<MetricValue, NormalizationSkipped> {
    match (baseline, metric) {
        (Baseline::Series(reference), MetricValue::Array(values)) => {
            normalize_series(values, reference).map(MetricValue::Array)
        }
        (Baseline::Series(_), other) => Err(NormalizationSkipped::NotASeries(other.kind())),
        (Baseline::Scalar(reference), _) if *reference == 0.0 => {
            Err(NormalizationSkipped::ZeroBaseline)
        }
        (Baseline::Scalar(reference), MetricValue::Array(values)) => {
            divide_first(values, *reference).map(MetricValue::Array)
        }
        (Baseline::Scalar(reference), MetricValue::ScalarList(values)) => {
            divide_first(values, *reference).map(MetricValue::ScalarList)
        }
        (Baseline::Scalar(_), other) => Err(NormalizationSkipped::NotASeries(other.kind())),
    }
}

fn divide_first(values: &[f64], reference: f64) -> Result<Vec<f64>, NormalizationSkipped> {
    let mut out = values.to_vec();
    let first = out.first_mut().ok_or(NormalizationSkipped::EmptySeries)?;
    *first /= reference;
    Ok(out)
}

/// Per-call normalization settings.
///
/// ## Example
///
/// ```rust
/// use trial_stats::experiment::{Normalizer, TrialRecord};
///
/// let records = vec![TrialRecord::builder()
///     .array("random_reward", vec![0.0, 2.0, 4.0])
///     .array("ppo_reward", vec![10.0, 20.0, 30.0])
///     .build()];
///
/// let normalizer = Normalizer::builder().baseline("random").build();
/// let summary = normalizer.aggregate(&records);
/// assert_eq!(summary.mean("ppo_reward"), Some(6.25));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalizer {
    baseline: Option<String>,
    separator: char,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            baseline: None,
            separator: DEFAULT_SEPARATOR,
        }
    }
}

impl Normalizer {
    /// Create a normalizer against `baseline`, or a pass-through one for `None`.
    #[must_use]
    pub fn new(baseline: Option<&str>) -> Self {
        Self {
            baseline: baseline.map(str::to_string),
            ..Self::default()
        }
    }

    /// Create a builder for a normalizer.
    #[must_use]
    pub fn builder() -> NormalizerBuilder {
        NormalizerBuilder::default()
    }

    /// Baseline prefix, if any.
    #[must_use]
    pub fn baseline(&self) -> Option<&str> {
        self.baseline.as_deref()
    }

    /// Separator between prefix and suffix group.
    #[must_use]
    pub const fn separator(&self) -> char {
        self.separator
    }

    /// Normalize a copy of one record.
    ///
    /// Nested lists are flattened to their first inner list whether or not a
    /// baseline is set.
    #[must_use]
    pub fn normalize_record(&self, record: &TrialRecord) -> TrialRecord {
        let mut out: TrialRecord = record
            .iter()
            .map(|(name, value)| (name, value.clone().into_series()))
            .collect();

        let Some(prefix) = self.baseline.as_deref() else {
            return out;
        };

        let mut baselines: FxHashMap<&str, Baseline> = FxHashMap::default();
        for (name, value) in out.iter() {
            let group = suffix_group(name, self.separator);
            if baselines.contains_key(group) || !self.is_baseline_name(name, prefix, group) {
                continue;
            }
            if let Some(baseline) = Baseline::from_value(value) {
                baselines.insert(group, baseline);
            }
        }
        if baselines.is_empty() {
            return out;
        }
        // Release the borrow of `out` held by the group keys.
        let baselines: FxHashMap<String, Baseline> = baselines
            .into_iter()
            .map(|(group, baseline)| (group.to_string(), baseline))
            .collect();

        for (name, value) in out.values_mut() {
            let Some(baseline) = baselines.get(suffix_group(name, self.separator)) else {
                continue;
            };
            match try_normalize(value, baseline) {
                Ok(normalized) => *value = normalized,
                Err(reason) => debug!(metric = name, %reason, "left unnormalized"),
            }
        }
        out
    }

    /// Normalize copies of every record.
    #[must_use]
    pub fn normalize(&self, records: &[TrialRecord]) -> Vec<TrialRecord> {
        records.iter().map(|r| self.normalize_record(r)).collect()
    }

    /// Normalize copies of the records, then aggregate them.
    #[must_use]
    pub fn aggregate(&self, records: &[TrialRecord]) -> Aggregate {
        aggregate(&self.normalize(records))
    }

    fn is_baseline_name(&self, name: &str, prefix: &str, group: &str) -> bool {
        name.len() == prefix.len() + self.separator.len_utf8() + group.len()
            && name.starts_with(prefix)
            && name[prefix.len()..].starts_with(self.separator)
            && name.ends_with(group)
    }
}

/// Builder for `Normalizer`.
#[derive(Debug, Default)]
pub struct NormalizerBuilder {
    normalizer: Normalizer,
}

impl NormalizerBuilder {
    /// Set the baseline prefix; `{baseline}{separator}{group}` names the
    /// reference metric of each group.
    #[must_use]
    pub fn baseline(mut self, baseline: impl Into<String>) -> Self {
        self.normalizer.baseline = Some(baseline.into());
        self
    }

    /// Set the prefix/suffix separator (default `_`).
    #[must_use]
    pub const fn separator(mut self, separator: char) -> Self {
        self.normalizer.separator = separator;
        self
    }

    /// Build the `Normalizer`.
    #[must_use]
    pub fn build(self) -> Normalizer {
        self.normalizer
    }
}

/// Aggregate trial records after normalizing them against `baseline`.
///
/// With `baseline == None` this returns the same summary as [`aggregate`].
/// The caller's records are never modified.
#[must_use]
pub fn aggregate_normalized(records: &[TrialRecord], baseline: Option<&str>) -> Aggregate {
    Normalizer::new(baseline).aggregate(records)
}
