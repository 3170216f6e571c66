//! Trial Record - the metrics produced by one experiment run

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use tracing::debug;

use super::MetricValue;
use crate::{Error, Result};

/// Trial Record maps metric names to the values one run (one seed) produced.
///
/// Names are unique and kept in insertion order. Records handed to the
/// aggregators are read-only; normalization works on clones.
///
/// Equality compares metrics by name and ignores their order.
#[derive(Debug, Clone, Default)]
pub struct TrialRecord {
    metrics: Vec<(String, MetricValue)>,
}

impl TrialRecord {
    /// Create an empty trial record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for constructing a trial record.
    #[must_use]
    pub fn builder() -> TrialRecordBuilder {
        TrialRecordBuilder::default()
    }

    /// Build a record from a JSON object.
    ///
    /// Entries whose value has no supported shape are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `value` is not a JSON object.
    pub fn from_json(value: &Value) -> Result<Self> {
        value.as_object().map(Self::from_json_map).ok_or_else(|| {
            Error::InvalidInput(format!("trial record must be a JSON object, got {value}"))
        })
    }

    /// Build a record from the entries of a JSON object.
    #[must_use]
    pub fn from_json_map(map: &Map<String, Value>) -> Self {
        let mut record = Self::new();
        for (name, value) in map {
            match MetricValue::from_json(value) {
                Some(metric) => record.insert(name.clone(), metric),
                None => debug!(metric = %name, "skipping metric with unsupported shape"),
            }
        }
        record
    }

    /// Insert a metric, replacing any existing value with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<MetricValue>) {
        let name = name.into();
        let value = value.into();
        match self.metrics.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => self.metrics.push((name, value)),
        }
    }

    /// Get a metric by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&MetricValue> {
        self.metrics
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    /// Check whether a metric is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate metrics in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricValue)> {
        self.metrics.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Iterate metric names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.metrics.iter().map(|(name, _)| name.as_str())
    }

    /// Number of metrics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// Check if the record has no metrics.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = (&str, &mut MetricValue)> {
        self.metrics.iter_mut().map(|(name, value)| (name.as_str(), value))
    }
}

impl PartialEq for TrialRecord {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(name, value)| other.get(name) == Some(value))
    }
}

impl Serialize for TrialRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.metrics.len()))?;
        for (name, value) in &self.metrics {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<K: Into<String>, V: Into<MetricValue>> FromIterator<(K, V)> for TrialRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

/// Builder for `TrialRecord`.
#[derive(Debug, Default)]
pub struct TrialRecordBuilder {
    record: TrialRecord,
}

impl TrialRecordBuilder {
    /// Add a scalar metric.
    #[must_use]
    pub fn scalar(mut self, name: impl Into<String>, value: f64) -> Self {
        self.record.insert(name, MetricValue::Scalar(value));
        self
    }

    /// Add a list metric; only its first element is an observation.
    #[must_use]
    pub fn scalar_list(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.record.insert(name, MetricValue::ScalarList(values));
        self
    }

    /// Add a list-of-lists metric; its first inner list holds the observations.
    #[must_use]
    pub fn nested_list(mut self, name: impl Into<String>, lists: Vec<Vec<f64>>) -> Self {
        self.record.insert(name, MetricValue::NestedList(lists));
        self
    }

    /// Add an array metric; every element is an observation.
    #[must_use]
    pub fn array(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.record.insert(name, MetricValue::Array(values));
        self
    }

    /// Add an already classified metric.
    #[must_use]
    pub fn value(mut self, name: impl Into<String>, value: MetricValue) -> Self {
        self.record.insert(name, value);
        self
    }

    /// Build the `TrialRecord`.
    #[must_use]
    pub fn build(self) -> TrialRecord {
        self.record
    }
}
