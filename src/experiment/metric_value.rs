//! Metric Value - the closed set of shapes a trial metric can take

use serde::ser::{Serialize, Serializer};
use serde_json::Value;

/// A single metric value recorded by one trial.
///
/// Values are classified once, when a trial record is ingested, so that
/// aggregation only ever matches over these variants.
///
/// | Variant | Observations pooled by aggregation |
/// |---|---|
/// | `Scalar` | the value |
/// | `ScalarList` | the first element only |
/// | `NestedList` | every element of the first inner list |
/// | `Array` | every element |
///
/// Serialized as plain JSON numbers and lists. An `Array` is written as a
/// one-element list of lists, so it reads back as a `NestedList` with the
/// same observations.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    /// A single number.
    Scalar(f64),
    /// A list whose first element is a number. Never empty.
    ScalarList(Vec<f64>),
    /// A list whose first element is itself a list of numbers. Never empty.
    NestedList(Vec<Vec<f64>>),
    /// A numeric array; every element is an observation.
    Array(Vec<f64>),
}

impl MetricValue {
    /// Classify a JSON value.
    ///
    /// Returns `None` for shapes that carry no usable observation: booleans,
    /// strings, objects, null, empty lists, and lists whose first element is
    /// neither a number nor a list of numbers.
    ///
    /// A flat JSON list of numbers becomes a [`MetricValue::ScalarList`]:
    /// only its first element is an observation. Build
    /// [`MetricValue::Array`] directly when every element should count.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(Self::Scalar),
            Value::Array(items) => match items.first()? {
                Value::Number(_) => {
                    Some(Self::ScalarList(items.iter().filter_map(Value::as_f64).collect()))
                }
                first @ Value::Array(_) => {
                    let head = numeric_list(first)?;
                    let mut lists = vec![head];
                    lists.extend(items[1..].iter().filter_map(numeric_list));
                    Some(Self::NestedList(lists))
                }
                _ => None,
            },
            _ => None,
        }
    }

    /// Numeric observations this value contributes to its metric's pool.
    #[must_use]
    pub fn observations(&self) -> &[f64] {
        match self {
            Self::Scalar(v) => std::slice::from_ref(v),
            Self::ScalarList(values) => &values[..values.len().min(1)],
            Self::NestedList(lists) => match lists.first() {
                Some(first) => first,
                None => &[],
            },
            Self::Array(values) => values,
        }
    }

    /// Flatten a nested list into the array of its first inner list.
    ///
    /// Other variants are returned unchanged.
    #[must_use]
    pub fn into_series(self) -> Self {
        match self {
            Self::NestedList(lists) => Self::Array(lists.into_iter().next().unwrap_or_default()),
            other => other,
        }
    }

    /// Check that every stored number is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Scalar(v) => v.is_finite(),
            Self::ScalarList(values) | Self::Array(values) => values.iter().all(|v| v.is_finite()),
            Self::NestedList(lists) => lists.iter().flatten().all(|v| v.is_finite()),
        }
    }

    /// Short name of the variant, for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::ScalarList(_) => "scalar_list",
            Self::NestedList(_) => "nested_list",
            Self::Array(_) => "array",
        }
    }
}

impl Serialize for MetricValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Scalar(v) => serializer.serialize_f64(*v),
            Self::ScalarList(values) => values.serialize(serializer),
            Self::NestedList(lists) => lists.serialize(serializer),
            Self::Array(values) => [values].serialize(serializer),
        }
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

fn numeric_list(value: &Value) -> Option<Vec<f64>> {
    value.as_array()?.iter().map(Value::as_f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_scalar() {
        assert_eq!(MetricValue::from_json(&json!(3)), Some(MetricValue::Scalar(3.0)));
        assert_eq!(MetricValue::from_json(&json!(0.5)), Some(MetricValue::Scalar(0.5)));
    }

    #[test]
    fn test_from_json_flat_list_is_scalar_list() {
        let value = MetricValue::from_json(&json!([1, 2, 3])).unwrap();
        assert_eq!(value, MetricValue::ScalarList(vec![1.0, 2.0, 3.0]));
        assert_eq!(value.observations(), &[1.0]);
    }

    #[test]
    fn test_from_json_nested_list() {
        let value = MetricValue::from_json(&json!([[1, 2, 3], [4]])).unwrap();
        assert_eq!(value.observations(), &[1.0, 2.0, 3.0]);
        assert_eq!(value.into_series(), MetricValue::Array(vec![1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_from_json_nested_list_drops_non_numeric_tail() {
        let value = MetricValue::from_json(&json!([[1], ["x"], [2]])).unwrap();
        assert_eq!(value, MetricValue::NestedList(vec![vec![1.0], vec![2.0]]));
    }

    #[test]
    fn test_from_json_unsupported_shapes() {
        for value in [
            json!(true),
            json!("text"),
            json!(null),
            json!({"a": 1}),
            json!([]),
            json!(["a", 1]),
            json!([["a"]]),
        ] {
            assert!(MetricValue::from_json(&value).is_none(), "{value} should be skipped");
        }
    }

    #[test]
    fn test_array_observations() {
        let value = MetricValue::Array(vec![4.0, 5.0]);
        assert_eq!(value.observations(), &[4.0, 5.0]);
        assert_eq!(value.kind(), "array");
    }

    #[test]
    fn test_serialize_plain_json() {
        let json = serde_json::to_value(MetricValue::NestedList(vec![vec![1.0, 2.0]])).unwrap();
        assert_eq!(json, json!([[1.0, 2.0]]));
        let json = serde_json::to_value(MetricValue::ScalarList(vec![1.0, 2.0])).unwrap();
        assert_eq!(json, json!([1.0, 2.0]));
        let json = serde_json::to_value(MetricValue::Scalar(2.5)).unwrap();
        assert_eq!(json, json!(2.5));
    }

    #[test]
    fn test_array_reads_back_with_same_observations() {
        let array = MetricValue::Array(vec![1.0, 2.0, 3.0]);
        let json = serde_json::to_value(&array).unwrap();
        assert_eq!(json, json!([[1.0, 2.0, 3.0]]));

        let reloaded = MetricValue::from_json(&json).unwrap();
        assert_eq!(reloaded.observations(), array.observations());
        assert_eq!(reloaded.into_series(), array);
    }
}
