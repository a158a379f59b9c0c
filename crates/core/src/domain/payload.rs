//! Typed view of the backend `/company` response.
//!
//! The backend payload is untrusted: any field may be missing, null or of the
//! wrong type. Decoding is a single pass over a `serde_json::Value` that never
//! fails for a JSON object; shape deviations fall back to absent/empty values
//! so the normalization stages only ever see a total `RawPayload`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("payload must be a JSON object (got {found})")]
    NotAnObject { found: &'static str },
}

/// A numeric-or-unknown value, carried verbatim from the payload.
///
/// Missing fields decode as JSON `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metric(pub Value);

impl Metric {
    pub fn null() -> Self {
        Self(Value::Null)
    }

    /// `Some` only for JSON numbers that fit a finite `f64`. Literals such as
    /// `1e400` still decode but read as `None`.
    pub fn as_number(&self) -> Option<f64> {
        match &self.0 {
            Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
            _ => None,
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for Metric {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<f64> for Metric {
    fn from(value: f64) -> Self {
        Self(Value::from(value))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPayload {
    pub symbol: Option<String>,
    pub history: Option<Vec<RawHistoryItem>>,
    pub features: Option<IndexMap<String, Metric>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawHistoryItem {
    pub date: String,
    pub predicted_rating: Metric,
    pub confidence: Metric,
    pub top_features: Option<Vec<RawFeatureContribution>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFeatureContribution {
    pub feature: String,
    pub contribution: Metric,
}

impl RawPayload {
    pub fn from_json_str(text: &str) -> Result<Self, PayloadError> {
        let value = serde_json::from_str::<Value>(text)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self, PayloadError> {
        let Value::Object(obj) = value else {
            return Err(PayloadError::NotAnObject {
                found: json_kind(value),
            });
        };

        let symbol = obj
            .get("symbol")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let history = obj
            .get("history")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(RawHistoryItem::from_value).collect());

        let features = obj.get("features").and_then(Value::as_object).map(|map| {
            map.iter()
                .map(|(key, v)| (key.clone(), Metric::from(v.clone())))
                .collect()
        });

        Ok(Self {
            symbol,
            history,
            features,
        })
    }

    pub fn history(&self) -> &[RawHistoryItem] {
        self.history.as_deref().unwrap_or_default()
    }

    /// Highest-index history record, which is only the most recent one if the
    /// backend returned history oldest first.
    pub fn last_history_item(&self) -> Option<&RawHistoryItem> {
        self.history().last()
    }
}

impl RawHistoryItem {
    fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        let top_features = obj
            .get("top_features")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .map(RawFeatureContribution::from_value)
                    .collect()
            });

        Self {
            date: text_field(obj, "date"),
            predicted_rating: metric_field(obj, "predictedRating"),
            confidence: metric_field(obj, "confidence"),
            top_features,
        }
    }
}

impl RawFeatureContribution {
    fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        Self {
            feature: text_field(obj, "feature"),
            contribution: metric_field(obj, "contribution"),
        }
    }
}

fn text_field(obj: &Map<String, Value>, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
        _ => String::new(),
    }
}

fn metric_field(obj: &Map<String, Value>, key: &str) -> Metric {
    obj.get(key).cloned().map(Metric::from).unwrap_or_default()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
