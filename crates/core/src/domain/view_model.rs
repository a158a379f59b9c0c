use crate::domain::payload::Metric;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Company label used when the payload carries no symbol.
pub const UNKNOWN_COMPANY: &str = "Unknown";

/// Company label shown before the first search and after a cleared failure.
pub const INITIAL_COMPANY: &str = "Company XYZ";

pub const BACKEND_ERROR_MESSAGE: &str = "Error talking to backend";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub score: Metric,
    pub confidence: Metric,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureContribution {
    pub feature: String,
    pub contribution: f64,
}

/// Aggregate feature map echoed verbatim, in received key order.
pub type Snapshot = IndexMap<String, Metric>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
    pub company: String,
    pub predicted_rating: Option<f64>,
    pub confidence: Option<f64>,
    pub trend: Vec<TrendPoint>,
    pub features: Vec<FeatureContribution>,
    pub snapshot: Option<Snapshot>,
    pub error_message: String,
}

impl ViewModel {
    /// State before any search has completed.
    pub fn initial() -> Self {
        Self {
            company: INITIAL_COMPANY.to_string(),
            predicted_rating: None,
            confidence: None,
            trend: Vec::new(),
            features: Vec::new(),
            snapshot: None,
            error_message: String::new(),
        }
    }

    pub fn has_error(&self) -> bool {
        !self.error_message.is_empty()
    }
}

impl Default for ViewModel {
    fn default() -> Self {
        Self::initial()
    }
}
