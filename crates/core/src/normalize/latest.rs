use crate::domain::payload::RawHistoryItem;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LatestMetrics {
    pub predicted_rating: Option<f64>,
    pub confidence: Option<f64>,
}

/// Rating and confidence of the highest-index history record.
pub fn select_latest(history: &[RawHistoryItem]) -> LatestMetrics {
    let Some(last) = history.last() else {
        return LatestMetrics::default();
    };

    LatestMetrics {
        predicted_rating: last.predicted_rating.as_number(),
        confidence: last.confidence.as_number(),
    }
}
