use crate::domain::payload::RawHistoryItem;
use crate::domain::view_model::TrendPoint;
use chrono::NaiveDate;

pub fn normalize_trend(history: &[RawHistoryItem]) -> Vec<TrendPoint> {
    history
        .iter()
        .map(|item| TrendPoint {
            date: item.date.clone(),
            score: item.predicted_rating.clone(),
            confidence: item.confidence.clone(),
        })
        .collect()
}

/// True when every date parses as `YYYY-MM-DD` and dates never go backwards.
///
/// Only used for diagnostics: trend order always follows the payload.
pub fn history_is_chronological(history: &[RawHistoryItem]) -> bool {
    let mut prev: Option<NaiveDate> = None;
    for item in history {
        let Ok(date) = NaiveDate::parse_from_str(item.date.trim(), "%Y-%m-%d") else {
            return false;
        };
        if prev.is_some_and(|p| date < p) {
            return false;
        }
        prev = Some(date);
    }
    true
}
