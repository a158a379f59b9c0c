use crate::backend::FetchError;
use crate::dashboard::FailurePolicy;
use crate::domain::payload::RawPayload;
use crate::domain::view_model::{ViewModel, BACKEND_ERROR_MESSAGE, UNKNOWN_COMPANY};
use crate::normalize::{build_snapshot, normalize_trend, resolve_contributions, select_latest};

/// Builds a fresh view model from a decoded payload. Total: every
/// `RawPayload` produces one, and the error message is always cleared.
pub fn assemble(payload: &RawPayload) -> ViewModel {
    let history = payload.history();
    let latest = select_latest(history);

    ViewModel {
        company: payload
            .symbol
            .clone()
            .unwrap_or_else(|| UNKNOWN_COMPANY.to_string()),
        predicted_rating: latest.predicted_rating,
        confidence: latest.confidence,
        trend: normalize_trend(history),
        features: resolve_contributions(payload),
        snapshot: build_snapshot(payload.features.as_ref()),
        error_message: String::new(),
    }
}

pub fn assemble_failure(previous: &ViewModel, policy: FailurePolicy) -> ViewModel {
    let data = match policy {
        FailurePolicy::Clear => ViewModel::initial(),
        FailurePolicy::RetainStale => previous.clone(),
    };

    ViewModel {
        error_message: BACKEND_ERROR_MESSAGE.to_string(),
        ..data
    }
}

pub fn assemble_outcome(
    previous: &ViewModel,
    outcome: &Result<RawPayload, FetchError>,
    policy: FailurePolicy,
) -> ViewModel {
    match outcome {
        Ok(payload) => assemble(payload),
        Err(_) => assemble_failure(previous, policy),
    }
}
