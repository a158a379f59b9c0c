use crate::backend::{FetchError, PayloadSource};
use crate::dashboard::DashboardState;
use crate::domain::payload::RawPayload;
use crate::domain::view_model::ViewModel;
use crate::normalize::{contribution_source, history_is_chronological};
use std::sync::Arc;
use uuid::Uuid;

pub async fn fetch_and_decode(
    source: &dyn PayloadSource,
    symbol: &str,
) -> Result<RawPayload, FetchError> {
    let value = source.fetch_payload(symbol).await?;
    Ok(RawPayload::from_value(&value)?)
}

/// One search submission: fetch, decode, normalize and publish.
///
/// Never fails; transport errors end up as the error view model.
pub async fn run_search(
    source: &dyn PayloadSource,
    symbol: &str,
    state: &mut DashboardState,
) -> Arc<ViewModel> {
    let run_id = Uuid::new_v4();
    tracing::info!(%run_id, symbol, source = source.source_name(), "dashboard search started");

    let outcome = fetch_and_decode(source, symbol).await;

    match &outcome {
        Ok(payload) => {
            let history = payload.history();
            if !history_is_chronological(history) {
                tracing::warn!(
                    %run_id,
                    symbol,
                    history_len = history.len(),
                    "history is not in ascending date order; latest metrics use the last record"
                );
            }

            tracing::info!(
                %run_id,
                symbol,
                history_len = history.len(),
                has_features = payload.features.is_some(),
                contributions_from = contribution_source(payload).as_str(),
                "dashboard search succeeded"
            );
        }
        Err(err) => {
            tracing::error!(
                %run_id,
                symbol,
                stage = err.stage(),
                error = %err,
                policy = %state.policy(),
                "dashboard search failed"
            );
        }
    }

    state.publish(&outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::StaticPayload;
    use crate::dashboard::FailurePolicy;
    use crate::domain::view_model::{BACKEND_ERROR_MESSAGE, UNKNOWN_COMPANY};
    use serde_json::{json, Value};

    struct FailingSource;

    #[async_trait::async_trait]
    impl PayloadSource for FailingSource {
        fn source_name(&self) -> &'static str {
            "failing"
        }

        async fn fetch_payload(&self, _symbol: &str) -> Result<Value, FetchError> {
            Err(FetchError::InvalidJson(
                serde_json::from_str::<Value>("not json").unwrap_err(),
            ))
        }
    }

    #[tokio::test]
    async fn publishes_normalized_payload() {
        let source = StaticPayload::new(json!({
            "history": [
                {"date": "2024-01-02", "predictedRating": 8, "confidence": 0.9},
                {"date": "2024-01-01", "predictedRating": 6, "confidence": 0.5}
            ]
        }));
        let mut state = DashboardState::default();

        let vm = run_search(&source, "ACME", &mut state).await;
        assert_eq!(vm.company, UNKNOWN_COMPANY);
        assert_eq!(vm.trend.len(), 2);
        assert_eq!(vm.predicted_rating, Some(6.0));
        assert_eq!(state.current(), vm);
    }

    #[tokio::test]
    async fn non_object_document_is_a_transport_failure() {
        let source = StaticPayload::new(json!(["AAPL"]));
        let err = fetch_and_decode(&source, "AAPL").await.unwrap_err();
        assert_eq!(err.stage(), "payload");

        let mut state = DashboardState::default();
        let vm = run_search(&source, "AAPL", &mut state).await;
        assert_eq!(vm.error_message, BACKEND_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn malformed_text_payload_becomes_error_view() {
        let source = StaticPayload::from_text("{\"symbol\": \"ACME\",");
        let err = fetch_and_decode(&source, "ACME").await.unwrap_err();
        assert_eq!(err.stage(), "json");

        let mut state = DashboardState::default();
        let vm = run_search(&source, "ACME", &mut state).await;
        assert_eq!(vm.error_message, BACKEND_ERROR_MESSAGE);

        let good = StaticPayload::from_text(r#"{"symbol": "ACME", "history": []}"#);
        let vm = run_search(&good, "ACME", &mut state).await;
        assert_eq!(vm.company, "ACME");
    }

    #[tokio::test]
    async fn failure_after_success_follows_policy() {
        let good = StaticPayload::new(json!({"symbol": "ACME", "features": {"PE": 3.0}}));

        let mut state = DashboardState::new(FailurePolicy::RetainStale);
        run_search(&good, "ACME", &mut state).await;
        let vm = run_search(&FailingSource, "ACME", &mut state).await;
        assert_eq!(vm.error_message, BACKEND_ERROR_MESSAGE);
        assert_eq!(vm.company, "ACME");

        let vm = run_search(&good, "ACME", &mut state).await;
        assert!(!vm.has_error());
    }
}
