use crate::backend::FetchError;
use crate::dashboard::{assemble_outcome, FailurePolicy};
use crate::domain::payload::RawPayload;
use crate::domain::view_model::ViewModel;
use std::sync::Arc;

/// Holds the view model the rendering layer reads.
///
/// Every publish swaps in a newly assembled `ViewModel`; readers holding an
/// earlier `Arc` keep seeing the value they were handed. Publishes are applied
/// in call order, so the last completed search wins.
#[derive(Debug, Clone)]
pub struct DashboardState {
    view: Arc<ViewModel>,
    policy: FailurePolicy,
}

impl DashboardState {
    pub fn new(policy: FailurePolicy) -> Self {
        Self {
            view: Arc::new(ViewModel::initial()),
            policy,
        }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn current(&self) -> Arc<ViewModel> {
        Arc::clone(&self.view)
    }

    pub fn publish(&mut self, outcome: &Result<RawPayload, FetchError>) -> Arc<ViewModel> {
        let next = assemble_outcome(&self.view, outcome, self.policy);
        self.view = Arc::new(next);
        self.current()
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(FailurePolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payload::PayloadError;
    use crate::domain::view_model::BACKEND_ERROR_MESSAGE;
    use serde_json::json;

    fn ok(v: serde_json::Value) -> Result<RawPayload, FetchError> {
        Ok(RawPayload::from_value(&v).unwrap())
    }

    fn failed() -> Result<RawPayload, FetchError> {
        Err(FetchError::Payload(PayloadError::NotAnObject { found: "array" }))
    }

    #[test]
    fn publish_replaces_view_without_touching_earlier_readers() {
        let mut state = DashboardState::default();
        let before = state.current();

        let after = state.publish(&ok(json!({"symbol": "ACME"})));
        assert_eq!(after.company, "ACME");
        assert_eq!(before.company, ViewModel::initial().company);
    }

    #[test]
    fn last_publish_wins() {
        let mut state = DashboardState::default();
        state.publish(&ok(json!({"symbol": "SLOW"})));
        state.publish(&ok(json!({"symbol": "FAST"})));
        assert_eq!(state.current().company, "FAST");
    }

    #[test]
    fn failure_policy_controls_stale_data() {
        let mut clear = DashboardState::new(FailurePolicy::Clear);
        clear.publish(&ok(json!({"symbol": "ACME", "features": {"PE": 1.0}})));
        let vm = clear.publish(&failed());
        assert_eq!(vm.error_message, BACKEND_ERROR_MESSAGE);
        assert!(vm.snapshot.is_none());

        let mut retain = DashboardState::new(FailurePolicy::RetainStale);
        retain.publish(&ok(json!({"symbol": "ACME", "features": {"PE": 1.0}})));
        let vm = retain.publish(&failed());
        assert_eq!(vm.error_message, BACKEND_ERROR_MESSAGE);
        assert_eq!(vm.company, "ACME");
        assert!(vm.snapshot.is_some());
    }
}
