//! Assembly of the dashboard view model and the state container the UI layer
//! reads it from.

pub mod assemble;
pub mod pipeline;
pub mod state;

pub use assemble::{assemble, assemble_failure, assemble_outcome};
pub use pipeline::{fetch_and_decode, run_search};
pub use state::DashboardState;

use std::fmt;
use std::str::FromStr;

/// What happens to the displayed data when a search fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Reset every data field to the initial state; only the error is shown.
    #[default]
    Clear,
    /// Keep the last successful data next to the error message.
    RetainStale,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown failure policy `{0}` (expected `clear` or `retain`)")]
pub struct UnknownFailurePolicy(String);

impl FromStr for FailurePolicy {
    type Err = UnknownFailurePolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clear" => Ok(Self::Clear),
            "retain" | "retain_stale" | "stale" => Ok(Self::RetainStale),
            _ => Err(UnknownFailurePolicy(s.to_string())),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clear => f.write_str("clear"),
            Self::RetainStale => f.write_str("retain"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_failure_policy_names() {
        assert_eq!("clear".parse::<FailurePolicy>().unwrap(), FailurePolicy::Clear);
        assert_eq!(" Retain ".parse::<FailurePolicy>().unwrap(), FailurePolicy::RetainStale);
        assert!("blank".parse::<FailurePolicy>().is_err());
        assert_eq!(FailurePolicy::default(), FailurePolicy::Clear);
    }
}
