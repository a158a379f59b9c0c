use crate::domain::payload::{Metric, RawFeatureContribution, RawPayload};
use crate::domain::view_model::FeatureContribution;

/// Which input the contribution ranking was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContributionSource {
    /// `top_features` of the last history record.
    TopFeatures,
    /// The aggregate `features` map.
    AggregateFeatures,
    None,
}

impl ContributionSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TopFeatures => "top_features",
            Self::AggregateFeatures => "features",
            Self::None => "none",
        }
    }
}

pub fn coerce_contribution(value: &Metric) -> f64 {
    value.as_number().unwrap_or(0.0)
}

fn top_features(payload: &RawPayload) -> Option<&[RawFeatureContribution]> {
    payload
        .last_history_item()
        .and_then(|item| item.top_features.as_deref())
        .filter(|entries| !entries.is_empty())
}

/// The two sources are never merged: non-empty `top_features` on the last
/// history record pre-empt the aggregate map entirely.
pub fn contribution_source(payload: &RawPayload) -> ContributionSource {
    if top_features(payload).is_some() {
        ContributionSource::TopFeatures
    } else if payload.features.is_some() {
        ContributionSource::AggregateFeatures
    } else {
        ContributionSource::None
    }
}

pub fn resolve_contributions(payload: &RawPayload) -> Vec<FeatureContribution> {
    if let Some(entries) = top_features(payload) {
        return entries
            .iter()
            .map(|entry| FeatureContribution {
                feature: entry.feature.clone(),
                contribution: coerce_contribution(&entry.contribution),
            })
            .collect();
    }

    match &payload.features {
        Some(features) => features
            .iter()
            .map(|(key, value)| FeatureContribution {
                feature: key.clone(),
                contribution: coerce_contribution(value),
            })
            .collect(),
        None => Vec::new(),
    }
}
