//! Pure stages turning a decoded `RawPayload` into view model fragments.

pub mod contributions;
pub mod latest;
pub mod snapshot;
pub mod trend;

pub use contributions::{
    coerce_contribution, contribution_source, resolve_contributions, ContributionSource,
};
pub use latest::{select_latest, LatestMetrics};
pub use snapshot::build_snapshot;
pub use trend::{history_is_chronological, normalize_trend};
