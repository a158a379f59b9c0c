use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use credscope_core::backend::{HttpBackendClient, PayloadSource};
use credscope_core::dashboard::{self, DashboardState, FailurePolicy};
use credscope_core::domain::payload::RawPayload;
use credscope_core::domain::view_model::ViewModel;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = credscope_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let backend: Option<Arc<dyn PayloadSource>> = match HttpBackendClient::from_settings(&settings)
    {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "backend client unavailable; /dashboard will return 503");
            None
        }
    };

    let state = AppState {
        backend,
        policy: settings.failure_policy,
    };

    let app = router(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, policy = %settings.failure_policy, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/dashboard", get(get_dashboard))
        .route("/normalize", post(normalize_payload))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Clone)]
struct AppState {
    backend: Option<Arc<dyn PayloadSource>>,
    policy: FailurePolicy,
}

#[derive(Debug, Deserialize)]
struct DashboardQuery {
    symbol: Option<String>,
}

/// Each request starts from the initial view model, so a failure never
/// carries data over from another caller's search.
async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<(StatusCode, Json<ViewModel>), StatusCode> {
    let Some(backend) = &state.backend else {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    let symbol = query
        .symbol
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(StatusCode::BAD_REQUEST)?;

    let mut dashboard = DashboardState::new(state.policy);
    let vm = dashboard::run_search(backend.as_ref(), symbol, &mut dashboard).await;

    let status = if vm.has_error() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::OK
    };
    Ok((status, Json(ViewModel::clone(&vm))))
}

async fn normalize_payload(
    State(state): State<AppState>,
    body: String,
) -> (StatusCode, Json<ViewModel>) {
    match RawPayload::from_json_str(&body) {
        Ok(payload) => (StatusCode::OK, Json(dashboard::assemble(&payload))),
        Err(e) => {
            tracing::warn!(error = %e, body_len = body.len(), "rejected payload");
            (
                StatusCode::BAD_REQUEST,
                Json(dashboard::assemble_failure(
                    &ViewModel::initial(),
                    state.policy,
                )),
            )
        }
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &credscope_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use credscope_core::backend::StaticPayload;
    use credscope_core::domain::view_model::BACKEND_ERROR_MESSAGE;
    use serde_json::json;

    fn state_with(payload: serde_json::Value) -> AppState {
        AppState {
            backend: Some(Arc::new(StaticPayload::new(payload))),
            policy: FailurePolicy::Clear,
        }
    }

    fn query(symbol: Option<&str>) -> Query<DashboardQuery> {
        Query(DashboardQuery {
            symbol: symbol.map(str::to_string),
        })
    }

    #[tokio::test]
    async fn dashboard_returns_view_model() {
        let state = state_with(json!({
            "symbol": "JBHT",
            "history": [{"date": "2024-01-01", "predictedRating": 6, "confidence": 0.7}],
            "features": {"GDP": 29000.5}
        }));

        let (status, Json(vm)) = get_dashboard(State(state), query(Some("JBHT")))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(vm.company, "JBHT");
        assert_eq!(vm.predicted_rating, Some(6.0));
        assert_eq!(vm.features[0].feature, "GDP");
    }

    #[tokio::test]
    async fn dashboard_requires_symbol() {
        let state = state_with(json!({}));
        let err = get_dashboard(State(state), query(Some("  "))).await.unwrap_err();
        assert_eq!(err, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn dashboard_without_backend_is_unavailable() {
        let state = AppState {
            backend: None,
            policy: FailurePolicy::Clear,
        };
        let err = get_dashboard(State(state), query(Some("AAPL"))).await.unwrap_err();
        assert_eq!(err, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn dashboard_transport_failure_is_bad_gateway() {
        let state = state_with(json!("not an object"));
        let (status, Json(vm)) = get_dashboard(State(state), query(Some("AAPL")))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(vm.error_message, BACKEND_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn normalize_accepts_any_object() {
        let state = state_with(json!({}));
        let body = r#"{"history": "oops", "features": {"PE": 12.5, "Debt": "n/a"}}"#.to_string();

        let (status, Json(vm)) = normalize_payload(State(state), body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(vm.company, "Unknown");
        assert_eq!(vm.features.len(), 2);
        assert_eq!(vm.features[1].contribution, 0.0);
    }

    #[tokio::test]
    async fn normalize_accepts_out_of_range_numbers() {
        let state = state_with(json!({}));
        let body = r#"{"symbol": "ACME", "history": [{"date": "2024-01-01", "predictedRating": 1e400,
            "top_features": [{"feature": "Revenue", "contribution": 1e400}]}]}"#
            .to_string();

        let (status, Json(vm)) = normalize_payload(State(state), body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(vm.predicted_rating, None);
        assert_eq!(vm.features[0].contribution, 0.0);
    }

    #[tokio::test]
    async fn normalize_rejects_malformed_body() {
        let state = state_with(json!({}));
        let (status, Json(vm)) = normalize_payload(State(state), "{".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(vm.has_error());
    }
}
