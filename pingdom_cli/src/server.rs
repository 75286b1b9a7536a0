use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use pingdom_metrics::{Collector, PrometheusExporter};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

#[derive(Clone)]
struct AppState {
    collector: Arc<Collector>,
}

pub fn router(collector: Arc<Collector>) -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { collector })
}

/// Runs one collection cycle per scrape.
async fn metrics(State(state): State<AppState>) -> Response {
    let snapshot = state.collector.collect().await;

    match PrometheusExporter::format(&snapshot) {
        Ok(body) => (
            [(header::CONTENT_TYPE, PrometheusExporter::content_type())],
            body,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to encode metrics").into_response()
        }
    }
}

async fn healthz() -> &'static str {
    "OK"
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("Received shutdown signal, exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use pingdom_core::{
        ApiError, Check, CheckListing, CheckQuery, CheckSource, CheckStatus, OutageInterval,
        OutageSource, PingdomError, Result,
    };
    use pingdom_metrics::CollectorConfig;
    use tower::ServiceExt;

    struct StaticSource {
        inventory_up: bool,
    }

    #[async_trait]
    impl CheckSource for StaticSource {
        async fn list_checks(&self, _query: CheckQuery) -> Result<CheckListing> {
            if !self.inventory_up {
                return Err(PingdomError::Api(ApiError {
                    status_code: 401,
                    status_desc: "Unauthorized".to_string(),
                    message: "Invalid token".to_string(),
                }));
            }
            Ok(CheckListing::new(vec![Check::new(1, "api")
                .with_hostname("api.example.com")
                .with_status(CheckStatus::Up)
                .with_tag("uptime_slo_999")]))
        }
    }

    #[async_trait]
    impl OutageSource for StaticSource {
        async fn list_outages(&self, _check_id: u64, from: i64, to: i64) -> Result<Vec<OutageInterval>> {
            Ok(vec![OutageInterval::up(from, to)])
        }
    }

    fn app(inventory_up: bool) -> Router {
        let collector = Collector::with_source(StaticSource { inventory_up }, CollectorConfig::default());
        router(Arc::new(collector))
    }

    async fn get_body(app: Router, uri: &str) -> (StatusCode, String, Option<String>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap(), content_type)
    }

    #[tokio::test]
    async fn test_healthz() {
        let (status, body, _) = get_body(app(true), "/healthz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn test_metrics() {
        let (status, body, content_type) = get_body(app(true), "/metrics").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("text/plain; version=0.0.4"));
        assert!(body.contains("pingdom_up 1"));
        assert!(body.contains("pingdom_slo_period_seconds 604800"));
        assert!(body.contains(r#"pingdom_uptime_status{hostname="api.example.com",id="1""#));
        assert!(body.contains(r#"pingdom_uptime_slo_error_budget_total_seconds{hostname="api.example.com",id="1""#));
    }

    #[tokio::test]
    async fn test_metrics_when_inventory_fails() {
        let (status, body, _) = get_body(app(false), "/metrics").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("pingdom_up 0"));
        assert!(!body.contains("pingdom_uptime_status"));
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, _, _) = get_body(app(true), "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
