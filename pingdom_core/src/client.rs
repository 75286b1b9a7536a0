use crate::{
    api::{ErrorResponse, ListChecksResponse, OutageSummaryResponse, DEFAULT_BASE_URL},
    error::{PingdomError, Result},
    outage::OutageInterval,
    rate_limit,
    source::{CheckListing, CheckQuery, CheckSource, OutageSource},
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("pingdom-exporter/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub token: String,
    /// Applied to every request, so one stalled call cannot hold up a scrape.
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: token.into(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP client for the Pingdom API.
#[derive(Debug, Clone)]
pub struct PingdomClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl PingdomClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.token.trim().is_empty() {
            return Err(PingdomError::InvalidConfig(
                "API token must not be empty".to_string(),
            ));
        }
        if config.timeout.is_zero() {
            return Err(PingdomError::InvalidConfig(
                "request timeout must be > 0".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { http, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<reqwest::Response> {
        let url = self.url(path);
        debug!("GET {} {:?}", url, query);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.config.token)
            .query(query)
            .send()
            .await?;

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let url = response.url().to_string();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(match serde_json::from_slice::<ErrorResponse>(&body) {
                Ok(error) => PingdomError::Api(error.error),
                Err(_) => PingdomError::UnexpectedStatus { status, url },
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl CheckSource for PingdomClient {
    async fn list_checks(&self, query: CheckQuery) -> Result<CheckListing> {
        let mut params = vec![("include_tags", "true".to_string())];
        if !query.tags.is_empty() {
            params.push(("tags", query.tags.join(",")));
        }

        let response = self.get("/checks", &params).await?;
        // Rate limit headers are present on error responses too.
        let rate_limit_remaining = rate_limit::min_remaining(response.headers());
        let body: ListChecksResponse = Self::decode(response).await?;

        debug!(
            "Listed {} checks (rate limit remaining: {:?})",
            body.checks.len(),
            rate_limit_remaining
        );

        Ok(CheckListing {
            checks: body.checks,
            rate_limit_remaining,
        })
    }
}

#[async_trait]
impl OutageSource for PingdomClient {
    async fn list_outages(&self, check_id: u64, from: i64, to: i64) -> Result<Vec<OutageInterval>> {
        let params = [("from", from.to_string()), ("to", to.to_string())];
        let response = self
            .get(&format!("/summary.outage/{}", check_id), &params)
            .await?;
        let body: OutageSummaryResponse = Self::decode(response).await?;
        Ok(body.summary.states)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::CheckStatus;
    use axum::{
        extract::{Path, Query},
        http::{HeaderMap, StatusCode},
        response::IntoResponse,
        routing::get,
        Json, Router,
    };
    use serde_json::json;
    use std::collections::HashMap;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client(base_url: &str) -> PingdomClient {
        PingdomClient::new(ClientConfig::new("secret").base_url(base_url)).unwrap()
    }

    async fn list_checks(
        headers: HeaderMap,
        Query(params): Query<HashMap<String, String>>,
    ) -> impl IntoResponse {
        assert_eq!(headers["authorization"], "Bearer secret");
        assert_eq!(params.get("include_tags").map(String::as_str), Some("true"));

        let name = match params.get("tags") {
            Some(tags) => format!("filtered by {}", tags),
            None => "My check 1".to_string(),
        };

        (
            [("req-limit-long", "Remaining: 12 Time until reset: 34")],
            Json(json!({
                "checks": [{
                    "hostname": "example.com",
                    "id": 85975,
                    "lastresponsetime": 355,
                    "name": name,
                    "resolution": 1,
                    "status": "up",
                    "type": "http",
                    "tags": [{"name": "apache", "type": "a", "count": 2}]
                }]
            })),
        )
    }

    async fn outage_summary(
        Path(id): Path<u64>,
        Query(params): Query<HashMap<String, String>>,
    ) -> impl IntoResponse {
        assert_eq!(id, 1);
        assert_eq!(params.get("from").map(String::as_str), Some("1293143523"));
        assert_eq!(params.get("to").map(String::as_str), Some("1294180323"));

        Json(json!({
            "summary": {
                "states": [
                    {"status": "up", "timefrom": 1293143523, "timeto": 1294180263},
                    {"status": "down", "timefrom": 1294180263, "timeto": 1294180323}
                ]
            }
        }))
    }

    #[test]
    fn test_empty_token_rejected() {
        let err = PingdomClient::new(ClientConfig::new("  ")).unwrap_err();
        assert!(matches!(err, PingdomError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_list_checks() {
        let base = serve(Router::new().route("/checks", get(list_checks))).await;

        let listing = client(&base).list_checks(CheckQuery::default()).await.unwrap();

        assert_eq!(listing.rate_limit_remaining, Some(12.0));
        assert_eq!(listing.checks.len(), 1);
        assert_eq!(listing.checks[0].id, 85975);
        assert_eq!(listing.checks[0].name, "My check 1");
        assert_eq!(listing.checks[0].status, CheckStatus::Up);
    }

    #[tokio::test]
    async fn test_list_checks_with_tag_filter() {
        let base = serve(Router::new().route("/checks", get(list_checks))).await;

        let listing = client(&base)
            .list_checks(CheckQuery::with_tags(["prod", "web"]))
            .await
            .unwrap();

        assert_eq!(listing.checks[0].name, "filtered by prod,web");
    }

    #[tokio::test]
    async fn test_list_outages() {
        let base = serve(Router::new().route("/summary.outage/:id", get(outage_summary))).await;

        let intervals = client(&base)
            .list_outages(1, 1293143523, 1294180323)
            .await
            .unwrap();

        assert_eq!(
            intervals,
            vec![
                OutageInterval::up(1293143523, 1294180263),
                OutageInterval::down(1294180263, 1294180323),
            ]
        );
    }

    #[tokio::test]
    async fn test_api_error() {
        let app = Router::new().route(
            "/checks",
            get(|| async {
                (
                    StatusCode::FORBIDDEN,
                    Json(json!({
                        "error": {"statuscode": 403, "statusdesc": "Forbidden", "errormessage": "Invalid token"}
                    })),
                )
            }),
        );
        let base = serve(app).await;

        let err = client(&base)
            .list_checks(CheckQuery::default())
            .await
            .unwrap_err();

        match err {
            PingdomError::Api(api) => assert_eq!(api.to_string(), "403 Forbidden: Invalid token"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_unexpected_status() {
        let app = Router::new().route(
            "/summary.outage/:id",
            get(|| async { (StatusCode::BAD_GATEWAY, "upstream unavailable") }),
        );
        let base = serve(app).await;

        let err = client(&base).list_outages(5, 0, 10).await.unwrap_err();
        assert!(matches!(
            err,
            PingdomError::UnexpectedStatus { status, .. } if status == reqwest::StatusCode::BAD_GATEWAY
        ));
    }

    #[tokio::test]
    async fn test_request_timeout() {
        let app = Router::new().route(
            "/summary.outage/:id",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "{}"
            }),
        );
        let base = serve(app).await;

        let client = PingdomClient::new(
            ClientConfig::new("secret")
                .base_url(base)
                .timeout(Duration::from_millis(100)),
        )
        .unwrap();

        let err = client.list_outages(1, 0, 10).await.unwrap_err();
        assert!(err.is_timeout());
    }
}
