//! HTTP clients for the third-party APIs behind the gateway.
//! All of them share one [`UpstreamClient`] with retries and timeouts.

use std::time::Duration;

use anyhow::Context;
use reqwest::StatusCode;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};

use crate::errors::AppError;

pub mod github;
pub mod graph;
pub mod youtube;

const USER_AGENT: &str = concat!("lookup-gateway/", env!("CARGO_PKG_VERSION"));

/// Decoded upstream reply. Non-2xx statuses are returned, not raised, so each
/// API client can decide what a 404 or a Graph error object means.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: serde_json::Value,
}

#[derive(Clone)]
pub struct UpstreamClient {
    client: ClientWithMiddleware,
}

impl UpstreamClient {
    pub fn new(timeout: Duration, max_retries: u32) -> anyhow::Result<Self> {
        let reqwest_client = reqwest::Client::builder()
            .use_rustls_tls()
            .user_agent(USER_AGENT)
            .pool_max_idle_per_host(8)
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .context("failed to build HTTP client")?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(max_retries);

        let client = ClientBuilder::new(reqwest_client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self { client })
    }

    /// GET `url` with `query` and decode the body as JSON.
    ///
    /// Query values are never logged since several of them are access tokens.
    pub async fn get_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<UpstreamResponse, AppError> {
        let resp = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(url = %url, "Upstream request failed after retries: {}", e);
                AppError::Upstream(format!("request to upstream failed: {}", e))
            })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| {
            tracing::warn!(url = %url, %status, "Failed to read upstream body: {}", e);
            AppError::Upstream(format!("failed to read upstream response: {}", e))
        })?;

        let body = if text.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| {
                tracing::warn!(url = %url, %status, "Upstream returned invalid JSON: {}", e);
                AppError::Upstream(format!("upstream returned invalid JSON (status {})", status))
            })?
        };

        tracing::debug!(url = %url, %status, "upstream call complete");
        Ok(UpstreamResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> UpstreamClient {
        UpstreamClient::new(Duration::from_secs(5), 0).unwrap()
    }

    #[tokio::test]
    async fn test_get_json_passes_query_and_decodes_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/thing"))
            .and(query_param("q", "a b&c"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        let resp = client()
            .get_json(&format!("{}/thing", mock_server.uri()), &[("q", "a b&c")])
            .await
            .expect("request should succeed");

        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body["ok"], true);
    }

    #[tokio::test]
    async fn test_non_success_status_is_returned_not_raised() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(
                ResponseTemplate::new(404).set_body_string(r#"{"message":"Not Found"}"#),
            )
            .mount(&mock_server)
            .await;

        let resp = client()
            .get_json(&format!("{}/missing", mock_server.uri()), &[])
            .await
            .unwrap();

        assert_eq!(resp.status, StatusCode::NOT_FOUND);
        assert_eq!(resp.body["message"], "Not Found");
    }

    #[tokio::test]
    async fn test_invalid_json_maps_to_upstream_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let err = client()
            .get_json(&mock_server.uri(), &[])
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Upstream(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_empty_body_decodes_to_null() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock_server)
            .await;

        let resp = client().get_json(&mock_server.uri(), &[]).await.unwrap();
        assert!(resp.body.is_null());
    }

    #[tokio::test]
    async fn test_connection_refused_maps_to_upstream_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let err = client()
            .get_json(&format!("http://127.0.0.1:{}/nothing", port), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }
}
