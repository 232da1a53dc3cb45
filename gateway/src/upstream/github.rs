use reqwest::StatusCode;

use super::UpstreamClient;
use crate::errors::AppError;
use crate::models::github::{GitHubProfile, GitHubUser};

#[derive(Clone)]
pub struct GitHubClient {
    http: UpstreamClient,
    base_url: String,
}

impl GitHubClient {
    pub fn new(http: UpstreamClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn fetch_profile(&self, username: &str) -> Result<GitHubProfile, AppError> {
        let url = format!("{}/users/{}", self.base_url, urlencoding::encode(username));
        let resp = self.http.get_json(&url, &[]).await?;

        if resp.status == StatusCode::NOT_FOUND || resp.body["message"] == "Not Found" {
            return Err(AppError::NotFound("GitHub user not found".into()));
        }
        if !resp.status.is_success() {
            let message = resp.body["message"].as_str().unwrap_or("unknown error");
            tracing::warn!(status = %resp.status, "GitHub lookup failed: {}", message);
            return Err(AppError::Upstream(format!(
                "GitHub returned {}: {}",
                resp.status, message
            )));
        }

        let user: GitHubUser = serde_json::from_value(resp.body).map_err(|e| {
            AppError::Upstream(format!("unexpected GitHub user payload: {}", e))
        })?;
        Ok(user.into())
    }
}
