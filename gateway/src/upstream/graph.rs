use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::json;

use super::UpstreamClient;
use crate::config::AppIdentity;
use crate::conversion::CredentialSource;
use crate::credentials::{CredentialRecord, QUOTA};
use crate::errors::AppError;
use crate::models::graph::{AccessTokenResponse, PageInstagram, PageList};

/// Facebook Graph API calls used by the token conversion.
///
/// As a [`CredentialSource`] every failed call degrades to "nothing found";
/// only the introspection call surfaces the failure, as a structured error object.
#[derive(Clone)]
pub struct GraphClient {
    http: UpstreamClient,
    api_root: String,
    identity: AppIdentity,
}

impl GraphClient {
    /// `api_root` includes the version segment, e.g. `https://graph.facebook.com/v19.0`.
    pub fn new(http: UpstreamClient, api_root: impl Into<String>, identity: AppIdentity) -> Self {
        Self {
            http,
            api_root: api_root.into().trim_end_matches('/').to_string(),
            identity,
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, AppError> {
        let url = format!("{}/{}", self.api_root, path);
        let resp = self.http.get_json(&url, query).await?;
        if !resp.status.is_success() {
            let message = resp.body["error"]["message"]
                .as_str()
                .unwrap_or("unknown error")
                .to_string();
            return Err(AppError::Upstream(format!(
                "Graph API returned {}: {}",
                resp.status, message
            )));
        }
        serde_json::from_value(resp.body)
            .map_err(|e| AppError::Upstream(format!("unexpected Graph payload for {}: {}", path, e)))
    }

    /// Raw `debug_token` result. Graph error bodies are passed through as-is;
    /// transport failures become `{"error": {...}}`.
    pub async fn debug_token(&self, input_token: &str) -> serde_json::Value {
        let url = format!("{}/debug_token", self.api_root);
        let app_token = self.identity.app_token();
        match self
            .http
            .get_json(
                &url,
                &[("input_token", input_token), ("access_token", app_token.as_str())],
            )
            .await
        {
            Ok(resp) => resp.body,
            Err(e) => {
                tracing::warn!("debug_token failed: {}", e);
                json!({
                    "error": {
                        "message": e.to_string(),
                        "type": "upstream_error",
                    }
                })
            }
        }
    }

    pub async fn exchange_long_lived(&self, input_token: &str) -> Result<String, AppError> {
        let resp: AccessTokenResponse = self
            .get(
                "oauth/access_token",
                &[
                    ("grant_type", "fb_exchange_token"),
                    ("client_id", self.identity.app_id.as_str()),
                    ("client_secret", self.identity.app_secret.as_str()),
                    ("fb_exchange_token", input_token),
                ],
            )
            .await?;
        Ok(resp.access_token)
    }

    pub async fn app_access_token(&self) -> Result<String, AppError> {
        let resp: AccessTokenResponse = self
            .get(
                "oauth/access_token",
                &[
                    ("grant_type", "client_credentials"),
                    ("client_id", self.identity.app_id.as_str()),
                    ("client_secret", self.identity.app_secret.as_str()),
                ],
            )
            .await?;
        Ok(resp.access_token)
    }

    pub async fn list_pages(&self, user_token: &str) -> Result<PageList, AppError> {
        self.get(
            "me/accounts",
            &[
                ("fields", "id,name,access_token"),
                ("access_token", user_token),
            ],
        )
        .await
    }

    pub async fn instagram_account(
        &self,
        page_id: &str,
        page_token: &str,
    ) -> Result<Option<String>, AppError> {
        let resp: PageInstagram = self
            .get(
                &urlencoding::encode(page_id),
                &[
                    ("fields", "instagram_business_account"),
                    ("access_token", page_token),
                ],
            )
            .await?;
        Ok(resp.instagram_business_account.map(|a| a.id))
    }
}

#[async_trait]
impl CredentialSource for GraphClient {
    async fn introspect(&self, input_token: &str) -> Option<serde_json::Value> {
        Some(self.debug_token(input_token).await)
    }

    async fn collect(&self, input_token: &str) -> Vec<CredentialRecord> {
        let mut real = Vec::new();

        let long_lived = match self.exchange_long_lived(input_token).await {
            Ok(token) => {
                real.push(CredentialRecord::user_long_lived(token.clone()));
                Some(token)
            }
            Err(e) => {
                tracing::info!("long-lived token exchange unavailable: {}", e);
                None
            }
        };

        match self.app_access_token().await {
            Ok(token) => real.push(CredentialRecord::app_access_token(token)),
            Err(e) => tracing::info!("app access token unavailable: {}", e),
        }

        let owner_token = long_lived.as_deref().unwrap_or(input_token);
        let pages = match self.list_pages(owner_token).await {
            Ok(list) => list.data,
            Err(e) => {
                tracing::info!("page listing unavailable: {}", e);
                Vec::new()
            }
        };

        for page in pages {
            if real.len() >= QUOTA {
                break;
            }
            let Some(page_token) = page.access_token else {
                tracing::debug!(page_id = %page.id, "page has no access token, skipping");
                continue;
            };

            let instagram = match self.instagram_account(&page.id, &page_token).await {
                Ok(found) => found,
                Err(e) => {
                    tracing::debug!(page_id = %page.id, "instagram lookup failed: {}", e);
                    None
                }
            };

            real.push(CredentialRecord::page_access_token(
                page_token,
                page.id.clone(),
                page.name,
            ));
            if let Some(account_id) = instagram {
                real.push(CredentialRecord::instagram_business_account(
                    account_id, page.id,
                ));
            }
        }

        tracing::info!(real = real.len(), "collected Graph credentials");
        real
    }
}
