use std::fmt;
use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_GRAPH_API_BASE: &str = "https://graph.facebook.com";
pub const DEFAULT_GRAPH_API_VERSION: &str = "v19.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    /// Parses `GATEWAY_LOG_FORMAT`; unset or blank means pretty.
    pub fn parse(raw: Option<&str>) -> anyhow::Result<LogFormat> {
        match raw.map(str::trim).filter(|v| !v.is_empty()) {
            None | Some("pretty") => Ok(LogFormat::Pretty),
            Some("json") => Ok(LogFormat::Json),
            Some(other) => anyhow::bail!(
                "GATEWAY_LOG_FORMAT must be 'pretty' or 'json', got '{}'",
                other
            ),
        }
    }
}

/// Facebook application identity used for the Graph token flows.
#[derive(Clone, Deserialize)]
pub struct AppIdentity {
    pub app_id: String,
    pub app_secret: String,
}

impl AppIdentity {
    /// App access token in the `app_id|app_secret` form accepted by the Graph API.
    pub fn app_token(&self) -> String {
        format!("{}|{}", self.app_id, self.app_secret)
    }
}

impl fmt::Debug for AppIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppIdentity")
            .field("app_id", &self.app_id)
            .field("app_secret", &"****")
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub youtube_api_key: Option<String>,
    /// `None` unless both FB_APP_ID and FB_APP_SECRET are set.
    pub app_identity: Option<AppIdentity>,
    pub github_api_base: String,
    pub youtube_api_base: String,
    pub graph_api_base: String,
    pub graph_api_version: String,
    pub upstream_timeout_secs: u64,
    /// Retries for transient upstream failures (connect errors, 5xx, 429).
    pub upstream_max_retries: u32,
    /// Allowed browser origin. Any origin when unset.
    pub cors_origin: Option<String>,
    pub log_format: LogFormat,
}

impl Config {
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    /// Graph API root including the version segment, without a trailing slash.
    pub fn graph_api_root(&self) -> String {
        format!(
            "{}/{}",
            self.graph_api_base.trim_end_matches('/'),
            self.graph_api_version.trim_matches('/')
        )
    }

    /// Builds a config from an arbitrary variable lookup.
    /// `load()` feeds it the process environment; tests feed it a map.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match non_empty("GATEWAY_PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| anyhow::anyhow!("GATEWAY_PORT is not a valid port: {}", raw))?,
            None => 8080,
        };

        let app_identity = match (non_empty("FB_APP_ID"), non_empty("FB_APP_SECRET")) {
            (Some(app_id), Some(app_secret)) => Some(AppIdentity { app_id, app_secret }),
            (Some(_), None) | (None, Some(_)) => {
                tracing::warn!(
                    "only one of FB_APP_ID / FB_APP_SECRET is set; Graph token flows are disabled"
                );
                None
            }
            (None, None) => None,
        };

        let log_format = LogFormat::parse(non_empty("GATEWAY_LOG_FORMAT").as_deref())?;

        Ok(Config {
            port,
            youtube_api_key: non_empty("YT_API_KEY"),
            app_identity,
            github_api_base: non_empty("GITHUB_API_BASE")
                .unwrap_or_else(|| DEFAULT_GITHUB_API_BASE.into()),
            youtube_api_base: non_empty("YOUTUBE_API_BASE")
                .unwrap_or_else(|| DEFAULT_YOUTUBE_API_BASE.into()),
            graph_api_base: non_empty("GRAPH_API_BASE")
                .unwrap_or_else(|| DEFAULT_GRAPH_API_BASE.into()),
            graph_api_version: non_empty("GRAPH_API_VERSION")
                .unwrap_or_else(|| DEFAULT_GRAPH_API_VERSION.into()),
            upstream_timeout_secs: non_empty("GATEWAY_UPSTREAM_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(20),
            upstream_max_retries: non_empty("GATEWAY_UPSTREAM_RETRIES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(2),
            cors_origin: non_empty("GATEWAY_CORS_ORIGIN"),
            log_format,
        })
    }
}

pub fn load() -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();
    Config::from_lookup(|key| std::env::var(key).ok())
}
