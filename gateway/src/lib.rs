//! Lookup Gateway: GitHub, YouTube and Graph token lookups behind one router.
//!
//! The binary in `main.rs` wires this library to a TCP listener (or a Lambda
//! runtime); integration tests in `tests/` drive the router directly.

use std::sync::Arc;

pub mod api;
pub mod cli;
pub mod config;
pub mod conversion;
pub mod credentials;
pub mod errors;
pub mod models;
pub mod upstream;

use conversion::{CredentialSource, TokenConverter};
use upstream::github::GitHubClient;
use upstream::graph::GraphClient;
use upstream::youtube::YouTubeClient;
use upstream::UpstreamClient;

/// Shared application state passed to handlers.
pub struct AppState {
    pub config: config::Config,
    pub github: GitHubClient,
    pub youtube: YouTubeClient,
    pub converter: TokenConverter,
}

impl AppState {
    pub fn from_config(config: config::Config) -> anyhow::Result<Self> {
        let http = UpstreamClient::new(config.upstream_timeout(), config.upstream_max_retries)?;

        let github = GitHubClient::new(http.clone(), config.github_api_base.clone());
        let youtube = YouTubeClient::new(
            http.clone(),
            config.youtube_api_base.clone(),
            config.youtube_api_key.clone(),
        );

        let source = config.app_identity.clone().map(|identity| {
            Arc::new(GraphClient::new(http, config.graph_api_root(), identity))
                as Arc<dyn CredentialSource>
        });
        if source.is_none() {
            tracing::info!("FB_APP_ID / FB_APP_SECRET not set; /token returns simulated records only");
        }
        if config.youtube_api_key.is_none() {
            tracing::info!("YT_API_KEY not set; /ytb is disabled");
        }

        Ok(Self {
            config,
            github,
            youtube,
            converter: TokenConverter::new(source),
        })
    }
}
