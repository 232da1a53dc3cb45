use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::conversion::ConversionResponse;
use crate::errors::AppError;
use crate::models::github::GitHubProfile;
use crate::models::youtube::VideoReport;
use crate::AppState;

// ── Query parameters ─────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GitHubParams {
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct YouTubeParams {
    pub link: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TokenParams {
    pub token: Option<String>,
}

/// Trimmed, non-empty value of a query parameter.
fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, AppError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(AppError::MissingParameter(name))
}

/// Short, log-safe rendering of a secret.
pub fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}…{}", head, tail)
    } else {
        "****".to_string()
    }
}

// ── Handlers ─────────────────────────────────────────────────

/// GET /home — service description
pub async fn home() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the Lookup Gateway",
        "description": "GitHub profiles, YouTube video metadata and Graph token conversion behind one API.",
        "endpoints": {
            "/github?username=": "GitHub user profile",
            "/ytb?link=": "YouTube video and channel details (YouTube Data API v3)",
            "/token?token=": "Convert a Graph token into up to 18 credential records",
        },
        "examples": {
            "github": "/github?username=octocat",
            "youtube": "/ytb?link=https://youtu.be/dQw4w9WgXcQ",
            "token": "/token?token=EAA123456789abc",
        },
    }))
}

/// GET /github?username= — reshaped GitHub profile
pub async fn github_user(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GitHubParams>,
) -> Result<Json<GitHubProfile>, AppError> {
    let username = required(&params.username, "username")?;
    tracing::debug!(username, "github lookup");
    let profile = state.github.fetch_profile(username).await?;
    Ok(Json(profile))
}

/// GET /ytb?link= — reshaped video + channel details
pub async fn youtube_video(
    State(state): State<Arc<AppState>>,
    Query(params): Query<YouTubeParams>,
) -> Result<Json<VideoReport>, AppError> {
    let link = required(&params.link, "link")?;
    let report = state.youtube.fetch_report(link).await?;
    Ok(Json(report))
}

/// GET /token?token= — token conversion
pub async fn convert_token(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TokenParams>,
) -> Result<Json<ConversionResponse>, AppError> {
    let token = required(&params.token, "token")?;
    tracing::info!(
        token = %mask(token),
        upstream = state.converter.has_source(),
        "token conversion requested"
    );
    let result = state.converter.convert(token).await;
    Ok(Json(result.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_rejects_missing_and_blank() {
        assert!(matches!(
            required(&None, "token"),
            Err(AppError::MissingParameter("token"))
        ));
        assert!(required(&Some("   ".into()), "token").is_err());
        assert_eq!(required(&Some(" abc ".into()), "token").unwrap(), "abc");
    }

    #[test]
    fn test_mask_hides_the_middle() {
        assert_eq!(mask("EAA123456789abc"), "EAA1…9abc");
        assert_eq!(mask("short"), "****");
        assert_eq!(mask("ツールツールツール"), "ツールツ…ルツール");
    }
}
