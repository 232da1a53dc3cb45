use once_cell::sync::Lazy;
use regex::Regex;

use super::UpstreamClient;
use crate::errors::AppError;
use crate::models::youtube::{Channel, ListResponse, Video, VideoReport};

static VIDEO_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:v=|\.be/)([^&]+)").expect("valid video id pattern"));

/// Video id from a `watch?v=` or `youtu.be/` link.
pub fn extract_video_id(link: &str) -> Option<&str> {
    VIDEO_ID
        .captures(link)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

#[derive(Clone)]
pub struct YouTubeClient {
    http: UpstreamClient,
    base_url: String,
    api_key: Option<String>,
}

impl YouTubeClient {
    pub fn new(http: UpstreamClient, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Looks up the video behind `link` and its channel.
    pub async fn fetch_report(&self, link: &str) -> Result<VideoReport, AppError> {
        let video_id = extract_video_id(link).ok_or(AppError::InvalidLink)?;
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AppError::NotConfigured("YT_API_KEY"))?;

        let videos: ListResponse<Video> = self
            .list(
                "videos",
                &[
                    ("part", "snippet,statistics,contentDetails,status"),
                    ("id", video_id),
                    ("key", api_key),
                ],
            )
            .await?;
        let video = videos
            .items
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("YouTube video not found".into()))?;

        let channel = match video.snippet.channel_id.as_deref() {
            Some(channel_id) => {
                let channels: ListResponse<Channel> = self
                    .list(
                        "channels",
                        &[
                            ("part", "snippet,statistics"),
                            ("id", channel_id),
                            ("key", api_key),
                        ],
                    )
                    .await?;
                channels.items.into_iter().next()
            }
            None => None,
        };
        if channel.is_none() {
            tracing::debug!(video_id, "no channel item returned for video");
        }

        Ok(VideoReport::new(video_id, video, channel))
    }

    async fn list<T: serde::de::DeserializeOwned>(
        &self,
        resource: &str,
        query: &[(&str, &str)],
    ) -> Result<ListResponse<T>, AppError> {
        let url = format!("{}/{}", self.base_url, resource);
        let resp = self.http.get_json(&url, query).await?;
        if !resp.status.is_success() {
            let message = resp.body["error"]["message"]
                .as_str()
                .unwrap_or("unknown error");
            tracing::warn!(status = %resp.status, resource, "YouTube lookup failed: {}", message);
            return Err(AppError::Upstream(format!(
                "YouTube API returned {}: {}",
                resp.status, message
            )));
        }
        serde_json::from_value(resp.body).map_err(|e| {
            AppError::Upstream(format!("unexpected YouTube {} payload: {}", resource, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_id_from_watch_link() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s"),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_extracts_id_from_short_link() {
        assert_eq!(extract_video_id("https://youtu.be/ugIVeCcEds"), Some("ugIVeCcEds"));
    }

    #[test]
    fn test_rejects_links_without_id() {
        assert_eq!(extract_video_id("https://www.youtube.com/"), None);
        assert_eq!(extract_video_id("not a link"), None);
        assert_eq!(extract_video_id(""), None);
    }
}
