use serde::{Deserialize, Serialize};

// ── YouTube Data API v3 payloads (only the fields we reshape) ─────

#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: Option<String>,
    #[serde(default)]
    pub snippet: VideoSnippet,
    #[serde(default)]
    pub statistics: VideoStatistics,
    #[serde(default)]
    pub content_details: ContentDetails,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub category_id: Option<String>,
    pub published_at: Option<String>,
    pub live_broadcast_content: Option<String>,
    pub channel_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    pub view_count: Option<String>,
    pub like_count: Option<String>,
    pub comment_count: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentDetails {
    pub duration: Option<String>,
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Channel {
    #[serde(default)]
    pub snippet: ChannelSnippet,
    #[serde(default)]
    pub statistics: ChannelStatistics,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelSnippet {
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStatistics {
    pub subscriber_count: Option<String>,
    pub video_count: Option<String>,
    pub view_count: Option<String>,
}

// ── Gateway response ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct VideoReport {
    pub video_information: VideoInformation,
    pub channel_information: ChannelInformation,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct VideoInformation {
    pub title: Option<String>,
    pub id: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub published: Option<String>,
    pub duration: Option<String>,
    pub live: Option<String>,
    pub captions: &'static str,
    pub statistics: VideoCounts,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct VideoCounts {
    pub views: Option<String>,
    pub likes: Option<String>,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ChannelInformation {
    pub name: Option<String>,
    pub id: Option<String>,
    pub subscribers: Option<String>,
    pub total_videos: Option<String>,
    pub total_views: Option<String>,
}

impl VideoReport {
    /// `video_id` is the id extracted from the caller's link; `channel` is
    /// `None` when the channel lookup returned no item.
    pub fn new(video_id: &str, video: Video, channel: Option<Channel>) -> Self {
        let snippet = video.snippet;
        let stats = video.statistics;
        let details = video.content_details;
        let channel_id = snippet.channel_id.clone();
        let (channel_snippet, channel_stats) = match channel {
            Some(c) => (c.snippet, c.statistics),
            None => (ChannelSnippet::default(), ChannelStatistics::default()),
        };

        Self {
            video_information: VideoInformation {
                title: snippet.title,
                id: video_id.to_string(),
                description: snippet.description,
                tags: snippet.tags.unwrap_or_default(),
                category: snippet.category_id,
                published: snippet.published_at,
                duration: details.duration,
                live: snippet.live_broadcast_content,
                captions: if details.caption.as_deref() == Some("true") {
                    "Yes"
                } else {
                    "No"
                },
                statistics: VideoCounts {
                    views: stats.view_count,
                    likes: stats.like_count,
                    comments: stats.comment_count,
                },
            },
            channel_information: ChannelInformation {
                name: channel_snippet.title,
                id: channel_id,
                subscribers: channel_stats.subscriber_count,
                total_videos: channel_stats.video_count,
                total_views: channel_stats.view_count,
            },
        }
    }
}
