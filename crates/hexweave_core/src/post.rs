//! Post data bound to content tiles

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A post's date: a single date string or a `{start, end}` range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostDate {
    Single(String),
    Range {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        end: Option<String>,
    },
}

impl Default for PostDate {
    fn default() -> Self {
        PostDate::Single(String::new())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageData {
    pub file_name: String,
    #[serde(default)]
    pub description: String,
}

/// Supported video hosts. Anything else fails to deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoHost {
    Youtube,
    Vimeo,
}

impl VideoHost {
    /// Embed URL for the video `id`.
    pub fn embed_url(self, id: &str) -> String {
        match self {
            VideoHost::Youtube => format!("https://www.youtube.com/embed/{id}"),
            VideoHost::Vimeo => format!("https://player.vimeo.com/video/{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoData {
    pub video_host: VideoHost,
    pub id: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PostData {
    pub id: String,
    pub title_short: String,
    pub title_long: String,
    pub thumbnail_src: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_src: Option<String>,
    /// Link label key to URL.
    pub urls: BTreeMap<String, String>,
    pub date: PostDate,
    pub location: String,
    pub job_title: String,
    pub categories: Vec<String>,
    pub images: Vec<ImageData>,
    pub videos: Vec<VideoData>,
    /// Markdown body.
    pub content: String,
}

impl PostData {
    /// Long title, falling back to the short one.
    pub fn title(&self) -> &str {
        if self.title_long.is_empty() {
            &self.title_short
        } else {
            &self.title_long
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_post() {
        let json = r#"{
            "id": "hex",
            "titleShort": "Hex",
            "titleLong": "Hex Grid",
            "urls": {"github": "https://github.com/example/hex"},
            "date": {"start": "01/2014", "end": "present"},
            "videos": [{"videoHost": "vimeo", "id": "42", "description": "demo"}]
        }"#;
        let post: PostData = serde_json::from_str(json).unwrap();
        assert_eq!(post.title(), "Hex Grid");
        assert_eq!(
            post.date,
            PostDate::Range {
                start: Some("01/2014".into()),
                end: Some("present".into())
            }
        );
        assert_eq!(post.videos[0].video_host, VideoHost::Vimeo);
        assert_eq!(post.videos[0].video_host.embed_url("42"), "https://player.vimeo.com/video/42");
    }

    #[test]
    fn single_date_string_parses() {
        let post: PostData = serde_json::from_str(r#"{"id": "a", "date": "2019"}"#).unwrap();
        assert_eq!(post.date, PostDate::Single("2019".into()));
        assert_eq!(post.title(), "");
    }

    #[test]
    fn unknown_video_host_fails_fast() {
        let json = r#"{"id": "a", "videos": [{"videoHost": "dailymotion", "id": "1"}]}"#;
        assert!(serde_json::from_str::<PostData>(json).is_err());
    }
}
